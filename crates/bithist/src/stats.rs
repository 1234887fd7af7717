//! Moments and cumulants of a count histogram.
//!
//! A histogram is read as a discrete distribution over its bin indices with
//! weights equal to the counts. All sums run in ascending bin order in `f64`,
//! so results are reproducible bit for bit for a fixed histogram.

use crate::error::{HistError, Result};

fn total(counts: &[u64]) -> Result<f64> {
    let total: f64 = counts.iter().map(|&c| c as f64).sum();
    if total == 0.0 {
        return Err(HistError::EmptyHistogram);
    }
    Ok(total)
}

/// `base^order`; orders past `i32::MAX` go through `powf`.
#[inline]
fn pow(base: f64, order: u32) -> f64 {
    match i32::try_from(order) {
        Ok(exp) => base.powi(exp),
        Err(_) => base.powf(f64::from(order)),
    }
}

/// Raw moments `E[i^k]` for `k` in `0..=max_order`.
fn raw_moments(counts: &[u64], max_order: u32) -> Result<Vec<f64>> {
    let n = total(counts)?;
    let mut sums = vec![0.0f64; max_order as usize + 1];
    for (i, &c) in counts.iter().enumerate() {
        if c == 0 {
            continue;
        }
        let c = c as f64;
        let x = i as f64;
        let mut p = 1.0;
        for s in sums.iter_mut() {
            *s += c * p;
            p *= x;
        }
    }
    Ok(sums.into_iter().map(|s| s / n).collect())
}

/// Moment of order `order` over bin indices.
///
/// Raw: `sum(count[i] * i^order) / sum(count)`. Centered: the same with `i`
/// replaced by `i - mean`, where `mean` is the raw first moment. Order 0 is
/// always `1.0`.
///
/// # Errors
///
/// [`HistError::EmptyHistogram`] if every count is zero.
pub fn moment(counts: &[u64], order: u32, centered: bool) -> Result<f64> {
    let n = total(counts)?;
    if order == 0 {
        return Ok(1.0);
    }
    let mean = if centered {
        let mut s = 0.0;
        for (i, &c) in counts.iter().enumerate() {
            s += c as f64 * i as f64;
        }
        s / n
    } else {
        0.0
    };
    let mut s = 0.0;
    for (i, &c) in counts.iter().enumerate() {
        if c != 0 {
            s += c as f64 * pow(i as f64 - mean, order);
        }
    }
    Ok(s / n)
}

/// Cumulants of orders `1..=max_order`, element `k - 1` holding order `k`.
///
/// Evaluated bottom-up from the raw moments:
///
/// ```text
/// kappa(k) = m(k) - sum_{j=1}^{k-1} C(k-1, j-1) * kappa(j) * m(k-j)
/// ```
///
/// # Errors
///
/// [`HistError::InvalidOrder`] for `max_order == 0`,
/// [`HistError::EmptyHistogram`] if every count is zero.
pub fn cumulants(counts: &[u64], max_order: u32) -> Result<Vec<f64>> {
    if max_order == 0 {
        return Err(HistError::InvalidOrder(0));
    }
    let m = raw_moments(counts, max_order)?;
    let mut kappa: Vec<f64> = Vec::with_capacity(max_order as usize);
    for k in 1..=max_order as usize {
        let mut value = m[k];
        for j in 1..k {
            value -= binomial((k - 1) as u64, (j - 1) as u64) * kappa[j - 1] * m[k - j];
        }
        kappa.push(value);
    }
    Ok(kappa)
}

/// Cumulant of order `order`. Order 1 is the mean, order 2 the variance.
pub fn cumulant(counts: &[u64], order: u32) -> Result<f64> {
    let kappa = cumulants(counts, order)?;
    Ok(kappa[order as usize - 1])
}

/// Binomial coefficient `C(n, r)` by the multiplicative formula.
///
/// Iterates over the smaller of `r` and `n - r`. Zero when `r > n`.
pub fn binomial(n: u64, r: u64) -> f64 {
    if r > n {
        return 0.0;
    }
    let r = r.min(n - r);
    let mut result = 1.0f64;
    for i in 0..r {
        result *= (n - i) as f64;
        result /= (i + 1) as f64;
    }
    result
}
