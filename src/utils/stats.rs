//! Statistics over series that may contain missing (non-finite) values.

/// Iterate over the finite entries of a slice.
pub fn observed(values: &[f64]) -> impl Iterator<Item = f64> + '_ {
    values.iter().copied().filter(|v| v.is_finite())
}

/// Mean of the finite entries; `NaN` if there are none.
pub fn mean(values: &[f64]) -> f64 {
    let (sum, count) = observed(values).fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 {
        return f64::NAN;
    }
    sum / count as f64
}

/// Sample variance (n-1 denominator) of the finite entries.
pub fn variance(values: &[f64]) -> f64 {
    let count = observed(values).count();
    if count < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    let sum_sq: f64 = observed(values).map(|x| (x - m).powi(2)).sum();
    sum_sq / (count - 1) as f64
}

/// Sample standard deviation of the finite entries.
pub fn std_dev(values: &[f64]) -> f64 {
    variance(values).sqrt()
}

/// Characteristic magnitude used to make objectives scale-free.
///
/// Falls back to `max(|mean|, 1)` for constant or near-constant data.
pub fn scale(values: &[f64]) -> f64 {
    let sd = std_dev(values);
    if sd.is_finite() && sd > 1e-12 {
        sd
    } else {
        let m = mean(values);
        if m.is_finite() {
            m.abs().max(1.0)
        } else {
            1.0
        }
    }
}
