//! Nominal/effective annual rate conversions

/// Effective annual rate of a nominal `apr` compounded `periods_per_year` times.
pub fn apr_to_ear(apr: f64, periods_per_year: u32) -> f64 {
    let m = periods_per_year as f64;
    (1.0 + apr / m).powf(m) - 1.0
}

/// Nominal annual rate that compounds `periods_per_year` times to `ear`.
pub fn ear_to_apr(ear: f64, periods_per_year: u32) -> f64 {
    let m = periods_per_year as f64;
    m * ((1.0 + ear).powf(1.0 / m) - 1.0)
}
