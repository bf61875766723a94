// ABOUTME: Gaussian proximity kernel over visit indices and its per-group bandwidth.
// ABOUTME: Defines the zero-bandwidth limit so single-node groups never divide by zero.

/// Proximity weight in `[0, 1]` between two visit positions.
///
/// Equals 1 at zero distance and decays as `exp(-d² / 2σ²)`. With a zero
/// bandwidth any nonzero distance weighs 0.
pub fn weight(bandwidth: f64, a: usize, b: usize) -> f64 {
    let distance = a.abs_diff(b) as f64;
    if distance == 0.0 {
        return 1.0;
    }
    if bandwidth <= 0.0 || !bandwidth.is_finite() {
        return 0.0;
    }
    (-(distance * distance) / (2.0 * bandwidth * bandwidth)).exp()
}

/// Population standard deviation of a group's visit indices. Empty groups give 0.
pub fn bandwidth<I>(indices: I) -> f64
where
    I: IntoIterator<Item = usize>,
{
    let values: Vec<f64> = indices.into_iter().map(|i| i as f64).collect();
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}
