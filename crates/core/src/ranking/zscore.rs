/// Standardizes `values` to `(x - mean) / stddev` using the population
/// standard deviation. A zero stddev is replaced by 1, so a constant input
/// maps to all zeros instead of NaN.
pub fn z_scores(values: &[f64]) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    let mut std = variance.sqrt();
    if std == 0.0 {
        std = 1.0;
    }

    values.iter().map(|v| (v - mean) / std).collect()
}
