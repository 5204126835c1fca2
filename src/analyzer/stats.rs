/// Reusable statistical functions for dashboard analytics.

/// Arithmetic mean. Returns 0.0 if the slice is empty.
pub fn average(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Mean when there is at least one sample; KPI cards show "—" otherwise.
pub fn mean_or_none(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(average(values))
    }
}

/// Median (mean of the two middle values for even lengths). Returns 0.0 if empty.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

pub fn median_or_none(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(median(values))
    }
}

/// round(100 × numerator / denominator); 0 when the denominator is 0.
pub fn pct(numerator: usize, denominator: usize) -> u32 {
    if denominator == 0 {
        return 0;
    }
    (numerator as f64 * 100.0 / denominator as f64).round() as u32
}

pub fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// KPI display of a mean duration: "12 min", or "—" without samples.
pub fn format_minutes(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{} min", v.round() as i64),
        _ => "—".to_string(),
    }
}
