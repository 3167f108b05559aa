/// Render a 0..=100 score on the 0..=10 display scale with one decimal (`83 -> "8.3"`).
///
/// Ties round up. Negative and non-finite scores render as `"0.0"`.
pub fn format_score(score: f64) -> String {
    let score = if score.is_finite() { score.max(0.0) } else { 0.0 };
    let tenths = score.round() as i64;
    format!("{}.{}", tenths / 10, tenths % 10)
}

/// Whether `score` earns the green badge.
pub fn is_good(score: f64, threshold: f64) -> bool {
    score >= threshold
}
