pub const PEAK_THRESHOLD_RATIO: f64 = 0.3;

/// Indices of strict local maxima above `threshold_ratio` × the global max.
///
/// The first and last index are never peaks. Because the threshold test is
/// strict, an all-zero sequence (silence) has no peaks.
pub fn pick_peaks(strength: &[f64], threshold_ratio: f64) -> Vec<usize> {
    if strength.len() < 3 {
        return Vec::new();
    }

    let max = strength.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let threshold = max * threshold_ratio;

    (1..strength.len() - 1)
        .filter(|&i| {
            let s = strength[i];
            s > threshold && s > strength[i - 1] && s > strength[i + 1]
        })
        .collect()
}
