use std::collections::BTreeMap;

pub const MIN_INTERVAL_SECS: f64 = 0.1;
pub const MAX_INTERVAL_SECS: f64 = 4.0;
pub const INTERVAL_RESOLUTION_SECS: f64 = 0.1;
pub const DEFAULT_BPM: f64 = 120.0;

/// Open interval `(min, max)` of accepted inter-onset gaps, in seconds.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IntervalRange {
    pub min: f64,
    pub max: f64,
}

impl Default for IntervalRange {
    fn default() -> Self {
        Self {
            min: MIN_INTERVAL_SECS,
            max: MAX_INTERVAL_SECS,
        }
    }
}

impl IntervalRange {
    pub fn contains(&self, interval: f64) -> bool {
        interval > self.min && interval < self.max
    }
}

/// Gaps between consecutive peaks, `(p[j] - p[j-1]) / rate`, keeping only
/// those strictly inside `range`.
pub fn inter_onset_intervals(peaks: &[usize], rate: f64, range: IntervalRange) -> Vec<f64> {
    peaks
        .windows(2)
        .map(|w| (w[1] - w[0]) as f64 / rate)
        .filter(|&interval| range.contains(interval))
        .collect()
}

/// Tempo from the most common interval after rounding to `resolution`.
///
/// Buckets are scanned from the shortest interval upward and only a strictly
/// larger count replaces the current pick, so ties go to the faster tempo.
/// Returns `default_bpm` when there are no intervals.
pub fn resolve_bpm(intervals: &[f64], resolution: f64, default_bpm: f64) -> f64 {
    if intervals.is_empty() {
        return default_bpm;
    }

    let scale = 1.0 / resolution;
    let mut histogram: BTreeMap<u64, usize> = BTreeMap::new();
    for &interval in intervals {
        // Half-way values round up.
        let bucket = (interval * scale + 0.5).floor() as u64;
        *histogram.entry(bucket).or_insert(0) += 1;
    }

    let mut best: Option<(u64, usize)> = None;
    for (&bucket, &count) in &histogram {
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((bucket, count));
        }
    }

    match best {
        Some((bucket, count)) if bucket > 0 => {
            let seconds = bucket as f64 / scale;
            log::debug!(
                "Interval histogram: {} buckets, mode {:.1}s ({} hits)",
                histogram.len(),
                seconds,
                count
            );
            60.0 / seconds
        }
        _ => default_bpm,
    }
}
