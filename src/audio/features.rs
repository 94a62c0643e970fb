use serde::Serialize;

/// Result of one pass of the tempo pipeline, with the intermediates that
/// produced it.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TempoAnalysis {
    /// Estimated tempo, unrounded.
    pub bpm: f64,
    /// Sample rate after decimation (Hz).
    pub downsampled_rate: f64,
    /// Number of spectral frames analysed.
    pub frame_count: usize,
    /// Frame indices picked as onsets
    pub onset_peaks: Vec<usize>,
    /// Inter-onset intervals (seconds) that survived range filtering
    pub intervals: Vec<f64>,
    /// True when no interval survived and the default tempo was returned.
    pub used_default: bool,
}
