//! Spectral-flux onset strength.
//!
//! Each frame's onset strength is the summed positive change in bin
//! magnitude relative to the frame before it. Only the previous spectrum is
//! retained while streaming.

use super::spectrum::SpectrumAnalyzer;

/// Half-wave-rectified difference `Σ max(0, current[k] − previous[k])`.
pub fn spectral_flux(previous: &[f64], current: &[f64]) -> f64 {
    current
        .iter()
        .zip(previous.iter())
        .map(|(cur, prev)| (cur - prev).max(0.0))
        .sum()
}

/// Streaming onset detector fed one frame at a time.
pub struct OnsetDetector {
    analyzer: SpectrumAnalyzer,
    previous: Option<Vec<f64>>,
}

impl OnsetDetector {
    pub fn new(analyzer: SpectrumAnalyzer) -> Self {
        Self {
            analyzer,
            previous: None,
        }
    }

    /// Onset strength of `frame`. The first frame always scores 0.
    pub fn push(&mut self, frame: &[f32]) -> f64 {
        let magnitudes = self.analyzer.magnitudes(frame);
        let flux = match &self.previous {
            Some(previous) => spectral_flux(previous, &magnitudes),
            None => 0.0,
        };
        self.previous = Some(magnitudes);
        flux
    }
}

/// One onset-strength value per frame, in frame order.
pub fn onset_strength<'a, I>(frames: I, analyzer: SpectrumAnalyzer) -> Vec<f64>
where
    I: IntoIterator<Item = &'a [f32]>,
{
    let mut detector = OnsetDetector::new(analyzer);
    frames.into_iter().map(|frame| detector.push(frame)).collect()
}
