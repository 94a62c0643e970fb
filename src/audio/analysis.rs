use crate::config::AnalysisConfig;
use crate::error::TempoError;

use super::downsample::downsample;
use super::features::TempoAnalysis;
use super::onset::onset_strength;
use super::peaks::pick_peaks;
use super::spectrum::{frame_count, frames, SpectrumAnalyzer};
use super::tempo::{inter_onset_intervals, resolve_bpm};

/// Estimate the tempo of `samples` with the default detector parameters.
pub fn detect_bpm(samples: &[f32], sample_rate: u32) -> Result<f64, TempoError> {
    analyze(samples, sample_rate, &AnalysisConfig::default()).map(|analysis| analysis.bpm)
}

/// Run the full pipeline: downsample, spectral flux, peak picking, and
/// interval histogram.
///
/// Silence, short inputs, and peak trains with no plausible spacing are not
/// errors; they resolve to `config.default_bpm`.
pub fn analyze(
    samples: &[f32],
    sample_rate: u32,
    config: &AnalysisConfig,
) -> Result<TempoAnalysis, TempoError> {
    if samples.is_empty() {
        return Err(TempoError::InvalidInput("empty sample buffer".to_string()));
    }
    if sample_rate == 0 {
        return Err(TempoError::InvalidInput("sample rate must be positive".to_string()));
    }
    config.validate()?;

    let decimated = downsample(samples, config.downsample_factor)?;
    let downsampled_rate = sample_rate as f64 / config.downsample_factor as f64;
    let n_frames = frame_count(decimated.len(), config.frame_size, config.hop_size);
    log::debug!(
        "Downsampled {} -> {} samples ({:.1} Hz), {} frames",
        samples.len(),
        decimated.len(),
        downsampled_rate,
        n_frames
    );

    let analyzer = SpectrumAnalyzer::new(config.frame_size, config.transform);
    let strength = onset_strength(
        frames(&decimated, config.frame_size, config.hop_size),
        analyzer,
    );

    let onset_peaks = pick_peaks(&strength, config.peak_threshold_ratio);
    let intervals = inter_onset_intervals(&onset_peaks, downsampled_rate, config.interval_range());
    log::debug!(
        "Onsets: {} peaks, {} intervals in range",
        onset_peaks.len(),
        intervals.len()
    );

    let used_default = intervals.is_empty();
    let bpm = resolve_bpm(&intervals, config.interval_resolution_secs, config.default_bpm);
    if used_default {
        log::debug!("No usable intervals, falling back to {:.1} BPM", bpm);
    }

    Ok(TempoAnalysis {
        bpm,
        downsampled_rate,
        frame_count: strength.len(),
        onset_peaks,
        intervals,
        used_default,
    })
}
