use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::audio::decode::ChannelSelect;
use crate::audio::downsample::DOWNSAMPLE_FACTOR;
use crate::audio::peaks::PEAK_THRESHOLD_RATIO;
use crate::audio::spectrum::{Transform, FRAME_SIZE, HOP_SIZE};
use crate::audio::tempo::{
    IntervalRange, DEFAULT_BPM, INTERVAL_RESOLUTION_SECS, MAX_INTERVAL_SECS, MIN_INTERVAL_SECS,
};
use crate::error::TempoError;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub decode: DecodeConfig,
}

/// Tuning of the tempo pipeline. Defaults are the detector's fixed
/// parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default = "default_downsample_factor")]
    pub downsample_factor: usize,
    #[serde(default = "default_frame_size")]
    pub frame_size: usize,
    #[serde(default = "default_hop_size")]
    pub hop_size: usize,
    #[serde(default = "default_peak_threshold_ratio")]
    pub peak_threshold_ratio: f64,
    #[serde(default = "default_min_interval")]
    pub min_interval_secs: f64,
    #[serde(default = "default_max_interval")]
    pub max_interval_secs: f64,
    #[serde(default = "default_interval_resolution")]
    pub interval_resolution_secs: f64,
    #[serde(default = "default_bpm")]
    pub default_bpm: f64,
    #[serde(default)]
    pub transform: Transform,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct DecodeConfig {
    #[serde(default)]
    pub channel: ChannelSelect,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            downsample_factor: default_downsample_factor(),
            frame_size: default_frame_size(),
            hop_size: default_hop_size(),
            peak_threshold_ratio: default_peak_threshold_ratio(),
            min_interval_secs: default_min_interval(),
            max_interval_secs: default_max_interval(),
            interval_resolution_secs: default_interval_resolution(),
            default_bpm: default_bpm(),
            transform: Transform::default(),
        }
    }
}

impl AnalysisConfig {
    pub fn interval_range(&self) -> IntervalRange {
        IntervalRange {
            min: self.min_interval_secs,
            max: self.max_interval_secs,
        }
    }

    pub fn validate(&self) -> Result<(), TempoError> {
        fn invalid(msg: &str) -> Result<(), TempoError> {
            Err(TempoError::InvalidArgument(msg.to_string()))
        }
        if self.downsample_factor == 0 {
            return invalid("downsample_factor must be at least 1");
        }
        if self.frame_size == 0 {
            return invalid("frame_size must be at least 1");
        }
        if self.hop_size == 0 {
            return invalid("hop_size must be at least 1");
        }
        if !self.peak_threshold_ratio.is_finite() || self.peak_threshold_ratio < 0.0 {
            return invalid("peak_threshold_ratio must be a finite, non-negative number");
        }
        if !(self.interval_resolution_secs.is_finite() && self.interval_resolution_secs > 0.0) {
            return invalid("interval_resolution_secs must be positive");
        }
        if !(self.min_interval_secs >= 0.0 && self.min_interval_secs < self.max_interval_secs) {
            return invalid("interval range must satisfy 0 <= min_interval_secs < max_interval_secs");
        }
        if !(self.default_bpm.is_finite() && self.default_bpm > 0.0) {
            return invalid("default_bpm must be positive");
        }
        Ok(())
    }
}

fn default_downsample_factor() -> usize { DOWNSAMPLE_FACTOR }
fn default_frame_size() -> usize { FRAME_SIZE }
fn default_hop_size() -> usize { HOP_SIZE }
fn default_peak_threshold_ratio() -> f64 { PEAK_THRESHOLD_RATIO }
fn default_min_interval() -> f64 { MIN_INTERVAL_SECS }
fn default_max_interval() -> f64 { MAX_INTERVAL_SECS }
fn default_interval_resolution() -> f64 { INTERVAL_RESOLUTION_SECS }
fn default_bpm() -> f64 { DEFAULT_BPM }

pub fn parse_config(content: &str) -> Result<Config> {
    toml::from_str(content).context("Invalid tempocheck config")
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    parse_config(&content)
}

/// Explicit path, else `./tempocheck.toml`, else the per-user config files.
pub fn discover_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    let local = PathBuf::from("tempocheck.toml");
    if local.exists() {
        return Some(local);
    }
    if let Some(home) = dirs::home_dir() {
        let xdg = home.join(".config").join("tempocheck").join("config.toml");
        if xdg.exists() {
            return Some(xdg);
        }
    }
    if let Some(config_dir) = dirs::config_dir() {
        let platform = config_dir.join("tempocheck").join("config.toml");
        if platform.exists() {
            return Some(platform);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_match_detector_constants() {
        let cfg = AnalysisConfig::default();
        assert_eq!(cfg.downsample_factor, 4);
        assert_eq!(cfg.frame_size, 1024);
        assert_eq!(cfg.hop_size, 512);
        assert_eq!(cfg.peak_threshold_ratio, 0.3);
        assert_eq!(cfg.interval_range(), IntervalRange { min: 0.1, max: 4.0 });
        assert_eq!(cfg.interval_resolution_secs, 0.1);
        assert_eq!(cfg.default_bpm, 120.0);
        assert_eq!(cfg.transform, Transform::Fft);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let cfg = parse_config("").unwrap();
        assert_eq!(cfg.analysis, AnalysisConfig::default());
        assert_eq!(cfg.decode.channel, ChannelSelect::First);
    }

    #[test]
    fn test_partial_override() {
        let cfg = parse_config(
            r#"
            [analysis]
            hop_size = 256
            transform = "direct"

            [decode]
            channel = "mix"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.analysis.hop_size, 256);
        assert_eq!(cfg.analysis.frame_size, 1024);
        assert_eq!(cfg.analysis.transform, Transform::Direct);
        assert_eq!(cfg.decode.channel, ChannelSelect::Mix);
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        assert!(parse_config("[analysis]\nhop_size = \"wide\"").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[analysis]\ndefault_bpm = 100.0").unwrap();
        let cfg = load_config(file.path()).unwrap();
        assert_eq!(cfg.analysis.default_bpm, 100.0);
        assert_eq!(
            discover_config_path(Some(file.path())).as_deref(),
            Some(file.path())
        );
    }

    #[test]
    fn test_validate_rejects_bad_parameters() {
        let bad = [
            AnalysisConfig { downsample_factor: 0, ..Default::default() },
            AnalysisConfig { hop_size: 0, ..Default::default() },
            AnalysisConfig { frame_size: 0, ..Default::default() },
            AnalysisConfig { peak_threshold_ratio: f64::NAN, ..Default::default() },
            AnalysisConfig { interval_resolution_secs: 0.0, ..Default::default() },
            AnalysisConfig { min_interval_secs: 4.0, max_interval_secs: 0.1, ..Default::default() },
            AnalysisConfig { default_bpm: -1.0, ..Default::default() },
        ];
        for cfg in &bad {
            assert!(
                matches!(cfg.validate(), Err(TempoError::InvalidArgument(_))),
                "{:?} should be rejected",
                cfg
            );
        }
    }
}
