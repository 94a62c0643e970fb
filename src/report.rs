use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::audio::decode::AudioData;
use crate::audio::features::TempoAnalysis;

/// What the front end shows for one analysed file.
#[derive(Clone, Debug, Serialize)]
pub struct TempoReport {
    pub file_name: String,
    pub path: PathBuf,
    pub size_bytes: Option<u64>,
    pub sample_rate: u32,
    pub channels: usize,
    pub duration_secs: f64,
    pub duration: String,
    pub bpm: f64,
    pub rounded_bpm: i64,
    pub analysis: TempoAnalysis,
}

impl TempoReport {
    pub fn new(path: &Path, size_bytes: Option<u64>, audio: &AudioData, analysis: TempoAnalysis) -> Self {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let duration_secs = audio.duration_secs();
        Self {
            file_name,
            path: path.to_path_buf(),
            size_bytes,
            sample_rate: audio.sample_rate,
            channels: audio.channels,
            duration_secs,
            duration: format_time(duration_secs),
            bpm: analysis.bpm,
            rounded_bpm: round_bpm(analysis.bpm),
            analysis,
        }
    }

    /// Plain-text block: file, size, duration, tempo.
    pub fn render_text(&self) -> String {
        let mut out = format!("File: {}\n", self.file_name);
        if let Some(bytes) = self.size_bytes {
            out.push_str(&format!("Size: {}\n", format_size_mb(bytes)));
        }
        out.push_str(&format!("Duration: {}\n", self.duration));
        out.push_str(&format!("{} BPM\n", self.rounded_bpm));
        out.push_str(&format!(
            "Detected tempo: {} beats per minute",
            self.rounded_bpm
        ));
        out
    }
}

/// Nearest whole BPM, halves rounded away from zero.
pub fn round_bpm(bpm: f64) -> i64 {
    bpm.round() as i64
}

/// `m:ss`; non-finite or negative input renders as `0:00`.
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "0:00".to_string();
    }
    let mins = (seconds / 60.0).floor() as u64;
    let secs = (seconds % 60.0).floor() as u64;
    format!("{}:{:02}", mins, secs)
}

pub fn format_size_mb(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / 1024.0 / 1024.0)
}
