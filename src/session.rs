//! Caller-side state around the stateless tempo pipeline.
//!
//! A session owns the decoder collaborator and the analysis parameters, and
//! allows at most one analysis in flight at a time. A second call made while
//! one is running fails with [`SessionError::Busy`] instead of waiting.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::audio::analysis;
use crate::audio::decode::{AudioData, PcmDecoder};
use crate::audio::features::TempoAnalysis;
use crate::config::AnalysisConfig;
use crate::error::SessionError;
use crate::report::TempoReport;

pub struct AnalysisSession<D> {
    decoder: D,
    config: AnalysisConfig,
    busy: AtomicBool,
}

/// Clears the busy flag when dropped.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<D: PcmDecoder> AnalysisSession<D> {
    pub fn new(decoder: D, config: AnalysisConfig) -> Self {
        Self {
            decoder,
            config,
            busy: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    fn begin(&self) -> Result<InFlight<'_>, SessionError> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| InFlight(&self.busy))
            .map_err(|_| SessionError::Busy)
    }

    /// Decode `path` and estimate its tempo.
    pub fn analyze_path(&self, path: &Path) -> Result<TempoReport, SessionError> {
        let _in_flight = self.begin()?;

        log::info!("Analyzing {}", path.display());
        let audio = self
            .decoder
            .decode(path)
            .map_err(|e| SessionError::Decode(format!("{:#}", e)))?;
        let analysis = analysis::analyze(&audio.samples, audio.sample_rate, &self.config)?;
        log::info!("{}: {:.2} BPM", path.display(), analysis.bpm);

        let size_bytes = std::fs::metadata(path).map(|m| m.len()).ok();
        Ok(TempoReport::new(path, size_bytes, &audio, analysis))
    }

    /// Estimate the tempo of an already decoded buffer.
    pub fn analyze_samples(&self, audio: &AudioData) -> Result<TempoAnalysis, SessionError> {
        let _in_flight = self.begin()?;
        Ok(analysis::analyze(&audio.samples, audio.sample_rate, &self.config)?)
    }
}
