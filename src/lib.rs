//! Onset-based tempo estimation.
//!
//! A decoded mono buffer goes through a fixed pipeline: 4x decimation,
//! 1024-sample frames every 512 samples, spectral flux, peak picking above
//! 30% of the strongest onset, and a 0.1 s histogram of the gaps between
//! peaks. The tempo is 60 divided by the most common gap, or 120 BPM when no
//! gap falls inside (0.1 s, 4.0 s).
//!
//! ```no_run
//! let samples: Vec<f32> = vec![0.0; 44100 * 10];
//! let bpm = tempocheck::detect_bpm(&samples, 44100)?;
//! println!("{} BPM", bpm.round());
//! # Ok::<(), tempocheck::TempoError>(())
//! ```

pub mod audio;
pub mod config;
pub mod error;
pub mod report;
pub mod session;

pub use audio::analysis::{analyze, detect_bpm};
pub use audio::decode::{AudioData, ChannelSelect, PcmDecoder, SymphoniaDecoder};
pub use audio::features::TempoAnalysis;
pub use audio::spectrum::Transform;
pub use config::{AnalysisConfig, Config};
pub use error::{SessionError, TempoError};
pub use report::TempoReport;
pub use session::AnalysisSession;
