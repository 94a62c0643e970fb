use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Decoded mono PCM.
#[derive(Clone, Debug)]
pub struct AudioData {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    /// Channel count of the source before reduction to mono.
    pub channels: usize,
}

impl AudioData {
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// How a multi-channel stream is reduced to mono.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ChannelSelect {
    /// Use the first channel only.
    #[default]
    First,
    /// Average all channels.
    Mix,
}

/// Turns an encoded audio file into mono samples plus a sample rate.
pub trait PcmDecoder {
    fn decode(&self, path: &Path) -> Result<AudioData>;
}

/// [`PcmDecoder`] backed by symphonia's default codec registry.
#[derive(Clone, Debug, Default)]
pub struct SymphoniaDecoder {
    pub channel: ChannelSelect,
}

impl SymphoniaDecoder {
    pub fn new(channel: ChannelSelect) -> Self {
        Self { channel }
    }
}

impl PcmDecoder for SymphoniaDecoder {
    fn decode(&self, path: &Path) -> Result<AudioData> {
        decode_audio(path, self.channel)
    }
}

pub fn decode_audio(path: &Path, channel: ChannelSelect) -> Result<AudioData> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open audio file: {}", path.display()))?;

    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .context("Failed to probe audio format")?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != symphonia::core::codecs::CODEC_TYPE_NULL)
        .context("No audio tracks found")?;

    let track_id = track.id;
    let mut channels = track.codec_params.channels.map_or(1, |c| c.count());
    let sample_rate = track.codec_params.sample_rate.context("Unknown sample rate")?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .context("Failed to create audio decoder")?;

    let mut mono: Vec<f32> = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(symphonia::core::errors::Error::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => return Err(e.into()),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(d) => d,
            Err(symphonia::core::errors::Error::DecodeError(err)) => {
                log::warn!("Skipping undecodable packet: {}", err);
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        let spec = *decoded.spec();
        channels = spec.channels.count().max(1);
        let num_frames = decoded.frames();

        let mut sample_buf = SampleBuffer::<f32>::new(num_frames as u64, spec);
        sample_buf.copy_interleaved_ref(decoded);

        reduce_to_mono(sample_buf.samples(), channels, channel, &mut mono);
    }

    log::info!(
        "Decoded audio: {} samples, {}Hz, {} channel(s), {:.1}s",
        mono.len(),
        sample_rate,
        channels,
        mono.len() as f32 / sample_rate as f32
    );

    Ok(AudioData {
        samples: mono,
        sample_rate,
        channels,
    })
}

/// Append the mono rendition of `interleaved` to `out`.
pub fn reduce_to_mono(interleaved: &[f32], channels: usize, select: ChannelSelect, out: &mut Vec<f32>) {
    if channels <= 1 {
        out.extend_from_slice(interleaved);
        return;
    }
    match select {
        ChannelSelect::First => {
            out.extend(interleaved.chunks(channels).map(|frame| frame[0]));
        }
        ChannelSelect::Mix => {
            out.extend(
                interleaved
                    .chunks(channels)
                    .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mono_passthrough() {
        let mut out = Vec::new();
        reduce_to_mono(&[0.1, 0.2, 0.3], 1, ChannelSelect::Mix, &mut out);
        assert_eq!(out, vec![0.1, 0.2, 0.3]);
    }

    #[test]
    fn test_first_channel() {
        let mut out = Vec::new();
        reduce_to_mono(&[1.0, -1.0, 0.5, 0.25], 2, ChannelSelect::First, &mut out);
        assert_eq!(out, vec![1.0, 0.5]);
    }

    #[test]
    fn test_mix_channels() {
        let mut out = vec![9.0];
        reduce_to_mono(&[1.0, -1.0, 0.5, 0.25], 2, ChannelSelect::Mix, &mut out);
        assert_eq!(out, vec![9.0, 0.0, 0.375]);
    }

    #[test]
    fn test_missing_file() {
        let err = decode_audio(Path::new("/nonexistent/track.wav"), ChannelSelect::First)
            .unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to open audio file"));
    }

    #[test]
    fn test_duration() {
        let audio = AudioData {
            samples: vec![0.0; 22050],
            sample_rate: 44100,
            channels: 2,
        };
        assert_eq!(audio.duration_secs(), 0.5);
    }
}
