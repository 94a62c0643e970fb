use std::f64::consts::PI;
use std::sync::Arc;

use clap::ValueEnum;
use rustfft::{num_complex::Complex, Fft, FftPlanner};
use serde::{Deserialize, Serialize};

pub const FRAME_SIZE: usize = 1024;
pub const HOP_SIZE: usize = 512;

/// Which DFT implementation produces the magnitude spectra.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Transform {
    /// Planned fast transform (O(W log W)).
    #[default]
    Fft,
    /// Textbook O(W²) summation.
    Direct,
}

/// Number of complete frames `frames()` yields for a signal of `len` samples.
pub fn frame_count(len: usize, frame_size: usize, hop_size: usize) -> usize {
    if frame_size == 0 || hop_size == 0 || len < frame_size {
        return 0;
    }
    (len - frame_size) / hop_size + 1
}

/// Lazy sequence of overlapping frames borrowed from a signal.
#[derive(Clone, Debug)]
pub struct Frames<'a> {
    signal: &'a [f32],
    frame_size: usize,
    hop_size: usize,
    offset: usize,
}

/// Split `signal` into frames of `frame_size` samples starting every
/// `hop_size` samples. A trailing partial frame is dropped.
pub fn frames(signal: &[f32], frame_size: usize, hop_size: usize) -> Frames<'_> {
    debug_assert!(frame_size > 0 && hop_size > 0);
    Frames {
        signal,
        frame_size,
        hop_size,
        offset: 0,
    }
}

impl<'a> Iterator for Frames<'a> {
    type Item = &'a [f32];

    fn next(&mut self) -> Option<Self::Item> {
        if self.frame_size == 0 || self.hop_size == 0 {
            return None;
        }
        let end = self.offset.checked_add(self.frame_size)?;
        if end > self.signal.len() {
            return None;
        }
        let frame = &self.signal[self.offset..end];
        self.offset += self.hop_size;
        Some(frame)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self
            .signal
            .len()
            .checked_sub(self.offset)
            .map_or(0, |len| frame_count(len, self.frame_size, self.hop_size));
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Frames<'_> {}

/// Computes un-windowed magnitude spectra with one bin per input sample.
pub struct SpectrumAnalyzer {
    frame_size: usize,
    transform: Transform,
    fft: Option<Arc<dyn Fft<f64>>>,
    buffer: Vec<Complex<f64>>,
}

impl SpectrumAnalyzer {
    pub fn new(frame_size: usize, transform: Transform) -> Self {
        let fft = match transform {
            Transform::Fft => {
                let mut planner = FftPlanner::<f64>::new();
                Some(planner.plan_fft_forward(frame_size))
            }
            Transform::Direct => None,
        };
        Self {
            frame_size,
            transform,
            fft,
            buffer: Vec::with_capacity(frame_size),
        }
    }

    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    /// Magnitude `|X[k]|` for every bin k in `[0, frame.len())`.
    pub fn magnitudes(&mut self, frame: &[f32]) -> Vec<f64> {
        debug_assert_eq!(frame.len(), self.frame_size);
        match &self.fft {
            Some(fft) => {
                self.buffer.clear();
                self.buffer
                    .extend(frame.iter().map(|&s| Complex::new(s as f64, 0.0)));
                fft.process(&mut self.buffer);
                self.buffer.iter().map(|c| c.norm()).collect()
            }
            None => dft_magnitudes(frame),
        }
    }
}

/// Direct DFT magnitudes:
/// `re(k) = Σ x[n]·cos(−2πkn/N)`, `im(k) = Σ x[n]·sin(−2πkn/N)`.
pub fn dft_magnitudes(frame: &[f32]) -> Vec<f64> {
    let n_len = frame.len();
    (0..n_len)
        .map(|k| {
            let mut re = 0.0f64;
            let mut im = 0.0f64;
            for (n, &x) in frame.iter().enumerate() {
                let angle = -2.0 * PI * k as f64 * n as f64 / n_len as f64;
                re += x as f64 * angle.cos();
                im += x as f64 * angle.sin();
            }
            (re * re + im * im).sqrt()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_tone(len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| {
                let t = i as f32;
                0.6 * (t * 0.05).sin() + 0.3 * (t * 0.41).cos() + if i % 97 == 0 { 0.5 } else { 0.0 }
            })
            .collect()
    }

    #[test]
    fn test_frame_count_boundaries() {
        assert_eq!(frame_count(0, FRAME_SIZE, HOP_SIZE), 0);
        assert_eq!(frame_count(1023, FRAME_SIZE, HOP_SIZE), 0);
        assert_eq!(frame_count(1024, FRAME_SIZE, HOP_SIZE), 1);
        assert_eq!(frame_count(1535, FRAME_SIZE, HOP_SIZE), 1);
        assert_eq!(frame_count(1536, FRAME_SIZE, HOP_SIZE), 2);
        assert_eq!(frame_count(4096, FRAME_SIZE, HOP_SIZE), 7);
    }

    #[test]
    fn test_frames_offsets_and_length() {
        let signal: Vec<f32> = (0..2100).map(|i| i as f32).collect();
        let all: Vec<&[f32]> = frames(&signal, FRAME_SIZE, HOP_SIZE).collect();
        assert_eq!(all.len(), frame_count(signal.len(), FRAME_SIZE, HOP_SIZE));
        assert_eq!(all.len(), 3);
        for (i, frame) in all.iter().enumerate() {
            assert_eq!(frame.len(), FRAME_SIZE);
            assert_eq!(frame[0], (i * HOP_SIZE) as f32);
        }
    }

    #[test]
    fn test_short_signal_yields_no_frames() {
        let signal = vec![0.5f32; FRAME_SIZE - 1];
        assert_eq!(frames(&signal, FRAME_SIZE, HOP_SIZE).count(), 0);
    }

    #[test]
    fn test_frames_exact_size() {
        let signal = vec![0.0f32; 5000];
        let mut iter = frames(&signal, FRAME_SIZE, HOP_SIZE);
        assert_eq!(iter.len(), 8);
        iter.next();
        assert_eq!(iter.len(), 7);
    }

    #[test]
    fn test_zero_frame_has_zero_spectrum() {
        let frame = vec![0.0f32; FRAME_SIZE];
        for transform in [Transform::Fft, Transform::Direct] {
            let mut analyzer = SpectrumAnalyzer::new(FRAME_SIZE, transform);
            let mags = analyzer.magnitudes(&frame);
            assert_eq!(mags.len(), FRAME_SIZE);
            assert!(mags.iter().all(|&m| m == 0.0));
        }
    }

    #[test]
    fn test_impulse_has_flat_spectrum() {
        let mut frame = vec![0.0f32; 64];
        frame[5] = 2.0;
        let mut analyzer = SpectrumAnalyzer::new(64, Transform::Fft);
        for m in analyzer.magnitudes(&frame) {
            assert!((m - 2.0).abs() < 1e-12, "magnitude {} should be 2.0", m);
        }
    }

    #[test]
    fn test_fft_matches_direct_dft() {
        let frame = test_tone(FRAME_SIZE);
        let mut analyzer = SpectrumAnalyzer::new(FRAME_SIZE, Transform::Fft);
        let fast = analyzer.magnitudes(&frame);
        let direct = dft_magnitudes(&frame);
        assert_eq!(fast.len(), direct.len());
        for (k, (a, b)) in fast.iter().zip(direct.iter()).enumerate() {
            assert!(
                (a - b).abs() < 1e-6 * (1.0 + b.abs()),
                "bin {}: fft {} vs direct {}",
                k,
                a,
                b
            );
        }
    }

    #[test]
    fn test_direct_transform_via_analyzer() {
        let frame = test_tone(128);
        let mut analyzer = SpectrumAnalyzer::new(128, Transform::Direct);
        assert_eq!(analyzer.transform(), Transform::Direct);
        assert_eq!(analyzer.magnitudes(&frame), dft_magnitudes(&frame));
    }

    #[test]
    fn test_real_input_spectrum_is_symmetric() {
        let frame = test_tone(256);
        let mags = dft_magnitudes(&frame);
        for k in 1..128 {
            assert!((mags[k] - mags[256 - k]).abs() < 1e-9);
        }
    }
}
