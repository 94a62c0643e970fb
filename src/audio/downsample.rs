use crate::error::TempoError;

pub const DOWNSAMPLE_FACTOR: usize = 4;

/// Keep every `factor`-th sample, starting with the first.
///
/// Plain decimation: no low-pass filter runs first, so content above the new
/// Nyquist frequency aliases into the output. Tempo estimates depend on this.
pub fn downsample(samples: &[f32], factor: usize) -> Result<Vec<f32>, TempoError> {
    if factor == 0 {
        return Err(TempoError::InvalidArgument(
            "downsample factor must be at least 1".to_string(),
        ));
    }
    Ok(samples.iter().step_by(factor).copied().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_length_is_ceiling() {
        let samples: Vec<f32> = (0..10).map(|i| i as f32).collect();
        assert_eq!(downsample(&samples, 4).unwrap().len(), 3);
        assert_eq!(downsample(&samples, 5).unwrap().len(), 2);
        assert_eq!(downsample(&samples, 3).unwrap().len(), 4);
        assert_eq!(downsample(&samples, 11).unwrap().len(), 1);
    }

    #[test]
    fn test_keeps_every_nth_sample() {
        let samples: Vec<f32> = (0..37).map(|i| (i as f32 * 0.37).sin()).collect();
        let out = downsample(&samples, 4).unwrap();
        for (i, &s) in out.iter().enumerate() {
            assert_eq!(s, samples[i * 4]);
        }
    }

    #[test]
    fn test_factor_one_is_identity() {
        let samples = vec![0.1f32, -0.2, 0.3];
        assert_eq!(downsample(&samples, 1).unwrap(), samples);
    }

    #[test]
    fn test_empty_input() {
        assert!(downsample(&[], 4).unwrap().is_empty());
    }

    #[test]
    fn test_zero_factor_rejected() {
        let err = downsample(&[0.0; 8], 0).unwrap_err();
        assert!(matches!(err, TempoError::InvalidArgument(_)));
    }
}
