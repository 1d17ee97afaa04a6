//! Configuration for MFCC feature extraction.

/// Parameters for the MFCC pipeline.
///
/// Defaults match the classifier's training-time framing: 16 kHz input,
/// 25 ms windows at a 10 ms hop, a 40-band mel filterbank, and the first
/// 13 cepstral coefficients per frame.
#[derive(Debug, Clone)]
pub struct MfccConfig {
    /// Sample rate the extractor expects (input is resampled to this)
    pub sample_rate: u32,

    /// FFT size
    pub n_fft: usize,

    /// Hop length between frames (in samples)
    pub hop_length: usize,

    /// Window length (in samples)
    pub win_length: usize,

    /// Number of mel filterbank bands
    pub n_mels: usize,

    /// Number of cepstral coefficients kept per frame
    pub n_mfcc: usize,

    /// Minimum frequency for the mel filterbank (Hz)
    pub fmin: f32,

    /// Maximum frequency for the mel filterbank (Hz)
    pub fmax: f32,

    /// Small value added before log for numerical stability
    pub log_offset: f32,
}

impl Default for MfccConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16000,
            n_fft: 512,
            hop_length: 160, // 10ms at 16kHz
            win_length: 400, // 25ms at 16kHz
            n_mels: 40,
            n_mfcc: 13,
            fmin: 20.0,
            fmax: 7600.0,
            log_offset: 1e-6,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MfccConfig::default();
        assert_eq!(config.sample_rate, 16000);
        assert_eq!(config.n_mfcc, 13);
        assert_eq!(config.n_mels, 40);
        assert_eq!(config.hop_length, 160);
        assert_eq!(config.win_length, 400);
        assert!(config.n_mfcc <= config.n_mels);
    }
}
