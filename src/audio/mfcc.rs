//! MFCC feature extraction.
//!
//! Reduces a mono 16 kHz waveform to Mel-frequency cepstral coefficients:
//! Hann-windowed FFT frames, a triangular mel filterbank on the power
//! spectrum, log compression, then an orthonormal DCT-II keeping the first
//! 13 coefficients. The per-file feature is the mean of each coefficient
//! across all frames, giving a fixed 13-dimensional vector.

use realfft::{RealFftPlanner, RealToComplex};
use std::f32::consts::PI;
use std::sync::Arc;

use super::config::MfccConfig;
use super::AudioEmotionError;

/// MFCC extractor with pre-computed window, filterbank, and DCT basis.
pub struct MfccExtractor {
    config: MfccConfig,
    fft: Arc<dyn RealToComplex<f32>>,
    window: Vec<f32>,
    filterbank: Vec<Vec<f32>>,
    /// DCT-II basis, [n_mfcc][n_mels]
    dct_basis: Vec<Vec<f32>>,
    // Scratch buffers reused across frames
    fft_input: Vec<f32>,
    fft_output: Vec<realfft::num_complex::Complex<f32>>,
    power_spec: Vec<f32>,
    mel_energies: Vec<f32>,
}

impl MfccExtractor {
    pub fn new(config: MfccConfig) -> Result<Self, AudioEmotionError> {
        if config.n_mfcc > config.n_mels {
            return Err(AudioEmotionError::FeatureError(format!(
                "n_mfcc {} exceeds n_mels {}",
                config.n_mfcc, config.n_mels
            )));
        }

        let window: Vec<f32> = (0..config.win_length)
            .map(|i| 0.5 * (1.0 - (2.0 * PI * i as f32 / (config.win_length - 1) as f32).cos()))
            .collect();

        let filterbank = mel_filterbank(
            config.n_mels,
            config.n_fft / 2 + 1,
            config.sample_rate as f32,
            config.fmin,
            config.fmax,
        );

        let dct_basis = dct_ii_basis(config.n_mfcc, config.n_mels);

        let mut planner = RealFftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(config.n_fft);

        let fft_input = vec![0.0f32; config.n_fft];
        let fft_output = vec![realfft::num_complex::Complex::new(0.0, 0.0); config.n_fft / 2 + 1];
        let power_spec = vec![0.0f32; config.n_fft / 2 + 1];
        let mel_energies = vec![0.0f32; config.n_mels];

        Ok(Self {
            config,
            fft,
            window,
            filterbank,
            dct_basis,
            fft_input,
            fft_output,
            power_spec,
            mel_energies,
        })
    }

    /// Number of coefficients per frame (and per mean feature vector).
    pub fn feature_dim(&self) -> usize {
        self.config.n_mfcc
    }

    /// Compute per-frame MFCCs for a mono 16 kHz signal.
    ///
    /// Returns one row of `n_mfcc` coefficients per frame. Signals shorter
    /// than one window still produce a single (zero-padded) frame.
    pub fn compute(&mut self, samples: &[f32]) -> Result<Vec<Vec<f32>>, AudioEmotionError> {
        if samples.is_empty() {
            return Err(AudioEmotionError::EmptyAudio);
        }

        let n_frames = if samples.len() >= self.config.win_length {
            1 + (samples.len() - self.config.win_length) / self.config.hop_length
        } else {
            1
        };

        let mut frames = Vec::with_capacity(n_frames);
        for frame_idx in 0..n_frames {
            let start = frame_idx * self.config.hop_length;
            let end = (start + self.config.win_length).min(samples.len());
            frames.push(self.compute_frame(&samples[start..end])?);
        }

        Ok(frames)
    }

    /// Mean of each coefficient across all frames: the per-file feature.
    pub fn mean_features(&mut self, samples: &[f32]) -> Result<Vec<f32>, AudioEmotionError> {
        let frames = self.compute(samples)?;
        let n_frames = frames.len() as f32;

        let mut mean = vec![0.0f32; self.config.n_mfcc];
        for frame in &frames {
            for (acc, &c) in mean.iter_mut().zip(frame.iter()) {
                *acc += c;
            }
        }
        for acc in mean.iter_mut() {
            *acc /= n_frames;
        }

        Ok(mean)
    }

    fn compute_frame(&mut self, frame: &[f32]) -> Result<Vec<f32>, AudioEmotionError> {
        // Windowed, zero-padded FFT input
        self.fft_input.fill(0.0);
        for (i, &sample) in frame.iter().enumerate().take(self.window.len()) {
            self.fft_input[i] = sample * self.window[i];
        }

        self.fft
            .process(&mut self.fft_input, &mut self.fft_output)
            .map_err(|e| AudioEmotionError::FeatureError(format!("FFT failed: {}", e)))?;

        for (p, c) in self.power_spec.iter_mut().zip(self.fft_output.iter()) {
            *p = c.re * c.re + c.im * c.im;
        }

        // Log mel energies
        for (energy, filter) in self.mel_energies.iter_mut().zip(self.filterbank.iter()) {
            let e: f32 = filter
                .iter()
                .zip(self.power_spec.iter())
                .map(|(f, p)| f * p)
                .sum();
            *energy = (e + self.config.log_offset).ln();
        }

        // Cepstrum: project log energies onto the DCT basis
        let mfcc: Vec<f32> = self
            .dct_basis
            .iter()
            .map(|row| {
                row.iter()
                    .zip(self.mel_energies.iter())
                    .map(|(b, m)| b * m)
                    .sum()
            })
            .collect();

        Ok(mfcc)
    }
}

/// Convert frequency in Hz to the mel scale.
fn hz_to_mel(hz: f32) -> f32 {
    2595.0 * (1.0 + hz / 700.0).log10()
}

/// Convert a mel value back to Hz.
fn mel_to_hz(mel: f32) -> f32 {
    700.0 * (10.0_f32.powf(mel / 2595.0) - 1.0)
}

/// Build a triangular mel filterbank over FFT bins.
fn mel_filterbank(
    n_mels: usize,
    n_bins: usize,
    sample_rate: f32,
    fmin: f32,
    fmax: f32,
) -> Vec<Vec<f32>> {
    let mel_lo = hz_to_mel(fmin);
    let mel_hi = hz_to_mel(fmax);

    // n_mels + 2 band edges, equally spaced in mel, mapped to bin positions
    let edges: Vec<f32> = (0..n_mels + 2)
        .map(|i| {
            let mel = mel_lo + (mel_hi - mel_lo) * i as f32 / (n_mels + 1) as f32;
            (n_bins as f32 - 1.0) * mel_to_hz(mel) / (sample_rate / 2.0)
        })
        .collect();

    (0..n_mels)
        .map(|m| {
            let (left, center, right) = (edges[m], edges[m + 1], edges[m + 2]);
            (0..n_bins)
                .map(|bin| {
                    let b = bin as f32;
                    if b >= left && b < center {
                        (b - left) / (center - left)
                    } else if b >= center && b <= right {
                        (right - b) / (right - center)
                    } else {
                        0.0
                    }
                })
                .collect()
        })
        .collect()
}

/// Orthonormal DCT-II basis with `n_out` rows over `n_in` points.
fn dct_ii_basis(n_out: usize, n_in: usize) -> Vec<Vec<f32>> {
    (0..n_out)
        .map(|k| {
            let scale = if k == 0 {
                (1.0 / n_in as f32).sqrt()
            } else {
                (2.0 / n_in as f32).sqrt()
            };
            (0..n_in)
                .map(|n| scale * (PI * k as f32 * (2.0 * n as f32 + 1.0) / (2.0 * n_in as f32)).cos())
                .collect()
        })
        .collect()
}
