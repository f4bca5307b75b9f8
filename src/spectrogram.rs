//! STFT framing and magnitude aggregation.
//!
//! [`compute`] slices a mono signal into (possibly overlapping) frames of
//! `fft_size` samples spaced `hop_size` apart, multiplies each frame by a
//! window generated once per call, runs the forward FFT, and keeps the
//! magnitudes of the non-negative frequency bins. The result is a row-major
//! `num_frames x num_bins` matrix owned by the caller; no state survives
//! the call.

use std::collections::TryReserveError;

use log::debug;
use thiserror::Error;

use crate::fft::{FftError, FftImpl, ScalarFftImpl};
use crate::num::Complex64;
use crate::window::WindowKind;

/// Mono PCM signal with samples normalized to `[-1.0, 1.0]`.
///
/// Normalization from integer PCM is the loader's job; [`Signal::from_pcm_i16`]
/// is the adapter for the common 16-bit case.
#[derive(Clone, Debug, PartialEq)]
pub struct Signal {
    pub sample_rate: u32,
    pub channels: u16,
    pub samples: Vec<f64>,
}

impl Signal {
    pub fn new(sample_rate: u32, channels: u16, samples: Vec<f64>) -> Self {
        Self {
            sample_rate,
            channels,
            samples,
        }
    }

    /// Adapt 16-bit integer PCM by scaling with `1/32768`.
    pub fn from_pcm_i16(sample_rate: u32, channels: u16, pcm: &[i16]) -> Self {
        let samples = pcm.iter().map(|&s| f64::from(s) / 32768.0).collect();
        Self {
            sample_rate,
            channels,
            samples,
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// STFT parameters. Defaults follow the common analysis setup of a
/// 1024-point Hann window advanced by 256 samples.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpectrogramConfig {
    /// Frame length; must be a power of two and at least 2.
    pub fft_size: usize,
    /// Samples advanced between consecutive frames; must be at least 1.
    pub hop_size: usize,
    pub window: WindowKind,
}

impl Default for SpectrogramConfig {
    fn default() -> Self {
        Self {
            fft_size: 1024,
            hop_size: 256,
            window: WindowKind::Hann,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SpectrogramError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(&'static str),
    #[error("unsupported channel layout: expected mono, got {0} channel(s)")]
    UnsupportedChannelLayout(u16),
    #[error("allocation failed for spectrogram buffers")]
    OutOfMemory,
}

impl From<TryReserveError> for SpectrogramError {
    fn from(_: TryReserveError) -> Self {
        SpectrogramError::OutOfMemory
    }
}

// A kernel rejection at this boundary means the engine let a bad length
// through its own validation; surface it as a configuration error rather
// than leaking kernel internals.
impl From<FftError> for SpectrogramError {
    fn from(_: FftError) -> Self {
        SpectrogramError::InvalidConfiguration("frame buffer rejected by the fft kernel")
    }
}

/// Row-major matrix of non-negative magnitudes, one row per frame, one
/// column per retained frequency bin.
#[derive(Clone, Debug, PartialEq)]
pub struct Spectrogram {
    num_frames: usize,
    num_bins: usize,
    data: Vec<f64>,
}

impl Spectrogram {
    pub fn num_frames(&self) -> usize {
        self.num_frames
    }

    /// `fft_size / 2 + 1`: only non-negative frequencies are retained, by
    /// conjugate symmetry of real input.
    pub fn num_bins(&self) -> usize {
        self.num_bins
    }

    /// Flat row-major data, length `num_frames * num_bins`.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Magnitudes of frame `frame`.
    ///
    /// # Panics
    /// Panics if `frame >= num_frames`.
    pub fn row(&self, frame: usize) -> &[f64] {
        &self.data[frame * self.num_bins..(frame + 1) * self.num_bins]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.data.chunks_exact(self.num_bins)
    }

    /// Largest magnitude in the matrix, useful for normalisation.
    /// Returns `0.0` for an empty spectrogram.
    pub fn max_magnitude(&self) -> f64 {
        self.data.iter().fold(0.0f64, |acc, &m| acc.max(m))
    }
}

/// Minimal positive maximum magnitude; below this the scale collapses to
/// zero instead of producing invalid logarithms.
const DB_EPSILON: f64 = 1e-10;

/// Multiplier converting amplitude ratios to decibels.
const DB_MULTIPLIER: f64 = 20.0;

/// Map a magnitude onto `0.0..=1.0` relative to `max_mag`, compressing
/// `dynamic_range` decibels below the maximum into the unit interval.
pub fn db_scale(mag: f64, max_mag: f64, dynamic_range: f64) -> f64 {
    if max_mag <= DB_EPSILON || mag <= 0.0 {
        return 0.0;
    }
    ((DB_MULTIPLIER * (mag / max_mag).log10() + dynamic_range) / dynamic_range).clamp(0.0, 1.0)
}

/// Validate inputs and derive the `(num_frames, num_bins)` geometry.
///
/// A signal shorter than one frame yields zero frames rather than an error;
/// the configuration itself is still valid.
fn geometry(
    signal: &Signal,
    config: &SpectrogramConfig,
) -> Result<(usize, usize), SpectrogramError> {
    if signal.channels != 1 {
        return Err(SpectrogramError::UnsupportedChannelLayout(signal.channels));
    }
    if config.fft_size < 2 || !config.fft_size.is_power_of_two() {
        return Err(SpectrogramError::InvalidConfiguration(
            "fft_size must be a power of two and at least 2",
        ));
    }
    if config.hop_size == 0 {
        return Err(SpectrogramError::InvalidConfiguration(
            "hop_size must be at least 1",
        ));
    }
    let num_samples = signal.samples.len();
    let num_frames = if num_samples >= config.fft_size {
        1 + (num_samples - config.fft_size) / config.hop_size
    } else {
        0
    };
    let num_bins = config.fft_size / 2 + 1;
    if num_frames.checked_mul(num_bins).is_none() {
        return Err(SpectrogramError::InvalidConfiguration(
            "spectrogram dimensions overflow",
        ));
    }
    Ok((num_frames, num_bins))
}

/// Copy the windowed frame starting at `offset` into `out`, zero-padding
/// past the end of the signal. Imaginary parts are zero.
fn fill_frame(samples: &[f64], window: &[f64], offset: usize, out: &mut [Complex64]) {
    for (i, slot) in out.iter_mut().enumerate() {
        let idx = offset + i;
        let x = if idx < samples.len() {
            samples[idx] * window[i]
        } else {
            0.0
        };
        *slot = Complex64::new(x, 0.0);
    }
}

fn alloc_rows(len: usize) -> Result<Vec<f64>, SpectrogramError> {
    let mut data: Vec<f64> = Vec::new();
    data.try_reserve_exact(len)?;
    data.resize(len, 0.0);
    Ok(data)
}

/// Allocate the window buffer fallibly, then fill in the coefficients, so a
/// failed allocation surfaces as `OutOfMemory` like every other buffer here.
fn alloc_window(config: &SpectrogramConfig) -> Result<Vec<f64>, SpectrogramError> {
    let mut window = alloc_rows(config.fft_size)?;
    config.window.generate_into(&mut window);
    Ok(window)
}

/// Compute the magnitude spectrogram of `signal`.
///
/// Deterministic in its inputs; every buffer (matrix, window, frame) is
/// allocated fallibly, so allocation failure surfaces as
/// [`SpectrogramError::OutOfMemory`] with no partial result.
pub fn compute(
    signal: &Signal,
    config: &SpectrogramConfig,
) -> Result<Spectrogram, SpectrogramError> {
    let (num_frames, num_bins) = geometry(signal, config)?;
    debug!(
        "spectrogram geometry: frames={} bins={} fft_size={} hop_size={}",
        num_frames, num_bins, config.fft_size, config.hop_size
    );
    let window = alloc_window(config)?;
    let mut data = alloc_rows(num_frames * num_bins)?;

    let fft = ScalarFftImpl::<f64>::default();
    let mut frame_buf: Vec<Complex64> = Vec::new();
    frame_buf.try_reserve_exact(config.fft_size)?;
    frame_buf.resize(config.fft_size, Complex64::zero());

    for (frame_idx, row) in data.chunks_exact_mut(num_bins).enumerate() {
        let offset = frame_idx * config.hop_size;
        fill_frame(&signal.samples, &window, offset, &mut frame_buf);
        fft.fft(&mut frame_buf)?;
        for (out, c) in row.iter_mut().zip(frame_buf.iter()) {
            *out = c.magnitude();
        }
    }

    Ok(Spectrogram {
        num_frames,
        num_bins,
        data,
    })
}

/// Compute the spectrogram with frames dispatched across the rayon pool.
///
/// Each frame reads its own slice of the signal and writes a disjoint row,
/// with one FFT instance per frame, so no synchronization is needed beyond
/// the implicit join. Produces the same matrix as [`compute`].
#[cfg(feature = "parallel")]
pub fn compute_parallel(
    signal: &Signal,
    config: &SpectrogramConfig,
) -> Result<Spectrogram, SpectrogramError> {
    use rayon::prelude::*;

    let (num_frames, num_bins) = geometry(signal, config)?;
    debug!(
        "parallel spectrogram geometry: frames={} bins={} fft_size={} hop_size={}",
        num_frames, num_bins, config.fft_size, config.hop_size
    );
    let window = alloc_window(config)?;
    let mut data = alloc_rows(num_frames * num_bins)?;

    data.par_chunks_exact_mut(num_bins)
        .enumerate()
        .try_for_each(|(frame_idx, row)| -> Result<(), SpectrogramError> {
            let fft = ScalarFftImpl::<f64>::default();
            let mut frame_buf: Vec<Complex64> = Vec::new();
            frame_buf.try_reserve_exact(config.fft_size)?;
            frame_buf.resize(config.fft_size, Complex64::zero());
            let offset = frame_idx * config.hop_size;
            fill_frame(&signal.samples, &window, offset, &mut frame_buf);
            fft.fft(&mut frame_buf)?;
            for (out, c) in row.iter_mut().zip(frame_buf.iter()) {
                *out = c.magnitude();
            }
            Ok(())
        })?;

    Ok(Spectrogram {
        num_frames,
        num_bins,
        data,
    })
}
