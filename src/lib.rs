//! # sonospec
//!
//! Windowed Short-Time Fourier Transform (STFT) magnitude spectrograms for
//! mono signals, built on a self-contained radix-2 FFT kernel.
//!
//! - [`num`] — complex arithmetic over `f32`/`f64`
//! - [`fft`] — in-place forward/inverse transforms with cached twiddle tables
//! - [`window`] — Rectangular, Hamming and Hann tapers
//! - [`spectrogram`] — framing, windowing and magnitude aggregation
//! - [`export`] — CSV serialization of the resulting matrix
//!
//! FFT sizes must be powers of two; anything else is rejected with an
//! explicit error before any transform work happens. Enable the `parallel`
//! feature to dispatch frames across a rayon pool, and the `cli` feature for
//! the `wav2spec` WAV-to-CSV binary.
//!
//! ```
//! use sonospec::{compute, Signal, SpectrogramConfig, WindowKind};
//!
//! let samples: Vec<f64> = (0..4096)
//!     .map(|t| (2.0 * std::f64::consts::PI * 440.0 * t as f64 / 8000.0).sin())
//!     .collect();
//! let signal = Signal::new(8000, 1, samples);
//! let config = SpectrogramConfig {
//!     fft_size: 1024,
//!     hop_size: 256,
//!     window: WindowKind::Hann,
//! };
//! let spec = compute(&signal, &config).unwrap();
//! assert_eq!(spec.num_frames(), 13);
//! assert_eq!(spec.num_bins(), 513);
//! ```

pub mod export;
pub mod fft;
pub mod num;
pub mod spectrogram;
pub mod window;

pub use crate::fft::{FftError, FftImpl, FftPlanner, ScalarFftImpl};
pub use crate::num::{Complex, Complex32, Complex64, Float};
#[cfg(feature = "parallel")]
pub use crate::spectrogram::compute_parallel;
pub use crate::spectrogram::{
    compute, db_scale, Signal, Spectrogram, SpectrogramConfig, SpectrogramError,
};
pub use crate::window::WindowKind;
