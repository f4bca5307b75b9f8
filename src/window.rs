//! Window coefficient generation for STFT analysis frames.
//!
//! All generators are pure functions of `(kind, len)`; a window is generated
//! once per spectrogram computation and reused across every frame. The
//! cosine windows are symmetric (divisor `len - 1`), so the first and last
//! coefficients land on the taper endpoints.

use core::f64::consts::PI;

/// Supported window tapers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WindowKind {
    Rectangular,
    Hamming,
    Hann,
}

impl WindowKind {
    /// Parse a window name used on the command line. Unknown names fall back
    /// to the rectangular window.
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "hamming" => WindowKind::Hamming,
            "hann" => WindowKind::Hann,
            _ => WindowKind::Rectangular,
        }
    }

    /// Generate the coefficient sequence for this taper.
    ///
    /// # Panics
    /// Panics if `len < 2` for the cosine tapers; see [`hann`] and
    /// [`hamming`].
    pub fn generate(self, len: usize) -> Vec<f64> {
        match self {
            WindowKind::Rectangular => rectangular(len),
            WindowKind::Hamming => hamming(len),
            WindowKind::Hann => hann(len),
        }
    }

    /// Fill a caller-allocated buffer with the coefficient sequence, leaving
    /// allocation (and allocation-failure handling) to the caller.
    ///
    /// # Panics
    /// Panics if `out.len() < 2` for the cosine tapers.
    pub fn generate_into(self, out: &mut [f64]) {
        match self {
            WindowKind::Rectangular => out.fill(1.0),
            WindowKind::Hamming => fill_cosine(out, 0.54, 0.46),
            WindowKind::Hann => fill_cosine(out, 0.5, 0.5),
        }
    }
}

/// Generalized cosine taper `a0 - a1 * cos(2π n / (len - 1))`.
fn fill_cosine(out: &mut [f64], a0: f64, a1: f64) {
    assert!(out.len() >= 2, "cosine windows need at least two points");
    let denom = (out.len() - 1) as f64;
    for (n, w) in out.iter_mut().enumerate() {
        *w = a0 - a1 * (2.0 * PI * n as f64 / denom).cos();
    }
}

/// Generate a symmetric Hann window of length `len`:
/// `0.5 * (1 - cos(2π n / (len - 1)))`.
///
/// # Panics
/// Panics if `len < 2`; the `len - 1` divisor is undefined for a one-point
/// window.
pub fn hann(len: usize) -> Vec<f64> {
    assert!(len >= 2, "cosine windows need at least two points");
    let denom = (len - 1) as f64;
    (0..len)
        .map(|n| 0.5 * (1.0 - (2.0 * PI * n as f64 / denom).cos()))
        .collect()
}

/// Generate a symmetric Hamming window of length `len`:
/// `0.54 - 0.46 * cos(2π n / (len - 1))`.
///
/// # Panics
/// Panics if `len < 2`; the `len - 1` divisor is undefined for a one-point
/// window.
pub fn hamming(len: usize) -> Vec<f64> {
    assert!(len >= 2, "cosine windows need at least two points");
    let denom = (len - 1) as f64;
    (0..len)
        .map(|n| 0.54 - 0.46 * (2.0 * PI * n as f64 / denom).cos())
        .collect()
}

/// Generate a rectangular (all-ones) window of length `len`.
pub fn rectangular(len: usize) -> Vec<f64> {
    vec![1.0; len]
}
