//! Radix-2 Cooley–Tukey FFT kernel.
//!
//! The forward transform runs in place over a power-of-two complex buffer
//! using a bit-reversal permutation followed by butterfly passes; the inverse
//! transform is the conjugate trick (conjugate, forward, conjugate, scale by
//! `1/n`). An [`FftPlanner`] caches per-stage twiddle tables so repeated
//! transforms of the same size never recompute them.
//!
//! Non-power-of-two lengths are rejected up front with
//! [`FftError::NonPowerOfTwo`]; there is no silent fallback.

use core::cell::RefCell;
use std::sync::Arc;

use hashbrown::HashMap;
use thiserror::Error;

use crate::num::{Complex, Float};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FftError {
    #[error("input buffer is empty")]
    EmptyInput,
    #[error("buffer length {0} is not a power of two")]
    NonPowerOfTwo(usize),
    #[error("input and output buffer lengths differ")]
    MismatchedLengths,
}

/// Caches per-stage twiddle tables, keyed by butterfly size.
///
/// The table for size `len` holds `len/2` factors `exp(-2πi k / len)` for
/// `k = 0..len/2`, stored contiguously so the butterfly loop can index them
/// without striding through a full length-`n` table.
pub struct FftPlanner<T: Float> {
    cache: HashMap<usize, Arc<[Complex<T>]>>,
}

impl<T: Float> Default for FftPlanner<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Float> FftPlanner<T> {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
        }
    }

    /// Retrieve (building on first use) the twiddle table for stage size `n`.
    pub fn get_twiddles(&mut self, n: usize) -> Arc<[Complex<T>]> {
        let entry = self.cache.entry(n).or_insert_with(|| {
            let half = n / 2;
            let angle = -(T::from_f32(2.0) * T::pi() / T::from_f32(n as f32));
            let step = Complex::expi(angle);

            // Incremental rotation: w *= exp(-2πi/n) each iteration.
            let mut table: Vec<Complex<T>> = Vec::with_capacity(half);
            let mut w = Complex::new(T::one(), T::zero());
            for _ in 0..half {
                table.push(w);
                w = w.mul(step);
            }
            Arc::from(table)
        });
        Arc::clone(entry)
    }
}

/// In-place forward and inverse transforms over complex buffers.
pub trait FftImpl<T: Float> {
    /// Forward DFT in place. The buffer length must be a power of two.
    fn fft(&self, input: &mut [Complex<T>]) -> Result<(), FftError>;
    /// Inverse DFT in place, normalized by `1/n` so that
    /// `ifft(fft(x)) ≈ x` to floating-point precision.
    fn ifft(&self, input: &mut [Complex<T>]) -> Result<(), FftError>;
    fn fft_out_of_place(
        &self,
        input: &[Complex<T>],
        output: &mut [Complex<T>],
    ) -> Result<(), FftError> {
        if input.len() != output.len() {
            return Err(FftError::MismatchedLengths);
        }
        output.copy_from_slice(input);
        self.fft(output)
    }
    fn ifft_out_of_place(
        &self,
        input: &[Complex<T>],
        output: &mut [Complex<T>],
    ) -> Result<(), FftError> {
        if input.len() != output.len() {
            return Err(FftError::MismatchedLengths);
        }
        output.copy_from_slice(input);
        self.ifft(output)
    }
}

/// Scalar radix-2 implementation backed by a twiddle-table planner.
///
/// The planner sits behind a `RefCell` so `fft`/`ifft` can take `&self`;
/// transforms are otherwise pure and keep no state between calls.
pub struct ScalarFftImpl<T: Float> {
    planner: RefCell<FftPlanner<T>>,
}

impl<T: Float> Default for ScalarFftImpl<T> {
    fn default() -> Self {
        Self {
            planner: RefCell::new(FftPlanner::new()),
        }
    }
}

impl<T: Float> ScalarFftImpl<T> {
    pub fn with_planner(planner: FftPlanner<T>) -> Self {
        Self {
            planner: RefCell::new(planner),
        }
    }
}

/// Reorder `data` so that element `i` lands at the bit-reversed index of `i`.
fn bit_reverse_permute<T: Float>(data: &mut [Complex<T>]) {
    let n = data.len();
    let mut j = 0usize;
    for i in 1..n {
        let mut bit = n >> 1;
        while j & bit != 0 {
            j ^= bit;
            bit >>= 1;
        }
        j |= bit;
        if i < j {
            data.swap(i, j);
        }
    }
}

impl<T: Float> FftImpl<T> for ScalarFftImpl<T> {
    fn fft(&self, input: &mut [Complex<T>]) -> Result<(), FftError> {
        let n = input.len();
        if n == 0 {
            return Err(FftError::EmptyInput);
        }
        if n == 1 {
            return Ok(());
        }
        if !n.is_power_of_two() {
            return Err(FftError::NonPowerOfTwo(n));
        }

        bit_reverse_permute(input);

        // Butterfly passes over sub-transforms of doubling size. For each
        // pair (u, v) at distance len/2, the outputs are u + w*v and u - w*v
        // with w = exp(-2πi k / len).
        let mut len = 2;
        while len <= n {
            let twiddles = self.planner.borrow_mut().get_twiddles(len);
            let half = len / 2;
            for base in (0..n).step_by(len) {
                for k in 0..half {
                    let u = input[base + k];
                    let v = input[base + k + half].mul(twiddles[k]);
                    input[base + k] = u.add(v);
                    input[base + k + half] = u.sub(v);
                }
            }
            len <<= 1;
        }
        Ok(())
    }

    fn ifft(&self, input: &mut [Complex<T>]) -> Result<(), FftError> {
        let n = input.len();
        if n == 0 {
            return Err(FftError::EmptyInput);
        }
        if n == 1 {
            return Ok(());
        }
        if !n.is_power_of_two() {
            return Err(FftError::NonPowerOfTwo(n));
        }
        for c in input.iter_mut() {
            *c = c.conj();
        }
        self.fft(input)?;
        // n is a power of two here, so the conversion is exact.
        let scale = T::one() / T::from_usize(n);
        for c in input.iter_mut() {
            c.im = -c.im;
            c.re = c.re * scale;
            c.im = c.im * scale;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::num::Complex64;

    #[test]
    fn twiddle_table_has_half_length_and_starts_at_one() {
        let mut planner = FftPlanner::<f64>::new();
        let table = planner.get_twiddles(8);
        assert_eq!(table.len(), 4);
        assert!((table[0].re - 1.0).abs() < 1e-12);
        assert!(table[0].im.abs() < 1e-12);
        // Quarter turn: exp(-2πi * 2/8) = -i.
        assert!(table[2].re.abs() < 1e-12);
        assert!((table[2].im + 1.0).abs() < 1e-12);
    }

    #[test]
    fn twiddle_table_is_cached() {
        let mut planner = FftPlanner::<f64>::new();
        let first = planner.get_twiddles(16);
        let second = planner.get_twiddles(16);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn bit_reversal_is_an_involution() {
        let mut data: Vec<Complex64> = (0..16).map(|i| Complex64::new(i as f64, 0.0)).collect();
        let original = data.clone();
        bit_reverse_permute(&mut data);
        bit_reverse_permute(&mut data);
        assert_eq!(data, original);
    }

    #[test]
    fn single_element_buffer_is_its_own_transform() {
        let fft = ScalarFftImpl::<f64>::default();
        let mut buf = [Complex64::new(3.0, -1.0)];
        fft.fft(&mut buf).unwrap();
        assert_eq!(buf[0], Complex64::new(3.0, -1.0));
        fft.ifft(&mut buf).unwrap();
        assert_eq!(buf[0], Complex64::new(3.0, -1.0));
    }
}
