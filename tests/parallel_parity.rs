#![cfg(feature = "parallel")]

use std::f64::consts::PI;

use sonospec::spectrogram::{compute, compute_parallel, Signal, SpectrogramConfig};
use sonospec::window::WindowKind;

#[test]
fn parallel_matches_serial_bit_for_bit() {
    let samples: Vec<f64> = (0..16384)
        .map(|t| {
            let t = t as f64 / 8000.0;
            (2.0 * PI * 700.0 * t).sin() + 0.5 * (2.0 * PI * 1900.0 * t).sin()
        })
        .collect();
    let signal = Signal::new(8000, 1, samples);
    let config = SpectrogramConfig {
        fft_size: 512,
        hop_size: 128,
        window: WindowKind::Hamming,
    };
    let serial = compute(&signal, &config).unwrap();
    let parallel = compute_parallel(&signal, &config).unwrap();
    assert_eq!(serial, parallel);
}

#[test]
fn parallel_rejects_the_same_configurations() {
    let signal = Signal::new(8000, 2, vec![0.0; 4096]);
    assert!(compute_parallel(&signal, &SpectrogramConfig::default()).is_err());
}
