use std::f64::consts::PI;

use sonospec::spectrogram::{compute, Signal, SpectrogramConfig, SpectrogramError};
use sonospec::window::WindowKind;

fn sine_signal(sample_rate: u32, freq_hz: f64, len: usize) -> Signal {
    let samples = (0..len)
        .map(|t| (2.0 * PI * freq_hz * t as f64 / sample_rate as f64).sin())
        .collect();
    Signal::new(sample_rate, 1, samples)
}

#[test]
fn frame_count_formula_holds() {
    // 2000 samples, fft 1024, hop 256: 1 + (2000 - 1024) / 256 = 4 frames.
    let signal = Signal::new(8000, 1, vec![0.0; 2000]);
    let spec = compute(&signal, &SpectrogramConfig::default()).unwrap();
    assert_eq!(spec.num_frames(), 4);
    assert_eq!(spec.num_bins(), 513);
    assert_eq!(spec.data().len(), 4 * 513);
    for row in spec.rows() {
        assert_eq!(row.len(), 513);
    }
}

#[test]
fn pure_tone_peaks_at_expected_bin_in_every_frame() {
    let sample_rate = 8000;
    let freq_hz = 1000.0;
    let signal = sine_signal(sample_rate, freq_hz, 4096);
    let config = SpectrogramConfig {
        fft_size: 1024,
        hop_size: 256,
        window: WindowKind::Hann,
    };
    let spec = compute(&signal, &config).unwrap();
    assert_eq!(spec.num_frames(), 13);

    let expected = (freq_hz * config.fft_size as f64 / sample_rate as f64).round() as i64;
    for (frame, row) in spec.rows().enumerate() {
        let peak = row
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap())
            .map(|(bin, _)| bin as i64)
            .unwrap();
        assert!(
            (peak - expected).abs() <= 1,
            "frame {}: peak at bin {}, expected {} +/- 1",
            frame,
            peak,
            expected
        );
    }
}

#[test]
fn dc_signal_concentrates_in_bin_zero() {
    let signal = Signal::new(8000, 1, vec![1.0; 64]);
    let config = SpectrogramConfig {
        fft_size: 64,
        hop_size: 64,
        window: WindowKind::Rectangular,
    };
    let spec = compute(&signal, &config).unwrap();
    assert_eq!(spec.num_frames(), 1);
    let row = spec.row(0);
    assert!((row[0] - 64.0).abs() < 1e-9);
    for &mag in &row[1..] {
        assert!(mag < 1e-9);
    }
}

#[test]
fn magnitudes_are_non_negative() {
    let signal = sine_signal(8000, 440.0, 2048);
    let spec = compute(&signal, &SpectrogramConfig::default()).unwrap();
    assert!(spec.data().iter().all(|&m| m >= 0.0));
    assert_eq!(
        spec.max_magnitude(),
        spec.data().iter().fold(0.0f64, |a, &b| a.max(b))
    );
}

#[test]
fn non_power_of_two_fft_size_is_rejected() {
    let signal = Signal::new(8000, 1, vec![0.0; 2048]);
    let config = SpectrogramConfig {
        fft_size: 1000,
        ..Default::default()
    };
    assert!(matches!(
        compute(&signal, &config),
        Err(SpectrogramError::InvalidConfiguration(_))
    ));
}

#[test]
fn tiny_and_zero_parameters_are_rejected() {
    let signal = Signal::new(8000, 1, vec![0.0; 2048]);
    let one_point = SpectrogramConfig {
        fft_size: 1,
        ..Default::default()
    };
    assert!(matches!(
        compute(&signal, &one_point),
        Err(SpectrogramError::InvalidConfiguration(_))
    ));
    let zero_hop = SpectrogramConfig {
        hop_size: 0,
        ..Default::default()
    };
    assert!(matches!(
        compute(&signal, &zero_hop),
        Err(SpectrogramError::InvalidConfiguration(_))
    ));
}

#[test]
fn stereo_input_is_rejected() {
    let signal = Signal::new(8000, 2, vec![0.0; 4096]);
    assert_eq!(
        compute(&signal, &SpectrogramConfig::default()),
        Err(SpectrogramError::UnsupportedChannelLayout(2))
    );
}

#[test]
fn signal_shorter_than_one_frame_yields_zero_frames() {
    let signal = Signal::new(8000, 1, vec![0.5; 1023]);
    let spec = compute(&signal, &SpectrogramConfig::default()).unwrap();
    assert_eq!(spec.num_frames(), 0);
    assert_eq!(spec.num_bins(), 513);
    assert!(spec.data().is_empty());
    assert_eq!(spec.rows().count(), 0);
}

#[test]
fn empty_signal_yields_zero_frames() {
    let signal = Signal::new(8000, 1, Vec::new());
    let spec = compute(&signal, &SpectrogramConfig::default()).unwrap();
    assert_eq!(spec.num_frames(), 0);
    assert!(spec.data().is_empty());
}

#[test]
fn trailing_samples_beyond_the_last_full_frame_are_ignored() {
    // 1030 samples, fft 1024, hop 1024: only one frame fits; the trailing
    // six samples do not start a new one.
    let signal = Signal::new(8000, 1, vec![1.0; 1030]);
    let config = SpectrogramConfig {
        fft_size: 1024,
        hop_size: 1024,
        window: WindowKind::Rectangular,
    };
    let spec = compute(&signal, &config).unwrap();
    assert_eq!(spec.num_frames(), 1);
    // All 1024 in-frame samples are ones: DC magnitude equals the frame sum.
    assert!((spec.row(0)[0] - 1024.0).abs() < 1e-9);
}

#[test]
fn computation_is_deterministic() {
    let signal = sine_signal(44100, 2500.0, 8192);
    let config = SpectrogramConfig::default();
    let a = compute(&signal, &config).unwrap();
    let b = compute(&signal, &config).unwrap();
    assert_eq!(a, b);
}

#[test]
fn hann_window_attenuates_frame_edges() {
    // A constant signal under a Hann window leaks energy out of the DC bin
    // compared with the rectangular window, but total output stays finite
    // and the DC bin still dominates.
    let signal = Signal::new(8000, 1, vec![1.0; 1024]);
    let hann = SpectrogramConfig {
        fft_size: 1024,
        hop_size: 1024,
        window: WindowKind::Hann,
    };
    let rect = SpectrogramConfig {
        window: WindowKind::Rectangular,
        ..hann
    };
    let hann_spec = compute(&signal, &hann).unwrap();
    let rect_spec = compute(&signal, &rect).unwrap();
    assert!(hann_spec.row(0)[0] < rect_spec.row(0)[0]);
    assert!(hann_spec.row(0)[0] > 0.0);
}
