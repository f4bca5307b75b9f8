//! WAV-to-CSV spectrogram pipeline: load a mono 16-bit PCM WAV file, compute
//! its magnitude spectrogram, and write one CSV line per frame.
//!
//! Usage: `wav2spec input.wav [output.csv] [window]`

use std::env;
use std::error::Error;
use std::process::ExitCode;

use log::info;

use sonospec::export;
use sonospec::spectrogram::{compute, Signal, SpectrogramConfig};
use sonospec::window::WindowKind;

fn main() -> ExitCode {
    env_logger::init();

    let mut args = env::args().skip(1);
    let Some(input) = args.next() else {
        eprintln!("usage: wav2spec input.wav [output.csv] [window]");
        return ExitCode::FAILURE;
    };
    let output = args.next().unwrap_or_else(|| "spectrogram.csv".to_string());
    let window = args
        .next()
        .map(|name| WindowKind::parse(&name))
        .unwrap_or(WindowKind::Hann);

    match run(&input, &output, window) {
        Ok((frames, bins)) => {
            info!("spectrogram saved to {output}: frames={frames} bins={bins}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("wav2spec: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(input: &str, output: &str, window: WindowKind) -> Result<(usize, usize), Box<dyn Error>> {
    let mut reader = hound::WavReader::open(input)?;
    let wav_spec = reader.spec();
    let pcm: Vec<i16> = match (wav_spec.sample_format, wav_spec.bits_per_sample) {
        (hound::SampleFormat::Int, 16) => reader.samples::<i16>().collect::<Result<_, _>>()?,
        _ => return Err("only 16-bit integer PCM input is supported".into()),
    };

    let signal = Signal::from_pcm_i16(wav_spec.sample_rate, wav_spec.channels, &pcm);
    let config = SpectrogramConfig {
        window,
        ..Default::default()
    };
    // Channel-layout and configuration validation happens inside compute.
    let spectrogram = compute(&signal, &config)?;
    export::save_csv(&spectrogram, output)?;
    Ok((spectrogram.num_frames(), spectrogram.num_bins()))
}
