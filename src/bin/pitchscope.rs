use anyhow::{Context, Result};
use clap::Parser;
use csv::Writer;
use log::{debug, info};
use pitchscope::{AnalysisConfig, Analyzer, PitchCurve};

/// Track the pitch of a voice recording stored in a WAV file
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// WAV file to analyze (multichannel input is mixed down to mono)
    #[arg(short, long)]
    in_file: String,

    /// Lower cutoff of the bandpass filter in Hz
    #[arg(long, default_value_t = 50.0)]
    lowcut: f64,

    /// Upper cutoff of the bandpass filter in Hz
    #[arg(long, default_value_t = 1000.0)]
    highcut: f64,

    /// Butterworth order of the bandpass filter
    #[arg(long, default_value_t = pitchscope::filter::DEFAULT_ORDER)]
    order: u32,

    /// Where to write the filtered, normalized signal as a WAV file
    #[arg(short, long)]
    filtered_out: Option<String>,

    /// Where to write the pitch curve as CSV (time,pitch)
    #[arg(short, long)]
    csv_out: Option<String>,
}

/// One row of the pitch curve CSV
#[derive(serde::Serialize)]
struct Row {
    time: f32,
    pitch: f32,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let (samples, sample_rate) = read_mono_wav(&args.in_file)?;
    info!(
        "{}: {} samples at {} Hz ({:.2} s)",
        args.in_file,
        samples.len(),
        sample_rate,
        samples.len() as f64 / sample_rate as f64
    );

    let config = AnalysisConfig {
        lowcut_hz: args.lowcut,
        highcut_hz: args.highcut,
        order: args.order,
        ..AnalysisConfig::default()
    };
    let analysis = Analyzer::new(config)
        .analyze(&samples, sample_rate)
        .context("pitch analysis failed")?;

    if let Some(path) = &args.filtered_out {
        write_mono_wav(path, &analysis.filtered, sample_rate)?;
        debug!("filtered signal written to {}", path);
    }

    if analysis.silent {
        println!("Filtered signal is too quiet or empty. Try adjusting the bandpass filter range.");
        return Ok(());
    }

    if let Some(path) = &args.csv_out {
        write_csv(path, &analysis.curve)?;
        debug!("pitch curve written to {}", path);
    }

    println!("Duration:      {:.2} s", analysis.duration());
    println!("Sampling rate: {} Hz", sample_rate);
    match analysis.stats {
        Some(stats) => {
            println!("Frames:        {} ({} voiced)", analysis.curve.len(), stats.voiced_frames);
            println!("Average pitch: {:.2} Hz", stats.mean);
            println!("Min pitch:     {:.2} Hz", stats.min);
            println!("Max pitch:     {:.2} Hz", stats.max);
            println!("Std deviation: {:.2} Hz", stats.std_dev);
        }
        None => println!("No valid pitch detected."),
    }

    Ok(())
}

/// Read a WAV file as `f32` samples in `[-1, 1]`, averaging channels.
fn read_mono_wav(path: &str) -> Result<(Vec<f32>, usize)> {
    let mut reader =
        hound::WavReader::open(path).with_context(|| format!("cannot open {}", path))?;
    let spec = reader.spec();
    let channels = spec.channels.max(1) as usize;

    let interleaved: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<std::result::Result<_, _>>()
            .with_context(|| format!("cannot decode {}", path))?,
        hound::SampleFormat::Int => {
            let scale = (1u64 << (spec.bits_per_sample.max(1) - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<std::result::Result<_, _>>()
                .with_context(|| format!("cannot decode {}", path))?
        }
    };

    let mono = interleaved
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
        .collect();

    Ok((mono, spec.sample_rate as usize))
}

fn write_mono_wav(path: &str, samples: &[f32], sample_rate: usize) -> Result<()> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: sample_rate as u32,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut writer =
        hound::WavWriter::create(path, spec).with_context(|| format!("cannot create {}", path))?;
    for &s in samples {
        writer.write_sample(s)?;
    }
    writer.finalize()?;
    Ok(())
}

fn write_csv(path: &str, curve: &PitchCurve<f32>) -> Result<()> {
    let mut wtr = Writer::from_path(path).with_context(|| format!("cannot create {}", path))?;
    for point in curve {
        wtr.serialize(Row {
            time: point.time,
            pitch: point.pitch,
        })?;
    }
    wtr.flush()?;
    Ok(())
}
