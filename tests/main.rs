use pitchscope::filter::{apply_bandpass, peak_amplitude, DEFAULT_ORDER};
use pitchscope::float::Float;
use pitchscope::tracker::{interpolate_gaps, track_pitch, PitchCurve, PitchPoint};
use pitchscope::utils::buffer::new_real_buffer;
use pitchscope::{AnalysisConfig, Analyzer};

const SAMPLE_RATE: usize = 16000;
const FRAME_SIZE: usize = 480;
const HOP_SIZE: usize = FRAME_SIZE / 2;

#[test]
fn tracks_sin_signal() {
    pure_frequency(String::from("sin"), 220.0);
}

#[test]
fn tracks_triangle_signal() {
    pure_frequency(String::from("triangle"), 220.0);
}

#[test]
fn tracks_low_voice() {
    pure_frequency(String::from("voice"), 120.0);
}

#[test]
fn tracks_high_voice() {
    pure_frequency(String::from("voice"), 310.0);
}

#[test]
fn tracks_sin_signal_f32() {
    let signal: Vec<f32> = signal_factory(String::from("sin"), 220.0, SAMPLE_RATE, SAMPLE_RATE);
    let curve = track_pitch(&signal, SAMPLE_RATE, FRAME_SIZE, HOP_SIZE).unwrap();
    assert_majority_near(&curve, 220.0, 5.0);
}

#[test]
fn filtered_sin_signal() {
    let signal: Vec<f64> = sin_wave(220.0, SAMPLE_RATE, SAMPLE_RATE);
    let filtered = apply_bandpass(&signal, SAMPLE_RATE, 50.0, 1000.0, DEFAULT_ORDER).unwrap();
    let curve = track_pitch(&filtered, SAMPLE_RATE, FRAME_SIZE, HOP_SIZE).unwrap();
    assert_majority_near(&curve, 220.0, 5.0);
}

#[test]
fn pipeline_voice_signal() {
    let signal: Vec<f64> = voice_wave(150.0, 2 * SAMPLE_RATE, SAMPLE_RATE);
    // Quiet input still comes out normalized.
    let signal: Vec<f64> = signal.iter().map(|s| s * 0.05).collect();

    let analysis = Analyzer::new(AnalysisConfig::default())
        .analyze(&signal, SAMPLE_RATE)
        .unwrap();

    assert!(!analysis.silent);
    assert_eq!(analysis.filtered.len(), signal.len());
    assert!((peak_amplitude(&analysis.filtered) - 1.0).abs() < 1e-12);
    assert_eq!(analysis.curve.len(), 1 + (signal.len() - FRAME_SIZE) / HOP_SIZE);
    assert_majority_near(&analysis.curve, 150.0, 5.0);

    let stats = analysis.stats.unwrap();
    assert!((stats.mean - 150.0).abs() < 20.0, "{}", stats.mean);
}

#[test]
fn silence_yields_no_pitch() {
    let signal = new_real_buffer::<f64>(SAMPLE_RATE);
    let filtered = apply_bandpass(&signal, SAMPLE_RATE, 50.0, 1000.0, DEFAULT_ORDER).unwrap();
    let curve = track_pitch(&filtered, SAMPLE_RATE, FRAME_SIZE, HOP_SIZE).unwrap();

    assert_eq!(curve.len(), 65);
    assert!(curve.pitches().all(|p| p == 0.0));
}

#[test]
fn too_high_pitch_is_rejected() {
    // Strong periodicity, but the first peak implies ~1454 Hz.
    let signal: Vec<f64> = sin_wave(1500.0, SAMPLE_RATE, SAMPLE_RATE);
    let curve = track_pitch(&signal, SAMPLE_RATE, FRAME_SIZE, HOP_SIZE).unwrap();
    assert!(curve.pitches().all(|p| p == 0.0));
}

#[test]
fn short_input_gives_empty_curve() {
    let signal: Vec<f64> = sin_wave(220.0, FRAME_SIZE - 1, SAMPLE_RATE);
    let curve = track_pitch(&signal, SAMPLE_RATE, FRAME_SIZE, HOP_SIZE).unwrap();
    assert!(curve.is_empty());

    let curve = track_pitch::<f64>(&[], SAMPLE_RATE, FRAME_SIZE, HOP_SIZE).unwrap();
    assert!(curve.is_empty());
}

#[test]
fn gaps_are_interpolated() {
    let dt = HOP_SIZE as f64 / SAMPLE_RATE as f64;
    let points: Vec<PitchPoint<f64>> = [0.0, 200.0, 0.0, 0.0, 220.0, 0.0]
        .iter()
        .enumerate()
        .map(|(i, &p)| PitchPoint::new(i as f64 * dt, p))
        .collect();

    let filled = interpolate_gaps(&points);

    assert_eq!(filled[1].pitch, 200.0);
    assert_eq!(filled[4].pitch, 220.0);
    assert!(filled[2].pitch > 200.0 && filled[2].pitch < 220.0);
    assert!(filled[3].pitch > 200.0 && filled[3].pitch < 220.0);
    assert!(filled[2].pitch < filled[3].pitch);
}

#[test]
fn gap_in_signal_is_bridged() {
    // 220 Hz, a silent gap, then 220 Hz again. The gap edges fall on hop
    // boundaries so the frames straddling them are half signal, half silence.
    let mut signal: Vec<f64> = sin_wave(220.0, SAMPLE_RATE, SAMPLE_RATE);
    signal[6000..10080].iter_mut().for_each(|s| *s = 0.0);

    let curve = track_pitch(&signal, SAMPLE_RATE, FRAME_SIZE, HOP_SIZE).unwrap();
    // Every frame, silent ones included, gets a value from the voiced frames around the gap.
    assert!(curve.pitches().all(|p| (p - 220.0).abs() < 10.0));
}

#[test]
fn filter_attenuates_out_of_band_tones() {
    const LOWCUT: f64 = 200.0;
    const HIGHCUT: f64 = 800.0;
    let center = (LOWCUT * HIGHCUT).sqrt();

    let in_band = filtered_rms(center, LOWCUT, HIGHCUT);
    for freq in [50.0, 4000.0] {
        let out_of_band = filtered_rms(freq, LOWCUT, HIGHCUT);
        let attenuation_db = 20.0 * (out_of_band / in_band).log10();
        println!("{} Hz: {:.1} dB", freq, attenuation_db);
        assert!(attenuation_db < -20.0);
    }
}

#[test]
fn filter_output_is_finite() {
    let signals: Vec<Vec<f64>> = vec![
        square_wave(97.0, SAMPLE_RATE, SAMPLE_RATE),
        saw_wave(1234.0, SAMPLE_RATE, SAMPLE_RATE),
        (0..SAMPLE_RATE).map(|i| if i % 2 == 0 { 1e6 } else { -1e6 }).collect(),
        vec![1.0; SAMPLE_RATE],
    ];

    for signal in signals {
        let filtered = apply_bandpass(&signal, SAMPLE_RATE, 50.0, 1000.0, DEFAULT_ORDER).unwrap();
        assert_eq!(filtered.len(), signal.len());
        assert!(filtered.iter().all(|s| s.is_finite()));
    }
}

fn filtered_rms(freq: f64, lowcut: f64, highcut: f64) -> f64 {
    let signal: Vec<f64> = sin_wave(freq, 2 * SAMPLE_RATE, SAMPLE_RATE);
    let filtered = apply_bandpass(&signal, SAMPLE_RATE, lowcut, highcut, DEFAULT_ORDER).unwrap();
    // Skip the start-up transient.
    let tail = &filtered[SAMPLE_RATE..];
    (tail.iter().map(|s| s * s).sum::<f64>() / tail.len() as f64).sqrt()
}

/// Check that most frames of `curve` are within `tolerance` of `freq_in`.
fn assert_majority_near<T: Float>(curve: &PitchCurve<T>, freq_in: f64, tolerance: f64) {
    assert!(!curve.is_empty());
    let close = curve
        .pitches()
        .filter(|p| (p.into_f64() - freq_in).abs() < tolerance)
        .count();
    println!("{} of {} frames near {} Hz", close, curve.len(), freq_in);
    assert!(2 * close > curve.len());
}

fn pure_frequency(wave_name: String, freq_in: f64) {
    const DURATION: f64 = 1.5;
    const SAMPLE_SIZE: usize = (SAMPLE_RATE as f64 * DURATION) as usize;

    let signal = signal_factory::<f64>(wave_name, freq_in, SAMPLE_SIZE, SAMPLE_RATE);
    let curve = track_pitch(&signal, SAMPLE_RATE, FRAME_SIZE, HOP_SIZE).unwrap();

    for point in curve.iter() {
        println!("{:.3} s: {:.2} Hz", point.time, point.pitch);
    }
    assert_eq!(curve.len(), 1 + (SAMPLE_SIZE - FRAME_SIZE) / HOP_SIZE);
    assert_majority_near(&curve, freq_in, 5.0);
}

fn sin_wave<T: Float>(freq: f64, size: usize, sample_rate: usize) -> Vec<T> {
    let mut signal = new_real_buffer(size);
    let two_pi = 2.0 * std::f64::consts::PI;
    let dx = two_pi * freq / sample_rate as f64;
    for i in 0..size {
        let x = i as f64 * dx;
        signal[i] = T::from_f64_lossy(x.sin());
    }
    signal
}

/// A vowel-like tone: the first five harmonics of `freq` with amplitudes 1/n.
fn voice_wave<T: Float>(freq: f64, size: usize, sample_rate: usize) -> Vec<T> {
    let mut signal = new_real_buffer(size);
    let dx = 2.0 * std::f64::consts::PI * freq / sample_rate as f64;
    for i in 0..size {
        let x = i as f64 * dx;
        let y: f64 = (1..=5).map(|n| (n as f64 * x).sin() / n as f64).sum();
        signal[i] = T::from_f64_lossy(y);
    }
    signal
}

fn square_wave<T: Float>(freq: f64, size: usize, sample_rate: usize) -> Vec<T> {
    let mut signal = new_real_buffer(size);
    let period = sample_rate as f64 / freq;

    for i in 0..size {
        let x = i as f64 / period;
        let frac = x - x.floor();
        let y = match frac >= 0.5 {
            true => -1.0,
            false => 1.0,
        };
        signal[i] = T::from_f64_lossy(y);
    }
    signal
}

fn triangle_wave<T: Float>(freq: f64, size: usize, sample_rate: usize) -> Vec<T> {
    let mut signal = new_real_buffer(size);
    let period = sample_rate as f64 / freq;

    for i in 0..size {
        let x = i as f64 / period;
        let frac = x - x.floor();
        let y = match frac {
            f if f >= 0. && f < 0.25 => 4. * f,
            f if f >= 0.25 && f < 0.75 => 1. - 4. * (f - 0.25),
            f if f >= 0.75 && f < 1. => -1. + 4. * (f - 0.75),
            _ => panic!("Should be between 0 and 1"),
        };
        signal[i] = T::from_f64_lossy(y);
    }
    signal
}

fn saw_wave<T: Float>(freq: f64, size: usize, sample_rate: usize) -> Vec<T> {
    let mut signal = new_real_buffer(size);
    let period = sample_rate as f64 / freq;

    for i in 0..size {
        let x = i as f64 / period;
        let frac = x - x.floor();
        signal[i] = T::from_f64_lossy(2.0 * frac - 1.0);
    }
    signal
}

fn signal_factory<T: Float>(name: String, freq: f64, size: usize, sample_rate: usize) -> Vec<T> {
    match name.as_ref() {
        "sin" => {
            return sin_wave(freq, size, sample_rate);
        }
        "square" => {
            return square_wave(freq, size, sample_rate);
        }
        "triangle" => {
            return triangle_wave(freq, size, sample_rate);
        }
        "saw" => {
            return saw_wave(freq, size, sample_rate);
        }
        "voice" => {
            return voice_wave(freq, size, sample_rate);
        }
        _ => {
            panic!("Unknown wave function {}", name);
        }
    }
}
