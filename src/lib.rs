//! # Pitchscope
//! *pitchscope* estimates the fundamental frequency of a monophonic voice
//! recording over time. The signal is first isolated to the voice band with a
//! Butterworth bandpass filter, then tracked frame by frame with a first-peak
//! autocorrelation detector, and unvoiced frames are filled in by linear
//! interpolation between their voiced neighbours.
//!
//!   * [filter] - bandpass design and filtering, sanitizing, peak normalization
//!   * [tracker] - framing, per-frame detection and gap filling
//!   * [detector] - the autocorrelation detector used on each frame
//!   * [pipeline] - all of the above with the usual defaults
//!
//! The core does no I/O; decoding audio and presenting results is up to the caller
//! (see the `pitchscope` binary for a WAV based one).
//!
//! # Examples
//! ```
//! use pitchscope::filter::apply_bandpass;
//! use pitchscope::tracker::track_pitch;
//!
//! fn main() -> Result<(), pitchscope::Error> {
//!     const SAMPLE_RATE: usize = 16000;
//!     const FRAME_SIZE: usize = 480;
//!     const HOP_SIZE: usize = FRAME_SIZE / 2;
//!
//!     // Signal coming from some source (microphone, decoded file, etc...)
//!     let dt = 1.0 / SAMPLE_RATE as f64;
//!     let freq = 220.0;
//!     let signal: Vec<f64> = (0..SAMPLE_RATE)
//!         .map(|x| (2.0 * std::f64::consts::PI * x as f64 * dt * freq).sin())
//!         .collect();
//!
//!     let filtered = apply_bandpass(&signal, SAMPLE_RATE, 50.0, 1000.0, 4)?;
//!     let curve = track_pitch(&filtered, SAMPLE_RATE, FRAME_SIZE, HOP_SIZE)?;
//!
//!     for point in curve.iter() {
//!         println!("{:.3} s: {:.1} Hz", point.time, point.pitch);
//!     }
//!     Ok(())
//! }
//! ```

pub use error::{Error, Result};
pub use filter::{apply_bandpass, is_silent, normalize, FilterSpec};
pub use pipeline::{Analysis, AnalysisConfig, Analyzer};
pub use stats::PitchStats;
pub use tracker::{interpolate_gaps, track_pitch, PitchCurve, PitchPoint};

pub mod detector;
pub mod error;
pub mod filter;
pub mod float;
pub mod pipeline;
pub mod stats;
pub mod tracker;
pub mod utils;
