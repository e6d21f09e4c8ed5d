//! End-to-end voice analysis: bandpass, normalize, track, summarize.
use log::{info, warn};

use crate::error::Result;
use crate::filter::{is_silent, normalize, FilterSpec, DEFAULT_ORDER, SILENCE_THRESHOLD};
use crate::float::Float;
use crate::stats::PitchStats;
use crate::tracker::{track_pitch, PitchCurve};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisConfig {
    pub lowcut_hz: f64,
    pub highcut_hz: f64,
    pub order: u32,
    /// Analysis frame length in seconds. The hop is half a frame.
    pub frame_duration: f64,
    /// Filtered signals whose peak stays at or below this are treated as silent.
    pub silence_threshold: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            lowcut_hz: 50.0,
            highcut_hz: 1000.0,
            order: DEFAULT_ORDER,
            frame_duration: 0.03,
            silence_threshold: SILENCE_THRESHOLD,
        }
    }
}

impl AnalysisConfig {
    pub fn filter_spec(&self) -> FilterSpec {
        FilterSpec::new(self.lowcut_hz, self.highcut_hz, self.order)
    }

    /// `(frame_size, hop_size)` in samples for `sample_rate`.
    pub fn frame_parameters(&self, sample_rate: usize) -> (usize, usize) {
        let frame_size = (sample_rate as f64 * self.frame_duration) as usize;
        (frame_size, frame_size / 2)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Analysis<T>
where
    T: Float,
{
    pub sample_rate: usize,
    /// Bandpassed signal, peak-normalized to one unless it was silent.
    pub filtered: Vec<T>,
    /// Empty when the filtered signal is silent.
    pub curve: PitchCurve<T>,
    pub stats: Option<PitchStats<T>>,
    pub silent: bool,
}

impl<T: Float> Analysis<T> {
    pub fn duration(&self) -> f64 {
        self.filtered.len() as f64 / self.sample_rate as f64
    }
}

pub struct Analyzer {
    config: AnalysisConfig,
}

impl Analyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        Analyzer { config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn analyze<T: Float>(&self, samples: &[T], sample_rate: usize) -> Result<Analysis<T>> {
        let mut filtered = self.config.filter_spec().apply(samples, sample_rate)?;
        let threshold = T::from_f64_lossy(self.config.silence_threshold);
        normalize(&mut filtered, threshold);

        if is_silent(&filtered, threshold) {
            warn!("filtered signal is silent, try a different band");
            return Ok(Analysis {
                sample_rate,
                filtered,
                curve: PitchCurve::empty(),
                stats: None,
                silent: true,
            });
        }

        let (frame_size, hop_size) = self.config.frame_parameters(sample_rate);
        let curve = track_pitch(&filtered, sample_rate, frame_size, hop_size)?;
        let stats = PitchStats::from_curve(&curve);

        match &stats {
            Some(s) => info!(
                "{} frames, mean pitch {:.2} Hz (min {:.2}, max {:.2}, std {:.2})",
                curve.len(),
                s.mean,
                s.min,
                s.max,
                s.std_dev
            ),
            None => warn!("no voiced frames in {} frames", curve.len()),
        }

        Ok(Analysis {
            sample_rate,
            filtered,
            curve,
            stats,
            silent: false,
        })
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Analyzer::new(AnalysisConfig::default())
    }
}
