//! Butterworth bandpass filtering used to isolate the voice band before pitch tracking.
//!
//! The filter is designed from an analog Butterworth prototype of the requested
//! `order` (so the band transform yields `2 * order` poles), discretized with the
//! bilinear transform and run as a cascade of second-order sections. Filtering is
//! causal and single-pass: the output has the same length as the input, and the
//! start-up transient is left in place.
use iir_filters::filter::{DirectForm2Transposed, Filter};
use iir_filters::filter_design::{butter, FilterType};
use iir_filters::sos::zpk2sos;
use log::{debug, warn};
use rustfft::num_traits::float::FloatCore;

use crate::error::{Error, Result};
use crate::float::Float;

pub const DEFAULT_ORDER: u32 = 4;

/// Peak amplitude at or below which a filtered signal is treated as silence.
pub const SILENCE_THRESHOLD: f64 = 1e-5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterSpec {
    pub lowcut_hz: f64,
    pub highcut_hz: f64,
    pub order: u32,
}

impl FilterSpec {
    pub fn new(lowcut_hz: f64, highcut_hz: f64, order: u32) -> Self {
        FilterSpec {
            lowcut_hz,
            highcut_hz,
            order,
        }
    }

    /// Check `0 < lowcut < highcut < sample_rate / 2` and `order >= 1`.
    pub fn validate(&self, sample_rate: usize) -> Result<()> {
        let nyquist_hz = 0.5 * sample_rate as f64;
        let in_band = 0.0 < self.lowcut_hz
            && self.lowcut_hz < self.highcut_hz
            && self.highcut_hz < nyquist_hz;

        if in_band && self.order >= 1 {
            Ok(())
        } else {
            Err(Error::InvalidFilterSpec {
                lowcut_hz: self.lowcut_hz,
                highcut_hz: self.highcut_hz,
                nyquist_hz,
                order: self.order,
            })
        }
    }

    /// Design the filter for `sample_rate` and run `signal` through it.
    pub fn apply<T: Float>(&self, signal: &[T], sample_rate: usize) -> Result<Vec<T>> {
        self.validate(sample_rate)?;

        let zpk = butter(
            self.order,
            FilterType::BandPass(self.lowcut_hz, self.highcut_hz),
            sample_rate as f64,
        )
        .map_err(|e| Error::FilterDesign(format!("{:?}", e)))?;
        let sos = zpk2sos(&zpk, None).map_err(|e| Error::FilterDesign(format!("{:?}", e)))?;
        let mut dft2 = DirectForm2Transposed::new(&sos);

        debug!(
            "bandpass {}..{} Hz, order {}, {} samples at {} Hz",
            self.lowcut_hz,
            self.highcut_hz,
            self.order,
            signal.len(),
            sample_rate
        );

        let mut output: Vec<T> = signal
            .iter()
            .map(|&x| T::from_f64_lossy(dft2.filter(x.into_f64())))
            .collect();

        let replaced = sanitize(&mut output);
        if replaced > 0 {
            warn!("bandpass produced {} non-finite samples, zeroed", replaced);
        }

        Ok(output)
    }
}

/// Bandpass `samples` between `lowcut_hz` and `highcut_hz` with a Butterworth
/// design of the given `order` (use [DEFAULT_ORDER] when in doubt).
///
/// ```
/// use pitchscope::filter::{apply_bandpass, DEFAULT_ORDER};
///
/// let samples = vec![0.0f64; 256];
/// let filtered = apply_bandpass(&samples, 16000, 50.0, 1000.0, DEFAULT_ORDER).unwrap();
/// assert_eq!(filtered.len(), samples.len());
///
/// // Highcut above the Nyquist frequency.
/// assert!(apply_bandpass(&samples, 1000, 50.0, 1000.0, DEFAULT_ORDER).is_err());
/// ```
pub fn apply_bandpass<T: Float>(
    samples: &[T],
    sample_rate: usize,
    lowcut_hz: f64,
    highcut_hz: f64,
    order: u32,
) -> Result<Vec<T>> {
    FilterSpec::new(lowcut_hz, highcut_hz, order).apply(samples, sample_rate)
}

/// Replace every NaN or infinite sample with zero. Returns how many were replaced.
pub fn sanitize<T: Float>(signal: &mut [T]) -> usize {
    let mut replaced = 0;
    for s in signal.iter_mut().filter(|s| !s.is_finite()) {
        *s = T::zero();
        replaced += 1;
    }
    replaced
}

/// Largest absolute sample value, zero for an empty signal.
pub fn peak_amplitude<T: Float>(signal: &[T]) -> T {
    signal
        .iter()
        .map(|&s| FloatCore::abs(s))
        .fold(T::zero(), |peak, s| if s > peak { s } else { peak })
}

/// Scale `signal` so that its peak absolute amplitude is one, unless the peak
/// does not exceed `threshold`, in which case the signal is left as it is.
/// Returns whether the signal was rescaled.
pub fn normalize<T: Float>(signal: &mut [T], threshold: T) -> bool {
    let peak = peak_amplitude(signal);
    if peak <= threshold {
        return false;
    }
    signal.iter_mut().for_each(|s| *s = *s / peak);
    true
}

/// True when every sample is strictly below `threshold` in absolute value.
pub fn is_silent<T: Float>(signal: &[T], threshold: T) -> bool {
    peak_amplitude(signal) < threshold
}
