//! First-peak autocorrelation pitch detection.
//!
//! For each frame the DC offset is removed and the autocorrelation
//! $r(t)=\sum_i x_i x_{i+t}$ is computed for the non-negative lags. The zero-lag lobe is
//! skipped by waiting for the first lag where $r$ starts increasing again, and the first
//! local maximum after that point is taken as the pitch period. No interpolation
//! around the peak is done, so the estimate is quantized to `sample_rate / lag`.
//!
//! Taking the *first* maximum instead of the largest one is cheap and works well on
//! band-limited voice, but it can lock onto a spurious early peak when the frame
//! is noisy.
use crate::detector::internals::{pitch_from_peaks, DetectorInternals, Pitch};
use crate::detector::PitchDetector;
use crate::float::Float;
use crate::utils::buffer::{copy_without_mean, is_all_zero};

/// Lowest pitch accepted, exclusive.
pub const MIN_PITCH_HZ: f64 = 50.0;
/// Highest pitch accepted, exclusive.
pub const MAX_PITCH_HZ: f64 = 1000.0;

pub struct AutocorrelationDetector<T>
where
    T: Float,
{
    internals: DetectorInternals<T>,
    min_frequency: T,
    max_frequency: T,
}

impl<T> AutocorrelationDetector<T>
where
    T: Float,
{
    /// A detector for frames of exactly `size` samples.
    pub fn new(size: usize) -> Self {
        let internals = DetectorInternals::new(size, size);
        AutocorrelationDetector {
            internals,
            min_frequency: T::from_f64_lossy(MIN_PITCH_HZ),
            max_frequency: T::from_f64_lossy(MAX_PITCH_HZ),
        }
    }
}

impl<T> PitchDetector<T> for AutocorrelationDetector<T>
where
    T: Float,
{
    fn get_pitch(&mut self, frame: &[T], sample_rate: usize) -> Option<Pitch<T>> {
        assert_eq!(frame.len(), self.internals.size);

        if is_all_zero(frame) {
            return None;
        }

        copy_without_mean(frame, &mut self.internals.signal);
        self.internals.autocorrelate();

        pitch_from_peaks(
            &self.internals.autocorr,
            sample_rate,
            self.min_frequency,
            self.max_frequency,
        )
    }
}
