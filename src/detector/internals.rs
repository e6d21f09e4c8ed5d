use std::sync::Arc;

use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};

use crate::float::Float;
use crate::utils::buffer::{copy_complex_to_real, copy_real_to_complex, modulus_squared};
use crate::utils::buffer::{new_complex_buffer, new_real_buffer};
use crate::utils::peak::first_peak;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pitch<T>
where
    T: Float,
{
    pub frequency: T,
}

/// Scratch space and FFT plans for one frame size. Everything is allocated
/// once so that tracking a long signal does not allocate per frame.
pub struct DetectorInternals<T>
where
    T: Float,
{
    pub size: usize,
    fft: Arc<dyn Fft<T>>,
    inv_fft: Arc<dyn Fft<T>>,
    pub(crate) signal: Vec<T>,
    pub(crate) autocorr: Vec<T>,
    spectrum: Vec<Complex<T>>,
    scratch: Vec<Complex<T>>,
}

impl<T> DetectorInternals<T>
where
    T: Float,
{
    /// `padding` zeros are appended before the FFT. With `padding >= size - 1`
    /// the circular correlation computed by the FFT equals the linear one.
    pub fn new(size: usize, padding: usize) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(size + padding);
        let inv_fft = planner.plan_fft_inverse(size + padding);
        let scratch_len = fft
            .get_inplace_scratch_len()
            .max(inv_fft.get_inplace_scratch_len());

        DetectorInternals {
            size,
            fft,
            inv_fft,
            signal: new_real_buffer(size),
            autocorr: new_real_buffer(size),
            spectrum: new_complex_buffer(size + padding),
            scratch: new_complex_buffer(scratch_len),
        }
    }

    /// Autocorrelation of `self.signal` for lags `0..size`, written to `self.autocorr`:
    ///
    /// > r(t) = sum_{i=0}^{size-1-t} x_i*x_{i+t}
    pub fn autocorrelate(&mut self) {
        autocorrelation(
            &self.signal,
            self.fft.as_ref(),
            self.inv_fft.as_ref(),
            &mut self.spectrum,
            &mut self.scratch,
            &mut self.autocorr,
        );
    }
}

/// Compute the non-negative-lag autocorrelation of `signal` into `result`.
/// `spectrum` must be at least `2 * signal.len() - 1` long for the result to be
/// the linear (not circular) autocorrelation.
pub fn autocorrelation<T>(
    signal: &[T],
    fft: &dyn Fft<T>,
    inv_fft: &dyn Fft<T>,
    spectrum: &mut [Complex<T>],
    scratch: &mut [Complex<T>],
    result: &mut [T],
) where
    T: Float,
{
    copy_real_to_complex(signal, spectrum);
    fft.process_with_scratch(spectrum, scratch);
    modulus_squared(spectrum);
    inv_fft.process_with_scratch(spectrum, scratch);
    // rustfft doesn't normalize, and fft -> inverse fft scales by the length once.
    let normalization_const = T::one() / T::from_usize_lossy(spectrum.len());
    spectrum
        .iter_mut()
        .for_each(|c| c.re = c.re * normalization_const);
    copy_complex_to_real(spectrum, result);
}

/// Turn an autocorrelation into a pitch using its first peak. The peak must be
/// positive and the implied frequency must lie strictly inside
/// `(min_frequency, max_frequency)`.
pub fn pitch_from_peaks<T>(
    autocorr: &[T],
    sample_rate: usize,
    min_frequency: T,
    max_frequency: T,
) -> Option<Pitch<T>>
where
    T: Float,
{
    let sample_rate = T::from_usize_lossy(sample_rate);
    let (lag, value) = first_peak(autocorr)?;
    if value <= T::zero() {
        return None;
    }

    let frequency = sample_rate / T::from_usize_lossy(lag);
    if frequency > min_frequency && frequency < max_frequency {
        Some(Pitch { frequency })
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn direct_autocorrelation(signal: &[f64]) -> Vec<f64> {
        (0..signal.len())
            .map(|t| {
                signal[..signal.len() - t]
                    .iter()
                    .zip(signal[t..].iter())
                    .map(|(a, b)| a * b)
                    .sum()
            })
            .collect()
    }

    #[test]
    fn autocorrelation_test() {
        let signal: Vec<f64> = vec![0., 1., 2., 0., -1., -2.];
        let mut internals = DetectorInternals::<f64>::new(signal.len(), signal.len());
        internals.signal.copy_from_slice(&signal);
        internals.autocorrelate();

        // Using an FFT loses precision; we don't care that much, so round generously.
        let computed: Vec<f64> = internals
            .autocorr
            .iter()
            .map(|x| (x * 100.).round() / 100.)
            .collect();

        assert_eq!(direct_autocorrelation(&signal), computed);
        assert_eq!(computed[0], signal.iter().map(|s| s * s).sum::<f64>());
    }

    #[test]
    fn autocorrelation_odd_sizes() {
        let signal: Vec<f64> = (0..37).map(|i| ((i * 7) % 11) as f64 - 5.0).collect();
        let mut internals = DetectorInternals::<f64>::new(signal.len(), signal.len() - 1);
        internals.signal.copy_from_slice(&signal);
        internals.autocorrelate();

        let expected = direct_autocorrelation(&signal);
        for (e, c) in expected.iter().zip(internals.autocorr.iter()) {
            assert!((e - c).abs() < 1e-9, "{} != {}", e, c);
        }
    }

    #[test]
    fn pitch_from_first_peak() {
        // Peak at lag 4 -> 16000 / 4 = 4000 Hz; out of range for voice.
        let ac = [10.0, 4.0, 0.0, 2.0, 5.0, 1.0, -3.0, 0.0, 9.0, 0.0];
        assert!(pitch_from_peaks(&ac, 16000, 50.0, 1000.0).is_none());

        // Same shape at 2000 Hz: 500 Hz, accepted.
        let pitch = pitch_from_peaks(&ac, 2000, 50.0, 1000.0).unwrap();
        assert_eq!(pitch.frequency, 500.0);
    }

    #[test]
    fn negative_peak_is_rejected() {
        let ac = [10.0, 2.0, -5.0, -1.0, -4.0, 0.0];
        assert!(pitch_from_peaks(&ac, 1000, 50.0, 1000.0).is_none());
    }

    #[test]
    fn bounds_are_exclusive() {
        let mut ac = vec![0.0; 24];
        ac[0] = 10.0;
        ac[20] = 1.0;
        ac[19] = -1.0;
        ac[21] = -1.0;
        ac[1] = -1.0;
        // Lag 20 at 1000 Hz is exactly 50 Hz.
        assert!(pitch_from_peaks(&ac, 1000, 50.0, 1000.0).is_none());
        // Lag 20 at 20000 Hz is exactly 1000 Hz.
        assert!(pitch_from_peaks(&ac, 20000, 50.0, 1000.0).is_none());
        assert!(pitch_from_peaks(&ac, 10000, 50.0, 1000.0).is_some());
    }
}
