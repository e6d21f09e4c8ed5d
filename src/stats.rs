//! Summary statistics over the voiced part of a [PitchCurve].
use crate::float::Float;
use crate::tracker::PitchCurve;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PitchStats<T>
where
    T: Float,
{
    pub mean: T,
    pub min: T,
    pub max: T,
    /// Population standard deviation.
    pub std_dev: T,
    pub voiced_frames: usize,
}

impl<T: Float> PitchStats<T> {
    /// Statistics of the strictly positive pitches of `curve`, or `None` if
    /// there are none.
    pub fn from_curve(curve: &PitchCurve<T>) -> Option<Self> {
        let voiced: Vec<T> = curve.voiced().map(|p| p.pitch).collect();
        Self::from_pitches(&voiced)
    }

    /// Statistics of the strictly positive values in `pitches`.
    pub fn from_pitches(pitches: &[T]) -> Option<Self> {
        let voiced: Vec<T> = pitches.iter().copied().filter(|&p| p > T::zero()).collect();
        let first = *voiced.first()?;

        let n = T::from_usize_lossy(voiced.len());
        let mean = voiced.iter().copied().sum::<T>() / n;
        let variance = voiced.iter().map(|&p| (p - mean) * (p - mean)).sum::<T>() / n;
        let (min, max) = voiced.iter().fold((first, first), |(lo, hi), &p| {
            (if p < lo { p } else { lo }, if p > hi { p } else { hi })
        });

        Some(PitchStats {
            mean,
            min,
            max,
            // FloatCore has no sqrt.
            std_dev: T::from_f64_lossy(variance.into_f64().sqrt()),
            voiced_frames: voiced.len(),
        })
    }
}
