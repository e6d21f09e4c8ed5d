use crate::detector::internals::Pitch;
use crate::float::Float;

pub mod autocorrelation;
pub mod internals;

/// Estimates the pitch of a single analysis frame. `None` means the frame is unvoiced.
pub trait PitchDetector<T>
where
    T: Float,
{
    fn get_pitch(&mut self, frame: &[T], sample_rate: usize) -> Option<Pitch<T>>;
}
