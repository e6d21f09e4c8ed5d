//! Generic [Float] type which acts as a stand-in for `f32` or `f64`.
use rustfft::num_traits::float::FloatCore as NumFloatCore;
use rustfft::FftNum;
use std::fmt::{Debug, Display};
use std::iter::Sum;

/// Signals are processed as arrays of [Float]s. A [Float] is normally `f32` or `f64`.
///
/// Filter design runs in `f64` regardless of `T`, so every [Float] knows how to
/// move in and out of `f64` without a fallible cast.
pub trait Float: Display + Debug + NumFloatCore + FftNum + Sum {
    fn from_f64_lossy(value: f64) -> Self;
    fn into_f64(self) -> f64;

    fn from_usize_lossy(value: usize) -> Self {
        Self::from_f64_lossy(value as f64)
    }
}

impl Float for f64 {
    fn from_f64_lossy(value: f64) -> Self {
        value
    }

    fn into_f64(self) -> f64 {
        self
    }
}

impl Float for f32 {
    fn from_f64_lossy(value: f64) -> Self {
        value as f32
    }

    fn into_f64(self) -> f64 {
        self as f64
    }
}
