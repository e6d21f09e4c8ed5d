use rustfft::num_complex::Complex;
use rustfft::num_traits::Zero;

use crate::float::Float;

pub fn new_real_buffer<T: Float>(size: usize) -> Vec<T> {
    vec![T::zero(); size]
}

pub fn new_complex_buffer<T: Float>(size: usize) -> Vec<Complex<T>> {
    vec![Complex::zero(); size]
}

/// Copy `input` into the real part of `output` and zero-pad the tail of `output`.
pub fn copy_real_to_complex<T: Float>(input: &[T], output: &mut [Complex<T>]) {
    assert!(input.len() <= output.len());
    input
        .iter()
        .zip(output.iter_mut())
        .for_each(|(&i, o)| *o = Complex::new(i, T::zero()));
    output[input.len()..]
        .iter_mut()
        .for_each(|o| *o = Complex::zero())
}

/// Copy the real part of the first `output.len()` values of `input` into `output`.
pub fn copy_complex_to_real<T: Float>(input: &[Complex<T>], output: &mut [T]) {
    assert!(output.len() <= input.len());
    input
        .iter()
        .map(|c| c.re)
        .zip(output.iter_mut())
        .for_each(|(i, o)| *o = i);
}

/// Computes |x|^2 for each complex value x in `arr`. This function
/// modifies `arr` in place and leaves the complex component zero.
pub fn modulus_squared<T: Float>(arr: &mut [Complex<T>]) {
    for s in arr {
        s.re = s.re * s.re + s.im * s.im;
        s.im = T::zero();
    }
}

/// Arithmetic mean of `arr`, zero when empty.
pub fn mean<T: Float>(arr: &[T]) -> T {
    if arr.is_empty() {
        return T::zero();
    }
    arr.iter().copied().sum::<T>() / T::from_usize_lossy(arr.len())
}

/// Copy `input` into `output` with the mean of `input` subtracted (DC offset removal).
pub fn copy_without_mean<T: Float>(input: &[T], output: &mut [T]) {
    assert_eq!(input.len(), output.len());
    let m = mean(input);
    input
        .iter()
        .zip(output.iter_mut())
        .for_each(|(&i, o)| *o = i - m);
}

/// True when every sample is exactly zero.
pub fn is_all_zero<T: Float>(arr: &[T]) -> bool {
    arr.iter().all(|s| s.is_zero())
}
