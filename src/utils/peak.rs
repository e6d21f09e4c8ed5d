use crate::float::Float;

/// Index of the first sample that is followed by a larger one, i.e. the first
/// `j` with `arr[j + 1] > arr[j]`. For an autocorrelation this is where the
/// decay away from the zero-lag peak ends.
pub fn first_rise<T: Float>(arr: &[T]) -> Option<usize> {
    arr.windows(2).position(|win| win[1] > win[0])
}

/// Iterate over the strict local maxima of `arr` at or after index `from`,
/// in increasing index order. The first and last samples never qualify.
pub fn local_maxima<'a, T: Float>(
    arr: &'a [T],
    from: usize,
) -> impl Iterator<Item = (usize, T)> + 'a {
    arr.windows(3)
        .enumerate()
        .skip(from.saturating_sub(1))
        .filter(|(_, win)| win[1] > win[0] && win[1] > win[2])
        .map(|(i, win)| (i + 1, win[1]))
}

/// First peak of an autocorrelation: skip the zero-lag lobe with [first_rise],
/// then take the lowest-lag local maximum after it. This is deliberately not a
/// search for the largest peak.
pub fn first_peak<T: Float>(arr: &[T]) -> Option<(usize, T)> {
    let start = first_rise(arr)?;
    local_maxima(arr, start).next()
}
