//! Frame-wise pitch tracking over a whole (already band-limited) signal.
//!
//! The signal is cut into frames of `frame_size` samples every `hop_size` samples,
//! each frame gets a pitch from an [AutocorrelationDetector] (zero when unvoiced),
//! and the unvoiced gaps are then filled by linear interpolation between the
//! voiced frames.
use log::debug;

use crate::detector::autocorrelation::AutocorrelationDetector;
use crate::detector::PitchDetector;
use crate::error::{Error, Result};
use crate::float::Float;

/// Pitch estimate for the frame starting at `time` seconds. A `pitch` of zero
/// marks an unvoiced frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PitchPoint<T>
where
    T: Float,
{
    pub time: T,
    pub pitch: T,
}

impl<T: Float> PitchPoint<T> {
    pub fn new(time: T, pitch: T) -> Self {
        PitchPoint { time, pitch }
    }

    pub fn is_voiced(&self) -> bool {
        self.pitch > T::zero()
    }
}

/// Time-ordered pitch estimates, one per frame, equally spaced by
/// `hop_size / sample_rate` seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct PitchCurve<T>
where
    T: Float,
{
    points: Vec<PitchPoint<T>>,
}

impl<T: Float> PitchCurve<T> {
    pub fn empty() -> Self {
        PitchCurve { points: Vec::new() }
    }

    pub fn points(&self) -> &[PitchPoint<T>] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PitchPoint<T>> {
        self.points.iter()
    }

    pub fn times(&self) -> impl Iterator<Item = T> + '_ {
        self.points.iter().map(|p| p.time)
    }

    pub fn pitches(&self) -> impl Iterator<Item = T> + '_ {
        self.points.iter().map(|p| p.pitch)
    }

    /// Points with a strictly positive pitch.
    pub fn voiced(&self) -> impl Iterator<Item = &PitchPoint<T>> + '_ {
        self.points.iter().filter(|p| p.is_voiced())
    }

    pub fn into_points(self) -> Vec<PitchPoint<T>> {
        self.points
    }
}

impl<T: Float> From<Vec<PitchPoint<T>>> for PitchCurve<T> {
    fn from(points: Vec<PitchPoint<T>>) -> Self {
        PitchCurve { points }
    }
}

impl<'a, T: Float> IntoIterator for &'a PitchCurve<T> {
    type Item = &'a PitchPoint<T>;
    type IntoIter = std::slice::Iter<'a, PitchPoint<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

/// Number of whole frames of `frame_size` samples, `hop_size` apart, that fit in
/// `len` samples.
pub fn frame_count(len: usize, frame_size: usize, hop_size: usize) -> usize {
    if frame_size == 0 || hop_size == 0 || len < frame_size {
        return 0;
    }
    1 + (len - frame_size) / hop_size
}

/// Track the pitch of `samples` frame by frame and fill unvoiced frames by
/// linear interpolation (see [interpolate_gaps]).
///
/// A signal shorter than one frame gives an empty curve.
///
/// ```
/// use pitchscope::tracker::track_pitch;
///
/// let sample_rate = 16000;
/// let signal: Vec<f64> = (0..8000)
///     .map(|i| (2.0 * std::f64::consts::PI * 220.0 * i as f64 / sample_rate as f64).sin())
///     .collect();
///
/// let curve = track_pitch(&signal, sample_rate, 480, 240).unwrap();
/// assert_eq!(curve.len(), 32);
/// assert!(curve.pitches().all(|p| (p - 220.0).abs() < 5.0));
///
/// assert!(track_pitch(&signal[..100], sample_rate, 480, 240).unwrap().is_empty());
/// ```
pub fn track_pitch<T: Float>(
    samples: &[T],
    sample_rate: usize,
    frame_size: usize,
    hop_size: usize,
) -> Result<PitchCurve<T>> {
    if frame_size == 0 || hop_size == 0 || sample_rate == 0 {
        return Err(Error::InvalidFrameParameters {
            frame_size,
            hop_size,
            sample_rate,
        });
    }

    let n_frames = frame_count(samples.len(), frame_size, hop_size);
    if n_frames == 0 {
        debug!(
            "{} samples is shorter than one frame of {}, no pitch to track",
            samples.len(),
            frame_size
        );
        return Ok(PitchCurve::empty());
    }

    let rate = T::from_usize_lossy(sample_rate);
    let mut detector = AutocorrelationDetector::new(frame_size);

    let raw: Vec<PitchPoint<T>> = (0..n_frames)
        .map(|i| {
            let start = i * hop_size;
            let frame = &samples[start..start + frame_size];
            let pitch = detector
                .get_pitch(frame, sample_rate)
                .map_or(T::zero(), |p| p.frequency);
            PitchPoint::new(T::from_usize_lossy(start) / rate, pitch)
        })
        .collect();

    let voiced = raw.iter().filter(|p| p.is_voiced()).count();
    debug!(
        "tracked {} frames of {} samples (hop {}), {} voiced",
        n_frames, frame_size, hop_size, voiced
    );

    Ok(PitchCurve::from(interpolate_gaps(&raw)))
}

/// Replace every pitch by the piecewise-linear interpolant through the voiced
/// points, evaluated at each point's time. Before the first and after the last
/// voiced point the end segments are extended linearly; extended values that
/// would drop below zero are held at zero. Voiced points keep their value.
///
/// `points` must be ordered by `time`. Voiced points sharing a time are
/// collapsed onto the first of them, so a zero-width segment never divides by
/// zero. With fewer than two distinct voiced times there is nothing to
/// interpolate between, and the points are returned unchanged.
///
/// ```
/// use pitchscope::tracker::{interpolate_gaps, PitchPoint};
///
/// let points: Vec<_> = [0.0, 200.0, 0.0, 0.0, 220.0, 0.0]
///     .iter()
///     .enumerate()
///     .map(|(i, &p)| PitchPoint::new(i as f64 * 0.015, p))
///     .collect();
/// let filled = interpolate_gaps(&points);
/// assert_eq!(filled[1].pitch, 200.0);
/// assert_eq!(filled[4].pitch, 220.0);
/// assert!(filled[2].pitch > 200.0 && filled[2].pitch < filled[3].pitch);
/// ```
pub fn interpolate_gaps<T: Float>(points: &[PitchPoint<T>]) -> Vec<PitchPoint<T>> {
    let mut voiced: Vec<PitchPoint<T>> =
        points.iter().copied().filter(|p| p.is_voiced()).collect();
    voiced.dedup_by(|later, earlier| later.time == earlier.time);
    if voiced.len() < 2 {
        return points.to_vec();
    }

    points
        .iter()
        .map(|p| PitchPoint::new(p.time, interpolate_at(&voiced, p.time)))
        .collect()
}

/// Evaluate the linear interpolant through `voiced` (strictly increasing times,
/// at least two points) at `time`.
fn interpolate_at<T: Float>(voiced: &[PitchPoint<T>], time: T) -> T {
    let last = voiced.len() - 1;
    // Number of voiced points at or before `time`.
    let after = voiced.partition_point(|p| p.time <= time);

    let value = if after == 0 {
        extend(&voiced[0], &voiced[1], time)
    } else if after > last {
        extend(&voiced[last], &voiced[last - 1], time)
    } else {
        extend(&voiced[after - 1], &voiced[after], time)
    };

    if value > T::zero() {
        value
    } else {
        T::zero()
    }
}

/// Line through `anchor` and `other`, evaluated at `time`. Exact at `anchor.time`.
fn extend<T: Float>(anchor: &PitchPoint<T>, other: &PitchPoint<T>, time: T) -> T {
    let slope = (other.pitch - anchor.pitch) / (other.time - anchor.time);
    anchor.pitch + slope * (time - anchor.time)
}
