use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong inside the signal-processing core.
///
/// An input shorter than one frame is not an error: tracking simply
/// returns an empty curve.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Cutoffs outside `(0, nyquist)`, misordered cutoffs or a zero order.
    InvalidFilterSpec {
        lowcut_hz: f64,
        highcut_hz: f64,
        nyquist_hz: f64,
        order: u32,
    },
    /// Zero frame size, hop size or sample rate.
    InvalidFrameParameters {
        frame_size: usize,
        hop_size: usize,
        sample_rate: usize,
    },
    /// The filter design backend refused a filter that passed validation.
    FilterDesign(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidFilterSpec {
                lowcut_hz,
                highcut_hz,
                nyquist_hz,
                order,
            } => write!(
                f,
                "invalid bandpass: need 0 < lowcut ({} Hz) < highcut ({} Hz) < nyquist ({} Hz) and order ({}) >= 1",
                lowcut_hz, highcut_hz, nyquist_hz, order
            ),
            Error::InvalidFrameParameters {
                frame_size,
                hop_size,
                sample_rate,
            } => write!(
                f,
                "invalid framing: frame size {}, hop size {} and sample rate {} must all be positive",
                frame_size, hop_size, sample_rate
            ),
            Error::FilterDesign(reason) => write!(f, "filter design failed: {}", reason),
        }
    }
}

impl std::error::Error for Error {}
