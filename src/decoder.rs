//! Single-edge quadrature decoding.
//!
//! One detent of a mechanical encoder produces one falling edge on channel A.
//! At that instant channel B is high when turning clockwise and low when
//! turning counter-clockwise. Rising edges and steady levels are ignored, so
//! this is a 1x decode.

use crate::types::{Direction, Level};

/// Edge detector for a two-channel encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuadratureDecoder {
    previous_a: Level,
}

impl QuadratureDecoder {
    /// Creates a decoder that treats the previous A sample as low, so a
    /// line that idles low at boot cannot fire a spurious step.
    pub const fn new() -> Self {
        Self {
            previous_a: Level::Low,
        }
    }

    /// Feeds one sample of both channels.
    ///
    /// Returns a direction only on a high-to-low transition of channel A.
    /// The A sample is stored whether or not an edge fired.
    pub fn update(&mut self, a: Level, b: Level) -> Option<Direction> {
        let falling = self.previous_a.is_high() && a.is_low();
        self.previous_a = a;

        if !falling {
            return None;
        }

        match b {
            Level::High => Some(Direction::Increase),
            Level::Low => Some(Direction::Decrease),
        }
    }

    /// Channel A level seen at the last sample.
    pub fn previous_a(&self) -> Level {
        self.previous_a
    }
}

impl Default for QuadratureDecoder {
    fn default() -> Self {
        Self::new()
    }
}
