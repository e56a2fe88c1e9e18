//! Slope corridor between the anchor and the probe.
//!
//! Every point seen since the anchor contributes a pair of doors: the slopes
//! of the lines from the anchor to that point shifted up and down by the
//! admissible Y band. The corridor is the intersection of all those slope
//! ranges. It only ever shrinks until the anchor moves.

/// Slope bounds contributed by a single probe.
///
/// `lower` is numerically the larger slope: it is the door a line must stay
/// under, while `upper` is the door it must stay above.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Doors {
    pub lower: f64,
    pub upper: f64,
}

impl Doors {
    /// Doors around the slope `tg`, each `tg_delta` away from it.
    pub fn around(tg: f64, tg_delta: f64) -> Self {
        Doors {
            lower: tg + tg_delta,
            upper: tg - tg_delta,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Corridor {
    lower: f64,
    upper: f64,
}

impl Corridor {
    /// The wide open starting state. The first narrowing always replaces
    /// both doors.
    pub fn new() -> Self {
        Corridor {
            lower: f64::INFINITY,
            upper: f64::NEG_INFINITY,
        }
    }

    pub fn lower(&self) -> f64 {
        self.lower
    }

    pub fn upper(&self) -> f64 {
        self.upper
    }

    /// Intersects the corridor with a probe's doors.
    pub fn narrow(&mut self, doors: Doors, epsilon: f64) {
        if doors.lower < self.lower + epsilon {
            self.lower = doors.lower;
        }
        if self.upper < doors.upper + epsilon {
            self.upper = doors.upper;
        }
    }

    /// Whether a line of slope `tg` from the anchor passes between the doors.
    pub fn admits(&self, tg: f64, epsilon: f64) -> bool {
        self.upper < tg + epsilon && tg < self.lower + epsilon
    }

    /// The doors have crossed: no line from the anchor fits every point seen.
    pub fn collapsed(&self, epsilon: f64) -> bool {
        self.lower < self.upper + epsilon
    }
}
