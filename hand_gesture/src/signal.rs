//! The engine's output contract.

use serde::{Deserialize, Serialize};

/// Pointing direction proxy, both axes in [-1, 1].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rotation {
    pub x: f32,
    pub y: f32,
}

/// Snapshot handed to the renderer and overlay every tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ControlSignal {
    pub power:            bool,
    /// Merge amount, always within [0, 1].
    pub pinch_factor:     f32,
    /// Edge token: a *change* of value means "launch one firework".
    pub firework_trigger: bool,
    /// Raw target; smoothing belongs to the consumer.
    pub rotation:         Rotation,
}

impl ControlSignal {
    /// Merge amount as a whole percentage, 0–100.
    pub fn love_level(&self) -> u8 {
        (self.pinch_factor.clamp(0.0, 1.0) * 100.0).floor() as u8
    }

    /// The two halves are drawn as one once the factor passes 0.6.
    pub fn is_merged(&self) -> bool {
        self.pinch_factor > 0.6
    }
}

/// Consumer-side detector for edge tokens such as
/// [`ControlSignal::firework_trigger`].
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeToken {
    last: bool,
}

impl EdgeToken {
    /// Start from the token value the consumer has already seen.
    pub fn new(initial: bool) -> Self {
        EdgeToken { last: initial }
    }

    /// True exactly when `token` differs from the previous observation.
    pub fn observe(&mut self, token: bool) -> bool {
        let changed = token != self.last;
        self.last = token;
        changed
    }
}
