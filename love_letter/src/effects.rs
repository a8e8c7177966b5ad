//! Monitor-side animation state driven by the control signal.

use std::time::Duration;

use hand_gesture::{ControlSignal, EdgeToken};

// ════════════════════════════════════════════════════════════════════════════
// FireworkShow: one burst per firework edge
// ════════════════════════════════════════════════════════════════════════════

/// Tracks the firework edge token and how far the current burst has run.
#[derive(Debug, Default)]
pub struct FireworkShow {
    edge:       EdgeToken,
    started_at: Option<Duration>,
    pub launches: usize,
}

impl FireworkShow {
    /// How long a burst stays on screen.
    pub const DURATION: Duration = Duration::from_millis(4000);

    /// Feed the latest signal.  Returns true when a new burst starts.
    pub fn observe(&mut self, signal: &ControlSignal, now: Duration) -> bool {
        if !self.edge.observe(signal.firework_trigger) {
            return false;
        }
        self.started_at = Some(now);
        self.launches += 1;
        true
    }

    /// Burst progress in [0, 1), or `None` when no burst is running.
    pub fn progress(&self, now: Duration) -> Option<f32> {
        let started = self.started_at?;
        let elapsed = now.checked_sub(started)?;
        (elapsed < Self::DURATION)
            .then(|| elapsed.as_secs_f32() / Self::DURATION.as_secs_f32())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// PowerLamp: eased on/off indicator
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct PowerLamp {
    /// 0.0 = off, 1.0 = fully lit.
    pub level: f32,
}

impl PowerLamp {
    /// Advance one frame toward the power state.  Returns true when the
    /// lamp reaches its target this frame.
    pub fn tick(&mut self, power: bool) -> bool {
        let target = if power { 1.0 } else { 0.0 };
        if self.level == target {
            return false;
        }
        self.level = if power {
            (self.level + 0.05).min(1.0)
        } else {
            (self.level - 0.05).max(0.0)
        };
        self.level == target
    }
}
