//! The gesture interpretation engine.
//!
//! [`GestureEngine::update`] is called once per capture tick with the
//! current hand (or `None`) and the source's monotonic timestamp.  All
//! timing, including the delayed merge release, is resolved by comparing
//! that timestamp against stored deadlines, so the engine never needs a
//! timer thread and replays identically under test.
//!
//! ## Gesture → Signal mapping
//!
//! | Gesture | Signal |
//! |---|---|
//! | Fist, then pull down or hold | `power` flips (800 ms cooldown) |
//! | Thumb tip to index tip | `pinch_factor` ramps up; sticky release |
//! | Open hand | `firework_trigger` toggles (3000 ms cooldown) |
//! | Index fingertip position | `rotation` target |

use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info};

use crate::classify::classify;
use crate::config::GestureConfig;
use crate::landmarks::{HandFrame, Landmark};
use crate::signal::{ControlSignal, Rotation};

/// Undrained events beyond this are dropped oldest-first.
const MAX_PENDING_EVENTS: usize = 64;

// ════════════════════════════════════════════════════════════════════════════
// Events
// ════════════════════════════════════════════════════════════════════════════

/// Which fist trigger flipped the power.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToggleMethod {
    /// Palm moved down past `pull_distance` while closed.
    Pull,
    /// Fist held longer than `hold_duration`.
    Hold,
}

/// Discrete happenings, for logs and status lines.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GestureEvent {
    PowerToggled { power: bool, method: ToggleMethod },
    /// The release grace period ran out and the merge snapped to zero.
    MergeReleased,
    FireworkLaunched,
}

// ════════════════════════════════════════════════════════════════════════════
// GestureState
// ════════════════════════════════════════════════════════════════════════════

/// Everything the engine remembers between ticks.  Read-only outside the
/// engine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GestureState {
    was_closed_last_frame:  bool,
    close_started_at:       Option<Duration>,
    pull_reference_y:       Option<f32>,
    power_cooldown_until:   Duration,
    pinch_factor:           f32,
    pinch_release_deadline: Option<Duration>,
    last_firework_at:       Option<Duration>,
}

impl GestureState {
    pub fn was_closed_last_frame(&self)  -> bool             { self.was_closed_last_frame }
    pub fn close_started_at(&self)       -> Option<Duration> { self.close_started_at }
    pub fn pull_reference_y(&self)       -> Option<f32>      { self.pull_reference_y }
    pub fn power_cooldown_until(&self)   -> Duration         { self.power_cooldown_until }
    pub fn pinch_factor(&self)           -> f32              { self.pinch_factor }
    pub fn pinch_release_deadline(&self) -> Option<Duration> { self.pinch_release_deadline }
    pub fn last_firework_at(&self)       -> Option<Duration> { self.last_firework_at }
}

// ════════════════════════════════════════════════════════════════════════════
// GestureEngine
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone)]
pub struct GestureEngine {
    config: GestureConfig,
    state:  GestureState,
    signal: ControlSignal,
    events: Vec<GestureEvent>,
}

impl Default for GestureEngine {
    fn default() -> Self {
        Self::new(GestureConfig::default())
    }
}

impl GestureEngine {
    pub fn new(config: GestureConfig) -> Self {
        GestureEngine {
            config,
            state:  GestureState::default(),
            signal: ControlSignal::default(),
            events: Vec::new(),
        }
    }

    pub fn config(&self) -> &GestureConfig { &self.config }
    pub fn state(&self)  -> &GestureState  { &self.state }
    pub fn signal(&self) -> ControlSignal  { self.signal }

    /// Take the events queued since the last drain.
    pub fn drain_events(&mut self) -> Vec<GestureEvent> {
        std::mem::take(&mut self.events)
    }

    /// Process one capture tick.
    ///
    /// With `None` nothing is classified; only an expired merge-release
    /// deadline can change the returned signal.
    pub fn update(&mut self, frame: Option<&HandFrame>, now: Duration) -> ControlSignal {
        self.apply_release_deadline(now);

        if let Some(frame) = frame {
            let shape = classify(frame, &self.config);
            self.step_power(frame, shape.closed, now);
            self.step_pinch(shape.pinching, now);
            if !shape.closed && !shape.pinching && shape.open {
                self.step_firework(now);
            }
            self.signal.rotation = rotation_target(frame.index_tip());
        }

        self.signal.pinch_factor = self.state.pinch_factor;
        self.signal
    }

    /// Like [`update`](Self::update) but for unchecked landmark lists.
    /// A wrong count or a non-finite coordinate skips the tick.
    pub fn update_raw(&mut self, landmarks: Option<&[Landmark]>, now: Duration) -> ControlSignal {
        let frame = match landmarks.map(HandFrame::from_slice) {
            Some(Ok(frame)) => Some(frame),
            Some(Err(e)) => {
                debug!("skipping malformed hand frame at {:?}: {}", now, e);
                None
            }
            None => None,
        };
        self.update(frame.as_ref(), now)
    }

    // ── merge release deadline ───────────────────────────────────────────

    fn apply_release_deadline(&mut self, now: Duration) {
        match self.state.pinch_release_deadline {
            Some(deadline) if now >= deadline => {
                self.state.pinch_release_deadline = None;
                self.state.pinch_factor = 0.0;
                self.signal.pinch_factor = 0.0;
                debug!("merge released at {:?}", now);
                self.push_event(GestureEvent::MergeReleased);
            }
            _ => {}
        }
    }

    // ── power: fist pull / fist hold ─────────────────────────────────────

    fn step_power(&mut self, frame: &HandFrame, closed: bool, now: Duration) {
        let palm_y = frame.palm_y();
        let s = &mut self.state;

        if closed && !s.was_closed_last_frame {
            s.pull_reference_y = Some(palm_y);
            s.close_started_at = Some(now);
        } else if !closed {
            s.pull_reference_y = None;
            s.close_started_at = None;
        }
        s.was_closed_last_frame = closed;

        if !closed || s.power_cooldown_until > now {
            return;
        }

        let pull = s.pull_reference_y.map_or(0.0, |reference| palm_y - reference);
        // Cleared by the previous toggle: the hold restarts here.
        let started = *s.close_started_at.get_or_insert(now);
        let hold = now.saturating_sub(started);

        let method = if pull > self.config.pull_distance {
            ToggleMethod::Pull
        } else if hold > self.config.hold_duration {
            ToggleMethod::Hold
        } else {
            return;
        };

        s.power_cooldown_until = now.saturating_add(self.config.toggle_cooldown);
        s.pull_reference_y = Some(palm_y);
        s.close_started_at = None;
        self.signal.power = !self.signal.power;

        let power = self.signal.power;
        info!(
            "power {} ({:?}, pull={:.3}, hold={}ms)",
            if power { "on" } else { "off" }, method, pull, hold.as_millis()
        );
        self.push_event(GestureEvent::PowerToggled { power, method });
    }

    // ── pinch / merge factor ─────────────────────────────────────────────

    fn step_pinch(&mut self, pinching: bool, now: Duration) {
        let cfg = &self.config;
        let s = &mut self.state;

        if pinching {
            s.pinch_factor = step_toward_one(s.pinch_factor + cfg.pinch_step_up);
            s.pinch_release_deadline = None;
        } else if s.pinch_release_deadline.is_some() {
            // Plateau until the deadline fires or the pinch resumes.
        } else if s.pinch_factor > cfg.merge_hold_threshold {
            let deadline = now.saturating_add(cfg.merge_release_delay);
            debug!("merge held at {:.3}, releasing at {:?}", s.pinch_factor, deadline);
            s.pinch_release_deadline = Some(deadline);
        } else {
            s.pinch_factor = step_toward_zero(s.pinch_factor - cfg.pinch_step_down);
        }

        s.pinch_factor = unit_or_zero(s.pinch_factor);
    }

    // ── open-hand firework ───────────────────────────────────────────────

    fn step_firework(&mut self, now: Duration) {
        let ready = self.state.last_firework_at.map_or(true, |last| {
            now >= last && now - last >= self.config.firework_cooldown
        });
        if !ready {
            return;
        }
        self.state.last_firework_at = Some(now);
        self.signal.firework_trigger = !self.signal.firework_trigger;
        info!("firework launched at {:?}", now);
        self.push_event(GestureEvent::FireworkLaunched);
    }

    fn push_event(&mut self, event: GestureEvent) {
        if self.events.len() >= MAX_PENDING_EVENTS {
            self.events.remove(0);
        }
        self.events.push(event);
    }
}

/// Map the index fingertip from [0,1] image space onto [-1,1].
fn rotation_target(tip: Landmark) -> Rotation {
    Rotation {
        x: ((tip.x - 0.5) * 2.0).clamp(-1.0, 1.0),
        y: ((tip.y - 0.5) * 2.0).clamp(-1.0, 1.0),
    }
}

// Repeated f32 steps drift off the ends of the ramp (40 × 0.025 lands on
// 0.9999996); anything this close to an end is the end.
const RAMP_SNAP: f32 = 1e-4;

fn step_toward_one(v: f32) -> f32 {
    if v >= 1.0 - RAMP_SNAP { 1.0 } else { v }
}

fn step_toward_zero(v: f32) -> f32 {
    if v <= RAMP_SNAP { 0.0 } else { v }
}

fn unit_or_zero(v: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
