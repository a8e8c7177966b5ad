//! Classification thresholds and timing constants.

use std::time::Duration;

use crate::error::ConfigError;

/// Every tunable the engine uses.  Distances are in normalized image units.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureConfig {
    /// A curled fingertip may sit this far above its knuckle and still count.
    pub closed_tip_tolerance: f32,
    /// Thumb tip to index knuckle must be closer than this for a fist.
    pub thumb_tuck_distance:  f32,
    /// Downward palm travel since closure that toggles power.
    pub pull_distance:        f32,
    /// Fist hold time that toggles power without a pull.
    pub hold_duration:        Duration,
    /// Minimum spacing between two power toggles.
    pub toggle_cooldown:      Duration,

    /// Thumb tip to index tip must be closer than this to pinch.
    pub pinch_distance:       f32,
    pub pinch_step_up:        f32,
    pub pinch_step_down:      f32,
    /// Above this factor a released pinch holds until `merge_release_delay`.
    pub merge_hold_threshold: f32,
    pub merge_release_delay:  Duration,

    /// An open fingertip must sit this far above its knuckle.
    pub open_tip_margin:      f32,
    pub firework_cooldown:    Duration,
}

impl Default for GestureConfig {
    fn default() -> Self {
        GestureConfig {
            closed_tip_tolerance: 0.02,
            thumb_tuck_distance:  0.15,
            pull_distance:        0.06,
            hold_duration:        Duration::from_millis(800),
            toggle_cooldown:      Duration::from_millis(800),
            pinch_distance:       0.06,
            pinch_step_up:        0.025,
            pinch_step_down:      0.015,
            merge_hold_threshold: 0.5,
            merge_release_delay:  Duration::from_millis(3000),
            open_tip_margin:      0.05,
            firework_cooldown:    Duration::from_millis(3000),
        }
    }
}

impl GestureConfig {
    /// Reject thresholds that would make the state machine meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let distances = [
            ("closed_tip_tolerance", self.closed_tip_tolerance),
            ("thumb_tuck_distance",  self.thumb_tuck_distance),
            ("pull_distance",        self.pull_distance),
            ("pinch_distance",       self.pinch_distance),
            ("pinch_step_up",        self.pinch_step_up),
            ("pinch_step_down",      self.pinch_step_down),
            ("merge_hold_threshold", self.merge_hold_threshold),
            ("open_tip_margin",      self.open_tip_margin),
        ];
        for (field, value) in distances {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NotPositive { field, value });
            }
        }
        for (field, value) in [
            ("pinch_step_up",        self.pinch_step_up),
            ("pinch_step_down",      self.pinch_step_down),
            ("merge_hold_threshold", self.merge_hold_threshold),
        ] {
            if value > 1.0 {
                return Err(ConfigError::AboveUnit { field, value });
            }
        }

        let durations = [
            ("hold_duration",       self.hold_duration),
            ("toggle_cooldown",     self.toggle_cooldown),
            ("merge_release_delay", self.merge_release_delay),
            ("firework_cooldown",   self.firework_cooldown),
        ];
        for (field, value) in durations {
            if value.is_zero() {
                return Err(ConfigError::ZeroDuration(field));
            }
        }
        Ok(())
    }
}
