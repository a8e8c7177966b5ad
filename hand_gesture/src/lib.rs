//! # hand_gesture
//!
//! Turns a stream of 21-point hand landmark frames into the control
//! signals that drive the digital love letter: power, merge (pinch)
//! factor, firework trigger, and rotation.
//!
//! ```
//! use std::time::Duration;
//! use hand_gesture::{GestureEngine, HandPose, PoseKind};
//!
//! let mut engine = GestureEngine::default();
//! let open = HandPose::new(PoseKind::Open).frame();
//! let signal = engine.update(Some(&open), Duration::from_millis(0));
//! assert!(signal.firework_trigger);
//! ```
//!
//! The engine is a plain value: one owner calls
//! [`GestureEngine::update`] per capture tick.  Sources, threads, and
//! windows live in the application crate.

pub mod classify;
pub mod config;
pub mod engine;
pub mod error;
pub mod landmarks;
pub mod pose;
pub mod recording;
pub mod signal;

pub use classify::{classify, is_hand_closed, is_hand_open, is_pinching, Classification};
pub use config::GestureConfig;
pub use engine::{GestureEngine, GestureEvent, GestureState, ToggleMethod};
pub use error::{ConfigError, FrameError, RecordingError};
pub use landmarks::{Finger, HandFrame, Landmark, HAND_SKELETON, LANDMARK_COUNT};
pub use pose::{HandPose, PoseKind};
pub use recording::{read_recording, write_record, FrameRecord};
pub use signal::{ControlSignal, EdgeToken, Rotation};
