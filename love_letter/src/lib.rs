//! # love_letter
//!
//! Hand-gesture controller for the digital love letter.  Landmark frames
//! come from a simulated hand, a recording, or a LeapMotion controller; the
//! `hand_gesture` engine turns them into control signals, and a small
//! software-rendered monitor shows what the renderer would receive.
//!
//! ## Gesture → Signal mapping
//!
//! | Gesture | Signal |
//! |---|---|
//! | Fist, palm pulled down | Toggle `power` |
//! | Fist held still | Toggle `power` |
//! | Thumb–index pinch | Raise `pinch_factor` (love level) |
//! | Release after a strong pinch | Hold the merge, then snap to 0 |
//! | Open hand | Flip `firework_trigger` |
//! | Index fingertip position | `rotation` |
//!
//! ## Feature flags
//!
//! * (default): **Simulation mode**: keyboard and mouse drive a synthetic hand.
//! * `leap`: **Hardware mode**: polls a real LeapMotion controller via LeapC.
//!
//! ### Simulation controls
//!
//! | Key | Hand |
//! |---|---|
//! | hold `F` | Fist |
//! | hold `P` | Pinch |
//! | hold `O` | Open |
//! | `H` | Hide / show the hand |
//! | arrows, mouse | Move the palm |
//! | `Q` / `Esc` | Quit |

pub mod app;
pub mod effects;
pub mod error;
pub mod monitor;
pub mod recorder;
pub mod source;
