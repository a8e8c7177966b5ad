//! The 21-point hand model.
//!
//! Coordinates are normalized image fractions: `x` and `y` in roughly
//! [0, 1] with `y` growing downward, `z` a unitless relative depth.

use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::error::{FrameError, Result};

// ════════════════════════════════════════════════════════════════════════════
// Landmark indices
// ════════════════════════════════════════════════════════════════════════════

pub const LANDMARK_COUNT: usize = 21;

pub const WRIST:      usize = 0;
pub const THUMB_CMC:  usize = 1;
pub const THUMB_MCP:  usize = 2;
pub const THUMB_IP:   usize = 3;
pub const THUMB_TIP:  usize = 4;
pub const INDEX_MCP:  usize = 5;
pub const INDEX_PIP:  usize = 6;
pub const INDEX_DIP:  usize = 7;
pub const INDEX_TIP:  usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP:   usize = 13;
pub const RING_PIP:   usize = 14;
pub const RING_DIP:   usize = 15;
pub const RING_TIP:   usize = 16;
pub const PINKY_MCP:  usize = 17;
pub const PINKY_PIP:  usize = 18;
pub const PINKY_DIP:  usize = 19;
pub const PINKY_TIP:  usize = 20;

/// Bone connections, for drawing a skeleton.
pub const HAND_SKELETON: [(usize, usize); 21] = [
    (WRIST, THUMB_CMC), (THUMB_CMC, THUMB_MCP), (THUMB_MCP, THUMB_IP), (THUMB_IP, THUMB_TIP),
    (WRIST, INDEX_MCP), (INDEX_MCP, INDEX_PIP), (INDEX_PIP, INDEX_DIP), (INDEX_DIP, INDEX_TIP),
    (WRIST, MIDDLE_MCP), (MIDDLE_MCP, MIDDLE_PIP), (MIDDLE_PIP, MIDDLE_DIP), (MIDDLE_DIP, MIDDLE_TIP),
    (WRIST, RING_MCP), (RING_MCP, RING_PIP), (RING_PIP, RING_DIP), (RING_DIP, RING_TIP),
    (WRIST, PINKY_MCP), (PINKY_MCP, PINKY_PIP), (PINKY_PIP, PINKY_DIP), (PINKY_DIP, PINKY_TIP),
    (INDEX_MCP, MIDDLE_MCP),
];

// ════════════════════════════════════════════════════════════════════════════
// Finger
// ════════════════════════════════════════════════════════════════════════════

/// The four non-thumb fingers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Finger {
    Index,
    Middle,
    Ring,
    Little,
}

impl Finger {
    pub const ALL: [Finger; 4] = [Finger::Index, Finger::Middle, Finger::Ring, Finger::Little];

    /// Knuckle-base landmark index.
    pub fn mcp(self) -> usize {
        match self {
            Finger::Index  => INDEX_MCP,
            Finger::Middle => MIDDLE_MCP,
            Finger::Ring   => RING_MCP,
            Finger::Little => PINKY_MCP,
        }
    }

    /// Fingertip landmark index.
    pub fn tip(self) -> usize {
        self.mcp() + 3
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Landmark
// ════════════════════════════════════════════════════════════════════════════

/// One tracked point on the hand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Landmark { x, y, z }
    }

    /// Euclidean distance in the image plane; depth is ignored.
    pub fn planar_distance(&self, other: &Landmark) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HandFrame
// ════════════════════════════════════════════════════════════════════════════

/// A validated snapshot of one hand: exactly 21 finite landmarks.
#[derive(Debug, Clone, PartialEq)]
pub struct HandFrame {
    landmarks: [Landmark; LANDMARK_COUNT],
}

impl HandFrame {
    pub fn new(landmarks: [Landmark; LANDMARK_COUNT]) -> Result<Self> {
        if let Some(index) = landmarks.iter().position(|l| !l.is_finite()) {
            return Err(FrameError::NonFinite { index });
        }
        Ok(HandFrame { landmarks })
    }

    /// Build from an unchecked slice, as delivered by a landmark source.
    pub fn from_slice(landmarks: &[Landmark]) -> Result<Self> {
        let array: [Landmark; LANDMARK_COUNT] = landmarks
            .try_into()
            .map_err(|_| FrameError::LandmarkCount(landmarks.len()))?;
        Self::new(array)
    }

    /// For callers that built the points from finite values themselves.
    pub(crate) fn from_finite(landmarks: [Landmark; LANDMARK_COUNT]) -> Self {
        debug_assert!(landmarks.iter().all(Landmark::is_finite));
        HandFrame { landmarks }
    }

    pub fn landmarks(&self) -> &[Landmark; LANDMARK_COUNT] {
        &self.landmarks
    }

    /// Palm height reference: the middle-finger MCP, steadier than the wrist.
    pub fn palm_y(&self) -> f32 {
        self.landmarks[MIDDLE_MCP].y
    }

    pub fn index_tip(&self) -> Landmark {
        self.landmarks[INDEX_TIP]
    }

    /// Shift every landmark in the image plane.  Fails when the shift
    /// leaves a coordinate non-finite.
    pub fn translated(&self, dx: f32, dy: f32) -> Result<Self> {
        let mut landmarks = self.landmarks;
        for l in &mut landmarks {
            l.x += dx;
            l.y += dy;
        }
        Self::new(landmarks)
    }
}

impl Index<usize> for HandFrame {
    type Output = Landmark;

    fn index(&self, index: usize) -> &Landmark {
        &self.landmarks[index]
    }
}

impl TryFrom<Vec<Landmark>> for HandFrame {
    type Error = FrameError;

    fn try_from(landmarks: Vec<Landmark>) -> Result<Self> {
        Self::from_slice(&landmarks)
    }
}

impl From<HandFrame> for Vec<Landmark> {
    fn from(frame: HandFrame) -> Self {
        frame.landmarks.to_vec()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> Vec<Landmark> {
        (0..LANDMARK_COUNT)
            .map(|i| Landmark::new(i as f32 * 0.01, 0.5, 0.0))
            .collect()
    }

    #[test]
    fn finger_indices_follow_topology() {
        assert_eq!(Finger::Index.tip(),  INDEX_TIP);
        assert_eq!(Finger::Middle.tip(), MIDDLE_TIP);
        assert_eq!(Finger::Ring.tip(),   RING_TIP);
        assert_eq!(Finger::Little.tip(), PINKY_TIP);
    }

    #[test]
    fn planar_distance_ignores_depth() {
        let a = Landmark::new(0.0, 0.0, 0.0);
        let b = Landmark::new(0.3, 0.4, 9.0);
        assert!((a.planar_distance(&b) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn from_slice_accepts_21() {
        let frame = HandFrame::from_slice(&grid()).unwrap();
        assert!((frame[INDEX_TIP].x - 0.08).abs() < 1e-6);
        assert_eq!(frame.palm_y(), 0.5);
    }

    #[test]
    fn from_slice_rejects_short_frame() {
        let mut pts = grid();
        pts.truncate(20);
        assert_eq!(HandFrame::from_slice(&pts), Err(FrameError::LandmarkCount(20)));
    }

    #[test]
    fn from_slice_rejects_nan() {
        let mut pts = grid();
        pts[9].y = f32::NAN;
        assert_eq!(HandFrame::from_slice(&pts), Err(FrameError::NonFinite { index: 9 }));
    }

    #[test]
    fn translated_moves_every_point() {
        let frame = HandFrame::from_slice(&grid()).unwrap();
        let moved = frame.translated(0.1, -0.2).unwrap();
        for (a, b) in frame.landmarks().iter().zip(moved.landmarks()) {
            assert!((b.x - a.x - 0.1).abs() < 1e-6);
            assert!((b.y - a.y + 0.2).abs() < 1e-6);
        }
    }

    #[test]
    fn translated_rejects_non_finite_shift() {
        let frame = HandFrame::from_slice(&grid()).unwrap();
        assert_eq!(frame.translated(f32::NAN, 0.0), Err(FrameError::NonFinite { index: 0 }));
        assert!(frame.translated(0.0, f32::INFINITY).is_err());
    }

    #[test]
    fn landmark_z_defaults_when_missing() {
        let l: Landmark = serde_json::from_str(r#"{"x":0.25,"y":0.75}"#).unwrap();
        assert_eq!(l, Landmark::new(0.25, 0.75, 0.0));
    }
}
