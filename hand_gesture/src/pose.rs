//! Synthetic hand poses.
//!
//! Stands in for a camera + landmark model when simulating or testing.
//! Each pose is laid out around an anchor at the middle-finger knuckle,
//! upright, palm toward the camera, and classifies as its name says
//! under the default thresholds.

use crate::landmarks::*;

/// Shapes the simulator can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PoseKind {
    /// Fingers half bent: neither fist, pinch, nor open.
    #[default]
    Relaxed,
    Open,
    Fist,
    Pinch,
}

impl PoseKind {
    pub fn name(self) -> &'static str {
        match self {
            PoseKind::Relaxed => "relaxed",
            PoseKind::Open    => "open",
            PoseKind::Fist    => "fist",
            PoseKind::Pinch   => "pinch",
        }
    }
}

/// A pose placed in the image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandPose {
    pub kind:     PoseKind,
    /// Middle-finger MCP position, normalized image coordinates.
    pub anchor_x: f32,
    pub anchor_y: f32,
}

// Knuckle offsets from the anchor: index, middle, ring, little.
const MCP_OFFSETS: [(f32, f32); 4] = [(-0.045, 0.005), (0.0, 0.0), (0.04, 0.01), (0.075, 0.03)];

// PIP, DIP, TIP offsets from the knuckle.
const EXTENDED: [(f32, f32); 3] = [(0.0, -0.05), (0.0, -0.08), (0.0, -0.11)];
const HALF_BENT: [(f32, f32); 3] = [(0.0, -0.04), (0.005, -0.045), (0.01, -0.03)];
const CURLED: [(f32, f32); 3] = [(0.0, -0.02), (0.005, 0.01), (0.0, 0.03)];
const PINCH_INDEX: [(f32, f32); 3] = [(-0.015, -0.055), (-0.035, -0.055), (-0.045, -0.035)];

// Thumb IP and TIP offsets from the anchor.
const THUMB_SPREAD: [(f32, f32); 2] = [(-0.15, 0.05), (-0.20, 0.0)];
const THUMB_TUCKED: [(f32, f32); 2] = [(-0.07, 0.08), (-0.09, 0.10)];
const THUMB_PINCH: [(f32, f32); 2] = [(-0.12, 0.02), (-0.10, -0.025)];

impl HandPose {
    pub const DEFAULT_ANCHOR: (f32, f32) = (0.5, 0.55);

    pub fn new(kind: PoseKind) -> Self {
        Self::at(kind, Self::DEFAULT_ANCHOR.0, Self::DEFAULT_ANCHOR.1)
    }

    /// Non-finite anchors fall back to the default position.
    pub fn at(kind: PoseKind, anchor_x: f32, anchor_y: f32) -> Self {
        HandPose {
            kind,
            anchor_x: finite_or(anchor_x, Self::DEFAULT_ANCHOR.0),
            anchor_y: finite_or(anchor_y, Self::DEFAULT_ANCHOR.1),
        }
    }

    pub fn with_kind(self, kind: PoseKind) -> Self {
        HandPose { kind, ..self }
    }

    pub fn translated(self, dx: f32, dy: f32) -> Self {
        Self::at(self.kind, self.anchor_x + dx, self.anchor_y + dy)
    }

    pub fn landmarks(&self) -> [Landmark; LANDMARK_COUNT] {
        let (cx, cy) = (self.anchor_x, self.anchor_y);
        let at = |(dx, dy): (f32, f32)| Landmark::new(cx + dx, cy + dy, 0.0);

        let mut pts = [Landmark::default(); LANDMARK_COUNT];
        pts[WRIST]     = at((0.0, 0.18));
        pts[THUMB_CMC] = at((-0.06, 0.14));
        pts[THUMB_MCP] = at((-0.10, 0.10));

        let thumb = match self.kind {
            PoseKind::Relaxed | PoseKind::Open => THUMB_SPREAD,
            PoseKind::Fist                     => THUMB_TUCKED,
            PoseKind::Pinch                    => THUMB_PINCH,
        };
        pts[THUMB_IP]  = at(thumb[0]);
        pts[THUMB_TIP] = at(thumb[1]);

        for (finger, &(mx, my)) in Finger::ALL.iter().zip(MCP_OFFSETS.iter()) {
            let chain = match (self.kind, finger) {
                (PoseKind::Pinch, Finger::Index) => PINCH_INDEX,
                (PoseKind::Relaxed, _)           => HALF_BENT,
                (PoseKind::Fist, _)              => CURLED,
                (PoseKind::Open, _) | (PoseKind::Pinch, _) => EXTENDED,
            };
            // The little finger is shorter.
            let scale = if *finger == Finger::Little { 0.8 } else { 1.0 };

            let mcp = finger.mcp();
            pts[mcp] = at((mx, my));
            for (joint, &(dx, dy)) in chain.iter().enumerate() {
                pts[mcp + 1 + joint] = at((mx + dx * scale, my + dy * scale));
            }
        }
        pts
    }

    pub fn frame(&self) -> HandFrame {
        HandFrame::from_finite(self.landmarks())
    }
}

fn finite_or(v: f32, fallback: f32) -> f32 {
    if v.is_finite() { v } else { fallback }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translation_moves_anchor() {
        let p = HandPose::new(PoseKind::Fist).translated(0.0, 0.07);
        assert!((p.anchor_y - 0.62).abs() < 1e-6);
        assert!((p.frame().palm_y() - 0.62).abs() < 1e-6);
    }

    #[test]
    fn nan_anchor_falls_back() {
        let p = HandPose::at(PoseKind::Open, f32::NAN, 0.3);
        assert_eq!(p.anchor_x, HandPose::DEFAULT_ANCHOR.0);
        assert_eq!(p.anchor_y, 0.3);
    }

    #[test]
    fn palm_y_is_anchor() {
        for kind in [PoseKind::Relaxed, PoseKind::Open, PoseKind::Fist, PoseKind::Pinch] {
            let p = HandPose::at(kind, 0.3, 0.4);
            assert_eq!(p.frame().palm_y(), 0.4, "{}", kind.name());
        }
    }
}
