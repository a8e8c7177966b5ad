//! Per-frame hand shape classification.
//!
//! All three checks are pure functions of one frame and the thresholds.
//! NaN compares false everywhere, so a degenerate frame reads as
//! "none of the above" rather than as a gesture.

use crate::config::GestureConfig;
use crate::landmarks::{Finger, HandFrame, INDEX_MCP, INDEX_TIP, THUMB_TIP};

/// The three shapes the engine reacts to, for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Classification {
    pub closed:   bool,
    pub pinching: bool,
    pub open:     bool,
}

pub fn classify(frame: &HandFrame, cfg: &GestureConfig) -> Classification {
    Classification {
        closed:   is_hand_closed(frame, cfg),
        pinching: is_pinching(frame, cfg),
        open:     is_hand_open(frame, cfg),
    }
}

/// Fist: every non-thumb fingertip at or below its knuckle (within
/// `closed_tip_tolerance`) and the thumb tucked against the index knuckle.
pub fn is_hand_closed(frame: &HandFrame, cfg: &GestureConfig) -> bool {
    let fingers_curled = Finger::ALL.iter().all(|f| {
        frame[f.tip()].y > frame[f.mcp()].y - cfg.closed_tip_tolerance
    });
    let thumb_tucked =
        frame[THUMB_TIP].planar_distance(&frame[INDEX_MCP]) < cfg.thumb_tuck_distance;
    fingers_curled && thumb_tucked
}

/// Thumb tip touching index tip.
pub fn is_pinching(frame: &HandFrame, cfg: &GestureConfig) -> bool {
    frame[THUMB_TIP].planar_distance(&frame[INDEX_TIP]) < cfg.pinch_distance
}

/// Index, middle and ring fingertips clearly above their knuckles.
///
/// The little finger and thumb are not checked, unlike the fist test.
pub fn is_hand_open(frame: &HandFrame, cfg: &GestureConfig) -> bool {
    [Finger::Index, Finger::Middle, Finger::Ring]
        .iter()
        .all(|f| frame[f.tip()].y < frame[f.mcp()].y - cfg.open_tip_margin)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::{Landmark, LANDMARK_COUNT, PINKY_TIP};
    use crate::pose::{HandPose, PoseKind};

    fn cfg() -> GestureConfig { GestureConfig::default() }

    /// Hand with every tip `tip_dy` below its MCP and the thumb tip
    /// `thumb_dist` to the right of the index MCP.
    fn flat_hand(tip_dy: f32, thumb_dist: f32) -> HandFrame {
        let mut pts = [Landmark::new(0.5, 0.5, 0.0); LANDMARK_COUNT];
        for (i, f) in Finger::ALL.iter().enumerate() {
            let x = 0.40 + i as f32 * 0.05;
            pts[f.mcp()] = Landmark::new(x, 0.50, 0.0);
            pts[f.tip()] = Landmark::new(x, 0.50 + tip_dy, 0.0);
        }
        pts[THUMB_TIP] = Landmark::new(pts[INDEX_MCP].x + thumb_dist, 0.50, 0.0);
        HandFrame::new(pts).unwrap()
    }

    #[test]
    fn fist_with_tucked_thumb_is_closed() {
        let frame = flat_hand(0.03, 0.05);
        assert!(is_hand_closed(&frame, &cfg()));
    }

    #[test]
    fn tip_slightly_above_mcp_still_closed() {
        // 0.01 above the knuckle is inside the 0.02 tolerance.
        let frame = flat_hand(-0.01, 0.05);
        assert!(is_hand_closed(&frame, &cfg()));
    }

    #[test]
    fn tip_beyond_tolerance_not_closed() {
        let frame = flat_hand(-0.03, 0.05);
        assert!(!is_hand_closed(&frame, &cfg()));
    }

    #[test]
    fn untucked_thumb_not_closed() {
        let frame = flat_hand(0.03, 0.20);
        assert!(!is_hand_closed(&frame, &cfg()));
    }

    #[test]
    fn one_extended_little_finger_breaks_fist() {
        let frame = flat_hand(0.03, 0.05);
        let mut pts = *frame.landmarks();
        pts[PINKY_TIP].y = 0.40;
        let frame = HandFrame::new(pts).unwrap();
        assert!(!is_hand_closed(&frame, &cfg()));
    }

    #[test]
    fn closed_is_deterministic() {
        let frame = flat_hand(0.0, 0.1);
        let first = is_hand_closed(&frame, &cfg());
        for _ in 0..10 {
            assert_eq!(is_hand_closed(&frame, &cfg()), first);
        }
    }

    #[test]
    fn open_ignores_little_finger() {
        let frame = flat_hand(-0.10, 0.30);
        let mut pts = *frame.landmarks();
        pts[PINKY_TIP].y = 0.60; // curled
        let frame = HandFrame::new(pts).unwrap();
        assert!(is_hand_open(&frame, &cfg()));
    }

    #[test]
    fn open_needs_clear_margin() {
        // 0.04 above the knuckle is not more than the 0.05 margin.
        let frame = flat_hand(-0.04, 0.30);
        assert!(!is_hand_open(&frame, &cfg()));
    }

    #[test]
    fn poses_classify_as_named() {
        let c = cfg();
        let at = |kind| classify(&HandPose::new(kind).frame(), &c);

        assert_eq!(at(PoseKind::Fist),    Classification { closed: true,  pinching: false, open: false });
        assert_eq!(at(PoseKind::Open),    Classification { closed: false, pinching: false, open: true  });
        assert_eq!(at(PoseKind::Pinch),   Classification { closed: false, pinching: true,  open: false });
        assert_eq!(at(PoseKind::Relaxed), Classification::default());
    }
}
