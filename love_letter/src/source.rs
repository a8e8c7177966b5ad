//! Landmark sources: simulation, recording replay, and LeapMotion hardware.
//!
//! Every source runs on its own thread and delivers [`SourceMessage`]s over
//! a `mpsc` channel.  Each source stamps frames with its own monotonic
//! clock; the app hands those stamps straight to the engine.

use std::path::Path;
use std::fs::File;
use std::io::BufReader;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use hand_gesture::{read_recording, FrameRecord, HandPose, PoseKind, RecordingError};
use tracing::{debug, info, warn};

// ════════════════════════════════════════════════════════════════════════════
// SourceMessage
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq)]
pub enum SourceMessage {
    /// One capture tick, hand or no hand.
    Frame(FrameRecord),
    /// The source has nothing more to deliver (end of a recording).
    Ended,
    /// The user asked to quit from the source side.
    Quit,
}

// ════════════════════════════════════════════════════════════════════════════
// FrameSource trait: unified interface for hw, sim and replay
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can deliver hand frames over a channel.
pub trait FrameSource: Send + 'static {
    fn run(self: Box<Self>, tx: Sender<SourceMessage>);
}

/// Spawn a frame source on its own thread and return the receiving end.
pub fn spawn_frame_source<S: FrameSource>(source: S) -> Receiver<SourceMessage> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || Box::new(source).run(tx));
    rx
}

fn millis_since(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

// ════════════════════════════════════════════════════════════════════════════
// SimFrameSource: keyboard/mouse simulation (always available)
// ════════════════════════════════════════════════════════════════════════════

/// Raw input event from the monitor window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SimInput {
    /// Shape to hold from now on.
    Pose(PoseKind),
    /// Move the palm to a normalized image position.
    Anchor { x: f32, y: f32 },
    /// Move the palm by a normalized offset.
    Nudge { dx: f32, dy: f32 },
    /// Show or hide the hand (hidden = "no hand detected").
    ToggleHand,
    Quit,
}

/// Synthesizes a hand at camera cadence from [`SimInput`] events sent by
/// the monitor window.
pub struct SimFrameSource {
    pub rx:       Receiver<SimInput>,
    /// Capture period; 33 ms ≈ 30 fps webcam.
    pub interval: Duration,
}

impl SimFrameSource {
    pub fn new(rx: Receiver<SimInput>) -> Self {
        SimFrameSource { rx, interval: Duration::from_millis(33) }
    }
}

/// The simulated hand between ticks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimHand {
    pub pose:    HandPose,
    pub visible: bool,
}

impl Default for SimHand {
    fn default() -> Self {
        SimHand { pose: HandPose::new(PoseKind::Relaxed), visible: true }
    }
}

impl SimHand {
    /// Apply one input.  Returns false on quit.
    pub fn apply(&mut self, input: SimInput) -> bool {
        match input {
            SimInput::Pose(kind)       => self.pose = self.pose.with_kind(kind),
            SimInput::Anchor { x, y }  => self.pose = HandPose::at(self.pose.kind, x, y),
            SimInput::Nudge { dx, dy } => self.pose = self.pose.translated(dx, dy),
            SimInput::ToggleHand       => self.visible = !self.visible,
            SimInput::Quit             => return false,
        }
        true
    }

    pub fn capture(&self, t_ms: u64) -> FrameRecord {
        let frame = self.pose.frame();
        FrameRecord::new(t_ms, self.visible.then_some(&frame))
    }
}

impl FrameSource for SimFrameSource {
    fn run(self: Box<Self>, tx: Sender<SourceMessage>) {
        let start = Instant::now();
        let mut hand = SimHand::default();

        loop {
            // ── drain inputs ──────────────────────────────────────────────
            loop {
                match self.rx.try_recv() {
                    Ok(input) => {
                        if !hand.apply(input) {
                            let _ = tx.send(SourceMessage::Quit);
                            return;
                        }
                    }
                    Err(TryRecvError::Empty)        => break,
                    Err(TryRecvError::Disconnected) => return,
                }
            }

            if tx.send(SourceMessage::Frame(hand.capture(millis_since(start)))).is_err() {
                return;
            }
            thread::sleep(self.interval);
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// ReplaySource: a recorded session
// ════════════════════════════════════════════════════════════════════════════

/// Plays back a recording, optionally at its original pace.
pub struct ReplaySource {
    records:  Vec<FrameRecord>,
    realtime: bool,
}

impl ReplaySource {
    pub fn new(records: Vec<FrameRecord>, realtime: bool) -> Self {
        ReplaySource { records, realtime }
    }

    /// Load a whole JSON-lines recording; the first bad line is an error.
    pub fn load(path: &Path, realtime: bool) -> Result<Self, RecordingError> {
        let file = File::open(path)?;
        let records = read_recording(BufReader::new(file)).collect::<Result<Vec<_>, _>>()?;
        let source = Self::new(records, realtime);
        if source.is_empty() {
            warn!("{} holds no frames", path.display());
        } else {
            info!("loaded {} frames from {}", source.len(), path.display());
        }
        Ok(source)
    }

    pub fn len(&self) -> usize { self.records.len() }
    pub fn is_empty(&self) -> bool { self.records.is_empty() }
}

impl FrameSource for ReplaySource {
    fn run(self: Box<Self>, tx: Sender<SourceMessage>) {
        let ReplaySource { records, realtime } = *self;
        let start = Instant::now();
        let first = records.first().map_or(0, |r| r.t_ms);

        for record in records {
            if realtime {
                let due = Duration::from_millis(record.t_ms.saturating_sub(first));
                let elapsed = start.elapsed();
                if due > elapsed {
                    thread::sleep(due - elapsed);
                }
            }
            if tx.send(SourceMessage::Frame(record)).is_err() {
                return;
            }
        }
        debug!("replay finished");
        let _ = tx.send(SourceMessage::Ended);
    }
}

// ════════════════════════════════════════════════════════════════════════════
// LeapFrameSource: real hardware (feature = "leap")
// ════════════════════════════════════════════════════════════════════════════

// Leap interaction space mapped onto the image: x ±150 mm, y 100–400 mm
// above the device (image y grows downward), z ±150 mm.
#[cfg(any(feature = "leap", test))]
const LEAP_HALF_WIDTH_MM: f32 = 150.0;
#[cfg(any(feature = "leap", test))]
const LEAP_FLOOR_MM: f32 = 100.0;
#[cfg(any(feature = "leap", test))]
const LEAP_SPAN_MM: f32 = 300.0;

/// Millimetres in Leap space → normalized image landmark.
#[cfg(any(feature = "leap", test))]
fn leap_to_image(x: f32, y: f32, z: f32) -> hand_gesture::Landmark {
    hand_gesture::Landmark::new(
        (x + LEAP_HALF_WIDTH_MM) / LEAP_SPAN_MM,
        1.0 - (y - LEAP_FLOOR_MM) / LEAP_SPAN_MM,
        z / LEAP_SPAN_MM,
    )
}

/// Frame source backed by a real LeapMotion controller.
///
/// Requires the `leap` feature flag and the LeapC shared library installed.
/// Only the first tracked hand is used.  Each digit contributes its four
/// joints in knuckle-to-tip order, which lines up with the 21-point
/// topology (thumb 1–4, index 5–8, …); the wrist is the base of the middle
/// metacarpal.
#[cfg(feature = "leap")]
pub struct LeapFrameSource;

#[cfg(feature = "leap")]
impl FrameSource for LeapFrameSource {
    fn run(self: Box<Self>, tx: Sender<SourceMessage>) {
        use leaprs::*;
        use tracing::error;

        let mut connection = match Connection::create(ConnectionConfig::default()) {
            Ok(c)  => c,
            Err(e) => {
                error!("failed to create LeapC connection: {:?}", e);
                let _ = tx.send(SourceMessage::Ended);
                return;
            }
        };
        if let Err(e) = connection.open() {
            error!("failed to open LeapMotion device: {:?}", e);
            let _ = tx.send(SourceMessage::Ended);
            return;
        }

        let start = Instant::now();
        loop {
            let msg = match connection.poll(100) {
                Ok(m)  => m,
                Err(_) => continue,
            };

            if let Event::Tracking(frame) = msg.event() {
                let hands: Vec<_> = frame.hands().collect();
                let landmarks = hands.first().and_then(|h| leap_landmarks(h));
                let record = FrameRecord { t_ms: millis_since(start), landmarks };
                if tx.send(SourceMessage::Frame(record)).is_err() {
                    return;
                }
            }
        }
    }
}

#[cfg(feature = "leap")]
fn leap_landmarks(hand: &leaprs::Hand) -> Option<Vec<hand_gesture::Landmark>> {
    let digits: Vec<_> = hand.digits().collect();
    if digits.len() < 5 { return None; }

    let wrist = digits[2].metacarpal().prev_joint();
    let mut out = Vec::with_capacity(hand_gesture::LANDMARK_COUNT);
    out.push(leap_to_image(wrist.x, wrist.y, wrist.z));

    for digit in &digits {
        let joints = [
            digit.proximal().prev_joint(),
            digit.intermediate().prev_joint(),
            digit.distal().prev_joint(),
            digit.distal().next_joint(),
        ];
        out.extend(joints.iter().map(|j| leap_to_image(j.x, j.y, j.z)));
    }
    Some(out)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sim_hand_follows_inputs() {
        let mut hand = SimHand::default();
        assert!(hand.apply(SimInput::Pose(PoseKind::Fist)));
        assert!(hand.apply(SimInput::Anchor { x: 0.3, y: 0.4 }));
        assert!(hand.apply(SimInput::Nudge { dx: 0.0, dy: 0.1 }));
        assert_eq!(hand.pose.kind, PoseKind::Fist);
        assert!((hand.pose.anchor_x - 0.3).abs() < 1e-6);
        assert!((hand.pose.anchor_y - 0.5).abs() < 1e-6);
        assert!(!hand.apply(SimInput::Quit));
    }

    #[test]
    fn hidden_sim_hand_captures_no_landmarks() {
        let mut hand = SimHand::default();
        assert_eq!(hand.capture(10).landmarks().map(<[_]>::len), Some(21));
        hand.apply(SimInput::ToggleHand);
        let record = hand.capture(20);
        assert_eq!(record.t_ms, 20);
        assert_eq!(record.landmarks(), None);
    }

    #[test]
    fn sim_source_emits_frames_until_quit() {
        let (sim_tx, sim_rx) = mpsc::channel();
        let source = SimFrameSource { rx: sim_rx, interval: Duration::from_millis(1) };
        let frames = spawn_frame_source(source);

        sim_tx.send(SimInput::Pose(PoseKind::Open)).unwrap();
        let mut saw_frame = false;
        let mut saw_quit = false;
        for msg in frames.iter() {
            match msg {
                SourceMessage::Frame(_) if !saw_frame => {
                    saw_frame = true;
                    sim_tx.send(SimInput::Quit).unwrap();
                }
                SourceMessage::Quit => { saw_quit = true; break; }
                _ => {}
            }
        }
        assert!(saw_frame && saw_quit);
    }

    #[test]
    fn replay_delivers_in_order_then_ends() {
        let records: Vec<_> = (0..5).map(|i| FrameRecord::new(i * 33, None)).collect();
        let rx = spawn_frame_source(ReplaySource::new(records.clone(), false));
        let got: Vec<_> = rx.iter().collect();

        let mut expected: Vec<_> = records.into_iter().map(SourceMessage::Frame).collect();
        expected.push(SourceMessage::Ended);
        assert_eq!(got, expected);
    }

    #[test]
    fn load_reads_a_recording_file() {
        let path = std::env::temp_dir().join(format!("love_letter_replay_{}.jsonl", std::process::id()));
        std::fs::write(&path, "{\"t_ms\":0}\n\n{\"t_ms\":33,\"landmarks\":null}\n").unwrap();
        let source = ReplaySource::load(&path, false).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(source.len(), 2);
        assert!(!source.is_empty());

        let empty = ReplaySource::new(Vec::new(), false);
        assert!(empty.is_empty());
    }

    #[test]
    fn empty_replay_just_ends() {
        let rx = spawn_frame_source(ReplaySource::new(Vec::new(), true));
        assert_eq!(rx.iter().collect::<Vec<_>>(), vec![SourceMessage::Ended]);
    }

    #[test]
    fn leap_space_maps_onto_image() {
        let centre = leap_to_image(0.0, 250.0, 0.0);
        assert!((centre.x - 0.5).abs() < 1e-6);
        assert!((centre.y - 0.5).abs() < 1e-6);

        // Higher above the device is higher in the image (smaller y).
        let high = leap_to_image(0.0, 380.0, 0.0);
        assert!(high.y < centre.y);

        let left = leap_to_image(-150.0, 100.0, 0.0);
        assert!(left.x.abs() < 1e-6);
        assert!((left.y - 1.0).abs() < 1e-6);
    }
}
