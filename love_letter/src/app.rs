//! Top-level application state.
//!
//! `AppState` owns the `GestureEngine`, the monitor-side animations, and the
//! optional `Recorder`.  It consumes `SourceMessage`s, feeds the engine, and
//! is drawn by the monitor each frame.

use std::path::PathBuf;
use std::sync::mpsc::{self, TryRecvError};
use std::time::Duration;

use hand_gesture::{
    classify, Classification, ConfigError, ControlSignal, FrameRecord, GestureConfig,
    GestureEngine, GestureEvent, HandFrame, ToggleMethod,
};
use tracing::{debug, info};

use crate::effects::{FireworkShow, PowerLamp};
use crate::error::AppError;
use crate::monitor::Monitor;
use crate::recorder::Recorder;
#[cfg(feature = "leap")]
use crate::source::LeapFrameSource;
use crate::source::{spawn_frame_source, ReplaySource, SimFrameSource, SimInput, SourceMessage};

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

/// Where landmark frames come from.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceKind {
    /// Keyboard and mouse drive a synthetic hand.
    Simulation,
    /// Play back a JSON-lines recording.
    Replay { path: PathBuf, realtime: bool },
    #[cfg(feature = "leap")]
    Leap,
}

impl SourceKind {
    pub fn label(&self) -> String {
        match self {
            SourceKind::Simulation => "simulation".to_string(),
            SourceKind::Replay { path, .. } => format!("replay {}", path.display()),
            #[cfg(feature = "leap")]
            SourceKind::Leap => "leapmotion".to_string(),
        }
    }
}

/// Configuration for the full application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub source:    SourceKind,
    pub gesture:   GestureConfig,
    /// Copy every incoming frame to this file.
    pub record_to: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            source:    SourceKind::Simulation,
            gesture:   GestureConfig::default(),
            record_to: None,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// AppState
// ════════════════════════════════════════════════════════════════════════════

pub struct AppState {
    // ── engine ───────────────────────────────────────────────────────────
    engine: GestureEngine,
    signal: ControlSignal,
    hand:   Option<HandFrame>,
    now:    Duration,

    // ── monitor animations ───────────────────────────────────────────────
    fireworks: FireworkShow,
    lamp:      PowerLamp,

    // ── recording ────────────────────────────────────────────────────────
    recorder: Option<Recorder>,

    // ── counters ─────────────────────────────────────────────────────────
    frames_seen:    usize,
    frames_skipped: usize,
    source_ended:   bool,

    pub status: String,
}

impl AppState {
    pub fn new(gesture: GestureConfig) -> Result<Self, ConfigError> {
        gesture.validate()?;
        Ok(AppState {
            engine:         GestureEngine::new(gesture),
            signal:         ControlSignal::default(),
            hand:           None,
            now:            Duration::ZERO,
            fireworks:      FireworkShow::default(),
            lamp:           PowerLamp::default(),
            recorder:       None,
            frames_seen:    0,
            frames_skipped: 0,
            source_ended:   false,
            status:         "READY - MAKE A FIST AND PULL DOWN TO POWER ON".to_string(),
        })
    }

    pub fn attach_recorder(&mut self, recorder: Recorder) {
        self.recorder = Some(recorder);
    }

    /// Process one message from the frame source.  Returns false on quit.
    pub fn handle_message(&mut self, msg: SourceMessage) -> bool {
        match msg {
            SourceMessage::Frame(record) => self.handle_frame(record),
            SourceMessage::Ended         => self.mark_source_ended(),
            SourceMessage::Quit          => return false,
        }
        true
    }

    // ── process one captured frame ───────────────────────────────────────

    pub fn handle_frame(&mut self, record: FrameRecord) {
        if let Some(recorder) = &self.recorder {
            recorder.record(record.clone());
        }
        self.frames_seen += 1;
        self.now = record.timestamp();

        self.hand = match record.landmarks().map(HandFrame::from_slice) {
            Some(Ok(frame)) => Some(frame),
            Some(Err(e)) => {
                self.frames_skipped += 1;
                debug!("frame at {} ms skipped: {}", record.t_ms, e);
                None
            }
            None => None,
        };

        self.signal = self.engine.update(self.hand.as_ref(), self.now);

        for event in self.engine.drain_events() {
            self.status = event_status(&event, &self.signal);
        }

        if self.fireworks.observe(&self.signal, self.now) {
            debug!("firework burst #{}", self.fireworks.launches);
        }
    }

    /// The source has no more frames; keep showing the last state.
    pub fn mark_source_ended(&mut self) {
        if self.source_ended { return; }
        self.source_ended = true;
        info!("source ended after {} frames ({} skipped)", self.frames_seen, self.frames_skipped);
        self.status = format!("SOURCE ENDED AFTER {} FRAMES - Q TO QUIT", self.frames_seen);
    }

    // ── per-frame tick ───────────────────────────────────────────────────

    pub fn tick(&mut self) {
        self.lamp.tick(self.signal.power);
    }

    /// Stop the recorder and report.
    pub fn finish(mut self) -> Result<(), AppError> {
        if let Some(recorder) = self.recorder.take() {
            let written = recorder.finish()?;
            info!("recorded {} frames", written);
        }
        info!(
            "session over: {} frames, {} skipped, {} fireworks",
            self.frames_seen, self.frames_skipped, self.fireworks.launches
        );
        Ok(())
    }

    // ── accessors for the render loop ────────────────────────────────────

    pub fn signal(&self)         -> &ControlSignal     { &self.signal }
    pub fn hand(&self)           -> Option<&HandFrame> { self.hand.as_ref() }
    pub fn lamp(&self)           -> PowerLamp          { self.lamp }
    pub fn frames_seen(&self)    -> usize              { self.frames_seen }
    pub fn frames_skipped(&self) -> usize              { self.frames_skipped }
    pub fn source_ended(&self)   -> bool               { self.source_ended }
    pub fn launches(&self)       -> usize              { self.fireworks.launches }

    /// Shape of the current hand, `None` when no hand is tracked.
    pub fn classification(&self) -> Option<Classification> {
        self.hand.as_ref().map(|h| classify(h, self.engine.config()))
    }

    pub fn firework_progress(&self) -> Option<f32> {
        self.fireworks.progress(self.now)
    }
}

fn event_status(event: &GestureEvent, signal: &ControlSignal) -> String {
    match event {
        GestureEvent::PowerToggled { power, method } => {
            let how = match method {
                ToggleMethod::Pull => "PULL",
                ToggleMethod::Hold => "HOLD",
            };
            format!("POWER {} ({})", if *power { "ON" } else { "OFF" }, how)
        }
        GestureEvent::MergeReleased => "MERGE RELEASED".to_string(),
        GestureEvent::FireworkLaunched => {
            format!("FIREWORKS - LOVE LEVEL {}%", signal.love_level())
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// run(): the main application loop
// ════════════════════════════════════════════════════════════════════════════

/// Run the full application.
///
/// Opens the monitor window, starts the configured frame source on its own
/// thread, and drives the message/render loop at ~60 fps.
pub fn run(cfg: AppConfig) -> Result<(), AppError> {
    let mut app = AppState::new(cfg.gesture)?;
    if let Some(path) = &cfg.record_to {
        app.attach_recorder(Recorder::create(path)?);
    }

    // ── Frame source ──────────────────────────────────────────────────────
    let (sim_tx, sim_rx) = mpsc::channel::<SimInput>();
    info!("frame source: {}", cfg.source.label());
    let frames = match cfg.source {
        SourceKind::Simulation => spawn_frame_source(SimFrameSource::new(sim_rx)),
        SourceKind::Replay { path, realtime } => {
            spawn_frame_source(ReplaySource::load(&path, realtime)?)
        }
        #[cfg(feature = "leap")]
        SourceKind::Leap => spawn_frame_source(LeapFrameSource),
    };

    // ── Monitor (owns the window and the sim input sender) ───────────────
    let mut monitor = Monitor::new(sim_tx)?;

    // ── Main loop ─────────────────────────────────────────────────────────
    'frames: while monitor.is_open() {
        if !monitor.poll_input() { break; }

        loop {
            match frames.try_recv() {
                Ok(msg) => {
                    if !app.handle_message(msg) { break 'frames; }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    app.mark_source_ended();
                    break;
                }
            }
        }

        app.tick();
        monitor.render(&app);
    }

    app.finish()
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
