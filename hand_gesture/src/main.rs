//! gesture_replay: run a landmark recording through the engine.
//!
//! Usage: `gesture_replay [FILE]` (stdin when FILE is absent or `-`).
//! Prints one JSON line per tick to stdout: `{t_ms, signal, events}`.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};

use hand_gesture::{
    read_recording, ControlSignal, GestureEngine, GestureEvent, RecordingError,
};
use serde::Serialize;
use tracing::warn;

#[derive(Serialize)]
struct TickOutput<'a> {
    t_ms:   u64,
    signal: ControlSignal,
    events: &'a [GestureEvent],
}

#[derive(Default)]
struct Summary {
    ticks:     usize,
    toggles:   usize,
    fireworks: usize,
    releases:  usize,
    skipped:   usize,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hand_gesture=warn,gesture_replay=info".into()),
        )
        .init();

    let input: Box<dyn BufRead> = match std::env::args().nth(1).as_deref() {
        None | Some("-") => Box::new(BufReader::new(io::stdin())),
        Some(path) => match File::open(path) {
            Ok(f)  => Box::new(BufReader::new(f)),
            Err(e) => {
                eprintln!("Error: cannot open {}: {}", path, e);
                std::process::exit(1);
            }
        },
    };

    match replay(input, BufWriter::new(io::stdout().lock())) {
        Ok(s) => {
            eprintln!();
            eprintln!("  ticks      : {}", s.ticks);
            eprintln!("  toggles    : {}", s.toggles);
            eprintln!("  fireworks  : {}", s.fireworks);
            eprintln!("  releases   : {}", s.releases);
            eprintln!("  bad lines  : {}", s.skipped);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn replay<R: BufRead, W: Write>(input: R, mut out: W) -> Result<Summary, RecordingError> {
    let mut engine = GestureEngine::default();
    let mut summary = Summary::default();

    for record in read_recording(input) {
        let record = match record {
            Ok(r) => r,
            Err(RecordingError::Parse { line, source }) => {
                warn!("line {}: {}", line, source);
                summary.skipped += 1;
                continue;
            }
            Err(e) => return Err(e),
        };

        let signal = engine.update_raw(record.landmarks(), record.timestamp());
        let events = engine.drain_events();
        for e in &events {
            match e {
                GestureEvent::PowerToggled { .. } => summary.toggles += 1,
                GestureEvent::FireworkLaunched    => summary.fireworks += 1,
                GestureEvent::MergeReleased       => summary.releases += 1,
            }
        }
        summary.ticks += 1;

        serde_json::to_writer(&mut out, &TickOutput { t_ms: record.t_ms, signal, events: &events })?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(summary)
}
