//! love_letter: interactive entry point.
//!
//! Flags: `--quick` (defaults, simulation), `--replay FILE`, `--fast`
//! (replay without pacing), `--record FILE`.

use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use hand_gesture::GestureConfig;
use love_letter::app::{run, AppConfig, SourceKind};

fn main() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "love_letter=info,hand_gesture=info".into()),
        )
        .init();

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║        Love Letter — Hand Gesture Signal Controller          ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    #[cfg(feature = "leap")]
    println!("  LeapMotion hardware available");
    #[cfg(not(feature = "leap"))]
    println!("  Keyboard simulation  (use --features leap for hardware)");
    println!();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let cfg = match config_from_args(&args) {
        Some(cfg) => cfg,
        None => configure_interactively(),
    };

    println!();
    println!("  Source: {}", cfg.source.label());
    println!("  Opening monitor window…");
    println!();

    if let Err(e) = run(cfg) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Non-interactive configuration, when any flag asks for it.
fn config_from_args(args: &[String]) -> Option<AppConfig> {
    let value_of = |flag: &str| {
        args.iter().position(|a| a == flag)
            .and_then(|i| args.get(i + 1))
            .map(PathBuf::from)
    };
    let replay = value_of("--replay");
    let record_to = value_of("--record");
    let quick = args.iter().any(|a| a == "--quick");

    if !quick && replay.is_none() && record_to.is_none() {
        return None;
    }

    let source = match replay {
        Some(path) => SourceKind::Replay {
            path,
            realtime: !args.iter().any(|a| a == "--fast"),
        },
        None => SourceKind::Simulation,
    };
    Some(AppConfig { source, record_to, ..AppConfig::default() })
}

fn configure_interactively() -> AppConfig {
    let source = pick_source();

    let record_to = {
        let path = read_line("  Record frames to (blank = no recording): ");
        let path = path.trim();
        (!path.is_empty()).then(|| PathBuf::from(path))
    };

    println!("  Gesture thresholds (blank keeps the default):");
    let defaults = GestureConfig::default();
    let gesture = GestureConfig {
        hold_duration:       read_millis("    Fist hold ms", defaults.hold_duration, 100, 5000),
        toggle_cooldown:     read_millis("    Power cooldown ms", defaults.toggle_cooldown, 100, 5000),
        pinch_distance:      read_line(&format!("    Pinch distance (default {}): ", defaults.pinch_distance))
            .trim().parse::<f32>().ok()
            .filter(|d| d.is_finite())
            .map_or(defaults.pinch_distance, |d| d.clamp(0.01, 0.3)),
        firework_cooldown:   read_millis("    Firework cooldown ms", defaults.firework_cooldown, 500, 20000),
        merge_release_delay: read_millis("    Merge release ms", defaults.merge_release_delay, 100, 20000),
        ..defaults
    };

    AppConfig { source, gesture, record_to }
}

fn pick_source() -> SourceKind {
    println!("  Frame source:");
    #[cfg(feature = "leap")]
    println!("    1.Simulation  2.Replay a recording  3.LeapMotion");
    #[cfg(not(feature = "leap"))]
    println!("    1.Simulation  2.Replay a recording");

    match read_line("  Choice (default 1): ").trim() {
        "2" => loop {
            let path = read_line("    Recording file: ");
            let path = path.trim();
            if path.is_empty() {
                println!("    ⚠  a path is required.");
                continue;
            }
            let fast = read_line("    Real-time pacing? (Y/n): ").trim().eq_ignore_ascii_case("n");
            break SourceKind::Replay { path: PathBuf::from(path), realtime: !fast };
        },
        #[cfg(feature = "leap")]
        "3" => SourceKind::Leap,
        _ => SourceKind::Simulation,
    }
}

fn read_millis(prompt: &str, default: Duration, min: u64, max: u64) -> Duration {
    let ms = read_line(&format!("{} (default {}): ", prompt, default.as_millis()))
        .trim().parse::<u64>()
        .map_or(default.as_millis() as u64, |v| v.clamp(min, max));
    Duration::from_millis(ms)
}

fn read_line(prompt: &str) -> String {
    print!("{}", prompt);
    io::stdout().flush().ok();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn no_flags_means_interactive() {
        assert!(config_from_args(&args(&[])).is_none());
    }

    #[test]
    fn quick_is_default_simulation() {
        let cfg = config_from_args(&args(&["--quick"])).unwrap();
        assert_eq!(cfg.source, SourceKind::Simulation);
        assert_eq!(cfg.gesture, GestureConfig::default());
        assert_eq!(cfg.record_to, None);
    }

    #[test]
    fn replay_and_record_flags() {
        let cfg = config_from_args(&args(&["--replay", "a.jsonl", "--fast", "--record", "b.jsonl"])).unwrap();
        assert_eq!(cfg.source, SourceKind::Replay { path: "a.jsonl".into(), realtime: false });
        assert_eq!(cfg.record_to, Some(PathBuf::from("b.jsonl")));
    }
}
