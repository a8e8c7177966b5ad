//! Walks the engine through each gesture with synthetic poses.

use std::time::Duration;

use hand_gesture::{ControlSignal, GestureEngine, HandPose, PoseKind};

fn show(label: &str, t: u64, s: &ControlSignal) {
    println!(
        "   t={:>5}ms  {:<22} power={:<5} merge={:>3}%  firework={:<5} rot=({:+.2},{:+.2})",
        t, label, s.power, s.love_level(), s.firework_trigger, s.rotation.x, s.rotation.y
    );
}

fn main() {
    println!("\n=== Gesture Engine Demo ===\n");
    let ms = Duration::from_millis;

    // ── 1. Fist pull toggles power ───────────────────────────────────────
    println!("1. Fist, then pull the palm down");
    let mut engine = GestureEngine::default();
    let fist = HandPose::new(PoseKind::Fist);
    show("fist", 0, &engine.update(Some(&fist.frame()), ms(0)));
    show("fist pulled 0.07", 100, &engine.update(Some(&fist.translated(0.0, 0.07).frame()), ms(100)));
    println!("   events: {:?}\n", engine.drain_events());

    // ── 2. Fist hold toggles power ───────────────────────────────────────
    println!("2. Fist held still");
    let mut engine = GestureEngine::default();
    for t in (0..=900).step_by(150) {
        show("fist hold", t, &engine.update(Some(&fist.frame()), ms(t)));
    }
    println!("   events: {:?}\n", engine.drain_events());

    // ── 3. Pinch ramps, release is sticky ────────────────────────────────
    println!("3. Pinch for 32 ticks, then let go");
    let mut engine = GestureEngine::default();
    let pinch = HandPose::new(PoseKind::Pinch).frame();
    let relaxed = HandPose::new(PoseKind::Relaxed).frame();
    let mut t = 0;
    for _ in 0..32 {
        t += 33;
        engine.update(Some(&pinch), ms(t));
    }
    show("after 32 pinch ticks", t, &engine.signal());
    for dt in [33, 1500, 2999, 3033] {
        show("released", t + dt, &engine.update(Some(&relaxed), ms(t + dt)));
    }
    println!("   events: {:?}\n", engine.drain_events());

    // ── 4. Open hand fireworks, rate limited ─────────────────────────────
    println!("4. Open hand every second");
    let mut engine = GestureEngine::default();
    let open = HandPose::new(PoseKind::Open).frame();
    for t in (0..=7000).step_by(1000) {
        show("open", t, &engine.update(Some(&open), ms(t)));
    }
    println!("   events: {:?}\n", engine.drain_events());

    // ── 5. Rotation follows the index fingertip ──────────────────────────
    println!("5. Point around the frame");
    let mut engine = GestureEngine::default();
    for (i, (x, y)) in [(0.2, 0.3), (0.5, 0.5), (0.8, 0.7)].into_iter().enumerate() {
        let hand = HandPose::at(PoseKind::Relaxed, x, y).frame();
        let t = i as u64 * 33;
        show("relaxed", t, &engine.update(Some(&hand), ms(t)));
    }
    println!();
}
