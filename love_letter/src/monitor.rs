//! Software-rendered signal monitor using `minifb`.
//!
//! Layout:
//!
//! ```text
//! ┌──────────────────────────────────────────┬───────────────────┐
//! │  CAMERA VIEW                             │  POWER   (lamp)   │
//! │                                          │                   │
//! │     landmark skeleton                    │  LOVE LEVEL  62%  │
//! │            + rotation crosshair          │  [██████░░░░]     │
//! │                                          │  MERGED           │
//! │                                          │                   │
//! │                                          │  FIREWORKS (ring) │
//! │                                          │  HAND / FRAMES    │
//! ├──────────────────────────────────────────┴───────────────────┤
//! │  status bar                                                  │
//! │  key legend                                                  │
//! └──────────────────────────────────────────────────────────────┘
//! ```

use std::sync::mpsc::Sender;
use std::time::Duration;

use hand_gesture::{Classification, Landmark, PoseKind, HAND_SKELETON};
use minifb::{Key, KeyRepeat, MouseMode, Window, WindowOptions};

use crate::app::AppState;
use crate::error::AppError;
use crate::source::SimInput;

// ════════════════════════════════════════════════════════════════════════════
// Layout constants
// ════════════════════════════════════════════════════════════════════════════

pub const WIN_W:    usize = 960;
pub const WIN_H:    usize = 540;
const CAM_X:        usize = 10;
const CAM_Y:        usize = 10;
const CAM_W:        usize = 620;
const CAM_H:        usize = 465;
const PANEL_X:      usize = CAM_X + CAM_W + 10;
const PANEL_W:      usize = WIN_W - PANEL_X - 10;
const STATUS_Y:     usize = WIN_H - 50;
const BG_COLOR:     u32   = 0xFF1A1A2E;
const CAM_BG:       u32   = 0xFF10101E;
const PANEL_BG:     u32   = 0xFF16213E;
const TEXT_BG:      u32   = 0xFF0F3460;
const LAMP_OFF:     u32   = 0xFF3A3A4A;
const LAMP_ON:      u32   = 0xFFFF6F91;  // rose
const LOVE_LOW:     u32   = 0xFFFFB3C6;
const LOVE_HIGH:    u32   = 0xFFE0114A;
const MERGED_COLOR: u32   = 0xFFFFD700;  // gold
const BONE_COLOR:   u32   = 0xFF7FDBFF;
const JOINT_COLOR:  u32   = 0xFFFFFFFF;
const CROSS_COLOR:  u32   = 0xFF2ECC71;

/// Palm movement per frame while an arrow key is held.
const NUDGE_STEP: f32 = 0.005;

// ════════════════════════════════════════════════════════════════════════════
// Canvas: the framebuffer and its drawing primitives
// ════════════════════════════════════════════════════════════════════════════

pub struct Canvas {
    buf: Vec<u32>,
}

impl Default for Canvas {
    fn default() -> Self {
        Canvas { buf: vec![BG_COLOR; WIN_W * WIN_H] }
    }
}

impl Canvas {
    pub fn pixels(&self) -> &[u32] { &self.buf }

    pub fn pixel(&self, x: usize, y: usize) -> Option<u32> {
        (x < WIN_W && y < WIN_H).then(|| self.buf[y * WIN_W + x])
    }

    fn clear(&mut self, color: u32) {
        self.buf.fill(color);
    }

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for row in y..(y + h).min(WIN_H) {
            for col in x..(x + w).min(WIN_W) {
                self.buf[row * WIN_W + col] = color;
            }
        }
    }

    fn draw_border(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        if w == 0 || h == 0 { return; }
        for col in x..(x + w).min(WIN_W) {
            self.set_pixel(col, y, color);
            self.set_pixel(col, y + h - 1, color);
        }
        for row in y..(y + h).min(WIN_H) {
            self.set_pixel(x, row, color);
            self.set_pixel(x + w - 1, row, color);
        }
    }

    fn set_pixel(&mut self, x: usize, y: usize, color: u32) {
        if x < WIN_W && y < WIN_H {
            self.buf[y * WIN_W + x] = color;
        }
    }

    fn set_pixel_signed(&mut self, x: isize, y: isize, color: u32) {
        if x >= 0 && y >= 0 {
            self.set_pixel(x as usize, y as usize, color);
        }
    }

    /// Bresenham line between two pixel positions.
    fn draw_line(&mut self, from: (usize, usize), to: (usize, usize), color: u32) {
        let (mut x, mut y) = (from.0 as isize, from.1 as isize);
        let (x1, y1) = (to.0 as isize, to.1 as isize);
        let dx = (x1 - x).abs();
        let dy = -(y1 - y).abs();
        let sx = if x < x1 { 1 } else { -1 };
        let sy = if y < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.set_pixel_signed(x, y, color);
            if x == x1 && y == y1 { break; }
            let e2 = 2 * err;
            if e2 >= dy { err += dy; x += sx; }
            if e2 <= dx { err += dx; y += sy; }
        }
    }

    fn fill_circle(&mut self, cx: usize, cy: usize, r: usize, color: u32) {
        let r = r as isize;
        for dy in -r..=r {
            for dx in -r..=r {
                if dx * dx + dy * dy <= r * r {
                    self.set_pixel_signed(cx as isize + dx, cy as isize + dy, color);
                }
            }
        }
    }

    fn draw_ring(&mut self, cx: usize, cy: usize, r: usize, color: u32) {
        let r = r as isize;
        let (outer, inner) = (r * r, (r - 2).max(0).pow(2));
        for dy in -r..=r {
            for dx in -r..=r {
                let d = dx * dx + dy * dy;
                if d <= outer && d >= inner {
                    self.set_pixel_signed(cx as isize + dx, cy as isize + dy, color);
                }
            }
        }
    }

    /// Minimal bitmap font: 3×5 characters, 1 px gap.
    fn draw_label(&mut self, text: &str, x: usize, y: usize, color: u32) {
        let mut cx = x;
        for ch in text.chars() {
            let glyph = char_glyph(ch);
            for (row, &bits) in glyph.iter().enumerate() {
                for col in 0..3usize {
                    if bits & (1 << (2 - col)) != 0 {
                        self.set_pixel(cx + col, y + row, color);
                    }
                }
            }
            cx += 4;
            if cx + 4 > WIN_W { break; }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Monitor
// ════════════════════════════════════════════════════════════════════════════

pub struct Monitor {
    window: Window,
    canvas: Canvas,
    sim_tx: Sender<SimInput>,

    // Last values sent, so only changes go over the channel.
    last_pose:  PoseKind,
    last_mouse: Option<(f32, f32)>,
}

impl Monitor {
    pub fn new(sim_tx: Sender<SimInput>) -> Result<Self, AppError> {
        let mut window = Window::new(
            "Love Letter - Gesture Signal Monitor",
            WIN_W, WIN_H,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        )?;

        window.limit_update_rate(Some(Duration::from_millis(16))); // ~60fps

        Ok(Monitor {
            window,
            canvas: Canvas::default(),
            sim_tx,
            last_pose: PoseKind::Relaxed,
            last_mouse: None,
        })
    }

    pub fn is_open(&self) -> bool { self.window.is_open() }

    /// Poll keyboard and mouse, translate to `SimInput`.  Returns false when
    /// the user asked to quit.
    pub fn poll_input(&mut self) -> bool {
        if !self.window.is_open() { return false; }

        if self.window.is_key_pressed(Key::Q, KeyRepeat::No)
            || self.window.is_key_pressed(Key::Escape, KeyRepeat::No)
        {
            let _ = self.sim_tx.send(SimInput::Quit);
            return false;
        }

        if self.window.is_key_pressed(Key::H, KeyRepeat::No) {
            let _ = self.sim_tx.send(SimInput::ToggleHand);
        }

        // ── held pose keys ────────────────────────────────────────────────
        let pose = pose_from_keys(
            self.window.is_key_down(Key::F),
            self.window.is_key_down(Key::P),
            self.window.is_key_down(Key::O),
        );
        if pose != self.last_pose {
            self.last_pose = pose;
            let _ = self.sim_tx.send(SimInput::Pose(pose));
        }

        // ── arrows nudge the palm ─────────────────────────────────────────
        let axis = |neg: bool, pos: bool| match (neg, pos) {
            (true, false) => -NUDGE_STEP,
            (false, true) => NUDGE_STEP,
            _ => 0.0,
        };
        let dx = axis(self.window.is_key_down(Key::Left), self.window.is_key_down(Key::Right));
        let dy = axis(self.window.is_key_down(Key::Up), self.window.is_key_down(Key::Down));
        if dx != 0.0 || dy != 0.0 {
            let _ = self.sim_tx.send(SimInput::Nudge { dx, dy });
        }

        // ── mouse inside the camera view places the palm ──────────────────
        if let Some(anchor) = self.window.get_mouse_pos(MouseMode::Discard)
            .and_then(|(mx, my)| mouse_to_anchor(mx, my))
        {
            if self.last_mouse != Some(anchor) {
                self.last_mouse = Some(anchor);
                let _ = self.sim_tx.send(SimInput::Anchor { x: anchor.0, y: anchor.1 });
            }
        }

        true
    }

    /// Render one frame.
    pub fn render(&mut self, app: &AppState) {
        paint(&mut self.canvas, app);
        self.window.update_with_buffer(self.canvas.pixels(), WIN_W, WIN_H).ok();
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Painting
// ════════════════════════════════════════════════════════════════════════════

/// Draw the whole monitor for the current app state.
pub fn paint(canvas: &mut Canvas, app: &AppState) {
    canvas.clear(BG_COLOR);
    paint_camera(canvas, app);
    paint_panel(canvas, app);

    // ── Status bar ────────────────────────────────────────────────────────
    canvas.fill_rect(0, STATUS_Y, WIN_W, WIN_H - STATUS_Y, TEXT_BG);
    canvas.draw_label(&app.status, 10, STATUS_Y + 12, 0xFFEEEEEE);

    // ── Key legend ────────────────────────────────────────────────────────
    canvas.draw_label(
        "hold F=fist  P=pinch  O=open   H=hide hand   arrows/mouse=move palm   Q=quit",
        10, WIN_H - 16, 0xFF888888,
    );
}

fn paint_camera(canvas: &mut Canvas, app: &AppState) {
    canvas.fill_rect(CAM_X, CAM_Y, CAM_W, CAM_H, CAM_BG);
    canvas.draw_border(CAM_X, CAM_Y, CAM_W, CAM_H, 0xFF333355);
    canvas.draw_label("CAMERA", CAM_X + 6, CAM_Y + 6, 0xFF666688);

    // ── Rotation crosshair ────────────────────────────────────────────────
    let rot = app.signal().rotation;
    let cx = CAM_X + ((rot.x + 1.0) * 0.5 * (CAM_W - 1) as f32) as usize;
    let cy = CAM_Y + ((rot.y + 1.0) * 0.5 * (CAM_H - 1) as f32) as usize;
    canvas.draw_line((cx.saturating_sub(8), cy), (cx + 8, cy), CROSS_COLOR);
    canvas.draw_line((cx, cy.saturating_sub(8)), (cx, cy + 8), CROSS_COLOR);
    canvas.draw_label(
        &format!("ROT {:+.2} {:+.2}", rot.x, rot.y),
        CAM_X + 6, CAM_Y + CAM_H - 12, CROSS_COLOR,
    );

    // ── Landmark skeleton ─────────────────────────────────────────────────
    let Some(hand) = app.hand() else {
        canvas.draw_label("NO HAND", CAM_X + CAM_W / 2 - 14, CAM_Y + CAM_H / 2, 0xFF888888);
        return;
    };
    let points = hand.landmarks().map(|lm| to_camera_px(&lm));
    let bone = blend(BONE_COLOR, LAMP_ON, app.lamp().level);
    for &(a, b) in HAND_SKELETON.iter() {
        if let (Some(pa), Some(pb)) = (points[a], points[b]) {
            canvas.draw_line(pa, pb, bone);
        }
    }
    for p in points.iter().flatten() {
        canvas.fill_circle(p.0, p.1, 2, JOINT_COLOR);
    }
}

fn paint_panel(canvas: &mut Canvas, app: &AppState) {
    let x = PANEL_X;
    canvas.fill_rect(x, CAM_Y, PANEL_W, CAM_H, PANEL_BG);

    // ── Power lamp ────────────────────────────────────────────────────────
    let lamp = app.lamp().level;
    canvas.draw_label("POWER", x + 10, CAM_Y + 14, 0xFFAADDFF);
    canvas.fill_circle(x + PANEL_W - 40, CAM_Y + 20, 14, blend(LAMP_OFF, LAMP_ON, lamp));
    canvas.draw_label(
        if app.signal().power { "ON" } else { "OFF" },
        x + 10, CAM_Y + 26, 0xFFEEEEEE,
    );

    // ── Love level bar ────────────────────────────────────────────────────
    let signal = app.signal();
    let bar_y = CAM_Y + 70;
    let bar_w = PANEL_W - 20;
    canvas.draw_label(&format!("LOVE LEVEL {}%", signal.love_level()), x + 10, bar_y, 0xFFFFBBAA);
    canvas.fill_rect(x + 10, bar_y + 10, bar_w, 16, LAMP_OFF);
    let filled = (signal.pinch_factor * bar_w as f32) as usize;
    canvas.fill_rect(x + 10, bar_y + 10, filled, 16, blend(LOVE_LOW, LOVE_HIGH, signal.pinch_factor));
    canvas.draw_border(x + 10, bar_y + 10, bar_w, 16, 0xFF000000);
    if signal.is_merged() {
        canvas.fill_rect(x + 10, bar_y + 34, 40, 11, MERGED_COLOR);
        canvas.draw_label("MERGED", x + 13, bar_y + 37, 0xFF000000);
    }

    // ── Firework burst ────────────────────────────────────────────────────
    let fw_y = CAM_Y + 160;
    canvas.draw_label(&format!("FIREWORKS {}", app.launches()), x + 10, fw_y, 0xFFFFD700);
    if let Some(p) = app.firework_progress() {
        let (cx, cy) = (x + PANEL_W / 2, fw_y + 80);
        let color = blend(MERGED_COLOR, PANEL_BG, p);
        canvas.draw_ring(cx, cy, 6 + (p * 60.0) as usize, color);
        canvas.draw_ring(cx, cy, 3 + (p * 35.0) as usize, blend(LAMP_ON, PANEL_BG, p));
    }

    // ── Hand and frame counters ───────────────────────────────────────────
    let info_y = CAM_Y + CAM_H - 40;
    canvas.draw_label(&format!("HAND {}", hand_label(app.classification())), x + 10, info_y, 0xFFEEEEEE);
    canvas.draw_label(
        &format!("FRAMES {}  SKIPPED {}", app.frames_seen(), app.frames_skipped()),
        x + 10, info_y + 12, 0xFF888888,
    );
    if app.source_ended() {
        canvas.draw_label("SOURCE ENDED", x + 10, info_y + 24, 0xFFFF8888);
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Pure helpers
// ────────────────────────────────────────────────────────────────────────────

/// Held pose keys, fist winning over pinch over open.
fn pose_from_keys(fist: bool, pinch: bool, open: bool) -> PoseKind {
    if fist { PoseKind::Fist }
    else if pinch { PoseKind::Pinch }
    else if open { PoseKind::Open }
    else { PoseKind::Relaxed }
}

/// Window pixel → normalized image position, `None` outside the camera view.
fn mouse_to_anchor(mx: f32, my: f32) -> Option<(f32, f32)> {
    let x = (mx - CAM_X as f32) / CAM_W as f32;
    let y = (my - CAM_Y as f32) / CAM_H as f32;
    ((0.0..=1.0).contains(&x) && (0.0..=1.0).contains(&y)).then_some((x, y))
}

/// Normalized landmark → camera-view pixel, `None` when it falls outside.
fn to_camera_px(lm: &Landmark) -> Option<(usize, usize)> {
    if !(0.0..=1.0).contains(&lm.x) || !(0.0..=1.0).contains(&lm.y) {
        return None;
    }
    Some((
        CAM_X + (lm.x * (CAM_W - 1) as f32) as usize,
        CAM_Y + (lm.y * (CAM_H - 1) as f32) as usize,
    ))
}

fn hand_label(shape: Option<Classification>) -> &'static str {
    match shape {
        None                                        => "NONE",
        Some(Classification { closed: true, .. })   => "FIST",
        Some(Classification { pinching: true, .. }) => "PINCH",
        Some(Classification { open: true, .. })     => "OPEN",
        Some(_)                                     => "RELAXED",
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Minimal 3×5 bitmap font
// ────────────────────────────────────────────────────────────────────────────

fn char_glyph(c: char) -> [u8; 5] {
    match c {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'a' | 'A' => [0b111, 0b101, 0b111, 0b101, 0b101],
        'b' | 'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'c' | 'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'd' | 'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'e' | 'E' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'f' | 'F' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'g' | 'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'h' | 'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'i' | 'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'j' | 'J' => [0b001, 0b001, 0b001, 0b101, 0b111],
        'k' | 'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'l' | 'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'm' | 'M' => [0b101, 0b111, 0b101, 0b101, 0b101],
        'n' | 'N' => [0b111, 0b101, 0b101, 0b101, 0b101],
        'o' | 'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'p' | 'P' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'q' | 'Q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'r' | 'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        's' | 'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        't' | 'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'u' | 'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'v' | 'V' => [0b101, 0b101, 0b101, 0b010, 0b010],
        'w' | 'W' => [0b101, 0b101, 0b101, 0b111, 0b101],
        'x' | 'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'y' | 'Y' => [0b101, 0b101, 0b111, 0b010, 0b010],
        'z' | 'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        '+' => [0b000, 0b010, 0b111, 0b010, 0b000],
        '%' => [0b101, 0b001, 0b010, 0b100, 0b101],
        '(' => [0b010, 0b100, 0b100, 0b100, 0b010],
        ')' => [0b010, 0b001, 0b001, 0b001, 0b010],
        '#' => [0b101, 0b111, 0b101, 0b111, 0b101],
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        _   => [0b000, 0b000, 0b010, 0b000, 0b000], // fallback dot
    }
}

/// Alpha-blend two ARGB colors. `t` = 0.0 → all `a`, `t` = 1.0 → all `b`.
fn blend(a: u32, b: u32, t: f32) -> u32 {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let lerp = |ca: u32, cb: u32| (ca as f32 * (1.0 - t) + cb as f32 * t) as u32;
    let ar = (a >> 16) & 0xFF; let br = (b >> 16) & 0xFF;
    let ag = (a >>  8) & 0xFF; let bg = (b >>  8) & 0xFF;
    let ab =  a        & 0xFF; let bb =  b        & 0xFF;
    0xFF000000 | (lerp(ar, br) << 16) | (lerp(ag, bg) << 8) | lerp(ab, bb)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
