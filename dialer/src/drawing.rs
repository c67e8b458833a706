//! Drawing module - dial plate, rotating disc and readout rendering
//!
//! Renders the disc dialer visual elements using nannou's Draw API. The
//! rotor engine works in screen-style y-down coordinates, so a positive
//! engine angle is a clockwise rotation here (nannou is y-up).

use std::time::Instant;

use nannou::prelude::*;

/// Nannou-space angle of the finger stop, degrees (lower right).
pub const FINGER_STOP_DEG: f32 = -65.0;

/// Nannou-space angle of the digit-1 hole, degrees. The remaining holes
/// step counterclockwise from here, ending with 0 just above the stop.
const FIRST_HOLE_DEG: f32 = 60.0;

/// Angular spacing between adjacent finger holes, degrees.
const HOLE_STEP_DEG: f32 = 30.0;

/// A briefly shown digit after a pulse is decoded
pub struct DigitPreview {
    pub digit: u8,
    pub created_at: Instant,
}

impl DigitPreview {
    pub const DURATION_SECS: f32 = 1.2;

    pub fn new(digit: u8) -> Self {
        Self {
            digit,
            created_at: Instant::now(),
        }
    }

    /// Current fade alpha, or `None` once the preview has expired.
    pub fn alpha(&self) -> Option<u8> {
        let progress = self.created_at.elapsed().as_secs_f32() / Self::DURATION_SECS;
        if progress >= 1.0 {
            return None;
        }
        // Hold fully opaque, then fade over the last 40%.
        let alpha = if progress < 0.6 {
            1.0
        } else {
            1.0 - (progress - 0.6) / 0.4
        };
        Some((alpha * 255.0) as u8)
    }
}

/// Color palette for the dialer theme
pub mod colors {
    use nannou::prelude::*;

    pub const BACKGROUND: Srgb<u8> = Srgb {
        red: 24,
        green: 24,
        blue: 28,
        standard: std::marker::PhantomData,
    };
    pub const PLATE: Srgb<u8> = Srgb {
        red: 42,
        green: 44,
        blue: 50,
        standard: std::marker::PhantomData,
    };
    pub const DISC: Srgb<u8> = Srgb {
        red: 64,
        green: 68,
        blue: 78,
        standard: std::marker::PhantomData,
    };
    pub const HOLE: Srgb<u8> = Srgb {
        red: 20,
        green: 20,
        blue: 24,
        standard: std::marker::PhantomData,
    };
    pub const TEXT_PRIMARY: Srgb<u8> = Srgb {
        red: 235,
        green: 235,
        blue: 235,
        standard: std::marker::PhantomData,
    };
    pub const TEXT_SECONDARY: Srgb<u8> = Srgb {
        red: 150,
        green: 150,
        blue: 155,
        standard: std::marker::PhantomData,
    };
    pub const ACCENT: Srgb<u8> = Srgb {
        red: 255,
        green: 170,
        blue: 40,
        standard: std::marker::PhantomData,
    };
    pub const RING: Srgb<u8> = Srgb {
        red: 100,
        green: 104,
        blue: 114,
        standard: std::marker::PhantomData,
    };
}

/// Digit printed at hole index `k` (0-based, walking counterclockwise
/// from the finger stop).
fn hole_digit(k: usize) -> u8 {
    if k == 9 {
        0
    } else {
        (k + 1) as u8
    }
}

/// Nannou-space angle of hole `k` for the given disc rotation.
fn hole_angle(k: usize, angle_deg: f32) -> f32 {
    (FIRST_HOLE_DEG + k as f32 * HOLE_STEP_DEG - angle_deg).to_radians()
}

/// Draw the static plate behind the disc
pub fn draw_background(draw: &Draw, dial: Rect) {
    let center = dial.xy();
    let radius = dial.w() / 2.0;

    draw.ellipse()
        .xy(center)
        .radius(radius)
        .color(colors::PLATE);

    draw_ring(draw, center, radius, 2.0, colors::RING);
}

/// Draw the rotating disc with its finger holes and digits
pub fn draw_disc(draw: &Draw, dial: Rect, angle_deg: f32) {
    let center = dial.xy();
    let radius = dial.w() / 2.0;
    let disc_radius = radius * 0.92;
    let hole_orbit = radius * 0.72;
    let hole_radius = radius * 0.105;

    draw.ellipse()
        .xy(center)
        .radius(disc_radius)
        .color(colors::DISC);

    for k in 0..10 {
        let theta = hole_angle(k, angle_deg);
        let pos = center + vec2(theta.cos(), theta.sin()) * hole_orbit;

        draw.ellipse()
            .xy(pos)
            .radius(hole_radius)
            .color(colors::HOLE);

        draw.text(&hole_digit(k).to_string())
            .xy(pos)
            .color(colors::TEXT_PRIMARY)
            .font_size((hole_radius * 1.1) as u32)
            .w(hole_radius * 2.0);
    }
}

/// Draw the fixed foreground: center cap and finger stop
pub fn draw_foreground(draw: &Draw, dial: Rect) {
    let center = dial.xy();
    let radius = dial.w() / 2.0;

    // Center cap
    draw.ellipse()
        .xy(center)
        .radius(radius * 0.22)
        .color(colors::PLATE);
    draw_ring(draw, center, radius * 0.22, 1.5, colors::RING);

    // Finger stop bar
    let theta = FINGER_STOP_DEG.to_radians();
    let dir = vec2(theta.cos(), theta.sin());
    draw.line()
        .start(center + dir * radius * 0.58)
        .end(center + dir * radius * 0.98)
        .weight(radius * 0.05)
        .color(colors::ACCENT);
}

/// Draw the dialed-number readout strip
pub fn draw_number_readout(draw: &Draw, number: &str, rect: Rect) {
    draw.rect()
        .xy(rect.xy())
        .wh(rect.wh())
        .color(srgba(
            colors::PLATE.red,
            colors::PLATE.green,
            colors::PLATE.blue,
            180u8,
        ));

    if number.is_empty() {
        draw.text("Drag the dial  ·  C clears  ·  S settings")
            .xy(rect.xy())
            .color(colors::TEXT_SECONDARY)
            .font_size(16)
            .w(rect.w() - 20.0);
        return;
    }

    // Keep the tail visible when the number outgrows the strip.
    let shown: String = number
        .chars()
        .rev()
        .take(18)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();

    draw.text(&shown)
        .xy(rect.xy())
        .color(colors::TEXT_PRIMARY)
        .font_size(30)
        .w(rect.w() - 20.0);
}

/// Draw the fading preview of the digit that was just decoded
pub fn draw_digit_preview(draw: &Draw, preview: &DigitPreview, dial: Rect) {
    let Some(alpha) = preview.alpha() else { return };

    draw.text(&preview.digit.to_string())
        .xy(dial.xy() + vec2(0.0, dial.h() * 0.02))
        .color(srgba(
            colors::ACCENT.red,
            colors::ACCENT.green,
            colors::ACCENT.blue,
            alpha,
        ))
        .font_size((dial.w() * 0.14) as u32)
        .w(dial.w());
}

/// Draw a ring (circle outline) using line segments
fn draw_ring(draw: &Draw, center: Point2, radius: f32, weight: f32, color: Srgb<u8>) {
    let segments = 120;
    let points: Vec<Point2> = (0..=segments)
        .map(|i| {
            let angle = (i as f32 / segments as f32) * TAU;
            center + vec2(angle.cos(), angle.sin()) * radius
        })
        .collect();

    draw.polyline().weight(weight).color(color).points(points);
}

/// Layout rectangles: readout strip on top, square dial area below
pub struct Layout {
    pub readout: Rect,
    pub dial: Rect,
}

impl Layout {
    pub fn calculate(window_rect: Rect) -> Self {
        let padding = 16.0;
        let readout_height = 64.0;
        let inner = window_rect.pad(padding);

        let readout = Rect::from_x_y_w_h(
            inner.x(),
            inner.top() - readout_height / 2.0,
            inner.w(),
            readout_height,
        );

        let dial_area_h = inner.h() - readout_height - padding;
        let side = inner.w().min(dial_area_h);
        let dial = Rect::from_x_y_w_h(
            inner.x(),
            inner.bottom() + dial_area_h / 2.0,
            side,
            side,
        );

        Layout { readout, dial }
    }
}
