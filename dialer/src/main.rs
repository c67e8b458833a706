//! Disc Dialer
//!
//! A rotary telephone dial: drag the disc clockwise, release, and the
//! decoded digit is appended to the number readout while the disc springs
//! back to rest. The gesture physics and pulse decoding live in the
//! `rotor` crate; this app is the host surface that renders the dial and
//! forwards input.

mod drawing;
mod ui;

use std::time::Instant;

use nannou::prelude::*;
use nannou_egui::{self, Egui};
use rotor::{Rotor, RotorConfig, RotorHost, TouchPhase};
use serde::{Deserialize, Serialize};

use crate::drawing::{
    colors, draw_background, draw_digit_preview, draw_disc, draw_foreground,
    draw_number_readout, DigitPreview, Layout,
};
use crate::ui::draw_settings_panel;

const DIALER_NAME: &str = "disc_dialer";

fn main() {
    nannou::app(model).update(update).run();
}

/// Persisted configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
struct Config {
    rotor: RotorConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            // Stored pre-clamped so what the settings panel shows matches
            // what the engine runs.
            rotor: RotorConfig::default().clamped(),
        }
    }
}

/// Bridges the rotor's host capabilities onto this app.
struct SurfaceHost {
    started: Instant,
    /// Digits dispatched by the rotor since the last drain.
    digits: Vec<u8>,
}

impl SurfaceHost {
    fn new() -> Self {
        Self {
            started: Instant::now(),
            digits: Vec::new(),
        }
    }

    fn take_digits(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.digits)
    }
}

impl RotorHost for SurfaceHost {
    fn now_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    fn request_redraw(&mut self) {
        // nannou redraws every frame; nothing to coalesce.
    }

    fn on_digit(&mut self, digit: u8) {
        self.digits.push(digit);
    }
}

/// Application state
struct Model {
    /// The gesture engine
    rotor: Rotor,
    /// Clock, redraw and pulse sink for the engine
    host: SurfaceHost,
    /// Raw config as edited by the settings panel
    config: RotorConfig,
    /// Digits dialed so far
    number: String,
    /// Fading preview of the most recent digit
    preview: Option<DigitPreview>,
    /// True while an accepted drag owns the pointer stream
    tracking: bool,
    /// Settings window visibility
    settings_open: bool,
    /// egui integration
    egui: Egui,
}

/// The engine keeps the original dial's screen-style y-down orientation;
/// flip y at the boundary so clockwise drags wind the dial.
fn dial_point(p: Point2) -> rotor::Point {
    rotor::pt(p.x, -p.y)
}

fn apply_pivot(model: &mut Model, window_rect: Rect) {
    let layout = Layout::calculate(window_rect);
    model
        .rotor
        .set_pivot(dial_point(layout.dial.xy()), layout.dial.w() / 2.0);
}

fn save_config(model: &Model) {
    let config = Config {
        rotor: model.config,
    };
    if let Err(e) = rotor::save_config(DIALER_NAME, &config) {
        eprintln!("Failed to save config: {}", e);
    }
}

fn model(app: &App) -> Model {
    // Create window
    let window_id = app
        .new_window()
        .title("Disc Dialer")
        .size(600, 720)
        .view(view)
        .mouse_pressed(mouse_pressed)
        .mouse_moved(mouse_moved)
        .mouse_released(mouse_released)
        .key_pressed(key_pressed)
        .resized(resized)
        .raw_event(raw_window_event)
        .build()
        .unwrap();

    let window = app.window(window_id).unwrap();
    let egui = Egui::from_window(&window);

    // Load configuration
    let config: Config = rotor::load_config(DIALER_NAME)
        .ok()
        .flatten()
        .unwrap_or_default();

    let mut rotor = Rotor::new();
    rotor.apply_config(&config.rotor);

    let mut model = Model {
        rotor,
        host: SurfaceHost::new(),
        config: config.rotor,
        number: String::new(),
        preview: None,
        tracking: false,
        settings_open: false,
        egui,
    };
    apply_pivot(&mut model, app.window_rect());
    model
}

fn update(app: &App, model: &mut Model, update: Update) {
    // Advance a pending release decay
    model.rotor.animation_tick(&mut model.host);

    // Collect digits decoded since the last frame
    for digit in model.host.take_digits() {
        model.number.push(char::from(b'0' + digit));
        model.preview = Some(DigitPreview::new(digit));
    }

    // Drop an expired preview
    if model.preview.as_ref().is_some_and(|p| p.alpha().is_none()) {
        model.preview = None;
    }

    // Settings panel
    model.egui.set_elapsed_time(update.since_start);
    let ctx = model.egui.begin_frame();
    let result = draw_settings_panel(&ctx, &mut model.config, &mut model.settings_open);
    drop(ctx);

    if result.reset {
        model.config = RotorConfig::default().clamped();
    }
    if (result.changed || result.reset) && !model.tracking {
        model.rotor.apply_config(&model.config);
        // Dead-zone radii derive from the config at pivot time.
        apply_pivot(model, app.window_rect());
        save_config(model);
    }
}

fn view(app: &App, model: &Model, frame: Frame) {
    let draw = app.draw();
    let window_rect = app.window_rect();

    draw.background().color(colors::BACKGROUND);

    let layout = Layout::calculate(window_rect);
    draw_background(&draw, layout.dial);
    draw_disc(&draw, layout.dial, model.rotor.angle());
    draw_foreground(&draw, layout.dial);
    draw_number_readout(&draw, &model.number, layout.readout);

    if let Some(preview) = &model.preview {
        draw_digit_preview(&draw, preview, layout.dial);
    }

    draw.to_frame(app, &frame).unwrap();
    model.egui.draw_to_frame(&frame).unwrap();
}

fn mouse_pressed(app: &App, model: &mut Model, button: MouseButton) {
    if button != MouseButton::Left || model.settings_open {
        return;
    }
    let p = dial_point(app.mouse.position());
    model.tracking = model
        .rotor
        .handle_touch(TouchPhase::Press, p, &mut model.host);
}

fn mouse_moved(_app: &App, model: &mut Model, pos: Point2) {
    if model.tracking {
        model
            .rotor
            .handle_touch(TouchPhase::Move, dial_point(pos), &mut model.host);
    }
}

fn mouse_released(app: &App, model: &mut Model, button: MouseButton) {
    if button == MouseButton::Left && model.tracking {
        let p = dial_point(app.mouse.position());
        model
            .rotor
            .handle_touch(TouchPhase::Release, p, &mut model.host);
        model.tracking = false;
    }
}

fn key_pressed(_app: &App, model: &mut Model, key: Key) {
    match key {
        // S toggles the settings panel
        Key::S => {
            if !model.tracking {
                model.settings_open = !model.settings_open;
            }
        }
        // Escape closes it
        Key::Escape => {
            model.settings_open = false;
        }
        // C clears the dialed number, Backspace drops the last digit
        Key::C => {
            model.number.clear();
        }
        Key::Back => {
            model.number.pop();
        }
        _ => {}
    }
}

fn resized(app: &App, model: &mut Model, _dim: Vec2) {
    // A resize mid-drag would move the pivot under the finger; the next
    // layout pass after release re-syncs it.
    if !model.tracking {
        apply_pivot(model, app.window_rect());
    }
}

fn raw_window_event(app: &App, model: &mut Model, event: &nannou::winit::event::WindowEvent) {
    // Let egui handle raw events for keyboard and mouse input
    model.egui.handle_raw_event(event);

    // Forward real touch input alongside the mouse mapping
    if let nannou::winit::event::WindowEvent::Touch(touch) = event {
        let window_rect = app.window_rect();

        // Convert touch position to nannou coordinates
        let pos_x = touch.location.x as f32 - window_rect.w() / 2.0;
        let pos_y = window_rect.h() / 2.0 - touch.location.y as f32;
        let p = dial_point(pt2(pos_x, pos_y));

        match touch.phase {
            nannou::winit::event::TouchPhase::Started => {
                if !model.settings_open {
                    model.tracking = model
                        .rotor
                        .handle_touch(TouchPhase::Press, p, &mut model.host);
                }
            }
            nannou::winit::event::TouchPhase::Moved => {
                if model.tracking {
                    model
                        .rotor
                        .handle_touch(TouchPhase::Move, p, &mut model.host);
                }
            }
            nannou::winit::event::TouchPhase::Ended => {
                if model.tracking {
                    model
                        .rotor
                        .handle_touch(TouchPhase::Release, p, &mut model.host);
                    model.tracking = false;
                }
            }
            nannou::winit::event::TouchPhase::Cancelled => {
                if model.tracking {
                    model
                        .rotor
                        .handle_touch(TouchPhase::Cancel, p, &mut model.host);
                    model.tracking = false;
                }
            }
        }
    }
}
