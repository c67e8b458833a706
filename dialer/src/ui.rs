//! UI module - egui settings panel for the rotor configuration
//!
//! Edits a raw [`RotorConfig`]; the caller applies it to the engine through
//! the clamping path and persists it.

use nannou_egui::egui;
use rotor::{RotorConfig, ANGULAR_VELOCITY_MIN, DIGIT_SEGMENT_MAX};

/// Result of settings panel interactions
#[derive(Default)]
pub struct SettingsResult {
    /// A field was edited this frame
    pub changed: bool,
    /// The reset button was clicked
    pub reset: bool,
}

/// Draw the rotor settings window. Returns what changed; the panel writes
/// directly into `config`.
pub fn draw_settings_panel(
    ctx: &egui::Context,
    config: &mut RotorConfig,
    open: &mut bool,
) -> SettingsResult {
    let mut result = SettingsResult::default();

    if !*open {
        return result;
    }

    let mut still_open = true;
    egui::Window::new("Rotor Settings")
        .collapsible(false)
        .resizable(false)
        .default_width(320.0)
        .anchor(egui::Align2::RIGHT_TOP, [-10.0, 10.0])
        .open(&mut still_open)
        .show(ctx, |ui| {
            ui.label("Return animation");
            result.changed |= ui
                .add(
                    egui::Slider::new(&mut config.angular_velocity, ANGULAR_VELOCITY_MIN..=4.0)
                        .text("speed (deg/ms)"),
                )
                .changed();

            ui.separator();
            ui.label("Pulse decoding");
            result.changed |= ui
                .add(
                    egui::Slider::new(&mut config.cock_angle_threshold, 0.0..=90.0)
                        .text("cock threshold (deg)"),
                )
                .changed();
            result.changed |= ui
                .add(
                    egui::Slider::new(&mut config.digit_segment_arc, 1.0..=DIGIT_SEGMENT_MAX)
                        .text("segment arc (deg)"),
                )
                .changed();

            // Stored in radians; degrees read better on a slider.
            let mut stop_deg = config.finger_stop_azimuth.to_degrees();
            if ui
                .add(egui::Slider::new(&mut stop_deg, 0.0..=360.0).text("finger stop (deg)"))
                .changed()
            {
                config.finger_stop_azimuth = stop_deg.to_radians();
                result.changed = true;
            }

            ui.separator();
            ui.label("Dead zones");
            result.changed |= ui
                .add(
                    egui::Slider::new(&mut config.inner_dead_zone_coeff, 0.0..=1.0)
                        .text("inner radius"),
                )
                .changed();
            result.changed |= ui
                .add(
                    egui::Slider::new(&mut config.inner_dead_zone_grip_mult, 0.0..=1.0)
                        .text("inner grip"),
                )
                .changed();
            result.changed |= ui
                .add(
                    egui::Slider::new(&mut config.outer_dead_zone_coeff, 0.0..=1.0)
                        .text("outer radius"),
                )
                .changed();

            ui.separator();
            if ui.button("Reset to defaults").clicked() {
                result.reset = true;
            }
            ui.label("Out-of-range values are clamped when applied.");
        });

    if !still_open {
        *open = false;
    }

    result
}
