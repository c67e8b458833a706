//! Rotor engine - the drag-to-rotate state machine of a disc dialer
//!
//! Models a mechanical rotary telephone dial: a drag along the disc winds
//! it up (clamped by where the press started, like a physical finger stop),
//! release lets it spring back to rest, and the dialed digit is reported on
//! the return swing once the disc drops below one digit segment, matching
//! how a real dial pulses while unwinding.
//!
//! The engine is single-threaded and cooperative: the host surface feeds it
//! an ordered touch stream plus one animation tick per redraw frame, and it
//! signals back through [`RotorHost`].

use std::f64::consts::TAU;

use crate::config::RotorConfig;
use crate::geometry::{self, Point};

/// Pulses in a full revolution; a count of 10 decodes to digit 0.
pub const MAX_PULSES: u32 = 10;

/// Phase of a touch/pointer event, in press-move-release order.
///
/// `Cancel` is handled identically to `Release`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchPhase {
    Press,
    Move,
    Release,
    Cancel,
}

/// Capabilities the engine needs from its host surface.
///
/// All callbacks run synchronously from within [`Rotor::handle_touch`] or
/// [`Rotor::animation_tick`].
pub trait RotorHost {
    /// Monotonic elapsed-time clock in milliseconds (not wall-clock).
    fn now_ms(&self) -> u64;

    /// Signal that `angle` changed and a repaint should happen before the
    /// next frame. Fire-and-forget; the host may coalesce calls.
    fn request_redraw(&mut self);

    /// A completed drag-and-return cycle decoded to a digit (0-9). Invoked
    /// at most once per cycle.
    fn on_digit(&mut self, digit: u8);
}

/// Dead-zone geometry derived from the host layout, set once per resize.
#[derive(Debug, Clone, Copy)]
struct Pivot {
    center: Point,
    radius_outer_sq: f32,
    radius_inner_sq: f32,
}

/// Transient state of one accepted drag, cleared on release.
#[derive(Debug, Clone, Copy)]
struct Drag {
    /// Last touch sample.
    touch: Point,
    /// Accumulated azimuth, unclamped. Keeps integrating past the [0, 2*PI]
    /// stops so backing off after over-rotation feels continuous.
    phi0: f64,
    /// Previous clamped azimuth; deltas against it drive the angle.
    phi1: f64,
    /// Sensitivity multiplier fixed at press time (inner dead zone).
    grip_mult: f32,
    /// Rotation ceiling for this drag, degrees. Never exceeds 360.
    max_angle: f32,
}

/// The rotor engine: one instance per dial.
///
/// Owns the disc angle, the dead-zone geometry and the gesture/animation
/// state machine. Drive it with [`handle_touch`](Self::handle_touch) and
/// one [`animation_tick`](Self::animation_tick) per frame; read
/// [`angle`](Self::angle) when rotating the disc visual.
#[derive(Debug)]
pub struct Rotor {
    /// Current rotation in degrees, in [0, 360].
    angle: f32,
    config: RotorConfig,
    pivot: Option<Pivot>,
    /// `None` while idle or after a rejected press, so orphaned move and
    /// release events are explicit no-ops.
    drag: Option<Drag>,
    /// Digit-segment estimate of the current wind-up. Survives release:
    /// the discard check fires on the return swing.
    pulses_count: u32,
    /// True while the release decay animation is running.
    debounce: bool,
    /// Decay start timestamp, milliseconds.
    t0: u64,
}

impl Default for Rotor {
    fn default() -> Self {
        Self::new()
    }
}

impl Rotor {
    pub fn new() -> Self {
        Self {
            angle: 0.0,
            config: RotorConfig::default(),
            pivot: None,
            drag: None,
            pulses_count: 0,
            debounce: false,
            t0: 0,
        }
    }

    /// Current rotation of the disc in degrees.
    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// The active (always clamped) configuration.
    pub fn config(&self) -> &RotorConfig {
        &self.config
    }

    /// Validate, clamp and replace the active configuration.
    ///
    /// Safe at any time except mid-drag. Dead-zone radii derive from the
    /// config at [`set_pivot`](Self::set_pivot) time, so hosts re-apply the
    /// pivot after changing the dead-zone coefficients.
    pub fn apply_config(&mut self, config: &RotorConfig) {
        self.config = config.clamped();
    }

    /// Set the center of rotation and derive the squared dead-zone radii.
    ///
    /// Called once per layout/resize, never mid-gesture, and always before
    /// the first touch event.
    pub fn set_pivot(&mut self, center: Point, radius: f32) {
        debug_assert!(self.drag.is_none(), "set_pivot during an active drag");
        let outer = radius * self.config.outer_dead_zone_coeff;
        let inner = radius * self.config.inner_dead_zone_coeff;
        self.pivot = Some(Pivot {
            center,
            radius_outer_sq: outer * outer,
            radius_inner_sq: inner * inner,
        });
    }

    /// Feed one touch event into the state machine.
    ///
    /// The return value matters on `Press`: `true` means the gesture was
    /// accepted and the host should route the rest of the touch stream to
    /// this control. Other phases always return `true`.
    ///
    /// # Panics
    ///
    /// Panics on `Press` if [`set_pivot`](Self::set_pivot) has never been
    /// called; that is a host-integration bug, not a runtime condition.
    pub fn handle_touch(&mut self, phase: TouchPhase, p: Point, host: &mut impl RotorHost) -> bool {
        match phase {
            TouchPhase::Press => self.on_press(p),
            TouchPhase::Move => {
                self.on_move(p, host);
                true
            }
            TouchPhase::Release | TouchPhase::Cancel => {
                self.on_release(host);
                true
            }
        }
    }

    /// Advance the release decay, if one is running. No-op otherwise.
    ///
    /// Expected once per redraw frame.
    pub fn animation_tick(&mut self, host: &mut impl RotorHost) {
        if !self.debounce {
            return;
        }
        let dt = host.now_ms().saturating_sub(self.t0);
        self.angle -= dt as f32 * self.config.angular_velocity as f32;
        if self.angle < 0.0 {
            self.angle = 0.0;
            self.debounce = false;
        }
        self.discard_pulses(host);
        host.request_redraw();
    }

    fn on_press(&mut self, p: Point) -> bool {
        let pivot = self
            .pivot
            .expect("set_pivot must be called before touch handling");

        let phi0 = geometry::azimuth(pivot.center, p) - self.config.finger_stop_azimuth;
        let d = geometry::squared_distance(pivot.center, p);
        let grip_mult = if d < pivot.radius_inner_sq {
            self.config.inner_dead_zone_grip_mult * d / pivot.radius_inner_sq
        } else {
            1.0
        };

        let accepted = d <= pivot.radius_outer_sq && grip_mult > 0.0;
        // Only an accepted press interrupts an in-flight return animation.
        // A rejected press leaves no drag behind to finish the gesture, so
        // stopping the decay here would strand the disc mid-air.
        if accepted {
            self.debounce = false;
        }
        let max_angle = self.max_angle_for(phi0);
        self.drag = accepted.then(|| Drag {
            touch: p,
            phi0,
            phi1: phi0,
            grip_mult,
            max_angle,
        });
        accepted
    }

    fn on_move(&mut self, p: Point, host: &mut impl RotorHost) {
        let Some(pivot) = self.pivot else { return };
        let Some(drag) = self.drag.as_mut() else {
            // Rejected press or spurious move: stay untracked.
            return;
        };

        let alpha = geometry::signed_arc(pivot.center, drag.touch, p);
        let phi_raw = drag.phi0 + alpha * f64::from(drag.grip_mult);
        drag.touch = p;
        drag.phi0 = phi_raw;

        let phi = phi_raw.clamp(0.0, TAU);
        let delta = phi - drag.phi1;
        drag.phi1 = phi;
        let max_angle = drag.max_angle;

        if delta != 0.0 {
            let angle_old = self.angle;
            self.angle = (self.angle + delta.to_degrees() as f32).clamp(0.0, max_angle);
            // Only winding further refines the estimate; the return swing
            // must not erode an already-cocked count.
            if delta > 0.0 {
                self.pulses_count = self.pulse_estimate();
            }
            if self.angle != angle_old {
                host.request_redraw();
            }
        }
        self.discard_pulses(host);
    }

    fn on_release(&mut self, host: &mut impl RotorHost) {
        if self.drag.take().is_none() {
            return;
        }
        self.debounce = self.angle > 0.0;
        if self.debounce {
            self.t0 = host.now_ms();
            host.request_redraw();
        }
    }

    /// Rotation ceiling for a drag that pressed at azimuth `phi0`.
    ///
    /// `theta0` is the remaining turn up to the finger stop. Presses inside
    /// the cocking threshold may use the full revolution; otherwise the
    /// ceiling is the digit-segment boundary the press falls into, scanned
    /// over at most [`MAX_PULSES`] segments.
    fn max_angle_for(&self, phi0: f64) -> f32 {
        let theta0 = (TAU - phi0).to_degrees() as f32;
        if theta0 <= self.config.cock_angle_threshold {
            return 360.0;
        }

        let mut theta = self.config.cock_angle_threshold;
        for _ in 0..MAX_PULSES {
            if theta0 < theta + self.config.digit_segment_arc {
                return theta;
            }
            theta += self.config.digit_segment_arc;
        }
        theta
    }

    /// How many digit segments the wind-up has advanced past the cocking
    /// threshold, clamped to [0, 10].
    fn pulse_estimate(&self) -> u32 {
        let raw = (self.angle - self.config.cock_angle_threshold) / self.config.digit_segment_arc;
        raw.round().clamp(0.0, MAX_PULSES as f32) as u32
    }

    /// Edge-triggered pulse dispatch on the return swing: once the disc is
    /// back within one digit segment of rest, report the count and reset.
    fn discard_pulses(&mut self, host: &mut impl RotorHost) {
        if self.pulses_count > 0 && self.angle < self.config.digit_segment_arc {
            host.on_digit((self.pulses_count % MAX_PULSES) as u8);
            self.pulses_count = 0;
        }
    }
}
