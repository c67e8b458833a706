//! Rotor - the gesture engine of a rotary disc dialer
//!
//! Turns a raw touch stream into dial rotation and decoded pulse digits:
//! pivot and dead-zone geometry, touch-to-angle integration with a per-drag
//! rotation ceiling, time-based spring-return after release, and debounced
//! single-shot digit dispatch on the return swing.
//!
//! Rendering, layout and event plumbing belong to host applications; this
//! crate only needs the capabilities of [`RotorHost`].

pub mod config;
pub mod geometry;
pub mod rotor;

pub use config::*;
pub use geometry::*;
pub use rotor::*;
