//! Host-testable library for the foot-switch firmware.
//!
//! Everything here is pure logic: debouncing, HID report sequencing,
//! oscillator calibration and control-request dispatch. Hardware access
//! only happens through `embedded-hal` pins and the small traits in
//! `pedal::clock` and `calibration`.
//!
//! Usage: `cargo test --lib`
//!
//! Note: The embedded binary uses main.rs with #![no_std] and #![no_main]
//! and is only built with `--features embedded`.

#![cfg_attr(not(test), no_std)]

pub mod calibration;
pub mod config;
pub mod control;
pub mod error;
pub mod hid;
pub mod pedal;
pub mod shared;
pub mod switch;

pub use error::Error;
pub use switch::FootSwitch;

// ═══════════════════════════════════════════════════════════════════════════
// Poll-loop scenarios
// ═══════════════════════════════════════════════════════════════════════════
