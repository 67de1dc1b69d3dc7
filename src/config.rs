//! Application-wide constants and compile-time configuration.
//!
//! All hardware pin assignments, timing parameters, and protocol
//! constants live here so they can be tuned in one place.

use crate::error::Error;
use crate::hid::report::{modifier, ReportLayout};

// Debounce timing

/// Debounce timer overflows per second (16.5 MHz / 1024 / 256 on the
/// reference board, emulated from `embassy-time` on the nRF52840).
pub const TIMER_OVERFLOW_HZ: u32 = 63;

/// Period of one emulated timer overflow (µs).
pub const TIMER_OVERFLOW_PERIOD_US: u64 = 1_000_000 / TIMER_OVERFLOW_HZ as u64;

/// Overflows per debounce window. 3 / 63 Hz ≈ 48 ms.
pub const DEBOUNCE_TICKS: u8 = 3;

/// Main loop period (µs). Well below one overflow so no tick is missed.
pub const POLL_INTERVAL_US: u64 = 500;

// Oscillator calibration

/// Core clock used to derive the target USB frame length (Hz).
pub const CALIBRATION_CORE_HZ: u32 = 64_000_000;

/// Upper bound on busy-wait iterations while waiting for one SOF.
pub const FRAME_MEASURE_SPIN_LIMIT: u32 = 200_000;

// USB

/// USB VID/PID - use the "pid.codes" open-source test VID.
/// Replace with your own allocated VID/PID for production.
pub const USB_VID: u16 = 0x1209;
pub const USB_PID: u16 = 0x0002;

/// USB device strings.
pub const USB_MANUFACTURER: &str = "foot-switch";
pub const USB_PRODUCT: &str = "USB Foot Pedal";
pub const USB_SERIAL_NUMBER: &str = "000001";

/// USB HID interrupt endpoint polling interval (ms).
pub const USB_HID_POLL_MS: u8 = 10;

/// How long one endpoint write may wait for the host before the loop
/// moves on and retries on the next iteration (ms).
pub const USB_WRITE_WINDOW_MS: u64 = 2;

/// Vendor request: switch the indicator LED on.
pub const VENDOR_INDICATOR_ON: u8 = 1;
/// Vendor request: switch the indicator LED off.
pub const VENDOR_INDICATOR_OFF: u8 = 0;

// GPIO pin assignments (nRF52840-DK defaults)
//
// These are logical names; the concrete `embassy_nrf::peripherals::*`
// are picked in `main.rs`.
//
//   Pedal switch   → P0.11 (active-low, internal pull-up)
//   Indicator LED  → P0.06

// Watchdog

/// Watchdog timeout in 32.768 kHz ticks (1 s).
pub const WATCHDOG_TIMEOUT_TICKS: u32 = 32_768;

/// How a button transition is turned into report frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChordStyle {
    /// Modifier stays down for as long as the pedal is held.
    Hold,
    /// Press sends the chord immediately followed by a release frame.
    Tap,
}

/// Runtime configuration of the pedal's report behaviour.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FootSwitchConfig {
    pub layout: ReportLayout,
    /// Modifier bitfield sent while pressed.
    pub modifier: u8,
    /// Keycode byte for the 2-byte layout (0 = modifier only).
    pub keycode: u8,
    pub chord_style: ChordStyle,
    pub debounce_ticks: u8,
}

impl FootSwitchConfig {
    /// Right GUI on the 2-byte layout, held while the pedal is down.
    pub const fn new() -> Self {
        Self {
            layout: ReportLayout::ModifierKey,
            modifier: modifier::RIGHT_GUI,
            keycode: 0,
            chord_style: ChordStyle::Hold,
            debounce_ticks: DEBOUNCE_TICKS,
        }
    }

    pub const fn with_layout(mut self, layout: ReportLayout) -> Self {
        self.layout = layout;
        self
    }

    pub const fn with_modifier(mut self, modifier: u8) -> Self {
        self.modifier = modifier;
        self
    }

    pub const fn with_keycode(mut self, keycode: u8) -> Self {
        self.keycode = keycode;
        self
    }

    pub const fn with_chord_style(mut self, style: ChordStyle) -> Self {
        self.chord_style = style;
        self
    }

    pub const fn with_debounce_ticks(mut self, ticks: u8) -> Self {
        self.debounce_ticks = ticks;
        self
    }

    /// Reject combinations the sequencer cannot honour.
    pub fn validate(&self) -> Result<(), Error> {
        if self.debounce_ticks == 0 {
            return Err(Error::InvalidDebounceTicks);
        }
        if self.chord_style == ChordStyle::Tap && self.layout.sequence_len() < 2 {
            return Err(Error::TapNeedsTwoFrames);
        }
        Ok(())
    }
}

/// Configuration the firmware is built with.
pub const PEDAL: FootSwitchConfig = FootSwitchConfig::new();

impl Default for FootSwitchConfig {
    fn default() -> Self {
        Self::new()
    }
}
