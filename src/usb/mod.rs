//! USB Device subsystem - presents the pedal as a HID keyboard.
//!
//! The nRF52840's built-in USB 2.0 Full-Speed controller is driven by
//! `embassy-usb`. One HID interface carries the pedal report; its class
//! requests (GET_REPORT, GET_IDLE, SET_IDLE) and the vendor indicator
//! requests all go through the library's `Dispatcher`.
//!
//! A bus reset triggers oscillator calibration; the main loop waits for
//! its result before it services the pedal.

pub mod hid_device;
