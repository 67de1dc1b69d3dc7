//! Control-request dispatcher.
//!
//! Answers the HID class requests the host sends on endpoint 0 and the
//! two vendor requests that switch the indicator LED. Every handler runs
//! in a few instructions; unknown requests get a zero-length answer.
//!
//! Setup packet layout (8 bytes, little-endian):
//! ```text
//! Byte 0:   bmRequestType (bits 6..5 = type: 0 standard, 1 class, 2 vendor)
//! Byte 1:   bRequest
//! Byte 2-3: wValue
//! Byte 4-5: wIndex
//! Byte 6-7: wLength
//! ```

use crate::config::{VENDOR_INDICATOR_OFF, VENDOR_INDICATOR_ON};
use crate::error::Error;
use crate::hid::ReportSource;
use embedded_hal::digital::OutputPin;

/// HID class request: GET_REPORT.
pub const HID_GET_REPORT: u8 = 0x01;
/// HID class request: GET_IDLE.
pub const HID_GET_IDLE: u8 = 0x02;
/// HID class request: SET_IDLE.
pub const HID_SET_IDLE: u8 = 0x0A;

/// Length of a USB setup packet.
pub const SETUP_PACKET_SIZE: usize = 8;

/// Idle rate unit defined by HID (ms).
const IDLE_RATE_UNIT_MS: u32 = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RequestKind {
    Standard,
    Class,
    Vendor,
    Reserved,
}

impl From<u8> for RequestKind {
    /// Decode the type bits of `bmRequestType`.
    fn from(bm_request_type: u8) -> Self {
        match (bm_request_type >> 5) & 0x03 {
            0 => RequestKind::Standard,
            1 => RequestKind::Class,
            2 => RequestKind::Vendor,
            _ => RequestKind::Reserved,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SetupRequest {
    pub kind: RequestKind,
    pub request: u8,
    pub value: u16,
    pub index: u16,
    pub length: u16,
}

impl SetupRequest {
    pub const fn new(kind: RequestKind, request: u8, value: u16) -> Self {
        Self {
            kind,
            request,
            value,
            index: 0,
            length: 0,
        }
    }

    /// Decode a raw setup packet.
    pub fn parse(data: &[u8]) -> Result<Self, Error> {
        if data.len() < SETUP_PACKET_SIZE {
            return Err(Error::ShortSetupPacket(data.len()));
        }
        Ok(Self {
            kind: RequestKind::from(data[0]),
            request: data[1],
            value: u16::from_le_bytes([data[2], data[3]]),
            index: u16::from_le_bytes([data[4], data[5]]),
            length: u16::from_le_bytes([data[6], data[7]]),
        })
    }

    /// High byte of `wValue` (idle duration for SET_IDLE).
    pub fn value_high(&self) -> u8 {
        (self.value >> 8) as u8
    }
}

/// Flags the host can change through control requests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceMode {
    pub indicator: bool,
    /// HID idle rate in 4 ms units; 0 = only report on change.
    pub idle_rate: u8,
}

impl DeviceMode {
    /// Interval after which the current report must be repeated.
    pub fn idle_interval_ms(&self) -> Option<u32> {
        match self.idle_rate {
            0 => None,
            rate => Some(idle_ms_from_rate(rate)),
        }
    }
}

/// Idle rate byte for a duration in milliseconds.
///
/// `u32::MAX` is how embassy-usb spells "indefinite" (a SET_IDLE of 0) and
/// maps back to 0. Durations past 1020 ms saturate at 255.
pub const fn idle_rate_from_ms(duration_ms: u32) -> u8 {
    if duration_ms == u32::MAX {
        return 0;
    }
    let rate = duration_ms / IDLE_RATE_UNIT_MS;
    if rate > u8::MAX as u32 {
        u8::MAX
    } else {
        rate as u8
    }
}

/// Duration in milliseconds for an idle rate byte; 0 stays 0.
pub const fn idle_ms_from_rate(rate: u8) -> u32 {
    rate as u32 * IDLE_RATE_UNIT_MS
}

/// Routes setup requests to report delivery or device-mode changes.
pub struct Dispatcher<P> {
    mode: DeviceMode,
    indicator: P,
}

impl<P: OutputPin> Dispatcher<P> {
    pub fn new(indicator: P) -> Self {
        Self {
            mode: DeviceMode::default(),
            indicator,
        }
    }

    /// Handle one setup request; any payload is written into `response`.
    ///
    /// Returns the number of payload bytes. Unknown requests, and payloads
    /// that do not fit `response`, answer with zero bytes.
    pub fn on_setup_request<R: ReportSource>(
        &mut self,
        request: &SetupRequest,
        reports: &R,
        response: &mut [u8],
    ) -> usize {
        match (request.kind, request.request) {
            (RequestKind::Class, HID_GET_REPORT) => {
                // Single report type; wValue is not inspected.
                reports.current_frame().serialize(response)
            }
            (RequestKind::Class, HID_GET_IDLE) => match response.first_mut() {
                Some(byte) => {
                    *byte = self.mode.idle_rate;
                    1
                }
                None => 0,
            },
            (RequestKind::Class, HID_SET_IDLE) => {
                self.mode.idle_rate = request.value_high();
                0
            }
            (RequestKind::Vendor, VENDOR_INDICATOR_ON) => {
                self.set_indicator(true);
                0
            }
            (RequestKind::Vendor, VENDOR_INDICATOR_OFF) => {
                self.set_indicator(false);
                0
            }
            _ => 0,
        }
    }

    fn set_indicator(&mut self, on: bool) {
        self.mode.indicator = on;
        let _ = if on {
            self.indicator.set_high()
        } else {
            self.indicator.set_low()
        };
    }

    pub fn mode(&self) -> DeviceMode {
        self.mode
    }
}
