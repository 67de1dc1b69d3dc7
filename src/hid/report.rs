//! USB HID keyboard report frames for the pedal.
//!
//! Two layouts exist, both conforming to a static report descriptor:
//! ```text
//! ModifierOnly (1 byte):
//!   Byte 0: Modifier keys (bitfield)
//!
//! ModifierKey (2 bytes):
//!   Byte 0: Modifier keys (bitfield)
//!   Byte 1: Key code (USB HID usage code, 0 = none)
//!
//! Modifier bits:
//!   Bit 0 = Left Ctrl,  Bit 1 = Left Shift,
//!   Bit 2 = Left Alt,   Bit 3 = Left GUI,
//!   Bit 4 = Right Ctrl, Bit 5 = Right Shift,
//!   Bit 6 = Right Alt,  Bit 7 = Right GUI
//! ```

use crate::error::Error;

/// Widest frame any layout produces.
pub const MAX_REPORT_SIZE: usize = 2;

/// Modifier bit masks for byte 0.
pub mod modifier {
    pub const LEFT_CTRL: u8 = 1 << 0;
    pub const LEFT_SHIFT: u8 = 1 << 1;
    pub const LEFT_ALT: u8 = 1 << 2;
    pub const LEFT_GUI: u8 = 1 << 3;
    pub const RIGHT_CTRL: u8 = 1 << 4;
    pub const RIGHT_SHIFT: u8 = 1 << 5;
    pub const RIGHT_ALT: u8 = 1 << 6;
    pub const RIGHT_GUI: u8 = 1 << 7;
}

/// Report layout, fixed by the descriptor the device enumerates with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReportLayout {
    /// 1-byte modifier-only report, one frame per transition.
    ModifierOnly,
    /// 2-byte modifier + keycode report, two frames per transition.
    ModifierKey,
}

impl ReportLayout {
    pub fn from_width(width: u8) -> Result<Self, Error> {
        match width {
            1 => Ok(ReportLayout::ModifierOnly),
            2 => Ok(ReportLayout::ModifierKey),
            other => Err(Error::InvalidReportWidth(other)),
        }
    }

    /// Report size in bytes.
    pub const fn width(self) -> usize {
        match self {
            ReportLayout::ModifierOnly => 1,
            ReportLayout::ModifierKey => 2,
        }
    }

    /// Frames sent per button transition.
    pub const fn sequence_len(self) -> usize {
        match self {
            ReportLayout::ModifierOnly => 1,
            ReportLayout::ModifierKey => 2,
        }
    }

    pub const fn descriptor(self) -> &'static [u8] {
        match self {
            ReportLayout::ModifierOnly => MODIFIER_REPORT_DESCRIPTOR,
            ReportLayout::ModifierKey => MODIFIER_KEY_REPORT_DESCRIPTOR,
        }
    }
}

/// One HID input report, sized for its layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HidReportFrame {
    bytes: [u8; MAX_REPORT_SIZE],
    len: u8,
}

impl HidReportFrame {
    /// Frame with the given modifier bits (and keycode, where the layout has one).
    pub const fn chord(layout: ReportLayout, modifier: u8, keycode: u8) -> Self {
        let bytes = match layout {
            ReportLayout::ModifierOnly => [modifier, 0],
            ReportLayout::ModifierKey => [modifier, keycode],
        };
        Self {
            bytes,
            len: layout.width() as u8,
        }
    }

    /// All-keys-released frame.
    pub const fn released(layout: ReportLayout) -> Self {
        Self::chord(layout, 0, 0)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn modifier(&self) -> u8 {
        self.bytes[0]
    }

    /// Key code byte; always 0 on the modifier-only layout.
    pub fn keycode(&self) -> u8 {
        self.bytes[1]
    }

    /// Returns `true` if no keys are pressed (release frame).
    pub fn is_empty(&self) -> bool {
        self.as_bytes().iter().all(|&b| b == 0)
    }

    /// Serialise into a byte slice for USB HID transmission.
    /// Returns the number of bytes written, 0 if `buf` is too small.
    pub fn serialize(&self, buf: &mut [u8]) -> usize {
        let n = self.len();
        if buf.len() < n {
            return 0;
        }
        buf[..n].copy_from_slice(self.as_bytes());
        n
    }
}

// USB HID report descriptors

/// Minimal keyboard descriptor: only the 8 modifier bits.
pub const MODIFIER_REPORT_DESCRIPTOR: &[u8] = &[
    0x05, 0x01, // Usage Page (Generic Desktop)
    0x09, 0x06, // Usage (Keyboard)
    0xA1, 0x01, // Collection (Application)
    0x75, 0x01, //   Report Size (1)
    0x95, 0x08, //   Report Count (8)
    0x05, 0x07, //   Usage Page (Keyboard/Keypad)
    0x19, 0xE0, //   Usage Minimum (Left Control)
    0x29, 0xE7, //   Usage Maximum (Right GUI)
    0x15, 0x00, //   Logical Minimum (0)
    0x25, 0x01, //   Logical Maximum (1)
    0x81, 0x02, //   Input (Data, Variable, Absolute)
    0xC0, // End Collection
];

/// Keyboard descriptor with the modifier bits plus one key code slot.
pub const MODIFIER_KEY_REPORT_DESCRIPTOR: &[u8] = &[
    0x05, 0x01, // Usage Page (Generic Desktop)
    0x09, 0x06, // Usage (Keyboard)
    0xA1, 0x01, // Collection (Application)
    //
    //   - Modifier keys (8 bits) -
    0x05, 0x07, //   Usage Page (Keyboard/Keypad)
    0x19, 0xE0, //   Usage Minimum (Left Control)
    0x29, 0xE7, //   Usage Maximum (Right GUI)
    0x15, 0x00, //   Logical Minimum (0)
    0x25, 0x01, //   Logical Maximum (1)
    0x75, 0x01, //   Report Size (1)
    0x95, 0x08, //   Report Count (8)
    0x81, 0x02, //   Input (Data, Variable, Absolute)
    //
    //   - Key code (1 byte) -
    0x19, 0x00, //   Usage Minimum (0)
    0x29, 0x65, //   Usage Maximum (Keyboard Application)
    0x15, 0x00, //   Logical Minimum (0)
    0x25, 0x65, //   Logical Maximum (101)
    0x75, 0x08, //   Report Size (8)
    0x95, 0x01, //   Report Count (1)
    0x81, 0x00, //   Input (Data, Array)
    //
    0xC0, // End Collection
];
