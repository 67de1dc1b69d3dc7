//! Outgoing report handoff between the poll loop and USB handlers.
//!
//! The poll loop builds each frame in its own scratch copy and publishes
//! it here in one critical section; readers always get a whole frame.

use crate::hid::{HidReportFrame, ReportLayout, ReportSource};
use core::cell::Cell;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;

pub struct SharedReport {
    frame: Mutex<CriticalSectionRawMutex, Cell<HidReportFrame>>,
}

impl SharedReport {
    pub const fn new(layout: ReportLayout) -> Self {
        Self {
            frame: Mutex::new(Cell::new(HidReportFrame::released(layout))),
        }
    }

    pub fn publish(&self, frame: HidReportFrame) {
        self.frame.lock(|cell| cell.set(frame));
    }

    pub fn snapshot(&self) -> HidReportFrame {
        self.frame.lock(|cell| cell.get())
    }
}

impl ReportSource for SharedReport {
    fn current_frame(&self) -> HidReportFrame {
        self.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_released() {
        let shared = SharedReport::new(ReportLayout::ModifierOnly);
        assert!(shared.snapshot().is_empty());
        assert_eq!(shared.snapshot().len(), 1);
    }

    #[test]
    fn publish_replaces_whole_frame() {
        let shared = SharedReport::new(ReportLayout::ModifierKey);
        let chord = HidReportFrame::chord(ReportLayout::ModifierKey, 0x08, 0x04);
        shared.publish(chord);
        assert_eq!(shared.current_frame(), chord);
        assert_eq!(shared.snapshot().as_bytes(), &[0x08, 0x04]);
    }
}
