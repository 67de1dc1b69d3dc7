//! HID report frames and the sequencer that schedules them.

pub mod report;
pub mod sequencer;

#[cfg(test)]
mod tests;

pub use report::{HidReportFrame, ReportLayout};
pub use sequencer::{ReportSequencer, ReportSource};
