//! Report sequencer - turns one debounced button transition into the
//! ordered frames the interrupt endpoint has to deliver.
//!
//! The sequence is a cursor over a fixed-capacity frame list. A new edge
//! replaces whatever was left of the previous sequence; the cursor only
//! moves when the transport confirms it took a frame.

use super::report::{HidReportFrame, ReportLayout};
use crate::config::{ChordStyle, FootSwitchConfig};
use crate::pedal::ButtonState;
use heapless::Vec;

/// Longest sequence any layout asks for.
pub const MAX_SEQUENCE_LEN: usize = 2;

/// Anything that can hand out the frame a GET_REPORT should answer with.
pub trait ReportSource {
    fn current_frame(&self) -> HidReportFrame;
}

pub struct ReportSequencer {
    layout: ReportLayout,
    modifier: u8,
    keycode: u8,
    style: ChordStyle,
    frames: Vec<HidReportFrame, MAX_SEQUENCE_LEN>,
    cursor: usize,
}

impl ReportSequencer {
    /// Armed with the released state so the host sees an all-zero report
    /// right after enumeration.
    pub fn new(config: &FootSwitchConfig) -> Self {
        let mut sequencer = Self {
            layout: config.layout,
            modifier: config.modifier,
            keycode: config.keycode,
            style: config.chord_style,
            frames: Vec::new(),
            cursor: 0,
        };
        sequencer.arm(ButtonState::Released);
        sequencer
    }

    /// Start a new sequence for `state`, discarding any unsent frames.
    pub fn arm(&mut self, state: ButtonState) {
        let chord = HidReportFrame::chord(self.layout, self.modifier, self.keycode);
        let released = HidReportFrame::released(self.layout);

        self.frames.clear();
        for index in 0..self.layout.sequence_len() {
            let frame = match (state, self.style) {
                (ButtonState::Released, _) => released,
                (ButtonState::Pressed, ChordStyle::Hold) => chord,
                (ButtonState::Pressed, ChordStyle::Tap) if index == 0 => chord,
                (ButtonState::Pressed, ChordStyle::Tap) => released,
            };
            let pushed = self.frames.push(frame);
            debug_assert!(pushed.is_ok(), "sequence longer than MAX_SEQUENCE_LEN");
        }
        self.cursor = 0;
    }

    /// Frame waiting for transmission, without consuming it.
    pub fn peek_frame(&self) -> Option<HidReportFrame> {
        self.frames.get(self.cursor).copied()
    }

    /// Record that the transport took the frame at the cursor.
    pub fn advance(&mut self) {
        if self.cursor < self.frames.len() {
            self.cursor += 1;
        }
    }

    /// Hand out the next frame and count it as consumed.
    ///
    /// For transports that copy the frame synchronously when they report
    /// ready; asynchronous writers should `peek_frame` and `advance` once
    /// the write completed.
    pub fn next_frame(&mut self) -> Option<HidReportFrame> {
        let frame = self.peek_frame()?;
        self.advance();
        Some(frame)
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.frames.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

impl ReportSource for ReportSequencer {
    /// Frame at the cursor, or the last frame once the sequence is spent.
    /// Never moves the cursor.
    fn current_frame(&self) -> HidReportFrame {
        let index = self.cursor.min(self.frames.len().saturating_sub(1));
        self.frames
            .get(index)
            .copied()
            .unwrap_or(HidReportFrame::released(self.layout))
    }
}
