//! Unit tests for report frames and the report sequencer.
//!
//! These tests run on the host (not embedded) and verify frame layout,
//! serialisation and cursor handling.

use super::report::{
    modifier, HidReportFrame, ReportLayout, MODIFIER_KEY_REPORT_DESCRIPTOR,
    MODIFIER_REPORT_DESCRIPTOR,
};
use super::sequencer::{ReportSequencer, ReportSource, MAX_SEQUENCE_LEN};
use crate::config::{ChordStyle, FootSwitchConfig};
use crate::error::Error;
use crate::pedal::ButtonState;

fn sequencer(layout: ReportLayout) -> ReportSequencer {
    ReportSequencer::new(&FootSwitchConfig::new().with_layout(layout))
}

// ═══════════════════════════════════════════════════════════════════════════
// Frame Tests
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn modifier_only_chord_is_one_byte() {
    let frame = HidReportFrame::chord(ReportLayout::ModifierOnly, modifier::RIGHT_GUI, 0x04);
    assert_eq!(frame.as_bytes(), &[0x80]);
    assert_eq!(frame.len(), 1);
    // No keycode slot on this layout.
    assert_eq!(frame.keycode(), 0);
    assert!(!frame.is_empty());
}

#[test]
fn modifier_key_chord_is_two_bytes() {
    let frame = HidReportFrame::chord(ReportLayout::ModifierKey, modifier::LEFT_CTRL, 0x04);
    assert_eq!(frame.as_bytes(), &[0x01, 0x04]);
    assert_eq!(frame.modifier(), 0x01);
    assert_eq!(frame.keycode(), 0x04);
}

#[test]
fn released_frame_is_all_zero() {
    for layout in [ReportLayout::ModifierOnly, ReportLayout::ModifierKey] {
        let frame = HidReportFrame::released(layout);
        assert!(frame.is_empty());
        assert_eq!(frame.len(), layout.width());
    }
}

#[test]
fn serialize_writes_frame_width() {
    let frame = HidReportFrame::chord(ReportLayout::ModifierKey, 0x88, 0);
    let mut buf = [0xFFu8; 8];
    assert_eq!(frame.serialize(&mut buf), 2);
    assert_eq!(&buf[..3], &[0x88, 0x00, 0xFF]);
}

#[test]
fn serialize_buffer_too_small() {
    let frame = HidReportFrame::released(ReportLayout::ModifierKey);
    let mut buf = [0u8; 1];
    assert_eq!(frame.serialize(&mut buf), 0); // Should fail gracefully
}

#[test]
fn layout_from_width() {
    assert_eq!(ReportLayout::from_width(1), Ok(ReportLayout::ModifierOnly));
    assert_eq!(ReportLayout::from_width(2), Ok(ReportLayout::ModifierKey));
    assert_eq!(ReportLayout::from_width(8), Err(Error::InvalidReportWidth(8)));
}

#[test]
fn descriptors_are_closed_keyboard_collections() {
    for desc in [MODIFIER_REPORT_DESCRIPTOR, MODIFIER_KEY_REPORT_DESCRIPTOR] {
        assert_eq!(&desc[..6], &[0x05, 0x01, 0x09, 0x06, 0xA1, 0x01]);
        assert_eq!(desc.last(), Some(&0xC0));
    }
    assert_eq!(
        ReportLayout::ModifierOnly.descriptor(),
        MODIFIER_REPORT_DESCRIPTOR
    );
}

// ═══════════════════════════════════════════════════════════════════════════
// Sequencer Tests
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn new_sequencer_holds_one_release_sequence() {
    let mut seq = sequencer(ReportLayout::ModifierOnly);
    assert!(!seq.is_exhausted());
    assert!(seq.next_frame().unwrap().is_empty());
    assert!(seq.is_exhausted());
    assert!(seq.next_frame().is_none());
}

#[test]
fn every_layout_sequence_is_armed_in_full() {
    for layout in [ReportLayout::ModifierOnly, ReportLayout::ModifierKey] {
        assert!(layout.sequence_len() <= MAX_SEQUENCE_LEN);
        for state in [ButtonState::Pressed, ButtonState::Released] {
            let mut seq = sequencer(layout);
            seq.arm(state);
            let mut sent = 0;
            while seq.next_frame().is_some() {
                sent += 1;
            }
            assert_eq!(sent, layout.sequence_len());
        }
    }
}

#[test]
fn pressed_sequence_carries_modifier_and_zero_keycode() {
    let mut seq = sequencer(ReportLayout::ModifierKey);
    seq.arm(ButtonState::Pressed);

    let first = seq.next_frame().unwrap();
    assert_eq!(first.modifier(), modifier::RIGHT_GUI);
    assert_eq!(first.keycode(), 0);

    let second = seq.next_frame().unwrap();
    assert_eq!(second, first);
    assert!(seq.next_frame().is_none());
}

#[test]
fn released_sequence_is_all_zero() {
    let mut seq = sequencer(ReportLayout::ModifierKey);
    seq.arm(ButtonState::Pressed);
    seq.arm(ButtonState::Released);
    while let Some(frame) = seq.next_frame() {
        assert!(frame.is_empty());
    }
}

#[test]
fn configured_keycode_lands_in_second_byte() {
    let config = FootSwitchConfig::new()
        .with_modifier(modifier::LEFT_SHIFT)
        .with_keycode(0x2C);
    let mut seq = ReportSequencer::new(&config);
    seq.arm(ButtonState::Pressed);
    assert_eq!(seq.next_frame().unwrap().as_bytes(), &[0x02, 0x2C]);
}

#[test]
fn tap_sequence_is_chord_then_release() {
    let config = FootSwitchConfig::new().with_chord_style(ChordStyle::Tap);
    let mut seq = ReportSequencer::new(&config);
    seq.arm(ButtonState::Pressed);
    assert_eq!(seq.next_frame().unwrap().modifier(), modifier::RIGHT_GUI);
    assert!(seq.next_frame().unwrap().is_empty());
    assert!(seq.is_exhausted());
}

#[test]
fn peek_does_not_advance() {
    let mut seq = sequencer(ReportLayout::ModifierOnly);
    seq.arm(ButtonState::Pressed);
    assert_eq!(seq.peek_frame(), seq.peek_frame());
    assert_eq!(seq.cursor(), 0);
    seq.advance();
    assert_eq!(seq.cursor(), 1);
    // Cursor saturates at the sequence length.
    seq.advance();
    assert_eq!(seq.cursor(), 1);
    assert!(seq.peek_frame().is_none());
}

#[test]
fn current_frame_is_stable_once_exhausted() {
    let mut seq = sequencer(ReportLayout::ModifierKey);
    seq.arm(ButtonState::Pressed);
    let before = seq.current_frame();
    while seq.next_frame().is_some() {}
    assert_eq!(seq.current_frame(), before);
    assert_eq!(seq.current_frame(), seq.current_frame());
}

#[test]
fn arm_resets_partially_sent_sequence() {
    let mut seq = sequencer(ReportLayout::ModifierKey);
    seq.arm(ButtonState::Pressed);
    seq.next_frame();
    seq.arm(ButtonState::Released);
    assert_eq!(seq.cursor(), 0);
    assert!(seq.current_frame().is_empty());
}
