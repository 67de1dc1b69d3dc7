//! Unit tests for the debounce clock and debouncer.

use super::*;
use core::convert::Infallible;
use embedded_hal::digital::ErrorType;

/// Overflow flag that fires on every check.
struct AlwaysOverflow;

impl OverflowTimer for AlwaysOverflow {
    fn take_overflow(&mut self) -> bool {
        true
    }
}

struct NeverOverflow;

impl OverflowTimer for NeverOverflow {
    fn take_overflow(&mut self) -> bool {
        false
    }
}

struct FakePin {
    low: bool,
}

impl ErrorType for FakePin {
    type Error = Infallible;
}

impl InputPin for FakePin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.low)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(self.low)
    }
}

fn elapsed_clock() -> DebounceClock {
    let mut clock = DebounceClock::new(3);
    for _ in 0..3 {
        clock.tick();
    }
    clock
}

// ═══════════════════════════════════════════════════════════════════════════
// Debounce Clock Tests
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn clock_starts_closed() {
    assert!(!DebounceClock::new(3).window_elapsed());
}

#[test]
fn clock_opens_after_threshold_overflows() {
    let mut clock = DebounceClock::new(3);
    clock.poll(&mut AlwaysOverflow);
    clock.poll(&mut AlwaysOverflow);
    assert!(!clock.window_elapsed());
    clock.poll(&mut AlwaysOverflow);
    assert!(clock.window_elapsed());
}

#[test]
fn clock_ignores_polls_without_overflow() {
    let mut clock = DebounceClock::new(3);
    for _ in 0..100 {
        clock.poll(&mut NeverOverflow);
    }
    assert!(!clock.window_elapsed());
}

#[test]
fn window_stays_open_until_consumed() {
    let mut clock = elapsed_clock();
    for _ in 0..7 {
        clock.tick();
    }
    assert!(clock.window_elapsed());
    clock.consume_window();
    assert!(!clock.window_elapsed());
}

// ═══════════════════════════════════════════════════════════════════════════
// Debouncer Tests
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn no_edge_while_window_closed() {
    let mut clock = DebounceClock::new(3);
    let mut debouncer = Debouncer::new();
    assert_eq!(debouncer.on_poll(true, &mut clock), None);
    assert_eq!(debouncer.state(), ButtonState::Released);
}

#[test]
fn no_edge_when_sample_matches_state() {
    let mut clock = elapsed_clock();
    let mut debouncer = Debouncer::new();
    assert_eq!(debouncer.on_poll(false, &mut clock), None);
    // Window is left for the next real change.
    assert!(clock.window_elapsed());
}

#[test]
fn accepted_change_consumes_window() {
    let mut clock = elapsed_clock();
    let mut debouncer = Debouncer::new();
    assert_eq!(debouncer.on_poll(true, &mut clock), Some(Edge::Pressed));
    assert!(!clock.window_elapsed());
    assert_eq!(debouncer.state(), ButtonState::Pressed);
}

#[test]
fn bounce_from_rest_emits_nothing() {
    let mut clock = DebounceClock::new(3);
    let mut debouncer = Debouncer::new();
    for pressed in [false, true, false, true, false] {
        assert_eq!(debouncer.on_poll(pressed, &mut clock), None);
        clock.poll(&mut NeverOverflow);
    }
    assert_eq!(debouncer.state(), ButtonState::Released);
}

#[test]
fn release_needs_its_own_window() {
    let mut clock = elapsed_clock();
    let mut debouncer = Debouncer::new();
    debouncer.on_poll(true, &mut clock);

    clock.tick();
    clock.tick();
    assert_eq!(debouncer.on_poll(false, &mut clock), None);
    clock.tick();
    assert_eq!(debouncer.on_poll(false, &mut clock), Some(Edge::Released));
}

// ═══════════════════════════════════════════════════════════════════════════
// State / Pin Tests
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn edge_maps_to_state() {
    assert_eq!(Edge::Pressed.state(), ButtonState::Pressed);
    assert_eq!(Edge::Released.state(), ButtonState::Released);
    assert_eq!(Edge::from(ButtonState::Pressed), Edge::Pressed);
    assert!(ButtonState::from_pressed(true).is_pressed());
}

#[test]
fn pin_sampling_is_active_low() {
    assert!(sample(&mut FakePin { low: true }));
    assert!(!sample(&mut FakePin { low: false }));
}
