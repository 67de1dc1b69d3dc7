//! Button debouncer.
//!
//! A raw sample that disagrees with the stable state is only accepted
//! once the shared debounce window has elapsed, and accepting it closes
//! the window again. Bounces inside one window are therefore ignored
//! even if the last of them would have been a real change.

use super::clock::DebounceClock;
use super::{ButtonState, Edge};

pub struct Debouncer {
    state: ButtonState,
}

impl Debouncer {
    pub const fn new() -> Self {
        Self {
            state: ButtonState::Released,
        }
    }

    /// Compare one raw sample (`true` = pressed) against the stable state.
    pub fn on_poll(&mut self, pressed: bool, clock: &mut DebounceClock) -> Option<Edge> {
        let sample = ButtonState::from_pressed(pressed);
        if sample == self.state || !clock.window_elapsed() {
            return None;
        }

        self.state = sample;
        clock.consume_window();
        Some(Edge::from(sample))
    }

    pub fn state(&self) -> ButtonState {
        self.state
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new()
    }
}
