//! Pedal input - debounce clock and debouncer.
//!
//! The pedal is a single active-low switch with the internal pull-up
//! enabled, sampled once per main-loop iteration.

pub mod clock;
pub mod debouncer;

#[cfg(test)]
mod tests;

pub use clock::{DebounceClock, OverflowTimer};
pub use debouncer::Debouncer;

use embedded_hal::digital::InputPin;

/// Debounced state of the pedal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonState {
    #[default]
    Released,
    Pressed,
}

impl ButtonState {
    pub const fn from_pressed(pressed: bool) -> Self {
        if pressed {
            ButtonState::Pressed
        } else {
            ButtonState::Released
        }
    }

    pub const fn is_pressed(self) -> bool {
        matches!(self, ButtonState::Pressed)
    }
}

/// Accepted transition of the pedal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    Pressed,
    Released,
}

impl Edge {
    /// State the pedal is in after this edge.
    pub const fn state(self) -> ButtonState {
        match self {
            Edge::Pressed => ButtonState::Pressed,
            Edge::Released => ButtonState::Released,
        }
    }
}

impl From<ButtonState> for Edge {
    fn from(state: ButtonState) -> Self {
        match state {
            ButtonState::Pressed => Edge::Pressed,
            ButtonState::Released => Edge::Released,
        }
    }
}

/// Sample the active-low pedal pin. A read error counts as released.
pub fn sample<P: InputPin>(pin: &mut P) -> bool {
    pin.is_low().unwrap_or(false)
}
