//! Debounce clock - divides a free-running timer's overflow flag down to
//! one "window elapsed" event every few overflows.

/// A hardware timer whose overflow flag can be tested and cleared.
pub trait OverflowTimer {
    /// Returns `true` once per overflow and clears the condition.
    fn take_overflow(&mut self) -> bool;
}

pub struct DebounceClock {
    ticks: u8,
    threshold: u8,
    window_elapsed: bool,
}

impl DebounceClock {
    /// Starts with the window closed; the first transition has to wait a
    /// full window after power-up.
    pub const fn new(threshold: u8) -> Self {
        Self {
            ticks: 0,
            threshold,
            window_elapsed: false,
        }
    }

    /// Check the timer once. Call every loop iteration.
    pub fn poll<T: OverflowTimer>(&mut self, timer: &mut T) {
        if timer.take_overflow() {
            self.tick();
        }
    }

    /// Count one overflow.
    pub fn tick(&mut self) {
        self.ticks += 1;
        if self.ticks >= self.threshold {
            self.ticks = 0;
            self.window_elapsed = true;
        }
    }

    pub fn window_elapsed(&self) -> bool {
        self.window_elapsed
    }

    /// Re-arm: the next transition waits for a fresh window.
    pub fn consume_window(&mut self) {
        self.window_elapsed = false;
    }
}
