//! Unified error type for foot-switch.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Implements `defmt::Format` for efficient on-target logging.

/// Top-level error type used across the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    // Configuration
    /// No report descriptor exists for this report width (bytes).
    InvalidReportWidth(u8),

    /// A debounce window of zero ticks would never gate anything.
    InvalidDebounceTicks,

    /// Tap chords need a sequence of at least two frames.
    TapNeedsTwoFrames,

    // Control transfers
    /// Setup packet shorter than the 8 bytes USB mandates.
    ShortSetupPacket(usize),

    // Board
    /// The hardware watchdog could not be started.
    Watchdog,
}
