//! nRF52840 glue for the hardware-facing traits of the library.
//!
//! - `TimerOverflow`: emulates the 63 Hz timer overflow flag from
//!   `embassy-time`.
//! - `FrameMeter`: measures one USB frame (SOF to SOF) with the DWT cycle
//!   counter, in the same units as `target_frame_length`.
//! - `CrystalClock`: the USB PLL here runs from the HFXO crystal, which has
//!   no trim register, so trial values are only recorded.

use cortex_m::peripheral::DWT;
use embassy_nrf::pac;
use embassy_time::{Duration, Instant};
use foot_switch::calibration::OscillatorTrim;
use foot_switch::config::FRAME_MEASURE_SPIN_LIMIT;
use foot_switch::pedal::OverflowTimer;

/// Start the DWT cycle counter used by `FrameMeter`.
pub fn enable_cycle_counter() {
    if let Some(mut cp) = cortex_m::Peripherals::take() {
        cp.DCB.enable_trace();
        cp.DWT.enable_cycle_counter();
    }
}

pub struct TimerOverflow {
    next: Instant,
    period: Duration,
}

impl TimerOverflow {
    pub fn new(period: Duration) -> Self {
        Self {
            next: Instant::now() + period,
            period,
        }
    }
}

impl OverflowTimer for TimerOverflow {
    fn take_overflow(&mut self) -> bool {
        if Instant::now() < self.next {
            return false;
        }
        self.next += self.period;
        true
    }
}

pub struct FrameMeter;

impl FrameMeter {
    /// Length of one frame in 7-cycle units over 1499/1500 of the frame.
    /// Returns 0 if the host sends no SOF within the spin limit.
    pub fn measure(&mut self) -> i32 {
        if !wait_for_frame_start() {
            return 0;
        }
        let start = DWT::cycle_count();
        if !wait_for_frame_start() {
            return 0;
        }
        let cycles = DWT::cycle_count().wrapping_sub(start) as u64;
        (cycles * 1499 / 1500 / 7) as i32
    }
}

fn wait_for_frame_start() -> bool {
    let frame = pac::USBD.framecntr().read().framecntr();
    for _ in 0..FRAME_MEASURE_SPIN_LIMIT {
        if pac::USBD.framecntr().read().framecntr() != frame {
            return true;
        }
    }
    false
}

#[derive(Default)]
pub struct CrystalClock {
    value: u8,
}

impl CrystalClock {
    pub fn value(&self) -> u8 {
        self.value
    }
}

impl OscillatorTrim for CrystalClock {
    fn set_calibration(&mut self, value: u8) {
        self.value = value;
    }
}
