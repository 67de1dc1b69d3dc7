//! Oscillator calibration against the USB frame length.
//!
//! Without a crystal, the RC oscillator has to be trimmed until one USB
//! frame (1 ms, marked by the host's SOF packets) measures the expected
//! number of clock units. The trim curve is only monotonic within each
//! half of the 8-bit range, so each half gets its own 7-step binary
//! search and the best trial across both halves wins.
//!
//! Runs once per USB bus reset, before the main loop services anything.

/// Step sizes of one binary search over a 128-value region.
const SEARCH_STEPS: [u8; 7] = [64, 32, 16, 8, 4, 2, 1];

/// First trim value of each region.
const REGION_BASES: [u8; 2] = [0, 128];

/// A trimmable clock source.
pub trait OscillatorTrim {
    fn set_calibration(&mut self, value: u8);
}

/// Outcome of one calibration run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Calibration {
    /// Trim value committed to the oscillator.
    pub value: u8,
    /// |measured - target| frame length for `value`.
    pub deviation: u32,
}

/// Expected frame length for a core clock of `core_hz`.
///
/// The measurement counts 7-cycle loop iterations over 1499/1500 of a
/// frame, so the target is `round(1499 * core_hz / 10.5 MHz)`.
pub const fn target_frame_length(core_hz: u32) -> i32 {
    ((1499 * core_hz as u64 + 5_250_000) / 10_500_000) as i32
}

/// Search both trim regions and commit the best value to `osc`.
///
/// `measure_frame_length` is called once per trial after the trial value
/// has been applied.
pub fn calibrate<O, F>(osc: &mut O, target: i32, mut measure_frame_length: F) -> Calibration
where
    O: OscillatorTrim,
    F: FnMut() -> i32,
{
    let mut best = Calibration {
        value: 0,
        deviation: u32::MAX,
    };

    for base in REGION_BASES {
        let mut trial = base;
        // Zero forces the first step upwards.
        let mut frame_length = 0;

        for step in SEARCH_STEPS {
            if frame_length < target {
                trial += step; // frequency too low
            } else {
                trial -= step; // frequency too high
            }

            osc.set_calibration(trial);
            frame_length = measure_frame_length();

            let deviation = frame_length.abs_diff(target);
            if deviation < best.deviation {
                best = Calibration {
                    value: trial,
                    deviation,
                };
            }
        }
    }

    osc.set_calibration(best.value);
    best
}
