//! Poll-loop core: debounce clock, debouncer and report sequencer wired
//! together the way the main loop drives them.
//!
//! One iteration of the firmware loop is:
//!   1. if the interrupt endpoint can take a frame, send `pending_frame`
//!      and call `frame_consumed` once the transport accepted it
//!   2. `poll` with the raw pedal sample and the timer overflow flag

use crate::config::FootSwitchConfig;
use crate::error::Error;
use crate::hid::{HidReportFrame, ReportSequencer, ReportSource};
use crate::pedal::{ButtonState, DebounceClock, Debouncer, Edge, OverflowTimer};

pub struct FootSwitch {
    clock: DebounceClock,
    debouncer: Debouncer,
    sequencer: ReportSequencer,
}

impl FootSwitch {
    pub fn new(config: &FootSwitchConfig) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self {
            clock: DebounceClock::new(config.debounce_ticks),
            debouncer: Debouncer::new(),
            sequencer: ReportSequencer::new(config),
        })
    }

    /// Sample the pedal, then advance the debounce clock.
    ///
    /// An accepted edge re-arms the sequencer for the new state.
    pub fn poll<T: OverflowTimer>(&mut self, pressed: bool, timer: &mut T) -> Option<Edge> {
        let edge = self.debouncer.on_poll(pressed, &mut self.clock);
        if let Some(edge) = edge {
            self.sequencer.arm(edge.state());
        }
        self.clock.poll(timer);
        edge
    }

    /// Frame the endpoint should send next, if the sequence is not spent.
    pub fn pending_frame(&self) -> Option<HidReportFrame> {
        self.sequencer.peek_frame()
    }

    /// The transport accepted the pending frame.
    pub fn frame_consumed(&mut self) {
        self.sequencer.advance();
    }

    pub fn button_state(&self) -> ButtonState {
        self.debouncer.state()
    }

    pub fn sequencer(&self) -> &ReportSequencer {
        &self.sequencer
    }
}

impl ReportSource for FootSwitch {
    fn current_frame(&self) -> HidReportFrame {
        self.sequencer.current_frame()
    }
}
