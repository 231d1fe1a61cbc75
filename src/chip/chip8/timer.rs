use log::trace;

use crate::chip::{
    chip8::{constants::CHIP8_TIMER_FREQUENCY, Chip8},
    Speaker,
};

/// One timer period, in units of 1/60 ms.
const TICK_PERIOD: u64 = 1000;

/// Accumulates real time until it adds up to whole 60 Hz ticks. Time is kept in
/// units of 1/60 ms, so a period of 1000/60 ms is exactly `TICK_PERIOD` units and
/// no rounding error builds up.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(super) struct TickAccumulator {
    pending: u64,
}

impl TickAccumulator {
    pub(super) fn new() -> Self {
        Self::default()
    }

    pub(super) fn add(&mut self, elapsed_ms: u32) {
        self.pending += u64::from(elapsed_ms) * CHIP8_TIMER_FREQUENCY;
    }

    /// Consumes one period if at least one is pending.
    pub(super) fn take_tick(&mut self) -> bool {
        if self.pending >= TICK_PERIOD {
            self.pending -= TICK_PERIOD;
            true
        } else {
            false
        }
    }
}

pub(super) fn tick_timers(state: &mut Chip8, elapsed_ms: u32, speaker: &mut dyn Speaker) {
    state.timer.add(elapsed_ms);
    while state.timer.take_tick() {
        tick(state, speaker);
    }
}

/// A single 60 Hz tick. The speaker is switched on for every tick that leaves the
/// sound timer positive and off on the tick that brings it to zero.
fn tick(state: &mut Chip8, speaker: &mut dyn Speaker) {
    if state.delay_timer > 0 {
        state.delay_timer -= 1;
    }

    if state.sound_timer > 0 {
        state.sound_timer -= 1;
        let on = state.sound_timer > 0;
        trace!("Sound timer at {}, speaker {}", state.sound_timer, on);
        speaker.set_speaker(on);
    }
}
