pub mod chip8;

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// The operations a host needs to drive a chip. The host owns the chip exclusively
/// and is responsible for calling `step` and `tick_timers` at the desired cadence.
pub trait Chip {
    /// Loads the program stored at `path` into program memory and returns the number
    /// of bytes written.
    fn load_program(&mut self, path: &Path, format: ProgramFormat)
        -> Result<usize, LoadProgramError>;

    /// Attempts one instruction cycle. Keys are polled from `keypad` whenever an
    /// instruction (or a pending key wait) asks for them.
    fn step(&mut self, keypad: &dyn Keypad);

    /// Advances the delay and sound timers by `elapsed_ms` milliseconds of real time.
    fn tick_timers(&mut self, elapsed_ms: u32, speaker: &mut dyn Speaker);

    /// The framebuffer in row-major order. `true` is a set pixel.
    fn read_output_pins(&self) -> &[bool];
}

/// Reports whether a key of the 16-key keypad is currently held down.
pub trait Keypad {
    fn is_key_down(&self, key: u8) -> bool;
}

/// Receives the audio enable signal driven by the sound timer. Implementations must
/// tolerate being switched on repeatedly, once per timer tick.
pub trait Speaker {
    fn set_speaker(&mut self, on: bool);
}

/// A keypad backed by 16 input pins that the host sets and resets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputPins {
    pins: [bool; 16],
}

impl InputPins {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the pin for `pin`. Only the low nibble of `pin` is used.
    pub fn set_input_pin(&mut self, pin: u8, value: bool) {
        self.pins[(pin & 0x0F) as usize] = value;
    }

    pub fn reset_input_pins(&mut self) {
        self.pins = [false; 16];
    }
}

impl Keypad for InputPins {
    fn is_key_down(&self, key: u8) -> bool {
        self.pins[(key & 0x0F) as usize]
    }
}

/// A speaker that ignores every signal.
#[derive(Clone, Copy, Debug, Default)]
pub struct Mute;

impl Speaker for Mute {
    fn set_speaker(&mut self, _on: bool) {}
}

/// The on-disk encoding of a program image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProgramFormat {
    /// Raw bytes, copied verbatim.
    Binary,
    /// ASCII hex digits, two per byte.
    Hex,
}

/// Errors that occur while loading a program into memory.
#[derive(Debug, Error)]
pub enum LoadProgramError {
    #[error("Could not read program file {0}: {1}")]
    CouldNotReadFile(PathBuf, #[source] io::Error),

    #[error("Program too large: {0} bytes exceed the program region")]
    ProgramTooLarge(usize),

    #[error("Invalid hex digit {digit:?} at position {position}")]
    InvalidHexDigit { position: usize, digit: char },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_pins_use_low_nibble() {
        let mut pins = InputPins::new();
        pins.set_input_pin(0x1A, true);
        assert!(pins.is_key_down(0xA));
        assert!(!pins.is_key_down(0xB));

        pins.reset_input_pins();
        assert!(!pins.is_key_down(0xA));
    }
}
