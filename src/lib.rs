//! An interpreter for programs written for the CHIP-8 virtual machine. The implementation
//! follows the instruction set described [here](https://en.wikipedia.org/wiki/CHIP-8#Opcode_table).
//!
//! The core (`chip::chip8::Chip8`) is a plain state structure advanced by two operations:
//! `step`, which executes one instruction, and `tick_timers`, which converts elapsed
//! milliseconds into 60 Hz timer ticks. Key state and the speaker are capabilities supplied
//! by the host on every call, see `chip::Keypad` and `chip::Speaker`.
//!
//! For graphical output the bundled host relies on the cursive text user interface library.
pub mod chip;
pub mod config;
