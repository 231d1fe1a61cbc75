/// CHIP-8 constants.
pub mod constants;
/// Cursive display output.
pub mod cursive_display;
/// Loading program images into memory.
mod loader;
/// Decoding of opcodes and their execution.
mod opcodes;
/// The 60 Hz timer subsystem.
mod timer;
/// Convenience functions for modification of the CHIP-8 state.
mod util;


use std::fs;
use std::path::Path;

use log::{debug, trace};
use rand::{rngs::StdRng, SeedableRng};
use ux::u4;

use crate::chip::{
    chip8::{
        constants::{
            CHIP8_CHARSET, CHIP8_CHARSET_LEN, CHIP8_CHARSET_OFFSET, CHIP8_DISPLAY_HEIGHT,
            CHIP8_DISPLAY_WIDTH, CHIP8_MEMORY_SIZE, CHIP8_PROGRAM_OFFSET, CHIP8_STACK_SIZE,
        },
        opcodes::Opcode,
        timer::TickAccumulator,
    },
    Chip, Keypad, LoadProgramError, ProgramFormat, Speaker,
};

pub use loader::parse_hex;

/// Whether the chip fetches instructions or is suspended until a key goes down.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WaitState {
    /// Instructions are fetched normally.
    Running,
    /// Fetching is suspended. The first key reported down is stored in the register.
    WaitingForKey(u4),
}

/// Represents the state of the CHIP-8.
#[derive(Clone)]
pub struct Chip8 {
    /// 4096 bytes of main memory
    memory: [u8; CHIP8_MEMORY_SIZE],

    /// 16 registers where each can store one byte. Register 0xF doubles as the
    /// carry, borrow and collision flag.
    registers: [u8; 16],

    /// The address register (usually called I). Only the lower 12 bits address
    /// memory, but the value is not masked on write.
    index: u16,

    /// A program counter, always in range 0x000 - 0xFFF (inclusive).
    program_counter: u16,

    /// The output pins. Note that those are usually directly wired
    /// up to the pixels of the display. However, given that this implementation
    /// considers a display as optional, we refer to them as output_pins for
    /// the sake of generality.
    output_pins: [bool; CHIP8_DISPLAY_WIDTH * CHIP8_DISPLAY_HEIGHT],

    /// The delay timer, decremented at 60 Hz while positive.
    delay_timer: u8,

    /// The sound timer, decremented at 60 Hz while positive. The speaker is on while
    /// it counts down.
    sound_timer: u8,

    /// A stack. Note that there are no instructions allowing to modify the
    /// stack and it is only used to store return addresses for the return
    /// opcode.
    stack: [u16; CHIP8_STACK_SIZE],

    /// A pointer to the next free slot of the stack, in range 0 - 16 (inclusive).
    stack_pointer: u8,

    /// Set by the key wait opcode, resolved by `step`.
    wait_state: WaitState,

    /// Real time not yet converted into timer ticks.
    timer: TickAccumulator,

    /// Source for the random opcode. Seeded once on construction.
    rng: StdRng,

    /// A flag that indicates whether the output pins changed since it
    /// was last taken.
    draw: bool,
}

impl Chip for Chip8 {
    fn load_program(
        &mut self,
        path: &Path,
        format: ProgramFormat,
    ) -> Result<usize, LoadProgramError> {
        let buffer = fs::read(path)
            .map_err(|e| LoadProgramError::CouldNotReadFile(path.to_path_buf(), e))?;

        match format {
            ProgramFormat::Binary => self.load_program_bytes(&buffer),
            ProgramFormat::Hex => {
                let program = parse_hex(&buffer)?;
                self.load_program_bytes(&program)
            }
        }
    }

    fn step(&mut self, keypad: &dyn Keypad) {
        if let WaitState::WaitingForKey(reg) = self.wait_state {
            match (0x0..=0xFu8).find(|&key| keypad.is_key_down(key)) {
                Some(key) => {
                    let reg = util::reg(reg);
                    debug!("Key {:X} down, resuming with V{:X} = {:X}", key, reg, key);
                    self.registers[reg] = key;
                    self.wait_state = WaitState::Running;
                }
                None => return,
            }
        }

        let opcode = self.next_instruction();
        trace!("{:03X}: {}", self.program_counter, opcode);
        util::increment_program_counter(self);
        opcode.execute(self, keypad);
    }

    fn tick_timers(&mut self, elapsed_ms: u32, speaker: &mut dyn Speaker) {
        timer::tick_timers(self, elapsed_ms, speaker);
    }

    fn read_output_pins(&self) -> &[bool] {
        &self.output_pins
    }
}

impl Chip8 {
    /// Constructs a new CHIP-8 and appropriately initializes all fields so that
    /// it is ready for the first execution cycle. Essentially this means that
    /// the program counter is set to 0x200 and the default CHIP-8 charset is
    /// loaded at memory address `CHIP8_CHARSET_OFFSET`. Note that no program is
    /// loaded upon initialization.
    ///
    /// The random source is seeded from the operating system. Use `with_seed`
    /// for reproducible runs.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Like `new`, but seeds the random source with `seed`. Two chips built with
    /// the same seed and fed the same program, keys and timing behave identically.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        let mut memory = [0; CHIP8_MEMORY_SIZE];
        let charset_start = CHIP8_CHARSET_OFFSET as usize;
        memory[charset_start..charset_start + CHIP8_CHARSET_LEN as usize]
            .copy_from_slice(&CHIP8_CHARSET);

        Chip8 {
            memory,
            registers: [0; 16],
            index: 0,
            program_counter: CHIP8_PROGRAM_OFFSET,
            output_pins: [false; CHIP8_DISPLAY_WIDTH * CHIP8_DISPLAY_HEIGHT],
            delay_timer: 0,
            sound_timer: 0,
            stack: [0; CHIP8_STACK_SIZE],
            stack_pointer: 0,
            wait_state: WaitState::Running,
            timer: TickAccumulator::new(),
            rng,
            draw: false,
        }
    }

    /// Fetches the big-endian instruction word at `self.program_counter`. The
    /// second byte wraps around to address 0x000 if the counter sits at 0xFFF.
    fn next_instruction(&self) -> Opcode {
        Opcode::new(&[
            util::read_memory(self, self.program_counter),
            util::read_memory(self, self.program_counter.wrapping_add(1)),
        ])
    }

    pub fn registers(&self) -> &[u8; 16] {
        &self.registers
    }

    /// The address register I.
    pub fn index(&self) -> u16 {
        self.index
    }

    pub fn program_counter(&self) -> u16 {
        self.program_counter
    }

    pub fn stack_pointer(&self) -> u8 {
        self.stack_pointer
    }

    /// The return addresses of all active subroutine calls, outermost first.
    pub fn stack(&self) -> &[u16] {
        &self.stack[..self.stack_pointer as usize]
    }

    pub fn delay_timer(&self) -> u8 {
        self.delay_timer
    }

    pub fn sound_timer(&self) -> u8 {
        self.sound_timer
    }

    pub fn memory(&self) -> &[u8] {
        &self.memory
    }

    pub fn wait_state(&self) -> WaitState {
        self.wait_state
    }

    /// Returns whether any pixel changed since the last call and clears the flag.
    pub fn take_draw_flag(&mut self) -> bool {
        std::mem::replace(&mut self.draw, false)
    }
}

impl Default for Chip8 {
    fn default() -> Self {
        Chip8::new()
    }
}
