use ux::u4;

use crate::chip::chip8::{
    constants::{CHIP8_ADDRESS_MASK, CHIP8_MEMORY_SIZE},
    Chip8,
};

pub fn conditional_skip<T>(opcode: &T, state: &mut Chip8, f: fn(&T, &Chip8) -> bool) {
    if f(opcode, state) {
        increment_program_counter(state);
    }
}

pub fn increment_program_counter(state: &mut Chip8) {
    state.program_counter = state.program_counter.wrapping_add(2) & CHIP8_ADDRESS_MASK;
}

/// Converts a register operand into an index into `Chip8::registers`.
pub fn reg(register: u4) -> usize {
    u8::from(register) as usize
}

/// Reduces an address into the range of main memory.
pub fn memory_address(address: u16) -> usize {
    address as usize % CHIP8_MEMORY_SIZE
}

pub fn read_memory(state: &Chip8, address: u16) -> u8 {
    state.memory[memory_address(address)]
}

pub fn write_memory(state: &mut Chip8, address: u16, byte: u8) {
    state.memory[memory_address(address)] = byte;
}
