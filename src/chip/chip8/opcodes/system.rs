use core::convert::TryFrom;
use std::marker::PhantomData;

use log::debug;

use crate::chip::{
    chip8::{
        opcodes::{ExecutableOpcode, InstructionParsingError, InstructionWithAddress, Opcode},
        Chip8,
    },
    Keypad,
};

define_instruction_with_address!(Sys, SysInstruction, 0x0);
impl ExecutableOpcode for SysInstruction {
    fn execute(&self, state: &mut Chip8, _keypad: &dyn Keypad) {
        match u16::from(self.address) {
            0x0E0 => {
                if state.output_pins.iter().any(|&pixel| pixel) {
                    state.draw = true;
                }
                state.output_pins.iter_mut().for_each(|pixel| *pixel = false);
            }
            0x0EE => {
                if state.stack_pointer == 0 {
                    debug!("Stack underflow, ignoring return");
                    return;
                }
                state.stack_pointer -= 1;
                state.program_counter = state.stack[state.stack_pointer as usize];
            }
            address => debug!("Ignoring machine code routine at {:03X}", address),
        };
    }
}
