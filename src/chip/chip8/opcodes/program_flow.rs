use core::convert::TryFrom;
use std::marker::PhantomData;

use log::debug;

use crate::chip::{
    chip8::{
        constants::{CHIP8_ADDRESS_MASK, CHIP8_STACK_SIZE},
        opcodes::{
            ExecutableOpcode, InstructionParsingError, InstructionWithAddress,
            InstructionWithOperands, InstructionWithRegAndValue, Opcode,
        },
        util, Chip8,
    },
    Keypad,
};

define_instruction_with_address!(Jmp, JmpInstruction, 0x1);
impl ExecutableOpcode for JmpInstruction {
    fn execute(&self, state: &mut Chip8, _keypad: &dyn Keypad) {
        state.program_counter = u16::from(self.address);
    }
}

define_instruction_with_address!(Call, CallInstruction, 0x2);
impl ExecutableOpcode for CallInstruction {
    fn execute(&self, state: &mut Chip8, _keypad: &dyn Keypad) {
        if state.stack_pointer as usize >= CHIP8_STACK_SIZE {
            debug!("Stack overflow, ignoring call to {:03X}", u16::from(self.address));
            return;
        }
        state.stack[state.stack_pointer as usize] = state.program_counter;
        state.stack_pointer += 1;
        state.program_counter = u16::from(self.address);
    }
}

define_instruction_with_reg_and_value!(Se, SeInstruction, 0x3);
impl ExecutableOpcode for SeInstruction {
    fn execute(&self, state: &mut Chip8, _keypad: &dyn Keypad) {
        util::conditional_skip(self, state, |instruction, state| {
            state.registers[util::reg(instruction.reg)] == instruction.value
        });
    }
}

define_instruction_with_reg_and_value!(Sne, SneInstruction, 0x4);
impl ExecutableOpcode for SneInstruction {
    fn execute(&self, state: &mut Chip8, _keypad: &dyn Keypad) {
        util::conditional_skip(self, state, |instruction, state| {
            state.registers[util::reg(instruction.reg)] != instruction.value
        });
    }
}

// The low nibble of 5XY0 and 9XY0 is not inspected.
define_instruction_with_operands!(Sre, SreInstruction, 0x5);
impl ExecutableOpcode for SreInstruction {
    fn execute(&self, state: &mut Chip8, _keypad: &dyn Keypad) {
        util::conditional_skip(self, state, |instruction, state| {
            state.registers[util::reg(instruction.op1)]
                == state.registers[util::reg(instruction.op2)]
        });
    }
}

define_instruction_with_operands!(Srne, SrneInstruction, 0x9);
impl ExecutableOpcode for SrneInstruction {
    fn execute(&self, state: &mut Chip8, _keypad: &dyn Keypad) {
        util::conditional_skip(self, state, |instruction, state| {
            state.registers[util::reg(instruction.op1)]
                != state.registers[util::reg(instruction.op2)]
        });
    }
}

define_instruction_with_address!(Jmpr, JmprInstruction, 0xB);
impl ExecutableOpcode for JmprInstruction {
    fn execute(&self, state: &mut Chip8, _keypad: &dyn Keypad) {
        state.program_counter =
            u16::from(self.address).wrapping_add(state.registers[0] as u16) & CHIP8_ADDRESS_MASK;
    }
}

define_instruction_with_reg_and_value!(Sk, SkInstruction, 0xE);
impl ExecutableOpcode for SkInstruction {
    fn execute(&self, state: &mut Chip8, keypad: &dyn Keypad) {
        let key = state.registers[util::reg(self.reg)] & 0xF;
        let skip = match self.value {
            0x9E => keypad.is_key_down(key),
            0xA1 => !keypad.is_key_down(key),
            value => {
                debug!("Ignoring undefined key opcode E{:X}{:02X}", util::reg(self.reg), value);
                false
            }
        };
        if skip {
            util::increment_program_counter(state);
        }
    }
}
