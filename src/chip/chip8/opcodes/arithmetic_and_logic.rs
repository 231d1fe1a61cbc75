use core::convert::TryFrom;
use std::marker::PhantomData;

use log::debug;
use rand::Rng;
use ux::u4;

use crate::chip::{
    chip8::{
        constants::{
            CHIP8_CHARSET_GLYPH_LEN, CHIP8_CHARSET_OFFSET, CHIP8_DISPLAY_HEIGHT,
            CHIP8_DISPLAY_WIDTH,
        },
        opcodes::{
            ExecutableOpcode, InstructionParsingError, InstructionWithAddress,
            InstructionWithOperands, InstructionWithRegAndValue, Opcode,
        },
        util, Chip8, WaitState,
    },
    Keypad,
};

define_instruction_with_reg_and_value!(Ldr, LdrInstruction, 0x6);
impl ExecutableOpcode for LdrInstruction {
    fn execute(&self, state: &mut Chip8, _keypad: &dyn Keypad) {
        state.registers[util::reg(self.reg)] = self.value;
    }
}

define_instruction_with_reg_and_value!(Add, AddInstruction, 0x7);
impl ExecutableOpcode for AddInstruction {
    fn execute(&self, state: &mut Chip8, _keypad: &dyn Keypad) {
        let reg = util::reg(self.reg);
        state.registers[reg] = state.registers[reg].wrapping_add(self.value);
    }
}

define_instruction_with_operands!(Reg, RegInstruction, 0x8);
impl ExecutableOpcode for RegInstruction {
    fn execute(&self, state: &mut Chip8, _keypad: &dyn Keypad) {
        /// Applies `f` to the values of `r1` and `r2` and stores the result in `r1`.
        fn modify_registers(state: &mut Chip8, r1: u4, r2: u4, f: fn(u8, u8) -> u8) {
            let val = f(state.registers[util::reg(r1)], state.registers[util::reg(r2)]);
            state.registers[util::reg(r1)] = val;
        }

        /// Writes `flag` of the current values to register 0xF, then applies `f` to
        /// the values as they are after that write. With `r1` or `r2` being 0xF the
        /// operation therefore sees the new flag.
        fn modify_registers_with_flag(
            state: &mut Chip8,
            r1: u4,
            r2: u4,
            flag: fn(u8, u8) -> bool,
            f: fn(u8, u8) -> u8,
        ) {
            let set = flag(state.registers[util::reg(r1)], state.registers[util::reg(r2)]);
            state.registers[0xF] = set as u8;
            modify_registers(state, r1, r2, f);
        }

        let (x, y) = (self.op1, self.op2);
        match u8::from(self.op3) {
            0x0 => modify_registers(state, x, y, |_, v2| v2),
            0x1 => modify_registers(state, x, y, |v1, v2| v1 | v2),
            0x2 => modify_registers(state, x, y, |v1, v2| v1 & v2),
            0x3 => modify_registers(state, x, y, |v1, v2| v1 ^ v2),
            0x4 => modify_registers_with_flag(
                state,
                x,
                y,
                |v1, v2| v1.checked_add(v2).is_none(),
                |v1, v2| v1.wrapping_add(v2),
            ),
            0x5 => modify_registers_with_flag(
                state,
                x,
                y,
                |v1, v2| v1 > v2,
                |v1, v2| v1.wrapping_sub(v2),
            ),
            0x6 => modify_registers_with_flag(state, x, y, |v1, _| v1 & 1 != 0, |v1, _| v1 >> 1),
            0x7 => modify_registers_with_flag(
                state,
                x,
                y,
                |v1, v2| v2 > v1,
                |v1, v2| v2.wrapping_sub(v1),
            ),
            0xE => modify_registers_with_flag(
                state,
                x,
                y,
                |v1, _| v1 & 0x80 != 0,
                |v1, _| v1 << 1,
            ),
            op => debug!("Ignoring undefined register opcode 8XY{:X}", op),
        };
    }
}

define_instruction_with_address!(Ld, LdInstruction, 0xA);
impl ExecutableOpcode for LdInstruction {
    fn execute(&self, state: &mut Chip8, _keypad: &dyn Keypad) {
        state.index = u16::from(self.address);
    }
}

define_instruction_with_reg_and_value!(Rnd, RndInstruction, 0xC);
impl ExecutableOpcode for RndInstruction {
    fn execute(&self, state: &mut Chip8, _keypad: &dyn Keypad) {
        let sample: u8 = state.rng.gen();
        state.registers[util::reg(self.reg)] = sample & self.value;
    }
}

define_instruction_with_operands!(Drw, DrwInstruction, 0xD);
impl ExecutableOpcode for DrwInstruction {
    fn execute(&self, state: &mut Chip8, _keypad: &dyn Keypad) {
        fn translate_gfx(x: usize, y: usize) -> usize {
            (x % CHIP8_DISPLAY_WIDTH) + (y % CHIP8_DISPLAY_HEIGHT) * CHIP8_DISPLAY_WIDTH
        }

        let (x_reg, y_reg) = (util::reg(self.op1), util::reg(self.op2));
        let n = u8::from(self.op3);

        // VF is cleared up front and coordinates are read per pixel, so a sprite
        // positioned by VF moves with the collision flag.
        state.registers[0xF] = 0;
        for y_pos in 0..n {
            let pixel_byte = util::read_memory(state, state.index.wrapping_add(y_pos as u16));

            for x_pos in 0..8 {
                if pixel_byte & (0x80 >> x_pos) == 0 {
                    continue;
                }

                let x = state.registers[x_reg] as usize + x_pos;
                let y = state.registers[y_reg] as usize + y_pos as usize;
                let pixel_pos = translate_gfx(x, y);
                state.registers[0xF] |= state.output_pins[pixel_pos] as u8;
                state.output_pins[pixel_pos] ^= true;
                state.draw = true;
            }
        }
    }
}

define_instruction_with_reg_and_value!(Ldu, LduInstruction, 0xF);
impl ExecutableOpcode for LduInstruction {
    fn execute(&self, state: &mut Chip8, _keypad: &dyn Keypad) {
        let reg = util::reg(self.reg);
        match self.value {
            0x07 => {
                state.registers[reg] = state.delay_timer;
            }
            0x0A => {
                debug!("Waiting for a key to store in V{:X}", reg);
                state.wait_state = WaitState::WaitingForKey(self.reg);
            }
            0x15 => {
                state.delay_timer = state.registers[reg];
            }
            0x18 => {
                state.sound_timer = state.registers[reg];
            }
            0x1E => {
                state.index = state.index.wrapping_add(state.registers[reg] as u16);
            }
            0x29 => {
                let character = (state.registers[reg] & 0xF) as u16;
                state.index = CHIP8_CHARSET_OFFSET + character * CHIP8_CHARSET_GLYPH_LEN;
            }
            0x33 => {
                let value = state.registers[reg];
                let index = state.index;
                util::write_memory(state, index, value / 100);
                util::write_memory(state, index.wrapping_add(1), (value / 10) % 10);
                util::write_memory(state, index.wrapping_add(2), value % 10);
            }
            0x55 => {
                for r in 0x0..=reg {
                    let address = state.index.wrapping_add(r as u16);
                    let value = state.registers[r];
                    util::write_memory(state, address, value);
                }
            }
            0x65 => {
                for r in 0x0..=reg {
                    let address = state.index.wrapping_add(r as u16);
                    state.registers[r] = util::read_memory(state, address);
                }
            }
            value => debug!("Ignoring undefined opcode F{:X}{:02X}", reg, value),
        }
    }
}
