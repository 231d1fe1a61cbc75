#[macro_use]
mod macros;
mod arithmetic_and_logic;
mod program_flow;
mod system;

use core::convert::TryFrom;
use std::marker::PhantomData;

use log::error;
use ux::{u12, u4};

use crate::chip::{
    chip8::{
        opcodes::{
            arithmetic_and_logic::{
                AddInstruction, DrwInstruction, LdInstruction, LdrInstruction, LduInstruction,
                RegInstruction, RndInstruction,
            },
            program_flow::{
                CallInstruction, JmpInstruction, JmprInstruction, SeInstruction, SkInstruction,
                SneInstruction, SreInstruction, SrneInstruction,
            },
            system::SysInstruction,
        },
        Chip8,
    },
    Keypad,
};

/// Represents a Chip 8 opcode. A Chip 8 opcode is two bytes long, fetched
/// big-endian from memory. Decoding never fails: every 16-bit value is an opcode,
/// whether or not it names a defined instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Opcode {
    /// The instruction class is the most significant nibble of the opcode.
    /// It selects the instruction family.
    instruction_class: u4,
    /// The payload constitutes the remaining nibbles of the opcode.
    payload: OpcodePayload,
}

/// Represents the payload of a Chip 8 opcode. That is the opcode without
/// the most significant nibble.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct OpcodePayload {
    /// The nibbles representing the payload, most significant first.
    nibbles: [u4; 3],
}

impl OpcodePayload {
    /// Interprets the opcode payload as an address in the range 0x000 to
    /// 0xFFF (inclusive).
    fn address(&self) -> u12 {
        let [high, mid, low] = self.nibbles.map(|nibble| u16::from(u8::from(nibble)));
        u12::new(high << 8 | mid << 4 | low)
    }

    /// Interprets the most significant nibble of the payload as a register
    /// address in range 0x0 - 0xF (inclusive) and the remaining nibbles
    /// as a value in range 0x00 - 0xFF (inclusive) and returns a tuple
    /// representing these values.
    fn reg_and_value(&self) -> (u4, u8) {
        let [reg, high, low] = self.nibbles;
        (reg, u8::from(high) << 4 | u8::from(low))
    }

    /// Interprets the opcode payload as three operands, each of size
    /// one nibble. For most instructions the first two are register
    /// addresses (X and Y) and the last one is a small value (N).
    fn operands(&self) -> (u4, u4, u4) {
        let [op1, op2, op3] = self.nibbles;
        (op1, op2, op3)
    }
}

impl Opcode {
    /// Constructs a new `Opcode` given its byte representation.
    pub(super) fn new(opcode: &[u8; 2]) -> Opcode {
        Opcode {
            instruction_class: u4::new(opcode[0] >> 4),
            payload: OpcodePayload {
                nibbles: [
                    u4::new(opcode[0] & 0xF),
                    u4::new(opcode[1] >> 4),
                    u4::new(opcode[1] & 0xF),
                ],
            },
        }
    }

    /// Executes `self` against `state`. The program counter is expected to already
    /// point past this opcode.
    pub(super) fn execute(self, state: &mut Chip8, keypad: &dyn Keypad) {
        fn dispatch<T>(opcode: Opcode, state: &mut Chip8, keypad: &dyn Keypad)
        where
            T: ExecutableOpcode + TryFrom<Opcode, Error = InstructionParsingError>,
        {
            match T::try_from(opcode) {
                Ok(instruction) => instruction.execute(state, keypad),
                Err(e) => error!("{}", e),
            }
        }

        match u8::from(self.instruction_class) {
            0x0 => dispatch::<SysInstruction>(self, state, keypad),
            0x1 => dispatch::<JmpInstruction>(self, state, keypad),
            0x2 => dispatch::<CallInstruction>(self, state, keypad),
            0x3 => dispatch::<SeInstruction>(self, state, keypad),
            0x4 => dispatch::<SneInstruction>(self, state, keypad),
            0x5 => dispatch::<SreInstruction>(self, state, keypad),
            0x6 => dispatch::<LdrInstruction>(self, state, keypad),
            0x7 => dispatch::<AddInstruction>(self, state, keypad),
            0x8 => dispatch::<RegInstruction>(self, state, keypad),
            0x9 => dispatch::<SrneInstruction>(self, state, keypad),
            0xA => dispatch::<LdInstruction>(self, state, keypad),
            0xB => dispatch::<JmprInstruction>(self, state, keypad),
            0xC => dispatch::<RndInstruction>(self, state, keypad),
            0xD => dispatch::<DrwInstruction>(self, state, keypad),
            0xE => dispatch::<SkInstruction>(self, state, keypad),
            // the class is a nibble, so this is 0xF
            _ => dispatch::<LduInstruction>(self, state, keypad),
        };
    }
}

/// Captures errors when converting opcodes to their respective instruction object.
#[derive(Debug, thiserror::Error)]
pub(super) enum InstructionParsingError {
    #[error("Instruction class {0:X} does not match the target instruction class {1:X}")]
    InvalidInstructionClass(u8, u8),
}

/// Represents an opcode that can be executed.
trait ExecutableOpcode {
    /// Executes `self` relative to the given state. Note that this
    /// method will in-place modify the given state.
    fn execute(&self, state: &mut Chip8, keypad: &dyn Keypad);
}

/// Represents an opcode that expects the payload to be an address.
struct InstructionWithAddress<T> {
    instruction: PhantomData<T>,
    address: u12,
}

/// Represents an opcode that expects the payload to be three operands.
struct InstructionWithOperands<T> {
    instruction: PhantomData<T>,
    op1: u4,
    op2: u4,
    op3: u4,
}

/// Represents an opcode that expects the payload to be a register pointer and a value.
struct InstructionWithRegAndValue<T> {
    instruction: PhantomData<T>,
    reg: u4,
    value: u8,
}

impl std::fmt::Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:X}{}", u8::from(self.instruction_class), self.payload)
    }
}

impl std::fmt::Display for OpcodePayload {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let [a, b, c] = self.nibbles;
        write!(f, "{:X}{:X}{:X}", u8::from(a), u8::from(b), u8::from(c))
    }
}
