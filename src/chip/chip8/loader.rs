use log::info;

use crate::chip::{
    chip8::{
        constants::{CHIP8_MAX_PROGRAM_SIZE, CHIP8_PROGRAM_OFFSET},
        Chip8,
    },
    LoadProgramError,
};

impl Chip8 {
    /// Copies `program` into memory starting at 0x200 and returns the number of
    /// bytes written. Programs that do not fit into 0x200 - 0xFFF are rejected and
    /// leave memory untouched.
    pub fn load_program_bytes(&mut self, program: &[u8]) -> Result<usize, LoadProgramError> {
        if program.len() > CHIP8_MAX_PROGRAM_SIZE {
            return Err(LoadProgramError::ProgramTooLarge(program.len()));
        }

        let start = CHIP8_PROGRAM_OFFSET as usize;
        self.memory[start..start + program.len()].copy_from_slice(program);
        info!("Loaded {} bytes at {:03X}", program.len(), start);
        Ok(program.len())
    }
}

/// Decodes a program written as ASCII hex digits, two digits per byte, most
/// significant digit first. Digits are case-insensitive. A trailing unpaired digit
/// is ignored and decoding stops once the program region is full.
pub fn parse_hex(text: &[u8]) -> Result<Vec<u8>, LoadProgramError> {
    fn digit(position: usize, c: u8) -> Result<u8, LoadProgramError> {
        (c as char)
            .to_digit(16)
            .map(|d| d as u8)
            .ok_or(LoadProgramError::InvalidHexDigit {
                position,
                digit: c as char,
            })
    }

    text.chunks_exact(2)
        .take(CHIP8_MAX_PROGRAM_SIZE)
        .enumerate()
        .map(|(i, pair)| -> Result<u8, LoadProgramError> {
            Ok(digit(2 * i, pair[0])? << 4 | digit(2 * i + 1, pair[1])?)
        })
        .collect()
}
