//! Command line configuration of the text UI host.

use std::path::PathBuf;

use clap::Parser;

use crate::chip::ProgramFormat;

/// Instructions executed per second unless configured otherwise.
pub const DEFAULT_INSTRUCTIONS_PER_SECOND: u32 = 1000;

/// Display refreshes per second unless configured otherwise.
pub const DEFAULT_FRAME_RATE: u32 = 60;

/// Runs a CHIP-8 program in the terminal.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(version, about)]
pub struct Config {
    /// Path to the program image.
    pub program: PathBuf,

    /// Treat the program file as ASCII hex digits instead of raw bytes.
    #[arg(long)]
    pub hex: bool,

    /// Instructions executed per second.
    #[arg(long, default_value_t = DEFAULT_INSTRUCTIONS_PER_SECOND, value_parser = clap::value_parser!(u32).range(1..))]
    pub ips: u32,

    /// Maximum display refreshes per second.
    #[arg(long, default_value_t = DEFAULT_FRAME_RATE, value_parser = clap::value_parser!(u32).range(1..))]
    pub frame_rate: u32,

    /// Seed for the random opcode. Drawn from the operating system if absent.
    #[arg(long)]
    pub seed: Option<u64>,
}

impl Config {
    pub fn program_format(&self) -> ProgramFormat {
        if self.hex {
            ProgramFormat::Hex
        } else {
            ProgramFormat::Binary
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::try_parse_from(["emulator_text_ui", "pong.ch8"]).unwrap();
        assert_eq!(config.program, PathBuf::from("pong.ch8"));
        assert_eq!(config.ips, DEFAULT_INSTRUCTIONS_PER_SECOND);
        assert_eq!(config.frame_rate, DEFAULT_FRAME_RATE);
        assert_eq!(config.seed, None);
        assert_eq!(config.program_format(), ProgramFormat::Binary);
    }

    #[test]
    fn all_options() {
        let config = Config::try_parse_from([
            "emulator_text_ui",
            "--hex",
            "--ips",
            "500",
            "--frame-rate",
            "30",
            "--seed",
            "42",
            "pong.hex",
        ])
        .unwrap();
        assert_eq!(config.ips, 500);
        assert_eq!(config.frame_rate, 30);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.program_format(), ProgramFormat::Hex);
    }

    #[test]
    fn program_is_required() {
        assert!(Config::try_parse_from(["emulator_text_ui"]).is_err());
    }

    #[test]
    fn rates_must_be_positive() {
        assert!(Config::try_parse_from(["emulator_text_ui", "--ips", "0", "a.ch8"]).is_err());
        assert!(Config::try_parse_from(["emulator_text_ui", "--frame-rate", "0", "a.ch8"]).is_err());
    }
}
