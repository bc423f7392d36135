//! Binary instruction layer for the function generator.
//!
//! Every instruction is a 4-byte frame: an opcode byte followed by a
//! 24-bit big-endian argument. The concerns are split like this:
//! - `encode`: typed value → frame bytes (pure, no I/O)
//! - `decode`: frame bytes → typed value (pure, no I/O)
//! - `connection`: own the serial port, send frames and drain replies

pub mod connection;
pub mod decode;
pub mod encode;

pub use connection::DeviceConnection;
pub use decode::{decode, decode_argument};
pub use encode::{encode, encode_argument, encode_instruction};

use std::fmt;

/// Length of every instruction frame on the wire
pub const FRAME_LEN: usize = 4;

/// A complete instruction frame
pub type Frame = [u8; FRAME_LEN];

/// Reset frame; not tagged with an opcode.
pub const CLEAR_FRAME: Frame = [0xFF; FRAME_LEN];

/// Opcode byte values understood by the firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    CycTicks = 1,
    High = 2,
    Low = 3,
    DutyCycle = 4,
    Waveform = 5,
    Direction = 6,
}

impl Opcode {
    pub const ALL: [Opcode; 6] = [
        Self::CycTicks,
        Self::High,
        Self::Low,
        Self::DutyCycle,
        Self::Waveform,
        Self::Direction,
    ];

    pub fn byte(self) -> u8 {
        self as u8
    }

    pub fn from_byte(byte: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.byte() == byte)
    }
}

/// High-level instructions, already converted to device units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    Clear,
    /// Cycle-tick count per output period
    CycTicks(u32),
    /// DAC code of the high level
    High(u32),
    /// DAC code of the low level
    Low(u32),
    DutyCycle(u8),
    Waveform(crate::domain::Waveform),
    Direction(crate::domain::Direction),
}

impl Instruction {
    /// The opcode tag, or `None` for the clear sentinel.
    pub fn opcode(&self) -> Option<Opcode> {
        match self {
            Self::Clear => None,
            Self::CycTicks(_) => Some(Opcode::CycTicks),
            Self::High(_) => Some(Opcode::High),
            Self::Low(_) => Some(Opcode::Low),
            Self::DutyCycle(_) => Some(Opcode::DutyCycle),
            Self::Waveform(_) => Some(Opcode::Waveform),
            Self::Direction(_) => Some(Opcode::Direction),
        }
    }

    /// The 24-bit argument in device units. The clear sentinel's argument
    /// bytes are all 0xFF.
    pub fn argument(&self) -> u32 {
        match *self {
            Self::Clear => crate::domain::MAX_ARGUMENT,
            Self::CycTicks(value) | Self::High(value) | Self::Low(value) => value,
            Self::DutyCycle(dc) => u32::from(dc),
            Self::Waveform(wv) => u32::from(wv.code()),
            Self::Direction(d) => u32::from(d.code()),
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clear => write!(f, "CLEAR"),
            Self::CycTicks(ct) => write!(f, "CYCTICKS {ct}"),
            Self::High(code) => write!(f, "HIGH {code}"),
            Self::Low(code) => write!(f, "LOW {code}"),
            Self::DutyCycle(dc) => write!(f, "DUTYCYCLE {dc}"),
            Self::Waveform(wv) => write!(f, "WVFRM {wv}"),
            Self::Direction(d) => write!(f, "DIRECTION {}", d.code()),
        }
    }
}

/// Render bytes as space-separated hex for logs.
pub fn hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}
