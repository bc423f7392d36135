//! Core domain types

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{FuncGenError, FuncGenResult};

/// Output waveform shape, as understood by the generator firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Waveform {
    Const = 0,
    Pwm = 1,
    Zigzag = 2,
    Ramp = 3,
}

impl Waveform {
    pub const ALL: [Waveform; 4] = [Self::Const, Self::Pwm, Self::Zigzag, Self::Ramp];

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Const => "const",
            Self::Pwm => "pwm",
            Self::Zigzag => "zigzag",
            Self::Ramp => "ramp",
        }
    }
}

impl TryFrom<i64> for Waveform {
    type Error = FuncGenError;

    fn try_from(value: i64) -> FuncGenResult<Self> {
        Self::ALL
            .into_iter()
            .find(|w| i64::from(w.code()) == value)
            .ok_or_else(|| {
                FuncGenError::InvalidArgument(format!(
                    "waveform must be 0, 1, 2 or 3 but was {value}"
                ))
            })
    }
}

impl FromStr for Waveform {
    type Err = FuncGenError;

    /// Accepts either the numeric code or the lowercase name (`"pwm"`).
    fn from_str(s: &str) -> FuncGenResult<Self> {
        let s = s.trim();
        if let Ok(code) = s.parse::<i64>() {
            return Self::try_from(code);
        }
        Self::ALL
            .into_iter()
            .find(|w| w.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| FuncGenError::InvalidArgument(format!("unknown waveform '{s}'")))
    }
}

impl fmt::Display for Waveform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Sweep direction for the ramp and zigzag shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up = 0,
    Down = 1,
}

impl Direction {
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl TryFrom<i64> for Direction {
    type Error = FuncGenError;

    fn try_from(value: i64) -> FuncGenResult<Self> {
        match value {
            0 => Ok(Self::Up),
            1 => Ok(Self::Down),
            _ => Err(FuncGenError::InvalidArgument(format!(
                "direction must be 0 or 1 but was {value}"
            ))),
        }
    }
}

impl FromStr for Direction {
    type Err = FuncGenError;

    fn from_str(s: &str) -> FuncGenResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "0" | "up" => Ok(Self::Up),
            "1" | "down" => Ok(Self::Down),
            other => Err(FuncGenError::InvalidArgument(format!(
                "unknown direction '{other}'"
            ))),
        }
    }
}

/// Information about a serial port
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerialPortInfo {
    pub name: String,
    pub port_type: String,
}

impl SerialPortInfo {
    /// USB-serial adapters show up as `ttyUSB*` on Linux; other platforms
    /// are recognised by the reported port type.
    pub fn is_usb(&self) -> bool {
        self.name.contains("ttyUSB") || self.port_type.starts_with("USB")
    }
}
