//! Pure decoding: 4-byte frame → Instruction.
//!
//! The host never receives instruction frames from the generator; this
//! direction exists for the mock device and for checking what went out.

use crate::domain::{Direction, FuncGenError, FuncGenResult, Waveform};

use super::{Frame, Instruction, Opcode, CLEAR_FRAME};

/// Inverse of `encode_argument`.
pub fn decode_argument(bytes: [u8; 3]) -> u32 {
    let [hi, mid, lo] = bytes;
    (u32::from(hi) << 16) | (u32::from(mid) << 8) | u32::from(lo)
}

/// Decode a wire frame into a typed Instruction.
///
/// Fails on an unknown opcode or an argument outside the opcode's range.
pub fn decode(frame: &Frame) -> FuncGenResult<Instruction> {
    if *frame == CLEAR_FRAME {
        return Ok(Instruction::Clear);
    }

    let [op, hi, mid, lo] = *frame;
    let opcode = Opcode::from_byte(op).ok_or_else(|| {
        FuncGenError::InvalidArgument(format!("unknown opcode 0x{op:02X} in frame {frame:?}"))
    })?;
    let value = decode_argument([hi, mid, lo]);

    Ok(match opcode {
        Opcode::CycTicks => Instruction::CycTicks(value),
        Opcode::High => Instruction::High(value),
        Opcode::Low => Instruction::Low(value),
        Opcode::DutyCycle => Instruction::DutyCycle(u8::try_from(value).map_err(|_| {
            FuncGenError::InvalidArgument(format!("duty cycle {value} exceeds 255"))
        })?),
        Opcode::Waveform => Instruction::Waveform(Waveform::try_from(i64::from(value))?),
        Opcode::Direction => Instruction::Direction(Direction::try_from(i64::from(value))?),
    })
}
