//! Pure encoding: Instruction → 4-byte frame.
//!
//! No I/O, no side effects. Easy to unit-test without any serial port.

use crate::domain::{FuncGenError, FuncGenResult, MAX_ARGUMENT};

use super::{Frame, Instruction, Opcode, CLEAR_FRAME};

/// Encode a 24-bit value as three big-endian bytes.
///
/// Values above `0xFFFFFF` do not fit the argument field and are rejected
/// rather than truncated.
pub fn encode_argument(value: u32) -> FuncGenResult<[u8; 3]> {
    if value > MAX_ARGUMENT {
        return Err(FuncGenError::InvalidArgument(format!(
            "argument {value} exceeds 24-bit maximum {MAX_ARGUMENT}"
        )));
    }
    Ok([
        ((value >> 16) & 0xFF) as u8,
        ((value >> 8) & 0xFF) as u8,
        (value & 0xFF) as u8,
    ])
}

/// Prepend the opcode byte to an encoded argument.
pub fn encode_instruction(opcode: Opcode, argument: [u8; 3]) -> Frame {
    let [hi, mid, lo] = argument;
    [opcode.byte(), hi, mid, lo]
}

/// Encode an Instruction into its wire frame.
pub fn encode(instruction: &Instruction) -> FuncGenResult<Frame> {
    match instruction.opcode() {
        Some(opcode) => Ok(encode_instruction(
            opcode,
            encode_argument(instruction.argument())?,
        )),
        None => Ok(CLEAR_FRAME),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Direction, Waveform};

    #[test]
    fn encode_argument_zero() {
        assert_eq!(encode_argument(0).unwrap(), [0, 0, 0]);
    }

    #[test]
    fn encode_argument_byte_boundary() {
        assert_eq!(encode_argument(255).unwrap(), [0, 0, 255]);
        assert_eq!(encode_argument(256).unwrap(), [0, 1, 0]);
    }

    #[test]
    fn encode_argument_full_scale_dac() {
        assert_eq!(encode_argument(4095).unwrap(), [0, 15, 255]);
    }

    #[test]
    fn encode_argument_is_big_endian() {
        assert_eq!(encode_argument(0x12_34_56).unwrap(), [0x12, 0x34, 0x56]);
        assert_eq!(encode_argument(0xFF_FF_FF).unwrap(), [0xFF, 0xFF, 0xFF]);
    }

    #[test]
    fn encode_argument_rejects_over_24_bits() {
        assert!(matches!(
            encode_argument(0x01_00_00_00),
            Err(FuncGenError::InvalidArgument(_))
        ));
        assert!(encode_argument(u32::MAX).is_err());
    }

    #[test]
    fn encode_instruction_prepends_opcode() {
        assert_eq!(
            encode_instruction(Opcode::High, [0, 15, 255]),
            [2, 0, 15, 255]
        );
    }

    #[test]
    fn encode_clear_is_sentinel() {
        assert_eq!(encode(&Instruction::Clear).unwrap(), [0xFF; 4]);
    }

    #[test]
    fn encode_waveform_zigzag() {
        assert_eq!(
            encode(&Instruction::Waveform(Waveform::Zigzag)).unwrap(),
            [5, 0, 0, 2]
        );
    }

    #[test]
    fn encode_duty_cycle() {
        assert_eq!(encode(&Instruction::DutyCycle(255)).unwrap(), [4, 0, 0, 255]);
    }

    #[test]
    fn encode_direction_down() {
        assert_eq!(
            encode(&Instruction::Direction(Direction::Down)).unwrap(),
            [6, 0, 0, 1]
        );
    }

    #[test]
    fn encode_cyc_ticks_three_bytes() {
        assert_eq!(
            encode(&Instruction::CycTicks(1_470_588)).unwrap(),
            [1, 0x16, 0x70, 0x7C]
        );
    }

    #[test]
    fn encode_oversized_cyc_ticks_fails() {
        assert!(encode(&Instruction::CycTicks(1 << 24)).is_err());
    }
}
