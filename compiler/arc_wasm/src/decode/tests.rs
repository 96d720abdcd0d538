use super::*;
use crate::{ValueType, Writer};
use pretty_assertions::assert_eq;

#[test]
fn decodes_every_immediate_form() {
    let mut w = Writer::new();
    w.write_i32_const(-5);
    w.write_i64_const(1 << 40);
    w.write_f32_const(2.5);
    w.write_f64_const(-0.125);
    w.write_local_get(1);
    w.write_local_set(2);
    w.write_local_tee(3);
    w.write_call(17);
    w.write_if(BlockType::Value(ValueType::F64));
    w.write_else();
    w.write_end();
    w.write_opcode(Opcode::F64Add);

    assert_eq!(
        decode(w.bytes()),
        Ok(vec![
            Instruction::I32Const(-5),
            Instruction::I64Const(1 << 40),
            Instruction::F32Const(2.5),
            Instruction::F64Const(-0.125),
            Instruction::LocalGet(1),
            Instruction::LocalSet(2),
            Instruction::LocalTee(3),
            Instruction::Call(17),
            Instruction::If(BlockType::Value(ValueType::F64)),
            Instruction::Else,
            Instruction::End,
            Instruction::Op(Opcode::F64Add),
        ])
    );
}

#[test]
fn unknown_opcode_is_reported_with_offset() {
    assert_eq!(
        decode(&[0x01, 0xFE]),
        Err(DecodeError::UnknownOpcode {
            byte: 0xFE,
            offset: 1
        })
    );
}

#[test]
fn truncated_constant_is_reported() {
    assert_eq!(
        decode(&[0x44, 0x00, 0x00]),
        Err(DecodeError::UnexpectedEnd { offset: 1 })
    );
    assert_eq!(
        decode(&[0x41]),
        Err(DecodeError::InvalidImmediate { offset: 1 })
    );
}

#[test]
fn bad_block_type_is_reported() {
    assert_eq!(
        decode(&[0x04, 0x11]),
        Err(DecodeError::InvalidBlockType {
            byte: 0x11,
            offset: 1
        })
    );
}

#[test]
fn disassembly_is_one_instruction_per_line() {
    let mut w = Writer::new();
    w.write_i32_const(0);
    w.write_call(3);
    w.write_opcode(Opcode::I32Eqz);
    assert_eq!(
        disassemble(w.bytes()).as_deref(),
        Ok("i32.const 0\ncall 3\ni32.eqz")
    );
}
