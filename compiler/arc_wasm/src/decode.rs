//! Decoding an instruction stream back into instructions.
//!
//! Used to inspect compiled output: tests compare decoded instruction
//! lists instead of raw bytes, and the `Display` impl gives a readable
//! listing for debugging.

use std::fmt;

use crate::{leb128, BlockType, Opcode};

/// One decoded instruction with its immediate.
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum Instruction {
    I32Const(i32),
    I64Const(i64),
    F32Const(f32),
    F64Const(f64),
    LocalGet(u32),
    LocalSet(u32),
    LocalTee(u32),
    GlobalGet(u32),
    GlobalSet(u32),
    Call(u32),
    Br(u32),
    BrIf(u32),
    Block(BlockType),
    Loop(BlockType),
    If(BlockType),
    Else,
    End,
    /// Any opcode without an immediate.
    Op(Opcode),
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::I32Const(v) => write!(f, "i32.const {v}"),
            Instruction::I64Const(v) => write!(f, "i64.const {v}"),
            Instruction::F32Const(v) => write!(f, "f32.const {v}"),
            Instruction::F64Const(v) => write!(f, "f64.const {v}"),
            Instruction::LocalGet(i) => write!(f, "local.get {i}"),
            Instruction::LocalSet(i) => write!(f, "local.set {i}"),
            Instruction::LocalTee(i) => write!(f, "local.tee {i}"),
            Instruction::GlobalGet(i) => write!(f, "global.get {i}"),
            Instruction::GlobalSet(i) => write!(f, "global.set {i}"),
            Instruction::Call(i) => write!(f, "call {i}"),
            Instruction::Br(d) => write!(f, "br {d}"),
            Instruction::BrIf(d) => write!(f, "br_if {d}"),
            Instruction::Block(bt) => write!(f, "block {bt}"),
            Instruction::Loop(bt) => write!(f, "loop {bt}"),
            Instruction::If(bt) => write!(f, "if {bt}"),
            Instruction::Else => f.write_str("else"),
            Instruction::End => f.write_str("end"),
            Instruction::Op(op) => f.write_str(op.name()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("unexpected end of stream at offset {offset}")]
    UnexpectedEnd { offset: usize },

    #[error("unknown opcode 0x{byte:02X} at offset {offset}")]
    UnknownOpcode { byte: u8, offset: usize },

    #[error("malformed LEB128 immediate at offset {offset}")]
    InvalidImmediate { offset: usize },

    #[error("invalid block type 0x{byte:02X} at offset {offset}")]
    InvalidBlockType { byte: u8, offset: usize },
}

/// Decode a whole stream.
pub fn decode(bytes: &[u8]) -> Result<Vec<Instruction>, DecodeError> {
    let mut out = Vec::new();
    let mut pos = 0;
    while pos < bytes.len() {
        let (instr, next) = decode_one(bytes, pos)?;
        out.push(instr);
        pos = next;
    }
    Ok(out)
}

/// Render a stream one instruction per line.
pub fn disassemble(bytes: &[u8]) -> Result<String, DecodeError> {
    let lines: Vec<String> = decode(bytes)?.iter().map(ToString::to_string).collect();
    Ok(lines.join("\n"))
}

fn decode_one(bytes: &[u8], pos: usize) -> Result<(Instruction, usize), DecodeError> {
    let byte = *bytes
        .get(pos)
        .ok_or(DecodeError::UnexpectedEnd { offset: pos })?;
    let op = Opcode::from_byte(byte).ok_or(DecodeError::UnknownOpcode { byte, offset: pos })?;
    let at = pos + 1;

    let u32_imm = |wrap: fn(u32) -> Instruction| -> Result<(Instruction, usize), DecodeError> {
        leb128::read_u32(bytes, at)
            .map(|(v, n)| (wrap(v), at + n))
            .ok_or(DecodeError::InvalidImmediate { offset: at })
    };
    let block_imm =
        |wrap: fn(BlockType) -> Instruction| -> Result<(Instruction, usize), DecodeError> {
        let byte = *bytes
            .get(at)
            .ok_or(DecodeError::UnexpectedEnd { offset: at })?;
        let bt = BlockType::from_byte(byte)
            .ok_or(DecodeError::InvalidBlockType { byte, offset: at })?;
        Ok((wrap(bt), at + 1))
    };

    match op {
        Opcode::I32Const => leb128::read_i32(bytes, at)
            .map(|(v, n)| (Instruction::I32Const(v), at + n))
            .ok_or(DecodeError::InvalidImmediate { offset: at }),
        Opcode::I64Const => leb128::read_i64(bytes, at)
            .map(|(v, n)| (Instruction::I64Const(v), at + n))
            .ok_or(DecodeError::InvalidImmediate { offset: at }),
        Opcode::F32Const => {
            let raw: [u8; 4] = bytes
                .get(at..at + 4)
                .and_then(|s| s.try_into().ok())
                .ok_or(DecodeError::UnexpectedEnd { offset: at })?;
            Ok((Instruction::F32Const(f32::from_le_bytes(raw)), at + 4))
        }
        Opcode::F64Const => {
            let raw: [u8; 8] = bytes
                .get(at..at + 8)
                .and_then(|s| s.try_into().ok())
                .ok_or(DecodeError::UnexpectedEnd { offset: at })?;
            Ok((Instruction::F64Const(f64::from_le_bytes(raw)), at + 8))
        }
        Opcode::LocalGet => u32_imm(Instruction::LocalGet),
        Opcode::LocalSet => u32_imm(Instruction::LocalSet),
        Opcode::LocalTee => u32_imm(Instruction::LocalTee),
        Opcode::GlobalGet => u32_imm(Instruction::GlobalGet),
        Opcode::GlobalSet => u32_imm(Instruction::GlobalSet),
        Opcode::Call => u32_imm(Instruction::Call),
        Opcode::Br => u32_imm(Instruction::Br),
        Opcode::BrIf => u32_imm(Instruction::BrIf),
        Opcode::Block => block_imm(Instruction::Block),
        Opcode::Loop => block_imm(Instruction::Loop),
        Opcode::If => block_imm(Instruction::If),
        Opcode::Else => Ok((Instruction::Else, at)),
        Opcode::End => Ok((Instruction::End, at)),
        other => Ok((Instruction::Op(other), at)),
    }
}

#[cfg(test)]
mod tests;
