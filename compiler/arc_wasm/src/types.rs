//! Value, block and function types.

use std::fmt;

/// Machine value type of a stack slot.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ValueType {
    I32,
    I64,
    F32,
    F64,
}

impl ValueType {
    pub const fn byte(self) -> u8 {
        match self {
            ValueType::I32 => 0x7F,
            ValueType::I64 => 0x7E,
            ValueType::F32 => 0x7D,
            ValueType::F64 => 0x7C,
        }
    }

    pub const fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x7F => Some(ValueType::I32),
            0x7E => Some(ValueType::I64),
            0x7D => Some(ValueType::F32),
            0x7C => Some(ValueType::F64),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            ValueType::I32 => "i32",
            ValueType::I64 => "i64",
            ValueType::F32 => "f32",
            ValueType::F64 => "f64",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result signature of a structured block (`if`, `block`, `loop`).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BlockType {
    Empty,
    Value(ValueType),
}

impl BlockType {
    const EMPTY_BYTE: u8 = 0x40;

    pub const fn byte(self) -> u8 {
        match self {
            BlockType::Empty => Self::EMPTY_BYTE,
            BlockType::Value(vt) => vt.byte(),
        }
    }

    pub const fn from_byte(byte: u8) -> Option<Self> {
        if byte == Self::EMPTY_BYTE {
            return Some(BlockType::Empty);
        }
        match ValueType::from_byte(byte) {
            Some(vt) => Some(BlockType::Value(vt)),
            None => None,
        }
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockType::Empty => Ok(()),
            BlockType::Value(vt) => write!(f, "(result {vt})"),
        }
    }
}

/// Signature of a callable function.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct FuncType {
    pub params: Vec<ValueType>,
    pub results: Vec<ValueType>,
}

impl FuncType {
    pub fn new(params: &[ValueType], results: &[ValueType]) -> Self {
        FuncType {
            params: params.to_vec(),
            results: results.to_vec(),
        }
    }
}

impl fmt::Display for FuncType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let join = |tys: &[ValueType]| {
            tys.iter()
                .map(|t| t.name())
                .collect::<Vec<_>>()
                .join(", ")
        };
        write!(f, "({}) -> ({})", join(&self.params), join(&self.results))
    }
}
