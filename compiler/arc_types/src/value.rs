//! Typed constant values.
//!
//! Produced by the literal parser and stored as global constants and
//! parameter defaults. Floats compare and hash by bit pattern so the type
//! can live inside [`Type`] (which is `Eq + Hash`).

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::Type;

#[derive(Clone, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum ConstValue {
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    /// Nanoseconds since the Unix epoch.
    TimeStamp(i64),
    /// Nanoseconds.
    TimeSpan(i64),
    Str(String),
}

impl ConstValue {
    pub fn ty(&self) -> Type {
        match self {
            ConstValue::I8(_) => Type::I8,
            ConstValue::I16(_) => Type::I16,
            ConstValue::I32(_) => Type::I32,
            ConstValue::I64(_) => Type::I64,
            ConstValue::U8(_) => Type::U8,
            ConstValue::U16(_) => Type::U16,
            ConstValue::U32(_) => Type::U32,
            ConstValue::U64(_) => Type::U64,
            ConstValue::F32(_) => Type::F32,
            ConstValue::F64(_) => Type::F64,
            ConstValue::TimeStamp(_) => Type::TimeStamp,
            ConstValue::TimeSpan(_) => Type::TimeSpan,
            ConstValue::Str(_) => Type::String,
        }
    }

    /// Bit-level key used for equality and hashing.
    fn key(&self) -> (u8, u64) {
        match self {
            ConstValue::I8(v) => (0, *v as u64),
            ConstValue::I16(v) => (1, *v as u64),
            ConstValue::I32(v) => (2, *v as u64),
            ConstValue::I64(v) => (3, *v as u64),
            ConstValue::U8(v) => (4, u64::from(*v)),
            ConstValue::U16(v) => (5, u64::from(*v)),
            ConstValue::U32(v) => (6, u64::from(*v)),
            ConstValue::U64(v) => (7, *v),
            ConstValue::F32(v) => (8, u64::from(v.to_bits())),
            ConstValue::F64(v) => (9, v.to_bits()),
            ConstValue::TimeStamp(v) => (10, *v as u64),
            ConstValue::TimeSpan(v) => (11, *v as u64),
            ConstValue::Str(_) => (12, 0),
        }
    }
}

impl PartialEq for ConstValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ConstValue::Str(a), ConstValue::Str(b)) => a == b,
            _ => self.key() == other.key(),
        }
    }
}

impl Eq for ConstValue {}

impl Hash for ConstValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
        if let ConstValue::Str(s) = self {
            s.hash(state);
        }
    }
}

impl fmt::Display for ConstValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstValue::I8(v) => write!(f, "{v}"),
            ConstValue::I16(v) => write!(f, "{v}"),
            ConstValue::I32(v) => write!(f, "{v}"),
            ConstValue::I64(v) | ConstValue::TimeStamp(v) => write!(f, "{v}"),
            ConstValue::TimeSpan(v) => write!(f, "{v}ns"),
            ConstValue::U8(v) => write!(f, "{v}"),
            ConstValue::U16(v) => write!(f, "{v}"),
            ConstValue::U32(v) => write!(f, "{v}"),
            ConstValue::U64(v) => write!(f, "{v}"),
            ConstValue::F32(v) => write!(f, "{v}"),
            ConstValue::F64(v) => write!(f, "{v}"),
            ConstValue::Str(s) => write!(f, "{s:?}"),
        }
    }
}
