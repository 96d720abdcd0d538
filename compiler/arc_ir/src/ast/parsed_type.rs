//! Type annotations as written in source (cast targets).

use std::fmt;

/// A type as it appears in a cast such as `i32(x)` or `f64(s)`.
///
/// Resolution to a semantic type happens in `arc_types`.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum ParsedType {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    Str,
    TimeStamp,
    TimeSpan,
    Series(Box<ParsedType>),
    Chan(Box<ParsedType>),
}

impl ParsedType {
    /// Look up a primitive type keyword.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Some(match keyword {
            "i8" => Self::I8,
            "i16" => Self::I16,
            "i32" => Self::I32,
            "i64" => Self::I64,
            "u8" => Self::U8,
            "u16" => Self::U16,
            "u32" => Self::U32,
            "u64" => Self::U64,
            "f32" => Self::F32,
            "f64" => Self::F64,
            "str" => Self::Str,
            "timestamp" => Self::TimeStamp,
            "timespan" => Self::TimeSpan,
            _ => return None,
        })
    }

    pub fn series(elem: ParsedType) -> Self {
        Self::Series(Box::new(elem))
    }

    pub fn chan(elem: ParsedType) -> Self {
        Self::Chan(Box::new(elem))
    }
}

impl fmt::Display for ParsedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keyword = match self {
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::Str => "str",
            Self::TimeStamp => "timestamp",
            Self::TimeSpan => "timespan",
            Self::Series(elem) => return write!(f, "series {elem}"),
            Self::Chan(elem) => return write!(f, "chan {elem}"),
        };
        f.write_str(keyword)
    }
}
