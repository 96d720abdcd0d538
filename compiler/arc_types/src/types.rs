//! The Arc type model.
//!
//! Scalar kinds, the two container kinds (`series T`, `chan T`), function
//! signatures, and the predicates and lowering rules the compiler keys its
//! opcode and host-call selection on. Booleans are `u8`.

use std::fmt;

use arc_ir::ParsedType;
use arc_wasm::ValueType;

use crate::ConstValue;

/// Discriminant of a [`Type`], without payload.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum Kind {
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
    String,
    TimeStamp,
    TimeSpan,
    Series,
    Chan,
    Function,
    Unresolved,
}

impl Kind {
    /// Scalar kinds that have host bindings (channels, state, series elements).
    pub const NUMERIC: [Kind; 10] = [
        Kind::F64,
        Kind::F32,
        Kind::I64,
        Kind::I32,
        Kind::I16,
        Kind::I8,
        Kind::U64,
        Kind::U32,
        Kind::U16,
        Kind::U8,
    ];

    /// Suffix used in host import names, e.g. `f64` in `channel_read_f64`.
    pub const fn suffix(self) -> &'static str {
        match self {
            Kind::I8 => "i8",
            Kind::I16 => "i16",
            Kind::I32 => "i32",
            Kind::I64 => "i64",
            Kind::U8 => "u8",
            Kind::U16 => "u16",
            Kind::U32 => "u32",
            Kind::U64 => "u64",
            Kind::F32 => "f32",
            Kind::F64 => "f64",
            Kind::String => "str",
            Kind::TimeStamp => "timestamp",
            Kind::TimeSpan => "timespan",
            Kind::Series => "series",
            Kind::Chan => "chan",
            Kind::Function => "function",
            Kind::Unresolved => "unresolved",
        }
    }
}

/// A named function parameter or output.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Param {
    pub name: String,
    pub ty: Type,
    /// Default for an optional parameter.
    pub default: Option<ConstValue>,
}

impl Param {
    pub fn new(name: &str, ty: Type) -> Self {
        Param {
            name: name.to_owned(),
            ty,
            default: None,
        }
    }

    #[must_use]
    pub fn with_default(mut self, value: ConstValue) -> Self {
        self.default = Some(value);
        self
    }
}

/// Name of the output a call expression evaluates to.
pub const DEFAULT_OUTPUT: &str = "output";

#[derive(Clone, Eq, PartialEq, Hash, Debug, Default)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct FunctionType {
    pub inputs: Vec<Param>,
    pub outputs: Vec<Param>,
}

impl FunctionType {
    pub fn new(inputs: Vec<Param>, outputs: Vec<Param>) -> Self {
        FunctionType { inputs, outputs }
    }

    /// Number of inputs without a default.
    pub fn required_inputs(&self) -> usize {
        self.inputs.iter().filter(|p| p.default.is_none()).count()
    }

    /// The output a call evaluates to: the one named `output`, or the only
    /// output if there is exactly one.
    pub fn default_output(&self) -> Option<&Type> {
        self.outputs
            .iter()
            .find(|p| p.name == DEFAULT_OUTPUT)
            .or(match self.outputs.as_slice() {
                [only] => Some(only),
                _ => None,
            })
            .map(|p| &p.ty)
    }
}

/// A resolved Arc type.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum Type {
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
    String,
    TimeStamp,
    TimeSpan,
    Series(Box<Type>),
    Chan(Box<Type>),
    Function(Box<FunctionType>),
    /// No type, e.g. the result of calling a function with no default output.
    Unresolved,
}

impl Type {
    pub fn series(elem: Type) -> Self {
        Type::Series(Box::new(elem))
    }

    pub fn chan(elem: Type) -> Self {
        Type::Chan(Box::new(elem))
    }

    pub fn function(ty: FunctionType) -> Self {
        Type::Function(Box::new(ty))
    }

    pub fn from_parsed(parsed: &ParsedType) -> Self {
        match parsed {
            ParsedType::I8 => Type::I8,
            ParsedType::I16 => Type::I16,
            ParsedType::I32 => Type::I32,
            ParsedType::I64 => Type::I64,
            ParsedType::U8 => Type::U8,
            ParsedType::U16 => Type::U16,
            ParsedType::U32 => Type::U32,
            ParsedType::U64 => Type::U64,
            ParsedType::F32 => Type::F32,
            ParsedType::F64 => Type::F64,
            ParsedType::Str => Type::String,
            ParsedType::TimeStamp => Type::TimeStamp,
            ParsedType::TimeSpan => Type::TimeSpan,
            ParsedType::Series(elem) => Type::series(Type::from_parsed(elem)),
            ParsedType::Chan(elem) => Type::chan(Type::from_parsed(elem)),
        }
    }

    pub fn kind(&self) -> Kind {
        match self {
            Type::I8 => Kind::I8,
            Type::I16 => Kind::I16,
            Type::I32 => Kind::I32,
            Type::I64 => Kind::I64,
            Type::U8 => Kind::U8,
            Type::U16 => Kind::U16,
            Type::U32 => Kind::U32,
            Type::U64 => Kind::U64,
            Type::F32 => Kind::F32,
            Type::F64 => Kind::F64,
            Type::String => Kind::String,
            Type::TimeStamp => Kind::TimeStamp,
            Type::TimeSpan => Kind::TimeSpan,
            Type::Series(_) => Kind::Series,
            Type::Chan(_) => Kind::Chan,
            Type::Function(_) => Kind::Function,
            Type::Unresolved => Kind::Unresolved,
        }
    }

    /// The scalar type for a kind, if it has no payload.
    pub fn from_kind(kind: Kind) -> Option<Type> {
        Some(match kind {
            Kind::I8 => Type::I8,
            Kind::I16 => Type::I16,
            Kind::I32 => Type::I32,
            Kind::I64 => Type::I64,
            Kind::U8 => Type::U8,
            Kind::U16 => Type::U16,
            Kind::U32 => Type::U32,
            Kind::U64 => Type::U64,
            Kind::F32 => Type::F32,
            Kind::F64 => Type::F64,
            Kind::String => Type::String,
            Kind::TimeStamp => Type::TimeStamp,
            Kind::TimeSpan => Type::TimeSpan,
            Kind::Unresolved => Type::Unresolved,
            Kind::Series | Kind::Chan | Kind::Function => return None,
        })
    }

    pub fn is_signed_integer(&self) -> bool {
        matches!(self, Type::I8 | Type::I16 | Type::I32 | Type::I64)
    }

    pub fn is_unsigned(&self) -> bool {
        matches!(self, Type::U8 | Type::U16 | Type::U32 | Type::U64)
    }

    pub fn is_integer(&self) -> bool {
        self.is_signed_integer() || self.is_unsigned()
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Type::F32 | Type::F64)
    }

    pub fn is_numeric(&self) -> bool {
        self.is_integer() || self.is_float()
    }

    pub fn is_temporal(&self) -> bool {
        matches!(self, Type::TimeStamp | Type::TimeSpan)
    }

    /// Values that support arithmetic and ordering.
    pub fn is_arithmetic(&self) -> bool {
        self.is_numeric() || self.is_temporal()
    }

    /// Whether division, remainder and ordering use the signed opcodes.
    /// True for floats and temporal types as well as signed integers.
    pub fn uses_signed_ops(&self) -> bool {
        self.is_signed_integer() || self.is_float() || self.is_temporal()
    }

    pub fn is_64bit(&self) -> bool {
        matches!(
            self,
            Type::I64 | Type::U64 | Type::F64 | Type::TimeStamp | Type::TimeSpan
        )
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Type::U8)
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Type::String)
    }

    pub fn is_series(&self) -> bool {
        matches!(self, Type::Series(_))
    }

    pub fn is_chan(&self) -> bool {
        matches!(self, Type::Chan(_))
    }

    /// Strip one level of `chan`. Series are left alone.
    pub fn unwrap(&self) -> &Type {
        match self {
            Type::Chan(elem) => elem,
            other => other,
        }
    }

    /// Element type of a series or channel.
    pub fn elem(&self) -> Option<&Type> {
        match self {
            Type::Series(elem) | Type::Chan(elem) => Some(elem),
            _ => None,
        }
    }

    /// Width in bits of a scalar numeric or temporal type.
    pub fn bits(&self) -> Option<u32> {
        Some(match self {
            Type::I8 | Type::U8 => 8,
            Type::I16 | Type::U16 => 16,
            Type::I32 | Type::U32 | Type::F32 => 32,
            Type::I64 | Type::U64 | Type::F64 | Type::TimeStamp | Type::TimeSpan => 64,
            _ => return None,
        })
    }

    /// Machine representation. Strings, series and channels are i32 handles.
    pub fn value_type(&self) -> Option<ValueType> {
        Some(match self {
            Type::I8
            | Type::I16
            | Type::I32
            | Type::U8
            | Type::U16
            | Type::U32
            | Type::String
            | Type::Series(_)
            | Type::Chan(_) => ValueType::I32,
            Type::I64 | Type::U64 | Type::TimeStamp | Type::TimeSpan => ValueType::I64,
            Type::F32 => ValueType::F32,
            Type::F64 => ValueType::F64,
            Type::Function(_) | Type::Unresolved => return None,
        })
    }

    /// Runtime zero value of a scalar type.
    pub fn zero_value(&self) -> Option<ConstValue> {
        Some(match self {
            Type::I8 => ConstValue::I8(0),
            Type::I16 => ConstValue::I16(0),
            Type::I32 => ConstValue::I32(0),
            Type::I64 => ConstValue::I64(0),
            Type::U8 => ConstValue::U8(0),
            Type::U16 => ConstValue::U16(0),
            Type::U32 => ConstValue::U32(0),
            Type::U64 => ConstValue::U64(0),
            Type::F32 => ConstValue::F32(0.0),
            Type::F64 => ConstValue::F64(0.0),
            Type::TimeStamp => ConstValue::TimeStamp(0),
            Type::TimeSpan => ConstValue::TimeSpan(0),
            Type::String => ConstValue::Str(String::new()),
            _ => return None,
        })
    }

    /// Common type two numeric types meet at.
    ///
    /// - equal types stay the same
    /// - with a float: `f64` if either side is 64-bit, else `f32`
    /// - two integers with a 64-bit side: `u64` if both unsigned, else `f64`
    /// - two narrower integers: `u32` if both unsigned, else `i32`
    pub fn promote(a: &Type, b: &Type) -> Option<Type> {
        if a == b {
            return Some(a.clone());
        }
        if !a.is_numeric() || !b.is_numeric() {
            return None;
        }
        let wide = a.is_64bit() || b.is_64bit();
        let unsigned = a.is_unsigned() && b.is_unsigned();
        Some(match (a.is_float() || b.is_float(), wide, unsigned) {
            (true, true, _) => Type::F64,
            (true, false, _) => Type::F32,
            (false, true, true) => Type::U64,
            (false, true, false) => Type::F64,
            (false, false, true) => Type::U32,
            (false, false, false) => Type::I32,
        })
    }

    /// Whether an explicit cast `to(x)` accepts a value of this type.
    ///
    /// Numeric and temporal values convert freely; strings, series and
    /// channels only "cast" to themselves.
    pub fn can_cast(&self, to: &Type) -> bool {
        self == to || (self.is_arithmetic() && to.is_arithmetic())
    }

    /// Whether a value of `self` converts to `to` without any loss.
    ///
    /// Implicit conversions in operators and call arguments are limited to
    /// these; anything else needs an explicit cast.
    pub fn widens_to(&self, to: &Type) -> bool {
        if self == to {
            return true;
        }
        let (Some(from_bits), Some(to_bits)) = (self.bits(), to.bits()) else {
            return false;
        };
        match (self, to) {
            (Type::F32, Type::F64) => true,
            (from, to) if from.is_integer() && to.is_float() => {
                let mantissa = if *to == Type::F64 { 53 } else { 24 };
                let magnitude_bits = if from.is_unsigned() {
                    from_bits
                } else {
                    from_bits - 1
                };
                magnitude_bits <= mantissa
            }
            (from, to) if from.is_integer() && to.is_integer() => {
                match (from.is_unsigned(), to.is_unsigned()) {
                    (true, true) | (false, false) => to_bits >= from_bits,
                    (true, false) => to_bits > from_bits,
                    (false, true) => false,
                }
            }
            _ => false,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Series(elem) => write!(f, "series {elem}"),
            Type::Chan(elem) => write!(f, "chan {elem}"),
            other => f.write_str(other.kind().suffix()),
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}
