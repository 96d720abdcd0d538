//! Literal parsing with exact representability.
//!
//! A numeric literal is parsed against the type it will be emitted as.
//! The value must be representable exactly: `2.5` is not an `i32`, `300`
//! is not a `u8`. With no target type, integers default to `i64` and
//! floats to `f64`.
//!
//! Unit suffixes scale the value to its SI base unit first. Temporal
//! targets (`timespan`, `timestamp`) take time units in nanoseconds
//! instead.

pub mod units;

use arc_diagnostic::{Diagnostic, ErrorCode};
use arc_ir::{NumericLiteral, Span};

use crate::{ConstValue, Type};
use units::{Dimension, Unit};

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum LiteralError {
    #[error("value {value} out of range for {target} (must be in [{min}, {max}])")]
    OutOfRange {
        value: String,
        target: Type,
        min: String,
        max: String,
    },

    #[error("cannot convert non-integer float {value} to {target}")]
    NonInteger { value: f64, target: Type },

    #[error("invalid numeric literal '{text}'")]
    Invalid { text: String },

    #[error("unknown unit '{unit}'")]
    UnknownUnit { unit: String },

    #[error("unit '{unit}' measures {dimension} and cannot be used as {target}")]
    UnitMismatch {
        unit: String,
        dimension: Dimension,
        target: Type,
    },

    #[error("cannot use a numeric literal as {target}")]
    NotNumeric { target: Type },

    #[error("cannot use a string literal as {target}")]
    NotString { target: Type },
}

impl LiteralError {
    pub fn code(&self) -> ErrorCode {
        match self {
            LiteralError::OutOfRange { .. } => ErrorCode::E3001,
            LiteralError::NonInteger { .. } => ErrorCode::E3002,
            LiteralError::Invalid { .. } => ErrorCode::E3003,
            LiteralError::UnknownUnit { .. } | LiteralError::UnitMismatch { .. } => ErrorCode::E3004,
            LiteralError::NotNumeric { .. } | LiteralError::NotString { .. } => ErrorCode::E2001,
        }
    }

    pub fn to_diagnostic(&self, span: Span) -> Diagnostic {
        let diag = Diagnostic::error(self.code())
            .with_message(self.to_string())
            .with_label(span, "in this literal");
        match self {
            LiteralError::NonInteger { target, .. } | LiteralError::OutOfRange { target, .. }
                if target.is_integer() =>
            {
                diag.with_note(format!("{target} literals must be exact"))
            }
            _ => diag,
        }
    }
}

/// Parsed magnitude before it is fitted to a type.
#[derive(Copy, Clone, PartialEq, Debug)]
enum Number {
    Int(i128),
    Float(f64),
}

impl Number {
    fn describe(self) -> String {
        match self {
            Number::Int(v) => v.to_string(),
            Number::Float(v) => v.to_string(),
        }
    }
}

/// Parse a numeric literal as `target`, or as its default type.
pub fn parse_numeric(
    lit: &NumericLiteral,
    is_float: bool,
    target: Option<&Type>,
) -> Result<ConstValue, LiteralError> {
    let number = parse_text(&lit.text, is_float)?;

    let Some(symbol) = lit.unit.as_deref() else {
        return match target {
            Some(t) => convert(number, t),
            None => convert_default(number),
        };
    };
    let unit = lookup(symbol)?;

    match target {
        Some(t) if t.is_temporal() => {
            if unit.dimension != Dimension::Time {
                return Err(LiteralError::UnitMismatch {
                    unit: symbol.to_owned(),
                    dimension: unit.dimension,
                    target: t.clone(),
                });
            }
            convert(scale(number, unit, units::NANOS_PER_SECOND), t)
        }
        Some(t) => convert(scale(number, unit, 1), t),
        None => convert_default(scale(number, unit, 1)),
    }
}

/// Parse a string literal as `target`.
pub fn parse_string(value: &str, target: Option<&Type>) -> Result<ConstValue, LiteralError> {
    match target {
        None | Some(Type::String) => Ok(ConstValue::Str(value.to_owned())),
        Some(other) => Err(LiteralError::NotString {
            target: other.clone(),
        }),
    }
}

/// Physical dimension of a literal's unit, if it has one.
pub fn dimension(lit: &NumericLiteral) -> Result<Option<Dimension>, LiteralError> {
    lit.unit
        .as_deref()
        .map(|u| lookup(u).map(|unit| unit.dimension))
        .transpose()
}

fn lookup(symbol: &str) -> Result<Unit, LiteralError> {
    units::lookup(symbol).ok_or_else(|| LiteralError::UnknownUnit {
        unit: symbol.to_owned(),
    })
}

fn parse_text(text: &str, is_float: bool) -> Result<Number, LiteralError> {
    let cleaned: String = text.chars().filter(|&c| c != '_').collect();
    let invalid = || LiteralError::Invalid {
        text: text.to_owned(),
    };

    if is_float {
        let value: f64 = cleaned.parse().map_err(|_| invalid())?;
        return if value.is_finite() {
            Ok(Number::Float(value))
        } else {
            Err(invalid())
        };
    }

    if cleaned.is_empty() || !cleaned.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    match cleaned.parse::<u64>() {
        Ok(v) => Ok(Number::Int(i128::from(v))),
        Err(_) => Err(LiteralError::OutOfRange {
            value: text.to_owned(),
            target: Type::U64,
            min: "0".into(),
            max: u64::MAX.to_string(),
        }),
    }
}

/// Scale to the unit's base, times `extra` (nanoseconds per second for
/// temporal targets).
fn scale(number: Number, unit: Unit, extra: i128) -> Number {
    let num = unit.num * extra;
    match number {
        Number::Int(v) => match v.checked_mul(num) {
            Some(n) if n % unit.den == 0 => Number::Int(n / unit.den),
            Some(n) => Number::Float(n as f64 / unit.den as f64),
            None => Number::Float(v as f64 * num as f64 / unit.den as f64),
        },
        Number::Float(v) => {
            let scaled = v * num as f64 / unit.den as f64;
            // Decimal scale factors are inexact in binary; `1.1ms` in ns
            // lands a hair off 1_100_000.
            let nearest = scaled.round();
            if (scaled - nearest).abs() <= 1e-9 * nearest.abs().max(1.0) {
                Number::Float(nearest)
            } else {
                Number::Float(scaled)
            }
        }
    }
}

fn convert_default(number: Number) -> Result<ConstValue, LiteralError> {
    match number {
        Number::Int(_) => convert(number, &Type::I64),
        Number::Float(_) => convert(number, &Type::F64),
    }
}

fn int_bounds(target: &Type) -> Option<(i128, i128)> {
    Some(match target {
        Type::I8 => (i128::from(i8::MIN), i128::from(i8::MAX)),
        Type::I16 => (i128::from(i16::MIN), i128::from(i16::MAX)),
        Type::I32 => (i128::from(i32::MIN), i128::from(i32::MAX)),
        Type::I64 | Type::TimeStamp | Type::TimeSpan => {
            (i128::from(i64::MIN), i128::from(i64::MAX))
        }
        Type::U8 => (0, i128::from(u8::MAX)),
        Type::U16 => (0, i128::from(u16::MAX)),
        Type::U32 => (0, i128::from(u32::MAX)),
        Type::U64 => (0, i128::from(u64::MAX)),
        _ => return None,
    })
}

fn convert(number: Number, target: &Type) -> Result<ConstValue, LiteralError> {
    if let Some((min, max)) = int_bounds(target) {
        let out_of_range = || LiteralError::OutOfRange {
            value: number.describe(),
            target: target.clone(),
            min: min.to_string(),
            max: max.to_string(),
        };
        let value = match number {
            Number::Int(v) => v,
            Number::Float(f) => {
                if f.fract() != 0.0 {
                    return Err(LiteralError::NonInteger {
                        value: f,
                        target: target.clone(),
                    });
                }
                // Out of range for every integer type; keeps the cast exact.
                if f.abs() > 1e30 {
                    return Err(out_of_range());
                }
                f as i128
            }
        };
        if value < min || value > max {
            return Err(out_of_range());
        }
        return Ok(int_value(value, target));
    }

    let as_f64 = match number {
        Number::Int(v) => v as f64,
        Number::Float(f) => f,
    };
    match target {
        Type::F32 => {
            if as_f64.abs() > f64::from(f32::MAX) {
                return Err(LiteralError::OutOfRange {
                    value: number.describe(),
                    target: Type::F32,
                    min: f32::MIN.to_string(),
                    max: f32::MAX.to_string(),
                });
            }
            Ok(ConstValue::F32(as_f64 as f32))
        }
        Type::F64 => Ok(ConstValue::F64(as_f64)),
        other => Err(LiteralError::NotNumeric {
            target: other.clone(),
        }),
    }
}

/// Build the constant for an in-range integer.
fn int_value(value: i128, target: &Type) -> ConstValue {
    match target {
        Type::I8 => ConstValue::I8(value as i8),
        Type::I16 => ConstValue::I16(value as i16),
        Type::I32 => ConstValue::I32(value as i32),
        Type::U8 => ConstValue::U8(value as u8),
        Type::U16 => ConstValue::U16(value as u16),
        Type::U32 => ConstValue::U32(value as u32),
        Type::U64 => ConstValue::U64(value as u64),
        Type::TimeStamp => ConstValue::TimeStamp(value as i64),
        Type::TimeSpan => ConstValue::TimeSpan(value as i64),
        _ => ConstValue::I64(value as i64),
    }
}
