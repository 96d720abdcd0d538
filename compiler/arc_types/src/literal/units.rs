//! Unit suffixes on numeric literals.
//!
//! Each unit is an exact rational multiple of its dimension's SI base unit,
//! so integer literals scale without going through floating point.

use std::fmt;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Dimension {
    Time,
    Frequency,
    Length,
    Pressure,
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Dimension::Time => "time",
            Dimension::Frequency => "frequency",
            Dimension::Length => "length",
            Dimension::Pressure => "pressure",
        })
    }
}

/// `value_si = value * num / den`
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Unit {
    pub symbol: &'static str,
    pub dimension: Dimension,
    pub num: i128,
    pub den: i128,
}

const fn unit(symbol: &'static str, dimension: Dimension, num: i128, den: i128) -> Unit {
    Unit {
        symbol,
        dimension,
        num,
        den,
    }
}

const UNITS: &[Unit] = &[
    unit("ns", Dimension::Time, 1, 1_000_000_000),
    unit("us", Dimension::Time, 1, 1_000_000),
    unit("ms", Dimension::Time, 1, 1_000),
    unit("s", Dimension::Time, 1, 1),
    unit("min", Dimension::Time, 60, 1),
    unit("h", Dimension::Time, 3_600, 1),
    unit("hz", Dimension::Frequency, 1, 1),
    unit("khz", Dimension::Frequency, 1_000, 1),
    unit("mhz", Dimension::Frequency, 1_000_000, 1),
    unit("mm", Dimension::Length, 1, 1_000),
    unit("cm", Dimension::Length, 1, 100),
    unit("m", Dimension::Length, 1, 1),
    unit("km", Dimension::Length, 1_000, 1),
    unit("pa", Dimension::Pressure, 1, 1),
    unit("kpa", Dimension::Pressure, 1_000, 1),
    unit("bar", Dimension::Pressure, 100_000, 1),
    unit("psi", Dimension::Pressure, 6_894_757, 1_000),
];

pub fn lookup(symbol: &str) -> Option<Unit> {
    UNITS.iter().copied().find(|u| u.symbol == symbol)
}

/// Nanoseconds per second, for scaling time units to timespans.
pub const NANOS_PER_SECOND: i128 = 1_000_000_000;
