//! Host function bindings.
//!
//! Everything the compiled code cannot do with plain instructions (channel
//! I/O, series arithmetic, strings, persistent state, powers) is a call to a
//! function the host imports into the module under `env`. [`ImportIndex`]
//! registers that interface once, in a fixed order, so the function index of
//! every import is stable across compilations.
//!
//! Typed operations are keyed by element kind: `series_index_f32` and
//! `series_index_u8` are different imports. Generic operations
//! (`series_len`, `string_concat`, `now`, ...) have a single entry.

mod functions;

pub use functions::{FunctionIndex, ResolvedFunctions};

use std::fmt;

use arc_ir::BinaryOp;
use arc_types::{Kind, Type};
use arc_wasm::{FuncType, ValueType};
use rustc_hash::FxHashMap;

/// Module name every import lives under.
pub const IMPORT_MODULE: &str = "env";

/// Element-wise arithmetic a series host call can perform.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ArithOp {
    Add,
    Mul,
    Sub,
    Div,
    Mod,
}

impl ArithOp {
    /// Registration order.
    pub const ALL: [ArithOp; 5] = [
        ArithOp::Add,
        ArithOp::Mul,
        ArithOp::Sub,
        ArithOp::Div,
        ArithOp::Mod,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            ArithOp::Add => "add",
            ArithOp::Mul => "mul",
            ArithOp::Sub => "sub",
            ArithOp::Div => "div",
            ArithOp::Mod => "mod",
        }
    }

    pub const fn from_binary(op: BinaryOp) -> Option<Self> {
        Some(match op {
            BinaryOp::Add => ArithOp::Add,
            BinaryOp::Mul => ArithOp::Mul,
            BinaryOp::Sub => ArithOp::Sub,
            BinaryOp::Div => ArithOp::Div,
            BinaryOp::Mod => ArithOp::Mod,
            _ => return None,
        })
    }
}

/// Element-wise comparison a series host call can perform.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum CompareOp {
    Gt,
    Lt,
    Ge,
    Le,
    Eq,
    Ne,
}

impl CompareOp {
    /// Registration order.
    pub const ALL: [CompareOp; 6] = [
        CompareOp::Gt,
        CompareOp::Lt,
        CompareOp::Ge,
        CompareOp::Le,
        CompareOp::Eq,
        CompareOp::Ne,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            CompareOp::Gt => "gt",
            CompareOp::Lt => "lt",
            CompareOp::Ge => "ge",
            CompareOp::Le => "le",
            CompareOp::Eq => "eq",
            CompareOp::Ne => "ne",
        }
    }

    pub const fn from_binary(op: BinaryOp) -> Option<Self> {
        Some(match op {
            BinaryOp::Gt => CompareOp::Gt,
            BinaryOp::Lt => CompareOp::Lt,
            BinaryOp::GtEq => CompareOp::Ge,
            BinaryOp::LtEq => CompareOp::Le,
            BinaryOp::Eq => CompareOp::Eq,
            BinaryOp::NotEq => CompareOp::Ne,
            _ => return None,
        })
    }
}

/// A host operation, without its element type.
///
/// The `Display` form is the import name stem; typed imports append
/// `_<kind>` to it.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum HostOp {
    ChannelRead,
    ChannelWrite,

    SeriesCreateEmpty,
    SeriesSetElement,
    SeriesIndex,
    /// `series op scalar`
    SeriesScalar(ArithOp),
    /// `scalar op series`; the scalar is the first argument.
    SeriesScalarReverse(ArithOp),
    /// `series op series`
    SeriesSeries(ArithOp),
    SeriesCompare(CompareOp),
    SeriesCompareScalar(CompareOp),
    SeriesCompareReverse(CompareOp),
    SeriesNegate,
    SeriesNot,
    SeriesLen,
    SeriesSlice,

    StateLoad,
    StateStore,
    StateLoadSeries,
    StateStoreSeries,

    StringFromLiteral,
    StringConcat,
    StringEqual,
    StringLen,

    Now,
    Pow,
    Panic,
}

impl fmt::Display for HostOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stem = match self {
            HostOp::SeriesScalar(op) => return write!(f, "series_element_{}", op.name()),
            HostOp::SeriesScalarReverse(op) => {
                return write!(f, "series_element_r{}", op.name());
            }
            HostOp::SeriesSeries(op) => return write!(f, "series_series_{}", op.name()),
            HostOp::SeriesCompare(op) => return write!(f, "series_compare_{}", op.name()),
            HostOp::SeriesCompareScalar(op) => {
                return write!(f, "series_compare_{}_scalar", op.name());
            }
            HostOp::SeriesCompareReverse(op) => {
                return write!(f, "series_compare_{}_rscalar", op.name());
            }
            HostOp::ChannelRead => "channel_read",
            HostOp::ChannelWrite => "channel_write",
            HostOp::SeriesCreateEmpty => "series_create_empty",
            HostOp::SeriesSetElement => "series_set_element",
            HostOp::SeriesIndex => "series_index",
            HostOp::SeriesNegate => "series_negate",
            HostOp::SeriesNot => "series_not",
            HostOp::SeriesLen => "series_len",
            HostOp::SeriesSlice => "series_slice",
            HostOp::StateLoad => "state_load",
            HostOp::StateStore => "state_store",
            HostOp::StateLoadSeries => "state_load_series",
            HostOp::StateStoreSeries => "state_store_series",
            HostOp::StringFromLiteral => "string_from_literal",
            HostOp::StringConcat => "string_concat",
            HostOp::StringEqual => "string_equal",
            HostOp::StringLen => "string_len",
            HostOp::Now => "now",
            HostOp::Pow => "math_pow",
            HostOp::Panic => "panic",
        };
        f.write_str(stem)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BindingError {
    #[error("unsupported type {ty} for {op}")]
    UnsupportedType { op: HostOp, ty: Type },

    #[error("no host binding for {op}")]
    Missing { op: HostOp },

    #[error("function {name} has no entry in the function table")]
    UnknownFunction { name: String },
}

/// One imported host function.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Import {
    pub module: &'static str,
    pub name: String,
    pub signature: FuncType,
}

/// The host interface, with a stable function index per import.
#[derive(Clone, Debug)]
pub struct ImportIndex {
    imports: Vec<Import>,
    index: FxHashMap<(HostOp, Option<Kind>), u32>,
}

impl Default for ImportIndex {
    fn default() -> Self {
        Self::new()
    }
}

/// Element kinds whose series support `-`.
const NEGATABLE: [Kind; 6] = [Kind::F64, Kind::F32, Kind::I64, Kind::I32, Kind::I16, Kind::I8];

/// Kinds with a power import. Floats first, then integers by width.
const POWERS: [Kind; 10] = [
    Kind::F32,
    Kind::F64,
    Kind::U8,
    Kind::U16,
    Kind::U32,
    Kind::U64,
    Kind::I8,
    Kind::I16,
    Kind::I32,
    Kind::I64,
];

impl ImportIndex {
    /// Register the complete host interface.
    pub fn new() -> Self {
        let mut index = ImportIndex {
            imports: Vec::new(),
            index: FxHashMap::default(),
        };
        index.register_channels();
        for kind in Kind::NUMERIC {
            index.register_series(kind);
        }
        for kind in NEGATABLE {
            index.typed(HostOp::SeriesNegate, kind, &[ValueType::I32], &[ValueType::I32]);
        }
        index.typed(HostOp::SeriesNot, Kind::U8, &[ValueType::I32], &[ValueType::I32]);
        index.register_state();
        index.register_generic();
        tracing::debug!(imports = index.imports.len(), "host bindings registered");
        index
    }

    fn register_channels(&mut self) {
        use ValueType::I32;
        for kind in Kind::NUMERIC.into_iter().chain([Kind::String]) {
            let t = machine_type(kind);
            self.typed(HostOp::ChannelRead, kind, &[I32], &[t]);
            self.typed(HostOp::ChannelWrite, kind, &[I32, t], &[]);
        }
    }

    fn register_series(&mut self, kind: Kind) {
        use ValueType::I32;
        let t = machine_type(kind);
        self.typed(HostOp::SeriesCreateEmpty, kind, &[I32], &[I32]);
        self.typed(HostOp::SeriesSetElement, kind, &[I32, I32, t], &[I32]);
        self.typed(HostOp::SeriesIndex, kind, &[I32, I32], &[t]);

        for op in ArithOp::ALL {
            self.typed(HostOp::SeriesScalar(op), kind, &[I32, t], &[I32]);
        }
        for op in ArithOp::ALL {
            self.typed(HostOp::SeriesScalarReverse(op), kind, &[t, I32], &[I32]);
        }
        for op in ArithOp::ALL {
            self.typed(HostOp::SeriesSeries(op), kind, &[I32, I32], &[I32]);
        }

        for op in CompareOp::ALL {
            self.typed(HostOp::SeriesCompare(op), kind, &[I32, I32], &[I32]);
        }
        for op in CompareOp::ALL {
            self.typed(HostOp::SeriesCompareScalar(op), kind, &[I32, t], &[I32]);
        }
        for op in CompareOp::ALL {
            self.typed(HostOp::SeriesCompareReverse(op), kind, &[t, I32], &[I32]);
        }

        self.typed(HostOp::StateLoadSeries, kind, &[I32, I32], &[I32]);
        self.typed(HostOp::StateStoreSeries, kind, &[I32, I32], &[]);
    }

    fn register_state(&mut self) {
        use ValueType::I32;
        for kind in Kind::NUMERIC.into_iter().chain([Kind::String]) {
            let t = machine_type(kind);
            self.typed(HostOp::StateLoad, kind, &[I32, t], &[t]);
            self.typed(HostOp::StateStore, kind, &[I32, t], &[]);
        }
    }

    fn register_generic(&mut self) {
        use ValueType::{I32, I64};
        self.generic(HostOp::SeriesLen, &[I32], &[I64]);
        self.generic(HostOp::SeriesSlice, &[I32, I32, I32], &[I32]);
        self.generic(HostOp::StringFromLiteral, &[I32, I32], &[I32]);
        self.generic(HostOp::StringConcat, &[I32, I32], &[I32]);
        self.generic(HostOp::StringEqual, &[I32, I32], &[I32]);
        self.generic(HostOp::StringLen, &[I32], &[I32]);
        self.generic(HostOp::Now, &[], &[I64]);
        for kind in POWERS {
            let t = machine_type(kind);
            self.typed(HostOp::Pow, kind, &[t, t], &[t]);
        }
        self.generic(HostOp::Panic, &[I32, I32], &[]);
    }

    fn typed(&mut self, op: HostOp, kind: Kind, params: &[ValueType], results: &[ValueType]) {
        let name = format!("{op}_{}", kind.suffix());
        self.push((op, Some(kind)), name, FuncType::new(params, results));
    }

    fn generic(&mut self, op: HostOp, params: &[ValueType], results: &[ValueType]) {
        self.push((op, None), op.to_string(), FuncType::new(params, results));
    }

    fn push(&mut self, key: (HostOp, Option<Kind>), name: String, signature: FuncType) {
        let index = self.imports.len() as u32;
        self.imports.push(Import {
            module: IMPORT_MODULE,
            name,
            signature,
        });
        self.index.insert(key, index);
    }

    /// Function index of a typed operation on values (or elements) of `ty`.
    ///
    /// Temporal values share the `i64` bindings.
    pub fn get(&self, op: HostOp, ty: &Type) -> Result<u32, BindingError> {
        let kind = if ty.is_temporal() { Kind::I64 } else { ty.kind() };
        self.index
            .get(&(op, Some(kind)))
            .copied()
            .ok_or_else(|| BindingError::UnsupportedType { op, ty: ty.clone() })
    }

    /// Function index of an operation that is not keyed by type.
    pub fn generic_index(&self, op: HostOp) -> Result<u32, BindingError> {
        self.index
            .get(&(op, None))
            .copied()
            .ok_or(BindingError::Missing { op })
    }

    /// Look an import up by its full name, e.g. `channel_read_f64`.
    pub fn find(&self, name: &str) -> Option<u32> {
        self.imports
            .iter()
            .position(|import| import.name == name)
            .map(|i| i as u32)
    }

    pub fn import(&self, index: u32) -> Option<&Import> {
        self.imports.get(index as usize)
    }

    /// Imports in function-index order.
    pub fn imports(&self) -> &[Import] {
        &self.imports
    }

    /// Number of imports; user functions are numbered after them.
    pub fn len(&self) -> u32 {
        self.imports.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.imports.is_empty()
    }
}

/// Machine type of a scalar kind. Strings are handles.
fn machine_type(kind: Kind) -> ValueType {
    match kind {
        Kind::I64 | Kind::U64 | Kind::TimeStamp | Kind::TimeSpan => ValueType::I64,
        Kind::F32 => ValueType::F32,
        Kind::F64 => ValueType::F64,
        _ => ValueType::I32,
    }
}
