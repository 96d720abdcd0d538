//! Lexical scopes and symbol resolution.
//!
//! Scopes live in one arena owned by [`SymbolTable`] and link to their
//! parent by [`ScopeId`]. Each symbol gets an integer ID when it is added.
//! The counter it draws from depends on its kind:
//!
//! | kind                         | counter owner                     |
//! |------------------------------|-----------------------------------|
//! | variable, input, config      | nearest function (or root) scope  |
//! | stateful variable            | nearest function (or root) scope  |
//! | channel, function            | root scope                        |
//! | global constant, block       | none (`id = 0`)                   |
//!
//! Local IDs are local-variable slots; stateful IDs are state keys;
//! function IDs are ordinals in the deferred function table.

use std::fmt;

use rustc_hash::FxHashMap;

use crate::{ConstValue, Type};

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum SymbolKind {
    Variable,
    Input,
    Config,
    StatefulVariable,
    Channel,
    GlobalConstant,
    Function,
    Block,
}

impl SymbolKind {
    pub const fn name(self) -> &'static str {
        match self {
            SymbolKind::Variable => "variable",
            SymbolKind::Input => "input",
            SymbolKind::Config => "config",
            SymbolKind::StatefulVariable => "stateful variable",
            SymbolKind::Channel => "channel",
            SymbolKind::GlobalConstant => "global constant",
            SymbolKind::Function => "function",
            SymbolKind::Block => "block",
        }
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A named entity. Immutable once added to a scope.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Symbol {
    pub name: Box<str>,
    pub kind: SymbolKind,
    pub ty: Type,
    pub id: u32,
    /// Literal value of a global constant.
    pub value: Option<ConstValue>,
}

/// What to add; the table fills in the ID.
#[derive(Clone, Debug)]
pub struct SymbolDef {
    pub name: Box<str>,
    pub kind: SymbolKind,
    pub ty: Type,
    pub value: Option<ConstValue>,
    /// Fixed ID, e.g. the host key of a channel.
    pub id: Option<u32>,
}

impl SymbolDef {
    pub fn new(name: &str, kind: SymbolKind, ty: Type) -> Self {
        SymbolDef {
            name: name.into(),
            kind,
            ty,
            value: None,
            id: None,
        }
    }

    #[must_use]
    pub fn with_value(mut self, value: ConstValue) -> Self {
        self.value = Some(value);
        self
    }

    #[must_use]
    pub fn with_id(mut self, id: u32) -> Self {
        self.id = Some(id);
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ScopeError {
    #[error("duplicate symbol: {name}")]
    Duplicate { name: String },

    #[error("unresolved symbol: {name}")]
    Unresolved { name: String },

    #[error("unknown scope: {}", scope.index())]
    UnknownScope { scope: ScopeId },
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ScopeId(u32);

impl ScopeId {
    pub const ROOT: ScopeId = ScopeId(0);

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ScopeKind {
    Root,
    Function,
    Block,
}

#[derive(Clone, Default, Debug)]
struct Counters {
    local: u32,
    stateful: u32,
    channel: u32,
    function: u32,
}

#[derive(Clone, Debug)]
struct Scope {
    kind: ScopeKind,
    parent: Option<ScopeId>,
    symbols: FxHashMap<Box<str>, Symbol>,
    counters: Counters,
}

/// Arena of scopes rooted at [`ScopeId::ROOT`].
#[derive(Clone, Debug)]
pub struct SymbolTable {
    scopes: Vec<Scope>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable {
            scopes: vec![Scope {
                kind: ScopeKind::Root,
                parent: None,
                symbols: FxHashMap::default(),
                counters: Counters::default(),
            }],
        }
    }

    pub fn root(&self) -> ScopeId {
        ScopeId::ROOT
    }

    /// Open a child scope of `parent`.
    pub fn push_scope(&mut self, parent: ScopeId, kind: ScopeKind) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope {
            kind,
            parent: Some(parent),
            symbols: FxHashMap::default(),
            counters: Counters::default(),
        });
        id
    }

    pub fn kind(&self, scope: ScopeId) -> Option<ScopeKind> {
        self.scopes.get(scope.index()).map(|s| s.kind)
    }

    pub fn parent(&self, scope: ScopeId) -> Option<ScopeId> {
        self.scopes.get(scope.index()).and_then(|s| s.parent)
    }

    /// Define a symbol in `scope`.
    ///
    /// Fails if `scope` was never pushed on this table or already defines
    /// the name. Shadowing a name from an enclosing scope is allowed.
    pub fn add(&mut self, scope: ScopeId, def: SymbolDef) -> Result<&Symbol, ScopeError> {
        let Some(entry) = self.scopes.get(scope.index()) else {
            return Err(ScopeError::UnknownScope { scope });
        };
        if entry.symbols.contains_key(&def.name) {
            return Err(ScopeError::Duplicate {
                name: def.name.into(),
            });
        }

        let id = match def.id {
            Some(id) => id,
            None => self.next_id(scope, def.kind),
        };
        let symbol = Symbol {
            name: def.name.clone(),
            kind: def.kind,
            ty: def.ty,
            id,
            value: def.value,
        };
        tracing::trace!(name = %symbol.name, kind = %symbol.kind, id, "add symbol");

        let symbols = &mut self.scopes[scope.index()].symbols;
        Ok(symbols.entry(def.name).or_insert(symbol))
    }

    /// Find `name` in `scope` or the nearest enclosing scope that defines it.
    pub fn resolve(&self, scope: ScopeId, name: &str) -> Result<&Symbol, ScopeError> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let Some(s) = self.scopes.get(id.index()) else {
                break;
            };
            if let Some(symbol) = s.symbols.get(name) {
                return Ok(symbol);
            }
            current = s.parent;
        }
        Err(ScopeError::Unresolved { name: name.into() })
    }

    /// Find `name` in `scope` only.
    pub fn lookup_local(&self, scope: ScopeId, name: &str) -> Option<&Symbol> {
        self.scopes.get(scope.index())?.symbols.get(name)
    }

    /// Number of function symbols declared so far.
    pub fn function_count(&self) -> u32 {
        self.scopes[ScopeId::ROOT.index()].counters.function
    }

    /// Number of local slots allocated in the function (or root) scope
    /// that owns `scope`.
    pub fn local_count(&self, scope: ScopeId) -> u32 {
        let owner = self.counter_owner(scope);
        self.scopes[owner.index()].counters.local
    }

    /// Nearest enclosing function scope, or the root.
    fn counter_owner(&self, scope: ScopeId) -> ScopeId {
        let mut current = scope;
        loop {
            match self.scopes.get(current.index()) {
                Some(s) if s.kind == ScopeKind::Block => match s.parent {
                    Some(parent) => current = parent,
                    None => return ScopeId::ROOT,
                },
                Some(_) => return current,
                None => return ScopeId::ROOT,
            }
        }
    }

    fn next_id(&mut self, scope: ScopeId, kind: SymbolKind) -> u32 {
        let owner = match kind {
            SymbolKind::Channel | SymbolKind::Function => ScopeId::ROOT,
            _ => self.counter_owner(scope),
        };
        let counters = &mut self.scopes[owner.index()].counters;
        let counter = match kind {
            SymbolKind::Variable | SymbolKind::Input | SymbolKind::Config => &mut counters.local,
            SymbolKind::StatefulVariable => &mut counters.stateful,
            SymbolKind::Channel => &mut counters.channel,
            SymbolKind::Function => &mut counters.function,
            SymbolKind::GlobalConstant | SymbolKind::Block => return 0,
        };
        let id = *counter;
        *counter += 1;
        id
    }
}

#[cfg(test)]
mod tests;
