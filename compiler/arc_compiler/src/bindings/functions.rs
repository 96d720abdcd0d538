//! User function table.
//!
//! User functions are numbered after every host import, but calls to them
//! are emitted before the import count is final. Each function gets a
//! [`DeferredId`] (its declaration ordinal) when declared; once the module
//! knows its import count, [`FunctionIndex::resolve`] maps ordinals to real
//! function indices for [`Writer::patch`](arc_wasm::Writer::patch).

use arc_wasm::DeferredId;
use rustc_hash::FxHashMap;

#[derive(Clone, Debug, Default)]
pub struct FunctionIndex {
    names: Vec<Box<str>>,
    ids: FxHashMap<Box<str>, DeferredId>,
}

impl FunctionIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a function. Declaring the same name twice returns the
    /// first ID.
    pub fn declare(&mut self, name: &str) -> DeferredId {
        if let Some(&id) = self.ids.get(name) {
            return id;
        }
        let id = DeferredId::new(self.names.len() as u32);
        self.names.push(name.into());
        self.ids.insert(name.into(), id);
        id
    }

    pub fn get(&self, name: &str) -> Option<DeferredId> {
        self.ids.get(name).copied()
    }

    pub fn name(&self, id: DeferredId) -> Option<&str> {
        self.names.get(id.raw() as usize).map(AsRef::as_ref)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Final indices once `import_count` imports precede the functions.
    pub fn resolve(&self, import_count: u32) -> ResolvedFunctions {
        ResolvedFunctions {
            base: import_count,
            count: self.names.len() as u32,
        }
    }
}

/// Deferred ID to function index mapping.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct ResolvedFunctions {
    base: u32,
    count: u32,
}

impl ResolvedFunctions {
    pub fn index(&self, id: DeferredId) -> Option<u32> {
        (id.raw() < self.count).then(|| self.base + id.raw())
    }
}
