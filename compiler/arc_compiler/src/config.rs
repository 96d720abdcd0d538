//! Compiler options.

use arc_types::Type;

/// Options for one compilation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompileConfig {
    /// Type the caller expects the expression to produce. Literals bend
    /// towards it during inference and emission.
    pub hint: Option<Type>,
    /// Run type inference before emitting. Without it, literals only see
    /// the hints their operators pass down.
    pub infer: bool,
    /// Rewrite deferred calls to user functions using the function table,
    /// with user functions numbered after the host imports.
    pub patch_calls: bool,
    /// Fail if deferred call sites remain at the end.
    pub require_complete: bool,
}

impl Default for CompileConfig {
    fn default() -> Self {
        CompileConfig {
            hint: None,
            infer: true,
            patch_calls: false,
            require_complete: false,
        }
    }
}

impl CompileConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_hint(mut self, hint: Type) -> Self {
        self.hint = Some(hint);
        self
    }

    #[must_use]
    pub fn with_infer(mut self, infer: bool) -> Self {
        self.infer = infer;
        self
    }

    #[must_use]
    pub fn with_patch_calls(mut self, patch_calls: bool) -> Self {
        self.patch_calls = patch_calls;
        self
    }

    #[must_use]
    pub fn with_require_complete(mut self, require_complete: bool) -> Self {
        self.require_complete = require_complete;
        self
    }
}
