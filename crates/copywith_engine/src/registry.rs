//! Registry of extension macros.
//!
//! Stores and retrieves generators by attribute name.

use std::collections::HashMap;
use std::fmt;

use copywith_foundation::{Error, ErrorKind, Result};
use copywith_syntax::{DeclGroup, ExtensionDecl};

use crate::macros::{CopyWith, ExtensionMacro, MutableCopy, MutatedCopy, Mutating};

// =============================================================================
// MacroRegistry
// =============================================================================

/// Registry mapping attribute names to generators.
///
/// Built once and shared by reference; expansion never mutates it.
#[derive(Default)]
pub struct MacroRegistry {
    /// Map from attribute name to generator.
    macros: HashMap<&'static str, Box<dyn ExtensionMacro>>,
}

impl MacroRegistry {
    /// Creates a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            macros: HashMap::new(),
        }
    }

    /// Creates a registry with the four standard generators.
    #[must_use]
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(CopyWith));
        registry.register(Box::new(MutableCopy));
        registry.register(Box::new(MutatedCopy));
        registry.register(Box::new(Mutating));
        registry
    }

    /// Registers a generator under its own name, replacing any previous one.
    pub fn register(&mut self, generator: Box<dyn ExtensionMacro>) {
        self.macros.insert(generator.name(), generator);
    }

    /// Looks up a generator by attribute name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&dyn ExtensionMacro> {
        self.macros.get(name).map(|generator| &**generator)
    }

    /// Checks if a generator is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.macros.contains_key(name)
    }

    /// Expands `decl` with the generator named `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::UnknownMacro`] if no generator has that name,
    /// otherwise whatever the generator returns.
    pub fn expand(&self, name: &str, decl: &DeclGroup, type_name: &str) -> Result<Vec<ExtensionDecl>> {
        let generator = self
            .get(name)
            .ok_or_else(|| Error::new(ErrorKind::UnknownMacro(name.to_string())))?;
        generator.expand(decl, type_name)
    }

    /// Returns all registered names, sorted.
    #[must_use]
    pub fn macro_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.macros.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Returns the number of registered generators.
    #[must_use]
    pub fn len(&self) -> usize {
        self.macros.len()
    }

    /// Returns true if no generators are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.macros.is_empty()
    }
}

impl fmt::Debug for MacroRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MacroRegistry")
            .field("macros", &self.macro_names())
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
