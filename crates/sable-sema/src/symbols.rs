//! Symbol directory: the single source of truth for every storage
//! location the compiler generates.
//!
//! Symbols accumulate for the lifetime of a compilation unit and are
//! never deleted; unique names are minted from a directory-wide counter
//! so no two symbols can collide even when their source names do.

use std::collections::HashMap;

use bitflags::bitflags;

bitflags! {
    /// Declaration flags controlling export and initialization behavior.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DeclFlags: u8 {
        const PUBLIC   = 1 << 0;
        const PRIVATE  = 1 << 1;
        const INTERNAL = 1 << 2;
        const THIS     = 1 << 3;
        const CONSTANT = 1 << 4;
    }
}

/// Unique identifier for a symbol within the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(pub usize);

/// A named storage location with a resolved storage type and flags.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolDefinition {
    pub id: SymbolId,
    /// Globally unique within the module.
    pub unique_name: String,
    /// Name as written in source ("temp" for compiler temporaries).
    pub source_name: String,
    /// Resolved storage type name, e.g. `SystemInt32`.
    pub type_name: String,
    pub flags: DeclFlags,
}

impl SymbolDefinition {
    pub fn is_exported(&self) -> bool {
        self.flags.contains(DeclFlags::PUBLIC)
    }

    /// Initial value emitted in the data block declaration line.
    pub fn initial_value(&self) -> &'static str {
        if self.flags.contains(DeclFlags::THIS) {
            "this"
        } else {
            "null"
        }
    }
}

/// Hierarchical symbol store for one compilation unit.
///
/// Creation is append-only; scopes only affect source-name lookup, not
/// the flattened symbol set.
#[derive(Debug, Clone)]
pub struct SymbolDirectory {
    symbols: Vec<SymbolDefinition>,
    unique_index: HashMap<String, SymbolId>,
    scopes: Vec<HashMap<String, SymbolId>>,
}

impl SymbolDirectory {
    pub fn new() -> Self {
        Self {
            symbols: Vec::new(),
            unique_index: HashMap::new(),
            scopes: vec![HashMap::new()],
        }
    }

    /// Creates a symbol without binding it to a source name. Used for
    /// compiler temporaries.
    pub fn create_symbol(
        &mut self,
        source_name: &str,
        type_name: impl Into<String>,
        flags: DeclFlags,
    ) -> SymbolId {
        let id = SymbolId(self.symbols.len());
        let unique_name = format!("__{}_{}", id.0, source_name);
        let symbol = SymbolDefinition {
            id,
            unique_name: unique_name.clone(),
            source_name: source_name.to_string(),
            type_name: type_name.into(),
            flags,
        };
        self.unique_index.insert(unique_name, id);
        self.symbols.push(symbol);
        id
    }

    /// Creates a symbol and binds its source name in the current scope.
    pub fn define(
        &mut self,
        source_name: &str,
        type_name: impl Into<String>,
        flags: DeclFlags,
    ) -> SymbolId {
        let id = self.create_symbol(source_name, type_name, flags);
        self.bind(id);
        id
    }

    /// Binds an existing symbol's source name in the current scope.
    pub fn bind(&mut self, id: SymbolId) {
        let name = self.symbols[id.0].source_name.clone();
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name, id);
        }
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Looks a source name up through the scope stack, innermost first.
    pub fn lookup(&self, source_name: &str) -> Option<SymbolId> {
        for scope in self.scopes.iter().rev() {
            if let Some(&id) = scope.get(source_name) {
                return Some(id);
            }
        }
        None
    }

    pub fn symbol(&self, id: SymbolId) -> &SymbolDefinition {
        &self.symbols[id.0]
    }

    pub fn contains_unique(&self, unique_name: &str) -> bool {
        self.unique_index.contains_key(unique_name)
    }

    pub fn find_unique(&self, unique_name: &str) -> Option<SymbolId> {
        self.unique_index.get(unique_name).copied()
    }

    /// Flattened enumeration of every unique symbol, in creation order.
    pub fn all_unique_child_symbols(&self) -> impl Iterator<Item = &SymbolDefinition> {
        self.symbols.iter()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl Default for SymbolDirectory {
    fn default() -> Self {
        Self::new()
    }
}
