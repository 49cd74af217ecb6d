//! Namespace and type-name resolution scope.
//!
//! The resolver context is built up by the namespace-resolution pass and
//! consulted read-only by every later pass. Type names resolve to
//! *storage* names: the fully qualified name with the separators
//! stripped (`System.Int32` becomes `SystemInt32`), which is how the
//! target VM's data block identifies heap slot types.

use std::collections::{HashMap, HashSet};

use sable_ast::{PrimitiveType, QualifiedName, TypeRef};

/// Core library types visible through `using System;` or fully qualified.
const CORE_TYPES: &[&str] = &[
    "System.Int32",
    "System.Single",
    "System.Boolean",
    "System.String",
    "System.Object",
];

/// Outcome of resolving a type annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedType {
    /// No storage; only valid as a return type.
    Void,
    /// Storage type name for the data block.
    Storage(String),
}

/// Per-unit namespace/type-resolution scope, constructed empty and
/// populated by the namespace-resolution pass.
#[derive(Debug, Clone, Default)]
pub struct ResolverContext {
    usings: Vec<String>,
    namespaces: Vec<String>,
    /// Every fully qualified type name known to the unit.
    qualified: HashSet<String>,
    /// Unit-declared classes: simple name -> fully qualified name.
    declared: HashMap<String, String>,
}

impl ResolverContext {
    pub fn new() -> Self {
        let mut ctx = Self {
            usings: Vec::new(),
            namespaces: Vec::new(),
            qualified: HashSet::new(),
            declared: HashMap::new(),
        };
        for ty in CORE_TYPES {
            ctx.qualified.insert((*ty).to_string());
        }
        ctx
    }

    /// Strips name separators to form a storage type name.
    pub fn storage_name(qualified: &str) -> String {
        qualified.replace('.', "")
    }

    pub fn add_using(&mut self, path: String) {
        if !self.usings.contains(&path) {
            self.usings.push(path);
        }
    }

    pub fn usings(&self) -> &[String] {
        &self.usings
    }

    pub fn add_namespace(&mut self, path: String) {
        if !self.namespaces.contains(&path) {
            self.namespaces.push(path);
        }
    }

    pub fn namespaces(&self) -> &[String] {
        &self.namespaces
    }

    /// Registers a unit-declared class. Returns false when the simple
    /// name is already taken.
    pub fn declare_class(&mut self, namespace: Option<&str>, name: &str) -> bool {
        if self.declared.contains_key(name) {
            return false;
        }
        let qualified = match namespace {
            Some(ns) => format!("{}.{}", ns, name),
            None => name.to_string(),
        };
        self.qualified.insert(qualified.clone());
        self.declared.insert(name.to_string(), qualified);
        true
    }

    /// Storage name of a unit-declared class, if known.
    pub fn class_storage(&self, name: &str) -> Option<String> {
        self.declared.get(name).map(|q| Self::storage_name(q))
    }

    pub fn primitive_storage(primitive: PrimitiveType) -> ResolvedType {
        match primitive {
            PrimitiveType::Int => ResolvedType::Storage("SystemInt32".to_string()),
            PrimitiveType::Float => ResolvedType::Storage("SystemSingle".to_string()),
            PrimitiveType::Bool => ResolvedType::Storage("SystemBoolean".to_string()),
            PrimitiveType::Str => ResolvedType::Storage("SystemString".to_string()),
            PrimitiveType::Void => ResolvedType::Void,
        }
    }

    /// Resolves a type annotation to its storage type. `None` means the
    /// name did not resolve to any visible type.
    pub fn resolve_type(&self, ty: &TypeRef) -> Option<ResolvedType> {
        match ty {
            TypeRef::Primitive(p) => Some(Self::primitive_storage(*p)),
            TypeRef::Named(name) => self
                .resolve_named(name)
                .map(|q| ResolvedType::Storage(Self::storage_name(&q))),
        }
    }

    fn resolve_named(&self, name: &QualifiedName) -> Option<String> {
        let joined = name.joined();

        // Fully qualified names resolve directly.
        if self.qualified.contains(&joined) {
            return Some(joined);
        }

        if name.is_simple() {
            // Unit-declared classes win over imported names.
            if let Some(qualified) = self.declared.get(&joined) {
                return Some(qualified.clone());
            }
            // First matching using wins, in directive order.
            for using in &self.usings {
                let candidate = format!("{}.{}", using, joined);
                if self.qualified.contains(&candidate) {
                    return Some(candidate);
                }
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sable_ast::{Ident, Node, Span};

    fn named(path: &[&str]) -> TypeRef {
        TypeRef::Named(QualifiedName {
            segments: path
                .iter()
                .map(|s| Node::new(Ident::new(*s), Span::new(0, 0)))
                .collect(),
        })
    }

    #[test]
    fn test_primitive_resolution() {
        let ctx = ResolverContext::new();
        assert_eq!(
            ctx.resolve_type(&TypeRef::Primitive(PrimitiveType::Int)),
            Some(ResolvedType::Storage("SystemInt32".to_string()))
        );
        assert_eq!(
            ctx.resolve_type(&TypeRef::Primitive(PrimitiveType::Void)),
            Some(ResolvedType::Void)
        );
    }

    #[test]
    fn test_qualified_core_type() {
        let ctx = ResolverContext::new();
        assert_eq!(
            ctx.resolve_type(&named(&["System", "Int32"])),
            Some(ResolvedType::Storage("SystemInt32".to_string()))
        );
    }

    #[test]
    fn test_simple_name_requires_using() {
        let mut ctx = ResolverContext::new();
        assert_eq!(ctx.resolve_type(&named(&["Int32"])), None);
        ctx.add_using("System".to_string());
        assert_eq!(
            ctx.resolve_type(&named(&["Int32"])),
            Some(ResolvedType::Storage("SystemInt32".to_string()))
        );
    }

    #[test]
    fn test_declared_class_resolution() {
        let mut ctx = ResolverContext::new();
        assert!(ctx.declare_class(Some("Demo"), "Counter"));
        assert_eq!(
            ctx.resolve_type(&named(&["Counter"])),
            Some(ResolvedType::Storage("DemoCounter".to_string()))
        );
        assert_eq!(
            ctx.resolve_type(&named(&["Demo", "Counter"])),
            Some(ResolvedType::Storage("DemoCounter".to_string()))
        );
        assert_eq!(ctx.class_storage("Counter"), Some("DemoCounter".to_string()));
    }

    #[test]
    fn test_duplicate_class_rejected() {
        let mut ctx = ResolverContext::new();
        assert!(ctx.declare_class(None, "A"));
        assert!(!ctx.declare_class(Some("Demo"), "A"));
    }

    #[test]
    fn test_unknown_type() {
        let ctx = ResolverContext::new();
        assert_eq!(ctx.resolve_type(&named(&["Mystery"])), None);
    }
}
