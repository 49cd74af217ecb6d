//! Compilation unit structure: usings, namespaces, classes.

use super::*;
use std::fmt;

/// Dotted name path, e.g. `System.Int32`
#[derive(Debug, Clone, PartialEq)]
pub struct QualifiedName {
    pub segments: Vec<Node<Ident>>,
}

impl QualifiedName {
    pub fn joined(&self) -> String {
        self.segments
            .iter()
            .map(|s| s.value.name.as_str())
            .collect::<Vec<_>>()
            .join(".")
    }

    /// True when the path is a single bare identifier.
    pub fn is_simple(&self) -> bool {
        self.segments.len() == 1
    }

    pub fn span(&self) -> Span {
        let first = self.segments.first().map(|s| s.span).unwrap_or(Span::new(0, 0));
        let last = self.segments.last().map(|s| s.span).unwrap_or(first);
        first.merge(&last)
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.joined())
    }
}

/// `using Some.Namespace;`
#[derive(Debug, Clone, PartialEq)]
pub struct UsingDirective {
    pub path: QualifiedName,
}

/// `namespace Some.Name { class ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct NamespaceDecl {
    pub name: QualifiedName,
    pub classes: Vec<Node<ClassDecl>>,
}

/// Top-level item
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Namespace(NamespaceDecl),
    Class(ClassDecl),
}

/// One source file's syntax tree root
#[derive(Debug, Clone, PartialEq)]
pub struct Unit {
    pub usings: Vec<Node<UsingDirective>>,
    pub items: Vec<Node<Item>>,
    pub span: Span,
}

impl Unit {
    /// Iterates every class in the unit with its enclosing namespace, if any.
    pub fn classes(&self) -> impl Iterator<Item = (Option<&NamespaceDecl>, &ClassDecl)> {
        self.items.iter().flat_map(|item| match &item.value {
            Item::Class(c) => vec![(None, c)],
            Item::Namespace(ns) => ns.classes.iter().map(|c| (Some(ns), &c.value)).collect(),
        })
    }
}
