//! Type annotations as written in source.

use super::*;
use std::fmt;

/// Built-in primitive type keywords
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    Int,
    Float,
    Bool,
    Str,
    Void,
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrimitiveType::Int => write!(f, "int"),
            PrimitiveType::Float => write!(f, "float"),
            PrimitiveType::Bool => write!(f, "bool"),
            PrimitiveType::Str => write!(f, "string"),
            PrimitiveType::Void => write!(f, "void"),
        }
    }
}

/// A type as it appears in a declaration, unresolved.
///
/// Resolution to a storage type name happens in the resolver context,
/// not here.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeRef {
    Primitive(PrimitiveType),
    Named(QualifiedName),
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Primitive(p) => write!(f, "{}", p),
            TypeRef::Named(name) => write!(f, "{}", name),
        }
    }
}
