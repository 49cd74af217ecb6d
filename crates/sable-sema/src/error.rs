//! Resolution errors

use sable_ast::Span;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SemaErrorKind {
    #[error("unknown type `{0}`")]
    UnknownType(String),
    #[error("duplicate class `{0}`")]
    DuplicateClass(String),
    #[error("duplicate method `{0}.{1}`")]
    DuplicateMethod(String, String),
    #[error("`void` is not a valid parameter type")]
    VoidParam,
}

/// Resolution error with location information
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind}")]
pub struct SemaError {
    pub kind: SemaErrorKind,
    pub span: Span,
}

impl SemaError {
    pub fn new(kind: SemaErrorKind, span: Span) -> Self {
        Self { kind, span }
    }
}
