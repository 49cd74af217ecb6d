//! Structured lowering failures.
//!
//! Lowering reports failures as values returned to the orchestrator,
//! which converts them into located diagnostics; nothing in this crate
//! panics on bad input.

use std::fmt;

use sable_ast::Span;
use thiserror::Error;

/// Classification of an internal failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Unsupported,
    UnknownSymbol,
    UnknownMethod,
    TypeResolution,
    BadAssignment,
    BadCall,
    InvalidReturn,
    StrayControlFlow,
    Verification,
}

impl FailureKind {
    /// Short tag used when rendering the failure in a diagnostic.
    pub fn label(&self) -> &'static str {
        match self {
            FailureKind::Unsupported => "unsupported construct",
            FailureKind::UnknownSymbol => "unresolved symbol",
            FailureKind::UnknownMethod => "unresolved method",
            FailureKind::TypeResolution => "type resolution",
            FailureKind::BadAssignment => "invalid assignment",
            FailureKind::BadCall => "invalid call",
            FailureKind::InvalidReturn => "invalid return",
            FailureKind::StrayControlFlow => "stray control flow",
            FailureKind::Verification => "verification",
        }
    }
}

/// An internal failure raised during lowering or integrity verification.
///
/// `span` is the location of the node being processed when the failure
/// was raised; `None` when no node was available.
#[derive(Debug, Clone, PartialEq, Error)]
pub struct LowerFailure {
    pub kind: FailureKind,
    pub message: String,
    pub span: Option<Span>,
}

impl fmt::Display for LowerFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind.label(), self.message)
    }
}

impl LowerFailure {
    pub fn new(kind: FailureKind, message: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            message: message.into(),
            span: Some(span),
        }
    }

    pub fn unlocated(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            span: None,
        }
    }
}
