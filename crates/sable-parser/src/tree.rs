//! The parser's output: a unit plus its syntax diagnostics.

use crate::error::{Severity, SyntaxDiagnostic};
use sable_ast::Unit;

/// Parse result carrying the (possibly partial) unit and every
/// diagnostic collected while building it.
///
/// The parser recovers from errors instead of failing fast, so a tree
/// is always produced; callers gate on [`SyntaxTree::has_errors`].
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    pub unit: Unit,
    diagnostics: Vec<SyntaxDiagnostic>,
}

impl SyntaxTree {
    pub(crate) fn new(unit: Unit, diagnostics: Vec<SyntaxDiagnostic>) -> Self {
        Self { unit, diagnostics }
    }

    pub fn diagnostics(&self) -> &[SyntaxDiagnostic] {
        &self.diagnostics
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }
}
