//! # Sable Parser
//!
//! Recursive descent parser for Sable with panic-mode recovery.
//! Parsing always produces a [`SyntaxTree`]: a (possibly partial) unit
//! together with every syntax diagnostic collected on the way, so the
//! compilation pipeline can enumerate diagnostics and gate on
//! error-severity entries.

use sable_ast::*;
use sable_lexer::{Token, TokenKind};

// Module declarations
mod error;
mod parser;
mod tree;
mod decl;
mod stmt;
mod expr;
mod types;
mod helpers;

// Re-export public types
pub use error::{ParseError, ParseResult, Severity, SyntaxDiagnostic};
pub use parser::Parser;
pub use tree::SyntaxTree;

// =============================================================================
// Tests
// =============================================================================
