//! # Sable Driver
//!
//! Compilation orchestration for Sable: the pipeline that sequences the
//! passes over one unit, the diagnostic model delivered to the host,
//! and the `sable` command-line binary built on top of both.

mod diagnostics;
mod pipeline;

pub use diagnostics::{platform_path, CollectingSink, Diagnostic, DiagnosticSink, Severity};
pub use pipeline::{format_elapsed, CompilePipeline, COMPILE_FAILED};
