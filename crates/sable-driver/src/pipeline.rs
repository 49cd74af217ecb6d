//! The compilation orchestrator.
//!
//! Sequences the passes over one unit, converts front-end syntax errors
//! and internal lowering failures into located diagnostics, and
//! assembles the final data+code module text. Syntax errors abort
//! before any pass runs; lowering and verification failures are
//! reported but still produce a best-effort module, so callers must
//! check the error count rather than assume a non-sentinel return means
//! success.

use std::path::Path;
use std::time::{Duration, Instant};

use tracing::{debug, info_span};

use sable_ast::{LineIndex, Span, Unit};
use sable_emit::{assemble_module, emit_data_block};
use sable_lexer::Lexer;
use sable_lower::{lower_unit, verify, LowerFailure};
use sable_parser::{Parser, Severity as SyntaxSeverity};
use sable_sema::{
    MethodRegistry, NamespacePass, ResolverContext, SemaError, SignaturePass, SymbolDirectory,
};

use crate::diagnostics::{platform_path, Diagnostic, DiagnosticSink, Severity};

/// Sentinel module text returned when syntax errors abort compilation.
pub const COMPILE_FAILED: &str = "error";

/// An internal failure normalized for reporting.
struct LocatedFailure {
    message: String,
    span: Option<Span>,
}

impl From<SemaError> for LocatedFailure {
    fn from(err: SemaError) -> Self {
        Self {
            message: err.to_string(),
            span: Some(err.span),
        }
    }
}

impl From<LowerFailure> for LocatedFailure {
    fn from(failure: LowerFailure) -> Self {
        Self {
            message: failure.to_string(),
            span: failure.span,
        }
    }
}

/// One compilation pipeline instance. Owns nothing across units: each
/// call to [`CompilePipeline::compile`] builds a fresh resolver context,
/// symbol directory, and label table for that unit alone.
pub struct CompilePipeline<'a> {
    sink: &'a mut dyn DiagnosticSink,
    error_count: usize,
}

impl<'a> CompilePipeline<'a> {
    pub fn new(sink: &'a mut dyn DiagnosticSink) -> Self {
        Self {
            sink,
            error_count: 0,
        }
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    /// Compiles one source unit to module text, or to [`COMPILE_FAILED`]
    /// when syntax errors prevent the passes from running.
    pub fn compile(&mut self, source: &str, path: &Path) -> String {
        self.error_count = 0;
        let started = Instant::now();
        let file_path = platform_path(path);
        let line_index = LineIndex::new(source);

        let tree = {
            let _span = info_span!("pass", stage = "parse").entered();
            let tokens = Lexer::new(source).tokenize();
            Parser::new(tokens).parse_unit()
        };

        // Syntax gate: every error-severity diagnostic is reported
        // before the abort, then no pass runs.
        for diagnostic in tree.diagnostics() {
            if diagnostic.severity == SyntaxSeverity::Error {
                self.report_at(&diagnostic.message, diagnostic.span, &file_path, &line_index);
            }
        }
        if self.error_count > 0 {
            return COMPILE_FAILED.to_string();
        }

        let mut resolver = ResolverContext::new();
        let mut directory = SymbolDirectory::new();
        let mut registry = MethodRegistry::new();

        let (code_block, failure) =
            self.run_passes(&tree.unit, &mut resolver, &mut directory, &mut registry);

        if let Some(failure) = failure {
            self.report_failure(failure, &file_path, &line_index);
        }

        // Best-effort emission: the data block reflects whatever the
        // directory accumulated, even after a failure.
        let data_block = emit_data_block(&directory);
        let module = assemble_module(&data_block, &code_block);

        if self.error_count == 0 {
            self.sink.report_info(&format!(
                "compiled '{}' in {}",
                file_path,
                format_elapsed(started.elapsed())
            ));
        }

        module
    }

    /// Runs passes 1-3 and verification, stopping at the first failure.
    /// Returns the code block accumulated so far either way.
    fn run_passes(
        &mut self,
        unit: &Unit,
        resolver: &mut ResolverContext,
        directory: &mut SymbolDirectory,
        registry: &mut MethodRegistry,
    ) -> (String, Option<LocatedFailure>) {
        {
            let _span = info_span!("pass", stage = "namespace-resolution").entered();
            if let Err(err) = NamespacePass::run(unit, resolver) {
                return (String::new(), Some(err.into()));
            }
            debug!(
                usings = resolver.usings().len(),
                namespaces = resolver.namespaces().len(),
                "namespaces resolved"
            );
        }

        {
            let _span = info_span!("pass", stage = "signature-harvesting").entered();
            if let Err(err) = SignaturePass::run(unit, resolver, registry) {
                return (String::new(), Some(err.into()));
            }
            debug!(methods = registry.len(), "signatures harvested");
        }

        let (lowered, failure) = {
            let _span = info_span!("pass", stage = "lowering").entered();
            lower_unit(unit, resolver, registry, directory)
        };
        debug!(
            symbols = directory.len(),
            labels = lowered.labels.len(),
            "lowering finished"
        );
        if let Some(failure) = failure {
            return (lowered.code, Some(failure.into()));
        }

        {
            let _span = info_span!("pass", stage = "verification").entered();
            if let Err(failure) = verify(&lowered, directory) {
                return (lowered.code, Some(failure.into()));
            }
        }

        (lowered.code, None)
    }

    fn report_at(&mut self, message: &str, span: Span, file_path: &str, line_index: &LineIndex) {
        let (line, column) = line_index.line_col(span.start);
        self.sink.report_build_error(&Diagnostic {
            message: message.to_string(),
            file_path: file_path.to_string(),
            line: line + 1,
            column,
            severity: Severity::Error,
        });
        self.error_count += 1;
    }

    fn report_failure(&mut self, failure: LocatedFailure, file_path: &str, line_index: &LineIndex) {
        match failure.span {
            Some(span) => self.report_at(&failure.message, span, file_path, line_index),
            None => {
                self.sink.report_build_error(&Diagnostic {
                    message: failure.message,
                    file_path: file_path.to_string(),
                    line: 0,
                    column: 0,
                    severity: Severity::Error,
                });
                self.error_count += 1;
            }
        }
    }
}

/// Formats elapsed wall-clock time as `minutes:seconds.milliseconds`.
pub fn format_elapsed(elapsed: Duration) -> String {
    let total_ms = elapsed.as_millis();
    let minutes = total_ms / 60_000;
    let seconds = (total_ms % 60_000) / 1_000;
    let millis = total_ms % 1_000;
    format!("{}:{:02}.{:03}", minutes, seconds, millis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(Duration::from_millis(12)), "0:00.012");
        assert_eq!(format_elapsed(Duration::from_millis(1_500)), "0:01.500");
        assert_eq!(format_elapsed(Duration::from_millis(61_001)), "1:01.001");
        assert_eq!(format_elapsed(Duration::from_millis(600_000)), "10:00.000");
    }
}
