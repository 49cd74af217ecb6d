//! Diagnostic model and host reporting interfaces.

use std::path::Path;

/// Severity of a reported diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// A located diagnostic as delivered to the host build channel.
///
/// `line` is 1-based and `column` 0-based; a `line` of 0 marks an
/// unlocated diagnostic (no source node was available).
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub message: String,
    pub file_path: String,
    pub line: usize,
    pub column: usize,
    pub severity: Severity,
}

/// Host integration surface for build output.
///
/// The orchestrator never reaches into the host directly; editors and
/// build tools implement this and inject it.
pub trait DiagnosticSink {
    /// Records a build-time error with its source location.
    fn report_build_error(&mut self, diagnostic: &Diagnostic);

    /// Emits an informational message (e.g. the compile-latency line).
    fn report_info(&mut self, message: &str);
}

/// Converts a path to the build channel's platform convention, which
/// uses backslash separators regardless of how the input was spelled.
pub fn platform_path(path: &Path) -> String {
    path.to_string_lossy().replace('/', "\\")
}

/// Sink that collects everything it receives. Used by `check` runs and
/// tests.
#[derive(Debug, Default)]
pub struct CollectingSink {
    pub diagnostics: Vec<Diagnostic>,
    pub infos: Vec<String>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DiagnosticSink for CollectingSink {
    fn report_build_error(&mut self, diagnostic: &Diagnostic) {
        self.diagnostics.push(diagnostic.clone());
    }

    fn report_info(&mut self, message: &str) {
        self.infos.push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_path_uses_backslashes() {
        assert_eq!(platform_path(Path::new("src/demo/unit.sb")), "src\\demo\\unit.sb");
        assert_eq!(platform_path(Path::new("unit.sb")), "unit.sb");
    }

    #[test]
    fn test_collecting_sink() {
        let mut sink = CollectingSink::new();
        sink.report_build_error(&Diagnostic {
            message: "boom".to_string(),
            file_path: "a.sb".to_string(),
            line: 3,
            column: 7,
            severity: Severity::Error,
        });
        sink.report_info("done");
        assert_eq!(sink.diagnostics.len(), 1);
        assert_eq!(sink.diagnostics[0].line, 3);
        assert_eq!(sink.infos, vec!["done".to_string()]);
    }
}
