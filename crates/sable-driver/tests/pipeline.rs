//! End-to-end tests for the compilation pipeline.
//!
//! These drive the public driver API from source text to module text
//! and check the gate, ordering, and best-effort emission behavior.

use std::path::Path;

use sable_driver::{CollectingSink, CompilePipeline, COMPILE_FAILED};

struct Compiled {
    module: String,
    errors: usize,
    sink: CollectingSink,
}

fn compile(source: &str) -> Compiled {
    compile_at(source, "unit.sb")
}

fn compile_at(source: &str, path: &str) -> Compiled {
    let mut sink = CollectingSink::new();
    let mut pipeline = CompilePipeline::new(&mut sink);
    let module = pipeline.compile(source, Path::new(path));
    let errors = pipeline.error_count();
    Compiled {
        module,
        errors,
        sink,
    }
}

/// Text of the data block alone.
fn data_section(module: &str) -> &str {
    let end = module.find(".data_end").expect("module has a data block");
    &module[..end]
}

// ============================================================================
// Syntax gate
// ============================================================================

#[test]
fn test_syntax_error_returns_sentinel_and_runs_no_passes() {
    let result = compile("class Gadget { int x }");
    assert_eq!(result.module, COMPILE_FAILED);
    assert_eq!(result.errors, 1);
    // No pass ran: no data block, no symbols, no latency report.
    assert!(!result.module.contains(".data_start"));
    assert!(result.sink.infos.is_empty());
}

#[test]
fn test_syntax_error_location() {
    let result = compile("class Gadget { int x }");
    let diagnostic = &result.sink.diagnostics[0];
    assert_eq!(diagnostic.line, 1);
    assert_eq!(diagnostic.column, 21);
    assert_eq!(diagnostic.file_path, "unit.sb");
}

#[test]
fn test_all_syntax_errors_reported_before_abort() {
    let result = compile("class C { int x } class D { int y }");
    assert_eq!(result.module, COMPILE_FAILED);
    assert_eq!(result.sink.diagnostics.len(), 2);
}

#[test]
fn test_warnings_do_not_abort() {
    let result = compile("class C { int x;; }");
    assert_ne!(result.module, COMPILE_FAILED);
    assert_eq!(result.errors, 0);
}

#[test]
fn test_diagnostic_paths_use_backslashes() {
    let result = compile_at("class Gadget { int x }", "tests/data/unit.sb");
    assert_eq!(result.sink.diagnostics[0].file_path, "tests\\data\\unit.sb");
}

// ============================================================================
// Module shape
// ============================================================================

#[test]
fn test_single_public_field_module_shape() {
    let result = compile("class Gadget { public int x; }");
    assert_eq!(result.errors, 0);
    assert_eq!(
        result.module,
        ".data_start\n\
         \n\
         \x20   .export __0_x\n\
         \n\
         \x20   __0_x: %SystemInt32, null\n\
         \n\
         .data_end\n\
         \n\
         .code_start\n\
         \n\
         .code_end\n"
    );
}

const PLAYER: &str = r#"
class Player {
    public int score;
    public string name;
    private bool active;
    public Player Self() { return this; }
    void Reset() {
        this.score = 0;
        this.active = true;
    }
}
"#;

#[test]
fn test_exports_complete_and_precede_declarations() {
    let result = compile(PLAYER);
    assert_eq!(result.errors, 0, "{:?}", result.sink.diagnostics);

    let data = data_section(&result.module);
    let exports: Vec<&str> = data
        .lines()
        .filter(|l| l.trim_start().starts_with(".export"))
        .map(str::trim)
        .collect();
    assert_eq!(exports, vec![".export __0_score", ".export __1_name"]);

    let first_export = data.find(".export").unwrap();
    let first_decl = data.find(": %").unwrap();
    assert!(first_export < first_decl);
}

#[test]
fn test_declarations_complete_without_duplicates() {
    let result = compile(PLAYER);
    let data = data_section(&result.module);
    let declarations: Vec<&str> = data
        .lines()
        .filter(|l| l.contains(": %"))
        .map(str::trim)
        .collect();

    // Three fields, the lazily created this-symbol, and two literal
    // temporaries from Reset.
    assert_eq!(declarations.len(), 6);
    let unique: std::collections::HashSet<&str> = declarations.iter().copied().collect();
    assert_eq!(unique.len(), declarations.len());
}

#[test]
fn test_declaration_order_is_the_loader_contract() {
    let result = compile(PLAYER);
    let data = data_section(&result.module);
    let names: Vec<&str> = data
        .lines()
        .filter(|l| l.contains(": %"))
        .map(|l| l.trim().split(':').next().unwrap())
        .collect();

    assert_eq!(
        names,
        vec![
            "__0_score",
            "__1_name",
            "__2_active",
            "__3_this",
            "__5_temp",
            "__4_temp"
        ]
    );
}

#[test]
fn test_this_symbol_initializer() {
    let result = compile(PLAYER);
    let data = data_section(&result.module);
    assert!(data.contains("__3_this: %Player, this"));
    for line in data.lines().filter(|l| l.contains(": %")) {
        if !line.contains("_this:") {
            assert!(line.trim_end().ends_with("null"), "line: {}", line);
        }
    }
}

// ============================================================================
// Forward references
// ============================================================================

#[test]
fn test_forward_method_call_compiles_clean() {
    let result = compile(
        r#"
        class Chain {
            void Foo() { Bar(); }
            void Bar() { }
        }
        "#,
    );
    assert_eq!(result.errors, 0, "{:?}", result.sink.diagnostics);
    assert!(result.module.contains("call Chain_Bar"));
    assert!(result.module.contains("Chain_Bar:"));
}

#[test]
fn test_mutual_recursion_compiles_clean() {
    let result = compile(
        r#"
        class Pair {
            void Ping(int n) { if (n > 0) { Pong(n - 1); } }
            void Pong(int n) { if (n > 0) { Ping(n - 1); } }
        }
        "#,
    );
    assert_eq!(result.errors, 0, "{:?}", result.sink.diagnostics);
}

// ============================================================================
// Lowering failures (best-effort emission)
// ============================================================================

const UNSUPPORTED: &str = "class Widget {\n    public int size;\n    int Grab(Widget other) {\n        return other.size;\n    }\n}\n";

#[test]
fn test_lowering_failure_reports_one_located_diagnostic() {
    let result = compile(UNSUPPORTED);
    assert_eq!(result.errors, 1);
    assert_eq!(result.sink.diagnostics.len(), 1);

    let diagnostic = &result.sink.diagnostics[0];
    assert!(diagnostic.message.contains("unsupported construct"));
    assert_eq!(diagnostic.line, 4);
    assert!(result.sink.infos.is_empty());
}

#[test]
fn test_lowering_failure_still_emits_module() {
    let result = compile(UNSUPPORTED);
    assert_ne!(result.module, COMPILE_FAILED);
    assert!(result.module.contains(".data_start"));
    assert!(result.module.contains("Widget_Grab:"));
    assert!(result.module.contains("__0_size: %SystemInt32, null"));
}

// ============================================================================
// Determinism and latency reporting
// ============================================================================

#[test]
fn test_emission_is_deterministic_across_runs() {
    let first = compile(PLAYER);
    let second = compile(PLAYER);
    assert_eq!(first.module, second.module);
}

#[test]
fn test_latency_reported_on_success() {
    let result = compile("class C { }");
    assert_eq!(result.errors, 0);
    assert_eq!(result.sink.infos.len(), 1);
    let info = &result.sink.infos[0];
    assert!(info.starts_with("compiled 'unit.sb' in "), "info: {}", info);
    assert!(info.contains(':'), "info: {}", info);
}

// ============================================================================
// Namespaces and using directives
// ============================================================================

#[test]
fn test_namespace_qualified_storage_types() {
    let result = compile(
        r#"
        using System;
        namespace Demo {
            class Counter {
                public Int32 count;
                public Counter Self() { return this; }
            }
        }
        "#,
    );
    assert_eq!(result.errors, 0, "{:?}", result.sink.diagnostics);
    let data = data_section(&result.module);
    assert!(data.contains("__0_count: %SystemInt32, null"));
    assert!(data.contains("_this: %DemoCounter, this"));
}

#[test]
fn test_unknown_simple_type_without_using() {
    let result = compile("class C { public Int32 x; }");
    assert_eq!(result.errors, 1);
    assert!(result.sink.diagnostics[0].message.contains("unknown type"));
    // Best-effort module is still produced.
    assert!(result.module.contains(".data_start"));
}
