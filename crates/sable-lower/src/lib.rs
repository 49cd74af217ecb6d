//! # Sable Lowering
//!
//! The lowering pass (statements and expressions to instruction text),
//! the per-unit label table, and post-lowering integrity verification.
//! Lowering consumes the resolver context, symbol directory, and the
//! method registry harvested by the earlier passes.

mod error;
mod labels;
mod lower;
mod verify;

pub use error::{FailureKind, LowerFailure};
pub use labels::{LabelEntry, LabelId, LabelTable};
pub use lower::{lower_unit, LoweredUnit, SymbolRef};
pub use verify::verify;

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use sable_ast::Span;
    use sable_lexer::Lexer;
    use sable_parser::Parser;
    use sable_sema::{
        MethodRegistry, NamespacePass, ResolverContext, SignaturePass, SymbolDirectory,
    };

    struct Lowered {
        unit: LoweredUnit,
        failure: Option<LowerFailure>,
        directory: SymbolDirectory,
    }

    fn lower(source: &str) -> Lowered {
        let tokens = Lexer::new(source).tokenize();
        let tree = Parser::new(tokens).parse_unit();
        assert!(!tree.has_errors(), "unexpected syntax errors");

        let mut resolver = ResolverContext::new();
        NamespacePass::run(&tree.unit, &mut resolver).unwrap();
        let mut registry = MethodRegistry::new();
        SignaturePass::run(&tree.unit, &resolver, &mut registry).unwrap();

        let mut directory = SymbolDirectory::new();
        let (unit, failure) = lower_unit(&tree.unit, &resolver, &registry, &mut directory);
        Lowered {
            unit,
            failure,
            directory,
        }
    }

    #[test]
    fn test_fieldless_methodless_class_produces_empty_code() {
        let result = lower("class Empty { }");
        assert!(result.failure.is_none());
        assert_eq!(result.unit.code, ".code_start\n\n.code_end\n");
        assert!(result.directory.is_empty());
    }

    #[test]
    fn test_field_only_class_allocates_one_symbol() {
        let result = lower("class C { public int x; }");
        assert!(result.failure.is_none());
        // No method body ever touched `this`, so only the field exists.
        assert_eq!(result.directory.len(), 1);
        let symbol = result.directory.all_unique_child_symbols().next().unwrap();
        assert_eq!(symbol.unique_name, "__0_x");
        assert_eq!(symbol.type_name, "SystemInt32");
    }

    #[test]
    fn test_method_lowering_shape() {
        let result = lower(
            r#"
            class Counter {
                private int count;
                public void Add(int amount) {
                    this.count = this.count + amount;
                }
            }
            "#,
        );
        assert!(result.failure.is_none(), "{:?}", result.failure);

        let code = &result.unit.code;
        assert!(code.contains(".export Counter_Add"));
        assert!(code.contains("Counter_Add:"));
        assert!(code.contains("pop __1_amount"));
        assert!(code.contains("add __2_temp, __0_count, __1_amount"));
        assert!(code.contains("copy __0_count, __2_temp"));
        assert!(code.trim_end().ends_with(".code_end"));
    }

    #[test]
    fn test_private_method_not_exported_in_code() {
        let result = lower("class C { void M() { } }");
        assert!(result.failure.is_none());
        assert!(!result.unit.code.contains(".export"));
        assert!(result.unit.code.contains("C_M:"));
    }

    #[test]
    fn test_forward_call_resolves_and_references_label() {
        let result = lower(
            r#"
            class C {
                void Foo() { Bar(); }
                void Bar() { }
            }
            "#,
        );
        assert!(result.failure.is_none());
        assert!(result.unit.code.contains("call C_Bar"));

        let entry = result
            .unit
            .labels
            .entries()
            .find(|e| e.name == "C_Bar")
            .unwrap();
        assert_eq!(entry.definitions, 1);
        assert_eq!(entry.references, 1);
        assert!(verify(&result.unit, &result.directory).is_ok());
    }

    #[test]
    fn test_call_with_return_value() {
        let result = lower(
            r#"
            class C {
                int Twice(int v) { return v * 2; }
                int Use() { return Twice(21); }
            }
            "#,
        );
        assert!(result.failure.is_none());
        let code = &result.unit.code;
        assert!(code.contains("call C_Twice"));
        // The caller pops the pushed result into a fresh temporary.
        assert!(code.contains("push __"));
        assert!(code.contains("pop __"));
    }

    #[test]
    fn test_while_loop_labels() {
        let result = lower(
            r#"
            class C {
                void M() {
                    int i = 0;
                    while (i < 10) {
                        i = i + 1;
                    }
                }
            }
            "#,
        );
        assert!(result.failure.is_none());
        let code = &result.unit.code;
        assert!(code.contains("while_head_"));
        assert!(code.contains("jump_if_false"));
        assert!(verify(&result.unit, &result.directory).is_ok());
    }

    #[test]
    fn test_break_and_continue() {
        let result = lower(
            r#"
            class C {
                void M() {
                    for (int i = 0; i < 10; i = i + 1) {
                        if (i == 3) { continue; }
                        if (i == 7) { break; }
                    }
                }
            }
            "#,
        );
        assert!(result.failure.is_none(), "{:?}", result.failure);
        assert!(verify(&result.unit, &result.directory).is_ok());
    }

    #[test]
    fn test_break_outside_loop_fails() {
        let result = lower("class C { void M() { break; } }");
        let failure = result.failure.unwrap();
        assert_eq!(failure.kind, FailureKind::StrayControlFlow);
        assert!(failure.span.is_some());
    }

    #[test]
    fn test_this_symbol_created_lazily() {
        let without = lower("class C { public int x; void M() { int y = 1; } }");
        assert!(without
            .directory
            .all_unique_child_symbols()
            .all(|s| s.source_name != "this"));

        let with = lower("class C { void M() { C me = this; } }");
        assert!(with
            .directory
            .all_unique_child_symbols()
            .any(|s| s.source_name == "this" && s.initial_value() == "this"));
    }

    #[test]
    fn test_member_access_on_object_is_unsupported() {
        let result = lower(
            r#"
            class C {
                int M(C other) { return other.x; }
                public int x;
            }
            "#,
        );
        let failure = result.failure.unwrap();
        assert_eq!(failure.kind, FailureKind::Unsupported);
        assert!(failure.span.is_some());
        // Best-effort output still contains the method label.
        assert!(result.unit.code.contains("C_M:"));
    }

    #[test]
    fn test_unknown_identifier_fails() {
        let result = lower("class C { void M() { int x = missing; } }");
        let failure = result.failure.unwrap();
        assert_eq!(failure.kind, FailureKind::UnknownSymbol);
    }

    #[test]
    fn test_assign_to_constant_fails() {
        let result = lower("class C { const int Max = 10; void M() { Max = 1; } }");
        let failure = result.failure.unwrap();
        assert_eq!(failure.kind, FailureKind::BadAssignment);
    }

    #[test]
    fn test_const_materialized_at_first_use() {
        let result = lower(
            r#"
            class C {
                const int Max = 10;
                bool Over(int v) { return v > Max && v > Max; }
            }
            "#,
        );
        assert!(result.failure.is_none(), "{:?}", result.failure);
        let const_lines = result
            .unit
            .code
            .lines()
            .filter(|l| l.trim_start().starts_with("const __0_Max"))
            .count();
        assert_eq!(const_lines, 1);
        assert!(result.unit.code.contains("const __0_Max, 10"));
    }

    #[test]
    fn test_arity_mismatch_fails() {
        let result = lower(
            r#"
            class C {
                void M() { N(1, 2); }
                void N(int a) { }
            }
            "#,
        );
        let failure = result.failure.unwrap();
        assert_eq!(failure.kind, FailureKind::BadCall);
    }

    #[test]
    fn test_static_method_cannot_use_this() {
        let result = lower("class C { public int x; static void M() { this.x = 1; } }");
        let failure = result.failure.unwrap();
        assert_eq!(failure.kind, FailureKind::Unsupported);
    }

    #[test]
    fn test_verify_rejects_dangling_symbol_ref() {
        let result = lower("class C { void M() { } }");
        assert!(result.failure.is_none());

        let mut broken = result.unit.clone();
        broken.symbol_refs.push(SymbolRef {
            unique_name: "__99_ghost".to_string(),
            span: Span::new(0, 0),
        });
        let failure = verify(&broken, &result.directory).unwrap_err();
        assert_eq!(failure.kind, FailureKind::Verification);
        assert!(failure.message.contains("__99_ghost"));
    }

    #[test]
    fn test_verify_rejects_undefined_label() {
        let result = lower("class C { void M() { } }");
        let mut broken = result.unit.clone();
        let id = broken.labels.named("phantom");
        broken.labels.mark_referenced(id);
        let failure = verify(&broken, &result.directory).unwrap_err();
        assert_eq!(failure.kind, FailureKind::Verification);
        assert!(failure.span.is_none());
    }

    #[test]
    fn test_verify_rejects_duplicate_label_definition() {
        let result = lower("class C { void M() { } }");
        let mut broken = result.unit.clone();
        let id = broken.labels.named("C_M");
        broken.labels.mark_referenced(id);
        broken.labels.mark_defined(id);
        let failure = verify(&broken, &result.directory).unwrap_err();
        assert!(failure.message.contains("defined 2 times"));
    }

    #[test]
    fn test_missing_trailing_return_fails() {
        let result = lower("class C { int M() { int x = 1; } }");
        let failure = result.failure.unwrap();
        assert_eq!(failure.kind, FailureKind::InvalidReturn);
    }
}
