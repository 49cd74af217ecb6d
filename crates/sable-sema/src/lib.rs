//! # Sable Semantic Analysis
//!
//! The resolver context, symbol directory, and the first two pipeline
//! passes: namespace resolution and signature harvesting. Both passes
//! mutate per-unit shared state that the lowering pass consumes; they
//! must run, in order, before lowering.

mod error;
mod resolver;
mod symbols;
mod signatures;
mod namespace_pass;
mod signature_pass;

// Re-export public API
pub use error::{SemaError, SemaErrorKind};
pub use resolver::{ResolvedType, ResolverContext};
pub use symbols::{DeclFlags, SymbolDefinition, SymbolDirectory, SymbolId};
pub use signatures::{MethodRegistry, MethodSignature};
pub use namespace_pass::NamespacePass;
pub use signature_pass::SignaturePass;

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use sable_lexer::Lexer;
    use sable_parser::Parser;

    fn parse(source: &str) -> sable_ast::Unit {
        let tokens = Lexer::new(source).tokenize();
        let tree = Parser::new(tokens).parse_unit();
        assert!(!tree.has_errors(), "unexpected syntax errors");
        tree.unit
    }

    #[test]
    fn test_namespace_pass_registers_usings_and_classes() {
        let unit = parse("using System; namespace Demo { class Counter { } } class Free { }");
        let mut ctx = ResolverContext::new();
        NamespacePass::run(&unit, &mut ctx).unwrap();

        assert_eq!(ctx.usings(), &["System".to_string()]);
        assert_eq!(ctx.namespaces(), &["Demo".to_string()]);
        assert_eq!(ctx.class_storage("Counter"), Some("DemoCounter".to_string()));
        assert_eq!(ctx.class_storage("Free"), Some("Free".to_string()));
    }

    #[test]
    fn test_namespace_pass_rejects_duplicate_class() {
        let unit = parse("class A { } class A { }");
        let mut ctx = ResolverContext::new();
        let err = NamespacePass::run(&unit, &mut ctx).unwrap_err();
        assert!(matches!(err.kind, SemaErrorKind::DuplicateClass(_)));
    }

    #[test]
    fn test_signature_pass_harvests_out_of_order() {
        let unit = parse(
            r#"
            class C {
                void Foo() { }
                public int Bar(int a, bool b) { return a; }
            }
            "#,
        );
        let mut ctx = ResolverContext::new();
        NamespacePass::run(&unit, &mut ctx).unwrap();
        let mut registry = MethodRegistry::new();
        SignaturePass::run(&unit, &ctx, &mut registry).unwrap();

        assert_eq!(registry.len(), 2);
        let bar = registry.lookup("C", "Bar").unwrap();
        assert_eq!(bar.label, "C_Bar");
        assert_eq!(bar.param_types, vec!["SystemInt32", "SystemBoolean"]);
        assert_eq!(bar.return_type, Some("SystemInt32".to_string()));
        assert!(bar.is_public);

        let foo = registry.lookup("C", "Foo").unwrap();
        assert_eq!(foo.return_type, None);
        assert!(!foo.is_public);
    }

    #[test]
    fn test_signature_pass_unknown_param_type() {
        let unit = parse("class C { void M(Mystery m) { } }");
        let mut ctx = ResolverContext::new();
        NamespacePass::run(&unit, &mut ctx).unwrap();
        let mut registry = MethodRegistry::new();
        let err = SignaturePass::run(&unit, &ctx, &mut registry).unwrap_err();
        assert!(matches!(err.kind, SemaErrorKind::UnknownType(_)));
    }

    #[test]
    fn test_signature_pass_void_param() {
        let unit = parse("class C { void M(void v) { } }");
        let mut ctx = ResolverContext::new();
        NamespacePass::run(&unit, &mut ctx).unwrap();
        let mut registry = MethodRegistry::new();
        let err = SignaturePass::run(&unit, &ctx, &mut registry).unwrap_err();
        assert_eq!(err.kind, SemaErrorKind::VoidParam);
    }

    #[test]
    fn test_signature_pass_duplicate_method() {
        let unit = parse("class C { void M() { } void M() { } }");
        let mut ctx = ResolverContext::new();
        NamespacePass::run(&unit, &mut ctx).unwrap();
        let mut registry = MethodRegistry::new();
        let err = SignaturePass::run(&unit, &ctx, &mut registry).unwrap_err();
        assert!(matches!(err.kind, SemaErrorKind::DuplicateMethod(_, _)));
    }

    #[test]
    fn test_class_param_type_resolves() {
        let unit = parse("namespace Demo { class A { void M(A other) { } } }");
        let mut ctx = ResolverContext::new();
        NamespacePass::run(&unit, &mut ctx).unwrap();
        let mut registry = MethodRegistry::new();
        SignaturePass::run(&unit, &ctx, &mut registry).unwrap();
        let m = registry.lookup("A", "M").unwrap();
        assert_eq!(m.param_types, vec!["DemoA"]);
    }
}
