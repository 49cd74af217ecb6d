//! Pass 1: namespace resolution.
//!
//! A single read-only traversal of the unit that registers using
//! directives, declared namespaces, and class names into the resolver
//! context so later passes can resolve unqualified type names. No code
//! or symbols are emitted.

use sable_ast::{Item, Unit};

use crate::error::{SemaError, SemaErrorKind};
use crate::resolver::ResolverContext;

pub struct NamespacePass;

impl NamespacePass {
    pub fn run(unit: &Unit, ctx: &mut ResolverContext) -> Result<(), SemaError> {
        for using in &unit.usings {
            ctx.add_using(using.value.path.joined());
        }

        for item in &unit.items {
            match &item.value {
                Item::Namespace(ns) => {
                    let path = ns.name.joined();
                    ctx.add_namespace(path.clone());
                    for class in &ns.classes {
                        let name = &class.value.name;
                        if !ctx.declare_class(Some(&path), &name.value.name) {
                            return Err(SemaError::new(
                                SemaErrorKind::DuplicateClass(name.value.name.clone()),
                                name.span,
                            ));
                        }
                    }
                }
                Item::Class(class) => {
                    let name = &class.name;
                    if !ctx.declare_class(None, &name.value.name) {
                        return Err(SemaError::new(
                            SemaErrorKind::DuplicateClass(name.value.name.clone()),
                            name.span,
                        ));
                    }
                }
            }
        }

        Ok(())
    }
}
