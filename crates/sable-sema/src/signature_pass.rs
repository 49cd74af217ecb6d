//! Pass 2: signature harvesting.
//!
//! A single traversal that registers every method's signature so call
//! sites resolve regardless of declaration order. Method bodies are not
//! lowered here.

use sable_ast::{AccessModifier, Unit};

use crate::error::{SemaError, SemaErrorKind};
use crate::resolver::{ResolvedType, ResolverContext};
use crate::signatures::{MethodRegistry, MethodSignature};

pub struct SignaturePass;

impl SignaturePass {
    pub fn run(
        unit: &Unit,
        ctx: &ResolverContext,
        registry: &mut MethodRegistry,
    ) -> Result<(), SemaError> {
        for (_, class) in unit.classes() {
            let class_name = class.name.value.name.clone();

            for method in class.methods() {
                let mut param_types = Vec::new();
                for param in &method.params {
                    match ctx.resolve_type(&param.ty.value) {
                        Some(ResolvedType::Storage(name)) => param_types.push(name),
                        Some(ResolvedType::Void) => {
                            return Err(SemaError::new(SemaErrorKind::VoidParam, param.ty.span));
                        }
                        None => {
                            return Err(SemaError::new(
                                SemaErrorKind::UnknownType(param.ty.value.to_string()),
                                param.ty.span,
                            ));
                        }
                    }
                }

                let return_type = match ctx.resolve_type(&method.return_type.value) {
                    Some(ResolvedType::Storage(name)) => Some(name),
                    Some(ResolvedType::Void) => None,
                    None => {
                        return Err(SemaError::new(
                            SemaErrorKind::UnknownType(method.return_type.value.to_string()),
                            method.return_type.span,
                        ));
                    }
                };

                let signature = MethodSignature {
                    label: format!("{}_{}", class_name, method.name.value.name),
                    class_name: class_name.clone(),
                    name: method.name.value.name.clone(),
                    param_types,
                    return_type,
                    is_public: method.access == AccessModifier::Public,
                    is_static: method.is_static,
                    span: method.name.span,
                };

                if !registry.register(signature) {
                    return Err(SemaError::new(
                        SemaErrorKind::DuplicateMethod(
                            class_name.clone(),
                            method.name.value.name.clone(),
                        ),
                        method.name.span,
                    ));
                }
            }
        }

        Ok(())
    }
}
