//! Method signature registry built by the signature-harvesting pass.

use std::collections::HashMap;

use sable_ast::Span;

/// One harvested method signature.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodSignature {
    pub class_name: String,
    pub name: String,
    /// Code-block label for the method body, e.g. `Counter_Increment`.
    pub label: String,
    /// Storage type names of the parameters, in order.
    pub param_types: Vec<String>,
    /// Storage type of the return value; `None` for void.
    pub return_type: Option<String>,
    pub is_public: bool,
    pub is_static: bool,
    pub span: Span,
}

/// Durable lookup of every method defined in the unit, independent of
/// declaration order. This is the defined-method set consumed by the
/// lowering pass to resolve forward and mutually recursive calls.
#[derive(Debug, Clone, Default)]
pub struct MethodRegistry {
    methods: Vec<MethodSignature>,
    index: HashMap<(String, String), usize>,
}

impl MethodRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a signature. Returns false when the (class, method)
    /// pair is already taken.
    pub fn register(&mut self, signature: MethodSignature) -> bool {
        let key = (signature.class_name.clone(), signature.name.clone());
        if self.index.contains_key(&key) {
            return false;
        }
        self.index.insert(key, self.methods.len());
        self.methods.push(signature);
        true
    }

    pub fn lookup(&self, class_name: &str, name: &str) -> Option<&MethodSignature> {
        self.index
            .get(&(class_name.to_string(), name.to_string()))
            .map(|&i| &self.methods[i])
    }

    pub fn contains(&self, class_name: &str, name: &str) -> bool {
        self.lookup(class_name, name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MethodSignature> {
        self.methods.iter()
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sig(class: &str, name: &str) -> MethodSignature {
        MethodSignature {
            class_name: class.to_string(),
            name: name.to_string(),
            label: format!("{}_{}", class, name),
            param_types: vec![],
            return_type: None,
            is_public: false,
            is_static: false,
            span: Span::new(0, 0),
        }
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = MethodRegistry::new();
        assert!(registry.register(sig("Counter", "Increment")));
        assert!(registry.contains("Counter", "Increment"));
        assert!(!registry.contains("Counter", "Decrement"));
        assert_eq!(
            registry.lookup("Counter", "Increment").unwrap().label,
            "Counter_Increment"
        );
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut registry = MethodRegistry::new();
        assert!(registry.register(sig("A", "M")));
        assert!(!registry.register(sig("A", "M")));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_same_name_different_class() {
        let mut registry = MethodRegistry::new();
        assert!(registry.register(sig("A", "M")));
        assert!(registry.register(sig("B", "M")));
        assert_eq!(registry.len(), 2);
    }
}
