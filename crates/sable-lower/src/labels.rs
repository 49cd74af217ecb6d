//! Per-unit label registry for code-block jump targets.

use std::collections::HashMap;

/// Unique identifier for a label within the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LabelId(pub usize);

/// A named jump target with definition and reference counts.
///
/// Instructions may reference a label before its definition is emitted;
/// integrity verification checks that every referenced label ended up
/// with exactly one definition.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelEntry {
    pub name: String,
    pub definitions: usize,
    pub references: usize,
}

/// Registry of every label created while lowering one unit.
#[derive(Debug, Clone, Default)]
pub struct LabelTable {
    entries: Vec<LabelEntry>,
    by_name: HashMap<String, LabelId>,
}

impl LabelTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mints a new label with a unique name derived from the hint.
    pub fn fresh(&mut self, hint: &str) -> LabelId {
        let name = format!("{}_{}", hint, self.entries.len());
        self.insert(name)
    }

    /// Returns the label with the given name, creating it on first use.
    /// Method-body labels go through here so call sites and definitions
    /// share one entry regardless of which is lowered first.
    pub fn named(&mut self, name: &str) -> LabelId {
        if let Some(&id) = self.by_name.get(name) {
            return id;
        }
        self.insert(name.to_string())
    }

    fn insert(&mut self, name: String) -> LabelId {
        let id = LabelId(self.entries.len());
        self.by_name.insert(name.clone(), id);
        self.entries.push(LabelEntry {
            name,
            definitions: 0,
            references: 0,
        });
        id
    }

    pub fn mark_defined(&mut self, id: LabelId) {
        self.entries[id.0].definitions += 1;
    }

    pub fn mark_referenced(&mut self, id: LabelId) {
        self.entries[id.0].references += 1;
    }

    pub fn name(&self, id: LabelId) -> &str {
        &self.entries[id.0].name
    }

    pub fn entries(&self) -> impl Iterator<Item = &LabelEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_labels_are_unique() {
        let mut table = LabelTable::new();
        let a = table.fresh("while_head");
        let b = table.fresh("while_head");
        assert_ne!(table.name(a), table.name(b));
    }

    #[test]
    fn test_named_label_is_shared() {
        let mut table = LabelTable::new();
        let a = table.named("Counter_Increment");
        let b = table.named("Counter_Increment");
        assert_eq!(a, b);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_counts() {
        let mut table = LabelTable::new();
        let id = table.named("L");
        table.mark_referenced(id);
        table.mark_referenced(id);
        table.mark_defined(id);
        let entry = table.entries().next().unwrap();
        assert_eq!(entry.references, 2);
        assert_eq!(entry.definitions, 1);
    }
}
