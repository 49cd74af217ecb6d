//! Data block emission from the final symbol directory state.

use std::cmp::Reverse;

use sable_sema::{DeclFlags, SymbolDefinition, SymbolDirectory};

use crate::builder::AssemblyBuilder;

/// Emits the heap declaration block.
///
/// Exported symbols are listed first as `.export` directives in
/// directory enumeration order; every symbol then gets one typed
/// declaration line with its initial value.
pub fn emit_data_block(directory: &SymbolDirectory) -> String {
    let mut b = AssemblyBuilder::new();
    b.line(".data_start");
    b.blank();
    b.push_indent();

    let mut any = false;
    for symbol in directory.all_unique_child_symbols() {
        if symbol.is_exported() {
            b.line(format!(".export {}", symbol.unique_name));
            any = true;
        }
    }
    if any {
        b.blank();
    }

    let mut symbols: Vec<&SymbolDefinition> = directory.all_unique_child_symbols().collect();
    sort_declarations(&mut symbols);
    for symbol in &symbols {
        b.line(format!(
            "{}: %{}, {}",
            symbol.unique_name,
            symbol.type_name,
            symbol.initial_value()
        ));
    }
    if !symbols.is_empty() {
        b.blank();
    }

    b.pop_indent();
    b.line(".data_end");
    b.build()
}

/// Declaration ordering is an output-compatibility contract with the
/// module loader and is reproduced exactly: ascending over the flag
/// tuple, then type name and unique name descending, then the entire
/// order reversed. Do not simplify the composite.
fn sort_declarations(symbols: &mut [&SymbolDefinition]) {
    symbols.sort_by_key(|s| {
        (
            s.flags.contains(DeclFlags::PUBLIC),
            s.flags.contains(DeclFlags::PRIVATE),
            s.flags.contains(DeclFlags::THIS),
            !s.flags.contains(DeclFlags::INTERNAL),
            s.flags.contains(DeclFlags::CONSTANT),
            Reverse(s.type_name.clone()),
            Reverse(s.unique_name.clone()),
        )
    });
    symbols.reverse();
}
