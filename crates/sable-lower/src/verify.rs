//! Post-lowering integrity verification.
//!
//! Read-only check over the lowered output: every recorded symbol
//! reference must resolve to a definition in the symbol directory, and
//! every referenced label must have exactly one definition. The first
//! violation found is returned; no repair is attempted.

use sable_sema::SymbolDirectory;

use crate::error::{FailureKind, LowerFailure};
use crate::lower::LoweredUnit;

pub fn verify(lowered: &LoweredUnit, directory: &SymbolDirectory) -> Result<(), LowerFailure> {
    for symbol_ref in &lowered.symbol_refs {
        if !directory.contains_unique(&symbol_ref.unique_name) {
            return Err(LowerFailure::new(
                FailureKind::Verification,
                format!(
                    "reference to undefined symbol `{}`",
                    symbol_ref.unique_name
                ),
                symbol_ref.span,
            ));
        }
    }

    for entry in lowered.labels.entries() {
        if entry.references == 0 {
            continue;
        }
        if entry.definitions == 0 {
            return Err(LowerFailure::unlocated(
                FailureKind::Verification,
                format!("label `{}` is referenced but never defined", entry.name),
            ));
        }
        if entry.definitions > 1 {
            return Err(LowerFailure::unlocated(
                FailureKind::Verification,
                format!(
                    "label `{}` is defined {} times",
                    entry.name, entry.definitions
                ),
            ));
        }
    }

    Ok(())
}
