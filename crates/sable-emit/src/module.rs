//! Final module assembly.

/// Concatenates the data block and the code block into the final module
/// text. The code block is taken verbatim from the lowering pass; no
/// further transformation happens here.
pub fn assemble_module(data_block: &str, code_block: &str) -> String {
    if code_block.is_empty() {
        return data_block.to_string();
    }
    format!("{}\n{}", data_block, code_block)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocks_separated_by_blank_line() {
        let module = assemble_module(".data_start\n.data_end\n", ".code_start\n.code_end\n");
        assert_eq!(
            module,
            ".data_start\n.data_end\n\n.code_start\n.code_end\n"
        );
    }

    #[test]
    fn test_empty_code_block() {
        let module = assemble_module(".data_start\n.data_end\n", "");
        assert_eq!(module, ".data_start\n.data_end\n");
    }
}
