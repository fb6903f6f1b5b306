//! Splitting PO file content into blank-line-delimited blocks.
//!
//! Each block is one catalog entry (or the header). Splitting is pure and
//! restartable; the same content always yields the same blocks.

/// A contiguous group of non-blank lines, tagged with the 1-based line
/// number where it starts in the original content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub start_line: usize,
    pub text: String,
}

/// Splits `content` into blocks separated by one or more blank lines.
///
/// A line consisting only of whitespace counts as blank. No block is ever
/// empty; content with no non-blank lines yields no blocks.
pub fn split_into_blocks(content: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut current_start_line = 1;

    for (index, line) in content.lines().enumerate() {
        let line_number = index + 1;
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(Block {
                    start_line: current_start_line,
                    text: current.join("\n"),
                });
                current.clear();
            }
            current_start_line = line_number + 1;
        } else {
            current.push(line);
        }
    }

    if !current.is_empty() {
        blocks.push(Block {
            start_line: current_start_line,
            text: current.join("\n"),
        });
    }

    blocks
}
