//! Tree and javadoc printing commands.

use anyhow::{Context, Result};
use std::path::Path;

use jstyle_core::{ast_printer, parse, parse_javadoc, ParseOptions};

/// Prints the syntax tree of `file`.
pub fn run(file: &Path, comments: bool, javadoc: bool) -> Result<i32> {
    let source = std::fs::read_to_string(file)
        .with_context(|| format!("unable to read {}", file.display()))?;
    let options = ParseOptions {
        include_comments: comments || javadoc,
        include_javadoc: javadoc,
    };
    let tree = parse(&source, options)
        .with_context(|| format!("unable to parse {}", file.display()))?;
    print!("{}", ast_printer::print_tree(&tree));
    Ok(0)
}

/// Prints the javadoc mini-tree of a file holding a comment body.
pub fn run_javadoc(file: &Path) -> Result<i32> {
    let body = std::fs::read_to_string(file)
        .with_context(|| format!("unable to read {}", file.display()))?;
    let tree = parse_javadoc(&body);
    print!("{}", ast_printer::print_tree(&tree));
    Ok(0)
}
