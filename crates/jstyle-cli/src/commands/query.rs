//! Path-query command: print matching subtrees.

use anyhow::{anyhow, Context, Result};
use std::path::Path;

use jstyle_core::{ast_printer, parse, xpath, ParseOptions};

/// Evaluates `query` against `file` and prints each match as a tree
/// fragment, separated by the fixed delimiter line.
pub fn run(file: &Path, query: &str) -> Result<i32> {
    let source = std::fs::read_to_string(file)
        .with_context(|| format!("unable to read {}", file.display()))?;
    let tree = parse(&source, ParseOptions::default())
        .with_context(|| format!("unable to parse {}", file.display()))?;

    let matches = xpath::evaluate(&tree, query)
        .map_err(|e| anyhow!("{}: {e}", file.display()))?;

    if matches.is_empty() {
        tracing::info!("no nodes matched the query");
        return Ok(0);
    }
    print!("{}", ast_printer::print_fragments(&tree, &matches));
    Ok(0)
}
