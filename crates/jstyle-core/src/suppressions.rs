//! Suppression-query generation.
//!
//! Given a line (and optional column) in an audited file, every node whose
//! position matches pairs with every check that flagged that position; each
//! pair serializes as one `<suppress-xpath>` element inside the fixed
//! DTD-declared document.

use crate::tree::SyntaxTree;
use crate::violation::Violation;
use crate::xpath;

/// Fixed XML prologue of the suppression document.
const XML_HEADER: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
<!DOCTYPE suppressions PUBLIC\n    \
\"-//jstyle//DTD SuppressionXpathFilter Configuration 1.2//EN\"\n    \
\"https://jstyle.dev/dtds/suppressions_1_2_xpath.dtd\">";

/// One generated suppression element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuppressionEntry {
    /// File name pattern the suppression applies to.
    pub files: String,
    /// Check name the suppression silences.
    pub checks: String,
    /// Path query identifying the suppressed node.
    pub query: String,
}

/// Generates suppression entries for the given position.
///
/// `violations` are the file's audit results; checks that flagged the
/// position are paired with every node whose position matches, in the order
/// the nodes appear in the document and the checks reported.
#[must_use]
pub fn generate(
    tree: &SyntaxTree,
    file_name: &str,
    violations: &[Violation],
    line: usize,
    column: Option<usize>,
) -> Vec<SuppressionEntry> {
    let mut checks: Vec<&str> = Vec::new();
    for v in violations {
        let position_matches = v.line == line && (column.is_none() || v.column == column);
        if position_matches && !checks.contains(&v.source_name.as_str()) {
            checks.push(&v.source_name);
        }
    }
    if checks.is_empty() {
        return Vec::new();
    }

    let mut entries = Vec::new();
    for node in tree.nodes_at(line, column) {
        let query = xpath::query_for_node(tree, node);
        for check in &checks {
            entries.push(SuppressionEntry {
                files: file_name.to_string(),
                checks: (*check).to_string(),
                query: query.clone(),
            });
        }
    }
    entries
}

/// Serializes entries into the fixed suppression XML document.
#[must_use]
pub fn serialize(entries: &[SuppressionEntry]) -> String {
    let mut out = String::from(XML_HEADER);
    out.push_str("\n<suppressions>\n");
    for entry in entries {
        out.push_str("<suppress-xpath\n");
        out.push_str(&format!("       files=\"{}\"\n", escape_attr(&entry.files)));
        out.push_str(&format!("       checks=\"{}\"\n", escape_attr(&entry.checks)));
        out.push_str(&format!("       query=\"{}\"/>\n", escape_attr(&entry.query)));
    }
    out.push_str("</suppressions>\n");
    out
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
