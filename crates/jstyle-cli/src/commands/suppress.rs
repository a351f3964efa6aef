//! Suppression-generation command.

use anyhow::{anyhow, Context, Result};
use std::path::Path;
use std::sync::{Arc, Mutex};

use jstyle_checks::default_registry;
use jstyle_core::{
    config, parse, suppressions, AuditListener, Checker, ParseOptions, Violation,
};

/// Audits `file` and prints suppression XML for every check that flagged
/// the given `LINE[:COLUMN]` position.
pub fn run(config_path: &Path, file: &Path, location: &str) -> Result<i32> {
    let (line, column) = parse_location(location)?;

    let root = config::from_file(config_path)
        .with_context(|| format!("failed to load config {}", config_path.display()))?;
    let registry = default_registry();
    let mut checker = Checker::from_config(&root, &registry).context("configuration rejected")?;

    let collected: Arc<Mutex<Vec<Violation>>> = Arc::new(Mutex::new(Vec::new()));
    struct Collector(Arc<Mutex<Vec<Violation>>>);
    impl AuditListener for Collector {
        fn add_error(&mut self, _path: &Path, violation: &Violation) {
            if let Ok(mut violations) = self.0.lock() {
                violations.push(violation.clone());
            }
        }
    }
    checker.add_listener(Box::new(Collector(Arc::clone(&collected))));
    checker
        .process(std::slice::from_ref(&file.to_path_buf()))
        .context("audit aborted")?;

    let source = std::fs::read_to_string(file)
        .with_context(|| format!("unable to read {}", file.display()))?;
    let tree = parse(&source, ParseOptions::default())
        .with_context(|| format!("unable to parse {}", file.display()))?;

    let file_name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.display().to_string());
    let violations = collected.lock().map_err(|_| anyhow!("collector poisoned"))?;
    let entries = suppressions::generate(&tree, &file_name, &violations, line, column);
    print!("{}", suppressions::serialize(&entries));
    Ok(0)
}

fn parse_location(location: &str) -> Result<(usize, Option<usize>)> {
    let mut parts = location.splitn(2, ':');
    let line = parts
        .next()
        .and_then(|p| p.parse::<usize>().ok())
        .ok_or_else(|| anyhow!("invalid location '{location}', expected LINE or LINE:COLUMN"))?;
    let column = match parts.next() {
        Some(raw) => Some(raw.parse::<usize>().map_err(|_| {
            anyhow!("invalid location '{location}', expected LINE or LINE:COLUMN")
        })?),
        None => None,
    };
    Ok((line, column))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_accepts_line_only() {
        assert_eq!(parse_location("14").unwrap(), (14, None));
    }

    #[test]
    fn location_accepts_line_and_column() {
        assert_eq!(parse_location("14:5").unwrap(), (14, Some(5)));
    }

    #[test]
    fn malformed_location_is_rejected() {
        assert!(parse_location("abc").is_err());
        assert!(parse_location("1:x").is_err());
    }
}
