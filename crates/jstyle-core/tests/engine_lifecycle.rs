//! End-to-end tests of the audit pipeline: event ordering, violation
//! sorting, per-file error recovery, state reset, and teardown.

use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use jstyle_core::{
    config, AuditListener, Check, CheckContext, CheckRegistry, CheckResult, Checker,
    CollectingListener, MessageBundle, NodeId, SyntaxTree, TokenKind, CHECKER, TREE_WALKER,
};

const BUNDLE: MessageBundle = MessageBundle {
    name: "jstyle.checks.testing",
    entries: &[("class.seen", "class number {0} spotted")],
};

/// Reports one violation per class definition; counts live classes so a
/// missing reset would leak across files.
struct ClassCounter {
    seen: usize,
    destroys: Arc<AtomicUsize>,
}

impl Check for ClassCounter {
    fn name(&self) -> &'static str {
        "ClassCounterCheck"
    }
    fn acceptable_tokens(&self) -> &'static [TokenKind] {
        &[TokenKind::ClassDef]
    }
    fn messages(&self) -> MessageBundle {
        BUNDLE
    }
    fn begin_tree(&mut self, _ctx: &mut CheckContext<'_>, _tree: &SyntaxTree) -> CheckResult {
        // Per-file state reset; asserted indirectly by the idempotence test.
        self.seen = 0;
        Ok(())
    }
    fn visit(
        &mut self,
        ctx: &mut CheckContext<'_>,
        tree: &SyntaxTree,
        node: NodeId,
    ) -> CheckResult {
        self.seen += 1;
        let count = self.seen.to_string();
        ctx.report(
            tree.line(node),
            Some(tree.column(node)),
            "class.seen",
            &[&count],
        );
        Ok(())
    }
    fn destroy(&mut self) {
        self.destroys.fetch_add(1, Ordering::SeqCst);
    }
}

/// Reports violations in deliberately shuffled position order.
struct ShuffledReporter;

impl Check for ShuffledReporter {
    fn name(&self) -> &'static str {
        "ShuffledReporterCheck"
    }
    fn acceptable_tokens(&self) -> &'static [TokenKind] {
        &[TokenKind::CompilationUnit]
    }
    fn visit(
        &mut self,
        ctx: &mut CheckContext<'_>,
        _tree: &SyntaxTree,
        _node: NodeId,
    ) -> CheckResult {
        ctx.report(9, Some(2), "b", &[]);
        ctx.report(1, None, "a", &[]);
        ctx.report(9, Some(2), "c", &[]);
        ctx.report(4, Some(7), "d", &[]);
        Ok(())
    }
}

fn write_file(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    let mut f = std::fs::File::create(&path).unwrap();
    f.write_all(content.as_bytes()).unwrap();
    path
}

fn registry_with(destroys: Arc<AtomicUsize>) -> CheckRegistry {
    let mut registry = CheckRegistry::new();
    registry.register("jstyle.checks.ClassCounterCheck", move || {
        Box::new(ClassCounter {
            seen: 0,
            destroys: Arc::clone(&destroys),
        })
    });
    registry.register("jstyle.checks.ShuffledReporterCheck", || {
        Box::new(ShuffledReporter)
    });
    registry
}

fn checker_for(check: &str, registry: &CheckRegistry) -> Checker {
    let config = config::from_str(&format!(
        "[[module]]\nname = \"{TREE_WALKER}\"\n\n[[module.module]]\nname = \"{check}\"\n"
    ))
    .unwrap();
    Checker::from_config(&config, registry).unwrap()
}

#[test]
fn clean_file_prints_only_the_audit_bracket_lines() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_file(&dir, "Clean.java", "interface I {}\n");
    let out_path = dir.path().join("audit.log");

    let registry = registry_with(Arc::new(AtomicUsize::new(0)));
    let mut checker = checker_for("ClassCounterCheck", &registry);
    checker.add_listener(Box::new(jstyle_core::DefaultLogger::new(
        jstyle_core::OutputSink::file(&out_path).unwrap(),
    )));

    let result = checker.process(std::slice::from_ref(&file)).unwrap();
    assert_eq!(result.errors, 0);
    assert_eq!(result.files_checked, 1);
    assert_eq!(result.exit_code(), 0);

    let output = std::fs::read_to_string(&out_path).unwrap();
    assert_eq!(output, "Starting audit...\nAudit done.\n");
}

#[test]
fn event_order_per_file_is_fixed() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_file(&dir, "Two.java", "class A {}\nclass B {}\n");

    let registry = registry_with(Arc::new(AtomicUsize::new(0)));
    let mut checker = checker_for("ClassCounterCheck", &registry);

    let events = run_collected(&mut checker, &[file.clone()]);
    assert_eq!(
        events,
        vec![
            "audit_started".to_string(),
            format!("file_started:{}", file.display()),
            "add_error:1".to_string(),
            "add_error:2".to_string(),
            format!("file_finished:{}", file.display()),
            "audit_finished".to_string(),
        ]
    );
}

#[test]
fn violations_sorted_by_line_then_column_with_stable_ties() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_file(&dir, "Any.java", "class A {}\n");

    let registry = registry_with(Arc::new(AtomicUsize::new(0)));
    let mut checker = checker_for("ShuffledReporterCheck", &registry);

    let collected = run_violations(&mut checker, &[file]);
    let keys: Vec<(usize, Option<usize>, String)> = collected
        .iter()
        .map(|v| (v.line, v.column, v.key.clone()))
        .collect();
    assert_eq!(
        keys,
        vec![
            (1, None, "a".to_string()),
            (4, Some(7), "d".to_string()),
            // Equal positions keep insertion order.
            (9, Some(2), "b".to_string()),
            (9, Some(2), "c".to_string()),
        ]
    );
}

#[test]
fn same_configuration_twice_over_same_file_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_file(&dir, "Three.java", "class A {}\nclass B {}\nclass C {}\n");

    let registry = registry_with(Arc::new(AtomicUsize::new(0)));
    let mut checker = checker_for("ClassCounterCheck", &registry);

    // Same module instance reused for both passes over the unchanged file.
    let collected = run_violations(&mut checker, &[file.clone(), file]);
    assert_eq!(collected.len(), 6);
    let (first, second) = collected.split_at(3);

    let render = |vs: &[jstyle_core::Violation]| -> Vec<String> {
        vs.iter().map(|v| v.message.clone()).collect()
    };
    // A state leak would make the second pass report counts 4..6.
    assert_eq!(render(first), render(second));
    assert_eq!(second[0].message, "class number 1 spotted");
}

#[test]
fn syntax_error_in_one_file_does_not_abort_others() {
    let dir = tempfile::tempdir().unwrap();
    let broken = write_file(&dir, "Broken.java", "class {\n");
    let fine = write_file(&dir, "Fine.java", "class D {}\n");

    let registry = registry_with(Arc::new(AtomicUsize::new(0)));
    let mut checker = checker_for("ClassCounterCheck", &registry);

    let listener = CollectingListener::new();
    let mut probe = SharedCollector::wrap(listener);
    checker.add_listener(Box::new(probe.clone()));
    let result = checker.process(&[broken, fine]).unwrap();

    assert_eq!(result.exceptions, 1);
    assert_eq!(result.files_checked, 1);
    let inner = probe.take();
    assert_eq!(inner.exceptions.len(), 1);
    assert!(inner.exceptions[0].1.contains("syntax error"));
    assert_eq!(inner.violations.len(), 1);
    assert!(inner.violations[0].0.ends_with("Fine.java"));
}

#[test]
fn destroy_runs_exactly_once_even_after_abort() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_file(&dir, "Ok.java", "class A {}\n");
    let missing = dir.path().join("Missing.java");

    let destroys = Arc::new(AtomicUsize::new(0));
    let registry = registry_with(Arc::clone(&destroys));
    let mut checker = checker_for("ClassCounterCheck", &registry);

    // Unreadable target aborts the run; destroy hooks must still fire once.
    let err = checker.process(&[file, missing]).unwrap_err();
    assert!(err.to_string().contains("Missing.java"));
    assert_eq!(destroys.load(Ordering::SeqCst), 1);

    // A second explicit destroy is a no-op.
    checker.destroy();
    assert_eq!(destroys.load(Ordering::SeqCst), 1);
}

#[test]
fn error_count_drives_exit_status_boundary() {
    let dir = tempfile::tempdir().unwrap();
    let one = write_file(&dir, "One.java", "class A {}\n");
    let two = write_file(&dir, "Two.java", "class A {}\nclass B {}\n");

    let registry = registry_with(Arc::new(AtomicUsize::new(0)));

    let mut checker = checker_for("ClassCounterCheck", &registry);
    let result = checker.process(std::slice::from_ref(&one)).unwrap();
    assert_eq!(result.errors, 1);
    assert_eq!(result.exit_code(), 1);

    let mut checker = checker_for("ClassCounterCheck", &registry);
    let result = checker.process(std::slice::from_ref(&two)).unwrap();
    assert_eq!(result.errors, 2);
    assert_eq!(result.exit_code(), 2);
}

#[test]
fn warning_severity_does_not_drive_exit_status() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_file(&dir, "A.java", "class A {}\n");

    let registry = registry_with(Arc::new(AtomicUsize::new(0)));
    let config = config::from_str(&format!(
        "[[module]]\nname = \"{TREE_WALKER}\"\n\n[[module.module]]\nname = \"ClassCounterCheck\"\n\n[module.module.properties]\nseverity = \"warning\"\n"
    ))
    .unwrap();
    let mut checker = Checker::from_config(&config, &registry).unwrap();
    let result = checker.process(&[file]).unwrap();

    assert_eq!(result.errors, 0);
    assert_eq!(result.warnings, 1);
    assert_eq!(result.exit_code(), 0);
}

#[test]
fn unknown_module_fails_before_any_file() {
    let registry = registry_with(Arc::new(AtomicUsize::new(0)));
    let config = config::from_str(&format!(
        "[[module]]\nname = \"{TREE_WALKER}\"\n\n[[module.module]]\nname = \"NoSuchCheck\"\n"
    ))
    .unwrap();
    let err = Checker::from_config(&config, &registry).err().unwrap();
    assert_eq!(err.layers().first().map(String::as_str), Some(CHECKER));
}

// --- helpers -------------------------------------------------------------

use std::sync::Mutex;

/// Listener handle that lets tests inspect events after the checker has
/// consumed the boxed listener.
#[derive(Clone)]
struct SharedCollector {
    inner: Arc<Mutex<CollectingListener>>,
}

impl SharedCollector {
    fn wrap(listener: CollectingListener) -> Self {
        Self {
            inner: Arc::new(Mutex::new(listener)),
        }
    }

    fn take(&mut self) -> CollectingListener {
        std::mem::take(&mut *self.inner.lock().unwrap())
    }
}

impl AuditListener for SharedCollector {
    fn audit_started(&mut self) {
        self.inner.lock().unwrap().audit_started();
    }
    fn file_started(&mut self, path: &std::path::Path) {
        self.inner.lock().unwrap().file_started(path);
    }
    fn add_error(&mut self, path: &std::path::Path, violation: &jstyle_core::Violation) {
        self.inner.lock().unwrap().add_error(path, violation);
    }
    fn add_exception(&mut self, path: &std::path::Path, error: &jstyle_core::CheckerError) {
        self.inner.lock().unwrap().add_exception(path, error);
    }
    fn file_finished(&mut self, path: &std::path::Path) {
        self.inner.lock().unwrap().file_finished(path);
    }
    fn audit_finished(&mut self) {
        self.inner.lock().unwrap().audit_finished();
    }
}

fn run_collected(checker: &mut Checker, files: &[PathBuf]) -> Vec<String> {
    let mut probe = SharedCollector::wrap(CollectingListener::new());
    checker.add_listener(Box::new(probe.clone()));
    checker.process(files).unwrap();
    probe.take().events
}

fn run_violations(checker: &mut Checker, files: &[PathBuf]) -> Vec<jstyle_core::Violation> {
    let mut probe = SharedCollector::wrap(CollectingListener::new());
    checker.add_listener(Box::new(probe.clone()));
    checker.process(files).unwrap();
    probe.take().violations.into_iter().map(|(_, v)| v).collect()
}
