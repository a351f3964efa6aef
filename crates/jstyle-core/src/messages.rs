//! Keyed message templates with positional argument substitution.
//!
//! Each check ships a bundle: a static table of message key to template.
//! Templates use `{0}`, `{1}`, ... placeholders. Rendering falls back to the
//! bare key when no template is registered, so an unknown key never panics
//! mid-audit.

/// A message bundle: a named table of key/template pairs.
#[derive(Debug, Clone, Copy)]
pub struct MessageBundle {
    /// Bundle identifier (e.g. `jstyle.checks.imports`).
    pub name: &'static str,
    /// Key to template entries.
    pub entries: &'static [(&'static str, &'static str)],
}

impl MessageBundle {
    /// Looks up the template for a key.
    #[must_use]
    pub fn template(&self, key: &str) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, template)| *template)
    }

    /// Renders the message for `key`, substituting `args` positionally.
    #[must_use]
    pub fn render(&self, key: &str, args: &[String]) -> String {
        self.template(key)
            .map_or_else(|| key.to_string(), |template| format_message(template, args))
    }
}

/// Empty bundle for checks that report no messages of their own.
pub const EMPTY_BUNDLE: MessageBundle = MessageBundle {
    name: "jstyle.core",
    entries: &[],
};

/// Substitutes `{N}` placeholders with the N-th argument.
///
/// Placeholders without a matching argument are left verbatim, which keeps
/// malformed templates visible instead of silently truncated.
#[must_use]
pub fn format_message(template: &str, args: &[String]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];
        if let Some(close) = tail.find('}') {
            let inner = &tail[1..close];
            if let Ok(index) = inner.parse::<usize>() {
                if let Some(arg) = args.get(index) {
                    out.push_str(arg);
                } else {
                    out.push_str(&tail[..=close]);
                }
            } else {
                out.push_str(&tail[..=close]);
            }
            rest = &tail[close + 1..];
        } else {
            out.push_str(tail);
            rest = "";
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUNDLE: MessageBundle = MessageBundle {
        name: "jstyle.checks.test",
        entries: &[("greeting", "hello {0}, you are {1}")],
    };

    #[test]
    fn substitutes_in_order() {
        assert_eq!(
            format_message("{0} then {1}", &["a".into(), "b".into()]),
            "a then b"
        );
    }

    #[test]
    fn repeated_placeholder_substitutes_each_time() {
        assert_eq!(format_message("{0} and {0}", &["x".into()]), "x and x");
    }

    #[test]
    fn missing_argument_left_verbatim() {
        assert_eq!(format_message("got {0} and {3}", &["x".into()]), "got x and {3}");
    }

    #[test]
    fn non_numeric_braces_left_alone() {
        assert_eq!(format_message("a {weird} one", &[]), "a {weird} one");
    }

    #[test]
    fn bundle_renders_known_key() {
        let rendered = BUNDLE.render("greeting", &["world".into(), "late".into()]);
        assert_eq!(rendered, "hello world, you are late");
    }

    #[test]
    fn bundle_falls_back_to_key() {
        assert_eq!(BUNDLE.render("absent.key", &[]), "absent.key");
    }
}
