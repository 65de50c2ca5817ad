use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::comments::strip_comments;

/// Replacement text for an include whose target cannot be read.
pub const MISSING_INCLUDE: &str = "\"\"";

/// Text after include expansion, plus one warning per unreadable include.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expanded {
    pub text: String,
    pub warnings: Vec<String>,
}

fn include_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"<\?include\s+"([^"]*)"\s*\?>"#).expect("include pattern compiles")
    })
}

/// Replace every `<?include "path"?>` marker with the contents of `path`.
///
/// This is a single textual pass: markers inside included content are left
/// untouched. Relative paths resolve against `base_dir`, which is normally the
/// directory of the file being expanded. Comments in each included file are
/// stripped on their own, so a trailing comment ends at that file's end. A
/// target that cannot be read becomes
/// the empty JSON string `""` and is reported in [`Expanded::warnings`].
pub fn expand_includes(text: &str, base_dir: &Path) -> Expanded {
    let mut warnings = Vec::new();
    let text = include_pattern()
        .replace_all(text, |caps: &Captures<'_>| {
            let target = resolve_include(base_dir, &caps[1]);
            match fs::read_to_string(&target) {
                Ok(contents) => strip_comments(&contents),
                Err(err) => {
                    warnings.push(format!(
                        "include file {} could not be read ({err}); substituting {MISSING_INCLUDE}",
                        target.display()
                    ));
                    MISSING_INCLUDE.to_string()
                }
            }
        })
        .into_owned();

    Expanded { text, warnings }
}

fn resolve_include(base_dir: &Path, raw: &str) -> PathBuf {
    let target = Path::new(raw);
    if target.is_absolute() {
        target.to_path_buf()
    } else {
        base_dir.join(target)
    }
}

#[cfg(test)]
mod tests {
    use super::{expand_includes, MISSING_INCLUDE};
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn substitutes_included_file_contents() {
        let dir = tempdir().expect("tempdir");
        fs::write(dir.path().join("db.json"), r#"{"name": "kea"}"#).expect("write include");

        let expanded = expand_includes(
            r#"{"lease-database": <?include "db.json"?>}"#,
            dir.path(),
        );

        assert_eq!(expanded.text, r#"{"lease-database": {"name": "kea"}}"#);
        assert!(expanded.warnings.is_empty());
    }

    #[test]
    fn tolerates_whitespace_inside_marker() {
        let dir = tempdir().expect("tempdir");
        fs::write(dir.path().join("v.json"), "42").expect("write include");

        let expanded = expand_includes(r#"[<?include   "v.json"  ?>]"#, dir.path());
        assert_eq!(expanded.text, "[42]");
    }

    #[test]
    fn absolute_include_path_ignores_base_dir() {
        let dir = tempdir().expect("tempdir");
        let target = dir.path().join("abs.json");
        fs::write(&target, "true").expect("write include");
        let other = tempdir().expect("tempdir");

        let text = format!(r#"[<?include "{}"?>]"#, target.display());
        let expanded = expand_includes(&text, other.path());
        assert_eq!(expanded.text, "[true]");
    }

    #[test]
    fn missing_include_becomes_empty_string_with_warning() {
        let dir = tempdir().expect("tempdir");

        let expanded = expand_includes(r#"{"a": <?include "nope.json"?>}"#, dir.path());

        assert_eq!(expanded.text, format!(r#"{{"a": {MISSING_INCLUDE}}}"#));
        assert_eq!(expanded.warnings.len(), 1);
        assert!(expanded.warnings[0].contains("nope.json"));
    }

    #[test]
    fn trailing_comment_in_include_stops_at_its_end() {
        let dir = tempdir().expect("tempdir");
        fs::write(dir.path().join("db.json"), r#"{"name": "kea"} # creds"#)
            .expect("write include");
        fs::write(dir.path().join("open.json"), "1 /* never closed").expect("write include");

        let expanded = expand_includes(
            r#"[<?include "db.json"?>, <?include "open.json"?>, 2]"#,
            dir.path(),
        );

        let value: serde_json::Value = serde_json::from_str(&expanded.text).expect("json");
        assert_eq!(value, serde_json::json!([{"name": "kea"}, 1, 2]));
    }

    #[test]
    fn included_markers_are_not_expanded_again() {
        let dir = tempdir().expect("tempdir");
        fs::write(dir.path().join("outer.json"), r#"<?include "inner.json"?>"#)
            .expect("write outer");
        fs::write(dir.path().join("inner.json"), "1").expect("write inner");

        let expanded = expand_includes(r#"[<?include "outer.json"?>]"#, dir.path());

        assert_eq!(expanded.text, r#"[<?include "inner.json"?>]"#);
        assert!(expanded.warnings.is_empty());
    }
}
