//! Small test-fixture helpers shared by the other crates' test suites:
//! a diffing assertion macro, file/fixture-directory helpers, and the
//! `#[test="..."]`-marker extraction `mir_driver`'s `mir_opt_test` binary
//! uses to pair an input function with its expected-output function in
//! the same source file.

use std::fs;
use std::path::{Path, PathBuf};

/// Asserts two strings are equal, printing a `difference`-crate unified
/// diff instead of the default `assert_eq!` dump when they are not.
#[macro_export]
macro_rules! assert_eq_text {
    ($left:expr, $right:expr) => {
        $crate::assert_eq_text!($left, $right,)
    };
    ($left:expr, $right:expr, $($tt:tt)*) => {
        if $left != $right {
            if $left.trim() == $right.trim() {
                std::eprintln!("Left and right differ only in whitespace");
            }
            $crate::print_text_diff($left, $right);
            std::panic!($($tt)*)
        }
    };
}

/// Prints a unified diff of `left` vs. `right` to stderr, used by
/// `assert_eq_text!` on mismatch.
pub fn print_text_diff(left: &str, right: &str) {
    let changes = difference::Changeset::new(left, right, "\n");
    eprintln!("{}", changes);
}

/// The repository root, found by walking up from `CARGO_MANIFEST_DIR`
/// until a `Cargo.lock` is found. Used throughout the workspace's
/// integration tests to locate fixture directories that live outside any
/// one crate.
pub fn project_dir() -> PathBuf {
    let mut dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    while !dir.join("Cargo.lock").exists() {
        if !dir.pop() {
            panic!("reached filesystem root without finding Cargo.lock");
        }
    }
    dir
}

/// Reads a UTF-8 text file, normalising CRLF to LF so fixture files behave
/// the same on every platform they're checked out on.
pub fn read_text(path: &Path) -> String {
    fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("failed to read {}: {}", path.display(), e))
        .replace("\r\n", "\n")
}

/// One `#[test="expected_fn"]`-annotated test case extracted from a source
/// file: the annotation's target function name, plus the full file text it
/// was found in (the annotated function and its paired expected-result
/// function are both looked up from this by the caller).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestCase {
    pub file: PathBuf,
    pub expected_fn: String,
}

/// Scans `dir` recursively for `.rs` files and extracts every
/// `#[test="..."]` annotation's target, the shape `mirc_driver`'s
/// `mir_opt_test` binary consumes to report a PASS/FAIL per
/// `#[test="<expected_fn>"]` annotation.
pub fn collect_test_cases(dir: &Path) -> Vec<TestCase> {
    let mut out = Vec::new();
    collect_test_cases_into(dir, &mut out);
    out.sort_by(|a, b| (&a.file, &a.expected_fn).cmp(&(&b.file, &b.expected_fn)));
    out
}

fn collect_test_cases_into(dir: &Path, out: &mut Vec<TestCase>) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return,
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_test_cases_into(&path, out);
        } else if path.extension().map(|e| e == "rs").unwrap_or(false) {
            let text = read_text(&path);
            for expected_fn in extract_test_annotations(&text) {
                out.push(TestCase { file: path.clone(), expected_fn });
            }
        }
    }
}

fn extract_test_annotations(text: &str) -> Vec<String> {
    const MARKER: &str = "#[test=\"";
    let mut out = Vec::new();
    let mut rest = text;
    while let Some(start) = rest.find(MARKER) {
        let after = &rest[start + MARKER.len()..];
        match after.find('"') {
            Some(end) => {
                out.push(after[..end].to_string());
                rest = &after[end + 1..];
            }
            None => break,
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_single_annotation() {
        let text = "fn a() {}\n#[test=\"b\"]\nfn a_opt() {}\nfn b() {}\n";
        assert_eq!(extract_test_annotations(text), vec!["b".to_string()]);
    }

    #[test]
    fn extracts_multiple_annotations_in_order() {
        let text = "#[test=\"one\"]\nfn f() {}\n#[test=\"two\"]\nfn g() {}\n";
        assert_eq!(extract_test_annotations(text), vec!["one".to_string(), "two".to_string()]);
    }

    #[test]
    fn no_annotation_yields_empty() {
        assert!(extract_test_annotations("fn f() {}\n").is_empty());
    }
}
