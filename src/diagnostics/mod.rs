// Indentation diagnostics and their fixes
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::errors::ErrorLevel;

/// Replacement of a byte range of the source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fix {
    pub start: usize,
    pub end: usize,
    pub replacement: String,
}

impl Fix {
    pub fn new(start: usize, end: usize, replacement: impl Into<String>) -> Self {
        Self { start, end, replacement: replacement.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndentDiagnostic {
    pub level: ErrorLevel,
    pub message: String,
    /// 1-based line
    pub line: usize,
    /// Highlighted columns: 0 up to the first token of the line
    pub start_column: usize,
    pub end_column: usize,
    /// Expected leading width in indent characters
    pub expected_width: usize,
    pub actual_indent: String,
    pub fix: Fix,
}

impl IndentDiagnostic {
    pub fn error(line: usize, end_column: usize, expected_width: usize, actual_indent: &str, message: String, fix: Fix) -> Self {
        Self {
            level: ErrorLevel::Error,
            message,
            line,
            start_column: 0,
            end_column,
            expected_width,
            actual_indent: actual_indent.to_string(),
            fix,
        }
    }
}

impl fmt::Display for IndentDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{} {} {}", self.line, self.start_column + 1, self.level, self.message)
    }
}

/// Builds the `Expected indentation of ... but found ...` message.
///
/// The found part is a bare count when the line uses the configured
/// character, a count with the unit name when it uses the other one, and
/// `0` when there is no indentation at all.
pub fn indent_message(expected_width: usize, indent_char: char, actual: &str) -> String {
    let (unit, other) = if indent_char == '\t' { ("tab", "space") } else { ("space", "tab") };
    let spaces = actual.chars().filter(|c| *c == ' ').count();
    let tabs = actual.chars().filter(|c| *c == '\t').count();
    let (own, foreign) = if indent_char == '\t' { (tabs, spaces) } else { (spaces, tabs) };

    let found = if own > 0 {
        own.to_string()
    } else if foreign > 0 {
        format!("{} {}{}", foreign, other, plural(foreign))
    } else {
        "0".to_string()
    };
    format!(
        "Expected indentation of {} {}{} but found {}.",
        expected_width,
        unit,
        plural(expected_width),
        found
    )
}

fn plural(count: usize) -> &'static str {
    if count == 1 { "" } else { "s" }
}

/// Applies non-overlapping fixes; a fix overlapping one already applied is
/// skipped. Returns the new text and the number of fixes applied.
pub fn apply_fixes(text: &str, fixes: &[Fix]) -> (String, usize) {
    let mut ordered: Vec<&Fix> = fixes.iter().collect();
    ordered.sort_by(|a, b| b.start.cmp(&a.start).then(b.end.cmp(&a.end)));

    let mut output = text.to_string();
    let mut applied = 0;
    let mut floor = usize::MAX;
    for fix in ordered {
        if fix.end > floor || fix.end > text.len() || fix.start > fix.end {
            tracing::debug!("Skipping overlapping fix at {}..{}", fix.start, fix.end);
            continue;
        }
        output.replace_range(fix.start..fix.end, &fix.replacement);
        floor = fix.start;
        applied += 1;
    }
    (output, applied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_message_for_spaces() {
        assert_eq!(indent_message(4, ' ', "  "), "Expected indentation of 4 spaces but found 2.");
        assert_eq!(indent_message(1, ' ', ""), "Expected indentation of 1 space but found 0.");
        assert_eq!(indent_message(4, ' ', "\t"), "Expected indentation of 4 spaces but found 1 tab.");
    }

    #[test]
    fn test_message_for_tabs() {
        assert_eq!(indent_message(2, '\t', "\t"), "Expected indentation of 2 tabs but found 1.");
        assert_eq!(indent_message(1, '\t', "    "), "Expected indentation of 1 tab but found 4 spaces.");
    }

    #[test]
    fn test_apply_fixes_from_the_end() {
        let text = "a\n  b\nc";
        let fixes = vec![Fix::new(2, 4, "    "), Fix::new(6, 6, "    ")];
        let (fixed, applied) = apply_fixes(text, &fixes);
        assert_eq!(fixed, "a\n    b\n    c");
        assert_eq!(applied, 2);
    }

    #[test]
    fn test_overlapping_fix_is_skipped() {
        let fixes = vec![Fix::new(0, 3, "x"), Fix::new(2, 4, "y")];
        let (fixed, applied) = apply_fixes("abcdef", &fixes);
        assert_eq!(fixed, "abyef");
        assert_eq!(applied, 1);
    }
}
