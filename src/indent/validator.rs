//! Line validation: compares each line's actual indentation with the width
//! the offset graph resolves for its first token.

use crate::ast_core::{SourceFile, TokenId};
use crate::diagnostics::{indent_message, Fix, IndentDiagnostic};

use super::offsets::{OffsetGraph, ResolveCache};
use super::token_index::TokenIndex;

pub struct LineValidator<'a> {
    file: &'a SourceFile,
    index: &'a TokenIndex<'a>,
    graph: &'a OffsetGraph<'a>,
    indent_char: char,
}

impl<'a> LineValidator<'a> {
    pub fn new(file: &'a SourceFile, index: &'a TokenIndex<'a>, graph: &'a OffsetGraph<'a>, indent_char: char) -> Self {
        Self { file, index, graph, indent_char }
    }

    /// One diagnostic per mis-indented line, in line order.
    pub fn validate(&self) -> Vec<IndentDiagnostic> {
        let mut cache = ResolveCache::new(self.graph.token_count());
        let mut diagnostics = Vec::new();

        for line in 1..=self.index.line_count() {
            let Some(token) = self.index.first_token_of_line(line) else {
                continue;
            };
            // end line of a multi-line token: its content is not indentation
            let start = self.file.token(token).start();
            if start.line != line || self.graph.is_ignored(token) {
                continue;
            }

            let actual = self.index.literal_indent(token);
            let expected = self.graph.resolve(token, &mut cache);
            if self.accepts(actual, expected) {
                continue;
            }
            if self.file.token(token).is_comment() && self.matches_neighbour(token, actual, &mut cache) {
                continue;
            }

            let replacement = self.indent_char.to_string().repeat(expected);
            let fix = Fix::new(self.file.lines().line_start(line), start.offset, replacement);
            let message = indent_message(expected, self.indent_char, actual);
            diagnostics.push(IndentDiagnostic::error(line, start.column, expected, actual, message, fix));
        }

        tracing::debug!(
            "Validated {} lines, {} widths resolved, {} problems",
            self.index.line_count(),
            cache.resolved_count(),
            diagnostics.len()
        );
        diagnostics
    }

    /// Mixed spaces and tabs are never reported.
    fn accepts(&self, actual: &str, expected: usize) -> bool {
        if actual.contains(' ') && actual.contains('\t') {
            return true;
        }
        actual.chars().count() == expected && actual.chars().all(|c| c == self.indent_char)
    }

    /// Comments may follow the code right before or right after them.
    fn matches_neighbour(&self, comment: TokenId, actual: &str, cache: &mut ResolveCache) -> bool {
        [self.file.prev_code_token(comment), self.file.next_code_token(comment)]
            .into_iter()
            .flatten()
            .any(|neighbour| self.accepts(actual, self.graph.resolve(neighbour, cache)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indent::listeners::populate;
    use crate::parser::JsParser;
    use crate::rules::{IndentOptions, IndentStyle};
    use pretty_assertions::assert_eq;

    fn problems(text: &str, options: &IndentOptions) -> Vec<IndentDiagnostic> {
        let file = JsParser::new().parse_text(text).unwrap();
        let index = TokenIndex::new(&file);
        let graph = populate(&file, &index, options);
        LineValidator::new(&file, &index, &graph, options.indent_char()).validate()
    }

    #[test]
    fn test_reports_wrong_indent() {
        let result = problems("if (a) {\n  b();\n}", &IndentOptions::default());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].line, 2);
        assert_eq!(result[0].expected_width, 4);
        assert_eq!(result[0].actual_indent, "  ");
        assert_eq!(result[0].fix.start, 9);
        assert_eq!(result[0].fix.end, 11);
        assert_eq!(result[0].fix.replacement, "    ");
    }

    #[test]
    fn test_mixed_whitespace_accepted() {
        assert!(problems("if (a) {\n \t b();\n}", &IndentOptions::default()).is_empty());
    }

    #[test]
    fn test_comment_may_match_next_line() {
        let text = "if (a) {\n    b();\n// trailing\n}";
        assert!(problems(text, &IndentOptions::default()).is_empty());
    }

    #[test]
    fn test_tab_indent() {
        let options = IndentOptions::with_indent(IndentStyle::Tab);
        assert!(problems("if (a) {\n\tb();\n}", &options).is_empty());
        assert_eq!(problems("if (a) {\n    b();\n}", &options).len(), 1);
    }

    #[test]
    fn test_multiline_comment_body_lines_skipped() {
        let text = "/*\n      free text\n   */\nfoo();";
        assert!(problems(text, &IndentOptions::default()).is_empty());
    }
}
