//! Line-indexed view of the token stream.

use crate::ast_core::{SourceFile, TokenId};

/// First token of each physical line, plus leading-whitespace lookups.
#[derive(Debug)]
pub struct TokenIndex<'a> {
    file: &'a SourceFile,
    /// Indexed by `line - 1`
    first_by_line: Vec<Option<TokenId>>,
}

impl<'a> TokenIndex<'a> {
    pub fn new(file: &'a SourceFile) -> Self {
        let mut first_by_line = vec![None; file.line_count()];
        let text = file.text();
        for (i, token) in file.tokens().iter().enumerate() {
            let id = TokenId(i as u32);
            let start = token.start();
            let end = token.end();
            first_by_line[start.line - 1].get_or_insert(id);

            // a multi-line token also owns its end line unless code precedes it there
            if end.line != start.line {
                let line_start = file.lines().line_start(end.line);
                if !text[line_start..end.offset].trim().is_empty() {
                    first_by_line[end.line - 1].get_or_insert(id);
                }
            }
        }
        Self { file, first_by_line }
    }

    pub fn first_token_of_line(&self, line: usize) -> Option<TokenId> {
        line.checked_sub(1).and_then(|i| self.first_by_line.get(i).copied().flatten())
    }

    pub fn is_first_token_of_line(&self, token: TokenId) -> bool {
        self.first_token_of_line(self.file.token(token).start().line) == Some(token)
    }

    /// Raw text between column 0 and the token's start on its start line.
    pub fn literal_indent(&self, token: TokenId) -> &'a str {
        let start = self.file.token(token).start();
        let line_start = self.file.lines().line_start(start.line);
        &self.file.text()[line_start..start.offset]
    }

    pub fn line_count(&self) -> usize {
        self.first_by_line.len()
    }
}
