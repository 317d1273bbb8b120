/*!
# JavaScript Parser

Turns source text into a [`SourceFile`]: the token+comment stream from the
logos lexer plus the node arena from the recursive-descent analyzer.

## Usage

```rust
use indent_analyzer::parser::JsParser;

let file = JsParser::new().parse_text("if (a) {\n    b();\n}\n")?;
assert_eq!(file.line_count(), 4);
# Ok::<(), indent_analyzer::core::IndentError>(())
```
*/

pub mod lexer;
pub mod syntax_analyzer;

pub use syntax_analyzer::SyntaxAnalyzer;

use std::path::Path;

use crate::ast_core::SourceFile;
use crate::core::errors::Result;
use crate::core::fs_utils::read_source_file;
use crate::core::position::LineIndex;

/// Main JavaScript parser
#[derive(Debug, Default, Clone, Copy)]
pub struct JsParser;

impl JsParser {
    pub fn new() -> Self {
        Self
    }

    /// Parses source code from a string
    pub fn parse_text(&self, text: &str) -> Result<SourceFile> {
        let lines = LineIndex::new(text);
        let tokens = lexer::tokenize(text, &lines)?;
        let (arena, root) = SyntaxAnalyzer::new(text, &lines, &tokens).parse_program()?;
        Ok(SourceFile::new(text.to_string(), lines, tokens, arena, root))
    }

    /// Parses a file with encoding detection and BOM handling
    pub fn parse_file(&self, path: &Path) -> Result<SourceFile> {
        let text = read_source_file(path)?;
        self.parse_text(&text)
    }
}
