/*!
# Indent Analyzer

Indentation checker for JavaScript sources. Every line's leading whitespace
is compared with the indentation implied by the syntactic structure, and
each mismatch comes with a whitespace-only fix.

## Architecture

```text
Indent Analyzer
├── Parser        - logos lexer + recursive-descent parser into a node arena
├── AST Core      - tokens, node kinds, arena with parent links
├── Indent        - token index, offset graph, population rules, line validator
├── Rules         - indent options (TOML / YAML / JSON)
├── Diagnostics   - diagnostics, messages, fix application
└── CLI Common    - logging setup and output helpers
```

## Usage

```rust
use indent_analyzer::{check_source, IndentOptions};

let problems = check_source("if (a) {\n  b();\n}\n", &IndentOptions::default())?;
assert_eq!(problems.len(), 1);
assert_eq!(problems[0].expected_width, 4);
# Ok::<(), indent_analyzer::core::IndentError>(())
```
*/

pub mod ast_core;
pub mod cli_common;
pub mod core;
pub mod diagnostics;
pub mod indent;
pub mod parser;
pub mod rules;

pub use ast_core::{NodeId, NodeKind, SourceFile, Token, TokenId, TokenKind, TokenRange};
pub use crate::core::{IndentError, LineIndex, Position, Result};
pub use diagnostics::{apply_fixes, Fix, IndentDiagnostic};
pub use indent::IndentChecker;
pub use parser::JsParser;
pub use rules::{IndentOptions, IndentStyle, ListIndent};

/// Upper bound on fix passes in [`fix_source`]
pub const MAX_FIX_PASSES: usize = 10;

/// Parses `text` and checks its indentation.
pub fn check_source(text: &str, options: &IndentOptions) -> Result<Vec<IndentDiagnostic>> {
    let file = JsParser::new().parse_text(text)?;
    Ok(IndentChecker::new(options.clone()).check(&file))
}

/// Applies indent fixes until none remain or [`MAX_FIX_PASSES`] is reached.
///
/// A single pass already produces a stable result for most sources; further
/// passes pick up fixes skipped because they overlapped.
pub fn fix_source(text: &str, options: &IndentOptions) -> Result<String> {
    let checker = IndentChecker::new(options.clone());
    let mut current = text.to_string();
    for pass in 1..=MAX_FIX_PASSES {
        let file = JsParser::new().parse_text(&current)?;
        let fixes: Vec<Fix> = checker.check(&file).into_iter().map(|d| d.fix).collect();
        if fixes.is_empty() {
            break;
        }
        let (fixed, applied) = apply_fixes(&current, &fixes);
        tracing::debug!("Fix pass {} applied {} of {} fixes", pass, applied, fixes.len());
        if fixed == current {
            break;
        }
        current = fixed;
    }
    Ok(current)
}

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
