/*!
# Indent Engine

Checks the leading whitespace of every line of a parsed source file.

The engine runs in three phases over one [`SourceFile`]:

1. [`token_index`] finds the first token of each line and its literal indent.
2. [`listeners`] walks the tree once and records, per token, an offset from
   an anchor token in an [`offsets::OffsetGraph`].
3. [`validator`] resolves the desired width of each line's first token and
   reports the lines that differ, each with a whitespace-only fix.

Diagnostics come out in ascending line order; a line is reported at most once.
*/

pub mod listeners;
pub mod offsets;
pub mod token_index;
pub mod validator;

pub use offsets::{OffsetGraph, OffsetRecord, ResolveCache};
pub use token_index::TokenIndex;
pub use validator::LineValidator;

use crate::ast_core::SourceFile;
use crate::diagnostics::IndentDiagnostic;
use crate::rules::IndentOptions;

/// Runs the indent engine with a fixed set of options.
#[derive(Debug, Clone, Default)]
pub struct IndentChecker {
    options: IndentOptions,
}

impl IndentChecker {
    pub fn new(options: IndentOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &IndentOptions {
        &self.options
    }

    pub fn check(&self, file: &SourceFile) -> Vec<IndentDiagnostic> {
        let _span = tracing::debug_span!("indent", tokens = file.tokens().len(), lines = file.line_count()).entered();
        let index = TokenIndex::new(file);
        let graph = listeners::populate(file, &index, &self.options);
        LineValidator::new(file, &index, &graph, self.options.indent_char()).validate()
    }

    /// Desired width of every line, `None` for lines no token starts on.
    pub fn line_widths(&self, file: &SourceFile) -> Vec<Option<usize>> {
        let index = TokenIndex::new(file);
        let graph = listeners::populate(file, &index, &self.options);
        let mut cache = ResolveCache::new(graph.token_count());
        (1..=index.line_count())
            .map(|line| {
                index
                    .first_token_of_line(line)
                    .filter(|t| file.token(*t).start().line == line)
                    .map(|t| graph.resolve(t, &mut cache))
            })
            .collect()
    }
}
