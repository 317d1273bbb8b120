//! Offset graph: the per-token indentation constraints and their resolution.
//!
//! Every token carries one [`OffsetRecord`]. An orthogonal ignore flag,
//! only ever set on first-of-line tokens, overrides the record: an ignored
//! token's desired indentation is whatever it already has. Resolution
//! yields a width in indent characters and is memoized in a
//! [`ResolveCache`] owned by the caller.

use crate::ast_core::{SourceFile, TokenId, TokenRange};

use super::token_index::TokenIndex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OffsetRecord {
    /// `levels` indent units past the anchor, or past column 0 without one
    Relative { levels: u32, anchor: Option<TokenId> },
    /// The anchor's column, measured from the first token of its line
    Locked { anchor: TokenId },
}

/// Memoized widths, indexed by token.
#[derive(Debug, Clone)]
pub struct ResolveCache {
    widths: Vec<Option<usize>>,
}

impl ResolveCache {
    pub fn new(token_count: usize) -> Self {
        Self { widths: vec![None; token_count] }
    }

    pub fn get(&self, token: TokenId) -> Option<usize> {
        self.widths[token.index()]
    }

    fn set(&mut self, token: TokenId, width: usize) {
        self.widths[token.index()] = Some(width);
    }

    pub fn resolved_count(&self) -> usize {
        self.widths.iter().filter(|w| w.is_some()).count()
    }
}

pub struct OffsetGraph<'a> {
    file: &'a SourceFile,
    index: &'a TokenIndex<'a>,
    indent_size: usize,
    records: Vec<OffsetRecord>,
    ignored: Vec<bool>,
}

impl<'a> OffsetGraph<'a> {
    /// Every token starts at zero levels from column 0.
    pub fn new(file: &'a SourceFile, index: &'a TokenIndex<'a>, indent_size: usize) -> Self {
        let count = file.tokens().len();
        Self {
            file,
            index,
            indent_size,
            records: vec![OffsetRecord::Relative { levels: 0, anchor: None }; count],
            ignored: vec![false; count],
        }
    }

    pub fn record(&self, token: TokenId) -> OffsetRecord {
        self.records[token.index()]
    }

    pub fn is_ignored(&self, token: TokenId) -> bool {
        self.ignored[token.index()]
    }

    pub fn token_count(&self) -> usize {
        self.records.len()
    }

    pub fn align(&mut self, anchor: TokenId, target: TokenId) {
        if anchor != target {
            self.records[target.index()] = OffsetRecord::Relative { levels: 0, anchor: Some(anchor) };
        }
    }

    pub fn lock_to_column(&mut self, anchor: TokenId, target: TokenId) {
        self.records[target.index()] = OffsetRecord::Locked { anchor };
    }

    /// Tokens sharing a start line with their anchor are aligned instead.
    pub fn set_offset(&mut self, target: TokenId, anchor: Option<TokenId>, levels: u32) {
        match anchor {
            Some(anchor) if self.file.same_line(anchor, target) => self.align(anchor, target),
            _ => self.records[target.index()] = OffsetRecord::Relative { levels, anchor },
        }
    }

    /// `set_offset` over a token run; an anchor inside the run keeps its record.
    pub fn set_offset_range(&mut self, range: TokenRange, anchor: Option<TokenId>, levels: u32) {
        for token in range.iter() {
            if Some(token) != anchor {
                self.set_offset(token, anchor, levels);
            }
        }
    }

    pub fn bump(&mut self, target: TokenId, delta: u32) {
        if let OffsetRecord::Relative { levels, .. } = &mut self.records[target.index()] {
            *levels += delta;
        }
    }

    pub fn ignore(&mut self, target: TokenId) {
        if self.index.is_first_token_of_line(target) {
            self.ignored[target.index()] = true;
        }
    }

    pub fn anchor_of(&self, token: TokenId) -> Option<TokenId> {
        match self.record(token) {
            OffsetRecord::Relative { anchor, .. } => anchor,
            OffsetRecord::Locked { anchor } => Some(anchor),
        }
    }

    /// Token whose width this token's width is derived from.
    fn dependency(&self, token: TokenId) -> Option<TokenId> {
        if self.is_ignored(token) {
            return None;
        }
        match self.record(token) {
            OffsetRecord::Relative { anchor, .. } => anchor,
            OffsetRecord::Locked { anchor } => {
                let line = self.file.token(anchor).start().line;
                Some(self.index.first_token_of_line(line).unwrap_or(anchor))
            }
        }
    }

    /// Width of a token without a dependency.
    fn base_width(&self, token: TokenId) -> usize {
        if self.is_ignored(token) {
            return self.index.literal_indent(token).chars().count();
        }
        match self.record(token) {
            OffsetRecord::Relative { levels, .. } => levels as usize * self.indent_size,
            OffsetRecord::Locked { .. } => 0,
        }
    }

    /// Width of a token given the width of its dependency.
    fn derived_width(&self, token: TokenId, dependency_width: usize) -> usize {
        match self.record(token) {
            OffsetRecord::Relative { levels, .. } => dependency_width + levels as usize * self.indent_size,
            OffsetRecord::Locked { anchor } => {
                let column = self.file.token(anchor).start().column;
                let line_start_column = self
                    .dependency(token)
                    .map_or(column, |first| self.file.token(first).start().column);
                dependency_width + column.saturating_sub(line_start_column)
            }
        }
    }

    /// Desired indentation width of `token`, in indent characters.
    ///
    /// Walks the dependency chain with an explicit stack, so deep nesting
    /// cannot overflow the call stack.
    pub fn resolve(&self, token: TokenId, cache: &mut ResolveCache) -> usize {
        let mut pending = Vec::new();
        let mut cursor = token;
        let mut width = loop {
            if let Some(width) = cache.get(cursor) {
                break width;
            }
            match self.dependency(cursor) {
                Some(next) => {
                    pending.push(cursor);
                    debug_assert!(pending.len() <= self.records.len(), "anchor cycle through token {:?}", token);
                    cursor = next;
                }
                None => {
                    let width = self.base_width(cursor);
                    cache.set(cursor, width);
                    break width;
                }
            }
        };
        if pending.len() > 32 {
            tracing::trace!("Resolved token {} through {} anchors", token.0, pending.len());
        }
        while let Some(next) = pending.pop() {
            width = self.derived_width(next, width);
            cache.set(next, width);
        }
        width
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::JsParser;

    fn setup(text: &str) -> SourceFile {
        JsParser::new().parse_text(text).unwrap()
    }

    #[test]
    fn test_relative_chain() {
        let file = setup("a;\nb;\nc;");
        let index = TokenIndex::new(&file);
        let mut graph = OffsetGraph::new(&file, &index, 4);
        // a ; b ; c ;
        graph.set_offset(TokenId(2), Some(TokenId(0)), 1);
        graph.set_offset(TokenId(4), Some(TokenId(2)), 2);
        let mut cache = ResolveCache::new(graph.token_count());
        assert_eq!(graph.resolve(TokenId(4), &mut cache), 12);
        assert_eq!(cache.get(TokenId(2)), Some(4));
        assert_eq!(graph.resolve(TokenId(0), &mut cache), 0);
    }

    #[test]
    fn test_same_line_offsets_collapse() {
        let file = setup("a + b;");
        let index = TokenIndex::new(&file);
        let mut graph = OffsetGraph::new(&file, &index, 4);
        graph.set_offset(TokenId(2), Some(TokenId(0)), 3);
        assert_eq!(graph.record(TokenId(2)), OffsetRecord::Relative { levels: 0, anchor: Some(TokenId(0)) });
        let mut cache = ResolveCache::new(graph.token_count());
        assert_eq!(graph.resolve(TokenId(2), &mut cache), graph.resolve(TokenId(0), &mut cache));
    }

    #[test]
    fn test_range_skips_its_anchor() {
        let file = setup("f(\nx,\ny);");
        let index = TokenIndex::new(&file);
        let mut graph = OffsetGraph::new(&file, &index, 2);
        graph.set_offset_range(TokenRange::inclusive(TokenId(0), TokenId(5)), Some(TokenId(2)), 1);
        assert_eq!(graph.anchor_of(TokenId(2)), None);
        assert_eq!(graph.anchor_of(TokenId(4)), Some(TokenId(2)));
    }

    #[test]
    fn test_ignored_token_keeps_its_indent() {
        let file = setup("a;\n      b;");
        let index = TokenIndex::new(&file);
        let mut graph = OffsetGraph::new(&file, &index, 4);
        graph.set_offset(TokenId(2), Some(TokenId(0)), 1);
        graph.ignore(TokenId(2));
        // not first of its line: no effect
        graph.ignore(TokenId(3));
        assert!(graph.is_ignored(TokenId(2)));
        assert!(!graph.is_ignored(TokenId(3)));
        let mut cache = ResolveCache::new(graph.token_count());
        assert_eq!(graph.resolve(TokenId(2), &mut cache), 6);
    }

    #[test]
    fn test_locked_to_column() {
        // `b` sits at column 9 of a line whose first token is at column 2
        let file = setup("  foo(a, b,\n c);");
        let index = TokenIndex::new(&file);
        let mut graph = OffsetGraph::new(&file, &index, 4);
        graph.set_offset(TokenId(0), None, 1);
        let b = TokenId(4);
        let c = TokenId(6);
        graph.lock_to_column(b, c);
        let mut cache = ResolveCache::new(graph.token_count());
        assert_eq!(graph.resolve(c, &mut cache), 4 + (9 - 2));
    }

    #[test]
    fn test_bump_only_touches_relative_records() {
        let file = setup("a;\nb;\nc;");
        let index = TokenIndex::new(&file);
        let mut graph = OffsetGraph::new(&file, &index, 4);
        graph.set_offset(TokenId(2), Some(TokenId(0)), 1);
        graph.bump(TokenId(2), 2);
        graph.lock_to_column(TokenId(0), TokenId(4));
        graph.bump(TokenId(4), 2);
        assert_eq!(graph.record(TokenId(2)), OffsetRecord::Relative { levels: 3, anchor: Some(TokenId(0)) });
        assert_eq!(graph.record(TokenId(4)), OffsetRecord::Locked { anchor: TokenId(0) });
    }
}
