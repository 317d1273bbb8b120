//! Graph-population rules.
//!
//! One pre-order walk over the tree, children left to right. Entering a
//! node first offsets all of its tokens 0 levels from its first token, then
//! runs the construct's handler; the only exit step belongs to variable
//! declarations. Anchors set by a handler always point at tokens that are
//! structurally before or above the target, which keeps the graph acyclic.
//! After the walk, semicolon-first terminators are aligned with their
//! governing keyword, comments may be ignored and the parenthesis pass runs.

use crate::ast_core::{NodeId, NodeKind, SourceFile, TokenId, TokenRange};
use crate::rules::{IndentOptions, ListIndent};

use super::offsets::OffsetGraph;
use super::token_index::TokenIndex;

enum Visit {
    Enter(NodeId),
    Exit(NodeId),
}

struct GraphBuilder<'a> {
    file: &'a SourceFile,
    index: &'a TokenIndex<'a>,
    options: &'a IndentOptions,
    graph: OffsetGraph<'a>,
    /// Parens owned by parameter and argument lists
    parameter_parens: Vec<bool>,
    /// `(terminator, governing)` pairs of blockless bodies, outermost first
    flush_terminators: Vec<(TokenId, TokenId)>,
}

/// Records every indentation constraint of `file`.
pub fn populate<'a>(file: &'a SourceFile, index: &'a TokenIndex<'a>, options: &'a IndentOptions) -> OffsetGraph<'a> {
    let mut builder = GraphBuilder {
        file,
        index,
        options,
        graph: OffsetGraph::new(file, index, options.indent_size()),
        parameter_parens: vec![false; file.tokens().len()],
        flush_terminators: Vec::new(),
    };

    let mut stack = vec![Visit::Enter(file.root())];
    let mut visited = 0usize;
    while let Some(visit) = stack.pop() {
        match visit {
            Visit::Enter(node) => {
                visited += 1;
                builder.enter(node);
                stack.push(Visit::Exit(node));
                stack.extend(file.kind(node).children().into_iter().rev().map(Visit::Enter));
            }
            Visit::Exit(node) => builder.exit(node),
        }
    }

    builder.align_terminators();
    if options.ignore_comments {
        builder.ignore_comments();
    }
    builder.add_parens_indent();
    tracing::debug!("Populated offsets for {} tokens across {} nodes", file.tokens().len(), visited);
    builder.graph
}

impl<'a> GraphBuilder<'a> {
    fn enter(&mut self, node: NodeId) {
        let file = self.file;
        let range = file.node_range(node);
        if range.is_empty() {
            return;
        }
        let first = file.first_token(node);
        self.graph.set_offset_range(range, Some(first), 0);

        match file.kind(node) {
            NodeKind::BlockStatement { body } | NodeKind::ClassBody { body } => self.block_body(node, body),
            NodeKind::ArrayExpression { elements } | NodeKind::ArrayPattern { elements } => {
                self.element_list(elements, first, file.last_token(node), self.options.array_expression)
            }
            NodeKind::ObjectExpression { properties } | NodeKind::ObjectPattern { properties } => {
                let elements: Vec<_> = properties.iter().copied().map(Some).collect();
                self.element_list(&elements, first, file.last_token(node), self.options.object_expression)
            }
            NodeKind::FunctionDeclaration { params, body, .. } => {
                self.parameter_list(params, *body, self.options.function_declaration.parameters)
            }
            NodeKind::FunctionExpression { params, body, .. } => {
                self.parameter_list(params, *body, self.options.function_expression.parameters)
            }
            NodeKind::ArrowFunctionExpression { params, arrow, body } => self.arrow_function(node, params, *arrow, *body),
            NodeKind::AssignmentExpression { left, operator, .. } => self.assignment(node, *left, *operator),
            NodeKind::BinaryExpression { operator, .. } | NodeKind::LogicalExpression { operator, .. } => {
                self.binary_operand(node, *operator)
            }
            NodeKind::CallExpression { callee, arguments } => self.call_arguments(node, *callee, arguments),
            NodeKind::NewExpression { callee, arguments } => {
                let last = file.last_token(node);
                let has_parens = file.is_punct(last, ")")
                    && file.prev_code_token(last).map_or(false, |t| file.is_punct(t, "("));
                if !arguments.is_empty() || has_parens {
                    self.call_arguments(node, *callee, arguments);
                }
            }
            NodeKind::ClassDeclaration { super_class: Some(super_class), body, .. }
            | NodeKind::ClassExpression { super_class: Some(super_class), body, .. } => {
                self.class_heritage(first, *super_class, *body)
            }
            NodeKind::ConditionalExpression { .. } => self.conditional(node, first, range),
            NodeKind::IfStatement { consequent, alternate, .. } => {
                self.blockless_body(*consequent);
                if let Some(alternate) = alternate {
                    if !matches!(file.kind(*alternate), NodeKind::IfStatement { .. }) {
                        self.blockless_body(*alternate);
                    }
                }
            }
            NodeKind::ForStatement { init, test, update, body } => {
                if let Some(open) = file.next_code_token(first) {
                    for part in [init, test, update].into_iter().flatten() {
                        self.graph.set_offset_range(file.node_range(*part), Some(open), 1);
                    }
                }
                self.blockless_body(*body);
            }
            NodeKind::ForInStatement { body, .. }
            | NodeKind::ForOfStatement { body, .. }
            | NodeKind::WhileStatement { body, .. }
            | NodeKind::DoWhileStatement { body, .. } => self.blockless_body(*body),
            NodeKind::MemberExpression { object, property, computed } => {
                self.member_access(node, *object, *property, *computed)
            }
            NodeKind::SwitchStatement { discriminant, cases } => self.switch_body(node, *discriminant, cases),
            NodeKind::SwitchCase { consequent, .. } => self.switch_case(node, consequent),
            NodeKind::TemplateLiteral { quasis, expressions } => self.template_segments(quasis, expressions.len()),
            NodeKind::VariableDeclaration { kind, declarations } => {
                let level = self.options.variable_declarator.for_kind(*kind);
                self.variable_declaration(node, level, declarations)
            }
            NodeKind::VariableDeclarator { id, init: Some(init) } => self.declarator_init(node, *id, *init),
            NodeKind::Program { .. }
            | NodeKind::EmptyStatement
            | NodeKind::ExpressionStatement { .. }
            | NodeKind::VariableDeclarator { init: None, .. }
            | NodeKind::ClassDeclaration { super_class: None, .. }
            | NodeKind::ClassExpression { super_class: None, .. }
            | NodeKind::MethodDefinition { .. }
            | NodeKind::ReturnStatement { .. }
            | NodeKind::BreakStatement { .. }
            | NodeKind::ContinueStatement { .. }
            | NodeKind::ThrowStatement { .. }
            | NodeKind::TryStatement { .. }
            | NodeKind::CatchClause { .. }
            | NodeKind::Identifier
            | NodeKind::Literal
            | NodeKind::ThisExpression
            | NodeKind::Property { .. }
            | NodeKind::SpreadElement { .. }
            | NodeKind::RestElement { .. }
            | NodeKind::AssignmentPattern { .. }
            | NodeKind::UnaryExpression { .. }
            | NodeKind::UpdateExpression { .. }
            | NodeKind::SequenceExpression { .. } => {}
        }
    }

    fn exit(&mut self, node: NodeId) {
        let NodeKind::VariableDeclaration { kind, declarations } = self.file.kind(node) else {
            return;
        };
        let ListIndent::Levels(levels) = self.options.variable_declarator.for_kind(*kind) else {
            return;
        };
        if declarations.len() < 2 {
            return;
        }
        let NodeKind::VariableDeclarator { init: Some(init), .. } = self.file.kind(declarations[0]) else {
            return;
        };

        // the first initializer sits one declarator level deeper than the keyword line suggests
        let init_range = self.file.node_range(*init);
        for token in init_range.iter() {
            // an absent anchor means column 0, which is outside the initializer too
            let anchored_inside = self.graph.anchor_of(token).map_or(false, |a| init_range.contains(a));
            if !anchored_inside {
                self.graph.bump(token, levels);
            }
        }
    }

    fn block_body(&mut self, node: NodeId, body: &[NodeId]) {
        let file = self.file;
        let parent = file.parent(node);
        let levels = match parent.map(|p| file.kind(p)) {
            Some(NodeKind::FunctionExpression { .. } | NodeKind::ArrowFunctionExpression { .. })
                if parent.map_or(false, |p| self.is_outer_iife(p)) =>
            {
                self.options.outer_iife_body
            }
            Some(NodeKind::FunctionExpression { .. } | NodeKind::ArrowFunctionExpression { .. }) => {
                self.options.function_expression.body
            }
            Some(NodeKind::FunctionDeclaration { .. }) => self.options.function_declaration.body,
            _ => 1,
        };

        let open = file.first_token(node);
        if let Some(parent) = parent {
            if !file.kind(parent).is_statement_list() {
                self.graph.set_offset(open, Some(file.first_token(parent)), 0);
            }
        }
        let elements: Vec<_> = body.iter().copied().map(Some).collect();
        self.element_list(&elements, open, file.last_token(node), ListIndent::Levels(levels));
    }

    /// A function called in place at the top level of the program.
    fn is_outer_iife(&self, function: NodeId) -> bool {
        let file = self.file;
        let Some(call) = file.parent(function) else {
            return false;
        };
        if !matches!(file.kind(call), NodeKind::CallExpression { callee, .. } if *callee == function) {
            return false;
        }
        let mut statement = file.parent(call);
        while let Some(current) = statement {
            let passes_through = match file.kind(current) {
                NodeKind::UnaryExpression { operator, .. } => {
                    ["!", "~", "+", "-"].iter().any(|op| file.is_punct(*operator, op))
                }
                NodeKind::AssignmentExpression { .. }
                | NodeKind::LogicalExpression { .. }
                | NodeKind::SequenceExpression { .. }
                | NodeKind::VariableDeclarator { .. } => true,
                _ => false,
            };
            if !passes_through {
                break;
            }
            statement = file.parent(current);
        }
        statement.map_or(false, |s| {
            matches!(file.kind(s), NodeKind::ExpressionStatement { .. } | NodeKind::VariableDeclaration { .. })
                && file.parent(s).map_or(false, |p| matches!(file.kind(p), NodeKind::Program { .. }))
        })
    }

    /// Leading token of a list element, including its wrapping parens.
    fn element_first_token(&self, element: NodeId, open: TokenId) -> TokenId {
        let mut token = self.file.first_token(element);
        while let Some(before) = self.file.prev_code_token(token) {
            if before == open || !self.file.is_punct(before, "(") {
                break;
            }
            token = before;
        }
        token
    }

    fn element_list(&mut self, elements: &[Option<NodeId>], open: TokenId, close: TokenId, policy: ListIndent) {
        let file = self.file;
        self.graph.set_offset_range(TokenRange::between(open, close), Some(open), policy.levels_or_one());
        self.graph.set_offset(close, Some(open), 0);

        let first_leading = match elements.first() {
            Some(Some(first)) => Some(self.element_first_token(*first, open)),
            Some(None) if policy == ListIndent::First => return,
            _ => None,
        };

        for (i, element) in elements.iter().enumerate() {
            let Some(element) = *element else {
                continue;
            };
            let leading = self.element_first_token(element, open);
            if policy == ListIndent::Off {
                self.graph.ignore(leading);
            }
            if i == 0 {
                continue;
            }

            match first_leading {
                Some(first_leading) if policy == ListIndent::First && self.index.is_first_token_of_line(leading) => {
                    self.graph.lock_to_column(first_leading, leading);
                }
                _ => {
                    let Some(previous) = elements[i - 1] else {
                        continue;
                    };
                    let previous_last = file.last_token(previous);
                    if file.token(previous_last).end().line > file.token(open).end().line {
                        let run = TokenRange::inclusive(TokenId(previous_last.0 + 1), file.last_token(element));
                        let previous_leading = self.element_first_token(previous, open);
                        self.graph.set_offset_range(run, Some(previous_leading), 0);
                    }
                }
            }
        }
    }

    fn mark_parameter_parens(&mut self, open: TokenId, close: TokenId) {
        self.parameter_parens[open.index()] = true;
        self.parameter_parens[close.index()] = true;
    }

    fn parameter_list(&mut self, params: &[NodeId], body: NodeId, policy: ListIndent) {
        let file = self.file;
        let Some(close) = file.prev_code_token(file.first_token(body)) else {
            return;
        };
        let open = match params.first() {
            Some(first) => file.prev_code_token(file.first_token(*first)),
            None => file.prev_code_token(close),
        };
        let Some(open) = open else {
            return;
        };
        self.mark_parameter_parens(open, close);
        let elements: Vec<_> = params.iter().copied().map(Some).collect();
        self.element_list(&elements, open, close, policy);
    }

    fn arrow_function(&mut self, node: NodeId, params: &[NodeId], arrow: TokenId, body: NodeId) {
        let file = self.file;
        let open = file.first_token(node);
        if file.is_punct(open, "(") {
            if let Some(close) = file.prev_code_token(arrow) {
                self.mark_parameter_parens(open, close);
                let elements: Vec<_> = params.iter().copied().map(Some).collect();
                self.element_list(&elements, open, close, self.options.function_expression.parameters);
            }
        }
        self.blockless_body(body);
    }

    /// Indents a single-statement body (or arrow expression body) one level
    /// past the token that governs it.
    fn blockless_body(&mut self, body: NodeId) {
        let file = self.file;
        if matches!(file.kind(body), NodeKind::BlockStatement { .. }) {
            return;
        }
        let mut first_body = file.first_token(body);
        let mut last_body = file.last_token(body);
        let Some(governing) = file.find_code_token_before(first_body, |t| !t.is_punct("(")) else {
            return;
        };
        while let (Some(before), Some(after)) = (file.prev_code_token(first_body), file.next_code_token(last_body)) {
            if !(file.is_punct(before, "(") && file.is_punct(after, ")")) {
                break;
            }
            first_body = before;
            last_body = after;
        }
        self.graph.set_offset_range(TokenRange::inclusive(first_body, last_body), Some(governing), 1);

        let last = file.last_token(body);
        if !matches!(file.kind(body), NodeKind::EmptyStatement)
            && file.is_punct(last, ";")
            && self.index.is_first_token_of_line(last)
        {
            self.flush_terminators.push((last, governing));
        }
    }

    /// Semicolon-first style: a terminator on its own line sits flush with
    /// the keyword of the innermost body it ends. Must run after the walk.
    fn align_terminators(&mut self) {
        for (terminator, governing) in std::mem::take(&mut self.flush_terminators) {
            self.graph.set_offset(terminator, Some(governing), 0);
        }
    }

    fn assignment(&mut self, node: NodeId, left: NodeId, operator: TokenId) {
        let file = self.file;
        let run = TokenRange::inclusive(operator, file.last_token(node));
        self.graph.set_offset_range(run, Some(file.last_token(left)), 1);
        self.graph.ignore(operator);
        if let Some(after) = file.next_code_token(operator) {
            self.graph.ignore(after);
        }
    }

    fn binary_operand(&mut self, node: NodeId, operator: TokenId) {
        let file = self.file;
        self.graph.ignore(operator);
        let Some(after) = file.next_code_token(operator) else {
            return;
        };
        self.graph.ignore(after);
        self.graph.set_offset(after, Some(file.first_token(node)), 1);
        let rest = TokenRange::inclusive(TokenId(after.0 + 1), file.last_token(node));
        self.graph.set_offset_range(rest, Some(after), 1);
    }

    fn call_arguments(&mut self, node: NodeId, callee: NodeId, arguments: &[NodeId]) {
        let file = self.file;
        let close = file.last_token(node);
        let open = if arguments.is_empty() {
            file.prev_code_token(close)
        } else {
            file.find_code_token_after(file.last_token(callee), |t| t.is_punct("("))
        };
        let Some(open) = open else {
            return;
        };
        self.mark_parameter_parens(open, close);
        if let Some(before) = file.prev_code_token(open) {
            self.graph.set_offset(open, Some(before), 0);
        }
        let elements: Vec<_> = arguments.iter().copied().map(Some).collect();
        self.element_list(&elements, open, close, self.options.call_expression.arguments);
    }

    fn class_heritage(&mut self, class_token: TokenId, super_class: NodeId, body: NodeId) {
        let file = self.file;
        let Some(extends) = file.find_code_token_before(file.first_token(super_class), |t| !t.is_punct("(")) else {
            return;
        };
        let heritage = TokenRange { start: extends.0, end: file.first_token(body).0 };
        self.graph.set_offset_range(heritage, Some(class_token), 1);
    }

    fn conditional(&mut self, node: NodeId, first: TokenId, range: TokenRange) {
        let nested = self
            .file
            .parent(node)
            .map_or(false, |p| matches!(self.file.kind(p), NodeKind::ConditionalExpression { .. }));
        if self.options.flat_ternary_expressions && nested {
            return;
        }
        let rest = TokenRange { start: first.0 + 1, end: range.end };
        self.graph.set_offset_range(rest, Some(first), 1);
    }

    fn member_access(&mut self, node: NodeId, object: NodeId, property: NodeId, computed: bool) {
        let file = self.file;
        let object_last = file.last_token(object);
        let Some(first_non_object) = file.find_code_token_after(object_last, |t| !t.is_punct(")")) else {
            return;
        };
        let Some(second_non_object) = file.next_code_token(first_non_object) else {
            return;
        };

        let property_first = file.first_token(property);
        let paren_count = TokenRange::between(object_last, property_first)
            .iter()
            .filter(|t| file.is_punct(*t, ")"))
            .count();
        let mut first_object = file.first_token(object);
        for _ in 0..paren_count {
            match file.prev_code_token(first_object) {
                Some(before) => first_object = before,
                None => break,
            }
        }
        let last_object = file.prev_code_token(first_non_object).unwrap_or(object_last);
        let first_property = if computed { first_non_object } else { second_non_object };

        if computed {
            self.graph.set_offset(file.last_token(node), Some(first_non_object), 0);
            self.graph.set_offset_range(file.node_range(property), Some(first_non_object), 1);
        }

        let base = if file.token(last_object).end().line == file.token(first_property).start().line {
            last_object
        } else {
            first_object
        };

        match self.options.member_expression {
            ListIndent::Levels(levels) => {
                self.graph.set_offset(first_non_object, Some(base), levels);
                let second_anchor = if computed { first_non_object } else { base };
                self.graph.set_offset(second_non_object, Some(second_anchor), levels);
            }
            ListIndent::Off | ListIndent::First => {
                self.graph.ignore(first_non_object);
                self.graph.ignore(second_non_object);
                self.graph.set_offset(first_non_object, Some(base), 0);
                self.graph.set_offset(second_non_object, Some(first_non_object), 0);
            }
        }
    }

    fn switch_body(&mut self, node: NodeId, discriminant: NodeId, cases: &[NodeId]) {
        let file = self.file;
        let Some(open) = file.find_code_token_after(file.last_token(discriminant), |t| t.is_punct("{")) else {
            return;
        };
        let close = file.last_token(node);
        self.graph.set_offset_range(TokenRange::between(open, close), Some(open), self.options.switch_case);

        if let Some(last_case) = cases.last() {
            for token in TokenRange::between(file.last_token(*last_case), close).iter() {
                if file.token(token).is_comment() {
                    self.graph.ignore(token);
                }
            }
        }
    }

    fn switch_case(&mut self, node: NodeId, consequent: &[NodeId]) {
        let file = self.file;
        if let [only] = consequent {
            if matches!(file.kind(*only), NodeKind::BlockStatement { .. }) {
                return;
            }
        }
        let keyword = file.first_token(node);
        let end = file
            .next_code_token(file.last_token(node))
            .map_or(file.tokens().len() as u32, |t| t.0);
        self.graph.set_offset_range(TokenRange { start: keyword.0 + 1, end }, Some(keyword), 1);
    }

    fn template_segments(&mut self, quasis: &[TokenId], expression_count: usize) {
        let file = self.file;
        for i in 0..expression_count {
            let (Some(previous), Some(next)) = (quasis.get(i), quasis.get(i + 1)) else {
                break;
            };
            let base = file.token(*previous).span.is_single_line().then_some(*previous);
            self.graph.set_offset_range(TokenRange::between(*previous, *next), base, 1);
            self.graph.set_offset(*next, base, 0);
        }
    }

    fn variable_declaration(&mut self, node: NodeId, level: ListIndent, declarations: &[NodeId]) {
        let file = self.file;
        let first = file.first_token(node);
        let last = file.last_token(node);
        let levels = match level {
            ListIndent::First if declarations.len() > 1 => {
                let elements: Vec<_> = declarations.iter().copied().map(Some).collect();
                self.element_list(&elements, first, last, ListIndent::First);
                return;
            }
            ListIndent::Levels(levels) => levels,
            ListIndent::First | ListIndent::Off => 1,
        };

        let spans_lines = declarations
            .last()
            .map_or(false, |d| file.token(file.first_token(*d)).start().line > file.token(first).start().line);
        let levels = if spans_lines { levels } else { 1 };
        self.graph.set_offset_range(file.node_range(node), Some(first), levels);
        if file.is_punct(last, ";") {
            self.graph.ignore(last);
        }
    }

    fn declarator_init(&mut self, node: NodeId, id: NodeId, init: NodeId) {
        let file = self.file;
        let Some(equals) = file.find_code_token_before(file.first_token(init), |t| !t.is_punct("(")) else {
            return;
        };
        let Some(after) = file.next_code_token(equals) else {
            return;
        };
        self.graph.ignore(equals);
        self.graph.ignore(after);
        let value = TokenRange::inclusive(after, file.last_token(node));
        self.graph.set_offset_range(value, Some(equals), 1);
        self.graph.set_offset(equals, Some(file.last_token(id)), 0);
    }

    fn ignore_comments(&mut self) {
        for (i, token) in self.file.tokens().iter().enumerate() {
            if token.is_comment() {
                self.graph.ignore(TokenId(i as u32));
            }
        }
    }

    /// Pairs every `(` with its `)` and indents the contents of pairs no
    /// list rule claimed, outermost pair first.
    fn add_parens_indent(&mut self) {
        let file = self.file;
        let mut open_stack = Vec::new();
        let mut pairs = Vec::new();
        for (i, token) in file.tokens().iter().enumerate() {
            let id = TokenId(i as u32);
            if token.is_punct("(") {
                open_stack.push(id);
            } else if token.is_punct(")") {
                if let Some(open) = open_stack.pop() {
                    pairs.push((open, id));
                }
            }
        }

        for (open, close) in pairs.into_iter().rev() {
            if !self.parameter_parens[open.index()] && !self.parameter_parens[close.index()] {
                let inside = TokenRange::between(open, close);
                let mut code_tokens = inside.iter().filter(|t| !file.token(*t).is_comment()).peekable();
                let first_inside = code_tokens.peek().copied();
                for token in code_tokens {
                    let anchored_inside = self.graph.anchor_of(token).map_or(false, |a| inside.contains(a));
                    if Some(token) == first_inside || !anchored_inside {
                        self.graph.set_offset(token, Some(open), 1);
                    }
                }
            }
            self.graph.set_offset(close, Some(open), 0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indent::offsets::{OffsetRecord, ResolveCache};
    use crate::parser::JsParser;
    use pretty_assertions::assert_eq;

    fn widths(text: &str, options: &IndentOptions) -> Vec<(String, usize)> {
        let file = JsParser::new().parse_text(text).unwrap();
        let index = TokenIndex::new(&file);
        let graph = populate(&file, &index, options);
        let mut cache = ResolveCache::new(graph.token_count());
        (1..=index.line_count())
            .filter_map(|line| index.first_token_of_line(line))
            .map(|t| (file.token(t).text.clone(), graph.resolve(t, &mut cache)))
            .collect()
    }

    fn pairs(items: &[(&str, usize)]) -> Vec<(String, usize)> {
        items.iter().map(|(t, w)| (t.to_string(), *w)).collect()
    }

    #[test]
    fn test_block_bodies_nest() {
        let text = "function f(a) {\n  if (a) {\n    return 1;\n  }\n}";
        assert_eq!(
            widths(text, &IndentOptions::default()),
            pairs(&[("function", 0), ("if", 4), ("return", 8), ("}", 4), ("}", 0)])
        );
    }

    #[test]
    fn test_blockless_bodies() {
        let text = "while (x)\nx--;\nif (a)\nb();\nelse\nc();";
        assert_eq!(
            widths(text, &IndentOptions::default()),
            pairs(&[("while", 0), ("x", 4), ("if", 0), ("b", 4), ("else", 0), ("c", 4)])
        );
    }

    #[test]
    fn test_semicolon_first_terminator() {
        let options = IndentOptions::default();
        assert_eq!(widths("if (a)\nfoo()\n;", &options), pairs(&[("if", 0), ("foo", 4), (";", 0)]));
        assert_eq!(widths("while (a)\nfoo()\n;", &options), pairs(&[("while", 0), ("foo", 4), (";", 0)]));
    }

    #[test]
    fn test_semicolon_first_follows_innermost_body() {
        let text = "while (x)\nif (a)\nfoo()\n;";
        assert_eq!(
            widths(text, &IndentOptions::default()),
            pairs(&[("while", 0), ("if", 4), ("foo", 8), (";", 4)])
        );
    }

    #[test]
    fn test_declaration_bump_covers_column_anchored_tokens() {
        let text = "var s = `a\nb${\nx\n}c`,\n    t = 1;";
        let file = JsParser::new().parse_text(text).unwrap();
        let index = TokenIndex::new(&file);
        let options = IndentOptions::default();
        let graph = populate(&file, &index, &options);
        let mut cache = ResolveCache::new(graph.token_count());
        let x = index.first_token_of_line(3).unwrap();
        let tail = index.first_token_of_line(4).unwrap();
        assert_eq!(graph.record(x), OffsetRecord::Relative { levels: 2, anchor: None });
        assert_eq!(graph.resolve(x, &mut cache), 8);
        assert_eq!(graph.resolve(tail, &mut cache), 4);
    }

    #[test]
    fn test_else_if_chain_is_not_indented() {
        let text = "if (a) {\n} else if (b) {\nx();\n}";
        assert_eq!(widths(text, &IndentOptions::default()), pairs(&[("if", 0), ("}", 0), ("x", 4), ("}", 0)]));
    }

    #[test]
    fn test_call_arguments_and_parens() {
        let text = "foo(\na,\n(b +\nc)\n);";
        let result = widths(text, &IndentOptions::default());
        assert_eq!(result[0], ("foo".to_string(), 0));
        assert_eq!(result[1], ("a".to_string(), 4));
        assert_eq!(result[2], ("(".to_string(), 4));
        assert_eq!(result[4], (")".to_string(), 0));
    }

    #[test]
    fn test_switch_case_levels() {
        let mut options = IndentOptions::default();
        options.switch_case = 1;
        let text = "switch (a) {\ncase 1:\nb();\nbreak;\ndefault:\nc();\n}";
        assert_eq!(
            widths(text, &options),
            pairs(&[("switch", 0), ("case", 4), ("b", 8), ("break", 8), ("default", 4), ("c", 8), ("}", 0)])
        );
    }

    #[test]
    fn test_member_chain_off_by_default() {
        let file = JsParser::new().parse_text("foo\n.bar\n.baz();").unwrap();
        let index = TokenIndex::new(&file);
        let options = IndentOptions::default();
        let graph = populate(&file, &index, &options);
        let dot = index.first_token_of_line(2).unwrap();
        assert!(graph.is_ignored(dot));
    }

    #[test]
    fn test_member_chain_with_levels() {
        let mut options = IndentOptions::default();
        options.member_expression = ListIndent::Levels(1);
        assert_eq!(widths("foo\n.bar\n.baz();", &options), pairs(&[("foo", 0), (".", 4), (".", 4)]));
    }

    #[test]
    fn test_first_policy_locks_to_column() {
        let mut options = IndentOptions::default();
        options.array_expression = ListIndent::First;
        let file = JsParser::new().parse_text("x = [a,\n b];").unwrap();
        let index = TokenIndex::new(&file);
        let graph = populate(&file, &index, &options);
        let b = index.first_token_of_line(2).unwrap();
        let a = file.prev_code_token(file.prev_code_token(b).unwrap()).unwrap();
        assert_eq!(graph.record(b), OffsetRecord::Locked { anchor: a });
        let mut cache = ResolveCache::new(graph.token_count());
        assert_eq!(graph.resolve(b, &mut cache), 5);
    }

    #[test]
    fn test_template_expressions() {
        let text = "x = `a${\nb\n}c`;";
        assert_eq!(widths(text, &IndentOptions::default()), pairs(&[("x", 0), ("b", 4), ("}c`", 0)]));
    }

    #[test]
    fn test_outer_iife_body_level() {
        let mut options = IndentOptions::default();
        options.outer_iife_body = 0;
        let text = "(function () {\nvar a = 1;\n})();";
        assert_eq!(widths(text, &options), pairs(&[("(", 0), ("var", 0), ("}", 0)]));
    }
}
