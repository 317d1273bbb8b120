/*!
# JavaScript Syntax Analyzer

Recursive-descent parser over the non-comment tokens. Builds ESTree-shaped
nodes into an [`Arena`]; node ranges span code tokens only and exclude
wrapping parentheses. Supports the statement and expression forms the
indent rules know about, with automatic semicolon insertion at line
breaks, `}` and end of input.
*/

use crate::ast_core::{Arena, DeclarationKind, NodeId, NodeKind, Token, TokenId, TokenKind, TokenRange};
use crate::core::errors::{IndentError, Result};
use crate::core::position::LineIndex;

const ASSIGNMENT_OPERATORS: &[&str] = &[
    "=", "+=", "-=", "*=", "/=", "%=", "**=", "<<=", ">>=", ">>>=", "&=", "|=", "^=", "&&=", "||=", "??=",
];

/// Syntax analyzer for one token stream
pub struct SyntaxAnalyzer<'a> {
    text: &'a str,
    lines: &'a LineIndex,
    tokens: &'a [Token],
    /// Ids of non-comment tokens, in order
    code: Vec<TokenId>,
    /// Index into `code` of the next token to consume
    current: usize,
    arena: Arena,
    /// Set while parsing a `for` head, where `in` ends the expression
    no_in: bool,
}

impl<'a> SyntaxAnalyzer<'a> {
    pub fn new(text: &'a str, lines: &'a LineIndex, tokens: &'a [Token]) -> Self {
        let code = tokens
            .iter()
            .enumerate()
            .filter(|(_, t)| !t.is_comment())
            .map(|(i, _)| TokenId(i as u32))
            .collect();
        Self { text, lines, tokens, code, current: 0, arena: Arena::new(), no_in: false }
    }

    /// Parses a whole program
    pub fn parse_program(mut self) -> Result<(Arena, NodeId)> {
        let mut body = Vec::new();
        while !self.is_eof() {
            body.push(self.parse_statement()?);
        }
        let range = match (self.code.first(), self.code.last()) {
            (Some(first), Some(last)) => TokenRange::inclusive(*first, *last),
            _ => TokenRange::empty(),
        };
        let root = self.arena.alloc(NodeKind::Program { body }, range);
        tracing::debug!("Parsed {} nodes", self.arena.len());
        Ok((self.arena, root))
    }

    // ---- statements ----

    fn parse_statement(&mut self) -> Result<NodeId> {
        let start = self.current_id()?;
        let token = self.token_at(start);
        match (token.kind, token.text.as_str()) {
            (TokenKind::Punctuator, "{") => self.parse_block(),
            (TokenKind::Punctuator, ";") => {
                self.advance()?;
                Ok(self.finish(start, NodeKind::EmptyStatement))
            }
            (TokenKind::Keyword, "var" | "let" | "const") => self.parse_variable_declaration(true),
            (TokenKind::Keyword, "function") => self.parse_function(true),
            (TokenKind::Keyword, "class") => self.parse_class(true),
            (TokenKind::Keyword, "if") => self.parse_if(),
            (TokenKind::Keyword, "for") => self.parse_for(),
            (TokenKind::Keyword, "while") => {
                self.advance()?;
                let test = self.parse_parenthesized()?;
                let body = self.parse_statement()?;
                Ok(self.finish(start, NodeKind::WhileStatement { test, body }))
            }
            (TokenKind::Keyword, "do") => {
                self.advance()?;
                let body = self.parse_statement()?;
                self.expect_keyword("while")?;
                let test = self.parse_parenthesized()?;
                self.eat(";");
                Ok(self.finish(start, NodeKind::DoWhileStatement { body, test }))
            }
            (TokenKind::Keyword, "return") => {
                self.advance()?;
                let argument = if self.at_statement_end() { None } else { Some(self.parse_expression()?) };
                self.consume_semicolon()?;
                Ok(self.finish(start, NodeKind::ReturnStatement { argument }))
            }
            (TokenKind::Keyword, "break" | "continue") => {
                self.advance()?;
                let label = if self.at_kind(TokenKind::Identifier) && !self.newline_before() {
                    Some(self.parse_identifier()?)
                } else {
                    None
                };
                self.consume_semicolon()?;
                let kind = if token.text == "break" {
                    NodeKind::BreakStatement { label }
                } else {
                    NodeKind::ContinueStatement { label }
                };
                Ok(self.finish(start, kind))
            }
            (TokenKind::Keyword, "throw") => {
                self.advance()?;
                let argument = self.parse_expression()?;
                self.consume_semicolon()?;
                Ok(self.finish(start, NodeKind::ThrowStatement { argument }))
            }
            (TokenKind::Keyword, "try") => self.parse_try(),
            (TokenKind::Keyword, "switch") => self.parse_switch(),
            _ => {
                let expression = self.parse_expression()?;
                self.consume_semicolon()?;
                Ok(self.finish(start, NodeKind::ExpressionStatement { expression }))
            }
        }
    }

    fn parse_block(&mut self) -> Result<NodeId> {
        let start = self.expect("{")?;
        let saved = std::mem::replace(&mut self.no_in, false);
        let mut body = Vec::new();
        while !self.at("}") {
            if self.is_eof() {
                return Err(self.error("expected '}'"));
            }
            body.push(self.parse_statement()?);
        }
        self.expect("}")?;
        self.no_in = saved;
        Ok(self.finish(start, NodeKind::BlockStatement { body }))
    }

    fn parse_variable_declaration(&mut self, consume_semicolon: bool) -> Result<NodeId> {
        let start = self.advance()?;
        let kind = DeclarationKind::from_keyword(&self.token_at(start).text)
            .ok_or_else(|| self.error_at(start, "expected a declaration keyword"))?;
        let mut declarations = Vec::new();
        loop {
            let declarator_start = self.current_id()?;
            let id = self.parse_binding_target()?;
            let init = if self.eat("=") { Some(self.parse_assign()?) } else { None };
            declarations.push(self.finish(declarator_start, NodeKind::VariableDeclarator { id, init }));
            if !self.eat(",") {
                break;
            }
        }
        if consume_semicolon {
            self.consume_semicolon()?;
        }
        Ok(self.finish(start, NodeKind::VariableDeclaration { kind, declarations }))
    }

    fn parse_if(&mut self) -> Result<NodeId> {
        let start = self.advance()?;
        let test = self.parse_parenthesized()?;
        let consequent = self.parse_statement()?;
        let alternate = if self.at_keyword("else") {
            self.advance()?;
            Some(self.parse_statement()?)
        } else {
            None
        };
        Ok(self.finish(start, NodeKind::IfStatement { test, consequent, alternate }))
    }

    fn parse_for(&mut self) -> Result<NodeId> {
        let start = self.advance()?;
        self.expect("(")?;
        let init = if self.at(";") {
            None
        } else {
            let saved = std::mem::replace(&mut self.no_in, true);
            let init = if self.at_keyword("var") || self.at_keyword("let") || self.at_keyword("const") {
                self.parse_variable_declaration(false)?
            } else {
                self.parse_expression()?
            };
            self.no_in = saved;
            Some(init)
        };

        if let Some(left) = init {
            if self.at_keyword("in") || self.at_word("of") {
                let is_of = self.at_word("of");
                self.advance()?;
                if !matches!(self.arena.node(left).kind, NodeKind::VariableDeclaration { .. }) {
                    self.to_pattern(left)?;
                }
                let right = if is_of { self.parse_assign()? } else { self.parse_expression()? };
                self.expect(")")?;
                let body = self.parse_statement()?;
                let kind = if is_of {
                    NodeKind::ForOfStatement { left, right, body }
                } else {
                    NodeKind::ForInStatement { left, right, body }
                };
                return Ok(self.finish(start, kind));
            }
        }

        self.expect(";")?;
        let test = if self.at(";") { None } else { Some(self.parse_expression()?) };
        self.expect(";")?;
        let update = if self.at(")") { None } else { Some(self.parse_expression()?) };
        self.expect(")")?;
        let body = self.parse_statement()?;
        Ok(self.finish(start, NodeKind::ForStatement { init, test, update, body }))
    }

    fn parse_try(&mut self) -> Result<NodeId> {
        let start = self.advance()?;
        let block = self.parse_block()?;
        let handler = if self.at_keyword("catch") {
            let clause_start = self.advance()?;
            let param = if self.eat("(") {
                let param = self.parse_binding_target()?;
                self.expect(")")?;
                Some(param)
            } else {
                None
            };
            let body = self.parse_block()?;
            Some(self.finish(clause_start, NodeKind::CatchClause { param, body }))
        } else {
            None
        };
        let finalizer = if self.at_keyword("finally") {
            self.advance()?;
            Some(self.parse_block()?)
        } else {
            None
        };
        if handler.is_none() && finalizer.is_none() {
            return Err(self.error("expected 'catch' or 'finally'"));
        }
        Ok(self.finish(start, NodeKind::TryStatement { block, handler, finalizer }))
    }

    fn parse_switch(&mut self) -> Result<NodeId> {
        let start = self.advance()?;
        let discriminant = self.parse_parenthesized()?;
        self.expect("{")?;
        let mut cases = Vec::new();
        while !self.at("}") {
            let case_start = self.current_id()?;
            let test = if self.at_keyword("case") {
                self.advance()?;
                Some(self.parse_expression()?)
            } else {
                self.expect_keyword("default")?;
                None
            };
            self.expect(":")?;
            let mut consequent = Vec::new();
            while !(self.at("}") || self.at_keyword("case") || self.at_keyword("default")) {
                if self.is_eof() {
                    return Err(self.error("expected '}'"));
                }
                consequent.push(self.parse_statement()?);
            }
            cases.push(self.finish(case_start, NodeKind::SwitchCase { test, consequent }));
        }
        self.expect("}")?;
        Ok(self.finish(start, NodeKind::SwitchStatement { discriminant, cases }))
    }

    fn parse_parenthesized(&mut self) -> Result<NodeId> {
        self.expect("(")?;
        let saved = std::mem::replace(&mut self.no_in, false);
        let expression = self.parse_expression()?;
        self.no_in = saved;
        self.expect(")")?;
        Ok(expression)
    }

    // ---- functions and classes ----

    fn parse_function(&mut self, declaration: bool) -> Result<NodeId> {
        let start = self.advance()?;
        let id = if self.at_kind(TokenKind::Identifier) { Some(self.parse_identifier()?) } else { None };
        let params = self.parse_params()?;
        let body = self.parse_block()?;
        let kind = match (declaration, id) {
            (true, Some(id)) => NodeKind::FunctionDeclaration { id, params, body },
            (true, None) => return Err(self.error_at(start, "function declaration requires a name")),
            (false, id) => NodeKind::FunctionExpression { id, params, body },
        };
        Ok(self.finish(start, kind))
    }

    fn parse_params(&mut self) -> Result<Vec<NodeId>> {
        self.expect("(")?;
        let mut params = Vec::new();
        while !self.at(")") {
            params.push(self.parse_binding_element()?);
            if !self.at(")") {
                self.expect(",")?;
            }
        }
        self.expect(")")?;
        Ok(params)
    }

    fn parse_binding_element(&mut self) -> Result<NodeId> {
        let start = self.current_id()?;
        if self.eat("...") {
            let argument = self.parse_binding_target()?;
            return Ok(self.finish(start, NodeKind::RestElement { argument }));
        }
        let left = self.parse_binding_target()?;
        if self.eat("=") {
            let right = self.parse_assign()?;
            return Ok(self.finish(start, NodeKind::AssignmentPattern { left, right }));
        }
        Ok(left)
    }

    fn parse_binding_target(&mut self) -> Result<NodeId> {
        if self.at("[") || self.at("{") {
            let literal = self.parse_primary()?;
            self.to_pattern(literal)?;
            Ok(literal)
        } else {
            self.parse_identifier()
        }
    }

    /// Parameter list and body of a method; the node starts at `(`.
    fn parse_method_function(&mut self) -> Result<NodeId> {
        let start = self.current_id()?;
        let params = self.parse_params()?;
        let body = self.parse_block()?;
        Ok(self.finish(start, NodeKind::FunctionExpression { id: None, params, body }))
    }

    fn parse_arrow(&mut self) -> Result<NodeId> {
        let start = self.current_id()?;
        let params = if self.at_kind(TokenKind::Identifier) {
            vec![self.parse_identifier()?]
        } else {
            self.parse_params()?
        };
        let arrow = self.expect("=>")?;
        let body = if self.at("{") { self.parse_block()? } else { self.parse_assign()? };
        Ok(self.finish(start, NodeKind::ArrowFunctionExpression { params, arrow, body }))
    }

    fn parse_class(&mut self, declaration: bool) -> Result<NodeId> {
        let start = self.advance()?;
        let id = if self.at_kind(TokenKind::Identifier) { Some(self.parse_identifier()?) } else { None };
        let super_class = if self.at_keyword("extends") {
            self.advance()?;
            Some(self.parse_lhs()?)
        } else {
            None
        };
        let body = self.parse_class_body()?;
        let kind = match (declaration, id) {
            (true, Some(id)) => NodeKind::ClassDeclaration { id, super_class, body },
            (true, None) => return Err(self.error_at(start, "class declaration requires a name")),
            (false, id) => NodeKind::ClassExpression { id, super_class, body },
        };
        Ok(self.finish(start, kind))
    }

    fn parse_class_body(&mut self) -> Result<NodeId> {
        let start = self.expect("{")?;
        let mut body = Vec::new();
        while !self.at("}") {
            if self.is_eof() {
                return Err(self.error("expected '}'"));
            }
            if self.eat(";") {
                continue;
            }
            let member_start = self.current_id()?;
            let is_static = self.at_word("static") && !self.peek_is(1, "(");
            if is_static {
                self.advance()?;
            }
            if (self.at_word("get") || self.at_word("set")) && !self.peek_is(1, "(") {
                self.advance()?;
            }
            let (key, computed) = self.parse_property_key()?;
            let value = self.parse_method_function()?;
            body.push(self.finish(member_start, NodeKind::MethodDefinition { key, value, computed, is_static }));
        }
        self.expect("}")?;
        Ok(self.finish(start, NodeKind::ClassBody { body }))
    }

    // ---- expressions ----

    fn parse_expression(&mut self) -> Result<NodeId> {
        let start = self.current_id()?;
        let first = self.parse_assign()?;
        if !self.at(",") {
            return Ok(first);
        }
        let mut expressions = vec![first];
        while self.eat(",") {
            expressions.push(self.parse_assign()?);
        }
        Ok(self.finish(start, NodeKind::SequenceExpression { expressions }))
    }

    fn parse_assign(&mut self) -> Result<NodeId> {
        if self.is_arrow_start() {
            return self.parse_arrow();
        }
        let start = self.current_id()?;
        let left = self.parse_conditional()?;
        let is_assignment = self
            .peek(0)
            .map_or(false, |t| t.kind == TokenKind::Punctuator && ASSIGNMENT_OPERATORS.contains(&t.text.as_str()));
        if !is_assignment {
            return Ok(left);
        }
        if self.at("=") {
            self.to_pattern(left)?;
        }
        let operator = self.advance()?;
        let right = self.parse_assign()?;
        Ok(self.finish(start, NodeKind::AssignmentExpression { left, operator, right }))
    }

    /// `x =>` or a parenthesized list followed by `=>`.
    fn is_arrow_start(&self) -> bool {
        if self.at_kind(TokenKind::Identifier) {
            return self.peek_is(1, "=>");
        }
        if !self.at("(") {
            return false;
        }
        let mut depth = 0usize;
        for (offset, id) in self.code[self.current..].iter().enumerate() {
            let token = self.token_at(*id);
            if token.is_punct("(") {
                depth += 1;
            } else if token.is_punct(")") {
                depth -= 1;
                if depth == 0 {
                    return self.peek_is(offset + 1, "=>");
                }
            }
        }
        false
    }

    fn parse_conditional(&mut self) -> Result<NodeId> {
        let start = self.current_id()?;
        let test = self.parse_binary(1)?;
        if !self.eat("?") {
            return Ok(test);
        }
        let saved = std::mem::replace(&mut self.no_in, false);
        let consequent = self.parse_assign()?;
        self.no_in = saved;
        self.expect(":")?;
        let alternate = self.parse_assign()?;
        Ok(self.finish(start, NodeKind::ConditionalExpression { test, consequent, alternate }))
    }

    fn binary_precedence(&self) -> Option<u8> {
        let token = self.peek(0)?;
        let precedence = match (token.kind, token.text.as_str()) {
            (TokenKind::Punctuator, "??") => 1,
            (TokenKind::Punctuator, "||") => 2,
            (TokenKind::Punctuator, "&&") => 3,
            (TokenKind::Punctuator, "|") => 4,
            (TokenKind::Punctuator, "^") => 5,
            (TokenKind::Punctuator, "&") => 6,
            (TokenKind::Punctuator, "==" | "!=" | "===" | "!==") => 7,
            (TokenKind::Punctuator, "<" | ">" | "<=" | ">=") => 8,
            (TokenKind::Keyword, "instanceof") => 8,
            (TokenKind::Keyword, "in") if !self.no_in => 8,
            (TokenKind::Punctuator, "<<" | ">>" | ">>>") => 9,
            (TokenKind::Punctuator, "+" | "-") => 10,
            (TokenKind::Punctuator, "*" | "/" | "%") => 11,
            (TokenKind::Punctuator, "**") => 12,
            _ => return None,
        };
        Some(precedence)
    }

    fn parse_binary(&mut self, min_precedence: u8) -> Result<NodeId> {
        let start = self.current_id()?;
        let mut left = self.parse_unary()?;
        while let Some(precedence) = self.binary_precedence().filter(|p| *p >= min_precedence) {
            let operator = self.advance()?;
            let op = self.token_at(operator).text.as_str();
            let next_min = if op == "**" { precedence } else { precedence + 1 };
            let right = self.parse_binary(next_min)?;
            let kind = if matches!(op, "||" | "&&" | "??") {
                NodeKind::LogicalExpression { left, operator, right }
            } else {
                NodeKind::BinaryExpression { left, operator, right }
            };
            left = self.finish(start, kind);
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<NodeId> {
        let start = self.current_id()?;
        let token = self.token_at(start);
        let is_unary = match token.kind {
            TokenKind::Punctuator => matches!(token.text.as_str(), "!" | "~" | "+" | "-"),
            TokenKind::Keyword => matches!(token.text.as_str(), "typeof" | "void" | "delete"),
            _ => false,
        };
        if is_unary {
            let operator = self.advance()?;
            let argument = self.parse_unary()?;
            return Ok(self.finish(start, NodeKind::UnaryExpression { operator, argument }));
        }
        if token.is_punct("++") || token.is_punct("--") {
            let operator = self.advance()?;
            let argument = self.parse_unary()?;
            return Ok(self.finish(start, NodeKind::UpdateExpression { operator, argument, prefix: true }));
        }
        let argument = self.parse_lhs()?;
        if (self.at("++") || self.at("--")) && !self.newline_before() {
            let operator = self.advance()?;
            return Ok(self.finish(start, NodeKind::UpdateExpression { operator, argument, prefix: false }));
        }
        Ok(argument)
    }

    /// Member accesses and calls over a primary or `new` expression.
    fn parse_lhs(&mut self) -> Result<NodeId> {
        let start = self.current_id()?;
        let mut expression = if self.at_keyword("new") { self.parse_new()? } else { self.parse_primary()? };
        loop {
            if self.at("(") {
                let arguments = self.parse_arguments()?;
                expression = self.finish(start, NodeKind::CallExpression { callee: expression, arguments });
            } else if let Some(member) = self.parse_member_suffix(start, expression)? {
                expression = member;
            } else {
                return Ok(expression);
            }
        }
    }

    fn parse_member_suffix(&mut self, start: TokenId, object: NodeId) -> Result<Option<NodeId>> {
        if self.eat(".") {
            let property = self.parse_property_name()?;
            return Ok(Some(self.finish(start, NodeKind::MemberExpression { object, property, computed: false })));
        }
        if self.eat("[") {
            let saved = std::mem::replace(&mut self.no_in, false);
            let property = self.parse_expression()?;
            self.no_in = saved;
            self.expect("]")?;
            return Ok(Some(self.finish(start, NodeKind::MemberExpression { object, property, computed: true })));
        }
        Ok(None)
    }

    fn parse_new(&mut self) -> Result<NodeId> {
        let start = self.advance()?;
        let callee_start = self.current_id()?;
        let mut callee = if self.at_keyword("new") { self.parse_new()? } else { self.parse_primary()? };
        while let Some(member) = self.parse_member_suffix(callee_start, callee)? {
            callee = member;
        }
        let arguments = if self.at("(") { self.parse_arguments()? } else { Vec::new() };
        Ok(self.finish(start, NodeKind::NewExpression { callee, arguments }))
    }

    fn parse_arguments(&mut self) -> Result<Vec<NodeId>> {
        self.expect("(")?;
        let saved = std::mem::replace(&mut self.no_in, false);
        let mut arguments = Vec::new();
        while !self.at(")") {
            arguments.push(self.parse_spread_or_assign()?);
            if !self.at(")") {
                self.expect(",")?;
            }
        }
        self.expect(")")?;
        self.no_in = saved;
        Ok(arguments)
    }

    fn parse_spread_or_assign(&mut self) -> Result<NodeId> {
        let start = self.current_id()?;
        if self.eat("...") {
            let argument = self.parse_assign()?;
            return Ok(self.finish(start, NodeKind::SpreadElement { argument }));
        }
        self.parse_assign()
    }

    fn parse_primary(&mut self) -> Result<NodeId> {
        let start = self.current_id()?;
        let token = self.token_at(start);
        match (token.kind, token.text.as_str()) {
            (TokenKind::Identifier, _) => self.parse_identifier(),
            (TokenKind::Numeric | TokenKind::String, _) | (TokenKind::Keyword, "true" | "false" | "null") => {
                self.advance()?;
                Ok(self.finish(start, NodeKind::Literal))
            }
            (TokenKind::Keyword, "this") => {
                self.advance()?;
                Ok(self.finish(start, NodeKind::ThisExpression))
            }
            (TokenKind::Keyword, "super") => {
                self.advance()?;
                Ok(self.finish(start, NodeKind::Identifier))
            }
            (TokenKind::Keyword, "function") => self.parse_function(false),
            (TokenKind::Keyword, "class") => self.parse_class(false),
            (TokenKind::Template, _) => self.parse_template(),
            (TokenKind::Punctuator, "(") => self.parse_parenthesized(),
            (TokenKind::Punctuator, "[") => self.parse_array(),
            (TokenKind::Punctuator, "{") => self.parse_object(),
            _ => Err(self.error_at(start, format!("unexpected token '{}'", token.text))),
        }
    }

    fn parse_identifier(&mut self) -> Result<NodeId> {
        let start = self.current_id()?;
        if !self.at_kind(TokenKind::Identifier) {
            return Err(self.error_at(start, "expected an identifier"));
        }
        self.advance()?;
        Ok(self.finish(start, NodeKind::Identifier))
    }

    /// Name after `.`; reserved words are allowed there.
    fn parse_property_name(&mut self) -> Result<NodeId> {
        let start = self.current_id()?;
        if !(self.at_kind(TokenKind::Identifier) || self.at_kind(TokenKind::Keyword)) {
            return Err(self.error_at(start, "expected a property name"));
        }
        self.advance()?;
        Ok(self.finish(start, NodeKind::Identifier))
    }

    fn parse_property_key(&mut self) -> Result<(NodeId, bool)> {
        let start = self.current_id()?;
        if self.eat("[") {
            let saved = std::mem::replace(&mut self.no_in, false);
            let key = self.parse_assign()?;
            self.no_in = saved;
            self.expect("]")?;
            return Ok((key, true));
        }
        let kind = match self.token_at(start).kind {
            TokenKind::Identifier | TokenKind::Keyword => NodeKind::Identifier,
            TokenKind::String | TokenKind::Numeric => NodeKind::Literal,
            _ => return Err(self.error_at(start, "expected a property key")),
        };
        self.advance()?;
        Ok((self.finish(start, kind), false))
    }

    fn parse_array(&mut self) -> Result<NodeId> {
        let start = self.expect("[")?;
        let saved = std::mem::replace(&mut self.no_in, false);
        let mut elements = Vec::new();
        while !self.at("]") {
            if self.eat(",") {
                elements.push(None);
                continue;
            }
            elements.push(Some(self.parse_spread_or_assign()?));
            if !self.at("]") {
                self.expect(",")?;
            }
        }
        self.expect("]")?;
        self.no_in = saved;
        Ok(self.finish(start, NodeKind::ArrayExpression { elements }))
    }

    fn parse_object(&mut self) -> Result<NodeId> {
        let start = self.expect("{")?;
        let saved = std::mem::replace(&mut self.no_in, false);
        let mut properties = Vec::new();
        while !self.at("}") {
            properties.push(self.parse_object_member()?);
            if !self.at("}") {
                self.expect(",")?;
            }
        }
        self.expect("}")?;
        self.no_in = saved;
        Ok(self.finish(start, NodeKind::ObjectExpression { properties }))
    }

    fn parse_object_member(&mut self) -> Result<NodeId> {
        let start = self.current_id()?;
        if self.eat("...") {
            let argument = self.parse_assign()?;
            return Ok(self.finish(start, NodeKind::SpreadElement { argument }));
        }
        let is_accessor = (self.at_word("get") || self.at_word("set"))
            && !matches!(self.peek(1), Some(t) if [":", "(", ",", "}", "="].iter().any(|p| t.is_punct(p)));
        if is_accessor {
            self.advance()?;
            let (key, computed) = self.parse_property_key()?;
            let value = self.parse_method_function()?;
            return Ok(self.finish(start, NodeKind::Property { key, value, computed, shorthand: false }));
        }

        let (key, computed) = self.parse_property_key()?;
        if self.eat(":") {
            let value = self.parse_assign()?;
            return Ok(self.finish(start, NodeKind::Property { key, value, computed, shorthand: false }));
        }
        if self.at("(") {
            let value = self.parse_method_function()?;
            return Ok(self.finish(start, NodeKind::Property { key, value, computed, shorthand: false }));
        }
        if computed || !self.token_at(start).kind.eq(&TokenKind::Identifier) {
            return Err(self.error("expected ':'"));
        }
        let value = if self.eat("=") {
            let right = self.parse_assign()?;
            self.finish(start, NodeKind::AssignmentPattern { left: key, right })
        } else {
            key
        };
        Ok(self.finish(start, NodeKind::Property { key, value, computed: false, shorthand: true }))
    }

    fn parse_template(&mut self) -> Result<NodeId> {
        let start = self.advance()?;
        let mut quasis = vec![start];
        let mut expressions = Vec::new();
        let mut open = self.token_at(start).text.ends_with("${");
        while open {
            let saved = std::mem::replace(&mut self.no_in, false);
            expressions.push(self.parse_expression()?);
            self.no_in = saved;
            if !self.at_kind(TokenKind::Template) {
                return Err(self.error("expected the rest of the template literal"));
            }
            let quasi = self.advance()?;
            quasis.push(quasi);
            open = self.token_at(quasi).text.ends_with("${");
        }
        Ok(self.finish(start, NodeKind::TemplateLiteral { quasis, expressions }))
    }

    /// Reinterprets an expression in assignment-target position as a pattern.
    fn to_pattern(&mut self, id: NodeId) -> Result<()> {
        let kind = self.arena.node(id).kind.clone();
        let converted = match kind {
            NodeKind::ArrayExpression { elements } => {
                for element in elements.iter().flatten() {
                    self.to_pattern(*element)?;
                }
                NodeKind::ArrayPattern { elements }
            }
            NodeKind::ObjectExpression { properties } => {
                for property in &properties {
                    match self.arena.node(*property).kind.clone() {
                        NodeKind::Property { value, .. } => self.to_pattern(value)?,
                        _ => self.to_pattern(*property)?,
                    }
                }
                NodeKind::ObjectPattern { properties }
            }
            NodeKind::SpreadElement { argument } => {
                self.to_pattern(argument)?;
                NodeKind::RestElement { argument }
            }
            NodeKind::AssignmentExpression { left, operator, right } if self.token_at(operator).is_punct("=") => {
                NodeKind::AssignmentPattern { left, right }
            }
            NodeKind::Identifier
            | NodeKind::MemberExpression { .. }
            | NodeKind::ArrayPattern { .. }
            | NodeKind::ObjectPattern { .. }
            | NodeKind::AssignmentPattern { .. }
            | NodeKind::RestElement { .. } => return Ok(()),
            _ => {
                let first = TokenId(self.arena.node(id).range.start);
                return Err(self.error_at(first, "invalid assignment target"));
            }
        };
        self.arena.node_mut(id).kind = converted;
        Ok(())
    }

    // ---- token cursor ----

    fn token_at(&self, id: TokenId) -> &'a Token {
        &self.tokens[id.index()]
    }

    fn peek(&self, ahead: usize) -> Option<&'a Token> {
        self.code.get(self.current + ahead).map(|id| self.token_at(*id))
    }

    fn peek_is(&self, ahead: usize, punct: &str) -> bool {
        self.peek(ahead).map_or(false, |t| t.is_punct(punct))
    }

    fn is_eof(&self) -> bool {
        self.current >= self.code.len()
    }

    fn current_id(&self) -> Result<TokenId> {
        self.code.get(self.current).copied().ok_or_else(|| self.error("unexpected end of input"))
    }

    fn advance(&mut self) -> Result<TokenId> {
        let id = self.current_id()?;
        self.current += 1;
        Ok(id)
    }

    fn at(&self, punct: &str) -> bool {
        self.peek_is(0, punct)
    }

    fn at_keyword(&self, keyword: &str) -> bool {
        self.peek(0).map_or(false, |t| t.is_keyword(keyword))
    }

    /// Contextual word such as `of` or `get`, lexed as an identifier.
    fn at_word(&self, word: &str) -> bool {
        self.peek(0).map_or(false, |t| t.kind == TokenKind::Identifier && t.text == word)
    }

    fn at_kind(&self, kind: TokenKind) -> bool {
        self.peek(0).map_or(false, |t| t.kind == kind)
    }

    fn eat(&mut self, punct: &str) -> bool {
        if self.at(punct) {
            self.current += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, punct: &str) -> Result<TokenId> {
        if self.at(punct) {
            self.advance()
        } else {
            Err(self.error(format!("expected '{}'", punct)))
        }
    }

    fn expect_keyword(&mut self, keyword: &str) -> Result<TokenId> {
        if self.at_keyword(keyword) {
            self.advance()
        } else {
            Err(self.error(format!("expected '{}'", keyword)))
        }
    }

    /// A line break separates the previous token from the current one.
    fn newline_before(&self) -> bool {
        match (self.current.checked_sub(1).and_then(|i| self.code.get(i)), self.peek(0)) {
            (Some(previous), Some(current)) => current.start().line > self.token_at(*previous).end().line,
            _ => false,
        }
    }

    fn at_statement_end(&self) -> bool {
        self.is_eof() || self.at(";") || self.at("}") || self.newline_before()
    }

    fn consume_semicolon(&mut self) -> Result<()> {
        if self.eat(";") || self.at_statement_end() {
            Ok(())
        } else {
            Err(self.error("expected ';'"))
        }
    }

    /// Allocates a node spanning `start` through the last consumed token.
    fn finish(&mut self, start: TokenId, kind: NodeKind) -> NodeId {
        let last = self.code[self.current - 1];
        self.arena.alloc(kind, TokenRange::inclusive(start, last))
    }

    fn error(&self, message: impl Into<String>) -> IndentError {
        let position = match self.peek(0) {
            Some(token) => token.start(),
            None => self.lines.to_position(self.text, self.text.len()),
        };
        IndentError::parse(position, message)
    }

    fn error_at(&self, id: TokenId, message: impl Into<String>) -> IndentError {
        IndentError::parse(self.token_at(id).start(), message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::tokenize;

    fn parse(text: &str) -> (Vec<Token>, Arena, NodeId) {
        let lines = LineIndex::new(text);
        let tokens = tokenize(text, &lines).unwrap();
        let (arena, root) = SyntaxAnalyzer::new(text, &lines, &tokens).parse_program().unwrap();
        (tokens, arena, root)
    }

    fn body(arena: &Arena, root: NodeId) -> Vec<NodeId> {
        match &arena.node(root).kind {
            NodeKind::Program { body } => body.clone(),
            other => panic!("not a program: {:?}", other),
        }
    }

    #[test]
    fn test_automatic_semicolons() {
        let (_, arena, root) = parse("a = 1\nb = 2\nif (a) { c() }");
        assert_eq!(body(&arena, root).len(), 3);
    }

    #[test]
    fn test_parenthesized_ranges_exclude_parens() {
        let (tokens, arena, root) = parse("x = (a + b);");
        let statement = body(&arena, root)[0];
        let NodeKind::ExpressionStatement { expression } = arena.node(statement).kind.clone() else {
            panic!("expected an expression statement");
        };
        let NodeKind::AssignmentExpression { right, .. } = arena.node(expression).kind.clone() else {
            panic!("expected an assignment");
        };
        let range = arena.node(right).range;
        assert_eq!(tokens[range.start as usize].text, "a");
        assert_eq!(tokens[range.end as usize - 1].text, "b");
    }

    #[test]
    fn test_arrow_and_destructuring() {
        let (_, arena, root) = parse("const f = ({a, b = 2}, ...rest) => a;\n[x, y] = [y, x];");
        let statements = body(&arena, root);
        assert!(matches!(arena.node(statements[0]).kind, NodeKind::VariableDeclaration { kind: DeclarationKind::Const, .. }));
        assert!(arena.iter().any(|(_, n)| matches!(n.kind, NodeKind::ObjectPattern { .. })));
        assert!(arena.iter().any(|(_, n)| matches!(n.kind, NodeKind::ArrayPattern { .. })));
        assert!(arena.iter().any(|(_, n)| matches!(n.kind, NodeKind::RestElement { .. })));
    }

    #[test]
    fn test_for_in_and_of() {
        let (_, arena, root) = parse("for (var k in o) {}\nfor (const v of list) {}\nfor (i = 0; i < n; i++) {}");
        let kinds: Vec<_> = body(&arena, root).into_iter().map(|id| arena.node(id).kind.clone()).collect();
        assert!(matches!(kinds[0], NodeKind::ForInStatement { .. }));
        assert!(matches!(kinds[1], NodeKind::ForOfStatement { .. }));
        assert!(matches!(kinds[2], NodeKind::ForStatement { .. }));
    }

    #[test]
    fn test_parent_links() {
        let (_, arena, root) = parse("foo(bar, [1, 2]);");
        for (id, node) in arena.iter() {
            if id == root {
                assert!(node.parent.is_none());
            } else {
                let parent = node.parent.expect("every non-root node has a parent");
                assert!(arena.node(parent).kind.children().contains(&id));
            }
        }
    }

    #[test]
    fn test_template_literal() {
        let (_, arena, _) = parse("s = `a${b}c${d}e`;");
        let template = arena
            .iter()
            .find_map(|(_, n)| match &n.kind {
                NodeKind::TemplateLiteral { quasis, expressions } => Some((quasis.len(), expressions.len())),
                _ => None,
            })
            .unwrap();
        assert_eq!(template, (3, 2));
    }

    #[test]
    fn test_syntax_error_position() {
        let text = "if (a {\n}";
        let lines = LineIndex::new(text);
        let tokens = tokenize(text, &lines).unwrap();
        let err = SyntaxAnalyzer::new(text, &lines, &tokens).parse_program().unwrap_err();
        assert_eq!(err.position().map(|p| p.line), Some(1));
        assert!(err.to_string().contains("expected ')'"));
    }
}
