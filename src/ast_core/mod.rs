//! Arena-backed syntax tree over a token stream.
//!
//! `SourceFile` is the input of the indent engine: raw text, its line
//! index, the ordered token+comment stream and a parent-linked node arena.
//! Tokens and nodes are addressed by dense ids; per-token side tables are
//! plain `Vec`s indexed by `TokenId`.

pub mod token;

pub use token::{Token, TokenId, TokenKind, TokenRange};

use serde::Serialize;

use crate::core::position::LineIndex;

/// Stable node identifier inside one arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct NodeId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DeclarationKind {
    Var,
    Let,
    Const,
}

impl DeclarationKind {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "var" => Some(Self::Var),
            "let" => Some(Self::Let),
            "const" => Some(Self::Const),
            _ => None,
        }
    }
}

/// Closed set of syntactic constructs, ESTree-shaped. Node token ranges
/// never include wrapping parentheses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum NodeKind {
    Program { body: Vec<NodeId> },
    EmptyStatement,
    ExpressionStatement { expression: NodeId },
    BlockStatement { body: Vec<NodeId> },
    VariableDeclaration { kind: DeclarationKind, declarations: Vec<NodeId> },
    VariableDeclarator { id: NodeId, init: Option<NodeId> },
    FunctionDeclaration { id: NodeId, params: Vec<NodeId>, body: NodeId },
    FunctionExpression { id: Option<NodeId>, params: Vec<NodeId>, body: NodeId },
    ArrowFunctionExpression { params: Vec<NodeId>, arrow: TokenId, body: NodeId },
    ClassDeclaration { id: NodeId, super_class: Option<NodeId>, body: NodeId },
    ClassExpression { id: Option<NodeId>, super_class: Option<NodeId>, body: NodeId },
    ClassBody { body: Vec<NodeId> },
    MethodDefinition { key: NodeId, value: NodeId, computed: bool, is_static: bool },
    ReturnStatement { argument: Option<NodeId> },
    BreakStatement { label: Option<NodeId> },
    ContinueStatement { label: Option<NodeId> },
    ThrowStatement { argument: NodeId },
    TryStatement { block: NodeId, handler: Option<NodeId>, finalizer: Option<NodeId> },
    CatchClause { param: Option<NodeId>, body: NodeId },
    IfStatement { test: NodeId, consequent: NodeId, alternate: Option<NodeId> },
    ForStatement { init: Option<NodeId>, test: Option<NodeId>, update: Option<NodeId>, body: NodeId },
    ForInStatement { left: NodeId, right: NodeId, body: NodeId },
    ForOfStatement { left: NodeId, right: NodeId, body: NodeId },
    WhileStatement { test: NodeId, body: NodeId },
    DoWhileStatement { body: NodeId, test: NodeId },
    SwitchStatement { discriminant: NodeId, cases: Vec<NodeId> },
    SwitchCase { test: Option<NodeId>, consequent: Vec<NodeId> },
    Identifier,
    Literal,
    ThisExpression,
    TemplateLiteral { quasis: Vec<TokenId>, expressions: Vec<NodeId> },
    ArrayExpression { elements: Vec<Option<NodeId>> },
    ArrayPattern { elements: Vec<Option<NodeId>> },
    ObjectExpression { properties: Vec<NodeId> },
    ObjectPattern { properties: Vec<NodeId> },
    Property { key: NodeId, value: NodeId, computed: bool, shorthand: bool },
    SpreadElement { argument: NodeId },
    RestElement { argument: NodeId },
    AssignmentPattern { left: NodeId, right: NodeId },
    CallExpression { callee: NodeId, arguments: Vec<NodeId> },
    NewExpression { callee: NodeId, arguments: Vec<NodeId> },
    MemberExpression { object: NodeId, property: NodeId, computed: bool },
    UnaryExpression { operator: TokenId, argument: NodeId },
    UpdateExpression { operator: TokenId, argument: NodeId, prefix: bool },
    BinaryExpression { left: NodeId, operator: TokenId, right: NodeId },
    LogicalExpression { left: NodeId, operator: TokenId, right: NodeId },
    AssignmentExpression { left: NodeId, operator: TokenId, right: NodeId },
    ConditionalExpression { test: NodeId, consequent: NodeId, alternate: NodeId },
    SequenceExpression { expressions: Vec<NodeId> },
}

impl NodeKind {
    /// Direct children in source order.
    pub fn children(&self) -> Vec<NodeId> {
        use NodeKind::*;
        let mut out = Vec::new();
        match self {
            Program { body } | BlockStatement { body } | ClassBody { body } => out.extend(body),
            EmptyStatement | Identifier | Literal | ThisExpression => {}
            ExpressionStatement { expression } => out.push(*expression),
            VariableDeclaration { declarations, .. } => out.extend(declarations),
            VariableDeclarator { id, init } => {
                out.push(*id);
                out.extend(init);
            }
            FunctionDeclaration { id, params, body } => {
                out.push(*id);
                out.extend(params);
                out.push(*body);
            }
            FunctionExpression { id, params, body } => {
                out.extend(id);
                out.extend(params);
                out.push(*body);
            }
            ArrowFunctionExpression { params, body, .. } => {
                out.extend(params);
                out.push(*body);
            }
            ClassDeclaration { id, super_class, body } => {
                out.push(*id);
                out.extend(super_class);
                out.push(*body);
            }
            ClassExpression { id, super_class, body } => {
                out.extend(id);
                out.extend(super_class);
                out.push(*body);
            }
            MethodDefinition { key, value, .. } => out.extend([*key, *value]),
            ReturnStatement { argument } => out.extend(argument),
            BreakStatement { label } | ContinueStatement { label } => out.extend(label),
            ThrowStatement { argument } => out.push(*argument),
            TryStatement { block, handler, finalizer } => {
                out.push(*block);
                out.extend(handler);
                out.extend(finalizer);
            }
            CatchClause { param, body } => {
                out.extend(param);
                out.push(*body);
            }
            IfStatement { test, consequent, alternate } => {
                out.extend([*test, *consequent]);
                out.extend(alternate);
            }
            ForStatement { init, test, update, body } => {
                out.extend(init);
                out.extend(test);
                out.extend(update);
                out.push(*body);
            }
            ForInStatement { left, right, body } | ForOfStatement { left, right, body } => {
                out.extend([*left, *right, *body])
            }
            WhileStatement { test, body } => out.extend([*test, *body]),
            DoWhileStatement { body, test } => out.extend([*body, *test]),
            SwitchStatement { discriminant, cases } => {
                out.push(*discriminant);
                out.extend(cases);
            }
            SwitchCase { test, consequent } => {
                out.extend(test);
                out.extend(consequent);
            }
            TemplateLiteral { expressions, .. } => out.extend(expressions),
            ArrayExpression { elements } | ArrayPattern { elements } => {
                out.extend(elements.iter().flatten())
            }
            ObjectExpression { properties } | ObjectPattern { properties } => out.extend(properties),
            // shorthand: value is the key itself or a default pattern around it
            Property { key, value, shorthand, .. } => {
                if !*shorthand {
                    out.push(*key);
                }
                out.push(*value);
            }
            SpreadElement { argument } | RestElement { argument } => out.push(*argument),
            UnaryExpression { argument, .. } | UpdateExpression { argument, .. } => out.push(*argument),
            AssignmentPattern { left, right }
            | BinaryExpression { left, right, .. }
            | LogicalExpression { left, right, .. }
            | AssignmentExpression { left, right, .. } => out.extend([*left, *right]),
            CallExpression { callee, arguments } | NewExpression { callee, arguments } => {
                out.push(*callee);
                out.extend(arguments);
            }
            MemberExpression { object, property, .. } => out.extend([*object, *property]),
            ConditionalExpression { test, consequent, alternate } => {
                out.extend([*test, *consequent, *alternate])
            }
            SequenceExpression { expressions } => out.extend(expressions),
        }
        out
    }

    /// Parents whose statements form a list (a block in these positions is a
    /// plain statement, not a construct body).
    pub fn is_statement_list(&self) -> bool {
        matches!(self, NodeKind::Program { .. } | NodeKind::BlockStatement { .. } | NodeKind::SwitchCase { .. })
    }
}

/// Node in the arena.
#[derive(Debug, Clone, Serialize)]
pub struct AstNode {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub range: TokenRange,
}

/// Owner of all nodes of one file.
#[derive(Default, Debug, Clone)]
pub struct Arena {
    nodes: Vec<AstNode>,
}

impl Arena {
    pub fn new() -> Self { Self { nodes: Vec::new() } }

    /// Allocate a node and link its children back to it.
    pub fn alloc(&mut self, kind: NodeKind, range: TokenRange) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        for child in kind.children() {
            self.nodes[child.0 as usize].parent = Some(id);
        }
        self.nodes.push(AstNode { kind, parent: None, range });
        id
    }

    pub fn node(&self, id: NodeId) -> &AstNode { &self.nodes[id.0 as usize] }
    pub fn node_mut(&mut self, id: NodeId) -> &mut AstNode { &mut self.nodes[id.0 as usize] }
    pub fn len(&self) -> usize { self.nodes.len() }
    pub fn is_empty(&self) -> bool { self.nodes.is_empty() }

    #[cfg(test)]
    pub(crate) fn iter(&self) -> impl Iterator<Item = (NodeId, &AstNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i as u32), n))
    }
}

/// One parsed file, as handed to the indent engine.
#[derive(Debug, Clone)]
pub struct SourceFile {
    text: String,
    lines: LineIndex,
    tokens: Vec<Token>,
    arena: Arena,
    root: NodeId,
}

impl SourceFile {
    pub fn new(text: String, lines: LineIndex, tokens: Vec<Token>, arena: Arena, root: NodeId) -> Self {
        Self { text, lines, tokens, arena, root }
    }

    pub fn text(&self) -> &str { &self.text }
    pub fn lines(&self) -> &LineIndex { &self.lines }
    pub fn line_count(&self) -> usize { self.lines.line_count() }
    pub fn tokens(&self) -> &[Token] { &self.tokens }
    pub fn token(&self, id: TokenId) -> &Token { &self.tokens[id.index()] }
    pub fn root(&self) -> NodeId { self.root }
    pub fn node(&self, id: NodeId) -> &AstNode { self.arena.node(id) }
    pub fn kind(&self, id: NodeId) -> &NodeKind { &self.arena.node(id).kind }
    pub fn parent(&self, id: NodeId) -> Option<NodeId> { self.arena.node(id).parent }

    pub fn node_range(&self, id: NodeId) -> TokenRange { self.arena.node(id).range }

    /// First token of a non-empty node.
    pub fn first_token(&self, id: NodeId) -> TokenId {
        TokenId(self.arena.node(id).range.start)
    }

    /// Last token of a non-empty node.
    pub fn last_token(&self, id: NodeId) -> TokenId {
        TokenId(self.arena.node(id).range.end - 1)
    }

    /// Nearest non-comment token before `id`.
    pub fn prev_code_token(&self, id: TokenId) -> Option<TokenId> {
        (0..id.0).rev().map(TokenId).find(|t| !self.token(*t).is_comment())
    }

    /// Nearest non-comment token after `id`.
    pub fn next_code_token(&self, id: TokenId) -> Option<TokenId> {
        (id.0 + 1..self.tokens.len() as u32).map(TokenId).find(|t| !self.token(*t).is_comment())
    }

    /// Nearest non-comment token before `id` matching `pred`.
    pub fn find_code_token_before(&self, id: TokenId, pred: impl Fn(&Token) -> bool) -> Option<TokenId> {
        let mut cursor = self.prev_code_token(id);
        while let Some(token) = cursor {
            if pred(self.token(token)) {
                return Some(token);
            }
            cursor = self.prev_code_token(token);
        }
        None
    }

    /// Nearest non-comment token after `id` matching `pred`.
    pub fn find_code_token_after(&self, id: TokenId, pred: impl Fn(&Token) -> bool) -> Option<TokenId> {
        let mut cursor = self.next_code_token(id);
        while let Some(token) = cursor {
            if pred(self.token(token)) {
                return Some(token);
            }
            cursor = self.next_code_token(token);
        }
        None
    }

    pub fn is_punct(&self, id: TokenId, value: &str) -> bool {
        self.token(id).is_punct(value)
    }

    pub fn same_line(&self, a: TokenId, b: TokenId) -> bool {
        self.token(a).start().line == self.token(b).start().line
    }
}
