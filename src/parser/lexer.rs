/*!
# JavaScript Lexical Analyzer

Logos-based tokenizer producing the ordered token+comment stream the indent
engine works on. Template literals are split into their static segments
(`` `a${ ``, `}b${`, `` }c` ``); a brace stack tells a `}` that closes a
substitution from one that closes a block. Regular expression literals are
not recognised: `/` is always a punctuator.
*/

use logos::Logos;

use crate::ast_core::{Token, TokenKind};
use crate::core::errors::{IndentError, Result};
use crate::core::position::LineIndex;

/// Raw lexemes, before keyword classification
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f\u{0B}\u{A0}\u{FEFF}]+")]
enum RawToken {
    #[token("{")]
    LeftBrace,
    #[token("}")]
    RightBrace,
    #[token("`")]
    Backtick,

    #[token("(")]
    #[token(")")]
    #[token("[")]
    #[token("]")]
    #[token(";")]
    #[token(",")]
    #[token(".")]
    #[token("...")]
    #[token(":")]
    #[token("?")]
    #[token("??")]
    #[token("=>")]
    #[token("<")]
    #[token(">")]
    #[token("<=")]
    #[token(">=")]
    #[token("==")]
    #[token("!=")]
    #[token("===")]
    #[token("!==")]
    #[token("+")]
    #[token("-")]
    #[token("*")]
    #[token("/")]
    #[token("%")]
    #[token("**")]
    #[token("++")]
    #[token("--")]
    #[token("<<")]
    #[token(">>")]
    #[token(">>>")]
    #[token("&")]
    #[token("|")]
    #[token("^")]
    #[token("!")]
    #[token("~")]
    #[token("&&")]
    #[token("||")]
    #[token("=")]
    #[token("+=")]
    #[token("-=")]
    #[token("*=")]
    #[token("/=")]
    #[token("%=")]
    #[token("**=")]
    #[token("<<=")]
    #[token(">>=")]
    #[token(">>>=")]
    #[token("&=")]
    #[token("|=")]
    #[token("^=")]
    #[token("&&=")]
    #[token("||=")]
    #[token("??=")]
    Punctuator,

    #[regex(r"[A-Za-z_$][A-Za-z0-9_$]*")]
    Word,

    #[regex(r"[0-9][0-9_]*(\.[0-9_]*)?([eE][+-]?[0-9]+)?n?")]
    #[regex(r"\.[0-9][0-9_]*([eE][+-]?[0-9]+)?")]
    #[regex(r"0[xXoObB][0-9a-fA-F_]+n?")]
    Numeric,

    #[regex(r#""([^"\\\n]|\\.|\\\n)*""#)]
    #[regex(r"'([^'\\\n]|\\.|\\\n)*'")]
    String,

    #[regex(r"//[^\n]*")]
    LineComment,

    #[token("/*", block_comment)]
    BlockComment,
}

fn block_comment(lex: &mut logos::Lexer<RawToken>) -> bool {
    match lex.remainder().find("*/") {
        Some(end) => {
            lex.bump(end + 2);
            true
        }
        None => false,
    }
}

const KEYWORDS: &[&str] = &[
    "break", "case", "catch", "class", "const", "continue", "debugger", "default", "delete", "do",
    "else", "export", "extends", "false", "finally", "for", "function", "if", "import", "in",
    "instanceof", "let", "new", "null", "return", "super", "switch", "this", "throw", "true",
    "try", "typeof", "var", "void", "while", "with", "yield",
];

pub fn is_keyword(word: &str) -> bool {
    KEYWORDS.contains(&word)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Brace {
    Block,
    Substitution,
}

/// Length of a template segment body starting right after `` ` `` or `}`,
/// and whether it ends by opening a `${` substitution.
fn scan_template(rest: &str) -> Option<(usize, bool)> {
    let mut chars = rest.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '`' => return Some((i + 1, false)),
            '$' if matches!(chars.peek(), Some((_, '{'))) => return Some((i + 2, true)),
            _ => {}
        }
    }
    None
}

/// Tokenizes JavaScript source text, comments included, in source order.
pub fn tokenize(text: &str, lines: &LineIndex) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut braces: Vec<Brace> = Vec::new();
    let mut lexer = RawToken::lexer(text);

    while let Some(result) = lexer.next() {
        let start = lexer.span().start;
        let kind = match result {
            Ok(RawToken::LeftBrace) => {
                braces.push(Brace::Block);
                TokenKind::Punctuator
            }
            Ok(RawToken::RightBrace) if braces.last() == Some(&Brace::Substitution) => {
                braces.pop();
                continue_template(&mut lexer, &mut braces, text, lines)?;
                TokenKind::Template
            }
            Ok(RawToken::RightBrace) => {
                braces.pop();
                TokenKind::Punctuator
            }
            Ok(RawToken::Backtick) => {
                continue_template(&mut lexer, &mut braces, text, lines)?;
                TokenKind::Template
            }
            Ok(RawToken::Punctuator) => TokenKind::Punctuator,
            Ok(RawToken::Word) if is_keyword(lexer.slice()) => TokenKind::Keyword,
            Ok(RawToken::Word) => TokenKind::Identifier,
            Ok(RawToken::Numeric) => TokenKind::Numeric,
            Ok(RawToken::String) => TokenKind::String,
            Ok(RawToken::LineComment) => TokenKind::LineComment,
            Ok(RawToken::BlockComment) => TokenKind::BlockComment,
            Err(()) => {
                let position = lines.to_position(text, start);
                let found = lexer.slice();
                return Err(match found.chars().next() {
                    Some('/') if found.starts_with("/*") => {
                        IndentError::Unterminated { position, what: "block comment" }
                    }
                    Some('"') | Some('\'') => IndentError::Unterminated { position, what: "string literal" },
                    _ => IndentError::Lex { position, found: found.to_string() },
                });
            }
        };
        let range = lexer.span();
        tokens.push(Token::new(kind, &text[range.clone()], lines.span(text, range)));
    }

    if braces.contains(&Brace::Substitution) {
        return Err(IndentError::Unterminated {
            position: lines.to_position(text, text.len()),
            what: "template substitution",
        });
    }
    tracing::trace!("Lexed {} tokens", tokens.len());
    Ok(tokens)
}

fn continue_template(
    lexer: &mut logos::Lexer<RawToken>,
    braces: &mut Vec<Brace>,
    text: &str,
    lines: &LineIndex,
) -> Result<()> {
    let (len, opens) = scan_template(lexer.remainder()).ok_or_else(|| IndentError::Unterminated {
        position: lines.to_position(text, lexer.span().start),
        what: "template literal",
    })?;
    lexer.bump(len);
    if opens {
        braces.push(Brace::Substitution);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lex(text: &str) -> Vec<(TokenKind, String)> {
        let lines = LineIndex::new(text);
        tokenize(text, &lines)
            .unwrap()
            .into_iter()
            .map(|t| (t.kind, t.text))
            .collect()
    }

    #[test]
    fn test_basic_tokenization() {
        let tokens = lex("var a = b >>>= 1;");
        assert_eq!(
            tokens,
            vec![
                (TokenKind::Keyword, "var".to_string()),
                (TokenKind::Identifier, "a".to_string()),
                (TokenKind::Punctuator, "=".to_string()),
                (TokenKind::Identifier, "b".to_string()),
                (TokenKind::Punctuator, ">>>=".to_string()),
                (TokenKind::Numeric, "1".to_string()),
                (TokenKind::Punctuator, ";".to_string()),
            ]
        );
    }

    #[test]
    fn test_comments_are_kept() {
        let tokens = lex("a // tail\n/* block\n */ b");
        let kinds: Vec<_> = tokens.iter().map(|(k, _)| *k).collect();
        assert_eq!(
            kinds,
            vec![TokenKind::Identifier, TokenKind::LineComment, TokenKind::BlockComment, TokenKind::Identifier]
        );
        assert_eq!(tokens[2].1, "/* block\n */");
    }

    #[test]
    fn test_template_segments() {
        let tokens = lex("`a${ {x: 1}.x }b${c}d`");
        let texts: Vec<_> = tokens.iter().map(|(_, t)| t.as_str()).collect();
        assert_eq!(texts, vec!["`a${", "{", "x", ":", "1", "}", ".", "x", "}b${", "c", "}d`"]);
        assert_eq!(tokens[0].0, TokenKind::Template);
        assert_eq!(tokens[10].0, TokenKind::Template);
    }

    #[test]
    fn test_positions_are_tracked() {
        let text = "if (a) {\n\tfoo();\n}";
        let lines = LineIndex::new(text);
        let tokens = tokenize(text, &lines).unwrap();
        let foo = tokens.iter().find(|t| t.text == "foo").unwrap();
        assert_eq!(foo.start().line, 2);
        assert_eq!(foo.start().column, 1);
    }

    #[test]
    fn test_unterminated_input() {
        let lines = LineIndex::new("/* open");
        assert!(matches!(
            tokenize("/* open", &lines),
            Err(IndentError::Unterminated { what: "block comment", .. })
        ));
        let lines = LineIndex::new("`abc");
        assert!(matches!(
            tokenize("`abc", &lines),
            Err(IndentError::Unterminated { what: "template literal", .. })
        ));
    }

    #[test]
    fn test_empty_input() {
        assert!(lex("").is_empty());
        assert!(lex("  \n\t\n").is_empty());
    }
}
