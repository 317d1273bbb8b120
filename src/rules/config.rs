/*!
# Indent Rule Configuration

Option structures for the indent rule and their loading from TOML, YAML
or JSON files. Keys are camel-cased, with the PascalCase node names
(`SwitchCase`, `VariableDeclarator`, ...) accepted as aliases. Every option
has a default so a partial file only overrides what it names; unknown keys
are rejected.
*/

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::ast_core::DeclarationKind;
use crate::core::errors::IndentError;

/// Upper bound accepted for any level option
pub const MAX_LEVEL: u32 = 16;
/// Upper bound accepted for the indent width
pub const MAX_INDENT_WIDTH: usize = 16;

/// Indentation unit: `n` spaces or one tab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawIndent", into = "RawIndent")]
pub enum IndentStyle {
    Spaces(usize),
    Tab,
}

impl IndentStyle {
    pub fn indent_char(self) -> char {
        match self {
            IndentStyle::Spaces(_) => ' ',
            IndentStyle::Tab => '\t',
        }
    }

    /// Characters per level
    pub fn width(self) -> usize {
        match self {
            IndentStyle::Spaces(width) => width,
            IndentStyle::Tab => 1,
        }
    }
}

impl Default for IndentStyle {
    fn default() -> Self {
        IndentStyle::Spaces(4)
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawIndent {
    Width(usize),
    Keyword(String),
}

impl TryFrom<RawIndent> for IndentStyle {
    type Error = String;

    fn try_from(raw: RawIndent) -> std::result::Result<Self, Self::Error> {
        match raw {
            RawIndent::Width(width) => Ok(IndentStyle::Spaces(width)),
            RawIndent::Keyword(word) if word == "tab" => Ok(IndentStyle::Tab),
            RawIndent::Keyword(word) => Err(format!("expected \"tab\" or a width, found \"{}\"", word)),
        }
    }
}

impl From<IndentStyle> for RawIndent {
    fn from(style: IndentStyle) -> Self {
        match style {
            IndentStyle::Spaces(width) => RawIndent::Width(width),
            IndentStyle::Tab => RawIndent::Keyword("tab".to_string()),
        }
    }
}

/// Level policy for a list-like construct
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawLevel", into = "RawLevel")]
pub enum ListIndent {
    /// Offset every element N levels from the opening delimiter
    Levels(u32),
    /// Align elements with the column of the first element
    First,
    /// Leave element indentation unchecked
    Off,
}

impl ListIndent {
    /// Numeric level, with 1 standing in for the keyword policies.
    pub fn levels_or_one(self) -> u32 {
        match self {
            ListIndent::Levels(levels) => levels,
            ListIndent::First | ListIndent::Off => 1,
        }
    }
}

impl Default for ListIndent {
    fn default() -> Self {
        ListIndent::Levels(1)
    }
}

impl fmt::Display for ListIndent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListIndent::Levels(levels) => write!(f, "{}", levels),
            ListIndent::First => write!(f, "first"),
            ListIndent::Off => write!(f, "off"),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawLevel {
    Levels(u32),
    Keyword(String),
}

impl TryFrom<RawLevel> for ListIndent {
    type Error = String;

    fn try_from(raw: RawLevel) -> std::result::Result<Self, Self::Error> {
        match raw {
            RawLevel::Levels(levels) => Ok(ListIndent::Levels(levels)),
            RawLevel::Keyword(word) => match word.as_str() {
                "first" => Ok(ListIndent::First),
                "off" => Ok(ListIndent::Off),
                _ => Err(format!("expected a number, \"first\" or \"off\", found \"{}\"", word)),
            },
        }
    }
}

impl From<ListIndent> for RawLevel {
    fn from(level: ListIndent) -> Self {
        match level {
            ListIndent::Levels(levels) => RawLevel::Levels(levels),
            ListIndent::First => RawLevel::Keyword("first".to_string()),
            ListIndent::Off => RawLevel::Keyword("off".to_string()),
        }
    }
}

/// Declarator level per declaration keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawDeclarator", into = "RawDeclarator")]
pub struct DeclaratorLevels {
    pub var: ListIndent,
    pub let_: ListIndent,
    pub const_: ListIndent,
}

impl DeclaratorLevels {
    pub fn uniform(level: ListIndent) -> Self {
        Self { var: level, let_: level, const_: level }
    }

    pub fn for_kind(&self, kind: DeclarationKind) -> ListIndent {
        match kind {
            DeclarationKind::Var => self.var,
            DeclarationKind::Let => self.let_,
            DeclarationKind::Const => self.const_,
        }
    }
}

impl Default for DeclaratorLevels {
    fn default() -> Self {
        Self::uniform(ListIndent::Levels(1))
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawDeclarator {
    Uniform(ListIndent),
    PerKind {
        #[serde(default)]
        var: ListIndent,
        #[serde(default, rename = "let")]
        let_: ListIndent,
        #[serde(default, rename = "const")]
        const_: ListIndent,
    },
}

impl From<RawDeclarator> for DeclaratorLevels {
    fn from(raw: RawDeclarator) -> Self {
        match raw {
            RawDeclarator::Uniform(level) => DeclaratorLevels::uniform(level),
            RawDeclarator::PerKind { var, let_, const_ } => DeclaratorLevels { var, let_, const_ },
        }
    }
}

impl From<DeclaratorLevels> for RawDeclarator {
    fn from(levels: DeclaratorLevels) -> Self {
        if levels.var == levels.let_ && levels.var == levels.const_ {
            RawDeclarator::Uniform(levels.var)
        } else {
            RawDeclarator::PerKind { var: levels.var, let_: levels.let_, const_: levels.const_ }
        }
    }
}

/// Parameter-list policy and body level of functions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FunctionOptions {
    pub parameters: ListIndent,
    pub body: u32,
}

impl Default for FunctionOptions {
    fn default() -> Self {
        Self { parameters: ListIndent::Levels(1), body: 1 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct CallOptions {
    pub arguments: ListIndent,
}

/// Options of the indent rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct IndentOptions {
    pub indent: IndentStyle,
    #[serde(alias = "SwitchCase")]
    pub switch_case: u32,
    #[serde(rename = "outerIIFEBody")]
    pub outer_iife_body: u32,
    /// `Levels(n)` or `Off`
    #[serde(alias = "MemberExpression")]
    pub member_expression: ListIndent,
    #[serde(alias = "ArrayExpression")]
    pub array_expression: ListIndent,
    #[serde(alias = "ObjectExpression")]
    pub object_expression: ListIndent,
    pub flat_ternary_expressions: bool,
    pub ignore_comments: bool,
    #[serde(alias = "VariableDeclarator")]
    pub variable_declarator: DeclaratorLevels,
    #[serde(alias = "FunctionDeclaration")]
    pub function_declaration: FunctionOptions,
    #[serde(alias = "FunctionExpression")]
    pub function_expression: FunctionOptions,
    #[serde(alias = "CallExpression")]
    pub call_expression: CallOptions,
}

impl Default for IndentOptions {
    fn default() -> Self {
        Self {
            indent: IndentStyle::default(),
            switch_case: 0,
            outer_iife_body: 1,
            member_expression: ListIndent::Off,
            array_expression: ListIndent::Levels(1),
            object_expression: ListIndent::Levels(1),
            flat_ternary_expressions: false,
            ignore_comments: false,
            variable_declarator: DeclaratorLevels::default(),
            function_declaration: FunctionOptions::default(),
            function_expression: FunctionOptions::default(),
            call_expression: CallOptions::default(),
        }
    }
}

impl IndentOptions {
    /// Options with a given unit and every other option at its default
    pub fn with_indent(indent: IndentStyle) -> Self {
        Self { indent, ..Self::default() }
    }

    pub fn indent_char(&self) -> char {
        self.indent.indent_char()
    }

    pub fn indent_size(&self) -> usize {
        self.indent.width()
    }

    /// Load options from a TOML, YAML or JSON file, chosen by extension
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read indent config from {}", path.display()))?;

        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");
        let options: Self = match extension.to_ascii_lowercase().as_str() {
            "yaml" | "yml" => serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse YAML config from {}", path.display()))?,
            "json" => serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config from {}", path.display()))?,
            _ => toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config from {}", path.display()))?,
        };

        options.validate()?;
        tracing::debug!("Loaded indent options from {}", path.display());
        Ok(options)
    }

    /// Options as a TOML document
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize indent config to TOML")
    }

    /// Save options to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = self.to_toml_string()?;
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write indent config to {}", path.as_ref().display()))?;
        Ok(())
    }

    /// Rejects values the indent rule cannot work with
    pub fn validate(&self) -> std::result::Result<(), IndentError> {
        let invalid = |option: &'static str, reason: String| Err(IndentError::InvalidOption { option, reason });

        if let IndentStyle::Spaces(width) = self.indent {
            if width == 0 || width > MAX_INDENT_WIDTH {
                return invalid("indent", format!("width must be between 1 and {}, got {}", MAX_INDENT_WIDTH, width));
            }
        }
        if self.member_expression == ListIndent::First {
            return invalid("memberExpression", "expected a number or \"off\"".to_string());
        }
        for level in [
            self.variable_declarator.var,
            self.variable_declarator.let_,
            self.variable_declarator.const_,
        ] {
            if level == ListIndent::Off {
                return invalid("variableDeclarator", "expected a number or \"first\"".to_string());
            }
        }

        let levels = [
            ("switchCase", ListIndent::Levels(self.switch_case)),
            ("outerIIFEBody", ListIndent::Levels(self.outer_iife_body)),
            ("memberExpression", self.member_expression),
            ("arrayExpression", self.array_expression),
            ("objectExpression", self.object_expression),
            ("variableDeclarator", self.variable_declarator.var),
            ("variableDeclarator", self.variable_declarator.let_),
            ("variableDeclarator", self.variable_declarator.const_),
            ("functionDeclaration.parameters", self.function_declaration.parameters),
            ("functionDeclaration.body", ListIndent::Levels(self.function_declaration.body)),
            ("functionExpression.parameters", self.function_expression.parameters),
            ("functionExpression.body", ListIndent::Levels(self.function_expression.body)),
            ("callExpression.arguments", self.call_expression.arguments),
        ];
        for (option, level) in levels {
            if let ListIndent::Levels(n) = level {
                if n > MAX_LEVEL {
                    return invalid(option, format!("level must not exceed {}, got {}", MAX_LEVEL, n));
                }
            }
        }
        Ok(())
    }
}
