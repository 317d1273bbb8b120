/*!
# Indent Rule Options

Configuration of the indent rule: the indentation unit and the per-construct
level policies the graph-population rules read.

## Configuration Example

```toml
indent = 2
switchCase = 1
memberExpression = 1
arrayExpression = "first"

[variableDeclarator]
var = 2
let = 2
const = 3

[functionDeclaration]
parameters = "first"
body = 1

[callExpression]
arguments = "off"
```
*/

pub mod config;

pub use config::{
    CallOptions, DeclaratorLevels, FunctionOptions, IndentOptions, IndentStyle, ListIndent, MAX_INDENT_WIDTH,
    MAX_LEVEL,
};

/// Identifier reported alongside indent diagnostics
pub const RULE_ID: &str = "indent";
