/*!
End-to-end indentation checks over parsed sources
*/

use indent_analyzer::{check_source, IndentChecker, IndentDiagnostic, IndentOptions, IndentStyle, JsParser, ListIndent};
use pretty_assertions::assert_eq;

fn check(text: &str, options: &IndentOptions) -> Vec<IndentDiagnostic> {
    check_source(text, options).unwrap()
}

fn lines(problems: &[IndentDiagnostic]) -> Vec<(usize, usize, String)> {
    problems
        .iter()
        .map(|p| (p.line, p.expected_width, p.actual_indent.clone()))
        .collect()
}

fn owned(items: &[(usize, usize, &str)]) -> Vec<(usize, usize, String)> {
    items.iter().map(|(l, w, a)| (*l, *w, a.to_string())).collect()
}

#[test]
fn test_block_body_at_one_level() {
    assert!(check("if (a) {\n    foo();\n}", &IndentOptions::default()).is_empty());
}

#[test]
fn test_under_indented_block_body() {
    let problems = check("if (a) {\n  foo();\n}", &IndentOptions::default());
    assert_eq!(lines(&problems), owned(&[(2, 4, "  ")]));
    assert_eq!(problems[0].message, "Expected indentation of 4 spaces but found 2.");
    assert_eq!(problems[0].fix.replacement, "    ");
}

#[test]
fn test_array_elements() {
    let problems = check("var a = [\n    1,\n  2\n];", &IndentOptions::default());
    assert_eq!(lines(&problems), owned(&[(3, 4, "  ")]));

    let problems = check("var a = [\n1,\n  2\n];", &IndentOptions::default());
    assert_eq!(lines(&problems), owned(&[(2, 4, ""), (3, 4, "  ")]));
}

#[test]
fn test_first_declarator_initializer_is_bumped() {
    let problems = check("var a = {\n  x: 1\n},\n  b = 2;", &IndentOptions::default());
    assert_eq!(lines(&problems), owned(&[(2, 8, "  "), (3, 4, ""), (4, 4, "  ")]));
}

#[test]
fn test_conditional_branches() {
    let problems = check("a\n? b\n: c;", &IndentOptions::default());
    assert_eq!(lines(&problems), owned(&[(2, 4, ""), (3, 4, "")]));
}

#[test]
fn test_flat_ternary_chain() {
    let mut options = IndentOptions::with_indent(IndentStyle::Spaces(2));
    options.flat_ternary_expressions = true;
    let text = "var x = a\n  ? b\n  : c\n  ? d\n  : e;";
    assert!(check(text, &options).is_empty());
}

#[test]
fn test_same_line_anchors_collapse() {
    assert!(check("foo(bar(\n    x\n));", &IndentOptions::default()).is_empty());
}

#[test]
fn test_mixed_whitespace_is_tolerated() {
    assert!(check("if (a) {\n \t foo();\n}", &IndentOptions::default()).is_empty());
}

#[test]
fn test_first_policy_with_leading_hole() {
    let mut options = IndentOptions::default();
    options.array_expression = ListIndent::First;
    assert!(check("x = [, a,\n    b];", &options).is_empty());
    assert!(check("x = [a,\n     b];", &options).is_empty());
    assert_eq!(check("x = [a,\n    b];", &options).len(), 1);
}

#[test]
fn test_first_policy_for_parameters() {
    let mut options = IndentOptions::default();
    options.function_declaration.parameters = ListIndent::First;
    let text = "function foo(a,\n             b) {\n    return a;\n}";
    assert!(check(text, &options).is_empty());
}

#[test]
fn test_off_policy_ignores_elements() {
    let mut options = IndentOptions::default();
    options.call_expression.arguments = ListIndent::Off;
    assert!(check("foo(\n          a,\n  b\n);", &options).is_empty());
}

const NESTED: &str = "function f(a, b) {
    var c = a + b;
    if (c) {
        return [
            a,
            b
        ];
    }
    return {
        sum: c
    };
}";

#[test]
fn test_nested_constructs_are_clean() {
    assert!(check(NESTED, &IndentOptions::default()).is_empty());
}

#[test]
fn test_relative_consistency_under_nesting() {
    let wrapped = format!(
        "if (x) {{\n{}\n}}",
        NESTED.lines().map(|l| format!("    {}", l)).collect::<Vec<_>>().join("\n")
    );
    assert!(check(&wrapped, &IndentOptions::default()).is_empty());

    let checker = IndentChecker::default();
    let plain = checker.line_widths(&JsParser::new().parse_text(NESTED).unwrap());
    let nested = checker.line_widths(&JsParser::new().parse_text(&wrapped).unwrap());
    for (line, width) in plain.iter().enumerate() {
        assert_eq!(nested[line + 1], width.map(|w| w + 4), "line {}", line + 1);
    }
}

/// Indents every line of `text` by `depth` enclosing `if` blocks.
fn wrap_in_blocks(text: &str, depth: usize) -> String {
    let mut out = text.to_string();
    for _ in 0..depth {
        let body: Vec<String> = out.lines().map(|l| format!("    {}", l)).collect();
        out = format!("if (x) {{\n{}\n}}", body.join("\n"));
    }
    out
}

const WIDE_LEVELS: &str = "var a = [
        1,
        [
                2
        ]
];
switch (a) {
        case 1:
            b();
}";

#[test]
fn test_configured_levels_hold_at_every_depth() {
    let mut options = IndentOptions::default();
    options.array_expression = ListIndent::Levels(2);
    options.switch_case = 2;
    let checker = IndentChecker::new(options.clone());

    let plain = checker.line_widths(&JsParser::new().parse_text(WIDE_LEVELS).unwrap());
    let expected = [0, 8, 8, 16, 8, 0, 0, 8, 12, 0];
    assert_eq!(plain, expected.iter().map(|w| Some(*w)).collect::<Vec<_>>());

    for depth in 1..=3 {
        let wrapped = wrap_in_blocks(WIDE_LEVELS, depth);
        assert!(check(&wrapped, &options).is_empty(), "depth {}", depth);
        let nested = checker.line_widths(&JsParser::new().parse_text(&wrapped).unwrap());
        for (line, width) in plain.iter().enumerate() {
            assert_eq!(nested[line + depth], width.map(|w| w + 4 * depth), "depth {} line {}", depth, line + 1);
        }
    }
}

#[test]
fn test_switch_cases() {
    let text = "switch (a) {\ncase 1:\n    b();\n    break;\ndefault:\n    c();\n}";
    assert!(check(text, &IndentOptions::default()).is_empty());

    let mut options = IndentOptions::with_indent(IndentStyle::Spaces(2));
    options.switch_case = 1;
    let text = "switch (a) {\n  case 1:\n    b();\n// trailing\n}";
    assert!(check(text, &options).is_empty());
    assert_eq!(lines(&check("switch (a) {\ncase 1:\n  b();\n}", &options)), owned(&[(2, 2, ""), (3, 4, "  ")]));
}

#[test]
fn test_case_with_block_body() {
    let text = "switch (a) {\ncase 1: {\n    b();\n}\n}";
    assert!(check(text, &IndentOptions::default()).is_empty());
}

#[test]
fn test_template_substitution() {
    assert!(check("var s = `a${\n    b\n}c`;", &IndentOptions::default()).is_empty());
}

#[test]
fn test_member_chains() {
    let mut options = IndentOptions::default();
    assert!(check("foo\n  .bar()\n        .baz();", &options).is_empty());

    options.member_expression = ListIndent::Levels(1);
    assert!(check("foo\n    .bar()\n    .baz();", &options).is_empty());
    assert_eq!(lines(&check("foo\n.bar();", &options)), owned(&[(2, 4, "")]));
}

#[test]
fn test_comments() {
    let options = IndentOptions::default();
    assert!(check("function f() {\n    // leading\n    return 1;\n}", &options).is_empty());
    assert!(check("if (a) {\n    b();\n// closing\n}", &options).is_empty());

    let text = "if (a) {\n        // stray\n    b();\n}";
    assert_eq!(lines(&check(text, &options)), owned(&[(2, 4, "        ")]));
    let mut options = options;
    options.ignore_comments = true;
    assert!(check(text, &options).is_empty());
}

#[test]
fn test_tab_indentation() {
    let options = IndentOptions::with_indent(IndentStyle::Tab);
    assert!(check("function f() {\n\tif (a) {\n\t\treturn;\n\t}\n}", &options).is_empty());

    let problems = check("function f() {\n    return;\n}", &options);
    assert_eq!(problems.len(), 1);
    assert_eq!(problems[0].message, "Expected indentation of 1 tab but found 4 spaces.");
    assert_eq!(problems[0].fix.replacement, "\t");
}

#[test]
fn test_else_if_chain() {
    let text = "if (a) {\n    b();\n} else if (c) {\n    d();\n} else {\n    e();\n}";
    assert!(check(text, &IndentOptions::default()).is_empty());
}

#[test]
fn test_blockless_bodies() {
    let options = IndentOptions::default();
    assert!(check("if (a)\n    b();\nelse\n    c();", &options).is_empty());
    assert!(check("for (var i = 0; i < n; i++)\n    total += i;", &options).is_empty());
    assert!(check("const f = (a) =>\n    a + 1;", &options).is_empty());
}

#[test]
fn test_semicolon_first_terminators() {
    let options = IndentOptions::default();
    assert!(check("if (a)\n    foo()\n;", &options).is_empty());
    assert!(check("while (a)\n    foo()\n;", &options).is_empty());
    assert!(check("for (;;)\n    foo()\n;", &options).is_empty());
    assert!(check("while (x)\n    if (a)\n        foo()\n    ;", &options).is_empty());

    let widths = IndentChecker::default().line_widths(&JsParser::new().parse_text("if (a)\n    foo()\n;").unwrap());
    assert_eq!(widths, vec![Some(0), Some(4), Some(0)]);

    let problems = check("if (a)\n    foo()\n    ;", &options);
    assert_eq!(lines(&problems), owned(&[(3, 0, "    ")]));
}

#[test]
fn test_callbacks_and_object_arguments() {
    let options = IndentOptions::default();
    assert!(check("foo(function () {\n    bar();\n});", &options).is_empty());
    assert!(check("items.forEach((item) => {\n    use(item);\n});", &options).is_empty());
    assert!(check("foo({\n    a: 1\n});", &options).is_empty());
}

#[test]
fn test_class_bodies() {
    let text = "class A extends B {\n    constructor() {\n        super();\n    }\n}";
    assert!(check(text, &IndentOptions::default()).is_empty());
}

#[test]
fn test_outer_iife_body() {
    let mut options = IndentOptions::default();
    options.outer_iife_body = 0;
    let text = "(function () {\nvar a = 1;\n})();";
    assert!(check(text, &options).is_empty());
}

#[test]
fn test_multiline_comment_body_is_not_checked() {
    let text = "/**\n * Doc\n      * ragged\n */\nfunction f() {}";
    assert!(check(text, &IndentOptions::default()).is_empty());
}

#[test]
fn test_diagnostics_in_line_order() {
    let text = "function f() {\nif (a) {\nb();\n}\n}";
    let problems = check(text, &IndentOptions::default());
    let order: Vec<_> = problems.iter().map(|p| p.line).collect();
    assert_eq!(order, vec![2, 3, 4]);
}
