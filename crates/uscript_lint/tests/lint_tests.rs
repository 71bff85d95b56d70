//! Lint engine integration tests.
//!
//! Each test parses a small class and runs a single rule so the
//! expectations stay independent of the other rules.

use std::path::Path;
use uscript_lint::{lint, lint_file, LintResult, LintTags, Severity};
use uscript_options::{IndentStyle, LintOptions};
use uscript_parser::parse_source;

/// Helper: run the rules enabled by `enable` over `source`.
fn lint_with(source: &str, enable: impl FnOnce(&mut LintOptions)) -> Vec<LintResult> {
    let mut options = LintOptions::none();
    enable(&mut options);
    let ast = parse_source(source);
    let mut results = lint(&ast, &options);
    results.sort_by_key(LintResult::position);
    results
}

fn class(body: &str) -> String {
    format!("class Test extends Object;\n\n{body}")
}

// ============================================================================
// Indentation
// ============================================================================

#[test]
fn test_indentation_collapses_scopes_opened_on_one_line() {
    let source = "function Init() {\n\
                  if (a) { if (b) {\n\
                  Log(\"x\");\n\
                  }}\n\
                  }";
    let results = lint_with(source, |o| o.indentation = true);

    let fixed: Vec<(u32, Option<&str>)> = results.iter().map(|r| (r.line, r.fixed_text.as_deref())).collect();
    assert_eq!(fixed, vec![(1, Some("\t")), (2, Some("\t\t")), (3, Some("\t"))]);
}

#[test]
fn test_indentation_of_well_formed_class_is_clean() {
    let source = class(
        "var int Count;\n\
         \n\
         function Tick(float Delta)\n\
         {\n\
         \tlocal int i;\n\
         \n\
         \tif (Count > 0)\n\
         \t\tCount--;\n\
         \telse\n\
         \t{\n\
         \t\tfor (i = 0; i < 4; i++)\n\
         \t\t\tLog(i);\n\
         \t}\n\
         \tswitch (Count)\n\
         \t{\n\
         \t\tcase 0:\n\
         \t\t\tbreak;\n\
         \t\tdefault:\n\
         \t\t\tCount = 0;\n\
         \t}\n\
         }\n\
         \n\
         state Idle\n\
         {\n\
         Begin:\n\
         \tSleep(1.0);\n\
         }\n\
         \n\
         defaultproperties\n\
         {\n\
         \tCount=1\n\
         }",
    );
    let results = lint_with(&source, |o| o.indentation = true);
    assert!(results.is_empty(), "unexpected problems: {results:?}");
}

#[test]
fn test_indentation_with_spaces() {
    let source = class("function F()\n{\n\tFoo();\n}");
    let results = lint_with(&source, |o| {
        o.indentation = true;
        o.indent_style = IndentStyle::Space;
        o.indent_size = 2;
    });
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].original_text.as_deref(), Some("\t"));
    assert_eq!(results[0].fixed_text.as_deref(), Some("  "));
    assert!(results[0].message.contains("2 spaces"));
}

#[test]
fn test_indentation_skips_comments_and_cpptext() {
    let source = class(
        "cpptext\n\
         {\n\
         \x20   void Native();\n\
         }\n\
         \n\
         /*\n\
         \x20  free-form comment\n\
         */\n\
         var int X;",
    );
    let results = lint_with(&source, |o| o.indentation = true);
    assert!(results.is_empty(), "unexpected problems: {results:?}");
}

// ============================================================================
// Whole-tree rules
// ============================================================================

#[test]
fn test_unused_local() {
    let results = lint_with(
        "function F(){ local int i; local int j; j = 1; }",
        |o| o.unused_local = true,
    );
    assert_eq!(results.len(), 1);
    assert!(results[0].message.contains("'i'"));
    assert!(results[0].tags.contains(LintTags::UNNECESSARY));
}

#[test]
fn test_redundant_default_value() {
    let redundant = lint_with(
        "class Test extends Object;\nvar bool bFlag;\ndefaultproperties { bFlag=False }",
        |o| o.redundant_default_value = true,
    );
    assert_eq!(redundant.len(), 1);
    assert_eq!(redundant[0].fixed_text.as_deref(), Some(""));
    assert_eq!(redundant[0].original_text.as_deref(), Some("bFlag=False"));

    let meaningful = lint_with(
        "class Test extends Object;\nvar bool bFlag;\ndefaultproperties { bFlag=True }",
        |o| o.redundant_default_value = true,
    );
    assert!(meaningful.is_empty());
}

#[test]
fn test_redundant_default_value_removes_whole_line() {
    let source = class(
        "var float Speed;\n\
         var Actor Owner2;\n\
         \n\
         defaultproperties\n\
         {\n\
         \tSpeed=0.0\n\
         \tOwner2=None\n\
         }",
    );
    let results = lint_with(&source, |o| o.redundant_default_value = true);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].column, 0);
    assert_eq!(results[0].original_text.as_deref(), Some("\tSpeed=0.0"));
}

#[test]
fn test_indentation_leaves_lines_emptied_by_redundant_default() {
    let source = class("var int A;\nvar int B;\n\ndefaultproperties\n{\nA=0\nB=1\n}");
    let results = lint_with(&source, |o| {
        o.indentation = true;
        o.redundant_default_value = true;
    });
    let summary: Vec<(&str, u32)> = results.iter().map(|r| (r.rule, r.line)).collect();
    assert_eq!(summary, vec![("indentation", 8), ("redundant-default-value", 7)]);
}

#[test]
fn test_return_value() {
    let source = class(
        "function int A() { return; }\n\
         \n\
         function B() { return 1; }\n\
         \n\
         function int C(bool b) { if (b) return 1; }\n\
         \n\
         function int D(bool b) { if (b) return 1; else return 2; }\n\
         \n\
         function int E() { while (true) { Sleep(); } }",
    );
    let results = lint_with(&source, |o| o.return_value = true);
    let summary: Vec<(u32, Severity)> = results.iter().map(|r| (r.line, r.severity)).collect();
    assert_eq!(
        summary,
        vec![(2, Severity::Error), (4, Severity::Error), (6, Severity::Warning)]
    );
}

#[test]
fn test_return_value_only_assert_false_ends_a_path() {
    let source = class(
        "function int F(bool b) { assert(b); }\n\
         \n\
         function int G() { assert(false); }",
    );
    let results = lint_with(&source, |o| o.return_value = true);
    let lines: Vec<u32> = results.iter().map(|r| r.line).collect();
    assert_eq!(lines, vec![2]);
    assert_eq!(results[0].severity, Severity::Warning);
}

#[test]
fn test_condition_spacing() {
    let source = class("function F()\n{\n\tif(x )\n\t\tFoo();\n}");
    let results = lint_with(&source, |o| o.condition_spacing = true);
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].fixed_text.as_deref(), Some(" "));
    assert_eq!(results[0].length, 0);
    assert_eq!(results[1].original_text.as_deref(), Some(" "));
    assert_eq!(results[1].fixed_text.as_deref(), Some(""));
}

#[test]
fn test_missing_semicolon() {
    let source = class(
        "function F()\n\
         {\n\
         \tif (bReady)\n\
         \t\tFire()\n\
         \tReload();\n\
         }",
    );
    let results = lint_with(&source, |o| o.missing_semicolon = true);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].severity, Severity::Error);
    assert_eq!(results[0].line, 5);
    assert_eq!(results[0].column, "\t\tFire()".len() as u32);
    assert_eq!(results[0].fixed_text.as_deref(), Some(";"));
}

#[test]
fn test_newline_before_function() {
    let source = "class Test extends Object;\n\
                  var int X;\n\
                  // Resets X.\n\
                  function Reset()\n\
                  {\n\
                  }\n\
                  \n\
                  function Other()\n\
                  {\n\
                  }";
    let results = lint_with(source, |o| o.newline_before_function = true);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].line, 2);
    assert_eq!(results[0].fixed_text.as_deref(), Some("\n"));
}

#[test]
fn test_parse_errors_surface() {
    let results = lint_with("class Test", |o| o.parse_errors = true);
    assert_eq!(results.len(), 1);
    assert!(results[0].is_error());
    assert_eq!(results[0].rule, "parse-error");
}

#[test]
fn test_class_name_matches_file() {
    let ast = parse_source("class Test extends Object;");
    let mut options = LintOptions::none();
    options.class_name_matches_file = true;

    assert!(lint(&ast, &options).is_empty());
    assert!(lint_file(&ast, &options, Path::new("Classes/Test.uc")).is_empty());

    let case_only = lint_file(&ast, &options, Path::new("Classes/test.uc"));
    assert_eq!(case_only.len(), 1);
    assert_eq!(case_only[0].severity, Severity::Warning);

    let other = lint_file(&ast, &options, Path::new("Classes/Other.uc"));
    assert_eq!(other.len(), 1);
    assert!(other[0].is_error());
    assert_eq!(other[0].fixed_text.as_deref(), Some("Other"));
}

// ============================================================================
// Token rules
// ============================================================================

#[test]
fn test_keyword_and_literal_casing() {
    let source = class("Function F()\n{\n\tX = TRUE;\n\tY = none;\n}");
    let results = lint_with(&source, |o| {
        o.keyword_casing = true;
        o.literal_casing = true;
    });
    let fixes: Vec<&str> = results.iter().filter_map(|r| r.fixed_text.as_deref()).collect();
    assert_eq!(fixes, vec!["function", "True", "None"]);
}

#[test]
fn test_expands_is_deprecated() {
    let results = lint_with("class Test expands Actor;", |o| o.keyword_casing = true);
    assert_eq!(results.len(), 1);
    assert!(results[0].tags.contains(LintTags::DEPRECATED));
    assert_eq!(results[0].fixed_text.as_deref(), Some("extends"));
}

#[test]
fn test_string_escapes() {
    let source = class("function F()\n{\n\tS = \"a\\tb \\\"q\\\" \\\\\";\n}");
    let results = lint_with(&source, |o| o.string_escapes = true);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].length, 2);
    assert!(results[0].message.contains("\\t"));
}

#[test]
fn test_name_literals() {
    let long = "N".repeat(65);
    let source = class(&format!(
        "function F()\n{{\n\tGotoState('My State');\n\tGotoState('{long}');\n\tGotoState('');\n}}"
    ));
    let results = lint_with(&source, |o| o.name_literal = true);
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(LintResult::is_error));
}

#[test]
fn test_brace_on_own_line() {
    let source = class("function F() {\n\tif (x) {\n\t\tFoo();\n\t}\n}");
    let results = lint_with(&source, |o| o.brace_on_own_line = true);
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].original_text.as_deref(), Some(" {"));
    assert_eq!(results[0].fixed_text.as_deref(), Some("\n{"));
    assert_eq!(results[1].fixed_text.as_deref(), Some("\n\t{"));
}

#[test]
fn test_brace_shares_line_with_code_after_it() {
    let source = "function F()\n{ X();\n\tif (a)\n\t{ Y(); }\n}";
    let results = lint_with(source, |o| o.brace_on_own_line = true);
    let fixes: Vec<(u32, u32, Option<&str>)> = results
        .iter()
        .map(|r| (r.line, r.column, r.fixed_text.as_deref()))
        .collect();
    assert_eq!(
        fixes,
        vec![(1, 1, Some("\n\t")), (3, 2, Some("\n\t\t")), (3, 7, Some("\n\t"))]
    );
}

#[test]
fn test_empty_braces_are_left_alone() {
    let results = lint_with("function F()\n{\n\tif (a)\n\t{ }\n}", |o| o.brace_on_own_line = true);
    assert!(results.is_empty(), "unexpected problems: {results:?}");
}

#[test]
fn test_all_rules_disabled() {
    let results = lint_with("class Test\nfunction F() { local int i; if(x) Foo() }", |_| {});
    assert!(results.is_empty());
}
