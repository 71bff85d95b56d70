//! Source editor tests.

use proptest::prelude::*;
use uscript_editor::{apply_edits, apply_edits_counted, fixes, Edit};
use uscript_lint::lint;
use uscript_options::LintOptions;
use uscript_parser::parse_source;

// ============================================================================
// apply_edits
// ============================================================================

#[test]
fn test_same_line_edits_apply_right_to_left() {
    let edits = [Edit::new(0, 0, 3, "let"), Edit::new(0, 8, 1, "42")];
    assert_eq!(apply_edits("var x = 1;", &edits), "let x = 42;");
}

#[test]
fn test_edits_on_different_lines_are_independent() {
    let edits = [
        Edit::new(1, 0, 0, "\t"),
        Edit::new(0, 0, 8, "function"),
        Edit::new(2, 0, 2, ""),
    ];
    assert_eq!(
        apply_edits("Function F()\n{\n  }\n", &edits),
        "function F()\n\t{\n}\n"
    );
}

#[test]
fn test_line_terminators_are_preserved() {
    let edits = [Edit::new(1, 0, 1, "B")];
    assert_eq!(apply_edits("a\r\nb\r\nc", &edits), "a\r\nB\r\nc");
}

#[test]
fn test_replacement_may_span_lines() {
    let edits = [Edit::new(0, 12, 2, "\n{")];
    assert_eq!(apply_edits("function F() {\n}", &edits), "function F()\n{\n}");
}

#[test]
fn test_overlapping_edit_is_skipped() {
    let edits = [Edit::new(0, 0, 5, "AAAAA"), Edit::new(0, 3, 4, "B")];
    let applied = apply_edits_counted("0123456789", &edits);
    assert_eq!(applied.text, "012B789");
    assert_eq!(applied.applied, 1);
    assert_eq!(applied.skipped, 1);
}

#[test]
fn test_out_of_range_edits_are_ignored() {
    let edits = [Edit::new(0, 10, 1, "x"), Edit::new(5, 0, 0, "y")];
    let applied = apply_edits_counted("short", &edits);
    assert_eq!(applied.text, "short");
    assert_eq!(applied.skipped, 2);
}

#[test]
fn test_insertions_at_end_of_line() {
    let edits = [Edit::insert(0, 5, ";")];
    assert_eq!(apply_edits("Foo()\nBar();", &edits), "Foo();\nBar();");
}

// ============================================================================
// Lint fixes
// ============================================================================

#[test]
fn test_lint_fixes_converge() {
    let source = "class Test extends Object;\n\
                  \n\
                  Function F()\n\
                  {\n\
                  if (TRUE)\n\
                  \x20 X = none;\n\
                  }\n";
    let mut options = LintOptions::none();
    options.indentation = true;
    options.keyword_casing = true;
    options.literal_casing = true;

    let results = lint(&parse_source(source), &options);
    assert!(!results.is_empty());
    let fixed = apply_edits(source, &fixes(&results));
    assert_eq!(
        fixed,
        "class Test extends Object;\n\nfunction F()\n{\n\tif (True)\n\t\tX = None;\n}\n"
    );

    let again = lint(&parse_source(&fixed), &options);
    assert!(again.is_empty(), "fixes left problems: {again:?}");
}

#[test]
fn test_brace_fixes_leave_braces_alone_on_their_lines() {
    let source = "function F()\n{ X();\n\tif (a)\n\t{ Y(); }\n}";
    let mut options = LintOptions::none();
    options.brace_on_own_line = true;
    options.indentation = true;

    let fixed = apply_edits(source, &fixes(&lint(&parse_source(source), &options)));
    assert_eq!(fixed, "function F()\n{\n\tX();\n\tif (a)\n\t{\n\t\tY();\n\t}\n}");

    let again = lint(&parse_source(&fixed), &options);
    assert!(again.is_empty(), "fixes left problems: {again:?}");
}

#[test]
fn test_removed_default_does_not_leave_indentation_behind() {
    let source = "class Test extends Object;\n\nvar int A;\nvar int B;\n\ndefaultproperties\n{\nA=0\nB=1\n}";
    let mut options = LintOptions::none();
    options.indentation = true;
    options.redundant_default_value = true;

    let fixed = apply_edits(source, &fixes(&lint(&parse_source(source), &options)));
    assert!(
        !fixed.lines().any(|line| !line.is_empty() && line.trim().is_empty()),
        "whitespace-only line in {fixed:?}"
    );
    assert!(fixed.contains("{\n\n\tB=1\n}"), "{fixed:?}");
}

#[test]
fn test_problems_without_fix_produce_no_edits() {
    let mut options = LintOptions::none();
    options.parse_errors = true;
    let results = lint(&parse_source("class Test"), &options);
    assert_eq!(results.len(), 1);
    assert!(fixes(&results).is_empty());
}

proptest! {
    #[test]
    fn prop_no_edits_is_identity(text in "[a-z \t\r\n;{}]{0,80}") {
        prop_assert_eq!(apply_edits(&text, &[]), text);
    }
}
