//! Parser integration tests.
//!
//! Verifies the trees built from small class files, including what the
//! parser recovers when the source is broken.

use proptest::prelude::*;
use uscript_ast::visitor::for_each_statement;
use uscript_ast::*;
use uscript_diagnostics::{messages, DiagnosticMessage};
use uscript_parser::parse_source;

/// Helper: the text of a statement's operator token.
fn op<'a>(ast: &'a ClassUnit, stmt: &Statement) -> Option<&'a str> {
    stmt.op.map(|id| ast.text(id))
}

/// Helper: parse a class body after a standard header.
fn parse_class(body: &str) -> ClassUnit {
    parse_source(&format!("class Test extends Object;\n{body}"))
}

fn assert_clean(ast: &ClassUnit) {
    let errors: Vec<String> = ast.errors.iter().map(|d| d.to_string()).collect();
    assert!(errors.is_empty(), "unexpected errors: {errors:?}");
}

fn has_error(ast: &ClassUnit, message: &DiagnosticMessage) -> bool {
    ast.errors.iter().any(|d| d.code == message.code)
}

// ============================================================================
// Class header
// ============================================================================

#[test]
fn test_unterminated_header_keeps_name() {
    let ast = parse_source("class Test");
    assert_eq!(ast.name_text(), Some("Test"));
    assert_eq!(ast.errors.len(), 1);
    assert!(has_error(&ast, &messages::UNTERMINATED_CLASS_DECLARATION));
}

#[test]
fn test_full_header() {
    let ast = parse_source("class Foo extends Engine.Actor native config(Game);");
    assert_clean(&ast);
    assert_eq!(ast.name_text(), Some("Foo"));
    assert_eq!(ast.parent.map(|id| ast.text(id)), Some("Actor"));
    assert_eq!(ast.parent_package.map(|id| ast.text(id)), Some("Engine"));
    assert_eq!(ast.config_name.map(|id| ast.text(id)), Some("Game"));
    assert!(ast.flags.contains(ClassFlags::NATIVE | ClassFlags::CONFIG));
    assert_eq!(ast.modifiers.len(), 2);
}

#[test]
fn test_missing_class_declaration() {
    let ast = parse_source("var int X;");
    assert!(has_error(&ast, &messages::CLASS_DECLARATION_EXPECTED));
    assert_eq!(ast.variables.len(), 1);

    let empty = parse_source("");
    assert!(has_error(&empty, &messages::CLASS_DECLARATION_EXPECTED));
}

// ============================================================================
// Declarations
// ============================================================================

#[test]
fn test_variables() {
    let ast = parse_class(
        "var int X, Y;\n\
         var() config float Speed;\n\
         var array<int> Items;\n\
         var string Names[4];",
    );
    assert_clean(&ast);
    assert_eq!(ast.variables.len(), 5);
    assert_eq!(ast.variables[1].name.map(|id| ast.text(id)), Some("Y"));
    assert!(ast.variables[2].flags.contains(VarFlags::EDITABLE | VarFlags::CONFIG));
    assert_eq!(ast.variables[3].template.map(|id| ast.text(id)), Some("int"));
    assert_eq!(ast.variables[4].array_count, Some(ArrayCount::Literal(4)));

    let span = ast.variables[0].span.expect("var span");
    assert_eq!(ast.text(span.first), "var");
    assert_eq!(ast.text(span.last), ";");
}

#[test]
fn test_array_counts_resolve_through_constants() {
    let ast = parse_class(
        "const MAX = 8;\n\
         var int Slots[MAX];\n\
         var int Copies[ArrayCount(Slots)];",
    );
    assert_clean(&ast);
    assert_eq!(ast.constants.len(), 1);
    assert_eq!(ast.variables[0].array_count, Some(ArrayCount::Literal(8)));
    assert_eq!(ast.variables[1].array_count, Some(ArrayCount::Literal(8)));
}

#[test]
fn test_missing_variable_name_recovers() {
    let ast = parse_class("var int;\nvar float Speed;");
    assert_eq!(ast.errors.len(), 1);
    assert!(has_error(&ast, &messages::IDENTIFIER_EXPECTED));
    assert_eq!(ast.variables.len(), 1);
    assert_eq!(ast.variables[0].name.map(|id| ast.text(id)), Some("Speed"));
}

#[test]
fn test_inline_enum_and_struct() {
    let ast = parse_class(
        "var enum EMode\n\
         {\n\
             MODE_A,\n\
             MODE_B\n\
         } Mode;\n\
         \n\
         struct native Pair\n\
         {\n\
             var int Key;\n\
             var float Value;\n\
             structdefaultproperties\n\
             {\n\
                 Key=1\n\
             }\n\
         };",
    );
    assert_clean(&ast);
    assert_eq!(ast.enums.len(), 1);
    assert_eq!(ast.enums[0].members.len(), 2);
    assert_eq!(ast.variables.len(), 1);
    assert_eq!(ast.variables[0].type_token.map(|id| ast.text(id)), Some("EMode"));

    assert_eq!(ast.structs.len(), 1);
    let pair = &ast.structs[0];
    assert!(pair.flags.contains(StructFlags::NATIVE));
    assert_eq!(pair.members.len(), 2);
    assert_eq!(pair.defaults.len(), 1);
    assert_eq!(pair.defaults[0].properties.len(), 1);
    assert!(ast.default_properties.is_empty());
}

// ============================================================================
// Functions and statements
// ============================================================================

#[test]
fn test_function_with_locals_and_loop() {
    let ast = parse_class(
        "function int Sum(int A, optional int B)\n\
         {\n\
             local int i, Total;\n\
             for (i = 0; i < 5; i++)\n\
                 Total += i;\n\
             return Total;\n\
         }",
    );
    assert_clean(&ast);
    assert_eq!(ast.functions.len(), 1);
    let f = &ast.functions[0];
    assert_eq!(f.name.map(|id| ast.text(id)), Some("Sum"));
    assert_eq!(f.return_type.map(|id| ast.text(id)), Some("int"));
    assert_eq!(f.params.len(), 2);
    assert!(f.params[1].flags.contains(VarFlags::OPTIONAL | VarFlags::PARAMETER));
    assert_eq!(f.locals.len(), 2);
    assert!(f.locals.iter().all(|l| l.flags.contains(VarFlags::LOCAL)));

    assert_eq!(f.body.len(), 2);
    let for_stmt = &f.body[0];
    assert_eq!(op(&ast, for_stmt), Some("for"));
    assert_eq!(for_stmt.args.len(), 3);
    assert!(for_stmt.single_statement_body);
    assert_eq!(for_stmt.body.len(), 1);
    assert_eq!(op(&ast, &f.body[1]), Some("return"));

    assert_eq!(ast.text(f.span.first), "function");
    assert_eq!(ast.text(f.span.last), "}");
    let params = f.params_span.expect("params span");
    assert_eq!(ast.text(params.first), "(");
    assert_eq!(ast.text(params.last), ")");
}

#[test]
fn test_dangling_else_binds_to_inner_if() {
    let ast = parse_class(
        "function F()\n\
         {\n\
             if (a)\n\
                 if (b)\n\
                     x();\n\
                 else\n\
                     y();\n\
         }",
    );
    assert_clean(&ast);
    let body = &ast.functions[0].body;
    assert_eq!(body.len(), 1);
    let outer = &body[0];
    assert_eq!(outer.body.len(), 2);
    assert_eq!(op(&ast, &outer.body[0]), Some("if"));
    assert_eq!(op(&ast, &outer.body[1]), Some("else"));
}

#[test]
fn test_missing_semicolon_splits_statements() {
    let ast = parse_class(
        "function F()\n\
         {\n\
             if (bReady)\n\
                 Fire()\n\
             Reload();\n\
         }",
    );
    assert_clean(&ast);
    let body = &ast.functions[0].body;
    assert_eq!(body.len(), 2);
    assert_eq!(body[0].body.len(), 1);
    assert_eq!(op(&ast, &body[1]), Some("Reload"));
}

#[test]
fn test_new_keeps_its_class_operand() {
    let ast = parse_class(
        "function F()\n\
         {\n\
             E = new(self) class'Emitter';\n\
         }",
    );
    assert_clean(&ast);
    let body = &ast.functions[0].body;
    assert_eq!(body.len(), 1);
    assert_eq!(op(&ast, &body[0]), Some("="));
    assert_eq!(body[0].args.len(), 2);
}

#[test]
fn test_switch_sections() {
    let ast = parse_class(
        "function F(int N)\n\
         {\n\
             switch (N)\n\
             {\n\
                 case 0:\n\
                 case 1:\n\
                     Log(\"low\");\n\
                     break;\n\
                 default:\n\
                     Log(\"high\");\n\
             }\n\
         }",
    );
    assert_clean(&ast);
    let body = &ast.functions[0].body;
    assert_eq!(body.len(), 1);
    let switch = &body[0];
    assert_eq!(switch.body.len(), 3);
    assert!(switch.body[0].body.is_empty());
    assert_eq!(switch.body[1].body.len(), 2);
    assert_eq!(op(&ast, &switch.body[2]), Some("default"));
}

#[test]
fn test_do_until() {
    let ast = parse_class(
        "function F()\n\
         {\n\
             do\n\
             {\n\
                 i++;\n\
             } until (i > 5);\n\
         }",
    );
    assert_clean(&ast);
    let body = &ast.functions[0].body;
    assert_eq!(body.len(), 1);
    assert_eq!(op(&ast, &body[0]), Some("do"));
    assert_eq!(body[0].args.len(), 1);
    assert_eq!(body[0].body.len(), 1);
}

#[test]
fn test_else_without_if() {
    let ast = parse_class(
        "function F()\n\
         {\n\
             else\n\
                 x();\n\
         }",
    );
    assert!(has_error(&ast, &messages::ELSE_WITHOUT_IF));
    assert_eq!(ast.functions.len(), 1);
}

#[test]
fn test_unterminated_body_is_closed_at_end_of_file() {
    let ast = parse_class(
        "function F()\n\
         {\n\
             if (x)\n\
             {\n\
                 Foo();",
    );
    assert_eq!(ast.errors.len(), 1);
    assert!(has_error(&ast, &messages::UNTERMINATED_CONSTRUCT));
    let f = &ast.functions[0];
    assert_eq!(f.body.len(), 1);
    assert_eq!(f.body[0].body.len(), 1);
    assert_eq!(f.body_span.map(|s| ast.text(s.last)), Some(";"));
}

// ============================================================================
// States
// ============================================================================

#[test]
fn test_state_with_labels() {
    let ast = parse_class(
        "auto state Idle\n\
         {\n\
             ignores Bump, Touch;\n\
         \n\
             function Timer()\n\
             {\n\
             }\n\
         Begin:\n\
             Sleep(1.0);\n\
             Goto('Begin');\n\
         }",
    );
    assert_clean(&ast);
    assert_eq!(ast.states.len(), 1);
    let state = &ast.states[0];
    assert!(state.flags.contains(StateFlags::AUTO));
    assert_eq!(state.name.map(|id| ast.text(id)), Some("Idle"));
    assert_eq!(state.ignores.len(), 2);
    assert_eq!(state.functions.len(), 1);
    assert!(ast.functions.is_empty());
    assert_eq!(state.body.len(), 2);
    assert_eq!(state.body[0].label.map(|id| ast.text(id)), Some("Begin"));
    assert_eq!(ast.all_functions().count(), 1);
}

#[test]
fn test_state_modifiers() {
    let ast = parse_class("auto simulated state Walking\n{\n}");
    assert_clean(&ast);
    let state = &ast.states[0];
    assert_eq!(state.flags, StateFlags::AUTO | StateFlags::SIMULATED);
    assert_eq!(ast.text(state.span.first), "auto");
}

// ============================================================================
// Replication and default properties
// ============================================================================

#[test]
fn test_replication_block() {
    let ast = parse_class(
        "replication\n\
         {\n\
             reliable if (Role == ROLE_Authority)\n\
                 Health, Armor;\n\
             unreliable if (bNetDirty)\n\
                 Score;\n\
         }",
    );
    assert_clean(&ast);
    assert_eq!(ast.replication.len(), 1);
    let statements = &ast.replication[0].statements;
    assert_eq!(statements.len(), 2);
    assert_eq!(statements[0].targets.len(), 2);
    assert!(statements[0].condition.is_some());
    assert_eq!(statements[0].reliability.map(|id| ast.text(id)), Some("reliable"));
    assert_eq!(statements[1].targets.len(), 1);
}

#[test]
fn test_default_properties() {
    let ast = parse_class(
        "defaultproperties\n\
         {\n\
             bHidden=True\n\
             Mesh=SkeletalMesh'Chars.Soldier'\n\
             Offset=(X=1.0,Y=2.0)\n\
             Items(0)=5\n\
             Begin Object Class=StaticMeshComponent Name=Mesh0\n\
                 StaticMesh=StaticMesh'Env.Rock'\n\
             End Object\n\
             Components.Add(Mesh0)\n\
         }",
    );
    assert_clean(&ast);
    assert_eq!(ast.default_properties.len(), 1);
    let block = &ast.default_properties[0];
    assert_eq!(block.properties.len(), 5);

    assert!(matches!(block.properties[0].value, DefaultValue::Literal(_)));
    assert!(matches!(block.properties[1].value, DefaultValue::ObjectReference { .. }));
    match &block.properties[2].value {
        DefaultValue::Aggregate(aggregate) => {
            assert_eq!(aggregate.entries.len(), 2);
            assert_eq!(aggregate.entries[0].name.map(|id| ast.text(id)), Some("X"));
        }
        other => panic!("expected an aggregate, got {other:?}"),
    }
    assert!(block.properties[3].index.is_some());
    assert_eq!(block.properties[4].operation.map(|id| ast.text(id)), Some("Add"));

    assert_eq!(block.sub_objects.len(), 1);
    let sub = &block.sub_objects[0];
    assert_eq!(sub.class.map(|id| ast.text(id)), Some("StaticMeshComponent"));
    assert_eq!(sub.name.map(|id| ast.text(id)), Some("Mesh0"));
    assert_eq!(sub.properties.len(), 1);
}

// ============================================================================
// Token classification
// ============================================================================

#[test]
fn test_comments_and_directives_are_marked() {
    let ast = parse_source(
        "/* header\n\
         still comment */\n\
         class Test extends Object;\n\
         #exec TEXTURE IMPORT NAME=Foo\n\
         var int X; // trailing",
    );
    assert_clean(&ast);
    assert_eq!(ast.exec_instructions.len(), 1);
    assert!(ast.is_comment_line(0));
    assert!(ast.is_comment_line(1));
    assert!(ast.tokens_on_line(3).iter().all(|t| t.kind() == TokenKind::Preprocessor));
    assert_eq!(ast.tokens_on_line(4).last().map(|t| t.kind()), Some(TokenKind::Comment));
    assert_eq!(ast.variables.len(), 1);
}

// ============================================================================
// Robustness
// ============================================================================

proptest! {
    #[test]
    fn prop_parse_never_panics(source in "[a-zA-Z0-9_ (){}\\[\\];:,.=<>+*/'\"#\n-]{0,300}") {
        let ast = parse_source(&source);
        prop_assert_eq!(ast.lines.len(), uscript_core::text::split_lines(&source).len());
        for diagnostic in ast.errors.iter() {
            if let Some(index) = diagnostic.token {
                prop_assert!(index < ast.tokens.len());
            }
        }
    }

    #[test]
    fn prop_keyword_soup_never_panics(
        words in prop::collection::vec(
            prop::sample::select(vec![
                "class", "var", "function", "state", "if", "else", "do", "until", "switch",
                "case", "default", "local", "struct", "enum", "{", "}", "(", ")", ";", ":",
                "X", "replication", "defaultproperties", "Begin", "End", "Object", "new", "=",
            ]),
            0..80,
        )
    ) {
        let source = words.join(" ");
        let _ = parse_source(&source);
    }

    #[test]
    fn prop_spans_never_run_backwards(
        parts in prop::collection::vec(
            prop::sample::select(vec![
                "function F()", "function int G(int a)", "simulated state S", "auto state T extends S",
                "enum E", "struct P", "{", "}", "{ }", "if (a)", "else", "while (b)", "do", "until (c);",
                "switch (d)", "case 1:", "default:", "return 1;", "X = Y;", "Foo();", "Begin:", "local int i;",
                "var int V;", "A, B", ";", "(", ")", "\n", "\n\t",
            ]),
            0..60,
        )
    ) {
        let source = format!("class C extends Object;\n{}", parts.join(" "));
        let ast = parse_source(&source);
        let ordered = |span: Span| {
            let (first, last) = ast.span_lines(span);
            first <= last
        };

        let mut statements = Vec::new();
        for function in ast.all_functions() {
            prop_assert!(ordered(function.span));
            prop_assert!(function.body_span.map_or(true, ordered));
            for_each_statement(&function.body, &mut |stmt| statements.push(stmt));
        }
        for state in &ast.states {
            prop_assert!(ordered(state.span));
            prop_assert!(state.body_span.map_or(true, ordered));
            for_each_statement(&state.body, &mut |stmt| statements.push(stmt));
        }
        for stmt in statements {
            prop_assert!(ordered(stmt.span));
            prop_assert!(stmt.body_span.map_or(true, ordered));
        }
        for decl in &ast.enums {
            prop_assert!(ordered(decl.span));
            prop_assert!(decl.body.map_or(true, ordered));
        }
        for decl in &ast.structs {
            prop_assert!(ordered(decl.span));
            prop_assert!(decl.body.map_or(true, ordered));
        }
    }
}
