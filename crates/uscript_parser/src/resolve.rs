//! Post-parse resolution of symbolic array sizes.
//!
//! `var int Slots[MAX_SLOTS];` is sized by a constant and
//! `var int Copies[ArrayCount(Slots)];` by another array; both are turned
//! into literal counts once the whole file is known.

use rustc_hash::FxHashMap;
use uscript_ast::{ArrayCount, ClassUnit, Expr, TokenKind, VarDecl};

use crate::utilities::parse_count;

/// Two passes let a count that depends on another resolved count settle.
const PASSES: usize = 2;

pub(crate) fn resolve_array_counts(ast: &mut ClassUnit) {
    let mut constants: FxHashMap<String, u32> = FxHashMap::default();
    for constant in &ast.constants {
        let (Some(name), [value]) = (constant.name, constant.value.as_slice()) else {
            continue;
        };
        let token = ast.token(*value);
        if token.lexical_kind != TokenKind::Number {
            continue;
        }
        if let Some(count) = parse_count(&token.text) {
            constants.insert(ast.text(name).to_ascii_lowercase(), count);
        }
    }

    for _ in 0..PASSES {
        let sizes = literal_sizes(ast);
        let lookup = |ast: &ClassUnit, expr: &Expr| -> Option<u32> {
            match expr {
                Expr::Token(id) => constants.get(&ast.text(*id).to_ascii_lowercase()).copied(),
                Expr::Node(node) if ast.token(node.op).is("arraycount") => match node.args.as_slice() {
                    [Expr::Token(arg)] => sizes.get(&ast.text(*arg).to_ascii_lowercase()).copied(),
                    _ => None,
                },
                Expr::Node(_) => None,
            }
        };

        let mut updates = Vec::new();
        for (slot, decl) in declarations(ast).enumerate() {
            if let Some(ArrayCount::Expression(expr)) = &decl.array_count {
                if let Some(count) = lookup(ast, expr) {
                    updates.push((slot, count));
                }
            }
        }
        if updates.is_empty() {
            break;
        }
        let mut updates = updates.into_iter().peekable();
        for (slot, decl) in declarations_mut(ast).enumerate() {
            if updates.peek().map_or(false, |&(s, _)| s == slot) {
                if let Some((_, count)) = updates.next() {
                    decl.array_count = Some(ArrayCount::Literal(count));
                }
            }
        }
    }
}

/// Sizes of arrays whose count is already a literal, keyed by lowercase
/// name.
fn literal_sizes(ast: &ClassUnit) -> FxHashMap<String, u32> {
    declarations(ast)
        .filter_map(|decl| match (decl.name, &decl.array_count) {
            (Some(name), Some(ArrayCount::Literal(count))) => Some((ast.text(name).to_ascii_lowercase(), *count)),
            _ => None,
        })
        .collect()
}

fn declarations(ast: &ClassUnit) -> impl Iterator<Item = &VarDecl> {
    ast.variables
        .iter()
        .chain(ast.structs.iter().flat_map(|s| s.members.iter()))
        .chain(
            ast.all_functions()
                .flat_map(|f| f.params.iter().chain(f.locals.iter())),
        )
}

/// Same order as [`declarations`].
fn declarations_mut(ast: &mut ClassUnit) -> impl Iterator<Item = &mut VarDecl> {
    let functions = ast
        .functions
        .iter_mut()
        .chain(ast.states.iter_mut().flat_map(|s| s.functions.iter_mut()));
    ast.variables
        .iter_mut()
        .chain(ast.structs.iter_mut().flat_map(|s| s.members.iter_mut()))
        .chain(functions.flat_map(|f| f.params.iter_mut().chain(f.locals.iter_mut())))
}
