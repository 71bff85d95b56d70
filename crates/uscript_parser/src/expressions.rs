//! Expression resolution.
//!
//! A flat token buffer is turned into a tree by matching its shape, not by
//! precedence: a lone token is a leaf, `name(...)` is a call, `a op b` and
//! `op a` / `a op` are binary and unary nodes, and anything else becomes a
//! node whose operator is the first token. Chains of unparenthesized binary
//! operators therefore stay flat.

use uscript_ast::{Expr, Span, Statement, Token, TokenId, TokenKind};

use crate::utilities::{is_assignment, is_operator, Keyword};

/// Index (into `ids`) of the bracket closing the one at `open`.
pub(crate) fn matching_close(tokens: &[Token], ids: &[TokenId], open: usize) -> Option<usize> {
    let mut depth = 0u32;
    for (i, id) in ids.iter().enumerate().skip(open) {
        match tokens[id.0].text.as_str() {
            "(" | "[" => depth += 1,
            ")" | "]" => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Split at `separator` tokens outside any brackets.
pub(crate) fn split_top_level<'a>(tokens: &[Token], ids: &'a [TokenId], separator: &str) -> Vec<&'a [TokenId]> {
    let mut parts = Vec::new();
    let mut depth = 0u32;
    let mut start = 0;
    for (i, id) in ids.iter().enumerate() {
        let text = tokens[id.0].text.as_str();
        match text {
            "(" | "[" | "{" => depth += 1,
            ")" | "]" | "}" => depth = depth.saturating_sub(1),
            _ if depth == 0 && text == separator => {
                parts.push(&ids[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&ids[start..]);
    parts
}

/// Index of the first token outside brackets that satisfies `pred`.
pub(crate) fn find_top_level(tokens: &[Token], ids: &[TokenId], pred: impl Fn(&Token) -> bool) -> Option<usize> {
    let mut depth = 0u32;
    for (i, id) in ids.iter().enumerate() {
        let token = &tokens[id.0];
        match token.text.as_str() {
            "(" | "[" => depth += 1,
            ")" | "]" => depth = depth.saturating_sub(1),
            _ if depth == 0 && pred(token) => return Some(i),
            _ => {}
        }
    }
    None
}

/// Resolve a token buffer into an expression tree. Returns `None` for an
/// empty buffer.
pub fn resolve(tokens: &[Token], ids: &[TokenId]) -> Option<Expr> {
    let (&first, &last) = (ids.first()?, ids.last()?);
    if ids.len() == 1 {
        return Some(Expr::Token(first));
    }
    let span = Span::new(first, last);
    let at = |i: usize| &tokens[ids[i].0];

    // new(Outer) Class
    if at(0).is_word() && Keyword::from_text(&at(0).text) == Some(Keyword::New) {
        let mut rest = &ids[1..];
        let mut args = Vec::new();
        if tokens[rest[0].0].is_punct("(") {
            if let Some(close) = matching_close(tokens, rest, 0) {
                args.extend(resolve_arguments(tokens, &rest[1..close]));
                rest = &rest[close + 1..];
            }
        }
        args.extend(resolve(tokens, rest));
        return Some(Expr::node(first, args, span));
    }

    if at(0).is_word() && at(1).is_punct("(") && matching_close(tokens, ids, 1) == Some(ids.len() - 1) {
        let args = resolve_arguments(tokens, &ids[2..ids.len() - 1]);
        return Some(Expr::node(first, args, span));
    }

    if ids.len() == 3 && is_operator(at(1)) {
        return Some(Expr::node(ids[1], vec![Expr::Token(ids[0]), Expr::Token(ids[2])], span));
    }

    if ids.len() == 2 {
        if is_operator(at(0)) {
            return Some(Expr::node(ids[0], vec![Expr::Token(ids[1])], span));
        }
        if is_operator(at(1)) {
            return Some(Expr::node(ids[1], vec![Expr::Token(ids[0])], span));
        }
    }

    let args = ids[1..].iter().map(|&id| Expr::Token(id)).collect();
    Some(Expr::node(first, args, span))
}

/// Resolve each comma-separated argument of a call. Skipped arguments
/// (`F(a,,b)`) are dropped.
pub(crate) fn resolve_arguments(tokens: &[Token], ids: &[TokenId]) -> Vec<Expr> {
    if ids.is_empty() {
        return Vec::new();
    }
    split_top_level(tokens, ids, ",")
        .into_iter()
        .filter_map(|part| resolve(tokens, part))
        .collect()
}

/// Build a simple statement from its tokens, excluding any terminating `;`.
///
/// Jump keywords become the operator with the rest as one argument;
/// assignments split into target and value; anything else is resolved and
/// its root lifted into the statement.
pub fn build_statement(tokens: &[Token], ids: &[TokenId]) -> Statement {
    let Some((&first, _)) = ids.split_first() else {
        debug_assert!(false, "statement buffer is never empty");
        return Statement::new(None, TokenId(0));
    };
    let mut stmt = Statement::new(None, first);
    stmt.span.extend_to(ids[ids.len() - 1]);

    let head = &tokens[first.0];
    let jump = head.is_word()
        && matches!(
            Keyword::from_text(&head.text),
            Some(Keyword::Return | Keyword::Goto | Keyword::Break | Keyword::Continue | Keyword::Stop)
        );
    if jump {
        stmt.op = Some(first);
        stmt.args.extend(resolve(tokens, &ids[1..]));
        return stmt;
    }

    if let Some(at) = find_top_level(tokens, ids, is_assignment) {
        stmt.op = Some(ids[at]);
        stmt.args.extend(resolve(tokens, &ids[..at]));
        stmt.args.extend(resolve(tokens, &ids[at + 1..]));
        return stmt;
    }

    match resolve(tokens, ids) {
        Some(Expr::Node(node)) => {
            stmt.op = Some(node.op);
            stmt.args = node.args;
        }
        Some(Expr::Token(id)) => stmt.op = Some(id),
        None => {}
    }
    stmt
}

/// Give words inside an expression their highlighting kind: keywords and
/// literals by name, anything called as `name(` as a function reference.
pub(crate) fn classify_expression(tokens: &mut [Token], ids: &[TokenId]) {
    for (i, &id) in ids.iter().enumerate() {
        let token = &tokens[id.0];
        if !token.is_word() || token.semantic_kind.is_some() {
            continue;
        }
        let called = ids.get(i + 1).map_or(false, |next| tokens[next.0].is_punct("("));
        let kind = match Keyword::from_text(&token.text) {
            Some(keyword) => keyword.expression_kind(),
            None if called => Some(TokenKind::FunctionReference),
            None => None,
        };
        if let Some(kind) = kind {
            tokens[id.0].semantic_kind = Some(kind);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uscript_scanner::Scanner;

    fn scan(source: &str) -> (Vec<Token>, Vec<TokenId>) {
        let tokens = Scanner::scan_source(source);
        let ids = (0..tokens.len()).map(TokenId).collect();
        (tokens, ids)
    }

    fn text(tokens: &[Token], id: TokenId) -> &str {
        &tokens[id.0].text
    }

    fn op_text<'a>(tokens: &'a [Token], expr: &Expr) -> Option<&'a str> {
        match expr {
            Expr::Node(node) => Some(text(tokens, node.op)),
            Expr::Token(_) => None,
        }
    }

    #[test]
    fn single_token_is_a_leaf() {
        let (tokens, ids) = scan("Health");
        assert_eq!(resolve(&tokens, &ids), Some(Expr::Token(TokenId(0))));
        assert_eq!(resolve(&tokens, &[]), None);
    }

    #[test]
    fn call_splits_arguments() {
        let (tokens, ids) = scan("Spawn(class'Pawn', Loc + Offset, )");
        let Some(Expr::Node(node)) = resolve(&tokens, &ids) else {
            panic!("expected a call node");
        };
        assert_eq!(text(&tokens, node.op), "Spawn");
        assert_eq!(node.args.len(), 2);
        let Expr::Node(inner) = &node.args[1] else {
            panic!("expected a binary argument");
        };
        assert_eq!(text(&tokens, inner.op), "+");
    }

    #[test]
    fn binary_and_unary_shapes() {
        let (tokens, ids) = scan("a != b");
        let expr = resolve(&tokens, &ids).unwrap();
        assert_eq!(op_text(&tokens, &expr), Some("!="));

        let (tokens, ids) = scan("!bHidden");
        let expr = resolve(&tokens, &ids).unwrap();
        assert_eq!(op_text(&tokens, &expr), Some("!"));

        let (tokens, ids) = scan("i++");
        let expr = resolve(&tokens, &ids).unwrap();
        assert_eq!(op_text(&tokens, &expr), Some("++"));

        let (tokens, ids) = scan("A dot B");
        let expr = resolve(&tokens, &ids).unwrap();
        assert_eq!(op_text(&tokens, &expr), Some("dot"));
    }

    #[test]
    fn long_chains_fall_back_to_first_token() {
        let (tokens, ids) = scan("a + b * c");
        let Some(Expr::Node(node)) = resolve(&tokens, &ids) else {
            panic!("expected a node");
        };
        assert_eq!(text(&tokens, node.op), "a");
        assert_eq!(node.args.len(), 4);
        assert_eq!(node.span, Span::new(TokenId(0), TokenId(4)));
    }

    #[test]
    fn new_keeps_outer_and_class() {
        let (tokens, ids) = scan("new(self) class'Emitter'");
        let Some(Expr::Node(node)) = resolve(&tokens, &ids) else {
            panic!("expected a node");
        };
        assert_eq!(text(&tokens, node.op), "new");
        assert_eq!(node.args.len(), 2);
    }

    #[test]
    fn statements_split_at_assignment() {
        let (tokens, ids) = scan("Pawn.Health = Max(0, Health - 1)");
        let stmt = build_statement(&tokens, &ids);
        assert_eq!(stmt.op.map(|op| text(&tokens, op)), Some("="));
        assert_eq!(stmt.args.len(), 2);
        assert_eq!(stmt.span, Span::new(TokenId(0), TokenId(11)));
    }

    #[test]
    fn statements_keep_jump_keyword() {
        let (tokens, ids) = scan("return Health > 0");
        let stmt = build_statement(&tokens, &ids);
        assert_eq!(stmt.op.map(|op| text(&tokens, op)), Some("return"));
        assert_eq!(stmt.args.len(), 1);

        let (tokens, ids) = scan("Destroy()");
        let stmt = build_statement(&tokens, &ids);
        assert_eq!(stmt.op.map(|op| text(&tokens, op)), Some("Destroy"));
        assert!(stmt.args.is_empty());
    }

    #[test]
    fn classification_marks_calls_and_literals() {
        let (mut tokens, ids) = scan("if (self.IsA('Pawn') || x == None)");
        classify_expression(&mut tokens, &ids);
        assert_eq!(tokens[2].kind(), TokenKind::Keyword);
        assert_eq!(tokens[4].kind(), TokenKind::FunctionReference);
        assert_eq!(tokens[11].kind(), TokenKind::Literal);
    }
}
