//! Statement and expression traversal.
//!
//! Implement [`StatementVisitor`] and override the hooks you need; the
//! default implementations walk into children.

use crate::node::*;
use crate::token::TokenId;

pub trait StatementVisitor {
    fn visit_statement(&mut self, stmt: &Statement) {
        walk_statement(self, stmt);
    }

    fn visit_expr(&mut self, expr: &Expr) {
        walk_expr(self, expr);
    }

    fn visit_token(&mut self, _id: TokenId) {}
}

pub fn walk_statement<V: StatementVisitor + ?Sized>(visitor: &mut V, stmt: &Statement) {
    if let Some(op) = stmt.op {
        visitor.visit_token(op);
    }
    for arg in &stmt.args {
        visitor.visit_expr(arg);
    }
    for child in &stmt.body {
        visitor.visit_statement(child);
    }
}

pub fn walk_expr<V: StatementVisitor + ?Sized>(visitor: &mut V, expr: &Expr) {
    match expr {
        Expr::Token(id) => visitor.visit_token(*id),
        Expr::Node(node) => {
            visitor.visit_token(node.op);
            for arg in &node.args {
                visitor.visit_expr(arg);
            }
        }
    }
}

/// Walk a statement list.
pub fn walk_statements<V: StatementVisitor + ?Sized>(visitor: &mut V, stmts: &[Statement]) {
    for stmt in stmts {
        visitor.visit_statement(stmt);
    }
}

/// Call `f` on every statement of a tree, parents before children.
pub fn for_each_statement<'a>(stmts: &'a [Statement], f: &mut impl FnMut(&'a Statement)) {
    for stmt in stmts {
        f(stmt);
        for_each_statement(&stmt.body, f);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TokenCollector(Vec<TokenId>);

    impl StatementVisitor for TokenCollector {
        fn visit_token(&mut self, id: TokenId) {
            self.0.push(id);
        }
    }

    #[test]
    fn walks_operators_arguments_and_bodies() {
        let mut inner = Statement::new(Some(TokenId(5)), TokenId(5));
        inner.args.push(Expr::Token(TokenId(7)));
        let mut outer = Statement::new(Some(TokenId(0)), TokenId(0));
        outer.args.push(Expr::node(TokenId(2), vec![Expr::Token(TokenId(1)), Expr::Token(TokenId(3))], Span::new(TokenId(1), TokenId(3))));
        outer.body.push(inner);
        outer.body_span = Some(Span::new(TokenId(4), TokenId(9)));

        let mut collector = TokenCollector(Vec::new());
        collector.visit_statement(&outer);
        assert_eq!(collector.0, vec![TokenId(0), TokenId(2), TokenId(1), TokenId(3), TokenId(5), TokenId(7)]);

        let mut count = 0;
        for_each_statement(std::slice::from_ref(&outer), &mut |_| count += 1);
        assert_eq!(count, 2);
    }
}
