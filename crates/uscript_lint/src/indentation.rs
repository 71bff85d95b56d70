//! Expected indentation per line.
//!
//! Every node that owns a body paints the lines inside it one level
//! deeper. Bodies closed by a delimiter (`{ }`, `( )`, `End Object`) leave
//! the closing line alone; open-ended spans (declarations that continue on
//! the next line, brace-less bodies, `case` sections) include their last
//! line. A collapse pass then folds scopes that were opened together on a
//! single line into one level.

use rustc_hash::FxHashSet;
use uscript_ast::*;

/// Expected indentation level of every line of `ast`.
pub fn infer_levels(ast: &ClassUnit) -> Vec<u32> {
    let mut painter = Painter {
        ast,
        levels: vec![0; ast.lines.len()],
        painted: FxHashSet::default(),
    };
    painter.class_unit();
    let mut levels = painter.levels;
    collapse(&mut levels);
    outdent_labels(ast, &mut levels);
    levels
}

/// Fold multi-level jumps back to a single level.
///
/// When a line is two or more levels deeper than the one before it, and the
/// lines after it fall back to (or below) the earlier level without passing
/// through a level in between, everything up to that point moves out by
/// `jump - 1`.
pub fn collapse(levels: &mut [u32]) {
    for i in 1..levels.len() {
        let base = levels[i - 1];
        let top = levels[i];
        if top < base + 2 {
            continue;
        }
        let jump = top - base;
        let mut end = None;
        for (k, &level) in levels.iter().enumerate().skip(i) {
            if level <= base {
                end = Some(k);
                break;
            }
            if level < top {
                break;
            }
        }
        if let Some(end) = end {
            for level in &mut levels[i..end] {
                *level -= jump - 1;
            }
        }
    }
}

/// State code labels sit one level out from the code they name.
fn outdent_labels(ast: &ClassUnit, levels: &mut [u32]) {
    for (line, level) in levels.iter_mut().enumerate() {
        let first = ast.tokens_on_line(line as u32).first();
        if first.map_or(false, |t| t.kind() == TokenKind::LabelDeclaration) {
            *level = level.saturating_sub(1);
        }
    }
}

struct Painter<'a> {
    ast: &'a ClassUnit,
    levels: Vec<u32>,
    /// Spans already painted; one `var int A, B;` span is shared by two
    /// declarations.
    painted: FxHashSet<Span>,
}

impl Painter<'_> {
    fn line(&self, id: TokenId) -> u32 {
        self.ast.token(id).line
    }

    fn paint(&mut self, from: u32, to: u32) {
        for line in from..to {
            if let Some(level) = self.levels.get_mut(line as usize) {
                *level += 1;
            }
        }
    }

    /// Lines strictly between the opening and closing token.
    fn block(&mut self, span: Span) {
        let (first, last) = (self.line(span.first), self.line(span.last));
        self.paint(first + 1, last);
    }

    /// Lines after the first one, up to and including the last.
    fn continuation(&mut self, span: Span) {
        if !self.painted.insert(span) {
            return;
        }
        let (first, last) = (self.line(span.first), self.line(span.last));
        self.paint(first + 1, last + 1);
    }

    fn class_unit(&mut self) {
        let ast = self.ast;
        if let Some(header) = ast.header {
            self.continuation(header);
        }
        for constant in &ast.constants {
            self.continuation(constant.span);
        }
        for var in &ast.variables {
            self.declaration(var);
        }
        for decl in &ast.enums {
            if let Some(body) = decl.body {
                self.block(body);
            }
        }
        for decl in &ast.structs {
            if let Some(body) = decl.body {
                self.block(body);
            }
            for member in &decl.members {
                self.declaration(member);
            }
            for defaults in &decl.defaults {
                self.defaults(defaults);
            }
        }
        for block in &ast.replication {
            if let Some(body) = block.body {
                self.block(body);
            }
            for statement in &block.statements {
                self.continuation(statement.span);
            }
        }
        for defaults in &ast.default_properties {
            self.defaults(defaults);
        }
        for function in &ast.functions {
            self.function(function);
        }
        for state in &ast.states {
            if let Some(body) = state.body_span {
                self.block(body);
            }
            for function in &state.functions {
                self.function(function);
            }
            self.statements(&state.body);
        }
    }

    /// A declaration that wraps onto more lines. Inline `enum`/`struct`
    /// bodies paint themselves.
    fn declaration(&mut self, var: &VarDecl) {
        let Some(span) = var.span else {
            return;
        };
        let ast = self.ast;
        let has_inline_type = ast.enums.iter().any(|e| span.contains(e.span.first))
            || ast.structs.iter().any(|s| span.contains(s.span.first));
        if !has_inline_type {
            self.continuation(span);
        }
    }

    fn defaults(&mut self, block: &DefaultPropertiesBlock) {
        if let Some(body) = block.body {
            self.block(body);
        }
        for sub in &block.sub_objects {
            self.block(sub.span);
        }
    }

    fn function(&mut self, function: &FunctionDecl) {
        if let Some(params) = function.params_span {
            self.block(params);
        }
        if let Some(body) = function.body_span {
            self.block(body);
        }
        for local in &function.locals {
            self.declaration(local);
        }
        self.statements(&function.body);
    }

    fn statements(&mut self, statements: &[Statement]) {
        for stmt in statements {
            self.statement(stmt);
        }
    }

    fn statement(&mut self, stmt: &Statement) {
        match stmt.body_span {
            Some(body) if is_case(self.ast, stmt) => {
                self.continuation(Span::new(stmt.span.first, body.last));
            }
            Some(body) if stmt.single_statement_body => {
                // `if (x) Foo();` and `else if` keep their body on the
                // header line and add nothing.
                if self.line(body.first) > self.line(stmt.span.first) {
                    let (first, last) = (self.line(body.first), self.line(body.last));
                    self.paint(first, last + 1);
                }
            }
            Some(body) => self.block(body),
            None => self.continuation(stmt.span),
        }
        self.statements(&stmt.body);
    }
}

fn is_case(ast: &ClassUnit, stmt: &Statement) -> bool {
    stmt.op
        .map_or(false, |op| ast.token(op).is("case") || ast.token(op).is("default"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_scopes_opened_on_one_line() {
        let mut levels = vec![0, 1, 3, 1, 0];
        collapse(&mut levels);
        assert_eq!(levels, vec![0, 1, 2, 1, 0]);
    }

    #[test]
    fn keeps_jumps_that_step_back_through_an_intermediate_level() {
        let mut levels = vec![0, 2, 1, 0];
        collapse(&mut levels);
        assert_eq!(levels, vec![0, 2, 1, 0]);
    }

    #[test]
    fn collapse_leaves_jumps_that_never_close() {
        let mut levels = vec![0, 3, 3];
        collapse(&mut levels);
        assert_eq!(levels, vec![0, 3, 3]);
    }

    #[test]
    fn collapse_of_nested_double_openings() {
        // Two lines that each open two scopes.
        let mut levels = vec![0, 2, 4, 2, 0];
        collapse(&mut levels);
        assert_eq!(levels, vec![0, 1, 2, 1, 0]);
    }
}
