//! A default-properties assignment that sets a variable to the value it
//! already starts with can be removed.
//!
//! Only scalar types with a known zero value are judged; anything the rule
//! cannot evaluate (structs, enums, arrays, object references to other
//! classes) is left alone.

use uscript_ast::*;
use uscript_core::text::leading_whitespace;
use uscript_options::LintOptions;

use crate::context::LintContext;
use crate::result::{LintResult, LintTags, Severity};
use crate::rules::AstRule;

pub(crate) struct RedundantDefaultValue;

impl AstRule for RedundantDefaultValue {
    fn name(&self) -> &'static str {
        "redundant-default-value"
    }

    fn enabled(&self, options: &LintOptions) -> bool {
        options.redundant_default_value
    }

    fn check(&self, cx: &LintContext<'_>, results: &mut Vec<LintResult>) {
        for property in redundant_properties(cx.ast) {
            if let Some(result) = self.removal(cx, property) {
                results.push(result);
            }
        }
    }
}

/// Lines whose only content is a redundant assignment; the fix empties them.
pub(crate) fn emptied_lines(cx: &LintContext<'_>) -> Vec<u32> {
    if !cx.options.redundant_default_value {
        return Vec::new();
    }
    redundant_properties(cx.ast)
        .filter_map(|property| removal_range(cx, property))
        .filter(|&(line, column, end)| column == 0 && end as usize == cx.line(line).len())
        .map(|(line, _, _)| line)
        .collect()
}

fn redundant_properties(ast: &ClassUnit) -> impl Iterator<Item = &DefaultProperty> {
    ast.all_default_properties().filter(move |property| {
        let DefaultValue::Literal(value) = property.value else {
            return false;
        };
        if property.index.is_some() || property.operation.is_some() {
            return false;
        }
        let name = ast.token(property.name);
        let Some(var) = ast
            .variables
            .iter()
            .find(|var| var.name.map_or(false, |id| name.is(ast.text(id))))
        else {
            return false;
        };
        if var.array_count.is_some() || var.template.is_some() {
            return false;
        }
        var.type_token
            .map_or(false, |type_token| is_zero_value(ast.text(type_token), ast.token(value)))
    })
}

/// Line and column range the removal covers: the assignment, or the whole
/// line when nothing else is on it.
fn removal_range(cx: &LintContext<'_>, property: &DefaultProperty) -> Option<(u32, u32, u32)> {
    let first = cx.ast.token(property.span.first);
    let last = cx.ast.token(property.span.last);
    if first.line != last.line {
        return None;
    }
    let text = cx.line(first.line);
    let alone = leading_whitespace(text).len() as u32 == first.column
        && text.trim_end().len() as u32 == last.end_column();
    Some(if alone {
        (first.line, 0, text.len() as u32)
    } else {
        (first.line, first.column, last.end_column())
    })
}

impl RedundantDefaultValue {
    fn removal(&self, cx: &LintContext<'_>, property: &DefaultProperty) -> Option<LintResult> {
        let (line, column, end) = removal_range(cx, property)?;
        let original = cx.line(line).get(column as usize..end as usize)?;
        let name = cx.ast.token(property.name);
        Some(
            LintResult::new(
                self.name(),
                Severity::Warning,
                line,
                column,
                end - column,
                format!("'{}' already defaults to this value.", name.text),
            )
            .with_fix(original, "")
            .with_tags(LintTags::UNNECESSARY),
        )
    }
}

/// Whether `value` is the value a variable of type `type_name` starts with.
fn is_zero_value(type_name: &str, value: &Token) -> bool {
    match type_name.to_ascii_lowercase().as_str() {
        "bool" => value.is("false"),
        "byte" | "int" | "float" => {
            value.lexical_kind == TokenKind::Number
                && value
                    .text
                    .trim_end_matches(['f', 'F'])
                    .parse::<f64>()
                    .map_or(false, |n| n == 0.0)
        }
        "string" => value.text == "\"\"",
        "name" => value.text == "''" || value.is("none"),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(text: &str, kind: TokenKind) -> Token {
        Token::new(text, 0, 0, 0, kind)
    }

    #[test]
    fn zero_values_by_type() {
        assert!(is_zero_value("bool", &token("False", TokenKind::Identifier)));
        assert!(!is_zero_value("bool", &token("True", TokenKind::Identifier)));
        assert!(is_zero_value("Float", &token("0.0", TokenKind::Number)));
        assert!(is_zero_value("int", &token("0", TokenKind::Number)));
        assert!(!is_zero_value("int", &token("0x10", TokenKind::Number)));
        assert!(is_zero_value("string", &token("\"\"", TokenKind::String)));
        assert!(is_zero_value("name", &token("''", TokenKind::Name)));
        assert!(!is_zero_value("EMode", &token("MODE_A", TokenKind::Identifier)));
    }
}
