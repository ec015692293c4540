//! Syntactic literal classification.
//!
//! Classification looks at the shape of a single expression node and nothing
//! else: no scope lookups, no evaluation. Every expression shape maps to a
//! well-defined answer, so callers never need an error path.

use ruff_python_ast::{self as ast, Expr};

/// The closed set of literal kinds the checker distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiteralKind {
    /// Integer or floating-point literal token.
    Number,
    /// String or byte-string literal token.
    StringOrBytes,
    /// Tuple display, including the empty `()`.
    Tuple,
    /// List display, including the empty `[]`.
    List,
    /// Dict display, including the empty `{}`.
    Dict,
    /// Set display. The empty set has no literal spelling.
    Set,
}

impl LiteralKind {
    /// Scalar constants: numbers and strings/bytes.
    #[must_use]
    pub const fn is_simple(self) -> bool {
        matches!(self, LiteralKind::Number | LiteralKind::StringOrBytes)
    }

    /// Container displays: tuples, lists, dicts, sets.
    #[must_use]
    pub const fn is_collection(self) -> bool {
        !self.is_simple()
    }
}

/// Result of classifying one operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// The expression does not spell out a literal value.
    NotLiteral,
    /// The expression is a literal of the given kind.
    Literal(LiteralKind),
}

impl Classification {
    /// Returns the literal kind, if any.
    #[must_use]
    pub const fn kind(self) -> Option<LiteralKind> {
        match self {
            Classification::NotLiteral => None,
            Classification::Literal(kind) => Some(kind),
        }
    }

    /// Whether this operand classified as a scalar constant.
    #[must_use]
    pub const fn is_simple_literal(self) -> bool {
        matches!(
            self,
            Classification::Literal(LiteralKind::Number | LiteralKind::StringOrBytes)
        )
    }
}

/// Classifies a single expression node.
///
/// Booleans, `None`, ellipsis and complex-number literals are deliberately
/// `NotLiteral`: identity comparison against those is either idiomatic
/// (`x is None`) or outside the scope of this rule. F-strings and
/// comprehensions compute values at runtime and are not literals either.
#[must_use]
pub fn classify(expr: &Expr) -> Classification {
    match expr {
        Expr::NumberLiteral(number) => match &number.value {
            ast::Number::Int(_) | ast::Number::Float(_) => {
                Classification::Literal(LiteralKind::Number)
            }
            ast::Number::Complex { .. } => Classification::NotLiteral,
        },
        Expr::StringLiteral(_) | Expr::BytesLiteral(_) => {
            Classification::Literal(LiteralKind::StringOrBytes)
        }
        Expr::Tuple(_) => Classification::Literal(LiteralKind::Tuple),
        Expr::List(_) => Classification::Literal(LiteralKind::List),
        Expr::Dict(_) => Classification::Literal(LiteralKind::Dict),
        Expr::Set(_) => Classification::Literal(LiteralKind::Set),
        _ => Classification::NotLiteral,
    }
}

/// Whether the expression is exactly the empty tuple display `()`.
#[must_use]
pub fn is_empty_tuple(expr: &Expr) -> bool {
    matches!(expr, Expr::Tuple(tuple) if tuple.elts.is_empty())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn classify_source(expr_source: &str) -> Classification {
        let parsed = ruff_python_parser::parse_module(expr_source).unwrap();
        let module = parsed.into_syntax();
        let ast::Stmt::Expr(stmt) = &module.body[0] else {
            panic!("expected expression statement");
        };
        classify(&stmt.value)
    }

    #[test]
    fn numbers_and_strings_are_simple() {
        assert_eq!(
            classify_source("2"),
            Classification::Literal(LiteralKind::Number)
        );
        assert_eq!(
            classify_source("2.5"),
            Classification::Literal(LiteralKind::Number)
        );
        assert_eq!(
            classify_source("'a'"),
            Classification::Literal(LiteralKind::StringOrBytes)
        );
        assert_eq!(
            classify_source("b'a'"),
            Classification::Literal(LiteralKind::StringOrBytes)
        );
    }

    #[test]
    fn displays_are_collections() {
        assert_eq!(
            classify_source("()"),
            Classification::Literal(LiteralKind::Tuple)
        );
        assert_eq!(
            classify_source("(1, 2)"),
            Classification::Literal(LiteralKind::Tuple)
        );
        assert_eq!(
            classify_source("[4, 5]"),
            Classification::Literal(LiteralKind::List)
        );
        assert_eq!(
            classify_source("{1: 2}"),
            Classification::Literal(LiteralKind::Dict)
        );
        assert_eq!(
            classify_source("{1, 2}"),
            Classification::Literal(LiteralKind::Set)
        );
    }

    #[test]
    fn non_literal_shapes() {
        for source in [
            "name",
            "f()",
            "obj.attr",
            "1 + 2",
            "None",
            "True",
            "...",
            "1j",
            "f'{x}'",
            "[y for y in xs]",
            "{k: v for k, v in xs}",
        ] {
            assert_eq!(
                classify_source(source),
                Classification::NotLiteral,
                "expected {source} to be NotLiteral"
            );
        }
    }

    #[test]
    fn empty_tuple_detection() {
        let parsed = ruff_python_parser::parse_module("()\n(1,)\n[]").unwrap();
        let module = parsed.into_syntax();
        let exprs: Vec<_> = module
            .body
            .iter()
            .map(|stmt| match stmt {
                ast::Stmt::Expr(stmt) => &*stmt.value,
                _ => panic!("expected expression statement"),
            })
            .collect();
        assert!(is_empty_tuple(exprs[0]));
        assert!(!is_empty_tuple(exprs[1]));
        assert!(!is_empty_tuple(exprs[2]));
    }
}
