//! Operator-precedence tree building for binary expressions
//!
//! The expression front end collects a flat list of operands interleaved with
//! binary operator values; this module folds that list into a
//! left-associative tree. Instead of recursing operator by operator, one scan
//! locates every occurrence of the weakest precedence level still present and
//! splits there, then each segment is rebuilt one level tighter.

use super::error::{ParseError, ParseResult};
use crate::ast::{BinaryExpr, Expr, Span};
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Precedence table, weakest-binding level first
pub const OPERATOR_PRECEDENCE: &[&[&str]] = &[
    &["||"],
    &["&&"],
    &["|"],
    &["^"],
    &["&"],
    &["==", "!="],
    &["<", ">", ">=", "<=", "instanceof"],
    &["<<", ">>", ">>>"],
    &["+", "-"],
    &["*", "/", "%"],
];

static OPERATOR_LEVELS: Lazy<HashMap<&'static str, usize>> = Lazy::new(|| {
    let mut levels = HashMap::new();
    for (level, operators) in OPERATOR_PRECEDENCE.iter().enumerate() {
        for op in operators.iter() {
            levels.insert(*op, level);
        }
    }
    levels
});

/// Precedence level of a binary operator value, if it is one
pub fn binary_operator_level(operator: &str) -> Option<usize> {
    OPERATOR_LEVELS.get(operator).copied()
}

pub fn is_binary_operator(operator: &str) -> bool {
    OPERATOR_LEVELS.contains_key(operator)
}

/// One element of the flat operand/operator list
#[derive(Debug, Clone, PartialEq)]
pub enum ExprPart {
    Operand(Expr),
    Operator(String),
}

/// Fold `parts` into a left-associative binary expression tree
///
/// `parts` must alternate operand, operator, operand, ...; a single operand
/// is returned unchanged. Violations of the interleaving contract are
/// `InternalUsage` errors: they indicate a bug in the caller, not bad input.
pub fn build_binary_operation(parts: &[ExprPart], start_level: usize) -> ParseResult<Expr> {
    if parts.is_empty() {
        return Err(ParseError::internal("empty operand list"));
    }
    if parts.len() % 2 == 0 {
        return Err(ParseError::internal(
            "operand/operator list must have odd length",
        ));
    }
    if parts.len() == 1 {
        return match &parts[0] {
            ExprPart::Operand(expr) => Ok(expr.clone()),
            ExprPart::Operator(op) => Err(ParseError::internal(format!(
                "operator '{}' in operand position",
                op
            ))),
        };
    }

    for level in start_level..OPERATOR_PRECEDENCE.len() {
        let split_points: Vec<usize> = parts
            .iter()
            .enumerate()
            .filter(|(i, part)| {
                i % 2 == 1
                    && matches!(part, ExprPart::Operator(op)
                        if OPERATOR_PRECEDENCE[level].contains(&op.as_str()))
            })
            .map(|(i, _)| i)
            .collect();
        if split_points.is_empty() {
            continue;
        }

        // Rebuild each operand segment one level tighter, then fold the
        // segments left to right with the matched operators.
        let mut operands = Vec::with_capacity(split_points.len() + 1);
        let mut operators = Vec::with_capacity(split_points.len());
        let mut segment_start = 0;
        for &point in &split_points {
            operands.push(build_binary_operation(
                &parts[segment_start..point],
                level + 1,
            )?);
            match &parts[point] {
                ExprPart::Operator(op) => operators.push(op.clone()),
                ExprPart::Operand(_) => {
                    return Err(ParseError::internal("operand in operator position"))
                }
            }
            segment_start = point + 1;
        }
        operands.push(build_binary_operation(&parts[segment_start..], level + 1)?);

        let mut operands = operands.into_iter();
        let mut expr = match operands.next() {
            Some(expr) => expr,
            None => return Err(ParseError::internal("no operands after split")),
        };
        for (operator, right) in operators.into_iter().zip(operands) {
            let span = Span::new(expr.span().start, right.span().end);
            expr = Expr::Binary(BinaryExpr {
                operator,
                left: Box::new(expr),
                right: Box::new(right),
                span,
            });
        }
        return Ok(expr);
    }

    Err(ParseError::internal(
        "no operator at or above the requested precedence level",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Location, OperandExpr};

    fn operand(text: &str) -> ExprPart {
        ExprPart::Operand(Expr::Operand(OperandExpr {
            text: text.to_string(),
            span: Span::single(Location::start()),
        }))
    }

    fn operator(op: &str) -> ExprPart {
        ExprPart::Operator(op.to_string())
    }

    #[test]
    fn single_operand_passes_through() {
        let expr = build_binary_operation(&[operand("a")], 0).unwrap();
        assert_eq!(expr.to_string(), "a");
    }

    #[test]
    fn multiplicative_binds_tighter_than_additive() {
        let parts = [operand("a"), operator("+"), operand("b"), operator("*"), operand("c")];
        let expr = build_binary_operation(&parts, 0).unwrap();
        assert_eq!(expr.to_string(), "(a + (b * c))");
    }

    #[test]
    fn same_level_is_left_associative() {
        let parts = [operand("a"), operator("-"), operand("b"), operator("-"), operand("c")];
        let expr = build_binary_operation(&parts, 0).unwrap();
        assert_eq!(expr.to_string(), "((a - b) - c)");
    }

    #[test]
    fn weakest_present_level_becomes_root() {
        let parts = [
            operand("a"), operator("*"), operand("b"),
            operator("||"), operand("c"), operator("+"), operand("d"),
        ];
        let expr = build_binary_operation(&parts, 0).unwrap();
        assert_eq!(expr.to_string(), "((a * b) || (c + d))");
    }

    #[test]
    fn start_level_skips_weaker_levels() {
        // Starting past the additive level, '*' is the weakest considered.
        let parts = [operand("a"), operator("*"), operand("b")];
        let expr = build_binary_operation(&parts, 9).unwrap();
        assert_eq!(expr.to_string(), "(a * b)");
    }

    #[test]
    fn even_length_list_is_internal_error() {
        let parts = [operand("a"), operator("+")];
        let err = build_binary_operation(&parts, 0).unwrap_err();
        assert!(matches!(err, ParseError::InternalUsage { .. }));
    }

    #[test]
    fn empty_list_is_internal_error() {
        let err = build_binary_operation(&[], 0).unwrap_err();
        assert!(matches!(err, ParseError::InternalUsage { .. }));
    }

    #[test]
    fn operator_level_lookup() {
        assert_eq!(binary_operator_level("||"), Some(0));
        assert_eq!(binary_operator_level("instanceof"), Some(6));
        assert_eq!(binary_operator_level("%"), Some(9));
        assert_eq!(binary_operator_level("="), None);
    }
}
