mod common;

use common::parse_source;
use javaparse::ast::{
    BinaryExpr, Expr, Location, Member, OperandExpr, Span, TypeDeclaration,
};
use javaparse::parser::{binary_operator_level, build_binary_operation, ExprPart};
use proptest::prelude::*;

/// Parse `class A { int x = <expr>; }` and render the initializer tree
fn init_tree(expr: &str) -> String {
    let source = format!("class A {{ int x = {}; }}", expr);
    let unit = parse_source(&source).expect("Failed to parse");
    match unit.types.into_iter().next().expect("one type") {
        TypeDeclaration::Class(class) => match class.body.into_iter().next().expect("one member") {
            Member::Field(field) => field.declarators[0]
                .initializer
                .as_ref()
                .expect("initializer")
                .to_string(),
            _ => panic!("expected a field"),
        },
        other => panic!("expected a class, got {}", other),
    }
}

#[test]
fn multiplication_binds_tighter_than_addition() {
    assert_eq!(init_tree("a + b * c"), "(a + (b * c))");
}

#[test]
fn equal_levels_fold_left() {
    assert_eq!(init_tree("a - b - c"), "((a - b) - c)");
    assert_eq!(init_tree("a / b % c * d"), "(((a / b) % c) * d)");
}

#[test]
fn logical_or_is_weakest() {
    assert_eq!(init_tree("a || b && c | d"), "(a || (b && (c | d)))");
}

#[test]
fn shift_operators_share_a_level() {
    assert_eq!(init_tree("a >> 2 << 1"), "((a >> 2) << 1)");
    assert_eq!(init_tree("a >>> 1 + 2"), "(a >>> (1 + 2))");
}

#[test]
fn relational_and_equality_levels() {
    assert_eq!(init_tree("a < b == c > d"), "((a < b) == (c > d))");
}

#[test]
fn single_operand_is_not_wrapped() {
    assert_eq!(init_tree("a"), "a");
    assert_eq!(init_tree("f ( )"), "f ( )");
}

#[test]
fn parenthesized_group_is_an_opaque_operand() {
    assert_eq!(init_tree("(a + b) * c"), "(( a + b ) * c)");
}

#[test]
fn call_and_index_stay_inside_the_operand() {
    assert_eq!(init_tree("f(1, 2) + g.h[3]"), "(f ( 1 , 2 ) + g . h [ 3 ])");
}

#[test]
fn prefix_operators_belong_to_the_operand() {
    assert_eq!(init_tree("-a + b"), "(- a + b)");
    assert_eq!(init_tree("!done && ready"), "(! done && ready)");
}

#[test]
fn instanceof_right_side_is_a_type() {
    assert_eq!(
        init_tree("x instanceof java.util.List"),
        "(x instanceof java.util.List)"
    );
    assert_eq!(
        init_tree("x instanceof Map<String, Integer> && ok"),
        "((x instanceof Map<String, Integer>) && ok)"
    );
}

#[test]
fn constructor_call_with_diamond_operand() {
    let unit = parse_source("class A { List<String> xs = new ArrayList<>(); }")
        .expect("Failed to parse");
    match &unit.types[0] {
        TypeDeclaration::Class(class) => match &class.body[0] {
            Member::Field(field) => {
                let initializer =
                    field.declarators[0].initializer.as_ref().expect("initializer");
                assert_eq!(initializer.to_string(), "new ArrayList < > ( )");
            }
            _ => panic!("expected a field"),
        },
        other => panic!("expected a class, got {}", other),
    }
}

#[test]
fn generic_constructor_argument_is_not_a_comparison() {
    assert_eq!(
        init_tree("new HashMap<String, Integer>() + suffix"),
        "(new HashMap < String , Integer > ( ) + suffix)"
    );
}

#[test]
fn missing_right_operand_is_an_error() {
    assert!(parse_source("class A { int x = a + ; }").is_err());
}

#[test]
fn missing_initializer_expression_is_an_error() {
    assert!(parse_source("class A { int x = ; }").is_err());
}

// Reference implementation for the property test: split at the last
// occurrence of the weakest operator level, which yields the same
// left-associative tree the production scan builds in one pass.
fn reference_build(parts: &[ExprPart]) -> Expr {
    if parts.len() == 1 {
        match &parts[0] {
            ExprPart::Operand(expr) => return expr.clone(),
            ExprPart::Operator(op) => panic!("operator '{}' in operand position", op),
        }
    }
    let mut weakest: Option<(usize, usize)> = None;
    for (index, part) in parts.iter().enumerate() {
        if let ExprPart::Operator(op) = part {
            let level = binary_operator_level(op).expect("binary operator");
            match weakest {
                Some((best, _)) if level > best => {}
                _ => weakest = Some((level, index)),
            }
        }
    }
    let (_, index) = weakest.expect("at least one operator");
    let operator = match &parts[index] {
        ExprPart::Operator(op) => op.clone(),
        ExprPart::Operand(_) => unreachable!(),
    };
    let left = reference_build(&parts[..index]);
    let right = reference_build(&parts[index + 1..]);
    Expr::Binary(BinaryExpr {
        operator,
        left: Box::new(left),
        right: Box::new(right),
        span: Span::single(Location::start()),
    })
}

fn operand(text: &str) -> ExprPart {
    ExprPart::Operand(Expr::Operand(OperandExpr {
        text: text.to_string(),
        span: Span::single(Location::start()),
    }))
}

const ALL_OPERATORS: &[&str] = &[
    "||", "&&", "|", "^", "&", "==", "!=", "<", ">", ">=", "<=", "instanceof", "<<", ">>",
    ">>>", "+", "-", "*", "/", "%",
];

proptest! {
    #[test]
    fn builder_matches_reference_tree(
        operators in prop::collection::vec(prop::sample::select(ALL_OPERATORS), 0..8)
    ) {
        let mut parts = vec![operand("x0")];
        for (i, operator) in operators.iter().enumerate() {
            parts.push(ExprPart::Operator(operator.to_string()));
            parts.push(operand(&format!("x{}", i + 1)));
        }
        let built = build_binary_operation(&parts, 0).expect("well-formed part list");
        let expected = reference_build(&parts);
        prop_assert_eq!(built.to_string(), expected.to_string());
    }
}
