//! Tests for the expression compiler and generation.

use std::cell::RefCell;
use std::rc::Rc;

use super::*;
use crate::condition::{ensure_compatible, Condition};
use crate::context::ResolutionContext;
use crate::error::{FilterError, FilterResult};

/// A condition that renders its own structure and logs every combinator call.
#[derive(Debug, Clone)]
struct Trace {
    kind: &'static str,
    text: String,
    calls: Rc<RefCell<Vec<String>>>,
}

impl Trace {
    fn derive(&self, text: String, call: &str) -> Self {
        self.calls.borrow_mut().push(call.to_string());
        Trace {
            kind: self.kind,
            text,
            calls: Rc::clone(&self.calls),
        }
    }
}

impl Condition for Trace {
    fn kind(&self) -> &'static str {
        self.kind
    }

    fn and(&self, other: &Self) -> FilterResult<Self> {
        ensure_compatible(self, other)?;
        Ok(self.derive(
            format!("({} AND {})", self.text, other.text),
            &format!("and({},{})", self.text, other.text),
        ))
    }

    fn or(&self, other: &Self) -> FilterResult<Self> {
        ensure_compatible(self, other)?;
        Ok(self.derive(
            format!("({} OR {})", self.text, other.text),
            &format!("or({},{})", self.text, other.text),
        ))
    }

    fn not(&self) -> Self {
        self.derive(format!("NOT({})", self.text), &format!("not({})", self.text))
    }
}

fn context_for(keys: &[&str]) -> (ResolutionContext<Trace>, Rc<RefCell<Vec<String>>>) {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let context = keys
        .iter()
        .map(|key| {
            (
                *key,
                Trace {
                    kind: "trace",
                    text: key.to_string(),
                    calls: Rc::clone(&calls),
                },
            )
        })
        .collect();
    (context, calls)
}

fn generate(input: &str) -> String {
    let (context, _) = context_for(&["a", "b", "c", "d"]);
    ExpressionParser::parse(input)
        .unwrap()
        .generate(&context)
        .unwrap()
        .text
}

fn ident(name: &str) -> Expression {
    Expression::identifier(name)
}

// ==================== Parsing ====================

#[test]
fn test_parse_single_identifier() {
    assert_eq!(ExpressionParser::parse("nameFilter").unwrap(), ident("nameFilter"));
}

#[test]
fn test_parse_with_surrounding_whitespace() {
    assert_eq!(ExpressionParser::parse("  a  ").unwrap(), ident("a"));
    assert_eq!(ExpressionParser::parse("\ta\n").unwrap(), ident("a"));
}

#[test]
fn test_parse_precedence_tree() {
    let expected = Expression::or(
        Expression::and(Expression::negate(ident("a")), ident("b")),
        ident("c"),
    );
    assert_eq!(ExpressionParser::parse("!a & b | c").unwrap(), expected);
}

#[test]
fn test_parse_and_binds_tighter_than_or() {
    let expected = Expression::or(ident("a"), Expression::and(ident("b"), ident("c")));
    assert_eq!(ExpressionParser::parse("a | b & c").unwrap(), expected);
}

#[test]
fn test_parse_parentheses_override() {
    let grouped = ExpressionParser::parse("a & (b | c)").unwrap();
    let plain = ExpressionParser::parse("a & b | c").unwrap();

    assert_eq!(
        grouped,
        Expression::and(ident("a"), Expression::or(ident("b"), ident("c")))
    );
    assert_eq!(
        plain,
        Expression::or(Expression::and(ident("a"), ident("b")), ident("c"))
    );
    assert_ne!(grouped, plain);
}

#[test]
fn test_parse_left_associative() {
    let expected = Expression::and(Expression::and(ident("a"), ident("b")), ident("c"));
    assert_eq!(ExpressionParser::parse("a & b & c").unwrap(), expected);
}

#[test]
fn test_parse_not_of_group() {
    let expected = Expression::negate(Expression::or(ident("a"), ident("b")));
    assert_eq!(ExpressionParser::parse("!(a | b)").unwrap(), expected);
}

#[test]
fn test_parse_double_negation() {
    let expected = Expression::negate(Expression::negate(ident("a")));
    assert_eq!(ExpressionParser::parse("!!a").unwrap(), expected);
}

#[test]
fn test_parse_redundant_parentheses() {
    assert_eq!(ExpressionParser::parse("((a))").unwrap(), ident("a"));
}

#[test]
fn test_parse_no_spaces() {
    assert_eq!(
        ExpressionParser::parse("(a|b)&!c").unwrap(),
        ExpressionParser::parse("( a | b ) & ! c").unwrap()
    );
}

#[test]
fn test_parse_is_idempotent() {
    let input = "nameFilter & (ageFilter | !statusFilter)";
    let first = ExpressionParser::parse(input).unwrap();
    let second = ExpressionParser::parse(input).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.identifiers(), second.identifiers());
}

#[test]
fn test_display_reparses_to_same_tree() {
    for input in ["!a & b | c", "a & (b | c)", "!(a | b) & !!c", "a | b | c & d"] {
        let expr = ExpressionParser::parse(input).unwrap();
        let reparsed = ExpressionParser::parse(&expr.to_string()).unwrap();
        assert_eq!(expr, reparsed, "{input}");
    }
}

#[test]
fn test_display_canonical_form() {
    let expr = ExpressionParser::parse("!a & b | c").unwrap();
    assert_eq!(expr.to_string(), "((!a & b) | c)");
}

#[test]
fn test_identifiers_deduplicated_in_order() {
    let expr = ExpressionParser::parse("b & (a | b) & !c & a").unwrap();
    assert_eq!(expr.identifiers(), vec!["b", "a", "c"]);
}

#[test]
fn test_node_count() {
    let expr = ExpressionParser::parse("!a & b").unwrap();
    assert_eq!(expr.node_count(), 4);
}

// ==================== Syntax errors ====================

#[test]
fn test_parse_empty() {
    assert_eq!(
        ExpressionParser::parse("").unwrap_err(),
        FilterError::EmptyExpression
    );
    assert_eq!(
        ExpressionParser::parse("   ").unwrap_err(),
        FilterError::EmptyExpression
    );
}

#[test]
fn test_parse_unbalanced_parentheses() {
    assert!(matches!(
        ExpressionParser::parse("(a & b").unwrap_err(),
        FilterError::MismatchedParentheses { position: 0 }
    ));
    assert!(matches!(
        ExpressionParser::parse("a & b)").unwrap_err(),
        FilterError::MismatchedParentheses { position: 5 }
    ));
    assert!(matches!(
        ExpressionParser::parse(")(").unwrap_err(),
        FilterError::MismatchedParentheses { .. }
    ));
}

#[test]
fn test_parse_invalid_character() {
    assert_eq!(
        ExpressionParser::parse("a && b.c").unwrap_err(),
        FilterError::InvalidCharacter {
            character: '.',
            position: 6
        }
    );
}

#[test]
fn test_parse_missing_operands() {
    assert_eq!(
        ExpressionParser::parse("a &").unwrap_err(),
        FilterError::MissingOperand { operator: "AND" }
    );
    assert_eq!(
        ExpressionParser::parse("| a").unwrap_err(),
        FilterError::MissingOperand { operator: "OR" }
    );
    assert_eq!(
        ExpressionParser::parse("!").unwrap_err(),
        FilterError::MissingOperand { operator: "NOT" }
    );
    assert_eq!(
        ExpressionParser::parse("a && b").unwrap_err(),
        FilterError::MissingOperand { operator: "AND" }
    );
}

#[test]
fn test_parse_malformed() {
    assert_eq!(
        ExpressionParser::parse("a b").unwrap_err(),
        FilterError::MalformedExpression { roots: 2 }
    );
    assert_eq!(
        ExpressionParser::parse("()").unwrap_err(),
        FilterError::MalformedExpression { roots: 0 }
    );
}

#[test]
fn test_syntax_errors_are_flagged() {
    for input in ["", "a $", "(a", "a &", "a b"] {
        let err = ExpressionParser::parse(input).unwrap_err();
        assert!(err.is_syntax_error(), "{input}: {err}");
    }
}

#[test]
fn test_long_not_chain_is_rejected() {
    let input = format!("{}a", "!".repeat(20_000));
    let err = ExpressionParser::parse(&input).unwrap_err();
    assert_eq!(
        err,
        FilterError::ExpressionTooDeep {
            max: ExpressionParser::MAX_DEPTH
        }
    );
    assert!(err.is_syntax_error());
}

#[test]
fn test_long_and_chain_is_rejected() {
    let input = vec!["a"; 20_000].join(" & ");
    assert!(matches!(
        ExpressionParser::parse(&input).unwrap_err(),
        FilterError::ExpressionTooDeep { .. }
    ));
}

#[test]
fn test_deep_parentheses_are_rejected() {
    let input = format!("{}a{}", "(!".repeat(5_000), ")".repeat(5_000));
    assert!(matches!(
        ExpressionParser::parse(&input).unwrap_err(),
        FilterError::ExpressionTooDeep { .. }
    ));
}

#[test]
fn test_chains_under_limit_generate() {
    let nots = format!("{}a", "!".repeat(ExpressionParser::MAX_DEPTH - 1));
    let expr = ExpressionParser::parse(&nots).unwrap();
    assert_eq!(expr.to_string().len(), nots.len());

    let ands = vec!["a"; ExpressionParser::MAX_DEPTH].join(" & ");
    let expr = ExpressionParser::parse(&ands).unwrap();
    let (context, calls) = context_for(&["a"]);
    expr.generate(&context).unwrap();
    assert_eq!(calls.borrow().len(), ExpressionParser::MAX_DEPTH - 1);
}

// ==================== Generation ====================

#[test]
fn test_generate_precedence() {
    assert_eq!(generate("!a & b | c"), "((NOT(a) AND b) OR c)");
}

#[test]
fn test_generate_parentheses() {
    assert_eq!(generate("a & (b | c)"), "(a AND (b OR c))");
    assert_eq!(generate("a & b | c"), "((a AND b) OR c)");
}

#[test]
fn test_generate_call_sequence() {
    let (context, calls) = context_for(&["a", "b", "c"]);
    ExpressionParser::parse("!a & b | c")
        .unwrap()
        .generate(&context)
        .unwrap();

    assert_eq!(
        *calls.borrow(),
        vec!["not(a)", "and(NOT(a),b)", "or((NOT(a) AND b),c)"]
    );
}

#[test]
fn test_generate_leaf_returned_unchanged() {
    let (context, calls) = context_for(&["a"]);
    let condition = ExpressionParser::parse("a").unwrap().generate(&context).unwrap();
    assert_eq!(condition.text, "a");
    assert!(calls.borrow().is_empty());
}

#[test]
fn test_generate_unknown_identifier() {
    let (context, _) = context_for(&["knownFilter"]);
    let err = ExpressionParser::parse("knownFilter & missingFilter")
        .unwrap()
        .generate(&context)
        .unwrap_err();
    assert_eq!(err, FilterError::unknown_filter_key("missingFilter", None));
    assert!(!err.is_syntax_error());
}

#[test]
fn test_generate_repeatable_against_different_contexts() {
    let expr = ExpressionParser::parse("a | !b").unwrap();

    let (first, _) = context_for(&["a", "b"]);
    let second: ResolutionContext<Trace> = [
        (
            "a",
            Trace {
                kind: "other",
                text: "x".to_string(),
                calls: Rc::default(),
            },
        ),
        (
            "b",
            Trace {
                kind: "other",
                text: "y".to_string(),
                calls: Rc::default(),
            },
        ),
    ]
    .into_iter()
    .collect();

    assert_eq!(expr.generate(&first).unwrap().text, "(a OR NOT(b))");
    assert_eq!(expr.generate(&second).unwrap().text, "(x OR NOT(y))");
}

#[test]
fn test_generate_incompatible_kinds() {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let context: ResolutionContext<Trace> = [
        (
            "a",
            Trace {
                kind: "memory",
                text: "a".to_string(),
                calls: Rc::clone(&calls),
            },
        ),
        (
            "b",
            Trace {
                kind: "sql",
                text: "b".to_string(),
                calls: Rc::clone(&calls),
            },
        ),
    ]
    .into_iter()
    .collect();

    let expr = ExpressionParser::parse("a & !b").unwrap();
    assert_eq!(
        expr.generate(&context).unwrap_err(),
        FilterError::IncompatibleConditionKind {
            left: "memory",
            right: "sql"
        }
    );
}
