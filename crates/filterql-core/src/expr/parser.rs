//! Operator-precedence (shunting-yard) compiler for combination expressions.

use super::ast::Expression;
use super::lexer::{tokenize, Token, TokenKind};
use crate::error::{FilterError, FilterResult};

/// A boolean connective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Connective {
    Not,
    And,
    Or,
}

impl Connective {
    fn precedence(self) -> u8 {
        match self {
            Connective::Not => 3,
            Connective::And => 2,
            Connective::Or => 1,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Connective::Not => "NOT",
            Connective::And => "AND",
            Connective::Or => "OR",
        }
    }
}

/// An entry on the operator stack during infix-to-postfix conversion.
#[derive(Debug, Clone, Copy)]
enum Pending {
    Connective(Connective),
    /// An open parenthesis and its position.
    Group(usize),
}

/// An item of the postfix sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Postfix {
    Operand(String),
    Connective(Connective),
}

/// Compiler for combination expressions.
///
/// Compilation has two phases: the token stream is reordered into postfix
/// form with the shunting-yard algorithm, then the postfix sequence is folded
/// into an [`Expression`] tree with a single operand stack.
///
/// # Grammar
///
/// ```text
/// expression ::= or_expr
/// or_expr    ::= and_expr ("|" and_expr)*
/// and_expr   ::= unary_expr ("&" unary_expr)*
/// unary_expr ::= "!" unary_expr | primary
/// primary    ::= "(" expression ")" | identifier
/// identifier ::= [A-Za-z0-9_]+
/// ```
///
/// # Operator Precedence (highest to lowest)
///
/// 1. `!` (NOT) - unary, prefix
/// 2. `&` (AND) - binary, left-associative
/// 3. `|` (OR) - binary, left-associative
///
/// # Example
///
/// ```
/// use filterql_core::{ExpressionParser, Expression};
///
/// let expr = ExpressionParser::parse("!a & b | c").unwrap();
/// assert_eq!(expr.to_string(), "((!a & b) | c)");
/// assert!(matches!(expr, Expression::Or(_, _)));
/// ```
pub struct ExpressionParser;

impl ExpressionParser {
    /// Deepest tree `parse` will build, counting a lone identifier as 1.
    ///
    /// Every walk over an [`Expression`] recurses, so deeper input is
    /// rejected with `FilterError::ExpressionTooDeep`.
    pub const MAX_DEPTH: usize = 256;

    /// Parses an expression string into an [`Expression`] tree.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::EmptyExpression` if the input is empty or blank,
    /// `FilterError::InvalidCharacter` for characters outside the grammar,
    /// `FilterError::MismatchedParentheses` for unbalanced grouping,
    /// `FilterError::MissingOperand` when an operator lacks operands,
    /// `FilterError::MalformedExpression` when the tokens do not form a
    /// single expression, and `FilterError::ExpressionTooDeep` past
    /// [`MAX_DEPTH`](Self::MAX_DEPTH).
    pub fn parse(input: &str) -> FilterResult<Expression> {
        let tokens = tokenize(input)?;
        let token_count = tokens.len();

        let postfix = to_postfix(tokens)?;
        let expression = build_tree(postfix)?;

        tracing::debug!(
            tokens = token_count,
            nodes = expression.node_count(),
            "Compiled filter expression"
        );
        Ok(expression)
    }
}

/// Reorders infix tokens into postfix order.
fn to_postfix(tokens: Vec<Token>) -> FilterResult<Vec<Postfix>> {
    let mut output = Vec::with_capacity(tokens.len());
    let mut stack: Vec<Pending> = Vec::new();
    let mut previous: Option<TokenKind> = None;

    for token in tokens {
        let kind = token.kind;
        // A NOT takes its operand from the right only
        if previous == Some(TokenKind::Not)
            && !matches!(
                kind,
                TokenKind::Identifier | TokenKind::Not | TokenKind::OpenParen
            )
        {
            return Err(dangling_not());
        }

        match kind {
            TokenKind::Identifier => output.push(Postfix::Operand(token.text)),

            // Prefix unary: nothing to its left can bind to it
            TokenKind::Not => stack.push(Pending::Connective(Connective::Not)),

            TokenKind::And | TokenKind::Or => {
                let incoming = if kind == TokenKind::And {
                    Connective::And
                } else {
                    Connective::Or
                };
                while let Some(&Pending::Connective(top)) = stack.last() {
                    if top.precedence() < incoming.precedence() {
                        break;
                    }
                    stack.pop();
                    output.push(Postfix::Connective(top));
                }
                stack.push(Pending::Connective(incoming));
            }

            TokenKind::OpenParen => stack.push(Pending::Group(token.position)),

            TokenKind::CloseParen => loop {
                match stack.pop() {
                    Some(Pending::Connective(op)) => output.push(Postfix::Connective(op)),
                    Some(Pending::Group(_)) => break,
                    None => {
                        return Err(FilterError::MismatchedParentheses {
                            position: token.position,
                        })
                    }
                }
            },
        }
        previous = Some(kind);
    }

    if previous == Some(TokenKind::Not) {
        return Err(dangling_not());
    }

    while let Some(pending) = stack.pop() {
        match pending {
            Pending::Connective(op) => output.push(Postfix::Connective(op)),
            Pending::Group(position) => {
                return Err(FilterError::MismatchedParentheses { position });
            }
        }
    }

    Ok(output)
}

fn dangling_not() -> FilterError {
    FilterError::MissingOperand {
        operator: Connective::Not.name(),
    }
}

/// Folds a postfix sequence into a single expression tree.
///
/// Each stack entry carries the depth of its subtree; a node deeper than
/// [`ExpressionParser::MAX_DEPTH`] fails with `ExpressionTooDeep`.
fn build_tree(postfix: Vec<Postfix>) -> FilterResult<Expression> {
    let mut stack: Vec<(Expression, usize)> = Vec::new();

    for item in postfix {
        let node = match item {
            Postfix::Operand(name) => (Expression::Identifier(name), 1),
            Postfix::Connective(Connective::Not) => {
                let (operand, depth) = stack.pop().ok_or(FilterError::MissingOperand {
                    operator: Connective::Not.name(),
                })?;
                (Expression::negate(operand), depth + 1)
            }
            Postfix::Connective(op) => {
                let missing = FilterError::MissingOperand {
                    operator: op.name(),
                };
                let (right, right_depth) = stack.pop().ok_or_else(|| missing.clone())?;
                let (left, left_depth) = stack.pop().ok_or(missing)?;
                let depth = left_depth.max(right_depth) + 1;
                if op == Connective::And {
                    (Expression::and(left, right), depth)
                } else {
                    (Expression::or(left, right), depth)
                }
            }
        };

        if node.1 > ExpressionParser::MAX_DEPTH {
            return Err(FilterError::ExpressionTooDeep {
                max: ExpressionParser::MAX_DEPTH,
            });
        }
        stack.push(node);
    }

    let roots = stack.len();
    match (stack.pop(), roots) {
        (Some((root, _)), 1) => Ok(root),
        _ => Err(FilterError::MalformedExpression { roots }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn postfix_of(input: &str) -> Vec<String> {
        to_postfix(tokenize(input).unwrap())
            .unwrap()
            .into_iter()
            .map(|item| match item {
                Postfix::Operand(name) => name,
                Postfix::Connective(op) => op.name().to_string(),
            })
            .collect()
    }

    #[test]
    fn test_postfix_precedence() {
        assert_eq!(postfix_of("!a & b | c"), vec!["a", "NOT", "b", "AND", "c", "OR"]);
        assert_eq!(postfix_of("a | b & c"), vec!["a", "b", "c", "AND", "OR"]);
    }

    #[test]
    fn test_postfix_left_associative() {
        assert_eq!(postfix_of("a & b & c"), vec!["a", "b", "AND", "c", "AND"]);
        assert_eq!(postfix_of("a | b | c"), vec!["a", "b", "OR", "c", "OR"]);
    }

    #[test]
    fn test_postfix_parentheses() {
        assert_eq!(postfix_of("a & (b | c)"), vec!["a", "b", "c", "OR", "AND"]);
        assert_eq!(postfix_of("!(a | b)"), vec!["a", "b", "OR", "NOT"]);
    }

    #[test]
    fn test_postfix_double_negation() {
        assert_eq!(postfix_of("!!a"), vec!["a", "NOT", "NOT"]);
    }

    #[test]
    fn test_unmatched_close_reports_position() {
        let err = to_postfix(tokenize("a & b)").unwrap()).unwrap_err();
        assert_eq!(err, FilterError::MismatchedParentheses { position: 5 });
    }

    #[test]
    fn test_unmatched_open_reports_position() {
        let err = to_postfix(tokenize("(a & (b)").unwrap()).unwrap_err();
        assert_eq!(err, FilterError::MismatchedParentheses { position: 0 });
    }

    #[test]
    fn test_trailing_not_is_missing_operand() {
        for input in ["a !", "a & !", "(!)", "!& a"] {
            let err = to_postfix(tokenize(input).unwrap()).unwrap_err();
            assert_eq!(err, FilterError::MissingOperand { operator: "NOT" }, "{input}");
        }
    }

    #[test]
    fn test_build_tree_missing_operands() {
        let err = build_tree(vec![Postfix::Connective(Connective::Not)]).unwrap_err();
        assert_eq!(err, FilterError::MissingOperand { operator: "NOT" });

        let err = build_tree(vec![
            Postfix::Operand("a".to_string()),
            Postfix::Connective(Connective::Or),
        ])
        .unwrap_err();
        assert_eq!(err, FilterError::MissingOperand { operator: "OR" });
    }

    #[test]
    fn test_build_tree_depth_limit() {
        let chain = |nots: usize| {
            let mut postfix = vec![Postfix::Operand("a".to_string())];
            postfix.extend((0..nots).map(|_| Postfix::Connective(Connective::Not)));
            postfix
        };

        let at_limit = build_tree(chain(ExpressionParser::MAX_DEPTH - 1)).unwrap();
        assert_eq!(at_limit.node_count(), ExpressionParser::MAX_DEPTH);

        assert_eq!(
            build_tree(chain(ExpressionParser::MAX_DEPTH)).unwrap_err(),
            FilterError::ExpressionTooDeep {
                max: ExpressionParser::MAX_DEPTH
            }
        );
    }

    #[test]
    fn test_build_tree_root_count() {
        assert_eq!(
            build_tree(vec![]).unwrap_err(),
            FilterError::MalformedExpression { roots: 0 }
        );
        assert_eq!(
            build_tree(vec![
                Postfix::Operand("a".to_string()),
                Postfix::Operand("b".to_string()),
            ])
            .unwrap_err(),
            FilterError::MalformedExpression { roots: 2 }
        );
    }
}
