//! Output formatting for `parse` and `tokens`.

use filterql_core::expr::{Token, TokenKind};
use filterql_core::Expression;
use owo_colors::OwoColorize;
use serde::Serialize;

/// JSON output structure for the parse command.
#[derive(Serialize)]
pub struct ParseOutput<'a> {
    pub expression: String,
    pub identifiers: Vec<&'a str>,
    pub nodes: usize,
}

/// JSON output structure for a single token.
#[derive(Serialize)]
pub struct TokenOutput<'a> {
    pub kind: &'static str,
    pub text: &'a str,
    pub position: usize,
}

fn kind_name(kind: TokenKind) -> &'static str {
    match kind {
        TokenKind::Identifier => "IDENT",
        TokenKind::And => "AND",
        TokenKind::Or => "OR",
        TokenKind::Not => "NOT",
        TokenKind::OpenParen => "LPAREN",
        TokenKind::CloseParen => "RPAREN",
    }
}

/// Formats a compiled expression as JSON.
pub fn format_expression_json(expr: &Expression) -> Result<String, serde_json::Error> {
    let output = ParseOutput {
        expression: expr.to_string(),
        identifiers: expr.identifiers(),
        nodes: expr.node_count(),
    };
    serde_json::to_string_pretty(&output)
}

/// Formats a compiled expression as text: canonical form, then its keys.
pub fn format_expression_text(expr: &Expression, use_colors: bool) -> String {
    let keys = expr.identifiers().join(", ");
    let label = if use_colors {
        "keys:".dimmed().to_string()
    } else {
        "keys:".to_string()
    };
    format!("{expr}\n{label} {keys}\n")
}

/// Formats a token stream as JSON.
pub fn format_tokens_json(tokens: &[Token]) -> Result<String, serde_json::Error> {
    let output: Vec<TokenOutput> = tokens
        .iter()
        .map(|t| TokenOutput {
            kind: kind_name(t.kind),
            text: &t.text,
            position: t.position,
        })
        .collect();
    serde_json::to_string_pretty(&output)
}

/// Formats a token stream as one `position token` line per token.
pub fn format_tokens_text(tokens: &[Token], use_colors: bool) -> String {
    let mut output = String::new();
    for token in tokens {
        let position = format!("{:>4}", token.position);
        if use_colors {
            let rendered = match token.kind {
                TokenKind::Identifier => token.to_string().green().to_string(),
                _ => token.to_string().cyan().to_string(),
            };
            output.push_str(&format!("{}  {rendered}\n", position.dimmed()));
        } else {
            output.push_str(&format!("{position}  {token}\n"));
        }
    }
    output
}
