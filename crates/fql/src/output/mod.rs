//! Output formatting for the fql CLI.

mod expression;
mod results;

pub use expression::{
    format_expression_json, format_expression_text, format_tokens_json, format_tokens_text,
};
pub use results::{format_records_json, format_records_text, format_sql_json, format_sql_text};
