mod depth;
mod error;
mod grammar;
mod parser;

pub use depth::nesting_depth;
pub use error::ParseError;
pub use parser::ParsedSites;

use crate::{DEFAULT_MAX_DEPTH, Expr};

/// Parse a declaration file into its call sites.
///
/// # Errors
///
/// Returns [`ParseError`] if the input is not valid declaration syntax.
pub fn parse(input: &str) -> Result<ParsedSites, ParseError> {
    use winnow::Parser;
    grammar::parse_sites
        .parse(input)
        .map_err(|e| ParseError::at(e.offset(), e.to_string()))
}

/// Parse a single rule expression.
///
/// The expression must already use `nil` for the null literal; see
/// [`normalize`](crate::normalize). Nesting is limited to
/// [`DEFAULT_MAX_DEPTH`] levels.
///
/// # Errors
///
/// Returns [`ParseError`] if the input is not a valid expression.
pub fn parse_expression(input: &str) -> Result<Expr, ParseError> {
    parse_expression_with_limit(input, DEFAULT_MAX_DEPTH)
}

/// Like [`parse_expression`], rejecting input whose
/// [`nesting_depth`] exceeds `max_depth`.
///
/// # Errors
///
/// Returns [`ParseError`] if the input nests too deeply or is not a valid
/// expression.
pub fn parse_expression_with_limit(input: &str, max_depth: usize) -> Result<Expr, ParseError> {
    if nesting_depth(input) > max_depth {
        return Err(ParseError::new(format!(
            "expression nests deeper than {max_depth} levels"
        )));
    }
    parse_unchecked(input)
}

/// Parse without the nesting check. Callers must bound the depth first.
pub(crate) fn parse_unchecked(input: &str) -> Result<Expr, ParseError> {
    use winnow::Parser;
    grammar::full_expression
        .parse(input)
        .map_err(|e| ParseError::at(e.offset(), e.to_string()))
}
