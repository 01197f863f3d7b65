mod error;
mod grammar;
mod parser;

pub use error::ParseError;
pub use parser::ParsedForm;

/// Parse DSL text into a [`ParsedForm`].
///
/// # Errors
///
/// Returns [`ParseError`] if the input is not valid DSL syntax.
pub fn parse(input: &str) -> Result<ParsedForm, ParseError> {
    use winnow::Parser;
    grammar::parse_form
        .parse(input)
        .map_err(|e| ParseError::new(e.to_string()))
}
