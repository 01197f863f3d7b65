use thiserror::Error;

use crate::CompileError;
use crate::parse::ParseError;

/// Unified error type covering parsing, compilation, and I/O.
///
/// Returned by convenience methods like [`RuleRegistry::from_dsl()`](crate::RuleRegistry::from_dsl)
/// and [`RuleRegistry::from_file()`](crate::RuleRegistry::from_file).
#[derive(Debug, Error)]
pub enum FieldgateError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
