use std::fmt::{self, Display};

use thiserror::Error;

/// Set operation that needs a left-hand operand inside a character class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassOperator {
    Intersection,
    Subtraction,
}

impl Display for ClassOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassOperator::Intersection => f.write_str("an intersection"),
            ClassOperator::Subtraction => f.write_str("a subtraction"),
        }
    }
}

/// A builder operation that was refused.
///
/// The offending fragment is left out of the pattern, the rest of the
/// build carries on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("character class cannot start with {0}")]
    MisplacedClassOperator(ClassOperator),

    #[error("character class has no members")]
    EmptyCharacterClass,

    #[error("invalid character range '{start}'..='{end}'")]
    InvalidCharRange { start: char, end: char },

    #[error("invalid repetition range {min}..{max}, the minimum must be less than the maximum")]
    InvalidRepetitionRange { min: u32, max: u32 },

    #[error("invalid group name `{0}`")]
    InvalidGroupName(String),

    #[error("invalid back-reference `{0}`")]
    InvalidBackReference(String),

    #[error("alternative is empty")]
    EmptyAlternative,
}

/// Returned by [`crate::regex`] when at least one operation was refused.
///
/// `pattern` still holds the pattern built from the accepted operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("pattern `{pattern}` built with errors: {}", join(.errors))]
pub struct BuildFailure {
    pub pattern: String,
    pub errors: Vec<BuildError>,
}

fn join(errors: &[BuildError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<String>>()
        .join("; ")
}
