use std::fmt::{self, Display};

use crate::error::BuildError;

/// How eagerly a repeated fragment consumes input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuantifierType {
    #[default]
    Greedy,
    Lazy,
    Possessive,
}

impl QuantifierType {
    /// Suffix appended after the repetition postfix.
    pub fn operator(self) -> &'static str {
        match self {
            QuantifierType::Greedy => "",
            QuantifierType::Lazy => "?",
            QuantifierType::Possessive => "+",
        }
    }
}

/// How many times a fragment repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepetitionKind {
    Optional,
    AtLeastOnce,
    AnyNumber,
    Exactly(u32),
    AtLeast(u32),
    AtMost(u32),
    Range { min: u32, max: u32 },
}

impl RepetitionKind {
    /// Builds a bounded range, refusing reversed or degenerate bounds.
    ///
    /// - `range(2, 5)` → `Range { min: 2, max: 5 }`
    /// - `range(5, 5)` → `InvalidRepetitionRange`
    pub fn range(min: u32, max: u32) -> Result<Self, BuildError> {
        if min < max {
            Ok(RepetitionKind::Range { min, max })
        } else {
            Err(BuildError::InvalidRepetitionRange { min, max })
        }
    }
}

impl Display for RepetitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepetitionKind::Optional => f.write_str("?"),
            RepetitionKind::AtLeastOnce => f.write_str("+"),
            RepetitionKind::AnyNumber => f.write_str("*"),
            RepetitionKind::Exactly(n) => write!(f, "{{{}}}", n),
            RepetitionKind::AtLeast(n) => write!(f, "{{{},}}", n),
            RepetitionKind::AtMost(n) => write!(f, "{{,{}}}", n),
            RepetitionKind::Range { min, max } => write!(f, "{{{},{}}}", min, max),
        }
    }
}
