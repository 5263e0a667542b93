use crate::charclass::CharacterClass;
use crate::quantifier::{QuantifierType, RepetitionKind};

/// A node of the expression tree.
///
/// Fragments are grown by [`crate::compose::append`] and rendered once
/// through `Display`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Expression {
    #[default]
    Empty,
    Literal(String),
    Special(SpecialAtom),
    Shorthand(ShorthandClass),
    Posix(PosixClass),
    CharacterClass(CharacterClass),
    Group {
        content: Box<Expression>,
        kind: GroupKind,
    },
    LookAround(LookAround),
    BackReference(BackReference),
    Repetition {
        content: Box<Expression>,
        quantifier: QuantifierType,
        kind: RepetitionKind,
    },
    Seq(Vec<Expression>),
    Alt(Vec<Expression>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialAtom {
    Any,
    LineStart,
    LineEnd,
    StringStart,
    StringEnd,
    LastLineEnd,
    PreviousMatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShorthandKind {
    Digit,
    Whitespace,
    Word,
    WordBoundary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PosixKind {
    Lower,
    Upper,
    Ascii,
    Letter,
    Alphanumeric,
    Punctuation,
    Graphical,
    Printable,
    Blank,
    Control,
    HexDigit,
}

impl PosixKind {
    /// Property name used in `\p{...}`.
    pub fn name(self) -> &'static str {
        match self {
            PosixKind::Lower => "Lower",
            PosixKind::Upper => "Upper",
            PosixKind::Ascii => "ASCII",
            PosixKind::Letter => "Alpha",
            PosixKind::Alphanumeric => "Alnum",
            PosixKind::Punctuation => "Punct",
            PosixKind::Graphical => "Graph",
            PosixKind::Printable => "Print",
            PosixKind::Blank => "Blank",
            PosixKind::Control => "Cntrl",
            PosixKind::HexDigit => "XDigit",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShorthandClass {
    pub kind: ShorthandKind,
    pub negated: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PosixClass {
    pub kind: PosixKind,
    pub negated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupKind {
    Capturing(Option<String>),
    NonCapturing,
    Atomic,
    FirstMatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ahead,
    Behind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookAround {
    pub content: Box<Expression>,
    pub direction: Direction,
    pub negated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackReference {
    Name(String),
    Index(usize),
    // signed distance from the current group, e.g. -1 for the previous one
    Relative(isize),
}

/// In-place polarity flip shared by the negatable node kinds.
pub trait Negatable {
    fn is_negated(&self) -> bool;
    fn toggle(&mut self);
}

impl Negatable for ShorthandClass {
    fn is_negated(&self) -> bool {
        self.negated
    }

    fn toggle(&mut self) {
        self.negated = !self.negated;
    }
}

impl Negatable for PosixClass {
    fn is_negated(&self) -> bool {
        self.negated
    }

    fn toggle(&mut self) {
        self.negated = !self.negated;
    }
}

impl Negatable for LookAround {
    fn is_negated(&self) -> bool {
        self.negated
    }

    fn toggle(&mut self) {
        self.negated = !self.negated;
    }
}

impl Expression {
    pub fn literal(text: &str) -> Self {
        if text.is_empty() {
            Expression::Empty
        } else {
            Expression::Literal(text.to_owned())
        }
    }

    /// Wraps the node in a non-capturing group.
    pub fn grouped(self) -> Self {
        Expression::Group {
            content: Box::new(self),
            kind: GroupKind::NonCapturing,
        }
    }

    /// Whether a postfix operator applied to this node would bind to less
    /// than the whole node.
    ///
    /// - `ab`, `a|b`, `a+` → true
    /// - `a`, `\d`, `[a-z]`, `(x)` → false
    pub fn needs_grouping(&self) -> bool {
        match self {
            Expression::Literal(text) => text.chars().count() > 1,
            Expression::Seq(_) | Expression::Alt(_) | Expression::Repetition { .. } => true,
            _ => false,
        }
    }

    pub fn as_negatable_mut(&mut self) -> Option<&mut dyn Negatable> {
        let negatable: &mut dyn Negatable = match self {
            Expression::Shorthand(class) => class,
            Expression::Posix(class) => class,
            Expression::CharacterClass(class) => class,
            Expression::LookAround(look_around) => look_around,
            _ => return None,
        };
        Some(negatable)
    }
}
