use std::fmt::{self, Display, Write};
use std::ops::RangeInclusive;

use tracing::warn;

use crate::ast::{Negatable, PosixClass, PosixKind};
use crate::error::{BuildError, ClassOperator};
use crate::render::write_escaped_literal;

/// Member tree of a bracket expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassItem {
    Raw(String),
    Range { start: char, end: char },
    Posix(PosixClass),
    Set(Vec<ClassItem>),
    Intersection(Box<ClassItem>),
    Subtraction(Box<ClassItem>),
}

/// A finished character class as it sits in the expression tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterClass {
    pub item: ClassItem,
    pub negated: bool,
}

impl Negatable for CharacterClass {
    fn is_negated(&self) -> bool {
        self.negated
    }

    fn toggle(&mut self) {
        self.negated = !self.negated;
    }
}

/// Adds `item` to the class built so far.
///
/// Adjacent raw runs merge, anything else becomes a set member. A class
/// can't start with an intersection or a subtraction.
pub fn append(current: Option<ClassItem>, item: ClassItem) -> Result<ClassItem, BuildError> {
    match (current, item) {
        (None, ClassItem::Intersection(_)) => Err(BuildError::MisplacedClassOperator(
            ClassOperator::Intersection,
        )),
        (None, ClassItem::Subtraction(_)) => Err(BuildError::MisplacedClassOperator(
            ClassOperator::Subtraction,
        )),
        (None, item) => Ok(item),
        (Some(ClassItem::Raw(mut chars)), ClassItem::Raw(more)) => {
            chars.push_str(&more);
            Ok(ClassItem::Raw(chars))
        }
        (Some(ClassItem::Set(mut members)), item) => {
            match (members.last_mut(), item) {
                (Some(ClassItem::Raw(chars)), ClassItem::Raw(more)) => chars.push_str(&more),
                (_, item) => members.push(item),
            }
            Ok(ClassItem::Set(members))
        }
        (Some(current), item) => Ok(ClassItem::Set(vec![current, item])),
    }
}

/// Collects the members of one bracket expression.
#[derive(Debug, Default)]
pub struct CharacterClassBuilder {
    item: Option<ClassItem>,
    invalid: bool,
    errors: Vec<BuildError>,
}

impl CharacterClassBuilder {
    fn add(&mut self, item: ClassItem) {
        if self.invalid {
            return;
        }
        match append(self.item.take(), item) {
            Ok(item) => self.item = Some(item),
            Err(e) => {
                warn!("refusing character class member: {}", e);
                self.invalid = true;
                self.errors.push(e);
            }
        }
    }

    /// Runs `f` against a fresh class and returns its members, if valid.
    fn nested<F>(&mut self, f: F) -> Option<ClassItem>
    where
        F: FnOnce(&mut CharacterClassBuilder),
    {
        let mut nested = CharacterClassBuilder::default();
        f(&mut nested);
        let (item, mut errors) = nested.finish();
        self.errors.append(&mut errors);
        item
    }

    /// Returns the class members, or `None` when the class is empty or was
    /// invalidated, along with every error recorded.
    pub(crate) fn finish(mut self) -> (Option<ClassItem>, Vec<BuildError>) {
        if self.invalid {
            return (None, self.errors);
        }
        if self.item.is_none() {
            warn!("character class has no members");
            self.errors.push(BuildError::EmptyCharacterClass);
        }
        (self.item, self.errors)
    }

    pub fn character(&mut self, c: char) {
        self.add(ClassItem::Raw(c.to_string()));
    }

    /// Adds every character of `chars`.
    pub fn all_in(&mut self, chars: &str) {
        if !chars.is_empty() {
            self.add(ClassItem::Raw(chars.to_owned()));
        }
    }

    pub fn all_in_range(&mut self, range: RangeInclusive<char>) {
        let (start, end) = range.into_inner();
        if start > end {
            let e = BuildError::InvalidCharRange { start, end };
            warn!("refusing character range: {}", e);
            self.errors.push(e);
            return;
        }
        self.add(ClassItem::Range { start, end });
    }

    pub fn tab(&mut self) {
        self.character('\t');
    }

    pub fn new_line(&mut self) {
        self.character('\n');
    }

    pub fn carriage_return(&mut self) {
        self.character('\r');
    }

    pub fn posix(&mut self, kind: PosixKind) {
        self.add(ClassItem::Posix(PosixClass {
            kind,
            negated: false,
        }));
    }

    pub fn not_posix(&mut self, kind: PosixKind) {
        self.add(ClassItem::Posix(PosixClass {
            kind,
            negated: true,
        }));
    }

    pub fn lower_case(&mut self) {
        self.posix(PosixKind::Lower);
    }

    pub fn upper_case(&mut self) {
        self.posix(PosixKind::Upper);
    }

    pub fn ascii(&mut self) {
        self.posix(PosixKind::Ascii);
    }

    pub fn letter(&mut self) {
        self.posix(PosixKind::Letter);
    }

    pub fn alphanumeric(&mut self) {
        self.posix(PosixKind::Alphanumeric);
    }

    pub fn punctuation(&mut self) {
        self.posix(PosixKind::Punctuation);
    }

    pub fn graphical(&mut self) {
        self.posix(PosixKind::Graphical);
    }

    pub fn printable(&mut self) {
        self.posix(PosixKind::Printable);
    }

    pub fn blank(&mut self) {
        self.posix(PosixKind::Blank);
    }

    pub fn control(&mut self) {
        self.posix(PosixKind::Control);
    }

    pub fn hex_digit(&mut self) {
        self.posix(PosixKind::HexDigit);
    }

    /// Removes the characters of the nested class from this one.
    ///
    /// Example: `a-z` excluding `aeiou` → `[a-z&&[^aeiou]]`
    pub fn exclude<F>(&mut self, f: F)
    where
        F: FnOnce(&mut CharacterClassBuilder),
    {
        if let Some(item) = self.nested(f) {
            self.add(ClassItem::Subtraction(Box::new(item)));
        }
    }

    /// Keeps only the characters also in the nested class.
    ///
    /// Example: `c`, `j-m` intersected with `l` → `[cj-m&&[l]]`
    pub fn intersect_with<F>(&mut self, f: F)
    where
        F: FnOnce(&mut CharacterClassBuilder),
    {
        if let Some(item) = self.nested(f) {
            self.add(ClassItem::Intersection(Box::new(item)));
        }
    }
}

fn write_raw(f: &mut fmt::Formatter<'_>, chars: &str, first: bool, last: bool) -> fmt::Result {
    let count = chars.chars().count();
    for (idx, c) in chars.chars().enumerate() {
        let at_start = first && idx == 0;
        let at_end = last && idx + 1 == count;
        match c {
            '\\' => f.write_str("\\\\")?,
            '\t' => f.write_str("\\t")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            ']' if !at_start => f.write_str("\\]")?,
            '^' if at_start => f.write_str("\\^")?,
            '-' if !at_start && !at_end => f.write_str("\\-")?,
            '[' | '&' => write!(f, "\\{}", c)?,
            _ => f.write_char(c)?,
        }
    }
    Ok(())
}

fn write_range_endpoint(f: &mut fmt::Formatter<'_>, c: char) -> fmt::Result {
    match c {
        '\t' => f.write_str("\\t"),
        '\n' => f.write_str("\\n"),
        '\r' => f.write_str("\\r"),
        '\\' | ']' | '[' | '^' | '-' | '&' => write!(f, "\\{}", c),
        _ => f.write_char(c),
    }
}

fn write_members(f: &mut fmt::Formatter<'_>, item: &ClassItem, first: bool, last: bool) -> fmt::Result {
    match item {
        ClassItem::Raw(chars) => write_raw(f, chars, first, last),
        ClassItem::Range { start, end } => {
            write_range_endpoint(f, *start)?;
            f.write_char('-')?;
            write_range_endpoint(f, *end)
        }
        ClassItem::Posix(class) => write!(f, "{}", class),
        ClassItem::Set(members) => {
            let len = members.len();
            for (idx, member) in members.iter().enumerate() {
                write_members(f, member, first && idx == 0, last && idx + 1 == len)?;
            }
            Ok(())
        }
        ClassItem::Intersection(nested) => {
            f.write_str("&&[")?;
            write_members(f, nested, true, true)?;
            f.write_char(']')
        }
        ClassItem::Subtraction(nested) => {
            f.write_str("&&[^")?;
            write_members(f, nested, true, true)?;
            f.write_char(']')
        }
    }
}

impl Display for CharacterClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // a lone character needs no brackets
        if let ClassItem::Raw(chars) = &self.item {
            if !self.negated && chars.chars().count() == 1 {
                return write_escaped_literal(f, chars);
            }
        }

        f.write_str(if self.negated { "[^" } else { "[" })?;
        write_members(f, &self.item, true, true)?;
        f.write_char(']')
    }
}
