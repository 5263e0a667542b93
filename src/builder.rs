use tracing::{debug, warn};

use crate::ast::{
    BackReference, Direction, Expression, GroupKind, LookAround, Negatable, PosixClass, PosixKind,
    ShorthandClass, ShorthandKind, SpecialAtom,
};
use crate::charclass::{CharacterClass, CharacterClassBuilder};
use crate::compose::{alternate, append, repeat};
use crate::error::{BuildError, BuildFailure};
use crate::quantifier::{QuantifierType, RepetitionKind};

/// Handle on the node just appended, used to flip its polarity.
///
/// `builder.digit().negate()` renders `\D`. Dropping the handle leaves the
/// node positive.
pub struct Negation<'a> {
    target: Option<&'a mut dyn Negatable>,
}

impl Negation<'_> {
    fn none() -> Self {
        Negation { target: None }
    }

    pub fn negate(self) {
        if let Some(target) = self.target {
            target.toggle();
        }
    }
}

/// Grows one expression tree from a series of operations.
///
/// Nested builders (groups, look-arounds, repeated content, alternatives)
/// own their own tree and hand it back once their callback returns.
#[derive(Debug, Default)]
pub struct RegexBuilder {
    tree: Expression,
    errors: Vec<BuildError>,
}

impl RegexBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// The tree built so far.
    pub fn expression(&self) -> &Expression {
        &self.tree
    }

    /// Renders the pattern.
    ///
    /// Fails when any operation was refused, the failure still carries the
    /// pattern made of the accepted operations.
    pub fn build(self) -> Result<String, BuildFailure> {
        let pattern = self.tree.to_string();
        debug!("built pattern `{}`", pattern);
        if self.errors.is_empty() {
            Ok(pattern)
        } else {
            Err(BuildFailure {
                pattern,
                errors: self.errors,
            })
        }
    }

    fn push(&mut self, fragment: Expression) {
        let tree = std::mem::take(&mut self.tree);
        self.tree = append(tree, fragment);
    }

    fn push_negatable(&mut self, fragment: Expression) -> Negation<'_> {
        self.push(fragment);
        // negatable nodes are never merged, they end the tree as they are
        let last = match &mut self.tree {
            Expression::Seq(children) => children.last_mut(),
            Expression::Empty => None,
            node => Some(node),
        };
        Negation {
            target: last.and_then(|node| node.as_negatable_mut()),
        }
    }

    fn reject(&mut self, e: BuildError) {
        warn!("refusing operation: {}", e);
        self.errors.push(e);
    }

    fn nested<F>(&mut self, f: F) -> Expression
    where
        F: FnOnce(&mut RegexBuilder),
    {
        let mut nested = RegexBuilder::new();
        f(&mut nested);
        self.errors.append(&mut nested.errors);
        nested.tree
    }

    // Literals

    /// Appends `text`, matched verbatim.
    pub fn literal(&mut self, text: &str) {
        self.push(Expression::literal(text));
    }

    pub fn character(&mut self, c: char) {
        self.push(Expression::Literal(c.to_string()));
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

    // Special characters and anchors

    pub fn any_character(&mut self) {
        self.push(Expression::Special(SpecialAtom::Any));
    }

    pub fn line_start(&mut self) {
        self.push(Expression::Special(SpecialAtom::LineStart));
    }

    pub fn line_end(&mut self) {
        self.push(Expression::Special(SpecialAtom::LineEnd));
    }

    pub fn string_start(&mut self) {
        self.push(Expression::Special(SpecialAtom::StringStart));
    }

    pub fn string_end(&mut self) {
        self.push(Expression::Special(SpecialAtom::StringEnd));
    }

    pub fn last_line_end(&mut self) {
        self.push(Expression::Special(SpecialAtom::LastLineEnd));
    }

    pub fn previous_match(&mut self) {
        self.push(Expression::Special(SpecialAtom::PreviousMatch));
    }

    // Shorthand classes

    fn shorthand(&mut self, kind: ShorthandKind) -> Negation<'_> {
        self.push_negatable(Expression::Shorthand(ShorthandClass {
            kind,
            negated: false,
        }))
    }

    pub fn digit(&mut self) -> Negation<'_> {
        self.shorthand(ShorthandKind::Digit)
    }

    pub fn whitespace(&mut self) -> Negation<'_> {
        self.shorthand(ShorthandKind::Whitespace)
    }

    pub fn word(&mut self) -> Negation<'_> {
        self.shorthand(ShorthandKind::Word)
    }

    pub fn word_boundary(&mut self) -> Negation<'_> {
        self.shorthand(ShorthandKind::WordBoundary)
    }

    pub fn non_digit(&mut self) {
        self.digit().negate();
    }

    pub fn non_whitespace(&mut self) {
        self.whitespace().negate();
    }

    pub fn non_word(&mut self) {
        self.word().negate();
    }

    pub fn non_word_boundary(&mut self) {
        self.word_boundary().negate();
    }

    // POSIX classes

    pub fn posix(&mut self, kind: PosixKind) -> Negation<'_> {
        self.push_negatable(Expression::Posix(PosixClass {
            kind,
            negated: false,
        }))
    }

    pub fn lower_case(&mut self) -> Negation<'_> {
        self.posix(PosixKind::Lower)
    }

    pub fn upper_case(&mut self) -> Negation<'_> {
        self.posix(PosixKind::Upper)
    }

    pub fn ascii(&mut self) -> Negation<'_> {
        self.posix(PosixKind::Ascii)
    }

    pub fn letter(&mut self) -> Negation<'_> {
        self.posix(PosixKind::Letter)
    }

    pub fn alphanumeric(&mut self) -> Negation<'_> {
        self.posix(PosixKind::Alphanumeric)
    }

    pub fn punctuation(&mut self) -> Negation<'_> {
        self.posix(PosixKind::Punctuation)
    }

    pub fn graphical(&mut self) -> Negation<'_> {
        self.posix(PosixKind::Graphical)
    }

    pub fn printable(&mut self) -> Negation<'_> {
        self.posix(PosixKind::Printable)
    }

    pub fn blank(&mut self) -> Negation<'_> {
        self.posix(PosixKind::Blank)
    }

    pub fn control(&mut self) -> Negation<'_> {
        self.posix(PosixKind::Control)
    }

    pub fn hex_digit(&mut self) -> Negation<'_> {
        self.posix(PosixKind::HexDigit)
    }

    // Character classes

    /// Appends a bracket expression built by `f`.
    ///
    /// An empty or malformed class is reported and appends nothing.
    pub fn character_class<F>(&mut self, f: F) -> Negation<'_>
    where
        F: FnOnce(&mut CharacterClassBuilder),
    {
        let mut class = CharacterClassBuilder::default();
        f(&mut class);
        let (item, mut errors) = class.finish();
        self.errors.append(&mut errors);

        match item {
            Some(item) => self.push_negatable(Expression::CharacterClass(CharacterClass {
                item,
                negated: false,
            })),
            None => Negation::none(),
        }
    }

    pub fn not_character_class<F>(&mut self, f: F)
    where
        F: FnOnce(&mut CharacterClassBuilder),
    {
        self.character_class(f).negate();
    }

    // Groups

    /// Non-capturing group, rendered bare when its content is a single atom.
    pub fn group<F>(&mut self, f: F)
    where
        F: FnOnce(&mut RegexBuilder),
    {
        let content = self.nested(f);
        if content != Expression::Empty {
            self.push(content.grouped());
        }
    }

    fn push_group(&mut self, content: Expression, kind: GroupKind) {
        self.push(Expression::Group {
            content: Box::new(content),
            kind,
        });
    }

    pub fn capture<F>(&mut self, f: F)
    where
        F: FnOnce(&mut RegexBuilder),
    {
        let content = self.nested(f);
        self.push_group(content, GroupKind::Capturing(None));
    }

    pub fn named_capture<F>(&mut self, name: &str, f: F)
    where
        F: FnOnce(&mut RegexBuilder),
    {
        if !is_valid_group_name(name) {
            self.reject(BuildError::InvalidGroupName(name.to_owned()));
            return;
        }
        let content = self.nested(f);
        self.push_group(content, GroupKind::Capturing(Some(name.to_owned())));
    }

    pub fn atomic_group<F>(&mut self, f: F)
    where
        F: FnOnce(&mut RegexBuilder),
    {
        let content = self.nested(f);
        self.push_group(content, GroupKind::Atomic);
    }

    pub fn independent_group<F>(&mut self, f: F)
    where
        F: FnOnce(&mut RegexBuilder),
    {
        self.atomic_group(f);
    }

    /// Group that commits to the first alternative that matches.
    pub fn first_match_group<F>(&mut self, f: F)
    where
        F: FnOnce(&mut RegexBuilder),
    {
        let content = self.nested(f);
        self.push_group(content, GroupKind::FirstMatch);
    }

    // Look-arounds

    fn look_around<F>(&mut self, direction: Direction, f: F) -> Negation<'_>
    where
        F: FnOnce(&mut RegexBuilder),
    {
        let content = self.nested(f);
        self.push_negatable(Expression::LookAround(LookAround {
            content: Box::new(content),
            direction,
            negated: false,
        }))
    }

    pub fn look_ahead<F>(&mut self, f: F) -> Negation<'_>
    where
        F: FnOnce(&mut RegexBuilder),
    {
        self.look_around(Direction::Ahead, f)
    }

    pub fn look_behind<F>(&mut self, f: F) -> Negation<'_>
    where
        F: FnOnce(&mut RegexBuilder),
    {
        self.look_around(Direction::Behind, f)
    }

    pub fn followed_by<F>(&mut self, f: F)
    where
        F: FnOnce(&mut RegexBuilder),
    {
        self.look_ahead(f);
    }

    pub fn not_followed_by<F>(&mut self, f: F)
    where
        F: FnOnce(&mut RegexBuilder),
    {
        self.look_ahead(f).negate();
    }

    pub fn preceded_by<F>(&mut self, f: F)
    where
        F: FnOnce(&mut RegexBuilder),
    {
        self.look_behind(f);
    }

    pub fn not_preceded_by<F>(&mut self, f: F)
    where
        F: FnOnce(&mut RegexBuilder),
    {
        self.look_behind(f).negate();
    }

    // Back-references

    pub fn back_reference_named(&mut self, name: &str) {
        if !is_valid_group_name(name) {
            self.reject(BuildError::InvalidBackReference(name.to_owned()));
            return;
        }
        self.push(Expression::BackReference(BackReference::Name(name.to_owned())));
    }

    /// Refers to the group with the given 1-based index.
    pub fn back_reference_index(&mut self, index: usize) {
        if index == 0 {
            self.reject(BuildError::InvalidBackReference(index.to_string()));
            return;
        }
        self.push(Expression::BackReference(BackReference::Index(index)));
    }

    /// Refers to a group counted from the current one, `-1` being the last
    /// group opened.
    pub fn back_reference_relative(&mut self, offset: isize) {
        if offset == 0 {
            self.reject(BuildError::InvalidBackReference(offset.to_string()));
            return;
        }
        self.push(Expression::BackReference(BackReference::Relative(offset)));
    }

    // Repetitions

    fn repeated<F>(&mut self, kind: RepetitionKind, quantifier: QuantifierType, f: F)
    where
        F: FnOnce(&mut RegexBuilder),
    {
        let content = self.nested(f);
        self.push(repeat(content, quantifier, kind));
    }

    pub fn optional<F>(&mut self, quantifier: QuantifierType, f: F)
    where
        F: FnOnce(&mut RegexBuilder),
    {
        self.repeated(RepetitionKind::Optional, quantifier, f);
    }

    pub fn at_least_once<F>(&mut self, quantifier: QuantifierType, f: F)
    where
        F: FnOnce(&mut RegexBuilder),
    {
        self.repeated(RepetitionKind::AtLeastOnce, quantifier, f);
    }

    pub fn any_number_of_times<F>(&mut self, quantifier: QuantifierType, f: F)
    where
        F: FnOnce(&mut RegexBuilder),
    {
        self.repeated(RepetitionKind::AnyNumber, quantifier, f);
    }

    pub fn exactly<F>(&mut self, times: u32, quantifier: QuantifierType, f: F)
    where
        F: FnOnce(&mut RegexBuilder),
    {
        self.repeated(RepetitionKind::Exactly(times), quantifier, f);
    }

    pub fn at_least<F>(&mut self, times: u32, quantifier: QuantifierType, f: F)
    where
        F: FnOnce(&mut RegexBuilder),
    {
        self.repeated(RepetitionKind::AtLeast(times), quantifier, f);
    }

    pub fn at_most<F>(&mut self, times: u32, quantifier: QuantifierType, f: F)
    where
        F: FnOnce(&mut RegexBuilder),
    {
        self.repeated(RepetitionKind::AtMost(times), quantifier, f);
    }

    /// Repeats between `min` and `max` times, `min` must be less than `max`.
    pub fn between<F>(&mut self, min: u32, max: u32, quantifier: QuantifierType, f: F)
    where
        F: FnOnce(&mut RegexBuilder),
    {
        match RepetitionKind::range(min, max) {
            Ok(kind) => self.repeated(kind, quantifier, f),
            Err(e) => self.reject(e),
        }
    }

    // Alternation

    /// Appends the alternatives registered by `f`, one per `either` call.
    pub fn alternation<F>(&mut self, f: F)
    where
        F: FnOnce(&mut AlternationBuilder),
    {
        let mut alternation = AlternationBuilder::default();
        f(&mut alternation);
        self.errors.append(&mut alternation.errors);
        self.push(alternate(alternation.alternatives));
    }
}

/// Collects the branches of one alternation.
#[derive(Debug, Default)]
pub struct AlternationBuilder {
    alternatives: Vec<Expression>,
    errors: Vec<BuildError>,
}

impl AlternationBuilder {
    pub fn either<F>(&mut self, f: F)
    where
        F: FnOnce(&mut RegexBuilder),
    {
        let mut builder = RegexBuilder::new();
        f(&mut builder);
        self.errors.append(&mut builder.errors);

        if builder.tree == Expression::Empty {
            warn!("refusing empty alternative");
            self.errors.push(BuildError::EmptyAlternative);
        } else {
            self.alternatives.push(builder.tree);
        }
    }
}

/// `[A-Za-z_][A-Za-z0-9_]*`
fn is_valid_group_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}
