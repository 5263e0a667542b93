pub mod ast;
pub mod builder;
pub mod charclass;
pub mod compose;
pub mod error;
pub mod quantifier;
pub mod render;

pub use ast::{Expression, Negatable, PosixKind};
pub use builder::{AlternationBuilder, Negation, RegexBuilder};
pub use charclass::CharacterClassBuilder;
pub use error::{BuildError, BuildFailure};
pub use quantifier::QuantifierType;
pub use render::to_source_literal;

/// Builds a pattern from the operations `f` applies to a fresh builder.
///
/// Example:
/// ```
/// use regex_construct::{regex, QuantifierType};
///
/// let pattern = regex(|b| {
///     b.literal("v");
///     b.at_least_once(QuantifierType::Greedy, |b| {
///         b.digit();
///     });
/// });
/// assert_eq!(pattern.unwrap(), r"v\d+");
/// ```
pub fn regex<F>(f: F) -> Result<String, BuildFailure>
where
    F: FnOnce(&mut RegexBuilder),
{
    let mut builder = RegexBuilder::new();
    f(&mut builder);
    builder.build()
}
