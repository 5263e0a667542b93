use std::fmt::{self, Display, Write};

use crate::ast::{
    BackReference, Direction, Expression, GroupKind, LookAround, PosixClass, ShorthandClass,
    ShorthandKind, SpecialAtom,
};

/// Writes `text` with every regex metacharacter escaped.
///
/// Example: `a.b*` → `a\.b\*`
pub fn write_escaped_literal(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    for c in text.chars() {
        match c {
            '\t' => f.write_str("\\t")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\\' | '^' | '$' | '.' | '|' | '?' | '*' | '+' | '(' | ')' | '[' | '{' => {
                f.write_char('\\')?;
                f.write_char(c)?;
            }
            _ => f.write_char(c)?,
        }
    }
    Ok(())
}

/// Quotes `pattern` as a double-quoted source string literal.
///
/// Example: `\d"` → `"\\d\""`
pub fn to_source_literal(pattern: &str) -> String {
    let mut quoted = String::with_capacity(pattern.len() + 2);
    quoted.push('"');
    for c in pattern.chars() {
        if c == '\\' || c == '"' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

impl Display for SpecialAtom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = match self {
            SpecialAtom::Any => ".",
            SpecialAtom::LineStart => "^",
            SpecialAtom::LineEnd => "$",
            SpecialAtom::StringStart => "\\A",
            SpecialAtom::StringEnd => "\\z",
            SpecialAtom::LastLineEnd => "\\Z",
            SpecialAtom::PreviousMatch => "\\G",
        };
        f.write_str(token)
    }
}

impl Display for ShorthandClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (positive, negative) = match self.kind {
            ShorthandKind::Digit => ("\\d", "\\D"),
            ShorthandKind::Whitespace => ("\\s", "\\S"),
            // [a-zA-Z0-9_], may vary with the engine
            ShorthandKind::Word => ("\\w", "\\W"),
            ShorthandKind::WordBoundary => ("\\b", "\\B"),
        };
        f.write_str(if self.negated { negative } else { positive })
    }
}

impl Display for PosixClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negated {
            write!(f, "\\P{{{}}}", self.kind.name())
        } else {
            write!(f, "\\p{{{}}}", self.kind.name())
        }
    }
}

impl Display for BackReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackReference::Name(name) => write!(f, "\\k<{}>", name),
            BackReference::Index(index) => write!(f, "\\{}", index),
            // the sign keeps `\k<+1>` apart from the absolute `\k<1>`
            BackReference::Relative(offset) => write!(f, "\\k<{:+}>", offset),
        }
    }
}

impl Display for LookAround {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match (self.direction, self.negated) {
            (Direction::Ahead, false) => "(?=",
            (Direction::Ahead, true) => "(?!",
            (Direction::Behind, false) => "(?<=",
            (Direction::Behind, true) => "(?<!",
        };
        write!(f, "{}{})", prefix, self.content)
    }
}

fn starts_with_digit(node: &Expression) -> bool {
    node.to_string().starts_with(|c: char| c.is_ascii_digit())
}

fn write_group(f: &mut fmt::Formatter<'_>, content: &Expression, kind: &GroupKind) -> fmt::Result {
    match kind {
        GroupKind::Capturing(None) => write!(f, "({})", content),
        // no ':' after the name, it would be matched literally
        GroupKind::Capturing(Some(name)) => write!(f, "(?<{}>{})", name, content),
        GroupKind::NonCapturing if content.needs_grouping() => write!(f, "(?:{})", content),
        // redundant grouping
        GroupKind::NonCapturing => write!(f, "{}", content),
        GroupKind::Atomic | GroupKind::FirstMatch => write!(f, "(?>{})", content),
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Empty => Ok(()),
            Expression::Literal(text) => write_escaped_literal(f, text),
            Expression::Special(atom) => write!(f, "{}", atom),
            Expression::Shorthand(class) => write!(f, "{}", class),
            Expression::Posix(class) => write!(f, "{}", class),
            Expression::CharacterClass(class) => write!(f, "{}", class),
            Expression::Group { content, kind } => write_group(f, content, kind),
            Expression::LookAround(look_around) => write!(f, "{}", look_around),
            Expression::BackReference(reference) => write!(f, "{}", reference),
            Expression::Repetition {
                content,
                quantifier,
                kind,
            } => write!(f, "{}{}{}", content, kind, quantifier.operator()),
            Expression::Seq(children) => {
                for (idx, child) in children.iter().enumerate() {
                    if let Expression::BackReference(BackReference::Index(_)) = child {
                        if children.get(idx + 1).is_some_and(starts_with_digit) {
                            // `\1` then `0` must not read as `\10`
                            write!(f, "(?:{})", child)?;
                            continue;
                        }
                    }
                    write!(f, "{}", child)?;
                }
                Ok(())
            }
            Expression::Alt(children) => {
                for (idx, child) in children.iter().enumerate() {
                    if idx != 0 {
                        f.write_char('|')?;
                    }
                    write!(f, "{}", child)?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::ast::{
        BackReference, Direction, Expression, GroupKind, LookAround, PosixClass, PosixKind,
        ShorthandClass, ShorthandKind, SpecialAtom,
    };
    use crate::quantifier::{QuantifierType, RepetitionKind};

    fn group(content: Expression, kind: GroupKind) -> Expression {
        Expression::Group {
            content: Box::new(content),
            kind,
        }
    }

    #[test]
    fn test_render_literal() {
        assert_eq!(
            Expression::literal(r"\^$.|?*+()[{").to_string(),
            r"\\\^\$\.\|\?\*\+\(\)\[\{"
        );
        assert_eq!(Expression::literal("a\tb\nc\rd").to_string(), r"a\tb\nc\rd");
        assert_eq!(Expression::literal("a]}\"-").to_string(), "a]}\"-");
        assert_eq!(Expression::Empty.to_string(), "");
    }

    #[test]
    fn test_source_literal() {
        assert_eq!(super::to_source_literal(r#"\d"x"#), r#""\\d\"x""#);
        assert_eq!(super::to_source_literal(""), r#""""#);
    }

    #[test]
    fn test_render_atoms() {
        assert_eq!(Expression::Special(SpecialAtom::StringStart).to_string(), r"\A");
        assert_eq!(Expression::Special(SpecialAtom::LastLineEnd).to_string(), r"\Z");
        assert_eq!(
            Expression::Shorthand(ShorthandClass {
                kind: ShorthandKind::WordBoundary,
                negated: true,
            })
            .to_string(),
            r"\B"
        );
        assert_eq!(
            Expression::Posix(PosixClass {
                kind: PosixKind::HexDigit,
                negated: false,
            })
            .to_string(),
            r"\p{XDigit}"
        );
        assert_eq!(
            Expression::Posix(PosixClass {
                kind: PosixKind::Letter,
                negated: true,
            })
            .to_string(),
            r"\P{Alpha}"
        );
        assert_eq!(
            Expression::BackReference(BackReference::Name("year".to_owned())).to_string(),
            r"\k<year>"
        );
        assert_eq!(
            Expression::BackReference(BackReference::Index(2)).to_string(),
            r"\2"
        );
        assert_eq!(
            Expression::BackReference(BackReference::Relative(-1)).to_string(),
            r"\k<-1>"
        );
        assert_eq!(
            Expression::BackReference(BackReference::Relative(1)).to_string(),
            r"\k<+1>"
        );
    }

    #[test]
    fn test_render_index_reference_before_digit() {
        let reference = || Expression::BackReference(BackReference::Index(1));

        assert_eq!(
            Expression::Seq(vec![reference(), Expression::literal("0a")]).to_string(),
            r"(?:\1)0a"
        );
        assert_eq!(
            Expression::Seq(vec![reference(), Expression::literal("a0")]).to_string(),
            r"\1a0"
        );
        assert_eq!(
            Expression::Seq(vec![Expression::literal("x"), reference()]).to_string(),
            r"x\1"
        );
    }

    #[test]
    fn test_render_groups() {
        let content = || Expression::literal("ab");

        assert_eq!(group(content(), GroupKind::Capturing(None)).to_string(), "(ab)");
        assert_eq!(
            group(content(), GroupKind::Capturing(Some("x".to_owned()))).to_string(),
            "(?<x>ab)"
        );
        assert_eq!(group(content(), GroupKind::NonCapturing).to_string(), "(?:ab)");
        assert_eq!(group(content(), GroupKind::Atomic).to_string(), "(?>ab)");
        assert_eq!(group(content(), GroupKind::FirstMatch).to_string(), "(?>ab)");

        // redundant grouping is elided
        assert_eq!(
            group(
                Expression::Posix(PosixClass {
                    kind: PosixKind::Letter,
                    negated: false,
                }),
                GroupKind::NonCapturing
            )
            .to_string(),
            r"\p{Alpha}"
        );
        assert_eq!(
            group(Expression::literal("a"), GroupKind::NonCapturing).to_string(),
            "a"
        );
    }

    #[test]
    fn test_render_look_around() {
        let look = |direction, negated| {
            Expression::LookAround(LookAround {
                content: Box::new(Expression::literal("x")),
                direction,
                negated,
            })
            .to_string()
        };

        assert_eq!(look(Direction::Ahead, false), "(?=x)");
        assert_eq!(look(Direction::Ahead, true), "(?!x)");
        assert_eq!(look(Direction::Behind, false), "(?<=x)");
        assert_eq!(look(Direction::Behind, true), "(?<!x)");
    }

    #[test]
    fn test_render_composites() {
        let repetition = Expression::Repetition {
            content: Box::new(Expression::Special(SpecialAtom::Any)),
            quantifier: QuantifierType::Lazy,
            kind: RepetitionKind::AtLeastOnce,
        };
        assert_eq!(repetition.to_string(), ".+?");

        let possessive = Expression::Repetition {
            content: Box::new(group(Expression::literal("ab"), GroupKind::NonCapturing)),
            quantifier: QuantifierType::Possessive,
            kind: RepetitionKind::Range { min: 1, max: 3 },
        };
        assert_eq!(possessive.to_string(), "(?:ab){1,3}+");

        let alternation = Expression::Alt(vec![
            Expression::literal("cat"),
            Expression::literal("dog"),
        ]);
        assert_eq!(alternation.to_string(), "cat|dog");

        let sequence = Expression::Seq(vec![
            group(alternation, GroupKind::NonCapturing),
            Expression::literal("x"),
        ]);
        assert_eq!(sequence.to_string(), "(?:cat|dog)x");
    }
}
