use fancy_regex::Regex;
use pretty_assertions::assert_eq;
use regex_construct::error::ClassOperator;
use regex_construct::{regex, BuildError, BuildFailure, QuantifierType};

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap()
}

fn full_match(pattern: &str, input: &str) -> bool {
    compile(&format!(r"\A(?:{})\z", pattern))
        .is_match(input)
        .unwrap()
}

#[test]
fn test_quoted_run_then_class() {
    let pattern = regex(|b| {
        b.character('"');
        b.at_least_once(QuantifierType::Lazy, |b| b.any_character());
        b.character_class(|c| {
            c.character('c');
            c.all_in_range('j'..='m');
            c.intersect_with(|c| c.character('l'));
        });
    })
    .unwrap();

    assert_eq!(pattern, "\"".to_owned() + ".+?" + "[cj-m&&[l]]");
}

#[test]
fn test_alternation_is_grouped() {
    let pattern = regex(|b| {
        b.alternation(|alt| {
            alt.either(|b| b.literal("cat"));
            alt.either(|b| b.literal("dog"));
        });
        b.literal("x");
    })
    .unwrap();

    assert_eq!(pattern, "(?:cat|dog)x");
    assert!(full_match(&pattern, "catx"));
    assert!(full_match(&pattern, "dogx"));
    assert!(!full_match(&pattern, "cat"));
}

#[test]
fn test_repeated_literal_is_grouped() {
    let pattern = regex(|b| {
        b.between(2, 3, QuantifierType::Greedy, |b| b.literal("ab"));
    })
    .unwrap();

    assert_eq!(pattern, "(?:ab){2,3}");
    assert!(full_match(&pattern, "abab"));
    assert!(full_match(&pattern, "ababab"));
    assert!(!full_match(&pattern, "abb"));
}

#[test]
fn test_date_with_back_references() {
    let pattern = regex(|b| {
        b.named_capture("year", |b| {
            b.exactly(4, QuantifierType::Greedy, |b| {
                b.digit();
            })
        });
        b.capture(|b| {
            b.character_class(|c| c.all_in("-/"));
        });
        b.exactly(2, QuantifierType::Greedy, |b| {
            b.digit();
        });
        b.back_reference_index(2);
        b.exactly(2, QuantifierType::Greedy, |b| {
            b.digit();
        });
    })
    .unwrap();

    assert_eq!(pattern, r"(?<year>\d{4})([-/])\d{2}\2\d{2}");
    assert!(full_match(&pattern, "2024-01-31"));
    assert!(full_match(&pattern, "2024/01/31"));
    assert!(!full_match(&pattern, "2024-01/31"));

    let repeated = regex(|b| {
        b.named_capture("word", |b| {
            b.at_least_once(QuantifierType::Greedy, |b| {
                b.word();
            })
        });
        b.character(' ');
        b.back_reference_named("word");
    })
    .unwrap();

    assert_eq!(repeated, r"(?<word>\w+) \k<word>");
    assert!(full_match(&repeated, "hey hey"));
    assert!(!full_match(&repeated, "hey you"));
}

#[test]
fn test_index_reference_followed_by_digit() {
    let pattern = regex(|b| {
        b.capture(|b| b.character('a'));
        b.back_reference_index(1);
        b.literal("0");
    })
    .unwrap();

    assert_eq!(pattern, r"(a)(?:\1)0");
    assert!(full_match(&pattern, "aa0"));
    assert!(!full_match(&pattern, "a0"));
}

#[test]
fn test_look_arounds_match() {
    let price = regex(|b| {
        b.not_preceded_by(|b| b.literal("AU"));
        b.character('$');
        b.at_least_once(QuantifierType::Greedy, |b| {
            b.digit();
        });
    })
    .unwrap();

    assert_eq!(price, r"(?<!AU)\$\d+");
    let found = compile(&price).find("AU$10, $20").unwrap().unwrap();
    assert_eq!(found.as_str(), "$20");

    let followed = regex(|b| {
        b.literal("foo");
        b.look_ahead(|b| b.literal("bar"));
    })
    .unwrap();
    assert_eq!(followed, "foo(?=bar)");
    assert!(compile(&followed).is_match("foobar").unwrap());
    assert!(!compile(&followed).is_match("foobaz").unwrap());
}

#[test]
fn test_atomic_group_commits() {
    let pattern = regex(|b| {
        b.line_start();
        b.character('a');
        b.atomic_group(|b| {
            b.alternation(|alt| {
                alt.either(|b| b.literal("bc"));
                alt.either(|b| b.literal("b"));
            })
        });
        b.character('c');
        b.line_end();
    })
    .unwrap();

    assert_eq!(pattern, "^a(?>bc|b)c$");
    assert!(compile(&pattern).is_match("abcc").unwrap());
    assert!(!compile(&pattern).is_match("abc").unwrap());
}

#[test]
fn test_negations_are_independent() {
    let pattern = regex(|b| {
        b.alternation(|alt| {
            alt.either(|b| {
                b.digit().negate();
            });
            alt.either(|b| b.literal("x"));
        });
        b.digit();
    })
    .unwrap();

    assert_eq!(pattern, r"(?:\D|x)\d");
    assert!(full_match(&pattern, "a1"));
    assert!(full_match(&pattern, "x1"));
    assert!(!full_match(&pattern, "11"));
}

#[test]
fn test_single_character_class() {
    let pattern = regex(|b| {
        b.character_class(|c| c.character('+'));
        b.at_least_once(QuantifierType::Greedy, |b| {
            b.character_class(|c| c.character('a'));
        });
    })
    .unwrap();

    assert_eq!(pattern, r"\+a+");
    assert!(full_match(&pattern, "+aaa"));
}

#[test]
fn test_character_class_subtraction() {
    let consonant = regex(|b| {
        b.character_class(|c| {
            c.all_in_range('a'..='z');
            c.exclude(|c| c.all_in("aeiou"));
        });
    })
    .unwrap();

    assert_eq!(consonant, "[a-z&&[^aeiou]]");
}

#[test]
fn test_errors_degrade_to_safe_output() {
    let result = regex(|b| {
        b.literal("a");
        b.character_class(|_| {});
        b.between(3, 1, QuantifierType::Greedy, |b| b.literal("b"));
        b.character_class(|c| c.intersect_with(|c| c.character('x')));
        b.literal("c");
    });

    assert_eq!(
        result,
        Err(BuildFailure {
            pattern: "ac".to_owned(),
            errors: vec![
                BuildError::EmptyCharacterClass,
                BuildError::InvalidRepetitionRange { min: 3, max: 1 },
                BuildError::MisplacedClassOperator(ClassOperator::Intersection),
            ],
        })
    );
    assert!(compile("ac").is_match("ac").unwrap());
}
