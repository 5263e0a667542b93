use std::env;
use std::io::{self, Write};
use std::process;

use anyhow::Context;
use regex_construct::{regex, to_source_literal, QuantifierType};
use tracing_subscriber::EnvFilter;

// Usage: regex-construct [--literal]
fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let as_literal = match env::args().nth(1).as_deref() {
        None => false,
        Some("--literal") => true,
        Some(other) => {
            eprintln!("Unexpected argument '{}', expected '--literal'", other);
            process::exit(2);
        }
    };

    // a double quote, the shortest run of anything, then one of c, j..m that is also l
    let result = regex(|b| {
        b.character('"');
        b.at_least_once(QuantifierType::Lazy, |b| b.any_character());
        b.character_class(|c| {
            c.character('c');
            c.all_in_range('j'..='m');
            c.intersect_with(|c| c.character('l'));
        });
    });

    let pattern = match result {
        Ok(pattern) => pattern,
        Err(failure) => {
            eprintln!("{}", failure);
            process::exit(1);
        }
    };

    let output = if as_literal {
        to_source_literal(&pattern)
    } else {
        pattern
    };

    writeln!(io::stdout(), "{}", output).context("failed to write the pattern")?;
    Ok(())
}
