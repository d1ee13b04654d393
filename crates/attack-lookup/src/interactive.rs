//! Interactive prompt loop

use anyhow::Result;
use colored::Colorize;
use std::io::{self, BufRead, Write};

use attack_lookup::{AttackMapping, MappingError};

/// Read lookup values from stdin until EOF or (q)uit.
///
/// Each line may hold several comma-separated values; every value gets its
/// own result line.
pub fn run_interactive(mapping: &AttackMapping) -> Result<()> {
    println!(
        "Running attack-lookup in interactive mode, exit with (q)uit. \
         Enter one or more values to lookup, separated by a comma."
    );

    let stdin = io::stdin();
    let mut line = String::new();

    loop {
        print!("{} ", "ATT&CK>".cyan().bold());
        io::stdout().flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            // newline keeps the shell prompt clean after ^D
            println!();
            break;
        }

        if is_quit(&line) {
            break;
        }

        for result in lookup_line(mapping, &line)? {
            println!("{}", result);
        }
    }

    Ok(())
}

fn is_quit(line: &str) -> bool {
    let input = line.trim();
    input.eq_ignore_ascii_case("q") || input.eq_ignore_ascii_case("quit")
}

/// Resolve every comma-separated value on one input line
fn lookup_line(mapping: &AttackMapping, line: &str) -> Result<Vec<String>, MappingError> {
    line.trim_end_matches('\n')
        .split(',')
        .map(|value| mapping.lookup(value))
        .collect()
}
