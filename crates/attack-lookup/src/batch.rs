//! Batch mode - resolve a file of queries and write the results

use anyhow::{Context, Result};
use clap::ValueEnum;
use std::fmt;
use std::fs;
use std::path::Path;

use attack_lookup::AttackMapping;

/// Shape of the batch output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// One lookup result per line
    Results,
    /// One `original_query,result` row per line
    Csv,
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputMode::Results => write!(f, "results"),
            OutputMode::Csv => write!(f, "csv"),
        }
    }
}

/// Look up every line of `input` and write the results to `output`
/// ("-" means stdout).
pub fn run_batch(
    mapping: &AttackMapping,
    input: &Path,
    output: &str,
    mode: OutputMode,
) -> Result<()> {
    let input_data = fs::read_to_string(input).with_context(|| {
        format!(
            "Failed to open {}, is the path/permissions correct?",
            input.display()
        )
    })?;

    let queries: Vec<&str> = input_data.lines().map(str::trim).collect();

    let mut results = Vec::with_capacity(queries.len());
    for query in &queries {
        results.push(mapping.lookup(query)?);
    }

    let output_data = render(&queries, &results, mode);

    if output == "-" {
        println!("{}", output_data);
    } else {
        fs::write(output, format!("{}\n", output_data))
            .with_context(|| format!("Failed to write to {}, bad path/permissions?", output))?;
        println!("Wrote output data to {}", output);
    }

    Ok(())
}

/// Join results into the final file body, one line per input line
fn render(queries: &[&str], results: &[String], mode: OutputMode) -> String {
    match mode {
        OutputMode::Results => results.join("\n"),
        OutputMode::Csv => queries
            .iter()
            .zip(results)
            .map(|(query, result)| format!("{},{}", query, result))
            .collect::<Vec<_>>()
            .join("\n"),
    }
}
