//! attack-lookup - MITRE ATT&CK Lookup Tool
//!
//! Resolves ATT&CK technique and tactic IDs to names and names back to IDs,
//! either at an interactive prompt or over a batch input file.

mod batch;
mod interactive;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use attack_lookup::{load_entries, normalize_version, AttackMapping, DataSource, Matrix};

use crate::batch::{run_batch, OutputMode};
use crate::interactive::run_interactive;

#[derive(Parser)]
#[command(name = "attack-lookup")]
#[command(about = "MITRE ATT&CK Lookup Tool")]
#[command(after_help = r#"EXAMPLES:
    # Interactive session against the latest enterprise matrix
    attack-lookup

    # Mobile matrix from the offline cache
    attack-lookup -m mobile -O -v v10.1

    # Batch lookups, CSV on stdout
    attack-lookup -i queries.txt --output-mode csv

    # Batch lookups written to a file
    attack-lookup -i queries.txt -o results.txt

OFFLINE CACHE:
    Offline mode reads <data-dir>/<version>/<matrix>-attack.json. The
    default data dir is the attack-lookup directory under the platform
    data directory (~/.local/share/attack-lookup on Linux).
"#)]
struct Cli {
    /// ATT&CK matrix version to use
    #[arg(short = 'v', long = "version", default_value = "v10.1")]
    version: String,

    /// ATT&CK matrix to use
    #[arg(short, long, value_enum, default_value_t = Matrix::Enterprise)]
    matrix: Matrix,

    /// Run in offline mode
    #[arg(short = 'O', long)]
    offline: bool,

    /// Root of the offline data cache
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Path to input file (one lookup value per line)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Path to output file, "-" for stdout
    #[arg(short, long, default_value = "-")]
    output: String,

    /// Mode for the output file
    #[arg(long, value_enum, default_value_t = OutputMode::Results)]
    output_mode: OutputMode,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let version = normalize_version(&cli.version);
    let source = if cli.offline {
        DataSource::Offline {
            data_dir: offline_data_dir(cli.data_dir),
        }
    } else {
        DataSource::Online
    };

    let mapping = load_matrix(cli.matrix, &version, &source)?;

    match cli.input {
        Some(input) => run_batch(&mapping, &input, &cli.output, cli.output_mode),
        None => run_interactive(&mapping),
    }
}

/// Load the requested matrix, with a progress note on stderr so piped
/// batch output on stdout stays clean. A failed load exits non-zero in
/// both modes.
fn load_matrix(matrix: Matrix, version: &str, source: &DataSource) -> Result<AttackMapping> {
    match source {
        DataSource::Online => eprint!("(loading latest {} matrix...", matrix),
        DataSource::Offline { .. } => eprint!("(loading offline {} {} matrix...", matrix, version),
    }

    let entries = load_entries(matrix, version, source).context("Failed to load ATT&CK data")?;

    let mut mapping = AttackMapping::new();
    mapping.load(&entries);
    eprintln!("done)");

    Ok(mapping)
}

/// Offline cache root: --data-dir wins, else the platform data directory
fn offline_data_dir(flag: Option<PathBuf>) -> PathBuf {
    flag.unwrap_or_else(|| {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("~/.local/share"))
            .join("attack-lookup")
    })
}
