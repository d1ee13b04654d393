//! Dataset loading - fetch or read a STIX bundle and extract lookup entries
//!
//! Online mode downloads a matrix bundle from the MITRE CTI repository.
//! Offline mode reads the same JSON from a local cache laid out as
//! `<data_dir>/<version>/<matrix>-attack.json`.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::matrix::Matrix;

/// External-reference namespaces that carry ATT&CK IDs
const ID_SOURCES: &[&str] = &["mitre-attack", "mitre-ics-attack", "mitre-mobile-attack"];

/// STIX object type for techniques and sub-techniques
const TECHNIQUE_TYPE: &str = "attack-pattern";
/// STIX object type for tactics
const TACTIC_TYPE: &str = "x-mitre-tactic";

/// Upper bound on the remote fetch
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Dataset loading errors
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Offline data not available for {0}, please run with online mode")]
    Unavailable(String),

    #[error("Failed to download ATT&CK data from GitHub, status code was {0}")]
    Fetch(u16),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Malformed bundle: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Where a matrix bundle comes from
#[derive(Debug, Clone)]
pub enum DataSource {
    /// Download from the MITRE CTI repository
    Online,
    /// Read from a local cache rooted at `data_dir`
    Offline { data_dir: PathBuf },
}

/// One technique, sub-technique, or tactic extracted from a bundle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// ATT&CK ID, e.g. "T1574" or "TA0042"
    pub id: String,
    /// Display name, e.g. "Hijack Execution Flow"
    pub name: String,
    /// External-reference namespace the ID came from
    pub source: String,
}

/// Top-level STIX bundle; everything but `objects` is ignored
#[derive(Deserialize)]
struct Bundle {
    objects: Vec<StixObject>,
}

#[derive(Deserialize)]
struct StixObject {
    #[serde(rename = "type")]
    object_type: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    external_references: Vec<ExternalReference>,
}

#[derive(Deserialize)]
struct ExternalReference {
    source_name: String,
    #[serde(default)]
    external_id: Option<String>,
}

/// Load the lookup entries for a matrix/version from the given source.
///
/// Entries come back in bundle order, which drives the tie output order
/// for names shared by several IDs.
pub fn load_entries(
    matrix: Matrix,
    version: &str,
    source: &DataSource,
) -> Result<Vec<Entry>, DatasetError> {
    let body = match source {
        DataSource::Online => fetch_bundle(matrix)?,
        DataSource::Offline { data_dir } => read_bundle(matrix, version, data_dir)?,
    };

    let bundle: Bundle = serde_json::from_str(&body)?;
    Ok(extract_entries(bundle))
}

/// Single GET against the CTI repository
fn fetch_bundle(matrix: Matrix) -> Result<String, DatasetError> {
    let client = reqwest::blocking::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()?;

    let response = client.get(matrix.url()).send()?;
    if !response.status().is_success() {
        return Err(DatasetError::Fetch(response.status().as_u16()));
    }

    Ok(response.text()?)
}

/// Read a bundle from the offline cache, checking version then matrix
fn read_bundle(matrix: Matrix, version: &str, data_dir: &Path) -> Result<String, DatasetError> {
    let version_dir = data_dir.join(version);
    if !version_dir.exists() {
        return Err(DatasetError::Unavailable(version.to_string()));
    }

    let bundle_path = version_dir.join(format!("{}.json", matrix.file_stem()));
    if !bundle_path.exists() {
        return Err(DatasetError::Unavailable(format!("{} {}", matrix, version)));
    }

    Ok(fs::read_to_string(bundle_path)?)
}

/// Filter to techniques and tactics and pull out their ATT&CK IDs.
///
/// An object with no allow-listed external reference is skipped with a
/// warning rather than failing the whole load; upstream bundles normally
/// carry exactly one per object.
fn extract_entries(bundle: Bundle) -> Vec<Entry> {
    let mut entries = Vec::new();

    for object in bundle.objects {
        if object.object_type != TECHNIQUE_TYPE && object.object_type != TACTIC_TYPE {
            continue;
        }

        let name = match object.name {
            Some(name) => name,
            None => continue,
        };

        let id_ref = object
            .external_references
            .into_iter()
            .find(|r| ID_SOURCES.contains(&r.source_name.as_str()));

        match id_ref {
            Some(ExternalReference {
                source_name,
                external_id: Some(id),
            }) => entries.push(Entry {
                id,
                name,
                source: source_name,
            }),
            _ => eprintln!(
                "Warning: skipping {:?}, no ATT&CK ID in its external references",
                name
            ),
        }
    }

    entries
}
