//! attack-lookup - MITRE ATT&CK ID/name resolution
//!
//! Maps technique and tactic IDs (T1574, TA0042, T1583.001) to their
//! human-readable names and back. Data comes from the MITRE CTI repository
//! on GitHub or from a local offline cache.
//!
//! ## Key pieces
//!
//! - [`Matrix`]: which ATT&CK domain to load (enterprise, ics, mobile)
//! - [`dataset`]: fetches or reads a STIX bundle and extracts lookup entries
//! - [`AttackMapping`]: the bidirectional ID <-> name mapping

pub mod dataset;
pub mod mapping;
pub mod matrix;

pub use dataset::{load_entries, DataSource, DatasetError, Entry};
pub use mapping::{AttackMapping, MappingError, Resolution};
pub use matrix::{normalize_version, ConfigError, Matrix};
