//! Bidirectional ID <-> name lookup over loaded entries
//!
//! IDs are keyed case-insensitively. Name lookups go through a reverse map
//! built once at load time, so both directions are O(1) average-case while
//! the bundle order is preserved for names shared by several IDs.

use regex::Regex;
use std::collections::HashMap;
use thiserror::Error;

use crate::dataset::Entry;

/// Lookup errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum MappingError {
    #[error("Mapping is empty, load a matrix before looking values up")]
    Unloaded,
}

/// Outcome of a single query, before rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Query was an ID; this is its name
    Name(String),
    /// Query was a name with exactly one ID
    Id(String),
    /// Query was a name shared by several IDs, in bundle order
    Multiple(Vec<String>),
    /// Nothing matched
    NotFound,
}

/// ID -> name and name -> IDs mapping for one loaded matrix
pub struct AttackMapping {
    /// Lowercased ID -> display name
    by_id: HashMap<String, String>,
    /// Lowercased name -> original-case IDs, in bundle order
    by_name: HashMap<String, Vec<String>>,
    /// Matches T####, TA####, and T####.###, any casing
    id_pattern: Regex,
}

impl AttackMapping {
    pub fn new() -> Self {
        Self {
            by_id: HashMap::new(),
            by_name: HashMap::new(),
            id_pattern: Regex::new(r"(?i)^TA?[0-9]{4}(\.[0-9]{3})?$").unwrap(),
        }
    }

    /// Number of loaded IDs
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// True until a load has populated the mapping
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// (Re)build both maps from a loaded entry list.
    ///
    /// A duplicate ID keeps its first position but takes the latest name;
    /// upstream bundles occasionally carry revoked objects under an
    /// already-seen ID.
    pub fn load(&mut self, entries: &[Entry]) {
        self.by_id.clear();
        self.by_name.clear();

        let mut order: Vec<String> = Vec::with_capacity(entries.len());
        for entry in entries {
            let key = entry.id.to_lowercase();
            if !self.by_id.contains_key(&key) {
                order.push(entry.id.clone());
            }
            self.by_id.insert(key, entry.name.clone());
        }

        for id in order {
            let name = &self.by_id[&id.to_lowercase()];
            self.by_name
                .entry(name.to_lowercase())
                .or_default()
                .push(id);
        }
    }

    /// Typed lookup: classify the query as an ID or a name and resolve it
    pub fn resolve(&self, query: &str) -> Result<Resolution, MappingError> {
        if self.by_id.is_empty() {
            return Err(MappingError::Unloaded);
        }

        let query = query.trim();

        if self.id_pattern.is_match(query) {
            return Ok(match self.by_id.get(&query.to_lowercase()) {
                Some(name) => Resolution::Name(name.clone()),
                None => Resolution::NotFound,
            });
        }

        match self.by_name.get(&query.to_lowercase()) {
            Some(ids) if ids.len() == 1 => Ok(Resolution::Id(ids[0].clone())),
            Some(ids) => Ok(Resolution::Multiple(ids.clone())),
            None => Ok(Resolution::NotFound),
        }
    }

    /// String lookup with the sentinel values the CLI prints
    pub fn lookup(&self, query: &str) -> Result<String, MappingError> {
        Ok(match self.resolve(query)? {
            Resolution::Name(name) => name,
            Resolution::Id(id) => id,
            Resolution::Multiple(ids) => {
                format!("Multiple possible values: {}", ids.join(", "))
            }
            Resolution::NotFound => format!("<No value found for \"{}\">", query.trim()),
        })
    }
}

impl Default for AttackMapping {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, name: &str) -> Entry {
        Entry {
            id: id.to_string(),
            name: name.to_string(),
            source: "mitre-attack".to_string(),
        }
    }

    fn loaded_mapping() -> AttackMapping {
        let entries = vec![
            entry("T1574", "Hijack Execution Flow"),
            entry("T1583.001", "Domains"),
            entry("TA0042", "Resource Development"),
            entry("T1584.001", "Domains"),
        ];

        let mut mapping = AttackMapping::new();
        mapping.load(&entries);
        mapping
    }

    #[test]
    fn test_id_lookup_is_case_insensitive() {
        let mapping = loaded_mapping();
        for query in ["T1574", "t1574", "  T1574  "] {
            assert_eq!(mapping.lookup(query).unwrap(), "Hijack Execution Flow");
        }
        for query in ["TA0042", "tA0042", "ta0042"] {
            assert_eq!(mapping.lookup(query).unwrap(), "Resource Development");
        }
    }

    #[test]
    fn test_name_lookup_is_case_insensitive() {
        let mapping = loaded_mapping();
        assert_eq!(mapping.lookup("Hijack Execution Flow").unwrap(), "T1574");
        assert_eq!(mapping.lookup("hijack execution flow").unwrap(), "T1574");
        assert_eq!(mapping.lookup("HIJACK EXECUTION FLOW").unwrap(), "T1574");
    }

    #[test]
    fn test_shared_name_lists_ids_in_bundle_order() {
        let mapping = loaded_mapping();
        assert_eq!(
            mapping.lookup("Domains").unwrap(),
            "Multiple possible values: T1583.001, T1584.001"
        );
        assert_eq!(
            mapping.resolve("domains").unwrap(),
            Resolution::Multiple(vec!["T1583.001".to_string(), "T1584.001".to_string()])
        );
    }

    #[test]
    fn test_unknown_queries_get_the_sentinel() {
        let mapping = loaded_mapping();

        let result = mapping.lookup("nonexistent technique asdf").unwrap();
        assert!(result.contains("No value found for"));
        assert!(result.contains("nonexistent technique asdf"));

        // a well-formed ID that is not in the matrix is also just not found
        let result = mapping.lookup("T9999").unwrap();
        assert!(result.contains("No value found for \"T9999\""));
    }

    #[test]
    fn test_round_trip_for_unique_names() {
        let mapping = loaded_mapping();
        for (id, name) in [
            ("T1574", "Hijack Execution Flow"),
            ("TA0042", "Resource Development"),
        ] {
            assert_eq!(mapping.lookup(id).unwrap(), name);
            assert_eq!(mapping.lookup(name).unwrap(), id);
        }
    }

    #[test]
    fn test_unloaded_mapping_is_a_hard_error() {
        let mapping = AttackMapping::new();
        assert_eq!(mapping.lookup("T1574"), Err(MappingError::Unloaded));
        assert_eq!(mapping.resolve("Domains"), Err(MappingError::Unloaded));
    }

    #[test]
    fn test_reload_replaces_previous_contents() {
        let mut mapping = loaded_mapping();
        mapping.load(&[entry("T1059", "Command and Scripting Interpreter")]);

        assert_eq!(mapping.len(), 1);
        assert_eq!(
            mapping.lookup("T1059").unwrap(),
            "Command and Scripting Interpreter"
        );
        assert!(mapping.lookup("T1574").unwrap().contains("No value found"));
    }

    #[test]
    fn test_duplicate_id_keeps_position_and_latest_name() {
        let mut mapping = AttackMapping::new();
        mapping.load(&[
            entry("T1574", "Old Name"),
            entry("TA0042", "Resource Development"),
            entry("T1574", "Hijack Execution Flow"),
        ]);

        assert_eq!(mapping.len(), 2);
        assert_eq!(mapping.lookup("T1574").unwrap(), "Hijack Execution Flow");
        assert_eq!(mapping.lookup("Hijack Execution Flow").unwrap(), "T1574");
        assert!(mapping.lookup("Old Name").unwrap().contains("No value found"));
    }

    #[test]
    fn test_id_classifier_boundaries() {
        let mapping = loaded_mapping();

        // sub-technique IDs are classified as IDs, any casing
        assert_eq!(
            mapping.resolve("t1583.001").unwrap(),
            Resolution::Name("Domains".to_string())
        );

        // shaped like IDs: resolved against the ID map even when absent
        assert_eq!(mapping.resolve("T1059.003").unwrap(), Resolution::NotFound);
        assert_eq!(mapping.resolve("ta0001").unwrap(), Resolution::NotFound);

        // malformed IDs fall through to the name path and miss there
        for query in ["T105", "T10590", "T1059.03", "T1059.0031", ""] {
            assert_eq!(
                mapping.resolve(query).unwrap(),
                Resolution::NotFound,
                "query {:?}",
                query
            );
        }
    }
}
