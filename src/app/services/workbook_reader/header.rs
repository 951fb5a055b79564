//! Header mapping for session spreadsheets
//!
//! Maps the column headers of one sheet to canonical field names. Matching
//! is case-insensitive, tolerant of surrounding whitespace, folds interior
//! whitespace to underscores (`"Exit Velocity"` matches `exit_velocity`),
//! and honors the alternate spellings in [`columns::ALIASES`].

use crate::constants::columns;
use crate::{Error, Result};
use std::collections::HashMap;
use std::path::Path;

/// Canonical column name to cell-index mapping for one sheet
#[derive(Debug, Clone)]
pub struct HeaderMap {
    name_to_index: HashMap<String, usize>,
}

impl HeaderMap {
    /// Analyze a header row, failing the sheet if a required column is
    /// absent
    ///
    /// When a canonical name appears more than once, the leftmost column
    /// wins.
    pub fn analyze(file: &Path, sheet: &str, headers: &[String]) -> Result<Self> {
        let mut name_to_index = HashMap::new();

        for (index, header) in headers.iter().enumerate() {
            let canonical = canonicalize(header);
            if canonical.is_empty() {
                continue;
            }
            name_to_index.entry(canonical).or_insert(index);
        }

        for required in columns::REQUIRED {
            if !name_to_index.contains_key(*required) {
                return Err(Error::missing_header(file, sheet, *required));
            }
        }

        Ok(Self { name_to_index })
    }

    /// Get the cell index for a canonical column name
    pub fn get(&self, column: &str) -> Option<usize> {
        self.name_to_index.get(column).copied()
    }

    /// Iterate all mapped (canonical name, cell index) pairs
    pub fn columns(&self) -> impl Iterator<Item = (&str, usize)> {
        self.name_to_index
            .iter()
            .map(|(name, index)| (name.as_str(), *index))
    }

    /// Number of mapped columns
    pub fn len(&self) -> usize {
        self.name_to_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.name_to_index.is_empty()
    }
}

/// Canonical form of a header cell: trimmed, lowercased, interior
/// whitespace folded to underscores, aliases resolved
fn canonicalize(header: &str) -> String {
    let folded = header
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_");

    for (alias, canonical) in columns::ALIASES {
        if folded == *alias {
            return canonical.to_string();
        }
    }
    folded
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn canonicalize_folds_case_and_whitespace() {
        assert_eq!(canonicalize("  Player_Name "), "player_name");
        assert_eq!(canonicalize("Exit Velocity"), "exit_velocity");
        assert_eq!(canonicalize("DATE"), "session_date");
        assert_eq!(canonicalize("session_date"), "session_date");
    }
}
