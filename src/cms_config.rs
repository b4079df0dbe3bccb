//! Validation of the CMS admin `config.yml`.
//!
//! The file is parsed as YAML and the `collections[*].fields[*].name` values
//! are checked for repeats. Duplicate mapping keys (two `editor:` entries in
//! the same block, say) are already rejected by the YAML parser and surface
//! as parse errors.

use std::collections::HashSet;

use clap::ValueEnum;
use serde::Serialize;
use serde_yaml::Value;

/// Which field names are compared against each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicateScope {
    /// Names from every collection go into one list, so the same field name
    /// in two collections counts as a duplicate.
    #[default]
    Global,
    /// Each collection is checked on its own.
    PerCollection,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Parse(String),
    Duplicates(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSummary {
    pub collections: usize,
    pub fields: usize,
}

pub fn parse_config(text: &str) -> Result<Value, String> {
    serde_yaml::from_str(text).map_err(|e| e.to_string())
}

/// Field names per collection, in document order. Entries that are not the
/// expected shape (non-list `fields`, missing or non-string `name`) are skipped.
pub fn field_names_by_collection(config: &Value) -> Vec<Vec<String>> {
    let Some(collections) = config.get("collections").and_then(Value::as_sequence) else {
        return Vec::new();
    };

    collections
        .iter()
        .map(|collection| {
            collection
                .get("fields")
                .and_then(Value::as_sequence)
                .map(|fields| {
                    fields
                        .iter()
                        .filter_map(|f| f.get("name").and_then(Value::as_str))
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default()
        })
        .collect()
}

/// Names that occur more than once, each reported once in first-seen order.
pub fn find_duplicates(names: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    let mut duplicates = Vec::new();
    for name in names {
        if !seen.insert(name.as_str()) && reported.insert(name.as_str()) {
            duplicates.push(name.clone());
        }
    }
    duplicates
}

pub fn duplicates_in(per_collection: &[Vec<String>], scope: DuplicateScope) -> Vec<String> {
    match scope {
        DuplicateScope::Global => find_duplicates(&per_collection.concat()),
        DuplicateScope::PerCollection => {
            let mut all = Vec::new();
            for names in per_collection {
                for dup in find_duplicates(names) {
                    if !all.contains(&dup) {
                        all.push(dup);
                    }
                }
            }
            all
        }
    }
}

pub fn validate(text: &str, scope: DuplicateScope) -> Result<ConfigSummary, ConfigError> {
    let config = parse_config(text).map_err(ConfigError::Parse)?;
    let per_collection = field_names_by_collection(&config);

    let duplicates = duplicates_in(&per_collection, scope);
    if !duplicates.is_empty() {
        return Err(ConfigError::Duplicates(duplicates));
    }

    Ok(ConfigSummary {
        collections: per_collection.len(),
        fields: per_collection.iter().map(Vec::len).sum(),
    })
}
