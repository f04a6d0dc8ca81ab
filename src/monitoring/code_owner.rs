//! Code owner table built from the `code_owner_mappings` setting.
//!
//! # Responsibilities
//! - Flatten team → prefixes into a prefix → team table
//! - Resolve a view module path to its owning team
//! - Record configuration shape problems without failing
//!
//! # Design Decisions
//! - Longest dotted-segment prefix wins; `a.b` never matches `a.bc`
//! - The same prefix under two teams resolves to the first team declared
//! - Explicit prefixes take priority over optional-prefix aliases
//! - Lookup walks the input's segment boundaries, O(segments) map probes

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Django app roots that can be imported with the prefix dropped.
///
/// `lms.djangoapps.grades` is also importable as `grades`, so a mapping
/// for the long form is registered under the short form as well.
const OPTIONAL_MODULE_PREFIXES: &[&str] = &[
    "lms.djangoapps.",
    "common.djangoapps.",
    "openedx.core.djangoapps.",
];

/// A problem with the shape of the `code_owner_mappings` setting.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum MappingError {
    #[error("code_owner_mappings must be a table of team to module paths, found {found}")]
    NotATable { found: String },

    #[error("code owner `{team}` must map to an array of module paths, found {found}")]
    NotAnArray { team: String, found: String },

    #[error("code owner `{team}` has a module path that is not a string ({found})")]
    NonStringPath { team: String, found: String },

    #[error("code owner `{team}` has an empty module path")]
    EmptyPath { team: String },
}

/// Normalize a module path to its dotted form.
///
/// Rust paths (`a::b`) and dotted paths (`a.b`) name the same module.
pub fn normalize_module_path(path: &str) -> String {
    path.trim().replace("::", ".")
}

/// Immutable prefix → team table.
#[derive(Debug, Clone, Default)]
pub struct CodeOwnerMappings {
    configured: bool,
    path_to_owner: HashMap<String, String>,
    errors: Vec<MappingError>,
}

impl CodeOwnerMappings {
    /// Build the table from the raw setting value.
    ///
    /// `None` and an empty table both mean "not configured". Any malformed
    /// piece is skipped and recorded; the rest of the table is still used.
    pub fn from_setting(setting: Option<&toml::Value>) -> Self {
        let Some(value) = setting else {
            return Self::default();
        };

        let table = match value {
            toml::Value::Table(table) => table,
            other => {
                let error = MappingError::NotATable {
                    found: other.type_str().to_string(),
                };
                tracing::warn!(error = %error, "Invalid code owner mappings");
                return Self {
                    configured: true,
                    path_to_owner: HashMap::new(),
                    errors: vec![error],
                };
            }
        };

        if table.is_empty() {
            return Self::default();
        }

        let mut errors = Vec::new();
        let mut explicit: Vec<(String, &str)> = Vec::new();

        for (team, paths) in table {
            let Some(paths) = paths.as_array() else {
                errors.push(MappingError::NotAnArray {
                    team: team.clone(),
                    found: paths.type_str().to_string(),
                });
                continue;
            };
            for path in paths {
                match path.as_str().map(normalize_module_path) {
                    Some(path) if path.is_empty() => {
                        errors.push(MappingError::EmptyPath { team: team.clone() });
                    }
                    Some(path) => explicit.push((path, team.as_str())),
                    None => errors.push(MappingError::NonStringPath {
                        team: team.clone(),
                        found: path.type_str().to_string(),
                    }),
                }
            }
        }

        let mut path_to_owner = HashMap::new();
        for (path, team) in &explicit {
            path_to_owner
                .entry(path.clone())
                .or_insert_with(|| team.to_string());
        }
        for (path, team) in &explicit {
            if let Some(alias) = strip_optional_prefix(path) {
                path_to_owner
                    .entry(alias.to_string())
                    .or_insert_with(|| team.to_string());
            }
        }

        for error in &errors {
            tracing::warn!(error = %error, "Invalid code owner mapping entry");
        }
        tracing::debug!(prefixes = path_to_owner.len(), "Code owner mappings processed");

        Self {
            configured: true,
            path_to_owner,
            errors,
        }
    }

    /// Whether the setting was present and non-empty.
    pub fn is_configured(&self) -> bool {
        self.configured
    }

    /// Return the team owning `module`, if any.
    pub fn code_owner_for_module(&self, module: &str) -> Option<&str> {
        let module = normalize_module_path(module);
        let mut candidate = module.as_str();
        loop {
            if let Some(owner) = self.path_to_owner.get(candidate) {
                return Some(owner.as_str());
            }
            match candidate.rfind('.') {
                Some(idx) => candidate = &candidate[..idx],
                None => return None,
            }
        }
    }

    /// Problems found while processing the setting.
    pub fn errors(&self) -> &[MappingError] {
        &self.errors
    }

    /// All errors joined into one telemetry value.
    pub fn error_summary(&self) -> Option<String> {
        if self.errors.is_empty() {
            return None;
        }
        Some(
            self.errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; "),
        )
    }

    /// Prefix table sorted by prefix, for inspection.
    pub fn entries(&self) -> Vec<(&str, &str)> {
        let mut entries: Vec<_> = self
            .path_to_owner
            .iter()
            .map(|(path, owner)| (path.as_str(), owner.as_str()))
            .collect();
        entries.sort_unstable();
        entries
    }
}

impl fmt::Display for CodeOwnerMappings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} prefixes, {} errors",
            self.path_to_owner.len(),
            self.errors.len()
        )
    }
}

fn strip_optional_prefix(path: &str) -> Option<&str> {
    OPTIONAL_MODULE_PREFIXES
        .iter()
        .find_map(|prefix| path.strip_prefix(prefix))
        .filter(|rest| !rest.is_empty())
}
