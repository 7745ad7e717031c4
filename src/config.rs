//! Table configuration.
//!
//! A table is configured with an ordered list of `key=value` options. Most
//! keys name a column and describe how it is produced; a handful of reserved
//! keys configure the table itself and are removed before column handlers
//! are resolved.

use crate::error::{ConfigError, ConfigResult};
use std::str::FromStr;

/// Directory the listing starts from (required)
pub const ROOT_DIRECTORY: &str = "root_directory";
/// Listing program to execute
pub const FIND_PROGRAM: &str = "find_program";
/// Whether symbolic links are followed during the walk
pub const FOLLOW_SYMLINKS: &str = "follow_symlinks";
/// What to do with entries whose path does not match a column pattern
pub const PATTERN_MISMATCH: &str = "pattern_mismatch";

pub const DEFAULT_FIND_PROGRAM: &str = "/usr/bin/find";

/// Keys that configure the table rather than a column
pub const RESERVED: [&str; 4] = [ROOT_DIRECTORY, FIND_PROGRAM, FOLLOW_SYMLINKS, PATTERN_MISMATCH];

/// Ordered list of table options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableOptions {
    entries: Vec<(String, String)>,
}

impl TableOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an option. Repeated keys are kept so that the registry can
    /// reject them.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.push((key.into(), value.into()));
    }

    /// First value for `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Remove every entry for `key`, returning the last value
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let mut removed = None;
        self.entries.retain(|(k, v)| {
            if k == key {
                removed = Some(v.clone());
                false
            } else {
                true
            }
        });
        removed
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for TableOptions
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut options = TableOptions::new();
        for (k, v) in iter {
            options.insert(k, v);
        }
        options
    }
}

/// Policy for entries whose path does not match a requested pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PatternMismatch {
    /// End the scan with an error
    #[default]
    Error,
    /// Produce the row with NULL pattern columns
    Null,
    /// Drop the row
    Skip,
}

impl FromStr for PatternMismatch {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(PatternMismatch::Error),
            "null" => Ok(PatternMismatch::Null),
            "skip" => Ok(PatternMismatch::Skip),
            _ => Err(ConfigError::InvalidOption {
                option: PATTERN_MISMATCH.to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Table-level settings taken out of the option list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableConfig {
    /// Root directory, always ending with a single `/`
    pub root: String,
    pub find_program: String,
    pub follow_symlinks: bool,
    pub pattern_mismatch: PatternMismatch,
}

impl TableConfig {
    /// Settings for `root` with every other option at its default
    pub fn new(root: &str) -> Self {
        Self {
            root: normalize_root(root),
            find_program: DEFAULT_FIND_PROGRAM.to_string(),
            follow_symlinks: false,
            pattern_mismatch: PatternMismatch::default(),
        }
    }

    /// Remove the reserved options from `options` and parse them.
    pub fn extract(options: &mut TableOptions) -> ConfigResult<Self> {
        let root = options
            .remove(ROOT_DIRECTORY)
            .filter(|root| !root.is_empty())
            .ok_or(ConfigError::MissingRootDirectory)?;

        let find_program = options
            .remove(FIND_PROGRAM)
            .unwrap_or_else(|| DEFAULT_FIND_PROGRAM.to_string());

        let follow_symlinks = match options.remove(FOLLOW_SYMLINKS) {
            Some(value) => parse_bool(FOLLOW_SYMLINKS, &value)?,
            None => false,
        };

        let pattern_mismatch = match options.remove(PATTERN_MISMATCH) {
            Some(value) => value.parse()?,
            None => PatternMismatch::default(),
        };

        Ok(Self {
            root: normalize_root(&root),
            find_program,
            follow_symlinks,
            pattern_mismatch,
        })
    }
}

/// Normalize a root directory so that it ends with exactly one `/`.
pub fn normalize_root(root: &str) -> String {
    let mut normalized = root.trim_end_matches('/').to_string();
    normalized.push('/');
    normalized
}

fn parse_bool(option: &str, value: &str) -> ConfigResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        _ => Err(ConfigError::InvalidOption {
            option: option.to_string(),
            value: value.to_string(),
        }),
    }
}
