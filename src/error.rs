//! Error types for table configuration and query execution.

use thiserror::Error;

/// Errors detected while building a table from its options.
///
/// All of these are raised before any process is spawned; a table that
/// fails to configure never produces rows.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("No root_directory specified in options")]
    MissingRootDirectory,

    #[error("Invalid alias for column {column}: {target} is not a builtin field")]
    UnknownAlias { column: String, target: String },

    #[error("Column defined more than once: {column}")]
    DuplicateColumn { column: String },

    #[error("Invalid pattern for column {column}: {reason}")]
    InvalidPattern { column: String, reason: String },

    #[error("Column {column} is configured but not declared by the table")]
    ColumnNotRequested { column: String },

    #[error("Invalid column: {column} has no option and is not a builtin field")]
    UnknownColumn { column: String },

    #[error("Invalid value for option {option}: {value}")]
    InvalidOption { option: String, value: String },
}

/// Errors raised while a row sequence is being produced.
///
/// These end the current scan; rows yielded before the error stay valid.
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Path {path:?} does not match pattern {pattern}")]
    PatternMismatch { path: String, pattern: String },

    #[error("Output ended inside a record: expected {expected} auxiliary lines, got {actual}")]
    TruncatedRecord { expected: usize, actual: usize },

    #[error("Malformed record: expected {expected} fields, got {actual} in {line:?}")]
    MalformedRecord {
        expected: usize,
        actual: usize,
        line: String,
    },

    #[error("find failed with {status}: {message}")]
    FindFailed { status: String, message: String },

    #[error("Qualifier {qualifier} cannot be pushed down")]
    PushDownDeclined { qualifier: String },

    #[error("Column {column} is not defined by this table")]
    UnknownColumn { column: String },
}

/// Result type for table configuration.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for query execution.
pub type ExecutionResult<T> = Result<T, ExecutionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ConfigError::UnknownAlias {
            column: "ts".to_string(),
            target: "mtime".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid alias for column ts: mtime is not a builtin field"
        );

        let err = ExecutionError::TruncatedRecord {
            expected: 2,
            actual: 1,
        };
        assert_eq!(
            err.to_string(),
            "Output ended inside a record: expected 2 auxiliary lines, got 1"
        );

        let err = ExecutionError::MalformedRecord {
            expected: 2,
            actual: 1,
            line: "a".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Malformed record: expected 2 fields, got 1 in \"a\""
        );
    }
}
