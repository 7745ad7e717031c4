//! Filesystem tables backed by GNU `find`.
//!
//! Columns are either builtin `find` fields, named groups of a regular
//! expression applied to each relative path, or the output of an external
//! command run once per entry. Qualifiers on the scan are translated into
//! `find` tests wherever `find` can evaluate them.

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod executor;
pub mod handler;
pub mod pushdown;
pub mod qual;
pub mod query;
pub mod row;
pub mod table;

pub use config::{PatternMismatch, TableConfig, TableOptions};
pub use diagnostics::{DiagnosticSink, LogSink, MemorySink, Severity};
pub use error::{ConfigError, ExecutionError};
pub use executor::FindScan;
pub use qual::{row_matches, Operator, QualValue, Qualifier};
pub use row::{Row, Value};
pub use table::{FindTable, ScanOptions};
