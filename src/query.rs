//! Query compilation.
//!
//! A [`QueryPlan`] lays the requested columns out over one `find`
//! invocation: builtin columns become `-printf` fields, external columns
//! become `-exec` clauses and pattern columns are evaluated afterwards
//! against the entry's path. [`Invocation`] is the resulting command line.

pub mod invocation;
pub mod plan;

pub use invocation::Invocation;
pub use plan::{ColumnSource, QueryPlan};

/// Separator between `-printf` fields. Unit separator (0x1f) does not occur
/// in file names produced by ordinary tools.
pub const FIELD_SEPARATOR: char = '\u{1f}';
