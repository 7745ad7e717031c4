//! Column handlers.
//!
//! Every column of a table is produced in exactly one of three ways:
//!
//! - **Builtin**: one positional field of the listing tool's `-printf` output
//! - **Pattern**: a named capture group of a regular expression matched
//!   against the entry's path
//! - **External**: one line of output from a command run once per entry
//!
//! The [`HandlerRegistry`] resolves each requested column to a [`Handler`]
//! once per table configuration.

pub mod builtin;
pub mod pattern;
pub mod registry;

pub use builtin::{BuiltinField, Deserializer, BUILTINS, PATH_DIRECTIVE};
pub use pattern::CompiledPattern;
pub use registry::HandlerRegistry;

/// Column that renders the qualifiers of the current scan instead of
/// reading anything from the listing output
pub const DEBUG_QUALS: &str = "debug_quals";

/// How a single column is produced
#[derive(Debug, Clone, PartialEq)]
pub enum Handler {
    /// Positional `-printf` field, possibly an alias of a builtin
    Builtin(BuiltinField),
    /// Capture group `group` of compiled pattern `pattern`
    Pattern { pattern: usize, group: String },
    /// Command template run once per matched entry
    External { command: String },
}
