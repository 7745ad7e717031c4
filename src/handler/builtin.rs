//! Builtin fields of the listing tool.
//!
//! Each builtin maps a column name to a `find -printf` directive, the
//! compiler used to push qualifiers on it down as `find` tests, and the
//! deserializer applied to its raw output.

use crate::pushdown::QualCompiler;
use crate::row::Value;

/// Directive printing the path relative to the starting point
pub const PATH_DIRECTIVE: &str = "%P";

/// Conversion from a raw output field to a column value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deserializer {
    /// Empty text is NULL, anything else is kept as is
    Default,
    /// `%T+` style timestamps: `2017-03-22+22:33:15.0` becomes
    /// `2017-03-22 22:33:15.0`
    Time,
    /// Directory names with the root prefix removed
    Directory,
    /// Integer when the text parses as one
    Integer,
}

impl Deserializer {
    pub fn apply(&self, raw: &str, root: &str) -> Value {
        match self {
            Deserializer::Default => default_value(raw),
            Deserializer::Time => default_value(&raw.replace('+', " ")),
            Deserializer::Directory => {
                if raw.len() > root.len() && raw.starts_with(root) {
                    Value::String(raw[root.len()..].to_string())
                } else {
                    Value::String(String::new())
                }
            }
            Deserializer::Integer => match raw.parse::<i64>() {
                Ok(i) => Value::Integer(i),
                Err(_) => default_value(raw),
            },
        }
    }
}

fn default_value(raw: &str) -> Value {
    if raw.is_empty() {
        Value::Null
    } else {
        Value::String(raw.to_string())
    }
}

/// A field the listing tool can print directly
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuiltinField {
    pub name: &'static str,
    pub directive: &'static str,
    pub compiler: QualCompiler,
    pub deserializer: Deserializer,
}

impl BuiltinField {
    const fn new(
        name: &'static str,
        directive: &'static str,
        compiler: QualCompiler,
        deserializer: Deserializer,
    ) -> Self {
        Self {
            name,
            directive,
            compiler,
            deserializer,
        }
    }

    /// Look up a builtin by column name
    pub fn lookup(name: &str) -> Option<BuiltinField> {
        BUILTINS.iter().find(|field| field.name == name).copied()
    }

    /// Whether this field prints the root-relative path
    pub fn is_path(&self) -> bool {
        self.directive == PATH_DIRECTIVE
    }
}

pub static BUILTINS: [BuiltinField; 23] = [
    BuiltinField::new("accessed", "%A+", QualCompiler::Time('a'), Deserializer::Time),
    BuiltinField::new("changed", "%C+", QualCompiler::Time('c'), Deserializer::Time),
    BuiltinField::new("depth", "%d", QualCompiler::Depth, Deserializer::Integer),
    BuiltinField::new("devnum", "%D", QualCompiler::Unsupported, Deserializer::Default),
    BuiltinField::new("dirname", "%h", QualCompiler::Unsupported, Deserializer::Directory),
    BuiltinField::new("eperms", "%M", QualCompiler::Unsupported, Deserializer::Default),
    BuiltinField::new("filename", "%f", QualCompiler::Name, Deserializer::Default),
    BuiltinField::new("filesystem", "%F", QualCompiler::FileSystem, Deserializer::Default),
    BuiltinField::new("fullpath", "%p", QualCompiler::FullPath, Deserializer::Default),
    BuiltinField::new("gid", "%G", QualCompiler::Numeric("-gid"), Deserializer::Integer),
    BuiltinField::new("group", "%g", QualCompiler::Owner("-group"), Deserializer::Default),
    BuiltinField::new("hardlinks", "%n", QualCompiler::Links, Deserializer::Integer),
    BuiltinField::new("inum", "%i", QualCompiler::Numeric("-inum"), Deserializer::Integer),
    BuiltinField::new("modified", "%T+", QualCompiler::Time('m'), Deserializer::Time),
    BuiltinField::new("path", PATH_DIRECTIVE, QualCompiler::Path, Deserializer::Default),
    BuiltinField::new("perms", "%m", QualCompiler::Unsupported, Deserializer::Default),
    BuiltinField::new("selinux", "%Z", QualCompiler::Unsupported, Deserializer::Default),
    BuiltinField::new("size", "%s", QualCompiler::Size, Deserializer::Integer),
    BuiltinField::new("sparseness", "%S", QualCompiler::Unsupported, Deserializer::Default),
    BuiltinField::new("symlink", "%l", QualCompiler::Symlink, Deserializer::Default),
    BuiltinField::new("type", "%Y", QualCompiler::Type, Deserializer::Default),
    BuiltinField::new("uid", "%U", QualCompiler::Numeric("-uid"), Deserializer::Integer),
    BuiltinField::new("user", "%u", QualCompiler::Owner("-user"), Deserializer::Default),
];
