//! Handler registry.
//!
//! The registry is built once per table from its options and declared
//! columns. Construction either succeeds with a handler for every column or
//! fails with the first configuration error; a partially built registry is
//! never handed out.

use super::{BuiltinField, CompiledPattern, Handler, DEBUG_QUALS};
use crate::config::TableOptions;
use crate::error::{ConfigError, ConfigResult};
use std::collections::{HashMap, HashSet};

/// Resolved handlers and the compiled patterns they refer to
#[derive(Debug, Clone, PartialEq)]
pub struct HandlerRegistry {
    handlers: HashMap<String, Handler>,
    patterns: Vec<CompiledPattern>,
}

impl HandlerRegistry {
    /// Resolve a handler for every column in `columns`.
    ///
    /// `options` must already be stripped of reserved table options and
    /// `root` must be normalized.
    pub fn build<S: AsRef<str>>(
        options: &TableOptions,
        columns: &[S],
        root: &str,
    ) -> ConfigResult<Self> {
        let mut builder = RegistryBuilder::new(root, columns);
        for (column, value) in options.iter() {
            builder.add_option(column, value)?;
        }
        builder.finish(columns)
    }

    pub fn get(&self, column: &str) -> Option<&Handler> {
        self.handlers.get(column)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.handlers.contains_key(column)
    }

    pub fn pattern(&self, index: usize) -> Option<&CompiledPattern> {
        self.patterns.get(index)
    }

    pub fn patterns(&self) -> &[CompiledPattern] {
        &self.patterns
    }

    /// Number of resolved columns, pattern groups included
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

struct RegistryBuilder<'a> {
    root: &'a str,
    requested: HashSet<&'a str>,
    handlers: HashMap<String, Handler>,
    patterns: Vec<CompiledPattern>,
}

impl<'a> RegistryBuilder<'a> {
    fn new<S: AsRef<str>>(root: &'a str, columns: &'a [S]) -> Self {
        Self {
            root,
            requested: columns.iter().map(|c| c.as_ref()).collect(),
            handlers: HashMap::new(),
            patterns: Vec::new(),
        }
    }

    fn add_option(&mut self, column: &str, value: &str) -> ConfigResult<()> {
        if !self.requested.contains(column) {
            return Err(ConfigError::ColumnNotRequested {
                column: column.to_string(),
            });
        }
        if self.handlers.contains_key(column) {
            return Err(ConfigError::DuplicateColumn {
                column: column.to_string(),
            });
        }

        if value.starts_with('/') || value.starts_with('~') {
            self.handlers.insert(
                column.to_string(),
                Handler::External {
                    command: value.to_string(),
                },
            );
        } else if !value.contains('(') {
            let field = BuiltinField::lookup(value).ok_or_else(|| ConfigError::UnknownAlias {
                column: column.to_string(),
                target: value.to_string(),
            })?;
            self.handlers
                .insert(column.to_string(), Handler::Builtin(field));
        } else {
            self.add_pattern(column, value)?;
        }
        Ok(())
    }

    fn add_pattern(&mut self, column: &str, expression: &str) -> ConfigResult<()> {
        let pattern = CompiledPattern::compile(column, expression, self.root)?;
        let index = self.patterns.len();

        let groups = pattern.groups();
        if let Some(taken) = groups.iter().find(|g| self.handlers.contains_key(g.as_str())) {
            return Err(ConfigError::DuplicateColumn {
                column: taken.clone(),
            });
        }

        for group in groups {
            self.handlers.insert(
                group.clone(),
                Handler::Pattern {
                    pattern: index,
                    group: group.clone(),
                },
            );
        }
        // The column reads the first group when it is not itself a group name
        if !groups.iter().any(|g| g == column) {
            self.handlers.insert(
                column.to_string(),
                Handler::Pattern {
                    pattern: index,
                    group: groups[0].clone(),
                },
            );
        }

        self.patterns.push(pattern);
        Ok(())
    }

    fn finish<S: AsRef<str>>(mut self, columns: &[S]) -> ConfigResult<HandlerRegistry> {
        for column in columns.iter().map(|c| c.as_ref()) {
            if self.handlers.contains_key(column) || column == DEBUG_QUALS {
                continue;
            }
            let field = BuiltinField::lookup(column).ok_or_else(|| ConfigError::UnknownColumn {
                column: column.to_string(),
            })?;
            self.handlers.insert(column.to_string(), Handler::Builtin(field));
        }

        Ok(HandlerRegistry {
            handlers: self.handlers,
            patterns: self.patterns,
        })
    }
}
