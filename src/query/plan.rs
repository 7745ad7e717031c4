//! Query plans.

use super::{Invocation, FIELD_SEPARATOR};
use crate::config::TableConfig;
use crate::error::{ExecutionError, ExecutionResult};
use crate::handler::{Deserializer, Handler, HandlerRegistry, DEBUG_QUALS, PATH_DIRECTIVE};
use crate::pushdown::compile_qualifier;
use crate::qual::{render_qualifiers, Qualifier};

/// Where a requested column's value comes from in the listing output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnSource {
    /// Positional field of the primary line
    Builtin {
        field: usize,
        deserializer: Deserializer,
    },
    /// Auxiliary line following the primary line
    External { line: usize },
    /// Named group of the evaluated patterns
    Pattern { group: String },
    /// Rendering of the scan's qualifiers
    DebugQuals,
}

/// Column layout and filters for one scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPlan {
    /// Requested columns in caller order
    outputs: Vec<(String, ColumnSource)>,
    /// `-printf` directives, one per primary-line field
    directives: Vec<&'static str>,
    /// Primary-line field holding the raw relative path for patterns
    path_field: Option<usize>,
    /// Distinct patterns to evaluate, in first-use order
    patterns: Vec<usize>,
    /// Command templates, one auxiliary line each
    commands: Vec<String>,
    /// Tokens from pushed-down qualifiers
    filters: Vec<String>,
    debug_quals: Option<String>,
}

impl QueryPlan {
    /// Lay out `columns` and compile `quals` against `registry` for a scan
    /// of `config`.
    ///
    /// With `strict` set, a qualifier that yields no `find` test fails the
    /// plan instead of being left to the caller.
    pub fn compile<S: AsRef<str>>(
        registry: &HandlerRegistry,
        config: &TableConfig,
        quals: &[Qualifier],
        columns: &[S],
        strict: bool,
    ) -> ExecutionResult<Self> {
        let mut outputs = Vec::with_capacity(columns.len());
        let mut directives = Vec::new();
        let mut path_field = None;
        let mut patterns = Vec::new();
        let mut commands = Vec::new();
        let mut debug_quals = None;

        for column in columns.iter().map(|c| c.as_ref()) {
            if column == DEBUG_QUALS && !registry.contains(column) {
                debug_quals = Some(render_qualifiers(quals));
                outputs.push((column.to_string(), ColumnSource::DebugQuals));
                continue;
            }

            let handler = registry
                .get(column)
                .ok_or_else(|| ExecutionError::UnknownColumn {
                    column: column.to_string(),
                })?;
            let source = match handler {
                Handler::Builtin(field) => {
                    let index = directives.len();
                    directives.push(field.directive);
                    if field.is_path() && path_field.is_none() {
                        path_field = Some(index);
                    }
                    ColumnSource::Builtin {
                        field: index,
                        deserializer: field.deserializer,
                    }
                }
                Handler::Pattern { pattern, group } => {
                    if !patterns.contains(pattern) {
                        patterns.push(*pattern);
                    }
                    ColumnSource::Pattern {
                        group: group.clone(),
                    }
                }
                Handler::External { command } => {
                    commands.push(command.clone());
                    ColumnSource::External {
                        line: commands.len() - 1,
                    }
                }
            };
            outputs.push((column.to_string(), source));
        }

        // Patterns need a path even when no path column was requested
        if !patterns.is_empty() && path_field.is_none() {
            path_field = Some(directives.len());
            directives.push(PATH_DIRECTIVE);
        }

        let filters = compile_filters(registry, config, quals, strict)?;

        Ok(Self {
            outputs,
            directives,
            path_field,
            patterns,
            commands,
            filters,
            debug_quals,
        })
    }

    /// `-printf` format: directives joined by the field separator
    pub fn format(&self) -> String {
        let separator = FIELD_SEPARATOR.to_string();
        format!("{}\n", self.directives.join(&separator))
    }

    /// Command line for this plan
    pub fn invocation(&self, config: &TableConfig) -> Invocation {
        Invocation::find(config, &self.filters, &self.format(), &self.commands)
    }

    pub fn outputs(&self) -> &[(String, ColumnSource)] {
        &self.outputs
    }

    pub fn directives(&self) -> &[&'static str] {
        &self.directives
    }

    pub fn path_field(&self) -> Option<usize> {
        self.path_field
    }

    pub fn patterns(&self) -> &[usize] {
        &self.patterns
    }

    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    pub fn filters(&self) -> &[String] {
        &self.filters
    }

    pub fn debug_quals(&self) -> Option<&str> {
        self.debug_quals.as_deref()
    }

    /// Fields expected on every primary line
    pub fn field_count(&self) -> usize {
        self.directives.len()
    }

    /// Lines following every primary line
    pub fn auxiliary_lines(&self) -> usize {
        self.commands.len()
    }
}

fn compile_filters(
    registry: &HandlerRegistry,
    config: &TableConfig,
    quals: &[Qualifier],
    strict: bool,
) -> ExecutionResult<Vec<String>> {
    let mut filters = Vec::new();
    for qual in quals {
        let compiled = registry
            .get(&qual.field)
            .and_then(|handler| compile_qualifier(handler, qual, config));
        match compiled {
            Some(tokens) if !tokens.is_empty() => filters.extend(tokens),
            _ if strict => {
                return Err(ExecutionError::PushDownDeclined {
                    qualifier: qual.to_string(),
                })
            }
            _ => log::debug!("Qualifier {} left to the caller", qual),
        }
    }
    Ok(filters)
}
