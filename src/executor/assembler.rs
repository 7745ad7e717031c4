//! Row assembly.
//!
//! Turns one [`Record`] into a [`Row`] following the plan's column layout:
//! positional fields go through their builtin deserializer, auxiliary lines
//! are taken verbatim, and pattern columns read the named groups matched
//! against the raw relative path.

use super::decoder::{Record, RecordShape};
use crate::config::PatternMismatch;
use crate::error::{ExecutionError, ExecutionResult};
use crate::handler::HandlerRegistry;
use crate::query::{ColumnSource, QueryPlan, FIELD_SEPARATOR};
use crate::row::{Row, Value};
use std::collections::HashMap;
use std::sync::Arc;

pub struct RowAssembler {
    plan: QueryPlan,
    registry: Arc<HandlerRegistry>,
    root: String,
    mismatch: PatternMismatch,
}

impl RowAssembler {
    pub fn new(
        plan: QueryPlan,
        registry: Arc<HandlerRegistry>,
        root: impl Into<String>,
        mismatch: PatternMismatch,
    ) -> Self {
        Self {
            plan,
            registry,
            root: root.into(),
            mismatch,
        }
    }

    /// Shape of the records this plan produces
    pub fn shape(&self) -> RecordShape {
        RecordShape {
            auxiliary_lines: self.plan.auxiliary_lines(),
        }
    }

    pub fn plan(&self) -> &QueryPlan {
        &self.plan
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    /// Build the row for `record`. Returns `None` when the row is dropped
    /// because its path did not match a pattern under
    /// [`PatternMismatch::Skip`].
    pub fn assemble(&self, record: &Record) -> ExecutionResult<Option<Row>> {
        let expected = self.plan.field_count();
        let fields: Vec<&str> = if expected == 0 {
            Vec::new()
        } else {
            record.primary.split(FIELD_SEPARATOR).collect()
        };
        if fields.len() != expected {
            return Err(ExecutionError::MalformedRecord {
                expected,
                actual: fields.len(),
                line: record.primary.clone(),
            });
        }

        let mut groups: HashMap<&str, Option<&str>> = HashMap::new();
        if let Some(path_field) = self.plan.path_field() {
            let subject = fields[path_field];
            for pattern in self
                .plan
                .patterns()
                .iter()
                .filter_map(|&index| self.registry.pattern(index))
            {
                match pattern.captures(subject) {
                    Some(captures) => groups.extend(captures),
                    None => match self.mismatch {
                        PatternMismatch::Error => {
                            return Err(ExecutionError::PatternMismatch {
                                path: subject.to_string(),
                                pattern: pattern.as_str().to_string(),
                            })
                        }
                        PatternMismatch::Skip => return Ok(None),
                        PatternMismatch::Null => {}
                    },
                }
            }
        }

        let mut row = Row::with_capacity(self.plan.outputs().len());
        for (column, source) in self.plan.outputs() {
            let value = match source {
                ColumnSource::Builtin {
                    field,
                    deserializer,
                } => deserializer.apply(fields[*field], &self.root),
                ColumnSource::External { line } => Value::String(record.auxiliary[*line].clone()),
                ColumnSource::Pattern { group } => match groups.get(group.as_str()) {
                    Some(Some(text)) if !text.is_empty() => Value::from(*text),
                    _ => Value::Null,
                },
                ColumnSource::DebugQuals => self
                    .plan
                    .debug_quals()
                    .map(Value::from)
                    .unwrap_or(Value::Null),
            };
            row.push(column.as_str(), value);
        }
        Ok(Some(row))
    }
}
