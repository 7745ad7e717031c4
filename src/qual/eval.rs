//! Qualifier evaluation on decoded rows.
//!
//! Push-down only narrows what `find` emits. Declined qualifiers and tests
//! that approximate their predicate (`modified = X` becomes `-mmin 0`) are
//! settled here, against the values actually decoded.

use super::{Operator, QualValue, Qualifier};
use crate::row::{Row, Value};
use regex::{Regex, RegexBuilder};
use std::cmp::Ordering;

impl Qualifier {
    /// Whether `value` satisfies this qualifier. NULL satisfies nothing.
    ///
    /// Integer columns compare numerically. Text compares numerically when
    /// both sides are integers and lexically otherwise, which orders the
    /// `YYYY-MM-DD HH:MM:SS` timestamps correctly.
    pub fn evaluate(&self, value: &Value) -> bool {
        if value.is_null() {
            return false;
        }
        match &self.value {
            QualValue::List(items) => {
                self.is_list_operator && items.iter().any(|item| test(self.operator, value, item))
            }
            operand => test(self.operator, value, operand),
        }
    }
}

/// Whether `row` satisfies every qualifier. A qualifier on a column the row
/// does not carry is not satisfied.
pub fn row_matches(quals: &[Qualifier], row: &Row) -> bool {
    quals
        .iter()
        .all(|qual| row.get(&qual.field).map_or(false, |value| qual.evaluate(value)))
}

fn test(operator: Operator, value: &Value, operand: &QualValue) -> bool {
    if operator.is_like() || operator.is_regex() {
        let (Some(subject), Some(pattern)) = (text_of(value), operand.as_text()) else {
            return false;
        };
        let matched = match compile(operator, &pattern) {
            Some(regex) => regex.is_match(&subject),
            None => return false,
        };
        return matched != operator.is_negated();
    }

    let Some(ordering) = compare(value, operand) else {
        return false;
    };
    match operator {
        Operator::Eq => ordering == Ordering::Equal,
        Operator::Ne => ordering != Ordering::Equal,
        Operator::Lt => ordering == Ordering::Less,
        Operator::Le => ordering != Ordering::Greater,
        Operator::Gt => ordering == Ordering::Greater,
        Operator::Ge => ordering != Ordering::Less,
        _ => false,
    }
}

fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Integer(i) => Some(i.to_string()),
        Value::String(s) => Some(s.clone()),
    }
}

fn compare(value: &Value, operand: &QualValue) -> Option<Ordering> {
    match value {
        Value::Null => None,
        Value::Integer(v) => operand.as_integer().map(|o| v.cmp(&o)),
        Value::String(v) => match (v.parse::<i64>(), operand) {
            (Ok(v), QualValue::Integer(o)) => Some(v.cmp(o)),
            (_, QualValue::List(_)) => None,
            _ => Some(v.as_str().cmp(operand.as_text()?.as_str())),
        },
    }
}

/// LIKE patterns match the whole value; regex operators search anywhere.
fn compile(operator: Operator, pattern: &str) -> Option<Regex> {
    let expression = if operator.is_like() {
        like_pattern(pattern)
    } else {
        pattern.to_string()
    };
    match RegexBuilder::new(&expression)
        .case_insensitive(operator.is_case_insensitive())
        .dot_matches_new_line(operator.is_like())
        .build()
    {
        Ok(regex) => Some(regex),
        Err(e) => {
            log::warn!("Invalid pattern {:?}: {}", pattern, e);
            None
        }
    }
}

fn like_pattern(pattern: &str) -> String {
    let mut expression = String::from("^");
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        match c {
            '%' => expression.push_str(".*"),
            '_' => expression.push('.'),
            '\\' => {
                if let Some(next) = chars.next() {
                    expression.push_str(&regex::escape(&next.to_string()));
                }
            }
            c => expression.push_str(&regex::escape(&c.to_string())),
        }
    }
    expression.push('$');
    expression
}
