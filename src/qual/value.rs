//! Values carried by qualifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Right-hand side of a qualifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QualValue {
    Integer(i64),
    Text(String),
    List(Vec<QualValue>),
}

impl QualValue {
    /// Integer view of the value. Text that parses as an integer counts.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            QualValue::Integer(i) => Some(*i),
            QualValue::Text(s) => s.trim().parse().ok(),
            QualValue::List(_) => None,
        }
    }

    /// Textual view of a scalar value
    pub fn as_text(&self) -> Option<String> {
        match self {
            QualValue::Integer(i) => Some(i.to_string()),
            QualValue::Text(s) => Some(s.clone()),
            QualValue::List(_) => None,
        }
    }
}

impl From<i64> for QualValue {
    fn from(value: i64) -> Self {
        QualValue::Integer(value)
    }
}

impl From<&str> for QualValue {
    fn from(value: &str) -> Self {
        QualValue::Text(value.to_string())
    }
}

impl From<String> for QualValue {
    fn from(value: String) -> Self {
        QualValue::Text(value)
    }
}

impl fmt::Display for QualValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QualValue::Integer(i) => write!(f, "{}", i),
            QualValue::Text(s) => write!(f, "'{}'", s.replace('\'', "''")),
            QualValue::List(values) => {
                write!(f, "ARRAY[")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", value)?;
                }
                write!(f, "]")
            }
        }
    }
}
