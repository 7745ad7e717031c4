//! Qualifiers offered by the host for push-down.
//!
//! A qualifier is a single `field operator value` predicate. The table never
//! relies on a qualifier being applied: anything it cannot express as listing
//! filters is left for the host to re-check.

pub mod eval;
pub mod operator;
pub mod value;

pub use eval::row_matches;
pub use operator::Operator;
pub use value::QualValue;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single predicate on one column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Qualifier {
    pub field: String,
    pub operator: Operator,
    pub value: QualValue,
    /// `field op ANY(array)` style predicates
    #[serde(default)]
    pub is_list_operator: bool,
}

impl Qualifier {
    pub fn new(field: impl Into<String>, operator: Operator, value: impl Into<QualValue>) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
            is_list_operator: false,
        }
    }

    /// Create a list-membership qualifier
    pub fn list(field: impl Into<String>, operator: Operator, values: Vec<QualValue>) -> Self {
        Self {
            field: field.into(),
            operator,
            value: QualValue::List(values),
            is_list_operator: true,
        }
    }
}

impl fmt::Display for Qualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_list_operator {
            write!(
                f,
                "{} {} ANY({})",
                self.field,
                self.operator.as_str(),
                self.value
            )
        } else {
            write!(f, "{} {} {}", self.field, self.operator.as_str(), self.value)
        }
    }
}

/// Render a qualifier list the way the `debug_quals` column shows it.
pub fn render_qualifiers(quals: &[Qualifier]) -> String {
    let rendered: Vec<String> = quals.iter().map(|q| q.to_string()).collect();
    format!("[{}]", rendered.join(", "))
}

/// Error returned when a qualifier cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid qualifier {input:?}: {reason}")]
pub struct ParseQualifierError {
    pub input: String,
    pub reason: &'static str,
}

impl FromStr for Qualifier {
    type Err = ParseQualifierError;

    /// Parse `field op value`, e.g. `size>=1024`, `path ~~ '%.txt'` or
    /// `type = {f,d}` for a list qualifier.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let error = |reason| ParseQualifierError {
            input: s.to_string(),
            reason,
        };

        let start = s
            .find(|c| matches!(c, '=' | '!' | '<' | '>' | '~'))
            .ok_or_else(|| error("missing operator"))?;
        let operator = Operator::ALL
            .into_iter()
            .find(|op| s[start..].starts_with(op.as_str()))
            .ok_or_else(|| error("unknown operator"))?;

        let field = s[..start].trim();
        if field.is_empty() {
            return Err(error("missing field"));
        }
        let raw = s[start + operator.as_str().len()..].trim();
        if raw.is_empty() {
            return Err(error("missing value"));
        }

        if let Some(inner) = raw.strip_prefix('{').and_then(|r| r.strip_suffix('}')) {
            let values = inner
                .split(',')
                .map(|item| parse_scalar(item.trim()))
                .collect();
            return Ok(Qualifier::list(field, operator, values));
        }

        Ok(Qualifier::new(field, operator, parse_scalar(raw)))
    }
}

fn parse_scalar(raw: &str) -> QualValue {
    if raw.len() >= 2 && raw.starts_with('\'') && raw.ends_with('\'') {
        return QualValue::Text(raw[1..raw.len() - 1].replace("''", "'"));
    }
    match raw.parse::<i64>() {
        Ok(i) => QualValue::Integer(i),
        Err(_) => QualValue::Text(raw.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_comparison() {
        let q: Qualifier = "size>=1024".parse().unwrap();
        assert_eq!(q, Qualifier::new("size", Operator::Ge, QualValue::Integer(1024)));

        let q: Qualifier = "depth != 2".parse().unwrap();
        assert_eq!(q, Qualifier::new("depth", Operator::Ne, QualValue::Integer(2)));

        let q: Qualifier = "type=f".parse().unwrap();
        assert_eq!(q, Qualifier::new("type", Operator::Eq, "f"));
    }

    #[test]
    fn test_parse_pattern_operators() {
        let q: Qualifier = "path !~~* '%.TXT'".parse().unwrap();
        assert_eq!(q.operator, Operator::NotILike);
        assert_eq!(q.value, QualValue::Text("%.TXT".to_string()));

        let q: Qualifier = "filename ~ '^a.*b$'".parse().unwrap();
        assert_eq!(q.operator, Operator::Match);

        let q: Qualifier = "user = 'o''brien'".parse().unwrap();
        assert_eq!(q.value, QualValue::Text("o'brien".to_string()));
    }

    #[test]
    fn test_parse_list() {
        let q: Qualifier = "type = {f, d}".parse().unwrap();
        assert!(q.is_list_operator);
        assert_eq!(q.value, QualValue::List(vec!["f".into(), "d".into()]));
    }

    #[test]
    fn test_parse_errors() {
        assert!("size".parse::<Qualifier>().is_err());
        assert!("= 3".parse::<Qualifier>().is_err());
        assert!("size >=".parse::<Qualifier>().is_err());
    }

    #[test]
    fn test_render_qualifiers() {
        let quals = vec![
            Qualifier::new("depth", Operator::Eq, QualValue::Integer(2)),
            Qualifier::new("type", Operator::Eq, "f"),
            Qualifier::list("user", Operator::Eq, vec!["root".into(), "bin".into()]),
        ];
        assert_eq!(
            render_qualifiers(&quals),
            "[depth = 2, type = 'f', user = ANY(ARRAY['root', 'bin'])]"
        );
        assert_eq!(render_qualifiers(&[]), "[]");
    }
}
