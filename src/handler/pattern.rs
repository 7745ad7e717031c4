//! Path patterns with named capture groups.
//!
//! A pattern option such as `(?P<stem>[^.]+)\.(?P<extension>[^.]+)` is
//! matched against the root-relative path of every entry. Each named group
//! becomes a column. Patterns are always full matches, and a leading copy of
//! the root directory is ignored, so `^/srv/media/(?P<name>.*)$` and
//! `(?P<name>.*)` behave the same for a table rooted at `/srv/media`.

use crate::error::{ConfigError, ConfigResult};
use regex::Regex;

/// A compiled full-match pattern and the names of its groups
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    source: String,
    regex: Regex,
    groups: Vec<String>,
}

impl PartialEq for CompiledPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl CompiledPattern {
    /// Compile the pattern configured for `column`.
    ///
    /// A pattern without named groups has its first capturing group named
    /// after the column; a pattern without any capturing group is captured
    /// whole.
    pub fn compile(column: &str, expression: &str, root: &str) -> ConfigResult<Self> {
        let invalid = |reason: String| ConfigError::InvalidPattern {
            column: column.to_string(),
            reason,
        };

        let mut body = relative_body(expression, root).to_string();

        let parsed = Regex::new(&body).map_err(|e| invalid(e.to_string()))?;
        if parsed.capture_names().flatten().next().is_none() {
            body = name_first_group(&body, column);
        }

        let regex = Regex::new(&format!("^(?:{})$", body)).map_err(|e| invalid(e.to_string()))?;
        let groups: Vec<String> = regex.capture_names().flatten().map(String::from).collect();
        if groups.is_empty() {
            return Err(invalid("pattern defines no capture group".to_string()));
        }

        Ok(Self {
            source: body,
            regex,
            groups,
        })
    }

    /// Named groups in declaration order
    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    /// Pattern text as compiled, without the full-match anchors
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Match `path` and return every named group. A group that did not
    /// participate in the match maps to `None`.
    pub fn captures<'p>(&self, path: &'p str) -> Option<Vec<(&str, Option<&'p str>)>> {
        let captures = self.regex.captures(path)?;
        Some(
            self.groups
                .iter()
                .map(|name| {
                    (
                        name.as_str(),
                        captures.name(name).map(|m| m.as_str()),
                    )
                })
                .collect(),
        )
    }
}

/// Strip anchors and a leading root so the pattern applies to relative paths.
fn relative_body<'e>(expression: &'e str, root: &str) -> &'e str {
    let mut body = expression.strip_prefix('^').unwrap_or(expression);

    if let Some(rest) = body.strip_prefix(root) {
        body = rest;
    } else if let Some(rest) = body.strip_prefix(root.trim_end_matches('/')) {
        body = rest.strip_prefix('/').unwrap_or(rest);
    }

    if body.ends_with('$') && !is_escaped(body, body.len() - 1) {
        body = &body[..body.len() - 1];
    }
    body
}

/// Whether the byte at `index` is preceded by an odd number of backslashes.
pub(crate) fn is_escaped(text: &str, index: usize) -> bool {
    text.as_bytes()[..index]
        .iter()
        .rev()
        .take_while(|&&b| b == b'\\')
        .count()
        % 2
        == 1
}

/// Turn the first capturing group into `(?P<column>...)`, or capture the
/// whole expression when it has none.
fn name_first_group(body: &str, column: &str) -> String {
    let bytes = body.as_bytes();
    let mut in_class = false;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => {
                i += 2;
                continue;
            }
            b'[' if !in_class => in_class = true,
            b']' if in_class => in_class = false,
            b'(' if !in_class && bytes.get(i + 1) != Some(&b'?') => {
                return format!("{}(?P<{}>{}", &body[..i], column, &body[i + 1..]);
            }
            _ => {}
        }
        i += 1;
    }
    format!("(?P<{}>{})", column, body)
}
