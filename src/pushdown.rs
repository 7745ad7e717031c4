//! Qualifier push-down.
//!
//! Translates a qualifier on a resolved column into `find` tests. A
//! compiler returns `Some(tokens)` when it accepts the qualifier (the token
//! list may be empty when the field has nothing to push down) and `None`
//! when the operator is not supported for the field. Either way the host is
//! expected to re-check every qualifier on the rows it receives.

use crate::config::TableConfig;
use crate::handler::pattern::is_escaped;
use crate::handler::Handler;
use crate::qual::{Operator, Qualifier};

/// Largest depth `-mindepth`/`-maxdepth` accept
const MAX_FIND_DEPTH: i64 = i32::MAX as i64;

/// Largest repeat count of a POSIX interval expression
const MAX_REGEX_REPEAT: i64 = 0x7fff;

/// Per-field qualifier compiler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualCompiler {
    /// No `find` test exists for the field
    Unsupported,
    /// Access/change/modification time, keyed by `a`, `c` or `m`
    Time(char),
    Depth,
    Links,
    Size,
    /// Integer equality through the given flag, e.g. `-uid`
    Numeric(&'static str),
    /// Name equality through the given flag, e.g. `-user`
    Owner(&'static str),
    FileSystem,
    Type,
    /// Last path component
    Name,
    /// Path relative to the root
    Path,
    /// Path including the root
    FullPath,
    /// Symbolic link target
    Symlink,
}

/// Compile `qual` on a column produced by `handler` for a scan of `config`.
pub fn compile_qualifier(
    handler: &Handler,
    qual: &Qualifier,
    config: &TableConfig,
) -> Option<Vec<String>> {
    // Array membership has no single `find` test
    if qual.is_list_operator {
        return Some(Vec::new());
    }
    match handler {
        Handler::Builtin(field) => field.compiler.compile(qual, config),
        Handler::Pattern { .. } | Handler::External { .. } => Some(Vec::new()),
    }
}

impl QualCompiler {
    pub fn compile(&self, qual: &Qualifier, config: &TableConfig) -> Option<Vec<String>> {
        let root = config.root.as_str();
        match self {
            QualCompiler::Unsupported => Some(Vec::new()),
            QualCompiler::Time(kind) => time(*kind, qual),
            QualCompiler::Depth => depth(qual, root),
            QualCompiler::Links => signed_count("-links", "", qual),
            QualCompiler::Size => signed_count("-size", "c", qual),
            QualCompiler::Numeric(flag) => match qual.operator {
                // A leading sign would turn equality into a bound
                Operator::Eq => match qual.value.as_integer()? {
                    n if n < 0 => Some(tokens(&["-false"])),
                    n => Some(vec![flag.to_string(), n.to_string()]),
                },
                _ => None,
            },
            QualCompiler::Owner(flag) => match qual.operator {
                Operator::Eq => Some(vec![flag.to_string(), qual.value.as_text()?]),
                _ => None,
            },
            QualCompiler::FileSystem => {
                let fstype = qual.value.as_text()?;
                match qual.operator {
                    Operator::Eq => Some(tokens(&["-fstype", &fstype])),
                    Operator::Ne => Some(tokens(&["-not", "-fstype", &fstype])),
                    _ => None,
                }
            }
            QualCompiler::Type => match qual.operator {
                Operator::Eq => {
                    let code = qual.value.as_text()?.chars().next()?;
                    // Under -L only broken links are still of type l
                    if !"bcdpfls".contains(code) || (code == 'l' && config.follow_symlinks) {
                        return None;
                    }
                    Some(vec!["-type".to_string(), code.to_string()])
                }
                _ => None,
            },
            QualCompiler::Name => name(qual),
            QualCompiler::Path => path(qual, root),
            QualCompiler::FullPath => path(qual, ""),
            QualCompiler::Symlink if config.follow_symlinks => None,
            QualCompiler::Symlink => symlink(qual),
        }
    }
}

fn tokens(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Prefix `-not` for negated pattern operators
fn negate(operator: Operator, mut rest: Vec<String>) -> Vec<String> {
    if operator.is_negated() {
        rest.insert(0, "-not".to_string());
    }
    rest
}

fn time(kind: char, qual: &Qualifier) -> Option<Vec<String>> {
    let newer = format!("-newer{}t", kind);
    match qual.operator {
        Operator::Eq => Some(vec![format!("-{}min", kind), "0".to_string()]),
        Operator::Lt | Operator::Le => {
            Some(vec!["-not".to_string(), newer, qual.value.as_text()?])
        }
        Operator::Gt | Operator::Ge => Some(vec![newer, qual.value.as_text()?]),
        _ => None,
    }
}

/// `-mindepth`/`-maxdepth` are inclusive bounds.
fn depth(qual: &Qualifier, root: &str) -> Option<Vec<String>> {
    let n = qual.value.as_integer()?;
    match qual.operator {
        Operator::Eq if !(0..=MAX_FIND_DEPTH).contains(&n) => Some(tokens(&["-false"])),
        Operator::Eq => {
            let n = n.to_string();
            Some(tokens(&["-mindepth", &n, "-maxdepth", &n]))
        }
        Operator::Ne => not_at_depth(n, root),
        Operator::Lt => Some(max_depth(n.checked_sub(1))),
        Operator::Le => Some(max_depth(Some(n))),
        Operator::Gt => Some(min_depth(n.checked_add(1))),
        Operator::Ge => Some(min_depth(Some(n))),
        _ => None,
    }
}

/// `depth <= bound`; `None` is a bound below `i64::MIN`
fn max_depth(bound: Option<i64>) -> Vec<String> {
    match bound {
        Some(b) if b > MAX_FIND_DEPTH => tokens(&["-true"]),
        Some(b) if b >= 0 => vec!["-maxdepth".to_string(), b.to_string()],
        _ => tokens(&["-false"]),
    }
}

/// `depth >= bound`; `None` is a bound above `i64::MAX`
fn min_depth(bound: Option<i64>) -> Vec<String> {
    match bound {
        Some(b) if b <= 0 => tokens(&["-true"]),
        Some(b) if b <= MAX_FIND_DEPTH => vec!["-mindepth".to_string(), b.to_string()],
        _ => tokens(&["-false"]),
    }
}

/// `find` has no depth inequality; depth N is a path of N components below
/// the root.
fn not_at_depth(n: i64, root: &str) -> Option<Vec<String>> {
    match n {
        n if n < 0 => Some(tokens(&["-true"])),
        0 => Some(tokens(&["-mindepth", "1"])),
        1 => Some(vec![
            "-not".to_string(),
            "-regex".to_string(),
            format!("{}[^/]+", ere_escape(root)),
        ]),
        n if n - 1 > MAX_REGEX_REPEAT => None,
        n => {
            let expression = format!("{}[^/]+(/[^/]+){{{}}}", ere_escape(root), n - 1);
            Some(vec!["-not".to_string(), "-regex".to_string(), expression])
        }
    }
}

/// `find` numeric arguments: `N` exact, `-N` less than, `+N` greater than.
/// Bounds that cannot be written that way become `-true` or `-false`.
fn signed_count(flag: &str, unit: &str, qual: &Qualifier) -> Option<Vec<String>> {
    let n = qual.value.as_integer()?;
    match qual.operator {
        Operator::Eq if n < 0 => Some(tokens(&["-false"])),
        Operator::Eq => Some(vec![flag.to_string(), format!("{}{}", n, unit)]),
        Operator::Lt => Some(fewer_than(flag, unit, Some(n))),
        Operator::Le => Some(fewer_than(flag, unit, n.checked_add(1))),
        Operator::Gt => Some(more_than(flag, unit, Some(n))),
        Operator::Ge => Some(more_than(flag, unit, n.checked_sub(1))),
        _ => None,
    }
}

/// `count < bound`; `None` is a bound above `i64::MAX`
fn fewer_than(flag: &str, unit: &str, bound: Option<i64>) -> Vec<String> {
    match bound {
        None => tokens(&["-true"]),
        Some(b) if b <= 0 => tokens(&["-false"]),
        Some(b) => vec![flag.to_string(), format!("-{}{}", b, unit)],
    }
}

/// `count > bound`; `None` is a bound below `i64::MIN`
fn more_than(flag: &str, unit: &str, bound: Option<i64>) -> Vec<String> {
    match bound {
        Some(b) if b >= 0 => vec![flag.to_string(), format!("+{}{}", b, unit)],
        _ => tokens(&["-true"]),
    }
}

fn name(qual: &Qualifier) -> Option<Vec<String>> {
    let value = qual.value.as_text()?;
    let op = qual.operator;
    if op == Operator::Eq {
        return Some(vec!["-name".to_string(), glob_escape(&value)]);
    }
    if op.is_like() {
        let flag = if op.is_case_insensitive() { "-iname" } else { "-name" };
        return Some(negate(op, vec![flag.to_string(), like_to_glob(&value)]));
    }
    if op.is_regex() {
        // -regex sees the whole path; confine the expression to the last component
        let (start, body, end) = unanchor(&value);
        let component = if start { "[^/]*" } else { "" };
        let tail = if end { "[^/]*" } else { "" };
        let expression = format!(".*/{}({}){}", component, body, tail);
        return Some(negate(op, vec![regex_flag(op).to_string(), expression]));
    }
    None
}

fn path(qual: &Qualifier, root: &str) -> Option<Vec<String>> {
    let value = qual.value.as_text()?;
    let op = qual.operator;
    if op == Operator::Eq {
        let glob = format!("{}{}", glob_escape(root), glob_escape(&value));
        return Some(vec!["-path".to_string(), glob]);
    }
    if op.is_like() {
        let expression = format!("{}{}", ere_escape(root), like_to_regex(&value));
        return Some(negate(op, vec![regex_flag(op).to_string(), expression]));
    }
    if op.is_regex() {
        let (start, body, end) = unanchor(&value);
        let expression = format!(
            "{}{}({}){}",
            ere_escape(root),
            if start { ".*" } else { "" },
            body,
            if end { ".*" } else { "" }
        );
        return Some(negate(op, vec![regex_flag(op).to_string(), expression]));
    }
    None
}

fn symlink(qual: &Qualifier) -> Option<Vec<String>> {
    let value = qual.value.as_text()?;
    let op = qual.operator;
    if op == Operator::Eq {
        return Some(vec!["-lname".to_string(), glob_escape(&value)]);
    }
    if op.is_like() {
        let flag = if op.is_case_insensitive() { "-ilname" } else { "-lname" };
        return Some(negate(op, vec![flag.to_string(), like_to_glob(&value)]));
    }
    None
}

fn regex_flag(op: Operator) -> &'static str {
    if op.is_case_insensitive() {
        "-iregex"
    } else {
        "-regex"
    }
}

/// Split a search expression into (open start, body, open end). `find`
/// regexes must match the whole path, so unanchored sides need padding.
fn unanchor(expression: &str) -> (bool, &str, bool) {
    let (open_start, body) = match expression.strip_prefix('^') {
        Some(rest) => (false, rest),
        None => (true, expression),
    };
    match body.strip_suffix('$') {
        Some(rest) if !is_escaped(body, body.len() - 1) => (open_start, rest, false),
        _ => (open_start, body, true),
    }
}

fn glob_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn ere_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        push_ere_literal(&mut escaped, c);
    }
    escaped
}

fn push_ere_literal(out: &mut String, c: char) {
    if matches!(
        c,
        '.' | '[' | ']' | '{' | '}' | '(' | ')' | '\\' | '*' | '+' | '?' | '|' | '^' | '$'
    ) {
        out.push('\\');
    }
    out.push(c);
}

/// LIKE pattern to shell glob: `%` is `*`, `_` is `?`, `\` escapes.
fn like_to_glob(pattern: &str) -> String {
    let mut glob = String::with_capacity(pattern.len());
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        match c {
            '%' => glob.push('*'),
            '_' => glob.push('?'),
            '\\' => {
                if let Some(next) = chars.next() {
                    glob.push_str(&glob_escape(&next.to_string()));
                }
            }
            c => glob.push_str(&glob_escape(&c.to_string())),
        }
    }
    glob
}

/// LIKE pattern to an extended regex matching the whole remainder.
fn like_to_regex(pattern: &str) -> String {
    let mut regex = String::with_capacity(pattern.len() * 2);
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        match c {
            '%' => regex.push_str(".*"),
            '_' => regex.push('.'),
            '\\' => {
                if let Some(next) = chars.next() {
                    push_ere_literal(&mut regex, next);
                }
            }
            c => push_ere_literal(&mut regex, c),
        }
    }
    regex
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::BuiltinField;
    use crate::qual::QualValue;

    const ROOT: &str = "/usr/share/example/";

    fn compile(field: &str, op: Operator, value: impl Into<QualValue>) -> Option<Vec<String>> {
        let handler = Handler::Builtin(BuiltinField::lookup(field).unwrap());
        compile_qualifier(&handler, &Qualifier::new(field, op, value), &TableConfig::new(ROOT))
    }

    fn compile_following_links(field: &str, op: Operator, value: &str) -> Option<Vec<String>> {
        let handler = Handler::Builtin(BuiltinField::lookup(field).unwrap());
        let config = TableConfig {
            follow_symlinks: true,
            ..TableConfig::new(ROOT)
        };
        compile_qualifier(&handler, &Qualifier::new(field, op, value), &config)
    }

    fn args(items: &[&str]) -> Option<Vec<String>> {
        Some(tokens(items))
    }

    #[test]
    fn test_time_qualifiers() {
        assert_eq!(
            compile("modified", Operator::Eq, "2017-03-22"),
            args(&["-mmin", "0"])
        );
        assert_eq!(
            compile("accessed", Operator::Le, "2017-03-22 10:00"),
            args(&["-not", "-newerat", "2017-03-22 10:00"])
        );
        assert_eq!(
            compile("changed", Operator::Gt, "yesterday"),
            args(&["-newerct", "yesterday"])
        );
        assert_eq!(compile("modified", Operator::Ne, "2017-03-22"), None);
    }

    #[test]
    fn test_numeric_equality_only() {
        assert_eq!(compile("uid", Operator::Eq, QualValue::Integer(1000)), args(&["-uid", "1000"]));
        assert_eq!(compile("gid", Operator::Eq, "0"), args(&["-gid", "0"]));
        assert_eq!(compile("inum", Operator::Eq, QualValue::Integer(42)), args(&["-inum", "42"]));
        assert_eq!(compile("uid", Operator::Lt, QualValue::Integer(1000)), None);
        assert_eq!(compile("uid", Operator::Eq, "root"), None);
    }

    #[test]
    fn test_depth_qualifiers() {
        let two = QualValue::Integer(2);
        assert_eq!(
            compile("depth", Operator::Eq, two.clone()),
            args(&["-mindepth", "2", "-maxdepth", "2"])
        );
        assert_eq!(
            compile("depth", Operator::Ne, two.clone()),
            args(&["-not", "-regex", "/usr/share/example/[^/]+(/[^/]+){1}"])
        );
        assert_eq!(compile("depth", Operator::Lt, two.clone()), args(&["-maxdepth", "1"]));
        assert_eq!(compile("depth", Operator::Le, two.clone()), args(&["-maxdepth", "2"]));
        assert_eq!(compile("depth", Operator::Gt, two.clone()), args(&["-mindepth", "3"]));
        assert_eq!(compile("depth", Operator::Ge, two), args(&["-mindepth", "2"]));
        assert_eq!(compile("depth", Operator::Lt, QualValue::Integer(0)), args(&["-false"]));
        assert_eq!(compile("depth", Operator::Like, "2"), None);
    }

    #[test]
    fn test_depth_inequality() {
        assert_eq!(
            compile("depth", Operator::Ne, QualValue::Integer(0)),
            args(&["-mindepth", "1"])
        );
        assert_eq!(
            compile("depth", Operator::Ne, QualValue::Integer(1)),
            args(&["-not", "-regex", "/usr/share/example/[^/]+"])
        );
        assert_eq!(compile("depth", Operator::Ne, QualValue::Integer(-1)), args(&["-true"]));
        assert_eq!(compile("depth", Operator::Ne, QualValue::Integer(i64::MAX)), None);
    }

    #[test]
    fn test_depth_extremes() {
        let max = QualValue::Integer(i64::MAX);
        let min = QualValue::Integer(i64::MIN);
        assert_eq!(compile("depth", Operator::Lt, min.clone()), args(&["-false"]));
        assert_eq!(compile("depth", Operator::Le, min.clone()), args(&["-false"]));
        assert_eq!(compile("depth", Operator::Ge, min.clone()), args(&["-true"]));
        assert_eq!(compile("depth", Operator::Eq, min), args(&["-false"]));
        assert_eq!(compile("depth", Operator::Gt, max.clone()), args(&["-false"]));
        assert_eq!(compile("depth", Operator::Ge, max.clone()), args(&["-false"]));
        assert_eq!(compile("depth", Operator::Le, max.clone()), args(&["-true"]));
        assert_eq!(compile("depth", Operator::Eq, max), args(&["-false"]));
        assert_eq!(compile("depth", Operator::Gt, QualValue::Integer(-3)), args(&["-true"]));
    }

    #[test]
    fn test_hardlinks_and_size() {
        let three = QualValue::Integer(3);
        assert_eq!(compile("hardlinks", Operator::Eq, three.clone()), args(&["-links", "3"]));
        assert_eq!(compile("hardlinks", Operator::Lt, three.clone()), args(&["-links", "-3"]));
        assert_eq!(compile("hardlinks", Operator::Gt, three.clone()), args(&["-links", "+3"]));
        assert_eq!(compile("hardlinks", Operator::Le, three.clone()), args(&["-links", "-4"]));
        assert_eq!(compile("hardlinks", Operator::Ge, three), args(&["-links", "+2"]));

        let kb = QualValue::Integer(1024);
        assert_eq!(compile("size", Operator::Eq, kb.clone()), args(&["-size", "1024c"]));
        assert_eq!(compile("size", Operator::Lt, kb.clone()), args(&["-size", "-1024c"]));
        assert_eq!(compile("size", Operator::Gt, kb.clone()), args(&["-size", "+1024c"]));
        assert_eq!(compile("size", Operator::Le, kb.clone()), args(&["-size", "-1025c"]));
        assert_eq!(compile("size", Operator::Ge, kb.clone()), args(&["-size", "+1023c"]));
        assert_eq!(compile("size", Operator::Ne, kb), None);
    }

    #[test]
    fn test_counts_never_carry_two_signs() {
        let minus_five = QualValue::Integer(-5);
        assert_eq!(compile("size", Operator::Gt, minus_five.clone()), args(&["-true"]));
        assert_eq!(compile("size", Operator::Ge, minus_five.clone()), args(&["-true"]));
        assert_eq!(compile("size", Operator::Lt, minus_five.clone()), args(&["-false"]));
        assert_eq!(compile("size", Operator::Eq, minus_five.clone()), args(&["-false"]));
        assert_eq!(compile("hardlinks", Operator::Le, minus_five), args(&["-false"]));
        assert_eq!(compile("size", Operator::Lt, QualValue::Integer(0)), args(&["-false"]));
        assert_eq!(compile("size", Operator::Ge, QualValue::Integer(0)), args(&["-true"]));
        assert_eq!(compile("size", Operator::Le, QualValue::Integer(0)), args(&["-size", "-1c"]));
        assert_eq!(compile("uid", Operator::Eq, QualValue::Integer(-1)), args(&["-false"]));
    }

    #[test]
    fn test_counts_at_integer_limits() {
        let max = QualValue::Integer(i64::MAX);
        let min = QualValue::Integer(i64::MIN);
        assert_eq!(compile("size", Operator::Le, max.clone()), args(&["-true"]));
        assert_eq!(
            compile("size", Operator::Ge, max.clone()),
            Some(vec!["-size".to_string(), format!("+{}c", i64::MAX - 1)])
        );
        assert_eq!(compile("hardlinks", Operator::Ge, min.clone()), args(&["-true"]));
        assert_eq!(compile("hardlinks", Operator::Le, min), args(&["-false"]));
        assert_eq!(
            compile("hardlinks", Operator::Gt, max),
            Some(vec!["-links".to_string(), format!("+{}", i64::MAX)])
        );
    }

    #[test]
    fn test_owner_filesystem_and_type() {
        assert_eq!(compile("user", Operator::Eq, "root"), args(&["-user", "root"]));
        assert_eq!(compile("group", Operator::Eq, "wheel"), args(&["-group", "wheel"]));
        assert_eq!(compile("group", Operator::Ne, "wheel"), None);
        assert_eq!(compile("filesystem", Operator::Eq, "ext4"), args(&["-fstype", "ext4"]));
        assert_eq!(
            compile("filesystem", Operator::Ne, "nfs"),
            args(&["-not", "-fstype", "nfs"])
        );
        assert_eq!(compile("type", Operator::Eq, "f"), args(&["-type", "f"]));
        assert_eq!(compile("type", Operator::Eq, "dir"), args(&["-type", "d"]));
        assert_eq!(compile("type", Operator::Eq, ""), None);
        assert_eq!(compile("type", Operator::Eq, "N"), None);
    }

    #[test]
    fn test_link_tests_declined_when_following_links() {
        assert_eq!(compile("type", Operator::Eq, "l"), args(&["-type", "l"]));
        assert_eq!(compile_following_links("type", Operator::Eq, "l"), None);
        assert_eq!(
            compile_following_links("type", Operator::Eq, "f"),
            args(&["-type", "f"])
        );
        assert_eq!(compile_following_links("symlink", Operator::Like, "/opt/%"), None);
        assert_eq!(compile_following_links("symlink", Operator::Eq, "/opt/x"), None);
    }

    #[test]
    fn test_filename_patterns() {
        assert_eq!(compile("filename", Operator::Like, "%.txt"), args(&["-name", "*.txt"]));
        assert_eq!(compile("filename", Operator::ILike, "read_e%"), args(&["-iname", "read?e*"]));
        assert_eq!(
            compile("filename", Operator::NotLike, "%.bak"),
            args(&["-not", "-name", "*.bak"])
        );
        assert_eq!(
            compile("filename", Operator::NotILike, "%.BAK"),
            args(&["-not", "-iname", "*.BAK"])
        );
        assert_eq!(compile("filename", Operator::Eq, "a*b"), args(&["-name", "a\\*b"]));
        assert_eq!(
            compile("filename", Operator::Match, r"^\d+\.log$"),
            args(&["-regex", r".*/(\d+\.log)"])
        );
        assert_eq!(
            compile("filename", Operator::NotIMatch, "tmp"),
            args(&["-not", "-iregex", ".*/[^/]*(tmp)[^/]*"])
        );
    }

    #[test]
    fn test_path_patterns() {
        assert_eq!(
            compile("path", Operator::Like, "docs/%.md"),
            args(&["-regex", r"/usr/share/example/docs/.*\.md"])
        );
        assert_eq!(
            compile("path", Operator::NotILike, "%tmp%"),
            args(&["-not", "-iregex", "/usr/share/example/.*tmp.*"])
        );
        assert_eq!(
            compile("path", Operator::Match, "^docs/"),
            args(&["-regex", "/usr/share/example/(docs/).*"])
        );
        assert_eq!(
            compile("path", Operator::IMatch, r"\.txt$"),
            args(&["-iregex", r"/usr/share/example/.*(\.txt)"])
        );
        assert_eq!(
            compile("path", Operator::Match, r"a\\$"),
            args(&["-regex", r"/usr/share/example/.*(a\\)"])
        );
        assert_eq!(
            compile("path", Operator::Match, r"a\$"),
            args(&["-regex", r"/usr/share/example/.*(a\$).*"])
        );
        assert_eq!(
            compile("path", Operator::Eq, "docs/readme.md"),
            args(&["-path", "/usr/share/example/docs/readme.md"])
        );
        assert_eq!(
            compile("fullpath", Operator::Like, "/var/%"),
            args(&["-regex", "/var/.*"])
        );
        assert_eq!(compile("path", Operator::Lt, "docs"), None);
    }

    #[test]
    fn test_symlink_patterns() {
        assert_eq!(compile("symlink", Operator::Like, "/opt/%"), args(&["-lname", "/opt/*"]));
        assert_eq!(
            compile("symlink", Operator::NotILike, "%.so"),
            args(&["-not", "-ilname", "*.so"])
        );
        assert_eq!(compile("symlink", Operator::Match, "opt"), None);
    }

    #[test]
    fn test_fields_without_push_down() {
        for field in ["perms", "eperms", "sparseness", "devnum", "selinux", "dirname"] {
            assert_eq!(compile(field, Operator::Eq, "x"), Some(Vec::new()), "{}", field);
        }
    }

    #[test]
    fn test_list_qualifiers_are_never_pushed_down() {
        let handler = Handler::Builtin(BuiltinField::lookup("type").unwrap());
        let qual = Qualifier::list("type", Operator::Eq, vec!["f".into(), "d".into()]);
        assert_eq!(compile_qualifier(&handler, &qual, &TableConfig::new(ROOT)), Some(Vec::new()));
    }

    #[test]
    fn test_pattern_and_external_columns() {
        let qual = Qualifier::new("stem", Operator::Eq, "example");
        let pattern = Handler::Pattern {
            pattern: 0,
            group: "stem".to_string(),
        };
        assert_eq!(compile_qualifier(&pattern, &qual, &TableConfig::new(ROOT)), Some(Vec::new()));

        let external = Handler::External {
            command: "/usr/bin/file -b".to_string(),
        };
        assert_eq!(compile_qualifier(&external, &qual, &TableConfig::new(ROOT)), Some(Vec::new()));
    }

    #[test]
    fn test_like_escapes() {
        assert_eq!(like_to_glob(r"100\%_done[1]"), r"100%?done\[1\]");
        assert_eq!(like_to_regex(r"a.b\_%"), r"a\.b_.*");
        assert_eq!(ere_escape("/srv/a+b/"), r"/srv/a\+b/");
    }
}
