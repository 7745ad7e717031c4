//! External invocation of the listing tool.

use crate::config::TableConfig;
use std::fmt;
use std::process::Command;

/// A program and its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    /// Assemble a `find` command line.
    ///
    /// `find [-O3 -L] <root> -regextype posix-egrep -ignore_readdir_race
    /// <filters> -printf <format> (-exec ... ;)*`
    pub fn find(
        config: &TableConfig,
        filters: &[String],
        format: &str,
        commands: &[String],
    ) -> Self {
        let mut args = vec!["-O3".to_string()];
        if config.follow_symlinks {
            args.push("-L".to_string());
        }
        args.push(config.root.clone());
        args.extend(
            ["-regextype", "posix-egrep", "-ignore_readdir_race"]
                .iter()
                .map(|s| s.to_string()),
        );
        args.extend(filters.iter().cloned());
        args.push("-printf".to_string());
        args.push(format.to_string());
        for command in commands {
            args.extend(exec_clause(command));
        }

        Self {
            program: config.find_program.clone(),
            args,
        }
    }

    pub fn to_command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        command
    }
}

/// Build `-exec <words> [{}] ;` for a command template. The matched path is
/// appended unless the template already places it with `{}`.
pub fn exec_clause(template: &str) -> Vec<String> {
    let mut clause = vec!["-exec".to_string()];
    for (i, word) in template.split_whitespace().enumerate() {
        if i == 0 {
            clause.push(expand_home(word));
        } else {
            clause.push(word.to_string());
        }
    }
    if !template.contains("{}") {
        clause.push("{}".to_string());
    }
    clause.push(";".to_string());
    clause
}

/// `find -exec` does not go through a shell, so `~/` is expanded here.
fn expand_home(program: &str) -> String {
    match (program.strip_prefix("~/"), std::env::var("HOME")) {
        (Some(rest), Ok(home)) => format!("{}/{}", home.trim_end_matches('/'), rest),
        _ => program.to_string(),
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            let printable = arg.escape_debug().to_string();
            if printable.is_empty() || printable != *arg || arg.contains([' ', ';', '*', '?']) {
                write!(f, " \"{}\"", printable)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PatternMismatch, DEFAULT_FIND_PROGRAM};

    fn config(follow_symlinks: bool) -> TableConfig {
        TableConfig {
            root: "/usr/share/example/".to_string(),
            find_program: DEFAULT_FIND_PROGRAM.to_string(),
            follow_symlinks,
            pattern_mismatch: PatternMismatch::Error,
        }
    }

    #[test]
    fn test_find_invocation_layout() {
        let filters = vec!["-type".to_string(), "f".to_string()];
        let commands = vec!["/usr/bin/file -b -i".to_string()];
        let invocation = Invocation::find(&config(true), &filters, "%P\n", &commands);

        assert_eq!(invocation.program, "/usr/bin/find");
        assert_eq!(
            invocation.args,
            vec![
                "-O3",
                "-L",
                "/usr/share/example/",
                "-regextype",
                "posix-egrep",
                "-ignore_readdir_race",
                "-type",
                "f",
                "-printf",
                "%P\n",
                "-exec",
                "/usr/bin/file",
                "-b",
                "-i",
                "{}",
                ";",
            ]
        );
    }

    #[test]
    fn test_without_symlink_following() {
        let invocation = Invocation::find(&config(false), &[], "%P\n", &[]);
        assert_eq!(invocation.args[0], "-O3");
        assert_eq!(invocation.args[1], "/usr/share/example/");
    }

    #[test]
    fn test_exec_clause_placeholder() {
        assert_eq!(
            exec_clause("/usr/bin/file -b -i"),
            vec!["-exec", "/usr/bin/file", "-b", "-i", "{}", ";"]
        );
        assert_eq!(
            exec_clause("/usr/bin/stat -c %s {}"),
            vec!["-exec", "/usr/bin/stat", "-c", "%s", "{}", ";"]
        );
    }

    #[test]
    fn test_display_quotes_special_arguments() {
        let invocation = Invocation {
            program: "/usr/bin/find".to_string(),
            args: vec!["-name".to_string(), "*.txt".to_string(), ";".to_string()],
        };
        assert_eq!(invocation.to_string(), "/usr/bin/find -name \"*.txt\" \";\"");
    }
}
