//! Process plumbing for scans.
//!
//! A [`Spawner`] turns an [`Invocation`] into a [`LineSource`]. The default
//! [`ProcessSpawner`] runs the program with its standard output piped; the
//! child is killed and reaped when the source is dropped before the output
//! is exhausted, and its standard error is collected for the exit check.
//! [`CannedSpawner`] replays fixed output and records every invocation it
//! receives.

use crate::error::{ExecutionError, ExecutionResult};
use crate::query::Invocation;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::fmt;
use std::io::{self, BufRead, BufReader};
use std::process::{Child, ChildStderr, ChildStdout, Stdio};
use std::thread::{self, JoinHandle};

/// Standard error lines kept per process; the rest is only logged
const MAX_DIAGNOSTIC_LINES: usize = 64;

/// How a process that ran to completion ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessExit {
    /// Exit code, `None` when terminated by a signal
    pub code: Option<i32>,
    /// Lines written to standard error
    pub stderr: Vec<String>,
}

impl ProcessExit {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

impl fmt::Display for ProcessExit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "exit code {}", code),
            None => write!(f, "a signal"),
        }
    }
}

/// Sequential line reader over a scan's output
pub trait LineSource: Send {
    /// Next line without its terminator, or `None` at end of output.
    fn next_line(&mut self) -> io::Result<Option<String>>;

    /// Release the underlying resources. Returns how the process ended when
    /// the source is backed by a process that ran to completion.
    fn finish(&mut self) -> io::Result<Option<ProcessExit>>;
}

/// Starts the listing program for a scan
pub trait Spawner: Send + Sync {
    fn spawn(&self, invocation: &Invocation) -> ExecutionResult<Box<dyn LineSource>>;
}

/// Spawns real processes
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessSpawner;

impl Spawner for ProcessSpawner {
    fn spawn(&self, invocation: &Invocation) -> ExecutionResult<Box<dyn LineSource>> {
        let mut child = invocation
            .to_command()
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| ExecutionError::Spawn {
                program: invocation.program.clone(),
                source,
            })?;
        log::debug!("Spawned {} (pid {})", invocation.program, child.id());

        // Drained on its own thread so a chatty stderr cannot block stdout
        let diagnostics = child
            .stderr
            .take()
            .map(|stderr| thread::spawn(move || collect_diagnostics(stderr)));

        let Some(stdout) = child.stdout.take() else {
            // Dropping the output kills and reaps the child
            drop(ChildOutput {
                child,
                reader: None,
                diagnostics,
                reaped: false,
            });
            let error = io::Error::new(io::ErrorKind::BrokenPipe, "child has no standard output");
            return Err(error.into());
        };

        Ok(Box::new(ChildOutput {
            child,
            reader: Some(BufReader::new(stdout)),
            diagnostics,
            reaped: false,
        }))
    }
}

fn collect_diagnostics(stderr: ChildStderr) -> Vec<String> {
    let mut lines = Vec::new();
    for line in BufReader::new(stderr).split(b'\n') {
        match line {
            Ok(buf) => {
                let line = trim_line(&buf);
                log::debug!("{}", line);
                if lines.len() < MAX_DIAGNOSTIC_LINES {
                    lines.push(line);
                }
            }
            Err(e) => {
                log::warn!("Failed to read standard error: {}", e);
                break;
            }
        }
    }
    lines
}

/// Output of a running child process
pub struct ChildOutput {
    child: Child,
    reader: Option<BufReader<ChildStdout>>,
    diagnostics: Option<JoinHandle<Vec<String>>>,
    reaped: bool,
}

impl LineSource for ChildOutput {
    fn next_line(&mut self) -> io::Result<Option<String>> {
        let reader = match self.reader.as_mut() {
            Some(reader) => reader,
            None => return Ok(None),
        };
        let mut buf = Vec::new();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            return Ok(None);
        }
        Ok(Some(trim_line(&buf)))
    }

    fn finish(&mut self) -> io::Result<Option<ProcessExit>> {
        if self.reaped {
            return Ok(None);
        }
        // Closing the pipe first lets a child blocked on write terminate
        self.reader = None;
        let status = self.child.wait()?;
        self.reaped = true;

        let stderr = match self.diagnostics.take().map(JoinHandle::join) {
            Some(Ok(lines)) => lines,
            Some(Err(_)) => {
                log::warn!("Standard error reader of pid {} panicked", self.child.id());
                Vec::new()
            }
            None => Vec::new(),
        };
        Ok(Some(ProcessExit {
            code: status.code(),
            stderr,
        }))
    }
}

impl Drop for ChildOutput {
    fn drop(&mut self) {
        if self.reaped {
            return;
        }
        self.reader = None;
        log::info!("Terminating pid {} before end of output", self.child.id());
        if let Err(e) = self.child.kill() {
            log::debug!("Failed to kill pid {}: {}", self.child.id(), e);
        }
        if let Err(e) = self.child.wait() {
            log::warn!("Failed to reap pid {}: {}", self.child.id(), e);
        }
    }
}

/// Strip `\n` / `\r\n` and decode lossily
fn trim_line(buf: &[u8]) -> String {
    let mut end = buf.len();
    while end > 0 && matches!(buf[end - 1], b'\n' | b'\r') {
        end -= 1;
    }
    String::from_utf8_lossy(&buf[..end]).into_owned()
}

/// Replays fixed output for every scan
#[derive(Debug, Default)]
pub struct CannedSpawner {
    output: String,
    exit: Option<ProcessExit>,
    invocations: Mutex<Vec<Invocation>>,
}

impl CannedSpawner {
    pub fn new(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            exit: None,
            invocations: Mutex::new(Vec::new()),
        }
    }

    /// Report `exit` once the output has been replayed
    pub fn with_exit(mut self, exit: ProcessExit) -> Self {
        self.exit = Some(exit);
        self
    }

    /// Every invocation received so far
    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations.lock().clone()
    }

    pub fn last_invocation(&self) -> Option<Invocation> {
        self.invocations.lock().last().cloned()
    }
}

impl Spawner for CannedSpawner {
    fn spawn(&self, invocation: &Invocation) -> ExecutionResult<Box<dyn LineSource>> {
        self.invocations.lock().push(invocation.clone());
        let mut output = CannedOutput::new(&self.output);
        output.exit = self.exit.clone();
        Ok(Box::new(output))
    }
}

/// In-memory line source
#[derive(Debug, Default)]
pub struct CannedOutput {
    lines: VecDeque<String>,
    exit: Option<ProcessExit>,
}

impl CannedOutput {
    pub fn new(output: &str) -> Self {
        Self {
            lines: output.lines().map(String::from).collect(),
            exit: None,
        }
    }
}

impl LineSource for CannedOutput {
    fn next_line(&mut self) -> io::Result<Option<String>> {
        Ok(self.lines.pop_front())
    }

    fn finish(&mut self) -> io::Result<Option<ProcessExit>> {
        self.lines.clear();
        Ok(self.exit.take())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim_line() {
        assert_eq!(trim_line(b"example.txt\n"), "example.txt");
        assert_eq!(trim_line(b"text/plain\r\n"), "text/plain");
        assert_eq!(trim_line(b"no newline"), "no newline");
        assert_eq!(trim_line(b"\n"), "");
        assert_eq!(trim_line(b"caf\xe9\n"), "caf\u{fffd}");
    }

    #[test]
    fn test_canned_output_lines() {
        let mut source = CannedOutput::new("a\n\nb\r\n");
        assert_eq!(source.next_line().unwrap(), Some("a".to_string()));
        assert_eq!(source.next_line().unwrap(), Some("".to_string()));
        assert_eq!(source.next_line().unwrap(), Some("b".to_string()));
        assert_eq!(source.next_line().unwrap(), None);
        assert_eq!(source.finish().unwrap(), None);
    }

    #[test]
    fn test_canned_spawner_records_invocations() {
        let spawner = CannedSpawner::new("x\n");
        let invocation = Invocation {
            program: "/usr/bin/find".to_string(),
            args: vec!["/tmp/".to_string()],
        };
        let mut source = spawner.spawn(&invocation).unwrap();
        assert_eq!(source.next_line().unwrap(), Some("x".to_string()));
        assert_eq!(source.finish().unwrap(), None);
        assert_eq!(spawner.last_invocation(), Some(invocation));
        assert_eq!(spawner.invocations().len(), 1);
    }

    #[test]
    fn test_spawn_failure() {
        let invocation = Invocation {
            program: "/nonexistent/findtable-test-program".to_string(),
            args: Vec::new(),
        };
        let err = ProcessSpawner.spawn(&invocation).err().unwrap();
        assert!(matches!(err, ExecutionError::Spawn { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_child_output_reads_lines() {
        let invocation = Invocation {
            program: "/bin/sh".to_string(),
            args: vec!["-c".to_string(), "printf 'one\\ntwo\\n'".to_string()],
        };
        if !std::path::Path::new(&invocation.program).exists() {
            return;
        }
        let mut source = ProcessSpawner.spawn(&invocation).unwrap();
        assert_eq!(source.next_line().unwrap(), Some("one".to_string()));
        assert_eq!(source.next_line().unwrap(), Some("two".to_string()));
        assert_eq!(source.next_line().unwrap(), None);
        let exit = source.finish().unwrap().unwrap();
        assert!(exit.success());
        assert!(exit.stderr.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_child_output_collects_stderr() {
        let invocation = Invocation {
            program: "/bin/sh".to_string(),
            args: vec![
                "-c".to_string(),
                "echo row; echo 'first problem' >&2; echo 'second problem' >&2; exit 3"
                    .to_string(),
            ],
        };
        if !std::path::Path::new(&invocation.program).exists() {
            return;
        }
        let mut source = ProcessSpawner.spawn(&invocation).unwrap();
        assert_eq!(source.next_line().unwrap(), Some("row".to_string()));
        assert_eq!(source.next_line().unwrap(), None);
        let exit = source.finish().unwrap().unwrap();
        assert_eq!(
            exit,
            ProcessExit {
                code: Some(3),
                stderr: vec!["first problem".to_string(), "second problem".to_string()],
            }
        );
        assert_eq!(exit.to_string(), "exit code 3");
        assert_eq!(source.finish().unwrap(), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_dropping_child_output_releases_process() {
        let invocation = Invocation {
            program: "/bin/sh".to_string(),
            args: vec!["-c".to_string(), "yes".to_string()],
        };
        if !std::path::Path::new(&invocation.program).exists() {
            return;
        }
        let mut source = ProcessSpawner.spawn(&invocation).unwrap();
        assert_eq!(source.next_line().unwrap(), Some("y".to_string()));
        // Would hang forever if drop did not kill the child
        drop(source);
    }
}
