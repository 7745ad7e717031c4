//! Streaming scan over a `find` invocation.
//!
//! [`FindScan`] pulls lines from the process one at a time, frames them into
//! records and assembles rows on demand. It is forward-only and cannot be
//! restarted; running the query again means executing it again.
//!
//! GNU `find` exits with status 1 both for a command line it rejects and for
//! entries it could not read during the walk. Only the second leaves the
//! rows intact, so a non-zero exit ends the scan with an error unless every
//! diagnostic other than a warning names an entry below the root.

use super::assembler::RowAssembler;
use super::decoder::RecordDecoder;
use super::process::{LineSource, ProcessExit};
use crate::diagnostics::{DiagnosticSink, Severity};
use crate::error::{ExecutionError, ExecutionResult};
use crate::row::Row;
use std::sync::Arc;

/// Iterator of rows produced by one invocation
pub struct FindScan {
    /// Output of the running invocation; `None` once released
    source: Option<Box<dyn LineSource>>,
    decoder: Option<RecordDecoder>,
    assembler: Option<RowAssembler>,
    sink: Arc<dyn DiagnosticSink>,
    /// Error to yield before anything else, e.g. a failed spawn
    pending: Option<ExecutionError>,
    rows: usize,
    done: bool,
}

impl FindScan {
    pub fn new(
        source: Box<dyn LineSource>,
        assembler: RowAssembler,
        sink: Arc<dyn DiagnosticSink>,
    ) -> Self {
        Self {
            source: Some(source),
            decoder: Some(RecordDecoder::new(assembler.shape())),
            assembler: Some(assembler),
            sink,
            pending: None,
            rows: 0,
            done: false,
        }
    }

    /// A scan that yields `error` once and then ends
    pub fn failed(error: ExecutionError, sink: Arc<dyn DiagnosticSink>) -> Self {
        Self {
            source: None,
            decoder: None,
            assembler: None,
            sink,
            pending: Some(error),
            rows: 0,
            done: false,
        }
    }

    /// Rows produced so far
    pub fn rows_produced(&self) -> usize {
        self.rows
    }

    fn try_next_row(&mut self) -> ExecutionResult<Option<Row>> {
        if let Some(error) = self.pending.take() {
            return Err(error);
        }
        let (source, decoder, assembler) =
            match (&mut self.source, &mut self.decoder, &self.assembler) {
                (Some(source), Some(decoder), Some(assembler)) => (source, decoder, assembler),
                _ => return Ok(None),
            };

        loop {
            let line = match source.next_line()? {
                Some(line) => line,
                None => {
                    decoder.finish()?;
                    return Ok(None);
                }
            };
            if let Some(record) = decoder.push_line(line) {
                if let Some(row) = assembler.assemble(&record)? {
                    return Ok(Some(row));
                }
            }
        }
    }

    /// Release the process, waiting for it when the output was drained.
    fn close(&mut self, drained: bool) -> ExecutionResult<()> {
        self.done = true;
        let Some(mut source) = self.source.take() else {
            return Ok(());
        };
        if !drained {
            // Dropping the source terminates the process
            return Ok(());
        }
        match source.finish() {
            Ok(Some(exit)) => {
                let root = self.assembler.as_ref().map_or("", |a| a.root());
                check_exit(&exit, root, self.rows, self.sink.as_ref())
            }
            Ok(None) => {
                log::debug!("Scan finished after {} rows", self.rows);
                Ok(())
            }
            Err(e) => {
                log::warn!("Failed to wait for find: {}", e);
                Ok(())
            }
        }
    }
}

/// Decide whether a finished process invalidates the scan.
fn check_exit(
    exit: &ProcessExit,
    root: &str,
    rows: usize,
    sink: &dyn DiagnosticSink,
) -> ExecutionResult<()> {
    if exit.success() {
        log::debug!("Scan finished after {} rows", rows);
        return Ok(());
    }

    let errors: Vec<&String> = exit.stderr.iter().filter(|line| !is_warning(line)).collect();
    let fatal = errors
        .iter()
        .find(|line| !is_traversal_diagnostic(line, root));
    if errors.is_empty() || fatal.is_some() {
        return Err(ExecutionError::FindFailed {
            status: exit.to_string(),
            message: fatal
                .map(|line| line.to_string())
                .unwrap_or_else(|| exit.stderr.join("; ")),
        });
    }

    let message = format!(
        "find exited with {} after {} rows: {}",
        exit,
        rows,
        exit.stderr.join("; ")
    );
    log::warn!("{}", message);
    sink.report(Severity::Warning, &message);
    Ok(())
}

/// `find: warning: ...`, printed for options that do not change the result
fn is_warning(line: &str) -> bool {
    line.contains(": warning: ")
}

/// Whether `line` reports a problem with an entry strictly below `root`,
/// e.g. `find: '/srv/media/private': Permission denied`.
fn is_traversal_diagnostic(line: &str, root: &str) -> bool {
    !root.is_empty()
        && line.match_indices(root).any(|(start, _)| {
            line[start + root.len()..]
                .chars()
                .next()
                .map_or(false, |c| !matches!(c, '\'' | '\u{2019}' | '`' | '"' | ':'))
        })
}

impl Iterator for FindScan {
    type Item = ExecutionResult<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let result = match self.try_next_row() {
            Ok(Some(row)) => {
                self.rows += 1;
                return Some(Ok(row));
            }
            Ok(None) => match self.close(true) {
                Ok(()) => return None,
                Err(e) => e,
            },
            Err(e) => {
                // Errors reading the output take precedence over the exit status
                let _ = self.close(false);
                e
            }
        };
        self.sink.report(Severity::Error, &result.to_string());
        Some(Err(result))
    }
}

impl std::iter::FusedIterator for FindScan {}
