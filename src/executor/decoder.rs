//! Record framing.
//!
//! Every matched entry produces one primary line (the `-printf` output)
//! followed by one auxiliary line per `-exec` clause. [`RecordDecoder`]
//! groups the raw line stream back into records of that shape.

use crate::error::{ExecutionError, ExecutionResult};

/// Lines making up one record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordShape {
    /// Auxiliary lines after each primary line
    pub auxiliary_lines: usize,
}

/// One entry's worth of output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub primary: String,
    pub auxiliary: Vec<String>,
}

#[derive(Debug)]
enum DecoderState {
    AwaitPrimary,
    AwaitAuxiliary {
        primary: String,
        auxiliary: Vec<String>,
    },
}

/// Line-counting state machine over the output stream
#[derive(Debug)]
pub struct RecordDecoder {
    shape: RecordShape,
    state: DecoderState,
}

impl RecordDecoder {
    pub fn new(shape: RecordShape) -> Self {
        Self {
            shape,
            state: DecoderState::AwaitPrimary,
        }
    }

    /// Feed one line. Returns a record once its last line has arrived.
    pub fn push_line(&mut self, line: String) -> Option<Record> {
        let expected = self.shape.auxiliary_lines;
        match std::mem::replace(&mut self.state, DecoderState::AwaitPrimary) {
            DecoderState::AwaitPrimary if expected == 0 => Some(Record {
                primary: line,
                auxiliary: Vec::new(),
            }),
            DecoderState::AwaitPrimary => {
                self.state = DecoderState::AwaitAuxiliary {
                    primary: line,
                    auxiliary: Vec::with_capacity(expected),
                };
                None
            }
            DecoderState::AwaitAuxiliary {
                primary,
                mut auxiliary,
            } => {
                auxiliary.push(line);
                if auxiliary.len() == expected {
                    Some(Record { primary, auxiliary })
                } else {
                    self.state = DecoderState::AwaitAuxiliary { primary, auxiliary };
                    None
                }
            }
        }
    }

    /// Signal end of output. Fails if a record is incomplete.
    pub fn finish(&mut self) -> ExecutionResult<()> {
        match std::mem::replace(&mut self.state, DecoderState::AwaitPrimary) {
            DecoderState::AwaitPrimary => Ok(()),
            DecoderState::AwaitAuxiliary { auxiliary, .. } => {
                Err(ExecutionError::TruncatedRecord {
                    expected: self.shape.auxiliary_lines,
                    actual: auxiliary.len(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(decoder: &mut RecordDecoder, lines: &[&str]) -> Vec<Record> {
        lines
            .iter()
            .filter_map(|line| decoder.push_line(line.to_string()))
            .collect()
    }

    #[test]
    fn test_primary_only() {
        let mut decoder = RecordDecoder::new(RecordShape { auxiliary_lines: 0 });
        let records = feed(&mut decoder, &["a", "b"]);
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].primary, "b");
        assert!(records[1].auxiliary.is_empty());
        assert!(decoder.finish().is_ok());
    }

    #[test]
    fn test_auxiliary_lines_follow_primary() {
        let mut decoder = RecordDecoder::new(RecordShape { auxiliary_lines: 2 });
        let records = feed(
            &mut decoder,
            &["a.txt", "text/plain", "abc123", "b.png", "image/png", "def456"],
        );
        assert_eq!(
            records,
            vec![
                Record {
                    primary: "a.txt".to_string(),
                    auxiliary: vec!["text/plain".to_string(), "abc123".to_string()],
                },
                Record {
                    primary: "b.png".to_string(),
                    auxiliary: vec!["image/png".to_string(), "def456".to_string()],
                },
            ]
        );
        assert!(decoder.finish().is_ok());
    }

    #[test]
    fn test_truncated_record() {
        let mut decoder = RecordDecoder::new(RecordShape { auxiliary_lines: 2 });
        let records = feed(&mut decoder, &["a.txt", "text/plain"]);
        assert!(records.is_empty());
        let err = decoder.finish().unwrap_err();
        assert!(matches!(
            err,
            ExecutionError::TruncatedRecord {
                expected: 2,
                actual: 1
            }
        ));
    }
}
