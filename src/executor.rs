//! Scan execution.
//!
//! Rows are produced Volcano-style, one at a time on demand: a
//! [`FindScan`] reads the invocation's output through a [`LineSource`],
//! frames it into records with a [`RecordDecoder`] and turns each record into
//! a row with a [`RowAssembler`].

pub mod assembler;
pub mod decoder;
pub mod find_scan;
pub mod process;

pub use assembler::RowAssembler;
pub use decoder::{Record, RecordDecoder, RecordShape};
pub use find_scan::FindScan;
pub use process::{
    CannedOutput, CannedSpawner, ChildOutput, LineSource, ProcessExit, ProcessSpawner, Spawner,
};
