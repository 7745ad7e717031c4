//! Filesystem tables.
//!
//! A [`FindTable`] exposes the directory tree below its root as rows. It is
//! configured once from table options and its declared columns, and then
//! executes any number of scans, each backed by a single `find` process.

use crate::config::{TableConfig, TableOptions};
use crate::diagnostics::{DiagnosticSink, LogSink, Severity};
use crate::error::{ConfigResult, ExecutionResult};
use crate::executor::{FindScan, ProcessSpawner, RowAssembler, Spawner};
use crate::handler::HandlerRegistry;
use crate::qual::Qualifier;
use crate::query::{Invocation, QueryPlan};
use std::fmt;
use std::sync::Arc;

/// Per-scan settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanOptions {
    /// Fail the scan when a qualifier cannot be pushed down
    pub strict: bool,
}

/// A configured filesystem table
pub struct FindTable {
    config: TableConfig,
    registry: Arc<HandlerRegistry>,
    columns: Vec<String>,
    sink: Arc<dyn DiagnosticSink>,
    spawner: Arc<dyn Spawner>,
}

impl FindTable {
    /// Configure a table, reporting problems through the `log` facade.
    pub fn new<S: AsRef<str>>(options: TableOptions, columns: &[S]) -> ConfigResult<Self> {
        Self::with_sink(options, columns, Arc::new(LogSink))
    }

    /// Configure a table, reporting problems to `sink`.
    ///
    /// Nothing is spawned here; every configuration error is detected before
    /// the first scan.
    pub fn with_sink<S: AsRef<str>>(
        mut options: TableOptions,
        columns: &[S],
        sink: Arc<dyn DiagnosticSink>,
    ) -> ConfigResult<Self> {
        let configured = TableConfig::extract(&mut options).and_then(|config| {
            let registry = HandlerRegistry::build(&options, columns, &config.root)?;
            Ok((config, registry))
        });

        match configured {
            Ok((config, registry)) => {
                log::debug!(
                    "Configured table at {} with {} columns",
                    config.root,
                    columns.len()
                );
                Ok(Self {
                    config,
                    registry: Arc::new(registry),
                    columns: columns.iter().map(|c| c.as_ref().to_string()).collect(),
                    sink,
                    spawner: Arc::new(ProcessSpawner),
                })
            }
            Err(e) => {
                sink.report(Severity::Error, &e.to_string());
                Err(e)
            }
        }
    }

    /// Replace the process spawner
    pub fn with_spawner(mut self, spawner: Arc<dyn Spawner>) -> Self {
        self.spawner = spawner;
        self
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Normalized root directory
    pub fn root(&self) -> &str {
        &self.config.root
    }

    /// Columns declared at configuration time
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// Compile the plan a scan of `columns` filtered by `quals` would use.
    pub fn plan<S: AsRef<str>>(
        &self,
        quals: &[Qualifier],
        columns: &[S],
        options: ScanOptions,
    ) -> ExecutionResult<QueryPlan> {
        QueryPlan::compile(&self.registry, &self.config, quals, columns, options.strict)
    }

    /// Command line a scan would run
    pub fn invocation<S: AsRef<str>>(
        &self,
        quals: &[Qualifier],
        columns: &[S],
        options: ScanOptions,
    ) -> ExecutionResult<Invocation> {
        Ok(self.plan(quals, columns, options)?.invocation(&self.config))
    }

    /// Scan `columns`, pushing `quals` down where possible.
    pub fn execute<S: AsRef<str>>(&self, quals: &[Qualifier], columns: &[S]) -> FindScan {
        self.execute_with(quals, columns, ScanOptions::default())
    }

    /// Scan with explicit [`ScanOptions`]. Failures to plan or spawn are
    /// yielded as the scan's first item.
    pub fn execute_with<S: AsRef<str>>(
        &self,
        quals: &[Qualifier],
        columns: &[S],
        options: ScanOptions,
    ) -> FindScan {
        let plan = match self.plan(quals, columns, options) {
            Ok(plan) => plan,
            Err(e) => return FindScan::failed(e, self.sink.clone()),
        };

        let invocation = plan.invocation(&self.config);
        log::debug!("Executing {}", invocation);

        let source = match self.spawner.spawn(&invocation) {
            Ok(source) => source,
            Err(e) => return FindScan::failed(e, self.sink.clone()),
        };

        let assembler = RowAssembler::new(
            plan,
            self.registry.clone(),
            self.config.root.clone(),
            self.config.pattern_mismatch,
        );
        FindScan::new(source, assembler, self.sink.clone())
    }
}

impl fmt::Debug for FindTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FindTable")
            .field("config", &self.config)
            .field("columns", &self.columns)
            .field("registry", &self.registry)
            .finish()
    }
}
