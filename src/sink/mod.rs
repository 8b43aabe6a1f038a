//! Warning artifact and audit-log emission.

use std::path::Path;
use std::sync::Arc;

use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::error::{SinkError, WarningWriteSnafu};
use crate::extract::ProviderReport;
use crate::policy::WarningRecord;
use snafu::prelude::*;

/// Name of the warning artifact placed next to the flagged deliverable.
pub const WARNING_FILENAME: &str = "MT WARNING.txt";

/// Origin category for translation-memory pre-fills.
pub const AUTO_PROPAGATED_ORIGIN: &str = "auto-propagated";

/// Appends warning blocks to the per-directory warning artifact.
///
/// Events may be handled concurrently; appends are serialized through a
/// shared lock so blocks never interleave.
#[derive(Debug, Clone, Default)]
pub struct WarningSink {
    lock: Arc<Mutex<()>>,
}

impl WarningSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one warning block for the record inside `directory`.
    ///
    /// The artifact is created on first use and only ever appended, never
    /// truncated. One `warn!` audit line is emitted per flagged file.
    pub async fn emit(&self, directory: &Path, record: &WarningRecord) -> Result<(), SinkError> {
        if record.is_empty() {
            return Ok(());
        }

        let path = directory.join(WARNING_FILENAME);

        let mut block = String::from("MT providers found.\n");
        for (file, providers) in record {
            block.push_str(&format!(
                "See file: {file}\nMT provider(s): {providers:?}\n"
            ));
            warn!("{}\t{:?}", file, providers);
        }

        let _guard = self.lock.lock().await;
        let mut artifact = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .context(WarningWriteSnafu { path: path.clone() })?;
        artifact
            .write_all(block.as_bytes())
            .await
            .context(WarningWriteSnafu { path: path.clone() })?;
        artifact
            .flush()
            .await
            .context(WarningWriteSnafu { path })?;

        Ok(())
    }
}

/// Emits structured audit lines for every extracted provider count.
#[derive(Debug, Clone)]
pub struct AuditLogger {
    /// Skip the `auto-propagated` origin category.
    pub exclude_auto_propagated: bool,
}

impl AuditLogger {
    pub fn new(exclude_auto_propagated: bool) -> Self {
        Self {
            exclude_auto_propagated,
        }
    }

    /// Log one line per (file, system, count) triple in the report.
    ///
    /// An empty report logs only the deliverable line.
    pub fn emit(&self, deliverable: &Path, report: &ProviderReport) {
        info!("Deliverable: {}", deliverable.display());

        for (file, system, count) in self.lines(report) {
            info!("{}\t{}\t{}", file, system, count);
        }
    }

    /// The (file, system, count) triples the audit trail will carry,
    /// with the configured origin filtering applied.
    pub fn lines<'a>(
        &'a self,
        report: &'a ProviderReport,
    ) -> impl Iterator<Item = (&'a str, &'a str, u64)> + 'a {
        report.iter().flat_map(move |(file, origins)| {
            origins
                .iter()
                .filter(move |(origin, _)| {
                    !(self.exclude_auto_propagated && origin.as_str() == AUTO_PROPAGATED_ORIGIN)
                })
                .flat_map(move |(_, systems)| {
                    systems
                        .iter()
                        .map(move |(system, count)| (file.as_str(), system.as_str(), *count))
                })
        })
    }
}
