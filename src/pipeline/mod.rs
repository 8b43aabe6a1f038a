//! Per-event pipeline orchestration.
//!
//! `FilesystemEvent → EventGate → ArchiveReader(+RetryGuard) →
//! ProviderExtractor → BlacklistChecker → {WarningSink, AuditLogger}`.
//!
//! Each invocation is stateless apart from the shared warning-file lock; no
//! error raised by a single event reaches the watcher loop.

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::Config;
use crate::error::{PipelineError, SourceError};
use crate::event::{qualifies, DeliveryEvent};
use crate::extract::ProviderReport;
use crate::policy::check_against_blacklist;
use crate::retry::{retry_read, RetryPolicy};
use crate::sink::{AuditLogger, WarningSink};
use crate::source::ArchiveReader;

/// Long-lived dependencies shared by every pipeline invocation.
#[derive(Debug, Clone)]
pub struct PipelineContext {
    /// Service configuration, constructed once at startup.
    pub config: Arc<Config>,
    /// Reader for working files and return packages.
    pub reader: ArchiveReader,
    /// Retry policy for deliverables still being written.
    pub retry: RetryPolicy,
    /// Warning artifact sink with its shared append lock.
    pub warning_sink: WarningSink,
    /// Structured audit logger.
    pub audit: AuditLogger,
}

impl PipelineContext {
    pub fn new(config: Arc<Config>) -> Self {
        Self {
            reader: ArchiveReader::new(config.source.fallback_subdir.clone()),
            retry: RetryPolicy::from_config(&config.retry),
            warning_sink: WarningSink::new(),
            audit: AuditLogger::new(config.audit.exclude_auto_propagated),
            config,
        }
    }
}

/// Handle one deliverable-created event end to end.
///
/// Errors return to the dispatching task, which logs them; nothing raised
/// here reaches the watcher loop.
pub async fn handle_event(ctx: &PipelineContext, event: &DeliveryEvent) -> Result<(), PipelineError> {
    if !qualifies(&event.path, &ctx.config.directories.delivery_dir) {
        return Ok(());
    }

    info!(
        "New deliverable found: {}. Checking for providers...",
        event.path.display()
    );

    let report = read_deliverable(ctx, event).await?;

    let record = check_against_blacklist(&report, &ctx.config.mt_providers.blacklist);

    let mut sink_result = Ok(());
    if record.is_empty() {
        info!("Check complete: all good for {}", event.path.display());
    } else if let Some(directory) = event.path.parent() {
        info!(
            "MT providers found. Check {} for details",
            directory.join(crate::sink::WARNING_FILENAME).display()
        );
        sink_result = ctx.warning_sink.emit(directory, &record).await;
    }

    // Audit the extraction even when the warning append failed.
    ctx.audit.emit(&event.path, &report);

    sink_result?;
    Ok(())
}

/// Read the deliverable under the retry policy.
///
/// A malformed package degrades to an empty report so the policy check and
/// audit trail still run; unresolved access failures abort this event only.
async fn read_deliverable(
    ctx: &PipelineContext,
    event: &DeliveryEvent,
) -> Result<ProviderReport, PipelineError> {
    let outcome = retry_read(&ctx.retry, || ctx.reader.read(&event.path)).await;

    match outcome {
        Ok(report) => Ok(report),
        Err(SourceError::MalformedArchive { path, message }) => {
            warn!(path = %path.display(), message, "Unreadable return package, continuing with empty report");
            Ok(ProviderReport::new())
        }
        Err(e) => Err(e.into()),
    }
}
