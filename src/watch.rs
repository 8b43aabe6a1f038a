//! Polling-based discovery of newly created deliverables.
//!
//! Scans the configured project directories on a fixed interval and
//! dispatches one pipeline invocation per file that appeared since the
//! previous scan. The first scan only seeds the seen-set: files that
//! predate startup are not newly created.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::event::{is_deliverable, DeliveryEvent};
use crate::pipeline::{handle_event, PipelineContext};

/// Incremental deliverable discovery over the project directories.
#[derive(Debug)]
pub struct Watcher {
    roots: Vec<PathBuf>,
    seen: HashSet<PathBuf>,
}

impl Watcher {
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self {
            roots,
            seen: HashSet::new(),
        }
    }

    /// Scan all roots and return deliverables not seen before.
    ///
    /// On the first call the result is discarded by the caller via `seed`;
    /// afterwards every path is returned exactly once across calls.
    pub fn poll(&mut self) -> Vec<DeliveryEvent> {
        let mut events = Vec::new();

        for root in &self.roots {
            let walk = WalkDir::new(root).into_iter().filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    debug!(root = %root.display(), error = %e, "Skipping unreadable entry");
                    None
                }
            });

            for entry in walk {
                if !entry.file_type().is_file() {
                    continue;
                }
                let path = entry.into_path();
                if !is_deliverable(&path) {
                    continue;
                }
                if self.seen.insert(path.clone()) {
                    events.push(DeliveryEvent::new(path));
                }
            }
        }

        events
    }

    /// Record everything currently present without raising events.
    pub fn seed(&mut self) {
        let seeded = self.poll();
        debug!(existing = seeded.len(), "Seeded watcher with pre-existing deliverables");
    }
}

/// Run the watcher loop until cancelled.
///
/// Each discovered deliverable is handled on its own task so a slow or
/// retrying event never blocks discovery of the next one. Cancellation stops
/// discovery only: in-flight events are tracked and awaited, so a deliverable
/// mid-retry or mid-append still runs to completion before this returns.
pub async fn run_watcher(ctx: Arc<PipelineContext>, shutdown: CancellationToken) {
    let roots = ctx.config.directories.project_dirs.clone();
    let poll_interval = ctx.config.watch.poll_interval();

    info!("Watchfolder started");
    for root in &roots {
        info!("Watching: {}", root.display());
        if !root.exists() {
            warn!("Project directory does not exist yet: {}", root.display());
        }
    }

    let mut watcher = Watcher::new(roots);
    watcher.seed();

    let tracker = TaskTracker::new();

    loop {
        if shutdown
            .run_until_cancelled(tokio::time::sleep(poll_interval))
            .await
            .is_none()
        {
            info!("Shutdown requested, stopping watcher");
            break;
        }

        for event in watcher.poll() {
            let ctx = ctx.clone();
            tracker.spawn(async move {
                if let Err(e) = handle_event(&ctx, &event).await {
                    warn!(path = %event.path.display(), error = %e, "Event pipeline failed");
                }
            });
        }
    }

    tracker.close();
    if !tracker.is_empty() {
        info!(in_flight = tracker.len(), "Waiting for in-flight events");
    }
    tracker.wait().await;
}
