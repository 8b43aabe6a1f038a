//! Mtwatch: watchfolder service for MT-provider compliance checking.
//!
//! This crate handles:
//! - Discovering newly delivered translation files and return packages
//! - Extracting per-segment provider attribution from working-file XML
//! - Checking aggregated providers against a blacklist of MT vendors
//! - Appending warning artifacts and structured audit-log lines

pub mod config;
pub mod error;
pub mod event;
pub mod extract;
pub mod pipeline;
pub mod policy;
pub mod retry;
pub mod signal;
pub mod sink;
pub mod source;
pub mod trace;
pub mod watch;

// Re-export commonly used items
pub use config::Config;
pub use error::{PipelineError, SourceError};
pub use event::{qualifies, DeliveryEvent};
pub use extract::{extract_providers, OriginMap, ProviderReport, SystemCountMap};
pub use pipeline::{handle_event, PipelineContext};
pub use policy::{check_against_blacklist, WarningRecord};
pub use retry::RetryPolicy;
pub use signal::shutdown_signal;
pub use trace::init_tracing;
pub use watch::run_watcher;
