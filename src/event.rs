//! Delivery events and the delivery-directory gate.

use std::path::{Path, PathBuf};

/// File extensions the watcher raises events for.
pub const DELIVERABLE_EXTENSIONS: &[&str] = &["sdlrpx", "wsxz", "sdlxliff"];

/// Extension of a single working file (as opposed to a return package).
pub const WORKING_FILE_EXTENSION: &str = "sdlxliff";

/// A newly created deliverable reported by the filesystem watcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryEvent {
    /// Absolute path of the newly created file.
    pub path: PathBuf,
}

impl DeliveryEvent {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

/// Check whether a path carries one of the deliverable extensions.
pub fn is_deliverable(path: &Path) -> bool {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => DELIVERABLE_EXTENSIONS
            .iter()
            .any(|d| ext.eq_ignore_ascii_case(d)),
        None => false,
    }
}

/// Check whether a path names a single working file rather than a package.
pub fn is_working_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some(ext) if ext.eq_ignore_ascii_case(WORKING_FILE_EXTENSION)
    )
}

/// Gate an event path against the configured delivery-directory fragments.
///
/// Returns true iff `filters` is empty or the path contains at least one
/// fragment. Non-qualifying events terminate the pipeline immediately.
pub fn qualifies(path: &Path, filters: &[String]) -> bool {
    if filters.is_empty() {
        return true;
    }
    let text = path.to_string_lossy();
    filters.iter().any(|fragment| text.contains(fragment))
}
