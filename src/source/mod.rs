//! Deliverable reading: single working files and zipped return packages.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::debug;
use zip::ZipArchive;

use crate::error::SourceError;
use crate::event::{is_working_file, WORKING_FILE_EXTENSION};
use crate::extract::{extract_providers, ProviderReport};

/// Resolves a deliverable path to extracted provider attribution.
///
/// A `*.sdlxliff` path is read directly as one working file; anything else is
/// opened as a zip return package and every `*.sdlxliff` member is extracted
/// under its member name.
#[derive(Debug, Clone, Default)]
pub struct ArchiveReader {
    /// Alternate sub-directory probed once when a return package is absent
    /// at its primary path. Empty disables the probe.
    pub fallback_subdir: String,
}

impl ArchiveReader {
    pub fn new(fallback_subdir: impl Into<String>) -> Self {
        Self {
            fallback_subdir: fallback_subdir.into(),
        }
    }

    /// Read a deliverable and build its provider report.
    pub fn read(&self, path: &Path) -> Result<ProviderReport, SourceError> {
        if is_working_file(path) {
            read_working_file(path)
        } else {
            let resolved = self.resolve_package_path(path);
            read_return_package(&resolved)
        }
    }

    /// Probe the fallback location when the primary path is absent.
    ///
    /// Some translation tools drop the package into a sub-directory after
    /// the create event has already fired for the final path.
    fn resolve_package_path(&self, path: &Path) -> PathBuf {
        if path.exists() || self.fallback_subdir.is_empty() {
            return path.to_path_buf();
        }
        let candidate = match (path.parent(), path.file_name()) {
            (Some(parent), Some(name)) => parent.join(&self.fallback_subdir).join(name),
            _ => return path.to_path_buf(),
        };
        if candidate.exists() {
            debug!(
                primary = %path.display(),
                fallback = %candidate.display(),
                "Package absent at primary path, using fallback"
            );
            candidate
        } else {
            path.to_path_buf()
        }
    }
}

/// Read a single working file under its base filename.
fn read_working_file(path: &Path) -> Result<ProviderReport, SourceError> {
    let bytes = std::fs::read(path).map_err(|e| SourceError::from_io(path, e))?;

    let identifier = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned());

    let mut report = ProviderReport::new();
    report.insert(identifier, extract_providers(&bytes));
    Ok(report)
}

/// Open a return package and extract every working-file member.
fn read_return_package(path: &Path) -> Result<ProviderReport, SourceError> {
    let file = File::open(path).map_err(|e| SourceError::from_io(path, e))?;

    let mut archive = ZipArchive::new(file).map_err(|e| SourceError::MalformedArchive {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut report = ProviderReport::new();
    for index in 0..archive.len() {
        let mut member = archive
            .by_index(index)
            .map_err(|e| SourceError::MalformedArchive {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        if !member_is_working_file(member.name()) {
            continue;
        }

        let name = member.name().to_string();
        let mut bytes = Vec::new();
        member
            .read_to_end(&mut bytes)
            .map_err(|e| SourceError::MalformedArchive {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        report.insert(name, extract_providers(&bytes));
    }

    Ok(report)
}

fn member_is_working_file(name: &str) -> bool {
    name.to_ascii_lowercase()
        .ends_with(&format!(".{WORKING_FILE_EXTENSION}"))
}
