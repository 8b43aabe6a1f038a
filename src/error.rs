//! Error types for the mtwatch service.

use std::path::PathBuf;

use snafu::prelude::*;

/// Errors that can occur while reading a deliverable.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum SourceError {
    /// Deliverable absent at the primary path and any fallback location.
    #[snafu(display("Deliverable not found: {}", path.display()))]
    NotFound { path: PathBuf },

    /// Deliverable locked by another process (typically the translation tool
    /// still writing the package).
    #[snafu(display("Access denied reading {}: {source}", path.display()))]
    AccessDenied {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Return package is present but not readable as a zip container.
    #[snafu(display("Malformed return package {}: {message}", path.display()))]
    MalformedArchive { path: PathBuf, message: String },

    /// Any other IO failure.
    #[snafu(display("IO error reading {}: {source}", path.display()))]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl SourceError {
    /// Check if this error represents a "not found" condition.
    pub fn is_not_found(&self) -> bool {
        matches!(self, SourceError::NotFound { .. })
    }

    /// Check if this error represents a lock/permission condition worth
    /// retrying.
    pub fn is_access_denied(&self) -> bool {
        matches!(self, SourceError::AccessDenied { .. })
    }

    /// Classify a raw IO error against a path into the source taxonomy.
    pub fn from_io(path: &std::path::Path, source: std::io::Error) -> Self {
        match source.kind() {
            std::io::ErrorKind::NotFound => SourceError::NotFound {
                path: path.to_path_buf(),
            },
            std::io::ErrorKind::PermissionDenied => SourceError::AccessDenied {
                path: path.to_path_buf(),
                source,
            },
            _ => SourceError::Io {
                path: path.to_path_buf(),
                source,
            },
        }
    }
}

/// Errors that can occur during configuration parsing and validation.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[snafu(display("Failed to read configuration file"))]
    ReadFile { source: std::io::Error },

    /// Failed to parse YAML configuration.
    #[snafu(display("Failed to parse YAML configuration"))]
    YamlParse { source: serde_yaml::Error },

    /// No project directories configured for the watcher.
    #[snafu(display("At least one project directory must be configured"))]
    NoProjectDirs,

    /// Retry budget of zero attempts can never succeed.
    #[snafu(display("retry.max_attempts must be at least 1"))]
    ZeroAttempts,
}

/// Errors that can occur while appending the warning artifact.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum SinkError {
    /// Failed to open or append the warning artifact.
    #[snafu(display("Failed to append warning artifact {}: {source}", path.display()))]
    WarningWrite {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Top-level pipeline errors.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum PipelineError {
    /// Configuration error.
    #[snafu(display("Configuration error: {source}"))]
    Config { source: ConfigError },

    /// Source error.
    #[snafu(display("Source error: {source}"))]
    Source { source: SourceError },

    /// Sink error.
    #[snafu(display("Sink error: {source}"))]
    Sink { source: SinkError },

    /// Task join error.
    #[snafu(display("Task join error: {source}"))]
    TaskJoin { source: tokio::task::JoinError },
}

impl From<ConfigError> for PipelineError {
    fn from(source: ConfigError) -> Self {
        PipelineError::Config { source }
    }
}

impl From<SourceError> for PipelineError {
    fn from(source: SourceError) -> Self {
        PipelineError::Source { source }
    }
}

impl From<SinkError> for PipelineError {
    fn from(source: SinkError) -> Self {
        PipelineError::Sink { source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn classifies_not_found() {
        let err = SourceError::from_io(
            Path::new("/tmp/x.wsxz"),
            std::io::Error::from(std::io::ErrorKind::NotFound),
        );
        assert!(err.is_not_found());
        assert!(!err.is_access_denied());
    }

    #[test]
    fn classifies_access_denied() {
        let err = SourceError::from_io(
            Path::new("/tmp/x.wsxz"),
            std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        );
        assert!(err.is_access_denied());
    }

    #[test]
    fn pipeline_error_wraps_component_errors() {
        let e: PipelineError = ConfigError::NoProjectDirs.into();
        assert!(matches!(e, PipelineError::Config { .. }));

        let e: PipelineError = SourceError::NotFound {
            path: PathBuf::from("/tmp/x.wsxz"),
        }
        .into();
        assert!(matches!(e, PipelineError::Source { .. }));

        let e: PipelineError = SinkError::WarningWrite {
            path: PathBuf::from("/tmp/MT WARNING.txt"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        }
        .into();
        assert!(matches!(e, PipelineError::Sink { .. }));
    }

    #[test]
    fn other_io_kinds_stay_io() {
        let err = SourceError::from_io(
            Path::new("/tmp/x.wsxz"),
            std::io::Error::from(std::io::ErrorKind::UnexpectedEof),
        );
        assert!(!err.is_not_found());
        assert!(!err.is_access_denied());
    }
}
