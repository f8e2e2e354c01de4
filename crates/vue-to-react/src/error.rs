//! Error types for the command surface.

use camino::Utf8PathBuf;
use miette::Diagnostic;
use thiserror::Error;
use vue_transformer::TransformError;

/// Errors that abort the whole run.
#[derive(Debug, Error, Diagnostic)]
pub enum OrchestratorError {
    /// The input path does not exist.
    #[error("input path does not exist: {0}")]
    #[diagnostic(code(vue_to_react::input_not_found))]
    InputNotFound(Utf8PathBuf),

    /// A path is not valid UTF-8.
    #[error("path is not valid UTF-8: {0}")]
    #[diagnostic(code(vue_to_react::non_utf8_path))]
    NonUtf8Path(String),

    /// Invalid glob pattern.
    #[error("invalid glob pattern: {0}")]
    #[diagnostic(code(vue_to_react::invalid_glob))]
    InvalidGlob(String),

    /// The worker pool could not be created.
    #[error("failed to start worker threads: {0}")]
    #[diagnostic(code(vue_to_react::thread_pool))]
    ThreadPool(String),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}

/// Configuration loading errors.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    #[diagnostic(code(vue_to_react::config_read))]
    Read {
        path: Utf8PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    #[diagnostic(
        code(vue_to_react::config_parse),
        help("supported keys: shape, extensions, ignore, styleFileName, imports")
    )]
    Parse {
        path: Utf8PathBuf,
        source: serde_json::Error,
    },
}

/// Errors that abort the conversion of one file.
///
/// A batch run reports these and continues with the next file.
#[derive(Debug, Error, Diagnostic)]
pub enum ConvertError {
    #[error("failed to read {path}: {source}")]
    #[diagnostic(code(vue_to_react::read))]
    Read {
        path: Utf8PathBuf,
        source: std::io::Error,
    },

    #[error("failed to convert {path}: {source}")]
    #[diagnostic(code(vue_to_react::convert))]
    Transform {
        path: Utf8PathBuf,
        source: TransformError,
    },

    #[error("failed to write {path}: {source}")]
    #[diagnostic(code(vue_to_react::write))]
    Write {
        path: Utf8PathBuf,
        source: std::io::Error,
    },
}
