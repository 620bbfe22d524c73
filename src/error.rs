//! Error types for the analysis pipeline and its export stages.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Failures that abort an analysis run or an export step.
///
/// `Io` and `Decode` together form the "IO failure" class: no
/// [`AnalysisResult`](crate::AnalysisResult) is produced and no chart or
/// report stage may run afterwards.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not valid UTF-8 text", path.display())]
    Decode { path: PathBuf },

    #[error("cannot write {}: {message}", path.display())]
    Export { path: PathBuf, message: String },

    #[error("cannot set up analyzer: {message}")]
    Init { message: String },
}

impl AnalysisError {
    pub(crate) fn export(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        AnalysisError::Export {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// True for missing, unreadable or undecodable input files.
    pub fn is_io_failure(&self) -> bool {
        matches!(self, AnalysisError::Io { .. } | AnalysisError::Decode { .. })
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Failure of a sentiment model call. Never escapes the engine: the
/// orchestrator swaps in [`DEFAULT_SENTIMENT_PROFILE`](crate::DEFAULT_SENTIMENT_PROFILE).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SentimentModelFailure {
    #[error("{model} failed: {message}")]
    Model { model: &'static str, message: String },

    #[error("sentiment model did not answer within {after:?}")]
    Timeout { after: Duration },

    #[error("{model} panicked")]
    Panicked { model: &'static str },
}
