use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Failures at the OCR boundary, before any text reaches the analyzer.
#[derive(Debug, Error)]
pub enum RecognitionError {
    #[error("unsupported document type for {path}: expected a PDF or an image")]
    UnsupportedFormat { path: PathBuf },

    #[error("could not read {path}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not start `{engine}`; is it installed and on PATH?")]
    EngineUnavailable {
        engine: String,
        #[source]
        source: io::Error,
    },

    #[error("`{engine}` exited with {status}: {stderr}")]
    EngineFailed {
        engine: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("{path} has no text layer and rendered to no pages")]
    NoPages { path: PathBuf },

    #[error("`{engine}` produced text that is not valid UTF-8")]
    InvalidOutput {
        engine: String,
        #[source]
        source: std::string::FromUtf8Error,
    },
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Recognition(#[from] RecognitionError),

    #[error("failed to write report")]
    Io(#[from] io::Error),

    #[error("failed to write CSV report")]
    Csv(#[from] csv::Error),

    #[error("failed to serialize analysis")]
    Json(#[from] serde_json::Error),
}
