use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while turning a raw tag string into a node graph.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    #[error("Payload is empty")]
    EmptyPayload,

    #[error("No decode strategy could parse the payload (last error: {0})")]
    Unparsable(String),

    #[error("Payload decoded to {found}, but a node mapping was expected")]
    NotAMapping { found: &'static str },
}

/// Errors raised when a recovered graph cannot be analyzed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("Unable to decode node structure: the workflow contains no nodes")]
    EmptyGraph,

    #[error("Unable to decode node structure: expected a mapping of nodes, found {0}")]
    NotAMapping(&'static str),
}

/// Errors raised by a metadata extractor backend.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("Could not run '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{program}' exited with {status}: {stderr}")]
    ToolFailed {
        program: String,
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("Malformed extractor output: {0}")]
    Malformed(String),

    #[error("Could not read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported container: {0}")]
    UnsupportedContainer(String),
}

impl ExtractionError {
    /// True when the extractor program itself is missing, which lets callers fall back.
    pub fn is_tool_missing(&self) -> bool {
        matches!(
            self,
            ExtractionError::Spawn { source, .. } if source.kind() == std::io::ErrorKind::NotFound
        )
    }
}

/// Everything that ends an inspection run. Each variant is terminal and maps to exit code 1.
#[derive(Error, Debug)]
pub enum InspectError {
    #[error("{0}")]
    Usage(String),

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Error reading video file: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("No metadata found in file.")]
    NoMetadata,

    #[error("JSON parsing error: {0}")]
    Decode(#[from] DecodeError),

    #[error("JSON parsing error: {0}")]
    Analysis(#[from] AnalysisError),
}

impl InspectError {
    /// Whether a preview of the raw payload helps diagnose this failure.
    pub fn wants_preview(&self) -> bool {
        matches!(self, InspectError::Decode(_) | InspectError::Analysis(_))
    }

    pub fn exit_code(&self) -> i32 {
        1
    }
}
