//! Prelude module for convenient imports
//!
//! Re-exports the types needed to go from a media file, or a raw tag string, to a report.
//!
//! # Example
//!
//! ```rust,no_run
//! use kaiseki::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let inspector = Inspector::with_extractor(ExtractorChoice::Auto, "mediainfo");
//! let result = inspector.inspect(Path::new("render_00001.mp4"))?;
//! print!("{}", ReportFormatter::format_text(&Report::from(&result)));
//! # Ok(())
//! # }
//! ```

// Pipeline stages
pub use crate::analyzer::{AnalysisResult, WorkflowAnalyzer};
pub use crate::extract::{ExtractorChoice, MetadataExtractor, Track};
pub use crate::inspect::Inspector;
pub use crate::payload::PayloadRecoverer;

// Workflow model
pub use crate::workflow::{Node, NodeGraph};

// Error types
pub use crate::error::{AnalysisError, DecodeError, ExtractionError, InspectError};

// Presentation
pub use crate::report::{Report, ReportFormatter};

pub use std::path::Path;

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
