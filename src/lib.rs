//! # Kaiseki - ComfyUI Video Metadata Analyzer
//!
//! **Kaiseki** reads the workflow that ComfyUI embeds in the videos it renders and
//! reports what produced them: positive and negative prompts, LoRAs with their
//! weights, and the checkpoints or UNet models that were loaded.
//!
//! ## Core Workflow
//!
//! 1.  **Extract**: A [`MetadataExtractor`](extract::MetadataExtractor) reads the container
//!     tags and [`select_payload`](extract::select_payload) picks the raw workflow text from the
//!     `prompt`, `comment` or `other_comment` field of the `General` track.
//! 2.  **Recover**: The [`PayloadRecoverer`](payload::PayloadRecoverer) turns that text into a
//!     [`NodeGraph`](workflow::NodeGraph), coping with wrapper objects, JSON-in-a-string and
//!     payloads that were escaped twice.
//! 3.  **Analyze**: The [`WorkflowAnalyzer`](analyzer::WorkflowAnalyzer) classifies every node
//!     and collects an [`AnalysisResult`](analyzer::AnalysisResult).
//! 4.  **Report**: [`Report`](report::Report) deduplicates LoRAs and models and
//!     [`ReportFormatter`](report::ReportFormatter) renders the text sections.
//!
//! ## Quick Start
//!
//! ```rust
//! use kaiseki::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let raw = r#"{"prompt": {
//!         "4": {"class_type": "CheckpointLoaderSimple", "inputs": {"ckpt_name": "sdxl.safetensors"}},
//!         "6": {"class_type": "CLIPTextEncode", "inputs": {"text": "a cat"}},
//!         "7": {"class_type": "CLIPTextEncode", "inputs": {"text": "blurry"},
//!               "_meta": {"title": "Negative Prompt"}}
//!     }}"#;
//!
//!     let graph = PayloadRecoverer::default().recover(raw)?;
//!     let result = WorkflowAnalyzer::default().analyze(&graph)?;
//!
//!     assert_eq!(result.positives, vec!["a cat"]);
//!     assert_eq!(result.negatives, vec!["blurry"]);
//!     assert_eq!(result.models, vec!["sdxl.safetensors"]);
//!
//!     print!("{}", ReportFormatter::format_text(&Report::from(&result)));
//!     Ok(())
//! }
//! ```
//!
//! ## Known Limitation
//!
//! Prompt polarity is decided by a substring match: a text encoder whose title or
//! node id contains "negative" is reported as a negative prompt, whatever the
//! reason the word appears there.

pub mod analyzer;
pub mod error;
pub mod extract;
pub mod inspect;
pub mod payload;
pub mod prelude;
pub mod report;
pub mod workflow;
