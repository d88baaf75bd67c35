//! Walks a recovered [`NodeGraph`] and sorts what it finds into prompts, LoRAs and models.

use crate::error::AnalysisError;
use crate::payload::json_kind;
use crate::workflow::{Node, NodeGraph};
use ahash::AHashSet;
use log::trace;
use serde_json::Value;

mod result;
mod rules;

pub use result::AnalysisResult;
pub use rules::PromptPolarity;

/// Class type of ComfyUI's stock text-prompt encoder.
pub const CLIP_TEXT_ENCODE: &str = "CLIPTextEncode";

pub struct WorkflowAnalyzer {
    text_encoders: AHashSet<String>,
}

pub struct WorkflowAnalyzerBuilder {
    text_encoders: AHashSet<String>,
}

impl WorkflowAnalyzerBuilder {
    pub fn new() -> Self {
        let mut text_encoders = AHashSet::new();
        text_encoders.insert(CLIP_TEXT_ENCODE.to_string());
        Self { text_encoders }
    }

    /// Treats nodes of `class_type` as text-prompt encoders too.
    pub fn with_text_encoder(mut self, class_type: &str) -> Self {
        self.text_encoders.insert(class_type.to_string());
        self
    }

    pub fn build(self) -> WorkflowAnalyzer {
        WorkflowAnalyzer {
            text_encoders: self.text_encoders,
        }
    }
}

impl Default for WorkflowAnalyzerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for WorkflowAnalyzer {
    fn default() -> Self {
        WorkflowAnalyzerBuilder::new().build()
    }
}

impl WorkflowAnalyzer {
    pub fn builder() -> WorkflowAnalyzerBuilder {
        WorkflowAnalyzerBuilder::new()
    }

    pub fn is_text_encoder(&self, class_type: &str) -> bool {
        self.text_encoders.contains(class_type)
    }

    /// Classifies every node record of `graph`.
    ///
    /// Entries that are not records are skipped. A single node can contribute to
    /// several lists, e.g. a checkpoint loader that also carries a `lora_name`.
    pub fn analyze(&self, graph: &NodeGraph) -> Result<AnalysisResult, AnalysisError> {
        if graph.is_empty() {
            return Err(AnalysisError::EmptyGraph);
        }

        let mut result = AnalysisResult::default();
        for node in graph.nodes() {
            self.classify(&node, &mut result);
        }
        Ok(result)
    }

    /// Same as [`analyze`](Self::analyze) for a value that has not been checked to be a mapping.
    pub fn analyze_value(&self, value: Value) -> Result<AnalysisResult, AnalysisError> {
        let graph = NodeGraph::try_from(value)
            .map_err(|other| AnalysisError::NotAMapping(json_kind(&other)))?;
        self.analyze(&graph)
    }

    fn classify(&self, node: &Node<'_>, result: &mut AnalysisResult) {
        if self.is_text_encoder(node.class_type) {
            if let Some((polarity, text)) = rules::prompt_text(node) {
                trace!("Node '{}' holds a {:?} prompt", node.id, polarity);
                match polarity {
                    PromptPolarity::Positive => result.positives.push(text.to_string()),
                    PromptPolarity::Negative => result.negatives.push(text.to_string()),
                }
            }
        }

        if let Some(lora) = rules::lora_entry(node) {
            trace!("Node '{}' applies LoRA {}", node.id, lora);
            result.loras.push(lora);
        }

        if let Some(model) = rules::model_reference(node) {
            trace!("Node '{}' loads model {}", node.id, model);
            result.models.push(model);
        }
    }
}

/// Convenience wrapper around the default analyzer.
pub fn analyze(graph: &NodeGraph) -> Result<AnalysisResult, AnalysisError> {
    WorkflowAnalyzer::default().analyze(graph)
}
