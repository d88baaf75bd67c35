use serde::Serialize;

/// The categorized findings of one workflow, in node-encounter order.
///
/// LoRAs and models may repeat here; the report deduplicates and sorts them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnalysisResult {
    pub positives: Vec<String>,
    pub negatives: Vec<String>,
    pub loras: Vec<String>,
    pub models: Vec<String>,
}

impl AnalysisResult {
    /// True when no node produced anything worth reporting.
    pub fn is_empty(&self) -> bool {
        self.positives.is_empty()
            && self.negatives.is_empty()
            && self.loras.is_empty()
            && self.models.is_empty()
    }
}
