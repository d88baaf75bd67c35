//! End-to-end pipeline for one file: extract the tag, recover the graph, analyze it.

use crate::analyzer::{AnalysisResult, WorkflowAnalyzer};
use crate::error::InspectError;
use crate::extract::{ExtractorChoice, MetadataExtractor, extract_payload};
use crate::payload::PayloadRecoverer;
use log::info;
use std::path::Path;

pub struct Inspector {
    extractor: Box<dyn MetadataExtractor>,
    recoverer: PayloadRecoverer,
    analyzer: WorkflowAnalyzer,
}

impl Inspector {
    pub fn new(
        extractor: Box<dyn MetadataExtractor>,
        recoverer: PayloadRecoverer,
        analyzer: WorkflowAnalyzer,
    ) -> Self {
        Self {
            extractor,
            recoverer,
            analyzer,
        }
    }

    /// Default recoverer and analyzer over the chosen extractor backend.
    pub fn with_extractor(choice: ExtractorChoice, mediainfo_program: &str) -> Self {
        Self::new(
            choice.build(mediainfo_program),
            PayloadRecoverer::default(),
            WorkflowAnalyzer::default(),
        )
    }

    /// Fails unless `path` names an existing regular file.
    pub fn check_file(path: &Path) -> Result<(), InspectError> {
        if path.is_file() {
            Ok(())
        } else {
            Err(InspectError::FileNotFound(path.to_path_buf()))
        }
    }

    /// Reads the raw workflow tag from `path`.
    pub fn read_payload(&self, path: &Path) -> Result<String, InspectError> {
        Self::check_file(path)?;
        extract_payload(self.extractor.as_ref(), path)?.ok_or(InspectError::NoMetadata)
    }

    /// Decodes and analyzes a raw payload.
    pub fn analyze_payload(&self, raw: &str) -> Result<AnalysisResult, InspectError> {
        let graph = self.recoverer.recover(raw)?;
        info!("Recovered workflow with {} node(s)", graph.len());
        Ok(self.analyzer.analyze(&graph)?)
    }

    pub fn inspect(&self, path: &Path) -> Result<AnalysisResult, InspectError> {
        let raw = self.read_payload(path)?;
        self.analyze_payload(&raw)
    }
}
