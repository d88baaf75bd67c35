use crate::analyzer::AnalysisResult;
use itertools::Itertools;
use serde::Serialize;
use std::fmt::Write;

/// Width of the `=` rule framing the text report.
pub const BANNER_WIDTH: usize = 58;
/// Width of the `-` rule printed after each prompt.
pub const PROMPT_RULE_WIDTH: usize = 40;
/// Number of payload characters shown when decoding fails.
pub const PREVIEW_CHARS: usize = 200;

/// What gets printed: prompts as found, LoRAs and models deduplicated and sorted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub positives: Vec<String>,
    pub negatives: Vec<String>,
    pub loras: Vec<String>,
    pub models: Vec<String>,
}

impl From<&AnalysisResult> for Report {
    fn from(result: &AnalysisResult) -> Self {
        Self {
            positives: result.positives.clone(),
            negatives: result.negatives.clone(),
            loras: unique_sorted(&result.loras),
            models: unique_sorted(&result.models),
        }
    }
}

fn unique_sorted(items: &[String]) -> Vec<String> {
    items.iter().sorted().dedup().cloned().collect()
}

/// Renders reports as terminal text.
pub struct ReportFormatter;

impl ReportFormatter {
    /// The four report sections. Empty sections are left out entirely.
    pub fn format_text(report: &Report) -> String {
        let mut out = String::new();
        let rule = "-".repeat(PROMPT_RULE_WIDTH);

        if !report.positives.is_empty() {
            out.push_str(">>> POSITIVE PROMPT:\n");
            for prompt in &report.positives {
                let _ = writeln!(out, "{}\n{}", prompt, rule);
            }
        }

        if !report.negatives.is_empty() {
            out.push_str("\n>>> NEGATIVE PROMPT:\n");
            for prompt in &report.negatives {
                let _ = writeln!(out, "{}\n{}", prompt, rule);
            }
        }

        if !report.loras.is_empty() {
            out.push_str("\n>>> LORAS USED:\n");
            for lora in &report.loras {
                let _ = writeln!(out, "  • {}", lora);
            }
        }

        if !report.models.is_empty() {
            out.push_str("\n>>> MODELS / CHECKPOINTS:\n");
            for model in &report.models {
                let _ = writeln!(out, "  • {}", model);
            }
        }

        out
    }

    pub fn banner(file_name: &str) -> String {
        let rule = Self::rule();
        format!(
            "{}\n COMFYUI VIDEO METADATA ANALYSIS \n File: {}\n{}\n",
            rule, file_name, rule
        )
    }

    pub fn rule() -> String {
        "=".repeat(BANNER_WIDTH)
    }

    /// The first characters of a payload that could not be decoded.
    pub fn preview(raw: &str) -> String {
        let head: String = raw.chars().take(PREVIEW_CHARS).collect();
        format!("\nRaw data preview for debugging:\n{}...", head)
    }
}
