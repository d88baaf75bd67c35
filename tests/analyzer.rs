//! Node classification on full workflows.
mod common;
use common::*;
use kaiseki::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

fn analyze(value: Value) -> std::result::Result<AnalysisResult, AnalysisError> {
    WorkflowAnalyzer::default().analyze(&NodeGraph::try_from(value).expect("object"))
}

#[test]
fn test_sample_workflow() {
    let result = analyze(sample_workflow()).expect("analysis");
    assert_eq!(
        result,
        AnalysisResult {
            positives: vec!["a cat walking on the beach".to_string()],
            negatives: vec!["blurry, low quality".to_string()],
            loras: vec![
                "detail.safetensors (Weight: 1.0)".to_string(),
                "motion.safetensors (Weight: 0.8)".to_string(),
            ],
            models: vec!["wan2.1-t2v-14b-Q5_K_M.gguf".to_string()],
        }
    );
}

#[test]
fn test_untitled_encoder_is_positive() {
    let result = analyze(json!({
        "5": {"class_type": "CLIPTextEncode", "inputs": {"text": "a cat"}}
    }))
    .expect("analysis");
    assert_eq!(result.positives, vec!["a cat"]);
    assert!(result.negatives.is_empty());
}

#[test]
fn test_negative_title() {
    let result = analyze(json!({
        "8": {
            "class_type": "CLIPTextEncode",
            "inputs": {"text": "blurry"},
            "_meta": {"title": "Negative Prompt"}
        }
    }))
    .expect("analysis");
    assert_eq!(result.negatives, vec!["blurry"]);
    assert!(result.positives.is_empty());
}

#[test]
fn test_negative_substring_in_id_wins() {
    // the id mentions "negative" for unrelated reasons; it is still filed as negative
    let result = analyze(json!({
        "negative_example_node": {
            "class_type": "CLIPTextEncode",
            "inputs": {"text": "sunny meadow"},
            "_meta": {"title": "Scene"}
        }
    }))
    .expect("analysis");
    assert_eq!(result.negatives, vec!["sunny meadow"]);
}

#[test]
fn test_lora_without_strength() {
    let result = analyze(json!({
        "2": {"class_type": "LoraLoaderModelOnly", "inputs": {"lora_name": "detail.safetensors"}}
    }))
    .expect("analysis");
    assert_eq!(result.loras, vec!["detail.safetensors (Weight: 1.0)"]);
}

#[test]
fn test_duplicate_models_collapse_in_report() {
    let result = analyze(json!({
        "1": {"class_type": "UNETLoader", "inputs": {"unet_name": "fluxA.gguf"}},
        "2": {"class_type": "UNETLoader", "inputs": {"unet_name": "fluxA.gguf"}},
        "3": {"class_type": "CheckpointLoaderSimple", "inputs": {"ckpt_name": "base.ckpt"}}
    }))
    .expect("analysis");
    assert_eq!(result.models.len(), 3);

    let report = Report::from(&result);
    assert_eq!(report.models, vec!["base.ckpt", "fluxA.gguf"]);
}

#[test]
fn test_null_names_render_as_none() {
    let result = analyze(json!({
        "1": {"class_type": "UNETLoader", "inputs": {"unet_name": null}},
        "2": {"class_type": "LoraLoader", "inputs": {"lora_name": null, "strength_model": 0.5}}
    }))
    .expect("analysis");
    assert_eq!(result.models, vec!["None"]);
    assert_eq!(result.loras, vec!["None (Weight: 0.5)"]);
}

#[test]
fn test_empty_graph_is_an_error() {
    assert_eq!(analyze(json!({})), Err(AnalysisError::EmptyGraph));
}

#[test]
fn test_graph_of_only_junk_still_analyzes() {
    let result = analyze(json!({"1": 3, "2": [], "3": "x"})).expect("analysis");
    assert!(result.is_empty());
}
