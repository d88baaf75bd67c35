//! Common test utilities: sample workflows and synthetic MP4 files.
use serde_json::{Value, json};
use std::io::Write;
use tempfile::NamedTempFile;

/// A small text-to-video workflow as ComfyUI writes it.
///
/// Nodes: UNet loader, two LoRA loaders (one with `strength_model`, one without
/// any strength), positive and negative text encoders, and a sampler.
#[allow(dead_code)]
pub fn sample_workflow() -> Value {
    json!({
        "1": {
            "class_type": "UnetLoaderGGUF",
            "inputs": {"unet_name": "wan2.1-t2v-14b-Q5_K_M.gguf"},
            "_meta": {"title": "Unet Loader (GGUF)"}
        },
        "2": {
            "class_type": "LoraLoaderModelOnly",
            "inputs": {"lora_name": "detail.safetensors", "model": ["1", 0]},
            "_meta": {"title": "LoraLoaderModelOnly"}
        },
        "3": {
            "class_type": "LoraLoader",
            "inputs": {
                "lora_name": "motion.safetensors",
                "strength_model": 0.8,
                "strength_clip": 1.0,
                "model": ["2", 0]
            }
        },
        "6": {
            "class_type": "CLIPTextEncode",
            "inputs": {"text": "a cat walking on the beach", "clip": ["11", 0]},
            "_meta": {"title": "CLIP Text Encode (Positive Prompt)"}
        },
        "7": {
            "class_type": "CLIPTextEncode",
            "inputs": {"text": "blurry, low quality", "clip": ["11", 0]},
            "_meta": {"title": "CLIP Text Encode (Negative Prompt)"}
        },
        "3a": {
            "class_type": "KSampler",
            "inputs": {"seed": 42, "steps": 20, "positive": ["6", 0], "negative": ["7", 0]}
        }
    })
}

/// The same workflow wrapped the way video savers embed it.
#[allow(dead_code)]
pub fn wrapped_workflow() -> Value {
    json!({"prompt": sample_workflow(), "workflow": {"nodes": [], "links": []}})
}

fn mp4_box(name: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut out = ((payload.len() + 8) as u32).to_be_bytes().to_vec();
    out.extend_from_slice(name);
    out.extend_from_slice(payload);
    out
}

/// Builds a minimal MP4 whose `moov/udta/meta/ilst` carries a `©cmt` comment.
#[allow(dead_code)]
pub fn mp4_with_comment(comment: &str) -> Vec<u8> {
    let mut data = vec![0, 0, 0, 1, 0, 0, 0, 0];
    data.extend_from_slice(comment.as_bytes());
    let ilst = mp4_box(b"ilst", &mp4_box(b"\xa9cmt", &mp4_box(b"data", &data)));

    let mut hdlr = vec![0u8; 8];
    hdlr.extend_from_slice(b"mdirappl");
    hdlr.extend_from_slice(&[0u8; 9]);

    let mut meta = vec![0, 0, 0, 0];
    meta.extend(mp4_box(b"hdlr", &hdlr));
    meta.extend(ilst);

    let mut file = mp4_box(b"ftyp", b"isom\0\0\x02\0isomiso2mp41");
    file.extend(mp4_box(b"mdat", &[0u8; 32]));
    file.extend(mp4_box(b"moov", &mp4_box(b"udta", &mp4_box(b"meta", &meta))));
    file
}

/// Builds a minimal MP4 with no tags at all.
#[allow(dead_code)]
pub fn mp4_without_tags() -> Vec<u8> {
    let mut file = mp4_box(b"ftyp", b"isom\0\0\x02\0isomiso2mp41");
    file.extend(mp4_box(b"moov", &mp4_box(b"udta", &[])));
    file
}

/// Writes `bytes` to a temporary `.mp4` file.
#[allow(dead_code)]
pub fn write_temp_mp4(bytes: &[u8]) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".mp4")
        .tempfile()
        .expect("create temp file");
    file.write_all(bytes).expect("write temp file");
    file.flush().expect("flush temp file");
    file
}
