use crate::workflow::Node;

pub(super) const NEGATIVE_MARKER: &str = "negative";
pub(super) const DEFAULT_LORA_STRENGTH: &str = "1.0";

/// Which prompt list a text encoder's output belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptPolarity {
    Positive,
    Negative,
}

/// The prompt carried by a text-encoder node, if its `text` input is a non-empty string.
///
/// Polarity is a substring heuristic: any node whose title or id contains
/// "negative" is filed as negative, even when the word appears for another reason.
pub(super) fn prompt_text<'a>(node: &Node<'a>) -> Option<(PromptPolarity, &'a str)> {
    let text = node.input("text")?.as_str().filter(|text| !text.is_empty())?;
    let polarity = if node.is_labelled(NEGATIVE_MARKER) {
        PromptPolarity::Negative
    } else {
        PromptPolarity::Positive
    };
    Some((polarity, text))
}

/// `"<lora_name> (Weight: <strength>)"` for any node with a `lora_name` input.
pub(super) fn lora_entry(node: &Node<'_>) -> Option<String> {
    let name = node.input("lora_name")?;
    let strength = node
        .first_truthy_input(&["strength_model", "strength"])
        .map(|value| value.to_string())
        .unwrap_or_else(|| DEFAULT_LORA_STRENGTH.to_string());
    Some(format!("{} (Weight: {})", name, strength))
}

/// `unet_name` if present, otherwise `ckpt_name`.
pub(super) fn model_reference(node: &Node<'_>) -> Option<String> {
    node.input("unet_name")
        .or_else(|| node.input("ckpt_name"))
        .map(|value| value.to_string())
}
