//! Pulls the raw workflow tag out of a media file.
//!
//! Container parsing sits behind [`MetadataExtractor`], which reports a list of
//! [`Track`]s in the shape MediaInfo uses: a track kind plus loosely typed fields.
//! [`select_payload`] then picks the tag that carries the workflow.

use crate::error::ExtractionError;
use log::{info, warn};
use serde_json::{Map, Value};
use std::path::Path;

mod mediainfo;
mod mp4;

pub use mediainfo::{MediaInfoCli, parse_mediainfo_json};
pub use mp4::Mp4BoxReader;

/// Kind of the container-level track that carries file tags.
pub const GENERAL_TRACK: &str = "General";

/// Tag fields that may hold the workflow, highest priority first.
pub const PAYLOAD_FIELDS: [&str; 3] = ["prompt", "comment", "other_comment"];

/// One track as reported by an extractor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Track {
    pub kind: String,
    pub fields: Map<String, Value>,
}

impl Track {
    pub fn new(kind: &str, fields: Map<String, Value>) -> Self {
        Self {
            kind: kind.to_string(),
            fields,
        }
    }

    pub fn general(fields: Map<String, Value>) -> Self {
        Self::new(GENERAL_TRACK, fields)
    }

    pub fn is_general(&self) -> bool {
        self.kind == GENERAL_TRACK
    }

    /// The field as a non-empty string. For lists, the first element is used.
    pub fn text_field(&self, name: &str) -> Option<&str> {
        let value = match self.fields.get(name)? {
            Value::Array(items) => items.first()?,
            other => other,
        };
        value.as_str().filter(|text| !text.is_empty())
    }
}

/// Reads the tracks of a media file.
pub trait MetadataExtractor {
    fn name(&self) -> &str;
    fn tracks(&self, path: &Path) -> Result<Vec<Track>, ExtractionError>;
}

/// The raw workflow text: the first `General` track with a populated
/// `prompt`, `comment` or `other_comment` field, checked in that order.
pub fn select_payload(tracks: &[Track]) -> Option<&str> {
    tracks.iter().filter(|track| track.is_general()).find_map(|track| {
        PAYLOAD_FIELDS.iter().find_map(|field| {
            let text = track.text_field(field)?;
            info!("Using '{}' tag ({} chars)", field, text.chars().count());
            Some(text)
        })
    })
}

/// Runs `extractor` and selects the payload. `Ok(None)` means the file has no workflow tag.
pub fn extract_payload(
    extractor: &dyn MetadataExtractor,
    path: &Path,
) -> Result<Option<String>, ExtractionError> {
    info!("Reading tags of '{}' with {}", path.display(), extractor.name());
    let tracks = extractor.tracks(path)?;
    Ok(select_payload(&tracks).map(str::to_string))
}

/// Which extractor backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtractorChoice {
    /// MediaInfo, or the native MP4 reader when MediaInfo is not installed.
    #[default]
    Auto,
    MediaInfo,
    Native,
}

impl ExtractorChoice {
    pub fn build(self, mediainfo_program: &str) -> Box<dyn MetadataExtractor> {
        match self {
            ExtractorChoice::Auto => Box::new(AutoExtractor {
                primary: MediaInfoCli::new(mediainfo_program),
                fallback: Mp4BoxReader,
            }),
            ExtractorChoice::MediaInfo => Box::new(MediaInfoCli::new(mediainfo_program)),
            ExtractorChoice::Native => Box::new(Mp4BoxReader),
        }
    }
}

struct AutoExtractor {
    primary: MediaInfoCli,
    fallback: Mp4BoxReader,
}

impl MetadataExtractor for AutoExtractor {
    fn name(&self) -> &str {
        "auto"
    }

    fn tracks(&self, path: &Path) -> Result<Vec<Track>, ExtractionError> {
        match self.primary.tracks(path) {
            Err(e) if e.is_tool_missing() => {
                warn!("{}; falling back to {}", e, self.fallback.name());
                self.fallback.tracks(path)
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn track(kind: &str, fields: Value) -> Track {
        match fields {
            Value::Object(map) => Track::new(kind, map),
            _ => panic!("fields must be an object"),
        }
    }

    #[test]
    fn prompt_beats_comment() {
        let tracks = vec![track(
            "General",
            json!({"comment": "from comment", "prompt": "from prompt"}),
        )];
        assert_eq!(select_payload(&tracks), Some("from prompt"));
    }

    #[test]
    fn empty_fields_are_not_populated() {
        let tracks = vec![track(
            "General",
            json!({"prompt": "", "comment": "fallback"}),
        )];
        assert_eq!(select_payload(&tracks), Some("fallback"));
    }

    #[test]
    fn other_comment_uses_first_list_element() {
        let tracks = vec![track(
            "General",
            json!({"other_comment": ["first", "second"]}),
        )];
        assert_eq!(select_payload(&tracks), Some("first"));

        let tracks = vec![track("General", json!({"other_comment": "scalar"}))];
        assert_eq!(select_payload(&tracks), Some("scalar"));
    }

    #[test]
    fn only_general_tracks_are_considered() {
        let tracks = vec![
            track("Video", json!({"comment": "stream comment"})),
            track("General", json!({"title": "no payload"})),
            track("General", json!({"comment": "second general"})),
        ];
        assert_eq!(select_payload(&tracks), Some("second general"));
    }

    #[test]
    fn nothing_populated_yields_none() {
        let tracks = vec![track("General", json!({"format": "MPEG-4"}))];
        assert_eq!(select_payload(&tracks), None);
        assert_eq!(select_payload(&[]), None);
    }
}
