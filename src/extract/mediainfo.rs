use super::{MetadataExtractor, Track};
use crate::error::ExtractionError;
use log::debug;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::Path;
use std::process::Command;

/// Runs the `mediainfo` command-line tool with JSON output.
#[derive(Debug, Clone)]
pub struct MediaInfoCli {
    program: String,
}

impl MediaInfoCli {
    pub fn new(program: &str) -> Self {
        Self {
            program: program.to_string(),
        }
    }
}

impl Default for MediaInfoCli {
    fn default() -> Self {
        Self::new("mediainfo")
    }
}

impl MetadataExtractor for MediaInfoCli {
    fn name(&self) -> &str {
        "mediainfo"
    }

    fn tracks(&self, path: &Path) -> Result<Vec<Track>, ExtractionError> {
        debug!("Running {} --Output=JSON {}", self.program, path.display());
        let output = Command::new(&self.program)
            .arg("--Output=JSON")
            .arg(path)
            .output()
            .map_err(|source| ExtractionError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(ExtractionError::ToolFailed {
                program: self.program.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        parse_mediainfo_json(&output.stdout)
    }
}

#[derive(Deserialize)]
struct RawReport {
    media: Option<RawMedia>,
}

#[derive(Deserialize)]
struct RawMedia {
    #[serde(default)]
    track: RawTracks,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTracks {
    Many(Vec<Map<String, Value>>),
    One(Map<String, Value>),
}

impl Default for RawTracks {
    fn default() -> Self {
        RawTracks::Many(Vec::new())
    }
}

/// Converts `mediainfo --Output=JSON` output into tracks.
///
/// Field names are normalised the way pymediainfo exposes them (`Comment` becomes
/// `comment`, `Encoded_Library_Name` becomes `encoded_library_name`) and custom
/// tags under `extra` are lifted next to the standard ones.
pub fn parse_mediainfo_json(bytes: &[u8]) -> Result<Vec<Track>, ExtractionError> {
    let report: RawReport =
        serde_json::from_slice(bytes).map_err(|e| ExtractionError::Malformed(e.to_string()))?;
    let Some(media) = report.media else {
        // mediainfo prints `"media": null` for files it cannot open
        return Err(ExtractionError::Malformed("report has no media section".to_string()));
    };

    let raw_tracks = match media.track {
        RawTracks::Many(tracks) => tracks,
        RawTracks::One(track) => vec![track],
    };
    Ok(raw_tracks.into_iter().map(convert_track).collect())
}

fn convert_track(raw: Map<String, Value>) -> Track {
    let mut kind = String::new();
    let mut fields = Map::new();
    for (key, value) in raw {
        match (key.as_str(), value) {
            ("@type", Value::String(t)) => kind = t,
            ("extra", Value::Object(extra)) => {
                for (extra_key, extra_value) in extra {
                    fields.entry(normalize_field_name(&extra_key)).or_insert(extra_value);
                }
            }
            (_, value) => {
                fields.insert(normalize_field_name(&key), value);
            }
        }
    }
    Track { kind, fields }
}

fn normalize_field_name(name: &str) -> String {
    name.trim_start_matches('@')
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn converts_tracks_and_lifts_extra() {
        let report = json!({
            "creatingLibrary": {"name": "MediaInfoLib", "version": "24.06"},
            "media": {
                "@ref": "clip.mp4",
                "track": [
                    {
                        "@type": "General",
                        "Format": "MPEG-4",
                        "Comment": "{\"1\": {}}",
                        "extra": {"prompt": "{\"2\": {}}"}
                    },
                    {"@type": "Video", "Format": "AVC"}
                ]
            }
        });
        let tracks = parse_mediainfo_json(report.to_string().as_bytes()).expect("tracks");
        assert_eq!(tracks.len(), 2);
        assert!(tracks[0].is_general());
        assert_eq!(tracks[0].text_field("comment"), Some("{\"1\": {}}"));
        assert_eq!(tracks[0].text_field("prompt"), Some("{\"2\": {}}"));
        assert_eq!(tracks[1].kind, "Video");
    }

    #[test]
    fn single_track_object_is_accepted() {
        let report = json!({"media": {"track": {"@type": "General", "Title": "x"}}});
        let tracks = parse_mediainfo_json(report.to_string().as_bytes()).expect("tracks");
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].text_field("title"), Some("x"));
    }

    #[test]
    fn null_media_is_malformed() {
        let result = parse_mediainfo_json(br#"{"media": null}"#);
        assert!(matches!(result, Err(ExtractionError::Malformed(_))));
    }

    #[test]
    fn field_names_are_normalized() {
        assert_eq!(normalize_field_name("Encoded_Library_Name"), "encoded_library_name");
        assert_eq!(normalize_field_name("Writing application"), "writing_application");
    }

    #[test]
    fn missing_program_is_reported_as_tool_missing() {
        let extractor = MediaInfoCli::new("kaiseki-test-no-such-mediainfo");
        let err = extractor
            .tracks(Path::new("clip.mp4"))
            .expect_err("program should not exist");
        assert!(err.is_tool_missing());
    }
}
