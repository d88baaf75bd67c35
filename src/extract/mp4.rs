//! Minimal ISO-BMFF / QuickTime tag reader.
//!
//! Only `moov` is loaded into memory; `mdat` and everything else at the top
//! level is seeked over. Tags are collected from
//!
//! * `moov/udta/meta/ilst` and `moov/meta/ilst` items, named either by their
//!   iTunes four-cc (`©cmt`, `©nam`, ...) or through a QuickTime `keys` table,
//! * classic QuickTime `moov/udta/©xxx` text atoms.

use super::{MetadataExtractor, Track};
use crate::error::ExtractionError;
use log::debug;
use serde_json::{Map, Value};
use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::Path;

/// Box types that may legitimately open an MP4/MOV file.
const LEADING_BOXES: [&[u8; 4]; 7] = [b"ftyp", b"moov", b"mdat", b"free", b"skip", b"wide", b"pnot"];

/// Prefix QuickTime uses for keys in the `mdta` namespace.
const QUICKTIME_KEY_PREFIX: &str = "com.apple.quicktime.";

/// `data` atom type indicator for UTF-8 text.
const DATA_TYPE_UTF8: u32 = 1;

/// Reads tags straight from MP4/MOV boxes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Mp4BoxReader;

impl MetadataExtractor for Mp4BoxReader {
    fn name(&self) -> &str {
        "native mp4 reader"
    }

    fn tracks(&self, path: &Path) -> Result<Vec<Track>, ExtractionError> {
        let io_error = |source: io::Error| ExtractionError::Io {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(io_error)?;
        let moov = read_moov(BufReader::new(file)).map_err(|e| match e {
            MoovError::Io(source) => io_error(source),
            MoovError::Extraction(e) => e,
        })?;

        let mut fields = Map::new();
        parse_moov(&moov, &mut fields)?;
        debug!("Found {} tag(s) in moov", fields.len());
        Ok(vec![Track::general(fields)])
    }
}

struct BoxHeader {
    name: [u8; 4],
    size: u64,
    header_size: u64,
}

enum MoovError {
    Io(io::Error),
    Extraction(ExtractionError),
}

impl From<io::Error> for MoovError {
    fn from(e: io::Error) -> Self {
        MoovError::Io(e)
    }
}

fn read_u32_be<R: Read>(r: &mut R) -> io::Result<u32> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(u32::from_be_bytes(buf))
}

fn read_u64_be<R: Read>(r: &mut R) -> io::Result<u64> {
    let mut buf = [0u8; 8];
    r.read_exact(&mut buf)?;
    Ok(u64::from_be_bytes(buf))
}

fn read_box_header<R: Read>(r: &mut R) -> io::Result<BoxHeader> {
    let size32 = read_u32_be(r)?;
    let mut name = [0u8; 4];
    r.read_exact(&mut name)?;
    let mut size = size32 as u64;
    let mut header_size = 8u64;
    if size32 == 1 {
        size = read_u64_be(r)?;
        header_size = 16;
    }
    Ok(BoxHeader {
        name,
        size,
        header_size,
    })
}

/// Walks top-level boxes until `moov` and returns its payload.
fn read_moov<R: Read + Seek>(mut reader: R) -> Result<Vec<u8>, MoovError> {
    let mut first = true;
    loop {
        let header = match read_box_header(&mut reader) {
            Ok(h) => h,
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                return Err(MoovError::Extraction(if first {
                    ExtractionError::UnsupportedContainer("file is too short to be MP4/MOV".to_string())
                } else {
                    ExtractionError::Malformed("no moov box found".to_string())
                }));
            }
            Err(e) => return Err(e.into()),
        };
        if first && !LEADING_BOXES.contains(&&header.name) {
            return Err(MoovError::Extraction(ExtractionError::UnsupportedContainer(
                "not an MP4/MOV file".to_string(),
            )));
        }
        first = false;

        if header.size == 0 && &header.name != b"moov" {
            // box runs to end of file
            return Err(MoovError::Extraction(ExtractionError::Malformed(
                "no moov box found".to_string(),
            )));
        }
        if header.size != 0 && header.size < header.header_size {
            return Err(MoovError::Extraction(ExtractionError::Malformed(format!(
                "box '{}' has invalid size {}",
                fourcc(&header.name),
                header.size
            ))));
        }

        if &header.name == b"moov" {
            let mut buf = Vec::new();
            if header.size == 0 {
                reader.read_to_end(&mut buf)?;
            } else {
                let payload = header.size - header.header_size;
                reader.by_ref().take(payload).read_to_end(&mut buf)?;
                if (buf.len() as u64) < payload {
                    return Err(MoovError::Extraction(ExtractionError::Malformed(
                        "moov box is truncated".to_string(),
                    )));
                }
            }
            return Ok(buf);
        }

        let payload = header.size - header.header_size;
        let skip = i64::try_from(payload).map_err(|_| {
            MoovError::Extraction(ExtractionError::Malformed("box size overflow".to_string()))
        })?;
        reader.seek(SeekFrom::Current(skip))?;
    }
}

/// Iterates the child boxes packed in `data`.
struct Boxes<'a> {
    data: &'a [u8],
}

impl<'a> Iterator for Boxes<'a> {
    type Item = Result<([u8; 4], &'a [u8]), ExtractionError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.data.len() < 8 {
            return None;
        }
        let size32 = u32::from_be_bytes([self.data[0], self.data[1], self.data[2], self.data[3]]);
        let name = [self.data[4], self.data[5], self.data[6], self.data[7]];
        let (size, header_size) = match size32 {
            0 => (self.data.len() as u64, 8),
            1 if self.data.len() >= 16 => {
                let mut large = [0u8; 8];
                large.copy_from_slice(&self.data[8..16]);
                (u64::from_be_bytes(large), 16)
            }
            1 => {
                self.data = &[];
                return Some(Err(truncated(&name)));
            }
            n => (n as u64, 8),
        };
        if size < header_size || size > self.data.len() as u64 {
            self.data = &[];
            return Some(Err(truncated(&name)));
        }
        let (current, rest) = self.data.split_at(size as usize);
        self.data = rest;
        Some(Ok((name, &current[header_size as usize..])))
    }
}

fn children(data: &[u8]) -> Boxes<'_> {
    Boxes { data }
}

fn truncated(name: &[u8; 4]) -> ExtractionError {
    ExtractionError::Malformed(format!("box '{}' is truncated", fourcc(name)))
}

fn fourcc(name: &[u8; 4]) -> String {
    name.iter()
        .map(|&b| if b == 0xA9 { '©' } else { b as char })
        .collect()
}

fn parse_moov(data: &[u8], fields: &mut Map<String, Value>) -> Result<(), ExtractionError> {
    for child in children(data) {
        let (name, payload) = child?;
        match &name {
            b"udta" => parse_udta(payload, fields)?,
            b"meta" => parse_meta(payload, fields)?,
            _ => {}
        }
    }
    Ok(())
}

fn parse_udta(data: &[u8], fields: &mut Map<String, Value>) -> Result<(), ExtractionError> {
    for child in children(data) {
        let (name, payload) = child?;
        if &name == b"meta" {
            parse_meta(payload, fields)?;
        } else if name[0] == 0xA9 {
            if let (Some(key), Some(text)) = (ilst_field_name(&name), quicktime_text(payload)) {
                insert_tag(fields, key.to_string(), text);
            }
        }
    }
    Ok(())
}

/// `meta` is a full box in MP4 but a plain container in QuickTime files.
fn parse_meta(data: &[u8], fields: &mut Map<String, Value>) -> Result<(), ExtractionError> {
    let body = if data.get(4..8) == Some(b"hdlr".as_slice()) {
        data
    } else {
        data.get(4..).unwrap_or_default()
    };

    let mut keys = Vec::new();
    for child in children(body) {
        let (name, payload) = child?;
        match &name {
            b"keys" => keys = parse_keys(payload)?,
            b"ilst" => parse_ilst(payload, &keys, fields)?,
            _ => {}
        }
    }
    Ok(())
}

fn parse_keys(data: &[u8]) -> Result<Vec<String>, ExtractionError> {
    // version + flags, then entry count
    let count = data
        .get(4..8)
        .map(|b| u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
        .ok_or_else(|| truncated(b"keys"))?;
    let mut keys = Vec::new();
    for entry in children(data.get(8..).unwrap_or_default()).take(count as usize) {
        // the namespace (usually `mdta`) sits where a box name would
        let (_namespace, value) = entry?;
        let key = String::from_utf8_lossy(value).to_lowercase();
        let key = key
            .strip_prefix(QUICKTIME_KEY_PREFIX)
            .map(str::to_string)
            .unwrap_or(key);
        keys.push(key);
    }
    Ok(keys)
}

fn parse_ilst(
    data: &[u8],
    keys: &[String],
    fields: &mut Map<String, Value>,
) -> Result<(), ExtractionError> {
    for item in children(data) {
        let (name, payload) = item?;
        let index = u32::from_be_bytes(name) as usize;
        let key = if (1..=keys.len()).contains(&index) {
            keys[index - 1].clone()
        } else if let Some(key) = ilst_field_name(&name) {
            key.to_string()
        } else {
            continue;
        };
        if let Some(text) = data_atom_text(payload)? {
            insert_tag(fields, key, text);
        }
    }
    Ok(())
}

fn ilst_field_name(name: &[u8; 4]) -> Option<&'static str> {
    match name {
        b"\xa9cmt" => Some("comment"),
        b"\xa9nam" => Some("title"),
        b"\xa9too" => Some("encoder"),
        b"\xa9ART" => Some("artist"),
        b"desc" => Some("description"),
        _ => None,
    }
}

/// Text of the first UTF-8 `data` atom inside an `ilst` item.
fn data_atom_text(item: &[u8]) -> Result<Option<String>, ExtractionError> {
    for child in children(item) {
        let (name, payload) = child?;
        if &name != b"data" {
            continue;
        }
        if payload.len() < 8 {
            return Err(truncated(&name));
        }
        // type indicator and locale
        let data_type = u32::from_be_bytes([payload[0], payload[1], payload[2], payload[3]]);
        if data_type != DATA_TYPE_UTF8 {
            debug!("Skipping data atom of type {}", data_type);
            return Ok(None);
        }
        return Ok(String::from_utf8(payload[8..].to_vec()).ok());
    }
    Ok(None)
}

/// QuickTime user-data text: 16-bit length, 16-bit language, then the text.
fn quicktime_text(payload: &[u8]) -> Option<String> {
    let len = u16::from_be_bytes([*payload.first()?, *payload.get(1)?]) as usize;
    let text = payload.get(4..4 + len)?;
    String::from_utf8(text.to_vec()).ok()
}

fn insert_tag(fields: &mut Map<String, Value>, key: String, text: String) {
    fields.entry(key).or_insert(Value::String(text));
}
