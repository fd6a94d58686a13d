use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{ProbeError, Result};

pub mod probe;
pub mod runner;

/// Decoded output of `ffprobe -show_format -show_streams`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeResult {
    #[serde(default)]
    pub streams: Vec<StreamInfo>,
    pub format: FormatInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamInfo {
    pub index: u32,
    #[serde(default)]
    pub codec_name: String,
    pub codec_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bit_rate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_rate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channels: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_layout: Option<String>,
    /// Left as ffprobe reports it; may be empty.
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub tags: MetadataTags,
}

/// Container level metadata.
///
/// Goes through the wire form in both directions so that `duration`,
/// which ffprobe emits as a decimal string and omits entirely for live
/// sources, ends up as plain seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawFormatInfo", into = "RawFormatInfo")]
pub struct FormatInfo {
    pub filename: String,
    pub stream_count: u32,
    pub program_count: u32,
    pub format_name: String,
    pub format_long_name: String,
    pub start_time: String,
    /// Seconds. `0.0` when the source does not report a duration.
    pub duration: f64,
    pub size: String,
    pub bit_rate: String,
    pub tags: MetadataTags,
}

/// Descriptive tags. Keys match case-insensitively, so Matroska's `TITLE`
/// fills `title` just like mp4's `title` does.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "HashMap<String, String>")]
pub struct MetadataTags {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub genre: String,
    pub comment: String,
    pub encoder: String,
    pub language: String,
}

impl From<HashMap<String, String>> for MetadataTags {
    fn from(tags: HashMap<String, String>) -> Self {
        let tag = |name: &str| {
            tags.get(name)
                .or_else(|| {
                    tags.iter()
                        .find(|(key, _)| key.eq_ignore_ascii_case(name))
                        .map(|(_, value)| value)
                })
                .cloned()
                .unwrap_or_default()
        };

        Self {
            title: tag("title"),
            artist: tag("artist"),
            album: tag("album"),
            genre: tag("genre"),
            comment: tag("comment"),
            encoder: tag("encoder"),
            language: tag("language"),
        }
    }
}

/// `format` object as it appears on the wire.
#[derive(Serialize, Deserialize)]
struct RawFormatInfo {
    filename: String,
    #[serde(default)]
    nb_streams: u32,
    #[serde(default)]
    nb_programs: u32,
    format_name: String,
    #[serde(default)]
    format_long_name: String,
    #[serde(default)]
    start_time: String,
    #[serde(default)]
    duration: serde_json::Value,
    #[serde(default)]
    size: String,
    #[serde(default)]
    bit_rate: String,
    #[serde(default)]
    tags: MetadataTags,
}

fn parse_duration(raw: &serde_json::Value) -> std::result::Result<f64, String> {
    let seconds = match raw {
        serde_json::Value::Null => return Ok(0.0),
        serde_json::Value::String(s) if s.is_empty() => return Ok(0.0),
        serde_json::Value::String(s) => s
            .parse::<f64>()
            .map_err(|e| format!("failed to parse duration {:?}: {}", s, e))?,
        serde_json::Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| format!("failed to parse duration {}", n))?,
        other => return Err(format!("unexpected duration value: {}", other)),
    };

    if !seconds.is_finite() || seconds < 0.0 {
        return Err(format!("invalid duration: {}", seconds));
    }
    Ok(seconds)
}

impl TryFrom<RawFormatInfo> for FormatInfo {
    type Error = String;

    fn try_from(raw: RawFormatInfo) -> std::result::Result<Self, Self::Error> {
        Ok(Self {
            duration: parse_duration(&raw.duration)?,
            filename: raw.filename,
            stream_count: raw.nb_streams,
            program_count: raw.nb_programs,
            format_name: raw.format_name,
            format_long_name: raw.format_long_name,
            start_time: raw.start_time,
            size: raw.size,
            bit_rate: raw.bit_rate,
            tags: raw.tags,
        })
    }
}

impl From<FormatInfo> for RawFormatInfo {
    fn from(format: FormatInfo) -> Self {
        Self {
            filename: format.filename,
            nb_streams: format.stream_count,
            nb_programs: format.program_count,
            format_name: format.format_name,
            format_long_name: format.format_long_name,
            start_time: format.start_time,
            duration: serde_json::Value::String(format.duration.to_string()),
            size: format.size,
            bit_rate: format.bit_rate,
            tags: format.tags,
        }
    }
}

impl ProbeResult {
    pub fn from_json(data: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(data)?)
    }

    /// Streams whose `codec_type` is exactly `codec_type`, in probe order.
    ///
    /// Never returns an empty vector: no match is [`ProbeError::NoStreams`].
    pub fn streams_by_type(&self, codec_type: &str) -> Result<Vec<&StreamInfo>> {
        let streams: Vec<&StreamInfo> = self
            .streams
            .iter()
            .filter(|stream| stream.codec_type == codec_type)
            .collect();

        if streams.is_empty() {
            return Err(ProbeError::NoStreams {
                codec_type: codec_type.to_string(),
            });
        }

        Ok(streams)
    }
}
