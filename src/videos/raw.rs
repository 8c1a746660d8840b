//! Untrusted YouTube-API-shaped records.
//!
//! Every field is optional and every field deserializer is lenient: a value of
//! the wrong JSON type is treated as absent instead of failing the record, so
//! one malformed entry can never take the whole feed down.

use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use serde_json::Value;
use tracing::warn;

/// File-level shape: `{ "kind": "...", "items": [...] }`.
///
/// `items` is kept as raw JSON; entries are only interpreted when ranked.
#[derive(Debug, Clone, Default)]
pub struct VideoListDocument {
    pub kind: String,
    pub items: Vec<Value>,
}

impl VideoListDocument {
    /// Accepts any JSON value carrying an array at `items`; everything else
    /// in the document is ignored.
    pub fn from_value(value: Value) -> Option<Self> {
        let Value::Object(mut map) = value else {
            return None;
        };
        let Some(Value::Array(items)) = map.remove("items") else {
            return None;
        };
        let kind = match map.remove("kind") {
            Some(Value::String(kind)) => kind,
            _ => String::new(),
        };
        Some(Self { kind, items })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawVideoRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_nested")]
    pub snippet: Option<RawSnippet>,
    #[serde(default, deserialize_with = "lenient_nested")]
    pub statistics: Option<RawStatistics>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSnippet {
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub channel_title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub published_at: Option<String>,
    #[serde(default, deserialize_with = "lenient_nested")]
    pub thumbnails: Option<RawThumbnails>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawThumbnails {
    #[serde(default, deserialize_with = "lenient_nested")]
    pub high: Option<RawThumbnail>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawThumbnail {
    #[serde(default, deserialize_with = "lenient_string")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawStatistics {
    #[serde(default, deserialize_with = "lenient_string")]
    pub view_count: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub like_count: Option<String>,
    /// `None` when the key is missing, `Some(None)` for an explicit `null`.
    #[serde(default, deserialize_with = "lenient_nullable_string")]
    pub comment_count: Option<Option<String>>,
}

impl RawVideoRecord {
    /// Non-object entries become an all-default record.
    pub fn from_value(value: &Value) -> Self {
        if !value.is_object() {
            warn!(entry = %value, "video entry is not an object; ranking it with defaults");
            return Self::default();
        }
        Self::deserialize(value).unwrap_or_default()
    }

    pub fn title(&self) -> Option<&str> {
        self.snippet.as_ref()?.title.as_deref()
    }

    pub fn channel_title(&self) -> Option<&str> {
        self.snippet.as_ref()?.channel_title.as_deref()
    }

    pub fn published_at(&self) -> Option<&str> {
        self.snippet.as_ref()?.published_at.as_deref()
    }

    pub fn thumbnail_url(&self) -> Option<&str> {
        self.snippet
            .as_ref()?
            .thumbnails
            .as_ref()?
            .high
            .as_ref()?
            .url
            .as_deref()
    }

    pub fn view_count(&self) -> Option<&str> {
        self.statistics.as_ref()?.view_count.as_deref()
    }

    pub fn like_count(&self) -> Option<&str> {
        self.statistics.as_ref()?.like_count.as_deref()
    }

    /// Absent and explicit `null` both collapse to `None` here.
    pub fn comment_count(&self) -> Option<&str> {
        self.statistics.as_ref()?.comment_count.as_ref()?.as_deref()
    }
}

fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_text(Value::deserialize(deserializer)?))
}

fn lenient_nullable_string<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => Some(None),
        other => scalar_text(other).map(Some),
    })
}

fn lenient_nested<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if !value.is_object() {
        return Ok(None);
    }
    Ok(serde_json::from_value(value).ok())
}
