use crate::error::ValidationError;
use chrono::{Local, NaiveDateTime, SubsecRound};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Free-form, string-keyed metadata attached to a record.
///
/// Values are any JSON value; key order is kept as entered.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// The kind of information a record holds.
///
/// Parsing from user input (`FromStr`) only accepts the known kinds, while
/// deserialization keeps unknown strings as [`ContentType::Other`] so files
/// written by other tools survive a load/save cycle untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ContentType {
    #[default]
    Article,
    Link,
    Image,
    Video,
    Code,
    News,
    Tutorial,
    Tool,
    Other(String),
}

impl ContentType {
    pub const ALL: [ContentType; 8] = [
        ContentType::Article,
        ContentType::Link,
        ContentType::Image,
        ContentType::Video,
        ContentType::Code,
        ContentType::News,
        ContentType::Tutorial,
        ContentType::Tool,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            ContentType::Article => "article",
            ContentType::Link => "link",
            ContentType::Image => "image",
            ContentType::Video => "video",
            ContentType::Code => "code",
            ContentType::News => "news",
            ContentType::Tutorial => "tutorial",
            ContentType::Tool => "tool",
            ContentType::Other(name) => name,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ContentType::Article => "Long-form text content",
            ContentType::Link => "Link to an external website",
            ContentType::Image => "Image resource",
            ContentType::Video => "Video resource",
            ContentType::Code => "Code snippet",
            ContentType::News => "News digest",
            ContentType::Tutorial => "Step-by-step tutorial",
            ContentType::Tool => "Tool recommendation",
            ContentType::Other(_) => "Unrecognized content type",
        }
    }

    /// Articles are the only kind that must carry content.
    pub fn requires_content(&self) -> bool {
        matches!(self, ContentType::Article)
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        ContentType::ALL
            .into_iter()
            .find(|ct| ct.as_str() == needle)
            .ok_or_else(|| {
                format!(
                    "Unknown content type '{}' (expected one of: {})",
                    s,
                    ContentType::ALL
                        .iter()
                        .map(|ct| ct.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            })
    }
}

impl From<String> for ContentType {
    fn from(value: String) -> Self {
        value.parse().unwrap_or(ContentType::Other(value))
    }
}

impl From<ContentType> for String {
    fn from(value: ContentType) -> Self {
        match value {
            ContentType::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

pub mod timestamp {
    use chrono::NaiveDateTime;

    /// The on-disk layout of `created_at` / `updated_at`.
    pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn parse(raw: &str) -> Result<NaiveDateTime, chrono::ParseError> {
        NaiveDateTime::parse_from_str(raw.trim(), FORMAT)
    }
}

/// Current local time at second precision.
pub fn now() -> NaiveDateTime {
    Local::now().naive_local().trunc_subsecs(0)
}

/// A stored `created_at` / `updated_at` value.
///
/// Strings in [`timestamp::FORMAT`] are parsed. Anything else other tools
/// wrote (ISO `T` separators, fractional seconds, time zones) is kept as
/// [`Timestamp::Raw`] and written back byte for byte.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Timestamp {
    At(NaiveDateTime),
    Raw(String),
}

impl Timestamp {
    pub fn now() -> Self {
        Timestamp::At(now())
    }

    /// Parses `raw`, keeping it verbatim unless it is exactly in the
    /// canonical layout.
    pub fn parse(raw: &str) -> Self {
        match timestamp::parse(raw) {
            Ok(at) if at.format(timestamp::FORMAT).to_string() == raw => Timestamp::At(at),
            _ => Timestamp::Raw(raw.to_string()),
        }
    }

    pub fn datetime(&self) -> Option<NaiveDateTime> {
        match self {
            Timestamp::At(at) => Some(*at),
            Timestamp::Raw(_) => None,
        }
    }

    pub fn is_raw(&self) -> bool {
        matches!(self, Timestamp::Raw(_))
    }
}

impl From<NaiveDateTime> for Timestamp {
    fn from(value: NaiveDateTime) -> Self {
        Timestamp::At(value)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timestamp::At(at) => write!(f, "{}", at.format(timestamp::FORMAT)),
            Timestamp::Raw(raw) => f.write_str(raw),
        }
    }
}

impl Serialize for Timestamp {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(d)?;
        Ok(Timestamp::parse(&raw))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub content_type: ContentType,
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default)]
    pub searchable_text: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Record {
    /// Builds a fresh record from already validated input. Strings are
    /// trimmed, blank tags dropped and the search index derived.
    pub fn new(id: u64, input: NewRecord) -> Self {
        let stamp = Timestamp::now();
        let mut record = Self {
            id,
            title: input.title.trim().to_string(),
            content: input.content.trim().to_string(),
            url: input.url.trim().to_string(),
            tags: clean_tags(input.tags),
            content_type: input.content_type,
            metadata: input.metadata,
            searchable_text: String::new(),
            created_at: stamp.clone(),
            updated_at: stamp,
        };
        record.refresh_searchable_text();
        record
    }

    /// The index this record's current fields produce.
    pub fn derive_searchable_text(&self) -> String {
        searchable_text(
            &self.title,
            &self.content,
            &self.tags,
            &self.content_type,
            &self.metadata,
        )
    }

    pub fn refresh_searchable_text(&mut self) {
        self.searchable_text = self.derive_searchable_text();
    }

    pub fn touch(&mut self) {
        self.updated_at = Timestamp::now();
    }
}

/// Lower-cased concatenation of title, non-blank content, tags and the
/// metadata value keyed by the record's own content type.
pub fn searchable_text(
    title: &str,
    content: &str,
    tags: &[String],
    content_type: &ContentType,
    metadata: &Metadata,
) -> String {
    let mut parts = vec![title.to_lowercase()];
    if !content.trim().is_empty() {
        parts.push(content.to_lowercase());
    }
    parts.extend(
        tags.iter()
            .filter(|tag| !tag.trim().is_empty())
            .map(|tag| tag.to_lowercase()),
    );
    if let Some(value) = metadata.get(content_type.as_str()) {
        parts.push(value_text(value).to_lowercase());
    }
    parts.join(" ")
}

/// The reduced index used for imported records: title, content and tags only.
pub fn basic_searchable_text(title: &str, content: &str, tags: &[String]) -> String {
    format!("{} {} {}", title, content, tags.join(" ")).to_lowercase()
}

/// Text of a metadata value for the index. Strings are used as they are,
/// `null` reads as `none`, everything else as its JSON text.
fn value_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => "none".to_string(),
        other => other.to_string(),
    }
}

pub fn clean_tags(tags: Vec<String>) -> Vec<String> {
    tags.into_iter()
        .map(|tag| tag.trim().to_string())
        .filter(|tag| !tag.is_empty())
        .collect()
}

/// Splits comma separated tag input.
pub fn parse_tags(input: &str) -> Vec<String> {
    clean_tags(input.split(',').map(str::to_string).collect())
}

/// Reads metadata typed by a person: a JSON object, or `key: value` lines.
pub fn parse_metadata(input: &str) -> Metadata {
    let input = input.trim();
    if input.is_empty() {
        return Metadata::new();
    }
    if let Ok(serde_json::Value::Object(map)) = serde_json::from_str(input) {
        return map;
    }
    let mut metadata = Metadata::new();
    for line in input.lines() {
        if let Some((key, value)) = line.split_once(':') {
            metadata.insert(
                key.trim().to_string(),
                serde_json::Value::String(value.trim().to_string()),
            );
        }
    }
    metadata
}

pub fn validate(
    title: &str,
    content: &str,
    content_type: &ContentType,
) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    if content_type.requires_content() && content.trim().is_empty() {
        return Err(ValidationError::EmptyArticleContent);
    }
    Ok(())
}

/// Input for creating a record.
#[derive(Debug, Clone, Default)]
pub struct NewRecord {
    pub title: String,
    pub content: String,
    pub url: String,
    pub tags: Vec<String>,
    pub content_type: ContentType,
    pub metadata: Metadata,
}

impl NewRecord {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            ..Self::default()
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_type(mut self, content_type: ContentType) -> Self {
        self.content_type = content_type;
        self
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }
}

/// A partial update. `None` leaves the field as it is.
#[derive(Debug, Clone, Default)]
pub struct RecordPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub url: Option<String>,
    pub tags: Option<Vec<String>>,
    pub content_type: Option<ContentType>,
    pub metadata: Option<Metadata>,
}

impl RecordPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    pub fn content_type(mut self, content_type: ContentType) -> Self {
        self.content_type = Some(content_type);
        self
    }

    pub fn metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.url.is_none()
            && self.tags.is_none()
            && self.content_type.is_none()
            && self.metadata.is_none()
    }

    /// Applies the patch with the same trimming rules as creation, then
    /// re-derives the index and refreshes `updated_at`.
    pub fn apply_to(self, record: &mut Record) {
        if let Some(title) = self.title {
            record.title = title.trim().to_string();
        }
        if let Some(content) = self.content {
            record.content = content.trim().to_string();
        }
        if let Some(url) = self.url {
            record.url = url.trim().to_string();
        }
        if let Some(tags) = self.tags {
            record.tags = clean_tags(tags);
        }
        if let Some(content_type) = self.content_type {
            record.content_type = content_type;
        }
        if let Some(metadata) = self.metadata {
            record.metadata = metadata;
        }
        record.refresh_searchable_text();
        record.touch();
    }
}
