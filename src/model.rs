//! Media records crossing the core/external boundary.
//!
//! Every type here round-trips losslessly through JSON: catalog and detail
//! items are produced by stage handlers, sources and resolved urls flow
//! through the resolution engine, and identities arrive from callers.
//! Records are produced per request and never persisted by the core.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Identifier-namespace map, e.g. `"imdb_id" -> "tt0807840"`.
///
/// Keys are namespace identifiers other components use for exact-match
/// lookups. `BTreeMap` keeps serialization order deterministic.
pub type IdMap = BTreeMap<String, String>;

/// Image-role map, e.g. `"poster" -> "https://..."`.
pub type ImageMap = BTreeMap<String, String>;

/// Kind of a media item. Closed set; consumers match exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    Movie,
    Series,
}

impl MediaType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Series => "series",
        }
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A catalog or detail record returned by the `catalog` and `item` stages.
///
/// `media_type` is fixed at construction and never changes for the lifetime
/// of the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaItem {
    #[serde(rename = "type")]
    pub media_type: MediaType,
    #[serde(default)]
    pub ids: IdMap,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u16>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub images: ImageMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Ordered director credits; meaningful for movies.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub director: Vec<String>,
}

impl MediaItem {
    /// Look up an identifier by namespace.
    pub fn id(&self, namespace: &str) -> Option<&str> {
        self.ids.get(namespace).map(String::as_str)
    }
}

/// The lookup form of an item, consumed by the `item` and `source` stages
/// and by addon trigger predicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaIdentity {
    #[serde(rename = "type")]
    pub media_type: MediaType,
    #[serde(default)]
    pub ids: IdMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u16>,
}

impl MediaIdentity {
    pub fn id(&self, namespace: &str) -> Option<&str> {
        self.ids.get(namespace).map(String::as_str)
    }
}

impl From<&MediaItem> for MediaIdentity {
    fn from(item: &MediaItem) -> Self {
        Self {
            media_type: item.media_type,
            ids: item.ids.clone(),
            name: Some(item.name.clone()),
            year: item.year,
        }
    }
}

/// Kind of a source. Currently only direct url sources exist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    #[default]
    Url,
}

impl SourceType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Url => "url",
        }
    }
}

impl std::fmt::Display for SourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A playable-or-resolvable location returned by the `source` stage.
///
/// A source is *terminal* when its `url` matches no registered resolve
/// pattern; otherwise it is pending resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    #[serde(rename = "type", default)]
    pub source_type: SourceType,
    pub name: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub languages: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<String>,
}

impl Source {
    pub fn url(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            source_type: SourceType::Url,
            name: name.into(),
            url: url.into(),
            languages: None,
            quality: None,
        }
    }

    pub fn with_languages<I, S>(mut self, languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.languages = Some(languages.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_quality(mut self, quality: impl Into<String>) -> Self {
        self.quality = Some(quality.into());
        self
    }
}

/// A final, directly-playable stream URL.
///
/// A sequence of these for one source is a set of mutually exclusive
/// playback options for the user, not a priority-ordered retry list.
/// At least one of `name` and `quality` is expected to be set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedUrl {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<String>,
    /// Container hint, e.g. `"mp4"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl ResolvedUrl {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            name: None,
            quality: None,
            format: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_quality(mut self, quality: impl Into<String>) -> Self {
        self.quality = Some(quality.into());
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }
}
