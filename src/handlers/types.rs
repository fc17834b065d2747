//! Types crossing the stage-handler and resolve-handler boundaries.

use serde::{Deserialize, Serialize};

use crate::model::{MediaItem, ResolvedUrl, Source};

/// Pipeline stage names. One handler slot exists per stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Catalog,
    Item,
    Source,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Catalog => "catalog",
            Self::Item => "item",
            Self::Source => "source",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input of the `catalog` stage: an opaque cursor into the sequence.
///
/// `None` requests the first page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}

/// One page of the lazy, restartable catalog sequence.
///
/// A `None` `next_cursor` signals the sequence is exhausted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogPage {
    pub items: Vec<MediaItem>,
    pub next_cursor: Option<String>,
}

/// Input of a resolve handler.
///
/// `url` is the URL of the current chain step and advances as the chain
/// does; `origin` is the URL that started the chain and stays fixed, so
/// handlers can correlate a deep hop with the initial source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveRequest {
    pub url: String,
    pub origin: String,
}

/// Captured groups of a resolve-pattern match. Group 0 is the whole match,
/// further indices follow the pattern's capture groups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlMatch {
    groups: Vec<Option<String>>,
}

impl UrlMatch {
    pub(crate) fn from_captures(captures: &regex::Captures<'_>) -> Self {
        Self {
            groups: captures
                .iter()
                .map(|group| group.map(|m| m.as_str().to_string()))
                .collect(),
        }
    }

    /// The text captured by group `index`, if the group participated in
    /// the match.
    pub fn group(&self, index: usize) -> Option<&str> {
        self.groups.get(index).and_then(|group| group.as_deref())
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Output of a resolve handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Resolved {
    /// Terminal playback options, in the order the handler produced them.
    /// Empty means "no playable stream found", which is not an error.
    Urls(Vec<ResolvedUrl>),
    /// A new source that itself requires further resolution.
    Source(Source),
}

impl From<ResolvedUrl> for Resolved {
    fn from(url: ResolvedUrl) -> Self {
        Self::Urls(vec![url])
    }
}

impl From<Vec<ResolvedUrl>> for Resolved {
    fn from(urls: Vec<ResolvedUrl>) -> Self {
        Self::Urls(urls)
    }
}

impl From<Source> for Resolved {
    fn from(source: Source) -> Self {
        Self::Source(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    #[test]
    fn url_match_exposes_groups() {
        let pattern = Regex::new(r"//example\.com/resolve/(.*)").unwrap();
        let captures = pattern
            .captures("https://example.com/resolve/abc")
            .unwrap();
        let groups = UrlMatch::from_captures(&captures);

        assert_eq!(groups.group(0), Some("//example.com/resolve/abc"));
        assert_eq!(groups.group(1), Some("abc"));
        assert_eq!(groups.group(2), None);
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn url_match_keeps_unmatched_groups() {
        let pattern = Regex::new(r"/(a)?(b)").unwrap();
        let captures = pattern.captures("host/b").unwrap();
        let groups = UrlMatch::from_captures(&captures);

        assert_eq!(groups.group(1), None);
        assert_eq!(groups.group(2), Some("b"));
    }

    #[test]
    fn resolved_from_single_url() {
        let resolved: Resolved = ResolvedUrl::new("https://cdn.test/a.mp4").into();
        match resolved {
            Resolved::Urls(urls) => assert_eq!(urls.len(), 1),
            Resolved::Source(_) => panic!("expected urls"),
        }
    }
}
