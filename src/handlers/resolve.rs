use std::sync::Arc;

use regex::Regex;
use tracing::trace;

use super::traits::ResolveHandler;
use super::types::UrlMatch;

/// Ordered registry of `(pattern, handler)` pairs.
///
/// Registration order is the match-priority order: patterns may overlap,
/// and the first registered pattern matching a URL wins. Lookup is a
/// linear scan over the raw URL string by design; the author-visible
/// precedence depends on it, so it must not be turned into a keyed map.
#[derive(Clone, Default)]
pub struct ResolverRegistry {
    entries: Vec<ResolverEntry>,
}

#[derive(Clone)]
struct ResolverEntry {
    pattern: Regex,
    handler: Arc<dyn ResolveHandler>,
}

/// A successful lookup: the first matching entry's handler, the captured
/// groups, and the pattern text for diagnostics.
pub struct ResolverMatch {
    pub handler: Arc<dyn ResolveHandler>,
    pub groups: UrlMatch,
    pub pattern: String,
}

impl ResolverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a `(pattern, handler)` pair. No dedup, no uniqueness
    /// constraint; later entries only match what earlier ones did not.
    pub fn add(&mut self, pattern: Regex, handler: impl ResolveHandler + 'static) {
        self.entries.push(ResolverEntry {
            pattern,
            handler: Arc::new(handler),
        });
    }

    /// Scan entries in registration order and return the first whose
    /// pattern matches `url`. `None` means the URL is unresolvable, which
    /// is not an error: the caller treats such a source as directly
    /// playable.
    pub fn find(&self, url: &str) -> Option<ResolverMatch> {
        for entry in &self.entries {
            if let Some(captures) = entry.pattern.captures(url) {
                trace!(url, pattern = entry.pattern.as_str(), "Resolver matched");
                return Some(ResolverMatch {
                    handler: Arc::clone(&entry.handler),
                    groups: UrlMatch::from_captures(&captures),
                    pattern: entry.pattern.as_str().to_string(),
                });
            }
        }
        None
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for ResolverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let patterns: Vec<&str> = self
            .entries
            .iter()
            .map(|entry| entry.pattern.as_str())
            .collect();
        f.debug_struct("ResolverRegistry")
            .field("patterns", &patterns)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::RequestContext;
    use crate::handlers::traits::HandlerError;
    use crate::handlers::types::{Resolved, ResolveRequest};
    use crate::model::ResolvedUrl;

    async fn stub(
        _groups: UrlMatch,
        _request: ResolveRequest,
        _ctx: RequestContext,
    ) -> Result<Resolved, HandlerError> {
        Ok(Resolved::Urls(Vec::new()))
    }

    #[test]
    fn find_returns_first_registered_match() {
        let mut registry = ResolverRegistry::new();
        // Generic pattern first, more specific one second.
        registry.add(Regex::new(r"//site\.test/(.*)").unwrap(), stub);
        registry.add(Regex::new(r"//site\.test/page/(\w+)").unwrap(), stub);

        let found = registry.find("https://site.test/page/abc").unwrap();
        assert_eq!(found.pattern, r"//site\.test/(.*)");
        assert_eq!(found.groups.group(1), Some("page/abc"));
    }

    #[test]
    fn find_skips_non_matching_entries() {
        let mut registry = ResolverRegistry::new();
        registry.add(Regex::new(r"//other\.test/").unwrap(), stub);
        registry.add(Regex::new(r"//site\.test/(\d+)").unwrap(), stub);

        let found = registry.find("https://site.test/42").unwrap();
        assert_eq!(found.groups.group(1), Some("42"));
    }

    #[test]
    fn find_on_unmatched_url_is_none() {
        let mut registry = ResolverRegistry::new();
        registry.add(Regex::new(r"//site\.test/").unwrap(), stub);

        assert!(registry.find("https://elsewhere.test/video").is_none());
    }

    #[test]
    fn duplicate_patterns_are_allowed() {
        let mut registry = ResolverRegistry::new();
        let pattern = r"//site\.test/(.*)";
        registry.add(Regex::new(pattern).unwrap(), stub);
        registry.add(Regex::new(pattern).unwrap(), stub);

        assert_eq!(registry.len(), 2);
    }

    #[tokio::test]
    async fn matched_handler_is_invocable() {
        async fn one_url(
            groups: UrlMatch,
            _request: ResolveRequest,
            _ctx: RequestContext,
        ) -> Result<Resolved, HandlerError> {
            let id = groups.group(1).unwrap_or_default();
            Ok(ResolvedUrl::new(format!("https://cdn.test/{id}.mp4")).into())
        }

        let mut registry = ResolverRegistry::new();
        registry.add(Regex::new(r"//site\.test/(\w+)").unwrap(), one_url);

        let found = registry.find("https://site.test/abc").unwrap();
        let request = ResolveRequest {
            url: "https://site.test/abc".to_string(),
            origin: "https://site.test/abc".to_string(),
        };
        let resolved = found
            .handler
            .resolve(found.groups, request, RequestContext::new(reqwest::Client::new()))
            .await
            .unwrap();

        match resolved {
            Resolved::Urls(urls) => {
                assert_eq!(urls[0].url, "https://cdn.test/abc.mp4");
            }
            Resolved::Source(_) => panic!("expected terminal urls"),
        }
    }
}
