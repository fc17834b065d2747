//! Resolution engine: drives a source to a terminal set of playable urls.
//!
//! For each source the engine repeatedly looks the current URL up in the
//! resolve-handler registry and invokes the first matching handler. A
//! handler either terminates the chain with playable urls or hands back a
//! new source, in which case the chain continues with the new URL. A depth
//! guard bounds misconfigured resolver loops, and a cancellation token is
//! consulted before every step.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::context::RequestContext;
use crate::handlers::{HandlerError, Resolved, ResolveRequest, ResolverRegistry};
use crate::model::{ResolvedUrl, Source};

fn default_max_resolve_depth() -> usize {
    5
}

/// Engine tuning, loadable from the `[engine]` config section.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EngineConfig {
    /// Maximum number of resolver invocations in one chain.
    #[serde(default = "default_max_resolve_depth")]
    pub max_resolve_depth: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_resolve_depth: default_max_resolve_depth(),
        }
    }
}

/// Per-call policy knobs.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolvePolicy {
    /// Treat the source URL as a trusted direct link: skip registry lookup
    /// entirely and wrap it as a single playable url.
    pub trust_direct: bool,
}

/// Terminal outcome of resolving one source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// No resolver claimed the URL; the source is treated as directly
    /// playable and surfaced unchanged.
    Direct(Source),
    /// The chain terminated in playable urls. Empty means no stream was
    /// found, which is zero results rather than a failure.
    Streams(Vec<ResolvedUrl>),
}

#[derive(Debug, Error)]
pub enum ResolveError {
    /// A resolve handler failed; annotated with where in the chain.
    #[error("resolver failed for '{url}' at depth {depth}")]
    Handler {
        url: String,
        depth: usize,
        source: HandlerError,
    },
    /// The chain loop guard tripped. `chain` carries every URL walked, in
    /// order, for diagnosis.
    #[error("resolution depth {max_depth} exceeded (chain: {})", .chain.join(" -> "))]
    DepthExceeded {
        max_depth: usize,
        chain: Vec<String>,
    },
    /// The caller-supplied cancellation token was raised.
    #[error("resolution cancelled")]
    Cancelled,
}

/// Drives sources against one addon's resolve-handler registry.
///
/// Cheap to clone: the registry inside is immutable after addon init, so
/// concurrent chains share it without locking.
#[derive(Clone)]
pub struct ResolutionEngine {
    resolvers: ResolverRegistry,
    config: EngineConfig,
}

impl ResolutionEngine {
    pub fn new(resolvers: ResolverRegistry, config: EngineConfig) -> Self {
        Self { resolvers, config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Resolve one source with the default policy.
    pub async fn resolve(
        &self,
        source: &Source,
        ctx: &RequestContext,
    ) -> Result<Resolution, ResolveError> {
        self.resolve_with(source, ResolvePolicy::default(), ctx).await
    }

    /// Resolve one source to a terminal outcome.
    ///
    /// Handler failures propagate annotated with URL and depth; they are
    /// never retried or swallowed here.
    pub async fn resolve_with(
        &self,
        source: &Source,
        policy: ResolvePolicy,
        ctx: &RequestContext,
    ) -> Result<Resolution, ResolveError> {
        if policy.trust_direct {
            let direct = ResolvedUrl::new(source.url.clone())
                .with_name(source.name.clone());
            return Ok(Resolution::Streams(vec![direct]));
        }

        let origin = source.url.clone();
        let mut current = source.clone();
        let mut chain = vec![current.url.clone()];
        let mut depth = 0;

        loop {
            if ctx.cancellation().is_cancelled() {
                debug!(url = %current.url, depth, "Resolution cancelled");
                return Err(ResolveError::Cancelled);
            }

            let Some(found) = self.resolvers.find(&current.url) else {
                // No resolver claims this URL: absence of special handling,
                // not an error. The source plays as-is.
                return Ok(Resolution::Direct(current));
            };

            depth += 1;
            if depth > self.config.max_resolve_depth {
                warn!(
                    max_depth = self.config.max_resolve_depth,
                    chain = chain.join(" -> "),
                    "Resolver chain exceeded depth limit"
                );
                return Err(ResolveError::DepthExceeded {
                    max_depth: self.config.max_resolve_depth,
                    chain,
                });
            }

            debug!(
                url = %current.url,
                pattern = %found.pattern,
                depth,
                request_id = %ctx.request_id(),
                "Invoking resolver"
            );

            let request = ResolveRequest {
                url: current.url.clone(),
                origin: origin.clone(),
            };
            match found
                .handler
                .resolve(found.groups, request, ctx.clone())
                .await
            {
                Ok(Resolved::Urls(streams)) => {
                    debug!(count = streams.len(), depth, "Resolution terminal");
                    return Ok(Resolution::Streams(streams));
                }
                Ok(Resolved::Source(next)) => {
                    chain.push(next.url.clone());
                    current = next;
                }
                Err(source_err) => {
                    return Err(ResolveError::Handler {
                        url: current.url.clone(),
                        depth,
                        source: source_err,
                    });
                }
            }
        }
    }

    /// Resolve many sources concurrently, one chain per source.
    ///
    /// Results come back paired with their source, in input order;
    /// completion order never leaks to the caller.
    pub async fn resolve_all(
        &self,
        sources: Vec<Source>,
        ctx: &RequestContext,
    ) -> Vec<(Source, Result<Resolution, ResolveError>)> {
        let count = sources.len();
        let mut tasks = JoinSet::new();

        for (index, source) in sources.into_iter().enumerate() {
            let engine = self.clone();
            let ctx = ctx.clone();
            tasks.spawn(async move {
                let outcome = engine.resolve(&source, &ctx).await;
                (index, source, outcome)
            });
        }

        let mut slots: Vec<Option<(Source, Result<Resolution, ResolveError>)>> =
            (0..count).map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, source, outcome)) => slots[index] = Some((source, outcome)),
                Err(err) => warn!(error = %err, "Resolution task aborted"),
            }
        }
        slots.into_iter().flatten().collect()
    }
}

impl std::fmt::Debug for ResolutionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolutionEngine")
            .field("resolvers", &self.resolvers.len())
            .field("max_resolve_depth", &self.config.max_resolve_depth)
            .finish()
    }
}
