use std::future::Future;

use async_trait::async_trait;
use thiserror::Error;

use super::types::{CatalogPage, CatalogRequest, Resolved, ResolveRequest, UrlMatch};
use crate::context::RequestContext;
use crate::model::{MediaIdentity, MediaItem, Source};

/// Failure surface of addon-supplied handlers.
///
/// "Not found" outcomes are not errors: an absent item is `Ok(None)`, an
/// empty source list is `Ok(vec![])`, and a resolver that finds nothing
/// returns an empty url sequence.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// A resolve handler explicitly failed, with a human-readable cause
    /// (e.g. "no stream found for id X").
    #[error("resolution failed: {0}")]
    Resolution(String),
    #[error("upstream fetch failed: {0}")]
    Fetch(#[from] reqwest::Error),
    #[error("fatal handler error: {0}")]
    Fatal(String),
}

impl HandlerError {
    pub fn resolution(cause: impl Into<String>) -> Self {
        Self::Resolution(cause.into())
    }
}

/// Handler of the `catalog` stage: produces one page of the item sequence.
#[async_trait]
pub trait CatalogHandler: Send + Sync {
    async fn catalog(
        &self,
        request: CatalogRequest,
        ctx: RequestContext,
    ) -> Result<CatalogPage, HandlerError>;
}

/// Handler of the `item` stage: produces exactly one item, or `None` when
/// the identity cannot be resolved to a known item.
#[async_trait]
pub trait ItemHandler: Send + Sync {
    async fn item(
        &self,
        request: MediaIdentity,
        ctx: RequestContext,
    ) -> Result<Option<MediaItem>, HandlerError>;
}

/// Handler of the `source` stage: produces zero or more sources for an item.
#[async_trait]
pub trait SourceHandler: Send + Sync {
    async fn sources(
        &self,
        request: MediaIdentity,
        ctx: RequestContext,
    ) -> Result<Vec<Source>, HandlerError>;
}

/// Handler invoked when its registered pattern matches a URL under
/// resolution. May perform arbitrary async work (fetching a page, parsing
/// it) before returning terminal urls or a further-resolvable source.
#[async_trait]
pub trait ResolveHandler: Send + Sync {
    async fn resolve(
        &self,
        groups: UrlMatch,
        request: ResolveRequest,
        ctx: RequestContext,
    ) -> Result<Resolved, HandlerError>;
}

// Plain async functions and closures register directly as handlers, in the
// same spirit as axum route handlers.

#[async_trait]
impl<F, Fut> CatalogHandler for F
where
    F: Fn(CatalogRequest, RequestContext) -> Fut + Send + Sync,
    Fut: Future<Output = Result<CatalogPage, HandlerError>> + Send,
{
    async fn catalog(
        &self,
        request: CatalogRequest,
        ctx: RequestContext,
    ) -> Result<CatalogPage, HandlerError> {
        (self)(request, ctx).await
    }
}

#[async_trait]
impl<F, Fut> ItemHandler for F
where
    F: Fn(MediaIdentity, RequestContext) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Option<MediaItem>, HandlerError>> + Send,
{
    async fn item(
        &self,
        request: MediaIdentity,
        ctx: RequestContext,
    ) -> Result<Option<MediaItem>, HandlerError> {
        (self)(request, ctx).await
    }
}

#[async_trait]
impl<F, Fut> SourceHandler for F
where
    F: Fn(MediaIdentity, RequestContext) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Vec<Source>, HandlerError>> + Send,
{
    async fn sources(
        &self,
        request: MediaIdentity,
        ctx: RequestContext,
    ) -> Result<Vec<Source>, HandlerError> {
        (self)(request, ctx).await
    }
}

#[async_trait]
impl<F, Fut> ResolveHandler for F
where
    F: Fn(UrlMatch, ResolveRequest, RequestContext) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Resolved, HandlerError>> + Send,
{
    async fn resolve(
        &self,
        groups: UrlMatch,
        request: ResolveRequest,
        ctx: RequestContext,
    ) -> Result<Resolved, HandlerError> {
        (self)(groups, request, ctx).await
    }
}
