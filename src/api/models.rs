//! API models for the addon stage and resolution endpoints.
//!
//! The HTTP contract is JSON-only: stage inputs arrive as the records from
//! [`crate::model`] and [`crate::handlers`], outcomes leave as the response
//! shapes below, and failures leave as an [`ErrorResponse`] envelope.
//!
//! # Endpoints
//!
//! - `GET /health` → [`HealthResponse`]
//! - `GET /addons` → [`AddonsResponse`]
//! - `GET /addons/{addon_id}/manifest` → the addon's manifest
//! - `POST /addons/{addon_id}/catalog` (body: `CatalogRequest`) → `CatalogPage`
//! - `POST /addons/{addon_id}/item` (body: `MediaIdentity`) → `MediaItem`
//!   or `null` when the identity is unknown (not found is not an error)
//! - `POST /addons/{addon_id}/source` (body: `MediaIdentity`) → `[Source]`
//! - `POST /addons/{addon_id}/resolve` (body: [`ResolveBody`]) →
//!   [`ResolveResponse`]
//! - `POST /addons/{addon_id}/streams` (body: `MediaIdentity`) →
//!   [`StreamsResponse`]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::addon::AddonManifest;
use crate::engine::{Resolution, ResolveError};
use crate::handlers::Stage;
use crate::model::{ResolvedUrl, Source};

/// Body of `POST /addons/{addon_id}/resolve`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveBody {
    pub source: Source,
    /// Skip resolution and trust the source URL as directly playable.
    #[serde(default)]
    pub trust_direct: bool,
}

/// Outcome of resolving one source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ResolveResponse {
    /// No resolver claimed the URL; the source plays as-is.
    Direct { source: Source },
    /// The chain terminated; empty `streams` means nothing playable found.
    Streams { streams: Vec<ResolvedUrl> },
}

impl From<Resolution> for ResolveResponse {
    fn from(resolution: Resolution) -> Self {
        match resolution {
            Resolution::Direct(source) => Self::Direct { source },
            Resolution::Streams(streams) => Self::Streams { streams },
        }
    }
}

/// Per-source outcome of the full `streams` pipeline. A failing source
/// does not fail its siblings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SourceOutcome {
    Direct {
        source: Source,
    },
    Streams {
        source: Source,
        streams: Vec<ResolvedUrl>,
    },
    Failed {
        source: Source,
        error: String,
    },
}

impl SourceOutcome {
    pub fn new(source: Source, outcome: Result<Resolution, ResolveError>) -> Self {
        match outcome {
            Ok(Resolution::Direct(source)) => Self::Direct { source },
            Ok(Resolution::Streams(streams)) => Self::Streams { source, streams },
            Err(err) => Self::Failed {
                source,
                error: err.to_string(),
            },
        }
    }
}

/// Response of `POST /addons/{addon_id}/streams`: one outcome per source,
/// in the order the source stage produced them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamsResponse {
    pub results: Vec<SourceOutcome>,
}

/// One addon in the `GET /addons` listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddonSummary {
    pub manifest: AddonManifest,
    /// Stages with a registered handler, in pipeline order.
    pub stages: Vec<Stage>,
    pub resolve_handlers: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddonsResponse {
    pub addons: Vec<AddonSummary>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub started_at: DateTime<Utc>,
    pub addons: usize,
}
