//! Addon façade: the registration surface addon authors build against.
//!
//! An addon bundles identity metadata with the two handler registries.
//! All registration happens in a single init phase; afterwards the addon
//! is shared immutably (typically behind an `Arc`) and the runtime builds
//! a resolution engine from its resolver registry. There is no
//! process-wide registry state, so multiple addons coexist in one process
//! and in one test.

mod sample;

pub use sample::demo_addon;

use bon::Builder;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::context::RequestContext;
use crate::handlers::{
    ActionRegistry, CatalogHandler, DispatchError, ItemHandler, RegistryError,
    ResolveHandler, ResolverRegistry, SourceHandler, StageRequest, StageResponse,
};
use crate::model::{MediaIdentity, MediaType};

/// Addon identity metadata.
///
/// `item_types` declares which media types the addon serves; `triggers`
/// names the identity fields whose presence makes this addon a candidate
/// for a request (`"name"`, or an id namespace such as `"imdb_id"`). The
/// orchestrator that picks among candidate addons lives outside the core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Builder)]
pub struct AddonManifest {
    #[builder(into)]
    pub id: String,
    #[builder(into)]
    pub name: String,
    #[builder(into)]
    pub version: String,
    #[serde(default)]
    #[builder(default)]
    pub item_types: Vec<MediaType>,
    #[serde(default)]
    #[builder(default)]
    pub triggers: Vec<String>,
}

/// A content addon: manifest plus its populated registries.
pub struct Addon {
    manifest: AddonManifest,
    actions: ActionRegistry,
    resolvers: ResolverRegistry,
}

impl Addon {
    pub fn new(manifest: AddonManifest) -> Self {
        Self {
            manifest,
            actions: ActionRegistry::new(),
            resolvers: ResolverRegistry::new(),
        }
    }

    pub fn manifest(&self) -> &AddonManifest {
        &self.manifest
    }

    pub fn actions(&self) -> &ActionRegistry {
        &self.actions
    }

    pub fn resolvers(&self) -> &ResolverRegistry {
        &self.resolvers
    }

    /// Register the `catalog` stage handler. At most one per stage.
    pub fn register_catalog(
        &mut self,
        handler: impl CatalogHandler + 'static,
    ) -> Result<(), RegistryError> {
        self.actions.register_catalog(handler)
    }

    /// Register the `item` stage handler. At most one per stage.
    pub fn register_item(
        &mut self,
        handler: impl ItemHandler + 'static,
    ) -> Result<(), RegistryError> {
        self.actions.register_item(handler)
    }

    /// Register the `source` stage handler. At most one per stage.
    pub fn register_source(
        &mut self,
        handler: impl SourceHandler + 'static,
    ) -> Result<(), RegistryError> {
        self.actions.register_source(handler)
    }

    /// Append a resolve handler. Registration order is match priority:
    /// overlapping patterns are tie-broken by whichever was added first.
    pub fn add_resolve_handler(
        &mut self,
        pattern: Regex,
        handler: impl ResolveHandler + 'static,
    ) {
        self.resolvers.add(pattern, handler);
    }

    /// Dispatch a stage request against this addon's handlers.
    pub async fn dispatch(
        &self,
        request: StageRequest,
        ctx: RequestContext,
    ) -> Result<StageResponse, DispatchError> {
        self.actions.dispatch(request, ctx).await
    }

    /// Whether this addon is a candidate for the given identity.
    ///
    /// The identity's media type must be among the declared `item_types`
    /// (an empty declaration accepts all), and at least one declared
    /// trigger field must be present (no declared triggers accepts all).
    pub fn triggers_on(&self, identity: &MediaIdentity) -> bool {
        if !self.manifest.item_types.is_empty()
            && !self.manifest.item_types.contains(&identity.media_type)
        {
            return false;
        }
        if self.manifest.triggers.is_empty() {
            return true;
        }
        self.manifest.triggers.iter().any(|trigger| match trigger.as_str() {
            "name" => identity.name.is_some(),
            namespace => identity.ids.contains_key(namespace),
        })
    }
}

impl std::fmt::Debug for Addon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Addon")
            .field("id", &self.manifest.id)
            .field("stages", &self.actions.stages())
            .field("resolve_handlers", &self.resolvers.len())
            .finish()
    }
}
