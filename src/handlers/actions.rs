use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::traits::{CatalogHandler, HandlerError, ItemHandler, SourceHandler};
use super::types::{CatalogPage, CatalogRequest, Stage};
use crate::context::RequestContext;
use crate::model::{MediaIdentity, MediaItem, Source};

#[derive(Debug, Error)]
pub enum RegistryError {
    /// Registration-time misconfiguration; fatal at addon init.
    #[error("handler already registered for stage '{0}'")]
    DuplicateHandler(Stage),
    /// No handler exists for the requested stage; fatal to the request,
    /// not to the process.
    #[error("no handler registered for stage '{0}'")]
    UnhandledStage(Stage),
}

/// Dispatch failure: either structural (registry) or raised by the
/// addon-supplied handler itself.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error("stage handler failed: {0}")]
    Handler(#[from] HandlerError),
}

/// A stage invocation, routed by [`ActionRegistry::dispatch`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "stage", content = "input", rename_all = "snake_case")]
pub enum StageRequest {
    Catalog(CatalogRequest),
    Item(MediaIdentity),
    Source(MediaIdentity),
}

impl StageRequest {
    pub fn stage(&self) -> Stage {
        match self {
            Self::Catalog(_) => Stage::Catalog,
            Self::Item(_) => Stage::Item,
            Self::Source(_) => Stage::Source,
        }
    }
}

/// The handler's result, passed through unchanged by dispatch.
///
/// `Item(None)` and an empty `Sources` list are valid not-found outcomes,
/// distinct from every error kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "stage", content = "output", rename_all = "snake_case")]
pub enum StageResponse {
    Catalog(CatalogPage),
    Item(Option<MediaItem>),
    Sources(Vec<Source>),
}

/// Registry holding at most one handler per pipeline stage.
///
/// Populated during addon init, then shared immutably; no business-logic
/// validation happens at this layer.
#[derive(Default)]
pub struct ActionRegistry {
    catalog: Option<Arc<dyn CatalogHandler>>,
    item: Option<Arc<dyn ItemHandler>>,
    source: Option<Arc<dyn SourceHandler>>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_catalog(
        &mut self,
        handler: impl CatalogHandler + 'static,
    ) -> Result<(), RegistryError> {
        if self.catalog.is_some() {
            return Err(RegistryError::DuplicateHandler(Stage::Catalog));
        }
        self.catalog = Some(Arc::new(handler));
        Ok(())
    }

    pub fn register_item(
        &mut self,
        handler: impl ItemHandler + 'static,
    ) -> Result<(), RegistryError> {
        if self.item.is_some() {
            return Err(RegistryError::DuplicateHandler(Stage::Item));
        }
        self.item = Some(Arc::new(handler));
        Ok(())
    }

    pub fn register_source(
        &mut self,
        handler: impl SourceHandler + 'static,
    ) -> Result<(), RegistryError> {
        if self.source.is_some() {
            return Err(RegistryError::DuplicateHandler(Stage::Source));
        }
        self.source = Some(Arc::new(handler));
        Ok(())
    }

    pub fn has(&self, stage: Stage) -> bool {
        match stage {
            Stage::Catalog => self.catalog.is_some(),
            Stage::Item => self.item.is_some(),
            Stage::Source => self.source.is_some(),
        }
    }

    /// Stages with a registered handler, in pipeline order.
    pub fn stages(&self) -> Vec<Stage> {
        [Stage::Catalog, Stage::Item, Stage::Source]
            .into_iter()
            .filter(|stage| self.has(*stage))
            .collect()
    }

    /// Route a request to the registered handler and return its result
    /// unchanged.
    pub async fn dispatch(
        &self,
        request: StageRequest,
        ctx: RequestContext,
    ) -> Result<StageResponse, DispatchError> {
        let stage = request.stage();
        debug!(%stage, request_id = %ctx.request_id(), "Dispatching stage");

        match request {
            StageRequest::Catalog(input) => {
                let handler = self
                    .catalog
                    .as_ref()
                    .ok_or(RegistryError::UnhandledStage(Stage::Catalog))?;
                Ok(StageResponse::Catalog(handler.catalog(input, ctx).await?))
            }
            StageRequest::Item(input) => {
                let handler = self
                    .item
                    .as_ref()
                    .ok_or(RegistryError::UnhandledStage(Stage::Item))?;
                Ok(StageResponse::Item(handler.item(input, ctx).await?))
            }
            StageRequest::Source(input) => {
                let handler = self
                    .source
                    .as_ref()
                    .ok_or(RegistryError::UnhandledStage(Stage::Source))?;
                Ok(StageResponse::Sources(handler.sources(input, ctx).await?))
            }
        }
    }
}

impl std::fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionRegistry")
            .field("stages", &self.stages())
            .finish()
    }
}
