use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::addon::Addon;
use crate::config::Config;
use crate::context::RequestContext;
use crate::engine::ResolutionEngine;
use crate::observability::Metrics;

/// One registered addon plus the engine built from its resolver registry.
#[derive(Clone)]
pub struct AddonRuntime {
    pub addon: Arc<Addon>,
    pub engine: ResolutionEngine,
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub http: reqwest::Client,
    pub metrics: Arc<Metrics>,
    pub started_at: DateTime<Utc>,
    addons: Arc<BTreeMap<String, AddonRuntime>>,
}

impl AppState {
    pub fn new(config: Config, http: reqwest::Client, addons: Vec<Addon>) -> Self {
        let mut runtimes = BTreeMap::new();
        for addon in addons {
            let id = addon.manifest().id.clone();
            if runtimes.contains_key(&id) {
                warn!(addon = %id, "Duplicate addon id, keeping first registration");
                continue;
            }
            let engine =
                ResolutionEngine::new(addon.resolvers().clone(), config.engine.clone());
            runtimes.insert(
                id,
                AddonRuntime {
                    addon: Arc::new(addon),
                    engine,
                },
            );
        }

        Self {
            config: Arc::new(config),
            http,
            metrics: Arc::new(Metrics::new()),
            started_at: Utc::now(),
            addons: Arc::new(runtimes),
        }
    }

    pub fn addon(&self, id: &str) -> Option<&AddonRuntime> {
        self.addons.get(id)
    }

    pub fn addon_count(&self) -> usize {
        self.addons.len()
    }

    pub fn addons(&self) -> impl Iterator<Item = &AddonRuntime> {
        self.addons.values()
    }

    /// Fresh per-request context sharing the outbound client.
    pub fn request_context(&self) -> RequestContext {
        RequestContext::new(self.http.clone())
    }
}
