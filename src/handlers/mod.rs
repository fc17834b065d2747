//! Handler system: the two registries addons populate at init time.
//!
//! ## Key Components
//!
//! - [`CatalogHandler`] / [`ItemHandler`] / [`SourceHandler`] - stage
//!   handler contracts (plain async fns register directly)
//! - [`ResolveHandler`] - turns a matched URL into playable results
//! - [`ActionRegistry`] - one handler slot per pipeline stage
//! - [`ResolverRegistry`] - ordered `(pattern, handler)` sequence where
//!   the first registered match wins
//!
//! Both registries are populated once during addon initialization and are
//! immutable afterwards; the resolution engine and the runtime share them
//! without locking.

mod actions;
mod resolve;
mod traits;
mod types;

pub use actions::{
    ActionRegistry, DispatchError, RegistryError, StageRequest, StageResponse,
};
pub use resolve::{ResolverMatch, ResolverRegistry};
pub use traits::{
    CatalogHandler, HandlerError, ItemHandler, ResolveHandler, SourceHandler,
};
pub use types::{
    CatalogPage, CatalogRequest, Resolved, ResolveRequest, Stage, UrlMatch,
};
