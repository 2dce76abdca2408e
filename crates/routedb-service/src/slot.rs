use std::sync::Arc;
use tokio::sync::RwLock;

use routedb_core::error::{Error, Result};

use crate::catalog::Catalog;

/// The catalog currently being served, if any.
///
/// Readers clone the `Arc` out and release the lock immediately; `install`
/// swaps in a new catalog wholesale while in-flight readers keep the old one.
#[derive(Clone, Default)]
pub struct ModelSlot {
    inner: Arc<RwLock<Option<Arc<Catalog>>>>,
}

impl ModelSlot {
    pub fn new() -> Self { Self::default() }

    pub fn with_catalog(catalog: Catalog) -> Self {
        Self { inner: Arc::new(RwLock::new(Some(Arc::new(catalog)))) }
    }

    pub async fn get(&self) -> Result<Arc<Catalog>> {
        self.inner
            .read()
            .await
            .clone()
            .ok_or_else(|| Error::UnknownModel("no route index has been built or loaded yet".to_string()))
    }

    pub async fn is_loaded(&self) -> bool { self.inner.read().await.is_some() }

    pub async fn install(&self, catalog: Catalog) -> Arc<Catalog> {
        let catalog = Arc::new(catalog);
        let previous = self.inner.write().await.replace(catalog.clone());
        tracing::info!(
            model_id = catalog.model_id(),
            routes = catalog.routes().len(),
            replaced = previous.is_some(),
            "installed route catalog"
        );
        catalog
    }
}
