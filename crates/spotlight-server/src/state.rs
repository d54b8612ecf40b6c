use std::path::{Path, PathBuf};
use std::sync::Arc;

use spotlight_core::catalog::{Catalog, SqliteCatalog};
use spotlight_core::config::Config;
use spotlight_core::rotation::RotationOptions;
use spotlight_core::store::{RunTrigger, Store};
use spotlight_core::{paths, Result};

/// Shared application state passed to all route handlers and the tick loop.
#[derive(Clone)]
pub struct AppState {
    pub root: PathBuf,
    pub config: Arc<Config>,
    pub catalog: Arc<dyn Catalog>,
    pub store: Arc<Store>,
}

impl AppState {
    pub fn new(root: PathBuf, config: Config, catalog: Arc<dyn Catalog>, store: Store) -> Self {
        Self {
            root,
            config: Arc::new(config),
            catalog,
            store: Arc::new(store),
        }
    }

    /// Load config and open the catalog and store under `root`.
    pub fn open(root: &Path) -> Result<Self> {
        let config = Config::load(root)?;
        let catalog = SqliteCatalog::open(&paths::catalog_path(root))?;
        let store = Store::open(&paths::store_path(root))?;
        Ok(Self::new(root.to_path_buf(), config, Arc::new(catalog), store))
    }

    pub fn rotation_options(&self, trigger: RunTrigger) -> RotationOptions {
        RotationOptions::from_config(&self.config, trigger)
    }
}
