pub mod init;
pub mod product;
pub mod run;
pub mod schedule;
pub mod serve;
pub mod status;

use anyhow::Context;
use spotlight_core::{catalog::SqliteCatalog, config::Config, paths, store::Store};
use std::path::Path;

pub(crate) fn load_config(root: &Path) -> anyhow::Result<Config> {
    Config::load(root).context("failed to load config")
}

pub(crate) fn open_store(root: &Path) -> anyhow::Result<Store> {
    Store::open(&paths::store_path(root)).context("failed to open store")
}

pub(crate) fn open_catalog(root: &Path) -> anyhow::Result<SqliteCatalog> {
    SqliteCatalog::open(&paths::catalog_path(root)).context("failed to open catalog")
}
