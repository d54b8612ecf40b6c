use std::path::{Path, PathBuf};

pub const SPOTLIGHT_DIR: &str = ".spotlight";
pub const CONFIG_FILE: &str = ".spotlight/config.yaml";
pub const CATALOG_DB: &str = ".spotlight/catalog.db";
pub const STORE_DB: &str = ".spotlight/spotlight.redb";

pub fn spotlight_dir(root: &Path) -> PathBuf {
    root.join(SPOTLIGHT_DIR)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn catalog_path(root: &Path) -> PathBuf {
    root.join(CATALOG_DB)
}

pub fn store_path(root: &Path) -> PathBuf {
    root.join(STORE_DB)
}
