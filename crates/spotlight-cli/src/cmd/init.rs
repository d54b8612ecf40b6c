use crate::output::print_json;
use anyhow::Context;
use chrono::Utc;
use spotlight_core::{config::Config, io, paths, SpotlightError};
use std::path::Path;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    io::ensure_dir(&paths::spotlight_dir(root)).context("failed to create .spotlight/")?;

    let (config, created) = match Config::load(root) {
        Ok(existing) => (existing, false),
        Err(SpotlightError::NotInitialized) => {
            let fresh = Config::new();
            fresh.save(root).context("failed to write config")?;
            (fresh, true)
        }
        Err(e) => return Err(e).context("failed to load config"),
    };

    super::open_catalog(root)?;
    let store = super::open_store(root)?;
    let registered = store
        .activate(&config.hook, config.recurrence, Utc::now())
        .context("failed to register schedule")?;

    if json {
        print_json(&serde_json::json!({
            "root": root.display().to_string(),
            "config_created": created,
            "schedule_registered": registered,
            "hook": config.hook,
        }))?;
    } else {
        if created {
            println!("Wrote {}", paths::CONFIG_FILE);
        }
        if registered {
            println!("Registered schedule '{}' ({:?}).", config.hook, config.recurrence);
        }
        println!("spotlight initialized in {}", root.display());
    }
    Ok(())
}
