use crate::output::print_json;
use anyhow::Context;
use chrono::Utc;
use std::path::Path;

pub fn activate(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = super::load_config(root)?;
    let store = super::open_store(root)?;
    let registered = store
        .activate(&config.hook, config.recurrence, Utc::now())
        .context("failed to register schedule")?;
    let schedule = store.schedule(&config.hook)?;

    if json {
        print_json(&serde_json::json!({
            "registered": registered,
            "schedule": schedule,
        }))?;
    } else if registered {
        println!("Registered schedule '{}'.", config.hook);
    } else {
        println!("Schedule '{}' is already registered.", config.hook);
    }
    Ok(())
}

pub fn deactivate(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = super::load_config(root)?;
    let store = super::open_store(root)?;
    let removed = store
        .deactivate(&config.hook)
        .context("failed to remove schedule")?;

    if json {
        print_json(&serde_json::json!({ "removed": removed }))?;
    } else if removed {
        println!("Removed schedule '{}'.", config.hook);
    } else {
        println!("Schedule '{}' was not registered.", config.hook);
    }
    Ok(())
}
