use crate::output::print_json;
use anyhow::Context;
use spotlight_core::rotation::{self, RotationOptions};
use spotlight_core::store::RunTrigger;
use std::path::Path;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = super::load_config(root)?;
    let catalog = super::open_catalog(root)?;
    let store = super::open_store(root)?;

    let options = RotationOptions::from_config(&config, RunTrigger::Manual);
    let report = rotation::run(&catalog, &store, &options).context("rotation failed")?;

    if json {
        print_json(&report)?;
        return Ok(());
    }

    println!(
        "Unfeatured {} product(s), featured {} product(s).",
        report.unfeatured.len(),
        report.featured.len()
    );
    if report.skipped > 0 {
        println!("Skipped {} product(s).", report.skipped);
    }
    for title in &report.titles {
        println!("  * {title}");
    }
    Ok(())
}
