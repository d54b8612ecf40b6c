use crate::output::print_json;
use std::path::Path;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = super::load_config(root)?;
    let store = super::open_store(root)?;
    let schedule = store.schedule(&config.hook)?;
    let last_run = store.load_run_result()?.unwrap_or_default();

    if json {
        print_json(&serde_json::json!({
            "hook": config.hook,
            "batch_size": config.batch_size,
            "schedule": schedule,
            "last_run": last_run,
        }))?;
        return Ok(());
    }

    match &schedule {
        Some(s) => {
            println!("Schedule:  {} ({:?})", s.hook, s.recurrence);
            println!("Next run:  {}", s.next_run_at.format("%Y-%m-%d %H:%M:%S UTC"));
        }
        None => println!("Schedule:  not active (run `spotlight activate`)"),
    }
    match (last_run.ran_at, last_run.trigger) {
        (Some(at), Some(trigger)) => {
            println!("Last run:  {} ({trigger})", at.format("%Y-%m-%d %H:%M:%S UTC"))
        }
        (Some(at), None) => println!("Last run:  {}", at.format("%Y-%m-%d %H:%M:%S UTC")),
        _ => println!("Last run:  never"),
    }

    println!();
    println!("Most recently featured products:");
    if last_run.titles.is_empty() {
        println!("  No products have been marked as featured yet.");
    }
    for title in &last_run.titles {
        println!("  * {title}");
    }
    Ok(())
}
