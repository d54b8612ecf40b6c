use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use std::path::Path;

// ---------------------------------------------------------------------------
// Subcommand definition
// ---------------------------------------------------------------------------

#[derive(Subcommand, Debug)]
pub enum ProductSubcommand {
    /// Add a product to the catalog
    Add {
        name: String,
        /// Mark the product featured immediately
        #[arg(long)]
        featured: bool,
    },
    /// List catalog products, oldest first
    List {
        /// Only featured products
        #[arg(long, conflicts_with = "unfeatured")]
        featured: bool,
        /// Only non-featured products
        #[arg(long)]
        unfeatured: bool,
    },
    /// Remove a product from the catalog
    Remove { id: i64 },
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn run(root: &Path, subcommand: ProductSubcommand, json: bool) -> anyhow::Result<()> {
    super::load_config(root)?;
    let catalog = super::open_catalog(root)?;

    match subcommand {
        ProductSubcommand::Add { name, featured } => {
            let product = catalog
                .add(&name, featured)
                .context("failed to add product")?;
            if json {
                print_json(&product)?;
            } else {
                println!("Added product {} '{}'", product.id, product.name);
            }
        }
        ProductSubcommand::List {
            featured,
            unfeatured,
        } => {
            let filter = match (featured, unfeatured) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            };
            let products = catalog.list(filter)?;
            if json {
                print_json(&products)?;
            } else if products.is_empty() {
                println!("No products.");
            } else {
                let rows = products
                    .iter()
                    .map(|p| {
                        vec![
                            p.id.to_string(),
                            p.name.clone(),
                            if p.featured { "yes" } else { "no" }.to_string(),
                            p.created_at.format("%Y-%m-%d %H:%M").to_string(),
                        ]
                    })
                    .collect();
                print_table(&["ID", "NAME", "FEATURED", "CREATED"], rows);
            }
        }
        ProductSubcommand::Remove { id } => {
            catalog.remove(id).with_context(|| format!("failed to remove product {id}"))?;
            if json {
                print_json(&serde_json::json!({ "removed": id }))?;
            } else {
                println!("Removed product {id}");
            }
        }
    }
    Ok(())
}
