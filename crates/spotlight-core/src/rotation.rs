//! The daily featured-product rotation.
//!
//! [`run`] is the single entry point shared by the scheduler tick loop, the
//! admin manual-run endpoint and `spotlight run`:
//!
//! 1. up to `batch_size` featured products, oldest first, are unfeatured;
//! 2. up to `batch_size` products that were not featured when the run
//!    started, in random order, are featured and their names collected;
//! 3. the collected names replace the stored [`RunResult`].
//!
//! The batch is not transactional. A product that no longer resolves is
//! skipped, and so is one whose save fails; the next run picks up from
//! whatever flag state the catalog ends up in.

use std::collections::HashSet;

use chrono::Utc;
use serde::Serialize;

use crate::catalog::Catalog;
use crate::config::Config;
use crate::error::Result;
use crate::store::{RunResult, RunTrigger, Store};
use crate::types::{ProductId, ProductQuery};

const LOG_TARGET: &str = "spotlight::rotation";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationOptions {
    pub batch_size: usize,
    pub trigger: RunTrigger,
}

impl RotationOptions {
    pub fn from_config(config: &Config, trigger: RunTrigger) -> Self {
        Self {
            batch_size: config.batch_size,
            trigger,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RotationReport {
    pub unfeatured: Vec<ProductId>,
    pub featured: Vec<ProductId>,
    /// Names of `featured`, in the same order. This is what gets stored.
    pub titles: Vec<String>,
    /// Products that vanished or failed to save.
    pub skipped: usize,
}

pub fn run(catalog: &dyn Catalog, store: &Store, options: &RotationOptions) -> Result<RotationReport> {
    tracing::debug!(target: LOG_TARGET, trigger = %options.trigger, "starting featured products run");
    let mut report = RotationReport::default();

    unfeature_old(catalog, options.batch_size, &mut report)?;
    feature_new(catalog, options.batch_size, &mut report)?;

    let result = RunResult::new(report.titles.clone(), options.trigger, Utc::now());
    store.replace_run_result(&result)?;

    tracing::debug!(
        target: LOG_TARGET,
        unfeatured = report.unfeatured.len(),
        featured = report.featured.len(),
        skipped = report.skipped,
        "finished featured products run"
    );
    Ok(report)
}

fn unfeature_old(catalog: &dyn Catalog, limit: usize, report: &mut RotationReport) -> Result<()> {
    tracing::debug!(target: LOG_TARGET, "unfeaturing old products");
    let ids = catalog.query(&ProductQuery::featured_oldest_first(limit))?;
    for id in ids {
        if set_flag(catalog, id, false, report).is_some() {
            report.unfeatured.push(id);
            tracing::debug!(target: LOG_TARGET, product_id = id, "unfeatured product");
        }
    }
    Ok(())
}

fn feature_new(catalog: &dyn Catalog, limit: usize, report: &mut RotationReport) -> Result<()> {
    tracing::debug!(target: LOG_TARGET, "featuring new products");
    // Products unfeatured a moment ago sit in the non-featured pool too; they
    // are not eligible until the next run.
    let rotated_out: HashSet<ProductId> = report.unfeatured.iter().copied().collect();
    let query = ProductQuery::unfeatured_random(limit.saturating_add(rotated_out.len()));
    let ids: Vec<ProductId> = catalog
        .query(&query)?
        .into_iter()
        .filter(|id| !rotated_out.contains(id))
        .take(limit)
        .collect();
    for id in ids {
        if let Some(name) = set_flag(catalog, id, true, report) {
            report.featured.push(id);
            report.titles.push(name);
            tracing::debug!(target: LOG_TARGET, product_id = id, "featured product");
        }
    }
    Ok(())
}

/// Resolve, flip and save one product. Returns its name on success.
fn set_flag(
    catalog: &dyn Catalog,
    id: ProductId,
    featured: bool,
    report: &mut RotationReport,
) -> Option<String> {
    let mut product = match catalog.get(id) {
        Ok(Some(p)) => p,
        Ok(None) => {
            report.skipped += 1;
            return None;
        }
        Err(e) => {
            tracing::warn!(target: LOG_TARGET, product_id = id, error = %e, "failed to load product");
            report.skipped += 1;
            return None;
        }
    };
    product.set_featured(featured);
    if let Err(e) = catalog.save(&product) {
        tracing::warn!(target: LOG_TARGET, product_id = id, error = %e, "failed to save product");
        report.skipped += 1;
        return None;
    }
    Some(product.name)
}
