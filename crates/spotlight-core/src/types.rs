use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type ProductId = i64;

// ---------------------------------------------------------------------------
// Product
// ---------------------------------------------------------------------------

/// A catalog product as seen by the rotation: identity, display name and the
/// featured flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
}

impl Product {
    pub fn set_featured(&mut self, featured: bool) {
        self.featured = featured;
    }
}

// ---------------------------------------------------------------------------
// ProductQuery
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryOrder {
    /// Oldest `created_at` first, ties broken by id.
    CreatedAsc,
    Random,
}

/// Filter + ordering + limit for a catalog lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductQuery {
    pub featured: bool,
    pub order: QueryOrder,
    pub limit: usize,
}

impl ProductQuery {
    /// Currently featured products, longest-featured candidates first.
    pub fn featured_oldest_first(limit: usize) -> Self {
        Self {
            featured: true,
            order: QueryOrder::CreatedAsc,
            limit,
        }
    }

    /// Products eligible to become featured, in random order.
    pub fn unfeatured_random(limit: usize) -> Self {
        Self {
            featured: false,
            order: QueryOrder::Random,
            limit,
        }
    }
}
