use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{read_json, write_json, Store, SETTINGS};
use crate::error::Result;

/// Settings key holding the most recent [`RunResult`].
pub const LAST_RUN_KEY: &str = "last_featured_products";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunTrigger {
    Scheduled,
    Manual,
}

impl std::fmt::Display for RunTrigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Scheduled => write!(f, "scheduled"),
            Self::Manual => write!(f, "manual"),
        }
    }
}

/// Display names featured by the latest rotation. Replaced wholesale on
/// every run; no history is kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    pub titles: Vec<String>,
    #[serde(default)]
    pub ran_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub trigger: Option<RunTrigger>,
}

impl RunResult {
    pub fn new(titles: Vec<String>, trigger: RunTrigger, ran_at: DateTime<Utc>) -> Self {
        Self {
            titles,
            ran_at: Some(ran_at),
            trigger: Some(trigger),
        }
    }
}

impl Store {
    pub fn load_run_result(&self) -> Result<Option<RunResult>> {
        self.get_json(SETTINGS, LAST_RUN_KEY)
    }

    /// Load the last-run record, writing an empty one first if none exists.
    pub fn run_result_or_init(&self) -> Result<RunResult> {
        self.with_db(|db| {
            if let Some(existing) = read_json::<RunResult>(db, SETTINGS, LAST_RUN_KEY)? {
                return Ok(existing);
            }
            let empty = RunResult::default();
            write_json(db, SETTINGS, LAST_RUN_KEY, &empty)?;
            Ok(empty)
        })
    }

    pub fn replace_run_result(&self, result: &RunResult) -> Result<()> {
        self.put_json(SETTINGS, LAST_RUN_KEY, result)
    }
}
