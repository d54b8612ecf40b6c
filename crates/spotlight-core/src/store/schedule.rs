//! Named periodic trigger registrations.
//!
//! A hook is registered at most once; registering an existing name is a
//! no-op. The server tick loop calls [`Store::claim_due`] and runs the
//! rotation only when it returns a schedule.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::{read_json, write_json, Store, SCHEDULES};
use crate::error::Result;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recurrence {
    Hourly,
    TwiceDaily,
    #[default]
    Daily,
    Weekly,
}

impl Recurrence {
    pub fn period(self) -> Duration {
        match self {
            Self::Hourly => Duration::hours(1),
            Self::TwiceDaily => Duration::hours(12),
            Self::Daily => Duration::days(1),
            Self::Weekly => Duration::weeks(1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub hook: String,
    pub recurrence: Recurrence,
    pub next_run_at: DateTime<Utc>,
    #[serde(default)]
    pub last_run_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Schedule {
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_run_at <= now
    }

    /// First occurrence strictly after `now`. Missed periods are skipped,
    /// not replayed.
    fn next_after(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let period = self.recurrence.period();
        if self.next_run_at > now {
            return self.next_run_at;
        }
        let missed = (now - self.next_run_at).num_seconds() / period.num_seconds() + 1;
        self.next_run_at + Duration::seconds(period.num_seconds() * missed)
    }

    fn advance(&mut self, now: DateTime<Utc>) {
        self.next_run_at = self.next_after(now);
        self.last_run_at = Some(now);
    }
}

impl Store {
    /// Register `hook` to fire at `now` and then every `recurrence`.
    ///
    /// Returns `false` without touching the existing registration if the hook
    /// is already registered.
    pub fn activate(&self, hook: &str, recurrence: Recurrence, now: DateTime<Utc>) -> Result<bool> {
        self.with_db(|db| {
            if read_json::<Schedule>(db, SCHEDULES, hook)?.is_some() {
                return Ok(false);
            }
            let schedule = Schedule {
                hook: hook.to_string(),
                recurrence,
                next_run_at: now,
                last_run_at: None,
                created_at: now,
            };
            write_json(db, SCHEDULES, hook, &schedule)?;
            Ok(true)
        })
    }

    /// Remove the registration for `hook`. Returns whether one existed.
    pub fn deactivate(&self, hook: &str) -> Result<bool> {
        self.remove(SCHEDULES, hook)
    }

    pub fn schedule(&self, hook: &str) -> Result<Option<Schedule>> {
        self.get_json(SCHEDULES, hook)
    }

    #[cfg(test)]
    pub(crate) fn schedules(&self) -> Result<Vec<Schedule>> {
        self.list_json(SCHEDULES)
    }

    /// If `hook` is due at `now`, advance it past `now` and return it as it
    /// was before. Check and advance happen under one open of the file, so a
    /// period is claimed at most once.
    ///
    /// Returns `None` for an unregistered hook; it is not re-registered.
    pub fn claim_due(&self, hook: &str, now: DateTime<Utc>) -> Result<Option<Schedule>> {
        self.with_db(|db| {
            let Some(schedule) = read_json::<Schedule>(db, SCHEDULES, hook)? else {
                return Ok(None);
            };
            if !schedule.is_due(now) {
                return Ok(None);
            }
            let mut advanced = schedule.clone();
            advanced.advance(now);
            write_json(db, SCHEDULES, hook, &advanced)?;
            Ok(Some(schedule))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::open_tmp;

    const HOOK: &str = "spotlight_daily_rotation";

    #[test]
    fn activate_registers_immediately_due_schedule() {
        let (_dir, store) = open_tmp();
        let now = Utc::now();
        assert!(store.activate(HOOK, Recurrence::Daily, now).unwrap());

        let s = store.schedule(HOOK).unwrap().unwrap();
        assert!(s.is_due(now));
        assert_eq!(s.last_run_at, None);
        assert_eq!(store.claim_due(HOOK, now).unwrap().unwrap().hook, HOOK);
    }

    #[test]
    fn activate_twice_yields_one_registration() {
        let (_dir, store) = open_tmp();
        let now = Utc::now();
        assert!(store.activate(HOOK, Recurrence::Daily, now).unwrap());
        assert!(!store
            .activate(HOOK, Recurrence::Daily, now + Duration::hours(1))
            .unwrap());

        let all = store.schedules().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].next_run_at, now);
    }

    #[test]
    fn deactivate_removes_registration() {
        let (_dir, store) = open_tmp();
        let now = Utc::now();
        store.activate(HOOK, Recurrence::Daily, now).unwrap();
        assert!(store.deactivate(HOOK).unwrap());
        assert!(store
            .claim_due(HOOK, now + Duration::days(2))
            .unwrap()
            .is_none());
        assert!(!store.deactivate(HOOK).unwrap());
    }

    #[test]
    fn reactivation_after_deactivation_creates_single_registration() {
        let (_dir, store) = open_tmp();
        let now = Utc::now();
        store.activate(HOOK, Recurrence::Daily, now).unwrap();
        store.deactivate(HOOK).unwrap();
        assert!(store.activate(HOOK, Recurrence::Daily, now).unwrap());
        assert!(!store.activate(HOOK, Recurrence::Daily, now).unwrap());
        assert_eq!(store.schedules().unwrap().len(), 1);
    }

    #[test]
    fn claim_due_advances_once_per_period() {
        let (_dir, store) = open_tmp();
        let start = Utc::now();
        store.activate(HOOK, Recurrence::Daily, start).unwrap();

        let claimed = store.claim_due(HOOK, start).unwrap().unwrap();
        assert_eq!(claimed.next_run_at, start);
        assert!(store.claim_due(HOOK, start).unwrap().is_none());
        assert!(store
            .claim_due(HOOK, start + Duration::hours(23))
            .unwrap()
            .is_none());

        let s = store.schedule(HOOK).unwrap().unwrap();
        assert_eq!(s.next_run_at, start + Duration::days(1));
        assert_eq!(s.last_run_at, Some(start));
        assert!(store
            .claim_due(HOOK, start + Duration::days(1))
            .unwrap()
            .is_some());
    }

    #[test]
    fn claim_due_skips_missed_days() {
        let (_dir, store) = open_tmp();
        let start = Utc::now();
        store.activate(HOOK, Recurrence::Daily, start).unwrap();

        let late = start + Duration::days(3) + Duration::hours(5);
        store.claim_due(HOOK, late).unwrap().unwrap();
        let s = store.schedule(HOOK).unwrap().unwrap();
        assert_eq!(s.next_run_at, start + Duration::days(4));
        assert!(s.next_run_at > late);
        assert_eq!(s.last_run_at, Some(late));
    }

    #[test]
    fn claim_due_on_unregistered_hook_does_not_register() {
        let (_dir, store) = open_tmp();
        assert!(store.claim_due(HOOK, Utc::now()).unwrap().is_none());
        assert!(store.schedules().unwrap().is_empty());
    }

    #[test]
    fn hourly_recurrence_claims_every_hour() {
        let (_dir, store) = open_tmp();
        let start = Utc::now();
        store.activate(HOOK, Recurrence::Hourly, start).unwrap();
        store.claim_due(HOOK, start).unwrap().unwrap();
        assert!(store
            .claim_due(HOOK, start + Duration::minutes(59))
            .unwrap()
            .is_none());
        assert!(store
            .claim_due(HOOK, start + Duration::hours(1))
            .unwrap()
            .is_some());
    }

    #[test]
    fn recurrence_periods() {
        assert_eq!(Recurrence::default(), Recurrence::Daily);
        assert_eq!(Recurrence::TwiceDaily.period(), Duration::hours(12));
        assert_eq!(Recurrence::Weekly.period(), Duration::days(7));
    }
}
