use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Duration, Months, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{EcoError, EcoResult};
use crate::model::challenge::{Challenge, ChallengeCategory};
use crate::model::footprint::{ActivityInput, CategoryBreakdown, FootprintRecord};
use crate::model::profile::{BadgePolicy, Profile, ProfileIdentity};
use crate::repository::{EcoRepository, KeyValueStore};
use crate::service::seed::SampleData;
use crate::time::{same_local_day, Clock};

#[derive(Debug, Clone)]
pub struct AggregatorOptions {
    pub username: String,
    pub badge_policy: BadgePolicy,
}

impl Default for AggregatorOptions {
    fn default() -> Self {
        Self {
            username: "Eco Master".to_string(),
            badge_policy: BadgePolicy::default(),
        }
    }
}

/// Everything the engine owns, guarded as one unit.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineState {
    pub history: Vec<FootprintRecord>,
    pub challenges: Vec<Challenge>,
    pub profile: Profile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeedOutcome {
    pub footprints: usize,
    pub challenges: usize,
}

impl SeedOutcome {
    pub fn is_empty(&self) -> bool {
        self.footprints == 0 && self.challenges == 0
    }
}

/// Owns the footprint history, the challenge catalog and the derived profile.
///
/// History mutation, profile recomputation and the write-through to storage
/// all happen under a single write guard, so a reader never observes a
/// history newer than its profile. When storage rejects a write the
/// in-memory state is kept and the failure is returned as
/// [`EcoError::Persistence`].
pub struct FootprintAggregator<S: KeyValueStore, C: Clock> {
    repo: EcoRepository<S>,
    clock: C,
    policy: BadgePolicy,
    state: RwLock<EngineState>,
}

impl<S: KeyValueStore, C: Clock> FootprintAggregator<S, C> {
    /// Loads whatever is stored and derives a fresh profile from it.
    /// A stored profile only contributes its identity, join date and the
    /// earned dates of badges that still apply.
    pub fn open(repo: EcoRepository<S>, clock: C, options: AggregatorOptions) -> EcoResult<Self> {
        let history = repo
            .load_footprints()
            .map_err(EcoError::Persistence)?
            .unwrap_or_default();
        let challenges = repo
            .load_challenges()
            .map_err(EcoError::Persistence)?
            .unwrap_or_default();
        let stored = repo.load_profile().map_err(EcoError::Persistence)?;
        let identity = stored
            .as_ref()
            .map(Profile::identity)
            .unwrap_or_else(|| ProfileIdentity::new(options.username.clone(), clock.now()));

        let mut profile = Profile::derive(&history, &challenges, &identity, &options.badge_policy, clock.now());
        if let Some(stored) = &stored {
            profile.carry_badge_dates(&stored.badges);
        }
        debug!(
            records = history.len(),
            challenges = challenges.len(),
            "opened footprint aggregator"
        );

        Ok(Self {
            repo,
            clock,
            policy: options.badge_policy,
            state: RwLock::new(EngineState {
                history,
                challenges,
                profile,
            }),
        })
    }

    fn read(&self) -> RwLockReadGuard<'_, EngineState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, EngineState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn refresh(&self, state: &mut EngineState) {
        let identity = state.profile.identity();
        let mut profile = Profile::derive(
            &state.history,
            &state.challenges,
            &identity,
            &self.policy,
            self.clock.now(),
        );
        profile.carry_badge_dates(&state.profile.badges);
        state.profile = profile;
        debug!(
            points = state.profile.total_points,
            level = state.profile.level,
            badges = state.profile.badges.len(),
            "recomputed profile"
        );
    }

    fn persist(&self, what: &'static str, result: anyhow::Result<()>) -> EcoResult<()> {
        result.map_err(|err| {
            warn!(error = %err, what, "write-through to storage failed");
            EcoError::Persistence(err)
        })
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn snapshot(&self) -> EngineState {
        self.read().clone()
    }

    pub fn profile(&self) -> Profile {
        self.read().profile.clone()
    }

    pub fn history(&self) -> Vec<FootprintRecord> {
        self.read().history.clone()
    }

    pub fn challenges(&self) -> Vec<Challenge> {
        self.read().challenges.clone()
    }

    pub fn challenge(&self, id: Uuid) -> Option<Challenge> {
        self.read().challenges.iter().find(|c| c.id == id).cloned()
    }

    /// All challenges, or only those in `category`, in catalog order.
    pub fn challenges_in_category(&self, category: Option<ChallengeCategory>) -> Vec<Challenge> {
        self.read()
            .challenges
            .iter()
            .filter(|c| category.map_or(true, |cat| c.category == cat))
            .cloned()
            .collect()
    }

    /// Appends `record` (same-day duplicates are kept) and recomputes the profile.
    pub fn add_record(&self, record: FootprintRecord) -> EcoResult<()> {
        let mut state = self.write();
        state.history.push(record);
        self.refresh(&mut state);

        let saved = self
            .repo
            .save_footprints(&state.history)
            .and_then(|_| self.repo.save_profile(&state.profile));
        self.persist("footprints", saved)
    }

    /// Validates `input` and appends the resulting record. Nothing is
    /// appended when any quantity is rejected. On `EcoError::Persistence`
    /// the record is still appended and can be read back from `history()`.
    pub fn add_activity(&self, input: ActivityInput, date: DateTime<Utc>) -> EcoResult<FootprintRecord> {
        let record = input.into_record(date)?;
        self.add_record(record.clone())?;
        Ok(record)
    }

    pub fn recompute_profile(&self) -> EcoResult<Profile> {
        let mut state = self.write();
        self.refresh(&mut state);
        let saved = self.repo.save_profile(&state.profile);
        let profile = state.profile.clone();
        self.persist("profile", saved)?;
        Ok(profile)
    }

    /// First record logged on the same local day as `date`, or a zero record.
    pub fn record_for_date(&self, date: DateTime<Utc>) -> FootprintRecord {
        self.read()
            .history
            .iter()
            .find(|r| same_local_day(r.date(), date))
            .cloned()
            .unwrap_or_else(|| FootprintRecord::empty(date))
    }

    pub fn today_record(&self) -> FootprintRecord {
        self.record_for_date(self.clock.now())
    }

    /// Records dated within `[start, end]`, ascending by date. Records with
    /// equal dates keep their insertion order.
    pub fn records_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<FootprintRecord> {
        let mut records: Vec<_> = self
            .read()
            .history
            .iter()
            .filter(|r| r.date() >= start && r.date() <= end)
            .cloned()
            .collect();
        records.sort_by_key(|r| r.date());
        records
    }

    /// Trailing window of `days` ending now, not aligned to calendar weeks.
    /// A window reaching past the earliest representable date covers the
    /// whole history; a negative one is empty.
    pub fn records_in_window(&self, days: i64) -> Vec<FootprintRecord> {
        let now = self.clock.now();
        let start = Duration::try_days(days).and_then(|length| now.checked_sub_signed(length));
        match start {
            Some(start) => self.records_between(start, now),
            None if days > 0 => self.records_between(DateTime::<Utc>::MIN_UTC, now),
            None => Vec::new(),
        }
    }

    pub fn weekly_data(&self) -> Vec<FootprintRecord> {
        self.records_in_window(7)
    }

    pub fn monthly_data(&self) -> Vec<FootprintRecord> {
        let now = self.clock.now();
        let start = now
            .checked_sub_months(Months::new(1))
            .unwrap_or_else(|| now - Duration::days(30));
        self.records_between(start, now)
    }

    pub fn today_breakdown(&self) -> CategoryBreakdown {
        CategoryBreakdown::from_records([&self.today_record()])
    }

    pub fn start_challenge(&self, id: Uuid) -> EcoResult<Challenge> {
        let now = self.clock.now();
        let mut state = self.write();
        let challenge = state
            .challenges
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(EcoError::ChallengeNotFound(id))?;

        if challenge.start(now)? {
            info!(title = %challenge.title, days = challenge.duration_days, "challenge started");
        } else {
            debug!(title = %challenge.title, "challenge already completed; start ignored");
        }
        let updated = challenge.clone();

        let saved = self.repo.save_challenges(&state.challenges);
        self.persist("challenges", saved)?;
        Ok(updated)
    }

    pub fn complete_challenge(&self, id: Uuid) -> EcoResult<Challenge> {
        let mut state = self.write();
        let challenge = state
            .challenges
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(EcoError::ChallengeNotFound(id))?;

        challenge.complete();
        info!(title = %challenge.title, points = challenge.points, "challenge completed");
        let updated = challenge.clone();
        self.refresh(&mut state);

        let saved = self
            .repo
            .save_challenges(&state.challenges)
            .and_then(|_| self.repo.save_profile(&state.profile));
        self.persist("challenges", saved)?;
        Ok(updated)
    }

    /// First-run hook: fills in whichever of history and catalog is empty.
    pub fn seed_if_empty(&self, sample: &SampleData) -> EcoResult<SeedOutcome> {
        let mut state = self.write();
        let mut outcome = SeedOutcome::default();

        if state.history.is_empty() {
            state.history = sample.footprints.clone();
            outcome.footprints = state.history.len();
        }
        if state.challenges.is_empty() {
            state.challenges = sample.challenges.clone();
            outcome.challenges = state.challenges.len();
        }
        if outcome.is_empty() {
            return Ok(outcome);
        }

        info!(
            footprints = outcome.footprints,
            challenges = outcome.challenges,
            "seeded sample data"
        );
        self.refresh(&mut state);

        let mut saved = Ok(());
        if outcome.footprints > 0 {
            saved = self.repo.save_footprints(&state.history);
        }
        if outcome.challenges > 0 {
            saved = saved.and_then(|_| self.repo.save_challenges(&state.challenges));
        }
        saved = saved.and_then(|_| self.repo.save_profile(&state.profile));
        self.persist("seed", saved)?;
        Ok(outcome)
    }
}
