//! Last-request-wins bookkeeping for concurrent fetches.
//!
//! A periodic refresh and a manual search may be in flight at the same time
//! and complete in any order. Each request is tagged with a [`Generation`]
//! when issued; a result is applied only if no newer request was issued
//! since. While a lookup the user asked for is in flight, no refresh is
//! issued, so a refresh of the old place can never supersede it.

use crate::{error::WeatherError, model::WeatherSnapshot};

/// Tag of one issued request. Later requests compare greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    pub fn value(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
pub struct RequestGenerations {
    issued: u64,
}

impl RequestGenerations {
    pub fn issue(&mut self) -> Generation {
        self.issued += 1;
        Generation(self.issued)
    }

    pub fn latest(&self) -> Option<Generation> {
        (self.issued > 0).then_some(Generation(self.issued))
    }

    pub fn is_latest(&self, generation: Generation) -> bool {
        self.latest() == Some(generation)
    }
}

/// How a completed fetch was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    Failed,
    Stale,
}

/// Newest displayed snapshot plus the request tracker guarding it.
#[derive(Debug, Default)]
pub struct LatestSnapshot {
    generations: RequestGenerations,
    current: Option<WeatherSnapshot>,
    last_error: Option<WeatherError>,
    pending_lookup: Option<Generation>,
}

impl LatestSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tag a lookup the user asked for (initial place or a new search).
    pub fn begin(&mut self) -> Generation {
        let generation = self.generations.issue();
        self.pending_lookup = Some(generation);
        generation
    }

    /// Tag a periodic refresh, or `None` while a lookup is still pending.
    pub fn begin_refresh(&mut self) -> Option<Generation> {
        if let Some(pending) = self.pending_lookup {
            tracing::debug!(pending = pending.value(), "lookup in flight, skipping refresh");
            return None;
        }
        Some(self.generations.issue())
    }

    pub fn lookup_pending(&self) -> bool {
        self.pending_lookup.is_some()
    }

    pub fn current(&self) -> Option<&WeatherSnapshot> {
        self.current.as_ref()
    }

    pub fn last_error(&self) -> Option<&WeatherError> {
        self.last_error.as_ref()
    }

    /// Apply a completed request unless a newer one was issued meanwhile.
    ///
    /// A refresh result (`is_refresh`) is merged over the shown snapshot so
    /// place labels survive; a fresh lookup replaces it. Failures keep the
    /// shown snapshot and record the error.
    pub fn complete(
        &mut self,
        generation: Generation,
        result: Result<WeatherSnapshot, WeatherError>,
        is_refresh: bool,
    ) -> Outcome {
        if self.pending_lookup == Some(generation) {
            self.pending_lookup = None;
        }

        if !self.generations.is_latest(generation) {
            tracing::debug!(
                generation = generation.value(),
                latest = self.generations.latest().map(Generation::value),
                "dropping stale weather result"
            );
            return Outcome::Stale;
        }

        match result {
            Ok(fresh) => {
                let next = match (&self.current, is_refresh) {
                    (Some(previous), true) => previous.refreshed_with(fresh),
                    _ => fresh,
                };
                self.current = Some(next);
                self.last_error = None;
                Outcome::Applied
            }
            Err(err) => {
                self.last_error = Some(err);
                Outcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::{paris, snapshot};

    #[test]
    fn generations_increase() {
        let mut gens = RequestGenerations::default();
        assert_eq!(gens.latest(), None);

        let a = gens.issue();
        let b = gens.issue();
        assert!(b > a);
        assert!(gens.is_latest(b));
        assert!(!gens.is_latest(a));
    }

    #[test]
    fn stale_result_does_not_overwrite_newer_request() {
        let mut latest = LatestSnapshot::new();
        let first = latest.begin();
        latest.complete(first, Ok(snapshot()), false);

        let refresh = latest.begin_refresh().unwrap();
        let search = latest.begin();

        let searched = snapshot().with_place(&paris());
        assert_eq!(latest.complete(search, Ok(searched), false), Outcome::Applied);

        let mut old = snapshot();
        old.temperature = -40.0;
        assert_eq!(latest.complete(refresh, Ok(old), true), Outcome::Stale);

        let shown = latest.current().unwrap();
        assert_eq!(shown.city_name.as_deref(), Some("Paris"));
        assert_eq!(shown.temperature, 21.4);
    }

    #[test]
    fn refresh_merges_place_labels() {
        let mut latest = LatestSnapshot::new();

        let first = latest.begin();
        latest.complete(first, Ok(snapshot().with_place(&paris())), false);

        let refresh = latest.begin_refresh().unwrap();
        let mut fresh = snapshot();
        fresh.temperature = 9.9;
        assert_eq!(latest.complete(refresh, Ok(fresh), true), Outcome::Applied);

        let shown = latest.current().unwrap();
        assert_eq!(shown.temperature, 9.9);
        assert_eq!(shown.city_name.as_deref(), Some("Paris"));
    }

    #[test]
    fn refresh_waits_for_pending_search() {
        let mut latest = LatestSnapshot::new();
        let first = latest.begin();
        latest.complete(first, Ok(snapshot()), false);

        let search = latest.begin();
        assert!(latest.lookup_pending());
        assert_eq!(latest.begin_refresh(), None);

        let searched = snapshot().with_place(&paris());
        assert_eq!(latest.complete(search, Ok(searched), false), Outcome::Applied);
        assert_eq!(latest.current().unwrap().city_name.as_deref(), Some("Paris"));

        assert!(!latest.lookup_pending());
        assert!(latest.begin_refresh().is_some());
    }

    #[test]
    fn superseded_search_keeps_newer_one_pending() {
        let mut latest = LatestSnapshot::new();

        let older = latest.begin();
        let newer = latest.begin();
        assert_eq!(latest.complete(older, Ok(snapshot()), false), Outcome::Stale);
        assert_eq!(latest.begin_refresh(), None);

        let failed = latest.complete(newer, Err(WeatherError::CityNotFound("Xyz".into())), false);
        assert_eq!(failed, Outcome::Failed);
        assert!(latest.begin_refresh().is_some());
    }

    #[test]
    fn failure_keeps_shown_snapshot() {
        let mut latest = LatestSnapshot::new();

        let first = latest.begin();
        latest.complete(first, Ok(snapshot()), false);

        let second = latest.begin();
        let outcome = latest.complete(second, Err(WeatherError::CityNotFound("Xyz".into())), false);

        assert_eq!(outcome, Outcome::Failed);
        assert!(latest.current().is_some());
        assert!(latest.last_error().is_some());
    }
}
