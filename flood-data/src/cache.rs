//! Time-boxed read-through cache for the region dataset.
//!
//! The cache holds one immutable snapshot behind an `Arc`. A refresh swaps
//! in a whole new snapshot; readers holding the old `Arc` keep reading it.
//! The clock is injected so expiry can be tested without sleeping.
//!
//! The TTL only matters to a caller that keeps the cache across requests.
//! A one-shot caller such as the CLI builds a fresh cache per run, so it
//! always loads once and uses the cache only for the degrade-to-empty
//! fallback of [`RegionFeedCache::observations_or_empty`].

use chrono::{DateTime, TimeDelta, Utc};
use flood_core::region::RegionObservation;
use flood_core::FloodError;
use log::{info, warn};
use std::fmt::Display;
use std::sync::Arc;

/// Default lifetime of a region dataset snapshot.
pub const DEFAULT_TTL_HOURS: i64 = 6;

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug)]
struct Snapshot<T> {
    value: Arc<T>,
    fetched_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct TtlCache<T, C: Clock = SystemClock> {
    ttl: TimeDelta,
    clock: C,
    snapshot: Option<Snapshot<T>>,
}

/// Cache of the reservoir feed snapshot.
pub type RegionFeedCache<C = SystemClock> = TtlCache<Vec<RegionObservation>, C>;

impl<T> TtlCache<T, SystemClock> {
    pub fn new(ttl: TimeDelta) -> Self {
        TtlCache::with_clock(ttl, SystemClock)
    }
}

impl<T> Default for TtlCache<T, SystemClock> {
    fn default() -> Self {
        TtlCache::new(TimeDelta::hours(DEFAULT_TTL_HOURS))
    }
}

impl<T, C: Clock> TtlCache<T, C> {
    pub fn with_clock(ttl: TimeDelta, clock: C) -> Self {
        TtlCache {
            ttl,
            clock,
            snapshot: None,
        }
    }

    pub fn ttl(&self) -> TimeDelta {
        self.ttl
    }

    /// True when a snapshot exists and is younger than the TTL.
    pub fn is_fresh(&self) -> bool {
        self.snapshot
            .as_ref()
            .is_some_and(|s| self.clock.now() - s.fetched_at < self.ttl)
    }

    /// The snapshot if it is still fresh.
    pub fn peek(&self) -> Option<Arc<T>> {
        if self.is_fresh() {
            self.snapshot.as_ref().map(|s| Arc::clone(&s.value))
        } else {
            None
        }
    }

    /// Replace the snapshot wholesale and restart its TTL.
    pub fn replace(&mut self, value: T) -> Arc<T> {
        let value = Arc::new(value);
        self.snapshot = Some(Snapshot {
            value: Arc::clone(&value),
            fetched_at: self.clock.now(),
        });
        value
    }

    pub fn invalidate(&mut self) {
        self.snapshot = None;
    }

    /// Return the fresh snapshot, or load and store a new one.
    ///
    /// If loading fails the stale snapshot is served when there is one;
    /// otherwise the failure is reported as `UpstreamUnavailable`.
    pub fn get_or_refresh<F, E>(&mut self, load: F) -> Result<Arc<T>, FloodError>
    where
        F: FnOnce() -> Result<T, E>,
        E: Display,
    {
        if let Some(value) = self.peek() {
            return Ok(value);
        }
        match load() {
            Ok(value) => {
                info!("cache refreshed");
                Ok(self.replace(value))
            }
            Err(e) => match self.snapshot.as_ref() {
                Some(stale) => {
                    warn!(
                        "refresh failed ({}), serving snapshot from {}",
                        e, stale.fetched_at
                    );
                    Ok(Arc::clone(&stale.value))
                }
                None => Err(FloodError::UpstreamUnavailable(e.to_string())),
            },
        }
    }
}

impl<C: Clock> RegionFeedCache<C> {
    /// Region snapshot for scoring. An unavailable feed with nothing cached
    /// degrades to an empty snapshot, which scores every region `Low`.
    pub fn observations_or_empty<F, E>(&mut self, load: F) -> Arc<Vec<RegionObservation>>
    where
        F: FnOnce() -> Result<Vec<RegionObservation>, E>,
        E: Display,
    {
        self.get_or_refresh(load).unwrap_or_else(|e| {
            warn!("{e}; continuing without region observations");
            Arc::new(Vec::new())
        })
    }
}
