//! Query cache and invalidation coordinator.
//!
//! Maps a [`QueryKey`] to the most recent [`NotesPage`] fetched for it and
//! decides when the transport has to be called again.
//!
//! # Freshness
//!
//! The cache keeps an invalidation *epoch*. An entry is fresh while it was
//! fetched in the current epoch (and, if `stale_after` is set, while it is
//! younger than that). [`QueryCache::invalidate_all`] bumps the epoch, which
//! makes every entry stale at once without touching them.
//!
//! # In-flight fetches
//!
//! Every fetch is represented by a [`FetchTicket`]. At most one ticket per key
//! is authoritative. Completing a ticket that is no longer authoritative is a
//! no-op ([`Completion::Superseded`]), so a slow response can never overwrite
//! newer state. A ticket issued before an invalidation stays authoritative
//! until a newer fetch for its key is begun, but its result is stored as
//! stale.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use log::debug;

use super::QueryKey;
use crate::domain::NotesPage;
use crate::transport::{ListQuery, TransportError, TransportResult};

/// Handle of one issued list fetch.
#[derive(Debug, PartialEq, Eq)]
pub struct FetchTicket {
    id: u64,
    epoch: u64,
    key: QueryKey,
}

impl FetchTicket {
    /// Returns the key this fetch was issued for.
    pub fn key(&self) -> &QueryKey {
        &self.key
    }

    /// Returns the transport query to run for this ticket.
    pub fn query(&self) -> ListQuery {
        ListQuery::from(&self.key)
    }
}

/// Result of looking a key up.
#[derive(Debug, PartialEq)]
pub enum Lookup<'a> {
    /// Cached and usable without refetching.
    Fresh(&'a NotesPage),
    /// Cached but invalidated or expired; show it, but refetch.
    Stale(&'a NotesPage),
    /// Nothing cached yet.
    Missing,
}

impl<'a> Lookup<'a> {
    /// Returns the cached page regardless of freshness.
    pub fn page(&self) -> Option<&'a NotesPage> {
        match *self {
            Lookup::Fresh(page) | Lookup::Stale(page) => Some(page),
            Lookup::Missing => None,
        }
    }
}

/// What [`QueryCache::complete`] did with a result.
#[derive(Debug)]
pub enum Completion {
    /// The page was stored for its key.
    Stored,
    /// The fetch failed; prior data for the key is kept.
    Failed(TransportError),
    /// A newer fetch for the key was issued meanwhile; the result was dropped.
    Superseded,
}

#[derive(Debug)]
struct CacheEntry {
    page: Option<NotesPage>,
    fetched_epoch: u64,
    fetched_at: Instant,
    error: Option<String>,
    error_epoch: u64,
}

#[derive(Debug, Clone, Copy)]
struct InFlight {
    id: u64,
    epoch: u64,
}

/// Process-wide store of list results.
///
/// Created once at startup and owned by the session; only
/// [`QueryCache::reset`] empties it.
#[derive(Debug, Default)]
pub struct QueryCache {
    entries: HashMap<QueryKey, CacheEntry>,
    in_flight: HashMap<QueryKey, InFlight>,
    epoch: u64,
    next_ticket: u64,
    invalidations: u64,
    stale_after: Option<Duration>,
}

impl QueryCache {
    /// Creates a cache whose entries stay fresh until invalidated.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a cache whose entries also expire after `stale_after`.
    pub fn with_stale_after(stale_after: Option<Duration>) -> Self {
        Self {
            stale_after,
            ..Self::default()
        }
    }

    /// Looks up the cached page for `key`.
    pub fn lookup(&self, key: &QueryKey) -> Lookup<'_> {
        match self.entries.get(key) {
            Some(CacheEntry {
                page: Some(page), ..
            }) => {
                if self.is_fresh(key) {
                    Lookup::Fresh(page)
                } else {
                    Lookup::Stale(page)
                }
            }
            _ => Lookup::Missing,
        }
    }

    fn is_fresh(&self, key: &QueryKey) -> bool {
        let Some(entry) = self.entries.get(key) else {
            return false;
        };
        if entry.page.is_none() || entry.fetched_epoch != self.epoch {
            return false;
        }
        match self.stale_after {
            Some(ttl) => entry.fetched_at.elapsed() < ttl,
            None => true,
        }
    }

    /// Returns the message of the last failed fetch for `key`, if the failure
    /// happened after the last successful one.
    pub fn last_error(&self, key: &QueryKey) -> Option<&str> {
        self.entries.get(key).and_then(|e| e.error.as_deref())
    }

    /// Returns true if reading `key` should go to the transport.
    ///
    /// A key whose last fetch failed in the current epoch is not refetched
    /// automatically; see [`QueryCache::clear_error`].
    pub fn needs_fetch(&self, key: &QueryKey) -> bool {
        if self.is_fresh(key) {
            return false;
        }
        match self.entries.get(key) {
            Some(entry) if entry.error.is_some() => entry.error_epoch != self.epoch,
            _ => true,
        }
    }

    /// Returns true if an authoritative fetch for `key` is outstanding.
    pub fn is_in_flight(&self, key: &QueryKey) -> bool {
        self.in_flight
            .get(key)
            .is_some_and(|f| f.epoch == self.epoch)
    }

    /// Issues a fetch for `key`.
    ///
    /// Returns `None` when a fetch for the same key is already in flight in
    /// the current epoch. An older in-flight fetch is superseded.
    pub fn begin_fetch(&mut self, key: QueryKey) -> Option<FetchTicket> {
        if self.is_in_flight(&key) {
            debug!("fetch for {} already in flight", key);
            return None;
        }
        self.next_ticket += 1;
        let flight = InFlight {
            id: self.next_ticket,
            epoch: self.epoch,
        };
        if self.in_flight.insert(key.clone(), flight).is_some() {
            debug!("superseding pre-invalidation fetch for {}", key);
        }
        debug!("fetch #{} issued for {}", flight.id, key);
        Some(FetchTicket {
            id: flight.id,
            epoch: flight.epoch,
            key,
        })
    }

    /// Records the outcome of a fetch.
    ///
    /// The cache may have been invalidated, reset or refetched since the
    /// ticket was issued; only the authoritative ticket for the key writes.
    pub fn complete(&mut self, ticket: FetchTicket, result: TransportResult<NotesPage>) -> Completion {
        match self.in_flight.get(&ticket.key) {
            Some(flight) if flight.id == ticket.id => {
                self.in_flight.remove(&ticket.key);
            }
            _ => {
                debug!("discarding superseded fetch #{} for {}", ticket.id, ticket.key);
                return Completion::Superseded;
            }
        }

        match result {
            Ok(page) => {
                self.entries.insert(
                    ticket.key,
                    CacheEntry {
                        page: Some(page),
                        fetched_epoch: ticket.epoch,
                        fetched_at: Instant::now(),
                        error: None,
                        error_epoch: 0,
                    },
                );
                Completion::Stored
            }
            Err(err) => {
                let entry = self.entries.entry(ticket.key).or_insert_with(|| CacheEntry {
                    page: None,
                    fetched_epoch: 0,
                    fetched_at: Instant::now(),
                    error: None,
                    error_epoch: 0,
                });
                entry.error = Some(err.to_string());
                entry.error_epoch = ticket.epoch;
                Completion::Failed(err)
            }
        }
    }

    /// Forgets the recorded failure for `key` so the next read refetches.
    pub fn clear_error(&mut self, key: &QueryKey) {
        if let Some(entry) = self.entries.get_mut(key) {
            entry.error = None;
        }
    }

    /// Marks every cached list result stale.
    ///
    /// Returns the number of entries affected.
    pub fn invalidate_all(&mut self) -> usize {
        self.epoch += 1;
        self.invalidations += 1;
        let affected = self.entries.len();
        debug!("invalidated {} cached list result(s)", affected);
        affected
    }

    /// Returns how many times [`QueryCache::invalidate_all`] has run.
    pub fn invalidations(&self) -> u64 {
        self.invalidations
    }

    /// Drops every entry and in-flight ticket.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.in_flight.clear();
        self.epoch += 1;
    }

    /// Returns the number of cached keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::fake::RecordingTransport;
    use crate::transport::NoteTransport;
    use pretty_assertions::assert_eq;

    fn key(term: &str, page: u32) -> QueryKey {
        QueryKey::new(term, page, 12)
    }

    fn page_of(total: u32) -> NotesPage {
        NotesPage::new(Vec::new(), 1, total, total * 12)
    }

    /// Fetches through the cache the way a view does: only when needed.
    fn read(cache: &mut QueryCache, transport: &RecordingTransport, key: QueryKey) -> NotesPage {
        if cache.needs_fetch(&key) {
            if let Some(ticket) = cache.begin_fetch(key.clone()) {
                let result = transport.list_notes(&ticket.query());
                cache.complete(ticket, result);
            }
        }
        cache.lookup(&key).page().cloned().unwrap()
    }

    // ===========================================
    // Phase 1: Hits and misses
    // ===========================================

    #[test]
    fn empty_cache_misses() {
        let cache = QueryCache::new();
        assert_eq!(cache.lookup(&key("", 1)), Lookup::Missing);
        assert!(cache.needs_fetch(&key("", 1)));
        assert!(cache.is_empty());
    }

    #[test]
    fn stored_page_is_fresh() {
        let mut cache = QueryCache::new();
        let ticket = cache.begin_fetch(key("", 1)).unwrap();
        assert!(matches!(cache.complete(ticket, Ok(page_of(2))), Completion::Stored));
        assert_eq!(cache.lookup(&key("", 1)), Lookup::Fresh(&page_of(2)));
        assert!(!cache.needs_fetch(&key("", 1)));
    }

    #[test]
    fn identical_reads_hit_the_transport_once() {
        let transport = RecordingTransport::with_notes(3);
        let mut cache = QueryCache::new();

        let first = read(&mut cache, &transport, key("", 1));
        let second = read(&mut cache, &transport, key("", 1));

        assert_eq!(first, second);
        assert_eq!(transport.list_calls().len(), 1);
    }

    #[test]
    fn different_keys_fetch_separately() {
        let transport = RecordingTransport::with_notes(30);
        let mut cache = QueryCache::new();

        read(&mut cache, &transport, key("", 1));
        read(&mut cache, &transport, key("", 2));
        read(&mut cache, &transport, key("Note 1", 1));

        assert_eq!(transport.list_calls().len(), 3);
        assert_eq!(cache.len(), 3);
    }

    // ===========================================
    // Phase 2: De-duplication & stale completions
    // ===========================================

    #[test]
    fn concurrent_identical_fetches_are_deduplicated() {
        let mut cache = QueryCache::new();
        let first = cache.begin_fetch(key("", 1));
        let second = cache.begin_fetch(key("", 1));
        assert!(first.is_some());
        assert!(second.is_none());
        assert!(cache.is_in_flight(&key("", 1)));
    }

    #[test]
    fn fetch_issued_before_invalidation_is_superseded() {
        let mut cache = QueryCache::new();
        let old = cache.begin_fetch(key("", 1)).unwrap();
        cache.invalidate_all();
        let new = cache.begin_fetch(key("", 1)).unwrap();

        assert!(matches!(cache.complete(old, Ok(page_of(1))), Completion::Superseded));
        assert_eq!(cache.lookup(&key("", 1)), Lookup::Missing);

        assert!(matches!(cache.complete(new, Ok(page_of(2))), Completion::Stored));
        assert_eq!(cache.lookup(&key("", 1)), Lookup::Fresh(&page_of(2)));
    }

    #[test]
    fn pre_invalidation_result_is_stored_stale() {
        let mut cache = QueryCache::new();
        let ticket = cache.begin_fetch(key("", 1)).unwrap();
        cache.invalidate_all();

        assert!(matches!(cache.complete(ticket, Ok(page_of(1))), Completion::Stored));
        assert_eq!(cache.lookup(&key("", 1)), Lookup::Stale(&page_of(1)));
        assert!(cache.needs_fetch(&key("", 1)));
    }

    #[test]
    fn pre_invalidation_failure_does_not_block_refetch() {
        let mut cache = QueryCache::new();
        let ticket = cache.begin_fetch(key("", 1)).unwrap();
        cache.invalidate_all();

        let completion = cache.complete(
            ticket,
            Err(TransportError::Status {
                status: 503,
                message: "unavailable".to_string(),
            }),
        );

        assert!(matches!(completion, Completion::Failed(_)));
        assert_eq!(cache.last_error(&key("", 1)), Some("server returned 503: unavailable"));
        assert!(cache.needs_fetch(&key("", 1)));
    }

    #[test]
    fn completion_after_reset_is_discarded() {
        let mut cache = QueryCache::new();
        let ticket = cache.begin_fetch(key("", 1)).unwrap();
        cache.reset();
        assert!(matches!(cache.complete(ticket, Ok(page_of(1))), Completion::Superseded));
        assert!(cache.is_empty());
    }

    // ===========================================
    // Phase 3: Invalidation
    // ===========================================

    #[test]
    fn invalidation_makes_every_entry_stale() {
        let transport = RecordingTransport::with_notes(30);
        let mut cache = QueryCache::new();
        read(&mut cache, &transport, key("", 1));
        read(&mut cache, &transport, key("", 2));

        assert_eq!(cache.invalidate_all(), 2);

        assert!(matches!(cache.lookup(&key("", 1)), Lookup::Stale(_)));
        assert!(matches!(cache.lookup(&key("", 2)), Lookup::Stale(_)));
        assert_eq!(cache.invalidations(), 1);
    }

    #[test]
    fn next_read_after_invalidation_refetches() {
        let transport = RecordingTransport::with_notes(3);
        let mut cache = QueryCache::new();
        read(&mut cache, &transport, key("", 1));
        cache.invalidate_all();
        read(&mut cache, &transport, key("", 1));
        read(&mut cache, &transport, key("", 1));
        assert_eq!(transport.list_calls().len(), 2);
    }

    #[test]
    fn zero_stale_after_always_refetches() {
        let transport = RecordingTransport::with_notes(3);
        let mut cache = QueryCache::with_stale_after(Some(Duration::ZERO));
        read(&mut cache, &transport, key("", 1));
        read(&mut cache, &transport, key("", 1));
        assert_eq!(transport.list_calls().len(), 2);
    }

    // ===========================================
    // Phase 4: Failures
    // ===========================================

    #[test]
    fn failure_keeps_prior_data_and_records_error() {
        let mut cache = QueryCache::new();
        let ticket = cache.begin_fetch(key("", 1)).unwrap();
        cache.complete(ticket, Ok(page_of(1)));
        cache.invalidate_all();

        let ticket = cache.begin_fetch(key("", 1)).unwrap();
        let completion = cache.complete(
            ticket,
            Err(TransportError::Status {
                status: 500,
                message: "boom".to_string(),
            }),
        );

        assert!(matches!(completion, Completion::Failed(_)));
        assert_eq!(cache.lookup(&key("", 1)), Lookup::Stale(&page_of(1)));
        assert_eq!(cache.last_error(&key("", 1)), Some("server returned 500: boom"));
    }

    #[test]
    fn failed_key_is_not_refetched_until_cleared() {
        let mut cache = QueryCache::new();
        let ticket = cache.begin_fetch(key("", 1)).unwrap();
        cache.complete(
            ticket,
            Err(TransportError::NotFound {
                message: "gone".to_string(),
            }),
        );

        assert_eq!(cache.lookup(&key("", 1)), Lookup::Missing);
        assert!(!cache.needs_fetch(&key("", 1)));

        cache.clear_error(&key("", 1));
        assert!(cache.needs_fetch(&key("", 1)));
    }

    #[test]
    fn invalidation_re_enables_fetch_after_failure() {
        let mut cache = QueryCache::new();
        let ticket = cache.begin_fetch(key("", 1)).unwrap();
        cache.complete(
            ticket,
            Err(TransportError::NotFound {
                message: "gone".to_string(),
            }),
        );
        cache.invalidate_all();
        assert!(cache.needs_fetch(&key("", 1)));
    }

    #[test]
    fn success_clears_previous_error() {
        let mut cache = QueryCache::new();
        let ticket = cache.begin_fetch(key("", 1)).unwrap();
        cache.complete(
            ticket,
            Err(TransportError::NotFound {
                message: "gone".to_string(),
            }),
        );
        cache.clear_error(&key("", 1));
        let ticket = cache.begin_fetch(key("", 1)).unwrap();
        cache.complete(ticket, Ok(page_of(1)));
        assert_eq!(cache.last_error(&key("", 1)), None);
    }
}
