//! Keyed request cache for remote detail-page data
//!
//! Tracks one entry per [`RouteKey`]: the last good value, the last error and
//! the request currently in flight. Views read a [`QuerySnapshot`] with the
//! `is_loading` / `is_fetching` / `is_error` / `data` flags and never see the
//! transport.
//!
//! Results are matched to entries by ticket, so a late response for a route
//! the user already left lands in that route's own entry, and a response to a
//! superseded request is dropped.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::models::RouteKey;

/// How long settled data stays fresh before a new subscription refetches it.
/// Entries older than this are evicted when another request starts.
pub const DEFAULT_TTL: Duration = Duration::from_secs(60);

/// Identifies one outgoing request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub key: RouteKey,
    pub request_id: u64,
}

/// Flags exposed to views for one key
#[derive(Debug, PartialEq)]
pub struct QuerySnapshot<'a, T> {
    /// First request for the key, nothing to show yet
    pub is_loading: bool,
    /// Any request in flight, including the first one
    pub is_fetching: bool,
    /// The most recent request failed
    pub is_error: bool,
    /// Last successfully fetched value
    pub data: Option<&'a T>,
}

impl<T> Clone for QuerySnapshot<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for QuerySnapshot<'_, T> {}

impl<T> QuerySnapshot<'_, T> {
    /// Snapshot of a key that was never requested
    pub fn uninitialized() -> Self {
        Self {
            is_loading: true,
            is_fetching: false,
            is_error: false,
            data: None,
        }
    }
}

#[derive(Debug)]
struct Entry<T> {
    data: Option<T>,
    error: Option<String>,
    in_flight: Option<u64>,
    settled_at: Option<Instant>,
}

impl<T> Default for Entry<T> {
    fn default() -> Self {
        Self {
            data: None,
            error: None,
            in_flight: None,
            settled_at: None,
        }
    }
}

/// Cache of fetch results keyed by route
#[derive(Debug)]
pub struct QueryCache<T> {
    entries: HashMap<RouteKey, Entry<T>>,
    ttl: Duration,
    next_request: u64,
}

impl<T> Default for QueryCache<T> {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl<T> QueryCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
            next_request: 0,
        }
    }

    /// Subscribe to a key. Returns a ticket when a request must be sent:
    /// nothing cached, cached data expired, or the last request failed.
    pub fn request(&mut self, key: &RouteKey) -> Option<FetchTicket> {
        let ttl = self.ttl;
        let entry = self.entries.entry(key.clone()).or_default();

        if entry.in_flight.is_some() {
            return None;
        }
        let fresh = entry.error.is_none()
            && entry.data.is_some()
            && entry.settled_at.is_some_and(|at| at.elapsed() < ttl);
        if fresh {
            return None;
        }
        Some(self.start(key))
    }

    /// Force a background request for a key, keeping any data already held
    pub fn refetch(&mut self, key: &RouteKey) -> Option<FetchTicket> {
        match self.entries.get(key) {
            Some(entry) if entry.in_flight.is_some() => None,
            _ => Some(self.start(key)),
        }
    }

    fn start(&mut self, key: &RouteKey) -> FetchTicket {
        self.evict_expired(key);
        self.next_request += 1;
        let request_id = self.next_request;
        let entry = self.entries.entry(key.clone()).or_default();
        entry.in_flight = Some(request_id);
        debug!(%key, request_id, "query started");
        FetchTicket {
            key: key.clone(),
            request_id,
        }
    }

    /// Drop settled entries older than the TTL, except `keep` and any entry
    /// with a request in flight.
    fn evict_expired(&mut self, keep: &RouteKey) {
        let ttl = self.ttl;
        let before = self.entries.len();
        self.entries.retain(|key, entry| {
            key == keep
                || entry.in_flight.is_some()
                || entry.settled_at.is_some_and(|at| at.elapsed() < ttl)
        });
        let evicted = before - self.entries.len();
        if evicted > 0 {
            debug!(evicted, "expired queries evicted");
        }
    }

    /// Record the outcome of a request.
    ///
    /// Returns `false` when the ticket is no longer the latest request for its
    /// key; the outcome is then discarded.
    pub fn settle<E: std::fmt::Display>(
        &mut self,
        ticket: &FetchTicket,
        result: Result<T, E>,
    ) -> bool {
        let Some(entry) = self.entries.get_mut(&ticket.key) else {
            debug!(key = %ticket.key, "result for unknown key dropped");
            return false;
        };
        if entry.in_flight != Some(ticket.request_id) {
            debug!(
                key = %ticket.key,
                request_id = ticket.request_id,
                "stale result dropped"
            );
            return false;
        }

        entry.in_flight = None;
        entry.settled_at = Some(Instant::now());
        match result {
            Ok(value) => {
                entry.data = Some(value);
                entry.error = None;
            }
            Err(e) => {
                debug!(key = %ticket.key, error = %e, "query failed");
                entry.error = Some(e.to_string());
            }
        }
        true
    }

    pub fn snapshot(&self, key: &RouteKey) -> QuerySnapshot<'_, T> {
        match self.entries.get(key) {
            None => QuerySnapshot::uninitialized(),
            Some(entry) => QuerySnapshot {
                is_loading: entry.data.is_none() && entry.error.is_none(),
                is_fetching: entry.in_flight.is_some(),
                is_error: entry.error.is_some(),
                data: entry.data.as_ref(),
            },
        }
    }

    /// Error message of the last failed request, for logs and the CLI
    pub fn error(&self, key: &RouteKey) -> Option<&str> {
        self.entries.get(key).and_then(|e| e.error.as_deref())
    }
}
