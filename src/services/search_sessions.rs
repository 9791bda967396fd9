// src/services/search_sessions.rs
// DOCUMENTATION: In-memory search sessions with TTL
// PURPOSE: Keep each UI session's latest full fetch and drop stale responses

use crate::models::{Cafe, ResolvedLocation};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Latest completed search of a session
/// DOCUMENTATION: `cafes` is the full, unfiltered fetch in distance order
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub location: ResolvedLocation,
    pub cafes: Vec<Cafe>,
    pub radius: u32,
}

/// Handle returned when a search starts
/// DOCUMENTATION: Only the ticket of the most recent `begin` can complete
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    session: String,
    generation: u64,
}

impl SearchTicket {
    pub fn session(&self) -> &str {
        &self.session
    }
}

#[derive(Debug)]
struct SessionEntry {
    generation: u64,
    snapshot: Option<SessionSnapshot>,
    expires_at: Instant,
}

impl SessionEntry {
    fn is_expired(&self) -> bool {
        Instant::now() > self.expires_at
    }
}

/// Session store
/// DOCUMENTATION: Thread-safe; generations come from one counter shared by
/// all sessions so an expired-and-recreated session never reuses one
pub struct SearchSessions {
    store: Arc<RwLock<HashMap<String, SessionEntry>>>,
    ttl: Duration,
    next_generation: AtomicU64,
}

impl SearchSessions {
    /// Create new store with the given idle TTL
    pub fn new(ttl_seconds: u64) -> Self {
        Self {
            store: Arc::new(RwLock::new(HashMap::new())),
            ttl: Duration::from_secs(ttl_seconds),
            next_generation: AtomicU64::new(1),
        }
    }

    /// Start a search, superseding any search still running for `session`
    pub async fn begin(&self, session: &str) -> SearchTicket {
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        let expires_at = Instant::now() + self.ttl;

        let mut store = self.store.write().await;
        let entry = store.entry(session.to_string()).or_insert(SessionEntry {
            generation,
            snapshot: None,
            expires_at,
        });
        if entry.is_expired() {
            entry.snapshot = None;
        }
        entry.generation = generation;
        entry.expires_at = expires_at;

        log::debug!("Session {} started search #{}", session, generation);
        SearchTicket {
            session: session.to_string(),
            generation,
        }
    }

    /// Whether `ticket` still belongs to the newest search of its session
    pub async fn is_current(&self, ticket: &SearchTicket) -> bool {
        let store = self.store.read().await;
        store
            .get(&ticket.session)
            .map(|entry| entry.generation == ticket.generation)
            .unwrap_or(false)
    }

    /// Store a finished search
    /// DOCUMENTATION: Returns false and drops the result when a newer search
    /// started after `ticket` was issued
    pub async fn complete(&self, ticket: &SearchTicket, snapshot: SessionSnapshot) -> bool {
        let mut store = self.store.write().await;

        match store.get_mut(&ticket.session) {
            Some(entry) if entry.generation == ticket.generation => {
                entry.snapshot = Some(snapshot);
                entry.expires_at = Instant::now() + self.ttl;
                log::debug!(
                    "Session {} stored search #{}",
                    ticket.session,
                    ticket.generation
                );
                true
            }
            _ => {
                log::warn!(
                    "Dropping stale result for session {} (search #{})",
                    ticket.session,
                    ticket.generation
                );
                false
            }
        }
    }

    /// Latest completed search, unless the session expired
    pub async fn get(&self, session: &str) -> Option<SessionSnapshot> {
        let store = self.store.read().await;

        match store.get(session) {
            Some(entry) if !entry.is_expired() => entry.snapshot.clone(),
            Some(_) => {
                log::debug!("Session {} expired", session);
                None
            }
            None => None,
        }
    }

    /// Clear expired entries
    pub async fn cleanup(&self) {
        let mut store = self.store.write().await;
        let before_count = store.len();
        store.retain(|_, entry| !entry.is_expired());
        let after_count = store.len();

        if before_count > after_count {
            log::info!(
                "Session cleanup: removed {} expired sessions ({} remaining)",
                before_count - after_count,
                after_count
            );
        }
    }

    /// Get session statistics
    pub async fn stats(&self) -> SessionStats {
        let store = self.store.read().await;
        let total = store.len();
        let expired = store.values().filter(|e| e.is_expired()).count();

        SessionStats {
            total_sessions: total,
            expired_sessions: expired,
            active_sessions: total - expired,
        }
    }
}

/// Session statistics
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionStats {
    pub total_sessions: usize,
    pub expired_sessions: usize,
    pub active_sessions: usize,
}

/// Start background cleanup task
/// DOCUMENTATION: Periodically removes expired sessions
pub fn start_cleanup_task(sessions: Arc<SearchSessions>, interval_seconds: u64) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(interval_seconds));

        loop {
            interval.tick().await;
            sessions.cleanup().await;
        }
    });
}
