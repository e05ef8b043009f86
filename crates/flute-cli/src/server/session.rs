// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use uuid::Uuid;

/// Cookie carrying the session id.
pub const SESSION_COOKIE: &str = "FLUTESESSION";

/// Default idle time after which a session is dropped.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// Default number of live sessions kept.
pub const DEFAULT_MAX_SESSIONS: usize = 10_000;

/// Session attributes of one browser.
pub type SessionAttributes = HashMap<String, String>;

#[derive(Debug)]
struct SessionEntry {
    attributes: SessionAttributes,
    last_access: Instant,
    access_stamp: u64,
}

#[derive(Debug, Default)]
struct Sessions {
    entries: HashMap<String, SessionEntry>,
    stamp: u64,
}

impl Sessions {
    fn next_stamp(&mut self) -> u64 {
        self.stamp += 1;
        self.stamp
    }
}

/// Session attributes keyed by session id.
///
/// Sessions idle for longer than the idle timeout are dropped. When the
/// store is full, the least recently used session makes room for a new one.
/// Storing an empty attribute set removes the session.
#[derive(Debug)]
pub struct SessionStore {
    sessions: Mutex<Sessions>,
    idle_timeout: Duration,
    max_sessions: usize,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_IDLE_TIMEOUT, DEFAULT_MAX_SESSIONS)
    }
}

impl SessionStore {
    /// Creates an empty store.
    pub fn new(idle_timeout: Duration, max_sessions: usize) -> Self {
        Self {
            sessions: Mutex::new(Sessions::default()),
            idle_timeout,
            max_sessions: max_sessions.max(1),
        }
    }

    /// Returns a copy of the session, or `None` for an unknown or expired id.
    pub fn load(&self, id: &str) -> Option<SessionAttributes> {
        let mut sessions = self.sessions.lock().ok()?;
        let expired = sessions
            .entries
            .get(id)
            .map(|entry| self.is_expired(entry))?;
        if expired {
            sessions.entries.remove(id);
            tracing::debug!("Session {} expired", id);
            return None;
        }
        let stamp = sessions.next_stamp();
        let entry = sessions.entries.get_mut(id)?;
        entry.last_access = Instant::now();
        entry.access_stamp = stamp;
        Some(entry.attributes.clone())
    }

    /// Replaces the attributes stored under `id`.
    pub fn store(&self, id: &str, attributes: SessionAttributes) {
        let mut sessions = match self.sessions.lock() {
            Ok(sessions) => sessions,
            Err(_) => {
                tracing::warn!("Session store poisoned, dropping session {}", id);
                return;
            }
        };
        if attributes.is_empty() {
            sessions.entries.remove(id);
            return;
        }

        sessions.entries.retain(|_, entry| !self.is_expired(entry));
        if !sessions.entries.contains_key(id) && sessions.entries.len() >= self.max_sessions {
            let oldest = sessions
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.access_stamp)
                .map(|(key, _)| key.clone());
            if let Some(oldest) = oldest {
                tracing::debug!("Session store full, evicting session {}", oldest);
                sessions.entries.remove(&oldest);
            }
        }

        let access_stamp = sessions.next_stamp();
        sessions.entries.insert(
            id.to_string(),
            SessionEntry {
                attributes,
                last_access: Instant::now(),
                access_stamp,
            },
        );
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.sessions
            .lock()
            .map(|sessions| sessions.entries.len())
            .unwrap_or(0)
    }

    /// Returns true if no session is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Generates a fresh random session id.
    pub fn next_id(&self) -> String {
        Uuid::new_v4().simple().to_string()
    }

    fn is_expired(&self, entry: &SessionEntry) -> bool {
        entry.last_access.elapsed() >= self.idle_timeout
    }
}

/// Extracts a cookie value from a `Cookie` header.
pub fn parse_cookies(header: &str) -> HashMap<String, String> {
    header
        .split(';')
        .filter_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            if name.is_empty() {
                None
            } else {
                Some((name.to_string(), value.to_string()))
            }
        })
        .collect()
}
