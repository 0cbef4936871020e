//! Per-session dashboard state.
//!
//! Each browser session owns one `Session`. Handlers lock it for the whole action,
//! so actions on a session run one at a time; separate sessions never contend.

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};
use uuid::Uuid;

use crate::listings::recency::RecencyFilter;
use crate::models::listing::Listing;

#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub job_title: String,
    pub location: String,
    pub recipient_email: String,
    pub date_filter: RecencyFilter,
    /// Filtered listings from the last search. Records the filter rejected are gone.
    pub listings: Vec<Listing>,
    pub company_summary: String,
    pub spreadsheet: Option<Bytes>,
    pub summary_text: Option<String>,
    pub notice: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            job_title: String::new(),
            location: String::new(),
            recipient_email: String::new(),
            date_filter: RecencyFilter::All,
            listings: Vec::new(),
            company_summary: String::new(),
            spreadsheet: None,
            summary_text: None,
            notice: None,
            updated_at: Utc::now(),
        }
    }

    /// Swaps in the result of a new search. Everything derived from the previous
    /// dataset, including the last summary, is dropped.
    pub fn replace_dataset(
        &mut self,
        listings: Vec<Listing>,
        company_summary: String,
        spreadsheet: Option<Bytes>,
        notice: Option<String>,
    ) {
        self.listings = listings;
        self.company_summary = company_summary;
        self.spreadsheet = spreadsheet;
        self.notice = notice;
        self.summary_text = None;
        self.touch();
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

pub type SessionHandle = Arc<Mutex<Session>>;

/// Sessions untouched for this long are dropped on the next creation.
pub const SESSION_IDLE_TTL_MINUTES: i64 = 120;
/// Upper bound on live sessions; the least recently used one is evicted first.
pub const MAX_SESSIONS: usize = 1_000;

/// In-memory session registry with idle expiry and a size cap.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, SessionHandle>>>,
    idle_ttl: Duration,
    capacity: usize,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_limits(Duration::minutes(SESSION_IDLE_TTL_MINUTES), MAX_SESSIONS)
    }
}

impl SessionStore {
    pub fn with_limits(idle_ttl: Duration, capacity: usize) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            idle_ttl,
            capacity: capacity.max(1),
        }
    }

    pub async fn get(&self, id: Uuid) -> Option<SessionHandle> {
        self.sessions.read().await.get(&id).cloned()
    }

    /// Returns the session for `id` when it exists. Otherwise a new session is
    /// created under a server-generated id; client-chosen ids are never stored.
    pub async fn get_or_create(&self, id: Option<Uuid>) -> SessionHandle {
        if let Some(id) = id {
            if let Some(handle) = self.get(id).await {
                return handle;
            }
            debug!("Unknown session {id}, starting a new one");
        }

        let id = Uuid::new_v4();
        let mut sessions = self.sessions.write().await;
        self.evict(&mut sessions);

        let handle = Arc::new(Mutex::new(Session::new(id)));
        sessions.insert(id, handle.clone());
        debug!("Session {id} ready ({} active)", sessions.len());
        handle
    }

    /// Drops idle sessions, then the least recently used ones until there is room
    /// for one more. Sessions locked by an in-flight action are left alone.
    fn evict(&self, sessions: &mut HashMap<Uuid, SessionHandle>) {
        let cutoff = Utc::now() - self.idle_ttl;
        let mut idle: Vec<(DateTime<Utc>, Uuid)> = sessions
            .iter()
            .filter_map(|(id, handle)| {
                handle
                    .try_lock()
                    .ok()
                    .map(|session| (session.updated_at, *id))
            })
            .collect();
        idle.sort();

        let before = sessions.len();
        for (updated_at, id) in idle {
            if updated_at >= cutoff && sessions.len() < self.capacity {
                break;
            }
            sessions.remove(&id);
        }

        let evicted = before - sessions.len();
        if evicted > 0 {
            info!("Evicted {evicted} sessions ({} active)", sessions.len());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listings::pipeline::tests::listing;

    #[tokio::test]
    async fn test_get_or_create_without_id_makes_new_session() {
        let store = SessionStore::default();
        let a = store.get_or_create(None).await;
        let b = store.get_or_create(None).await;
        let a_id = a.lock().await.id;
        let b_id = b.lock().await.id;
        assert_ne!(a_id, b_id);
        assert!(store.get(a_id).await.is_some());
    }

    #[tokio::test]
    async fn test_get_or_create_reuses_known_id() {
        let store = SessionStore::default();
        let first = store.get_or_create(None).await;
        let id = first.lock().await.id;
        first.lock().await.recipient_email = "a@b.com".into();

        let again = store.get_or_create(Some(id)).await;
        assert_eq!(again.lock().await.recipient_email, "a@b.com");
    }

    #[tokio::test]
    async fn test_unknown_id_gets_fresh_session() {
        let store = SessionStore::default();
        let id = Uuid::new_v4();
        let handle = store.get_or_create(Some(id)).await;
        let new_id = handle.lock().await.id;
        assert_ne!(new_id, id);
        assert!(store.get(id).await.is_none());
        assert!(store.get(new_id).await.is_some());
    }

    #[tokio::test]
    async fn test_client_chosen_ids_stay_bounded() {
        let store = SessionStore::with_limits(Duration::minutes(SESSION_IDLE_TTL_MINUTES), 50);
        for _ in 0..500 {
            store.get_or_create(Some(Uuid::new_v4())).await;
        }
        assert_eq!(store.sessions.read().await.len(), 50);
    }

    #[tokio::test]
    async fn test_idle_sessions_expire() {
        let store = SessionStore::with_limits(Duration::minutes(30), MAX_SESSIONS);
        let stale = store.get_or_create(None).await;
        let stale_id = {
            let mut session = stale.lock().await;
            session.updated_at = Utc::now() - Duration::hours(1);
            session.id
        };
        let fresh = store.get_or_create(None).await;
        let fresh_id = fresh.lock().await.id;

        store.get_or_create(None).await;

        assert!(store.get(stale_id).await.is_none());
        assert!(store.get(fresh_id).await.is_some());
    }

    #[tokio::test]
    async fn test_capacity_evicts_least_recently_used() {
        let store = SessionStore::with_limits(Duration::minutes(30), 2);
        let older = store.get_or_create(None).await;
        let older_id = {
            let mut session = older.lock().await;
            session.updated_at = Utc::now() - Duration::minutes(5);
            session.id
        };
        let newer_id = store.get_or_create(None).await.lock().await.id;

        let third_id = store.get_or_create(None).await.lock().await.id;

        assert!(store.get(older_id).await.is_none());
        assert!(store.get(newer_id).await.is_some());
        assert!(store.get(third_id).await.is_some());
    }

    #[tokio::test]
    async fn test_session_in_use_is_not_evicted() {
        let store = SessionStore::with_limits(Duration::minutes(30), 1);
        let busy = store.get_or_create(None).await;
        let mut guard = busy.lock().await;
        guard.updated_at = Utc::now() - Duration::hours(1);
        let busy_id = guard.id;

        store.get_or_create(None).await;

        assert!(store.get(busy_id).await.is_some());
        drop(guard);
    }

    #[test]
    fn test_replace_dataset_clears_summary() {
        let mut session = Session::new(Uuid::new_v4());
        session.summary_text = Some("old summary".into());
        session.replace_dataset(
            vec![listing("Acme", "LinkedIn", "1 day ago")],
            "Acme - 1 job".into(),
            Some(Bytes::from_static(b"xlsx")),
            None,
        );
        assert!(session.summary_text.is_none());
        assert_eq!(session.listings.len(), 1);
        assert_eq!(session.company_summary, "Acme - 1 job");

        session.replace_dataset(Vec::new(), String::new(), None, Some("No jobs".into()));
        assert!(session.listings.is_empty());
        assert!(session.spreadsheet.is_none());
        assert_eq!(session.notice.as_deref(), Some("No jobs"));
    }
}
