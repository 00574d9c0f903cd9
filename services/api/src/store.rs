//! In-Memory Session Store
//!
//! Quiz sessions live only for the lifetime of the process. Every access goes
//! through a short critical section; callers must not `.await` while holding
//! an entry, which is enforced by the closure-based API.
//!
//! Entries that have not been touched for longer than the store's TTL are
//! evicted on every insert and by the periodic sweep started with
//! [`SessionStore::spawn_sweeper`].

use chrono::{DateTime, Utc};
use quizgen_core::{QuizSession, presenter::QuestionPresenter};
use std::{collections::HashMap, sync::Arc, time::Duration};
use tokio::{sync::Mutex, task::JoinHandle};
use tracing::debug;
use uuid::Uuid;

/// Idle time after which an abandoned session is dropped.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(60 * 60);

/// A quiz session together with the presenter drawing its current question.
#[derive(Debug, Clone)]
pub struct QuizEntry {
    pub session: QuizSession,
    pub presenter: QuestionPresenter,
    pub created_at: DateTime<Utc>,
    /// Refreshed by every [`SessionStore::update`].
    pub last_active: DateTime<Utc>,
}

impl Default for QuizEntry {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            session: QuizSession::new(),
            presenter: QuestionPresenter::new(),
            created_at: now,
            last_active: now,
        }
    }
}

impl QuizEntry {
    /// Points the presenter at the session's current question, carrying over
    /// any answer already recorded for it.
    pub fn sync_presenter(&mut self) {
        let index = self.session.current_index();
        if let Some(question) = self.session.current_question() {
            self.presenter
                .restore(index, question, self.session.answer_for(index));
        }
    }

    fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        // A negative age (clock moved backwards) counts as fresh.
        now.signed_duration_since(self.last_active)
            .to_std()
            .is_ok_and(|age| age > ttl)
    }
}

#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Mutex<HashMap<Uuid, QuizEntry>>>,
    ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_ttl(DEFAULT_SESSION_TTL)
    }
}

fn evict(sessions: &mut HashMap<Uuid, QuizEntry>, ttl: Duration) -> usize {
    let now = Utc::now();
    let before = sessions.len();
    sessions.retain(|_, entry| !entry.is_expired(now, ttl));
    before - sessions.len()
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub async fn insert(&self, entry: QuizEntry) -> Uuid {
        let id = Uuid::new_v4();
        let mut guard = self.inner.lock().await;
        let evicted = evict(&mut guard, self.ttl);
        if evicted > 0 {
            debug!(evicted, "Evicted expired sessions");
        }
        guard.insert(id, entry);
        id
    }

    /// Runs `f` against the entry for `id`, returning `None` if it does not exist.
    pub async fn update<R>(&self, id: Uuid, f: impl FnOnce(&mut QuizEntry) -> R) -> Option<R> {
        let mut guard = self.inner.lock().await;
        guard.get_mut(&id).map(|entry| {
            entry.last_active = Utc::now();
            f(entry)
        })
    }

    /// Drops every entry idle for longer than the TTL, returning how many went.
    pub async fn evict_expired(&self) -> usize {
        evict(&mut *self.inner.lock().await, self.ttl)
    }

    /// Starts a background task that calls [`SessionStore::evict_expired`]
    /// every `period`.
    pub fn spawn_sweeper(&self, period: Duration) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                let evicted = store.evict_expired().await;
                if evicted > 0 {
                    let remaining = store.len().await;
                    debug!(evicted, remaining, "Session sweep");
                }
            }
        })
    }

    pub async fn get(&self, id: Uuid) -> Option<QuizEntry> {
        self.inner.lock().await.get(&id).cloned()
    }

    pub async fn remove(&self, id: Uuid) -> bool {
        self.inner.lock().await.remove(&id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quizgen_core::{generator::MockQuestionGenerator, session::SessionPhase};

    #[tokio::test]
    async fn test_insert_update_remove() {
        let store = SessionStore::new();
        let id = store.insert(QuizEntry::default()).await;
        assert_eq!(store.len().await, 1);

        let phase = store
            .update(id, |entry| {
                entry.session.begin("Marine biology").map(|_| entry.session.phase())
            })
            .await;
        assert_eq!(phase, Some(Ok(SessionPhase::Generating)));

        assert!(store.remove(id).await);
        assert!(!store.remove(id).await);
        assert!(store.is_empty().await);
        assert!(store.update(id, |_| ()).await.is_none());
    }

    #[tokio::test]
    async fn test_sync_presenter_follows_recorded_answer() {
        let mut entry = QuizEntry::default();
        let topic = entry.session.begin("Marine biology").unwrap();
        entry
            .session
            .finish_generation(Ok(MockQuestionGenerator::quiz_for(&topic)))
            .unwrap();

        entry.sync_presenter();
        assert_eq!(entry.presenter.position(), Some(0));
        assert!(!entry.presenter.is_locked());

        entry.session.answer(0, 2).unwrap();
        entry.sync_presenter();
        assert_eq!(entry.presenter.selected(), Some(2));

        entry.session.advance();
        entry.sync_presenter();
        assert_eq!(entry.presenter.position(), Some(1));
        assert!(!entry.presenter.is_locked());
    }

    fn idle_entry(minutes: i64) -> QuizEntry {
        let mut entry = QuizEntry::default();
        entry.last_active = Utc::now() - chrono::Duration::minutes(minutes);
        entry
    }

    #[tokio::test]
    async fn test_insert_evicts_abandoned_sessions() {
        let store = SessionStore::with_ttl(Duration::from_secs(60));
        let abandoned = store.insert(idle_entry(5)).await;
        let recent = store.insert(idle_entry(0)).await;

        assert_eq!(store.len().await, 1);
        assert!(store.get(abandoned).await.is_none());
        assert!(store.get(recent).await.is_some());
    }

    #[tokio::test]
    async fn test_update_keeps_session_alive() {
        let store = SessionStore::with_ttl(Duration::from_secs(60));
        let id = store.insert(QuizEntry::default()).await;
        let backdate = |entry: &mut QuizEntry| {
            entry.last_active = Utc::now() - chrono::Duration::minutes(5)
        };

        store.update(id, backdate).await;
        assert!(store.update(id, |_| ()).await.is_some());
        assert_eq!(store.evict_expired().await, 0);

        store.update(id, backdate).await;
        assert_eq!(store.evict_expired().await, 1);
        assert!(store.get(id).await.is_none());
    }
}
