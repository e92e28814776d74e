use listing_wizard::workflows::onboarding::{
    Notification, NotificationLevel, Notifier, NotifyError, RepositoryError, SessionId,
    SessionRepository, WizardSession,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use chrono::{Duration, Utc};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{info, warn};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local session store bounded by `ONBOARDING_MAX_SESSIONS`. Each session sits
/// behind its own lock so commands for one session run one at a time.
#[derive(Clone)]
pub(crate) struct InMemorySessionRepository {
    sessions: Arc<Mutex<HashMap<SessionId, Arc<Mutex<WizardSession>>>>>,
    max_sessions: usize,
    ttl: Duration,
}

type SessionMap = HashMap<SessionId, Arc<Mutex<WizardSession>>>;

fn poisoned<T>(_: T) -> RepositoryError {
    RepositoryError::Unavailable("session store lock poisoned".to_string())
}

impl InMemorySessionRepository {
    pub(crate) fn with_capacity(max_sessions: usize, ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            max_sessions,
            ttl,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, SessionMap>, RepositoryError> {
        self.sessions.lock().map_err(poisoned)
    }

    fn slot(&self, id: &SessionId) -> Result<Option<Arc<Mutex<WizardSession>>>, RepositoryError> {
        Ok(self.lock()?.get(id).cloned())
    }

    /// Drops submitted sessions and sessions older than the TTL. Sessions busy with a
    /// command are skipped.
    fn evict(&self, sessions: &mut SessionMap) -> usize {
        let cutoff = Utc::now() - self.ttl;
        let stale: Vec<SessionId> = sessions
            .iter()
            .filter(|(_, slot)| {
                slot.try_lock().is_ok_and(|session| {
                    session.submission().is_some() || session.created_at() <= cutoff
                })
            })
            .map(|(id, _)| id.clone())
            .collect();
        for id in &stale {
            sessions.remove(id);
        }
        stale.len()
    }
}

impl SessionRepository for InMemorySessionRepository {
    fn insert(&self, session: WizardSession) -> Result<WizardSession, RepositoryError> {
        let mut guard = self.lock()?;
        if guard.contains_key(session.id()) {
            return Err(RepositoryError::Conflict);
        }
        if guard.len() >= self.max_sessions {
            let evicted = self.evict(&mut guard);
            if evicted > 0 {
                info!(evicted, remaining = guard.len(), "reclaimed onboarding sessions");
            }
        }
        if guard.len() >= self.max_sessions {
            return Err(RepositoryError::CapacityReached {
                limit: self.max_sessions,
            });
        }
        guard.insert(session.id().clone(), Arc::new(Mutex::new(session.clone())));
        Ok(session)
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<WizardSession>, RepositoryError> {
        let Some(slot) = self.slot(id)? else {
            return Ok(None);
        };
        let session = slot.lock().map_err(poisoned)?.clone();
        Ok(Some(session))
    }

    fn modify<T, F>(&self, id: &SessionId, apply: F) -> Result<T, RepositoryError>
    where
        F: FnOnce(&mut WizardSession) -> T,
    {
        // The map lock is released before the session lock is taken.
        let slot = self.slot(id)?.ok_or(RepositoryError::NotFound)?;
        let mut session = slot.lock().map_err(poisoned)?;
        let output = apply(&mut session);
        Ok(output)
    }

    fn remove(&self, id: &SessionId) -> Result<Option<WizardSession>, RepositoryError> {
        let Some(slot) = self.lock()?.remove(id) else {
            return Ok(None);
        };
        let session = slot.lock().map_err(poisoned)?.clone();
        Ok(Some(session))
    }
}

/// Emits toasts as log events; a front end would subscribe to these instead.
#[derive(Default, Clone)]
pub(crate) struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, session_id: &str, notification: Notification) -> Result<(), NotifyError> {
        match notification.level {
            NotificationLevel::Warning => {
                warn!(session_id, message = %notification.message, "wizard warning")
            }
            NotificationLevel::Success => {
                info!(session_id, message = %notification.message, "wizard success")
            }
        }
        Ok(())
    }
}

/// Keeps toasts in memory so the demo can print them.
#[derive(Default, Clone)]
pub(crate) struct InMemoryNotifier {
    events: Arc<Mutex<Vec<Notification>>>,
}

impl Notifier for InMemoryNotifier {
    fn notify(&self, _session_id: &str, notification: Notification) -> Result<(), NotifyError> {
        let mut guard = self
            .events
            .lock()
            .map_err(|_| NotifyError::Unavailable("notifier lock poisoned".to_string()))?;
        guard.push(notification);
        Ok(())
    }
}

impl InMemoryNotifier {
    /// Drains what has been shown since the last call.
    pub(crate) fn take(&self) -> Vec<Notification> {
        self.events
            .lock()
            .map(|mut guard| std::mem::take(&mut *guard))
            .unwrap_or_default()
    }
}
