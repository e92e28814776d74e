use super::session::{SessionId, WizardSession};

/// Storage abstraction so the service can be exercised without a server.
pub trait SessionRepository: Send + Sync {
    fn insert(&self, session: WizardSession) -> Result<WizardSession, RepositoryError>;

    fn fetch(&self, id: &SessionId) -> Result<Option<WizardSession>, RepositoryError>;

    /// Runs `apply` with exclusive access to the stored session. Calls for the same
    /// session never overlap; an unknown id is `NotFound`.
    fn modify<T, F>(&self, id: &SessionId, apply: F) -> Result<T, RepositoryError>
    where
        F: FnOnce(&mut WizardSession) -> T;

    fn remove(&self, id: &SessionId) -> Result<Option<WizardSession>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("session already exists")]
    Conflict,
    #[error("session not found")]
    NotFound,
    #[error("session capacity of {limit} reached")]
    CapacityReached { limit: usize },
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
