use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{info, warn};

use super::commands::WizardCommand;
use super::entities::Entity;
use super::notifications::Notifier;
use super::payment::PaymentGateway;
use super::repository::{RepositoryError, SessionRepository};
use super::schema::ValidationReport;
use super::session::{SessionId, SessionView, WizardError, WizardSession};

/// Service composing session storage, the notifier and the payment gateway.
pub struct OnboardingService<R, N, G> {
    repository: Arc<R>,
    notifier: Arc<N>,
    gateway: Arc<G>,
}

static SESSION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_session_id() -> SessionId {
    let id = SESSION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SessionId::new(format!("wiz-{id:06}"))
}

impl<R, N, G> OnboardingService<R, N, G>
where
    R: SessionRepository + 'static,
    N: Notifier + 'static,
    G: PaymentGateway + 'static,
{
    pub fn new(repository: Arc<R>, notifier: Arc<N>, gateway: Arc<G>) -> Self {
        Self {
            repository,
            notifier,
            gateway,
        }
    }

    /// Open a fresh wizard on the category step.
    pub fn start(&self) -> Result<SessionView, OnboardingServiceError> {
        let session = WizardSession::new(next_session_id());
        let stored = self.repository.insert(session)?;
        info!(session_id = %stored.id(), "onboarding session started");
        Ok(stored.view())
    }

    pub fn get(&self, session_id: &SessionId) -> Result<SessionView, OnboardingServiceError> {
        let session = self
            .repository
            .fetch(session_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(session.view())
    }

    /// Apply one command; the session is only stored back when the command succeeds.
    ///
    /// The command runs with exclusive access to the stored session, so a second
    /// command on the same session waits and then sees the first one's result.
    pub fn apply(
        &self,
        session_id: &SessionId,
        command: WizardCommand,
    ) -> Result<SessionView, OnboardingServiceError> {
        let name = command.name();
        let gateway = self.gateway.as_ref();

        let outcome = self.repository.modify(session_id, |stored| {
            let mut working = stored.clone();
            let notification = working.apply(command, gateway)?;
            *stored = working;
            Ok::<_, WizardError>((notification, stored.view()))
        })?;

        let (notification, view) = match outcome {
            Ok(applied) => applied,
            Err(WizardError::Gate(gate)) => {
                warn!(session_id = %session_id, command = name, reason = %gate, "step gate blocked");
                if let Err(err) = self.notifier.notify(session_id.as_str(), gate.to_notification()) {
                    warn!(session_id = %session_id, error = %err, "warning notification dropped");
                }
                return Err(WizardError::Gate(gate).into());
            }
            Err(other) => return Err(other.into()),
        };

        if let Some(notification) = notification {
            if let Some(submission) = &view.submission {
                info!(
                    session_id = %session_id,
                    transaction_id = %submission.receipt.transaction_id,
                    amount_cents = submission.receipt.amount_cents,
                    "listing payment charged"
                );
            }
            // The command has already been stored; notifier failures are only logged.
            if let Err(err) = self.notifier.notify(session_id.as_str(), notification) {
                warn!(session_id = %session_id, error = %err, "success notification dropped");
            }
        }

        Ok(view)
    }

    /// Drop a session, releasing its slot in the store.
    pub fn discard(&self, session_id: &SessionId) -> Result<(), OnboardingServiceError> {
        self.repository
            .remove(session_id)?
            .ok_or(RepositoryError::NotFound)?;
        info!(session_id = %session_id, "onboarding session discarded");
        Ok(())
    }

    /// Live validation for a single sub-form value; touches no session.
    pub fn validate(&self, entity: &Entity) -> ValidationReport {
        entity.report()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum OnboardingServiceError {
    #[error(transparent)]
    Wizard(#[from] WizardError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
