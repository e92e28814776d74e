use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::response::Response;
use serde_json::Value;

use crate::workflows::onboarding::{
    onboarding_router, ChargeRequest, Charges, Entity, FileHandle, GatewayError,
    LandlordVerification, LeasingInfo, MediaSlot, MockPaymentGateway, Notification,
    NotificationLevel, Notifier, NotifyError, OnboardingService, PaymentGateway, PaymentReceipt,
    PropertyAddress, PropertyType, RentReminder, RepositoryError, RoleVerification, SessionId,
    SessionRepository, SubmitterRole, WizardCommand, WizardSession,
};

pub(super) fn pdf(name: &str) -> FileHandle {
    FileHandle::new(name, "application/pdf")
}

pub(super) fn photo(name: &str) -> FileHandle {
    FileHandle::new(name, "image/jpeg")
}

pub(super) fn landlord_draft() -> RoleVerification {
    RoleVerification::Landlord(LandlordVerification {
        ownership_doc: Some(pdf("title-deed.pdf")),
    })
}

pub(super) fn property_address() -> PropertyAddress {
    PropertyAddress {
        property_name: "Lakeview Towers".to_string(),
        total_units: "24".to_string(),
        website: None,
        country: "Bangladesh".to_string(),
        street_address: "12 Lake Road".to_string(),
        unit_number: Some("4B".to_string()),
        city: "Dhaka".to_string(),
        state: "Dhaka".to_string(),
        zip_code: "1207".to_string(),
    }
}

pub(super) fn leasing_info() -> LeasingInfo {
    let mut info = LeasingInfo {
        manager_name: "Rafi Ahmed".to_string(),
        contact_email: "rafi@lakeview.example".to_string(),
        ..LeasingInfo::default()
    };
    info.enter_phone_number("1712345678");
    info
}

pub(super) fn charges() -> Charges {
    Charges {
        application_fee: "100".to_string(),
        admin_fee: "25".to_string(),
    }
}

pub(super) fn rent_reminder() -> RentReminder {
    RentReminder {
        payment_frequency: "Monthly".to_string(),
        reminder_date: "2025-10-25".to_string(),
        due_date: "2025-11-01".to_string(),
    }
}

/// Commands that walk the category step through "Get Started".
pub(super) fn category_commands() -> Vec<WizardCommand> {
    vec![
        WizardCommand::SelectProperty {
            property_type: PropertyType::Condo,
        },
        WizardCommand::SelectRole {
            role: SubmitterRole::Landlord,
        },
        WizardCommand::UpdateVerification {
            draft: landlord_draft(),
        },
        WizardCommand::AcceptTerms { accepted: true },
        WizardCommand::GetStarted,
    ]
}

/// Commands that fill every required condominium slot and pass "Next".
pub(super) fn condominium_commands() -> Vec<WizardCommand> {
    let mut commands = Vec::new();
    let singletons = [
        Entity::PropertyAddress(property_address()),
        Entity::LeasingInfo(leasing_info()),
        Entity::Charges(charges()),
        Entity::RentReminder(rent_reminder()),
    ];
    for entity in singletons {
        commands.push(WizardCommand::OpenForm {
            kind: entity.kind(),
            index: None,
        });
        commands.push(WizardCommand::SubmitForm { entity });
    }
    commands.push(WizardCommand::UploadMedia {
        slot: MediaSlot::FeaturedPhoto,
        index: Some(0),
        file: photo("front.jpg"),
    });
    commands.push(WizardCommand::Next);
    commands
}

pub(super) type TestService = OnboardingService<MemoryRepository, MemoryNotifier, MockPaymentGateway>;

pub(super) fn build_service() -> (TestService, Arc<MemoryRepository>, Arc<MemoryNotifier>) {
    let repository = Arc::new(MemoryRepository::default());
    let notifier = Arc::new(MemoryNotifier::default());
    let service = OnboardingService::new(
        repository.clone(),
        notifier.clone(),
        Arc::new(MockPaymentGateway::new()),
    );
    (service, repository, notifier)
}

/// Start a session and drive it onto the payment step.
pub(super) fn session_on_payment<R, N, G>(service: &OnboardingService<R, N, G>) -> SessionId
where
    R: SessionRepository + 'static,
    N: Notifier + 'static,
    G: PaymentGateway + 'static,
{
    let view = service.start().expect("session starts");
    let id = view.session_id;
    for command in category_commands().into_iter().chain(condominium_commands()) {
        service.apply(&id, command).expect("setup command succeeds");
    }
    id
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) sessions: Arc<Mutex<HashMap<SessionId, WizardSession>>>,
}

impl SessionRepository for MemoryRepository {
    fn insert(&self, session: WizardSession) -> Result<WizardSession, RepositoryError> {
        let mut guard = self.sessions.lock().expect("repository mutex poisoned");
        if guard.contains_key(session.id()) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(session.id().clone(), session.clone());
        Ok(session)
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<WizardSession>, RepositoryError> {
        let guard = self.sessions.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn modify<T, F>(&self, id: &SessionId, apply: F) -> Result<T, RepositoryError>
    where
        F: FnOnce(&mut WizardSession) -> T,
    {
        let mut guard = self.sessions.lock().expect("repository mutex poisoned");
        let session = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        Ok(apply(session))
    }

    fn remove(&self, id: &SessionId) -> Result<Option<WizardSession>, RepositoryError> {
        let mut guard = self.sessions.lock().expect("repository mutex poisoned");
        Ok(guard.remove(id))
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryNotifier {
    events: Arc<Mutex<Vec<(String, Notification)>>>,
}

impl MemoryNotifier {
    pub(super) fn events(&self) -> Vec<Notification> {
        self.events
            .lock()
            .expect("notifier mutex poisoned")
            .iter()
            .map(|(_, notification)| notification.clone())
            .collect()
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, session_id: &str, notification: Notification) -> Result<(), NotifyError> {
        self.events
            .lock()
            .expect("notifier mutex poisoned")
            .push((session_id.to_string(), notification));
        Ok(())
    }
}

pub(super) struct UnavailableRepository;

impl SessionRepository for UnavailableRepository {
    fn insert(&self, _session: WizardSession) -> Result<WizardSession, RepositoryError> {
        Err(RepositoryError::Unavailable("session store offline".to_string()))
    }

    fn fetch(&self, _id: &SessionId) -> Result<Option<WizardSession>, RepositoryError> {
        Err(RepositoryError::Unavailable("session store offline".to_string()))
    }

    fn modify<T, F>(&self, _id: &SessionId, _apply: F) -> Result<T, RepositoryError>
    where
        F: FnOnce(&mut WizardSession) -> T,
    {
        Err(RepositoryError::Unavailable("session store offline".to_string()))
    }

    fn remove(&self, _id: &SessionId) -> Result<Option<WizardSession>, RepositoryError> {
        Err(RepositoryError::Unavailable("session store offline".to_string()))
    }
}

/// Rejects success toasts; warnings still go through.
#[derive(Default, Clone)]
pub(super) struct SuccessRejectingNotifier {
    inner: MemoryNotifier,
}

impl SuccessRejectingNotifier {
    pub(super) fn events(&self) -> Vec<Notification> {
        self.inner.events()
    }
}

impl Notifier for SuccessRejectingNotifier {
    fn notify(&self, session_id: &str, notification: Notification) -> Result<(), NotifyError> {
        if notification.level == NotificationLevel::Success {
            return Err(NotifyError::Unavailable("toast channel down".to_string()));
        }
        self.inner.notify(session_id, notification)
    }
}

/// Approves every charge after a pause and remembers what it was asked to charge.
#[derive(Default)]
pub(super) struct CountingGateway {
    delay: Duration,
    charges: AtomicUsize,
    requests: Mutex<Vec<ChargeRequest>>,
}

impl CountingGateway {
    pub(super) fn slow(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }

    pub(super) fn charges(&self) -> usize {
        self.charges.load(Ordering::SeqCst)
    }

    pub(super) fn requests(&self) -> Vec<ChargeRequest> {
        self.requests.lock().expect("gateway mutex poisoned").clone()
    }
}

impl PaymentGateway for CountingGateway {
    fn charge(&self, request: &ChargeRequest) -> Result<PaymentReceipt, GatewayError> {
        std::thread::sleep(self.delay);
        let count = self.charges.fetch_add(1, Ordering::SeqCst) + 1;
        self.requests
            .lock()
            .expect("gateway mutex poisoned")
            .push(request.clone());
        Ok(PaymentReceipt {
            transaction_id: format!("txn-count-{count}"),
            amount_cents: request.amount_cents,
            card_id: request.card_id.clone(),
            charged_at: chrono::Utc::now(),
        })
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 256 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn router_with_service(service: TestService) -> axum::Router {
    onboarding_router(Arc::new(service))
}
