//! End-to-end walks through the listing onboarding wizard using only the public service
//! facade and HTTP router.

mod common {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use listing_wizard::workflows::onboarding::{
        Charges, Entity, FileHandle, LandlordVerification, LeasingInfo, MockPaymentGateway,
        Notification, Notifier, NotifyError, OnboardingService, PropertyAddress, RentReminder,
        RepositoryError, RoleVerification, SessionId, SessionRepository, WizardSession,
    };

    pub(super) fn ownership_doc() -> FileHandle {
        FileHandle::new("deed.pdf", "application/pdf")
    }

    pub(super) fn landlord() -> RoleVerification {
        RoleVerification::Landlord(LandlordVerification {
            ownership_doc: Some(ownership_doc()),
        })
    }

    pub(super) fn required_entities(with_address: bool) -> Vec<Entity> {
        let mut leasing = LeasingInfo {
            manager_name: "Nadia Karim".to_string(),
            contact_email: "nadia@harbor.example".to_string(),
            ..LeasingInfo::default()
        };
        leasing.enter_phone_number("1811122233");

        let mut entities = Vec::new();
        if with_address {
            entities.push(Entity::PropertyAddress(PropertyAddress {
                property_name: "Harbor Point".to_string(),
                total_units: "40".to_string(),
                website: Some("https://harbor.example".to_string()),
                country: "Bangladesh".to_string(),
                street_address: "7 Port Road".to_string(),
                unit_number: None,
                city: "Dhaka".to_string(),
                state: "Dhaka".to_string(),
                zip_code: "4000".to_string(),
            }));
        }
        entities.push(Entity::LeasingInfo(leasing));
        entities.push(Entity::Charges(Charges {
            application_fee: "150".to_string(),
            admin_fee: "35".to_string(),
        }));
        entities.push(Entity::RentReminder(RentReminder {
            payment_frequency: "Monthly".to_string(),
            reminder_date: "2025-12-25".to_string(),
            due_date: "2026-01-01".to_string(),
        }));
        entities
    }

    #[derive(Default)]
    pub(super) struct InMemorySessions {
        sessions: Mutex<HashMap<SessionId, WizardSession>>,
    }

    impl SessionRepository for InMemorySessions {
        fn insert(&self, session: WizardSession) -> Result<WizardSession, RepositoryError> {
            let mut guard = self.sessions.lock().expect("lock");
            if guard.contains_key(session.id()) {
                return Err(RepositoryError::Conflict);
            }
            guard.insert(session.id().clone(), session.clone());
            Ok(session)
        }

        fn fetch(&self, id: &SessionId) -> Result<Option<WizardSession>, RepositoryError> {
            Ok(self.sessions.lock().expect("lock").get(id).cloned())
        }

        fn modify<T, F>(&self, id: &SessionId, apply: F) -> Result<T, RepositoryError>
        where
            F: FnOnce(&mut WizardSession) -> T,
        {
            let mut guard = self.sessions.lock().expect("lock");
            let session = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
            Ok(apply(session))
        }

        fn remove(&self, id: &SessionId) -> Result<Option<WizardSession>, RepositoryError> {
            Ok(self.sessions.lock().expect("lock").remove(id))
        }
    }

    #[derive(Default)]
    pub(super) struct RecordingNotifier {
        events: Mutex<Vec<Notification>>,
    }

    impl RecordingNotifier {
        pub(super) fn events(&self) -> Vec<Notification> {
            self.events.lock().expect("lock").clone()
        }
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, _session_id: &str, notification: Notification) -> Result<(), NotifyError> {
            self.events.lock().expect("lock").push(notification);
            Ok(())
        }
    }

    pub(super) type Service = OnboardingService<InMemorySessions, RecordingNotifier, MockPaymentGateway>;

    pub(super) fn service() -> (Arc<Service>, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::default());
        let service = OnboardingService::new(
            Arc::new(InMemorySessions::default()),
            notifier.clone(),
            Arc::new(MockPaymentGateway::new()),
        );
        (Arc::new(service), notifier)
    }
}

use common::*;
use listing_wizard::workflows::onboarding::{
    onboarding_router, Entity, FileHandle, MediaSlot, NotificationLevel, OnboardingServiceError,
    PetFee, PlanTier, PropertyType, SessionId, SlotKind, StepGateError, SubmitterRole,
    WizardCommand, WizardError, WizardRoute,
};
use serde_json::json;
use tower::ServiceExt;

fn run(service: &Service, id: &SessionId, commands: impl IntoIterator<Item = WizardCommand>) {
    for command in commands {
        service.apply(id, command).expect("command succeeds");
    }
}

fn get_started() -> Vec<WizardCommand> {
    vec![
        WizardCommand::SelectProperty {
            property_type: PropertyType::Condo,
        },
        WizardCommand::SelectRole {
            role: SubmitterRole::Landlord,
        },
        WizardCommand::UpdateVerification { draft: landlord() },
        WizardCommand::AcceptTerms { accepted: true },
        WizardCommand::GetStarted,
    ]
}

fn fill(entities: Vec<Entity>) -> Vec<WizardCommand> {
    entities
        .into_iter()
        .flat_map(|entity| {
            [
                WizardCommand::OpenForm {
                    kind: entity.kind(),
                    index: None,
                },
                WizardCommand::SubmitForm { entity },
            ]
        })
        .collect()
}

fn featured_photo() -> WizardCommand {
    WizardCommand::UploadMedia {
        slot: MediaSlot::FeaturedPhoto,
        index: Some(2),
        file: FileHandle::new("pool.png", "image/png"),
    }
}

#[test]
fn landlord_with_ownership_doc_gets_started() {
    let (service, notifier) = service();
    let id = service.start().expect("start").session_id;

    run(&service, &id, get_started());

    let view = service.get(&id).expect("session");
    assert_eq!(view.route, WizardRoute::Condominiums);
    assert_eq!(view.category.property_type, Some(PropertyType::Condo));
    assert!(view.category.terms_accepted);
    assert!(notifier.events().is_empty());
}

#[test]
fn editing_pet_fee_keeps_a_single_entry() {
    let (service, _) = service();
    let id = service.start().expect("start").session_id;
    run(&service, &id, get_started());

    let fee = |monthly_rent: &str| {
        Entity::PetFees(PetFee {
            pet_type: "Dog".to_string(),
            max_weight: "50".to_string(),
            one_time_fee: "100".to_string(),
            security_deposit: "200".to_string(),
            monthly_rent: monthly_rent.to_string(),
        })
    };
    run(
        &service,
        &id,
        [
            WizardCommand::OpenForm {
                kind: SlotKind::PetFees,
                index: None,
            },
            WizardCommand::SubmitForm { entity: fee("25") },
            WizardCommand::OpenForm {
                kind: SlotKind::PetFees,
                index: Some(0),
            },
        ],
    );

    let view = service.get(&id).expect("session");
    let modal = view.condominium.modal.expect("edit modal open");
    assert_eq!(modal.prefill, Some(fee("25")));

    run(&service, &id, [WizardCommand::SubmitForm { entity: fee("30") }]);
    let view = service.get(&id).expect("session");
    let pets = view
        .condominium
        .slots
        .iter()
        .find(|summary| summary.kind == SlotKind::PetFees)
        .expect("pet card");
    assert_eq!(
        pets.lines,
        vec!["Dog (Max 50 lbs) - One Time: $100, Deposit: $200, Monthly: $30".to_string()]
    );
}

#[test]
fn next_without_property_address_is_blocked() {
    let (service, notifier) = service();
    let id = service.start().expect("start").session_id;
    run(&service, &id, get_started());
    run(&service, &id, fill(required_entities(false)));
    run(&service, &id, [featured_photo()]);

    let err = service
        .apply(&id, WizardCommand::Next)
        .expect_err("address missing");

    match err {
        OnboardingServiceError::Wizard(WizardError::Gate(StepGateError::MissingRequired {
            labels,
        })) => assert!(labels.contains(&"Property Address".to_string())),
        other => panic!("unexpected error {other:?}"),
    }
    let events = notifier.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].level, NotificationLevel::Warning);
    assert!(events[0].message.contains("Property Address"));
    assert_eq!(
        service.get(&id).expect("session").route,
        WizardRoute::Condominiums
    );
}

#[test]
fn paying_without_card_warns_and_skips_success() {
    let (service, notifier) = service();
    let id = service.start().expect("start").session_id;
    run(&service, &id, get_started());
    run(&service, &id, fill(required_entities(true)));
    run(&service, &id, [featured_photo(), WizardCommand::Next]);
    run(
        &service,
        &id,
        [WizardCommand::SelectTier {
            tier: PlanTier::Enterprise,
        }],
    );

    let err = service
        .apply(&id, WizardCommand::Pay)
        .expect_err("card missing");

    assert!(matches!(
        err,
        OnboardingServiceError::Wizard(WizardError::Gate(StepGateError::CardRequired))
    ));
    let events = notifier.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].message, "Please select a payment card");
    assert!(events
        .iter()
        .all(|event| event.level == NotificationLevel::Warning));
    assert!(service.get(&id).expect("session").submission.is_none());
}

#[test]
fn back_returns_to_previous_step_and_keeps_data() {
    let (service, _) = service();
    let id = service.start().expect("start").session_id;
    run(&service, &id, get_started());
    run(&service, &id, fill(required_entities(true)));
    run(&service, &id, [featured_photo(), WizardCommand::Next]);

    run(&service, &id, [WizardCommand::Back]);
    let view = service.get(&id).expect("session");
    assert_eq!(view.route, WizardRoute::Condominiums);
    assert!(view.condominium.missing_required.is_empty());
}

#[tokio::test]
async fn router_drives_session_over_http() {
    let (service, _) = service();
    let router = onboarding_router(service);

    let response = router
        .clone()
        .oneshot(
            axum::http::Request::post("/api/v1/onboarding/sessions")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    let body = axum::body::to_bytes(response.into_body(), 256 * 1024)
        .await
        .expect("body");
    let payload: serde_json::Value = serde_json::from_slice(&body).expect("json");
    let id = payload["session_id"].as_str().expect("id").to_string();

    let response = router
        .oneshot(
            axum::http::Request::post(format!("/api/v1/onboarding/sessions/{id}/commands"))
                .header(axum::http::header::CONTENT_TYPE, "application/json")
                .body(axum::body::Body::from(
                    serde_json::to_vec(&json!({ "type": "get_started" })).unwrap(),
                ))
                .unwrap(),
        )
        .await
        .expect("route executes");
    assert_eq!(
        response.status(),
        axum::http::StatusCode::UNPROCESSABLE_ENTITY
    );
}
