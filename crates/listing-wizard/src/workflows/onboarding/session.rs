//! One person's pass through the wizard: the three steps, the current route and the
//! typed results each gate hands forward.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::category::{CategoryError, CategorySelection, CategoryState, CategoryStep, PropertyType};
use super::commands::WizardCommand;
use super::condominium::{CondominiumError, CondominiumStep, ModalTarget, PropertyDetails};
use super::entities::Entity;
use super::gallery::MediaGallery;
use super::gate::{StepGateError, PAYMENT_SUCCESS_MESSAGE};
use super::notifications::Notification;
use super::payment::{
    BillingCycle, ChargeRequest, GatewayError, PaymentError, PaymentGateway, PaymentReceipt,
    PaymentSelection, PaymentStep, PlanTier, SavedCard,
};
use super::roles::SubmitterRole;
use super::schema::{FieldErrors, ValidationReport};
use super::slots::SlotSummary;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WizardRoute {
    #[serde(rename = "/")]
    Category,
    #[serde(rename = "/condominiums")]
    Condominiums,
    #[serde(rename = "/payment")]
    Payment,
}

impl WizardRoute {
    pub const fn path(self) -> &'static str {
        match self {
            WizardRoute::Category => "/",
            WizardRoute::Condominiums => "/condominiums",
            WizardRoute::Payment => "/payment",
        }
    }

    pub const fn previous(self) -> Option<WizardRoute> {
        match self {
            WizardRoute::Category => None,
            WizardRoute::Condominiums => Some(WizardRoute::Category),
            WizardRoute::Payment => Some(WizardRoute::Condominiums),
        }
    }
}

impl fmt::Display for WizardRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Everything gathered by the wizard, assembled when the payment goes through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingSubmission {
    pub session_id: SessionId,
    pub category: CategorySelection,
    pub property: PropertyDetails,
    pub payment: PaymentSelection,
    pub receipt: PaymentReceipt,
}

#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    #[error("'{command}' belongs to {expected}, but the wizard is on {current}")]
    WrongStep {
        command: &'static str,
        expected: WizardRoute,
        current: WizardRoute,
    },
    #[error("this listing has already been submitted")]
    AlreadySubmitted,
    #[error("earlier steps have not been completed")]
    IncompleteFlow,
    #[error(transparent)]
    Gate(#[from] StepGateError),
    #[error(transparent)]
    Category(#[from] CategoryError),
    #[error(transparent)]
    Condominium(#[from] CondominiumError),
    #[error(transparent)]
    Payment(#[from] PaymentError),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl WizardError {
    /// Field-level messages to render under inputs, when the failure has any.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            WizardError::Condominium(CondominiumError::Invalid(errors))
            | WizardError::Payment(PaymentError::InvalidCard(errors)) => Some(errors),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct WizardSession {
    id: SessionId,
    created_at: DateTime<Utc>,
    route: WizardRoute,
    category: CategoryStep,
    condominium: CondominiumStep,
    payment: PaymentStep,
    category_selection: Option<CategorySelection>,
    property_details: Option<PropertyDetails>,
    submission: Option<ListingSubmission>,
}

impl WizardSession {
    pub fn new(id: SessionId) -> Self {
        Self {
            id,
            created_at: Utc::now(),
            route: WizardRoute::Category,
            category: CategoryStep::new(),
            condominium: CondominiumStep::new(),
            payment: PaymentStep::new(),
            category_selection: None,
            property_details: None,
            submission: None,
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn route(&self) -> WizardRoute {
        self.route
    }

    pub fn category(&self) -> &CategoryStep {
        &self.category
    }

    pub fn condominium(&self) -> &CondominiumStep {
        &self.condominium
    }

    pub fn payment(&self) -> &PaymentStep {
        &self.payment
    }

    pub fn category_selection(&self) -> Option<&CategorySelection> {
        self.category_selection.as_ref()
    }

    pub fn property_details(&self) -> Option<&PropertyDetails> {
        self.property_details.as_ref()
    }

    pub fn submission(&self) -> Option<&ListingSubmission> {
        self.submission.as_ref()
    }

    /// Back moves one step; the first step stays put.
    pub fn back(&mut self) {
        if let Some(previous) = self.route.previous() {
            self.route = previous;
        }
    }

    /// Applies one command, returning the notification it produced on success.
    pub fn apply(
        &mut self,
        command: WizardCommand,
        gateway: &dyn PaymentGateway,
    ) -> Result<Option<Notification>, WizardError> {
        if self.submission.is_some() {
            return Err(WizardError::AlreadySubmitted);
        }
        if let Some(expected) = command.step() {
            if expected != self.route {
                return Err(WizardError::WrongStep {
                    command: command.name(),
                    expected,
                    current: self.route,
                });
            }
        }

        match command {
            WizardCommand::SelectProperty { property_type } => {
                self.category.select_property(property_type)
            }
            WizardCommand::SelectRole { role } => self.category.select_role(role)?,
            WizardCommand::UpdateVerification { draft } => {
                self.category.update_verification(draft)?;
            }
            WizardCommand::AcceptTerms { accepted } => self.category.accept_terms(accepted),
            WizardCommand::GetStarted => {
                self.category_selection = Some(self.category.get_started()?);
                self.route = WizardRoute::Condominiums;
            }
            WizardCommand::OpenForm { kind, index } => {
                self.condominium.open(kind, index)?;
            }
            WizardCommand::SubmitForm { entity } => {
                self.condominium.submit_modal(entity)?;
            }
            WizardCommand::CancelForm => self.condominium.cancel_modal(),
            WizardCommand::DeleteFromForm => {
                self.condominium.delete_from_modal()?;
            }
            WizardCommand::DeleteEntity { kind, index } => {
                self.condominium.delete_entity(kind, index)?;
            }
            WizardCommand::ClearEntity { kind } => {
                self.condominium.clear_entity(kind)?;
            }
            WizardCommand::RemoveAmenity { index } => {
                self.condominium.remove_amenity(index);
            }
            WizardCommand::UploadMedia { slot, index, file } => {
                self.condominium.upload_media(slot, index, file)?
            }
            WizardCommand::RemoveMedia { slot, index } => {
                self.condominium.remove_media(slot, index)?;
            }
            WizardCommand::Next => {
                self.property_details = Some(self.condominium.next()?);
                self.route = WizardRoute::Payment;
            }
            WizardCommand::SelectTier { tier } => self.payment.select_tier(tier),
            WizardCommand::SelectCycle { cycle } => self.payment.select_cycle(cycle),
            WizardCommand::SelectCard { card_id } => self.payment.select_card(&card_id)?,
            WizardCommand::AddCard { card } => {
                self.payment.add_card(card)?;
            }
            WizardCommand::Pay => return self.pay(gateway).map(Some),
            WizardCommand::Back => self.back(),
        }
        Ok(None)
    }

    fn pay(&mut self, gateway: &dyn PaymentGateway) -> Result<Notification, WizardError> {
        let payment = self.payment.checkout()?;
        let (Some(category), Some(property)) =
            (self.category_selection.clone(), self.property_details.clone())
        else {
            return Err(WizardError::IncompleteFlow);
        };

        let request = ChargeRequest {
            amount_cents: payment.amount_cents(),
            currency: "USD",
            card_id: payment.card.id.clone(),
            description: format!(
                "{} plan ({}) for {}",
                payment.plan_tier.name(),
                payment.billing_cycle.label(),
                property.property_address.property_name.trim()
            ),
        };
        let receipt = gateway.charge(&request)?;

        self.submission = Some(ListingSubmission {
            session_id: self.id.clone(),
            category,
            property,
            payment,
            receipt,
        });
        Ok(Notification::success(PAYMENT_SUCCESS_MESSAGE))
    }

    pub fn view(&self) -> SessionView {
        let verification = self.category.verification();
        let modal = self.condominium.modal().map(|target| ModalView {
            target,
            prefill: self
                .condominium
                .slots()
                .entity_at(target.kind, target.editing_index)
                .ok()
                .flatten(),
        });

        SessionView {
            session_id: self.id.clone(),
            created_at: self.created_at,
            route: self.route,
            category: CategoryView {
                state: self.category.state(),
                property_type: self.category.property_type(),
                role: self.category.role(),
                verification_valid: verification.is_some_and(|form| form.is_valid()),
                verification: verification.map(|form| form.report()),
                terms_accepted: self.category.terms_accepted(),
            },
            condominium: CondominiumView {
                slots: self.condominium.summaries(),
                modal,
                gallery: self.condominium.gallery().clone(),
                missing_required: self.condominium.missing_required(),
            },
            payment: PaymentView {
                plan_tier: self.payment.plan_tier(),
                billing_cycle: self.payment.billing_cycle(),
                selected_card_id: self.payment.selected_card_id().map(str::to_string),
                cards: self.payment.cards().to_vec(),
            },
            submission: self.submission.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub session_id: SessionId,
    pub created_at: DateTime<Utc>,
    pub route: WizardRoute,
    pub category: CategoryView,
    pub condominium: CondominiumView,
    pub payment: PaymentView,
    pub submission: Option<ListingSubmission>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryView {
    pub state: CategoryState,
    pub property_type: Option<PropertyType>,
    pub role: Option<SubmitterRole>,
    pub verification_valid: bool,
    pub verification: Option<ValidationReport>,
    pub terms_accepted: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModalView {
    pub target: ModalTarget,
    pub prefill: Option<Entity>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CondominiumView {
    pub slots: Vec<SlotSummary>,
    pub modal: Option<ModalView>,
    pub gallery: MediaGallery,
    pub missing_required: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentView {
    pub plan_tier: Option<PlanTier>,
    pub billing_cycle: BillingCycle,
    pub selected_card_id: Option<String>,
    pub cards: Vec<SavedCard>,
}
