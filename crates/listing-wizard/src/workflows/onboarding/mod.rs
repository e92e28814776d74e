//! Rental listing onboarding wizard.
//!
//! Three steps (category, condominium details, payment) each own a state container and
//! refuse to advance until their gate passes. Sub-form values are validated by pure
//! functions so the same rules serve live validation and modal submission.

pub mod catalog;
pub mod category;
pub mod commands;
pub mod condominium;
pub mod entities;
pub mod gallery;
pub mod gate;
pub mod notifications;
pub mod payment;
pub mod repository;
pub mod roles;
pub mod router;
pub mod schema;
pub mod service;
pub mod session;
pub mod slots;

#[cfg(test)]
mod tests;

pub use category::{CategoryError, CategorySelection, CategoryState, CategoryStep, PropertyType};
pub use commands::WizardCommand;
pub use condominium::{CondominiumError, CondominiumStep, ModalTarget, PropertyDetails};
pub use entities::{
    AboutDescription, AmenitySelection, ApplicationAgreement, Charges, EducationalInstitution,
    Entity, EntityForm, Landmark, LeasingInfo, Parking, PetFee, PropertyAddress, RentReminder,
    SlotKind, Station, Utility,
};
pub use gallery::{MediaError, MediaGallery, MediaSlot};
pub use gate::{StepGateError, PAYMENT_SUCCESS_MESSAGE};
pub use notifications::{Notification, NotificationLevel, Notifier, NotifyError};
pub use payment::{
    format_price, BillingCycle, ChargeRequest, GatewayError, MockPaymentGateway, NewCard,
    PaymentError, PaymentGateway, PaymentReceipt, PaymentSelection, PaymentStep, PlanTier,
    SavedCard,
};
pub use repository::{RepositoryError, SessionRepository};
pub use roles::{
    LandlordVerification, ManagementVerification, RealtorVerification, RoleVerification,
    SubmitterRole, VerificationForm,
};
pub use router::onboarding_router;
pub use schema::{FieldErrors, FileHandle, MimeGroup, ValidationReport};
pub use service::{OnboardingService, OnboardingServiceError};
pub use session::{ListingSubmission, SessionId, SessionView, WizardError, WizardRoute, WizardSession};
pub use slots::{EntityList, ListingSlots, SlotError, SlotSummary};
