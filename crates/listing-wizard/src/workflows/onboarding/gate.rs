use super::notifications::Notification;

pub const PAYMENT_SUCCESS_MESSAGE: &str = "Payment successful! Your property has been added.";

/// Reasons a step refuses to hand over to the next one.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum StepGateError {
    #[error("Please select a property type first")]
    PropertyTypeFirst,
    #[error("Please select both property type and your role")]
    PropertyAndRoleRequired,
    #[error("Please fill out all required fields in the form")]
    VerificationIncomplete,
    #[error("Please accept the terms and conditions")]
    TermsNotAccepted,
    #[error("Please complete the required fields: {}", labels.join(", "))]
    MissingRequired { labels: Vec<String> },
    #[error("Please select a plan")]
    PlanRequired,
    #[error("Please select a payment card")]
    CardRequired,
}

impl StepGateError {
    pub fn to_notification(&self) -> Notification {
        Notification::warning(self.to_string())
    }
}
