//! First wizard step: property category, submitter role and verification.

use serde::{Deserialize, Serialize};

use super::gate::StepGateError;
use super::roles::{RoleMismatch, RoleVerification, SubmitterRole, VerificationForm};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    Single,
    Apartment,
    Condo,
}

impl PropertyType {
    pub const fn label(self) -> &'static str {
        match self {
            PropertyType::Single => "Single House Property",
            PropertyType::Apartment => "Apartments complex",
            PropertyType::Condo => "Condominium",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryState {
    NoneSelected,
    PropertySelected,
    PropertyAndRoleSelected,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CategoryError {
    #[error("select a role before filling in the verification form")]
    NoRoleSelected,
    #[error(transparent)]
    RoleMismatch(#[from] RoleMismatch),
}

/// Result handed to the condominium step once "Get Started" passes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySelection {
    pub property_type: PropertyType,
    pub role: SubmitterRole,
    pub verification: RoleVerification,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryStep {
    property_type: Option<PropertyType>,
    role: Option<SubmitterRole>,
    verification: Option<VerificationForm>,
    terms_accepted: bool,
}

impl CategoryStep {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> CategoryState {
        match (self.property_type, self.role) {
            (Some(_), Some(_)) => CategoryState::PropertyAndRoleSelected,
            (Some(_), None) => CategoryState::PropertySelected,
            _ => CategoryState::NoneSelected,
        }
    }

    pub fn property_type(&self) -> Option<PropertyType> {
        self.property_type
    }

    pub fn role(&self) -> Option<SubmitterRole> {
        self.role
    }

    pub fn verification(&self) -> Option<&VerificationForm> {
        self.verification.as_ref()
    }

    pub fn terms_accepted(&self) -> bool {
        self.terms_accepted
    }

    pub fn select_property(&mut self, property_type: PropertyType) {
        self.property_type = Some(property_type);
    }

    /// A different role mounts a fresh form; re-selecting the current one keeps it.
    pub fn select_role(&mut self, role: SubmitterRole) -> Result<(), StepGateError> {
        if self.property_type.is_none() {
            return Err(StepGateError::PropertyTypeFirst);
        }
        if self.role != Some(role) {
            self.role = Some(role);
            self.verification = Some(VerificationForm::mount(role));
        }
        Ok(())
    }

    pub fn update_verification(
        &mut self,
        draft: RoleVerification,
    ) -> Result<Option<bool>, CategoryError> {
        let form = self
            .verification
            .as_mut()
            .ok_or(CategoryError::NoRoleSelected)?;
        Ok(form.update(draft)?)
    }

    pub fn accept_terms(&mut self, accepted: bool) {
        self.terms_accepted = accepted;
    }

    pub fn get_started(&self) -> Result<CategorySelection, StepGateError> {
        let (Some(property_type), Some(role), Some(form)) =
            (self.property_type, self.role, self.verification.as_ref())
        else {
            return Err(StepGateError::PropertyAndRoleRequired);
        };
        if !form.is_valid() {
            return Err(StepGateError::VerificationIncomplete);
        }
        if !self.terms_accepted {
            return Err(StepGateError::TermsNotAccepted);
        }

        Ok(CategorySelection {
            property_type,
            role,
            verification: form.draft().clone(),
        })
    }
}
