//! Role-specific verification forms mounted by the category step.
//!
//! The forms have no submit of their own. They report aggregate validity upward when
//! mounted and again whenever an update flips it; "Get Started" is the real submission.

use serde::{Deserialize, Serialize};

use super::catalog;
use super::schema::{
    prefixed_phone, swap_dial_code, FieldCheck, FieldErrors, FileHandle, MimeGroup,
    ValidationReport,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitterRole {
    Landlord,
    Realtor,
    Management,
}

impl SubmitterRole {
    pub const fn label(self) -> &'static str {
        match self {
            SubmitterRole::Landlord => "Landlord",
            SubmitterRole::Realtor => "Realtor",
            SubmitterRole::Management => "Property management company",
        }
    }

    pub const fn form_title(self) -> &'static str {
        match self {
            SubmitterRole::Landlord => "Proof of ownership",
            SubmitterRole::Realtor => "Realtor verification",
            SubmitterRole::Management => "Company & office info",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LandlordVerification {
    pub ownership_doc: Option<FileHandle>,
}

impl LandlordVerification {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut check = FieldCheck::new();
        check.file(
            "ownership_doc",
            self.ownership_doc.as_ref(),
            MimeGroup::Document,
            "Ownership document is required",
        );
        check.finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RealtorVerification {
    pub license_number: String,
    pub agreement_with_landlord: Option<FileHandle>,
    pub additional_docs: Option<FileHandle>,
}

impl RealtorVerification {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut check = FieldCheck::new();
        check
            .required("license_number", &self.license_number, "License number is required")
            .file(
                "agreement_with_landlord",
                self.agreement_with_landlord.as_ref(),
                MimeGroup::Document,
                "Agreement with landlord is required",
            )
            .optional_file(
                "additional_docs",
                self.additional_docs.as_ref(),
                MimeGroup::Document,
            );
        check.finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagementVerification {
    pub company_name: String,
    pub company_identifier: String,
    pub job_title: String,
    pub agreement: Option<FileHandle>,
    pub country: String,
    pub street_address: String,
    pub apt_suite: Option<String>,
    pub phone_code: String,
    pub phone_number: String,
    pub email: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
}

impl Default for ManagementVerification {
    fn default() -> Self {
        Self {
            company_name: String::new(),
            company_identifier: String::new(),
            job_title: String::new(),
            agreement: None,
            country: String::new(),
            street_address: String::new(),
            apt_suite: None,
            phone_code: catalog::DEFAULT_DIAL_CODE.to_string(),
            phone_number: catalog::DEFAULT_DIAL_CODE.to_string(),
            email: String::new(),
            city: String::new(),
            state: String::new(),
            zip_code: String::new(),
        }
    }
}

impl ManagementVerification {
    pub fn select_country(&mut self, country: &str) {
        self.country = country.trim().to_string();
        self.state.clear();
    }

    pub fn change_dial_code(&mut self, code: &str) {
        self.phone_number = swap_dial_code(&self.phone_number, &self.phone_code, code);
        self.phone_code = code.trim().to_string();
    }

    pub fn enter_phone_number(&mut self, input: &str) {
        if let Some(number) = prefixed_phone(&self.phone_code, input) {
            self.phone_number = number;
        }
    }

    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut check = FieldCheck::new();
        check
            .required("company_name", &self.company_name, "Company name is required")
            .required(
                "company_identifier",
                &self.company_identifier,
                "Company identifier is required",
            )
            .required("job_title", &self.job_title, "Job title is required")
            .file(
                "agreement",
                self.agreement.as_ref(),
                MimeGroup::Document,
                "Agreement is required",
            )
            .region("country", &self.country, "state", &self.state)
            .required("street_address", &self.street_address, "Street address is required")
            .phone(
                "phone_code",
                &self.phone_code,
                "phone_number",
                &self.phone_number,
            )
            .email("email", &self.email, "Invalid email address")
            .required("city", &self.city, "City is required")
            .required("zip_code", &self.zip_code, "Zip code is required");
        check.finish()
    }
}

/// Draft of whichever verification form the selected role mounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum RoleVerification {
    Landlord(LandlordVerification),
    Realtor(RealtorVerification),
    Management(ManagementVerification),
}

impl RoleVerification {
    pub fn blank(role: SubmitterRole) -> Self {
        match role {
            SubmitterRole::Landlord => Self::Landlord(LandlordVerification::default()),
            SubmitterRole::Realtor => Self::Realtor(RealtorVerification::default()),
            SubmitterRole::Management => Self::Management(ManagementVerification::default()),
        }
    }

    pub fn role(&self) -> SubmitterRole {
        match self {
            Self::Landlord(_) => SubmitterRole::Landlord,
            Self::Realtor(_) => SubmitterRole::Realtor,
            Self::Management(_) => SubmitterRole::Management,
        }
    }

    pub fn validate(&self) -> Result<(), FieldErrors> {
        match self {
            Self::Landlord(form) => form.validate(),
            Self::Realtor(form) => form.validate(),
            Self::Management(form) => form.validate(),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("a {} draft cannot replace the {} verification form", found.label(), expected.label())]
pub struct RoleMismatch {
    pub expected: SubmitterRole,
    pub found: SubmitterRole,
}

/// Mounted verification form plus the validity it last reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationForm {
    draft: RoleVerification,
    reported_valid: bool,
}

impl VerificationForm {
    /// A freshly mounted form is empty, so the first report is always `false`.
    pub fn mount(role: SubmitterRole) -> Self {
        Self {
            draft: RoleVerification::blank(role),
            reported_valid: false,
        }
    }

    pub fn role(&self) -> SubmitterRole {
        self.draft.role()
    }

    pub fn draft(&self) -> &RoleVerification {
        &self.draft
    }

    pub fn is_valid(&self) -> bool {
        self.reported_valid
    }

    pub fn report(&self) -> ValidationReport {
        ValidationReport::from(self.draft.validate())
    }

    /// Replaces the draft; returns the new validity only when it changed.
    pub fn update(&mut self, draft: RoleVerification) -> Result<Option<bool>, RoleMismatch> {
        if draft.role() != self.role() {
            return Err(RoleMismatch {
                expected: self.role(),
                found: draft.role(),
            });
        }

        self.draft = draft;
        let valid = self.draft.validate().is_ok();
        if valid == self.reported_valid {
            return Ok(None);
        }
        self.reported_valid = valid;
        Ok(Some(valid))
    }
}
