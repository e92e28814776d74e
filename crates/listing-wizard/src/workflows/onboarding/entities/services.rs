use serde::{Deserialize, Serialize};

use super::{EntityForm, SlotKind};
use crate::workflows::onboarding::catalog;
use crate::workflows::onboarding::schema::{FieldCheck, FieldErrors, FileHandle, MimeGroup};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationAgreement {
    pub agreement_file: Option<FileHandle>,
    pub accept_terms: bool,
}

impl ApplicationAgreement {
    pub fn attach_file(&mut self, file: FileHandle) {
        self.agreement_file = Some(file);
    }

    pub fn file_name(&self) -> Option<&str> {
        self.agreement_file.as_ref().map(|file| file.name.as_str())
    }
}

impl EntityForm for ApplicationAgreement {
    const KIND: SlotKind = SlotKind::ApplicationAgreements;

    fn validate(&self) -> Result<(), FieldErrors> {
        let mut check = FieldCheck::new();
        check
            .file(
                "agreement_file",
                self.agreement_file.as_ref(),
                MimeGroup::Document,
                "Agreement file is required",
            )
            .accepted("accept_terms", self.accept_terms, "You must accept the terms");
        check.finish()
    }

    fn summary(&self) -> String {
        match self.file_name() {
            Some(name) if self.accept_terms => format!("{name} (terms accepted)"),
            Some(name) => name.to_string(),
            None => String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Utility {
    pub utility_type: String,
    pub provider_company: String,
}

impl EntityForm for Utility {
    const KIND: SlotKind = SlotKind::Utilities;

    fn validate(&self) -> Result<(), FieldErrors> {
        let mut check = FieldCheck::new();
        check
            .required("utility_type", &self.utility_type, "Utility type is required")
            .one_of(
                "utility_type",
                &self.utility_type,
                catalog::UTILITY_TYPES,
                "Select a supported utility type",
            )
            .required(
                "provider_company",
                &self.provider_company,
                "Provider company name is required",
            );
        check.finish()
    }

    fn summary(&self) -> String {
        format!(
            "{} - {}",
            self.utility_type.trim(),
            self.provider_company.trim()
        )
    }
}

/// Ordered set of amenity labels, replaced wholesale on submit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmenitySelection {
    pub amenities: Vec<String>,
}

impl AmenitySelection {
    pub fn contains(&self, label: &str) -> bool {
        self.amenities.iter().any(|selected| selected == label)
    }

    /// Adds the label when absent, removes it when present.
    pub fn toggle(&mut self, label: &str) {
        if self.contains(label) {
            self.amenities.retain(|selected| selected != label);
        } else {
            self.amenities.push(label.to_string());
        }
    }

    pub fn remove_at(&mut self, index: usize) -> Option<String> {
        (index < self.amenities.len()).then(|| self.amenities.remove(index))
    }

    pub fn is_empty(&self) -> bool {
        self.amenities.is_empty()
    }
}

impl EntityForm for AmenitySelection {
    const KIND: SlotKind = SlotKind::Amenities;

    fn validate(&self) -> Result<(), FieldErrors> {
        let mut check = FieldCheck::new();
        if self.amenities.is_empty() {
            check.fail("amenities", "At least one amenity is required");
        }
        if let Some(unknown) = self
            .amenities
            .iter()
            .find(|label| !catalog::AMENITIES.iter().any(|known| *known == label.as_str()))
        {
            check.fail("amenities", format!("Unknown amenity: {unknown}"));
        }
        check.finish()
    }

    fn summary(&self) -> String {
        self.amenities.join(", ")
    }
}
