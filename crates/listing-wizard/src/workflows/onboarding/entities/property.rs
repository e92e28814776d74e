use serde::{Deserialize, Serialize};

use super::{EntityForm, SlotKind};
use crate::workflows::onboarding::catalog;
use crate::workflows::onboarding::schema::{
    is_blank, prefixed_phone, swap_dial_code, FieldCheck, FieldErrors,
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertyAddress {
    pub property_name: String,
    pub total_units: String,
    pub website: Option<String>,
    pub country: String,
    pub street_address: String,
    pub unit_number: Option<String>,
    pub city: String,
    pub state: String,
    pub zip_code: String,
}

impl PropertyAddress {
    /// Switching country always clears the state so a stale subdivision never survives.
    pub fn select_country(&mut self, country: &str) {
        self.country = country.trim().to_string();
        self.state.clear();
    }

    pub fn available_states(&self) -> &'static [&'static str] {
        catalog::subdivisions_of(&self.country)
    }
}

impl EntityForm for PropertyAddress {
    const KIND: SlotKind = SlotKind::PropertyAddress;

    fn validate(&self) -> Result<(), FieldErrors> {
        let mut check = FieldCheck::new();
        check
            .required("property_name", &self.property_name, "Property name is required")
            .required("total_units", &self.total_units, "Total units is required")
            .whole_number(
                "total_units",
                &self.total_units,
                "Total units must be a whole number",
            )
            .optional_url("website", self.website.as_deref(), "Enter a valid website URL")
            .region("country", &self.country, "state", &self.state)
            .required("street_address", &self.street_address, "Street address is required")
            .required("city", &self.city, "City is required")
            .required("zip_code", &self.zip_code, "Zip code is required");
        check.finish()
    }

    fn summary(&self) -> String {
        let mut parts = vec![self.street_address.trim().to_string()];
        if let Some(unit) = self.unit_number.as_deref().filter(|unit| !is_blank(unit)) {
            parts.push(format!("Unit {}", unit.trim()));
        }
        parts.push(self.city.trim().to_string());
        if !is_blank(&self.state) {
            parts.push(self.state.trim().to_string());
        }
        parts.push(self.zip_code.trim().to_string());
        parts.push(self.country.trim().to_string());
        format!(
            "{} ({} units) - {}",
            self.property_name.trim(),
            self.total_units.trim(),
            parts.join(", ")
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeasingInfo {
    pub manager_name: String,
    pub phone_code: String,
    pub phone_number: String,
    pub contact_email: String,
    pub same_as_property: bool,
}

impl Default for LeasingInfo {
    fn default() -> Self {
        Self {
            manager_name: String::new(),
            phone_code: catalog::DEFAULT_DIAL_CODE.to_string(),
            phone_number: catalog::DEFAULT_DIAL_CODE.to_string(),
            contact_email: String::new(),
            same_as_property: false,
        }
    }
}

impl LeasingInfo {
    /// Swap the dial-code prefix, keeping whatever subscriber digits were typed.
    pub fn change_dial_code(&mut self, code: &str) {
        self.phone_number = swap_dial_code(&self.phone_number, &self.phone_code, code);
        self.phone_code = code.trim().to_string();
    }

    pub fn enter_phone_number(&mut self, input: &str) {
        if let Some(number) = prefixed_phone(&self.phone_code, input) {
            self.phone_number = number;
        }
    }
}

impl EntityForm for LeasingInfo {
    const KIND: SlotKind = SlotKind::LeasingInfo;

    fn validate(&self) -> Result<(), FieldErrors> {
        let mut check = FieldCheck::new();
        check
            .required("manager_name", &self.manager_name, "Manager name is required")
            .phone(
                "phone_code",
                &self.phone_code,
                "phone_number",
                &self.phone_number,
            )
            .email("contact_email", &self.contact_email, "Invalid email");
        check.finish()
    }

    fn summary(&self) -> String {
        let mut line = format!(
            "{} - {} - {}",
            self.manager_name.trim(),
            self.phone_number.trim(),
            self.contact_email.trim()
        );
        if self.same_as_property {
            line.push_str(" (Address same as property)");
        }
        line
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AboutDescription {
    pub description: String,
}

impl EntityForm for AboutDescription {
    const KIND: SlotKind = SlotKind::About;

    fn validate(&self) -> Result<(), FieldErrors> {
        let mut check = FieldCheck::new();
        check.length_between(
            "description",
            self.description.trim(),
            10,
            1000,
            "Description must be at least 10 characters.",
            "Description must not exceed 1000 characters.",
        );
        check.finish()
    }

    fn summary(&self) -> String {
        self.description.trim().to_string()
    }
}
