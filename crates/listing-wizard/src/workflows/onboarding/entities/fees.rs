use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{EntityForm, SlotKind};
use crate::workflows::onboarding::catalog;
use crate::workflows::onboarding::schema::{is_blank, FieldCheck, FieldErrors};

const DATE_FORMAT: &str = "%Y-%m-%d";

fn dollars(value: &str) -> String {
    let value = value.trim();
    if value.starts_with('$') {
        value.to_string()
    } else {
        format!("${value}")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PetFee {
    pub pet_type: String,
    pub max_weight: String,
    pub one_time_fee: String,
    pub security_deposit: String,
    pub monthly_rent: String,
}

impl EntityForm for PetFee {
    const KIND: SlotKind = SlotKind::PetFees;

    fn validate(&self) -> Result<(), FieldErrors> {
        let mut check = FieldCheck::new();
        check
            .required("pet_type", &self.pet_type, "Pet type is required")
            .one_of(
                "pet_type",
                &self.pet_type,
                catalog::PET_TYPES,
                "Select a supported pet type",
            )
            .required("max_weight", &self.max_weight, "Max weight is required")
            .amount("max_weight", &self.max_weight, "Max weight must be a number")
            .required("one_time_fee", &self.one_time_fee, "One time fee is required")
            .amount("one_time_fee", &self.one_time_fee, "One time fee must be an amount")
            .required(
                "security_deposit",
                &self.security_deposit,
                "Security deposit is required",
            )
            .amount(
                "security_deposit",
                &self.security_deposit,
                "Security deposit must be an amount",
            )
            .required("monthly_rent", &self.monthly_rent, "Monthly rent is required")
            .amount("monthly_rent", &self.monthly_rent, "Monthly rent must be an amount");
        check.finish()
    }

    fn summary(&self) -> String {
        format!(
            "{} (Max {} lbs) - One Time: {}, Deposit: {}, Monthly: {}",
            self.pet_type.trim(),
            self.max_weight.trim(),
            dollars(&self.one_time_fee),
            dollars(&self.security_deposit),
            dollars(&self.monthly_rent)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Parking {
    pub guest_parking_time: String,
    pub parking_overview: String,
}

impl Default for Parking {
    fn default() -> Self {
        Self {
            guest_parking_time: catalog::DEFAULT_GUEST_PARKING_TIME.to_string(),
            parking_overview: String::new(),
        }
    }
}

impl EntityForm for Parking {
    const KIND: SlotKind = SlotKind::Parking;

    fn validate(&self) -> Result<(), FieldErrors> {
        let mut check = FieldCheck::new();
        check
            .required(
                "guest_parking_time",
                &self.guest_parking_time,
                "Parking time is required",
            )
            .one_of(
                "guest_parking_time",
                &self.guest_parking_time,
                catalog::GUEST_PARKING_TIMES,
                "Select a guest parking time between 1H and 4H",
            )
            .required(
                "parking_overview",
                &self.parking_overview,
                "Parking overview is required",
            );
        check.finish()
    }

    fn summary(&self) -> String {
        format!(
            "Guest parking: {} - {}",
            self.guest_parking_time.trim(),
            self.parking_overview.trim()
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Charges {
    pub application_fee: String,
    pub admin_fee: String,
}

impl EntityForm for Charges {
    const KIND: SlotKind = SlotKind::Charges;

    fn validate(&self) -> Result<(), FieldErrors> {
        let mut check = FieldCheck::new();
        check
            .required(
                "application_fee",
                &self.application_fee,
                "Application fee is required",
            )
            .one_of(
                "application_fee",
                &self.application_fee,
                catalog::APPLICATION_FEES,
                "Select an application fee of 100, 150 or 200",
            )
            .required("admin_fee", &self.admin_fee, "Admin fee is required")
            .amount("admin_fee", &self.admin_fee, "Admin fee must be an amount");
        check.finish()
    }

    fn summary(&self) -> String {
        format!(
            "Application Fee: {}, Admin Fee: {}",
            dollars(&self.application_fee),
            dollars(&self.admin_fee)
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RentReminder {
    pub payment_frequency: String,
    pub reminder_date: String,
    pub due_date: String,
}

impl RentReminder {
    pub fn reminder_on(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.reminder_date.trim(), DATE_FORMAT).ok()
    }

    pub fn due_on(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.due_date.trim(), DATE_FORMAT).ok()
    }
}

impl EntityForm for RentReminder {
    const KIND: SlotKind = SlotKind::RentReminder;

    fn validate(&self) -> Result<(), FieldErrors> {
        let mut check = FieldCheck::new();
        check
            .required(
                "payment_frequency",
                &self.payment_frequency,
                "Payment frequency is required",
            )
            .one_of(
                "payment_frequency",
                &self.payment_frequency,
                catalog::PAYMENT_FREQUENCIES,
                "Select Monthly, Bi-weekly or Weekly",
            )
            .required("reminder_date", &self.reminder_date, "Reminder date is required")
            .required("due_date", &self.due_date, "Due date is required");

        if !is_blank(&self.reminder_date) && self.reminder_on().is_none() {
            check.fail("reminder_date", "Reminder date must be a valid date");
        }
        if !is_blank(&self.due_date) && self.due_on().is_none() {
            check.fail("due_date", "Due date must be a valid date");
        }
        check.finish()
    }

    fn summary(&self) -> String {
        format!(
            "{} - Reminder: {}, Due: {}",
            self.payment_frequency.trim(),
            self.reminder_date.trim(),
            self.due_date.trim()
        )
    }
}
