//! Value objects captured by the condominium step's sub-forms.

mod fees;
mod nearby;
mod property;
mod services;

pub use fees::{Charges, Parking, PetFee, RentReminder};
pub use nearby::{EducationalInstitution, Landmark, Station};
pub use property::{AboutDescription, LeasingInfo, PropertyAddress};
pub use services::{AmenitySelection, ApplicationAgreement, Utility};

use serde::{Deserialize, Serialize};

use super::schema::{FieldErrors, ValidationReport};

/// Named storage location on the condominium step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotKind {
    PropertyAddress,
    PetFees,
    LeasingInfo,
    Parking,
    Charges,
    EducationalInstitutions,
    RentReminder,
    Stations,
    ApplicationAgreements,
    Landmarks,
    About,
    Utilities,
    Amenities,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Cardinality {
    Single,
    List,
}

impl SlotKind {
    /// Display order of the summary cards.
    pub const ALL: [SlotKind; 13] = [
        SlotKind::PropertyAddress,
        SlotKind::PetFees,
        SlotKind::LeasingInfo,
        SlotKind::Parking,
        SlotKind::Charges,
        SlotKind::EducationalInstitutions,
        SlotKind::RentReminder,
        SlotKind::Stations,
        SlotKind::ApplicationAgreements,
        SlotKind::Landmarks,
        SlotKind::About,
        SlotKind::Utilities,
        SlotKind::Amenities,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            SlotKind::PropertyAddress => "Property Address",
            SlotKind::PetFees => "Pet Fees",
            SlotKind::LeasingInfo => "Leasing Info",
            SlotKind::Parking => "Parking",
            SlotKind::Charges => "Charges",
            SlotKind::EducationalInstitutions => "Nearest Educational Institution",
            SlotKind::RentReminder => "Rent Frequency & Payment Reminder",
            SlotKind::Stations => "Nearest Stations",
            SlotKind::ApplicationAgreements => "Application Agreement",
            SlotKind::Landmarks => "Nearest Landmark",
            SlotKind::About => "About the Property",
            SlotKind::Utilities => "Utilities Provider",
            SlotKind::Amenities => "Community's Amenity/Features",
        }
    }

    pub const fn hint(self) -> Option<&'static str> {
        match self {
            SlotKind::PetFees => Some("Optional, add fees if you allow pet"),
            SlotKind::Parking => Some("optional"),
            SlotKind::EducationalInstitutions
            | SlotKind::Stations
            | SlotKind::Landmarks
            | SlotKind::Utilities
            | SlotKind::Amenities => Some("Optional but recommended"),
            SlotKind::ApplicationAgreements | SlotKind::About => Some("Optional"),
            SlotKind::PropertyAddress
            | SlotKind::LeasingInfo
            | SlotKind::Charges
            | SlotKind::RentReminder => None,
        }
    }

    pub const fn required(self) -> bool {
        matches!(
            self,
            SlotKind::PropertyAddress
                | SlotKind::LeasingInfo
                | SlotKind::Charges
                | SlotKind::RentReminder
        )
    }

    pub const fn cardinality(self) -> Cardinality {
        match self {
            SlotKind::PetFees
            | SlotKind::EducationalInstitutions
            | SlotKind::Stations
            | SlotKind::ApplicationAgreements
            | SlotKind::Landmarks
            | SlotKind::Utilities => Cardinality::List,
            SlotKind::PropertyAddress
            | SlotKind::LeasingInfo
            | SlotKind::Parking
            | SlotKind::Charges
            | SlotKind::RentReminder
            | SlotKind::About
            | SlotKind::Amenities => Cardinality::Single,
        }
    }

    pub const fn is_list(self) -> bool {
        matches!(self.cardinality(), Cardinality::List)
    }

    /// Whether the sub-form offers a delete action for the value being edited.
    pub const fn deletable(self) -> bool {
        self.is_list() || matches!(self, SlotKind::Parking | SlotKind::About)
    }
}

/// Contract shared by every sub-form: a pure validation over the captured input.
pub trait EntityForm: Sized {
    const KIND: SlotKind;

    fn validate(&self) -> Result<(), FieldErrors>;

    /// Hand back the value only when it passes validation.
    fn submit(self) -> Result<Self, FieldErrors> {
        self.validate()?;
        Ok(self)
    }

    /// One-line rendering used on the summary card.
    fn summary(&self) -> String;
}

/// Any sub-form value, tagged by the slot it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Entity {
    PropertyAddress(PropertyAddress),
    PetFees(PetFee),
    LeasingInfo(LeasingInfo),
    Parking(Parking),
    Charges(Charges),
    EducationalInstitutions(EducationalInstitution),
    RentReminder(RentReminder),
    Stations(Station),
    ApplicationAgreements(ApplicationAgreement),
    Landmarks(Landmark),
    About(AboutDescription),
    Utilities(Utility),
    Amenities(AmenitySelection),
}

macro_rules! dispatch {
    ($entity:expr, $value:ident => $body:expr) => {
        match $entity {
            Entity::PropertyAddress($value) => $body,
            Entity::PetFees($value) => $body,
            Entity::LeasingInfo($value) => $body,
            Entity::Parking($value) => $body,
            Entity::Charges($value) => $body,
            Entity::EducationalInstitutions($value) => $body,
            Entity::RentReminder($value) => $body,
            Entity::Stations($value) => $body,
            Entity::ApplicationAgreements($value) => $body,
            Entity::Landmarks($value) => $body,
            Entity::About($value) => $body,
            Entity::Utilities($value) => $body,
            Entity::Amenities($value) => $body,
        }
    };
}

impl Entity {
    pub fn kind(&self) -> SlotKind {
        fn kind_of<T: EntityForm>(_: &T) -> SlotKind {
            T::KIND
        }
        dispatch!(self, value => kind_of(value))
    }

    pub fn validate(&self) -> Result<(), FieldErrors> {
        dispatch!(self, value => value.validate())
    }

    pub fn report(&self) -> ValidationReport {
        ValidationReport::from(self.validate())
    }

    pub fn summary(&self) -> String {
        dispatch!(self, value => value.summary())
    }
}
