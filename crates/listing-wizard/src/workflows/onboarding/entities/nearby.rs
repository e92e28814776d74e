use serde::{Deserialize, Serialize};

use super::{EntityForm, SlotKind};
use crate::workflows::onboarding::schema::{FieldCheck, FieldErrors};

/// Type, distance and name share one rule set across the three "nearest" forms.
struct Nearby<'a> {
    type_field: &'a str,
    type_value: &'a str,
    type_missing: &'a str,
    name_field: &'a str,
    name_value: &'a str,
    name_missing: &'a str,
    distance: &'a str,
}

impl Nearby<'_> {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut check = FieldCheck::new();
        check
            .required(self.type_field, self.type_value, self.type_missing)
            .required("distance", self.distance, "Distance is required")
            .amount("distance", self.distance, "Distance must be a number of miles")
            .required(self.name_field, self.name_value, self.name_missing);
        check.finish()
    }

    fn summary(&self) -> String {
        format!(
            "{} ({}) - {} mile",
            self.name_value.trim(),
            self.type_value.trim(),
            self.distance.trim()
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Landmark {
    pub landmark_type: String,
    pub distance: String,
    pub landmark_name: String,
}

impl Landmark {
    fn fields(&self) -> Nearby<'_> {
        Nearby {
            type_field: "landmark_type",
            type_value: &self.landmark_type,
            type_missing: "Landmark type is required",
            name_field: "landmark_name",
            name_value: &self.landmark_name,
            name_missing: "Landmark name is required",
            distance: &self.distance,
        }
    }
}

impl EntityForm for Landmark {
    const KIND: SlotKind = SlotKind::Landmarks;

    fn validate(&self) -> Result<(), FieldErrors> {
        self.fields().validate()
    }

    fn summary(&self) -> String {
        self.fields().summary()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Station {
    pub station_type: String,
    pub distance: String,
    pub station_name: String,
}

impl Station {
    fn fields(&self) -> Nearby<'_> {
        Nearby {
            type_field: "station_type",
            type_value: &self.station_type,
            type_missing: "Station type is required",
            name_field: "station_name",
            name_value: &self.station_name,
            name_missing: "Station name is required",
            distance: &self.distance,
        }
    }
}

impl EntityForm for Station {
    const KIND: SlotKind = SlotKind::Stations;

    fn validate(&self) -> Result<(), FieldErrors> {
        self.fields().validate()
    }

    fn summary(&self) -> String {
        self.fields().summary()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationalInstitution {
    pub institution_type: String,
    pub distance: String,
    pub institution_name: String,
}

impl EducationalInstitution {
    fn fields(&self) -> Nearby<'_> {
        Nearby {
            type_field: "institution_type",
            type_value: &self.institution_type,
            type_missing: "Institution type is required",
            name_field: "institution_name",
            name_value: &self.institution_name,
            name_missing: "Institution name is required",
            distance: &self.distance,
        }
    }
}

impl EntityForm for EducationalInstitution {
    const KIND: SlotKind = SlotKind::EducationalInstitutions;

    fn validate(&self) -> Result<(), FieldErrors> {
        self.fields().validate()
    }

    fn summary(&self) -> String {
        self.fields().summary()
    }
}
