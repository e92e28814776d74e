//! Option sets offered by the wizard's select inputs.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Country {
    pub name: &'static str,
    pub iso_code: &'static str,
    pub dial_code: &'static str,
    pub subdivisions: &'static [&'static str],
}

pub const COUNTRIES: &[Country] = &[
    Country {
        name: "Bangladesh",
        iso_code: "BD",
        dial_code: "+880",
        subdivisions: &["Dhaka"],
    },
    Country {
        name: "Palestine",
        iso_code: "PS",
        dial_code: "+970",
        subdivisions: &["Gaza"],
    },
    Country {
        name: "Iran",
        iso_code: "IR",
        dial_code: "+98",
        subdivisions: &["Tehran"],
    },
    Country {
        name: "Iraq",
        iso_code: "IQ",
        dial_code: "+964",
        subdivisions: &[],
    },
];

pub const DEFAULT_DIAL_CODE: &str = "+880";

pub const PET_TYPES: &[&str] = &["Dog", "Cat", "Rabbit", "Bird"];

pub const GUEST_PARKING_TIMES: &[&str] = &["1H", "2H", "3H", "4H"];

pub const DEFAULT_GUEST_PARKING_TIME: &str = "2H";

pub const PAYMENT_FREQUENCIES: &[&str] = &["Monthly", "Bi-weekly", "Weekly"];

pub const APPLICATION_FEES: &[&str] = &["100", "150", "200"];

pub const UTILITY_TYPES: &[&str] = &[
    "Internet-Utilities company",
    "Cable-Utilities company",
    "Electricity-Utilities company",
];

pub const AMENITIES: &[&str] = &[
    "Air Conditioning",
    "Cable Ready",
    "Ceiling Fan",
    "High Ceilings",
    "Private Balcony",
    "Refrigerator",
    "Wooded Views",
    "Washer/Dryer Hookup",
    "Hardwood Floor (Home)",
    "Fireplace (Home)",
    "First Aid Kit",
    "Carbon Monoxide Alarm",
    "Expanded Patios (Home)",
    "Free Parking on Premises",
    "Fire Extinguisher",
];

pub fn find_country(name: &str) -> Option<&'static Country> {
    let name = name.trim();
    COUNTRIES
        .iter()
        .find(|country| country.name.eq_ignore_ascii_case(name))
}

pub fn find_dial_code(code: &str) -> Option<&'static Country> {
    let code = code.trim();
    COUNTRIES.iter().find(|country| country.dial_code == code)
}

/// Subdivisions for a country; unknown countries have none to offer.
pub fn subdivisions_of(country: &str) -> &'static [&'static str] {
    find_country(country)
        .map(|country| country.subdivisions)
        .unwrap_or(&[])
}

/// Case-insensitive substring search over the amenity labels.
pub fn search_amenities(term: &str) -> Vec<&'static str> {
    let needle = term.trim().to_lowercase();
    AMENITIES
        .iter()
        .copied()
        .filter(|label| label.to_lowercase().contains(&needle))
        .collect()
}
