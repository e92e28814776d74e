//! Field rules shared by every sub-form.
//!
//! Each sub-form describes its rules with a [`FieldCheck`] and gets back either `Ok(())`
//! or the [`FieldErrors`] map that the client renders beneath the offending inputs.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

use mime::Mime;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::catalog;

/// Field name to message map; only the first failing rule per field is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.insert(field, message);
        errors
    }

    pub fn insert(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

/// Outcome of live validation, mirroring what the form renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub field_errors: FieldErrors,
}

impl From<Result<(), FieldErrors>> for ValidationReport {
    fn from(result: Result<(), FieldErrors>) -> Self {
        match result {
            Ok(()) => Self {
                valid: true,
                field_errors: FieldErrors::new(),
            },
            Err(field_errors) => Self {
                valid: false,
                field_errors,
            },
        }
    }
}

/// Selected file as reported by the picker; nothing is uploaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileHandle {
    pub name: String,
    pub mime_type: String,
}

impl FileHandle {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
        }
    }

    pub fn media_type(&self) -> Option<Mime> {
        self.mime_type.trim().parse().ok()
    }
}

/// Accepted MIME families for file inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MimeGroup {
    Document,
    Photo,
    Video,
}

impl MimeGroup {
    /// Value for the picker's `accept` attribute.
    pub const fn accept(self) -> &'static str {
        match self {
            MimeGroup::Document => "application/pdf",
            MimeGroup::Photo => "image/jpeg,image/png",
            MimeGroup::Video => "video/mp4,video/quicktime",
        }
    }

    pub const fn mismatch_message(self) -> &'static str {
        match self {
            MimeGroup::Document => "Only PDF files are allowed",
            MimeGroup::Photo => "Only JPEG or PNG images are allowed",
            MimeGroup::Video => "Only MP4 or MOV videos are allowed",
        }
    }

    pub fn accepts(self, file: &FileHandle) -> bool {
        let Some(media_type) = file.media_type() else {
            return false;
        };
        let subtype = media_type.subtype().as_str();

        match self {
            MimeGroup::Document => {
                media_type.type_() == mime::APPLICATION && subtype == mime::PDF.as_str()
            }
            MimeGroup::Photo => {
                media_type.type_() == mime::IMAGE
                    && (subtype == mime::JPEG.as_str() || subtype == mime::PNG.as_str())
            }
            MimeGroup::Video => {
                media_type.type_() == mime::VIDEO
                    && (subtype == mime::MP4.as_str() || subtype == "quicktime")
            }
        }
    }
}

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("email pattern compiles")
    })
}

fn url_pattern() -> &'static Regex {
    static URL: OnceLock<Regex> = OnceLock::new();
    URL.get_or_init(|| Regex::new(r"^https?://[^\s/$.?#].[^\s]*$").expect("url pattern compiles"))
}

fn amount_pattern() -> &'static Regex {
    static AMOUNT: OnceLock<Regex> = OnceLock::new();
    AMOUNT.get_or_init(|| {
        Regex::new(r"^\$?\s*\d+(,\d{3})*(\.\d+)?$")
            .expect("amount pattern compiles")
    })
}

pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

pub fn is_email(value: &str) -> bool {
    email_pattern().is_match(value.trim())
}

pub fn is_url(value: &str) -> bool {
    url_pattern().is_match(value.trim())
}

/// Digits with an optional `$`, thousands separators and decimal part.
pub fn is_amount(value: &str) -> bool {
    amount_pattern().is_match(value.trim())
}

pub fn is_whole_number(value: &str) -> bool {
    let value = value.trim();
    !value.is_empty() && value.chars().all(|c| c.is_ascii_digit())
}

/// Moves a phone number to another dial code, keeping the subscriber digits.
pub fn swap_dial_code(number: &str, old_code: &str, new_code: &str) -> String {
    let subscriber = number.strip_prefix(old_code).unwrap_or(number);
    format!("{}{subscriber}", new_code.trim())
}

/// Typed phone input always carries the dial code; input shorter than it is dropped.
pub fn prefixed_phone(code: &str, input: &str) -> Option<String> {
    if input.len() < code.len() {
        return None;
    }
    if input.starts_with(code) {
        Some(input.to_string())
    } else {
        Some(format!("{code}{input}"))
    }
}

/// Accumulates rule failures for one form.
///
/// Rules after the first failure on a field are still evaluated but their messages are
/// dropped, so the order of calls decides which message wins.
#[derive(Debug, Default)]
pub struct FieldCheck {
    errors: FieldErrors,
}

impl FieldCheck {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail(&mut self, field: &str, message: impl Into<String>) -> &mut Self {
        self.errors.insert(field, message);
        self
    }

    pub fn required(&mut self, field: &str, value: &str, message: &str) -> &mut Self {
        if is_blank(value) {
            self.fail(field, message);
        }
        self
    }

    pub fn email(&mut self, field: &str, value: &str, message: &str) -> &mut Self {
        if !is_email(value) {
            self.fail(field, message);
        }
        self
    }

    pub fn amount(&mut self, field: &str, value: &str, message: &str) -> &mut Self {
        if !is_blank(value) && !is_amount(value) {
            self.fail(field, message);
        }
        self
    }

    pub fn whole_number(&mut self, field: &str, value: &str, message: &str) -> &mut Self {
        if !is_blank(value) && !is_whole_number(value) {
            self.fail(field, message);
        }
        self
    }

    pub fn optional_url(&mut self, field: &str, value: Option<&str>, message: &str) -> &mut Self {
        if let Some(value) = value.filter(|value| !is_blank(value)) {
            if !is_url(value) {
                self.fail(field, message);
            }
        }
        self
    }

    /// Character-count bounds, counted on the raw value.
    pub fn length_between(
        &mut self,
        field: &str,
        value: &str,
        min: usize,
        max: usize,
        too_short: &str,
        too_long: &str,
    ) -> &mut Self {
        let count = value.chars().count();
        if count < min {
            self.fail(field, too_short);
        } else if count > max {
            self.fail(field, too_long);
        }
        self
    }

    pub fn one_of(&mut self, field: &str, value: &str, options: &[&str], message: &str) -> &mut Self {
        if !is_blank(value) && !options.iter().any(|option| *option == value.trim()) {
            self.fail(field, message);
        }
        self
    }

    pub fn accepted(&mut self, field: &str, value: bool, message: &str) -> &mut Self {
        if !value {
            self.fail(field, message);
        }
        self
    }

    pub fn file(
        &mut self,
        field: &str,
        file: Option<&FileHandle>,
        group: MimeGroup,
        missing: &str,
    ) -> &mut Self {
        match file {
            None => self.fail(field, missing),
            Some(file) => self.optional_file(field, Some(file), group),
        }
    }

    pub fn optional_file(
        &mut self,
        field: &str,
        file: Option<&FileHandle>,
        group: MimeGroup,
    ) -> &mut Self {
        if let Some(file) = file {
            if !group.accepts(file) {
                self.fail(field, group.mismatch_message());
            }
        }
        self
    }

    /// Country must be in the catalog; state follows the country's subdivision policy.
    pub fn region(&mut self, country_field: &str, country: &str, state_field: &str, state: &str) -> &mut Self {
        self.required(country_field, country, "Country is required");
        let Some(entry) = catalog::find_country(country) else {
            if !is_blank(country) {
                self.fail(country_field, "Select a supported country");
            }
            self.required(state_field, state, "State is required");
            return self;
        };

        if entry.subdivisions.is_empty() {
            if !is_blank(state) {
                self.fail(
                    state_field,
                    format!("{} has no states or territories", entry.name),
                );
            }
        } else {
            self.required(state_field, state, "State is required");
            if !is_blank(state) && !entry.subdivisions.iter().any(|s| *s == state.trim()) {
                self.fail(state_field, format!("Select a state in {}", entry.name));
            }
        }
        self
    }

    /// Phone numbers carry their dial code as a prefix.
    pub fn phone(
        &mut self,
        code_field: &str,
        code: &str,
        number_field: &str,
        number: &str,
    ) -> &mut Self {
        self.required(code_field, code, "Phone code is required");
        if !is_blank(code) && catalog::find_dial_code(code).is_none() {
            self.fail(code_field, "Select a supported phone code");
        }

        let subscriber = number.trim().strip_prefix(code.trim()).unwrap_or(number.trim());
        let subscriber_digits: String = subscriber
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
            .collect();
        if subscriber_digits.is_empty() {
            self.fail(number_field, "Phone number is required");
            return self;
        }

        let total_digits = code.chars().filter(char::is_ascii_digit).count()
            + subscriber_digits.len();
        if !subscriber_digits.chars().all(|c| c.is_ascii_digit()) || !(7..=15).contains(&total_digits)
        {
            self.fail(number_field, "Enter a valid phone number");
        }
        self
    }

    pub fn finish(self) -> Result<(), FieldErrors> {
        self.errors.into_result()
    }
}
