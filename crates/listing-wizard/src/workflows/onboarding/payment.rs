//! Third wizard step: plan, billing cycle, card and the mock charge.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::gate::StepGateError;
use super::schema::{FieldCheck, FieldErrors};

static TRANSACTION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanTier {
    Regular,
    Platinum,
    Enterprise,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingCycle {
    #[default]
    Monthly,
    Annually,
}

impl BillingCycle {
    pub const fn label(self) -> &'static str {
        match self {
            BillingCycle::Monthly => "Monthly",
            BillingCycle::Annually => "Annually",
        }
    }
}

impl PlanTier {
    pub const ALL: [PlanTier; 3] = [PlanTier::Regular, PlanTier::Platinum, PlanTier::Enterprise];

    pub const fn name(self) -> &'static str {
        match self {
            PlanTier::Regular => "Regular",
            PlanTier::Platinum => "Platinum",
            PlanTier::Enterprise => "Enterprise",
        }
    }

    /// Monthly price in cents for the given billing cycle.
    pub const fn monthly_price_cents(self, cycle: BillingCycle) -> u64 {
        match (self, cycle) {
            (PlanTier::Regular, BillingCycle::Monthly) => 9_999,
            (PlanTier::Regular, BillingCycle::Annually) => 7_999,
            (PlanTier::Platinum, BillingCycle::Monthly) => 12_999,
            (PlanTier::Platinum, BillingCycle::Annually) => 9_999,
            (PlanTier::Enterprise, BillingCycle::Monthly) => 19_999,
            (PlanTier::Enterprise, BillingCycle::Annually) => 14_999,
        }
    }

    /// Amount charged up front: one month, or twelve at the annual rate.
    pub const fn charge_cents(self, cycle: BillingCycle) -> u64 {
        match cycle {
            BillingCycle::Monthly => self.monthly_price_cents(cycle),
            BillingCycle::Annually => self.monthly_price_cents(cycle) * 12,
        }
    }

    pub const fn features(self) -> &'static [&'static str] {
        match self {
            PlanTier::Regular => &[],
            PlanTier::Platinum => &["Nearby & Essentials", "Comfort & Rules", "Property Gallery"],
            PlanTier::Enterprise => &["All features", "Priority support", "API access"],
        }
    }

    pub const fn description(self) -> &'static str {
        "Price for 1-50 units"
    }
}

pub fn format_price(cents: u64) -> String {
    format!("${}.{:02}", cents / 100, cents % 100)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedCard {
    pub id: String,
    pub holder: String,
    pub card_name: String,
    pub last_digits: String,
}

impl SavedCard {
    fn demo(id: &str, holder: &str, card_name: &str) -> Self {
        Self {
            id: id.to_string(),
            holder: holder.to_string(),
            card_name: card_name.to_string(),
            last_digits: "8565".to_string(),
        }
    }
}

pub fn default_cards() -> Vec<SavedCard> {
    vec![
        SavedCard::demo("amex-0001", "Alex Jones", "Amex card"),
        SavedCard::demo("amex-0002", "Henry Cavil", "Visa card"),
        SavedCard::demo("amex-0003", "Mark Specter", "Master card"),
    ]
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewCard {
    pub card_holder: String,
    pub card_number: String,
    pub expire_date: String,
    pub cvc: String,
}

impl NewCard {
    fn digits(&self) -> String {
        self.card_number.chars().filter(|c| !c.is_whitespace()).collect()
    }

    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut check = FieldCheck::new();
        check
            .required("card_holder", &self.card_holder, "Card holder name is required")
            .required("card_number", &self.card_number, "Card number is required")
            .required("expire_date", &self.expire_date, "Expire date is required")
            .required("cvc", &self.cvc, "CVC is required");

        let digits = self.digits();
        if !digits.is_empty()
            && (!digits.chars().all(|c| c.is_ascii_digit()) || !(12..=19).contains(&digits.len()))
        {
            check.fail("card_number", "Enter a valid card number");
        }
        if !self.expire_date.trim().is_empty() && !valid_expiry(self.expire_date.trim()) {
            check.fail("expire_date", "Expire date must be MM/YY");
        }
        let cvc = self.cvc.trim();
        if !cvc.is_empty() && (!cvc.chars().all(|c| c.is_ascii_digit()) || !(3..=4).contains(&cvc.len()))
        {
            check.fail("cvc", "CVC must be 3 or 4 digits");
        }
        check.finish()
    }

    fn network(&self) -> &'static str {
        let digits = self.digits();
        if digits.starts_with("34") || digits.starts_with("37") {
            "Amex card"
        } else if digits.starts_with('4') {
            "Visa card"
        } else if digits.starts_with('5') {
            "Master card"
        } else {
            "Card"
        }
    }
}

fn valid_expiry(value: &str) -> bool {
    let Some((month, year)) = value.split_once('/') else {
        return false;
    };
    month.len() == 2
        && year.len() == 2
        && year.chars().all(|c| c.is_ascii_digit())
        && matches!(month.parse::<u8>(), Ok(1..=12))
}

/// Tier, cycle and card captured when "Pay" passes its gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSelection {
    pub plan_tier: PlanTier,
    pub billing_cycle: BillingCycle,
    pub card: SavedCard,
}

impl PaymentSelection {
    pub fn amount_cents(&self) -> u64 {
        self.plan_tier.charge_cents(self.billing_cycle)
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PaymentError {
    #[error("unknown payment card '{0}'")]
    UnknownCard(String),
    #[error("{0}")]
    InvalidCard(FieldErrors),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentStep {
    plan_tier: Option<PlanTier>,
    billing_cycle: BillingCycle,
    selected_card_id: Option<String>,
    cards: Vec<SavedCard>,
}

impl Default for PaymentStep {
    fn default() -> Self {
        Self {
            plan_tier: None,
            billing_cycle: BillingCycle::default(),
            selected_card_id: None,
            cards: default_cards(),
        }
    }
}

impl PaymentStep {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plan_tier(&self) -> Option<PlanTier> {
        self.plan_tier
    }

    pub fn billing_cycle(&self) -> BillingCycle {
        self.billing_cycle
    }

    pub fn selected_card_id(&self) -> Option<&str> {
        self.selected_card_id.as_deref()
    }

    pub fn cards(&self) -> &[SavedCard] {
        &self.cards
    }

    pub fn select_tier(&mut self, tier: PlanTier) {
        self.plan_tier = Some(tier);
    }

    pub fn select_cycle(&mut self, cycle: BillingCycle) {
        self.billing_cycle = cycle;
    }

    pub fn select_card(&mut self, card_id: &str) -> Result<(), PaymentError> {
        if !self.cards.iter().any(|card| card.id == card_id) {
            return Err(PaymentError::UnknownCard(card_id.to_string()));
        }
        self.selected_card_id = Some(card_id.to_string());
        Ok(())
    }

    pub fn add_card(&mut self, card: NewCard) -> Result<SavedCard, PaymentError> {
        card.validate().map_err(PaymentError::InvalidCard)?;
        let digits = card.digits();
        let saved = SavedCard {
            id: format!("card-{:04}", self.cards.len() + 1),
            holder: card.card_holder.trim().to_string(),
            card_name: card.network().to_string(),
            last_digits: digits[digits.len() - 4..].to_string(),
        };
        self.cards.push(saved.clone());
        Ok(saved)
    }

    /// Gate for "Pay": a tier first, then a card.
    pub fn checkout(&self) -> Result<PaymentSelection, StepGateError> {
        let plan_tier = self.plan_tier.ok_or(StepGateError::PlanRequired)?;
        let card = self
            .selected_card_id
            .as_deref()
            .and_then(|id| self.cards.iter().find(|card| card.id == id))
            .ok_or(StepGateError::CardRequired)?;

        Ok(PaymentSelection {
            plan_tier,
            billing_cycle: self.billing_cycle,
            card: card.clone(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChargeRequest {
    pub amount_cents: u64,
    pub currency: &'static str,
    pub card_id: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentReceipt {
    pub transaction_id: String,
    pub amount_cents: u64,
    pub card_id: String,
    pub charged_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GatewayError {
    #[error("card declined: {0}")]
    Declined(String),
    #[error("payment gateway unavailable: {0}")]
    Unavailable(String),
}

pub trait PaymentGateway: Send + Sync {
    fn charge(&self, request: &ChargeRequest) -> Result<PaymentReceipt, GatewayError>;
}

/// Approves every charge unless built with a decline reason.
#[derive(Debug, Clone, Default)]
pub struct MockPaymentGateway {
    decline_reason: Option<String>,
}

impl MockPaymentGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declining(reason: impl Into<String>) -> Self {
        Self {
            decline_reason: Some(reason.into()),
        }
    }
}

impl PaymentGateway for MockPaymentGateway {
    fn charge(&self, request: &ChargeRequest) -> Result<PaymentReceipt, GatewayError> {
        if let Some(reason) = &self.decline_reason {
            return Err(GatewayError::Declined(reason.clone()));
        }

        let id = TRANSACTION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
        Ok(PaymentReceipt {
            transaction_id: format!("txn-{id:06}"),
            amount_cents: request.amount_cents,
            card_id: request.card_id.clone(),
            charged_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn annual_billing_charges_twelve_discounted_months() {
        assert_eq!(format_price(PlanTier::Platinum.monthly_price_cents(BillingCycle::Monthly)), "$129.99");
        assert_eq!(PlanTier::Regular.charge_cents(BillingCycle::Annually), 95_988);
        assert_eq!(format_price(PlanTier::Enterprise.monthly_price_cents(BillingCycle::Annually)), "$149.99");
    }

    #[test]
    fn new_card_rules() {
        let card = NewCard {
            card_holder: "Nadia Rahman".to_string(),
            card_number: "4111 1111 1111 1111".to_string(),
            expire_date: "13/27".to_string(),
            cvc: "12".to_string(),
        };
        let errors = card.validate().expect_err("bad expiry and cvc");
        assert_eq!(errors.get("expire_date"), Some("Expire date must be MM/YY"));
        assert_eq!(errors.get("cvc"), Some("CVC must be 3 or 4 digits"));
        assert!(!errors.contains("card_number"));
    }

    #[test]
    fn added_card_joins_list_with_last_digits() {
        let mut step = PaymentStep::new();
        let saved = step
            .add_card(NewCard {
                card_holder: "Nadia Rahman".to_string(),
                card_number: "4111 1111 1111 4242".to_string(),
                expire_date: "09/28".to_string(),
                cvc: "123".to_string(),
            })
            .expect("valid card");
        assert_eq!(saved.id, "card-0004");
        assert_eq!(saved.card_name, "Visa card");
        assert_eq!(saved.last_digits, "4242");
        assert_eq!(step.cards().len(), 4);
        step.select_card("card-0004").expect("new card selectable");
    }

    #[test]
    fn checkout_requires_plan_then_card() {
        let mut step = PaymentStep::new();
        assert_eq!(step.checkout(), Err(StepGateError::PlanRequired));

        step.select_tier(PlanTier::Regular);
        assert_eq!(step.checkout(), Err(StepGateError::CardRequired));

        assert_eq!(
            step.select_card("amex-9999"),
            Err(PaymentError::UnknownCard("amex-9999".to_string()))
        );
        step.select_card("amex-0002").expect("demo card");
        let selection = step.checkout().expect("gate passes");
        assert_eq!(selection.card.holder, "Henry Cavil");
        assert_eq!(selection.amount_cents(), 9_999);
    }

    #[test]
    fn declining_gateway_reports_reason() {
        let gateway = MockPaymentGateway::declining("insufficient funds");
        let request = ChargeRequest {
            amount_cents: 9_999,
            currency: "USD",
            card_id: "amex-0001".to_string(),
            description: "Regular plan".to_string(),
        };
        assert_eq!(
            gateway.charge(&request),
            Err(GatewayError::Declined("insufficient funds".to_string()))
        );
        let receipt = MockPaymentGateway::new().charge(&request).expect("approved");
        assert!(receipt.transaction_id.starts_with("txn-"));
    }
}
