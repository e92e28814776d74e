use crate::infra::{InMemoryNotifier, InMemorySessionRepository};
use clap::{Args, ValueEnum};
use listing_wizard::error::AppError;
use listing_wizard::workflows::onboarding::{
    format_price, BillingCycle, Charges, Entity, FileHandle, LandlordVerification, LeasingInfo,
    MediaSlot, MockPaymentGateway, OnboardingService, OnboardingServiceError, PetFee, PlanTier,
    PropertyAddress, PropertyType, RentReminder, RoleVerification, SessionId, SessionView,
    SlotKind, SubmitterRole, WizardCommand,
};
use std::sync::Arc;

type DemoService = OnboardingService<InMemorySessionRepository, InMemoryNotifier, MockPaymentGateway>;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Plan to purchase on the payment step.
    #[arg(long, value_enum, default_value_t = DemoPlan::Platinum)]
    pub(crate) plan: DemoPlan,
    /// Bill annually instead of monthly.
    #[arg(long)]
    pub(crate) annual: bool,
    /// Use a gateway that declines every charge.
    #[arg(long)]
    pub(crate) decline: bool,
    /// Print the final session view as JSON.
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub(crate) enum DemoPlan {
    Regular,
    #[default]
    Platinum,
    Enterprise,
}

impl From<DemoPlan> for PlanTier {
    fn from(value: DemoPlan) -> Self {
        match value {
            DemoPlan::Regular => PlanTier::Regular,
            DemoPlan::Platinum => PlanTier::Platinum,
            DemoPlan::Enterprise => PlanTier::Enterprise,
        }
    }
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let gateway = if args.decline {
        MockPaymentGateway::declining("demo gateway declines all cards")
    } else {
        MockPaymentGateway::new()
    };
    let notifier = Arc::new(InMemoryNotifier::default());
    let service: DemoService = OnboardingService::new(
        Arc::new(InMemorySessionRepository::with_capacity(
            1,
            chrono::Duration::hours(1),
        )),
        notifier.clone(),
        Arc::new(gateway),
    );

    let session = service.start()?;
    let id = session.session_id.clone();
    println!("Listing onboarding demo (session {id})");

    println!("\nStep 1: property category");
    attempt(
        &service,
        &notifier,
        &id,
        WizardCommand::SelectRole {
            role: SubmitterRole::Landlord,
        },
    );
    for command in [
        WizardCommand::SelectProperty {
            property_type: PropertyType::Condo,
        },
        WizardCommand::SelectRole {
            role: SubmitterRole::Landlord,
        },
        WizardCommand::UpdateVerification {
            draft: RoleVerification::Landlord(LandlordVerification {
                ownership_doc: Some(FileHandle::new("ownership.pdf", "application/pdf")),
            }),
        },
        WizardCommand::AcceptTerms { accepted: true },
        WizardCommand::GetStarted,
    ] {
        attempt(&service, &notifier, &id, command);
    }

    println!("\nStep 2: condominium details");
    attempt(&service, &notifier, &id, WizardCommand::Next);
    for entity in demo_entities() {
        attempt(
            &service,
            &notifier,
            &id,
            WizardCommand::OpenForm {
                kind: entity.kind(),
                index: None,
            },
        );
        attempt(&service, &notifier, &id, WizardCommand::SubmitForm { entity });
    }
    attempt(
        &service,
        &notifier,
        &id,
        WizardCommand::UploadMedia {
            slot: MediaSlot::FeaturedPhoto,
            index: Some(0),
            file: FileHandle::new("lobby.jpg", "image/jpeg"),
        },
    );
    let view = service.get(&id)?;
    for summary in view.condominium.slots.iter().filter(|summary| summary.populated) {
        println!("  {}", summary.label);
        for line in &summary.lines {
            println!("    - {line}");
        }
    }
    attempt(&service, &notifier, &id, WizardCommand::Next);

    println!("\nStep 3: payment");
    let tier = PlanTier::from(args.plan);
    let cycle = if args.annual {
        BillingCycle::Annually
    } else {
        BillingCycle::Monthly
    };
    println!(
        "  {} plan at {}/month, {} due today",
        tier.name(),
        format_price(tier.monthly_price_cents(cycle)),
        format_price(tier.charge_cents(cycle))
    );
    attempt(&service, &notifier, &id, WizardCommand::SelectTier { tier });
    attempt(&service, &notifier, &id, WizardCommand::SelectCycle { cycle });
    attempt(&service, &notifier, &id, WizardCommand::Pay);
    attempt(
        &service,
        &notifier,
        &id,
        WizardCommand::SelectCard {
            card_id: "amex-0001".to_string(),
        },
    );
    attempt(&service, &notifier, &id, WizardCommand::Pay);

    let view = service.get(&id)?;
    render_outcome(&view);
    if args.json {
        match serde_json::to_string_pretty(&view) {
            Ok(json) => println!("\n{json}"),
            Err(err) => println!("\nSession view unavailable: {err}"),
        }
    }
    Ok(())
}

fn attempt(
    service: &DemoService,
    notifier: &InMemoryNotifier,
    id: &SessionId,
    command: WizardCommand,
) {
    let name = command.name();
    match service.apply(id, command) {
        Ok(view) => println!("  {name}: ok (now on {})", view.route),
        Err(OnboardingServiceError::Wizard(err)) => match err.field_errors() {
            Some(fields) => println!("  {name}: rejected ({err}) {fields:?}"),
            None => println!("  {name}: rejected ({err})"),
        },
        Err(err) => println!("  {name}: failed ({err})"),
    }
    for notification in notifier.take() {
        println!("    [{:?}] {}", notification.level, notification.message);
    }
}

fn render_outcome(view: &SessionView) {
    println!();
    match &view.submission {
        Some(submission) => {
            println!(
                "Listing '{}' submitted by {} for a {}",
                submission.property.property_address.property_name,
                submission.category.role.label(),
                submission.category.property_type.label()
            );
            println!(
                "Charged {} to {} (transaction {}, {})",
                format_price(submission.receipt.amount_cents),
                submission.receipt.card_id,
                submission.receipt.transaction_id,
                submission.receipt.charged_at.format("%Y-%m-%d %H:%M UTC")
            );
        }
        None => println!("Listing not submitted; the wizard is still on {}", view.route),
    }
}

fn demo_entities() -> Vec<Entity> {
    let mut leasing = LeasingInfo {
        manager_name: "Tania Hossain".to_string(),
        contact_email: "leasing@greenview.example".to_string(),
        ..LeasingInfo::default()
    };
    leasing.enter_phone_number("1912345678");

    vec![
        Entity::PropertyAddress(PropertyAddress {
            property_name: "Greenview Residences".to_string(),
            total_units: "32".to_string(),
            website: Some("https://greenview.example".to_string()),
            country: "Bangladesh".to_string(),
            street_address: "21 Gulshan Avenue".to_string(),
            unit_number: None,
            city: "Dhaka".to_string(),
            state: "Dhaka".to_string(),
            zip_code: "1212".to_string(),
        }),
        Entity::LeasingInfo(leasing),
        Entity::Charges(Charges {
            application_fee: "150".to_string(),
            admin_fee: "35".to_string(),
        }),
        Entity::RentReminder(RentReminder {
            payment_frequency: "Monthly".to_string(),
            reminder_date: "2026-10-25".to_string(),
            due_date: "2026-11-01".to_string(),
        }),
        Entity::PetFees(PetFee {
            pet_type: "Dog".to_string(),
            max_weight: "50".to_string(),
            one_time_fee: "100".to_string(),
            security_deposit: "200".to_string(),
            monthly_rent: "25".to_string(),
        }),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_entities_cover_required_slots() {
        let kinds: Vec<SlotKind> = demo_entities().iter().map(Entity::kind).collect();
        for kind in SlotKind::ALL.into_iter().filter(|kind| kind.required()) {
            assert!(kinds.contains(&kind), "{} missing", kind.label());
        }
        assert!(demo_entities().iter().all(|entity| entity.validate().is_ok()));
    }

    #[test]
    fn demo_runs_through_payment() {
        run_demo(DemoArgs::default()).expect("demo completes");
    }
}
