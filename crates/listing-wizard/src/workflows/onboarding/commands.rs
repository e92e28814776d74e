use serde::{Deserialize, Serialize};

use super::category::PropertyType;
use super::entities::{Entity, SlotKind};
use super::gallery::MediaSlot;
use super::payment::{BillingCycle, NewCard, PlanTier};
use super::roles::{RoleVerification, SubmitterRole};
use super::schema::FileHandle;
use super::session::WizardRoute;

/// One user interaction with the wizard, tagged by `type` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WizardCommand {
    SelectProperty {
        property_type: PropertyType,
    },
    SelectRole {
        role: SubmitterRole,
    },
    UpdateVerification {
        draft: RoleVerification,
    },
    AcceptTerms {
        accepted: bool,
    },
    GetStarted,
    OpenForm {
        kind: SlotKind,
        #[serde(default)]
        index: Option<usize>,
    },
    SubmitForm {
        entity: Entity,
    },
    CancelForm,
    DeleteFromForm,
    DeleteEntity {
        kind: SlotKind,
        index: usize,
    },
    ClearEntity {
        kind: SlotKind,
    },
    RemoveAmenity {
        index: usize,
    },
    UploadMedia {
        slot: MediaSlot,
        #[serde(default)]
        index: Option<usize>,
        file: FileHandle,
    },
    RemoveMedia {
        slot: MediaSlot,
        #[serde(default)]
        index: Option<usize>,
    },
    Next,
    SelectTier {
        tier: PlanTier,
    },
    SelectCycle {
        cycle: BillingCycle,
    },
    SelectCard {
        card_id: String,
    },
    AddCard {
        card: NewCard,
    },
    Pay,
    Back,
}

impl WizardCommand {
    /// Step the command belongs to; `None` for navigation that works anywhere.
    pub fn step(&self) -> Option<WizardRoute> {
        use WizardCommand::*;

        match self {
            SelectProperty { .. }
            | SelectRole { .. }
            | UpdateVerification { .. }
            | AcceptTerms { .. }
            | GetStarted => Some(WizardRoute::Category),
            OpenForm { .. }
            | SubmitForm { .. }
            | CancelForm
            | DeleteFromForm
            | DeleteEntity { .. }
            | ClearEntity { .. }
            | RemoveAmenity { .. }
            | UploadMedia { .. }
            | RemoveMedia { .. }
            | Next => Some(WizardRoute::Condominiums),
            SelectTier { .. } | SelectCycle { .. } | SelectCard { .. } | AddCard { .. } | Pay => {
                Some(WizardRoute::Payment)
            }
            Back => None,
        }
    }

    pub fn name(&self) -> &'static str {
        use WizardCommand::*;

        match self {
            SelectProperty { .. } => "select_property",
            SelectRole { .. } => "select_role",
            UpdateVerification { .. } => "update_verification",
            AcceptTerms { .. } => "accept_terms",
            GetStarted => "get_started",
            OpenForm { .. } => "open_form",
            SubmitForm { .. } => "submit_form",
            CancelForm => "cancel_form",
            DeleteFromForm => "delete_from_form",
            DeleteEntity { .. } => "delete_entity",
            ClearEntity { .. } => "clear_entity",
            RemoveAmenity { .. } => "remove_amenity",
            UploadMedia { .. } => "upload_media",
            RemoveMedia { .. } => "remove_media",
            Next => "next",
            SelectTier { .. } => "select_tier",
            SelectCycle { .. } => "select_cycle",
            SelectCard { .. } => "select_card",
            AddCard { .. } => "add_card",
            Pay => "pay",
            Back => "back",
        }
    }
}
