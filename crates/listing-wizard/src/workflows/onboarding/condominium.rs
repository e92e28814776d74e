//! Second wizard step: property details captured through one shared modal.

use serde::{Deserialize, Serialize};

use super::entities::{
    AboutDescription, AmenitySelection, ApplicationAgreement, Charges, EducationalInstitution,
    Entity, Landmark, LeasingInfo, Parking, PetFee, PropertyAddress, RentReminder, SlotKind,
    Station, Utility,
};
use super::gallery::{MediaError, MediaGallery, MediaSlot};
use super::gate::StepGateError;
use super::schema::{FieldErrors, FileHandle};
use super::slots::{ListingSlots, SlotError, SlotSummary};

/// What the open modal is editing: a slot, and for list slots the item index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModalTarget {
    pub kind: SlotKind,
    pub editing_index: Option<usize>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CondominiumError {
    #[error("no form is open")]
    ModalClosed,
    #[error("the open form is {}, not {}", expected.label(), found.label())]
    KindMismatch { expected: SlotKind, found: SlotKind },
    #[error("{0}")]
    Invalid(FieldErrors),
    #[error("{} cannot be deleted", kind.label())]
    NotDeletable { kind: SlotKind },
    #[error(transparent)]
    Slot(#[from] SlotError),
    #[error(transparent)]
    Media(#[from] MediaError),
}

/// Everything the payment step needs from the condominium page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDetails {
    pub property_address: PropertyAddress,
    pub leasing_info: LeasingInfo,
    pub charges: Charges,
    pub rent_reminder: RentReminder,
    pub parking: Option<Parking>,
    pub about: Option<AboutDescription>,
    pub amenities: Option<AmenitySelection>,
    pub pet_fees: Vec<PetFee>,
    pub educational_institutions: Vec<EducationalInstitution>,
    pub stations: Vec<Station>,
    pub landmarks: Vec<Landmark>,
    pub application_agreements: Vec<ApplicationAgreement>,
    pub utilities: Vec<Utility>,
    pub gallery: MediaGallery,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CondominiumStep {
    slots: ListingSlots,
    gallery: MediaGallery,
    modal: Option<ModalTarget>,
}

impl CondominiumStep {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slots(&self) -> &ListingSlots {
        &self.slots
    }

    pub fn gallery(&self) -> &MediaGallery {
        &self.gallery
    }

    pub fn modal(&self) -> Option<ModalTarget> {
        self.modal
    }

    pub fn summaries(&self) -> Vec<SlotSummary> {
        self.slots.summaries()
    }

    /// Opens the modal and returns the value to prefill it with.
    ///
    /// Singleton slots ignore the index and prefill their current value; list slots
    /// open empty for "Add" and with the stored item for "Edit".
    pub fn open(
        &mut self,
        kind: SlotKind,
        index: Option<usize>,
    ) -> Result<Option<Entity>, CondominiumError> {
        let editing_index = if kind.is_list() { index } else { None };
        let prefill = self.slots.entity_at(kind, editing_index)?;
        self.modal = Some(ModalTarget {
            kind,
            editing_index,
        });
        Ok(prefill)
    }

    /// Validates and stores the value; invalid input keeps the modal open.
    pub fn submit_modal(&mut self, entity: Entity) -> Result<Option<usize>, CondominiumError> {
        let target = self.modal.ok_or(CondominiumError::ModalClosed)?;
        if entity.kind() != target.kind {
            return Err(CondominiumError::KindMismatch {
                expected: target.kind,
                found: entity.kind(),
            });
        }
        entity.validate().map_err(CondominiumError::Invalid)?;

        let stored_at = match (target.kind.is_list(), target.editing_index) {
            (true, None) => Some(self.slots.add_entity(entity)?),
            (true, Some(index)) => {
                self.slots.update_entity(index, entity)?;
                Some(index)
            }
            (false, _) => {
                self.slots.set_singleton(entity)?;
                None
            }
        };
        self.modal = None;
        Ok(stored_at)
    }

    pub fn cancel_modal(&mut self) {
        self.modal = None;
    }

    /// Delete button inside the modal: drops the value being edited and closes.
    pub fn delete_from_modal(&mut self) -> Result<Option<Entity>, CondominiumError> {
        let target = self.modal.ok_or(CondominiumError::ModalClosed)?;
        if !target.kind.deletable() {
            return Err(CondominiumError::NotDeletable { kind: target.kind });
        }

        let removed = match (target.kind.is_list(), target.editing_index) {
            (true, Some(index)) => self.slots.remove_entity(target.kind, index)?,
            (true, None) => None,
            (false, _) => self.slots.clear_singleton(target.kind)?,
        };
        self.modal = None;
        Ok(removed)
    }

    /// Card delete for list items; a missing index is a no-op.
    pub fn delete_entity(
        &mut self,
        kind: SlotKind,
        index: usize,
    ) -> Result<Option<Entity>, CondominiumError> {
        Ok(self.slots.remove_entity(kind, index)?)
    }

    /// Card delete for the clearable singletons (Parking, About).
    pub fn clear_entity(&mut self, kind: SlotKind) -> Result<Option<Entity>, CondominiumError> {
        if kind.is_list() || !kind.deletable() {
            return Err(CondominiumError::NotDeletable { kind });
        }
        Ok(self.slots.clear_singleton(kind)?)
    }

    pub fn remove_amenity(&mut self, index: usize) -> Option<String> {
        self.slots.remove_amenity(index)
    }

    pub fn upload_media(
        &mut self,
        slot: MediaSlot,
        index: Option<usize>,
        file: FileHandle,
    ) -> Result<(), CondominiumError> {
        Ok(self.gallery.upload(slot, index, file)?)
    }

    pub fn remove_media(
        &mut self,
        slot: MediaSlot,
        index: Option<usize>,
    ) -> Result<Option<FileHandle>, CondominiumError> {
        Ok(self.gallery.remove(slot, index)?)
    }

    /// Labels of every required slot still empty, plus the featured photo requirement.
    pub fn missing_required(&self) -> Vec<String> {
        let mut labels: Vec<String> = self
            .slots
            .missing_required()
            .into_iter()
            .map(|kind| kind.label().to_string())
            .collect();
        if !self.gallery.has_featured_photo() {
            labels.push(MediaSlot::FeaturedPhoto.label().to_string());
        }
        labels
    }

    pub fn next(&self) -> Result<PropertyDetails, StepGateError> {
        let labels = self.missing_required();
        let slots = &self.slots;
        let (Some(property_address), Some(leasing_info), Some(charges), Some(rent_reminder)) = (
            slots.property_address.clone(),
            slots.leasing_info.clone(),
            slots.charges.clone(),
            slots.rent_reminder.clone(),
        ) else {
            return Err(StepGateError::MissingRequired { labels });
        };
        if !labels.is_empty() {
            return Err(StepGateError::MissingRequired { labels });
        }

        Ok(PropertyDetails {
            property_address,
            leasing_info,
            charges,
            rent_reminder,
            parking: slots.parking.clone(),
            about: slots.about.clone(),
            amenities: slots.amenities.clone(),
            pet_fees: slots.pet_fees.as_slice().to_vec(),
            educational_institutions: slots.educational_institutions.as_slice().to_vec(),
            stations: slots.stations.as_slice().to_vec(),
            landmarks: slots.landmarks.as_slice().to_vec(),
            application_agreements: slots.application_agreements.as_slice().to_vec(),
            utilities: slots.utilities.as_slice().to_vec(),
            gallery: self.gallery.clone(),
        })
    }
}
