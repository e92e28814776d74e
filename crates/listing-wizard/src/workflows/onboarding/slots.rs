//! Storage for every entity captured on the condominium step.

use std::slice;

use serde::{Deserialize, Serialize};

use super::entities::{
    AboutDescription, AmenitySelection, ApplicationAgreement, Charges, EducationalInstitution,
    Entity, EntityForm, Landmark, LeasingInfo, Parking, PetFee, PropertyAddress, RentReminder,
    SlotKind, Station, Utility,
};

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum SlotError {
    #[error("{} has no entry at index {index} (length {len})", kind.label())]
    IndexOutOfRange {
        kind: SlotKind,
        index: usize,
        len: usize,
    },
    #[error("{} holds a single value, not a list", kind.label())]
    NotAList { kind: SlotKind },
    #[error("{} holds a list of values", kind.label())]
    NotASingleton { kind: SlotKind },
}

/// Indexed values of one list slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityList<T>(Vec<T>);

impl<T> Default for EntityList<T> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<T: EntityForm> EntityList<T> {
    /// Appends and returns the new index.
    pub fn add(&mut self, value: T) -> usize {
        self.0.push(value);
        self.0.len() - 1
    }

    pub fn update(&mut self, index: usize, value: T) -> Result<(), SlotError> {
        let len = self.0.len();
        let slot = self.0.get_mut(index).ok_or(SlotError::IndexOutOfRange {
            kind: T::KIND,
            index,
            len,
        })?;
        *slot = value;
        Ok(())
    }

    /// Missing indices are a no-op.
    pub fn remove(&mut self, index: usize) -> Option<T> {
        (index < self.0.len()).then(|| self.0.remove(index))
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.0.get(index)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.0
    }
}

/// One summary card on the condominium page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotSummary {
    pub kind: SlotKind,
    pub label: &'static str,
    pub hint: Option<&'static str>,
    pub required: bool,
    pub populated: bool,
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingSlots {
    pub property_address: Option<PropertyAddress>,
    pub pet_fees: EntityList<PetFee>,
    pub leasing_info: Option<LeasingInfo>,
    pub parking: Option<Parking>,
    pub charges: Option<Charges>,
    pub educational_institutions: EntityList<EducationalInstitution>,
    pub rent_reminder: Option<RentReminder>,
    pub stations: EntityList<Station>,
    pub application_agreements: EntityList<ApplicationAgreement>,
    pub landmarks: EntityList<Landmark>,
    pub about: Option<AboutDescription>,
    pub utilities: EntityList<Utility>,
    pub amenities: Option<AmenitySelection>,
}

fn cloned<T: Clone>(list: &EntityList<T>, index: usize, wrap: fn(T) -> Entity) -> Option<Entity>
where
    T: EntityForm,
{
    list.get(index).cloned().map(wrap)
}

impl ListingSlots {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_entity(&mut self, entity: Entity) -> Result<usize, SlotError> {
        let index = match entity {
            Entity::PetFees(value) => self.pet_fees.add(value),
            Entity::EducationalInstitutions(value) => self.educational_institutions.add(value),
            Entity::Stations(value) => self.stations.add(value),
            Entity::ApplicationAgreements(value) => self.application_agreements.add(value),
            Entity::Landmarks(value) => self.landmarks.add(value),
            Entity::Utilities(value) => self.utilities.add(value),
            other => return Err(SlotError::NotAList { kind: other.kind() }),
        };
        Ok(index)
    }

    pub fn update_entity(&mut self, index: usize, entity: Entity) -> Result<(), SlotError> {
        match entity {
            Entity::PetFees(value) => self.pet_fees.update(index, value),
            Entity::EducationalInstitutions(value) => {
                self.educational_institutions.update(index, value)
            }
            Entity::Stations(value) => self.stations.update(index, value),
            Entity::ApplicationAgreements(value) => {
                self.application_agreements.update(index, value)
            }
            Entity::Landmarks(value) => self.landmarks.update(index, value),
            Entity::Utilities(value) => self.utilities.update(index, value),
            other => Err(SlotError::NotAList { kind: other.kind() }),
        }
    }

    pub fn remove_entity(
        &mut self,
        kind: SlotKind,
        index: usize,
    ) -> Result<Option<Entity>, SlotError> {
        let removed = match kind {
            SlotKind::PetFees => self.pet_fees.remove(index).map(Entity::PetFees),
            SlotKind::EducationalInstitutions => self
                .educational_institutions
                .remove(index)
                .map(Entity::EducationalInstitutions),
            SlotKind::Stations => self.stations.remove(index).map(Entity::Stations),
            SlotKind::ApplicationAgreements => self
                .application_agreements
                .remove(index)
                .map(Entity::ApplicationAgreements),
            SlotKind::Landmarks => self.landmarks.remove(index).map(Entity::Landmarks),
            SlotKind::Utilities => self.utilities.remove(index).map(Entity::Utilities),
            other => return Err(SlotError::NotAList { kind: other }),
        };
        Ok(removed)
    }

    /// Stores a single-valued entity, replacing any previous value.
    pub fn set_singleton(&mut self, entity: Entity) -> Result<(), SlotError> {
        match entity {
            Entity::PropertyAddress(value) => self.property_address = Some(value),
            Entity::LeasingInfo(value) => self.leasing_info = Some(value),
            Entity::Parking(value) => self.parking = Some(value),
            Entity::Charges(value) => self.charges = Some(value),
            Entity::RentReminder(value) => self.rent_reminder = Some(value),
            Entity::About(value) => self.about = Some(value),
            Entity::Amenities(value) => self.amenities = Some(value),
            other => return Err(SlotError::NotASingleton { kind: other.kind() }),
        }
        Ok(())
    }

    pub fn clear_singleton(&mut self, kind: SlotKind) -> Result<Option<Entity>, SlotError> {
        let cleared = match kind {
            SlotKind::PropertyAddress => self.property_address.take().map(Entity::PropertyAddress),
            SlotKind::LeasingInfo => self.leasing_info.take().map(Entity::LeasingInfo),
            SlotKind::Parking => self.parking.take().map(Entity::Parking),
            SlotKind::Charges => self.charges.take().map(Entity::Charges),
            SlotKind::RentReminder => self.rent_reminder.take().map(Entity::RentReminder),
            SlotKind::About => self.about.take().map(Entity::About),
            SlotKind::Amenities => self.amenities.take().map(Entity::Amenities),
            other => return Err(SlotError::NotASingleton { kind: other }),
        };
        Ok(cleared)
    }

    /// Removes one amenity label; an emptied selection leaves the slot unpopulated.
    pub fn remove_amenity(&mut self, index: usize) -> Option<String> {
        let selection = self.amenities.as_mut()?;
        let removed = selection.remove_at(index);
        if selection.is_empty() {
            self.amenities = None;
        }
        removed
    }

    /// Value to prefill the modal with; list slots without an index open empty.
    pub fn entity_at(
        &self,
        kind: SlotKind,
        index: Option<usize>,
    ) -> Result<Option<Entity>, SlotError> {
        if !kind.is_list() {
            return Ok(self.entities(kind).into_iter().next());
        }
        let Some(index) = index else {
            return Ok(None);
        };

        let found = match kind {
            SlotKind::PetFees => cloned(&self.pet_fees, index, Entity::PetFees),
            SlotKind::EducationalInstitutions => cloned(
                &self.educational_institutions,
                index,
                Entity::EducationalInstitutions,
            ),
            SlotKind::Stations => cloned(&self.stations, index, Entity::Stations),
            SlotKind::ApplicationAgreements => cloned(
                &self.application_agreements,
                index,
                Entity::ApplicationAgreements,
            ),
            SlotKind::Landmarks => cloned(&self.landmarks, index, Entity::Landmarks),
            SlotKind::Utilities => cloned(&self.utilities, index, Entity::Utilities),
            other => return Err(SlotError::NotAList { kind: other }),
        };

        match found {
            Some(entity) => Ok(Some(entity)),
            None => Err(SlotError::IndexOutOfRange {
                kind,
                index,
                len: self.len(kind),
            }),
        }
    }

    pub fn len(&self, kind: SlotKind) -> usize {
        match kind {
            SlotKind::PetFees => self.pet_fees.len(),
            SlotKind::EducationalInstitutions => self.educational_institutions.len(),
            SlotKind::Stations => self.stations.len(),
            SlotKind::ApplicationAgreements => self.application_agreements.len(),
            SlotKind::Landmarks => self.landmarks.len(),
            SlotKind::Utilities => self.utilities.len(),
            singleton => usize::from(self.is_populated(singleton)),
        }
    }

    pub fn is_populated(&self, kind: SlotKind) -> bool {
        match kind {
            SlotKind::PropertyAddress => self.property_address.is_some(),
            SlotKind::LeasingInfo => self.leasing_info.is_some(),
            SlotKind::Parking => self.parking.is_some(),
            SlotKind::Charges => self.charges.is_some(),
            SlotKind::RentReminder => self.rent_reminder.is_some(),
            SlotKind::About => self.about.is_some(),
            SlotKind::Amenities => self.amenities.is_some(),
            list => self.len(list) > 0,
        }
    }

    /// Required slots that are still empty, in display order.
    pub fn missing_required(&self) -> Vec<SlotKind> {
        SlotKind::ALL
            .into_iter()
            .filter(|kind| kind.required() && !self.is_populated(*kind))
            .collect()
    }

    pub fn entities(&self, kind: SlotKind) -> Vec<Entity> {
        fn list<T: EntityForm + Clone>(values: &EntityList<T>, wrap: fn(T) -> Entity) -> Vec<Entity> {
            values.iter().cloned().map(wrap).collect()
        }

        match kind {
            SlotKind::PropertyAddress => self
                .property_address
                .clone()
                .map(Entity::PropertyAddress)
                .into_iter()
                .collect(),
            SlotKind::PetFees => list(&self.pet_fees, Entity::PetFees),
            SlotKind::LeasingInfo => self
                .leasing_info
                .clone()
                .map(Entity::LeasingInfo)
                .into_iter()
                .collect(),
            SlotKind::Parking => self.parking.clone().map(Entity::Parking).into_iter().collect(),
            SlotKind::Charges => self.charges.clone().map(Entity::Charges).into_iter().collect(),
            SlotKind::EducationalInstitutions => list(
                &self.educational_institutions,
                Entity::EducationalInstitutions,
            ),
            SlotKind::RentReminder => self
                .rent_reminder
                .clone()
                .map(Entity::RentReminder)
                .into_iter()
                .collect(),
            SlotKind::Stations => list(&self.stations, Entity::Stations),
            SlotKind::ApplicationAgreements => {
                list(&self.application_agreements, Entity::ApplicationAgreements)
            }
            SlotKind::Landmarks => list(&self.landmarks, Entity::Landmarks),
            SlotKind::About => self.about.clone().map(Entity::About).into_iter().collect(),
            SlotKind::Utilities => list(&self.utilities, Entity::Utilities),
            SlotKind::Amenities => self
                .amenities
                .clone()
                .map(Entity::Amenities)
                .into_iter()
                .collect(),
        }
    }

    pub fn summaries(&self) -> Vec<SlotSummary> {
        SlotKind::ALL
            .into_iter()
            .map(|kind| {
                let lines = match (kind, &self.amenities) {
                    (SlotKind::Amenities, Some(selection)) => selection.amenities.clone(),
                    _ => self
                        .entities(kind)
                        .iter()
                        .map(Entity::summary)
                        .collect(),
                };
                SlotSummary {
                    kind,
                    label: kind.label(),
                    hint: kind.hint(),
                    required: kind.required(),
                    populated: self.is_populated(kind),
                    lines,
                }
            })
            .collect()
    }
}
