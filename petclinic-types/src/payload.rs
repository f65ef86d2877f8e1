//! Request bodies for the write endpoints.
//!
//! A payload is always a fresh value built from validated form input, plus
//! the untouched parts of the snapshot being edited (ids, pets, visits).

use crate::entity::{Owner, Pet, PetType, Visit};
use crate::form::{OwnerFormValues, PetFormValues, VisitFormValues};
use crate::ids::{OwnerId, PetId, PetTypeId};
use crate::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Date format used by date inputs and by the API.
const DATE_FORMAT: &str = "%Y-%m-%d";

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| Error::InvalidDate(raw.to_string()))
}

/// Body of `POST /api/owners` and `PUT /api/owners/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerPayload {
    pub id: Option<OwnerId>,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub city: String,
    pub telephone: String,
    pub pets: Vec<Pet>,
    pub is_new: bool,
}

impl OwnerPayload {
    /// Payload for a brand-new owner.
    pub fn new_owner(values: &OwnerFormValues) -> Self {
        Self {
            id: None,
            first_name: values.first_name.clone(),
            last_name: values.last_name.clone(),
            address: values.address.clone(),
            city: values.city.clone(),
            telephone: values.telephone.clone(),
            pets: Vec::new(),
            is_new: true,
        }
    }

    /// Payload updating `owner` with the edited contact details. Pets are
    /// carried over unchanged.
    pub fn update(owner: &Owner, values: &OwnerFormValues) -> Self {
        Self {
            id: Some(owner.id),
            first_name: values.first_name.clone(),
            last_name: values.last_name.clone(),
            address: values.address.clone(),
            city: values.city.clone(),
            telephone: values.telephone.clone(),
            pets: owner.pets.clone(),
            is_new: false,
        }
    }
}

/// Body of `POST /api/owners/{ownerId}/pets` and
/// `PUT /api/owners/{ownerId}/pets/{petId}`.
///
/// An update is the edited snapshot: it keeps the pet's `type` object and
/// visit history next to the new `typeId`. A new pet sends neither.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PetPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<PetId>,
    pub name: String,
    pub birth_date: NaiveDate,
    pub type_id: PetTypeId,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub pet_type: Option<PetType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visits: Option<Vec<Visit>>,
    pub is_new: bool,
}

impl PetPayload {
    /// Payload for a new pet. Fails when the birth date does not parse or no
    /// type is selected.
    pub fn new_pet(values: &PetFormValues) -> Result<Self> {
        Ok(Self {
            id: None,
            name: values.name.clone(),
            birth_date: parse_date(&values.birth_date)?,
            type_id: values.type_id.ok_or(Error::MissingField("typeId"))?,
            pet_type: None,
            visits: None,
            is_new: true,
        })
    }

    /// Payload updating `pet`; its type object and visit history are carried
    /// over unchanged.
    pub fn update(pet: &Pet, values: &PetFormValues) -> Result<Self> {
        Ok(Self {
            id: Some(pet.id),
            name: values.name.clone(),
            birth_date: parse_date(&values.birth_date)?,
            type_id: values.type_id.ok_or(Error::MissingField("typeId"))?,
            pet_type: Some(pet.pet_type.clone()),
            visits: Some(pet.visits.clone()),
            is_new: false,
        })
    }
}

/// Body of `POST /api/owners/{ownerId}/pets/{petId}/visits`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitPayload {
    pub date: NaiveDate,
    pub description: String,
}

impl VisitPayload {
    pub fn from_form(values: &VisitFormValues) -> Result<Self> {
        Ok(Self {
            date: parse_date(&values.date)?,
            description: values.description.clone(),
        })
    }
}

/// Returns `true` when `raw` is a `YYYY-MM-DD` calendar date.
pub fn is_valid_date(raw: &str) -> bool {
    parse_date(raw).is_ok()
}
