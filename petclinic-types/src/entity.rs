//! Entity snapshots as returned by the PetClinic API.
//!
//! These are read-only views of server state. The wire format is camelCase
//! JSON; unknown fields are ignored and collections default to empty so a
//! partial record from an older server still decodes.

use crate::ids::{OwnerId, PetId, PetTypeId, VetId, VisitId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A kind of pet (cat, dog, lizard, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetType {
    pub id: PetTypeId,
    pub name: String,
}

/// A single visit of a pet to the clinic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Visit {
    pub id: VisitId,
    pub date: NaiveDate,
    pub description: String,
}

/// A pet with its type and visit history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    pub id: PetId,
    pub name: String,
    pub birth_date: NaiveDate,
    #[serde(rename = "type")]
    pub pet_type: PetType,
    #[serde(default)]
    pub visits: Vec<Visit>,
}

/// An owner with contact details and pets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Owner {
    pub id: OwnerId,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub city: String,
    pub telephone: String,
    #[serde(default)]
    pub pets: Vec<Pet>,
}

impl Owner {
    /// "First Last", as shown next to pet forms.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Looks up one of this owner's pets.
    pub fn pet(&self, pet_id: PetId) -> Option<&Pet> {
        self.pets.iter().find(|pet| pet.id == pet_id)
    }

    /// Comma-separated pet names, in server order.
    pub fn pet_names(&self) -> String {
        self.pets
            .iter()
            .map(|pet| pet.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A vet specialty (radiology, surgery, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Specialty {
    pub id: i64,
    pub name: String,
}

/// A vet and their specialties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vet {
    pub id: VetId,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub specialties: Vec<Specialty>,
}
