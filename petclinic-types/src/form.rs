//! Editable form values and the per-field error map.
//!
//! Form values are what the user is typing, so every text field is a plain
//! `String` (possibly empty or not yet a valid date). They are only turned
//! into typed payloads after validation succeeds.

use crate::entity::{Owner, Pet};
use crate::ids::PetTypeId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A single input value coming from a text box or a select.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Number(i64),
}

impl FieldValue {
    /// The value as text, rendering numbers in decimal.
    pub fn into_text(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Number(n) => n.to_string(),
        }
    }

    /// The value as a number. Blank text is `None`, as is text that does not
    /// parse.
    pub fn as_number(&self) -> Option<i64> {
        match self {
            Self::Text(text) => text.trim().parse().ok(),
            Self::Number(n) => Some(*n),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

/// Messages keyed by field name.
///
/// Keys are the wire names (`"telephone"`, `"birthDate"`) so local
/// validation results and server-reported errors share one namespace. Field
/// names the form does not know about are kept as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    /// Creates an empty error map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the message for a field, replacing any previous one.
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.insert(field.into(), message.into());
    }

    /// Returns the message for a field.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Removes the message for a field, returning it.
    pub fn remove(&mut self, field: &str) -> Option<String> {
        self.0.remove(field)
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

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Iterates over `(field, message)` pairs in field-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Lays `other` on top of `self`: same-named fields take `other`'s
    /// message, every other field in `self` is kept.
    pub fn merge(&mut self, other: FieldErrors) {
        self.0.extend(other.0);
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FieldErrors {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut errors = Self::new();
        errors.extend(iter);
        errors
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for FieldErrors {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (field, message) in iter {
            self.insert(field, message);
        }
    }
}

// ── Owner form ───────────────────────────────────────────────────

/// Inputs of the owner form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OwnerField {
    FirstName,
    LastName,
    Address,
    City,
    Telephone,
}

impl OwnerField {
    pub const ALL: [OwnerField; 5] = [
        Self::FirstName,
        Self::LastName,
        Self::Address,
        Self::City,
        Self::Telephone,
    ];

    /// Wire name, as used by server field errors.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
            Self::Address => "address",
            Self::City => "city",
            Self::Telephone => "telephone",
        }
    }
}

impl fmt::Display for OwnerField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Values of the owner form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerFormValues {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub city: String,
    pub telephone: String,
}

impl OwnerFormValues {
    /// Sets one field.
    pub fn set(&mut self, field: OwnerField, value: FieldValue) {
        let text = value.into_text();
        match field {
            OwnerField::FirstName => self.first_name = text,
            OwnerField::LastName => self.last_name = text,
            OwnerField::Address => self.address = text,
            OwnerField::City => self.city = text,
            OwnerField::Telephone => self.telephone = text,
        }
    }

    /// Reads one field.
    pub fn get(&self, field: OwnerField) -> &str {
        match field {
            OwnerField::FirstName => &self.first_name,
            OwnerField::LastName => &self.last_name,
            OwnerField::Address => &self.address,
            OwnerField::City => &self.city,
            OwnerField::Telephone => &self.telephone,
        }
    }
}

impl From<&Owner> for OwnerFormValues {
    fn from(owner: &Owner) -> Self {
        Self {
            first_name: owner.first_name.clone(),
            last_name: owner.last_name.clone(),
            address: owner.address.clone(),
            city: owner.city.clone(),
            telephone: owner.telephone.clone(),
        }
    }
}

// ── Pet form ─────────────────────────────────────────────────────

/// Inputs of the pet form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PetField {
    Name,
    BirthDate,
    TypeId,
}

impl PetField {
    pub const ALL: [PetField; 3] = [Self::Name, Self::BirthDate, Self::TypeId];

    pub const fn name(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::BirthDate => "birthDate",
            Self::TypeId => "typeId",
        }
    }
}

impl fmt::Display for PetField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Values of the pet form. `type_id` is `None` until a type is selected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PetFormValues {
    pub name: String,
    pub birth_date: String,
    pub type_id: Option<PetTypeId>,
}

impl PetFormValues {
    /// Sets one field. Selecting the empty option (or anything that is not
    /// a number) clears the type.
    pub fn set(&mut self, field: PetField, value: FieldValue) {
        match field {
            PetField::Name => self.name = value.into_text(),
            PetField::BirthDate => self.birth_date = value.into_text(),
            PetField::TypeId => self.type_id = value.as_number().map(PetTypeId::new),
        }
    }
}

impl From<&Pet> for PetFormValues {
    fn from(pet: &Pet) -> Self {
        Self {
            name: pet.name.clone(),
            birth_date: pet.birth_date.format("%Y-%m-%d").to_string(),
            type_id: Some(pet.pet_type.id),
        }
    }
}

// ── Visit form ───────────────────────────────────────────────────

/// Inputs of the visit form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisitField {
    Date,
    Description,
}

impl VisitField {
    pub const ALL: [VisitField; 2] = [Self::Date, Self::Description];

    pub const fn name(&self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Description => "description",
        }
    }
}

impl fmt::Display for VisitField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Values of the visit form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitFormValues {
    pub date: String,
    pub description: String,
}

impl VisitFormValues {
    pub fn set(&mut self, field: VisitField, value: FieldValue) {
        let text = value.into_text();
        match field {
            VisitField::Date => self.date = text,
            VisitField::Description => self.description = text,
        }
    }
}
