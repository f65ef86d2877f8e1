//! Core type definitions for the PetClinic client.
//!
//! This crate defines the plain data shared by the request client and the
//! page-state layer:
//! - Numeric identifiers for owners, pets, pet types, visits and vets
//! - Immutable entity snapshots as received from the server
//! - Editable form value records and the field-error map
//! - Request payloads built from a snapshot plus edited fields
//!
//! Nothing here performs I/O. Snapshots are never mutated in place; edits are
//! expressed as new payload values.

mod entity;
mod form;
mod ids;
mod payload;

pub use entity::{Owner, Pet, PetType, Specialty, Vet, Visit};
pub use form::{
    FieldErrors, FieldValue, OwnerField, OwnerFormValues, PetField, PetFormValues, VisitField,
    VisitFormValues,
};
pub use ids::{OwnerId, PetId, PetTypeId, VetId, VisitId};
pub use payload::{is_valid_date, OwnerPayload, PetPayload, VisitPayload};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while turning form values into payloads.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid date: {0}")]
    InvalidDate(String),

    #[error("missing field: {0}")]
    MissingField(&'static str),
}
