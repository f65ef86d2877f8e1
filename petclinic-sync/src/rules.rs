//! Validation rules for the owner, pet and visit forms.

use crate::form::Form;
use petclinic_types::{
    is_valid_date, FieldErrors, FieldValue, OwnerField, OwnerFormValues, PetField, PetFormValues,
    VisitField, VisitFormValues,
};

pub const FIRST_NAME_REQUIRED: &str = "First name is required";
pub const LAST_NAME_REQUIRED: &str = "Last name is required";
pub const ADDRESS_REQUIRED: &str = "Address is required";
pub const CITY_REQUIRED: &str = "City is required";
pub const TELEPHONE_INVALID: &str = "Telephone must be numeric with up to 10 digits";

pub const NAME_REQUIRED: &str = "Name is required";
pub const BIRTH_DATE_REQUIRED: &str = "Birth date is required";
pub const BIRTH_DATE_INVALID: &str = "Birth date must be a valid date";
pub const PET_TYPE_REQUIRED: &str = "Pet type is required";

pub const DATE_REQUIRED: &str = "Date is required";
pub const DATE_INVALID: &str = "Date must be a valid date";
pub const DESCRIPTION_REQUIRED: &str = "Description is required";
pub const VISIT_SUMMARY: &str = "Both date and description are required.";

const TELEPHONE_MAX_DIGITS: usize = 10;

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// 1 to 10 ASCII digits once surrounding whitespace is removed.
pub fn is_valid_telephone(value: &str) -> bool {
    let value = value.trim();
    (1..=TELEPHONE_MAX_DIGITS).contains(&value.len()) && value.bytes().all(|b| b.is_ascii_digit())
}

impl Form for OwnerFormValues {
    type Field = OwnerField;

    fn field_name(field: OwnerField) -> &'static str {
        field.name()
    }

    fn set_field(&mut self, field: OwnerField, value: FieldValue) {
        self.set(field, value);
    }

    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        for (field, message) in [
            (OwnerField::FirstName, FIRST_NAME_REQUIRED),
            (OwnerField::LastName, LAST_NAME_REQUIRED),
            (OwnerField::Address, ADDRESS_REQUIRED),
            (OwnerField::City, CITY_REQUIRED),
        ] {
            if is_blank(self.get(field)) {
                errors.insert(field.name(), message);
            }
        }
        if !is_valid_telephone(&self.telephone) {
            errors.insert(OwnerField::Telephone.name(), TELEPHONE_INVALID);
        }
        errors
    }
}

impl Form for PetFormValues {
    type Field = PetField;

    fn field_name(field: PetField) -> &'static str {
        field.name()
    }

    fn set_field(&mut self, field: PetField, value: FieldValue) {
        self.set(field, value);
    }

    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if is_blank(&self.name) {
            errors.insert(PetField::Name.name(), NAME_REQUIRED);
        }
        if is_blank(&self.birth_date) {
            errors.insert(PetField::BirthDate.name(), BIRTH_DATE_REQUIRED);
        } else if !is_valid_date(&self.birth_date) {
            errors.insert(PetField::BirthDate.name(), BIRTH_DATE_INVALID);
        }
        if self.type_id.is_none() {
            errors.insert(PetField::TypeId.name(), PET_TYPE_REQUIRED);
        }
        errors
    }
}

impl Form for VisitFormValues {
    type Field = VisitField;

    fn field_name(field: VisitField) -> &'static str {
        field.name()
    }

    fn set_field(&mut self, field: VisitField, value: FieldValue) {
        self.set(field, value);
    }

    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if is_blank(&self.date) {
            errors.insert(VisitField::Date.name(), DATE_REQUIRED);
        } else if !is_valid_date(&self.date) {
            errors.insert(VisitField::Date.name(), DATE_INVALID);
        }
        if is_blank(&self.description) {
            errors.insert(VisitField::Description.name(), DESCRIPTION_REQUIRED);
        }
        errors
    }

    fn validation_summary(errors: &FieldErrors) -> Option<String> {
        let missing = errors.get(VisitField::Date.name()) == Some(DATE_REQUIRED)
            || errors.contains(VisitField::Description.name());
        missing.then(|| VISIT_SUMMARY.to_string())
    }
}
