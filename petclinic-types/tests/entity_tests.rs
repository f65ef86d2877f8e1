use petclinic_types::{Owner, OwnerId, PetId, PetTypeId, Vet};
use pretty_assertions::assert_eq;

fn george_json() -> serde_json::Value {
    serde_json::json!({
        "id": 1,
        "firstName": "George",
        "lastName": "Franklin",
        "address": "110 W. Liberty St.",
        "city": "Madison",
        "telephone": "6085551023",
        "pets": [
            {
                "id": 1,
                "name": "Leo",
                "birthDate": "2010-09-07",
                "type": { "id": 1, "name": "cat" },
                "visits": []
            },
            {
                "id": 7,
                "name": "Samantha",
                "birthDate": "2012-09-04",
                "type": { "id": 1, "name": "cat" },
                "visits": [
                    { "id": 1, "date": "2013-01-01", "description": "rabies shot" }
                ]
            }
        ]
    })
}

// ── Owner ────────────────────────────────────────────────────────

#[test]
fn owner_decodes_camel_case() {
    let owner: Owner = serde_json::from_value(george_json()).unwrap();
    assert_eq!(owner.id, OwnerId::new(1));
    assert_eq!(owner.first_name, "George");
    assert_eq!(owner.pets.len(), 2);
    assert_eq!(owner.pets[0].pet_type.id, PetTypeId::new(1));
    assert_eq!(owner.pets[1].visits[0].description, "rabies shot");
}

#[test]
fn owner_without_pets_defaults_to_empty() {
    let owner: Owner = serde_json::from_value(serde_json::json!({
        "id": 3,
        "firstName": "Eduardo",
        "lastName": "Rodriquez",
        "address": "2693 Commerce St.",
        "city": "McFarland",
        "telephone": "6085558763"
    }))
    .unwrap();
    assert!(owner.pets.is_empty());
    assert_eq!(owner.pet_names(), "");
}

#[test]
fn owner_full_name_and_pet_names() {
    let owner: Owner = serde_json::from_value(george_json()).unwrap();
    assert_eq!(owner.full_name(), "George Franklin");
    assert_eq!(owner.pet_names(), "Leo, Samantha");
}

#[test]
fn owner_pet_lookup() {
    let owner: Owner = serde_json::from_value(george_json()).unwrap();
    assert_eq!(owner.pet(PetId::new(7)).unwrap().name, "Samantha");
    assert!(owner.pet(PetId::new(99)).is_none());
}

#[test]
fn owner_rejects_bad_birth_date() {
    let mut json = george_json();
    json["pets"][0]["birthDate"] = serde_json::json!("not a date");
    assert!(serde_json::from_value::<Owner>(json).is_err());
}

// ── Vet ──────────────────────────────────────────────────────────

#[test]
fn vet_decodes_specialties() {
    let vet: Vet = serde_json::from_value(serde_json::json!({
        "id": 2,
        "firstName": "Helen",
        "lastName": "Leary",
        "specialties": [{ "id": 1, "name": "radiology" }]
    }))
    .unwrap();
    assert_eq!(vet.specialties[0].name, "radiology");
}

// ── Ids ──────────────────────────────────────────────────────────

#[test]
fn ids_parse_from_route_segments() {
    assert_eq!("42".parse::<OwnerId>().unwrap(), OwnerId::new(42));
    assert_eq!(" 7 ".parse::<PetId>().unwrap().get(), 7);
    assert!("abc".parse::<OwnerId>().is_err());
    assert_eq!(OwnerId::new(42).to_string(), "42");
}
