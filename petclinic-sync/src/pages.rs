//! Data behavior of the individual screens.
//!
//! Nothing here renders. Each item is what a screen needs from the core:
//! the text of a result summary, the data a form is seeded from, or the
//! submit function a [`FormController`](crate::FormController) calls.

use crate::error::{SubmitError, SubmitResult};
use crate::loader::{LoadTask, ResourceLoader, ResourceState};
use petclinic_client::{ClientResult, Payload, PetClinicApi};
use petclinic_types::{
    Owner, OwnerFormValues, OwnerId, OwnerPayload, Pet, PetFormValues, PetId, PetPayload, PetType,
    VisitFormValues, VisitPayload,
};
use serde_json::Value;

pub const SEARCH_PROMPT: &str = "Enter a last name and click Find Owner to search.";
pub const NO_OWNERS_FOUND: &str = "No owners found.";
pub const SEARCHING: &str = "Searching owners...";
pub const OWNER_ID_MISSING: &str = "Owner id is missing";
pub const OWNER_NOT_LOADED: &str = "Owner data not loaded";
pub const PET_DATA_MISSING: &str = "Missing pet data";
pub const PET_INFO_MISSING: &str = "Pet information is missing.";
pub const UNKNOWN_ERROR: &str = "Unknown error";

// ── Owner search ─────────────────────────────────────────────────

/// Heading of the owner results table.
pub fn owners_summary(owners: &[Owner], has_searched: bool) -> String {
    match owners.len() {
        _ if !has_searched => SEARCH_PROMPT.to_string(),
        0 => NO_OWNERS_FOUND.to_string(),
        1 => "1 Owner found".to_string(),
        n => format!("{n} Owners found"),
    }
}

/// Turns the search box into a query. Blank input means "no search".
pub fn normalize_search(input: &str) -> Option<String> {
    let trimmed = input.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// The find-owners screen: one loader keyed by the last-name query.
#[derive(Debug)]
pub struct OwnerSearch {
    api: PetClinicApi,
    loader: ResourceLoader<String, Vec<Owner>>,
}

impl OwnerSearch {
    pub fn new(api: PetClinicApi) -> Self {
        Self {
            api,
            loader: ResourceLoader::new(),
        }
    }

    /// Searches for `input`. Blank input clears the results without a
    /// request.
    pub fn search(&self, input: &str) -> LoadTask {
        let Some(query) = normalize_search(input) else {
            self.loader.reset();
            return LoadTask::ready();
        };
        let api = self.api.clone();
        self.loader
            .load(Some(query), move |q| async move { api.find_owners(&q).await })
    }

    pub fn state(&self) -> ResourceState<Vec<Owner>> {
        self.loader.state()
    }

    /// The query of the latest search, if any.
    pub fn query(&self) -> Option<String> {
        self.loader.key()
    }

    /// What the results area shows right now.
    pub fn summary(&self) -> String {
        self.loader.with_state(|state| match state {
            ResourceState::Idle => owners_summary(&[], false),
            ResourceState::Loading => SEARCHING.to_string(),
            ResourceState::Success(owners) => owners_summary(owners, true),
            ResourceState::Error(failure) => failure.message.clone(),
        })
    }
}

// ── Owner pages ──────────────────────────────────────────────────

/// Reads an owner id route segment. Anything unparsable counts as absent.
pub fn parse_owner_id(segment: Option<&str>) -> Option<OwnerId> {
    segment.and_then(|s| s.parse().ok())
}

/// Loader for a page keyed by owner id.
pub fn owner_loader<T: Send + 'static>() -> ResourceLoader<OwnerId, T> {
    ResourceLoader::with_missing_key_message(OWNER_ID_MISSING)
}

/// Starts loading the owner details page for `owner_id`.
pub fn load_owner(
    loader: &ResourceLoader<OwnerId, Owner>,
    api: &PetClinicApi,
    owner_id: Option<OwnerId>,
) -> LoadTask {
    let api = api.clone();
    loader.load(owner_id, move |id| async move { api.owner(id).await })
}

/// Starts loading the pet form data for `owner_id`.
pub fn load_pet_form(
    loader: &ResourceLoader<OwnerId, PetFormData>,
    api: &PetClinicApi,
    owner_id: Option<OwnerId>,
) -> LoadTask {
    let api = api.clone();
    loader.load(owner_id, move |id| async move {
        fetch_pet_form_data(&api, id).await
    })
}

/// Pet addressed by a route segment, if the owner has it.
pub fn find_pet<'a>(owner: &'a Owner, segment: Option<&str>) -> Option<&'a Pet> {
    let id: PetId = segment?.parse().ok()?;
    owner.pet(id)
}

// ── Pet types ────────────────────────────────────────────────────

/// Starts loading the pet type list. The list has no key, so it is fetched
/// once per loader unless reloaded.
pub fn load_pet_types(loader: &ResourceLoader<(), Vec<PetType>>, api: &PetClinicApi) -> LoadTask {
    let api = api.clone();
    loader.load(Some(()), move |()| async move { api.pet_types().await })
}

// ── Owner and pet forms ──────────────────────────────────────────

/// Everything the pet form needs: the owner and the type options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PetFormData {
    pub owner: Owner,
    pub pet_types: Vec<PetType>,
}

impl PetFormData {
    /// Seed values for editing `pet_id`, or `None` when the owner has no
    /// such pet.
    pub fn edit_values(&self, pet_id: PetId) -> Option<PetFormValues> {
        self.owner.pet(pet_id).map(PetFormValues::from)
    }
}

/// Fetches the owner and the pet types in parallel. Fails with the first
/// error.
pub async fn fetch_pet_form_data(api: &PetClinicApi, owner_id: OwnerId) -> ClientResult<PetFormData> {
    let (pet_types, owner) = futures::try_join!(api.pet_types(), api.owner(owner_id))?;
    Ok(PetFormData {
        owner,
        pet_types: sorted_pet_types(&pet_types),
    })
}

/// Pet types ordered by name for the type select.
pub fn sorted_pet_types(types: &[PetType]) -> Vec<PetType> {
    let mut sorted = types.to_vec();
    sorted.sort_by(|a, b| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.name.cmp(&b.name))
    });
    sorted
}

/// Submit function of the new-owner form.
pub async fn create_owner(api: &PetClinicApi, values: OwnerFormValues) -> SubmitResult<Owner> {
    Ok(api.create_owner(&OwnerPayload::new_owner(&values)).await?)
}

/// Submit function of the edit-owner form.
pub async fn update_owner(
    api: &PetClinicApi,
    owner: Option<&Owner>,
    values: OwnerFormValues,
) -> SubmitResult<Owner> {
    let owner = owner.ok_or_else(|| SubmitError::precondition(OWNER_NOT_LOADED))?;
    Ok(api
        .update_owner(owner.id, &OwnerPayload::update(owner, &values))
        .await?)
}

/// Submit function of the new-pet form.
pub async fn add_pet(
    api: &PetClinicApi,
    owner: Option<&Owner>,
    values: PetFormValues,
) -> SubmitResult<Pet> {
    let owner = owner.ok_or_else(|| SubmitError::precondition(PET_DATA_MISSING))?;
    let payload = PetPayload::new_pet(&values)?;
    Ok(api.add_pet(owner.id, &payload).await?)
}

/// Submit function of the edit-pet form.
pub async fn update_pet(
    api: &PetClinicApi,
    owner: Option<&Owner>,
    pet: Option<&Pet>,
    values: PetFormValues,
) -> SubmitResult {
    let (Some(owner), Some(pet)) = (owner, pet) else {
        return Err(SubmitError::precondition(PET_DATA_MISSING));
    };
    let payload = PetPayload::update(pet, &values)?;
    api.update_pet(owner.id, pet.id, &payload).await?;
    Ok(())
}

/// Submit function of the visit form.
pub async fn add_visit(
    api: &PetClinicApi,
    owner: Option<&Owner>,
    pet: Option<&Pet>,
    values: VisitFormValues,
) -> SubmitResult {
    let (Some(owner), Some(pet)) = (owner, pet) else {
        return Err(SubmitError::precondition(PET_INFO_MISSING));
    };
    let payload = VisitPayload::from_form(&values)?;
    api.add_visit(owner.id, pet.id, &payload).await?;
    Ok(())
}

// ── Error page ───────────────────────────────────────────────────

/// What the error page shows about the deliberately failing endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDetails {
    pub status: Option<String>,
    pub message: String,
}

impl ErrorDetails {
    /// From a successful answer, read `status` and `message` out of the
    /// body; from a failure, use its message only.
    pub fn from_result(result: ClientResult<Payload>) -> Self {
        match result {
            Ok(payload) => {
                let body = payload.into_value();
                let status = body.get("status").and_then(|v| match v {
                    Value::String(s) => Some(s.clone()),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                });
                let message = body
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or(UNKNOWN_ERROR)
                    .to_string();
                Self { status, message }
            }
            Err(err) => {
                let message = err.to_string();
                Self {
                    status: None,
                    message: if message.is_empty() {
                        UNKNOWN_ERROR.to_string()
                    } else {
                        message
                    },
                }
            }
        }
    }

    /// Calls `GET /api/oups` and describes the outcome.
    pub async fn fetch(api: &PetClinicApi) -> Self {
        Self::from_result(api.trigger_error().await)
    }
}
