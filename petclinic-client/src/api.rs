//! Typed wrappers for the PetClinic endpoints.

use crate::client::{ApiClient, Payload};
use crate::error::ClientResult;
use petclinic_types::{
    Owner, OwnerId, OwnerPayload, Pet, PetId, PetPayload, PetType, Vet, Visit, VisitPayload,
};
use reqwest::Method;

/// One method per endpoint the client application consumes.
#[derive(Debug, Clone)]
pub struct PetClinicApi {
    client: ApiClient,
}

impl PetClinicApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// The underlying request client.
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    // ── Owners ───────────────────────────────────────────────────

    /// `GET /api/owners?lastName=<q>`. The query is percent-encoded.
    pub async fn find_owners(&self, last_name: &str) -> ClientResult<Vec<Owner>> {
        let path = format!("/api/owners?lastName={}", urlencoding::encode(last_name));
        self.client.get(&path).await
    }

    /// `GET /api/owners/{id}`.
    pub async fn owner(&self, id: OwnerId) -> ClientResult<Owner> {
        self.client.get(&format!("/api/owners/{id}")).await
    }

    /// `POST /api/owners`.
    pub async fn create_owner(&self, payload: &OwnerPayload) -> ClientResult<Owner> {
        self.client.post("/api/owners", payload).await
    }

    /// `PUT /api/owners/{id}`.
    pub async fn update_owner(&self, id: OwnerId, payload: &OwnerPayload) -> ClientResult<Owner> {
        self.client.put(&format!("/api/owners/{id}"), payload).await
    }

    // ── Pets and visits ──────────────────────────────────────────

    /// `POST /api/owners/{ownerId}/pets`.
    pub async fn add_pet(&self, owner_id: OwnerId, payload: &PetPayload) -> ClientResult<Pet> {
        self.client
            .post(&format!("/api/owners/{owner_id}/pets"), payload)
            .await
    }

    /// `PUT /api/owners/{ownerId}/pets/{petId}`. The server may answer with
    /// the updated pet or with no content.
    pub async fn update_pet(
        &self,
        owner_id: OwnerId,
        pet_id: PetId,
        payload: &PetPayload,
    ) -> ClientResult<Option<Pet>> {
        self.client
            .put(&format!("/api/owners/{owner_id}/pets/{pet_id}"), payload)
            .await
    }

    /// `POST /api/owners/{ownerId}/pets/{petId}/visits`.
    pub async fn add_visit(
        &self,
        owner_id: OwnerId,
        pet_id: PetId,
        payload: &VisitPayload,
    ) -> ClientResult<Option<Visit>> {
        self.client
            .post(
                &format!("/api/owners/{owner_id}/pets/{pet_id}/visits"),
                payload,
            )
            .await
    }

    // ── Reference data ───────────────────────────────────────────

    /// `GET /api/pettypes`.
    pub async fn pet_types(&self) -> ClientResult<Vec<PetType>> {
        self.client.get("/api/pettypes").await
    }

    /// `GET /api/vets`.
    pub async fn vets(&self) -> ClientResult<Vec<Vet>> {
        self.client.get("/api/vets").await
    }

    /// `GET /api/oups`, which the server always fails on purpose. A
    /// non-failing answer is returned as-is.
    pub async fn trigger_error(&self) -> ClientResult<Payload> {
        self.client
            .send(Method::GET, "/api/oups", None, Default::default())
            .await
    }
}
