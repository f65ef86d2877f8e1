//! Request client for the PetClinic REST API.
//!
//! Every HTTP call of the client application goes through [`ApiClient`],
//! which reduces each exchange to one of two outcomes:
//! - a decoded value, or
//! - a [`ClientError`], already classified as an HTTP rejection
//!   ([`ApiError`]), a transport failure, or an undecodable body.
//!
//! Classification happens once, here, so callers branch on the enum variant
//! and never on message text.
//!
//! # Example
//!
//! ```no_run
//! use petclinic_client::{ApiClient, ClientConfig, PetClinicApi};
//!
//! # async fn run() -> petclinic_client::ClientResult<()> {
//! let client = ApiClient::new(ClientConfig::from_env())?;
//! let api = PetClinicApi::new(client);
//! let owners = api.find_owners("Davis").await?;
//! println!("{} owners", owners.len());
//! # Ok(())
//! # }
//! ```

mod api;
mod client;
mod config;
mod error;

pub use api::PetClinicApi;
pub use client::{ApiClient, Payload, RequestOptions};
pub use config::{ClientConfig, BASE_URL_ENV, DEFAULT_BASE_URL};
pub use error::{ApiError, ApiErrorPayload, ClientError, ClientResult, FieldErrorPayload};
