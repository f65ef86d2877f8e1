//! Page-state layer for the PetClinic client.
//!
//! Every screen of the client is built from the same three pieces:
//! - the request client from `petclinic-client`,
//! - a [`ResourceLoader`] that fetches server state for a dependency key and
//!   discards results that arrive after the key has moved on,
//! - a [`FormController`] that validates edits locally, submits them, and
//!   merges server-rejected fields back into one error view.
//!
//! The [`pages`] module composes them into the data behavior of the
//! individual screens, without any rendering.
//!
//! # Concurrency
//!
//! State transitions are synchronous and happen under a short lock that is
//! never held across an `.await`. Network calls are the only suspension
//! points. Cancellation is advisory: a superseded request still runs to
//! completion, only its effect on state is dropped.

mod error;
pub mod form;
pub mod loader;
pub mod pages;
pub mod rules;

pub use error::{FailureKind, LoadFailure, SubmitError, SubmitResult};
pub use form::{Form, FormController, FormState, SubmitOutcome};
pub use loader::{LoadTask, ResourceLoader, ResourceState};
