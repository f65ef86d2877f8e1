//! Form state, validation and submission.
//!
//! [`FormController`] owns the values being edited and the errors shown next
//! to them. A submit attempt always runs local validation first; only a
//! clean form reaches the page's submit function. When that function fails
//! with an API rejection, the server's field errors are laid over the local
//! ones (the server wins on a shared field).

use crate::error::SubmitError;
use petclinic_client::ClientError;
use petclinic_types::{FieldErrors, FieldValue};
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, warn};

/// Summary shown when a failure carries no message at all.
pub const UNEXPECTED_ERROR: &str = "Unexpected error";

/// A set of editable values with its own validation rules.
pub trait Form: Clone + Send + 'static {
    /// Identifies one input of the form.
    type Field: Copy + Eq + fmt::Debug + Send;

    /// Wire name of a field, shared with server field errors.
    fn field_name(field: Self::Field) -> &'static str;

    /// Sets one field.
    fn set_field(&mut self, field: Self::Field, value: FieldValue);

    /// Checks the values. Must be a pure function of `self`.
    fn validate(&self) -> FieldErrors;

    /// Summary to show when validation fails. Replaces the previous summary
    /// on every failed attempt, so `None` clears it.
    fn validation_summary(_errors: &FieldErrors) -> Option<String> {
        None
    }
}

/// Snapshot of a form as the view renders it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState<V> {
    pub values: V,
    pub field_errors: FieldErrors,
    pub submit_error: Option<String>,
    pub is_submitting: bool,
}

/// Result of one submit attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Local validation failed; the submit function was not called.
    Invalid,
    /// The submit function succeeded.
    Submitted,
    /// The submit function failed; see `submit_error` and `field_errors`.
    Rejected,
}

struct Inner<V> {
    state: FormState<V>,
    generation: u64,
}

fn lock<V>(inner: &Mutex<Inner<V>>) -> MutexGuard<'_, Inner<V>> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Clears `is_submitting` when dropped, whichever way the attempt ends.
struct SubmittingGuard<'a, V>(&'a Mutex<Inner<V>>);

impl<V> Drop for SubmittingGuard<'_, V> {
    fn drop(&mut self) {
        lock(self.0).state.is_submitting = false;
    }
}

/// Editable form state shared between a view and its submit task.
///
/// Clones are handles to the same form.
pub struct FormController<V> {
    inner: Arc<Mutex<Inner<V>>>,
}

impl<V> Clone for FormController<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V: Form> FormController<V> {
    /// Form seeded with `initial` at generation 0.
    pub fn new(initial: V) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                state: FormState {
                    values: initial,
                    field_errors: FieldErrors::new(),
                    submit_error: None,
                    is_submitting: false,
                },
                generation: 0,
            })),
        }
    }

    /// Supplies a new seed. When `generation` differs from the current one
    /// the values are replaced and all errors cleared; otherwise nothing
    /// happens. Returns whether a reset took place.
    pub fn seed(&self, generation: u64, values: V) -> bool {
        let mut inner = lock(&self.inner);
        if inner.generation == generation {
            return false;
        }
        debug!(from = inner.generation, to = generation, "reseeding form");
        inner.generation = generation;
        inner.state.values = values;
        inner.state.field_errors.clear();
        inner.state.submit_error = None;
        true
    }

    pub fn generation(&self) -> u64 {
        lock(&self.inner).generation
    }

    /// Sets one field and drops that field's error right away.
    pub fn update(&self, field: V::Field, value: impl Into<FieldValue>) {
        let mut inner = lock(&self.inner);
        inner.state.values.set_field(field, value.into());
        inner.state.field_errors.remove(V::field_name(field));
    }

    pub fn state(&self) -> FormState<V> {
        lock(&self.inner).state.clone()
    }

    pub fn values(&self) -> V {
        lock(&self.inner).state.values.clone()
    }

    pub fn field_errors(&self) -> FieldErrors {
        lock(&self.inner).state.field_errors.clone()
    }

    /// Error shown next to `field`, if any.
    pub fn field_error(&self, field: V::Field) -> Option<String> {
        lock(&self.inner)
            .state
            .field_errors
            .get(V::field_name(field))
            .map(str::to_string)
    }

    pub fn submit_error(&self) -> Option<String> {
        lock(&self.inner).state.submit_error.clone()
    }

    pub fn is_submitting(&self) -> bool {
        lock(&self.inner).state.is_submitting
    }

    /// Validates and, if clean, hands the current values to `on_submit`.
    /// Its success value is discarded.
    ///
    /// `is_submitting` is true while `on_submit` runs and is cleared on every
    /// exit path, including a panic in `on_submit` or the returned future
    /// being dropped. If the form is reseeded while the call is in flight,
    /// its errors are not applied to the new values.
    pub async fn submit<F, Fut, R>(&self, on_submit: F) -> SubmitOutcome
    where
        F: FnOnce(V) -> Fut,
        Fut: Future<Output = Result<R, SubmitError>>,
    {
        let (values, generation) = {
            let mut inner = lock(&self.inner);
            let errors = inner.state.values.validate();
            if !errors.is_empty() {
                debug!(fields = errors.len(), "validation failed, not submitting");
                inner.state.submit_error = V::validation_summary(&errors);
                inner.state.field_errors = errors;
                return SubmitOutcome::Invalid;
            }
            inner.state.is_submitting = true;
            inner.state.submit_error = None;
            (inner.state.values.clone(), inner.generation)
        };

        let _guard = SubmittingGuard(&self.inner);
        let result = on_submit(values).await;

        let Err(err) = result else {
            return SubmitOutcome::Submitted;
        };

        let mut inner = lock(&self.inner);
        if inner.generation != generation {
            debug!("form reseeded during submit, dropping errors");
            return SubmitOutcome::Rejected;
        }

        match &err {
            SubmitError::Client(ClientError::Api(api)) => {
                inner.state.submit_error = Some(api.message().to_string());
                inner.state.field_errors.merge(api.field_errors());
            }
            other => {
                let message = other.to_string();
                inner.state.submit_error = Some(if message.trim().is_empty() {
                    warn!(error = ?other, "submit failed without a message");
                    UNEXPECTED_ERROR.to_string()
                } else {
                    message
                });
            }
        }
        SubmitOutcome::Rejected
    }
}

impl<V: fmt::Debug> fmt::Debug for FormController<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = lock(&self.inner);
        f.debug_struct("FormController")
            .field("generation", &inner.generation)
            .field("state", &inner.state)
            .finish()
    }
}
