use petclinic_client::{ApiError, ApiErrorPayload, ClientError, FieldErrorPayload};
use petclinic_sync::form::UNEXPECTED_ERROR;
use petclinic_sync::rules::{
    CITY_REQUIRED, DATE_INVALID, DESCRIPTION_REQUIRED, FIRST_NAME_REQUIRED, PET_TYPE_REQUIRED,
    TELEPHONE_INVALID, VISIT_SUMMARY,
};
use petclinic_sync::{FormController, SubmitError, SubmitOutcome, SubmitResult};
use petclinic_types::{
    OwnerField, OwnerFormValues, PetField, PetFormValues, VisitField, VisitFormValues,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::oneshot;
use tracing_subscriber::EnvFilter;

fn valid_owner() -> OwnerFormValues {
    OwnerFormValues {
        first_name: "George".into(),
        last_name: "Franklin".into(),
        address: "110 W. Liberty St.".into(),
        city: "Madison".into(),
        telephone: "6085551023".into(),
    }
}

fn rejection(status: u16, message: &str, fields: &[(&str, &str)]) -> SubmitError {
    let payload = ApiErrorPayload {
        message: Some(message.to_string()),
        field_errors: fields
            .iter()
            .map(|(field, message)| FieldErrorPayload {
                field: field.to_string(),
                message: message.to_string(),
            })
            .collect(),
        body: Default::default(),
    };
    SubmitError::Client(ClientError::Api(ApiError::new(status, message, Some(payload))))
}

/// Routes `tracing` output through the test harness. Set `RUST_LOG` to see it.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn boom() -> SubmitResult {
    panic!("submit handler blew up")
}

// ── Local validation ─────────────────────────────────────────────

#[tokio::test]
async fn invalid_form_never_reaches_submit() {
    let form = FormController::new(OwnerFormValues::default());
    let called = Arc::new(AtomicBool::new(false));

    let flag = Arc::clone(&called);
    let outcome = form
        .submit(|_| async move {
            flag.store(true, Ordering::SeqCst);
            Ok::<_, SubmitError>(())
        })
        .await;

    assert_eq!(outcome, SubmitOutcome::Invalid);
    assert!(!called.load(Ordering::SeqCst));
    assert!(!form.is_submitting());
    assert_eq!(form.field_error(OwnerField::FirstName).as_deref(), Some(FIRST_NAME_REQUIRED));
    assert_eq!(form.field_error(OwnerField::City).as_deref(), Some(CITY_REQUIRED));
    assert_eq!(form.field_error(OwnerField::Telephone).as_deref(), Some(TELEPHONE_INVALID));
    assert_eq!(form.submit_error(), None);
}

#[tokio::test]
async fn telephone_with_letters_is_rejected_locally() {
    let mut values = valid_owner();
    values.telephone = "608-555-10".into();
    let form = FormController::new(values);

    let outcome = form.submit(|_| async { Ok::<_, SubmitError>(()) }).await;
    assert_eq!(outcome, SubmitOutcome::Invalid);
    assert_eq!(form.field_errors().len(), 1);
    assert_eq!(form.field_error(OwnerField::Telephone).as_deref(), Some(TELEPHONE_INVALID));
}

#[tokio::test]
async fn update_clears_only_that_field_error() {
    let form = FormController::new(OwnerFormValues::default());
    form.submit(|_| async { Ok::<_, SubmitError>(()) }).await;
    assert!(form.field_error(OwnerField::FirstName).is_some());

    form.update(OwnerField::FirstName, "Jean");
    assert_eq!(form.values().first_name, "Jean");
    assert_eq!(form.field_error(OwnerField::FirstName), None);
    assert!(form.field_error(OwnerField::LastName).is_some());
}

#[tokio::test]
async fn pet_form_requires_a_type() {
    let form = FormController::new(PetFormValues::default());
    form.update(PetField::Name, "Leo");
    form.update(PetField::BirthDate, "2010-09-07");
    form.update(PetField::TypeId, "");

    let outcome = form.submit(|_| async { Ok::<_, SubmitError>(()) }).await;
    assert_eq!(outcome, SubmitOutcome::Invalid);
    assert_eq!(form.field_error(PetField::TypeId).as_deref(), Some(PET_TYPE_REQUIRED));

    form.update(PetField::TypeId, 1_i64);
    let outcome = form.submit(|_| async { Ok::<_, SubmitError>(()) }).await;
    assert_eq!(outcome, SubmitOutcome::Submitted);
}

#[tokio::test]
async fn visit_form_sets_summary_when_fields_missing() {
    let form = FormController::new(VisitFormValues::default());
    let outcome = form.submit(|_| async { Ok::<_, SubmitError>(()) }).await;

    assert_eq!(outcome, SubmitOutcome::Invalid);
    assert_eq!(form.submit_error().as_deref(), Some(VISIT_SUMMARY));
    assert_eq!(
        form.field_error(VisitField::Description).as_deref(),
        Some(DESCRIPTION_REQUIRED)
    );
}

#[tokio::test]
async fn visit_form_bad_date_has_no_summary() {
    let form = FormController::new(VisitFormValues {
        date: "2013-02-30".into(),
        description: "rabies shot".into(),
    });
    let outcome = form.submit(|_| async { Ok::<_, SubmitError>(()) }).await;

    assert_eq!(outcome, SubmitOutcome::Invalid);
    assert_eq!(form.field_error(VisitField::Date).as_deref(), Some(DATE_INVALID));
    assert_eq!(form.submit_error(), None);
}

#[tokio::test]
async fn visit_summary_cleared_once_fields_are_present() {
    let form = FormController::new(VisitFormValues::default());
    form.submit(|_| async { Ok::<_, SubmitError>(()) }).await;
    assert_eq!(form.submit_error().as_deref(), Some(VISIT_SUMMARY));

    form.update(VisitField::Date, "2013-02-30");
    form.update(VisitField::Description, "rabies shot");
    let outcome = form.submit(|_| async { Ok::<_, SubmitError>(()) }).await;

    assert_eq!(outcome, SubmitOutcome::Invalid);
    assert_eq!(form.submit_error(), None);
    assert_eq!(form.field_error(VisitField::Date).as_deref(), Some(DATE_INVALID));
}

#[tokio::test]
async fn invalid_attempt_replaces_server_message() {
    let form = FormController::new(valid_owner());
    form.submit(|_| async { Err::<(), _>(rejection(500, "Server down", &[])) })
        .await;
    assert_eq!(form.submit_error().as_deref(), Some("Server down"));

    form.update(OwnerField::City, "");
    let outcome = form.submit(|_| async { Ok::<_, SubmitError>(()) }).await;

    assert_eq!(outcome, SubmitOutcome::Invalid);
    assert_eq!(form.submit_error(), None);
    assert_eq!(form.field_error(OwnerField::City).as_deref(), Some(CITY_REQUIRED));
}

// ── Submission ───────────────────────────────────────────────────

#[tokio::test]
async fn successful_submit_passes_values_and_clears_flag() {
    let form = FormController::new(valid_owner());
    let (tx, rx) = oneshot::channel();

    let outcome = form
        .submit(|values| async move {
            tx.send(values).unwrap();
            Ok::<_, SubmitError>(())
        })
        .await;

    assert_eq!(outcome, SubmitOutcome::Submitted);
    assert_eq!(rx.await.unwrap(), valid_owner());
    assert!(!form.is_submitting());
}

#[tokio::test]
async fn is_submitting_while_in_flight() {
    let form = FormController::new(valid_owner());
    let (tx, rx) = oneshot::channel::<()>();

    let handle = form.clone();
    let task = tokio::spawn(async move {
        handle
            .submit(|_| async move {
                rx.await.ok();
                Ok::<_, SubmitError>(())
            })
            .await
    });
    tokio::task::yield_now().await;
    assert!(form.is_submitting());

    tx.send(()).unwrap();
    assert_eq!(task.await.unwrap(), SubmitOutcome::Submitted);
    assert!(!form.is_submitting());
}

#[tokio::test]
async fn submit_clears_previous_submit_error() {
    let form = FormController::new(valid_owner());
    form.submit(|_| async { Err::<(), _>(rejection(500, "Server down", &[])) })
        .await;
    assert_eq!(form.submit_error().as_deref(), Some("Server down"));

    let (tx, rx) = oneshot::channel::<()>();
    let handle = form.clone();
    let task = tokio::spawn(async move {
        handle
            .submit(|_| async move {
                rx.await.ok();
                Ok::<_, SubmitError>(())
            })
            .await
    });
    tokio::task::yield_now().await;
    assert_eq!(form.submit_error(), None);

    tx.send(()).unwrap();
    task.await.unwrap();
}

#[tokio::test]
async fn api_rejection_sets_message_and_field_errors() {
    let form = FormController::new(valid_owner());
    let outcome = form
        .submit(|_| async {
            Err::<(), _>(rejection(400, "Validation failed", &[("telephone", "must be numeric")]))
        })
        .await;

    assert_eq!(outcome, SubmitOutcome::Rejected);
    assert_eq!(form.submit_error().as_deref(), Some("Validation failed"));
    assert_eq!(form.field_error(OwnerField::Telephone).as_deref(), Some("must be numeric"));
    assert!(!form.is_submitting());
}

#[tokio::test]
async fn server_field_error_wins_and_others_survive() {
    let form = FormController::new(valid_owner());
    form.submit(|_| async {
        Err::<(), _>(rejection(
            400,
            "Validation failed",
            &[("telephone", "too short"), ("city", "unknown city")],
        ))
    })
    .await;

    form.submit(|_| async {
        Err::<(), _>(rejection(400, "Validation failed", &[("telephone", "must be numeric")]))
    })
    .await;

    assert_eq!(form.field_error(OwnerField::Telephone).as_deref(), Some("must be numeric"));
    assert_eq!(form.field_error(OwnerField::City).as_deref(), Some("unknown city"));
}

#[tokio::test]
async fn non_api_failure_uses_its_message() {
    let form = FormController::new(valid_owner());
    let outcome = form
        .submit(|_| async { Err::<(), _>(SubmitError::precondition("Owner data not loaded")) })
        .await;

    assert_eq!(outcome, SubmitOutcome::Rejected);
    assert_eq!(form.submit_error().as_deref(), Some("Owner data not loaded"));
    assert!(form.field_errors().is_empty());
}

#[tokio::test]
async fn failure_without_message_is_unexpected_error() {
    init_tracing();
    let form = FormController::new(valid_owner());
    form.submit(|_| async { Err::<(), _>(SubmitError::precondition("")) })
        .await;
    assert_eq!(form.submit_error().as_deref(), Some(UNEXPECTED_ERROR));
}

#[tokio::test]
async fn panicking_submit_clears_flag() {
    let form = FormController::new(valid_owner());
    let handle = form.clone();

    let result = tokio::spawn(async move { handle.submit(|_| async { boom() }).await }).await;

    assert!(result.unwrap_err().is_panic());
    assert!(!form.is_submitting());
}

#[tokio::test]
async fn dropped_submit_clears_flag() {
    let form = FormController::new(valid_owner());
    let (_tx, rx) = oneshot::channel::<()>();

    let mut pending = Box::pin(form.submit(|_| async move {
        rx.await.ok();
        Ok::<_, SubmitError>(())
    }));
    assert!(futures::poll!(&mut pending).is_pending());
    assert!(form.is_submitting());

    drop(pending);
    assert!(!form.is_submitting());
}

// ── Seeding ──────────────────────────────────────────────────────

#[tokio::test]
async fn seed_with_new_generation_resets_everything() {
    let form = FormController::new(OwnerFormValues::default());
    form.submit(|_| async { Ok::<_, SubmitError>(()) }).await;
    assert!(!form.field_errors().is_empty());

    assert!(form.seed(1, valid_owner()));
    let state = form.state();
    assert_eq!(state.values, valid_owner());
    assert!(state.field_errors.is_empty());
    assert_eq!(state.submit_error, None);
    assert_eq!(form.generation(), 1);
}

#[tokio::test]
async fn seed_with_same_generation_keeps_edits() {
    let form = FormController::new(valid_owner());
    assert!(form.seed(1, valid_owner()));
    form.update(OwnerField::City, "Monona");

    assert!(!form.seed(1, valid_owner()));
    assert_eq!(form.values().city, "Monona");
}

#[tokio::test]
async fn reseed_during_submit_drops_late_errors() {
    let form = FormController::new(valid_owner());
    let (tx, rx) = oneshot::channel::<()>();

    let handle = form.clone();
    let task = tokio::spawn(async move {
        handle
            .submit(|_| async move {
                rx.await.ok();
                Err::<(), _>(rejection(400, "Validation failed", &[("city", "unknown city")]))
            })
            .await
    });
    tokio::task::yield_now().await;

    form.seed(5, OwnerFormValues::default());
    tx.send(()).unwrap();

    assert_eq!(task.await.unwrap(), SubmitOutcome::Rejected);
    assert_eq!(form.submit_error(), None);
    assert!(form.field_errors().is_empty());
    assert!(!form.is_submitting());
}
