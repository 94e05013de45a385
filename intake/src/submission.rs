use std::fmt;

use serde::{Deserialize, Serialize};

use crate::forms::IntakeForm;
use crate::schema::{validate_all, validate_fields, FieldErrors};
use crate::steps::{Advance, StepController};

/// Where a form's records are written and how they are tagged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Provenance {
    pub collection: &'static str,
    pub source: &'static str,
    pub status: &'static str,
}

/// The envelope handed to the gateway. The store stamps the creation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub collection: String,
    pub source: String,
    pub status: String,
    pub record: serde_json::Value,
}

impl Submission {
    pub fn new<T: IntakeForm>(record: &T) -> Result<Self, serde_json::Error> {
        let Provenance {
            collection,
            source,
            status,
        } = T::PROVENANCE;
        Ok(Self {
            collection: collection.to_string(),
            source: source.to_string(),
            status: status.to_string(),
            record: serde_json::to_value(record)?,
        })
    }
}

/// The store's identifier for a written document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub reference: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    #[error("network error: {0}")]
    Network(String),
    #[error("store rejected the write ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("failed to encode submission: {0}")]
    Encode(String),
    #[error("store error: {0}")]
    Store(String),
}

/// A single opaque write to the remote store.
///
/// Implementations do not deduplicate; [`FormSession`] guarantees at most one
/// call per successful submission.
#[allow(async_fn_in_trait)]
pub trait SubmissionGateway {
    async fn create(&self, submission: Submission) -> Result<Receipt, GatewayError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitRejected<F: Ord + fmt::Debug> {
    #[error("a submission is already in flight")]
    InFlight,
    #[error("the form was already submitted")]
    AlreadySubmitted,
    /// Submitting is only possible from the final step.
    #[error("the form is not on its last step")]
    NotOnLastStep,
    /// A step's structural precondition is unmet.
    #[error("a required selection is missing")]
    Incomplete,
    #[error("the record failed validation")]
    Invalid(FieldErrors<F>),
    #[error("failed to encode the record: {0}")]
    Encode(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Success(Receipt),
    /// The write failed; the record is kept so the user can try again.
    Failure(GatewayError),
    /// An outcome arrived while no submission was in flight.
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Editing,
    Submitting,
    Submitted,
}

/// One mounted form: its record, step position, last validation result and
/// submission phase. Nothing here is shared between instances.
pub struct FormSession<T: IntakeForm> {
    record: T,
    steps: StepController<T>,
    errors: FieldErrors<T::Field>,
    phase: Phase,
    on_success: Option<Box<dyn FnMut()>>,
}

impl<T: IntakeForm + Default> FormSession<T> {
    pub fn new() -> Self {
        Self::with_record(T::default())
    }
}

impl<T: IntakeForm + Default> Default for FormSession<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: IntakeForm> FormSession<T> {
    pub fn with_record(record: T) -> Self {
        Self {
            record,
            steps: StepController::new(),
            errors: FieldErrors::new(),
            phase: Phase::Editing,
            on_success: None,
        }
    }

    /// Runs `hook` once, after the first successful write.
    pub fn on_success(mut self, hook: impl FnMut() + 'static) -> Self {
        self.on_success = Some(Box::new(hook));
        self
    }

    pub fn record(&self) -> &T {
        &self.record
    }

    pub fn step(&self) -> usize {
        self.steps.current()
    }

    pub fn steps(&self) -> &StepController<T> {
        &self.steps
    }

    pub fn errors(&self) -> &FieldErrors<T::Field> {
        &self.errors
    }

    pub fn error(&self, field: T::Field) -> Option<&'static str> {
        self.errors.get(field)
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == Phase::Submitting
    }

    pub fn is_submitted(&self) -> bool {
        self.phase == Phase::Submitted
    }

    /// Applies `change` to the record. Refused while a write is in flight
    /// and after the record was submitted.
    ///
    /// Fields that currently show an error are checked again so the message
    /// clears as soon as the value is fixed.
    pub fn edit(&mut self, change: impl FnOnce(&mut T)) -> bool {
        if self.phase != Phase::Editing {
            return false;
        }
        change(&mut self.record);

        if !self.errors.is_empty() {
            let failing: Vec<T::Field> = self.errors.iter().map(|(field, _)| field).collect();
            self.errors.clear_fields(&failing);
            self.errors.merge(validate_fields(&self.record, &failing));
        }
        true
    }

    pub fn advance(&mut self) -> Advance<T::Field> {
        let fields = self.steps.current_fields();
        let outcome = self.steps.advance(&self.record);
        match &outcome {
            Advance::Moved(_) => self.errors.clear_fields(fields),
            Advance::Blocked(errors) => {
                self.errors.clear_fields(fields);
                self.errors.merge(errors.clone());
            }
            Advance::NotReady => {}
        }
        outcome
    }

    pub fn retreat(&mut self) {
        self.steps.retreat();
    }

    /// Freezes the record for a write and returns the envelope to send.
    ///
    /// Every step's precondition and every field are checked again, since an
    /// earlier step may have been edited after it was passed.
    pub fn begin_submit(&mut self) -> Result<Submission, SubmitRejected<T::Field>> {
        match self.phase {
            Phase::Submitting => return Err(SubmitRejected::InFlight),
            Phase::Submitted => return Err(SubmitRejected::AlreadySubmitted),
            Phase::Editing => {}
        }

        if !self.steps.is_last() {
            return Err(SubmitRejected::NotOnLastStep);
        }

        if !(1..=T::STEP_COUNT).all(|step| self.record.step_ready(step)) {
            return Err(SubmitRejected::Incomplete);
        }

        let errors = validate_all(&self.record);
        if !errors.is_empty() {
            self.errors = errors.clone();
            return Err(SubmitRejected::Invalid(errors));
        }

        let submission =
            Submission::new(&self.record).map_err(|e| SubmitRejected::Encode(e.to_string()))?;
        self.errors.clear();
        self.phase = Phase::Submitting;
        Ok(submission)
    }

    /// Records the gateway's answer for the write started by `begin_submit`.
    pub fn finish_submit(&mut self, result: Result<Receipt, GatewayError>) -> SubmitOutcome {
        let collection = T::PROVENANCE.collection;
        if self.phase != Phase::Submitting {
            tracing::warn!(collection, "submission outcome arrived with nothing in flight");
            return SubmitOutcome::Ignored;
        }

        match result {
            Ok(receipt) => {
                tracing::info!(collection, reference = %receipt.reference, "submission stored");
                self.phase = Phase::Submitted;
                if let Some(mut hook) = self.on_success.take() {
                    hook();
                }
                SubmitOutcome::Success(receipt)
            }
            Err(e) => {
                tracing::error!(collection, error = %e, "error submitting {}", T::PROVENANCE.source);
                self.phase = Phase::Editing;
                SubmitOutcome::Failure(e)
            }
        }
    }

    pub async fn submit<G: SubmissionGateway>(
        &mut self,
        gateway: &G,
    ) -> Result<SubmitOutcome, SubmitRejected<T::Field>> {
        let submission = self.begin_submit()?;
        let result = gateway.create(submission).await;
        Ok(self.finish_submit(result))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use chrono::NaiveDate;

    use super::*;
    use crate::fields::{AdExperience, Struggle, TimeSlot};
    use crate::forms::{AuditField, AuditRequest, BookingField, BookingRequest};

    #[derive(Default)]
    struct RecordingGateway {
        calls: RefCell<Vec<Submission>>,
        fail_next: Cell<bool>,
    }

    impl SubmissionGateway for RecordingGateway {
        async fn create(&self, submission: Submission) -> Result<Receipt, GatewayError> {
            self.calls.borrow_mut().push(submission);
            if self.fail_next.replace(false) {
                return Err(GatewayError::Network("connection reset".into()));
            }
            Ok(Receipt {
                reference: format!("doc-{}", self.calls.borrow().len()),
            })
        }
    }

    fn valid_audit() -> AuditRequest {
        AuditRequest {
            name: "Jo".into(),
            business_name: "Jo Co".into(),
            email: "jo@x.com".into(),
            phone: "+1 (555) 000-0000".into(),
            website: "https://joco.example".into(),
            struggle: Struggle::Conversions,
            has_run_ads: AdExperience::No,
            message: Some("More calls please".into()),
            ..Default::default()
        }
    }

    fn counter() -> (Rc<Cell<usize>>, impl FnMut() + 'static) {
        let count = Rc::new(Cell::new(0));
        let hook_count = count.clone();
        (count, move || hook_count.set(hook_count.get() + 1))
    }

    #[tokio::test]
    async fn audit_submission_writes_once_and_fires_on_success_once() {
        let gateway = RecordingGateway::default();
        let (fired, hook) = counter();
        let mut session = FormSession::with_record(valid_audit()).on_success(hook);
        session.advance();
        session.advance();

        let submission = session.begin_submit().unwrap();
        assert_eq!(submission.collection, "leads");
        assert_eq!(submission.source, "Audit Form");
        assert_eq!(submission.status, "New");
        assert_eq!(submission.record["businessName"], "Jo Co");
        assert_eq!(submission.record["struggle"], "Conversions");
        assert!(session.is_submitting());

        // a second click while the write is in flight
        assert_eq!(session.begin_submit(), Err(SubmitRejected::InFlight));

        let result = gateway.create(submission).await;
        assert!(matches!(session.finish_submit(result), SubmitOutcome::Success(_)));
        assert!(session.is_submitted());
        assert!(!session.is_submitting());

        assert_eq!(session.begin_submit(), Err(SubmitRejected::AlreadySubmitted));
        assert_eq!(
            session.submit(&gateway).await,
            Err(SubmitRejected::AlreadySubmitted)
        );
        assert_eq!(gateway.calls.borrow().len(), 1);
        assert_eq!(fired.get(), 1);
    }

    #[tokio::test]
    async fn invalid_booking_email_never_reaches_the_gateway() {
        let gateway = RecordingGateway::default();
        let mut session = FormSession::<BookingRequest>::new();
        session.edit(|b| {
            b.appointment_date = NaiveDate::from_ymd_opt(2030, 3, 4);
            b.appointment_time = Some(TimeSlot::TwoThirtyPm);
        });
        assert!(session.advance().is_ok());
        assert_eq!(session.step(), 2);

        session.edit(|b| {
            b.name = "Jo".into();
            b.business_name = "Jo Co".into();
            b.phone = "555 000 0000".into();
            b.email = "not-an-email".into();
        });

        match session.submit(&gateway).await {
            Err(SubmitRejected::Invalid(errors)) => {
                assert_eq!(errors.get(BookingField::Email), Some("Invalid email"));
            }
            other => panic!("expected invalid, got {other:?}"),
        }
        assert_eq!(session.error(BookingField::Email), Some("Invalid email"));
        assert!(gateway.calls.borrow().is_empty());
        assert!(!session.is_submitting());
    }

    #[tokio::test]
    async fn booking_without_a_slot_is_incomplete() {
        let gateway = RecordingGateway::default();
        let mut session = FormSession::with_record(BookingRequest {
            name: "Jo".into(),
            email: "jo@x.com".into(),
            business_name: "Jo Co".into(),
            phone: "5550000000".into(),
            appointment_date: NaiveDate::from_ymd_opt(2030, 3, 4),
            appointment_time: Some(TimeSlot::NineAm),
        });
        assert_eq!(session.advance(), Advance::Moved(2));
        session.edit(|b| b.appointment_time = None);
        assert_eq!(session.submit(&gateway).await, Err(SubmitRejected::Incomplete));
        assert!(gateway.calls.borrow().is_empty());
    }

    #[tokio::test]
    async fn failed_write_keeps_the_record_for_a_retry() {
        let gateway = RecordingGateway::default();
        gateway.fail_next.set(true);
        let (fired, hook) = counter();
        let mut session = FormSession::with_record(valid_audit()).on_success(hook);
        session.advance();
        session.advance();

        let outcome = session.submit(&gateway).await.unwrap();
        assert_eq!(
            outcome,
            SubmitOutcome::Failure(GatewayError::Network("connection reset".into()))
        );
        assert!(!session.is_submitting());
        assert!(!session.is_submitted());
        assert_eq!(session.record(), &valid_audit());
        assert_eq!(fired.get(), 0);

        let outcome = session.submit(&gateway).await.unwrap();
        assert_eq!(
            outcome,
            SubmitOutcome::Success(Receipt {
                reference: "doc-2".into()
            })
        );
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn record_is_frozen_while_submitting_and_after() {
        let mut session = FormSession::with_record(valid_audit());
        assert!(session.edit(|a| a.name = "Joanna".into()));
        session.advance();
        session.advance();

        session.begin_submit().unwrap();
        assert!(!session.edit(|a| a.name = "Someone else".into()));

        session.finish_submit(Ok(Receipt {
            reference: "doc-1".into(),
        }));
        assert!(!session.edit(|a| a.name = "Someone else".into()));
        assert_eq!(session.record().name, "Joanna");
    }

    #[tokio::test]
    async fn submitting_before_the_last_step_is_refused() {
        let gateway = RecordingGateway::default();
        let mut session = FormSession::with_record(valid_audit());

        assert_eq!(session.begin_submit(), Err(SubmitRejected::NotOnLastStep));
        session.advance();
        assert_eq!(session.step(), 2);
        assert_eq!(
            session.submit(&gateway).await,
            Err(SubmitRejected::NotOnLastStep)
        );
        assert!(!session.is_submitting());
        assert!(gateway.calls.borrow().is_empty());

        session.advance();
        assert!(session.begin_submit().is_ok());
    }

    #[test]
    fn late_outcome_is_ignored() {
        let mut session = FormSession::with_record(valid_audit());
        session.advance();
        session.advance();
        assert_eq!(
            session.finish_submit(Err(GatewayError::Store("late".into()))),
            SubmitOutcome::Ignored
        );
        assert!(!session.is_submitted());
    }

    #[test]
    fn rejections_read_as_messages() {
        let rejected: SubmitRejected<AuditField> = SubmitRejected::NotOnLastStep;
        assert_eq!(rejected.to_string(), "the form is not on its last step");
        let rejected: SubmitRejected<AuditField> = SubmitRejected::Encode("bad".into());
        assert_eq!(rejected.to_string(), "failed to encode the record: bad");
        let boxed: Box<dyn std::error::Error> = Box::new(SubmitRejected::<AuditField>::InFlight);
        assert_eq!(boxed.to_string(), "a submission is already in flight");
    }

    #[test]
    fn fixing_a_field_clears_its_message() {
        let mut session = FormSession::<AuditRequest>::new();
        session.edit(|a| {
            a.business_name = "Jo Co".into();
            a.email = "jo@x.com".into();
        });
        assert!(!session.advance().is_ok());
        assert_eq!(session.error(AuditField::Name), Some("Name is required"));

        session.edit(|a| a.name = "J".into());
        assert_eq!(session.error(AuditField::Name), Some("Name is required"));

        session.edit(|a| a.name = "Jo".into());
        assert!(session.errors().is_empty());
        assert_eq!(session.advance(), Advance::Moved(2));
    }

    #[test]
    fn going_back_keeps_answers_and_skips_validation() {
        let mut session = FormSession::with_record(valid_audit());
        session.advance();
        session.edit(|a| a.website = "broken".into());
        session.retreat();
        assert_eq!(session.step(), 1);
        assert_eq!(session.record().website, "broken");
        assert!(session.errors().is_empty());
    }
}
