use std::marker::PhantomData;

use crate::forms::IntakeForm;
use crate::schema::{validate_fields, FieldErrors};

/// Result of trying to leave the current step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance<F: Ord> {
    /// All fields on the step passed. Holds the step now current, which is
    /// unchanged when the controller was already on the last step.
    Moved(usize),
    Blocked(FieldErrors<F>),
    /// The step's structural precondition is unmet.
    NotReady,
}

impl<F: Ord> Advance<F> {
    pub fn is_ok(&self) -> bool {
        matches!(self, Advance::Moved(_))
    }
}

/// Tracks the current step of one form instance, always within `1..=STEP_COUNT`.
#[derive(Debug)]
pub struct StepController<T> {
    current: usize,
    _form: PhantomData<fn() -> T>,
}

impl<T: IntakeForm> StepController<T> {
    pub fn new() -> Self {
        Self {
            current: 1,
            _form: PhantomData,
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn total(&self) -> usize {
        T::STEP_COUNT
    }

    pub fn is_first(&self) -> bool {
        self.current == 1
    }

    pub fn is_last(&self) -> bool {
        self.current == T::STEP_COUNT
    }

    pub fn current_fields(&self) -> &'static [T::Field] {
        T::step_fields(self.current)
    }

    /// Whether the forward affordance should be enabled at all.
    pub fn can_advance(&self, record: &T) -> bool {
        record.step_ready(self.current)
    }

    pub fn advance(&mut self, record: &T) -> Advance<T::Field> {
        if !record.step_ready(self.current) {
            return Advance::NotReady;
        }

        let errors = validate_fields(record, self.current_fields());
        if !errors.is_empty() {
            tracing::debug!(step = self.current, failed = errors.len(), "step blocked");
            return Advance::Blocked(errors);
        }

        self.current = (self.current + 1).min(T::STEP_COUNT);
        Advance::Moved(self.current)
    }

    /// Moves back one step without validating anything.
    pub fn retreat(&mut self) {
        self.current = self.current.saturating_sub(1).max(1);
    }
}

impl<T: IntakeForm> Default for StepController<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::fields::TimeSlot;
    use crate::forms::{AuditField, AuditRequest, BookingField, BookingRequest};

    fn contact_details() -> AuditRequest {
        AuditRequest {
            name: "Jo".into(),
            business_name: "Jo Co".into(),
            email: "jo@x.com".into(),
            phone: String::new(),
            ..Default::default()
        }
    }

    #[test]
    fn starts_on_step_one() {
        let steps = StepController::<AuditRequest>::new();
        assert_eq!(steps.current(), 1);
        assert_eq!(steps.total(), 3);
        assert!(steps.is_first());
    }

    #[test]
    fn advances_when_contact_details_pass() {
        let mut steps = StepController::new();
        assert_eq!(steps.advance(&contact_details()), Advance::Moved(2));
        assert_eq!(steps.current(), 2);
    }

    #[test]
    fn empty_name_blocks_and_names_the_field() {
        let mut steps = StepController::new();
        let record = AuditRequest {
            name: String::new(),
            ..contact_details()
        };
        match steps.advance(&record) {
            Advance::Blocked(errors) => {
                assert_eq!(errors.get(AuditField::Name), Some("Name is required"));
                assert_eq!(errors.len(), 1);
            }
            other => panic!("expected a block, got {other:?}"),
        }
        assert_eq!(steps.current(), 1);
    }

    #[test]
    fn advance_is_capped_at_the_last_step() {
        let mut steps = StepController::new();
        let record = contact_details();
        assert_eq!(steps.advance(&record), Advance::Moved(2));
        assert_eq!(steps.advance(&record), Advance::Moved(3));
        assert!(steps.is_last());
        assert_eq!(steps.advance(&record), Advance::Moved(3));
        assert_eq!(steps.current(), 3);
    }

    #[test]
    fn bad_url_blocks_step_two_only() {
        let mut steps = StepController::new();
        let mut record = contact_details();
        steps.advance(&record);
        record.website = "yourbusiness.com".into();
        assert!(!steps.advance(&record).is_ok());
        assert_eq!(steps.current(), 2);
    }

    #[test]
    fn retreat_ignores_validity_and_floors_at_one() {
        let mut steps = StepController::new();
        steps.advance(&contact_details());
        steps.advance(&contact_details());
        assert_eq!(steps.current(), 3);

        steps.retreat();
        assert_eq!(steps.current(), 2);
        steps.retreat();
        steps.retreat();
        steps.retreat();
        assert_eq!(steps.current(), 1);
    }

    #[test]
    fn booking_needs_date_and_slot_before_details() {
        let mut steps = StepController::new();
        let mut booking = BookingRequest::default();
        assert!(!steps.can_advance(&booking));
        assert_eq!(steps.advance(&booking), Advance::NotReady);

        booking.appointment_time = Some(TimeSlot::FourPm);
        assert_eq!(steps.advance(&booking), Advance::NotReady);
        assert_eq!(steps.current(), 1);

        booking.appointment_date = NaiveDate::from_ymd_opt(2030, 1, 2);
        assert_eq!(steps.advance(&booking), Advance::Moved(2));
    }

    #[test]
    fn booking_details_are_checked_on_the_last_step() {
        let mut steps = StepController::new();
        let mut booking = BookingRequest {
            appointment_date: NaiveDate::from_ymd_opt(2030, 1, 2),
            appointment_time: Some(TimeSlot::NineAm),
            ..Default::default()
        };
        steps.advance(&booking);
        booking.email = "not-an-email".into();
        match steps.advance(&booking) {
            Advance::Blocked(errors) => {
                assert_eq!(errors.get(BookingField::Email), Some("Invalid email"));
            }
            other => panic!("expected a block, got {other:?}"),
        }
    }
}
