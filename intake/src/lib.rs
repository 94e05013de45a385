//! Multi-step lead intake engine shared by the site frontend and the backend.
//!
//! A form is a record type implementing [`forms::IntakeForm`]. The schema
//! validates it per step or as a whole, [`steps::StepController`] gates
//! movement between steps, and [`submission::FormSession`] ties both to a
//! single write through a [`submission::SubmissionGateway`].

pub mod fields;
pub mod schema;
pub mod forms;
pub mod steps;
pub mod submission;

pub use fields::{AdExperience, Struggle, TimeSlot};
pub use forms::{AuditField, AuditRequest, BookingField, BookingRequest, IntakeForm};
pub use schema::{validate_all, validate_fields, Constraint, FieldErrors, FieldValue};
pub use steps::{Advance, StepController};
pub use submission::{
    FormSession, GatewayError, Provenance, Receipt, SubmitOutcome, SubmitRejected, Submission,
    SubmissionGateway,
};
