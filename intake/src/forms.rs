use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::fields::{AdExperience, Struggle, TimeSlot};
use crate::schema::{Constraint, FieldValue};
use crate::submission::Provenance;

/// A record collected by a multi-step form.
///
/// Steps are numbered from 1. `step_fields` names the fields shown on a
/// step, and only those are checked when leaving it.
pub trait IntakeForm: Serialize {
    type Field: Copy + Ord + fmt::Debug + Serialize + 'static;

    const FIELDS: &'static [Self::Field];
    const STEP_COUNT: usize;
    const PROVENANCE: Provenance;

    fn step_fields(step: usize) -> &'static [Self::Field];

    fn constraint(field: Self::Field) -> Constraint;

    fn value(&self, field: Self::Field) -> FieldValue<'_>;

    /// Structural precondition for leaving `step`, separate from field
    /// validation. It carries no message.
    fn step_ready(&self, _step: usize) -> bool {
        true
    }
}

const URL_MESSAGE: &str = "Please enter a valid URL";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AuditRequest {
    pub name: String,
    pub business_name: String,
    pub email: String,
    pub phone: String,
    pub website: String,
    pub google_profile: String,
    pub facebook_page: String,
    pub struggle: Struggle,
    pub has_run_ads: AdExperience,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AuditField {
    Name,
    BusinessName,
    Email,
    Phone,
    Website,
    GoogleProfile,
    FacebookPage,
    Struggle,
    HasRunAds,
    Message,
}

impl IntakeForm for AuditRequest {
    type Field = AuditField;

    const FIELDS: &'static [AuditField] = &[
        AuditField::Name,
        AuditField::BusinessName,
        AuditField::Email,
        AuditField::Phone,
        AuditField::Website,
        AuditField::GoogleProfile,
        AuditField::FacebookPage,
        AuditField::Struggle,
        AuditField::HasRunAds,
        AuditField::Message,
    ];
    const STEP_COUNT: usize = 3;
    const PROVENANCE: Provenance = Provenance {
        collection: "leads",
        source: "Audit Form",
        status: "New",
    };

    fn step_fields(step: usize) -> &'static [AuditField] {
        match step {
            1 => &[
                AuditField::Name,
                AuditField::BusinessName,
                AuditField::Email,
                AuditField::Phone,
            ],
            2 => &[
                AuditField::Website,
                AuditField::GoogleProfile,
                AuditField::FacebookPage,
            ],
            3 => &[AuditField::Struggle, AuditField::HasRunAds, AuditField::Message],
            _ => &[],
        }
    }

    fn constraint(field: AuditField) -> Constraint {
        match field {
            AuditField::Name => Constraint::Required {
                min_len: 2,
                message: "Name is required",
            },
            AuditField::BusinessName => Constraint::Required {
                min_len: 2,
                message: "Business name is required",
            },
            AuditField::Email => Constraint::Email {
                message: "Please enter a valid email",
            },
            AuditField::Phone => Constraint::Phone {
                message: "Invalid phone number",
            },
            AuditField::Website | AuditField::GoogleProfile | AuditField::FacebookPage => {
                Constraint::Url {
                    message: URL_MESSAGE,
                }
            }
            AuditField::Struggle | AuditField::HasRunAds => Constraint::OneOf,
            AuditField::Message => Constraint::Unconstrained,
        }
    }

    fn value(&self, field: AuditField) -> FieldValue<'_> {
        match field {
            AuditField::Name => FieldValue::Text(&self.name),
            AuditField::BusinessName => FieldValue::Text(&self.business_name),
            AuditField::Email => FieldValue::Text(&self.email),
            AuditField::Phone => FieldValue::Text(&self.phone),
            AuditField::Website => FieldValue::Text(&self.website),
            AuditField::GoogleProfile => FieldValue::Text(&self.google_profile),
            AuditField::FacebookPage => FieldValue::Text(&self.facebook_page),
            AuditField::Struggle | AuditField::HasRunAds => FieldValue::Selected,
            AuditField::Message => FieldValue::Text(self.message.as_deref().unwrap_or_default()),
        }
    }
}

/// A consultation booking: a date and slot on step 1, contact details on step 2.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BookingRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub business_name: String,
    pub appointment_date: Option<NaiveDate>,
    pub appointment_time: Option<TimeSlot>,
}

impl BookingRequest {
    pub fn is_scheduled(&self) -> bool {
        self.appointment_date.is_some() && self.appointment_time.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum BookingField {
    Name,
    Email,
    BusinessName,
    Phone,
}

impl IntakeForm for BookingRequest {
    type Field = BookingField;

    const FIELDS: &'static [BookingField] = &[
        BookingField::Name,
        BookingField::Email,
        BookingField::BusinessName,
        BookingField::Phone,
    ];
    const STEP_COUNT: usize = 2;
    const PROVENANCE: Provenance = Provenance {
        collection: "bookings",
        source: "Booking Form",
        status: "Confirmed",
    };

    fn step_fields(step: usize) -> &'static [BookingField] {
        match step {
            2 => Self::FIELDS,
            _ => &[],
        }
    }

    fn constraint(field: BookingField) -> Constraint {
        match field {
            BookingField::Name => Constraint::Required {
                min_len: 2,
                message: "Name is required",
            },
            BookingField::Email => Constraint::Email {
                message: "Invalid email",
            },
            BookingField::BusinessName => Constraint::Required {
                min_len: 2,
                message: "Business name is required",
            },
            BookingField::Phone => Constraint::Required {
                min_len: 10,
                message: "Invalid phone number",
            },
        }
    }

    fn value(&self, field: BookingField) -> FieldValue<'_> {
        match field {
            BookingField::Name => FieldValue::Text(&self.name),
            BookingField::Email => FieldValue::Text(&self.email),
            BookingField::BusinessName => FieldValue::Text(&self.business_name),
            BookingField::Phone => FieldValue::Text(&self.phone),
        }
    }

    fn step_ready(&self, step: usize) -> bool {
        step != 1 || self.is_scheduled()
    }
}
