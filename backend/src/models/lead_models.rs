use diesel::prelude::*;
use intake::{AuditRequest, BookingRequest};
use crate::schema::leads;
use crate::schema::bookings;


#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = leads)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Lead {
    pub id: i32,
    pub reference: String, // public id handed back to the form
    pub name: String,
    pub business_name: String,
    pub email: String,
    pub phone: String, // empty when not given
    pub website: String,
    pub google_profile: String,
    pub facebook_page: String,
    pub struggle: String, // option label, e.g. "Not Sure"
    pub has_run_ads: String,
    pub message: Option<String>,
    pub status: String, // New -> Contacted -> Qualified -> Closed
    pub source: String, // which form produced it
    pub created_at: i32, // int timestamp utc epoch, set by the server
}

#[derive(Insertable)]
#[diesel(table_name = leads)]
pub struct NewLead {
    pub reference: String,
    pub name: String,
    pub business_name: String,
    pub email: String,
    pub phone: String,
    pub website: String,
    pub google_profile: String,
    pub facebook_page: String,
    pub struggle: String,
    pub has_run_ads: String,
    pub message: Option<String>,
    pub status: String,
    pub source: String,
    pub created_at: i32,
}

impl NewLead {
    pub fn from_request(request: AuditRequest, reference: String, created_at: i32) -> Self {
        let provenance = <AuditRequest as intake::IntakeForm>::PROVENANCE;
        Self {
            reference,
            name: request.name.trim().to_string(),
            business_name: request.business_name.trim().to_string(),
            email: request.email,
            phone: request.phone,
            website: request.website,
            google_profile: request.google_profile,
            facebook_page: request.facebook_page,
            struggle: request.struggle.label().to_string(),
            has_run_ads: request.has_run_ads.label().to_string(),
            message: request.message.filter(|m| !m.trim().is_empty()),
            status: provenance.status.to_string(),
            source: provenance.source.to_string(),
            created_at,
        }
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = bookings)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Booking {
    pub id: i32,
    pub reference: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub business_name: String,
    pub appointment_date: String, // YYYY-MM-DD
    pub appointment_time: String, // slot label, e.g. "10:30 AM"
    pub status: String,
    pub source: String,
    pub created_at: i32,
}

#[derive(Insertable)]
#[diesel(table_name = bookings)]
pub struct NewBooking {
    pub reference: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub business_name: String,
    pub appointment_date: String,
    pub appointment_time: String,
    pub status: String,
    pub source: String,
    pub created_at: i32,
}

impl NewBooking {
    /// None when the request has no date or slot.
    pub fn from_request(request: BookingRequest, reference: String, created_at: i32) -> Option<Self> {
        let date = request.appointment_date?;
        let slot = request.appointment_time?;
        let provenance = <BookingRequest as intake::IntakeForm>::PROVENANCE;
        Some(Self {
            reference,
            name: request.name.trim().to_string(),
            email: request.email,
            phone: request.phone.trim().to_string(),
            business_name: request.business_name.trim().to_string(),
            appointment_date: date.format("%Y-%m-%d").to_string(),
            appointment_time: slot.label().to_string(),
            status: provenance.status.to_string(),
            source: provenance.source.to_string(),
            created_at,
        })
    }
}
