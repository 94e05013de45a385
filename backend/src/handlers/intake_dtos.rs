use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use crate::models::lead_models::{Booking, Lead};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeadStatus {
    New,
    Contacted,
    Qualified,
    Closed,
}

impl LeadStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            LeadStatus::New => "New",
            LeadStatus::Contacted => "Contacted",
            LeadStatus::Qualified => "Qualified",
            LeadStatus::Closed => "Closed",
        }
    }
}

#[derive(Deserialize)]
pub struct StatusUpdateRequest {
    pub status: LeadStatus,
}

#[derive(Deserialize)]
pub struct SlotsQuery {
    pub date: NaiveDate,
}

#[derive(Serialize, Deserialize)]
pub struct SlotsResponse {
    pub date: NaiveDate,
    pub slots: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadResponse {
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

impl From<Lead> for LeadResponse {
    fn from(lead: Lead) -> Self {
        Self {
            reference: lead.reference,
            name: lead.name,
            business_name: lead.business_name,
            email: lead.email,
            phone: lead.phone,
            website: lead.website,
            google_profile: lead.google_profile,
            facebook_page: lead.facebook_page,
            struggle: lead.struggle,
            has_run_ads: lead.has_run_ads,
            message: lead.message,
            status: lead.status,
            source: lead.source,
            created_at: lead.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
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

impl From<Booking> for BookingResponse {
    fn from(booking: Booking) -> Self {
        Self {
            reference: booking.reference,
            name: booking.name,
            email: booking.email,
            phone: booking.phone,
            business_name: booking.business_name,
            appointment_date: booking.appointment_date,
            appointment_time: booking.appointment_time,
            status: booking.status,
            source: booking.source,
            created_at: booking.created_at,
        }
    }
}
