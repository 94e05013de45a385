use chrono::NaiveDate;
use gloo_net::http::Request;
use intake::{GatewayError, Receipt, Submission, SubmissionGateway};
use serde::Deserialize;
use crate::config;

#[derive(Deserialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Deserialize)]
struct SlotsResponse {
    slots: Vec<String>,
}

/// Writes submissions to the backend's collection endpoints.
#[derive(Clone, Copy, Default, PartialEq)]
pub struct HttpGateway;

impl SubmissionGateway for HttpGateway {
    async fn create(&self, submission: Submission) -> Result<Receipt, GatewayError> {
        let url = format!("{}/api/{}", config::get_backend_url(), submission.collection);
        let response = Request::post(&url)
            .json(&submission)
            .map_err(|e| GatewayError::Encode(e.to_string()))?
            .send()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        if !response.ok() {
            let status = response.status();
            let message = match response.json::<ErrorResponse>().await {
                Ok(body) => body.error,
                Err(_) => response.status_text(),
            };
            return Err(GatewayError::Rejected { status, message });
        }

        response
            .json::<Receipt>()
            .await
            .map_err(|e| GatewayError::Store(e.to_string()))
    }
}

/// Slot labels still free on `date`.
pub async fn fetch_free_slots(date: NaiveDate) -> Result<Vec<String>, GatewayError> {
    let url = format!(
        "{}/api/bookings/slots?date={}",
        config::get_backend_url(),
        date.format("%Y-%m-%d")
    );
    let response = Request::get(&url)
        .send()
        .await
        .map_err(|e| GatewayError::Network(e.to_string()))?;

    if !response.ok() {
        return Err(GatewayError::Rejected {
            status: response.status(),
            message: response.status_text(),
        });
    }

    response
        .json::<SlotsResponse>()
        .await
        .map(|body| body.slots)
        .map_err(|e| GatewayError::Store(e.to_string()))
}
