use crate::errors::SiteError;
use reqwest::{Client, header::ACCEPT};
use serde::Serialize;
use tracing::{info, warn};

pub const SUCCESS_MESSAGE: &str = "Thanks, we've received your request!";
pub const FAILURE_MESSAGE: &str = "Hmm—something went wrong. Try again?";
pub const UNCONFIGURED_MESSAGE: &str = "booking is not configured.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookingOutcome {
    pub ok: bool,
    pub message: String,
}

impl BookingOutcome {
    fn new(ok: bool, message: &str) -> Self {
        Self {
            ok,
            message: message.to_string(),
        }
    }
}

/// Forwards booking form fields to the hosted form endpoint.
#[derive(Clone)]
pub struct BookingClient {
    client: Client,
    endpoint: Option<String>,
}

impl BookingClient {
    pub fn new(client: Client, endpoint: Option<String>) -> Self {
        Self { client, endpoint }
    }

    pub async fn submit(&self, fields: &[(String, String)]) -> Result<(), SiteError> {
        let endpoint = self
            .endpoint
            .as_deref()
            .ok_or(SiteError::ConfigurationMissing("booking endpoint"))?;

        let response = self
            .client
            .post(endpoint)
            .header(ACCEPT, "application/json")
            .form(fields)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(SiteError::Status(response.status().as_u16()));
        }
        Ok(())
    }

    pub async fn send(&self, fields: &[(String, String)]) -> BookingOutcome {
        match self.submit(fields).await {
            Ok(()) => {
                info!("booking request forwarded ({} fields)", fields.len());
                BookingOutcome::new(true, SUCCESS_MESSAGE)
            }
            Err(SiteError::ConfigurationMissing(what)) => {
                warn!("{what} is not configured");
                BookingOutcome::new(false, UNCONFIGURED_MESSAGE)
            }
            Err(err) => {
                warn!("booking submit failed: {err}");
                BookingOutcome::new(false, FAILURE_MESSAGE)
            }
        }
    }
}
