use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use crate::error::AppResult;

use super::models::{EventEnvelope, SubmitResult};

const JSON_MEDIA_TYPE: &str = "application/json";

#[derive(Debug, Clone)]
pub struct MispClient {
    http: Client,
}

impl MispClient {
    pub fn new(timeout: Duration) -> AppResult<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http })
    }

    /// POSTs one event. Only `200 OK` counts as accepted; the status is
    /// returned either way so callers can report it verbatim.
    pub async fn submit(
        &self,
        url: &Url,
        auth_token: &str,
        envelope: &EventEnvelope,
    ) -> AppResult<SubmitResult> {
        let body = serde_json::to_vec(envelope)?;
        debug!(%url, bytes = body.len(), "posting event");

        let response = self
            .http
            .post(url.clone())
            .header(ACCEPT, JSON_MEDIA_TYPE)
            .header(CONTENT_TYPE, JSON_MEDIA_TYPE)
            .header(AUTHORIZATION, auth_token)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let accepted = status == StatusCode::OK;
        if !accepted {
            let body = response.text().await.unwrap_or_default();
            let detail = parse_error_message(&body).unwrap_or_else(|| summarize_body(&body));
            warn!(%url, status = status.as_u16(), %detail, "event rejected");
        }

        Ok(SubmitResult {
            status: status.as_u16(),
            accepted,
        })
    }
}

#[derive(Debug, Deserialize)]
struct MispErrorResponse {
    name: Option<String>,
    message: Option<String>,
    url: Option<String>,
}

fn parse_error_message(body: &str) -> Option<String> {
    let response = serde_json::from_str::<MispErrorResponse>(body).ok()?;
    let mut parts = Vec::new();

    if let Some(message) = response.message.or(response.name) {
        parts.push(message);
    }

    if let Some(url) = response.url {
        parts.push(format!("url={url}"));
    }

    if parts.is_empty() {
        return None;
    }

    Some(parts.join(", "))
}

fn summarize_body(body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        return "no error details in response body".to_string();
    }

    let mut end = body.len().min(200);
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    body[..end].to_string()
}
