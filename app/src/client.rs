use crate::config::Config;
use crate::error::{FleetError, Result};
use crate::models::{LoginRequest, LoginResponse, Resource};
use crate::session::Session;
use reqwest::{Client, RequestBuilder, Response};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

const LOGIN_PATH: &str = "auth/login";
/// Stored when the backend accepts the credentials without issuing a token.
pub const FALLBACK_TOKEN: &str = "authenticated";

pub struct FleetClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl FleetClient {
    pub fn new(base_url: String) -> Result<Self> {
        Self::with_timeout(base_url, None)
    }

    pub fn with_timeout(base_url: String, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(FleetError::Http)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::with_timeout(config.api_url.clone(), config.request_timeout)
    }

    /// Attaches the stored session token to every subsequent request.
    pub fn authenticated(mut self, session: &Session) -> Self {
        self.token = Some(session.token.clone());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Session> {
        let url = self.url(LOGIN_PATH);
        debug!("POST {}", url);

        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response = self.client.post(&url).json(&body).send().await?;
        let response = check_status(response, &url).await?;
        let login: LoginResponse = response.json().await?;

        let user = login.user.ok_or_else(|| {
            FleetError::InvalidResponse("login response without usuario".to_string())
        })?;
        let token = login
            .token
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| FALLBACK_TOKEN.to_string());

        Ok(Session { token, user })
    }

    pub async fn list<R: Resource>(&self) -> Result<Vec<R>> {
        let url = self.url(R::PATH);
        debug!("GET {}", url);

        let response = self.authorize(self.client.get(&url)).send().await?;
        let response = check_status(response, &url).await?;
        let records: Vec<R> = response.json().await?;
        debug!("Fetched {} record(s) from {}", records.len(), R::PATH);

        Ok(records)
    }

    pub async fn create<R: Resource, B: Serialize + ?Sized>(&self, body: &B) -> Result<()> {
        let url = self.url(R::PATH);
        debug!("POST {}", url);

        let response = self.authorize(self.client.post(&url)).json(body).send().await?;
        check_status(response, &url).await?;
        Ok(())
    }

    pub async fn update<R: Resource, B: Serialize + ?Sized>(&self, id: &str, body: &B) -> Result<()> {
        let url = format!("{}/{}", self.url(R::PATH), id);
        debug!("PUT {}", url);

        let response = self.authorize(self.client.put(&url)).json(body).send().await?;
        check_status(response, &url).await?;
        Ok(())
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

async fn check_status(response: Response, url: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    warn!("HTTP {} for url={}", status, url);
    if status == reqwest::StatusCode::UNAUTHORIZED {
        return Err(FleetError::Unauthorized);
    }

    let body = response.text().await.unwrap_or_default();
    Err(FleetError::Api {
        status: status.as_u16(),
        message: extract_message(&body),
    })
}

/// Pulls `message`/`mensaje` out of a JSON error body, else returns the text.
fn extract_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            ["message", "mensaje", "error"]
                .iter()
                .find_map(|key| value.get(key).and_then(|v| v.as_str()).map(str::to_string))
        })
        .unwrap_or_else(|| body.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_without_double_slash() {
        let client = FleetClient::new("http://fleet.local/api/".to_string()).unwrap();
        assert_eq!(client.base_url(), "http://fleet.local/api");
        assert_eq!(client.url("unidades"), "http://fleet.local/api/unidades");
    }

    #[test]
    fn test_extract_message_prefers_json_fields() {
        assert_eq!(extract_message(r#"{"mensaje": "Placa duplicada"}"#), "Placa duplicada");
        assert_eq!(extract_message(r#"{"message": "boom", "mensaje": "x"}"#), "boom");
    }

    #[test]
    fn test_extract_message_falls_back_to_text() {
        assert_eq!(extract_message("  Internal Server Error \n"), "Internal Server Error");
        assert_eq!(extract_message(r#"{"code": 7}"#), r#"{"code": 7}"#);
    }
}
