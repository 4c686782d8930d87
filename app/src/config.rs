use crate::error::{FleetError, Result};
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_API_URL: &str = "http://localhost:5000/api";
const DEFAULT_SESSION_FILE: &str = ".fleet_session.json";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub session_file: PathBuf,
    pub request_timeout: Option<Duration>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let api_url = dotenvy::var("FLEET_API_URL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_url = normalize_base_url(&api_url)?;

        let session_file = dotenvy::var("FLEET_SESSION_FILE")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_SESSION_FILE), PathBuf::from);

        let request_timeout = match dotenvy::var("FLEET_REQUEST_TIMEOUT_SECS")
            .ok()
            .filter(|s| !s.trim().is_empty())
        {
            None => None,
            Some(raw) => Some(parse_timeout(&raw)?),
        };

        Ok(Self {
            api_url,
            session_file,
            request_timeout,
        })
    }

    /// Applies CLI overrides on top of the environment.
    pub fn with_overrides(
        mut self,
        api_url: Option<&str>,
        session_file: Option<PathBuf>,
    ) -> Result<Self> {
        if let Some(url) = api_url {
            self.api_url = normalize_base_url(url)?;
        }
        if let Some(path) = session_file {
            self.session_file = path;
        }
        Ok(self)
    }
}

fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(FleetError::Config(format!(
            "Invalid FLEET_API_URL '{raw}' (expected http:// or https://)"
        )));
    }
    Ok(trimmed.to_string())
}

fn parse_timeout(raw: &str) -> Result<Duration> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(FleetError::Config(
            "Invalid FLEET_REQUEST_TIMEOUT_SECS".to_string(),
        )),
    }
}
