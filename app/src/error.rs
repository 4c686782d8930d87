use std::fmt;

#[derive(Debug)]
pub enum FleetError {
    Http(reqwest::Error),
    Validation(String),
    Unauthorized,
    Api { status: u16, message: String },
    InvalidResponse(String),
    Config(String),
    Session(String),
    NotAuthenticated,
}

impl FleetError {
    /// Text shown to the operator. Backend failures are not told apart.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(msg) => msg.clone(),
            Self::NotAuthenticated => {
                "No hay una sesión activa, inicia sesión con `login`".to_string()
            }
            Self::Config(msg) => format!("Configuración inválida: {msg}"),
            Self::Session(msg) => format!("No se pudo acceder a la sesión: {msg}"),
            Self::Http(_)
            | Self::Unauthorized
            | Self::Api { .. }
            | Self::InvalidResponse(_) => {
                "No se pudo completar la operación con el servidor".to_string()
            }
        }
    }

    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl fmt::Display for FleetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(e) => write!(f, "HTTP error: {e}"),
            Self::Validation(msg) => write!(f, "Validation error: {msg}"),
            Self::Unauthorized => write!(f, "Unauthorized (401)"),
            Self::Api { status, message } => write!(f, "API error {status}: {message}"),
            Self::InvalidResponse(msg) => write!(f, "Invalid response: {msg}"),
            Self::Config(msg) => write!(f, "Configuration error: {msg}"),
            Self::Session(msg) => write!(f, "Session error: {msg}"),
            Self::NotAuthenticated => write!(f, "Not authenticated"),
        }
    }
}

impl std::error::Error for FleetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for FleetError {
    fn from(e: reqwest::Error) -> Self {
        if e.status() == Some(reqwest::StatusCode::UNAUTHORIZED) {
            Self::Unauthorized
        } else if e.is_decode() {
            Self::InvalidResponse(e.to_string())
        } else {
            Self::Http(e)
        }
    }
}

impl From<serde_json::Error> for FleetError {
    fn from(e: serde_json::Error) -> Self {
        Self::InvalidResponse(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FleetError>;
