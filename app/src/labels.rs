//! Display text for enumerations, badges and dates.

use chrono::{DateTime, Utc};

use crate::models::{IncidentKind, IncidentStatus, Severity, Status};

pub const MISSING_DATE: &str = "No especificada";
pub const MISSING_TIME: &str = "N/A";

/// Visual weight of a status or severity badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Badge {
    Success,
    Info,
    Warning,
    Danger,
    Secondary,
}

impl Badge {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Danger => "danger",
            Self::Secondary => "secondary",
        }
    }
}

/// Unknown kinds are shown as the backend spelled them.
pub fn incident_kind_label(kind: &IncidentKind) -> &str {
    match kind {
        IncidentKind::TechnicalFailure => "Falla Técnica",
        IncidentKind::Collision => "Choque",
        IncidentKind::DriverAbsence => "Falta de Conductor",
        IncidentKind::Delay => "Retraso",
        IncidentKind::Other => "Otro",
        IncidentKind::Unrecognized(raw) => raw,
    }
}

pub const fn severity_badge(severity: Option<&Severity>) -> Badge {
    match severity {
        Some(Severity::High) => Badge::Danger,
        Some(Severity::Medium) => Badge::Warning,
        Some(Severity::Low) => Badge::Info,
        Some(Severity::Unrecognized(_)) | None => Badge::Secondary,
    }
}

pub const fn status_badge(status: Status) -> Badge {
    if status.is_active() {
        Badge::Success
    } else {
        Badge::Danger
    }
}

pub const fn incident_status_badge(status: IncidentStatus) -> Badge {
    match status {
        IncidentStatus::Active => Badge::Success,
        IncidentStatus::Inactive | IncidentStatus::Resolved => Badge::Danger,
    }
}

/// `YYYY-MM-DD`, or a placeholder when the backend sent nothing usable.
pub fn display_date(value: Option<&DateTime<Utc>>) -> String {
    value.map_or_else(
        || MISSING_DATE.to_string(),
        |v| v.format("%Y-%m-%d").to_string(),
    )
}

/// `HH:MM` in UTC.
pub fn display_time(value: Option<&DateTime<Utc>>) -> String {
    value.map_or_else(
        || MISSING_TIME.to_string(),
        |v| v.format("%H:%M").to_string(),
    )
}
