//! Form validation and request building.
//!
//! Forms hold raw operator input. `into_*`/`apply_to` validate it before
//! anything reaches the network and produce the typed request bodies. Edit
//! forms leave a field untouched when it is `None`, so an update always
//! sends the full fetched record plus the changed fields.

use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

use crate::error::{FleetError, Result};
use crate::models::{
    Driver, Incident, IncidentKind, IncidentStatus, NewDriver, NewIncident, NewRole, NewRoute,
    NewRouteAssignment, NewUser, NewVehicle, Role, Route, RouteAssignment, Severity, Status, User,
    UserUpdate, Vehicle, VehicleDriverAssignment,
};
use crate::wire::{anchor_time, midnight_utc, parse_form_date};

#[allow(clippy::unwrap_used)]
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

fn invalid(message: &str) -> FleetError {
    FleetError::Validation(message.to_string())
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Convert a blank string to None, otherwise the trimmed value.
pub fn optional_string(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn parse_status(raw: Option<&str>) -> Result<Status> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(Status::Active),
        Some(s) => Status::parse(s).ok_or_else(|| invalid("Estado inválido (Activo o Inactivo)")),
    }
}

fn parse_capacity(raw: &str) -> Result<u32> {
    let capacity: i64 = raw
        .trim()
        .parse()
        .map_err(|_| invalid("La capacidad debe ser un número entero"))?;
    if capacity <= 0 {
        return Err(invalid("La capacidad debe ser mayor a 0"));
    }
    u32::try_from(capacity).map_err(|_| invalid("La capacidad es demasiado grande"))
}

fn parse_distance(raw: &str) -> Result<f64> {
    if is_blank(raw) {
        return Ok(0.0);
    }
    let distance: f64 = raw
        .trim()
        .parse()
        .map_err(|_| invalid("La distancia debe ser un número"))?;
    if !distance.is_finite() || distance < 0.0 {
        return Err(invalid("La distancia no puede ser negativa"));
    }
    Ok(distance)
}

fn parse_kind(raw: &str) -> Result<IncidentKind> {
    IncidentKind::parse(raw).ok_or_else(|| {
        invalid("Tipo inválido (FalloTecnico, Choque, FaltaConductor, Retraso u Otro)")
    })
}

fn parse_severity(raw: &str) -> Result<Severity> {
    Severity::parse(raw).ok_or_else(|| invalid("Gravedad inválida (Alto, Medio o Bajo)"))
}

fn parse_incident_status(raw: &str) -> Result<IncidentStatus> {
    IncidentStatus::parse(raw)
        .ok_or_else(|| invalid("Estado inválido (Activo, Inactivo o Resuelto)"))
}

// === Vehicles ===

#[derive(Debug, Clone, Default)]
pub struct VehicleForm {
    pub plate: String,
    pub model: String,
    pub capacity: String,
    pub status: Option<String>,
}

impl VehicleForm {
    pub fn into_new(self) -> Result<NewVehicle> {
        if is_blank(&self.plate) || is_blank(&self.model) || is_blank(&self.capacity) {
            return Err(invalid("Placa, modelo y capacidad son obligatorios"));
        }
        Ok(NewVehicle {
            plate: self.plate.trim().to_string(),
            model: self.model.trim().to_string(),
            capacity: parse_capacity(&self.capacity)?,
            status: parse_status(self.status.as_deref())?,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct VehicleEdit {
    pub plate: Option<String>,
    pub model: Option<String>,
    pub capacity: Option<String>,
    pub status: Option<String>,
}

impl VehicleEdit {
    pub fn apply_to(self, current: &Vehicle) -> Result<Vehicle> {
        let mut updated = current.clone();
        if let Some(plate) = self.plate {
            updated.plate = plate.trim().to_string();
        }
        if let Some(model) = self.model {
            updated.model = model.trim().to_string();
        }
        if is_blank(&updated.plate) || is_blank(&updated.model) {
            return Err(invalid("Placa, modelo y capacidad son obligatorios"));
        }
        if let Some(capacity) = self.capacity {
            updated.capacity = parse_capacity(&capacity)?;
        }
        if updated.capacity == 0 {
            return Err(invalid("La capacidad debe ser mayor a 0"));
        }
        if self.status.is_some() {
            updated.status = parse_status(self.status.as_deref())?;
        }
        Ok(updated)
    }
}

// === Drivers ===

#[derive(Debug, Clone, Default)]
pub struct DriverForm {
    pub name: String,
    pub national_id: String,
    pub license: String,
    pub phone: String,
    pub address: String,
    pub status: Option<String>,
}

impl DriverForm {
    pub fn into_new(self) -> Result<NewDriver> {
        if is_blank(&self.name) || is_blank(&self.national_id) || is_blank(&self.license) {
            return Err(invalid("Nombre, cédula y licencia son obligatorios"));
        }
        Ok(NewDriver {
            name: self.name.trim().to_string(),
            national_id: self.national_id.trim().to_string(),
            license: self.license.trim().to_string(),
            phone: optional_string(&self.phone),
            address: optional_string(&self.address),
            status: parse_status(self.status.as_deref())?,
        })
    }
}

/// The national id is fixed once a driver exists.
#[derive(Debug, Clone, Default)]
pub struct DriverEdit {
    pub name: Option<String>,
    pub license: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub status: Option<String>,
}

impl DriverEdit {
    pub fn apply_to(self, current: &Driver) -> Result<Driver> {
        let mut updated = current.clone();
        if let Some(name) = self.name {
            updated.name = name.trim().to_string();
        }
        if let Some(license) = self.license {
            updated.license = license.trim().to_string();
        }
        if let Some(phone) = self.phone {
            updated.phone = optional_string(&phone);
        }
        if let Some(address) = self.address {
            updated.address = optional_string(&address);
        }
        if self.status.is_some() {
            updated.status = parse_status(self.status.as_deref())?;
        }
        if is_blank(&updated.name) || is_blank(&updated.license) {
            return Err(invalid("Nombre y licencia son obligatorios"));
        }
        Ok(updated)
    }
}

// === Routes ===

#[derive(Debug, Clone, Default)]
pub struct RouteForm {
    pub name: String,
    pub origin: String,
    pub destination: String,
    pub distance: String,
    /// `HH:MM`; blank means the anchor date at midnight.
    pub departure: String,
    pub arrival: String,
    pub days: String,
    pub status: Option<String>,
}

impl RouteForm {
    /// Times are anchored on `anchor`, normally today's date.
    pub fn into_new(self, anchor: NaiveDate) -> Result<NewRoute> {
        if is_blank(&self.name) || is_blank(&self.origin) || is_blank(&self.destination) {
            return Err(invalid("Nombre, origen y destino son obligatorios"));
        }
        let departure = if is_blank(&self.departure) {
            midnight_utc(anchor)
        } else {
            anchor_time(anchor, &self.departure)?
        };
        let arrival = if is_blank(&self.arrival) {
            midnight_utc(anchor)
        } else {
            anchor_time(anchor, &self.arrival)?
        };
        Ok(NewRoute {
            name: self.name.trim().to_string(),
            origin: self.origin.trim().to_string(),
            destination: self.destination.trim().to_string(),
            distance_km: parse_distance(&self.distance)?,
            departure,
            arrival,
            days: self.days.trim().to_string(),
            status: parse_status(self.status.as_deref())?,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct RouteEdit {
    pub name: Option<String>,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub distance: Option<String>,
    pub departure: Option<String>,
    pub arrival: Option<String>,
    pub days: Option<String>,
    pub status: Option<String>,
}

impl RouteEdit {
    pub fn apply_to(self, current: &Route, anchor: NaiveDate) -> Result<Route> {
        let mut updated = current.clone();
        if let Some(name) = self.name {
            updated.name = name.trim().to_string();
        }
        if let Some(origin) = self.origin {
            updated.origin = origin.trim().to_string();
        }
        if let Some(destination) = self.destination {
            updated.destination = destination.trim().to_string();
        }
        if is_blank(&updated.name) || is_blank(&updated.origin) || is_blank(&updated.destination)
        {
            return Err(invalid("Nombre, origen y destino son obligatorios"));
        }
        if let Some(distance) = self.distance {
            updated.distance_km = parse_distance(&distance)?;
        }
        if let Some(departure) = self.departure {
            updated.departure = anchor_time(anchor, &departure)?.into();
        }
        if let Some(arrival) = self.arrival {
            updated.arrival = anchor_time(anchor, &arrival)?.into();
        }
        if let Some(days) = self.days {
            updated.days = days.trim().to_string();
        }
        if self.status.is_some() {
            updated.status = parse_status(self.status.as_deref())?;
        }
        Ok(updated)
    }
}

// === Roles ===

#[derive(Debug, Clone, Default)]
pub struct RoleForm {
    pub name: String,
    pub description: String,
}

impl RoleForm {
    pub fn into_new(self) -> Result<NewRole> {
        if is_blank(&self.name) {
            return Err(invalid("Ingresa el nombre del rol"));
        }
        Ok(NewRole {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct RoleEdit {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl RoleEdit {
    pub fn apply_to(self, current: &Role) -> Result<Role> {
        let mut updated = current.clone();
        if let Some(name) = self.name {
            updated.name = name.trim().to_string();
        }
        if let Some(description) = self.description {
            updated.description = description.trim().to_string();
        }
        if is_blank(&updated.name) {
            return Err(invalid("El nombre es obligatorio"));
        }
        Ok(updated)
    }
}

// === Users ===

#[derive(Debug, Clone, Default)]
pub struct UserForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role_id: String,
}

impl UserForm {
    pub fn into_new(self) -> Result<NewUser> {
        if is_blank(&self.name)
            || is_blank(&self.email)
            || self.password.is_empty()
            || is_blank(&self.role_id)
        {
            return Err(invalid("Debes llenar todos los campos"));
        }
        let email = self.email.trim().to_string();
        if !is_valid_email(&email) {
            return Err(invalid("Ingresa un correo electrónico válido"));
        }
        Ok(NewUser {
            name: self.name.trim().to_string(),
            email,
            password: self.password,
            role_id: self.role_id.trim().to_string(),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct UserEdit {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role_id: Option<String>,
    pub status: Option<String>,
    /// Blank keeps the current password.
    pub password: Option<String>,
}

impl UserEdit {
    pub fn apply_to(self, current: &User) -> Result<UserUpdate> {
        let name = self.name.unwrap_or_else(|| current.name.clone());
        let email = self.email.unwrap_or_else(|| current.email.clone());
        let role_id = self
            .role_id
            .or_else(|| current.role_id.clone())
            .unwrap_or_default();
        let status = match self.status.as_deref() {
            Some(raw) if is_blank(raw) => return Err(invalid("Todos los campos son obligatorios")),
            Some(raw) => parse_status(Some(raw))?,
            None => current.status,
        };

        if is_blank(&name) || is_blank(&email) || is_blank(&role_id) {
            return Err(invalid("Todos los campos son obligatorios"));
        }
        let email = email.trim().to_string();
        if !is_valid_email(&email) {
            return Err(invalid("Ingresa un correo electrónico válido"));
        }

        Ok(UserUpdate {
            name: name.trim().to_string(),
            email,
            role_id: role_id.trim().to_string(),
            status,
            password: self.password.filter(|p| !is_blank(p)),
        })
    }
}

// === Vehicle-driver assignments ===

pub fn set_assignment_status(
    current: &VehicleDriverAssignment,
    raw_status: &str,
) -> Result<VehicleDriverAssignment> {
    if is_blank(raw_status) {
        return Err(invalid("Debes seleccionar un estado"));
    }
    let mut updated = current.clone();
    updated.status = parse_status(Some(raw_status))?;
    Ok(updated)
}

// === Route assignments ===

#[derive(Debug, Clone, Default)]
pub struct RouteAssignmentForm {
    pub vehicle_driver_id: String,
    pub route_id: String,
    /// `YYYY-MM-DD`; blank means today.
    pub date: String,
    pub status: Option<String>,
}

impl RouteAssignmentForm {
    pub fn into_new(self, today: NaiveDate) -> Result<NewRouteAssignment> {
        if is_blank(&self.vehicle_driver_id) || is_blank(&self.route_id) {
            return Err(invalid("Selecciona una asignación y una ruta"));
        }
        let assigned_on = if is_blank(&self.date) {
            midnight_utc(today)
        } else {
            parse_form_date(&self.date)?
        };
        Ok(NewRouteAssignment {
            vehicle_driver_id: self.vehicle_driver_id.trim().to_string(),
            route_id: self.route_id.trim().to_string(),
            assigned_on,
            status: parse_status(self.status.as_deref())?,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct RouteAssignmentEdit {
    pub date: Option<String>,
    pub status: Option<String>,
}

impl RouteAssignmentEdit {
    pub fn apply_to(self, current: &RouteAssignment) -> Result<RouteAssignment> {
        let mut updated = current.clone();
        if let Some(date) = self.date {
            updated.assigned_on = parse_form_date(&date)?.into();
        }
        if self.status.is_some() {
            updated.status = parse_status(self.status.as_deref())?;
        }
        Ok(updated)
    }
}

// === Incidents ===

#[derive(Debug, Clone, Default)]
pub struct IncidentForm {
    pub route_assignment_id: String,
    /// `YYYY-MM-DD`; blank means today.
    pub date: String,
    pub kind: String,
    pub severity: String,
    pub description: String,
}

impl IncidentForm {
    pub fn into_new(self, today: NaiveDate) -> Result<NewIncident> {
        if is_blank(&self.route_assignment_id)
            || is_blank(&self.kind)
            || is_blank(&self.severity)
            || is_blank(&self.description)
        {
            return Err(invalid("Completa todos los campos obligatorios"));
        }
        let date = if is_blank(&self.date) {
            midnight_utc(today)
        } else {
            parse_form_date(&self.date)?
        };
        Ok(NewIncident {
            route_assignment_id: self.route_assignment_id.trim().to_string(),
            date,
            kind: parse_kind(&self.kind)?,
            severity: parse_severity(&self.severity)?,
            description: self.description.trim().to_string(),
            status: IncidentStatus::Active,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct IncidentEdit {
    pub kind: Option<String>,
    pub severity: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
}

impl IncidentEdit {
    pub fn apply_to(self, current: &Incident) -> Result<Incident> {
        let mut updated = current.clone();
        if let Some(kind) = self.kind {
            updated.kind = parse_kind(&kind)?;
        }
        if let Some(severity) = self.severity {
            updated.severity = Some(parse_severity(&severity)?);
        }
        if let Some(description) = self.description {
            updated.description = description.trim().to_string();
        }
        if is_blank(&updated.description) {
            return Err(invalid("La descripción es obligatoria"));
        }
        if let Some(status) = self.status {
            updated.status = parse_incident_status(&status)?;
        }
        Ok(updated)
    }
}
