//! Typed records exchanged with the fleet backend.
//!
//! Rust field names are canonical English; the `serde` attributes carry the
//! backend's Spanish camelCase spelling and the aliases it is known to use.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::wire::{self, WireTime};

/// A backend collection that can be listed, created and updated.
pub trait Resource: DeserializeOwned {
    /// Path segment under the API base URL.
    const PATH: &'static str;
}

// === Enumerations ===

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Status {
    #[default]
    #[serde(rename = "Activo", alias = "activo", alias = "ACTIVO")]
    Active,
    #[serde(rename = "Inactivo", alias = "inactivo", alias = "INACTIVO")]
    Inactive,
}

impl Status {
    pub const ALL: [Self; 2] = [Self::Active, Self::Inactive];

    pub const fn as_wire(self) -> &'static str {
        match self {
            Self::Active => "Activo",
            Self::Inactive => "Inactivo",
        }
    }

    /// Case-insensitive parse of the wire token.
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.as_wire().eq_ignore_ascii_case(raw.trim()))
    }

    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum IncidentStatus {
    #[default]
    #[serde(rename = "Activo", alias = "activo")]
    Active,
    #[serde(rename = "Inactivo", alias = "inactivo")]
    Inactive,
    #[serde(rename = "Resuelto", alias = "resuelto")]
    Resolved,
}

impl IncidentStatus {
    pub const ALL: [Self; 3] = [Self::Active, Self::Inactive, Self::Resolved];

    pub const fn as_wire(self) -> &'static str {
        match self {
            Self::Active => "Activo",
            Self::Inactive => "Inactivo",
            Self::Resolved => "Resuelto",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.as_wire().eq_ignore_ascii_case(raw.trim()))
    }
}

/// Incident category. Tokens the console does not know are kept verbatim so
/// an update writes them back unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IncidentKind {
    TechnicalFailure,
    Collision,
    DriverAbsence,
    Delay,
    Other,
    Unrecognized(String),
}

impl IncidentKind {
    pub const ALL: [Self; 5] = [
        Self::TechnicalFailure,
        Self::Collision,
        Self::DriverAbsence,
        Self::Delay,
        Self::Other,
    ];

    pub fn as_wire(&self) -> &str {
        match self {
            Self::TechnicalFailure => "FalloTecnico",
            Self::Collision => "Choque",
            Self::DriverAbsence => "FaltaConductor",
            Self::Delay => "Retraso",
            Self::Other => "Otro",
            Self::Unrecognized(raw) => raw,
        }
    }

    /// Parses one of the known kinds; unknown tokens yield `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_wire().eq_ignore_ascii_case(raw.trim()))
    }
}

impl Serialize for IncidentKind {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_wire())
    }
}

impl<'de> Deserialize<'de> for IncidentKind {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw).unwrap_or(Self::Unrecognized(raw)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Severity {
    High,
    Medium,
    Low,
    Unrecognized(String),
}

impl Severity {
    pub const ALL: [Self; 3] = [Self::High, Self::Medium, Self::Low];

    pub fn as_wire(&self) -> &str {
        match self {
            Self::High => "Alto",
            Self::Medium => "Medio",
            Self::Low => "Bajo",
            Self::Unrecognized(raw) => raw,
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.as_wire().eq_ignore_ascii_case(raw.trim()))
    }
}

impl Serialize for Severity {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_wire())
    }
}

impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw).unwrap_or(Self::Unrecognized(raw)))
    }
}

// === Entities ===

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    #[serde(rename = "unidadId", deserialize_with = "wire::id")]
    pub id: String,
    #[serde(rename = "placa", default)]
    pub plate: String,
    #[serde(rename = "modelo", default)]
    pub model: String,
    #[serde(rename = "capacidad", default, deserialize_with = "wire::null_as_default")]
    pub capacity: u32,
    #[serde(rename = "estado", default, deserialize_with = "wire::null_as_default")]
    pub status: Status,
}

impl Resource for Vehicle {
    const PATH: &'static str = "unidades";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Driver {
    #[serde(rename = "conductorId", deserialize_with = "wire::id")]
    pub id: String,
    #[serde(rename = "nombre", default)]
    pub name: String,
    #[serde(rename = "cedula", default)]
    pub national_id: String,
    #[serde(rename = "licencia", default)]
    pub license: String,
    #[serde(rename = "telefono", default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(rename = "direccion", default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(rename = "estado", default, deserialize_with = "wire::null_as_default")]
    pub status: Status,
}

impl Resource for Driver {
    const PATH: &'static str = "conductores";
}

/// Vehicle fields the backend may embed inside an assignment.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct VehicleSummary {
    #[serde(rename = "placa", default)]
    pub plate: String,
    #[serde(rename = "modelo", default)]
    pub model: String,
}

/// Driver fields the backend may embed inside an assignment.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct DriverSummary {
    #[serde(rename = "nombre", default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleDriverAssignment {
    #[serde(rename = "unidadConductorId", deserialize_with = "wire::id")]
    pub id: String,
    #[serde(rename = "unidadId", deserialize_with = "wire::id")]
    pub vehicle_id: String,
    #[serde(rename = "conductorId", deserialize_with = "wire::id")]
    pub driver_id: String,
    #[serde(rename = "estado", default, deserialize_with = "wire::null_as_default")]
    pub status: Status,
    #[serde(rename = "unidad", default, skip_serializing)]
    pub vehicle: Option<VehicleSummary>,
    #[serde(rename = "conductor", default, skip_serializing)]
    pub driver: Option<DriverSummary>,
}

impl Resource for VehicleDriverAssignment {
    const PATH: &'static str = "unidades-conductores";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    #[serde(rename = "rutaHorarioId", deserialize_with = "wire::id")]
    pub id: String,
    #[serde(rename = "nombre", default)]
    pub name: String,
    #[serde(rename = "origen", alias = "origin", default)]
    pub origin: String,
    #[serde(rename = "destino", default)]
    pub destination: String,
    #[serde(rename = "distancia", default, deserialize_with = "wire::null_as_default")]
    pub distance_km: f64,
    #[serde(rename = "horaSalida", default)]
    pub departure: WireTime,
    #[serde(rename = "horaLlegada", default)]
    pub arrival: WireTime,
    #[serde(rename = "dias", default, deserialize_with = "wire::null_as_default")]
    pub days: String,
    #[serde(rename = "estado", default, deserialize_with = "wire::null_as_default")]
    pub status: Status,
}

impl Resource for Route {
    const PATH: &'static str = "rutas";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteAssignment {
    #[serde(rename = "asignacionId", deserialize_with = "wire::id")]
    pub id: String,
    #[serde(rename = "unidadConductorId", deserialize_with = "wire::id")]
    pub vehicle_driver_id: String,
    #[serde(rename = "rutaHorarioId", deserialize_with = "wire::id")]
    pub route_id: String,
    #[serde(rename = "fechaAsignacion", default)]
    pub assigned_on: WireTime,
    #[serde(rename = "estado", default, deserialize_with = "wire::null_as_default")]
    pub status: Status,
}

impl Resource for RouteAssignment {
    const PATH: &'static str = "asignaciones";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Incident {
    #[serde(rename = "incidenciaId", deserialize_with = "wire::id")]
    pub id: String,
    #[serde(rename = "asignacionId", deserialize_with = "wire::id")]
    pub route_assignment_id: String,
    #[serde(rename = "fecha", default)]
    pub date: WireTime,
    #[serde(rename = "tipo")]
    pub kind: IncidentKind,
    /// `None` when the backend sent no severity at all.
    #[serde(rename = "gravedad", default)]
    pub severity: Option<Severity>,
    #[serde(rename = "descripcion", default, deserialize_with = "wire::null_as_default")]
    pub description: String,
    #[serde(rename = "estado", default, deserialize_with = "wire::null_as_default")]
    pub status: IncidentStatus,
}

impl Resource for Incident {
    const PATH: &'static str = "incidencias";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    #[serde(rename = "rolId", alias = "id", deserialize_with = "wire::id")]
    pub id: String,
    #[serde(rename = "nombre", default)]
    pub name: String,
    #[serde(rename = "descripcion", default, deserialize_with = "wire::null_as_default")]
    pub description: String,
}

impl Resource for Role {
    const PATH: &'static str = "roles";
}

/// A console user as listed by the backend. The password is write-only and
/// never read back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "usuarioId", alias = "id", deserialize_with = "wire::id")]
    pub id: String,
    #[serde(rename = "nombre", default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(
        rename = "rolId",
        alias = "roleId",
        default,
        deserialize_with = "wire::opt_id"
    )]
    pub role_id: Option<String>,
    #[serde(rename = "estado", default, deserialize_with = "wire::null_as_default")]
    pub status: Status,
}

impl Resource for User {
    const PATH: &'static str = "usuarios";
}

// === Create / update bodies ===

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewVehicle {
    #[serde(rename = "placa")]
    pub plate: String,
    #[serde(rename = "modelo")]
    pub model: String,
    #[serde(rename = "capacidad")]
    pub capacity: u32,
    #[serde(rename = "estado")]
    pub status: Status,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewDriver {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "cedula")]
    pub national_id: String,
    #[serde(rename = "licencia")]
    pub license: String,
    #[serde(rename = "telefono", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(rename = "direccion", skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(rename = "estado")]
    pub status: Status,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewRoute {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "origen")]
    pub origin: String,
    #[serde(rename = "destino")]
    pub destination: String,
    #[serde(rename = "distancia")]
    pub distance_km: f64,
    #[serde(rename = "horaSalida", with = "wire::timestamp")]
    pub departure: DateTime<Utc>,
    #[serde(rename = "horaLlegada", with = "wire::timestamp")]
    pub arrival: DateTime<Utc>,
    #[serde(rename = "dias")]
    pub days: String,
    #[serde(rename = "estado")]
    pub status: Status,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewRole {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion")]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewUser {
    #[serde(rename = "nombre")]
    pub name: String,
    pub email: String,
    #[serde(rename = "contrasena")]
    pub password: String,
    #[serde(rename = "rolId")]
    pub role_id: String,
}

/// User update body. The password travels only when it is being changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserUpdate {
    #[serde(rename = "nombre")]
    pub name: String,
    pub email: String,
    #[serde(rename = "rolId")]
    pub role_id: String,
    #[serde(rename = "estado")]
    pub status: Status,
    #[serde(rename = "contrasena", skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewVehicleDriverAssignment {
    #[serde(rename = "unidadId")]
    pub vehicle_id: String,
    #[serde(rename = "conductorId")]
    pub driver_id: String,
    #[serde(rename = "estado")]
    pub status: Status,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewRouteAssignment {
    #[serde(rename = "unidadConductorId")]
    pub vehicle_driver_id: String,
    #[serde(rename = "rutaHorarioId")]
    pub route_id: String,
    #[serde(rename = "fechaAsignacion", with = "wire::timestamp")]
    pub assigned_on: DateTime<Utc>,
    #[serde(rename = "estado")]
    pub status: Status,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewIncident {
    #[serde(rename = "asignacionId")]
    pub route_assignment_id: String,
    #[serde(rename = "fecha", with = "wire::timestamp")]
    pub date: DateTime<Utc>,
    #[serde(rename = "tipo")]
    pub kind: IncidentKind,
    #[serde(rename = "gravedad")]
    pub severity: Severity,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "estado")]
    pub status: IncidentStatus,
}

// === Authentication ===

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    #[serde(rename = "contrasena")]
    pub password: String,
}

/// Profile returned by the login call. Lenient: the backend has been seen
/// to omit fields here.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(
        rename = "usuarioId",
        alias = "id",
        default,
        deserialize_with = "wire::opt_id"
    )]
    pub id: Option<String>,
    #[serde(rename = "nombre", default, deserialize_with = "wire::null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub email: String,
    #[serde(
        rename = "rolId",
        alias = "roleId",
        default,
        deserialize_with = "wire::opt_id"
    )]
    pub role_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(rename = "usuario", default)]
    pub user: Option<UserProfile>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_vehicle_missing_status_defaults_to_active() {
        let v: Vehicle = serde_json::from_value(json!({
            "unidadId": "u1", "placa": "ABC123", "modelo": "Sprinter", "capacidad": 20
        }))
        .unwrap();
        assert_eq!(v.status, Status::Active);
        assert_eq!(v.capacity, 20);
    }

    #[test]
    fn test_vehicle_serializes_with_backend_names() {
        let v = Vehicle {
            id: "u1".into(),
            plate: "ABC123".into(),
            model: "Sprinter".into(),
            capacity: 20,
            status: Status::Inactive,
        };
        let value = serde_json::to_value(&v).unwrap();
        assert_eq!(value["unidadId"], "u1");
        assert_eq!(value["placa"], "ABC123");
        assert_eq!(value["estado"], "Inactivo");
    }

    #[test]
    fn test_role_accepts_numeric_id_alias() {
        let r: Role = serde_json::from_value(json!({"id": 4, "nombre": "Admin"})).unwrap();
        assert_eq!(r.id, "4");
        assert_eq!(r.description, "");
    }

    #[test]
    fn test_user_reads_role_id_alias_and_null_status() {
        let u: User = serde_json::from_value(json!({
            "usuarioId": "x", "nombre": "Ana", "email": "ana@fleet.io",
            "roleId": 2, "estado": null
        }))
        .unwrap();
        assert_eq!(u.role_id.as_deref(), Some("2"));
        assert_eq!(u.status, Status::Active);
    }

    #[test]
    fn test_route_accepts_origin_alias() {
        let r: Route = serde_json::from_value(json!({
            "rutaHorarioId": "r1", "nombre": "Centro", "origin": "Quito",
            "destino": "Ambato", "distancia": 120.5,
            "horaSalida": "2025-01-01T06:00:00.000Z", "horaLlegada": null
        }))
        .unwrap();
        assert_eq!(r.origin, "Quito");
        assert!(r.departure.parsed().is_some());
        assert!(r.arrival.is_missing());
    }

    #[test]
    fn test_assignment_keeps_embedded_records_but_does_not_send_them() {
        let a: VehicleDriverAssignment = serde_json::from_value(json!({
            "unidadConductorId": "a1", "unidadId": "u1", "conductorId": "c1",
            "estado": "Activo",
            "unidad": {"placa": "ABC123", "modelo": "Sprinter"},
            "conductor": {"nombre": "Luis"}
        }))
        .unwrap();
        assert_eq!(a.vehicle.as_ref().map(|v| v.plate.as_str()), Some("ABC123"));
        let value = serde_json::to_value(&a).unwrap();
        assert!(value.get("unidad").is_none());
        assert!(value.get("conductor").is_none());
    }

    #[test]
    fn test_incident_unknown_kind_is_kept_verbatim() {
        let i: Incident = serde_json::from_value(json!({
            "incidenciaId": "i1", "asignacionId": "as1", "fecha": "2025-02-02T00:00:00Z",
            "tipo": "Inundacion", "gravedad": "Bajo", "descripcion": "agua"
        }))
        .unwrap();
        assert_eq!(i.kind, IncidentKind::Unrecognized("Inundacion".into()));
        assert_eq!(i.status, IncidentStatus::Active);
        let value = serde_json::to_value(&i).unwrap();
        assert_eq!(value["tipo"], "Inundacion");
    }

    #[test]
    fn test_incident_list_tolerates_null_and_missing_severity() {
        let list: Vec<Incident> = serde_json::from_value(json!([
            {"incidenciaId": "i1", "asignacionId": "as1", "tipo": "Choque", "gravedad": null},
            {"incidenciaId": "i2", "asignacionId": "as1", "tipo": "Choque"},
            {"incidenciaId": "i3", "asignacionId": "as1", "tipo": "Choque", "gravedad": "Critico"},
            {"incidenciaId": "i4", "asignacionId": "as1", "tipo": "Choque", "gravedad": "alto"}
        ]))
        .unwrap();
        assert_eq!(list[0].severity, None);
        assert_eq!(list[1].severity, None);
        assert_eq!(
            list[2].severity,
            Some(Severity::Unrecognized("Critico".into()))
        );
        assert_eq!(list[3].severity, Some(Severity::High));
        let value = serde_json::to_value(&list[2]).unwrap();
        assert_eq!(value["gravedad"], "Critico");
    }

    #[test]
    fn test_incident_round_trip_keeps_unparsed_date() {
        let raw = json!({
            "incidenciaId": "i1", "asignacionId": "as1", "fecha": "01/02/2025",
            "tipo": "Retraso", "gravedad": "Medio", "descripcion": "x", "estado": "Activo"
        });
        let i: Incident = serde_json::from_value(raw.clone()).unwrap();
        assert!(i.date.parsed().is_none());
        assert_eq!(serde_json::to_value(&i).unwrap(), raw);
    }

    #[test]
    fn test_user_update_omits_blank_password() {
        let update = UserUpdate {
            name: "Ana".into(),
            email: "ana@fleet.io".into(),
            role_id: "2".into(),
            status: Status::Active,
            password: None,
        };
        let value = serde_json::to_value(&update).unwrap();
        assert!(value.get("contrasena").is_none());
    }

    #[test]
    fn test_status_parse_is_case_insensitive() {
        assert_eq!(Status::parse("activo"), Some(Status::Active));
        assert_eq!(Status::parse(" INACTIVO "), Some(Status::Inactive));
        assert_eq!(Status::parse("archivado"), None);
        assert_eq!(Severity::parse("alto"), Some(Severity::High));
        assert_eq!(IncidentKind::parse("choque"), Some(IncidentKind::Collision));
    }
}
