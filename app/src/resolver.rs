//! Foreign-key resolution for display.
//!
//! The backend returns related records as bare identifiers. These helpers
//! turn an identifier into a readable label by scanning an already fetched
//! list, and fall back to a placeholder carrying the raw identifier when
//! the record is not there (stale list, or not loaded yet). Nothing here
//! fails or touches the network.

use crate::models::{
    Driver, Incident, Role, Route, RouteAssignment, User, Vehicle, VehicleDriverAssignment,
};

/// A record with a backend identifier.
pub trait Identified {
    /// Prefix of the placeholder shown when a lookup misses, e.g. `Unidad`.
    const KIND: &'static str;

    fn id(&self) -> &str;
}

/// A record with a human readable label.
pub trait Labeled {
    fn label(&self) -> String;
}

/// First record whose identifier equals `id`.
pub fn find_by_id<'a, T: Identified>(records: &'a [T], id: &str) -> Option<&'a T> {
    records.iter().find(|r| r.id() == id)
}

/// Placeholder for an identifier that could not be resolved.
pub fn fallback_label<T: Identified>(id: &str) -> String {
    format!("{} ID: {id}", T::KIND)
}

pub fn resolve_label<T: Identified + Labeled>(records: &[T], id: &str) -> String {
    find_by_id(records, id).map_or_else(|| fallback_label::<T>(id), Labeled::label)
}

/// Role label for a user row. Users without a role read `Sin rol`.
pub fn role_label(roles: &[Role], role_id: Option<&str>) -> String {
    match role_id {
        Some(id) if !id.trim().is_empty() => resolve_label(roles, id),
        _ => "Sin rol".to_string(),
    }
}

/// `vehicle / driver` label for a vehicle-driver assignment. Records the
/// backend embedded in the assignment win over the fetched lists.
pub fn assignment_label(
    assignment: &VehicleDriverAssignment,
    vehicles: &[Vehicle],
    drivers: &[Driver],
) -> String {
    format!(
        "{} / {}",
        assignment_vehicle_label(assignment, vehicles),
        assignment_driver_label(assignment, drivers)
    )
}

pub fn assignment_vehicle_label(assignment: &VehicleDriverAssignment, vehicles: &[Vehicle]) -> String {
    match &assignment.vehicle {
        Some(embedded) => vehicle_label(&embedded.plate, &embedded.model),
        None => resolve_label(vehicles, &assignment.vehicle_id),
    }
}

pub fn assignment_driver_label(assignment: &VehicleDriverAssignment, drivers: &[Driver]) -> String {
    match &assignment.driver {
        Some(embedded) => embedded.name.clone(),
        None => resolve_label(drivers, &assignment.driver_id),
    }
}

/// Label for a vehicle-driver assignment referenced by id.
pub fn resolve_assignment_label(
    assignments: &[VehicleDriverAssignment],
    vehicles: &[Vehicle],
    drivers: &[Driver],
    id: &str,
) -> String {
    find_by_id(assignments, id).map_or_else(
        || fallback_label::<VehicleDriverAssignment>(id),
        |a| assignment_label(a, vehicles, drivers),
    )
}

fn vehicle_label(plate: &str, model: &str) -> String {
    format!("{plate} - {model}")
}

fn short_id(id: &str) -> &str {
    id.char_indices().nth(8).map_or(id, |(idx, _)| &id[..idx])
}

impl Identified for Vehicle {
    const KIND: &'static str = "Unidad";
    fn id(&self) -> &str {
        &self.id
    }
}

impl Labeled for Vehicle {
    fn label(&self) -> String {
        vehicle_label(&self.plate, &self.model)
    }
}

impl Identified for Driver {
    const KIND: &'static str = "Conductor";
    fn id(&self) -> &str {
        &self.id
    }
}

impl Labeled for Driver {
    fn label(&self) -> String {
        self.name.clone()
    }
}

impl Identified for VehicleDriverAssignment {
    const KIND: &'static str = "Asignación";
    fn id(&self) -> &str {
        &self.id
    }
}

impl Identified for Route {
    const KIND: &'static str = "Ruta";
    fn id(&self) -> &str {
        &self.id
    }
}

impl Labeled for Route {
    fn label(&self) -> String {
        let origin = if self.origin.is_empty() {
            "Origen no definido"
        } else {
            &self.origin
        };
        let destination = if self.destination.is_empty() {
            "Destino no definido"
        } else {
            &self.destination
        };
        format!("{} ({origin} → {destination})", self.name)
    }
}

impl Identified for RouteAssignment {
    const KIND: &'static str = "Asignación";
    fn id(&self) -> &str {
        &self.id
    }
}

impl Labeled for RouteAssignment {
    fn label(&self) -> String {
        format!("Asignación #{}...", short_id(&self.id))
    }
}

impl Identified for Incident {
    const KIND: &'static str = "Incidencia";
    fn id(&self) -> &str {
        &self.id
    }
}

impl Identified for Role {
    const KIND: &'static str = "Rol";
    fn id(&self) -> &str {
        &self.id
    }
}

impl Labeled for Role {
    fn label(&self) -> String {
        self.name.clone()
    }
}

impl Identified for User {
    const KIND: &'static str = "Usuario";
    fn id(&self) -> &str {
        &self.id
    }
}

impl Labeled for User {
    fn label(&self) -> String {
        self.name.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DriverSummary, Status, VehicleSummary};
    use crate::wire::WireTime;

    fn vehicle(id: &str, plate: &str) -> Vehicle {
        Vehicle {
            id: id.to_string(),
            plate: plate.to_string(),
            model: "Sprinter".to_string(),
            capacity: 20,
            status: Status::Active,
        }
    }

    fn driver(id: &str, name: &str) -> Driver {
        Driver {
            id: id.to_string(),
            name: name.to_string(),
            national_id: "0102".to_string(),
            license: "B".to_string(),
            phone: None,
            address: None,
            status: Status::Active,
        }
    }

    fn assignment(id: &str, vehicle_id: &str, driver_id: &str) -> VehicleDriverAssignment {
        VehicleDriverAssignment {
            id: id.to_string(),
            vehicle_id: vehicle_id.to_string(),
            driver_id: driver_id.to_string(),
            status: Status::Active,
            vehicle: None,
            driver: None,
        }
    }

    #[test]
    fn test_find_by_id_returns_first_match() {
        let vehicles = vec![vehicle("1", "AAA"), vehicle("2", "BBB"), vehicle("2", "CCC")];
        assert_eq!(find_by_id(&vehicles, "2").map(|v| v.plate.as_str()), Some("BBB"));
        assert!(find_by_id(&vehicles, "9").is_none());
    }

    #[test]
    fn test_resolve_label_present_and_absent() {
        let vehicles = vec![vehicle("1", "ABC123")];
        assert_eq!(resolve_label(&vehicles, "1"), "ABC123 - Sprinter");
        assert_eq!(resolve_label(&vehicles, "42"), "Unidad ID: 42");
        let drivers: Vec<Driver> = Vec::new();
        assert_eq!(resolve_label(&drivers, "c-7"), "Conductor ID: c-7");
    }

    #[test]
    fn test_fallback_keeps_identifier_verbatim() {
        let weird = "  odd/id ñ ";
        let label = resolve_label::<Route>(&[], weird);
        assert!(label.contains(weird));
    }

    #[test]
    fn test_role_label_without_role() {
        let roles = vec![Role {
            id: "1".to_string(),
            name: "Admin".to_string(),
            description: String::new(),
        }];
        assert_eq!(role_label(&roles, None), "Sin rol");
        assert_eq!(role_label(&roles, Some("")), "Sin rol");
        assert_eq!(role_label(&roles, Some("1")), "Admin");
        assert_eq!(role_label(&roles, Some("5")), "Rol ID: 5");
    }

    #[test]
    fn test_assignment_label_prefers_embedded_records() {
        let mut a = assignment("a1", "1", "c1");
        a.vehicle = Some(VehicleSummary {
            plate: "EMB001".to_string(),
            model: "Hiace".to_string(),
        });
        a.driver = Some(DriverSummary {
            name: "Embebido".to_string(),
        });
        let label = assignment_label(&a, &[vehicle("1", "ABC123")], &[driver("c1", "Luis")]);
        assert_eq!(label, "EMB001 - Hiace / Embebido");
    }

    #[test]
    fn test_assignment_label_resolves_ids() {
        let a = assignment("a1", "1", "c9");
        let label = assignment_label(&a, &[vehicle("1", "ABC123")], &[driver("c1", "Luis")]);
        assert_eq!(label, "ABC123 - Sprinter / Conductor ID: c9");
        assert_eq!(
            resolve_assignment_label(&[a], &[], &[], "zz"),
            "Asignación ID: zz"
        );
    }

    #[test]
    fn test_route_label_with_missing_endpoints() {
        let route = Route {
            id: "r1".to_string(),
            name: "Norte".to_string(),
            origin: String::new(),
            destination: "Ibarra".to_string(),
            distance_km: 0.0,
            departure: WireTime::Missing,
            arrival: WireTime::Missing,
            days: String::new(),
            status: Status::Active,
        };
        assert_eq!(route.label(), "Norte (Origen no definido → Ibarra)");
    }

    #[test]
    fn test_route_assignment_label_truncates_id() {
        let ra = RouteAssignment {
            id: "0123456789abcdef".to_string(),
            vehicle_driver_id: "a1".to_string(),
            route_id: "r1".to_string(),
            assigned_on: WireTime::Missing,
            status: Status::Active,
        };
        assert_eq!(ra.label(), "Asignación #01234567...");
        assert_eq!(short_id("abc"), "abc");
    }
}
