//! Client-side list filters.
//!
//! Criteria are raw operator input. A blank criterion (empty or only
//! whitespace) is ignored, and a filter with nothing set returns the list
//! untouched. Text criteria and status tokens compare case-insensitively.

use chrono::{DateTime, NaiveDate};

use crate::models::{
    Driver, Incident, Route, RouteAssignment, Severity, User, Vehicle, VehicleDriverAssignment,
};

pub trait Filter<T> {
    fn is_blank(&self) -> bool;

    fn matches(&self, record: &T) -> bool;

    fn apply(&self, records: Vec<T>) -> Vec<T> {
        if self.is_blank() {
            return records;
        }
        records.into_iter().filter(|r| self.matches(r)).collect()
    }
}

fn criterion(value: Option<&String>) -> Option<&str> {
    value.map(|s| s.trim()).filter(|s| !s.is_empty())
}

fn contains_ci(haystack: &str, needle: Option<&String>) -> bool {
    criterion(needle).is_none_or(|n| haystack.to_lowercase().contains(&n.to_lowercase()))
}

fn equals_ci(value: &str, wanted: Option<&String>) -> bool {
    criterion(wanted).is_none_or(|w| value.eq_ignore_ascii_case(w))
}

fn equals(value: &str, wanted: Option<&String>) -> bool {
    criterion(wanted).is_none_or(|w| value == w)
}

#[derive(Debug, Clone, Default)]
pub struct VehicleFilter {
    pub plate: Option<String>,
    pub model: Option<String>,
    pub min_capacity: Option<u32>,
    pub max_capacity: Option<u32>,
    pub status: Option<String>,
}

impl Filter<Vehicle> for VehicleFilter {
    fn is_blank(&self) -> bool {
        criterion(self.plate.as_ref()).is_none()
            && criterion(self.model.as_ref()).is_none()
            && self.min_capacity.is_none()
            && self.max_capacity.is_none()
            && criterion(self.status.as_ref()).is_none()
    }

    fn matches(&self, v: &Vehicle) -> bool {
        contains_ci(&v.plate, self.plate.as_ref())
            && contains_ci(&v.model, self.model.as_ref())
            && self.min_capacity.is_none_or(|min| v.capacity >= min)
            && self.max_capacity.is_none_or(|max| v.capacity <= max)
            && equals_ci(v.status.as_wire(), self.status.as_ref())
    }
}

#[derive(Debug, Clone, Default)]
pub struct DriverFilter {
    pub name: Option<String>,
    pub national_id: Option<String>,
    pub license: Option<String>,
    pub status: Option<String>,
}

impl Filter<Driver> for DriverFilter {
    fn is_blank(&self) -> bool {
        [
            self.name.as_ref(),
            self.national_id.as_ref(),
            self.license.as_ref(),
            self.status.as_ref(),
        ]
        .into_iter()
        .all(|c| criterion(c).is_none())
    }

    fn matches(&self, d: &Driver) -> bool {
        contains_ci(&d.name, self.name.as_ref())
            && contains_ci(&d.national_id, self.national_id.as_ref())
            && contains_ci(&d.license, self.license.as_ref())
            && equals_ci(d.status.as_wire(), self.status.as_ref())
    }
}

#[derive(Debug, Clone, Default)]
pub struct RouteFilter {
    pub name: Option<String>,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub days: Option<String>,
    pub status: Option<String>,
}

impl Filter<Route> for RouteFilter {
    fn is_blank(&self) -> bool {
        [
            self.name.as_ref(),
            self.origin.as_ref(),
            self.destination.as_ref(),
            self.days.as_ref(),
            self.status.as_ref(),
        ]
        .into_iter()
        .all(|c| criterion(c).is_none())
    }

    fn matches(&self, r: &Route) -> bool {
        contains_ci(&r.name, self.name.as_ref())
            && contains_ci(&r.origin, self.origin.as_ref())
            && contains_ci(&r.destination, self.destination.as_ref())
            && contains_ci(&r.days, self.days.as_ref())
            && equals_ci(r.status.as_wire(), self.status.as_ref())
    }
}

#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role_id: Option<String>,
    pub status: Option<String>,
}

impl Filter<User> for UserFilter {
    fn is_blank(&self) -> bool {
        [
            self.name.as_ref(),
            self.email.as_ref(),
            self.role_id.as_ref(),
            self.status.as_ref(),
        ]
        .into_iter()
        .all(|c| criterion(c).is_none())
    }

    fn matches(&self, u: &User) -> bool {
        contains_ci(&u.name, self.name.as_ref())
            && contains_ci(&u.email, self.email.as_ref())
            && equals(u.role_id.as_deref().unwrap_or_default(), self.role_id.as_ref())
            && equals_ci(u.status.as_wire(), self.status.as_ref())
    }
}

#[derive(Debug, Clone, Default)]
pub struct VehicleDriverFilter {
    pub vehicle_id: Option<String>,
    pub driver_id: Option<String>,
    pub status: Option<String>,
}

impl Filter<VehicleDriverAssignment> for VehicleDriverFilter {
    fn is_blank(&self) -> bool {
        [self.vehicle_id.as_ref(), self.driver_id.as_ref(), self.status.as_ref()]
            .into_iter()
            .all(|c| criterion(c).is_none())
    }

    fn matches(&self, a: &VehicleDriverAssignment) -> bool {
        equals(&a.vehicle_id, self.vehicle_id.as_ref())
            && equals(&a.driver_id, self.driver_id.as_ref())
            && equals_ci(a.status.as_wire(), self.status.as_ref())
    }
}

#[derive(Debug, Clone, Default)]
pub struct RouteAssignmentFilter {
    pub vehicle_driver_id: Option<String>,
    pub route_id: Option<String>,
    pub status: Option<String>,
}

impl Filter<RouteAssignment> for RouteAssignmentFilter {
    fn is_blank(&self) -> bool {
        [self.vehicle_driver_id.as_ref(), self.route_id.as_ref(), self.status.as_ref()]
            .into_iter()
            .all(|c| criterion(c).is_none())
    }

    fn matches(&self, a: &RouteAssignment) -> bool {
        equals(&a.vehicle_driver_id, self.vehicle_driver_id.as_ref())
            && equals(&a.route_id, self.route_id.as_ref())
            && equals_ci(a.status.as_wire(), self.status.as_ref())
    }
}

#[derive(Debug, Clone, Default)]
pub struct IncidentFilter {
    pub kind: Option<String>,
    pub severity: Option<String>,
    pub status: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl Filter<Incident> for IncidentFilter {
    fn is_blank(&self) -> bool {
        [self.kind.as_ref(), self.severity.as_ref(), self.status.as_ref()]
            .into_iter()
            .all(|c| criterion(c).is_none())
            && self.from.is_none()
            && self.to.is_none()
    }

    /// Date bounds are inclusive. An incident without a date never matches
    /// a bounded filter.
    fn matches(&self, i: &Incident) -> bool {
        let day = i.date.parsed().map(DateTime::date_naive);
        let within_from = self.from.is_none_or(|from| day.is_some_and(|d| d >= from));
        let within_to = self.to.is_none_or(|to| day.is_some_and(|d| d <= to));

        equals_ci(i.kind.as_wire(), self.kind.as_ref())
            && equals_ci(
                i.severity.as_ref().map_or("", Severity::as_wire),
                self.severity.as_ref(),
            )
            && equals_ci(i.status.as_wire(), self.status.as_ref())
            && within_from
            && within_to
    }
}
