//! Page loads.
//!
//! Each board fetches every collection its page needs concurrently and
//! joins them. A single failed request fails the whole load, so a board is
//! either complete or absent; there is no partial data.

use crate::client::FleetClient;
use crate::error::Result;
use crate::models::{
    Driver, Incident, Role, Route, RouteAssignment, User, Vehicle, VehicleDriverAssignment,
};
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct VehicleDriverBoard {
    pub assignments: Vec<VehicleDriverAssignment>,
    pub vehicles: Vec<Vehicle>,
    pub drivers: Vec<Driver>,
}

impl VehicleDriverBoard {
    pub async fn load(client: &FleetClient) -> Result<Self> {
        let (assignments, vehicles, drivers) = futures::try_join!(
            client.list::<VehicleDriverAssignment>(),
            client.list::<Vehicle>(),
            client.list::<Driver>()
        )?;
        debug!(
            "Vehicle-driver board: {} assignment(s), {} vehicle(s), {} driver(s)",
            assignments.len(),
            vehicles.len(),
            drivers.len()
        );
        Ok(Self {
            assignments,
            vehicles,
            drivers,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct RouteAssignmentBoard {
    pub route_assignments: Vec<RouteAssignment>,
    pub vehicle_drivers: Vec<VehicleDriverAssignment>,
    pub vehicles: Vec<Vehicle>,
    pub drivers: Vec<Driver>,
    pub routes: Vec<Route>,
}

impl RouteAssignmentBoard {
    pub async fn load(client: &FleetClient) -> Result<Self> {
        let (route_assignments, vehicle_drivers, vehicles, drivers, routes) = futures::try_join!(
            client.list::<RouteAssignment>(),
            client.list::<VehicleDriverAssignment>(),
            client.list::<Vehicle>(),
            client.list::<Driver>(),
            client.list::<Route>()
        )?;
        debug!(
            "Route assignment board: {} assignment(s), {} route(s)",
            route_assignments.len(),
            routes.len()
        );
        Ok(Self {
            route_assignments,
            vehicle_drivers,
            vehicles,
            drivers,
            routes,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct IncidentBoard {
    pub incidents: Vec<Incident>,
    pub route_assignments: Vec<RouteAssignment>,
}

impl IncidentBoard {
    pub async fn load(client: &FleetClient) -> Result<Self> {
        let (incidents, route_assignments) = futures::try_join!(
            client.list::<Incident>(),
            client.list::<RouteAssignment>()
        )?;
        Ok(Self {
            incidents,
            route_assignments,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct UserBoard {
    pub users: Vec<User>,
    pub roles: Vec<Role>,
}

impl UserBoard {
    pub async fn load(client: &FleetClient) -> Result<Self> {
        let (users, roles) = futures::try_join!(client.list::<User>(), client.list::<Role>())?;
        Ok(Self { users, roles })
    }
}
