//! Command-line schema for the fleet console.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "fleet-console")]
#[command(about = "Back-office console for the fleet management backend")]
#[command(version)]
pub struct Cli {
    /// Backend base URL (overrides FLEET_API_URL)
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// Session file (overrides FLEET_SESSION_FILE)
    #[arg(long, global = true, value_name = "PATH")]
    pub session_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in and store the session locally
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Manage vehicles (unidades)
    Vehicles {
        #[command(subcommand)]
        action: VehicleAction,
    },
    /// Manage drivers (conductores)
    Drivers {
        #[command(subcommand)]
        action: DriverAction,
    },
    /// Manage routes and schedules (rutas)
    Routes {
        #[command(subcommand)]
        action: RouteAction,
    },
    /// Manage roles
    Roles {
        #[command(subcommand)]
        action: RoleAction,
    },
    /// Manage console users (usuarios)
    Users {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Pair vehicles with drivers (unidades-conductores)
    UnitDrivers {
        #[command(subcommand)]
        action: UnitDriverAction,
    },
    /// Assign vehicle-driver pairs to routes (asignaciones)
    RouteAssignments {
        #[command(subcommand)]
        action: RouteAssignmentAction,
    },
    /// Record and follow up incidents (incidencias)
    Incidents {
        #[command(subcommand)]
        action: IncidentAction,
    },
}

// === Vehicles ===

#[derive(Subcommand, Debug)]
pub enum VehicleAction {
    List(VehicleListArgs),
    Create {
        #[arg(long, default_value_t)]
        plate: String,
        #[arg(long, default_value_t)]
        model: String,
        #[arg(long, default_value_t)]
        capacity: String,
        #[arg(long)]
        status: Option<String>,
    },
    Update {
        id: String,
        #[arg(long)]
        plate: Option<String>,
        #[arg(long)]
        model: Option<String>,
        #[arg(long)]
        capacity: Option<String>,
        #[arg(long)]
        status: Option<String>,
    },
}

#[derive(Args, Debug, Default)]
pub struct VehicleListArgs {
    #[arg(long)]
    pub plate: Option<String>,
    #[arg(long)]
    pub model: Option<String>,
    #[arg(long)]
    pub min_capacity: Option<u32>,
    #[arg(long)]
    pub max_capacity: Option<u32>,
    #[arg(long)]
    pub status: Option<String>,
}

// === Drivers ===

#[derive(Subcommand, Debug)]
pub enum DriverAction {
    List(DriverListArgs),
    Create {
        #[arg(long, default_value_t)]
        name: String,
        #[arg(long, default_value_t)]
        national_id: String,
        #[arg(long, default_value_t)]
        license: String,
        #[arg(long, default_value_t)]
        phone: String,
        #[arg(long, default_value_t)]
        address: String,
        #[arg(long)]
        status: Option<String>,
    },
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        license: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        status: Option<String>,
    },
}

#[derive(Args, Debug, Default)]
pub struct DriverListArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub national_id: Option<String>,
    #[arg(long)]
    pub license: Option<String>,
    #[arg(long)]
    pub status: Option<String>,
}

// === Routes ===

#[derive(Subcommand, Debug)]
pub enum RouteAction {
    List(RouteListArgs),
    Create {
        #[arg(long, default_value_t)]
        name: String,
        #[arg(long, default_value_t)]
        origin: String,
        #[arg(long, default_value_t)]
        destination: String,
        /// Kilometres
        #[arg(long, default_value_t)]
        distance: String,
        /// HH:MM
        #[arg(long, default_value_t)]
        departure: String,
        /// HH:MM
        #[arg(long, default_value_t)]
        arrival: String,
        #[arg(long, default_value_t)]
        days: String,
        #[arg(long)]
        status: Option<String>,
    },
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        origin: Option<String>,
        #[arg(long)]
        destination: Option<String>,
        #[arg(long)]
        distance: Option<String>,
        #[arg(long)]
        departure: Option<String>,
        #[arg(long)]
        arrival: Option<String>,
        #[arg(long)]
        days: Option<String>,
        #[arg(long)]
        status: Option<String>,
    },
}

#[derive(Args, Debug, Default)]
pub struct RouteListArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub origin: Option<String>,
    #[arg(long)]
    pub destination: Option<String>,
    #[arg(long)]
    pub days: Option<String>,
    #[arg(long)]
    pub status: Option<String>,
}

// === Roles ===

#[derive(Subcommand, Debug)]
pub enum RoleAction {
    List,
    Create {
        #[arg(long, default_value_t)]
        name: String,
        #[arg(long, default_value_t)]
        description: String,
    },
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
}

// === Users ===

#[derive(Subcommand, Debug)]
pub enum UserAction {
    List(UserListArgs),
    Create {
        #[arg(long, default_value_t)]
        name: String,
        #[arg(long, default_value_t)]
        email: String,
        #[arg(long, default_value_t)]
        password: String,
        #[arg(long, default_value_t)]
        role: String,
    },
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        role: Option<String>,
        #[arg(long)]
        status: Option<String>,
        /// Leave unset to keep the current password
        #[arg(long)]
        password: Option<String>,
    },
}

#[derive(Args, Debug, Default)]
pub struct UserListArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub role: Option<String>,
    #[arg(long)]
    pub status: Option<String>,
}

// === Vehicle-driver assignments ===

#[derive(Subcommand, Debug)]
pub enum UnitDriverAction {
    List(UnitDriverListArgs),
    /// Show the vehicles and drivers that can be paired
    Options,
    /// Pair a vehicle with a driver, asking before a reassignment
    Assign {
        #[arg(long, default_value_t)]
        vehicle: String,
        #[arg(long, default_value_t)]
        driver: String,
        /// Confirm reassignments without asking
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Change the status of an existing pairing
    SetStatus { id: String, status: String },
}

#[derive(Args, Debug, Default)]
pub struct UnitDriverListArgs {
    #[arg(long)]
    pub vehicle: Option<String>,
    #[arg(long)]
    pub driver: Option<String>,
    #[arg(long)]
    pub status: Option<String>,
}

// === Route assignments ===

#[derive(Subcommand, Debug)]
pub enum RouteAssignmentAction {
    List(RouteAssignmentListArgs),
    Create {
        /// Vehicle-driver assignment id
        #[arg(long, default_value_t)]
        unit_driver: String,
        #[arg(long, default_value_t)]
        route: String,
        /// YYYY-MM-DD, defaults to today
        #[arg(long, default_value_t)]
        date: String,
        #[arg(long)]
        status: Option<String>,
    },
    Update {
        id: String,
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        status: Option<String>,
    },
}

#[derive(Args, Debug, Default)]
pub struct RouteAssignmentListArgs {
    #[arg(long)]
    pub unit_driver: Option<String>,
    #[arg(long)]
    pub route: Option<String>,
    #[arg(long)]
    pub status: Option<String>,
}

// === Incidents ===

#[derive(Subcommand, Debug)]
pub enum IncidentAction {
    List(IncidentListArgs),
    Create {
        /// Route assignment id
        #[arg(long, default_value_t)]
        assignment: String,
        /// YYYY-MM-DD, defaults to today
        #[arg(long, default_value_t)]
        date: String,
        /// FalloTecnico, Choque, FaltaConductor, Retraso or Otro
        #[arg(long, default_value_t)]
        kind: String,
        /// Alto, Medio or Bajo
        #[arg(long, default_value_t)]
        severity: String,
        #[arg(long, default_value_t)]
        description: String,
    },
    Update {
        id: String,
        #[arg(long)]
        kind: Option<String>,
        #[arg(long)]
        severity: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        status: Option<String>,
    },
}

#[derive(Args, Debug, Default)]
pub struct IncidentListArgs {
    #[arg(long)]
    pub kind: Option<String>,
    #[arg(long)]
    pub severity: Option<String>,
    #[arg(long)]
    pub status: Option<String>,
    /// Earliest date, YYYY-MM-DD
    #[arg(long)]
    pub from: Option<chrono::NaiveDate>,
    /// Latest date, YYYY-MM-DD
    #[arg(long)]
    pub to: Option<chrono::NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_schema_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_assign_with_global_flags() {
        let cli = Cli::try_parse_from([
            "fleet-console",
            "unit-drivers",
            "assign",
            "--vehicle",
            "v1",
            "--driver",
            "d2",
            "--yes",
            "--api-url",
            "http://localhost:9000/api",
        ])
        .unwrap();
        assert_eq!(cli.api_url.as_deref(), Some("http://localhost:9000/api"));
        match cli.command {
            Command::UnitDrivers {
                action: UnitDriverAction::Assign { vehicle, driver, yes },
            } => {
                assert_eq!(vehicle, "v1");
                assert_eq!(driver, "d2");
                assert!(yes);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_create_fields_default_to_blank() {
        let cli =
            Cli::try_parse_from(["fleet-console", "routes", "create", "--name", "Norte"]).unwrap();
        match cli.command {
            Command::Routes {
                action: RouteAction::Create { origin, .. },
            } => assert!(origin.is_empty()),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_incident_dates_parse() {
        let cli = Cli::try_parse_from([
            "fleet-console",
            "incidents",
            "list",
            "--from",
            "2025-03-01",
        ])
        .unwrap();
        match cli.command {
            Command::Incidents {
                action: IncidentAction::List(args),
            } => assert!(args.from.is_some()),
            other => panic!("unexpected command {other:?}"),
        }
    }
}
