//! Vehicle-driver assignment guard.
//!
//! A vehicle should have at most one active driver and a driver at most one
//! active vehicle. The backend does not enforce this, so before creating an
//! assignment the guard checks both sides against the loaded assignment
//! list and asks for explicit confirmation to reassign. The check is
//! advisory: two operators working at the same time can still both see a
//! free vehicle.
//!
//! Decision matrix:
//! | vehicle occupied | driver occupied | Result                        |
//! |------------------|-----------------|-------------------------------|
//! | false            | false           | create                        |
//! | true             | false           | confirm, then create          |
//! | false            | true            | confirm, then create          |
//! | true             | true            | report both, never create     |

use crate::boards::VehicleDriverBoard;
use crate::client::FleetClient;
use crate::error::{FleetError, Result};
use crate::models::{NewVehicleDriverAssignment, Status, VehicleDriverAssignment};
use crate::resolver::{assignment_driver_label, assignment_vehicle_label};
use tracing::{info, warn};

/// Asks the operator whether to go ahead with a reassignment.
pub trait Confirm {
    fn confirm(&mut self, prompt: &Prompt) -> bool;
}

/// Message shown to the operator for an occupied vehicle or driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub title: String,
    pub message: String,
}

/// What the guard concluded about a proposed vehicle-driver pairing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Clear,
    VehicleOccupied {
        current_driver: String,
    },
    DriverOccupied {
        current_vehicle: String,
    },
    BothOccupied {
        current_driver: String,
        current_vehicle: String,
    },
}

impl Decision {
    /// The message for this decision; `None` when nothing is occupied.
    pub fn prompt(&self) -> Option<Prompt> {
        match self {
            Self::Clear => None,
            Self::VehicleOccupied { current_driver } => Some(Prompt {
                title: "Unidad ya asignada".to_string(),
                message: format!(
                    "Esta unidad ya está asignada a: {current_driver}. ¿Deseas reasignarla?"
                ),
            }),
            Self::DriverOccupied { current_vehicle } => Some(Prompt {
                title: "Conductor ya asignado".to_string(),
                message: format!(
                    "Este conductor ya está asignado a: {current_vehicle}. ¿Deseas reasignarlo?"
                ),
            }),
            Self::BothOccupied {
                current_driver,
                current_vehicle,
            } => Some(Prompt {
                title: "Ambos ya están asignados".to_string(),
                message: format!(
                    "La unidad ya está asignada a: {current_driver}. \
                     El conductor ya está asignado a: {current_vehicle}"
                ),
            }),
        }
    }

    pub const fn needs_confirmation(&self) -> bool {
        matches!(self, Self::VehicleOccupied { .. } | Self::DriverOccupied { .. })
    }
}

/// How a submission ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Created,
    /// The operator declined the reassignment prompt.
    Declined(Decision),
    /// Both sides are occupied; no creation path exists.
    Blocked(Decision),
}

/// Result of [`submit`].
#[derive(Debug, Clone)]
pub struct Submission {
    pub outcome: Outcome,
    /// Fresh lists after a successful creation. `None` when nothing was
    /// created or the refresh itself failed.
    pub reloaded: Option<VehicleDriverBoard>,
}

/// A selectable vehicle or driver in the assignment form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub id: String,
    pub label: String,
    pub already_assigned: bool,
}

pub fn vehicle_occupied(assignments: &[VehicleDriverAssignment], vehicle_id: &str) -> bool {
    active_for_vehicle(assignments, vehicle_id).is_some()
}

pub fn driver_occupied(assignments: &[VehicleDriverAssignment], driver_id: &str) -> bool {
    active_for_driver(assignments, driver_id).is_some()
}

/// Driver currently active on `vehicle_id`, as a display label.
pub fn current_driver_of(board: &VehicleDriverBoard, vehicle_id: &str) -> Option<String> {
    active_for_vehicle(&board.assignments, vehicle_id)
        .map(|a| assignment_driver_label(a, &board.drivers))
}

/// Vehicle currently active for `driver_id`, as a display label.
pub fn current_vehicle_of(board: &VehicleDriverBoard, driver_id: &str) -> Option<String> {
    active_for_driver(&board.assignments, driver_id)
        .map(|a| assignment_vehicle_label(a, &board.vehicles))
}

pub fn evaluate(board: &VehicleDriverBoard, vehicle_id: &str, driver_id: &str) -> Decision {
    match (
        current_driver_of(board, vehicle_id),
        current_vehicle_of(board, driver_id),
    ) {
        (None, None) => Decision::Clear,
        (Some(current_driver), None) => Decision::VehicleOccupied { current_driver },
        (None, Some(current_vehicle)) => Decision::DriverOccupied { current_vehicle },
        (Some(current_driver), Some(current_vehicle)) => Decision::BothOccupied {
            current_driver,
            current_vehicle,
        },
    }
}

/// Active vehicles for the assignment form, flagged when already taken.
pub fn vehicle_options(board: &VehicleDriverBoard) -> Vec<SelectOption> {
    board
        .vehicles
        .iter()
        .filter(|v| v.status.is_active())
        .map(|v| SelectOption {
            id: v.id.clone(),
            label: format!("{} - {}", v.plate, v.model),
            already_assigned: vehicle_occupied(&board.assignments, &v.id),
        })
        .collect()
}

/// Active drivers for the assignment form, flagged when already taken.
pub fn driver_options(board: &VehicleDriverBoard) -> Vec<SelectOption> {
    board
        .drivers
        .iter()
        .filter(|d| d.status.is_active())
        .map(|d| SelectOption {
            id: d.id.clone(),
            label: format!("{} - {}", d.name, d.national_id),
            already_assigned: driver_occupied(&board.assignments, &d.id),
        })
        .collect()
}

/// Both sides of the pairing must be chosen.
pub fn validate_selection(vehicle_id: &str, driver_id: &str) -> Result<()> {
    if vehicle_id.trim().is_empty() || driver_id.trim().is_empty() {
        return Err(FleetError::Validation(
            "Selecciona una unidad y un conductor".to_string(),
        ));
    }
    Ok(())
}

/// Runs the guard for a new vehicle-driver pairing and creates it when
/// allowed. `board` must hold the full, unfiltered assignment list; the
/// caller loads it. Once the pairing is created, a failed refresh is logged
/// and leaves `reloaded` empty.
pub async fn submit<C: Confirm>(
    client: &FleetClient,
    board: &VehicleDriverBoard,
    confirm: &mut C,
    vehicle_id: &str,
    driver_id: &str,
) -> Result<Submission> {
    validate_selection(vehicle_id, driver_id)?;
    let vehicle_id = vehicle_id.trim();
    let driver_id = driver_id.trim();

    let decision = evaluate(board, vehicle_id, driver_id);
    if matches!(decision, Decision::BothOccupied { .. }) {
        warn!(
            "Vehicle {} and driver {} are both already assigned",
            vehicle_id, driver_id
        );
        return Ok(Submission {
            outcome: Outcome::Blocked(decision),
            reloaded: None,
        });
    }

    if decision.needs_confirmation() {
        let accepted = decision
            .prompt()
            .is_some_and(|prompt| confirm.confirm(&prompt));
        if !accepted {
            info!("Reassignment declined for vehicle {}", vehicle_id);
            return Ok(Submission {
                outcome: Outcome::Declined(decision),
                reloaded: None,
            });
        }
    }

    let body = NewVehicleDriverAssignment {
        vehicle_id: vehicle_id.to_string(),
        driver_id: driver_id.to_string(),
        status: Status::Active,
    };
    client.create::<VehicleDriverAssignment, _>(&body).await?;
    info!("Assigned driver {} to vehicle {}", driver_id, vehicle_id);

    let reloaded = match VehicleDriverBoard::load(client).await {
        Ok(board) => Some(board),
        Err(e) => {
            warn!("Assignment created but the lists could not be reloaded: {}", e);
            None
        }
    };
    Ok(Submission {
        outcome: Outcome::Created,
        reloaded,
    })
}

fn active_for_vehicle<'a>(
    assignments: &'a [VehicleDriverAssignment],
    vehicle_id: &str,
) -> Option<&'a VehicleDriverAssignment> {
    assignments
        .iter()
        .find(|a| a.vehicle_id == vehicle_id && a.status.is_active())
}

fn active_for_driver<'a>(
    assignments: &'a [VehicleDriverAssignment],
    driver_id: &str,
) -> Option<&'a VehicleDriverAssignment> {
    assignments
        .iter()
        .find(|a| a.driver_id == driver_id && a.status.is_active())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Driver, Vehicle};

    fn vehicle(id: &str, plate: &str, status: Status) -> Vehicle {
        Vehicle {
            id: id.to_string(),
            plate: plate.to_string(),
            model: "Sprinter".to_string(),
            capacity: 20,
            status,
        }
    }

    fn driver(id: &str, name: &str, status: Status) -> Driver {
        Driver {
            id: id.to_string(),
            name: name.to_string(),
            national_id: format!("ced-{id}"),
            license: "C".to_string(),
            phone: None,
            address: None,
            status,
        }
    }

    fn link(id: &str, vehicle_id: &str, driver_id: &str, status: Status) -> VehicleDriverAssignment {
        VehicleDriverAssignment {
            id: id.to_string(),
            vehicle_id: vehicle_id.to_string(),
            driver_id: driver_id.to_string(),
            status,
            vehicle: None,
            driver: None,
        }
    }

    fn board() -> VehicleDriverBoard {
        VehicleDriverBoard {
            assignments: vec![
                link("a1", "v1", "d1", Status::Active),
                link("a2", "v2", "d2", Status::Inactive),
            ],
            vehicles: vec![
                vehicle("v1", "AAA111", Status::Active),
                vehicle("v2", "BBB222", Status::Active),
                vehicle("v3", "CCC333", Status::Inactive),
            ],
            drivers: vec![
                driver("d1", "Luis", Status::Active),
                driver("d2", "Marta", Status::Active),
                driver("d3", "Pablo", Status::Inactive),
            ],
        }
    }

    #[test]
    fn test_occupancy_requires_active_status() {
        let b = board();
        assert!(vehicle_occupied(&b.assignments, "v1"));
        assert!(!vehicle_occupied(&b.assignments, "v2"));
        assert!(driver_occupied(&b.assignments, "d1"));
        assert!(!driver_occupied(&b.assignments, "d2"));
        assert!(!driver_occupied(&b.assignments, "unknown"));
    }

    #[test]
    fn test_assignment_without_status_counts_as_occupied() {
        let a: VehicleDriverAssignment = serde_json::from_value(serde_json::json!({
            "unidadConductorId": "a9", "unidadId": "v7", "conductorId": "d7", "estado": null
        }))
        .unwrap();
        let assignments = vec![a];
        assert!(vehicle_occupied(&assignments, "v7"));
        assert!(driver_occupied(&assignments, "d7"));
    }

    #[test]
    fn test_evaluate_all_four_outcomes() {
        let mut b = board();
        b.assignments.push(link("a3", "v3", "d3", Status::Active));

        assert_eq!(evaluate(&b, "v2", "d2"), Decision::Clear);
        assert_eq!(
            evaluate(&b, "v1", "d2"),
            Decision::VehicleOccupied {
                current_driver: "Luis".to_string()
            }
        );
        assert_eq!(
            evaluate(&b, "v2", "d1"),
            Decision::DriverOccupied {
                current_vehicle: "AAA111 - Sprinter".to_string()
            }
        );
        assert_eq!(
            evaluate(&b, "v1", "d3"),
            Decision::BothOccupied {
                current_driver: "Luis".to_string(),
                current_vehicle: "CCC333 - Sprinter".to_string()
            }
        );
    }

    #[test]
    fn test_current_holder_falls_back_to_identifier() {
        let mut b = board();
        b.drivers.clear();
        assert_eq!(current_driver_of(&b, "v1").as_deref(), Some("Conductor ID: d1"));
    }

    #[test]
    fn test_prompts_name_the_current_holder() {
        let decision = Decision::VehicleOccupied {
            current_driver: "Luis".to_string(),
        };
        let prompt = decision.prompt().unwrap();
        assert_eq!(prompt.title, "Unidad ya asignada");
        assert!(prompt.message.contains("Luis"));
        assert!(decision.needs_confirmation());

        assert!(Decision::Clear.prompt().is_none());
        let both = Decision::BothOccupied {
            current_driver: "Luis".to_string(),
            current_vehicle: "AAA111 - Sprinter".to_string(),
        };
        assert!(!both.needs_confirmation());
        let message = both.prompt().unwrap().message;
        assert!(message.contains("Luis") && message.contains("AAA111"));
    }

    #[test]
    fn test_options_list_active_records_and_flag_taken_ones() {
        let b = board();
        let vehicles = vehicle_options(&b);
        assert_eq!(vehicles.len(), 2);
        assert!(vehicles[0].already_assigned);
        assert!(!vehicles[1].already_assigned);

        let drivers = driver_options(&b);
        assert_eq!(drivers.len(), 2);
        assert_eq!(drivers[0].label, "Luis - ced-d1");
        assert!(drivers[0].already_assigned);
    }
}
