//! Integration tests for guard.rs
//!
//! Exercises the full submit flow: evaluation, confirmation, creation and
//! reload, counting the requests that reach the backend

use fleet_app::FleetError;
use fleet_app::boards::VehicleDriverBoard;
use fleet_app::client::FleetClient;
use fleet_app::guard::{Confirm, Decision, Outcome, Prompt, submit};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Answers every prompt the same way and records what was asked.
struct Scripted {
    answer: bool,
    asked: Vec<Prompt>,
}

impl Scripted {
    fn new(answer: bool) -> Self {
        Self {
            answer,
            asked: Vec::new(),
        }
    }
}

impl Confirm for Scripted {
    fn confirm(&mut self, prompt: &Prompt) -> bool {
        self.asked.push(prompt.clone());
        self.answer
    }
}

fn assignments() -> serde_json::Value {
    json!([
        {
            "unidadConductorId": "a1", "unidadId": "v1", "conductorId": "d1", "estado": "Activo",
            "unidad": { "placa": "ABC123", "modelo": "Sprinter" },
            "conductor": { "nombre": "Luis" }
        },
        { "unidadConductorId": "a2", "unidadId": "v3", "conductorId": "d3", "estado": "Inactivo" }
    ])
}

fn vehicles() -> serde_json::Value {
    json!([
        { "unidadId": "v1", "placa": "ABC123", "modelo": "Sprinter", "capacidad": 20, "estado": "Activo" },
        { "unidadId": "v2", "placa": "XYZ789", "modelo": "Hiace", "capacidad": 15, "estado": "Activo" },
        { "unidadId": "v3", "placa": "QWE456", "modelo": "Coaster", "capacidad": 30, "estado": "Activo" }
    ])
}

fn drivers() -> serde_json::Value {
    json!([
        { "conductorId": "d1", "nombre": "Luis", "cedula": "010", "licencia": "E", "estado": "Activo" },
        { "conductorId": "d2", "nombre": "Marta", "cedula": "020", "licencia": "E", "estado": "Activo" },
        { "conductorId": "d3", "nombre": "Pablo", "cedula": "030", "licencia": "D", "estado": "Activo" }
    ])
}

async fn setup() -> (MockServer, FleetClient, VehicleDriverBoard) {
    let mock_server = MockServer::start().await;
    for (route, body) in [
        ("/unidades-conductores", assignments()),
        ("/unidades", vehicles()),
        ("/conductores", drivers()),
    ] {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&mock_server)
            .await;
    }
    let client = FleetClient::new(mock_server.uri()).unwrap();
    let board = VehicleDriverBoard::load(&client).await.unwrap();
    (mock_server, client, board)
}

async fn expect_posts(server: &MockServer, count: u64) {
    Mock::given(method("POST"))
        .and(path("/unidades-conductores"))
        .respond_with(ResponseTemplate::new(201))
        .expect(count)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_free_pair_creates_once_without_prompt() {
    let (mock_server, client, board) = setup().await;
    Mock::given(method("POST"))
        .and(path("/unidades-conductores"))
        .and(body_json(json!({ "unidadId": "v2", "conductorId": "d2", "estado": "Activo" })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut confirm = Scripted::new(false);
    let submission = submit(&client, &board, &mut confirm, "v2", "d2").await.unwrap();

    assert_eq!(submission.outcome, Outcome::Created);
    assert!(submission.reloaded.is_some());
    assert!(confirm.asked.is_empty());
}

#[tokio::test]
async fn test_inactive_assignment_does_not_occupy() {
    let (mock_server, client, board) = setup().await;
    expect_posts(&mock_server, 1).await;

    let mut confirm = Scripted::new(false);
    let submission = submit(&client, &board, &mut confirm, "v3", "d3").await.unwrap();

    assert_eq!(submission.outcome, Outcome::Created);
    assert!(confirm.asked.is_empty());
}

#[tokio::test]
async fn test_occupied_vehicle_declined_sends_nothing() {
    let (mock_server, client, board) = setup().await;
    expect_posts(&mock_server, 0).await;

    let mut confirm = Scripted::new(false);
    let submission = submit(&client, &board, &mut confirm, "v1", "d2").await.unwrap();

    assert_eq!(
        submission.outcome,
        Outcome::Declined(Decision::VehicleOccupied {
            current_driver: "Luis".to_string()
        })
    );
    assert!(submission.reloaded.is_none());
    assert_eq!(confirm.asked.len(), 1);
    assert_eq!(confirm.asked[0].title, "Unidad ya asignada");
    assert!(confirm.asked[0].message.contains("Luis"));
}

#[tokio::test]
async fn test_occupied_vehicle_confirmed_creates() {
    let (mock_server, client, board) = setup().await;
    expect_posts(&mock_server, 1).await;

    let mut confirm = Scripted::new(true);
    let submission = submit(&client, &board, &mut confirm, "v1", "d2").await.unwrap();

    assert_eq!(submission.outcome, Outcome::Created);
    assert_eq!(confirm.asked.len(), 1);
}

#[tokio::test]
async fn test_occupied_driver_prompt_names_vehicle() {
    let (mock_server, client, board) = setup().await;
    expect_posts(&mock_server, 0).await;

    let mut confirm = Scripted::new(false);
    submit(&client, &board, &mut confirm, "v2", "d1").await.unwrap();

    assert_eq!(confirm.asked[0].title, "Conductor ya asignado");
    assert!(confirm.asked[0].message.contains("ABC123"));
}

#[tokio::test]
async fn test_both_occupied_is_blocked_without_prompt() {
    let mock_server = MockServer::start().await;
    let body = json!([
        { "unidadConductorId": "a1", "unidadId": "v1", "conductorId": "d1", "estado": "Activo" },
        { "unidadConductorId": "a3", "unidadId": "v2", "conductorId": "d2", "estado": "Activo" }
    ]);
    for (route, body) in [
        ("/unidades-conductores", body),
        ("/unidades", vehicles()),
        ("/conductores", drivers()),
    ] {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&mock_server)
            .await;
    }
    expect_posts(&mock_server, 0).await;
    let client = FleetClient::new(mock_server.uri()).unwrap();
    let board = VehicleDriverBoard::load(&client).await.unwrap();

    let mut confirm = Scripted::new(true);
    let submission = submit(&client, &board, &mut confirm, "v1", "d2").await.unwrap();

    assert!(matches!(
        submission.outcome,
        Outcome::Blocked(Decision::BothOccupied { .. })
    ));
    assert!(confirm.asked.is_empty());
}

#[tokio::test]
async fn test_missing_selection_is_validation_error() {
    let (mock_server, client, board) = setup().await;
    expect_posts(&mock_server, 0).await;

    let mut confirm = Scripted::new(true);
    let result = submit(&client, &board, &mut confirm, "v2", "  ").await;

    match result {
        Err(FleetError::Validation(msg)) => {
            assert_eq!(msg, "Selecciona una unidad y un conductor");
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_failed_create_is_reported() {
    let (mock_server, client, board) = setup().await;
    Mock::given(method("POST"))
        .and(path("/unidades-conductores"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let mut confirm = Scripted::new(true);
    let result = submit(&client, &board, &mut confirm, "v2", "d2").await;

    assert!(matches!(result, Err(FleetError::Api { status: 500, .. })));
}

#[tokio::test]
async fn test_failed_reload_after_create_still_reports_created() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/unidades-conductores"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/unidades-conductores"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;
    for (route, body) in [("/unidades", vehicles()), ("/conductores", drivers())] {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&mock_server)
            .await;
    }
    expect_posts(&mock_server, 1).await;

    let client = FleetClient::new(mock_server.uri()).unwrap();
    let board = VehicleDriverBoard::load(&client).await.unwrap();
    let mut confirm = Scripted::new(false);
    let submission = submit(&client, &board, &mut confirm, "v1", "d1").await.unwrap();

    assert_eq!(submission.outcome, Outcome::Created);
    assert!(submission.reloaded.is_none());
}
