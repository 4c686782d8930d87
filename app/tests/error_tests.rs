use fleet_app::error::FleetError;

// Test Display implementation for Validation variant
#[test]
fn test_validation_error_display() {
    let err = FleetError::Validation("Ingresa el nombre del rol".to_string());
    assert_eq!(err.to_string(), "Validation error: Ingresa el nombre del rol");
}

// Test Display implementation for Api variant
#[test]
fn test_api_error_display() {
    let err = FleetError::Api {
        status: 409,
        message: "Placa duplicada".to_string(),
    };
    assert_eq!(err.to_string(), "API error 409: Placa duplicada");
}

#[test]
fn test_config_error_display() {
    let err = FleetError::Config("missing URL".to_string());
    assert_eq!(err.to_string(), "Configuration error: missing URL");
}

#[test]
fn test_unauthorized_and_not_authenticated_display() {
    assert_eq!(FleetError::Unauthorized.to_string(), "Unauthorized (401)");
    assert_eq!(FleetError::NotAuthenticated.to_string(), "Not authenticated");
}

// Validation text is shown verbatim, backend failures get one generic message
#[test]
fn test_user_message_validation_is_verbatim() {
    let err = FleetError::Validation("La capacidad debe ser mayor a 0".to_string());
    assert_eq!(err.user_message(), "La capacidad debe ser mayor a 0");
    assert!(err.is_validation());
}

#[test]
fn test_user_message_backend_failures_are_generic() {
    let api = FleetError::Api {
        status: 500,
        message: "stack trace".to_string(),
    };
    let invalid = FleetError::InvalidResponse("eof".to_string());
    assert_eq!(api.user_message(), invalid.user_message());
    assert!(!api.user_message().contains("stack trace"));
    assert!(!api.is_validation());
}

#[test]
fn test_from_serde_json_error() {
    let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let err: FleetError = json_err.into();
    assert!(matches!(err, FleetError::InvalidResponse(_)));
}

#[test]
fn test_error_source_is_none_for_plain_variants() {
    use std::error::Error;
    assert!(FleetError::Unauthorized.source().is_none());
}

mod http_tests {
    use super::*;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    // Test Display implementation for Http variant using a real reqwest error
    #[tokio::test]
    async fn test_http_error_display_and_source() {
        let mock_server = MockServer::start().await;
        Mock::given(wiremock::matchers::any())
            .respond_with(ResponseTemplate::new(200))
            .mount(&mock_server)
            .await;
        let uri = mock_server.uri();
        drop(mock_server);

        let reqwest_err = reqwest::get(&uri).await.unwrap_err();
        let err = FleetError::from(reqwest_err);

        assert!(matches!(err, FleetError::Http(_)));
        assert!(err.to_string().starts_with("HTTP error:"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
