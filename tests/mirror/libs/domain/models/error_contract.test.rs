/**
 * =================================================================
 * APARATO: ERROR CONTRACT TEST (V3.0)
 * CLASIFICACIÓN: TRINITY EVIDENCE (ESTRATO L2-MODELS)
 * OBJETIVO: Certificar la forma de cable de last_error.json y la
 *           coherencia de la taxonomía de reintentos.
 * =================================================================
 */

use maquette_domain_models::{ErrorCode, ErrorResponse};

#[test]
fn certify_error_response_wire_shape() {
    let response = ErrorResponse::forge(
        ErrorCode::SolverNoSolution,
        Some("2026-08-01T10-00-00Z_deadbeef".to_string()),
        Some("layout".to_string()),
        "Solve/regenerate budget exhausted without a solution",
    );

    let serialized_json = serde_json::to_string_pretty(&response).unwrap();

    assert!(serialized_json.contains("\"ok\": false"));
    assert!(serialized_json.contains("\"failed_stage\": \"layout\""));
    assert!(serialized_json.contains("\"code\": \"solver_no_solution\""));
    assert!(serialized_json.contains("\"component\": \"layout_solver\""));
    assert!(serialized_json.contains("\"retryable\": true"));
    assert!(serialized_json.contains("\"suggested_actions\""));
    assert!(serialized_json.contains("\"timestamp\""));

    let recovered: ErrorResponse = serde_json::from_str(&serialized_json).unwrap();
    assert_eq!(recovered, response);
}

#[test]
fn certify_retryability_taxonomy() {
    // Transitorios: el salto de etapas hace seguro reintentar.
    for retryable in [
        ErrorCode::UpstreamTransport,
        ErrorCode::UpstreamRateLimited,
        ErrorCode::AssetGenerationFailed,
        ErrorCode::ImageGenerationFailed,
        ErrorCode::SolverNoSolution,
        ErrorCode::SolverTimeout,
    ] {
        assert!(retryable.is_retryable(), "RETRYABILITY_BREACH: {retryable:?}");
    }

    // Terminales: reintentar sin cambiar la entrada es inútil.
    for terminal in [
        ErrorCode::InvalidInput,
        ErrorCode::ConfigError,
        ErrorCode::UpstreamAuth,
        ErrorCode::UpstreamRefused,
        ErrorCode::SessionNotFound,
    ] {
        assert!(!terminal.is_retryable(), "RETRYABILITY_BREACH: {terminal:?}");
    }
}

#[test]
fn certify_code_string_parity_with_serde() {
    // code_str debe coincidir bit a bit con la serialización serde.
    for code in [
        ErrorCode::InvalidInput,
        ErrorCode::ConfigError,
        ErrorCode::UpstreamTransport,
        ErrorCode::SolverConstraintConflict,
        ErrorCode::DiskSpaceInsufficient,
        ErrorCode::InternalError,
    ] {
        let via_serde = serde_json::to_string(&code).unwrap();
        assert_eq!(via_serde, format!("\"{}\"", code.code_str()));
    }
}
