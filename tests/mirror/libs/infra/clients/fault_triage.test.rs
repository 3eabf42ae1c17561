/**
 * =================================================================
 * APARATO: FAULT TRIAGE TEST (V2.0)
 * CLASIFICACIÓN: TRINITY EVIDENCE (ESTRATO L3-CLIENTS)
 * OBJETIVO: Certificar el triaje de fallos de servicio: transitorios
 *           vs terminales y su proyección al catálogo de errores.
 * =================================================================
 */

use maquette_core_dispatch::FaultTriage;
use maquette_domain_models::ErrorCode;
use maquette_infra_clients::ServiceFault;

#[test]
fn certify_transient_faults_earn_retries() {
    assert!(ServiceFault::Transport("link reset".to_string()).is_retryable());
    assert!(ServiceFault::RateLimited("burst quota".to_string()).is_retryable());
}

#[test]
fn certify_terminal_faults_fail_fast() {
    assert!(!ServiceFault::Auth("revoked key".to_string()).is_retryable());
    assert!(!ServiceFault::InvalidInput("malformed prompt".to_string()).is_retryable());
    assert!(!ServiceFault::PolicyRefused("content rejected".to_string()).is_retryable());
}

#[test]
fn certify_projection_to_error_catalog() {
    let expectations = [
        (ServiceFault::Transport("x".into()), ErrorCode::UpstreamTransport),
        (ServiceFault::RateLimited("x".into()), ErrorCode::UpstreamRateLimited),
        (ServiceFault::Auth("x".into()), ErrorCode::UpstreamAuth),
        (ServiceFault::InvalidInput("x".into()), ErrorCode::InvalidInput),
        (ServiceFault::PolicyRefused("x".into()), ErrorCode::UpstreamRefused),
    ];

    for (fault, expected_code) in expectations {
        assert_eq!(fault.error_code(), expected_code);
        // La retryabilidad del catálogo coincide con la del triaje.
        assert_eq!(fault.is_retryable(), expected_code.is_retryable());
    }
}

#[test]
fn certify_display_carries_screaming_prefix() {
    let rendered = ServiceFault::Transport("socket collapse".to_string()).to_string();
    assert!(rendered.starts_with("TRANSPORT_FAULT:"));
}
