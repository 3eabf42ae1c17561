// [libs/infra/clients/src/transport.rs]
/*!
 * =================================================================
 * APARATO: HTTP TRANSPORT TRIAGE (V7.3 - STATUS TAXONOMY)
 * CLASIFICACIÓN: INFRASTRUCTURE ADAPTER (ESTRATO L3)
 * RESPONSABILIDAD: CLASIFICACIÓN DE FALLOS DEL TÚNEL HTTP
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. SHARED TAXONOMY: Toda implementación de cliente respaldada por
 *    HTTP proyecta sus fallos de reqwest al catálogo ServiceFault a
 *    través de este único punto; el triaje de reintentos queda
 *    centralizado.
 * 2. STATUS TRUTH: 401/403 -> auth; 429 -> rate_limited; 4xx restantes
 *    -> invalid_input; 5xx y fallos físicos del enlace -> transport.
 * =================================================================
 */

use reqwest::StatusCode;

use crate::faults::ServiceFault;

/// Proyecta un fallo físico del enlace reqwest al catálogo de servicio.
pub fn classify_transport_error(network_fault: &reqwest::Error) -> ServiceFault {
    if network_fault.is_timeout() || network_fault.is_connect() {
        return ServiceFault::Transport(format!("Link collapse: {network_fault}"));
    }
    if let Some(status) = network_fault.status() {
        return classify_status(status, &network_fault.to_string());
    }
    ServiceFault::Transport(network_fault.to_string())
}

/// Proyecta un código de estado HTTP al catálogo de servicio.
pub fn classify_status(status: StatusCode, detail: &str) -> ServiceFault {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            ServiceFault::Auth(format!("HTTP_{status}: {detail}"))
        }
        StatusCode::TOO_MANY_REQUESTS => {
            ServiceFault::RateLimited(format!("HTTP_{status}: {detail}"))
        }
        status if status.is_client_error() => {
            ServiceFault::InvalidInput(format!("HTTP_{status}: {detail}"))
        }
        _ => ServiceFault::Transport(format!("HTTP_{status}: {detail}")),
    }
}
