// [libs/infra/clients/src/faults.rs]
/*!
 * =================================================================
 * APARATO: SERVICE FAULT CATALOG (V7.0 - TRIAGE TRUTH)
 * CLASIFICACIÓN: INFRASTRUCTURE ADAPTER (ESTRATO L3)
 * RESPONSABILIDAD: CATALOGACIÓN DE FALLOS DE SERVICIOS EXTERNOS
 * =================================================================
 */

use maquette_core_dispatch::FaultTriage;
use maquette_domain_models::ErrorCode;
use thiserror::Error;

/// Clases de fallo que un colaborador externo puede señalar.
///
/// transport y rate_limited son transitorios (el ejecutor reintenta con
/// backoff); auth, invalid_input y policy_refused colapsan de inmediato.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceFault {
    #[error("TRANSPORT_FAULT: {0}")]
    Transport(String),

    #[error("RATE_LIMITED: {0}")]
    RateLimited(String),

    #[error("AUTH_REVOKED: {0}")]
    Auth(String),

    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    #[error("POLICY_REFUSED: {0}")]
    PolicyRefused(String),
}

impl FaultTriage for ServiceFault {
    fn is_retryable(&self) -> bool {
        matches!(self, ServiceFault::Transport(_) | ServiceFault::RateLimited(_))
    }
}

impl ServiceFault {
    /// Proyección al catálogo de errores visible al usuario.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            ServiceFault::Transport(_) => ErrorCode::UpstreamTransport,
            ServiceFault::RateLimited(_) => ErrorCode::UpstreamRateLimited,
            ServiceFault::Auth(_) => ErrorCode::UpstreamAuth,
            ServiceFault::InvalidInput(_) => ErrorCode::InvalidInput,
            ServiceFault::PolicyRefused(_) => ErrorCode::UpstreamRefused,
        }
    }
}
