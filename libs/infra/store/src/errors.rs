// [libs/infra/store/src/errors.rs]
/*!
 * =================================================================
 * APARATO: STORE FAULT CATALOG (V9.0 - IO TAXONOMY)
 * CLASIFICACIÓN: INFRASTRUCTURE (ESTRATO L3)
 * RESPONSABILIDAD: CATALOGACIÓN DE FALLOS DE PERSISTENCIA
 * =================================================================
 */

use maquette_domain_models::ErrorCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreFault {
    #[error("IO_VAULT_FAULT: Disk access denied or full: {0}")]
    Io(#[from] std::io::Error),

    #[error("ARTIFACT_CORRUPTION: Failed to decode persisted artifact '{artifact}': {detail}")]
    Corrupted { artifact: String, detail: String },

    #[error("SESSION_NOT_FOUND: No session directory for '{session_id}'")]
    SessionNotFound { session_id: String },

    #[error("ARTIFACT_MISSING: Expected artifact '{artifact}' is absent")]
    ArtifactMissing { artifact: String },
}

impl StoreFault {
    /// Proyección al catálogo de errores visible al usuario.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            StoreFault::Io(io_fault) => match io_fault.kind() {
                std::io::ErrorKind::NotFound => ErrorCode::FileNotFound,
                std::io::ErrorKind::PermissionDenied => ErrorCode::FilePermissionDenied,
                std::io::ErrorKind::StorageFull => ErrorCode::DiskSpaceInsufficient,
                _ => ErrorCode::InternalError,
            },
            StoreFault::Corrupted { .. } => ErrorCode::SessionCorrupted,
            StoreFault::SessionNotFound { .. } => ErrorCode::SessionNotFound,
            StoreFault::ArtifactMissing { .. } => ErrorCode::FileNotFound,
        }
    }
}
