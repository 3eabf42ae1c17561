// [libs/domain/models/src/session.rs]
/*!
 * =================================================================
 * APARATO: SESSION DOMAIN MODELS (V14.0 - LIFECYCLE SEAL)
 * CLASIFICACIÓN: DOMAIN MODELS (ESTRATO L2)
 * RESPONSABILIDAD: CONTRATOS DE IDENTIDAD Y CICLO DE VIDA DE SESIÓN
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. RESUMABILITY CONTRACT: Una sesión PARTIAL o FAILED es reanudable
 *    mientras retry_count < max_retries; la decisión vive en el modelo,
 *    no en el runner.
 * 2. AUDIT TRAIL: El historial de errores y los snapshots son registros
 *    inmutables con marca temporal UTC; nunca se reescriben.
 *
 * # Mathematical Proof (Monotonic Progress):
 * 'progress_percentage' y 'retry_count' solo crecen dentro de una
 * ejecución; la reanudación resetea el estado a INIT pero preserva el
 * rastro histórico completo, garantizando auditabilidad total.
 * =================================================================
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Progresión de estados del ciclo de vida de una sesión.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Init,
    Analyzing,
    GeneratingRef,
    ExtractingObjects,
    GeneratingCards,
    QcCards,
    GeneratingAssets,
    SolvingLayout,
    Rendering,
    Completed,
    Failed,
    /// Éxito parcial: algunos artefactos presentes, otros fallidos.
    Partial,
}

impl SessionStatus {
    /// Estados desde los cuales una reanudación es legal.
    pub fn is_resumable(&self) -> bool {
        matches!(self, SessionStatus::Failed | SessionStatus::Partial)
    }
}

/// Ajustes opcionales adjuntos a la petición del usuario.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestConstraints {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_objects: Option<u32>,
    /// Sugerencia de dimensiones de sala [largo, ancho, alto] en metros.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_size_hint: Option<[f64; 3]>,
}

/// Petición inmutable del usuario, persistida como `request.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRequest {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(default)]
    pub constraints: RequestConstraints,
}

/// Registro inmutable de un error encontrado durante la ejecución.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorHistoryRecord {
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
    pub code: String,
    pub message: String,
}

/// Nota de snapshot adjunta a los metadatos de la sesión.
///
/// No copia artefactos: el esquema de versionado en disco ya preserva la
/// historia de restricciones y soluciones de layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotRecord {
    pub name: String,
    pub note: String,
    pub created_at: DateTime<Utc>,
    pub status: SessionStatus,
}

/// Estado mutable de la sesión, persistido atómicamente como `status.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    pub session_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub status: SessionStatus,
    /// Etapa actualmente en curso (nombre nominal de etapa).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_stage: Option<String>,
    pub progress_percentage: f64,
    pub retry_count: u32,
    pub max_retries: u32,
    #[serde(default)]
    pub error_history: Vec<ErrorHistoryRecord>,
    #[serde(default)]
    pub snapshots: Vec<SnapshotRecord>,
}

impl SessionState {
    /// Forja el estado inicial de una sesión recién creada.
    pub fn ignite(session_id: String, max_retries: u32) -> Self {
        let ignition_timestamp = Utc::now();
        Self {
            session_id,
            created_at: ignition_timestamp,
            updated_at: ignition_timestamp,
            status: SessionStatus::Init,
            current_stage: None,
            progress_percentage: 0.0,
            retry_count: 0,
            max_retries,
            error_history: Vec::new(),
            snapshots: Vec::new(),
        }
    }

    /// Certifica si la sesión aún dispone de presupuesto de reintentos.
    pub fn can_retry(&self) -> bool {
        self.status.is_resumable() && self.retry_count < self.max_retries
    }

    /// Consume un reintento y re-arma la sesión en estado INIT.
    pub fn increment_retry(&mut self) {
        self.retry_count += 1;
        self.status = SessionStatus::Init;
        self.updated_at = Utc::now();
    }

    /// Anexa un error al rastro histórico inmutable.
    pub fn add_error(&mut self, stage: Option<String>, code: String, message: String) {
        self.error_history.push(ErrorHistoryRecord {
            timestamp: Utc::now(),
            stage,
            code,
            message,
        });
        self.updated_at = Utc::now();
    }
}
