// [libs/domain/models/src/errors.rs]
/*!
 * =================================================================
 * APARATO: ERROR CATALOG & RESPONSE CONTRACT (V14.5 - TRIAGE MASTER)
 * CLASIFICACIÓN: DOMAIN MODELS (ESTRATO L2)
 * RESPONSABILIDAD: TAXONOMÍA DE FALLOS Y FORMA VISIBLE AL USUARIO
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. RETRYABILITY TRUTH: Cada código porta su veredicto de reintento;
 *    un error 'retryable: true' puede re-invocarse con el mismo
 *    session_id porque el salto de etapas por presencia de artefactos
 *    hace la repetición segura.
 * 2. LAST RESORT DISCIPLINE: 'internal_error' es siempre el último
 *    recurso de la clasificación, nunca el primero.
 * 3. WIRE SHAPE: ErrorResponse serializa exactamente a la forma
 *    persistida en 'errors/last_error.json' y retornada a la CLI.
 * =================================================================
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::constraints::RelationType;

/// Taxonomía soberana de clases de fallo del pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidInput,
    ConfigError,
    UpstreamTransport,
    UpstreamRateLimited,
    UpstreamRefused,
    UpstreamAuth,
    AssetGenerationFailed,
    ImageGenerationFailed,
    LlmError,
    SolverNoSolution,
    SolverTimeout,
    SolverConstraintConflict,
    FileNotFound,
    FilePermissionDenied,
    DiskSpaceInsufficient,
    SessionNotFound,
    SessionCorrupted,
    InternalError,
}

impl ErrorCode {
    /// Veredicto de reintento: ¿puede re-invocarse el pipeline con el
    /// mismo session_id tras este fallo?
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ErrorCode::UpstreamTransport
                | ErrorCode::UpstreamRateLimited
                | ErrorCode::AssetGenerationFailed
                | ErrorCode::ImageGenerationFailed
                | ErrorCode::LlmError
                | ErrorCode::SolverNoSolution
                | ErrorCode::SolverTimeout
                | ErrorCode::InternalError
        )
    }

    /// Representación textual canónica del código (lowercase_snake_case).
    pub fn code_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidInput => "invalid_input",
            ErrorCode::ConfigError => "config_error",
            ErrorCode::UpstreamTransport => "upstream_transport",
            ErrorCode::UpstreamRateLimited => "upstream_rate_limited",
            ErrorCode::UpstreamRefused => "upstream_refused",
            ErrorCode::UpstreamAuth => "upstream_auth",
            ErrorCode::AssetGenerationFailed => "asset_generation_failed",
            ErrorCode::ImageGenerationFailed => "image_generation_failed",
            ErrorCode::LlmError => "llm_error",
            ErrorCode::SolverNoSolution => "solver_no_solution",
            ErrorCode::SolverTimeout => "solver_timeout",
            ErrorCode::SolverConstraintConflict => "solver_constraint_conflict",
            ErrorCode::FileNotFound => "file_not_found",
            ErrorCode::FilePermissionDenied => "file_permission_denied",
            ErrorCode::DiskSpaceInsufficient => "disk_space_insufficient",
            ErrorCode::SessionNotFound => "session_not_found",
            ErrorCode::SessionCorrupted => "session_corrupted",
            ErrorCode::InternalError => "internal_error",
        }
    }

    /// Componente nominal responsable del código.
    pub fn component(&self) -> &'static str {
        match self {
            ErrorCode::InvalidInput => "input_validation",
            ErrorCode::ConfigError => "configuration",
            ErrorCode::UpstreamTransport
            | ErrorCode::UpstreamRateLimited
            | ErrorCode::UpstreamRefused
            | ErrorCode::UpstreamAuth => "external_services",
            ErrorCode::AssetGenerationFailed => "asset_generation",
            ErrorCode::ImageGenerationFailed => "image_generation",
            ErrorCode::LlmError => "scene_analysis",
            ErrorCode::SolverNoSolution
            | ErrorCode::SolverTimeout
            | ErrorCode::SolverConstraintConflict => "layout_solver",
            ErrorCode::FileNotFound
            | ErrorCode::FilePermissionDenied
            | ErrorCode::DiskSpaceInsufficient => "artifact_store",
            ErrorCode::SessionNotFound | ErrorCode::SessionCorrupted => "session_manager",
            ErrorCode::InternalError => "system",
        }
    }

    /// Acciones sugeridas por defecto para el operador.
    pub fn default_suggested_actions(&self) -> Vec<String> {
        let actions: &[&str] = match self {
            ErrorCode::InvalidInput => &["Revisar el formato de los parámetros de entrada"],
            ErrorCode::ConfigError => &[
                "Verificar credenciales y variables de entorno",
                "Confirmar que el workspace existe y es escribible",
            ],
            ErrorCode::UpstreamTransport | ErrorCode::UpstreamRateLimited => &[
                "Reintentar con el mismo session_id",
                "Verificar conectividad con el servicio externo",
            ],
            ErrorCode::UpstreamAuth => &["Renovar la credencial del servicio externo"],
            ErrorCode::UpstreamRefused => &["Ajustar el contenido de la petición rechazada"],
            ErrorCode::SolverNoSolution | ErrorCode::SolverConstraintConflict => &[
                "Simplificar las restricciones de la escena",
                "Reducir la cantidad de objetos",
                "Relajar restricciones en conflicto (strategy=relax)",
            ],
            ErrorCode::SolverTimeout => &[
                "Incrementar timeout_seconds",
                "Reducir la complejidad de la escena",
            ],
            ErrorCode::SessionNotFound => &["Verificar el session_id o crear una sesión nueva"],
            _ => &["Reintentar la operación"],
        };
        actions.iter().map(|action| action.to_string()).collect()
    }
}

/// Rutas de diagnóstico adjuntas a un error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorLogRefs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_log: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<String>,
}

/// Detalle estructurado del fallo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: ErrorCode,
    pub component: String,
    pub message: String,
    pub retryable: bool,
    pub suggested_actions: Vec<String>,
    #[serde(default)]
    pub logs: ErrorLogRefs,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<BTreeMap<String, serde_json::Value>>,
}

/// Forma visible al usuario, persistida en `errors/last_error.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_stage: Option<String>,
    pub error: ErrorDetail,
}

impl ErrorResponse {
    /// Forja la respuesta canónica a partir del catálogo.
    pub fn forge(
        code: ErrorCode,
        session_id: Option<String>,
        failed_stage: Option<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            ok: false,
            session_id,
            failed_stage,
            error: ErrorDetail {
                code,
                component: code.component().to_string(),
                message: message.into(),
                retryable: code.is_retryable(),
                suggested_actions: code.default_suggested_actions(),
                logs: ErrorLogRefs::default(),
                timestamp: Utc::now(),
                details: None,
            },
        }
    }
}

/// Respuesta de éxito retornada a la interfaz de mando.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub ok: bool,
    pub session_id: String,
    pub workspace_path: String,
    pub artifacts: BTreeMap<String, String>,
    pub stages_completed: Vec<String>,
    pub message: String,
}

/// Fallos de validación de modelos de dominio.
///
/// Todos mapean a `ErrorCode::InvalidInput` en la frontera de la CLI.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationFault {
    #[error("EMPTY_IDENTIFIER: Scene object carries a blank object_id")]
    EmptyObjectIdentifier,

    #[error("DUPLICATE_IDENTIFIER: object_id '{object_id}' appears more than once in the inventory")]
    DuplicateObjectIdentifier { object_id: String },

    #[error("OBJECT_TOO_SMALL: '{object_id}' axis {axis} measures {value} m (minimum 0.01 m)")]
    ObjectTooSmall { object_id: String, axis: String, value: f64 },

    #[error("OBJECT_BELOW_GROUND: '{object_id}' sinks to z = {z} m")]
    ObjectBelowGround { object_id: String, z: f64 },

    #[error("EMPTY_SCENE: Inventory must contain at least one object")]
    EmptyScene,

    #[error("SCENE_COMPLEXITY_EXCEEDED: {count} objects exceed the maximum of {maximum}")]
    SceneComplexityExceeded { count: usize, maximum: usize },

    #[error("SELF_REFERENCE: Constraint references '{object_id}' as both source and target")]
    SelfReferentialConstraint { object_id: String },

    #[error("DUPLICATE_CONSTRAINT: Triple (source, target, relation) already registered for '{source_object}' -> '{target}'")]
    DuplicateConstraint { source_object: String, target: String },

    #[error("TYPE_MISMATCH: Constraint '{constraint_id}' declares a type incoherent with its relation")]
    ConstraintTypeMismatch { constraint_id: String },

    #[error("THRESHOLD_OUT_OF_RANGE: Constraint '{constraint_id}' relation {relation:?} rejects threshold {threshold} m")]
    ThresholdOutOfRange { constraint_id: String, relation: RelationType, threshold: f64 },

    #[error("ANGLE_TOLERANCE_OUT_OF_RANGE: Constraint '{constraint_id}' tolerance {tolerance}° outside [0, 180]")]
    AngleToleranceOutOfRange { constraint_id: String, tolerance: f64 },

    #[error("WEIGHT_OUT_OF_RANGE: Constraint '{constraint_id}' weight {weight} outside [0, 10]")]
    WeightOutOfRange { constraint_id: String, weight: f64 },

    #[error("UNKNOWN_OBJECT: Constraint references '{object_id}' which is absent from the inventory")]
    UnknownObjectReference { object_id: String },

    #[error("DIRECTIONAL_CYCLE: Directional constraint subgraph contains a cycle through '{object_id}'")]
    DirectionalCycle { object_id: String },
}
