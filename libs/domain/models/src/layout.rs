// [libs/domain/models/src/layout.rs]
/*!
 * =================================================================
 * APARATO: LAYOUT SOLUTION MODELS (V14.3 - VERSIONED TRUTH)
 * CLASIFICACIÓN: DOMAIN MODELS (ESTRATO L2)
 * RESPONSABILIDAD: CONTRATOS DE SOLUCIÓN DE LAYOUT Y RASTRO DFS
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. SUCCESS-ONLY VERSIONING: El número de versión de
 *    'layout_solution_v{n}' cuenta únicamente soluciones exitosas; los
 *    rastros de fallo versionan por separado como 'dfs_trace_v{n}'.
 * 2. DETERMINISTIC WIRE: 'object_placements' serializa en orden
 *    lexicográfico de object_id (BTreeMap), garantizando diffs estables
 *    entre ejecuciones.
 * 3. TRACE AS INPUT: El DfsTrace es entrada de primera clase para la
 *    regeneración de restricciones, no un mero registro de depuración.
 * =================================================================
 */

use maquette_core_geometry::Vec3;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::constraints::RelationType;

/// Clase de conflicto que selló el fallo del solucionador.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictType {
    /// Los intentos de colocación colisionan consistentemente (espacio insuficiente).
    Collision,
    /// Ningún candidato factible reside dentro de la caja de la sala.
    Boundary,
    /// Región factible vacía bajo las restricciones activas (conflicto lógico).
    Constraint,
    /// Todo candidato libre de colisión falla la verificación de estabilidad.
    Unstable,
    /// Presupuesto de reloj agotado sin prueba de infactibilidad.
    Timeout,
}

/// Pose final de un objeto en el documento de cable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlacementPose {
    pub pos: Vec3,
    pub rot_euler: Vec3,
    pub scale: Vec3,
}

/// Registro enriquecido de colocación por objeto (telemetría del solver).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementRecord {
    pub object_id: String,
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
    pub successful: bool,
    pub constraint_satisfaction_score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stability_score: Option<f64>,
    pub collision_count: u32,
    pub attempts: u32,
}

/// Par de objetos en colisión dentro de una solución parcial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollisionRecord {
    pub object_a: String,
    pub object_b: String,
    pub penetration_depth: f64,
}

/// Referencia compacta a una restricción activa en el momento del fallo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveConstraintRef {
    pub source: String,
    pub target: String,
    pub relation: RelationType,
}

/// Rastro estructurado de un intento DFS fallido (`dfs_trace_v{n}.json`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DfsTrace {
    pub failed_object_id: String,
    /// Objetos colocados con éxito, en orden de colocación.
    pub placed_objects: Vec<String>,
    pub conflict_type: ConflictType,
    pub active_constraints: Vec<ActiveConstraintRef>,
    pub candidates_tried: u64,
    pub search_space_size: u64,
    pub best_candidate_score: f64,
    pub traceback_depth: u32,
    pub time_at_failure: f64,
    pub natural_language_summary: String,
    #[serde(default)]
    pub fix_suggestions: Vec<String>,
}

/// Métricas agregadas de la solución.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutMetrics {
    pub solve_time: f64,
    /// Fracción ponderada de restricciones satisfechas, en [0, 1].
    pub constraint_satisfaction: f64,
    /// Ocupación de huella sobre el área de la sala, en [0, 1].
    pub spatial_efficiency: f64,
}

/// Documento de cable de una solución (`layout_solution_v{n}.json`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutSolutionDocument {
    pub success: bool,
    /// Versión textual "v{n}"; n cuenta solo soluciones exitosas.
    pub version: String,
    pub object_placements: BTreeMap<String, PlacementPose>,
    pub metrics: LayoutMetrics,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// Estrategia de escala aplicada a cada pose final.
///
/// La convención heredada del normalizador de activos 3D escala
/// uniformemente por la altura del objeto; se expone como gancho
/// configurable para compatibilidad de cable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleStrategy {
    /// scale = [size_z, size_z, size_z] (convención por defecto).
    UniformHeight,
    /// scale = [1, 1, 1].
    Unit,
}

impl ScaleStrategy {
    pub fn scale_for(&self, size_m: Vec3) -> Vec3 {
        match self {
            ScaleStrategy::UniformHeight => Vec3::new(size_m.z, size_m.z, size_m.z),
            ScaleStrategy::Unit => Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

/// Configuración del solucionador de layouts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverSettings {
    pub timeout_seconds: f64,
    pub max_candidates_per_object: usize,
    /// Resolución de rejilla para el muestreo de candidatos (metros).
    pub sampling_resolution: f64,
    pub collision_clearance_m: f64,
    pub gravity_enabled: bool,
    /// Margen de soporte admitido en la verificación de estabilidad.
    pub stability_margin: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub random_seed: Option<u64>,
    pub scale_strategy: ScaleStrategy,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            timeout_seconds: 30.0,
            max_candidates_per_object: 100,
            sampling_resolution: 0.1,
            collision_clearance_m: 0.02,
            gravity_enabled: true,
            stability_margin: 0.1,
            random_seed: None,
            scale_strategy: ScaleStrategy::UniformHeight,
        }
    }
}
