// [libs/domain/models/src/constraints.rs]
/*!
 * =================================================================
 * APARATO: SPATIAL CONSTRAINT MODELS (V14.2 - RELATION ALGEBRA)
 * CLASIFICACIÓN: DOMAIN MODELS (ESTRATO L2)
 * RESPONSABILIDAD: CONTRATO DE RELACIONES ESPACIALES Y SUS LEYES
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. RELATION ALGEBRA: Las leyes de inversión y simetría son totales
 *    sobre el enum de relaciones; get_inverse es una involución
 *    (inverse ∘ inverse = identity) certificada por los Proving Grounds.
 * 2. THRESHOLD GUARDRAILS: near ≤ 2.0 m, far ≥ 8.0 m, adjacent ≤ 0.5 m;
 *    cualquier umbral fuera de rango colapsa en fallo de validación en
 *    el momento de construcción.
 * 3. DIRECTIONAL SUBSET: Solo las relaciones direccionales participan
 *    del grafo de dependencias del solucionador; las simétricas quedan
 *    explícitamente excluidas de la detección de ciclos.
 * =================================================================
 */

use serde::{Deserialize, Serialize};

use crate::errors::ValidationFault;

/// Distancia de amortiguación por defecto para relaciones relativas (0.1 m).
pub const DEFAULT_BUFFER_METERS: f64 = 0.1;
/// Umbral horizontal por defecto de 'near' (≤ 2 m).
pub const NEAR_THRESHOLD_METERS: f64 = 2.0;
/// Umbral horizontal por defecto de 'far' (≥ 8 m).
pub const FAR_THRESHOLD_METERS: f64 = 8.0;
/// Umbral horizontal por defecto de 'adjacent' (≤ 0.5 m).
pub const ADJACENT_THRESHOLD_METERS: f64 = 0.5;
/// Separación vertical por defecto de 'above' (≥ 2 m).
pub const ABOVE_THRESHOLD_METERS: f64 = 2.0;
/// Tolerancia de contacto de la relación 'on' (±2 mm).
pub const CONTACT_TOLERANCE_METERS: f64 = 0.002;
/// Tolerancia angular por defecto de 'face_to' (10°).
pub const FACE_TO_TOLERANCE_DEGREES: f64 = 10.0;

/// Categoría tipológica de la restricción.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConstraintType {
    Relative,
    Distance,
    Vertical,
    Rotation,
}

/// Relación espacial concreta entre un objeto fuente y uno objetivo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationType {
    // Relativas
    LeftOf,
    RightOf,
    InFrontOf,
    Behind,
    SideOf,
    // Distancia
    Near,
    Far,
    Adjacent,
    // Verticales
    On,
    Above,
    Below,
    // Rotación
    FaceTo,
    Parallel,
    Perpendicular,
}

impl RelationType {
    /// Categoría tipológica a la que pertenece la relación.
    pub fn constraint_type(&self) -> ConstraintType {
        match self {
            RelationType::LeftOf
            | RelationType::RightOf
            | RelationType::InFrontOf
            | RelationType::Behind
            | RelationType::SideOf => ConstraintType::Relative,
            RelationType::Near | RelationType::Far | RelationType::Adjacent => {
                ConstraintType::Distance
            }
            RelationType::On | RelationType::Above | RelationType::Below => {
                ConstraintType::Vertical
            }
            RelationType::FaceTo | RelationType::Parallel | RelationType::Perpendicular => {
                ConstraintType::Rotation
            }
        }
    }

    /// Ley de inversión: relación vista desde el objetivo.
    ///
    /// Involución total: `get_inverse(get_inverse(r)) == r` para toda r.
    pub fn get_inverse(&self) -> RelationType {
        match self {
            RelationType::LeftOf => RelationType::RightOf,
            RelationType::RightOf => RelationType::LeftOf,
            RelationType::InFrontOf => RelationType::Behind,
            RelationType::Behind => RelationType::InFrontOf,
            RelationType::Above => RelationType::Below,
            RelationType::Below => RelationType::Above,
            // Auto-inversas
            RelationType::On => RelationType::On,
            RelationType::FaceTo => RelationType::FaceTo,
            // Simétricas
            RelationType::Near => RelationType::Near,
            RelationType::Far => RelationType::Far,
            RelationType::Adjacent => RelationType::Adjacent,
            RelationType::SideOf => RelationType::SideOf,
            RelationType::Parallel => RelationType::Parallel,
            RelationType::Perpendicular => RelationType::Perpendicular,
        }
    }

    /// Certifica si la relación es simétrica (válida en ambos sentidos).
    pub fn is_symmetric(&self) -> bool {
        matches!(
            self,
            RelationType::Near
                | RelationType::Far
                | RelationType::Adjacent
                | RelationType::SideOf
                | RelationType::Parallel
                | RelationType::Perpendicular
        )
    }

    /// Subconjunto direccional: participa del grafo de dependencias y de la
    /// siembra topológica del solucionador.
    pub fn is_directional(&self) -> bool {
        !self.is_symmetric() && !matches!(self, RelationType::FaceTo)
    }

    /// Catálogo completo de relaciones, en orden nominal.
    pub fn all() -> [RelationType; 14] {
        [
            RelationType::LeftOf,
            RelationType::RightOf,
            RelationType::InFrontOf,
            RelationType::Behind,
            RelationType::SideOf,
            RelationType::Near,
            RelationType::Far,
            RelationType::Adjacent,
            RelationType::On,
            RelationType::Above,
            RelationType::Below,
            RelationType::FaceTo,
            RelationType::Parallel,
            RelationType::Perpendicular,
        ]
    }
}

/// Prioridad de la restricción dentro del solucionador.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConstraintPriority {
    Primary,
    Secondary,
}

/// Restricción espacial dirigida entre dos objetos distintos.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpatialConstraint {
    pub constraint_id: String,
    #[serde(rename = "type")]
    pub constraint_type: ConstraintType,
    pub relation: RelationType,
    pub source: String,
    pub target: String,
    pub priority: ConstraintPriority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold_m: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deg_tolerance: Option<f64>,
    /// Peso de optimización para restricciones blandas, en [0, 10].
    pub weight: f64,
    pub is_soft: bool,
}

impl SpatialConstraint {
    /// Forja una restricción con los valores por defecto del catálogo.
    pub fn forge(
        constraint_id: impl Into<String>,
        relation: RelationType,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            constraint_id: constraint_id.into(),
            constraint_type: relation.constraint_type(),
            relation,
            source: source.into(),
            target: target.into(),
            priority: ConstraintPriority::Primary,
            threshold_m: None,
            deg_tolerance: None,
            weight: 1.0,
            is_soft: false,
        }
    }

    /// Umbral métrico efectivo según la relación.
    pub fn effective_threshold(&self) -> f64 {
        self.threshold_m.unwrap_or(match self.relation {
            RelationType::Near => NEAR_THRESHOLD_METERS,
            RelationType::Far => FAR_THRESHOLD_METERS,
            RelationType::Adjacent => ADJACENT_THRESHOLD_METERS,
            RelationType::Above | RelationType::Below => ABOVE_THRESHOLD_METERS,
            _ => DEFAULT_BUFFER_METERS,
        })
    }

    /// Tolerancia angular efectiva para relaciones de rotación.
    pub fn effective_deg_tolerance(&self) -> f64 {
        self.deg_tolerance.unwrap_or(FACE_TO_TOLERANCE_DEGREES)
    }

    /// Valida las invariantes estructurales de la restricción.
    ///
    /// # Errors:
    /// - Auto-referencia (source == target).
    /// - Incoherencia entre 'type' y 'relation'.
    /// - Umbral fuera de los límites de categoría.
    /// - Peso fuera de [0, 10] o tolerancia angular fuera de [0, 180].
    pub fn validate(&self) -> Result<(), ValidationFault> {
        if self.source == self.target {
            return Err(ValidationFault::SelfReferentialConstraint {
                object_id: self.source.clone(),
            });
        }

        if self.constraint_type != self.relation.constraint_type() {
            return Err(ValidationFault::ConstraintTypeMismatch {
                constraint_id: self.constraint_id.clone(),
            });
        }

        if let Some(threshold) = self.threshold_m {
            if threshold <= 0.0 {
                return Err(ValidationFault::ThresholdOutOfRange {
                    constraint_id: self.constraint_id.clone(),
                    relation: self.relation,
                    threshold,
                });
            }
            let out_of_category = match self.relation {
                RelationType::Near => threshold > NEAR_THRESHOLD_METERS,
                RelationType::Far => threshold < FAR_THRESHOLD_METERS,
                RelationType::Adjacent => threshold > ADJACENT_THRESHOLD_METERS,
                _ => false,
            };
            if out_of_category {
                return Err(ValidationFault::ThresholdOutOfRange {
                    constraint_id: self.constraint_id.clone(),
                    relation: self.relation,
                    threshold,
                });
            }
        }

        if let Some(tolerance) = self.deg_tolerance {
            if !(0.0..=180.0).contains(&tolerance) {
                return Err(ValidationFault::AngleToleranceOutOfRange {
                    constraint_id: self.constraint_id.clone(),
                    tolerance,
                });
            }
        }

        if !(0.0..=10.0).contains(&self.weight) {
            return Err(ValidationFault::WeightOutOfRange {
                constraint_id: self.constraint_id.clone(),
                weight: self.weight,
            });
        }

        Ok(())
    }

    /// Tripleta de identidad para la deduplicación.
    pub fn identity_triple(&self) -> (String, String, RelationType) {
        (self.source.clone(), self.target.clone(), self.relation)
    }
}

/// Parámetros globales del conjunto de restricciones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintGlobals {
    pub ground_only_default: bool,
    pub collision_clearance_m: f64,
    pub max_room_size: f64,
    pub min_object_spacing: f64,
}

impl Default for ConstraintGlobals {
    fn default() -> Self {
        Self {
            ground_only_default: true,
            collision_clearance_m: 0.02,
            max_room_size: 20.0,
            min_object_spacing: 0.1,
        }
    }
}

/// Documento de cable de un conjunto versionado (`constraints_v{n}.json`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintDocument {
    pub version: u32,
    pub globals: ConstraintGlobals,
    pub relations: Vec<SpatialConstraint>,
}
