// [libs/domain/models/src/scene_objects.rs]
/*!
 * =================================================================
 * APARATO: SCENE OBJECT MODELS (V14.1 - METRIC TRUTH)
 * CLASIFICACIÓN: DOMAIN MODELS (ESTRATO L2)
 * RESPONSABILIDAD: CONTRATO DE INVENTARIO DE OBJETOS DE ESCENA
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. OWNERSHIP SEAL: El inventario es propiedad exclusiva de la etapa
 *    de extracción; tras su cristalización es de solo lectura para el
 *    resto del pipeline.
 * 2. METRIC GUARDRAILS: Tamaño mínimo por eje de 0.01 m sin cota
 *    superior (escala del mundo real), rotaciones normalizadas a
 *    [0, 360) y unicidad estricta de identificadores.
 * 3. WIRE FIDELITY: Serializa exactamente al formato 'objects.json'
 *    (scene_style + objects[] con size_m e initial_pose).
 * =================================================================
 */

use maquette_core_geometry::{normalize_degrees, Vec3};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::errors::ValidationFault;

/// Tamaño mínimo admisible por eje (1 cm).
pub const MIN_OBJECT_AXIS_METERS: f64 = 0.01;

/// Cota superior de complejidad de escena.
pub const MAX_SCENE_OBJECT_COUNT: usize = 25;

/// Pose inicial propuesta por el extractor (previa al solucionador).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InitialPose {
    pub pos: Vec3,
    pub rot_euler: Vec3,
}

impl Default for InitialPose {
    fn default() -> Self {
        Self { pos: Vec3::ZERO, rot_euler: Vec3::ZERO }
    }
}

/// Objeto individual del inventario de escena.
///
/// El `object_id` es estable y se usa textualmente como nombre del objeto
/// en el host de ensamblaje aguas abajo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    pub object_id: String,
    pub name: String,
    pub category: String,
    /// Dimensiones métricas [x, y, z].
    pub size_m: Vec3,
    #[serde(default)]
    pub initial_pose: InitialPose,
    pub visual_desc: String,
    pub must_exist: bool,
    /// Pistas de estilo opcionales heredadas del extractor.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Ruta del activo 3D generado, inyectada tras la etapa de assets.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_path: Option<String>,
}

impl SceneObject {
    /// Normaliza las rotaciones al rango canónico [0, 360).
    pub fn sanitize(&mut self) {
        self.initial_pose.rot_euler = Vec3::new(
            normalize_degrees(self.initial_pose.rot_euler.x),
            normalize_degrees(self.initial_pose.rot_euler.y),
            normalize_degrees(self.initial_pose.rot_euler.z),
        );
    }

    /// Valida las invariantes métricas del objeto.
    ///
    /// # Errors:
    /// - `ValidationFault` si algún eje mide menos de 0.01 m, el id está
    ///   vacío o el objeto se hunde bajo el plano del suelo.
    pub fn validate(&self) -> Result<(), ValidationFault> {
        if self.object_id.trim().is_empty() {
            return Err(ValidationFault::EmptyObjectIdentifier);
        }

        for (axis_label, axis_value) in [
            ("x", self.size_m.x),
            ("y", self.size_m.y),
            ("z", self.size_m.z),
        ] {
            if axis_value < MIN_OBJECT_AXIS_METERS {
                return Err(ValidationFault::ObjectTooSmall {
                    object_id: self.object_id.clone(),
                    axis: axis_label.to_string(),
                    value: axis_value,
                });
            }
        }

        // Tolerancia de coma flotante para objetos anclados al suelo.
        if self.initial_pose.pos.z < -0.01 {
            return Err(ValidationFault::ObjectBelowGround {
                object_id: self.object_id.clone(),
                z: self.initial_pose.pos.z,
            });
        }

        Ok(())
    }

    /// Altura de anclaje al suelo: centro en media altura.
    pub fn ground_anchor_height(&self) -> f64 {
        self.size_m.z / 2.0
    }
}

/// Inventario completo de la escena, persistido como `objects.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneData {
    pub scene_style: String,
    pub objects: Vec<SceneObject>,
}

impl SceneData {
    /// Normaliza y valida el inventario completo.
    ///
    /// # Errors:
    /// - `ValidationFault::DuplicateObjectIdentifier` ante ids repetidos.
    /// - `ValidationFault::SceneComplexityExceeded` por encima de 25 objetos.
    /// - Cualquier fallo de validación individual de objeto.
    pub fn sanitize_and_validate(&mut self) -> Result<(), ValidationFault> {
        if self.objects.is_empty() {
            return Err(ValidationFault::EmptyScene);
        }
        if self.objects.len() > MAX_SCENE_OBJECT_COUNT {
            return Err(ValidationFault::SceneComplexityExceeded {
                count: self.objects.len(),
                maximum: MAX_SCENE_OBJECT_COUNT,
            });
        }

        let mut seen_identifiers = HashSet::new();
        for scene_object in &mut self.objects {
            scene_object.sanitize();
            scene_object.validate()?;
            if !seen_identifiers.insert(scene_object.object_id.clone()) {
                return Err(ValidationFault::DuplicateObjectIdentifier {
                    object_id: scene_object.object_id.clone(),
                });
            }
        }
        Ok(())
    }

    /// Búsqueda nominal por identificador.
    pub fn find(&self, object_id: &str) -> Option<&SceneObject> {
        self.objects.iter().find(|candidate| candidate.object_id == object_id)
    }
}
