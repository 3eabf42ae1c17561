// [apps/conductor/src/stage_data.rs]
/*!
 * =================================================================
 * APARATO: STAGE DATA CARRIER (V12.2 - THREADED STATE)
 * CLASIFICACIÓN: APPLICATION LAYER (ESTRATO L4-APP)
 * RESPONSABILIDAD: ESTADO TIPADO ENHEBRADO ENTRE ETAPAS
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. ARTIFACT REFERENCES: El portador transporta referencias a los
 *    artefactos ya producidos (rutas y versiones), jamás duplica su
 *    contenido binario.
 * 2. METRIC TRAIL: Cada etapa anota su duración bajo '<etapa>_time';
 *    el total cierra bajo 'total_time'.
 * =================================================================
 */

use maquette_domain_models::{AssetManifest, ObjectCardRecord, SceneData};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Contenedor de estado que atraviesa todas las etapas del pipeline.
#[derive(Debug, Default)]
pub struct StageData {
    // Identidad y petición
    pub scene_text: String,
    pub style: String,

    // Etapa scene_ref
    pub scene_reference_path: Option<PathBuf>,

    // Etapa extract
    pub scene: Option<SceneData>,

    // Etapa cards
    pub cards: Vec<ObjectCardRecord>,

    // Etapas constraints / layout (referencias por versión)
    pub constraints_version: Option<u32>,
    pub layout_version: Option<u32>,

    // Etapa assets
    pub asset_manifest: Option<AssetManifest>,

    // Rastro transversal
    pub errors: Vec<String>,
    pub metrics: BTreeMap<String, f64>,
    pub stages_completed: Vec<String>,
}

impl StageData {
    pub fn ignite(scene_text: String, style: String) -> Self {
        Self { scene_text, style, ..Default::default() }
    }

    /// Anexa un error etiquetado con el nombre de la etapa.
    pub fn add_error(&mut self, stage_name: &str, message: impl std::fmt::Display) {
        self.errors.push(format!("[{stage_name}] {message}"));
    }

    pub fn record_timing(&mut self, stage_name: &str, elapsed_seconds: f64) {
        self.metrics.insert(format!("{stage_name}_time"), elapsed_seconds);
    }
}
