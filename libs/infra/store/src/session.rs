// [libs/infra/store/src/session.rs]
/*!
 * =================================================================
 * APARATO: SESSION STORE (V9.3 - ARTIFACT SOVEREIGN)
 * CLASIFICACIÓN: INFRASTRUCTURE (ESTRATO L3)
 * RESPONSABILIDAD: PERSISTENCIA POR SESIÓN Y SONDEO DE COMPLETITUD
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. SINGLE WRITER: El directorio de sesión es escrito por a lo sumo
 *    una etapa a la vez; cada artefacto es creado por exactamente una
 *    etapa del pipeline.
 * 2. VERSION SCAN TRUTH: El número de versión siguiente se deriva del
 *    escaneo de archivos 'prefix_v{n}.json' presentes, no de un
 *    contador en memoria; la reanudación es naturalmente coherente.
 * 3. DESCRIPTOR PROBES: Un descriptor con '/' final sondea un
 *    directorio no vacío; sin él, un archivo no vacío.
 * =================================================================
 */

use chrono::Utc;
use maquette_domain_models::{
    AssemblyObjectMap, AssetManifest, ConstraintDocument, DfsTrace, ErrorResponse,
    LayoutSolutionDocument, SceneData, SessionRequest, SessionState, SessionStatus,
    SnapshotRecord,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::atomic::{directory_ready, file_ready, read_json, write_bytes_atomic, write_json_atomic};
use crate::errors::StoreFault;

/// Prefijo de los documentos de restricciones versionados.
pub const CONSTRAINTS_PREFIX: &str = "constraints";
/// Prefijo de las soluciones de layout versionadas (solo éxitos).
pub const LAYOUT_PREFIX: &str = "layout_solution";
/// Prefijo de los rastros de fallo DFS versionados.
pub const TRACE_PREFIX: &str = "dfs_trace";

/// Manija de persistencia de una sesión concreta.
#[derive(Debug, Clone)]
pub struct SessionStore {
    session_directory: PathBuf,
    session_id: String,
}

impl SessionStore {
    pub fn new(session_directory: PathBuf, session_id: String) -> Self {
        Self { session_directory, session_id }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn session_directory(&self) -> &Path {
        &self.session_directory
    }

    // --- RUTAS NOMINALES DE ARTEFACTOS ---

    pub fn request_path(&self) -> PathBuf {
        self.session_directory.join("request.json")
    }

    pub fn status_path(&self) -> PathBuf {
        self.session_directory.join("status.json")
    }

    pub fn scene_reference_path(&self) -> PathBuf {
        self.session_directory.join("scene_ref.png")
    }

    pub fn objects_path(&self) -> PathBuf {
        self.session_directory.join("objects.json")
    }

    pub fn cards_directory(&self) -> PathBuf {
        self.session_directory.join("object_cards")
    }

    pub fn card_path(&self, object_id: &str) -> PathBuf {
        self.cards_directory().join(format!("{object_id}.png"))
    }

    pub fn assets_directory(&self) -> PathBuf {
        self.session_directory.join("assets")
    }

    pub fn asset_manifest_path(&self) -> PathBuf {
        self.session_directory.join("asset_manifest.json")
    }

    pub fn assembly_map_path(&self) -> PathBuf {
        self.session_directory.join("blender_object_map.json")
    }

    pub fn last_error_path(&self) -> PathBuf {
        self.session_directory.join("errors").join("last_error.json")
    }

    fn approvals_directory(&self) -> PathBuf {
        self.session_directory.join("approvals")
    }

    pub fn versioned_path(&self, prefix: &str, version: u32) -> PathBuf {
        self.session_directory.join(format!("{prefix}_v{version}.json"))
    }

    // --- PETICIÓN Y ESTADO ---

    pub fn load_request(&self) -> Result<SessionRequest, StoreFault> {
        read_json(&self.request_path())
    }

    pub fn load_state(&self) -> Result<SessionState, StoreFault> {
        read_json(&self.status_path())
    }

    pub fn save_state(&self, state: &SessionState) -> Result<(), StoreFault> {
        write_json_atomic(&self.status_path(), state)
    }

    /// Transición de estado con progreso y etapa actual.
    pub fn update_status(
        &self,
        status: SessionStatus,
        current_stage: Option<&str>,
        progress_percentage: f64,
    ) -> Result<(), StoreFault> {
        let mut state = self.load_state()?;
        state.status = status;
        state.current_stage = current_stage.map(str::to_string);
        state.progress_percentage = progress_percentage.clamp(0.0, 100.0);
        state.updated_at = Utc::now();
        self.save_state(&state)
    }

    /// Anexa un error al rastro histórico de la sesión.
    pub fn add_error(
        &self,
        stage: Option<&str>,
        code: &str,
        message: &str,
    ) -> Result<(), StoreFault> {
        let mut state = self.load_state()?;
        state.add_error(stage.map(str::to_string), code.to_string(), message.to_string());
        self.save_state(&state)
    }

    /// Consume un reintento y re-arma la sesión.
    pub fn increment_retry(&self) -> Result<SessionState, StoreFault> {
        let mut state = self.load_state()?;
        state.increment_retry();
        self.save_state(&state)?;
        Ok(state)
    }

    /// Anexa una nota de snapshot a los metadatos de estado.
    ///
    /// No copia artefactos: el versionado en disco ya preserva historia.
    pub fn snapshot(&self, note: &str) -> Result<String, StoreFault> {
        let mut state = self.load_state()?;
        let snapshot_name =
            format!("snapshot_{}", Utc::now().format("%Y%m%d_%H%M%S"));
        state.snapshots.push(SnapshotRecord {
            name: snapshot_name.clone(),
            note: note.to_string(),
            created_at: Utc::now(),
            status: state.status,
        });
        state.updated_at = Utc::now();
        self.save_state(&state)?;
        info!("📸 [SESSION]: Snapshot '{}' annotated.", snapshot_name);
        Ok(snapshot_name)
    }

    // --- ARTEFACTOS DE ETAPA ---

    pub fn save_scene_reference(&self, image_bytes: &[u8]) -> Result<PathBuf, StoreFault> {
        let destination = self.scene_reference_path();
        write_bytes_atomic(&destination, image_bytes)?;
        Ok(destination)
    }

    pub fn save_objects(&self, inventory: &SceneData) -> Result<(), StoreFault> {
        write_json_atomic(&self.objects_path(), inventory)
    }

    pub fn load_objects(&self) -> Result<SceneData, StoreFault> {
        read_json(&self.objects_path())
    }

    pub fn save_card(&self, object_id: &str, card_bytes: &[u8]) -> Result<PathBuf, StoreFault> {
        let destination = self.card_path(object_id);
        write_bytes_atomic(&destination, card_bytes)?;
        Ok(destination)
    }

    /// Persiste una malla bajo `assets/` y retorna su ruta relativa.
    pub fn save_asset(
        &self,
        object_id: &str,
        extension: &str,
        mesh_bytes: &[u8],
    ) -> Result<String, StoreFault> {
        let relative = format!("assets/{object_id}.{extension}");
        write_bytes_atomic(&self.session_directory.join(&relative), mesh_bytes)?;
        Ok(relative)
    }

    pub fn save_asset_manifest(&self, manifest: &AssetManifest) -> Result<(), StoreFault> {
        write_json_atomic(&self.asset_manifest_path(), manifest)
    }

    pub fn load_asset_manifest(&self) -> Result<AssetManifest, StoreFault> {
        read_json(&self.asset_manifest_path())
    }

    pub fn save_assembly_map(&self, map: &AssemblyObjectMap) -> Result<(), StoreFault> {
        write_json_atomic(&self.assembly_map_path(), map)
    }

    pub fn save_last_error(&self, response: &ErrorResponse) -> Result<(), StoreFault> {
        write_json_atomic(&self.last_error_path(), response)
    }

    // --- VERSIONADO APPEND-ONLY ---

    /// Última versión presente para un prefijo, escaneando el directorio.
    pub fn latest_version(&self, prefix: &str) -> Result<Option<u32>, StoreFault> {
        let version_prefix = format!("{prefix}_v");
        let mut newest: Option<u32> = None;

        for entry in fs::read_dir(&self.session_directory)? {
            let entry_name = entry?.file_name().to_string_lossy().to_string();
            let Some(stem) = entry_name.strip_suffix(".json") else { continue };
            let Some(raw_version) = stem.strip_prefix(&version_prefix) else { continue };
            if let Ok(version_number) = raw_version.parse::<u32>() {
                newest = Some(newest.map_or(version_number, |current| current.max(version_number)));
            }
        }
        Ok(newest)
    }

    /// Versión siguiente a asignar para un prefijo.
    pub fn next_version(&self, prefix: &str) -> Result<u32, StoreFault> {
        Ok(self.latest_version(prefix)?.map_or(1, |latest| latest + 1))
    }

    /// Persiste el documento de restricciones con la versión siguiente.
    pub fn save_constraints(
        &self,
        mut document: ConstraintDocument,
    ) -> Result<u32, StoreFault> {
        let version = self.next_version(CONSTRAINTS_PREFIX)?;
        document.version = version;
        write_json_atomic(&self.versioned_path(CONSTRAINTS_PREFIX, version), &document)?;
        debug!("🧩 [SESSION]: constraints_v{} crystallized.", version);
        Ok(version)
    }

    /// Carga el documento de restricciones pedido, o el más reciente.
    pub fn load_constraints(
        &self,
        version: Option<u32>,
    ) -> Result<ConstraintDocument, StoreFault> {
        let resolved_version = match version {
            Some(explicit) => explicit,
            None => self.latest_version(CONSTRAINTS_PREFIX)?.ok_or_else(|| {
                StoreFault::ArtifactMissing { artifact: "constraints_v1.json".to_string() }
            })?,
        };
        read_json(&self.versioned_path(CONSTRAINTS_PREFIX, resolved_version))
    }

    /// Persiste una solución EXITOSA con la versión siguiente de éxito.
    pub fn save_layout_solution(
        &self,
        document: &LayoutSolutionDocument,
    ) -> Result<u32, StoreFault> {
        let version = self.next_version(LAYOUT_PREFIX)?;
        write_json_atomic(&self.versioned_path(LAYOUT_PREFIX, version), document)?;
        debug!("📐 [SESSION]: layout_solution_v{} crystallized.", version);
        Ok(version)
    }

    pub fn load_layout_solution(
        &self,
        version: Option<u32>,
    ) -> Result<LayoutSolutionDocument, StoreFault> {
        let resolved_version = match version {
            Some(explicit) => explicit,
            None => self.latest_version(LAYOUT_PREFIX)?.ok_or_else(|| {
                StoreFault::ArtifactMissing { artifact: "layout_solution_v1.json".to_string() }
            })?,
        };
        read_json(&self.versioned_path(LAYOUT_PREFIX, resolved_version))
    }

    /// Persiste un rastro de fallo con la versión siguiente de rastro.
    pub fn save_dfs_trace(&self, trace: &DfsTrace) -> Result<u32, StoreFault> {
        let version = self.next_version(TRACE_PREFIX)?;
        write_json_atomic(&self.versioned_path(TRACE_PREFIX, version), trace)?;
        Ok(version)
    }

    // --- PUERTAS DE REVISIÓN HUMANA ---

    pub fn is_stage_approved(&self, stage_name: &str) -> bool {
        file_ready(&self.approvals_directory().join(format!("{stage_name}.approved")))
    }

    /// Cristaliza el marcador de aprobación humana para una etapa.
    pub fn approve_stage(&self, stage_name: &str) -> Result<(), StoreFault> {
        let marker = self.approvals_directory().join(format!("{stage_name}.approved"));
        write_bytes_atomic(&marker, Utc::now().to_rfc3339().as_bytes())
    }

    // --- SONDEO DE COMPLETITUD ---

    /// Sondea un descriptor de artefacto: '/' final = directorio no vacío.
    pub fn artifact_ready(&self, descriptor: &str) -> bool {
        if let Some(directory_name) = descriptor.strip_suffix('/') {
            directory_ready(&self.session_directory.join(directory_name))
        } else {
            file_ready(&self.session_directory.join(descriptor))
        }
    }

    /// Sondea la presencia de al menos una versión de un prefijo.
    pub fn any_version_ready(&self, prefix: &str) -> bool {
        self.latest_version(prefix).ok().flatten().is_some()
    }
}
