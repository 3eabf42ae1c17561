// [apps/conductor/src/execution.rs]
/*!
 * =================================================================
 * APARATO: STAGE EXECUTION ENGINE (V12.4 - POLYMORPHIC DISPATCH)
 * CLASIFICACIÓN: APPLICATION LAYER (ESTRATO L4-APP)
 * RESPONSABILIDAD: EJECUCIÓN CONCRETA DE CADA ETAPA DEL PIPELINE
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. POLYMORPHIC DISPATCH: Un único punto de entrada despacha por
 *    match sobre el enum de etapas; cada brazo orquesta sus clientes y
 *    su persistencia.
 * 2. PARTIAL TOLERANCE LAW: cards y assets toleran fallos por elemento
 *    (manifiesto parcial); layout NO tolera y sella la etapa.
 * 3. BLOCKING DISCIPLINE: El solucionador (CPU-bound) ejecuta bajo
 *    spawn_blocking para no asfixiar el reactor de Tokio.
 * =================================================================
 */

use maquette_core_dispatch::{DispatchEngine, JobError, JobOutcome, JobYield};
use maquette_domain_constraints::{regenerate_from_trace, ConstraintSet};
use maquette_domain_models::{
    AssemblyObjectMap, AssetManifest, AssetRecord, ConflictType, ConstraintGlobals, ErrorCode,
    MeshFormat, ObjectCardRecord, SceneData, SceneObject, ValidationFault,
};
use maquette_domain_solver::LayoutSolver;
use maquette_infra_clients::{ImageClient, ServiceFault, ThreeDClient, VlmClient};
use maquette_infra_store::{session::LAYOUT_PREFIX, SessionStore, StoreFault};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::retrieval::{AssetDecisionEngine, LocalAssetRetriever};
use crate::settings::ConductorSettings;
use crate::stage_data::StageData;
use crate::stages::PipelineStage;

/// Firma PNG usada por el filtro de QC de tarjetas.
const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// Fallo terminal de una etapa del pipeline.
#[derive(Debug, Error)]
pub enum StageFault {
    #[error("{0}")]
    Store(#[from] StoreFault),

    #[error("{0}")]
    Validation(#[from] ValidationFault),

    #[error("{message}")]
    Terminal { code: ErrorCode, message: String },

    #[error("STAGE_CANCELLED: Cancellation signal observed at stage boundary")]
    Cancelled,
}

impl StageFault {
    pub fn error_code(&self) -> ErrorCode {
        match self {
            StageFault::Store(store_fault) => store_fault.error_code(),
            StageFault::Validation(_) => ErrorCode::InvalidInput,
            StageFault::Terminal { code, .. } => *code,
            StageFault::Cancelled => ErrorCode::InternalError,
        }
    }

    fn terminal(code: ErrorCode, message: impl Into<String>) -> Self {
        StageFault::Terminal { code, message: message.into() }
    }
}

/// Proyecta el colapso de un trabajo del ejecutor a un fallo de etapa.
///
/// Los fallos no reintentables conservan su código upstream; el
/// agotamiento de transporte colapsa al código terminal del servicio.
fn collapse_job_error(job_error: JobError<ServiceFault>, terminal_code: ErrorCode) -> StageFault {
    match job_error {
        JobError::Cancelled => StageFault::Cancelled,
        JobError::Timeout { limit_seconds } => StageFault::terminal(
            terminal_code,
            format!("Job exceeded the hard cap of {limit_seconds}s"),
        ),
        JobError::Upstream(service_fault) => {
            let code = if service_fault.error_code().is_retryable() {
                terminal_code
            } else {
                service_fault.error_code()
            };
            StageFault::terminal(code, service_fault.to_string())
        }
    }
}

/// Motor de ejecución de etapas: clientes, despacho acotado y ajustes.
pub struct StageExecutor {
    pub image_client: Arc<dyn ImageClient>,
    pub vlm_client: Arc<dyn VlmClient>,
    pub threed_client: Arc<dyn ThreeDClient>,
    pub image_dispatch: Arc<DispatchEngine>,
    pub vlm_dispatch: Arc<DispatchEngine>,
    pub asset_dispatch: Arc<DispatchEngine>,
    pub settings: ConductorSettings,
    pub asset_cache_directory: PathBuf,
}

impl StageExecutor {
    /// Punto de entrada polimórfico: despacho por enum de etapa.
    #[instrument(skip(self, store, data), fields(session = %store.session_id(), stage = stage.name()))]
    pub async fn execute(
        &self,
        stage: PipelineStage,
        store: &SessionStore,
        data: &mut StageData,
    ) -> Result<(), StageFault> {
        match stage {
            PipelineStage::Session => self.execute_session(store).await,
            PipelineStage::SceneRef => self.execute_scene_ref(store, data).await,
            PipelineStage::Extract => self.execute_extract(store, data).await,
            PipelineStage::Cards => self.execute_cards(store, data).await,
            PipelineStage::Qc => self.execute_qc(store).await,
            PipelineStage::Constraints => self.execute_constraints(store, data).await,
            PipelineStage::Layout => self.execute_layout(store, data).await,
            PipelineStage::Assets => self.execute_assets(store, data).await,
            PipelineStage::Assemble => self.execute_assemble(store, data).await,
        }
    }

    /// ETAPA session: la petición inmutable debe existir.
    async fn execute_session(&self, store: &SessionStore) -> Result<(), StageFault> {
        store.load_request()?;
        Ok(())
    }

    /// ETAPA scene_ref: imagen de referencia de la escena completa.
    async fn execute_scene_ref(
        &self,
        store: &SessionStore,
        data: &mut StageData,
    ) -> Result<(), StageFault> {
        let session_id = store.session_id().to_string();
        let scene_text = data.scene_text.clone();
        let style = data.style.clone();
        let image_client = Arc::clone(&self.image_client);

        let operation = move |_task: ()| {
            let image_client = Arc::clone(&image_client);
            let session_id = session_id.clone();
            let scene_text = scene_text.clone();
            let style = style.clone();
            async move {
                image_client
                    .generate_scene_reference(&session_id, &scene_text, &style)
                    .await
                    .map(JobYield::immediate)
            }
        };

        let outcome = self.image_dispatch.execute_admitted_job((), operation).await;
        match (outcome.result, outcome.error) {
            (Some(reference_yield), _) => {
                let destination = store.save_scene_reference(&reference_yield.image_bytes)?;
                data.scene_reference_path = Some(destination);
                info!("🖼️ [SCENE_REF]: Reference image crystallized ({} attempts).", outcome.attempt_count);
                Ok(())
            }
            (None, Some(job_error)) => {
                Err(collapse_job_error(job_error, ErrorCode::ImageGenerationFailed))
            }
            (None, None) => Err(StageFault::terminal(
                ErrorCode::InternalError,
                "Dispatch returned neither result nor error",
            )),
        }
    }

    /// ETAPA extract: inventario de objetos desde el texto de escena.
    async fn execute_extract(
        &self,
        store: &SessionStore,
        data: &mut StageData,
    ) -> Result<(), StageFault> {
        let request = store.load_request()?;
        let session_id = store.session_id().to_string();
        let scene_text = data.scene_text.clone();
        let vlm_client = Arc::clone(&self.vlm_client);
        let reference_bytes = data
            .scene_reference_path
            .as_ref()
            .and_then(|path| std::fs::read(path).ok());

        let operation = move |_task: ()| {
            let vlm_client = Arc::clone(&vlm_client);
            let session_id = session_id.clone();
            let scene_text = scene_text.clone();
            let reference_bytes = reference_bytes.clone();
            async move {
                vlm_client
                    .extract_objects(&session_id, &scene_text, reference_bytes.as_deref())
                    .await
                    .map(JobYield::immediate)
            }
        };

        let outcome = self.vlm_dispatch.execute_admitted_job((), operation).await;
        let mut inventory: SceneData = match (outcome.result, outcome.error) {
            (Some(scene), _) => scene,
            (None, Some(job_error)) => {
                return Err(collapse_job_error(job_error, ErrorCode::LlmError))
            }
            (None, None) => {
                return Err(StageFault::terminal(
                    ErrorCode::InternalError,
                    "Dispatch returned neither result nor error",
                ))
            }
        };

        // Cota de inventario pedida por el usuario, si es más estricta.
        if let Some(requested_cap) = request.constraints.max_objects {
            let cap = requested_cap as usize;
            if inventory.objects.len() > cap {
                warn!(
                    "✂️ [EXTRACT]: Inventory truncated from {} to the requested cap of {}.",
                    inventory.objects.len(),
                    cap
                );
                inventory.objects.truncate(cap);
            }
        }

        inventory.sanitize_and_validate()?;
        store.save_objects(&inventory)?;
        info!("📋 [EXTRACT]: {} objects crystallized.", inventory.objects.len());
        data.scene = Some(inventory);
        Ok(())
    }

    /// ETAPA cards: una tarjeta de referencia por objeto, fallos tolerados.
    async fn execute_cards(
        &self,
        store: &SessionStore,
        data: &mut StageData,
    ) -> Result<(), StageFault> {
        let inventory = match &data.scene {
            Some(scene) => scene.clone(),
            None => store.load_objects()?,
        };
        let reference_bytes = data
            .scene_reference_path
            .as_ref()
            .map(|path| std::fs::read(path))
            .transpose()
            .map_err(StoreFault::Io)?
            .unwrap_or_default();

        let session_id = store.session_id().to_string();
        let image_client = Arc::clone(&self.image_client);

        let operation = move |object: SceneObject| {
            let image_client = Arc::clone(&image_client);
            let session_id = session_id.clone();
            let reference_bytes = reference_bytes.clone();
            async move {
                let single_object = [object];
                let mut cards = image_client
                    .generate_object_cards(&session_id, &single_object, &reference_bytes)
                    .await?;
                match cards.pop() {
                    Some(card) if cards.is_empty() => Ok(JobYield::immediate(card)),
                    _ => Err(ServiceFault::InvalidInput(
                        "LENGTH_PARITY_BROKEN: Card client violated the one-per-object law".to_string(),
                    )),
                }
            }
        };

        let outcomes = self
            .image_dispatch
            .execute_batch(inventory.objects.clone(), operation)
            .await;

        let mut generated_count = 0usize;
        for (object, outcome) in inventory.objects.iter().zip(outcomes) {
            match outcome.result {
                Some(card_yield) => {
                    let destination = store.save_card(&card_yield.object_id, &card_yield.card_bytes)?;
                    data.cards.push(ObjectCardRecord {
                        object_id: card_yield.object_id,
                        card_path: destination.to_string_lossy().to_string(),
                        prompt_used: card_yield.prompt_used,
                    });
                    generated_count += 1;
                }
                None => {
                    let detail = outcome
                        .error
                        .map(|job_error| job_error.to_string())
                        .unwrap_or_else(|| "unknown collapse".to_string());
                    data.add_error("cards", format!("{}: {detail}", object.object_id));
                }
            }
        }

        if generated_count == 0 && !inventory.objects.is_empty() {
            return Err(StageFault::terminal(
                ErrorCode::ImageGenerationFailed,
                "Every object card collapsed; the stage cannot certify its output",
            ));
        }

        info!(
            "🃏 [CARDS]: {}/{} cards crystallized.",
            generated_count,
            inventory.objects.len()
        );
        Ok(())
    }

    /// ETAPA qc (opcional): amputa tarjetas estructuralmente inválidas.
    async fn execute_qc(&self, store: &SessionStore) -> Result<(), StageFault> {
        if !self.settings.qc_enabled {
            debug!("🔍 [QC]: Stage disabled; passing through.");
            return Ok(());
        }

        let cards_directory = store.cards_directory();
        if !cards_directory.is_dir() {
            return Ok(());
        }

        let mut dropped_count = 0usize;
        for entry in std::fs::read_dir(&cards_directory).map_err(StoreFault::Io)? {
            let entry_path = entry.map_err(StoreFault::Io)?.path();
            if !entry_path.is_file() {
                continue;
            }
            let payload = std::fs::read(&entry_path).map_err(StoreFault::Io)?;
            let structurally_valid =
                payload.len() > PNG_SIGNATURE.len() && payload.starts_with(&PNG_SIGNATURE);
            if !structurally_valid {
                warn!("🔍 [QC]: Dropping defective card {:?}.", entry_path.file_name());
                std::fs::remove_file(&entry_path).map_err(StoreFault::Io)?;
                dropped_count += 1;
            }
        }

        info!("🔍 [QC]: Card filter sealed. {} defective cards dropped.", dropped_count);
        Ok(())
    }

    /// ETAPA constraints: extracción VLM y ensamblaje validado v1.
    async fn execute_constraints(
        &self,
        store: &SessionStore,
        data: &mut StageData,
    ) -> Result<(), StageFault> {
        let request = store.load_request()?;
        let inventory = match &data.scene {
            Some(scene) => scene.clone(),
            None => store.load_objects()?,
        };
        let scene_text = data.scene_text.clone();
        let vlm_client = Arc::clone(&self.vlm_client);
        let objects_snapshot = inventory.objects.clone();
        let reference_bytes = data
            .scene_reference_path
            .as_ref()
            .and_then(|path| std::fs::read(path).ok());

        let operation = move |_task: ()| {
            let vlm_client = Arc::clone(&vlm_client);
            let scene_text = scene_text.clone();
            let objects_snapshot = objects_snapshot.clone();
            let reference_bytes = reference_bytes.clone();
            async move {
                vlm_client
                    .extract_constraints(&scene_text, &objects_snapshot, reference_bytes.as_deref())
                    .await
                    .map(JobYield::immediate)
            }
        };

        let outcome = self.vlm_dispatch.execute_admitted_job((), operation).await;
        let relations = match (outcome.result, outcome.error) {
            (Some(relations), _) => relations,
            (None, Some(job_error)) => {
                return Err(collapse_job_error(job_error, ErrorCode::LlmError))
            }
            (None, None) => {
                return Err(StageFault::terminal(
                    ErrorCode::InternalError,
                    "Dispatch returned neither result nor error",
                ))
            }
        };

        // La sugerencia de sala del usuario acota la caja del mundo.
        let mut globals = ConstraintGlobals::default();
        if let Some([room_length, room_width, _room_height]) = request.constraints.room_size_hint {
            globals.max_room_size = room_length.max(room_width).max(1.0);
        }

        let constraint_set = ConstraintSet::assemble(globals, relations)?;
        constraint_set.verify_object_references(
            &inventory
                .objects
                .iter()
                .map(|object| object.object_id.clone())
                .collect(),
        )?;

        let version = store.save_constraints(constraint_set.to_document(0))?;
        data.constraints_version = Some(version);
        info!(
            "🧩 [CONSTRAINTS]: constraints_v{} sealed with {} relations.",
            version,
            constraint_set.len()
        );
        Ok(())
    }

    /// ETAPA layout: ciclo resolver -> rastro -> regenerar (cap 3).
    async fn execute_layout(
        &self,
        store: &SessionStore,
        data: &mut StageData,
    ) -> Result<(), StageFault> {
        let inventory = match &data.scene {
            Some(scene) => scene.clone(),
            None => store.load_objects()?,
        };
        let mut constraint_set = ConstraintSet::from_document(store.load_constraints(None)?)?;

        for attempt_number in 1..=self.settings.max_solve_attempts {
            info!(
                "📐 [LAYOUT]: Solve attempt {}/{} igniting.",
                attempt_number, self.settings.max_solve_attempts
            );

            // Músculo CPU-bound fuera del reactor.
            let solver_settings = self.settings.solver.clone();
            let objects_snapshot = inventory.objects.clone();
            let constraints_snapshot = constraint_set.clone();
            let report = tokio::task::spawn_blocking(move || {
                LayoutSolver::new(solver_settings).solve(&objects_snapshot, &constraints_snapshot)
            })
            .await
            .map_err(|join_fault| {
                StageFault::terminal(ErrorCode::InternalError, join_fault.to_string())
            })?;

            if report.success {
                let version = store.next_version(LAYOUT_PREFIX)?;
                store.save_layout_solution(&report.to_document(version))?;
                data.layout_version = Some(version);
                data.metrics
                    .insert("layout_solve_time".to_string(), report.metrics.solve_time);
                info!("📐 [LAYOUT]: layout_solution_v{} sealed.", version);
                return Ok(());
            }

            let trace = report.trace.as_ref().expect(
                "SOLVER_CONTRACT_DRIFT: Failed report must carry a DFS trace.",
            );
            let trace_version = store.save_dfs_trace(trace)?;
            warn!(
                "📐 [LAYOUT]: Attempt {} collapsed ({:?}); dfs_trace_v{} archived.",
                attempt_number, trace.conflict_type, trace_version
            );

            if attempt_number == self.settings.max_solve_attempts {
                let code = match trace.conflict_type {
                    ConflictType::Timeout => ErrorCode::SolverTimeout,
                    _ => ErrorCode::SolverNoSolution,
                };
                return Err(StageFault::terminal(
                    code,
                    trace.natural_language_summary.clone(),
                ));
            }

            // Regeneración quirúrgica guiada por el rastro.
            constraint_set = regenerate_from_trace(
                &constraint_set,
                trace,
                self.settings.regeneration_strategy,
            )?;
            let regenerated_version = store.save_constraints(constraint_set.to_document(0))?;
            data.constraints_version = Some(regenerated_version);
        }

        Err(StageFault::terminal(
            ErrorCode::SolverNoSolution,
            "Solve/regenerate budget exhausted without a solution",
        ))
    }

    /// ETAPA assets: generación 3D acotada con manifiesto parcial.
    async fn execute_assets(
        &self,
        store: &SessionStore,
        data: &mut StageData,
    ) -> Result<(), StageFault> {
        let inventory = match &data.scene {
            Some(scene) => scene.clone(),
            None => store.load_objects()?,
        };
        let style = data.style.clone();
        let threed_client = Arc::clone(&self.threed_client);
        let session_store = store.clone();
        let retriever = Arc::new(LocalAssetRetriever::hydrate(&self.asset_cache_directory));
        let decision_engine = Arc::new(AssetDecisionEngine);
        let retrieval_enabled = self.settings.asset_retrieval_enabled;
        let retrieval_threshold = self.settings.asset_retrieval_threshold;

        let operation = move |object: SceneObject| {
            let threed_client = Arc::clone(&threed_client);
            let session_store = session_store.clone();
            let retriever = Arc::clone(&retriever);
            let decision_engine = Arc::clone(&decision_engine);
            let style = style.clone();
            async move {
                // 1. TRIAJE DE RECUPERACIÓN (objetos genéricos)
                if retrieval_enabled {
                    let necessity = decision_engine.evaluate(&object.visual_desc);
                    if necessity < retrieval_threshold {
                        if let Some(found) = retriever.search(&object.visual_desc) {
                            if let Ok(mesh_bytes) = std::fs::read(&found.path) {
                                let record = crystallize_asset_record(
                                    &session_store,
                                    &object.object_id,
                                    &mesh_bytes,
                                    MeshFormat::Glb,
                                    BTreeMap::new(),
                                    "retrieved",
                                )?;
                                return Ok(JobYield::immediate((object.object_id.clone(), record)));
                            }
                        }
                    }
                }

                // 2. GENERACIÓN: tarjeta si existe, descripción si no.
                let card_path = session_store.card_path(&object.object_id);
                let size_hint = [object.size_m.x, object.size_m.y, object.size_m.z];
                let mesh_yield = match std::fs::read(&card_path) {
                    Ok(card_bytes) => {
                        threed_client
                            .generate_from_card(&object.object_id, &card_bytes, size_hint)
                            .await?
                    }
                    Err(_) => {
                        threed_client
                            .generate_from_description(
                                &object.object_id,
                                &object.visual_desc,
                                &style,
                            )
                            .await?
                    }
                };

                let record = crystallize_asset_record(
                    &session_store,
                    &object.object_id,
                    &mesh_yield.mesh_bytes,
                    mesh_yield.format,
                    mesh_yield.metadata,
                    "generated",
                )?;
                Ok(JobYield::immediate((object.object_id.clone(), record)))
            }
        };

        let outcomes: Vec<JobOutcome<(String, AssetRecord), ServiceFault>> = self
            .asset_dispatch
            .execute_batch(inventory.objects.clone(), operation)
            .await;

        let mut manifest_entries: BTreeMap<String, AssetRecord> = BTreeMap::new();
        for (object, outcome) in inventory.objects.iter().zip(outcomes) {
            match outcome.result {
                Some((object_id, record)) => {
                    manifest_entries.insert(object_id, record);
                }
                None => {
                    let (code, detail) = match outcome.error {
                        Some(JobError::Upstream(service_fault)) => {
                            (service_fault.error_code(), service_fault.to_string())
                        }
                        Some(other) => (ErrorCode::AssetGenerationFailed, other.to_string()),
                        None => (ErrorCode::AssetGenerationFailed, "unknown collapse".to_string()),
                    };
                    data.add_error(
                        "assets",
                        format!(
                            "{} failed after {} attempts: {detail}",
                            object.object_id, outcome.attempt_count
                        ),
                    );
                    manifest_entries.insert(
                        object.object_id.clone(),
                        AssetRecord {
                            asset_path: String::new(),
                            format: MeshFormat::Glb,
                            size_bytes: 0,
                            checksum: String::new(),
                            metadata: BTreeMap::new(),
                            source: None,
                            error: Some(code.code_str().to_string()),
                        },
                    );
                }
            }
        }

        let manifest = AssetManifest::crystallize(manifest_entries);
        store.save_asset_manifest(&manifest)?;
        info!(
            "🏺 [ASSETS]: Manifest sealed. {}/{} assets crystallized.",
            manifest.total_assets,
            inventory.objects.len()
        );
        data.asset_manifest = Some(manifest);
        Ok(())
    }

    /// ETAPA assemble: paquete de instrucciones para el host 3D.
    ///
    /// El núcleo jamás invoca al host: escribe el paquete y termina.
    async fn execute_assemble(
        &self,
        store: &SessionStore,
        data: &mut StageData,
    ) -> Result<(), StageFault> {
        let layout_solution = store.load_layout_solution(None)?;
        let assembly_map = AssemblyObjectMap::identity(
            layout_solution.object_placements.keys().cloned(),
        );
        store.save_assembly_map(&assembly_map)?;
        data.metrics.insert(
            "assembled_objects".to_string(),
            assembly_map.mapping.len() as f64,
        );
        info!(
            "🧱 [ASSEMBLE]: Instruction bundle sealed for {} objects.",
            assembly_map.mapping.len()
        );
        Ok(())
    }
}

/// Persiste la malla, sella su checksum SHA-256 y forja el registro.
fn crystallize_asset_record(
    store: &SessionStore,
    object_id: &str,
    mesh_bytes: &[u8],
    format: MeshFormat,
    metadata: BTreeMap<String, serde_json::Value>,
    source: &str,
) -> Result<AssetRecord, ServiceFault> {
    let extension = match format {
        MeshFormat::Glb => "glb",
        MeshFormat::Gltf => "gltf",
        MeshFormat::Fbx => "fbx",
        MeshFormat::Obj => "obj",
    };

    let relative_path = store
        .save_asset(object_id, extension, mesh_bytes)
        .map_err(|store_fault| ServiceFault::Transport(store_fault.to_string()))?;

    let mut integrity_hasher = Sha256::new();
    integrity_hasher.update(mesh_bytes);
    let checksum = format!("sha256:{}", hex::encode(integrity_hasher.finalize()));

    Ok(AssetRecord {
        asset_path: relative_path,
        format,
        size_bytes: mesh_bytes.len() as u64,
        checksum,
        metadata,
        source: Some(source.to_string()),
        error: None,
    })
}
