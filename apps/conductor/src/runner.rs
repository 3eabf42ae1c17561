// [apps/conductor/src/runner.rs]
/*!
 * =================================================================
 * APARATO: PIPELINE RUNNER (V12.5 - RESUME SOVEREIGN)
 * CLASIFICACIÓN: APPLICATION LAYER (ESTRATO L4-APP)
 * RESPONSABILIDAD: ORQUESTACIÓN SECUENCIAL, REANUDACIÓN Y TRIAJE FINAL
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. WRITE-THEN-ADVANCE: El runner no inicia la etapa N+1 hasta que la
 *    etapa N persiste su conjunto completo de artefactos o colapsa.
 * 2. PRESENCE-DRIVEN RESUME: Sin 'from_stage', la ejecución arranca en
 *    la primera etapa incompleta; con él, las anteriores se asumen
 *    presentes y no se verifican.
 * 3. REVIEW GATES: Una etapa listada en REVIEW_STAGES exige marcador de
 *    aprobación humana antes de ejecutar la siguiente etapa con trabajo
 *    pendiente.
 * 4. STAGE-BOUNDARY CANCELLATION: La señal de cancelación detiene el
 *    pipeline en la frontera de etapa; jamás deja artefactos parciales.
 * =================================================================
 */

use maquette_domain_models::{
    ErrorCode, ErrorResponse, RequestConstraints, SessionRequest, SessionStatus, SuccessResponse,
};
use maquette_infra_store::{
    session::{CONSTRAINTS_PREFIX, LAYOUT_PREFIX},
    SessionStore, WorkspaceManager,
};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, instrument, warn};

use crate::execution::{StageExecutor, StageFault};
use crate::stage_data::StageData;
use crate::stages::{ArtifactProbe, PipelineStage};

/// Petición de ejecución recibida de la interfaz de mando.
#[derive(Debug, Clone, Default)]
pub struct RunRequest {
    pub text: String,
    pub style: Option<String>,
    pub session_id: Option<String>,
    pub from_stage: Option<String>,
    pub until_stage: Option<String>,
    pub max_objects: Option<u32>,
    pub room_size_hint: Option<[f64; 3]>,
}

/// Veredicto final de una ejecución del pipeline.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    Success(SuccessResponse),
    /// El pipeline se detuvo esperando aprobación humana de una etapa.
    PendingReview { session_id: String, awaiting_stage: String },
    Collapsed(ErrorResponse),
}

/// Director secuencial del pipeline de escenas.
pub struct PipelineRunner {
    workspace: WorkspaceManager,
    executor: StageExecutor,
    cancellation_signal: Arc<AtomicBool>,
}

impl PipelineRunner {
    pub fn new(workspace: WorkspaceManager, executor: StageExecutor) -> Self {
        Self {
            workspace,
            executor,
            cancellation_signal: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Handle compartido para integrarse con las señales del host.
    pub fn cancellation_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancellation_signal)
    }

    fn is_cancelled(&self) -> bool {
        self.cancellation_signal.load(Ordering::SeqCst)
    }

    /// Ejecuta (o reanuda) el pipeline completo para una petición.
    #[instrument(skip_all, fields(session = request.session_id.as_deref().unwrap_or("<new>")))]
    pub async fn run(&self, request: RunRequest) -> RunOutcome {
        // 1. RESOLUCIÓN DE FRONTERAS DE ETAPA
        let stage_order = PipelineStage::execution_order();
        let from_stage = match Self::resolve_stage_bound(request.from_stage.as_deref()) {
            Ok(resolved) => resolved,
            Err(response) => return RunOutcome::Collapsed(response),
        };
        let until_stage = match Self::resolve_stage_bound(request.until_stage.as_deref()) {
            Ok(resolved) => resolved,
            Err(response) => return RunOutcome::Collapsed(response),
        };

        if let (Some(from), Some(until)) = (from_stage, until_stage) {
            let position_of = |stage: PipelineStage| {
                stage_order.iter().position(|entry| *entry == stage).unwrap_or(0)
            };
            if position_of(from) > position_of(until) {
                return RunOutcome::Collapsed(ErrorResponse::forge(
                    ErrorCode::InvalidInput,
                    request.session_id.clone(),
                    None,
                    format!(
                        "from_stage '{}' must precede or equal until_stage '{}'",
                        from.name(),
                        until.name()
                    ),
                ));
            }
        }

        // 2. FORJA O APERTURA DE LA SESIÓN
        let store = match self.resolve_session(&request) {
            Ok(store) => store,
            Err(response) => return RunOutcome::Collapsed(response),
        };
        let session_id = store.session_id().to_string();

        // La petición inmutable persistida es la verdad operativa.
        let persisted_request = match store.load_request() {
            Ok(persisted) => persisted,
            Err(store_fault) => {
                return RunOutcome::Collapsed(ErrorResponse::forge(
                    store_fault.error_code(),
                    Some(session_id),
                    None,
                    store_fault.to_string(),
                ))
            }
        };

        let mut data = StageData::ignite(
            persisted_request.text.clone(),
            persisted_request.style.clone().unwrap_or_else(|| "modern".to_string()),
        );
        self.hydrate_resume_references(&store, &mut data);

        // 3. BUCLE SECUENCIAL DE ETAPAS
        let pipeline_ignition = Instant::now();
        let from_index = from_stage
            .map(|stage| stage_order.iter().position(|entry| *entry == stage).unwrap_or(0))
            .unwrap_or(0);

        let mut previous_executable_stage: Option<PipelineStage> = None;

        for (stage_index, stage) in stage_order.into_iter().enumerate() {
            // Etapa QC: fuera del censo cuando está deshabilitada.
            if stage == PipelineStage::Qc && !self.executor.settings.qc_enabled {
                continue;
            }

            if stage_index < from_index {
                data.stages_completed.push(stage.name().to_string());
                continue;
            }

            // Frontera de cancelación: jamás a mitad de etapa.
            if self.is_cancelled() {
                return self.seal_interruption(&store, &session_id, stage);
            }

            let stage_already_complete = self.stage_complete(&store, stage);

            if stage_already_complete {
                data.stages_completed.push(stage.name().to_string());
                previous_executable_stage = Some(stage);
                if until_stage == Some(stage) {
                    break;
                }
                continue;
            }

            // Puerta de revisión humana sobre la etapa anterior.
            if let Some(previous_stage) = previous_executable_stage {
                let requires_approval = self
                    .executor
                    .settings
                    .review_stages
                    .contains(previous_stage.name());
                if requires_approval && !store.is_stage_approved(previous_stage.name()) {
                    info!(
                        "✋ [RUNNER]: Stage '{}' awaits human approval before '{}' may run.",
                        previous_stage.name(),
                        stage.name()
                    );
                    return RunOutcome::PendingReview {
                        session_id,
                        awaiting_stage: previous_stage.name().to_string(),
                    };
                }
            }

            // Anuncio de estado y progreso.
            let progress = (stage_index as f64 / stage_order.len() as f64) * 100.0;
            let _ = store.update_status(stage.announced_status(), Some(stage.name()), progress);

            info!("▶️  [RUNNER]: Stage '{}' igniting. {}", stage.name(), stage.description());
            let stage_ignition = Instant::now();

            match self.executor.execute(stage, &store, &mut data).await {
                Ok(()) => {
                    data.record_timing(stage.name(), stage_ignition.elapsed().as_secs_f64());
                    data.stages_completed.push(stage.name().to_string());
                    previous_executable_stage = Some(stage);
                }
                Err(StageFault::Cancelled) => {
                    return self.seal_interruption(&store, &session_id, stage);
                }
                Err(stage_fault) => {
                    return self.seal_collapse(&store, &session_id, stage, stage_fault, &mut data);
                }
            }

            if until_stage == Some(stage) {
                break;
            }
        }

        // 4. SELLADO FINAL
        data.metrics
            .insert("total_time".to_string(), pipeline_ignition.elapsed().as_secs_f64());

        let full_run = until_stage.is_none() || until_stage == Some(PipelineStage::Assemble);
        let final_status = if !full_run {
            None
        } else if data.errors.is_empty() {
            Some(SessionStatus::Completed)
        } else {
            Some(SessionStatus::Partial)
        };
        if let Some(status) = final_status {
            let _ = store.update_status(status, None, 100.0);
        }

        let message = if data.errors.is_empty() {
            format!("Pipeline sealed in {:.2}s", pipeline_ignition.elapsed().as_secs_f64())
        } else {
            format!(
                "Pipeline sealed with {} partial failures in {:.2}s",
                data.errors.len(),
                pipeline_ignition.elapsed().as_secs_f64()
            )
        };

        RunOutcome::Success(SuccessResponse {
            ok: true,
            session_id,
            workspace_path: self.workspace.workspace_root().display().to_string(),
            artifacts: self.collect_artifact_map(&store),
            stages_completed: data.stages_completed.clone(),
            message,
        })
    }

    /// Valida un nombre de etapa de la interfaz de mando.
    fn resolve_stage_bound(
        raw_name: Option<&str>,
    ) -> Result<Option<PipelineStage>, ErrorResponse> {
        match raw_name {
            None => Ok(None),
            Some(raw) => PipelineStage::from_name(raw).map(Some).ok_or_else(|| {
                let valid_roster: Vec<&str> = PipelineStage::execution_order()
                    .iter()
                    .map(|stage| stage.name())
                    .collect();
                ErrorResponse::forge(
                    ErrorCode::InvalidInput,
                    None,
                    None,
                    format!("Unknown stage '{raw}'. Valid stages: {valid_roster:?}"),
                )
            }),
        }
    }

    /// Abre la sesión pedida o forja una nueva.
    fn resolve_session(&self, request: &RunRequest) -> Result<SessionStore, ErrorResponse> {
        match &request.session_id {
            Some(session_id) => {
                let store = self.workspace.open_session(session_id).map_err(|store_fault| {
                    ErrorResponse::forge(
                        store_fault.error_code(),
                        Some(session_id.clone()),
                        None,
                        store_fault.to_string(),
                    )
                })?;

                // Contabilidad de reintentos para sesiones reanudables.
                if let Ok(state) = store.load_state() {
                    if state.status.is_resumable() {
                        if !state.can_retry() {
                            return Err(ErrorResponse::forge(
                                ErrorCode::InvalidInput,
                                Some(session_id.clone()),
                                None,
                                format!(
                                    "Session exhausted its retry budget ({}/{})",
                                    state.retry_count, state.max_retries
                                ),
                            ));
                        }
                        let _ = store.increment_retry();
                    }
                }
                Ok(store)
            }
            None => {
                let session_request = SessionRequest {
                    text: request.text.clone(),
                    style: request.style.clone(),
                    constraints: RequestConstraints {
                        max_objects: request.max_objects,
                        room_size_hint: request.room_size_hint,
                    },
                };
                self.workspace.create_session(&session_request).map_err(|store_fault| {
                    ErrorResponse::forge(
                        store_fault.error_code(),
                        None,
                        None,
                        store_fault.to_string(),
                    )
                })
            }
        }
    }

    /// Rehidrata referencias de artefactos ya presentes (reanudación).
    fn hydrate_resume_references(&self, store: &SessionStore, data: &mut StageData) {
        let scene_reference = store.scene_reference_path();
        if scene_reference.is_file() {
            data.scene_reference_path = Some(scene_reference);
        }
        if let Ok(inventory) = store.load_objects() {
            data.scene = Some(inventory);
        }
        data.constraints_version = store.latest_version(CONSTRAINTS_PREFIX).ok().flatten();
        data.layout_version = store.latest_version(LAYOUT_PREFIX).ok().flatten();
    }

    /// Completitud de etapa: toda sonda declarada presente y no vacía.
    fn stage_complete(&self, store: &SessionStore, stage: PipelineStage) -> bool {
        let declared = stage.declared_outputs();
        if declared.is_empty() {
            // Etapa sin artefacto propio (QC): nunca certifica por presencia.
            return false;
        }
        declared.iter().all(|probe| match probe {
            ArtifactProbe::Descriptor(descriptor) => store.artifact_ready(descriptor),
            ArtifactProbe::Versioned(prefix) => store.any_version_ready(prefix),
        })
    }

    /// Sella una interrupción cortés en frontera de etapa.
    fn seal_interruption(
        &self,
        store: &SessionStore,
        session_id: &str,
        stage: PipelineStage,
    ) -> RunOutcome {
        warn!("⚠️ [RUNNER]: Cancellation honored at stage '{}' boundary.", stage.name());
        let _ = store.update_status(SessionStatus::Partial, Some(stage.name()), 0.0);

        let mut response = ErrorResponse::forge(
            ErrorCode::InternalError,
            Some(session_id.to_string()),
            Some(stage.name().to_string()),
            "Pipeline interrupted by cancellation signal",
        );
        response.error.retryable = true;
        let _ = store.save_last_error(&response);
        RunOutcome::Collapsed(response)
    }

    /// Sella el colapso de una etapa: estado, historial y last_error.json.
    fn seal_collapse(
        &self,
        store: &SessionStore,
        session_id: &str,
        stage: PipelineStage,
        stage_fault: StageFault,
        data: &mut StageData,
    ) -> RunOutcome {
        let code = stage_fault.error_code();
        let message = stage_fault.to_string();
        error!("💀 [RUNNER]: Stage '{}' collapsed: {}", stage.name(), message);

        data.add_error(stage.name(), &message);
        let _ = store.add_error(Some(stage.name()), code.code_str(), &message);
        let _ = store.update_status(SessionStatus::Failed, Some(stage.name()), 0.0);

        let response = ErrorResponse::forge(
            code,
            Some(session_id.to_string()),
            Some(stage.name().to_string()),
            message,
        );
        let _ = store.save_last_error(&response);
        RunOutcome::Collapsed(response)
    }

    /// Censo de artefactos presentes para la respuesta de éxito.
    fn collect_artifact_map(&self, store: &SessionStore) -> BTreeMap<String, String> {
        let mut artifacts = BTreeMap::new();
        let mut register = |name: &str, path: std::path::PathBuf| {
            if path.exists() {
                artifacts.insert(name.to_string(), path.display().to_string());
            }
        };

        register("request", store.request_path());
        register("scene_ref", store.scene_reference_path());
        register("objects", store.objects_path());
        register("object_cards", store.cards_directory());
        register("assets", store.assets_directory());
        register("asset_manifest", store.asset_manifest_path());
        register("blender_object_map", store.assembly_map_path());

        if let Ok(Some(version)) = store.latest_version(CONSTRAINTS_PREFIX) {
            register("constraints", store.versioned_path(CONSTRAINTS_PREFIX, version));
        }
        if let Ok(Some(version)) = store.latest_version(LAYOUT_PREFIX) {
            register("layout_solution", store.versioned_path(LAYOUT_PREFIX, version));
        }

        artifacts
    }
}
