// [apps/conductor/src/bootstrap.rs]
/*!
 * =================================================================
 * APARATO: CONDUCTOR BOOTSTRAP (V12.6 - COMPOSITION ROOT)
 * CLASIFICACIÓN: APPLICATION LAYER (ESTRATO L4-APP)
 * RESPONSABILIDAD: CABLEADO DE CLIENTES, DESPACHO Y RUNNER
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. CONSTRUCTOR-TIME CHOICE: El intercambio de implementaciones de
 *    cliente ocurre aquí y solo aquí; el runner recibe handles de
 *    interfaz y jamás conoce al proveedor.
 * 2. OFFLINE DOUBLES: Los adaptadores de proveedor viven fuera del
 *    núcleo; el roster offline ejercita el pipeline completo con dobles
 *    deterministas, útil para humo local y Proving Grounds.
 * =================================================================
 */

use maquette_core_dispatch::DispatchEngine;
use maquette_core_geometry::Vec3;
use maquette_domain_models::{InitialPose, SceneData, SceneObject};
use maquette_infra_clients::{
    config::ServiceEndpointConfig, ImageClient, StubImageClient, StubThreeDClient, StubVlmClient,
    ThreeDClient, VlmClient,
};
use maquette_infra_store::WorkspaceManager;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use crate::execution::StageExecutor;
use crate::runner::PipelineRunner;
use crate::settings::ConductorSettings;

/// Roster de colaboradores externos, tipado por interfaz.
pub struct ClientRoster {
    pub image_client: Arc<dyn ImageClient>,
    pub vlm_client: Arc<dyn VlmClient>,
    pub threed_client: Arc<dyn ThreeDClient>,
}

impl ClientRoster {
    pub fn new(
        image_client: Arc<dyn ImageClient>,
        vlm_client: Arc<dyn VlmClient>,
        threed_client: Arc<dyn ThreeDClient>,
    ) -> Self {
        Self { image_client, vlm_client, threed_client }
    }

    /// Roster de dobles deterministas para humo local sin red.
    ///
    /// El doble VLM responde una escena enlatada de un solo objeto;
    /// suficiente para recorrer el pipeline de punta a punta.
    pub fn offline_demo() -> Self {
        let canned_scene = SceneData {
            scene_style: "modern".to_string(),
            objects: vec![SceneObject {
                object_id: "table_001".to_string(),
                name: "Cube Table".to_string(),
                category: "furniture".to_string(),
                size_m: Vec3::new(1.0, 1.0, 0.75),
                initial_pose: InitialPose { pos: Vec3::ZERO, rot_euler: Vec3::ZERO },
                visual_desc: "A minimalist cubic table with a matte walnut finish".to_string(),
                must_exist: true,
                material: Some("walnut".to_string()),
                color: Some("brown".to_string()),
                tags: vec!["furniture".to_string()],
                asset_path: None,
            }],
        };

        Self {
            image_client: Arc::new(StubImageClient::instant()),
            vlm_client: Arc::new(StubVlmClient::new(canned_scene, Vec::new())),
            threed_client: Arc::new(StubThreeDClient::healthy()),
        }
    }

    /// Audita las credenciales de proveedor presentes en el entorno.
    ///
    /// El núcleo no interpreta credenciales: solo certifica presencia y
    /// las deja intactas para los adaptadores de proveedor externos.
    pub fn audit_environment_credentials() {
        for service_prefix in ["IMAGE", "VLM", "THREED"] {
            match ServiceEndpointConfig::from_env_optional(service_prefix) {
                Some(endpoint) => info!(
                    "🔑 [BOOTSTRAP]: {}_API_KEY present (base_url: {}).",
                    service_prefix,
                    endpoint.base_url.as_deref().unwrap_or("<default>")
                ),
                None => warn!(
                    "🔒 [BOOTSTRAP]: {}_API_KEY absent; vendor adapter unavailable.",
                    service_prefix
                ),
            }
        }
    }
}

/// Ensambla el runner completo: workspace + ejecutor + despacho acotado.
pub fn assemble_runner(
    workspace_root: &Path,
    settings: ConductorSettings,
    roster: ClientRoster,
) -> PipelineRunner {
    let workspace = WorkspaceManager::new(workspace_root);
    let asset_cache_directory = workspace.asset_cache_directory();

    let executor = StageExecutor {
        image_client: roster.image_client,
        vlm_client: roster.vlm_client,
        threed_client: roster.threed_client,
        image_dispatch: Arc::new(DispatchEngine::new(settings.image_dispatch.clone())),
        vlm_dispatch: Arc::new(DispatchEngine::new(settings.vlm_dispatch.clone())),
        asset_dispatch: Arc::new(DispatchEngine::new(settings.asset_dispatch.clone())),
        settings,
        asset_cache_directory,
    };

    PipelineRunner::new(workspace, executor)
}
