/**
 * =================================================================
 * APARATO: PARTIAL MANIFEST TEST (V4.0)
 * CLASIFICACIÓN: TRINITY EVIDENCE (ESTRATO L4-CONDUCTOR)
 * OBJETIVO: Certificar la tolerancia parcial de la etapa de activos:
 *           el agotamiento de reintentos del cliente 3D produce un
 *           manifiesto parcial con códigos de error, sin sellar el
 *           pipeline como fallido.
 * =================================================================
 */

use maquette_conductor_lib::bootstrap::{assemble_runner, ClientRoster};
use maquette_conductor_lib::runner::{RunOutcome, RunRequest};
use maquette_conductor_lib::settings::ConductorSettings;
use maquette_core_dispatch::DispatchConfig;
use maquette_core_geometry::Vec3;
use maquette_domain_models::{InitialPose, SceneData, SceneObject, SessionStatus};
use maquette_infra_clients::{ServiceFault, StubImageClient, StubThreeDClient, StubVlmClient};
use maquette_infra_store::WorkspaceManager;
use std::sync::Arc;
use tempfile::TempDir;

fn forge_object(object_id: &str, initial_x: f64) -> SceneObject {
    SceneObject {
        object_id: object_id.to_string(),
        name: object_id.to_string(),
        category: "furniture".to_string(),
        size_m: Vec3::new(0.8, 0.8, 0.8),
        initial_pose: InitialPose { pos: Vec3::new(initial_x, 0.0, 0.0), rot_euler: Vec3::ZERO },
        visual_desc: "A sturdy cabinet for exhaustion audits".to_string(),
        must_exist: true,
        material: None,
        color: None,
        tags: Vec::new(),
        asset_path: None,
    }
}

#[tokio::test]
async fn certify_asset_retry_exhaustion_yields_partial_manifest() {
    let canned_scene = SceneData {
        scene_style: "modern".to_string(),
        objects: vec![forge_object("cabinet_001", -1.5), forge_object("cabinet_002", 1.5)],
    };
    let roster = ClientRoster::new(
        Arc::new(StubImageClient::instant()),
        Arc::new(StubVlmClient::new(canned_scene, Vec::new())),
        // El cliente 3D colapsa con fallo de transporte en CADA intento.
        Arc::new(StubThreeDClient::always_failing(ServiceFault::Transport(
            "canned upstream collapse".to_string(),
        ))),
    );

    let fast_dispatch = DispatchConfig {
        capacity: 2,
        max_retries: 2,
        retry_delay_seconds: 0.01,
        per_job_timeout_seconds: 10.0,
    };
    let settings = ConductorSettings {
        image_dispatch: fast_dispatch.clone(),
        vlm_dispatch: fast_dispatch.clone(),
        asset_dispatch: fast_dispatch,
        ..ConductorSettings::default()
    };

    let ephemeral_workspace = TempDir::new().unwrap();
    let runner = assemble_runner(ephemeral_workspace.path(), settings, roster);

    let outcome = runner
        .run(RunRequest {
            text: "Two cabinets against a wall".to_string(),
            style: Some("modern".to_string()),
            ..RunRequest::default()
        })
        .await;

    // La etapa de activos NO sella el pipeline: éxito con parcialidad.
    let response = match outcome {
        RunOutcome::Success(response) => response,
        other => panic!("Asset exhaustion must not collapse the pipeline: {other:?}"),
    };
    assert!(response.ok);
    assert!(response.stages_completed.contains(&"assets".to_string()));
    assert!(response.stages_completed.contains(&"assemble".to_string()));
    assert!(response.message.contains("partial"));

    let workspace = WorkspaceManager::new(ephemeral_workspace.path());
    let store = workspace.open_session(&response.session_id).unwrap();

    // Manifiesto parcial: ambas entradas presentes, ambas con código de error.
    let manifest = store.load_asset_manifest().unwrap();
    assert_eq!(manifest.assets.len(), 2);
    assert_eq!(manifest.total_assets, 0, "No asset survived; totals count successes only.");
    for record in manifest.assets.values() {
        assert_eq!(record.error.as_deref(), Some("upstream_transport"));
        assert_eq!(record.size_bytes, 0);
    }

    // Estado final: PARTIAL, porque hubo fallos por elemento registrados.
    let state = store.load_state().unwrap();
    assert_eq!(state.status, SessionStatus::Partial);
}
