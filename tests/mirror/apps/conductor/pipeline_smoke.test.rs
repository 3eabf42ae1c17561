/**
 * =================================================================
 * APARATO: PIPELINE SMOKE TEST (V4.0)
 * CLASIFICACIÓN: TRINITY EVIDENCE (ESTRATO L4-CONDUCTOR)
 * OBJETIVO: Certificar el recorrido de humo de extremo a extremo con
 *           colaboradores enlatados: una escena de un solo objeto
 *           atraviesa las ocho etapas y cristaliza todos los
 *           artefactos del contrato.
 * =================================================================
 */

use maquette_conductor_lib::bootstrap::{assemble_runner, ClientRoster};
use maquette_conductor_lib::runner::{RunOutcome, RunRequest};
use maquette_conductor_lib::settings::ConductorSettings;
use maquette_core_dispatch::DispatchConfig;
use maquette_infra_store::WorkspaceManager;
use tempfile::TempDir;

fn fast_settings() -> ConductorSettings {
    let fast_dispatch = DispatchConfig {
        capacity: 2,
        max_retries: 1,
        retry_delay_seconds: 0.01,
        per_job_timeout_seconds: 10.0,
    };
    ConductorSettings {
        image_dispatch: fast_dispatch.clone(),
        vlm_dispatch: fast_dispatch.clone(),
        asset_dispatch: fast_dispatch,
        ..ConductorSettings::default()
    }
}

#[tokio::test]
async fn certify_single_object_smoke_run() {
    let ephemeral_workspace = TempDir::new().unwrap();
    let runner = assemble_runner(
        ephemeral_workspace.path(),
        fast_settings(),
        ClientRoster::offline_demo(),
    );

    let outcome = runner
        .run(RunRequest {
            text: "An empty room with one cube table".to_string(),
            style: Some("modern".to_string()),
            ..RunRequest::default()
        })
        .await;

    let response = match outcome {
        RunOutcome::Success(response) => response,
        other => panic!("SMOKE_COLLAPSE: unexpected outcome {other:?}"),
    };

    assert!(response.ok);
    assert_eq!(
        response.stages_completed,
        vec![
            "session", "scene_ref", "extract", "cards", "constraints", "layout", "assets",
            "assemble"
        ]
    );

    // AUDITORÍA DE ARTEFACTOS EN DISCO
    let workspace = WorkspaceManager::new(ephemeral_workspace.path());
    let store = workspace.open_session(&response.session_id).unwrap();

    let inventory = store.load_objects().unwrap();
    assert_eq!(inventory.objects.len(), 1);
    assert_eq!(inventory.objects[0].object_id, "table_001");

    // Solución v1: mesa en el origen, anclada al suelo, sin rotación.
    let solution = store.load_layout_solution(Some(1)).unwrap();
    assert!(solution.success);
    assert_eq!(solution.version, "v1");
    let placement = solution.object_placements.get("table_001").unwrap();
    assert!(placement.pos.x.abs() < 1e-6);
    assert!(placement.pos.y.abs() < 1e-6);
    assert!((placement.pos.z - 0.375).abs() < 1e-6);
    assert_eq!(
        [placement.rot_euler.x, placement.rot_euler.y, placement.rot_euler.z],
        [0.0, 0.0, 0.0]
    );
    // Convención de escala uniforme por altura (0.75 m).
    assert!((placement.scale.x - 0.75).abs() < 1e-9);

    // Manifiesto: exactamente un activo sellado con checksum real.
    let manifest = store.load_asset_manifest().unwrap();
    assert_eq!(manifest.total_assets, 1);
    let asset_record = manifest.assets.get("table_001").unwrap();
    assert!(asset_record.checksum.starts_with("sha256:"));
    assert!(asset_record.size_bytes > 0);
    assert!(asset_record.error.is_none());

    // Mapa de ensamblaje: función identidad sobre object_id.
    let raw_map = std::fs::read_to_string(store.assembly_map_path()).unwrap();
    assert!(raw_map.contains("\"object_name_equals_id\""));
    assert!(raw_map.contains("\"table_001\": \"table_001\""));

    // Estado final sellado como completado.
    let state = store.load_state().unwrap();
    assert_eq!(state.status, maquette_domain_models::SessionStatus::Completed);
}

#[tokio::test]
async fn certify_until_stage_stops_inclusively() {
    let ephemeral_workspace = TempDir::new().unwrap();
    let runner = assemble_runner(
        ephemeral_workspace.path(),
        fast_settings(),
        ClientRoster::offline_demo(),
    );

    let outcome = runner
        .run(RunRequest {
            text: "An empty room with one cube table".to_string(),
            style: Some("modern".to_string()),
            until_stage: Some("extract".to_string()),
            ..RunRequest::default()
        })
        .await;

    let response = match outcome {
        RunOutcome::Success(response) => response,
        other => panic!("UNTIL_COLLAPSE: unexpected outcome {other:?}"),
    };

    assert_eq!(response.stages_completed, vec!["session", "scene_ref", "extract"]);

    let workspace = WorkspaceManager::new(ephemeral_workspace.path());
    let store = workspace.open_session(&response.session_id).unwrap();
    assert!(store.artifact_ready("objects.json"));
    assert!(!store.artifact_ready("object_cards/"));
    assert!(!store.artifact_ready("asset_manifest.json"));
}

#[tokio::test]
async fn certify_unknown_stage_name_is_invalid_input() {
    let ephemeral_workspace = TempDir::new().unwrap();
    let runner = assemble_runner(
        ephemeral_workspace.path(),
        fast_settings(),
        ClientRoster::offline_demo(),
    );

    let outcome = runner
        .run(RunRequest {
            text: "A room".to_string(),
            until_stage: Some("teleport".to_string()),
            ..RunRequest::default()
        })
        .await;

    match outcome {
        RunOutcome::Collapsed(response) => {
            assert_eq!(response.error.code, maquette_domain_models::ErrorCode::InvalidInput);
        }
        other => panic!("Expected invalid input collapse, got {other:?}"),
    }
}
