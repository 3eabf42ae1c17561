/**
 * =================================================================
 * APARATO: RESUME SKIP TEST (V4.0)
 * CLASIFICACIÓN: TRINITY EVIDENCE (ESTRATO L4-CONDUCTOR)
 * OBJETIVO: Certificar la reanudación por presencia: re-ejecutar una
 *           sesión completada no toca ningún artefacto y reporta el
 *           censo completo de etapas.
 * =================================================================
 */

use maquette_conductor_lib::bootstrap::{assemble_runner, ClientRoster};
use maquette_conductor_lib::runner::{RunOutcome, RunRequest};
use maquette_conductor_lib::settings::ConductorSettings;
use maquette_core_dispatch::DispatchConfig;
use maquette_infra_store::WorkspaceManager;
use std::time::SystemTime;
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

fn artifact_mtimes(store: &maquette_infra_store::SessionStore) -> Vec<(String, SystemTime)> {
    let watched = [
        "scene_ref.png",
        "objects.json",
        "constraints_v1.json",
        "layout_solution_v1.json",
        "asset_manifest.json",
        "blender_object_map.json",
    ];
    watched
        .iter()
        .map(|artifact| {
            let modified = std::fs::metadata(store.session_directory().join(artifact))
                .and_then(|metadata| metadata.modified())
                .expect("watched artifact present");
            (artifact.to_string(), modified)
        })
        .collect()
}

#[tokio::test]
async fn certify_rerun_of_completed_session_is_pure_probe() {
    let ephemeral_workspace = TempDir::new().unwrap();
    let runner = assemble_runner(
        ephemeral_workspace.path(),
        fast_settings(),
        ClientRoster::offline_demo(),
    );

    // PRIMERA PASADA: pipeline completo.
    let first_outcome = runner
        .run(RunRequest {
            text: "An empty room with one cube table".to_string(),
            style: Some("modern".to_string()),
            ..RunRequest::default()
        })
        .await;
    let first_response = match first_outcome {
        RunOutcome::Success(response) => response,
        other => panic!("First pass must seal: {other:?}"),
    };

    let workspace = WorkspaceManager::new(ephemeral_workspace.path());
    let store = workspace.open_session(&first_response.session_id).unwrap();
    let mtimes_before = artifact_mtimes(&store);

    // SEGUNDA PASADA: misma sesión, entradas intactas.
    let second_outcome = runner
        .run(RunRequest {
            text: "An empty room with one cube table".to_string(),
            style: Some("modern".to_string()),
            session_id: Some(first_response.session_id.clone()),
            ..RunRequest::default()
        })
        .await;
    let second_response = match second_outcome {
        RunOutcome::Success(response) => response,
        other => panic!("Resume pass must seal: {other:?}"),
    };

    // Censo completo de etapas, todas certificadas por presencia.
    assert_eq!(
        second_response.stages_completed,
        vec![
            "session", "scene_ref", "extract", "cards", "constraints", "layout", "assets",
            "assemble"
        ]
    );

    // Ningún artefacto re-escrito: timestamps bit-idénticos.
    let mtimes_after = artifact_mtimes(&store);
    assert_eq!(mtimes_before, mtimes_after, "Presence-driven skip must not rewrite artifacts.");

    // Sin versiones nuevas: v1 sigue siendo la única solución.
    assert_eq!(
        store.latest_version(maquette_infra_store::session::LAYOUT_PREFIX).unwrap(),
        Some(1)
    );
    assert_eq!(
        store.latest_version(maquette_infra_store::session::CONSTRAINTS_PREFIX).unwrap(),
        Some(1)
    );
}
