/**
 * =================================================================
 * APARATO: SESSION LIFECYCLE TEST (V2.0)
 * CLASIFICACIÓN: TRINITY EVIDENCE (ESTRATO L3-STORE)
 * OBJETIVO: Certificar la forja de sesiones, el formato de identidad,
 *           la contabilidad de reintentos y las notas de snapshot.
 * =================================================================
 */

use maquette_domain_models::{RequestConstraints, SessionRequest, SessionStatus};
use maquette_infra_store::{StoreFault, WorkspaceManager};
use tempfile::TempDir;

fn forge_request() -> SessionRequest {
    SessionRequest {
        text: "A cozy reading corner with an armchair".to_string(),
        style: Some("scandinavian".to_string()),
        constraints: RequestConstraints { max_objects: Some(10), room_size_hint: Some([6.0, 4.0, 3.0]) },
    }
}

#[test]
fn certify_session_identity_format() {
    // "<YYYY-MM-DDTHH-MM-SSZ>_<8-hex>": ordenable y única.
    let identifier = WorkspaceManager::forge_session_identifier();
    let (timestamp_part, hex_part) = identifier
        .rsplit_once('_')
        .expect("Identity must carry the underscore separator.");

    assert_eq!(timestamp_part.len(), "2026-08-01T10-00-00Z".len());
    assert!(timestamp_part.ends_with('Z'));
    assert_eq!(hex_part.len(), 8);
    assert!(hex_part.chars().all(|character| character.is_ascii_hexdigit()));
}

#[test]
fn certify_session_forge_and_reload() {
    let ephemeral_workspace = TempDir::new().unwrap();
    let workspace = WorkspaceManager::new(ephemeral_workspace.path());

    let store = workspace.create_session(&forge_request()).unwrap();

    // request.json inmutable y status.json inicial presentes.
    let reloaded_request = store.load_request().unwrap();
    assert_eq!(reloaded_request, forge_request());

    let state = store.load_state().unwrap();
    assert_eq!(state.status, SessionStatus::Init);
    assert_eq!(state.retry_count, 0);
    assert_eq!(state.max_retries, 3);

    // El censo de sesiones observa la nueva sesión.
    let roster = workspace.list_sessions().unwrap();
    assert_eq!(roster, vec![store.session_id().to_string()]);
    assert!(workspace.session_exists(store.session_id()));
}

#[test]
fn certify_unknown_session_is_reported() {
    let ephemeral_workspace = TempDir::new().unwrap();
    let workspace = WorkspaceManager::new(ephemeral_workspace.path());

    let verdict = workspace.open_session("2026-01-01T00-00-00Z_deadbeef");
    assert!(matches!(verdict, Err(StoreFault::SessionNotFound { .. })));
}

#[test]
fn certify_retry_accounting_and_error_trail() {
    let ephemeral_workspace = TempDir::new().unwrap();
    let workspace = WorkspaceManager::new(ephemeral_workspace.path());
    let store = workspace.create_session(&forge_request()).unwrap();

    store
        .update_status(SessionStatus::Failed, Some("layout"), 60.0)
        .unwrap();
    store
        .add_error(Some("layout"), "solver_no_solution", "Budget exhausted")
        .unwrap();

    let failed_state = store.load_state().unwrap();
    assert!(failed_state.can_retry());
    assert_eq!(failed_state.error_history.len(), 1);
    assert_eq!(failed_state.error_history[0].code, "solver_no_solution");

    // Reintento: consume presupuesto y re-arma en INIT.
    let rearmed_state = store.increment_retry().unwrap();
    assert_eq!(rearmed_state.retry_count, 1);
    assert_eq!(rearmed_state.status, SessionStatus::Init);

    // Agotar el presupuesto sella la reanudación.
    for _ in 0..2 {
        store.update_status(SessionStatus::Failed, None, 0.0).unwrap();
        store.increment_retry().unwrap();
    }
    store.update_status(SessionStatus::Failed, None, 0.0).unwrap();
    let exhausted_state = store.load_state().unwrap();
    assert_eq!(exhausted_state.retry_count, 3);
    assert!(!exhausted_state.can_retry());
}

#[test]
fn certify_snapshot_notes_accumulate_without_copying() {
    let ephemeral_workspace = TempDir::new().unwrap();
    let workspace = WorkspaceManager::new(ephemeral_workspace.path());
    let store = workspace.create_session(&forge_request()).unwrap();

    let first_snapshot = store.snapshot("before relaxation").unwrap();
    let second_snapshot = store.snapshot("after relaxation").unwrap();
    assert!(first_snapshot.starts_with("snapshot_"));

    let state = store.load_state().unwrap();
    assert_eq!(state.snapshots.len(), 2);
    assert_eq!(state.snapshots[0].note, "before relaxation");
    assert_eq!(state.snapshots[1].note, "after relaxation");
    let _ = second_snapshot;

    // La nota NO copia artefactos: el directorio solo porta los json base.
    let entries: Vec<String> = std::fs::read_dir(store.session_directory())
        .unwrap()
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().to_string())
        .collect();
    assert!(entries.iter().all(|name| name == "request.json" || name == "status.json"));
}
