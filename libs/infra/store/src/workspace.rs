// [libs/infra/store/src/workspace.rs]
/*!
 * =================================================================
 * APARATO: WORKSPACE MANAGER (V9.2 - SESSION FORGE)
 * CLASIFICACIÓN: INFRASTRUCTURE (ESTRATO L3)
 * RESPONSABILIDAD: RAÍZ DEL WORKSPACE Y FORJA DE SESIONES
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. EXPLICIT ROOT: La raíz del workspace es un parámetro explícito
 *    enhebrado por construcción; cero estado global.
 * 2. IDENTITY FORMAT: session_id = "<UTC %Y-%m-%dT%H-%M-%SZ>_<8-hex>",
 *    ordenable lexicográficamente por tiempo de creación.
 * =================================================================
 */

use chrono::Utc;
use maquette_domain_models::{SessionRequest, SessionState};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::atomic::write_json_atomic;
use crate::errors::StoreFault;
use crate::session::SessionStore;

/// Reintentos máximos por defecto de una sesión.
const DEFAULT_MAX_SESSION_RETRIES: u32 = 3;

/// Gestor de la raíz del workspace y del censo de sesiones.
#[derive(Debug, Clone)]
pub struct WorkspaceManager {
    workspace_root: PathBuf,
}

impl WorkspaceManager {
    pub fn new(workspace_root: impl Into<PathBuf>) -> Self {
        Self { workspace_root: workspace_root.into() }
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    /// Directorio censal de sesiones: `<workspace>/sessions/`.
    pub fn sessions_directory(&self) -> PathBuf {
        self.workspace_root.join("sessions")
    }

    /// Directorio del caché local de activos recuperables.
    pub fn asset_cache_directory(&self) -> PathBuf {
        self.workspace_root.join("asset_cache")
    }

    /// Forja el identificador canónico de sesión.
    pub fn forge_session_identifier() -> String {
        let utc_timestamp = Utc::now().format("%Y-%m-%dT%H-%M-%SZ");
        let unique_suffix = Uuid::new_v4().simple().to_string();
        format!("{}_{}", utc_timestamp, &unique_suffix[..8])
    }

    /// Crea una sesión nueva: directorio + request.json + status.json.
    ///
    /// # Errors:
    /// - `StoreFault::Io` si el sistema de archivos rechaza la forja.
    #[instrument(skip(self, request))]
    pub fn create_session(&self, request: &SessionRequest) -> Result<SessionStore, StoreFault> {
        let session_id = Self::forge_session_identifier();
        let session_directory = self.sessions_directory().join(&session_id);
        fs::create_dir_all(&session_directory)?;

        write_json_atomic(&session_directory.join("request.json"), request)?;
        let initial_state = SessionState::ignite(session_id.clone(), DEFAULT_MAX_SESSION_RETRIES);
        write_json_atomic(&session_directory.join("status.json"), &initial_state)?;

        info!("📂 [WORKSPACE]: Session '{}' forged.", session_id);
        Ok(SessionStore::new(session_directory, session_id))
    }

    /// Abre una sesión existente.
    ///
    /// # Errors:
    /// - `SessionNotFound` cuando el directorio no existe.
    pub fn open_session(&self, session_id: &str) -> Result<SessionStore, StoreFault> {
        let session_directory = self.sessions_directory().join(session_id);
        if !session_directory.is_dir() {
            return Err(StoreFault::SessionNotFound { session_id: session_id.to_string() });
        }
        Ok(SessionStore::new(session_directory, session_id.to_string()))
    }

    pub fn session_exists(&self, session_id: &str) -> bool {
        self.sessions_directory().join(session_id).is_dir()
    }

    /// Censo ordenado de identificadores de sesión.
    pub fn list_sessions(&self) -> Result<Vec<String>, StoreFault> {
        let sessions_directory = self.sessions_directory();
        if !sessions_directory.exists() {
            return Ok(Vec::new());
        }

        let mut roster: Vec<String> = fs::read_dir(&sessions_directory)?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_dir())
            .map(|entry| entry.file_name().to_string_lossy().to_string())
            .collect();
        roster.sort();
        Ok(roster)
    }

    /// Amputa una sesión completa del workspace.
    pub fn delete_session(&self, session_id: &str) -> Result<bool, StoreFault> {
        let session_directory = self.sessions_directory().join(session_id);
        if !session_directory.exists() {
            return Ok(false);
        }
        fs::remove_dir_all(session_directory)?;
        Ok(true)
    }
}
