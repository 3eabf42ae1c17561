// [libs/infra/store/src/atomic.rs]
/*!
 * =================================================================
 * APARATO: ATOMIC WRITE ENGINE (V9.1 - RENAME SEAL)
 * CLASIFICACIÓN: INFRASTRUCTURE (ESTRATO L3)
 * RESPONSABILIDAD: ESCRITURAS ATÓMICAS POR ARCHIVO
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. SAME-DIRECTORY TEMP: El archivo temporal nace en el MISMO
 *    directorio que el destino; el rename final es atómico dentro del
 *    mismo sistema de archivos.
 * 2. NO PARTIAL ARTIFACTS: Un lector concurrente observa el artefacto
 *    completo anterior o el completo nuevo, jamás un intermedio.
 * =================================================================
 */

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::Path;
use uuid::Uuid;

use crate::errors::StoreFault;

/// Escribe bytes de forma atómica: temp en el mismo directorio + rename.
pub fn write_bytes_atomic(destination: &Path, payload: &[u8]) -> Result<(), StoreFault> {
    let parent_directory = destination
        .parent()
        .ok_or_else(|| StoreFault::ArtifactMissing {
            artifact: destination.display().to_string(),
        })?;
    fs::create_dir_all(parent_directory)?;

    let temp_filename = format!(
        ".{}.tmp-{}",
        destination
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| "artifact".to_string()),
        Uuid::new_v4().simple()
    );
    let temp_path = parent_directory.join(temp_filename);

    fs::write(&temp_path, payload)?;
    fs::rename(&temp_path, destination)?;
    Ok(())
}

/// Serializa a JSON bonito (indentación 2) y escribe atómicamente.
pub fn write_json_atomic<T: Serialize>(destination: &Path, value: &T) -> Result<(), StoreFault> {
    let serialized = serde_json::to_vec_pretty(value).map_err(|serde_fault| {
        StoreFault::Corrupted {
            artifact: destination.display().to_string(),
            detail: serde_fault.to_string(),
        }
    })?;
    write_bytes_atomic(destination, &serialized)
}

/// Lee y deserializa un artefacto JSON persistido.
pub fn read_json<T: DeserializeOwned>(source: &Path) -> Result<T, StoreFault> {
    let raw_bytes = fs::read(source).map_err(|io_fault| {
        if io_fault.kind() == std::io::ErrorKind::NotFound {
            StoreFault::ArtifactMissing { artifact: source.display().to_string() }
        } else {
            StoreFault::Io(io_fault)
        }
    })?;
    serde_json::from_slice(&raw_bytes).map_err(|serde_fault| StoreFault::Corrupted {
        artifact: source.display().to_string(),
        detail: serde_fault.to_string(),
    })
}

/// Presencia y no-vaciedad de un archivo.
pub fn file_ready(path: &Path) -> bool {
    fs::metadata(path)
        .map(|metadata| metadata.is_file() && metadata.len() > 0)
        .unwrap_or(false)
}

/// Presencia y no-vaciedad de un directorio.
pub fn directory_ready(path: &Path) -> bool {
    path.is_dir()
        && fs::read_dir(path)
            .map(|mut entries| entries.next().is_some())
            .unwrap_or(false)
}
