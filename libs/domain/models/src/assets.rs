// [libs/domain/models/src/assets.rs]
/*!
 * =================================================================
 * APARATO: ASSET MANIFEST MODELS (V14.4 - CHECKSUM SEAL)
 * CLASIFICACIÓN: DOMAIN MODELS (ESTRATO L2)
 * RESPONSABILIDAD: CONTRATOS DE ACTIVOS 3D Y PAQUETE DE ENSAMBLAJE
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. INTEGRITY SEAL: Cada activo porta checksum 'sha256:<hex>' y tamaño
 *    en bytes; el manifiesto agrega totales para auditoría rápida.
 * 2. IDENTITY MAPPING: El host de ensamblaje nombra los objetos con su
 *    object_id textual; el mapa de nombres es la función identidad por
 *    convención del protocolo.
 * 3. PARTIAL TOLERANCE: Las entradas fallidas permanecen en el
 *    manifiesto con su código de error; un fallo por activo no sella la
 *    etapa completa.
 * =================================================================
 */

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Formatos de malla reconocidos por el protocolo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeshFormat {
    Glb,
    Gltf,
    Fbx,
    Obj,
}

/// Entrada individual del manifiesto de activos.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetRecord {
    /// Ruta relativa al directorio de sesión.
    pub asset_path: String,
    pub format: MeshFormat,
    pub size_bytes: u64,
    /// Sello de integridad con prefijo de algoritmo: "sha256:<hex>".
    pub checksum: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, serde_json::Value>,
    /// Origen del activo: "generated" o "retrieved".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Código de error cuando la generación del activo falló.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Manifiesto completo (`asset_manifest.json`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetManifest {
    pub version: String,
    pub assets: BTreeMap<String, AssetRecord>,
    pub total_assets: u64,
    pub total_size_mb: f64,
}

impl AssetManifest {
    /// Cristaliza el manifiesto a partir de las entradas por objeto.
    pub fn crystallize(assets: BTreeMap<String, AssetRecord>) -> Self {
        let total_bytes: u64 = assets.values().map(|record| record.size_bytes).sum();
        let successful_count = assets.values().filter(|record| record.error.is_none()).count() as u64;
        Self {
            version: "v1".to_string(),
            total_assets: successful_count,
            total_size_mb: (total_bytes as f64 / (1024.0 * 1024.0) * 100.0).round() / 100.0,
            assets,
        }
    }
}

/// Registro de una tarjeta de referencia de objeto generada.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectCardRecord {
    pub object_id: String,
    /// Ruta relativa bajo `object_cards/`.
    pub card_path: String,
    pub prompt_used: String,
}

/// Mapa de nombres para el host (`blender_object_map.json`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssemblyObjectMap {
    pub naming_convention: String,
    pub mapping: BTreeMap<String, String>,
}

impl AssemblyObjectMap {
    /// Convención del protocolo: el nombre del host ES el object_id.
    pub fn identity(object_identifiers: impl IntoIterator<Item = String>) -> Self {
        let mapping = object_identifiers
            .into_iter()
            .map(|identifier| (identifier.clone(), identifier))
            .collect();
        Self {
            naming_convention: "object_name_equals_id".to_string(),
            mapping,
        }
    }
}
