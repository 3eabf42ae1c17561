// [apps/conductor/src/retrieval.rs]
/*!
 * =================================================================
 * APARATO: ASSET RETRIEVAL ENGINE (V12.3 - GENERATION TRIAGE)
 * CLASIFICACIÓN: APPLICATION LAYER (ESTRATO L4-APP)
 * RESPONSABILIDAD: DECISIÓN RECUPERAR-VS-GENERAR Y BÚSQUEDA LOCAL
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. RULE-BASED TRIAGE: La necesidad de generación se puntúa con
 *    léxico de unicidad (custom, cyberpunk, vintage...) contra léxico
 *    de genericidad (standard, simple, basic...); descripciones
 *    genéricas caen bajo el umbral y se intentan recuperar del caché.
 * 2. TOKEN OVERLAP SEARCH: La búsqueda local usa solapamiento de
 *    tokens (Jaccard) sobre el índice del caché; sin dependencias de
 *    modelos de embedding en el núcleo.
 * =================================================================
 */

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Léxico que sube la necesidad de generación (objetos singulares).
const HIGH_NECESSITY_LEXICON: &[&str] = &[
    "custom", "unique", "special", "cyberpunk", "steampunk", "futuristic",
    "sci-fi", "artistic", "handmade", "vintage", "antique",
];

/// Léxico que baja la necesidad de generación (objetos genéricos).
const LOW_NECESSITY_LEXICON: &[&str] = &[
    "ordinary", "standard", "common", "simple", "basic", "generic",
];

/// Umbral mínimo de solapamiento para aceptar un activo del caché.
const MIN_SIMILARITY_OVERLAP: f64 = 0.25;

/// Motor de triaje: ¿este objeto amerita generación o basta recuperar?
#[derive(Debug, Default)]
pub struct AssetDecisionEngine;

impl AssetDecisionEngine {
    /// Puntúa la necesidad de generación en [0, 1].
    pub fn evaluate(&self, object_description: &str) -> f64 {
        let normalized = object_description.to_ascii_lowercase();
        let mut necessity_score: f64 = 0.5;

        for keyword in HIGH_NECESSITY_LEXICON {
            if normalized.contains(keyword) {
                necessity_score += 0.15;
            }
        }
        for keyword in LOW_NECESSITY_LEXICON {
            if normalized.contains(keyword) {
                necessity_score -= 0.15;
            }
        }

        necessity_score.clamp(0.0, 1.0)
    }
}

/// Entrada del índice del caché local de activos.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheIndexEntry {
    pub path: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct CacheIndexDocument {
    #[serde(default)]
    assets: Vec<CacheIndexEntry>,
}

/// Activo recuperado del caché local.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievedAsset {
    pub path: PathBuf,
    pub similarity: f64,
}

/// Buscador local sobre el índice del caché de activos.
#[derive(Debug)]
pub struct LocalAssetRetriever {
    cache_directory: PathBuf,
    index: Vec<CacheIndexEntry>,
}

impl LocalAssetRetriever {
    /// Hidrata el índice desde `<cache>/index.json`; tolera su ausencia.
    pub fn hydrate(cache_directory: &Path) -> Self {
        let index_path = cache_directory.join("index.json");
        let index = match std::fs::read(&index_path) {
            Ok(raw_bytes) => match serde_json::from_slice::<CacheIndexDocument>(&raw_bytes) {
                Ok(document) => document.assets,
                Err(decode_fault) => {
                    warn!("🗂️ [RETRIEVAL]: Cache index corrupted, ignoring: {}", decode_fault);
                    Vec::new()
                }
            },
            Err(_) => Vec::new(),
        };

        debug!("🗂️ [RETRIEVAL]: Cache index hydrated with {} assets.", index.len());
        Self { cache_directory: cache_directory.to_path_buf(), index }
    }

    /// Busca el activo con mayor solapamiento de tokens sobre el umbral.
    pub fn search(&self, object_description: &str) -> Option<RetrievedAsset> {
        let query_tokens = tokenize(object_description);
        if query_tokens.is_empty() {
            return None;
        }

        let mut best_match: Option<RetrievedAsset> = None;
        for entry in &self.index {
            let entry_tokens = tokenize(&entry.description);
            if entry_tokens.is_empty() {
                continue;
            }

            let intersection = query_tokens.intersection(&entry_tokens).count() as f64;
            let union = query_tokens.union(&entry_tokens).count() as f64;
            let similarity = intersection / union;

            if similarity < MIN_SIMILARITY_OVERLAP {
                continue;
            }

            let candidate_path = self.cache_directory.join(&entry.path);
            if !candidate_path.is_file() {
                continue;
            }

            let improves = best_match
                .as_ref()
                .map(|current| similarity > current.similarity)
                .unwrap_or(true);
            if improves {
                best_match = Some(RetrievedAsset { path: candidate_path, similarity });
            }
        }

        best_match
    }
}

fn tokenize(text: &str) -> HashSet<String> {
    text.to_ascii_lowercase()
        .split(|character: char| !character.is_ascii_alphanumeric())
        .filter(|token| token.len() > 2)
        .map(str::to_string)
        .collect()
}
