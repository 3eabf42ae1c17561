/**
 * =================================================================
 * APARATO: RETRIEVAL ENGINE TEST (V4.0)
 * CLASIFICACIÓN: TRINITY EVIDENCE (ESTRATO L4-CONDUCTOR)
 * OBJETIVO: Certificar el triaje recuperar-vs-generar y la búsqueda
 *           por solapamiento de tokens sobre el caché local.
 * =================================================================
 */

use maquette_conductor_lib::retrieval::{AssetDecisionEngine, LocalAssetRetriever};
use tempfile::TempDir;

#[test]
fn certify_generation_necessity_triage() {
    let engine = AssetDecisionEngine;

    // Léxico genérico: cae bajo el umbral por defecto de 0.5.
    let generic_score = engine.evaluate("A simple standard oak chair, very common");
    assert!(generic_score < 0.5);

    // Léxico singular: sube por encima del umbral.
    let singular_score = engine.evaluate("A custom cyberpunk hovering throne, unique piece");
    assert!(singular_score > 0.5);

    // Sin léxico: puntuación neutral exacta.
    let neutral_score = engine.evaluate("A chair");
    assert!((neutral_score - 0.5).abs() < 1e-9);

    // Saturación acotada a [0, 1].
    assert!(engine
        .evaluate("custom unique special cyberpunk steampunk futuristic sci-fi artistic handmade vintage antique")
        <= 1.0);
}

#[test]
fn certify_cache_search_by_token_overlap() {
    let cache_directory = TempDir::new().unwrap();

    // Índice con dos activos y un archivo real para el primero.
    std::fs::write(cache_directory.path().join("oak_chair.glb"), b"glTF-probe").unwrap();
    std::fs::write(
        cache_directory.path().join("index.json"),
        serde_json::json!({
            "assets": [
                { "path": "oak_chair.glb", "description": "simple oak wooden chair with armrests" },
                { "path": "missing_sofa.glb", "description": "long velvet sofa with cushions" }
            ]
        })
        .to_string(),
    )
    .unwrap();

    let retriever = LocalAssetRetriever::hydrate(cache_directory.path());

    // Solapamiento fuerte: la silla de roble gana.
    let found = retriever
        .search("a simple wooden chair in oak finish")
        .expect("Overlapping description must retrieve the cached chair.");
    assert!(found.path.ends_with("oak_chair.glb"));
    assert!(found.similarity > 0.25);

    // El activo indexado pero ausente en disco jamás se retorna.
    assert!(retriever.search("long velvet sofa with cushions").is_none());

    // Sin solapamiento: sin resultado.
    assert!(retriever.search("holographic dragon statue").is_none());
}

#[test]
fn certify_corrupted_index_degrades_gracefully() {
    let cache_directory = TempDir::new().unwrap();
    std::fs::write(cache_directory.path().join("index.json"), b"{ not json").unwrap();

    let retriever = LocalAssetRetriever::hydrate(cache_directory.path());
    assert!(retriever.search("anything at all").is_none());
}
