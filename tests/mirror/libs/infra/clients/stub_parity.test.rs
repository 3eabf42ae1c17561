/**
 * =================================================================
 * APARATO: STUB PARITY TEST (V2.0)
 * CLASIFICACIÓN: TRINITY EVIDENCE (ESTRATO L3-CLIENTS)
 * OBJETIVO: Certificar que los dobles deterministas honran la ley de
 *           longitud y orden, y emiten cabeceras estructuralmente
 *           válidas (PNG / glTF-binary).
 * =================================================================
 */

use maquette_core_geometry::Vec3;
use maquette_domain_models::{InitialPose, MeshFormat, SceneObject};
use maquette_infra_clients::stubs::{GLB_SIGNATURE, PNG_SIGNATURE};
use maquette_infra_clients::{ImageClient, StubImageClient, StubThreeDClient, ThreeDClient};

fn forge_object(object_id: &str) -> SceneObject {
    SceneObject {
        object_id: object_id.to_string(),
        name: object_id.to_string(),
        category: "furniture".to_string(),
        size_m: Vec3::new(1.0, 1.0, 1.0),
        initial_pose: InitialPose::default(),
        visual_desc: "A proving-grounds fixture for stub audits".to_string(),
        must_exist: true,
        material: None,
        color: None,
        tags: Vec::new(),
        asset_path: None,
    }
}

#[tokio::test]
async fn certify_card_length_and_order_law() {
    let stub = StubImageClient::instant();
    let objects: Vec<SceneObject> =
        (0..5).map(|index| forge_object(&format!("piece_{index:03}"))).collect();

    let cards = stub
        .generate_object_cards("session_probe", &objects, &PNG_SIGNATURE)
        .await
        .expect("Stub must yield cards.");

    // MISMA longitud y MISMO orden que la entrada.
    assert_eq!(cards.len(), objects.len());
    for (object, card) in objects.iter().zip(&cards) {
        assert_eq!(card.object_id, object.object_id);
        assert!(card.card_bytes.starts_with(&PNG_SIGNATURE));
        assert!(!card.prompt_used.is_empty());
    }
}

#[tokio::test]
async fn certify_scene_reference_magic_bytes() {
    let stub = StubImageClient::instant();
    let reference = stub
        .generate_scene_reference("session_probe", "An empty room", "modern")
        .await
        .unwrap();

    assert!(reference.image_bytes.starts_with(&PNG_SIGNATURE));
    assert!(reference.prompt_used.contains("modern"));
}

#[tokio::test]
async fn certify_mesh_yield_structure() {
    let stub = StubThreeDClient::healthy();
    let mesh = stub
        .generate_from_card("table_001", &PNG_SIGNATURE, [1.0, 1.0, 0.75])
        .await
        .unwrap();

    assert!(mesh.mesh_bytes.starts_with(&GLB_SIGNATURE));
    assert_eq!(mesh.format, MeshFormat::Glb);
    assert!(mesh.metadata.contains_key("vertices"));
    assert!(mesh.metadata.contains_key("materials"));
}

#[tokio::test]
async fn certify_failing_stub_is_relentless() {
    use maquette_infra_clients::ServiceFault;

    let stub = StubThreeDClient::always_failing(ServiceFault::Transport("canned".into()));
    for _ in 0..3 {
        let verdict = stub.generate_from_description("x", "desc", "modern").await;
        assert!(matches!(verdict, Err(ServiceFault::Transport(_))));
    }
}
