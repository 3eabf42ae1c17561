/**
 * =================================================================
 * APARATO: SCENE OBJECT VALIDATION TEST (V3.0)
 * CLASIFICACIÓN: TRINITY EVIDENCE (ESTRATO L2-MODELS)
 * OBJETIVO: Certificar las barandillas métricas del inventario:
 *           tamaño mínimo, unicidad de ids y normalización de ángulos.
 * =================================================================
 */

use maquette_core_geometry::Vec3;
use maquette_domain_models::{InitialPose, SceneData, SceneObject, ValidationFault};

fn forge_object(object_id: &str, size: Vec3) -> SceneObject {
    SceneObject {
        object_id: object_id.to_string(),
        name: object_id.to_string(),
        category: "furniture".to_string(),
        size_m: size,
        initial_pose: InitialPose::default(),
        visual_desc: "A proving-grounds fixture for validation audits".to_string(),
        must_exist: true,
        material: None,
        color: None,
        tags: Vec::new(),
        asset_path: None,
    }
}

#[test]
fn certify_sub_centimeter_axis_is_rejected() {
    let sliver = forge_object("sliver_001", Vec3::new(1.0, 0.009, 1.0));
    let verdict = sliver.validate();
    assert!(
        matches!(verdict, Err(ValidationFault::ObjectTooSmall { .. })),
        "Any axis under 0.01 m must raise invalid input."
    );
}

#[test]
fn certify_no_upper_size_bound() {
    let monument = forge_object("monument_001", Vec3::new(50.0, 50.0, 50.0));
    assert!(monument.validate().is_ok(), "Real-world scale carries no upper bound.");
}

#[test]
fn certify_duplicate_identifiers_are_rejected() {
    let mut inventory = SceneData {
        scene_style: "modern".to_string(),
        objects: vec![
            forge_object("chair_001", Vec3::new(0.5, 0.5, 0.9)),
            forge_object("chair_001", Vec3::new(0.5, 0.5, 0.9)),
        ],
    };

    let verdict = inventory.sanitize_and_validate();
    assert!(matches!(
        verdict,
        Err(ValidationFault::DuplicateObjectIdentifier { .. })
    ));
}

#[test]
fn certify_rotation_normalization_to_canonical_range() {
    let mut spun = forge_object("spun_001", Vec3::new(1.0, 1.0, 1.0));
    spun.initial_pose.rot_euler = Vec3::new(-90.0, 720.0, 450.0);
    spun.sanitize();

    assert!((spun.initial_pose.rot_euler.x - 270.0).abs() < 1e-9);
    assert!((spun.initial_pose.rot_euler.y - 0.0).abs() < 1e-9);
    assert!((spun.initial_pose.rot_euler.z - 90.0).abs() < 1e-9);
}

#[test]
fn certify_scene_complexity_guardrail() {
    let mut crowded = SceneData {
        scene_style: "warehouse".to_string(),
        objects: (0..26)
            .map(|index| forge_object(&format!("crate_{index:03}"), Vec3::new(0.5, 0.5, 0.5)))
            .collect(),
    };

    let verdict = crowded.sanitize_and_validate();
    assert!(matches!(
        verdict,
        Err(ValidationFault::SceneComplexityExceeded { count: 26, maximum: 25 })
    ));
}

#[test]
fn certify_ground_anchor_height() {
    let table = forge_object("table_001", Vec3::new(1.0, 1.0, 0.75));
    assert!((table.ground_anchor_height() - 0.375).abs() < 1e-9);
}
