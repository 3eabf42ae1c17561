/**
 * =================================================================
 * APARATO: DFS PLACEMENT TEST (V3.0)
 * CLASIFICACIÓN: TRINITY EVIDENCE (ESTRATO L2-SOLVER)
 * OBJETIVO: Certificar los escenarios canónicos de colocación: objeto
 *           único en origen, relación relativa satisfecha, inventario
 *           vacío y las invariantes de suelo y no-colisión.
 * =================================================================
 */

use maquette_core_geometry::{Aabb, Vec3};
use maquette_domain_constraints::ConstraintSet;
use maquette_domain_models::{
    ConstraintGlobals, InitialPose, RelationType, SceneObject, SolverSettings,
    SpatialConstraint,
};
use maquette_domain_solver::LayoutSolver;

fn forge_object(object_id: &str, size: Vec3, initial: Vec3) -> SceneObject {
    SceneObject {
        object_id: object_id.to_string(),
        name: object_id.to_string(),
        category: "furniture".to_string(),
        size_m: size,
        initial_pose: InitialPose { pos: initial, rot_euler: Vec3::ZERO },
        visual_desc: "A proving-grounds fixture for placement audits".to_string(),
        must_exist: true,
        material: None,
        color: None,
        tags: Vec::new(),
        asset_path: None,
    }
}

#[test]
fn certify_single_object_lands_at_grounded_origin() {
    // Escenario humo: una mesa cúbica sin restricciones.
    let table = forge_object("table_001", Vec3::new(1.0, 1.0, 0.75), Vec3::ZERO);
    let solver = LayoutSolver::with_default_settings();

    let report = solver.solve(&[table], &ConstraintSet::empty());
    assert!(report.success);
    assert_eq!(report.placements.len(), 1);

    let placement = &report.placements[0];
    assert!(placement.successful);
    assert!(placement.position.x.abs() < 1e-6);
    assert!(placement.position.y.abs() < 1e-6);
    // Regla de suelo: z = media altura.
    assert!((placement.position.z - 0.375).abs() < 1e-6);
    assert_eq!(placement.rotation, Vec3::ZERO);
    // Convención de escala uniforme por altura.
    assert!((placement.scale.x - 0.75).abs() < 1e-9);
    assert!((placement.scale.y - 0.75).abs() < 1e-9);
    assert!((placement.scale.z - 0.75).abs() < 1e-9);

    let document = report.to_document(1);
    assert_eq!(document.version, "v1");
    assert!(document.success);
    assert!(document.object_placements.contains_key("table_001"));
}

#[test]
fn certify_left_of_relation_is_honored() {
    // Dormitorio: mesita de noche a la izquierda de la cama.
    let bed = forge_object("bed_001", Vec3::new(2.0, 1.5, 0.6), Vec3::new(1.0, 0.0, 0.0));
    let nightstand =
        forge_object("nightstand_001", Vec3::new(0.5, 0.4, 0.5), Vec3::new(-1.0, 0.0, 0.0));

    let constraints = ConstraintSet::assemble(
        ConstraintGlobals::default(),
        vec![SpatialConstraint::forge(
            "c001",
            RelationType::LeftOf,
            "nightstand_001",
            "bed_001",
        )],
    )
    .unwrap();

    let report = LayoutSolver::with_default_settings().solve(&[bed, nightstand], &constraints);
    assert!(report.success, "Layout must seal: {:?}", report.error_message);

    let pose_of = |identifier: &str| {
        report
            .placements
            .iter()
            .find(|placement| placement.object_id == identifier)
            .expect("placement present")
    };

    let bed_pose = pose_of("bed_001");
    let nightstand_pose = pose_of("nightstand_001");

    // Relación relativa con amortiguación de 0.1 m.
    assert!(nightstand_pose.position.x < bed_pose.position.x - 0.1);
    // Ambos anclados al suelo.
    assert!((bed_pose.position.z - 0.3).abs() < 1e-6);
    assert!((nightstand_pose.position.z - 0.25).abs() < 1e-6);

    // Invariante de no-colisión tras inflar por la holgura global.
    let bed_box = Aabb::from_center_size(bed_pose.position, Vec3::new(2.0, 1.5, 0.6))
        .inflate(0.02);
    let nightstand_box =
        Aabb::from_center_size(nightstand_pose.position, Vec3::new(0.5, 0.4, 0.5)).inflate(0.02);
    assert!(!bed_box.intersects(&nightstand_box));
}

#[test]
fn certify_on_relation_contact_height() {
    let table = forge_object("table_001", Vec3::new(1.0, 1.0, 0.75), Vec3::ZERO);
    let lamp = forge_object("lamp_001", Vec3::new(0.2, 0.2, 0.3), Vec3::ZERO);

    let constraints = ConstraintSet::assemble(
        ConstraintGlobals::default(),
        vec![SpatialConstraint::forge("c001", RelationType::On, "lamp_001", "table_001")],
    )
    .unwrap();

    let report = LayoutSolver::with_default_settings().solve(&[table, lamp], &constraints);
    assert!(report.success, "Layout must seal: {:?}", report.error_message);

    let lamp_pose = report
        .placements
        .iter()
        .find(|placement| placement.object_id == "lamp_001")
        .unwrap();
    let table_pose = report
        .placements
        .iter()
        .find(|placement| placement.object_id == "table_001")
        .unwrap();

    // Contacto cara a cara con tolerancia de ±2 mm.
    let expected_height = table_pose.position.z + 0.375 + 0.15;
    assert!((lamp_pose.position.z - expected_height).abs() <= 0.002);
}

#[test]
fn certify_empty_inventory_yields_empty_success() {
    let report = LayoutSolver::with_default_settings().solve(&[], &ConstraintSet::empty());
    assert!(report.success);
    assert!(report.placements.is_empty());
    assert!(report.trace.is_none());
    assert!((report.metrics.constraint_satisfaction - 1.0).abs() < 1e-9);
}

#[test]
fn certify_determinism_given_same_seed() {
    let objects = vec![
        forge_object("bed_001", Vec3::new(2.0, 1.5, 0.6), Vec3::new(1.0, 1.0, 0.0)),
        forge_object("rug_001", Vec3::new(1.2, 0.8, 0.02), Vec3::new(-1.5, -1.5, 0.0)),
    ];
    let settings = SolverSettings { random_seed: Some(0xFEED), ..SolverSettings::default() };

    let first_report = LayoutSolver::new(settings.clone()).solve(&objects, &ConstraintSet::empty());
    let second_report = LayoutSolver::new(settings).solve(&objects, &ConstraintSet::empty());

    assert!(first_report.success && second_report.success);
    for (first, second) in first_report.placements.iter().zip(&second_report.placements) {
        assert_eq!(first.object_id, second.object_id);
        assert_eq!(first.position, second.position);
        assert_eq!(first.rotation, second.rotation);
    }
}
