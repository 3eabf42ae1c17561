/**
 * =================================================================
 * APARATO: CONSTRAINT SET VALIDATION TEST (V3.0)
 * CLASIFICACIÓN: TRINITY EVIDENCE (ESTRATO L2-CONSTRAINTS)
 * OBJETIVO: Certificar la puerta de construcción: auto-referencia,
 *           tripletas duplicadas y topes de umbral por categoría.
 * =================================================================
 */

use maquette_domain_constraints::ConstraintSet;
use maquette_domain_models::{
    ConstraintGlobals, RelationType, SpatialConstraint, ValidationFault,
};
use proptest::prelude::*;

fn forge(relation: RelationType, source: &str, target: &str) -> SpatialConstraint {
    SpatialConstraint::forge(format!("{source}:{target}:{relation:?}"), relation, source, target)
}

#[test]
fn certify_self_reference_rejection() {
    let narcissist = forge(RelationType::Near, "mirror_001", "mirror_001");
    let verdict = ConstraintSet::assemble(ConstraintGlobals::default(), vec![narcissist]);
    assert!(matches!(verdict, Err(ValidationFault::SelfReferentialConstraint { .. })));
}

#[test]
fn certify_duplicate_triple_rejection() {
    let relations = vec![
        forge(RelationType::LeftOf, "nightstand_001", "bed_001"),
        forge(RelationType::LeftOf, "nightstand_001", "bed_001"),
    ];
    let verdict = ConstraintSet::assemble(ConstraintGlobals::default(), relations);
    assert!(matches!(verdict, Err(ValidationFault::DuplicateConstraint { .. })));
}

#[test]
fn certify_same_pair_different_relation_is_legal() {
    let relations = vec![
        forge(RelationType::LeftOf, "nightstand_001", "bed_001"),
        forge(RelationType::Near, "nightstand_001", "bed_001"),
    ];
    assert!(ConstraintSet::assemble(ConstraintGlobals::default(), relations).is_ok());
}

#[test]
fn certify_category_threshold_caps() {
    // near no admite umbral por encima de 2.0 m.
    let mut too_near = forge(RelationType::Near, "lamp_001", "bed_001");
    too_near.threshold_m = Some(2.5);
    assert!(matches!(
        ConstraintSet::assemble(ConstraintGlobals::default(), vec![too_near]),
        Err(ValidationFault::ThresholdOutOfRange { .. })
    ));

    // far no admite umbral por debajo de 8.0 m.
    let mut too_far = forge(RelationType::Far, "sofa_001", "tv_001");
    too_far.threshold_m = Some(5.0);
    assert!(matches!(
        ConstraintSet::assemble(ConstraintGlobals::default(), vec![too_far]),
        Err(ValidationFault::ThresholdOutOfRange { .. })
    ));

    // adjacent no admite umbral por encima de 0.5 m.
    let mut too_adjacent = forge(RelationType::Adjacent, "chair_001", "desk_001");
    too_adjacent.threshold_m = Some(0.75);
    assert!(matches!(
        ConstraintSet::assemble(ConstraintGlobals::default(), vec![too_adjacent]),
        Err(ValidationFault::ThresholdOutOfRange { .. })
    ));
}

#[test]
fn certify_query_surface() {
    let mut soft_secondary = forge(RelationType::Near, "lamp_001", "bed_001");
    soft_secondary.priority = maquette_domain_models::ConstraintPriority::Secondary;
    soft_secondary.is_soft = true;

    let assembled = ConstraintSet::assemble(
        ConstraintGlobals::default(),
        vec![forge(RelationType::LeftOf, "nightstand_001", "bed_001"), soft_secondary],
    )
    .unwrap();

    assert_eq!(assembled.primary().len(), 1);
    assert_eq!(assembled.secondary().len(), 1);
    assert_eq!(assembled.for_object("bed_001").len(), 2);
    assert_eq!(assembled.for_object("lamp_001").len(), 1);
    assert!(!assembled.has_cycles());
}

proptest! {
    /**
     * LEY DE UMBRAL: cualquier umbral near legal (0, 2.0] sobrevive y
     * cualquier umbral por encima del tope colapsa.
     */
    #[test]
    fn certify_near_threshold_law(threshold in 0.01f64..4.0) {
        let mut constraint = forge(RelationType::Near, "a_001", "b_001");
        constraint.threshold_m = Some(threshold);
        let verdict = ConstraintSet::assemble(ConstraintGlobals::default(), vec![constraint]);
        if threshold <= 2.0 {
            prop_assert!(verdict.is_ok());
        } else {
            let is_threshold_out_of_range = matches!(verdict, Err(ValidationFault::ThresholdOutOfRange { .. }));
            prop_assert!(is_threshold_out_of_range);
        }
    }
}
