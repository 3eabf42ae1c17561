/**
 * =================================================================
 * APARATO: CONSTRAINT REGENERATION TEST (V3.0)
 * CLASIFICACIÓN: TRINITY EVIDENCE (ESTRATO L2-CONSTRAINTS)
 * OBJETIVO: Certificar las estrategias relax/remove guiadas por el
 *           rastro DFS y la neutralidad semántica del delta vacío.
 * =================================================================
 */

use maquette_domain_constraints::{
    regenerate_from_trace, ConstraintSet, RegenerationStrategy,
};
use maquette_domain_models::{
    ConflictType, ConstraintGlobals, ConstraintPriority, DfsTrace, RelationType,
    SpatialConstraint,
};

fn forge(relation: RelationType, source: &str, target: &str) -> SpatialConstraint {
    SpatialConstraint::forge(format!("{source}:{target}"), relation, source, target)
}

fn forge_trace(failed_object: &str) -> DfsTrace {
    DfsTrace {
        failed_object_id: failed_object.to_string(),
        placed_objects: vec!["bed_001".to_string(), "nightstand_001".to_string()],
        conflict_type: ConflictType::Constraint,
        active_constraints: Vec::new(),
        candidates_tried: 100,
        search_space_size: 441,
        best_candidate_score: 0.5,
        traceback_depth: 2,
        time_at_failure: 1.2,
        natural_language_summary: "Feasible region collapsed under active constraints".to_string(),
        fix_suggestions: vec!["Relax conflicting constraints (strategy=relax)".to_string()],
    }
}

fn forge_base_set() -> ConstraintSet {
    ConstraintSet::assemble(
        ConstraintGlobals::default(),
        vec![
            forge(RelationType::Adjacent, "lamp_001", "bed_001"),
            forge(RelationType::On, "lamp_001", "nightstand_001"),
            forge(RelationType::LeftOf, "nightstand_001", "bed_001"),
        ],
    )
    .unwrap()
}

#[test]
fn certify_relax_demotes_to_secondary_soft() {
    let relaxed = regenerate_from_trace(
        &forge_base_set(),
        &forge_trace("lamp_001"),
        RegenerationStrategy::Relax,
    )
    .unwrap();

    // Cardinalidad intacta: relax jamás amputa.
    assert_eq!(relaxed.len(), 3);

    for constraint in relaxed.relations() {
        let names_failed_object =
            constraint.source == "lamp_001" || constraint.target == "lamp_001";
        if names_failed_object {
            assert_eq!(constraint.priority, ConstraintPriority::Secondary);
            assert!(constraint.is_soft);
        } else {
            assert_eq!(constraint.priority, ConstraintPriority::Primary);
            assert!(!constraint.is_soft);
        }
    }
}

#[test]
fn certify_remove_amputates_only_named_constraints() {
    let pruned = regenerate_from_trace(
        &forge_base_set(),
        &forge_trace("lamp_001"),
        RegenerationStrategy::Remove,
    )
    .unwrap();

    assert_eq!(pruned.len(), 1);
    assert_eq!(pruned.relations()[0].source, "nightstand_001");
}

#[test]
fn certify_empty_delta_is_semantically_neutral() {
    // constraints_v{n} + delta_apply({}, {}) == contenido de v{n}.
    let original = forge_base_set();
    let reissued = original.delta_apply(Vec::new(), &[]).unwrap();

    assert_eq!(reissued.relations(), original.relations());
    assert_eq!(reissued.globals(), original.globals());
}

#[test]
fn certify_document_roundtrip_preserves_regenerated_set() {
    let relaxed = regenerate_from_trace(
        &forge_base_set(),
        &forge_trace("lamp_001"),
        RegenerationStrategy::Relax,
    )
    .unwrap();

    let document = relaxed.to_document(2);
    assert_eq!(document.version, 2);

    let rehydrated = ConstraintSet::from_document(document).unwrap();
    assert_eq!(rehydrated, relaxed);
}
