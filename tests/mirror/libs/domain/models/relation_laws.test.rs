/**
 * =================================================================
 * APARATO: RELATION LAWS TEST (V3.0)
 * CLASIFICACIÓN: TRINITY EVIDENCE (ESTRATO L2-MODELS)
 * OBJETIVO: Certificar las leyes algebraicas del catálogo de
 *           relaciones: involución de inversas, simetría y pertenencia
 *           al subconjunto direccional.
 * =================================================================
 */

use maquette_domain_models::{ConstraintType, RelationType};

#[test]
fn certify_inverse_is_an_involution() {
    // get_inverse(get_inverse(r)) == r para TODA relación del catálogo.
    for relation in RelationType::all() {
        assert_eq!(
            relation.get_inverse().get_inverse(),
            relation,
            "INVOLUTION_BREACH: {relation:?}"
        );
    }
}

#[test]
fn certify_directional_inverse_pairs() {
    assert_eq!(RelationType::LeftOf.get_inverse(), RelationType::RightOf);
    assert_eq!(RelationType::RightOf.get_inverse(), RelationType::LeftOf);
    assert_eq!(RelationType::InFrontOf.get_inverse(), RelationType::Behind);
    assert_eq!(RelationType::Behind.get_inverse(), RelationType::InFrontOf);
    assert_eq!(RelationType::Above.get_inverse(), RelationType::Below);
    assert_eq!(RelationType::Below.get_inverse(), RelationType::Above);

    // Auto-inversas del catálogo.
    assert_eq!(RelationType::On.get_inverse(), RelationType::On);
    assert_eq!(RelationType::FaceTo.get_inverse(), RelationType::FaceTo);
}

#[test]
fn certify_symmetric_roster() {
    let symmetric_roster = [
        RelationType::Near,
        RelationType::Far,
        RelationType::Adjacent,
        RelationType::SideOf,
        RelationType::Parallel,
        RelationType::Perpendicular,
    ];

    for relation in RelationType::all() {
        let expected_symmetric = symmetric_roster.contains(&relation);
        assert_eq!(
            relation.is_symmetric(),
            expected_symmetric,
            "SYMMETRY_BREACH: {relation:?}"
        );
        // Toda relación simétrica es su propia inversa.
        if expected_symmetric {
            assert_eq!(relation.get_inverse(), relation);
        }
    }
}

#[test]
fn certify_directional_subset_excludes_symmetric_and_face_to() {
    for relation in RelationType::all() {
        if relation.is_symmetric() || relation == RelationType::FaceTo {
            assert!(!relation.is_directional(), "DIRECTIONAL_BREACH: {relation:?}");
        }
    }

    // Las relaciones que siembran el grafo topológico.
    for directional in [
        RelationType::LeftOf,
        RelationType::RightOf,
        RelationType::InFrontOf,
        RelationType::Behind,
        RelationType::On,
        RelationType::Above,
        RelationType::Below,
    ] {
        assert!(directional.is_directional());
    }
}

#[test]
fn certify_type_classification_is_total() {
    for relation in RelationType::all() {
        let classified = relation.constraint_type();
        let expected = match relation {
            RelationType::LeftOf
            | RelationType::RightOf
            | RelationType::InFrontOf
            | RelationType::Behind
            | RelationType::SideOf => ConstraintType::Relative,
            RelationType::Near | RelationType::Far | RelationType::Adjacent => {
                ConstraintType::Distance
            }
            RelationType::On | RelationType::Above | RelationType::Below => {
                ConstraintType::Vertical
            }
            RelationType::FaceTo | RelationType::Parallel | RelationType::Perpendicular => {
                ConstraintType::Rotation
            }
        };
        assert_eq!(classified, expected);
    }
}
