/**
 * =================================================================
 * APARATO: AABB INTEGRITY TEST (V3.0)
 * CLASIFICACIÓN: TRINITY EVIDENCE (ESTRATO L1-GEOMETRY)
 * OBJETIVO: Certificar la semántica estricta de penetración y las
 *           leyes de simetría de las cajas alineadas a ejes.
 * =================================================================
 */

use maquette_core_geometry::{Aabb, Vec3};
use proptest::prelude::*;

#[test]
fn certify_strict_penetration_semantics() {
    let unit = Vec3::new(1.0, 1.0, 1.0);

    // Penetración real en los tres ejes.
    let box_a = Aabb::from_center_size(Vec3::new(0.0, 0.0, 0.5), unit);
    let box_b = Aabb::from_center_size(Vec3::new(0.5, 0.5, 0.5), unit);
    assert!(box_a.intersects(&box_b));

    // Contacto cara a cara: profundidad exactamente cero, sin colisión.
    let box_touching = Aabb::from_center_size(Vec3::new(1.0, 0.0, 0.5), unit);
    assert!(!box_a.intersects(&box_touching));

    // La relación vertical 'on' depende de este contrato: un objeto
    // asentado sobre otro comparte cara sin registrar penetración.
    let table = Aabb::from_center_size(Vec3::new(0.0, 0.0, 0.375), Vec3::new(1.0, 1.0, 0.75));
    let lamp = Aabb::from_center_size(Vec3::new(0.0, 0.0, 0.9), Vec3::new(0.2, 0.2, 0.3));
    assert!(!table.intersects(&lamp), "Seated contact must not count as collision.");
}

#[test]
fn certify_clearance_inflation() {
    let unit = Vec3::new(1.0, 1.0, 1.0);
    let west = Aabb::from_center_size(Vec3::new(0.0, 0.0, 0.5), unit);
    let east = Aabb::from_center_size(Vec3::new(1.03, 0.0, 0.5), unit);

    assert!(!west.intersects(&east));
    // Holgura de 2 cm por caja: el hueco de 3 cm colapsa (4 cm total).
    assert!(west.inflate(0.02).intersects(&east.inflate(0.02)));
}

proptest! {
    /**
     * LEY DE SIMETRÍA: intersección y distancia son conmutativas para
     * cualquier par de cajas del espacio de la sala.
     */
    #[test]
    fn certify_pairwise_symmetry_laws(
        ax in -10.0f64..10.0, ay in -10.0f64..10.0, az in 0.0f64..5.0,
        bx in -10.0f64..10.0, by in -10.0f64..10.0, bz in 0.0f64..5.0,
        sa in 0.05f64..3.0, sb in 0.05f64..3.0,
    ) {
        let box_a = Aabb::from_center_size(Vec3::new(ax, ay, az), Vec3::new(sa, sa, sa));
        let box_b = Aabb::from_center_size(Vec3::new(bx, by, bz), Vec3::new(sb, sb, sb));

        prop_assert_eq!(box_a.intersects(&box_b), box_b.intersects(&box_a));
        prop_assert!((box_a.distance_to(&box_b) - box_b.distance_to(&box_a)).abs() < 1e-9);

        // Cajas que se intersectan reportan separación nula.
        if box_a.intersects(&box_b) {
            prop_assert!(box_a.distance_to(&box_b) < 1e-12);
        }
    }
}
