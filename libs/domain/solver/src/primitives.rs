// [libs/domain/solver/src/primitives.rs]
/*!
 * =================================================================
 * APARATO: CONSTRAINT PRIMITIVES ENGINE (V10.1 - SIGN TRUTH)
 * CLASIFICACIÓN: DOMAIN LOGIC (ESTRATO L2)
 * RESPONSABILIDAD: VERIFICACIÓN PURA Y REGIONES FACTIBLES POR RELACIÓN
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. SIGN TRUTH: Convención del mundo sellada: +X derecha, +Y fondo.
 *    'left_of' exige src.x ≤ tgt.x − buffer; 'in_front_of' exige
 *    src.y ≤ tgt.y − buffer (el frente mira hacia −Y).
 * 2. CONTACT PRECISION: La relación 'on' exige contacto cara a cara con
 *    tolerancia de ±2 mm sobre la altura esperada
 *    tgt.z + tgt.h/2 + src.h/2.
 * 3. REGION SEEDING: Las regiones factibles son SUBCONJUNTOS seguros
 *    del espacio de satisfacción, acotados por una ventana de localidad
 *    para mantener tratable la rejilla de muestreo; la aceptación final
 *    siempre re-verifica la restricción completa.
 * =================================================================
 */

use maquette_core_geometry::{FeasibleRegion, Vec3};
use maquette_domain_models::{
    ConstraintGlobals, RelationType, SpatialConstraint, CONTACT_TOLERANCE_METERS,
};

/// Ventana de localidad para el muestreo alrededor del objetivo (metros).
const SAMPLING_LOCALITY_METERS: f64 = 2.0;

/// Pose evaluable de un objeto: posición del centro, rotación Euler y tamaño.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectPose {
    pub position: Vec3,
    pub rotation: Vec3,
    pub size: Vec3,
}

/// Veredicto de la verificación de una restricción.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CheckVerdict {
    pub satisfied: bool,
    /// Magnitud métrica de la violación (0.0 cuando satisfecha).
    pub distance_violation: f64,
    /// Violación angular en grados, solo para relaciones de rotación.
    pub angle_violation: Option<f64>,
}

impl CheckVerdict {
    fn pass() -> Self {
        Self { satisfied: true, distance_violation: 0.0, angle_violation: None }
    }

    fn metric_fail(violation: f64) -> Self {
        Self { satisfied: false, distance_violation: violation.max(0.0), angle_violation: None }
    }

    fn angular_fail(violation_degrees: f64) -> Self {
        Self {
            satisfied: false,
            distance_violation: 0.0,
            angle_violation: Some(violation_degrees.max(0.0)),
        }
    }
}

/// Verifica una restricción espacial entre dos poses concretas.
///
/// Función pura: mismo par de poses, mismo veredicto, siempre.
pub fn check_constraint(
    constraint: &SpatialConstraint,
    source: &ObjectPose,
    target: &ObjectPose,
) -> CheckVerdict {
    let buffer = constraint.effective_threshold();
    let delta_x = source.position.x - target.position.x;
    let delta_y = source.position.y - target.position.y;

    match constraint.relation {
        // --- RELATIVAS (buffer sobre el eje restringido) ---
        RelationType::LeftOf => {
            if delta_x <= -buffer {
                CheckVerdict::pass()
            } else {
                CheckVerdict::metric_fail(delta_x + buffer)
            }
        }
        RelationType::RightOf => {
            if delta_x >= buffer {
                CheckVerdict::pass()
            } else {
                CheckVerdict::metric_fail(buffer - delta_x)
            }
        }
        RelationType::InFrontOf => {
            if delta_y <= -buffer {
                CheckVerdict::pass()
            } else {
                CheckVerdict::metric_fail(delta_y + buffer)
            }
        }
        RelationType::Behind => {
            if delta_y >= buffer {
                CheckVerdict::pass()
            } else {
                CheckVerdict::metric_fail(buffer - delta_y)
            }
        }
        RelationType::SideOf => {
            if delta_x.abs() >= buffer {
                CheckVerdict::pass()
            } else {
                CheckVerdict::metric_fail(buffer - delta_x.abs())
            }
        }

        // --- DISTANCIA (horizontal, plano XY) ---
        RelationType::Near | RelationType::Adjacent => {
            let horizontal = source.position.horizontal_distance_to(&target.position);
            if horizontal <= buffer {
                CheckVerdict::pass()
            } else {
                CheckVerdict::metric_fail(horizontal - buffer)
            }
        }
        RelationType::Far => {
            let horizontal = source.position.horizontal_distance_to(&target.position);
            if horizontal >= buffer {
                CheckVerdict::pass()
            } else {
                CheckVerdict::metric_fail(buffer - horizontal)
            }
        }

        // --- VERTICALES ---
        RelationType::On => {
            let expected_center_height =
                target.position.z + target.size.z / 2.0 + source.size.z / 2.0;
            let contact_gap = (source.position.z - expected_center_height).abs();
            if contact_gap <= CONTACT_TOLERANCE_METERS {
                CheckVerdict::pass()
            } else {
                CheckVerdict::metric_fail(contact_gap)
            }
        }
        RelationType::Above => {
            let vertical_gap = source.position.z - target.position.z;
            if vertical_gap >= buffer {
                CheckVerdict::pass()
            } else {
                CheckVerdict::metric_fail(buffer - vertical_gap)
            }
        }
        RelationType::Below => {
            let vertical_gap = target.position.z - source.position.z;
            if vertical_gap >= buffer {
                CheckVerdict::pass()
            } else {
                CheckVerdict::metric_fail(buffer - vertical_gap)
            }
        }

        // --- ROTACIÓN ---
        RelationType::FaceTo => {
            let tolerance = constraint.effective_deg_tolerance();
            let to_target_x = target.position.x - source.position.x;
            let to_target_y = target.position.y - source.position.y;
            let magnitude = (to_target_x.powi(2) + to_target_y.powi(2)).sqrt();

            if magnitude < 1e-9 {
                return CheckVerdict::angular_fail(180.0);
            }

            // Vector frontal desde la guiñada: rot 0° mira hacia −Y.
            let yaw_radians = source.rotation.z.to_radians();
            let forward_x = yaw_radians.sin();
            let forward_y = -yaw_radians.cos();

            let cosine = ((forward_x * to_target_x + forward_y * to_target_y) / magnitude)
                .clamp(-1.0, 1.0);
            let angle_to_target = cosine.acos().to_degrees();

            if angle_to_target <= tolerance {
                CheckVerdict::pass()
            } else {
                CheckVerdict::angular_fail(angle_to_target - tolerance)
            }
        }
        RelationType::Parallel => {
            let tolerance = constraint.effective_deg_tolerance();
            let deviation = yaw_axis_deviation(source.rotation.z, target.rotation.z);
            if deviation <= tolerance {
                CheckVerdict::pass()
            } else {
                CheckVerdict::angular_fail(deviation - tolerance)
            }
        }
        RelationType::Perpendicular => {
            let tolerance = constraint.effective_deg_tolerance();
            let deviation = (yaw_axis_deviation(source.rotation.z, target.rotation.z) - 90.0).abs();
            if deviation <= tolerance {
                CheckVerdict::pass()
            } else {
                CheckVerdict::angular_fail(deviation - tolerance)
            }
        }
    }
}

/// Desviación mínima entre dos ejes de guiñada, en [0, 90].
fn yaw_axis_deviation(yaw_a_degrees: f64, yaw_b_degrees: f64) -> f64 {
    let raw = (yaw_a_degrees - yaw_b_degrees).abs() % 180.0;
    raw.min(180.0 - raw)
}

/// Región factible para colocar la fuente dada la pose conocida del objetivo.
///
/// Retorna None para relaciones que no acotan la posición (far y las de
/// rotación): la aceptación final las re-verifica sobre toda la sala.
pub fn feasible_region(
    constraint: &SpatialConstraint,
    target: &ObjectPose,
    source_size: Vec3,
    globals: &ConstraintGlobals,
) -> Option<FeasibleRegion> {
    let buffer = constraint.effective_threshold();
    let room_half_extent = globals.max_room_size / 2.0;
    let room = FeasibleRegion::whole_room(room_half_extent);
    let target_center = target.position;

    let raw_region = match constraint.relation {
        RelationType::LeftOf => FeasibleRegion {
            min_x: target_center.x - buffer - SAMPLING_LOCALITY_METERS,
            max_x: target_center.x - buffer,
            min_y: target_center.y - SAMPLING_LOCALITY_METERS,
            max_y: target_center.y + SAMPLING_LOCALITY_METERS,
            min_z: 0.0,
            max_z: f64::INFINITY,
        },
        RelationType::RightOf => FeasibleRegion {
            min_x: target_center.x + buffer,
            max_x: target_center.x + buffer + SAMPLING_LOCALITY_METERS,
            min_y: target_center.y - SAMPLING_LOCALITY_METERS,
            max_y: target_center.y + SAMPLING_LOCALITY_METERS,
            min_z: 0.0,
            max_z: f64::INFINITY,
        },
        RelationType::InFrontOf => FeasibleRegion {
            min_x: target_center.x - SAMPLING_LOCALITY_METERS,
            max_x: target_center.x + SAMPLING_LOCALITY_METERS,
            min_y: target_center.y - buffer - SAMPLING_LOCALITY_METERS,
            max_y: target_center.y - buffer,
            min_z: 0.0,
            max_z: f64::INFINITY,
        },
        RelationType::Behind => FeasibleRegion {
            min_x: target_center.x - SAMPLING_LOCALITY_METERS,
            max_x: target_center.x + SAMPLING_LOCALITY_METERS,
            min_y: target_center.y + buffer,
            max_y: target_center.y + buffer + SAMPLING_LOCALITY_METERS,
            min_z: 0.0,
            max_z: f64::INFINITY,
        },
        // Ambos flancos: caja envolvente; la aceptación descarta el centro.
        RelationType::SideOf => FeasibleRegion::around(
            target_center,
            buffer + SAMPLING_LOCALITY_METERS,
        ),
        RelationType::Near | RelationType::Adjacent => {
            FeasibleRegion::around(target_center, buffer)
        }
        // La banda vertical fija el centro a la altura de contacto exacta.
        RelationType::On => {
            let contact_height = target_center.z + target.size.z / 2.0 + source_size.z / 2.0;
            FeasibleRegion {
                min_x: target_center.x - target.size.x / 2.0,
                max_x: target_center.x + target.size.x / 2.0,
                min_y: target_center.y - target.size.y / 2.0,
                max_y: target_center.y + target.size.y / 2.0,
                min_z: contact_height,
                max_z: contact_height,
            }
            .with_fixed_height(contact_height)
        }
        RelationType::Above => FeasibleRegion::around(target_center, SAMPLING_LOCALITY_METERS)
            .with_min_height(target_center.z + buffer),
        RelationType::Below => FeasibleRegion {
            min_x: target_center.x - SAMPLING_LOCALITY_METERS,
            max_x: target_center.x + SAMPLING_LOCALITY_METERS,
            min_y: target_center.y - SAMPLING_LOCALITY_METERS,
            max_y: target_center.y + SAMPLING_LOCALITY_METERS,
            min_z: 0.0,
            max_z: (target_center.z - buffer).max(0.0),
        },
        // Sin cota posicional: el muestreo cae al vecindario inicial.
        RelationType::Far
        | RelationType::FaceTo
        | RelationType::Parallel
        | RelationType::Perpendicular => return None,
    };

    raw_region.intersect(&room)
}
