// [libs/core/geometry/src/aabb.rs]
/*!
 * =================================================================
 * APARATO: AABB COLLISION PRIMITIVE (V9.1 - STRICT PENETRATION)
 * CLASIFICACIÓN: CORE MATH (ESTRATO L1)
 * RESPONSABILIDAD: DETECCIÓN DE COLISIONES POR CAJAS ALINEADAS A EJES
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. STRICT SEMANTICS: 'intersects' exige profundidad de penetración
 *    estrictamente positiva; el contacto superficial (cara con cara) NO
 *    constituye colisión, habilitando la relación vertical 'on'.
 * 2. CLEARANCE INFLATION: El margen de separación se aplica inflando
 *    ambas cajas antes del test, nunca mutando la geometría original.
 *
 * # Mathematical Proof (Separating Axis):
 * Dos cajas alineadas a ejes se intersectan si y solo si sus proyecciones
 * se solapan en los tres ejes. Basta un eje separador para certificar la
 * ausencia de colisión.
 * =================================================================
 */

use crate::vector::Vec3;

/// Caja envolvente alineada a los ejes del mundo.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Construye la caja a partir del centro del objeto y su tamaño métrico.
    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let half = Vec3::new(size.x / 2.0, size.y / 2.0, size.z / 2.0);
        Self { min: center - half, max: center + half }
    }

    /// Test de intersección estricto (penetración > 0 en los tres ejes).
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.max.x > other.min.x
            && self.min.x < other.max.x
            && self.max.y > other.min.y
            && self.min.y < other.max.y
            && self.max.z > other.min.z
            && self.min.z < other.max.z
    }

    /// Separación mínima entre dos cajas. Retorna 0.0 si se intersectan.
    pub fn distance_to(&self, other: &Aabb) -> f64 {
        if self.intersects(other) {
            return 0.0;
        }

        let gap_x = (other.min.x - self.max.x).max(self.min.x - other.max.x).max(0.0);
        let gap_y = (other.min.y - self.max.y).max(self.min.y - other.max.y).max(0.0);
        let gap_z = (other.min.z - self.max.z).max(self.min.z - other.max.z).max(0.0);

        (gap_x.powi(2) + gap_y.powi(2) + gap_z.powi(2)).sqrt()
    }

    /// Infla la caja en todos los ejes por el margen dado.
    pub fn inflate(&self, margin: f64) -> Aabb {
        let delta = Vec3::new(margin, margin, margin);
        Aabb { min: self.min - delta, max: self.max + delta }
    }

    /// Certifica si la caja completa reside dentro de otra (contención).
    pub fn contained_in(&self, outer: &Aabb) -> bool {
        self.min.x >= outer.min.x
            && self.min.y >= outer.min.y
            && self.min.z >= outer.min.z
            && self.max.x <= outer.max.x
            && self.max.y <= outer.max.y
            && self.max.z <= outer.max.z
    }
}

/// Test de colisión entre dos objetos posicionados, con margen de holgura.
///
/// El margen se aplica inflando ambas cajas, replicando la semántica de
/// 'collision_clearance_m' del conjunto de restricciones globales.
pub fn check_collision(
    center_a: Vec3,
    size_a: Vec3,
    center_b: Vec3,
    size_b: Vec3,
    clearance_m: f64,
) -> bool {
    let mut box_a = Aabb::from_center_size(center_a, size_a);
    let mut box_b = Aabb::from_center_size(center_b, size_b);

    if clearance_m > 0.0 {
        box_a = box_a.inflate(clearance_m);
        box_b = box_b.inflate(clearance_m);
    }

    box_a.intersects(&box_b)
}
