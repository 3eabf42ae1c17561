// [libs/core/geometry/src/lib.rs]
/*!
 * =================================================================
 * APARATO: GEOMETRY CORE HUB (V9.0 - DETERMINISTIC SEAL)
 * CLASIFICACIÓN: CORE MATH (ESTRATO L1)
 * RESPONSABILIDAD: EXPOSICIÓN NOMINAL DE PRIMITIVAS GEOMÉTRICAS
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. ZERO FLOAT DRIFT: Todas las operaciones son deterministas dado el
 *    mismo orden de evaluación; ninguna primitiva consulta relojes ni
 *    entropía del sistema.
 * 2. NOMINAL PURITY: Reexportación plana de Vec3, Aabb y FeasibleRegion
 *    para la sinapsis con el estrato de dominio.
 * =================================================================
 */

pub mod vector;
pub mod aabb;
pub mod region;

pub use vector::{Vec3, normalize_degrees};
pub use aabb::Aabb;
pub use region::FeasibleRegion;
