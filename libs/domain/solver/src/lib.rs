// [libs/domain/solver/src/lib.rs]
/*!
 * =================================================================
 * APARATO: LAYOUT SOLVER HUB (V10.0 - DETERMINISTIC MASTER)
 * CLASIFICACIÓN: DOMAIN LOGIC (ESTRATO L2)
 * RESPONSABILIDAD: EXPOSICIÓN NOMINAL DEL SOLUCIONADOR DE LAYOUTS
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. PURE PRIMITIVES: check y feasible_region son funciones puras sin
 *    acceso a reloj ni entropía; el DFS es determinista dado
 *    (objetos, restricciones, semilla).
 * 2. TRACE DISCIPLINE: Todo fallo emite un DfsTrace consumible por la
 *    regeneración de restricciones; el éxito emite una solución
 *    versionable por el almacén.
 * =================================================================
 */

pub mod primitives;
pub mod dfs;
pub mod analysis;

pub use primitives::{check_constraint, feasible_region, CheckVerdict, ObjectPose};
pub use dfs::{LayoutSolver, SolveReport};
