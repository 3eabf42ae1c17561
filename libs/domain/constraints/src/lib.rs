// [libs/domain/constraints/src/lib.rs]
/*!
 * =================================================================
 * APARATO: CONSTRAINT MODEL HUB (V8.0 - ACYCLIC SEAL)
 * CLASIFICACIÓN: DOMAIN LOGIC (ESTRATO L2)
 * RESPONSABILIDAD: EXPOSICIÓN NOMINAL DEL MODELO DE RESTRICCIONES
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. COPY-ON-WRITE: Los conjuntos son inmutables tras su ensamblaje;
 *    toda "mutación" produce un conjunto nuevo que el almacén persiste
 *    como versión siguiente.
 * 2. ACYCLIC GUARANTEE: Ningún conjunto con ciclo en su subgrafo
 *    direccional sobrevive a la construcción.
 * =================================================================
 */

pub mod set;
pub mod graph;
pub mod regeneration;

pub use set::ConstraintSet;
pub use graph::{directional_subgraph_has_cycle, topological_seed_order};
pub use regeneration::{regenerate_from_trace, RegenerationStrategy};
