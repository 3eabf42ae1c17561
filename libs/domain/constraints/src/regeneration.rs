// [libs/domain/constraints/src/regeneration.rs]
/*!
 * =================================================================
 * APARATO: CONSTRAINT REGENERATION ENGINE (V8.3 - TRACE FEEDBACK)
 * CLASIFICACIÓN: DOMAIN LOGIC (ESTRATO L2)
 * RESPONSABILIDAD: RELAJACIÓN DE CONJUNTOS GUIADA POR RASTROS DFS
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. TRACE AS FIRST-CLASS INPUT: El rastro de fallo identifica al
 *    objeto bloqueante; la regeneración opera quirúrgicamente sobre las
 *    restricciones que lo nombran, jamás sobre el conjunto completo.
 * 2. TWO STRATEGIES: 'relax' degrada a secundaria/blanda conservando la
 *    intención; 'remove' amputa. El llamador elige la agresividad.
 * 3. VERSION DISCIPLINE: El conjunto regenerado se persiste como
 *    versión siguiente; la versión fallida permanece intacta en disco
 *    para la auditoría forense.
 * =================================================================
 */

use maquette_domain_models::{ConstraintPriority, DfsTrace, ValidationFault};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::set::ConstraintSet;

/// Estrategia de regeneración aplicada tras un fallo del solucionador.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegenerationStrategy {
    /// Degrada a secundaria/blanda toda restricción que nombre al objeto fallido.
    Relax,
    /// Elimina toda restricción que nombre al objeto fallido.
    Remove,
}

/// Produce un conjunto nuevo a partir del fallido y su rastro.
///
/// # Errors:
/// Propaga los fallos de ensamblaje del conjunto resultante. Quitar o
/// ablandar restricciones no puede introducir ciclos, pero el contrato
/// de validación total se re-ejecuta por disciplina.
pub fn regenerate_from_trace(
    current_set: &ConstraintSet,
    trace: &DfsTrace,
    strategy: RegenerationStrategy,
) -> Result<ConstraintSet, ValidationFault> {
    let blocking_object = trace.failed_object_id.as_str();

    match strategy {
        RegenerationStrategy::Relax => {
            let mut touched_count = 0usize;
            let relaxed_relations = current_set
                .relations()
                .iter()
                .cloned()
                .map(|mut constraint| {
                    if constraint.source == blocking_object || constraint.target == blocking_object
                    {
                        constraint.priority = ConstraintPriority::Secondary;
                        constraint.is_soft = true;
                        touched_count += 1;
                    }
                    constraint
                })
                .collect();

            info!(
                "🩹 [REGENERATION]: Strategy RELAX softened {} constraints naming '{}'.",
                touched_count, blocking_object
            );
            ConstraintSet::assemble(current_set.globals().clone(), relaxed_relations)
        }
        RegenerationStrategy::Remove => {
            let survivors: Vec<_> = current_set
                .relations()
                .iter()
                .filter(|constraint| {
                    constraint.source != blocking_object && constraint.target != blocking_object
                })
                .cloned()
                .collect();

            info!(
                "✂️  [REGENERATION]: Strategy REMOVE dropped {} constraints naming '{}'.",
                current_set.len() - survivors.len(),
                blocking_object
            );
            ConstraintSet::assemble(current_set.globals().clone(), survivors)
        }
    }
}
