// [libs/domain/solver/src/analysis.rs]
/*!
 * =================================================================
 * APARATO: FAILURE ANALYSIS ENGINE (V10.2 - FORENSIC FEEDBACK)
 * CLASIFICACIÓN: DOMAIN LOGIC (ESTRATO L2)
 * RESPONSABILIDAD: CLASIFICACIÓN DE CONFLICTOS Y RETROALIMENTACIÓN
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. FIRST-CAUSE CLASSIFICATION: El tipo de conflicto se decide por la
 *    primera condición que rechazó a TODOS los candidatos restantes:
 *    región vacía -> constraint; todo fuera de sala -> boundary; luego
 *    la causa dominante entre colisión, restricción e inestabilidad.
 * 2. ACTIONABLE FEEDBACK: El resumen en lenguaje natural y las
 *    sugerencias alimentan la regeneración de restricciones; no son
 *    decoración de logs.
 * =================================================================
 */

use maquette_domain_models::ConflictType;

/// Conteo de rechazos por causa durante la evaluación de candidatos.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RejectionTally {
    pub boundary: u64,
    pub constraint: u64,
    pub collision: u64,
    pub unstable: u64,
}

impl RejectionTally {
    pub fn total(&self) -> u64 {
        self.boundary + self.constraint + self.collision + self.unstable
    }
}

/// Clasifica el conflicto que selló el fallo de colocación.
///
/// `region_was_bound` certifica que los candidatos provinieron de la
/// intersección de regiones de restricción (y no del vecindario libre):
/// si TODO candidato de una región atada colisiona, las restricciones
/// fuerzan el solape y el conflicto es lógico, no de espacio.
pub fn classify_conflict(
    tally: &RejectionTally,
    candidates_generated: u64,
    timed_out: bool,
    region_was_bound: bool,
) -> ConflictType {
    if timed_out {
        return ConflictType::Timeout;
    }
    // Región factible vacía: conflicto lógico puro entre restricciones.
    if candidates_generated == 0 {
        return ConflictType::Constraint;
    }
    // Ningún candidato dentro de la caja de la sala.
    if tally.boundary == tally.total() && tally.boundary > 0 {
        return ConflictType::Boundary;
    }
    // Región atada cuyo contenido íntegro colisiona: conflicto lógico.
    if region_was_bound && tally.collision > 0 && tally.collision == tally.total() {
        return ConflictType::Constraint;
    }

    if tally.total() == 0 {
        return ConflictType::Constraint;
    }

    // max_by_key retorna el último máximo: ante empate gana la causa
    // listada más tarde (la restricción lógica como veredicto final).
    let dominant = [
        (tally.boundary, ConflictType::Boundary),
        (tally.unstable, ConflictType::Unstable),
        (tally.collision, ConflictType::Collision),
        (tally.constraint, ConflictType::Constraint),
    ];
    dominant
        .into_iter()
        .max_by_key(|(count, _)| *count)
        .map(|(_, conflict)| conflict)
        .unwrap_or(ConflictType::Constraint)
}

/// Resumen forense en lenguaje natural para el fallo de colocación.
pub fn natural_language_summary(
    failed_object_id: &str,
    placed_objects: &[String],
    conflict_type: ConflictType,
    candidates_tried: u64,
    time_at_failure: f64,
) -> String {
    let placed_roster = if placed_objects.is_empty() {
        "no prior objects".to_string()
    } else {
        placed_objects.join(", ")
    };

    match conflict_type {
        ConflictType::Collision => format!(
            "Failed to place {failed_object_id}: {candidates_tried} placement attempts \
             collided with already placed objects ({placed_roster}). \
             The object may be too large for the available space."
        ),
        ConflictType::Boundary => format!(
            "Failed to place {failed_object_id}: no feasible candidate lies inside the \
             room box. Constraints push the object beyond the walls."
        ),
        ConflictType::Constraint => format!(
            "Failed to place {failed_object_id}: {} objects placed successfully, but the \
             active constraints admit no feasible position for the remaining object. \
             Consider relaxing or removing conflicting constraints.",
            placed_objects.len()
        ),
        ConflictType::Unstable => format!(
            "Failed to place {failed_object_id}: every collision-free candidate failed \
             the stability check over its support surface."
        ),
        ConflictType::Timeout => format!(
            "Failed to place {failed_object_id} within the time budget ({time_at_failure:.2}s \
             elapsed). Search space too large or over-constrained."
        ),
    }
}

/// Sugerencias accionables según la clase de conflicto.
pub fn fix_suggestions(conflict_type: ConflictType) -> Vec<String> {
    let suggestions: &[&str] = match conflict_type {
        ConflictType::Collision => &[
            "Reduce object sizes or remove secondary objects from the scene",
            "Review near/adjacent distance constraints - they may be too restrictive",
            "Increase the room size hint",
        ],
        ConflictType::Boundary => &[
            "Increase max_room_size in the constraint globals",
            "Loosen relative constraints pushing the object toward the walls",
        ],
        ConflictType::Constraint => &[
            "Relax conflicting constraints (strategy=relax)",
            "Remove constraints naming the failed object (strategy=remove)",
            "Mark secondary constraints as soft",
        ],
        ConflictType::Unstable => &[
            "Enlarge the supporting surface or reduce the stacked object footprint",
            "Disable the gravity check if the scene tolerates floating objects",
        ],
        ConflictType::Timeout => &[
            "Increase timeout_seconds",
            "Reduce scene complexity (fewer objects or simpler constraints)",
            "Coarsen sampling_resolution for faster convergence",
        ],
    };
    suggestions.iter().map(|suggestion| suggestion.to_string()).collect()
}
