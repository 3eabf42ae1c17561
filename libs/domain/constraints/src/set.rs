// [libs/domain/constraints/src/set.rs]
/*!
 * =================================================================
 * APARATO: CONSTRAINT SET ENGINE (V8.2 - VALIDATION GATE)
 * CLASIFICACIÓN: DOMAIN LOGIC (ESTRATO L2)
 * RESPONSABILIDAD: ENSAMBLAJE VALIDADO Y CONSULTA DE CONJUNTOS
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. CONSTRUCTION GATE: Auto-referencia, tripletas duplicadas, umbrales
 *    fuera de categoría y ciclos direccionales se rechazan en el
 *    momento de ensamblaje, nunca después.
 * 2. APPEND-ONLY VERSIONING: El conjunto en RAM no porta número de
 *    versión; el almacén asigna 'v{n}' al persistir, garantizando que
 *    las versiones antiguas jamás se reescriban.
 * 3. DELTA DISCIPLINE: 'delta_apply' retorna un conjunto NUEVO validado
 *    de punta a punta; el receptor decide si lo persiste.
 * =================================================================
 */

use maquette_domain_models::{
    ConstraintDocument, ConstraintGlobals, ConstraintPriority, SpatialConstraint,
    ValidationFault,
};
use std::collections::HashSet;
use tracing::debug;

use crate::graph::directional_subgraph_has_cycle;

/// Conjunto validado de restricciones espaciales más parámetros globales.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintSet {
    globals: ConstraintGlobals,
    relations: Vec<SpatialConstraint>,
}

impl ConstraintSet {
    /// Conjunto vacío con los parámetros globales por defecto.
    pub fn empty() -> Self {
        Self { globals: ConstraintGlobals::default(), relations: Vec::new() }
    }

    /// Ensambla y valida un conjunto completo.
    ///
    /// # Errors:
    /// - Fallos de validación individuales de cada restricción.
    /// - `DuplicateConstraint` ante tripletas (source, target, relation)
    ///   repetidas.
    /// - `DirectionalCycle` cuando el subgrafo direccional es cíclico.
    pub fn assemble(
        globals: ConstraintGlobals,
        relations: Vec<SpatialConstraint>,
    ) -> Result<Self, ValidationFault> {
        let mut seen_triples = HashSet::new();

        for constraint in &relations {
            constraint.validate()?;
            if !seen_triples.insert(constraint.identity_triple()) {
                return Err(ValidationFault::DuplicateConstraint {
                    source_object: constraint.source.clone(),
                    target: constraint.target.clone(),
                });
            }
        }

        if let Some(cycle_member) = directional_subgraph_has_cycle(&relations) {
            return Err(ValidationFault::DirectionalCycle { object_id: cycle_member });
        }

        debug!("🧩 [CONSTRAINT_SET]: Assembled {} validated relations.", relations.len());
        Ok(Self { globals, relations })
    }

    /// Rehidrata un conjunto desde su documento de cable.
    pub fn from_document(document: ConstraintDocument) -> Result<Self, ValidationFault> {
        Self::assemble(document.globals, document.relations)
    }

    /// Proyecta el conjunto a su documento de cable con la versión dada.
    pub fn to_document(&self, version: u32) -> ConstraintDocument {
        ConstraintDocument {
            version,
            globals: self.globals.clone(),
            relations: self.relations.clone(),
        }
    }

    pub fn globals(&self) -> &ConstraintGlobals {
        &self.globals
    }

    pub fn relations(&self) -> &[SpatialConstraint] {
        &self.relations
    }

    pub fn len(&self) -> usize {
        self.relations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }

    /// Restricciones de prioridad primaria.
    pub fn primary(&self) -> Vec<&SpatialConstraint> {
        self.relations
            .iter()
            .filter(|constraint| constraint.priority == ConstraintPriority::Primary)
            .collect()
    }

    /// Restricciones de prioridad secundaria.
    pub fn secondary(&self) -> Vec<&SpatialConstraint> {
        self.relations
            .iter()
            .filter(|constraint| constraint.priority == ConstraintPriority::Secondary)
            .collect()
    }

    /// Todas las restricciones que involucran a un objeto (como fuente u objetivo).
    pub fn for_object(&self, object_id: &str) -> Vec<&SpatialConstraint> {
        self.relations
            .iter()
            .filter(|constraint| constraint.source == object_id || constraint.target == object_id)
            .collect()
    }

    /// Certifica la presencia de ciclos en el subgrafo direccional.
    ///
    /// Por construcción todo conjunto ensamblado es acíclico; la consulta
    /// existe para auditoría externa de documentos rehidratados a mano.
    pub fn has_cycles(&self) -> bool {
        directional_subgraph_has_cycle(&self.relations).is_some()
    }

    /// Alta individual: conjunto nuevo con la restricción añadida.
    ///
    /// # Errors:
    /// Los mismos fallos que `assemble`.
    pub fn with_added(&self, constraint: SpatialConstraint) -> Result<ConstraintSet, ValidationFault> {
        self.delta_apply(vec![constraint], &[])
    }

    /// Baja individual por constraint_id: conjunto nuevo sin ella.
    pub fn with_removed(&self, constraint_id: &str) -> Result<ConstraintSet, ValidationFault> {
        self.delta_apply(Vec::new(), &[constraint_id.to_string()])
    }

    /// Aplica un delta (altas y bajas por constraint_id) produciendo un
    /// conjunto NUEVO completamente validado.
    ///
    /// # Errors:
    /// Los mismos fallos que `assemble`: el delta no puede introducir
    /// duplicados ni ciclos direccionales.
    pub fn delta_apply(
        &self,
        additions: Vec<SpatialConstraint>,
        removals: &[String],
    ) -> Result<ConstraintSet, ValidationFault> {
        let removal_index: HashSet<&str> = removals.iter().map(String::as_str).collect();

        let mut next_relations: Vec<SpatialConstraint> = self
            .relations
            .iter()
            .filter(|constraint| !removal_index.contains(constraint.constraint_id.as_str()))
            .cloned()
            .collect();
        next_relations.extend(additions);

        Self::assemble(self.globals.clone(), next_relations)
    }

    /// Verifica que toda referencia de objeto exista en el inventario.
    ///
    /// # Errors:
    /// - `UnknownObjectReference` ante ids ausentes del inventario.
    pub fn verify_object_references(
        &self,
        known_object_identifiers: &HashSet<String>,
    ) -> Result<(), ValidationFault> {
        for constraint in &self.relations {
            for endpoint in [&constraint.source, &constraint.target] {
                if !known_object_identifiers.contains(endpoint) {
                    return Err(ValidationFault::UnknownObjectReference {
                        object_id: endpoint.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}
