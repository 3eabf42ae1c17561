// [libs/domain/constraints/src/graph.rs]
/*!
 * =================================================================
 * APARATO: DIRECTIONAL GRAPH ENGINE (V8.1 - KAHN DETERMINISM)
 * CLASIFICACIÓN: DOMAIN LOGIC (ESTRATO L2)
 * RESPONSABILIDAD: ANÁLISIS DE CICLOS Y SIEMBRA TOPOLÓGICA
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. SYMMETRIC EXCLUSION: El grafo se construye exclusivamente con el
 *    subconjunto direccional de relaciones; los ciclos bajo relaciones
 *    simétricas (near, adjacent) son legales y quedan fuera del grafo.
 * 2. DETERMINISTIC KAHN: La cola de grado cero respeta el orden de
 *    entrada del inventario; los miembros residuales de un ciclo se
 *    anexan en orden determinista de entrada.
 *
 * # Mathematical Proof (Partial Order Respect):
 * Para todo subgrafo direccional acíclico, el orden de siembra emitido
 * por Kahn respeta el orden parcial: si existe la arista objetivo ->
 * fuente, el objetivo precede a la fuente en el orden de colocación.
 * =================================================================
 */

use maquette_domain_models::SpatialConstraint;
use std::collections::{HashMap, HashSet, VecDeque};

/// Certifica si el subgrafo direccional contiene algún ciclo.
///
/// Retorna el primer objeto detectado dentro de un ciclo, en orden
/// determinista de exploración.
pub fn directional_subgraph_has_cycle(constraints: &[SpatialConstraint]) -> Option<String> {
    let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();
    let mut exploration_order: Vec<&str> = Vec::new();

    for constraint in constraints {
        if !constraint.relation.is_directional() {
            continue;
        }
        if !adjacency.contains_key(constraint.source.as_str()) {
            exploration_order.push(constraint.source.as_str());
        }
        adjacency
            .entry(constraint.source.as_str())
            .or_default()
            .push(constraint.target.as_str());
    }

    fn depth_first_probe<'a>(
        node: &'a str,
        adjacency: &HashMap<&'a str, Vec<&'a str>>,
        visited: &mut HashSet<&'a str>,
        recursion_stack: &mut HashSet<&'a str>,
    ) -> Option<&'a str> {
        visited.insert(node);
        recursion_stack.insert(node);

        if let Some(neighbors) = adjacency.get(node) {
            for neighbor in neighbors {
                if !visited.contains(neighbor) {
                    if let Some(cycle_member) =
                        depth_first_probe(neighbor, adjacency, visited, recursion_stack)
                    {
                        return Some(cycle_member);
                    }
                } else if recursion_stack.contains(neighbor) {
                    return Some(neighbor);
                }
            }
        }

        recursion_stack.remove(node);
        None
    }

    let mut visited = HashSet::new();
    let mut recursion_stack = HashSet::new();

    for node in exploration_order {
        if !visited.contains(node) {
            if let Some(cycle_member) =
                depth_first_probe(node, &adjacency, &mut visited, &mut recursion_stack)
            {
                return Some(cycle_member.to_string());
            }
        }
    }

    None
}

/// Orden de siembra topológica para la colocación de objetos.
///
/// Algoritmo de Kahn sobre el subgrafo direccional: un objeto fuente
/// depende de su objetivo (el objetivo debe colocarse primero). Los
/// miembros residuales de un ciclo se anexan en orden de entrada.
pub fn topological_seed_order(
    object_identifiers: &[String],
    constraints: &[SpatialConstraint],
) -> Vec<String> {
    let known_objects: HashSet<&str> =
        object_identifiers.iter().map(String::as_str).collect();

    // Arista objetivo -> fuente: el objetivo desbloquea a la fuente.
    let mut unlocks: HashMap<&str, Vec<&str>> = HashMap::new();
    let mut dependency_count: HashMap<&str, usize> = object_identifiers
        .iter()
        .map(|identifier| (identifier.as_str(), 0usize))
        .collect();
    let mut registered_edges: HashSet<(&str, &str)> = HashSet::new();

    for constraint in constraints {
        if !constraint.relation.is_directional() {
            continue;
        }
        let source = constraint.source.as_str();
        let target = constraint.target.as_str();
        if !known_objects.contains(source) || !known_objects.contains(target) {
            continue;
        }
        if !registered_edges.insert((target, source)) {
            continue;
        }
        unlocks.entry(target).or_default().push(source);
        *dependency_count.entry(source).or_insert(0) += 1;
    }

    let mut zero_dependency_queue: VecDeque<&str> = object_identifiers
        .iter()
        .map(String::as_str)
        .filter(|identifier| dependency_count.get(identifier).copied().unwrap_or(0) == 0)
        .collect();

    let mut seed_order: Vec<String> = Vec::with_capacity(object_identifiers.len());
    let mut emitted: HashSet<&str> = HashSet::new();

    while let Some(ready_object) = zero_dependency_queue.pop_front() {
        seed_order.push(ready_object.to_string());
        emitted.insert(ready_object);

        if let Some(unlocked_sources) = unlocks.get(ready_object) {
            for unlocked in unlocked_sources {
                let remaining = dependency_count
                    .get_mut(unlocked)
                    .expect("UNKNOWN_NODE: edge registered for unindexed object");
                *remaining -= 1;
                if *remaining == 0 {
                    zero_dependency_queue.push_back(unlocked);
                }
            }
        }
    }

    // Residuo de ciclo: anexado en orden determinista de entrada.
    for identifier in object_identifiers {
        if !emitted.contains(identifier.as_str()) {
            seed_order.push(identifier.clone());
        }
    }

    seed_order
}
