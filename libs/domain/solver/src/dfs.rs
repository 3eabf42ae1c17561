// [libs/domain/solver/src/dfs.rs]
/*!
 * =================================================================
 * APARATO: DFS PLACEMENT ENGINE (V10.3 - BACKTRACK SOVEREIGN)
 * CLASIFICACIÓN: DOMAIN LOGIC (ESTRATO L2)
 * RESPONSABILIDAD: COLOCACIÓN EN PROFUNDIDAD CON RETROCESO Y RASTRO
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. TOPOLOGICAL SEEDING: Kahn sobre el subgrafo direccional dicta el
 *    orden de colocación; los objetivos preceden a sus fuentes.
 * 2. ACCEPTANCE LADDER: Cada candidato atraviesa la escalera frontera
 *    de sala -> restricciones duras -> colisión AABB -> estabilidad; el
 *    primer peldaño que falla sella la causa del rechazo.
 * 3. TIE-BREAKING LAW: Máxima satisfacción blanda ponderada, luego
 *    mínimo desplazamiento desde la pose inicial, luego orden de
 *    generación. Determinista dado (objetos, restricciones, semilla).
 * 4. FAILURE FRONTIER: El rastro captura la frontera más profunda que
 *    agotó candidatos, con su prefijo colocado intacto para la
 *    regeneración de restricciones.
 *
 * # Mathematical Proof (Bounded Search):
 * Con a lo sumo K candidatos por objeto y N objetos, el árbol explora
 * O(K^N) nodos en el peor caso; el presupuesto temporal actúa como
 * cota dura y degrada el veredicto a 'timeout' sin perder el rastro.
 * =================================================================
 */

use maquette_core_geometry::{Aabb, Vec3};
use maquette_domain_constraints::{topological_seed_order, ConstraintSet};
use maquette_domain_models::{
    ActiveConstraintRef, CollisionRecord, ConflictType, DfsTrace, LayoutMetrics,
    LayoutSolutionDocument, PlacementPose, PlacementRecord, RelationType, SceneObject,
    SolverSettings, SpatialConstraint,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::collections::{BTreeMap, HashMap};
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

use crate::analysis::{classify_conflict, fix_suggestions, natural_language_summary, RejectionTally};
use crate::primitives::{check_constraint, feasible_region, ObjectPose};

/// Ventana de muestreo alrededor de la pose inicial para objetos libres.
const UNBOUND_SAMPLING_REACH_METERS: f64 = 2.0;

/// Techo absoluto de cosecha de rejilla previo al ranking por cercanía.
const GRID_HARVEST_CEILING: usize = 10_000;

/// Reporte completo de una ejecución del solucionador.
#[derive(Debug, Clone)]
pub struct SolveReport {
    pub success: bool,
    pub placements: Vec<PlacementRecord>,
    pub collisions: Vec<CollisionRecord>,
    pub metrics: LayoutMetrics,
    pub trace: Option<DfsTrace>,
    pub error_message: Option<String>,
    pub seed: Option<u64>,
}

impl SolveReport {
    /// Proyecta el reporte al documento de cable con la versión asignada
    /// por el almacén. Solo los objetos colocados con éxito entran al mapa.
    pub fn to_document(&self, version_number: u32) -> LayoutSolutionDocument {
        let mut object_placements = BTreeMap::new();
        for record in &self.placements {
            if record.successful {
                object_placements.insert(
                    record.object_id.clone(),
                    PlacementPose {
                        pos: record.position,
                        rot_euler: record.rotation,
                        scale: record.scale,
                    },
                );
            }
        }
        LayoutSolutionDocument {
            success: self.success,
            version: format!("v{version_number}"),
            object_placements,
            metrics: self.metrics.clone(),
            error_message: self.error_message.clone(),
        }
    }
}

/// Resultado de la escalera de aceptación para un candidato.
enum CandidateVerdict {
    Accepted { index: usize, pose: ObjectPose, soft_score: f64, displacement: f64 },
    Rejected { cause: RejectionCause, satisfied_fraction: f64 },
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum RejectionCause {
    Boundary,
    Constraint,
    Collision,
    Unstable,
}

/// Frontera de fallo más profunda observada durante la búsqueda.
struct FailureFrontier {
    depth: usize,
    object_id: String,
    tally: RejectionTally,
    candidates_generated: u64,
    search_space: u64,
    best_score: f64,
    region_was_bound: bool,
    placed_snapshot: Vec<(String, ObjectPose)>,
}

struct SearchState<'a> {
    order: Vec<String>,
    objects_by_id: HashMap<&'a str, &'a SceneObject>,
    constraints: &'a ConstraintSet,
    settings: &'a SolverSettings,
    placed: Vec<(String, ObjectPose)>,
    candidates_tried: u64,
    backtrack_count: u32,
    attempts_per_object: HashMap<String, u32>,
    frontier: Option<FailureFrontier>,
    ignition: Instant,
    timed_out: bool,
    grid_jitter: (f64, f64),
}

impl<'a> SearchState<'a> {
    fn elapsed_seconds(&self) -> f64 {
        self.ignition.elapsed().as_secs_f64()
    }

    fn budget_exhausted(&self) -> bool {
        self.elapsed_seconds() > self.settings.timeout_seconds
    }

    fn record_frontier(&mut self, frontier: FailureFrontier) {
        let should_replace = self
            .frontier
            .as_ref()
            .map(|existing| frontier.depth >= existing.depth)
            .unwrap_or(true);
        if should_replace {
            self.frontier = Some(frontier);
        }
    }

    fn placed_pose(&self, object_id: &str) -> Option<&ObjectPose> {
        self.placed
            .iter()
            .find(|(identifier, _)| identifier == object_id)
            .map(|(_, pose)| pose)
    }
}

/// Solucionador de layouts por búsqueda en profundidad.
pub struct LayoutSolver {
    settings: SolverSettings,
}

impl LayoutSolver {
    pub fn new(settings: SolverSettings) -> Self {
        Self { settings }
    }

    pub fn with_default_settings() -> Self {
        Self::new(SolverSettings::default())
    }

    pub fn settings(&self) -> &SolverSettings {
        &self.settings
    }

    /// Resuelve la colocación completa del inventario bajo el conjunto dado.
    ///
    /// Determinista dado (objetos, restricciones, semilla), incluido el
    /// orden de generación de candidatos.
    #[instrument(skip_all, fields(objects = objects.len(), relations = constraints.len()))]
    pub fn solve(&self, objects: &[SceneObject], constraints: &ConstraintSet) -> SolveReport {
        let ignition = Instant::now();

        // Inventario vacío: layout vacío y exitoso, por contrato.
        if objects.is_empty() {
            return SolveReport {
                success: true,
                placements: Vec::new(),
                collisions: Vec::new(),
                metrics: LayoutMetrics {
                    solve_time: ignition.elapsed().as_secs_f64(),
                    constraint_satisfaction: 1.0,
                    spatial_efficiency: 0.0,
                },
                trace: None,
                error_message: None,
                seed: self.settings.random_seed,
            };
        }

        // 1. SIEMBRA TOPOLÓGICA
        let object_identifiers: Vec<String> =
            objects.iter().map(|object| object.object_id.clone()).collect();
        let order = topological_seed_order(&object_identifiers, constraints.relations());
        debug!("🧭 [SOLVER]: Seed order levelized: {:?}", order);

        // Jitter determinista de rejilla derivado de la semilla.
        let grid_jitter = match self.settings.random_seed {
            Some(seed) => {
                let mut deterministic_rng = StdRng::seed_from_u64(seed);
                let amplitude = self.settings.sampling_resolution / 2.0;
                (
                    deterministic_rng.gen_range(0.0..amplitude),
                    deterministic_rng.gen_range(0.0..amplitude),
                )
            }
            None => (0.0, 0.0),
        };

        let mut state = SearchState {
            order,
            objects_by_id: objects
                .iter()
                .map(|object| (object.object_id.as_str(), object))
                .collect(),
            constraints,
            settings: &self.settings,
            placed: Vec::with_capacity(objects.len()),
            candidates_tried: 0,
            backtrack_count: 0,
            attempts_per_object: HashMap::new(),
            frontier: None,
            ignition,
            timed_out: false,
            grid_jitter,
        };

        // 2. BÚSQUEDA EN PROFUNDIDAD CON RETROCESO
        let solved = self.place_from_depth(&mut state, 0);
        let solve_time = state.elapsed_seconds();

        if solved {
            let placements = self.build_success_placements(&state);
            let metrics = LayoutMetrics {
                solve_time,
                constraint_satisfaction: self.weighted_satisfaction(&state.placed, constraints),
                spatial_efficiency: self.footprint_efficiency(&state.placed, constraints),
            };
            info!(
                "✅ [SOLVER]: Layout sealed. {} objects in {:.3}s.",
                placements.len(),
                solve_time
            );
            return SolveReport {
                success: true,
                placements,
                collisions: Vec::new(),
                metrics,
                trace: None,
                error_message: None,
                seed: self.settings.random_seed,
            };
        }

        // 3. CRISTALIZACIÓN DEL RASTRO DE FALLO
        self.build_failure_report(state, solve_time)
    }

    /// Nodo recursivo de la búsqueda. true = subárbol resuelto.
    fn place_from_depth(&self, state: &mut SearchState<'_>, depth: usize) -> bool {
        if state.budget_exhausted() {
            state.timed_out = true;
            return false;
        }
        if depth >= state.order.len() {
            return true;
        }

        let object_id = state.order[depth].clone();
        let scene_object = *state
            .objects_by_id
            .get(object_id.as_str())
            .expect("SEED_ORDER_DRIFT: Ordered object missing from inventory index.");

        // --- GENERACIÓN DE CANDIDATOS ---
        let (candidates, search_space, region_collapsed, region_was_bound) =
            self.generate_candidates(state, scene_object);

        if region_collapsed || candidates.is_empty() {
            let frontier = FailureFrontier {
                depth,
                object_id: object_id.clone(),
                tally: RejectionTally::default(),
                candidates_generated: 0,
                search_space,
                best_score: 0.0,
                region_was_bound,
                placed_snapshot: state.placed.clone(),
            };
            state.record_frontier(frontier);
            return false;
        }

        // --- ESCALERA DE ACEPTACIÓN (ráfaga paralela determinista) ---
        let verdicts = self.evaluate_candidates(state, scene_object, &candidates);
        state.candidates_tried += candidates.len() as u64;

        let mut tally = RejectionTally::default();
        let mut best_rejected_score: f64 = 0.0;
        let mut accepted: Vec<(usize, ObjectPose, f64, f64)> = Vec::new();

        for verdict in verdicts {
            match verdict {
                CandidateVerdict::Accepted { index, pose, soft_score, displacement } => {
                    accepted.push((index, pose, soft_score, displacement));
                }
                CandidateVerdict::Rejected { cause, satisfied_fraction } => {
                    best_rejected_score = best_rejected_score.max(satisfied_fraction);
                    match cause {
                        RejectionCause::Boundary => tally.boundary += 1,
                        RejectionCause::Constraint => tally.constraint += 1,
                        RejectionCause::Collision => tally.collision += 1,
                        RejectionCause::Unstable => tally.unstable += 1,
                    }
                }
            }
        }

        // Ley de desempate: score blando desc, desplazamiento asc, índice asc.
        accepted.sort_by(|left, right| {
            right.2
                .total_cmp(&left.2)
                .then(left.3.total_cmp(&right.3))
                .then(left.0.cmp(&right.0))
        });

        if accepted.is_empty() {
            let frontier = FailureFrontier {
                depth,
                object_id: object_id.clone(),
                tally,
                candidates_generated: candidates.len() as u64,
                search_space,
                best_score: best_rejected_score,
                region_was_bound,
                placed_snapshot: state.placed.clone(),
            };
            state.record_frontier(frontier);
            return false;
        }

        // --- DESCENSO Y RETROCESO ---
        for (_, candidate_pose, _, _) in accepted {
            *state.attempts_per_object.entry(object_id.clone()).or_insert(0) += 1;
            state.placed.push((object_id.clone(), candidate_pose));

            if self.place_from_depth(state, depth + 1) {
                return true;
            }

            state.placed.pop();
            state.backtrack_count += 1;

            if state.timed_out {
                return false;
            }
        }

        // Subárbol agotado: los hijos ya registraron fronteras más profundas.
        let frontier = FailureFrontier {
            depth,
            object_id,
            tally,
            candidates_generated: candidates.len() as u64,
            search_space,
            best_score: best_rejected_score,
            region_was_bound,
            placed_snapshot: state.placed.clone(),
        };
        state.record_frontier(frontier);
        false
    }

    /// Genera las posiciones candidatas para un objeto en el estado actual.
    ///
    /// Retorna (candidatos, tamaño del espacio de búsqueda, región
    /// colapsada, región atada por restricciones).
    fn generate_candidates(
        &self,
        state: &SearchState<'_>,
        scene_object: &SceneObject,
    ) -> (Vec<Vec3>, u64, bool, bool) {
        let globals = state.constraints.globals();
        let room = maquette_core_geometry::FeasibleRegion::whole_room(globals.max_room_size / 2.0);

        // Restricciones que atan al objeto con un extremo ya colocado.
        let mut bound_region: Option<maquette_core_geometry::FeasibleRegion> = None;
        let mut any_binding = false;
        let mut collapsed = false;

        for constraint in state.constraints.relations() {
            // Las blandas no atan la región: guían la puntuación.
            if constraint.is_soft {
                continue;
            }
            let viewed = self.view_from(constraint, &scene_object.object_id);
            let Some((viewed_constraint, anchor_id)) = viewed else { continue };
            let Some(anchor_pose) = state.placed_pose(&anchor_id) else { continue };

            let Some(region) = feasible_region(
                &viewed_constraint,
                anchor_pose,
                scene_object.size_m,
                globals,
            ) else {
                // Relación sin cota posicional (far / rotación): no ata.
                continue;
            };

            any_binding = true;
            bound_region = match bound_region {
                None => Some(region),
                Some(accumulated) => match accumulated.intersect(&region) {
                    Some(merged) => Some(merged),
                    None => {
                        collapsed = true;
                        break;
                    }
                },
            };
        }

        if collapsed {
            return (Vec::new(), 0, true, true);
        }

        let sampling_region = match (any_binding, bound_region) {
            (true, Some(region)) => match region.intersect(&room) {
                Some(clipped) => clipped,
                None => return (Vec::new(), 0, true, true),
            },
            // Objeto libre: rejilla alrededor de su pose inicial.
            _ => {
                let neighborhood = maquette_core_geometry::FeasibleRegion::around(
                    scene_object.initial_pose.pos,
                    UNBOUND_SAMPLING_REACH_METERS,
                );
                match neighborhood.intersect(&room) {
                    Some(clipped) => clipped,
                    None => return (Vec::new(), 0, true, false),
                }
            }
        };

        let resolution = self.settings.sampling_resolution;
        let search_space = sampling_region.search_space_size(resolution) as u64;
        // Cosecha completa acotada; el tope nominal se aplica tras ordenar
        // por cercanía a la pose inicial, para que el recorte jamás ampute
        // el vecindario inmediato del objeto.
        let raw_samples = sampling_region.sample_grid(resolution, GRID_HARVEST_CEILING);

        // Anclaje vertical: banda degenerada (on) > banda elevada (above) > suelo.
        let ground_height = scene_object.ground_anchor_height();
        let anchored: Vec<Vec3> = raw_samples
            .into_iter()
            .map(|sample| {
                let jittered_x = sample.x + state.grid_jitter.0;
                let jittered_y = sample.y + state.grid_jitter.1;
                let sample_x = if jittered_x <= sampling_region.max_x { jittered_x } else { sample.x };
                let sample_y = if jittered_y <= sampling_region.max_y { jittered_y } else { sample.y };

                let anchor_z = if (sampling_region.max_z - sampling_region.min_z).abs() < 1e-9
                    && sampling_region.min_z > 0.0
                {
                    sampling_region.min_z
                } else if sampling_region.min_z > 0.0 {
                    sampling_region.min_z.max(ground_height)
                } else if globals.ground_only_default {
                    ground_height
                } else {
                    scene_object.initial_pose.pos.z.max(ground_height)
                };

                Vec3::new(sample_x, sample_y, anchor_z)
            })
            .collect();

        let initial_position = scene_object.initial_pose.pos;
        let mut ranked: Vec<(usize, Vec3)> = anchored.into_iter().enumerate().collect();
        ranked.sort_by(|left, right| {
            left.1
                .distance_to(&initial_position)
                .total_cmp(&right.1.distance_to(&initial_position))
                .then(left.0.cmp(&right.0))
        });
        ranked.truncate(self.settings.max_candidates_per_object);
        let candidates: Vec<Vec3> = ranked.into_iter().map(|(_, sample)| sample).collect();

        (candidates, search_space, false, any_binding)
    }

    /// Reinterpreta una restricción desde la perspectiva del objeto a colocar.
    ///
    /// Retorna la restricción vista (con el objeto como fuente) y el id del
    /// extremo ancla, o None cuando la restricción no involucra al objeto.
    fn view_from(
        &self,
        constraint: &SpatialConstraint,
        object_id: &str,
    ) -> Option<(SpatialConstraint, String)> {
        if constraint.source == object_id {
            return Some((constraint.clone(), constraint.target.clone()));
        }
        if constraint.target == object_id {
            let mut viewed = constraint.clone();
            viewed.relation = constraint.relation.get_inverse();
            viewed.constraint_type = viewed.relation.constraint_type();
            viewed.source = constraint.target.clone();
            viewed.target = constraint.source.clone();
            return Some((viewed, constraint.source.clone()));
        }
        None
    }

    /// Ráfaga de evaluación de candidatos: escalera de aceptación completa.
    fn evaluate_candidates(
        &self,
        state: &SearchState<'_>,
        scene_object: &SceneObject,
        candidates: &[Vec3],
    ) -> Vec<CandidateVerdict> {
        let globals = state.constraints.globals();
        let room_half = globals.max_room_size / 2.0;
        let room_box = Aabb {
            min: Vec3::new(-room_half, -room_half, 0.0),
            max: Vec3::new(room_half, room_half, globals.max_room_size),
        };

        // Restricciones activas: el otro extremo ya está colocado.
        let active: Vec<(&SpatialConstraint, bool)> = state
            .constraints
            .relations()
            .iter()
            .filter_map(|constraint| {
                if constraint.source == scene_object.object_id
                    && state.placed_pose(&constraint.target).is_some()
                {
                    Some((constraint, true))
                } else if constraint.target == scene_object.object_id
                    && state.placed_pose(&constraint.source).is_some()
                {
                    Some((constraint, false))
                } else {
                    None
                }
            })
            .collect();

        // Ancla de orientación: la primera face_to activa orienta al objeto.
        let facing_anchor: Option<Vec3> = active
            .iter()
            .find(|(constraint, object_is_source)| {
                *object_is_source && constraint.relation == RelationType::FaceTo
            })
            .and_then(|(constraint, _)| state.placed_pose(&constraint.target))
            .map(|anchor| anchor.position);

        // Soporte de la relación 'on': exento del test de colisión (el
        // contacto cara a cara es el estado esperado) y ancla de la
        // verificación de estabilidad.
        let support: Option<(String, ObjectPose)> = active
            .iter()
            .find(|(constraint, object_is_source)| {
                *object_is_source && constraint.relation == RelationType::On
            })
            .and_then(|(constraint, _)| {
                state
                    .placed_pose(&constraint.target)
                    .copied()
                    .map(|pose| (constraint.target.clone(), pose))
            });

        let placed_snapshot: Vec<(String, ObjectPose)> = state.placed.clone();
        let settings = &self.settings;
        let initial_position = scene_object.initial_pose.pos;
        let base_rotation = scene_object.initial_pose.rot_euler;
        let object_size = scene_object.size_m;

        candidates
            .par_iter()
            .enumerate()
            .map(|(index, candidate_position)| {
                // Orientación: face_to fija la guiñada hacia el ancla.
                let rotation = match facing_anchor {
                    Some(anchor) => {
                        let to_anchor_x = anchor.x - candidate_position.x;
                        let to_anchor_y = anchor.y - candidate_position.y;
                        let yaw_degrees = maquette_core_geometry::normalize_degrees(
                            to_anchor_x.atan2(-to_anchor_y).to_degrees(),
                        );
                        Vec3::new(base_rotation.x, base_rotation.y, yaw_degrees)
                    }
                    None => base_rotation,
                };

                let candidate_pose = ObjectPose {
                    position: *candidate_position,
                    rotation,
                    size: object_size,
                };

                // PELDAÑO 1: FRONTERA DE SALA
                let candidate_box = Aabb::from_center_size(*candidate_position, object_size);
                if !candidate_box.contained_in(&room_box) {
                    return CandidateVerdict::Rejected {
                        cause: RejectionCause::Boundary,
                        satisfied_fraction: 0.0,
                    };
                }

                // PELDAÑO 2: RESTRICCIONES DURAS
                let mut hard_total = 0u32;
                let mut hard_satisfied = 0u32;
                for (constraint, object_is_source) in &active {
                    if constraint.is_soft {
                        continue;
                    }
                    hard_total += 1;
                    let satisfied = self.evaluate_active(
                        state,
                        constraint,
                        *object_is_source,
                        &candidate_pose,
                    );
                    if satisfied {
                        hard_satisfied += 1;
                    }
                }
                if hard_satisfied < hard_total {
                    let fraction = if hard_total == 0 {
                        0.0
                    } else {
                        hard_satisfied as f64 / hard_total as f64
                    };
                    return CandidateVerdict::Rejected {
                        cause: RejectionCause::Constraint,
                        satisfied_fraction: fraction,
                    };
                }

                // PELDAÑO 3: COLISIÓN AABB CON HOLGURA
                for (other_id, other_pose) in &placed_snapshot {
                    // El soporte de 'on' comparte cara por contrato.
                    if let Some((support_id, _)) = &support {
                        if support_id == other_id {
                            continue;
                        }
                    }
                    if maquette_core_geometry::aabb::check_collision(
                        *candidate_position,
                        object_size,
                        other_pose.position,
                        other_pose.size,
                        settings.collision_clearance_m,
                    ) {
                        return CandidateVerdict::Rejected {
                            cause: RejectionCause::Collision,
                            satisfied_fraction: 1.0,
                        };
                    }
                }

                // PELDAÑO 4: ESTABILIDAD (proyección del centro de masa)
                if settings.gravity_enabled {
                    if let Some((_, support_pose)) = &support {
                        let support_box =
                            Aabb::from_center_size(support_pose.position, support_pose.size)
                                .inflate(settings.stability_margin);
                        let within_support = candidate_position.x >= support_box.min.x
                            && candidate_position.x <= support_box.max.x
                            && candidate_position.y >= support_box.min.y
                            && candidate_position.y <= support_box.max.y;
                        if !within_support {
                            return CandidateVerdict::Rejected {
                                cause: RejectionCause::Unstable,
                                satisfied_fraction: 1.0,
                            };
                        }
                    }
                }

                // PUNTUACIÓN BLANDA PONDERADA
                let mut soft_score = 0.0;
                for (constraint, object_is_source) in &active {
                    if !constraint.is_soft {
                        continue;
                    }
                    if self.evaluate_active(state, constraint, *object_is_source, &candidate_pose)
                    {
                        soft_score += constraint.weight;
                    }
                }

                let displacement = candidate_position.distance_to(&initial_position);
                CandidateVerdict::Accepted {
                    index,
                    pose: candidate_pose,
                    soft_score,
                    displacement,
                }
            })
            .collect()
    }

    /// Evalúa una restricción activa respetando su dirección real.
    fn evaluate_active(
        &self,
        state: &SearchState<'_>,
        constraint: &SpatialConstraint,
        object_is_source: bool,
        candidate_pose: &ObjectPose,
    ) -> bool {
        if object_is_source {
            let Some(target_pose) = state.placed_pose(&constraint.target) else {
                return true;
            };
            check_constraint(constraint, candidate_pose, target_pose).satisfied
        } else {
            let Some(source_pose) = state.placed_pose(&constraint.source) else {
                return true;
            };
            check_constraint(constraint, source_pose, candidate_pose).satisfied
        }
    }

    fn build_success_placements(&self, state: &SearchState<'_>) -> Vec<PlacementRecord> {
        state
            .placed
            .iter()
            .map(|(object_id, pose)| {
                let satisfaction = self.object_satisfaction(object_id, state);
                PlacementRecord {
                    object_id: object_id.clone(),
                    position: pose.position,
                    rotation: pose.rotation,
                    scale: self.settings.scale_strategy.scale_for(pose.size),
                    successful: true,
                    constraint_satisfaction_score: satisfaction,
                    stability_score: self.settings.gravity_enabled.then_some(1.0),
                    collision_count: 0,
                    attempts: state
                        .attempts_per_object
                        .get(object_id)
                        .copied()
                        .unwrap_or(1),
                }
            })
            .collect()
    }

    /// Fracción de restricciones del objeto satisfechas en el estado final.
    fn object_satisfaction(&self, object_id: &str, state: &SearchState<'_>) -> f64 {
        let involved: Vec<&SpatialConstraint> = state
            .constraints
            .relations()
            .iter()
            .filter(|constraint| {
                constraint.source == object_id || constraint.target == object_id
            })
            .collect();

        if involved.is_empty() {
            return 1.0;
        }

        let satisfied = involved
            .iter()
            .filter(|constraint| {
                match (
                    state.placed_pose(&constraint.source),
                    state.placed_pose(&constraint.target),
                ) {
                    (Some(source_pose), Some(target_pose)) => {
                        check_constraint(constraint, source_pose, target_pose).satisfied
                    }
                    _ => false,
                }
            })
            .count();

        satisfied as f64 / involved.len() as f64
    }

    /// Satisfacción ponderada global sobre el conjunto colocado.
    fn weighted_satisfaction(
        &self,
        placed: &[(String, ObjectPose)],
        constraints: &ConstraintSet,
    ) -> f64 {
        let pose_of = |object_id: &str| {
            placed
                .iter()
                .find(|(identifier, _)| identifier == object_id)
                .map(|(_, pose)| pose)
        };

        let mut total_weight = 0.0;
        let mut satisfied_weight = 0.0;

        for constraint in constraints.relations() {
            let weight = constraint.weight.max(f64::EPSILON);
            total_weight += weight;
            if let (Some(source_pose), Some(target_pose)) =
                (pose_of(&constraint.source), pose_of(&constraint.target))
            {
                if check_constraint(constraint, source_pose, target_pose).satisfied {
                    satisfied_weight += weight;
                }
            }
        }

        if total_weight <= f64::EPSILON {
            1.0
        } else {
            satisfied_weight / total_weight
        }
    }

    /// Ocupación de huella de suelo sobre el área de la sala, en [0, 1].
    fn footprint_efficiency(
        &self,
        placed: &[(String, ObjectPose)],
        constraints: &ConstraintSet,
    ) -> f64 {
        let room_side = constraints.globals().max_room_size;
        let room_area = room_side * room_side;
        if room_area <= 0.0 {
            return 0.0;
        }
        let occupied: f64 = placed
            .iter()
            .map(|(_, pose)| pose.size.x * pose.size.y)
            .sum();
        (occupied / room_area).clamp(0.0, 1.0)
    }

    /// Cristaliza el reporte de fallo con su rastro forense.
    fn build_failure_report(&self, state: SearchState<'_>, solve_time: f64) -> SolveReport {
        let frontier = state.frontier.unwrap_or_else(|| FailureFrontier {
            depth: 0,
            object_id: state.order.first().cloned().unwrap_or_default(),
            tally: RejectionTally::default(),
            candidates_generated: 0,
            search_space: 0,
            best_score: 0.0,
            region_was_bound: false,
            placed_snapshot: Vec::new(),
        });

        let conflict_type = classify_conflict(
            &frontier.tally,
            frontier.candidates_generated,
            state.timed_out,
            frontier.region_was_bound,
        );

        let placed_identifiers: Vec<String> = frontier
            .placed_snapshot
            .iter()
            .map(|(identifier, _)| identifier.clone())
            .collect();

        let summary = natural_language_summary(
            &frontier.object_id,
            &placed_identifiers,
            conflict_type,
            state.candidates_tried,
            solve_time,
        );

        let active_constraints: Vec<ActiveConstraintRef> = state
            .constraints
            .for_object(&frontier.object_id)
            .into_iter()
            .map(|constraint| ActiveConstraintRef {
                source: constraint.source.clone(),
                target: constraint.target.clone(),
                relation: constraint.relation,
            })
            .collect();

        let trace = DfsTrace {
            failed_object_id: frontier.object_id.clone(),
            placed_objects: placed_identifiers,
            conflict_type,
            active_constraints,
            candidates_tried: state.candidates_tried,
            search_space_size: frontier.search_space,
            best_candidate_score: frontier.best_score,
            traceback_depth: state.backtrack_count,
            time_at_failure: solve_time,
            natural_language_summary: summary.clone(),
            fix_suggestions: fix_suggestions(conflict_type),
        };

        // Prefijo colocado de la frontera + registro del objeto fallido.
        let mut placements: Vec<PlacementRecord> = frontier
            .placed_snapshot
            .iter()
            .map(|(object_id, pose)| PlacementRecord {
                object_id: object_id.clone(),
                position: pose.position,
                rotation: pose.rotation,
                scale: self.settings.scale_strategy.scale_for(pose.size),
                successful: true,
                constraint_satisfaction_score: 1.0,
                stability_score: self.settings.gravity_enabled.then_some(1.0),
                collision_count: 0,
                attempts: state
                    .attempts_per_object
                    .get(object_id)
                    .copied()
                    .unwrap_or(1),
            })
            .collect();

        if let Some(failed_object) = state.objects_by_id.get(frontier.object_id.as_str()) {
            placements.push(PlacementRecord {
                object_id: frontier.object_id.clone(),
                position: failed_object.initial_pose.pos,
                rotation: failed_object.initial_pose.rot_euler,
                scale: self.settings.scale_strategy.scale_for(failed_object.size_m),
                successful: false,
                constraint_satisfaction_score: frontier.best_score,
                stability_score: None,
                collision_count: frontier.tally.collision.min(u32::MAX as u64) as u32,
                attempts: frontier.candidates_generated.min(u32::MAX as u64) as u32,
            });
        }

        warn!(
            "🛑 [SOLVER]: Placement collapsed at '{}' ({:?}) after {:.3}s.",
            frontier.object_id, conflict_type, solve_time
        );

        SolveReport {
            success: false,
            placements,
            collisions: Vec::new(),
            metrics: LayoutMetrics {
                solve_time,
                constraint_satisfaction: self
                    .weighted_satisfaction(&frontier.placed_snapshot, state.constraints),
                spatial_efficiency: self
                    .footprint_efficiency(&frontier.placed_snapshot, state.constraints),
            },
            trace: Some(trace),
            error_message: Some(summary),
            seed: self.settings.random_seed,
        }
    }
}
