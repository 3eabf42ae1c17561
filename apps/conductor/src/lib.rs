// [apps/conductor/src/lib.rs]
/*!
 * =================================================================
 * APARATO: CONDUCTOR LIBRARY HUB (V12.0 - STAGED SOVEREIGN)
 * CLASIFICACIÓN: APPLICATION LAYER (ESTRATO L4-APP)
 * RESPONSABILIDAD: EXPOSICIÓN NOMINAL DEL RUNNER DE PIPELINE
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. SEQUENTIAL STAGES: Las etapas ejecutan en serie sobre un único
 *    trabajador lógico; el paralelismo vive DENTRO de cada etapa,
 *    acotado por el ejecutor de despacho.
 * 2. RESUME BY PRESENCE: El runner salta toda etapa cuyo conjunto de
 *    artefactos declarados ya existe y no está vacío.
 * =================================================================
 */

pub mod settings;
pub mod stages;
pub mod stage_data;
pub mod retrieval;
pub mod execution;
pub mod runner;
pub mod bootstrap;

pub use settings::ConductorSettings;
pub use stages::PipelineStage;
pub use stage_data::StageData;
pub use runner::{PipelineRunner, RunOutcome};
pub use bootstrap::ClientRoster;
