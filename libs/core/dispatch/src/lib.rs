// [libs/core/dispatch/src/lib.rs]
/*!
 * =================================================================
 * APARATO: BOUNDED DISPATCH HUB (V11.0 - FIFO SEAL)
 * CLASIFICACIÓN: CORE EXECUTION (ESTRATO L1)
 * RESPONSABILIDAD: EXPOSICIÓN NOMINAL DEL EJECUTOR ACOTADO
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. CAPACITY SOVEREIGNTY: Cada instancia del motor posee su semáforo;
 *    dos pipelines que comparten el motor comparten el control de
 *    admisión, por diseño del contrato de recursos externos.
 * 2. ORDER PRESERVATION: Un lote de N entradas produce exactamente N
 *    salidas en el orden de entrada, sin importar el orden de término.
 * =================================================================
 */

pub mod triage;
pub mod outcome;
pub mod engine;
pub mod polling;

pub use triage::FaultTriage;
pub use outcome::{JobError, JobOutcome, JobYield};
pub use engine::{DispatchConfig, DispatchEngine};
pub use polling::{poll_until_complete, PollCollapse, PollVerdict, PollingConfig};
