// [libs/core/dispatch/src/outcome.rs]
/*!
 * =================================================================
 * APARATO: JOB OUTCOME CONTRACT (V11.1 - BATCH PARITY)
 * CLASIFICACIÓN: CORE EXECUTION (ESTRATO L1)
 * RESPONSABILIDAD: RESULTADO CANÓNICO POR ELEMENTO DE LOTE
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. ELEMENT SOVEREIGNTY: Cada elemento del lote porta su propio
 *    veredicto, duración, conteo de intentos y handle remoto; un fallo
 *    individual jamás contamina a sus vecinos.
 * 2. CANCELLATION AS OUTCOME: La cancelación no es una excepción, es un
 *    resultado de primera clase que el llamador inspecciona.
 * =================================================================
 */

use crate::triage::FaultTriage;
use thiserror::Error;

/// Carga útil de un trabajo exitoso más su handle remoto opcional.
#[derive(Debug, Clone, PartialEq)]
pub struct JobYield<R> {
    pub payload: R,
    /// Identificador del trabajo en el servicio remoto (si lo emitió).
    pub upstream_job_id: Option<String>,
}

impl<R> JobYield<R> {
    pub fn immediate(payload: R) -> Self {
        Self { payload, upstream_job_id: None }
    }

    pub fn tracked(payload: R, upstream_job_id: impl Into<String>) -> Self {
        Self { payload, upstream_job_id: Some(upstream_job_id.into()) }
    }
}

/// Fallo terminal de un trabajo, envolviendo el fallo del servicio.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum JobError<E> {
    #[error("UPSTREAM_FAULT: {0}")]
    Upstream(E),

    #[error("JOB_TIMEOUT: Hard cap of {limit_seconds}s exceeded")]
    Timeout { limit_seconds: f64 },

    #[error("JOB_CANCELLED: Cancellation signal observed before completion")]
    Cancelled,
}

impl<E: FaultTriage> FaultTriage for JobError<E> {
    fn is_retryable(&self) -> bool {
        match self {
            JobError::Upstream(upstream_fault) => upstream_fault.is_retryable(),
            // El tope temporal es un límite duro: sin reintento.
            JobError::Timeout { .. } => false,
            JobError::Cancelled => false,
        }
    }
}

/// Resultado canónico de un elemento de lote.
///
/// El lote de N entradas produce exactamente N resultados, posición a
/// posición, sin reordenamiento.
#[derive(Debug, Clone)]
pub struct JobOutcome<R, E> {
    pub success: bool,
    pub result: Option<R>,
    pub error: Option<JobError<E>>,
    pub elapsed_seconds: f64,
    pub attempt_count: u32,
    pub upstream_job_id: Option<String>,
}

impl<R, E> JobOutcome<R, E> {
    pub fn triumph(job_yield: JobYield<R>, elapsed_seconds: f64, attempt_count: u32) -> Self {
        Self {
            success: true,
            result: Some(job_yield.payload),
            error: None,
            elapsed_seconds,
            attempt_count,
            upstream_job_id: job_yield.upstream_job_id,
        }
    }

    pub fn collapse(error: JobError<E>, elapsed_seconds: f64, attempt_count: u32) -> Self {
        Self {
            success: false,
            result: None,
            error: Some(error),
            elapsed_seconds,
            attempt_count,
            upstream_job_id: None,
        }
    }

    pub fn was_cancelled(&self) -> bool {
        matches!(self.error, Some(JobError::Cancelled))
    }
}
