// [libs/core/dispatch/src/polling.rs]
/*!
 * =================================================================
 * APARATO: ASYNC JOB POLLING ENGINE (V11.3 - CONSECUTIVE GUARD)
 * CLASIFICACIÓN: CORE EXECUTION (ESTRATO L1)
 * RESPONSABILIDAD: SONDEO ACOTADO DE TRABAJOS REMOTOS CON HANDLE
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. CONSECUTIVE-ERROR GUARD: Una racha de errores de sondeo alcanza el
 *    umbral y el sondeo completo aflora como fallo reintentable del
 *    trabajo; un sondeo exitoso resetea la racha.
 * 2. HARD DEADLINE: El tope temporal rige sin importar el estado que
 *    reporte el servicio remoto.
 * =================================================================
 */

use std::future::Future;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{debug, warn};

/// Configuración del bucle de sondeo.
#[derive(Debug, Clone)]
pub struct PollingConfig {
    pub poll_interval_seconds: f64,
    pub timeout_seconds: f64,
    pub consecutive_error_threshold: u32,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            poll_interval_seconds: 2.0,
            timeout_seconds: 120.0,
            consecutive_error_threshold: 3,
        }
    }
}

/// Veredicto de un sondeo individual del servicio remoto.
#[derive(Debug, Clone, PartialEq)]
pub enum PollVerdict<R> {
    /// El trabajo remoto concluyó con esta carga útil.
    Completed(R),
    /// El trabajo sigue en curso; dormir y re-sondear.
    Pending,
    /// El servicio reporta fallo terminal del trabajo.
    Failed(String),
}

/// Fallos terminales del bucle de sondeo.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PollCollapse {
    #[error("POLL_STREAK_COLLAPSE: {streak} consecutive poll errors for job '{upstream_job_id}'")]
    ConsecutiveErrors { upstream_job_id: String, streak: u32 },

    #[error("POLL_DEADLINE: Job '{upstream_job_id}' still pending after {limit_seconds}s")]
    Deadline { upstream_job_id: String, limit_seconds: f64 },

    #[error("REMOTE_JOB_FAILED: Job '{upstream_job_id}' reported terminal failure: {detail}")]
    RemoteFailure { upstream_job_id: String, detail: String },
}

impl crate::triage::FaultTriage for PollCollapse {
    fn is_retryable(&self) -> bool {
        // La racha de errores de sondeo cuenta como fallo transitorio del
        // trabajo completo; el deadline y el fallo remoto son terminales.
        matches!(self, PollCollapse::ConsecutiveErrors { .. })
    }
}

/// Sondea un trabajo remoto hasta su conclusión, racha de errores o deadline.
///
/// # Errors:
/// - `ConsecutiveErrors` (reintentable) al agotar el umbral de racha.
/// - `Deadline` al exceder el tope temporal.
/// - `RemoteFailure` cuando el servicio declara el trabajo fallido.
pub async fn poll_until_complete<R, E, F, Fut>(
    upstream_job_id: &str,
    config: &PollingConfig,
    mut poll_operation: F,
) -> Result<R, PollCollapse>
where
    E: std::fmt::Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<PollVerdict<R>, E>>,
{
    let ignition_timestamp = Instant::now();
    let deadline = Duration::from_secs_f64(config.timeout_seconds);
    let mut consecutive_error_streak: u32 = 0;

    loop {
        if ignition_timestamp.elapsed() >= deadline {
            return Err(PollCollapse::Deadline {
                upstream_job_id: upstream_job_id.to_string(),
                limit_seconds: config.timeout_seconds,
            });
        }

        match poll_operation().await {
            Ok(PollVerdict::Completed(payload)) => {
                debug!("✅ [POLL]: Remote job '{}' sealed.", upstream_job_id);
                return Ok(payload);
            }
            Ok(PollVerdict::Failed(detail)) => {
                return Err(PollCollapse::RemoteFailure {
                    upstream_job_id: upstream_job_id.to_string(),
                    detail,
                });
            }
            Ok(PollVerdict::Pending) => {
                consecutive_error_streak = 0;
                sleep(Duration::from_secs_f64(config.poll_interval_seconds)).await;
            }
            Err(poll_fault) => {
                consecutive_error_streak += 1;
                warn!(
                    "🌫️ [POLL]: Probe {} for job '{}' collapsed: {}",
                    consecutive_error_streak, upstream_job_id, poll_fault
                );
                if consecutive_error_streak >= config.consecutive_error_threshold {
                    return Err(PollCollapse::ConsecutiveErrors {
                        upstream_job_id: upstream_job_id.to_string(),
                        streak: consecutive_error_streak,
                    });
                }
                sleep(Duration::from_secs_f64(config.poll_interval_seconds)).await;
            }
        }
    }
}
