// [libs/core/dispatch/src/engine.rs]
/*!
 * =================================================================
 * APARATO: BOUNDED DISPATCH ENGINE (V11.2 - HYDRA ADMISSION)
 * CLASIFICACIÓN: CORE EXECUTION (ESTRATO L1)
 * RESPONSABILIDAD: ADMISIÓN ACOTADA, REINTENTOS Y LOTES ORDENADOS
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. SEMAPHORE ADMISSION: A lo sumo C trabajos en vuelo contra el
 *    servicio subyacente; la sumisión a un semáforo lleno bloquea en
 *    orden FIFO hasta liberar un cupo.
 * 2. EXPONENTIAL BACKOFF: Fallos transitorios duermen base * 2^(n-1)
 *    entre intentos; los fallos no reintentables colapsan de inmediato.
 * 3. POLITE CANCELLATION: La señal de cancelación aborta la cola de
 *    admisión al instante y aflora como resultado en el siguiente tick
 *    de intento de los trabajos en vuelo.
 *
 * # Mathematical Proof (Batch Latency):
 * Con N trabajos homogéneos y capacidad C, la latencia total del lote
 * converge a ceil(N / C) veces la latencia mediana por trabajo: el
 * semáforo forma un pipeline de C carriles saturados.
 * =================================================================
 */

use futures::future::join_all;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio::time::{sleep, timeout};
use tracing::{debug, instrument, warn};

use crate::outcome::{JobError, JobOutcome, JobYield};
use crate::triage::FaultTriage;

/// Configuración del motor de despacho acotado.
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    /// Capacidad C del semáforo de admisión.
    pub capacity: usize,
    /// Reintentos máximos por trabajo (intentos totales = max_retries + 1).
    pub max_retries: u32,
    /// Base del backoff exponencial, en segundos.
    pub retry_delay_seconds: f64,
    /// Tope duro de duración por trabajo, en segundos.
    pub per_job_timeout_seconds: f64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            capacity: 2,
            max_retries: 3,
            retry_delay_seconds: 2.0,
            per_job_timeout_seconds: 120.0,
        }
    }
}

/// Motor de despacho con admisión por semáforo y reintentos.
///
/// El semáforo es propiedad de la instancia: dos pipelines que comparten
/// el mismo motor comparten el control de admisión contra el servicio.
pub struct DispatchEngine {
    admission_semaphore: Arc<Semaphore>,
    cancellation_signal: Arc<AtomicBool>,
    config: DispatchConfig,
}

impl DispatchEngine {
    pub fn new(config: DispatchConfig) -> Self {
        Self {
            admission_semaphore: Arc::new(Semaphore::new(config.capacity.max(1))),
            cancellation_signal: Arc::new(AtomicBool::new(false)),
            config,
        }
    }

    pub fn with_default_config() -> Self {
        Self::new(DispatchConfig::default())
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Handle compartido de cancelación para integrarse con señales externas.
    pub fn cancellation_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancellation_signal)
    }

    /// Activa la señal de cancelación cortés.
    pub fn cancel(&self) {
        // SeqCst para visibilidad inmediata en todos los carriles en vuelo.
        self.cancellation_signal.store(true, Ordering::SeqCst);
        warn!("⚠️ [DISPATCH]: Cancellation signal armed. Admission queue sealed.");
    }

    fn is_cancelled(&self) -> bool {
        self.cancellation_signal.load(Ordering::SeqCst)
    }

    /// Ejecuta un lote preservando cardinalidad y orden de entrada.
    ///
    /// La salida tiene exactamente la longitud de la entrada y
    /// `outputs[i]` corresponde a `inputs[i]` sin importar el orden en el
    /// que los trabajos terminen.
    #[instrument(skip_all, fields(batch_size = tasks.len(), capacity = self.config.capacity))]
    pub async fn execute_batch<T, R, E, F, Fut>(
        &self,
        tasks: Vec<T>,
        operation: F,
    ) -> Vec<JobOutcome<R, E>>
    where
        T: Clone,
        E: FaultTriage,
        F: Fn(T) -> Fut + Clone,
        Fut: Future<Output = Result<JobYield<R>, E>>,
    {
        let admitted_jobs = tasks
            .into_iter()
            .map(|task| self.execute_admitted_job(task, operation.clone()));

        // join_all preserva el orden posicional de las promesas.
        join_all(admitted_jobs).await
    }

    /// Ejecuta un único trabajo bajo admisión, timeout y reintentos.
    pub async fn execute_admitted_job<T, R, E, F, Fut>(
        &self,
        task: T,
        operation: F,
    ) -> JobOutcome<R, E>
    where
        T: Clone,
        E: FaultTriage,
        F: Fn(T) -> Fut,
        Fut: Future<Output = Result<JobYield<R>, E>>,
    {
        let ignition_timestamp = Instant::now();

        // 1. PUERTA DE CANCELACIÓN PRE-ADMISIÓN
        if self.is_cancelled() {
            return JobOutcome::collapse(JobError::Cancelled, 0.0, 0);
        }

        // 2. ADMISIÓN FIFO (bloquea hasta liberar cupo)
        let _admission_permit = self
            .admission_semaphore
            .acquire()
            .await
            .expect("CRITICAL_FAULT: Admission semaphore closed unexpectedly.");

        if self.is_cancelled() {
            return JobOutcome::collapse(
                JobError::Cancelled,
                ignition_timestamp.elapsed().as_secs_f64(),
                0,
            );
        }

        // 3. BUCLE DE INTENTOS CON BACKOFF EXPONENCIAL
        let total_attempts_allowed = self.config.max_retries + 1;
        let hard_cap = Duration::from_secs_f64(self.config.per_job_timeout_seconds);
        let mut attempt_number: u32 = 0;

        loop {
            attempt_number += 1;

            let attempt_verdict = timeout(hard_cap, operation(task.clone())).await;

            match attempt_verdict {
                Ok(Ok(job_yield)) => {
                    return JobOutcome::triumph(
                        job_yield,
                        ignition_timestamp.elapsed().as_secs_f64(),
                        attempt_number,
                    );
                }
                Ok(Err(upstream_fault)) => {
                    let retry_allowed =
                        upstream_fault.is_retryable() && attempt_number < total_attempts_allowed;

                    if !retry_allowed {
                        return JobOutcome::collapse(
                            JobError::Upstream(upstream_fault),
                            ignition_timestamp.elapsed().as_secs_f64(),
                            attempt_number,
                        );
                    }

                    let backoff_seconds = self.config.retry_delay_seconds
                        * 2f64.powi(attempt_number as i32 - 1);
                    debug!(
                        "🔁 [DISPATCH]: Attempt {} collapsed transiently. Backoff {:.1}s.",
                        attempt_number, backoff_seconds
                    );
                    sleep(Duration::from_secs_f64(backoff_seconds)).await;

                    // Tick de cancelación entre intentos.
                    if self.is_cancelled() {
                        return JobOutcome::collapse(
                            JobError::Cancelled,
                            ignition_timestamp.elapsed().as_secs_f64(),
                            attempt_number,
                        );
                    }
                }
                Err(_elapsed) => {
                    return JobOutcome::collapse(
                        JobError::Timeout {
                            limit_seconds: self.config.per_job_timeout_seconds,
                        },
                        ignition_timestamp.elapsed().as_secs_f64(),
                        attempt_number,
                    );
                }
            }
        }
    }
}
