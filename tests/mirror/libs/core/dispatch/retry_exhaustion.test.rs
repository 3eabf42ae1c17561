/**
 * =================================================================
 * APARATO: RETRY EXHAUSTION TEST (V4.0)
 * CLASIFICACIÓN: TRINITY EVIDENCE (ESTRATO L1-DISPATCH)
 * OBJETIVO: Certificar el backoff exponencial, el agotamiento en
 *           max_retries + 1 intentos y el colapso inmediato de los
 *           fallos no reintentables.
 * =================================================================
 */

use maquette_core_dispatch::{DispatchConfig, DispatchEngine, FaultTriage, JobError, JobYield};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Clone, PartialEq)]
enum ProbeFault {
    Transient,
    Terminal,
}

impl std::fmt::Display for ProbeFault {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProbeFault::Transient => write!(formatter, "TRANSIENT"),
            ProbeFault::Terminal => write!(formatter, "TERMINAL"),
        }
    }
}

impl FaultTriage for ProbeFault {
    fn is_retryable(&self) -> bool {
        matches!(self, ProbeFault::Transient)
    }
}

#[tokio::test]
async fn certify_transient_fault_exhausts_full_attempt_budget() {
    let engine = DispatchEngine::new(DispatchConfig {
        capacity: 1,
        max_retries: 3,
        retry_delay_seconds: 0.01,
        per_job_timeout_seconds: 5.0,
    });

    let attempt_counter = Arc::new(AtomicU32::new(0));
    let counter_reference = Arc::clone(&attempt_counter);

    let ignition = Instant::now();
    let outcome = engine
        .execute_admitted_job((), move |_task: ()| {
            let counter = Arc::clone(&counter_reference);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err::<JobYield<()>, ProbeFault>(ProbeFault::Transient)
            }
        })
        .await;

    // max_retries + 1 intentos totales, ni uno más.
    assert!(!outcome.success);
    assert_eq!(outcome.attempt_count, 4);
    assert_eq!(attempt_counter.load(Ordering::SeqCst), 4);
    assert!(matches!(outcome.error, Some(JobError::Upstream(ProbeFault::Transient))));

    // Backoff 0.01 + 0.02 + 0.04 = 0.07 s de sueño acumulado mínimo.
    assert!(ignition.elapsed().as_secs_f64() >= 0.07);
}

#[tokio::test]
async fn certify_terminal_fault_fails_fast() {
    let engine = DispatchEngine::new(DispatchConfig {
        capacity: 1,
        max_retries: 5,
        retry_delay_seconds: 0.5,
        per_job_timeout_seconds: 5.0,
    });

    let ignition = Instant::now();
    let outcome = engine
        .execute_admitted_job((), |_task: ()| async {
            Err::<JobYield<()>, ProbeFault>(ProbeFault::Terminal)
        })
        .await;

    // Un único intento, sin sueño de backoff.
    assert!(!outcome.success);
    assert_eq!(outcome.attempt_count, 1);
    assert!(ignition.elapsed().as_secs_f64() < 0.4, "Terminal faults must not back off.");
}

#[tokio::test]
async fn certify_hard_timeout_caps_the_job() {
    let engine = DispatchEngine::new(DispatchConfig {
        capacity: 1,
        max_retries: 3,
        retry_delay_seconds: 0.01,
        per_job_timeout_seconds: 0.05,
    });

    let outcome = engine
        .execute_admitted_job((), |_task: ()| async {
            tokio::time::sleep(std::time::Duration::from_secs(30)).await;
            Ok::<_, ProbeFault>(JobYield::immediate(()))
        })
        .await;

    // El tope temporal es duro: sin reintentos posteriores.
    assert!(!outcome.success);
    assert_eq!(outcome.attempt_count, 1);
    assert!(matches!(outcome.error, Some(JobError::Timeout { .. })));
}
