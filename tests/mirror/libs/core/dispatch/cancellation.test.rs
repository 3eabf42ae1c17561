/**
 * =================================================================
 * APARATO: POLITE CANCELLATION TEST (V4.0)
 * CLASIFICACIÓN: TRINITY EVIDENCE (ESTRATO L1-DISPATCH)
 * OBJETIVO: Certificar que la señal de cancelación sella la cola de
 *           admisión y aflora como resultado en los trabajos en vuelo.
 * =================================================================
 */

use maquette_core_dispatch::{DispatchConfig, DispatchEngine, FaultTriage, JobError, JobYield};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
struct ProbeFault;

impl std::fmt::Display for ProbeFault {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "PROBE_FAULT")
    }
}

impl FaultTriage for ProbeFault {
    fn is_retryable(&self) -> bool {
        true
    }
}

#[tokio::test]
async fn certify_pre_admission_cancellation_refuses_jobs() {
    let engine = DispatchEngine::with_default_config();
    engine.cancel();

    let outcome = engine
        .execute_admitted_job((), |_task: ()| async {
            Ok::<_, ProbeFault>(JobYield::immediate(42))
        })
        .await;

    assert!(!outcome.success);
    assert!(outcome.was_cancelled());
    assert_eq!(outcome.attempt_count, 0, "Admission must be refused before any attempt.");
}

#[tokio::test]
async fn certify_in_flight_jobs_surface_cancellation_on_next_tick() {
    let engine = Arc::new(DispatchEngine::new(DispatchConfig {
        capacity: 1,
        max_retries: 10,
        retry_delay_seconds: 0.02,
        per_job_timeout_seconds: 10.0,
    }));

    // El trabajo falla transitoriamente para forzar ticks de reintento.
    let engine_reference = Arc::clone(&engine);
    let job_handle = tokio::spawn(async move {
        engine_reference
            .execute_admitted_job((), |_task: ()| async {
                Err::<JobYield<()>, ProbeFault>(ProbeFault)
            })
            .await
    });

    tokio::time::sleep(Duration::from_millis(30)).await;
    engine.cancel();

    let outcome = job_handle.await.expect("Job task must join cleanly.");
    assert!(!outcome.success);
    assert!(
        matches!(outcome.error, Some(JobError::Cancelled)),
        "In-flight jobs must surface cancellation at the next attempt tick."
    );
    assert!(outcome.attempt_count < 11, "Cancellation must truncate the retry budget.");
}
