/**
 * =================================================================
 * APARATO: POLLING GUARD TEST (V4.0)
 * CLASIFICACIÓN: TRINITY EVIDENCE (ESTRATO L1-DISPATCH)
 * OBJETIVO: Certificar el bucle de sondeo de trabajos remotos: racha
 *           de errores consecutivos, deadline duro y reseteo de racha
 *           tras un sondeo exitoso.
 * =================================================================
 */

use maquette_core_dispatch::{poll_until_complete, FaultTriage, PollCollapse, PollVerdict, PollingConfig};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

fn fast_config() -> PollingConfig {
    PollingConfig {
        poll_interval_seconds: 0.01,
        timeout_seconds: 5.0,
        consecutive_error_threshold: 3,
    }
}

#[tokio::test]
async fn certify_completion_after_pending_ticks() {
    let tick_counter = Arc::new(AtomicU32::new(0));
    let counter_reference = Arc::clone(&tick_counter);

    let payload = poll_until_complete("job_probe_001", &fast_config(), move || {
        let counter = Arc::clone(&counter_reference);
        async move {
            let tick = counter.fetch_add(1, Ordering::SeqCst);
            if tick < 3 {
                Ok::<_, String>(PollVerdict::Pending)
            } else {
                Ok(PollVerdict::Completed("mesh_payload".to_string()))
            }
        }
    })
    .await
    .expect("Job must seal after pending ticks.");

    assert_eq!(payload, "mesh_payload");
    assert_eq!(tick_counter.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn certify_consecutive_error_streak_is_retryable_collapse() {
    let verdict = poll_until_complete("job_probe_002", &fast_config(), || async {
        Err::<PollVerdict<()>, String>("probe link down".to_string())
    })
    .await;

    match verdict {
        Err(collapse @ PollCollapse::ConsecutiveErrors { streak: 3, .. }) => {
            // La racha colapsada es un fallo REINTENTABLE del trabajo.
            assert!(collapse.is_retryable());
        }
        other => panic!("Expected consecutive-error collapse, got {other:?}"),
    }
}

#[tokio::test]
async fn certify_streak_resets_after_successful_probe() {
    let tick_counter = Arc::new(AtomicU32::new(0));
    let counter_reference = Arc::clone(&tick_counter);

    // Patrón error-error-pending repetido: la racha jamás alcanza 3.
    let payload = poll_until_complete("job_probe_003", &fast_config(), move || {
        let counter = Arc::clone(&counter_reference);
        async move {
            let tick = counter.fetch_add(1, Ordering::SeqCst);
            match tick % 3 {
                0 | 1 => Err("transient probe glitch".to_string()),
                _ if tick >= 8 => Ok(PollVerdict::Completed(42u32)),
                _ => Ok(PollVerdict::Pending),
            }
        }
    })
    .await
    .expect("Alternating glitches must never trip the streak guard.");

    assert_eq!(payload, 42);
}

#[tokio::test]
async fn certify_hard_deadline() {
    let config = PollingConfig {
        poll_interval_seconds: 0.01,
        timeout_seconds: 0.05,
        consecutive_error_threshold: 10,
    };

    let verdict = poll_until_complete("job_probe_004", &config, || async {
        Ok::<_, String>(PollVerdict::<()>::Pending)
    })
    .await;

    match verdict {
        Err(collapse @ PollCollapse::Deadline { .. }) => {
            assert!(!collapse.is_retryable(), "Deadline is a hard cap, never retryable.");
        }
        other => panic!("Expected deadline collapse, got {other:?}"),
    }
}

#[tokio::test]
async fn certify_remote_failure_is_terminal() {
    let verdict = poll_until_complete("job_probe_005", &fast_config(), || async {
        Ok::<_, String>(PollVerdict::<()>::Failed("remote engine refused the job".to_string()))
    })
    .await;

    assert!(matches!(verdict, Err(PollCollapse::RemoteFailure { .. })));
}
