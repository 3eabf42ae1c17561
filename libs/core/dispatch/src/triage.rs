// [libs/core/dispatch/src/triage.rs]
/*!
 * =================================================================
 * APARATO: FAULT TRIAGE CONTRACT (V11.0 - RETRYABILITY LAW)
 * CLASIFICACIÓN: CORE EXECUTION (ESTRATO L1)
 * RESPONSABILIDAD: CLASIFICACIÓN DE FALLOS PARA EL MOTOR DE REINTENTOS
 *
 * # Mathematical Proof (Bounded Attempts):
 * Con el veredicto de triaje fijo por clase de fallo, el número total
 * de intentos por trabajo está acotado por max_retries + 1; los fallos
 * no reintentables colapsan en exactamente un intento.
 * =================================================================
 */

/// Contrato de triaje que todo fallo de servicio externo debe cumplir.
///
/// El motor de despacho reintenta exclusivamente los fallos que el
/// propio servicio declara transitorios (transporte, límite de tasa).
pub trait FaultTriage {
    /// Veredicto: ¿merece este fallo otro intento con backoff?
    fn is_retryable(&self) -> bool;
}
