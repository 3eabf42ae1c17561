// [libs/infra/store/src/lib.rs]
/*!
 * =================================================================
 * APARATO: ARTIFACT STORE HUB (V9.0 - ATOMIC TRUTH)
 * CLASIFICACIÓN: INFRASTRUCTURE (ESTRATO L3)
 * RESPONSABILIDAD: EXPOSICIÓN NOMINAL DEL ALMACÉN DE SESIONES
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. PRESENCE IS TRUTH: La completitud de una etapa se decide por la
 *    presencia y no-vaciedad de sus artefactos declarados; ningún campo
 *    de estado goza de confianza.
 * 2. APPEND-ONLY HISTORY: Los artefactos versionados jamás se mutan;
 *    cada re-derivación cristaliza como versión siguiente.
 * =================================================================
 */

pub mod errors;
pub mod atomic;
pub mod workspace;
pub mod session;

pub use errors::StoreFault;
pub use workspace::WorkspaceManager;
pub use session::SessionStore;
