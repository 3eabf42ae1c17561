// [libs/infra/clients/src/lib.rs]
/*!
 * =================================================================
 * APARATO: EXTERNAL CLIENTS HUB (V7.0 - CONTRACT SEAL)
 * CLASIFICACIÓN: INFRASTRUCTURE ADAPTER (ESTRATO L3)
 * RESPONSABILIDAD: CONTRATOS TIPADOS HACIA COLABORADORES EXTERNOS
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. CONSTRUCTOR-TIME POLYMORPHISM: Cada servicio externo es una
 *    interfaz de firma cerrada; el intercambio de implementaciones es
 *    decisión de construcción, jamás parcheo en runtime.
 * 2. HOST DISCIPLINE: El host de ensamblaje 3D NO tiene cliente: el
 *    núcleo se limita a escribir el paquete de instrucciones en disco y
 *    un adaptador externo lo invoca.
 * =================================================================
 */

pub mod faults;
pub mod contracts;
pub mod config;
pub mod transport;
pub mod stubs;

pub use faults::ServiceFault;
pub use contracts::{
    ImageClient, MeshYield, ObjectCardYield, SceneReferenceYield, ThreeDClient, VlmClient,
};
pub use config::ServiceEndpointConfig;
pub use stubs::{StubImageClient, StubThreeDClient, StubVlmClient};
