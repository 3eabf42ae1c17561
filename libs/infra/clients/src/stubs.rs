// [libs/infra/clients/src/stubs.rs]
/*!
 * =================================================================
 * APARATO: DETERMINISTIC SERVICE DOUBLES (V7.4 - PROVING GROUNDS)
 * CLASIFICACIÓN: INFRASTRUCTURE ADAPTER (ESTRATO L3)
 * RESPONSABILIDAD: DOBLES CANÓNICOS PARA ESCENARIOS DE EXTREMO A EXTREMO
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. CANNED TRUTH: Los dobles retornan cargas enlatadas configuradas
 *    por el escenario; el núcleo se ejercita completo sin tocar la red.
 * 2. MAGIC BYTES: Las imágenes portan cabecera PNG real y las mallas
 *    cabecera glTF-binary, para que la QC de tarjetas y el manifiesto
 *    de activos operen sobre material estructuralmente válido.
 * 3. CONCURRENCY PROBE: El doble de imagen audita cuántos trabajos
 *    conviven en vuelo, certificando la admisión acotada del ejecutor.
 * =================================================================
 */

use async_trait::async_trait;
use maquette_domain_models::{MeshFormat, SceneData, SceneObject, SpatialConstraint};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

use crate::contracts::{
    ImageClient, MeshYield, ObjectCardYield, SceneReferenceYield, ThreeDClient, VlmClient,
};
use crate::faults::ServiceFault;

/// Cabecera canónica PNG (8 bytes de firma).
pub const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// Cabecera canónica glTF-binary.
pub const GLB_SIGNATURE: [u8; 4] = *b"glTF";

/// Sonda de concurrencia: audita el máximo de trabajos simultáneos.
#[derive(Debug, Default)]
pub struct ConcurrencyProbe {
    in_flight: AtomicUsize,
    max_observed: AtomicUsize,
}

impl ConcurrencyProbe {
    fn enter(&self) {
        let now_in_flight = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_observed.fetch_max(now_in_flight, Ordering::SeqCst);
    }

    fn exit(&self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }

    pub fn max_observed(&self) -> usize {
        self.max_observed.load(Ordering::SeqCst)
    }
}

fn forge_png_payload(label: &str) -> Vec<u8> {
    let mut payload = PNG_SIGNATURE.to_vec();
    payload.extend_from_slice(label.as_bytes());
    payload
}

fn forge_glb_payload(label: &str) -> Vec<u8> {
    let mut payload = GLB_SIGNATURE.to_vec();
    // Versión 2 little-endian, como exige el contenedor binario.
    payload.extend_from_slice(&2u32.to_le_bytes());
    payload.extend_from_slice(label.as_bytes());
    payload
}

/// Doble determinista del cliente de imágenes.
pub struct StubImageClient {
    /// Retardos por tarjeta en milisegundos, ciclados sobre el lote.
    pub per_card_delays_ms: Vec<u64>,
    /// Fallo enlatado aplicado a toda llamada, cuando se configura.
    pub failure_plan: Option<ServiceFault>,
    pub probe: Arc<ConcurrencyProbe>,
}

impl StubImageClient {
    pub fn instant() -> Self {
        Self {
            per_card_delays_ms: vec![0],
            failure_plan: None,
            probe: Arc::new(ConcurrencyProbe::default()),
        }
    }

    pub fn with_delays(per_card_delays_ms: Vec<u64>) -> Self {
        Self {
            per_card_delays_ms,
            failure_plan: None,
            probe: Arc::new(ConcurrencyProbe::default()),
        }
    }

    pub fn always_failing(fault: ServiceFault) -> Self {
        Self {
            per_card_delays_ms: vec![0],
            failure_plan: Some(fault),
            probe: Arc::new(ConcurrencyProbe::default()),
        }
    }
}

#[async_trait]
impl ImageClient for StubImageClient {
    async fn generate_scene_reference(
        &self,
        session_id: &str,
        scene_text: &str,
        style: &str,
    ) -> Result<SceneReferenceYield, ServiceFault> {
        if let Some(fault) = &self.failure_plan {
            return Err(fault.clone());
        }
        let prompt_used = format!("A {style} style scene: {scene_text}");
        Ok(SceneReferenceYield {
            image_bytes: forge_png_payload(session_id),
            prompt_used,
            elapsed_seconds: 0.0,
        })
    }

    async fn generate_object_cards(
        &self,
        _session_id: &str,
        objects: &[SceneObject],
        _scene_reference: &[u8],
    ) -> Result<Vec<ObjectCardYield>, ServiceFault> {
        if let Some(fault) = &self.failure_plan {
            return Err(fault.clone());
        }

        let mut cards = Vec::with_capacity(objects.len());
        for (index, object) in objects.iter().enumerate() {
            self.probe.enter();
            let delay = self.per_card_delays_ms
                [index % self.per_card_delays_ms.len().max(1)];
            if delay > 0 {
                sleep(Duration::from_millis(delay)).await;
            }
            self.probe.exit();

            cards.push(ObjectCardYield {
                object_id: object.object_id.clone(),
                card_bytes: forge_png_payload(&object.object_id),
                prompt_used: format!("Isolated reference card: {}", object.visual_desc),
                elapsed_seconds: delay as f64 / 1000.0,
            });
        }
        Ok(cards)
    }
}

/// Doble determinista del cliente visión-lenguaje.
pub struct StubVlmClient {
    pub canned_scene: SceneData,
    pub canned_constraints: Vec<SpatialConstraint>,
}

impl StubVlmClient {
    pub fn new(canned_scene: SceneData, canned_constraints: Vec<SpatialConstraint>) -> Self {
        Self { canned_scene, canned_constraints }
    }
}

#[async_trait]
impl VlmClient for StubVlmClient {
    async fn extract_objects(
        &self,
        _session_id: &str,
        _scene_text: &str,
        _scene_reference: Option<&[u8]>,
    ) -> Result<SceneData, ServiceFault> {
        Ok(self.canned_scene.clone())
    }

    async fn extract_constraints(
        &self,
        _scene_text: &str,
        _objects: &[SceneObject],
        _scene_reference: Option<&[u8]>,
    ) -> Result<Vec<SpatialConstraint>, ServiceFault> {
        Ok(self.canned_constraints.clone())
    }
}

/// Doble determinista del generador de activos 3D.
pub struct StubThreeDClient {
    /// Fallo enlatado aplicado en CADA intento (certifica agotamiento).
    pub failure_plan: Option<ServiceFault>,
}

impl StubThreeDClient {
    pub fn healthy() -> Self {
        Self { failure_plan: None }
    }

    pub fn always_failing(fault: ServiceFault) -> Self {
        Self { failure_plan: Some(fault) }
    }

    fn forge_mesh(&self, object_id: &str) -> Result<MeshYield, ServiceFault> {
        if let Some(fault) = &self.failure_plan {
            return Err(fault.clone());
        }
        let mut metadata = BTreeMap::new();
        metadata.insert("vertices".to_string(), serde_json::json!(1024));
        metadata.insert("faces".to_string(), serde_json::json!(2048));
        metadata.insert("materials".to_string(), serde_json::json!(1));
        Ok(MeshYield {
            mesh_bytes: forge_glb_payload(object_id),
            format: MeshFormat::Glb,
            metadata,
        })
    }
}

#[async_trait]
impl ThreeDClient for StubThreeDClient {
    async fn generate_from_card(
        &self,
        object_id: &str,
        _card_bytes: &[u8],
        _size_hint: [f64; 3],
    ) -> Result<MeshYield, ServiceFault> {
        self.forge_mesh(object_id)
    }

    async fn generate_from_description(
        &self,
        object_id: &str,
        _description: &str,
        _style: &str,
    ) -> Result<MeshYield, ServiceFault> {
        self.forge_mesh(object_id)
    }
}
