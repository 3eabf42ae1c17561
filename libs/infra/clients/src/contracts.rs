// [libs/infra/clients/src/contracts.rs]
/*!
 * =================================================================
 * APARATO: SERVICE CONTRACTS (V7.1 - CLOSED SIGNATURES)
 * CLASIFICACIÓN: INFRASTRUCTURE ADAPTER (ESTRATO L3)
 * RESPONSABILIDAD: FIRMAS CERRADAS DE LOS COLABORADORES EXTERNOS
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. LENGTH & ORDER LAW: 'generate_object_cards' retorna exactamente
 *    una tarjeta por objeto de entrada, en el mismo orden; el contrato
 *    es del cliente, no del llamador.
 * 2. SOURCE-FIRST PROMPTING: 'extract_constraints' exige al modelo que
 *    los objetos aparezcan como fuente en corridas ordenadas antes de
 *    aparecer jamás como objetivo, preservando la aciclicidad del
 *    subgrafo direccional desde el origen.
 * =================================================================
 */

use async_trait::async_trait;
use maquette_domain_models::{MeshFormat, SceneData, SceneObject, SpatialConstraint};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::faults::ServiceFault;

/// Resultado de la generación de la imagen de referencia de escena.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneReferenceYield {
    pub image_bytes: Vec<u8>,
    pub prompt_used: String,
    pub elapsed_seconds: f64,
}

/// Resultado por objeto de la generación de tarjetas.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectCardYield {
    pub object_id: String,
    pub card_bytes: Vec<u8>,
    pub prompt_used: String,
    pub elapsed_seconds: f64,
}

/// Malla generada por el servicio 3D.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshYield {
    pub mesh_bytes: Vec<u8>,
    pub format: MeshFormat,
    pub metadata: BTreeMap<String, Value>,
}

/// Cliente de generación de imágenes (referencia de escena y tarjetas).
#[async_trait]
pub trait ImageClient: Send + Sync {
    /// Genera la imagen de referencia de la escena completa.
    async fn generate_scene_reference(
        &self,
        session_id: &str,
        scene_text: &str,
        style: &str,
    ) -> Result<SceneReferenceYield, ServiceFault>;

    /// Genera una tarjeta de referencia por objeto.
    ///
    /// La salida tiene la MISMA longitud y orden que la entrada.
    async fn generate_object_cards(
        &self,
        session_id: &str,
        objects: &[SceneObject],
        scene_reference: &[u8],
    ) -> Result<Vec<ObjectCardYield>, ServiceFault>;
}

/// Cliente de visión-lenguaje (extracción de objetos y restricciones).
#[async_trait]
pub trait VlmClient: Send + Sync {
    /// Extrae el inventario de objetos desde el texto de escena.
    async fn extract_objects(
        &self,
        session_id: &str,
        scene_text: &str,
        scene_reference: Option<&[u8]>,
    ) -> Result<SceneData, ServiceFault>;

    /// Extrae las relaciones espaciales entre objetos del inventario.
    async fn extract_constraints(
        &self,
        scene_text: &str,
        objects: &[SceneObject],
        scene_reference: Option<&[u8]>,
    ) -> Result<Vec<SpatialConstraint>, ServiceFault>;
}

/// Cliente del generador de activos 3D (tarjeta o descripción -> malla).
#[async_trait]
pub trait ThreeDClient: Send + Sync {
    async fn generate_from_card(
        &self,
        object_id: &str,
        card_bytes: &[u8],
        size_hint: [f64; 3],
    ) -> Result<MeshYield, ServiceFault>;

    async fn generate_from_description(
        &self,
        object_id: &str,
        description: &str,
        style: &str,
    ) -> Result<MeshYield, ServiceFault>;
}
