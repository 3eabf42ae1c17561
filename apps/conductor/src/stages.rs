// [apps/conductor/src/stages.rs]
/*!
 * =================================================================
 * APARATO: PIPELINE STAGE REGISTRY (V12.1 - ORDER TRUTH)
 * CLASIFICACIÓN: APPLICATION LAYER (ESTRATO L4-APP)
 * RESPONSABILIDAD: CATÁLOGO DE ETAPAS, ORDEN Y ARTEFACTOS DECLARADOS
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. DATAFLOW ORDER: scene_ref -> extract -> cards -> [qc] ->
 *    constraints -> layout -> assets -> assemble; cada flecha lee un
 *    subconjunto de los artefactos persistidos por su izquierda.
 * 2. COMPLETION BY DECLARATION: Cada etapa declara sus sondas de
 *    artefactos; el runner decide saltar o ejecutar solo con ellas.
 * =================================================================
 */

use maquette_domain_models::SessionStatus;

/// Sonda de completitud de un artefacto declarado.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactProbe {
    /// Archivo no vacío ('nombre') o directorio no vacío ('nombre/').
    Descriptor(&'static str),
    /// Al menos una versión presente de 'prefijo_v{n}.json'.
    Versioned(&'static str),
}

/// Etapas del pipeline, en orden canónico de ejecución.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineStage {
    Session,
    SceneRef,
    Extract,
    Cards,
    Qc,
    Constraints,
    Layout,
    Assets,
    Assemble,
}

impl PipelineStage {
    /// Orden canónico de ejecución del pipeline.
    pub fn execution_order() -> [PipelineStage; 9] {
        [
            PipelineStage::Session,
            PipelineStage::SceneRef,
            PipelineStage::Extract,
            PipelineStage::Cards,
            PipelineStage::Qc,
            PipelineStage::Constraints,
            PipelineStage::Layout,
            PipelineStage::Assets,
            PipelineStage::Assemble,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            PipelineStage::Session => "session",
            PipelineStage::SceneRef => "scene_ref",
            PipelineStage::Extract => "extract",
            PipelineStage::Cards => "cards",
            PipelineStage::Qc => "qc",
            PipelineStage::Constraints => "constraints",
            PipelineStage::Layout => "layout",
            PipelineStage::Assets => "assets",
            PipelineStage::Assemble => "assemble",
        }
    }

    /// Resolución nominal desde la interfaz de mando.
    pub fn from_name(raw_name: &str) -> Option<PipelineStage> {
        Self::execution_order()
            .into_iter()
            .find(|stage| stage.name() == raw_name.trim().to_ascii_lowercase())
    }

    /// Artefactos declarados cuya presencia certifica la etapa.
    pub fn declared_outputs(&self) -> &'static [ArtifactProbe] {
        match self {
            PipelineStage::Session => &[ArtifactProbe::Descriptor("request.json")],
            PipelineStage::SceneRef => &[ArtifactProbe::Descriptor("scene_ref.png")],
            PipelineStage::Extract => &[ArtifactProbe::Descriptor("objects.json")],
            PipelineStage::Cards => &[ArtifactProbe::Descriptor("object_cards/")],
            // QC es un filtro opcional: no materializa artefacto propio.
            PipelineStage::Qc => &[],
            PipelineStage::Constraints => &[ArtifactProbe::Versioned("constraints")],
            PipelineStage::Layout => &[ArtifactProbe::Versioned("layout_solution")],
            PipelineStage::Assets => &[
                ArtifactProbe::Descriptor("assets/"),
                ArtifactProbe::Descriptor("asset_manifest.json"),
            ],
            PipelineStage::Assemble => &[ArtifactProbe::Descriptor("blender_object_map.json")],
        }
    }

    /// Estado de sesión anunciado mientras la etapa ejecuta.
    pub fn announced_status(&self) -> SessionStatus {
        match self {
            PipelineStage::Session => SessionStatus::Init,
            PipelineStage::SceneRef => SessionStatus::GeneratingRef,
            PipelineStage::Extract => SessionStatus::ExtractingObjects,
            PipelineStage::Cards => SessionStatus::GeneratingCards,
            PipelineStage::Qc => SessionStatus::QcCards,
            PipelineStage::Constraints => SessionStatus::Analyzing,
            PipelineStage::Layout => SessionStatus::SolvingLayout,
            PipelineStage::Assets => SessionStatus::GeneratingAssets,
            PipelineStage::Assemble => SessionStatus::Rendering,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            PipelineStage::Session => "Crear sesión y petición inmutable",
            PipelineStage::SceneRef => "Generar imagen de referencia de escena",
            PipelineStage::Extract => "Extraer inventario de objetos (objects.json)",
            PipelineStage::Qc => "Filtro opcional de calidad de tarjetas",
            PipelineStage::Cards => "Generar tarjetas de objeto (object_cards/*)",
            PipelineStage::Constraints => "Extraer conjunto de restricciones espaciales",
            PipelineStage::Layout => "Resolver layout con rechazo de colisiones",
            PipelineStage::Assets => "Generar activos 3D y manifiesto",
            PipelineStage::Assemble => "Cristalizar paquete de ensamblaje",
        }
    }
}
