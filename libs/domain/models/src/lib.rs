// [libs/domain/models/src/lib.rs]
/*!
 * =================================================================
 * APARATO: DOMAIN MODELS HUB (V14.0 - PRODUCTION MASTER)
 * CLASIFICACIÓN: DOMAIN MODELS (ESTRATO L2)
 * RESPONSABILIDAD: EXPOSICIÓN NOMINAL DE CONTRATOS SOBERANOS
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. SINGLE SOURCE OF TRUTH: Todo contrato que cruza una frontera de
 *    componente (sesión, objeto, restricción, layout, manifiesto,
 *    error) reside aquí y solo aquí.
 * 2. WIRE FIDELITY: Cada estructura serializa exactamente a los
 *    formatos de artefacto persistidos en el directorio de sesión.
 * 3. NOMINAL PRECISION: Nomenclatura nominal absoluta en módulos.
 * =================================================================
 */

pub mod session;
pub mod scene_objects;
pub mod constraints;
pub mod layout;
pub mod assets;
pub mod errors;

pub use session::{SessionStatus, SessionRequest, RequestConstraints, SessionState, SnapshotRecord, ErrorHistoryRecord};
pub use scene_objects::{SceneObject, SceneData, InitialPose};
pub use constraints::{
    ConstraintType, RelationType, ConstraintPriority, SpatialConstraint, ConstraintGlobals,
    ConstraintDocument, ABOVE_THRESHOLD_METERS, ADJACENT_THRESHOLD_METERS,
    CONTACT_TOLERANCE_METERS, DEFAULT_BUFFER_METERS, FACE_TO_TOLERANCE_DEGREES,
    FAR_THRESHOLD_METERS, NEAR_THRESHOLD_METERS,
};
pub use layout::{ConflictType, PlacementRecord, CollisionRecord, DfsTrace, LayoutSolutionDocument, LayoutMetrics, SolverSettings, PlacementPose, ActiveConstraintRef};
pub use assets::{AssetRecord, AssetManifest, AssemblyObjectMap, ObjectCardRecord, MeshFormat};
pub use errors::{ErrorCode, ErrorDetail, ErrorResponse, SuccessResponse, ValidationFault};
