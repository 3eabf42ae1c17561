// [libs/domain/models/src/tests_serialization.rs]
/**
 * =================================================================
 * APARATO: DOMAIN SERIALIZATION TEST (V5.0 - INTEGRATION LEVEL)
 * CLASIFICACIÓN: TRINITY EVIDENCE (ESTRATO L2-MODELS)
 * RESPONSABILIDAD: CERTIFICACIÓN DE PARIDAD JSON DE ARTEFACTOS
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. WIRE PARITY: Valida que los vectores métricos viajen como
 *    tripletas [x, y, z] y que las claves sean lowercase_snake_case.
 * 2. ROUNDTRIP LAW: Escribir y releer cualquier artefacto JSON produce
 *    una estructura en RAM igual a la original.
 * 3. DETERMINISM: 'object_placements' serializa en orden lexicográfico
 *    de object_id.
 * =================================================================
 */
