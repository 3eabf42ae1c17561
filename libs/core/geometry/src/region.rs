// [libs/core/geometry/src/region.rs]
/*!
 * =================================================================
 * APARATO: FEASIBLE REGION ENGINE (V9.2 - GRID DETERMINISM)
 * CLASIFICACIÓN: CORE MATH (ESTRATO L1)
 * RESPONSABILIDAD: REGIONES FACTIBLES Y MUESTREO DE CANDIDATOS
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. DETERMINISTIC ENUMERATION: El muestreo recorre la rejilla en orden
 *    lexicográfico (Y exterior, X interior) para que el solucionador sea
 *    reproducible dado el mismo conjunto de restricciones.
 * 2. Z-BAND SEMANTICS: La región modela el plano del suelo más una banda
 *    vertical opcional; una banda degenerada (min == max) fija la altura
 *    exacta exigida por la relación 'on'.
 *
 * # Mathematical Proof (Intersection Closure):
 * La intersección de regiones alineadas a ejes es el máximo de mínimos y
 * el mínimo de máximos por eje; el conjunto es cerrado bajo intersección
 * y vacío cuando algún eje degenera con min > max.
 * =================================================================
 */

use crate::vector::Vec3;

/// Región axial sobre el plano del suelo más una banda vertical.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeasibleRegion {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
    /// Banda vertical admisible para el CENTRO del objeto.
    pub min_z: f64,
    pub max_z: f64,
}

impl FeasibleRegion {
    /// Región que abarca toda la sala, con banda vertical abierta.
    pub fn whole_room(room_half_extent: f64) -> Self {
        Self {
            min_x: -room_half_extent,
            max_x: room_half_extent,
            min_y: -room_half_extent,
            max_y: room_half_extent,
            min_z: 0.0,
            max_z: room_half_extent,
        }
    }

    /// Caja plana centrada en un punto del suelo.
    pub fn around(center: Vec3, horizontal_reach: f64) -> Self {
        Self {
            min_x: center.x - horizontal_reach,
            max_x: center.x + horizontal_reach,
            min_y: center.y - horizontal_reach,
            max_y: center.y + horizontal_reach,
            min_z: 0.0,
            max_z: f64::INFINITY,
        }
    }

    /// Fija la banda vertical a una altura exacta (relación 'on').
    pub fn with_fixed_height(mut self, height: f64) -> Self {
        self.min_z = height;
        self.max_z = height;
        self
    }

    /// Restringe la banda vertical a un mínimo (relación 'above').
    pub fn with_min_height(mut self, floor: f64) -> Self {
        self.min_z = self.min_z.max(floor);
        self
    }

    /// Intersección por eje. Retorna None cuando la región colapsa.
    pub fn intersect(&self, other: &FeasibleRegion) -> Option<FeasibleRegion> {
        let candidate = FeasibleRegion {
            min_x: self.min_x.max(other.min_x),
            max_x: self.max_x.min(other.max_x),
            min_y: self.min_y.max(other.min_y),
            max_y: self.max_y.min(other.max_y),
            min_z: self.min_z.max(other.min_z),
            max_z: self.max_z.min(other.max_z),
        };

        let epsilon = 1e-9;
        if candidate.min_x > candidate.max_x + epsilon
            || candidate.min_y > candidate.max_y + epsilon
            || candidate.min_z > candidate.max_z + epsilon
        {
            return None;
        }
        Some(candidate)
    }

    /// Certifica que la región tiene área de suelo no degenerada.
    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y || self.min_z > self.max_z
    }

    /// Muestrea la región en rejilla determinista sobre el plano XY.
    ///
    /// El eje Z del candidato se fija al suelo de la banda vertical; el
    /// solucionador lo re-ancla después según la regla de soporte.
    /// El conteo se trunca en `candidate_cap` preservando el orden.
    pub fn sample_grid(&self, resolution: f64, candidate_cap: usize) -> Vec<Vec3> {
        if self.is_empty() || resolution <= 0.0 || candidate_cap == 0 {
            return Vec::new();
        }

        let anchor_z = if self.min_z.is_finite() { self.min_z } else { 0.0 };
        let mut samples = Vec::new();

        let span_x = self.max_x - self.min_x;
        let span_y = self.max_y - self.min_y;
        let steps_x = (span_x / resolution).floor() as usize;
        let steps_y = (span_y / resolution).floor() as usize;

        'enumeration: for step_y in 0..=steps_y {
            let sample_y = self.min_y + step_y as f64 * resolution;
            for step_x in 0..=steps_x {
                let sample_x = self.min_x + step_x as f64 * resolution;
                samples.push(Vec3::new(sample_x, sample_y, anchor_z));
                if samples.len() >= candidate_cap {
                    break 'enumeration;
                }
            }
        }

        samples
    }

    /// Tamaño nominal del espacio de búsqueda (celdas de la rejilla).
    pub fn search_space_size(&self, resolution: f64) -> usize {
        if self.is_empty() || resolution <= 0.0 {
            return 0;
        }
        let cells_x = ((self.max_x - self.min_x) / resolution).floor() as usize + 1;
        let cells_y = ((self.max_y - self.min_y) / resolution).floor() as usize + 1;
        cells_x * cells_y
    }
}
