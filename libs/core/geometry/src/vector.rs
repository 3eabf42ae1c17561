// [libs/core/geometry/src/vector.rs]
/*!
 * =================================================================
 * APARATO: METRIC VECTOR PRIMITIVE (V9.0 - WIRE PARITY)
 * CLASIFICACIÓN: CORE MATH (ESTRATO L1)
 * RESPONSABILIDAD: ÁLGEBRA VECTORIAL MÉTRICA Y PARIDAD DE TRIPLETAS
 *
 * # Mathematical Proof (Wire Parity):
 * El contrato de cable del ecosistema transporta posiciones, tamaños y
 * rotaciones como tripletas JSON [x, y, z]. La conversión serde
 * from/into [f64; 3] garantiza que la estructura en RAM y la trama en
 * disco sean isomórficas bit-perfectas.
 * =================================================================
 */

use serde::{Deserialize, Serialize};

/// Vector métrico de 3 ejes. Convención del mundo: centro de la sala en el
/// origen, +X derecha, +Y fondo, +Z altura.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Distancia euclidiana completa (3 ejes).
    pub fn distance_to(&self, other: &Vec3) -> f64 {
        ((self.x - other.x).powi(2)
            + (self.y - other.y).powi(2)
            + (self.z - other.z).powi(2))
        .sqrt()
    }

    /// Distancia horizontal (plano XY), utilizada por las relaciones de
    /// distancia near/far/adjacent.
    pub fn horizontal_distance_to(&self, other: &Vec3) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

impl From<[f64; 3]> for Vec3 {
    fn from(triplet: [f64; 3]) -> Self {
        Self { x: triplet[0], y: triplet[1], z: triplet[2] }
    }
}

impl From<Vec3> for [f64; 3] {
    fn from(vector: Vec3) -> Self {
        [vector.x, vector.y, vector.z]
    }
}

impl std::ops::Add for Vec3 {
    type Output = Vec3;
    fn add(self, other: Vec3) -> Vec3 {
        Vec3::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl std::ops::Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, other: Vec3) -> Vec3 {
        Vec3::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

/// Normaliza un ángulo en grados al rango canónico [0, 360).
///
/// El operador `%` de Rust preserva el signo del dividendo, por lo que el
/// doble módulo es obligatorio para sellar los ángulos negativos.
pub fn normalize_degrees(angle_degrees: f64) -> f64 {
    ((angle_degrees % 360.0) + 360.0) % 360.0
}
