// [apps/conductor/src/settings.rs]
/*!
 * =================================================================
 * APARATO: CONDUCTOR SETTINGS (V12.0 - ENV SOVEREIGN)
 * CLASIFICACIÓN: APPLICATION LAYER (ESTRATO L4-APP)
 * RESPONSABILIDAD: CONFIGURACIÓN OPERATIVA DEL RUNNER
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. ENV CONTRACT: REVIEW_STAGES (lista separada por comas),
 *    ASSET_RETRIEVAL_ENABLED y ASSET_RETRIEVAL_THRESHOLD se hidratan
 *    del entorno; todo lo demás viaja por construcción explícita.
 * 2. RELAXATION BUDGET: El ciclo resolver/regenerar queda sellado en 3
 *    intentos totales por defecto.
 * =================================================================
 */

use maquette_core_dispatch::DispatchConfig;
use maquette_domain_constraints::RegenerationStrategy;
use maquette_domain_models::SolverSettings;
use std::collections::HashSet;
use std::env;

/// Configuración operativa completa del director de pipeline.
#[derive(Debug, Clone)]
pub struct ConductorSettings {
    /// Etapas que exigen aprobación humana antes de avanzar.
    pub review_stages: HashSet<String>,
    /// Habilita la etapa opcional de QC de tarjetas.
    pub qc_enabled: bool,
    /// Habilita el paso de recuperación previo a la generación 3D.
    pub asset_retrieval_enabled: bool,
    /// Umbral de necesidad de generación bajo el cual se intenta recuperar.
    pub asset_retrieval_threshold: f64,
    /// Intentos totales del ciclo resolver/regenerar.
    pub max_solve_attempts: u32,
    /// Estrategia de regeneración tras un fallo del solucionador.
    pub regeneration_strategy: RegenerationStrategy,
    /// Configuración del solucionador de layouts.
    pub solver: SolverSettings,
    /// Admisión acotada para los servicios de imagen.
    pub image_dispatch: DispatchConfig,
    /// Admisión acotada para el generador 3D.
    pub asset_dispatch: DispatchConfig,
    /// Admisión acotada para el servicio visión-lenguaje.
    pub vlm_dispatch: DispatchConfig,
}

impl Default for ConductorSettings {
    fn default() -> Self {
        Self {
            review_stages: HashSet::new(),
            qc_enabled: false,
            asset_retrieval_enabled: false,
            asset_retrieval_threshold: 0.5,
            max_solve_attempts: 3,
            regeneration_strategy: RegenerationStrategy::Relax,
            solver: SolverSettings::default(),
            image_dispatch: DispatchConfig::default(),
            asset_dispatch: DispatchConfig::default(),
            vlm_dispatch: DispatchConfig::default(),
        }
    }
}

impl ConductorSettings {
    /// Hidrata los toggles operativos desde el entorno del proceso.
    pub fn hydrate_from_env(mut self) -> Self {
        if let Ok(raw_review_roster) = env::var("REVIEW_STAGES") {
            self.review_stages = raw_review_roster
                .split(',')
                .map(|stage_name| stage_name.trim().to_string())
                .filter(|stage_name| !stage_name.is_empty())
                .collect();
        }

        if let Ok(raw_toggle) = env::var("ASSET_RETRIEVAL_ENABLED") {
            self.asset_retrieval_enabled =
                matches!(raw_toggle.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes");
        }

        if let Ok(raw_threshold) = env::var("ASSET_RETRIEVAL_THRESHOLD") {
            if let Ok(threshold) = raw_threshold.trim().parse::<f64>() {
                self.asset_retrieval_threshold = threshold.clamp(0.0, 1.0);
            }
        }

        self
    }
}
