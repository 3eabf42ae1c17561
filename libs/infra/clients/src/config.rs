// [libs/infra/clients/src/config.rs]
/*!
 * =================================================================
 * APARATO: ENDPOINT CONFIG LOADER (V7.2 - OPAQUE PASSTHROUGH)
 * CLASIFICACIÓN: INFRASTRUCTURE ADAPTER (ESTRATO L3)
 * RESPONSABILIDAD: HIDRATACIÓN OPACA DE CREDENCIALES POR SERVICIO
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. OPAQUE CONTRACT: El núcleo no interpreta las credenciales; las
 *    hidrata del entorno por prefijo de servicio y las entrega intactas
 *    a la implementación del cliente.
 * 2. FAIL-FAST IGNITION: La ausencia de API key para un servicio
 *    requerido colapsa en 'config_error' durante la ignición, nunca a
 *    mitad de pipeline.
 * =================================================================
 */

use std::env;
use thiserror::Error;

/// Fallo de configuración durante la ignición de clientes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigFault {
    #[error("CRITICAL_CONFIG_VOID: {variable} not defined in the environment")]
    MissingVariable { variable: String },
}

/// Credenciales y endpoint de un servicio externo, opacos para el núcleo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEndpointConfig {
    pub api_key: String,
    pub base_url: Option<String>,
    pub model: Option<String>,
}

impl ServiceEndpointConfig {
    /// Hidrata la configuración desde `<PREFIX>_API_KEY`, `<PREFIX>_BASE_URL`
    /// y `<PREFIX>_MODEL`.
    ///
    /// # Errors:
    /// - `MissingVariable` cuando la API key del servicio no existe.
    pub fn from_env(service_prefix: &str) -> Result<Self, ConfigFault> {
        let key_variable = format!("{service_prefix}_API_KEY");
        let api_key = env::var(&key_variable)
            .map_err(|_| ConfigFault::MissingVariable { variable: key_variable })?;

        Ok(Self {
            api_key,
            base_url: env::var(format!("{service_prefix}_BASE_URL")).ok(),
            model: env::var(format!("{service_prefix}_MODEL")).ok(),
        })
    }

    /// Variante tolerante para servicios opcionales.
    pub fn from_env_optional(service_prefix: &str) -> Option<Self> {
        Self::from_env(service_prefix).ok()
    }
}
