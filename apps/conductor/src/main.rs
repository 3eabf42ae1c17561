// [apps/conductor/src/main.rs]
/*!
 * =================================================================
 * APARATO: CONDUCTOR SHELL (V12.7 - COMMAND SURFACE)
 * CLASIFICACIÓN: APPLICATION LAYER (ENTRY POINT)
 * RESPONSABILIDAD: BOOTSTRAP DE ENTORNO, SEÑALES Y CÓDIGOS DE SALIDA
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. THIN SWITCHBOARD: El shell parsea directivas, arma señales y
 *    delega la totalidad de la operación al PipelineRunner.
 * 2. EXIT CODE CONVENTION: 0 éxito; 1 fallo genérico; 2 entrada
 *    inválida; 6 configuración; 7 red/timeout; 8 render; 9 generación
 *    de activos; 130 interrupción. El núcleo emite objetos
 *    estructurados; el mapeo a códigos es responsabilidad del shell.
 * =================================================================
 */

use anyhow::Result;
use clap::Parser;
use maquette_conductor_lib::bootstrap::{assemble_runner, ClientRoster};
use maquette_conductor_lib::runner::{RunOutcome, RunRequest};
use maquette_conductor_lib::settings::ConductorSettings;
use maquette_domain_models::ErrorCode;
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use tracing::{info, warn};

/**
 * Directivas de mando del director de pipeline.
 * Configuración inyectada vía CLI o variables de entorno.
 */
#[derive(Parser, Debug)]
#[command(
    author = "Raz Podesta <metaShark Tech>",
    version = "12.7",
    about = "Maquette Conductor // Text-to-3D Staged Pipeline Director"
)]
struct ConductorDirectives {
    /// Descripción en lenguaje natural de la escena interior.
    #[arg(long, default_value = "")]
    text: String,

    /// Estilo artístico sugerido para la escena.
    #[arg(long, default_value = "modern")]
    style: String,

    /// Raíz del workspace bajo la cual viven las sesiones.
    #[arg(long, env = "MAQUETTE_WORKSPACE", default_value = "workspace")]
    workspace: PathBuf,

    /// Reanudar una sesión existente por identificador.
    #[arg(long)]
    session_id: Option<String>,

    /// Etapa inicial (las anteriores se asumen presentes).
    #[arg(long)]
    from_stage: Option<String>,

    /// Etapa final inclusiva.
    #[arg(long)]
    until_stage: Option<String>,

    /// Cota superior de objetos extraídos de la escena.
    #[arg(long)]
    max_objects: Option<u32>,

    /// Sugerencia de sala "L,W,H" en metros.
    #[arg(long)]
    room_size: Option<String>,
}

fn parse_room_size_hint(raw_hint: &str) -> Option<[f64; 3]> {
    let axes: Vec<f64> = raw_hint
        .split(',')
        .filter_map(|axis| axis.trim().parse::<f64>().ok())
        .collect();
    match axes.as_slice() {
        [length, width, height] => Some([*length, *width, *height]),
        _ => None,
    }
}

/// Mapeo de la taxonomía estructurada a códigos de salida del shell.
fn exit_code_for(code: ErrorCode, interrupted: bool) -> i32 {
    if interrupted {
        return 130;
    }
    match code {
        ErrorCode::InvalidInput => 2,
        ErrorCode::ConfigError | ErrorCode::UpstreamAuth => 6,
        ErrorCode::UpstreamTransport
        | ErrorCode::UpstreamRateLimited
        | ErrorCode::SolverTimeout => 7,
        ErrorCode::ImageGenerationFailed => 8,
        ErrorCode::AssetGenerationFailed => 9,
        _ => 1,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // 1. HIDRATACIÓN DE ENTORNO Y OBSERVABILIDAD
    dotenvy::dotenv().ok();
    maquette_shared_argos::init_tracing("maquette_conductor");

    info!("💠 [SHELL]: Conductor ignition sequence V12.7 starting...");
    let directives = ConductorDirectives::parse();

    if directives.text.trim().is_empty() && directives.session_id.is_none() {
        eprintln!("INVALID_INPUT: Provide --text for a new session or --session-id to resume.");
        std::process::exit(2);
    }

    // 2. ENSAMBLAJE DEL DIRECTOR (Composition Root)
    let settings = ConductorSettings::default().hydrate_from_env();
    ClientRoster::audit_environment_credentials();
    let runner = assemble_runner(&directives.workspace, settings, ClientRoster::offline_demo());

    // 3. PROTOCOLO DE SEÑALES DE SISTEMA (Terminación Ordenada)
    let cancellation_flag = runner.cancellation_handle();
    tokio::spawn(async move {
        if (tokio::signal::ctrl_c().await).is_ok() {
            warn!("⚠️ [SIGNAL]: Termination requested by host. Sealing current stage...");
            cancellation_flag.store(true, Ordering::SeqCst);
        }
    });

    // 4. EJECUCIÓN DEL PIPELINE
    let room_size_hint = directives.room_size.as_deref().and_then(parse_room_size_hint);
    let outcome = runner
        .run(RunRequest {
            text: directives.text,
            style: Some(directives.style),
            session_id: directives.session_id,
            from_stage: directives.from_stage,
            until_stage: directives.until_stage,
            max_objects: directives.max_objects,
            room_size_hint,
        })
        .await;

    // 5. PROYECCIÓN DEL VEREDICTO AL SHELL
    match outcome {
        RunOutcome::Success(response) => {
            println!("{}", serde_json::to_string_pretty(&response)?);
            info!("🏁 [SHELL]: Conductor sealed. Session '{}' levelized.", response.session_id);
            Ok(())
        }
        RunOutcome::PendingReview { session_id, awaiting_stage } => {
            println!(
                "{}",
                serde_json::json!({
                    "ok": false,
                    "session_id": session_id,
                    "pending_review": awaiting_stage,
                    "message": "Stage awaits human approval before the pipeline may continue",
                })
            );
            std::process::exit(1);
        }
        RunOutcome::Collapsed(response) => {
            let interrupted = response.error.message.contains("interrupted by cancellation");
            let exit_code = exit_code_for(response.error.code, interrupted);
            eprintln!("{}", serde_json::to_string_pretty(&response)?);
            std::process::exit(exit_code);
        }
    }
}
