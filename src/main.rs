use std::process::ExitCode;
use std::sync::Arc;

use devserve::config::{AppState, Config};
use devserve::error::StartupError;
use devserve::{logger, server};

/// Config file used when no path is given on the command line (`config.toml`)
const DEFAULT_CONFIG_PATH: &str = "config";

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("[FATAL] {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), StartupError> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let cfg = Config::load_from(&config_path)?;

    logger::init(&cfg).map_err(StartupError::Log)?;

    // Worker thread count follows `server.workers`, CPU cores otherwise
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers.filter(|&w| w > 0) {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build().map_err(StartupError::Runtime)?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), StartupError> {
    let state = Arc::new(AppState::new(cfg)?);
    let addr = state.config.get_socket_addr()?;

    let listener =
        server::create_listener(addr).map_err(|source| StartupError::Bind { addr, source })?;

    logger::log_server_start(&addr, &state.root, &state.config);

    server::start_server_loop(listener, state, server::shutdown_signal()).await;
    Ok(())
}
