use std::sync::Arc;

use tokio::task::JoinError;
use tokio_util::sync::CancellationToken;

use csb_core::{catalog::Catalog, config::Config, desk::SupportDesk};

#[tokio::main]
async fn main() -> Result<(), csb_core::Error> {
    csb_core::logging::init("csb")?;

    let cfg = Arc::new(Config::load()?);
    let catalog = Catalog::load(cfg.catalog_file.as_deref())?;
    let desk = Arc::new(SupportDesk::from_config(&cfg, catalog));

    let shutdown = CancellationToken::new();
    let mut liveness = tokio::spawn(csb_liveness::serve(cfg.http_port, shutdown.clone()));

    // Polling ends on Ctrl-C; the liveness server only ends on failure.
    let polled = tokio::select! {
        res = csb_telegram::router::run_polling(cfg.clone(), desk) => res,
        res = &mut liveness => return Err(liveness_exit(res)),
    };

    shutdown.cancel();
    if let Some(problem) = liveness_shutdown_problem(liveness.await) {
        tracing::warn!("{problem}");
    }

    polled.map_err(|e| csb_core::Error::External(format!("telegram bot failed: {e}")))?;
    Ok(())
}

fn liveness_exit(res: Result<std::io::Result<()>, JoinError>) -> csb_core::Error {
    match res {
        Ok(Ok(())) => csb_core::Error::External("liveness server exited".to_string()),
        Ok(Err(e)) => csb_core::Error::Io(e),
        Err(e) => csb_core::Error::External(format!("liveness task join error: {e}")),
    }
}

/// Anything worth reporting about a liveness server stopped on shutdown.
fn liveness_shutdown_problem(res: Result<std::io::Result<()>, JoinError>) -> Option<String> {
    match res {
        Ok(Ok(())) => None,
        Ok(Err(e)) => Some(format!("liveness server error during shutdown: {e}")),
        Err(e) => Some(format!("liveness task join error: {e}")),
    }
}
