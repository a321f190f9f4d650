use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;

mod advisory_logic;
use advisory_logic::{alerts, config, downstream, logger, monitor, state::AppState};

use lib_advisory::broadcast::MarketBroadcaster;
use lib_advisory::guard::{CooldownGuard, SystemClock};
use lib_advisory::loggers::loggerlocal::{LoggerLocal, LoggerLocalOptions};
use lib_advisory::markets::gemini::{ApiCallGemini, MarketFeed};
use lib_advisory::notify::{request_notification_permission, SignalNotifier};
use lib_advisory::store::{CacheHandler, DocStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Explicitly install the default crypto provider for rustls
    let _ = rustls::crypto::ring::default_provider().install_default();

    dotenvy::dotenv().ok();
    let config = config::load_config();
    logger::setup_logging(
        config.log_dir.as_deref().unwrap_or(Path::new("./logs")),
        config.log_level.as_deref().unwrap_or("info"),
    )?;

    // Library components log through LoggerLocal on the TTY only; the
    // fern file log above stays the single on-disk log.
    let lib_logger = Arc::new(LoggerLocal::new(
        "server_advisory".to_string(),
        Some(LoggerLocalOptions {
            use_tty: Some(vec![6, 5, 4, 3]),
            use_file: None,
            log_dir: None,
        }),
    ));

    if config.gemini_api_key.is_none() {
        log::warn!("No Gemini API key configured; AI-backed fetches will short-circuit.");
    }

    let cooldown = Arc::new(CooldownGuard::with_clock(
        Duration::from_secs(config.cooldown_seconds.unwrap_or(60)),
        Arc::new(SystemClock),
    ));
    let api = Arc::new(ApiCallGemini::new(
        config.gemini_api_key.clone(),
        cooldown,
        lib_logger.clone(),
    ));
    let feed = MarketFeed::new(
        api,
        lib_logger.clone(),
        config.tracked_indices.clone().unwrap_or_default(),
    );

    let store = match &config.redis_url {
        Some(url) => match CacheHandler::connect(url).await {
            Ok(cache) => {
                log::info!("Store write-through enabled via {}", url);
                Arc::new(DocStore::with_cache(cache, lib_logger.clone()))
            }
            Err(e) => {
                log::error!("Redis unavailable ({}); continuing in-memory only.", e);
                Arc::new(DocStore::new(lib_logger.clone()))
            }
        },
        None => Arc::new(DocStore::new(lib_logger.clone())),
    };
    store.restore().await;

    let broadcaster = Arc::new(MarketBroadcaster::new(feed, store.clone()));
    let permission = request_notification_permission(config.alerts_enabled.unwrap_or(true));
    let notifier = Arc::new(SignalNotifier::new(permission, lib_logger.clone()));

    let app_state = AppState::new(store, broadcaster, notifier);
    app_state.set_market_status().await;

    let (shutdown_tx, _) = tokio::sync::broadcast::channel(1);

    let downstream_handle = tokio::spawn(downstream::run(
        config.clone(),
        app_state.clone(),
        shutdown_tx.subscribe(),
    ));

    let monitor_handle = tokio::spawn(monitor::run(
        config.clone(),
        app_state.clone(),
        shutdown_tx.subscribe(),
    ));

    let alerts_handle = tokio::spawn(alerts::run(app_state.clone(), shutdown_tx.subscribe()));

    // Wait for shutdown signal
    tokio::select! {
        _ = signal::ctrl_c() => {
            log::info!("Ctrl-C received, initiating shutdown.");
        }
        _ = async {
            #[cfg(unix)]
            {
                let mut term_signal = signal::unix::signal(signal::unix::SignalKind::terminate())
                    .expect("failed to install SIGTERM handler");
                term_signal.recv().await;
                log::info!("SIGTERM received, initiating shutdown.");
            }
            #[cfg(not(unix))]
            {
                // On non-unix platforms, just wait forever.
                std::future::pending::<()>().await;
            }
        } => {}
    }

    // Send shutdown signal to all components
    let _ = shutdown_tx.send(());

    // Wait for components to shut down
    let _ = tokio::try_join!(downstream_handle, monitor_handle, alerts_handle);

    log::info!("Shutdown complete.");
    Ok(())
}
