use crate::advisory_logic::config::Config;
use crate::advisory_logic::state::AppState;
use chrono::Utc;
use lib_advisory::markets::hours;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::interval;

/// Watches snapshot freshness during market hours and keeps the idle
/// status line in step with the trading session.
pub async fn run(config: Config, app_state: AppState, mut shutdown: broadcast::Receiver<()>) {
    let check_secs = config.stale_check_interval_seconds.unwrap_or(60);
    let stale_after = config.stale_after_seconds.unwrap_or(900) as i64;
    let mut check_interval = interval(Duration::from_secs(check_secs));

    loop {
        tokio::select! {
            _ = shutdown.recv() => {
                log::info!("Monitor service received shutdown signal.");
                break;
            }
            _ = check_interval.tick() => {
                let market_open = hours::is_market_open();

                if market_open {
                    let snapshot = app_state.store.snapshot().await;
                    let age = (Utc::now() - snapshot.updated_at).num_seconds();
                    if age > stale_after {
                        log::warn!(
                            "Snapshot is {}s old during market hours (threshold {}s). \
                             Waiting for an operator broadcast.",
                            age,
                            stale_after
                        );
                    }
                }

                // Refresh the idle status line; transient operator states
                // ("BROADCASTING...", "SYNC FAILED") are left alone.
                let status = app_state.status().await;
                if matches!(status.as_str(), "MARKET LIVE" | "MARKET CLOSED" | "SYNCING...") {
                    app_state.set_market_status().await;
                }
            }
        }
    }
}
