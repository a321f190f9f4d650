use crate::advisory_logic::state::AppState;
use lib_advisory::notify::NewSignalWatcher;
use tokio::sync::broadcast;

/// Follows the call feed and fires the new-signal notification.
///
/// The subscription's first delivery only establishes the baseline
/// count; notifications start with the second delivery.
pub async fn run(app_state: AppState, mut shutdown: broadcast::Receiver<()>) {
    let (initial, mut calls_rx) = app_state.store.subscribe_calls().await;
    let mut watcher = NewSignalWatcher::new();
    watcher.observe(&initial);

    loop {
        tokio::select! {
            _ = shutdown.recv() => {
                log::info!("Alert watcher shutting down.");
                break;
            }
            res = calls_rx.recv() => {
                match res {
                    Ok(calls) => {
                        if let Some(call) = watcher.observe(&calls) {
                            app_state
                                .notifier
                                .notify_new_signal(&call.symbol, call.side, call.entry)
                                .await;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        log::warn!("Alert watcher lagged {} deliveries", skipped);
                    }
                }
            }
        }
    }
}
