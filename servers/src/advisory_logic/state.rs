use lib_advisory::broadcast::MarketBroadcaster;
use lib_advisory::markets::gemini::MarketFeed;
use lib_advisory::markets::hours;
use lib_advisory::notify::SignalNotifier;
use lib_advisory::store::DocStore;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared handles every task and handler works against.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<DocStore>,
    pub broadcaster: Arc<MarketBroadcaster<MarketFeed>>,
    pub notifier: Arc<SignalNotifier>,
    /// Operator-facing status line ("MARKET LIVE", "BROADCASTING...", ...).
    status: Arc<RwLock<String>>,
}

impl AppState {
    pub fn new(
        store: Arc<DocStore>,
        broadcaster: Arc<MarketBroadcaster<MarketFeed>>,
        notifier: Arc<SignalNotifier>,
    ) -> Self {
        Self {
            store,
            broadcaster,
            notifier,
            status: Arc::new(RwLock::new("SYNCING...".to_string())),
        }
    }

    pub async fn status(&self) -> String {
        self.status.read().await.clone()
    }

    pub async fn set_status(&self, status: &str) {
        *self.status.write().await = status.to_string();
    }

    /// Resets the status line to the session state.
    pub async fn set_market_status(&self) {
        let label = hours::market_status_label(hours::is_market_open());
        self.set_status(label).await;
    }
}
