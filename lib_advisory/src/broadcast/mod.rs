//! # Broadcast Orchestrator
//!
//! The operator-triggered refresh cycle. Five steps run strictly in
//! sequence, each awaited before the next, so the total latency is the
//! sum of the sub-call latencies:
//!
//! 1. live index text → extract → reconcile into the tracked list
//! 2. top-mover text → extract into a fresh list
//! 3. batch quotes for OPEN calls → reconcile → one bulk price update
//! 4. news digest → one-sentence sentiment insight
//! 5. persist the new snapshot wholesale
//!
//! Fetch sentinels and failures in steps 1, 2 and 4 degrade that step
//! only; a persistence error in step 3 or 5 fails the whole cycle.
//! There is no single-flight lock: concurrent triggers interleave and
//! the last snapshot write wins.

use crate::extract::{extract_index_quotes, extract_movers, extract_symbol_prices};
use crate::markets::gemini::feed::{FetchOutcome, MarketFeedSource};
use crate::models::MarketSnapshot;
use crate::reconcile::{merge_indices, merge_movers, merge_quotes};
use crate::store::{DocStore, StoreError};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;

/// What a completed broadcast cycle did, for operator reporting.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BroadcastReport {
    /// Whether step 1 produced at least one extracted index record.
    pub indices_refreshed: bool,
    /// Movers carried into the snapshot.
    pub mover_count: usize,
    /// Call prices touched by the bulk update.
    pub price_updates: usize,
    /// The sentiment insight persisted with the snapshot.
    pub insight: String,
}

/// Runs broadcast cycles against a market feed and the document store.
pub struct MarketBroadcaster<F: MarketFeedSource> {
    feed: F,
    store: Arc<DocStore>,
}

impl<F: MarketFeedSource> MarketBroadcaster<F> {
    pub fn new(feed: F, store: Arc<DocStore>) -> Self {
        Self { feed, store }
    }

    /// One full refresh cycle.
    ///
    /// # Errors
    /// Only store persistence failures surface here; every AI-side
    /// failure is absorbed as a degraded step.
    pub async fn broadcast_refresh(&self) -> Result<BroadcastReport, StoreError> {
        // 1. Refresh indices. Sentinels leave the prior list untouched.
        let current = self.store.snapshot().await.indices;
        let (indices, indices_refreshed) = match self.feed.live_indices().await {
            FetchOutcome::Text(text) => {
                let extracted = extract_index_quotes(&text);
                let refreshed = !extracted.is_empty();
                (merge_indices(&current, &extracted), refreshed)
            }
            _ => (current, false),
        };

        // 2. Refresh top movers. Failure yields an empty list.
        let movers = match self.feed.top_movers().await {
            FetchOutcome::Text(text) => merge_movers(extract_movers(&text)),
            _ => Vec::new(),
        };

        // 3. Refresh prices for the open call book, skipped when empty.
        let open_calls = self.store.open_calls().await;
        let mut price_updates = 0;
        if !open_calls.is_empty() {
            let symbols: Vec<String> = open_calls.iter().map(|c| c.symbol.clone()).collect();
            if let FetchOutcome::Text(text) = self.feed.batch_prices(&symbols).await {
                let updates = merge_quotes(&open_calls, &extract_symbol_prices(&text));
                if !updates.is_empty() {
                    self.store.bulk_update_prices(&updates).await?;
                    price_updates = updates.len();
                }
            }
        }

        // 4. News digest, then the sentiment sub-call (the feed skips it
        //    for an empty digest).
        let news = self.feed.latest_news().await;
        let insight = self.feed.sentiment_insight(&news).await;

        // 5. Publish the new snapshot wholesale.
        let snapshot = MarketSnapshot {
            indices,
            movers,
            sentiment_insight: insight.clone(),
            updated_at: Utc::now(),
        };
        let mover_count = snapshot.movers.len();
        self.store.write_snapshot(snapshot).await?;

        Ok(BroadcastReport {
            indices_refreshed,
            mover_count,
            price_updates,
            insight,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loggers::loggerlocal::{LoggerLocal, LoggerLocalOptions};
    use crate::models::{CallDraft, CallSide, CallStatus, Segment};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn quiet_logger() -> Arc<LoggerLocal> {
        Arc::new(LoggerLocal::new(
            "broadcast_test".to_string(),
            Some(LoggerLocalOptions {
                use_tty: None,
                use_file: None,
                log_dir: None,
            }),
        ))
    }

    /// Canned feed with call counting for the batch step.
    struct MockFeed {
        indices: FetchOutcome,
        movers: FetchOutcome,
        prices: FetchOutcome,
        news: String,
        batch_calls: AtomicUsize,
    }

    impl MockFeed {
        fn new(indices: FetchOutcome, movers: FetchOutcome, prices: FetchOutcome) -> Self {
            Self {
                indices,
                movers,
                prices,
                news: "RBI holds rates steady.".to_string(),
                batch_calls: AtomicUsize::new(0),
            }
        }
    }

    impl MarketFeedSource for &MockFeed {
        async fn live_indices(&self) -> FetchOutcome {
            self.indices.clone()
        }

        async fn top_movers(&self) -> FetchOutcome {
            self.movers.clone()
        }

        async fn batch_prices(&self, _symbols: &[String]) -> FetchOutcome {
            self.batch_calls.fetch_add(1, Ordering::SeqCst);
            self.prices.clone()
        }

        async fn latest_news(&self) -> String {
            self.news.clone()
        }

        async fn sentiment_insight(&self, news: &str) -> String {
            if news.is_empty() {
                "Analyzing market trends...".to_string()
            } else {
                "Cautiously optimistic into the close.".to_string()
            }
        }
    }

    fn draft(symbol: &str, entry: f64) -> CallDraft {
        CallDraft {
            symbol: symbol.to_string(),
            side: CallSide::Buy,
            entry,
            stop_loss: entry * 0.95,
            take_profit: entry * 1.1,
            note: String::new(),
            segment: Segment::Equity,
        }
    }

    #[tokio::test]
    async fn failed_movers_fetch_still_persists_fresh_indices() {
        let store = Arc::new(DocStore::new(quiet_logger()));
        let feed = MockFeed::new(
            FetchOutcome::Text(
                "[NAME: NIFTY | PRICE: 25100.0 | CHANGE: 120.5 | PERCENT: 0.48]".to_string(),
            ),
            FetchOutcome::Failed,
            FetchOutcome::Failed,
        );

        let report = MarketBroadcaster::new(&feed, store.clone())
            .broadcast_refresh()
            .await
            .unwrap();

        assert!(report.indices_refreshed);
        assert_eq!(report.mover_count, 0);

        let snapshot = store.snapshot().await;
        assert_eq!(snapshot.indices[0].name, "NIFTY 50");
        assert_eq!(snapshot.indices[0].value, 25100.0);
        assert!(snapshot.movers.is_empty());
    }

    #[tokio::test]
    async fn rate_limited_indices_fetch_keeps_the_prior_list() {
        let store = Arc::new(DocStore::new(quiet_logger()));
        let before = store.snapshot().await.indices;
        let feed = MockFeed::new(
            FetchOutcome::RateLimited,
            FetchOutcome::Text(
                "[SYMBOL: RELIANCE | PRICE: 2950.40 | PERCENT: 3.45 | TYPE: GAINER]".to_string(),
            ),
            FetchOutcome::Failed,
        );

        let report = MarketBroadcaster::new(&feed, store.clone())
            .broadcast_refresh()
            .await
            .unwrap();

        assert!(!report.indices_refreshed);
        assert_eq!(report.mover_count, 1);

        let snapshot = store.snapshot().await;
        assert_eq!(snapshot.indices, before);
        assert_eq!(snapshot.movers[0].symbol, "RELIANCE");
    }

    #[tokio::test]
    async fn batch_step_is_skipped_entirely_without_open_calls() {
        let store = Arc::new(DocStore::new(quiet_logger()));
        let feed = MockFeed::new(FetchOutcome::Failed, FetchOutcome::Failed, FetchOutcome::Failed);

        MarketBroadcaster::new(&feed, store.clone())
            .broadcast_refresh()
            .await
            .unwrap();

        assert_eq!(feed.batch_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn open_calls_get_bulk_updated_and_absent_symbols_keep_prices() {
        let store = Arc::new(DocStore::new(quiet_logger()));
        let a = store.add_call(draft("RELIANCE", 2900.0)).await.unwrap();
        let b = store.add_call(draft("TCS", 3800.0)).await.unwrap();
        let closed = store.add_call(draft("INFY", 1500.0)).await.unwrap();
        store
            .update_call_status(&closed.id, CallStatus::HitSl)
            .await
            .unwrap();

        let feed = MockFeed::new(
            FetchOutcome::Failed,
            FetchOutcome::Failed,
            FetchOutcome::Text("[RELIANCE: 2951.25] [INFY: 1490.0]".to_string()),
        );

        let report = MarketBroadcaster::new(&feed, store.clone())
            .broadcast_refresh()
            .await
            .unwrap();

        assert_eq!(feed.batch_calls.load(Ordering::SeqCst), 1);
        // INFY is no longer open, so only RELIANCE matched.
        assert_eq!(report.price_updates, 1);

        let calls = store.calls().await;
        let find = |id: &str| calls.iter().find(|c| c.id == id).unwrap().clone();
        assert_eq!(find(&a.id).current_price, 2951.25);
        assert_eq!(find(&b.id).current_price, 3800.0);
        assert_eq!(find(&closed.id).current_price, 1500.0);
    }

    #[tokio::test]
    async fn snapshot_carries_the_sentiment_insight() {
        let store = Arc::new(DocStore::new(quiet_logger()));
        let feed = MockFeed::new(FetchOutcome::NoKey, FetchOutcome::NoKey, FetchOutcome::NoKey);

        let report = MarketBroadcaster::new(&feed, store.clone())
            .broadcast_refresh()
            .await
            .unwrap();

        assert_eq!(report.insight, "Cautiously optimistic into the close.");
        assert_eq!(
            store.snapshot().await.sentiment_insight,
            "Cautiously optimistic into the close."
        );
    }
}
