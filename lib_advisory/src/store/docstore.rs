use crate::loggers::loggerlocal::LoggerLocal;
use crate::models::{
    CallDraft, CallStatus, InvestmentCall, MarketSnapshot, PriceUpdate, UserProfile, UserRole,
};
use crate::store::cache_redis::CacheHandler;
use chrono::Utc;
use rand::Rng;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{broadcast, RwLock};
use uuid::Uuid;

/// Cache key for the serialized call collection.
const CALLS_KEY: &str = "advisory:calls";
/// Cache key for the serialized snapshot singleton.
const SNAPSHOT_KEY: &str = "advisory:snapshot";

fn user_key(mobile: &str) -> String {
    format!("advisory:users:{}", mobile)
}

/// Store operation failures.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("call not found: {0}")]
    NotFound(String),

    #[error("cache persistence failed: {0}")]
    Cache(#[from] redis::RedisError),

    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result of a user sync: whether the profile is backed by the store or
/// only assumed-synced after a persistence failure.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncState {
    /// The profile is confirmed persisted (or already existed).
    Confirmed(UserProfile),
    /// Persistence failed; the locally-constructed profile is in use.
    Degraded(UserProfile),
}

impl SyncState {
    pub fn profile(&self) -> &UserProfile {
        match self {
            SyncState::Confirmed(p) | SyncState::Degraded(p) => p,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, SyncState::Degraded(_))
    }
}

struct StoreInner {
    /// The call book, kept newest-first at all times.
    calls: Vec<InvestmentCall>,
    snapshot: MarketSnapshot,
    users: HashMap<String, UserProfile>,
}

/// The document store.
///
/// Mutations follow persist-then-apply: the new state is written through
/// to the cache first, then swapped into memory and fanned out. A cache
/// failure therefore leaves the published state untouched.
pub struct DocStore {
    inner: RwLock<StoreInner>,
    calls_tx: broadcast::Sender<Arc<Vec<InvestmentCall>>>,
    snapshot_tx: broadcast::Sender<Arc<MarketSnapshot>>,
    cache: Option<CacheHandler>,
    logger: Arc<LoggerLocal>,
}

impl DocStore {
    /// An in-memory store seeded with the boot snapshot.
    pub fn new(logger: Arc<LoggerLocal>) -> Self {
        let (calls_tx, _) = broadcast::channel(1000);
        let (snapshot_tx, _) = broadcast::channel(1000);
        Self {
            inner: RwLock::new(StoreInner {
                calls: Vec::new(),
                snapshot: MarketSnapshot::seeded(),
                users: HashMap::new(),
            }),
            calls_tx,
            snapshot_tx,
            cache: None,
            logger,
        }
    }

    /// A store with a Redis write-through attached.
    pub fn with_cache(cache: CacheHandler, logger: Arc<LoggerLocal>) -> Self {
        let mut store = Self::new(logger);
        store.cache = Some(cache);
        store
    }

    /// Restores calls and snapshot from the cache, if present.
    ///
    /// Unreadable cache entries are logged and skipped; the service
    /// starts from the seeds rather than refusing to boot.
    pub async fn restore(&self) {
        let Some(cache) = &self.cache else { return };

        match cache.get_string(CALLS_KEY).await {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<InvestmentCall>>(&raw) {
                Ok(calls) => {
                    let mut inner = self.inner.write().await;
                    inner.calls = calls;
                    inner
                        .calls
                        .sort_by(|a, b| b.created_at.cmp(&a.created_at));
                }
                Err(e) => {
                    self.logger
                        .warn(&format!("Discarding unreadable cached calls: {}", e), None)
                        .await
                }
            },
            Ok(None) => {}
            Err(e) => {
                self.logger
                    .warn(&format!("Cache restore for calls failed: {}", e), None)
                    .await
            }
        }

        match cache.get_string(SNAPSHOT_KEY).await {
            Ok(Some(raw)) => match serde_json::from_str::<MarketSnapshot>(&raw) {
                Ok(snapshot) => self.inner.write().await.snapshot = snapshot,
                Err(e) => {
                    self.logger
                        .warn(
                            &format!("Discarding unreadable cached snapshot: {}", e),
                            None,
                        )
                        .await
                }
            },
            Ok(None) => {}
            Err(e) => {
                self.logger
                    .warn(&format!("Cache restore for snapshot failed: {}", e), None)
                    .await
            }
        }
    }

    /// Subscribes to the call collection feed.
    ///
    /// Returns the current book (the baseline delivery) plus a receiver
    /// that gets the full collection again on every change.
    pub async fn subscribe_calls(
        &self,
    ) -> (
        Arc<Vec<InvestmentCall>>,
        broadcast::Receiver<Arc<Vec<InvestmentCall>>>,
    ) {
        let inner = self.inner.read().await;
        (Arc::new(inner.calls.clone()), self.calls_tx.subscribe())
    }

    /// Subscribes to the snapshot singleton feed.
    pub async fn subscribe_snapshot(
        &self,
    ) -> (
        Arc<MarketSnapshot>,
        broadcast::Receiver<Arc<MarketSnapshot>>,
    ) {
        let inner = self.inner.read().await;
        (
            Arc::new(inner.snapshot.clone()),
            self.snapshot_tx.subscribe(),
        )
    }

    /// The current call book, newest first.
    pub async fn calls(&self) -> Vec<InvestmentCall> {
        self.inner.read().await.calls.clone()
    }

    /// Only the calls still OPEN.
    pub async fn open_calls(&self) -> Vec<InvestmentCall> {
        self.inner
            .read()
            .await
            .calls
            .iter()
            .filter(|c| c.status == CallStatus::Open)
            .cloned()
            .collect()
    }

    /// The current snapshot.
    pub async fn snapshot(&self) -> MarketSnapshot {
        self.inner.read().await.snapshot.clone()
    }

    /// Creates a call from an operator draft: OPEN, current price pinned
    /// to the entry, store-assigned id and timestamp.
    pub async fn add_call(&self, draft: CallDraft) -> Result<InvestmentCall, StoreError> {
        let call = InvestmentCall {
            id: Uuid::new_v4().to_string(),
            symbol: draft.symbol,
            side: draft.side,
            entry: draft.entry,
            stop_loss: draft.stop_loss,
            take_profit: draft.take_profit,
            current_price: draft.entry,
            status: CallStatus::Open,
            created_at: Utc::now(),
            note: draft.note,
            segment: draft.segment,
        };

        let mut inner = self.inner.write().await;
        let mut calls = inner.calls.clone();
        calls.insert(0, call.clone());
        calls.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        self.persist_calls(&calls).await?;
        inner.calls = calls;
        let _ = self.calls_tx.send(Arc::new(inner.calls.clone()));
        Ok(call)
    }

    /// Operator-triggered status transition.
    pub async fn update_call_status(
        &self,
        id: &str,
        status: CallStatus,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let mut calls = inner.calls.clone();
        let call = calls
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        call.status = status;

        self.persist_calls(&calls).await?;
        inner.calls = calls;
        let _ = self.calls_tx.send(Arc::new(inner.calls.clone()));
        Ok(())
    }

    /// Deletes a call at any status.
    pub async fn delete_call(&self, id: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        if !inner.calls.iter().any(|c| c.id == id) {
            return Err(StoreError::NotFound(id.to_string()));
        }
        let calls: Vec<InvestmentCall> =
            inner.calls.iter().filter(|c| c.id != id).cloned().collect();

        self.persist_calls(&calls).await?;
        inner.calls = calls;
        let _ = self.calls_tx.send(Arc::new(inner.calls.clone()));
        Ok(())
    }

    /// Applies a batch of price corrections as one unit: one write-lock
    /// section, one persistence write, one re-delivery to subscribers.
    ///
    /// Only OPEN calls are touched; a stale update for a call that left
    /// OPEN since reconciliation is dropped silently.
    pub async fn bulk_update_prices(&self, updates: &[PriceUpdate]) -> Result<(), StoreError> {
        if updates.is_empty() {
            return Ok(());
        }

        let mut inner = self.inner.write().await;
        let mut calls = inner.calls.clone();
        for update in updates {
            if let Some(call) = calls
                .iter_mut()
                .find(|c| c.id == update.id && c.status == CallStatus::Open)
            {
                call.current_price = update.new_price;
            }
        }

        self.persist_calls(&calls).await?;
        inner.calls = calls;
        let _ = self.calls_tx.send(Arc::new(inner.calls.clone()));
        Ok(())
    }

    /// Overwrites the snapshot singleton wholesale and re-delivers it.
    pub async fn write_snapshot(&self, snapshot: MarketSnapshot) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;

        self.persist_snapshot(&snapshot).await?;
        inner.snapshot = snapshot;
        let _ = self.snapshot_tx.send(Arc::new(inner.snapshot.clone()));
        Ok(())
    }

    /// Gets-or-creates a user profile by mobile number.
    ///
    /// A persistence failure falls back to the locally-constructed
    /// profile, reported as `Degraded` rather than an error.
    pub async fn sync_user(&self, profile: UserProfile) -> SyncState {
        let mut inner = self.inner.write().await;

        if let Some(existing) = inner.users.get(&profile.mobile) {
            return SyncState::Confirmed(existing.clone());
        }

        inner
            .users
            .insert(profile.mobile.clone(), profile.clone());

        if let Some(cache) = &self.cache {
            let serialized = match serde_json::to_string(&profile) {
                Ok(s) => s,
                Err(e) => {
                    self.logger
                        .error(&format!("User serialization failed: {}", e), None)
                        .await;
                    return SyncState::Degraded(profile);
                }
            };
            if let Err(e) = cache.set_string(&user_key(&profile.mobile), &serialized).await {
                self.logger
                    .error(&format!("User sync failed: {}", e), None)
                    .await;
                return SyncState::Degraded(profile);
            }
        }

        SyncState::Confirmed(profile)
    }

    /// Builds a fresh profile for a first-time login.
    pub fn new_profile(full_name: &str, mobile: &str, role: UserRole) -> UserProfile {
        let code: u32 = rand::rng().random_range(10_000..100_000);
        UserProfile {
            full_name: full_name.to_string(),
            mobile: mobile.to_string(),
            client_id: format!("AF-{}", code),
            role,
            joined_at: Utc::now(),
        }
    }

    async fn persist_calls(&self, calls: &[InvestmentCall]) -> Result<(), StoreError> {
        if let Some(cache) = &self.cache {
            let serialized = serde_json::to_string(calls)?;
            cache.set_string(CALLS_KEY, &serialized).await?;
        }
        Ok(())
    }

    async fn persist_snapshot(&self, snapshot: &MarketSnapshot) -> Result<(), StoreError> {
        if let Some(cache) = &self.cache {
            let serialized = serde_json::to_string(snapshot)?;
            cache.set_string(SNAPSHOT_KEY, &serialized).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loggers::loggerlocal::LoggerLocalOptions;
    use crate::models::{CallSide, Segment};
    use tokio::sync::broadcast::error::TryRecvError;

    fn quiet_logger() -> Arc<LoggerLocal> {
        Arc::new(LoggerLocal::new(
            "docstore_test".to_string(),
            Some(LoggerLocalOptions {
                use_tty: None,
                use_file: None,
                log_dir: None,
            }),
        ))
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
    async fn new_calls_are_open_and_priced_at_entry() {
        let store = DocStore::new(quiet_logger());
        let call = store.add_call(draft("RELIANCE", 2950.0)).await.unwrap();
        assert_eq!(call.status, CallStatus::Open);
        assert_eq!(call.current_price, 2950.0);
        assert!(!call.id.is_empty());
    }

    #[tokio::test]
    async fn call_feed_is_ordered_newest_first() {
        let store = DocStore::new(quiet_logger());
        store.add_call(draft("FIRST", 10.0)).await.unwrap();
        store.add_call(draft("SECOND", 20.0)).await.unwrap();
        store.add_call(draft("THIRD", 30.0)).await.unwrap();

        let calls = store.calls().await;
        assert_eq!(calls[0].symbol, "THIRD");
        assert_eq!(calls[2].symbol, "FIRST");
    }

    #[tokio::test]
    async fn every_mutation_redelivers_the_full_collection() {
        let store = DocStore::new(quiet_logger());
        store.add_call(draft("RELIANCE", 100.0)).await.unwrap();

        let (baseline, mut rx) = store.subscribe_calls().await;
        assert_eq!(baseline.len(), 1);

        let second = store.add_call(draft("TCS", 200.0)).await.unwrap();
        let delivery = rx.recv().await.unwrap();
        assert_eq!(delivery.len(), 2);
        assert_eq!(delivery[0].id, second.id);

        store
            .update_call_status(&second.id, CallStatus::HitTp)
            .await
            .unwrap();
        let delivery = rx.recv().await.unwrap();
        assert_eq!(delivery[0].status, CallStatus::HitTp);
    }

    #[tokio::test]
    async fn bulk_update_is_one_delivery_and_skips_closed_calls() {
        let store = DocStore::new(quiet_logger());
        let a = store.add_call(draft("A", 100.0)).await.unwrap();
        let b = store.add_call(draft("B", 200.0)).await.unwrap();
        let c = store.add_call(draft("C", 300.0)).await.unwrap();
        store
            .update_call_status(&c.id, CallStatus::Closed)
            .await
            .unwrap();

        let (_, mut rx) = store.subscribe_calls().await;
        store
            .bulk_update_prices(&[
                PriceUpdate {
                    id: a.id.clone(),
                    new_price: 105.0,
                },
                PriceUpdate {
                    id: b.id.clone(),
                    new_price: 210.0,
                },
                PriceUpdate {
                    id: c.id.clone(),
                    new_price: 999.0,
                },
            ])
            .await
            .unwrap();

        let delivery = rx.recv().await.unwrap();
        // One delivery for the whole batch.
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));

        let by_symbol = |s: &str| delivery.iter().find(|c| c.symbol == s).unwrap().clone();
        assert_eq!(by_symbol("A").current_price, 105.0);
        assert_eq!(by_symbol("B").current_price, 210.0);
        // The closed call never moves again.
        assert_eq!(by_symbol("C").current_price, 300.0);
    }

    #[tokio::test]
    async fn calls_without_updates_keep_their_price() {
        let store = DocStore::new(quiet_logger());
        let a = store.add_call(draft("A", 100.0)).await.unwrap();
        let b = store.add_call(draft("B", 200.0)).await.unwrap();

        store
            .bulk_update_prices(&[PriceUpdate {
                id: a.id.clone(),
                new_price: 110.0,
            }])
            .await
            .unwrap();

        let calls = store.calls().await;
        let b_after = calls.iter().find(|c| c.id == b.id).unwrap();
        assert_eq!(b_after.current_price, 200.0);
    }

    #[tokio::test]
    async fn snapshot_writes_are_full_replacements() {
        let store = DocStore::new(quiet_logger());
        let (initial, mut rx) = store.subscribe_snapshot().await;
        assert!(!initial.indices.is_empty());

        let snapshot = MarketSnapshot {
            indices: vec![crate::models::MarketIndex::new("NIFTY 50", 25000.0, 1.0, 0.1)],
            movers: Vec::new(),
            sentiment_insight: "Range-bound ahead of the policy meet.".to_string(),
            updated_at: Utc::now(),
        };
        store.write_snapshot(snapshot.clone()).await.unwrap();

        let delivery = rx.recv().await.unwrap();
        assert_eq!(*delivery, snapshot);
    }

    #[tokio::test]
    async fn delete_and_missing_ids() {
        let store = DocStore::new(quiet_logger());
        let call = store.add_call(draft("A", 100.0)).await.unwrap();

        store.delete_call(&call.id).await.unwrap();
        assert!(store.calls().await.is_empty());
        assert!(matches!(
            store.delete_call(&call.id).await,
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(
            store.update_call_status("nope", CallStatus::Closed).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn user_sync_returns_the_existing_profile_on_repeat_login() {
        let store = DocStore::new(quiet_logger());
        let first = DocStore::new_profile("Asha Rao", "9812345678", UserRole::Client);
        let synced = store.sync_user(first.clone()).await;
        assert!(!synced.is_degraded());
        assert_eq!(synced.profile(), &first);

        // Second login with the same mobile gets the stored profile back.
        let second = DocStore::new_profile("Asha R", "9812345678", UserRole::Client);
        let synced = store.sync_user(second).await;
        assert_eq!(synced.profile(), &first);
    }

    #[test]
    fn new_profiles_get_a_client_code() {
        let p = DocStore::new_profile("Asha Rao", "9812345678", UserRole::Client);
        assert!(p.client_id.starts_with("AF-"));
        assert_eq!(p.client_id.len(), 8);
    }
}
