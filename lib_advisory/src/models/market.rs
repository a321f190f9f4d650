//! # Market Data Types
//!
//! Index quotes, top movers and the snapshot singleton that every
//! subscriber receives as a full-replace payload on each broadcast.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A tracked market index with its latest quote.
///
/// The `name` is the display key: extracted records are matched against
/// it case-insensitively by substring, so "NIFTY" from the feed updates
/// a tracked "NIFTY 50" entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketIndex {
    pub name: String,
    pub value: f64,
    pub change: f64,
    pub change_percent: f64,
}

impl MarketIndex {
    pub fn new(name: &str, value: f64, change: f64, change_percent: f64) -> Self {
        Self {
            name: name.to_string(),
            value,
            change,
            change_percent,
        }
    }
}

/// Gainer/loser classification for a top mover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoverKind {
    #[serde(rename = "GAINER")]
    Gainer,
    #[serde(rename = "LOSER")]
    Loser,
}

/// A stock identified as a top gainer or loser in a broadcast cycle.
///
/// Movers are ephemeral: the list is replaced wholesale every cycle and
/// never merged incrementally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockMover {
    pub symbol: String,
    pub price: f64,
    pub change_percent: f64,
    #[serde(rename = "type")]
    pub kind: MoverKind,
}

/// The market snapshot singleton.
///
/// Fully overwritten (never merged) on every broadcast; all subscribers
/// receive the complete new document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketSnapshot {
    /// Tracked indices, in configured display order.
    pub indices: Vec<MarketIndex>,
    /// Top movers of the cycle; empty when the movers fetch failed.
    pub movers: Vec<StockMover>,
    /// One-sentence AI market sentiment summary.
    pub sentiment_insight: String,
    /// When this snapshot was published.
    pub updated_at: DateTime<Utc>,
}

impl MarketSnapshot {
    /// Builds the boot-time snapshot from the seed quotes, shown until
    /// the first broadcast lands.
    pub fn seeded() -> Self {
        Self {
            indices: seed_indices(),
            movers: Vec::new(),
            sentiment_insight: "Synchronizing with global research...".to_string(),
            updated_at: Utc::now(),
        }
    }
}

/// Seed quotes for the tracked NSE indices.
///
/// These values are placeholders shown before the first broadcast; the
/// names double as the fixed tracked-index list that extracted records
/// are reconciled against.
pub fn seed_indices() -> Vec<MarketIndex> {
    vec![
        MarketIndex::new("NIFTY 50", 24852.15, 112.30, 0.45),
        MarketIndex::new("SENSEX", 81332.72, 412.10, 0.51),
        MarketIndex::new("BANK NIFTY", 52431.20, -12.45, -0.02),
        MarketIndex::new("NIFTY IT", 41221.15, 345.20, 0.84),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_serializes_with_camel_case_keys() {
        let snap = MarketSnapshot::seeded();
        let json = serde_json::to_value(&snap).unwrap();
        assert!(json["indices"].is_array());
        assert!(json["sentimentInsight"].is_string());
        assert!(json["updatedAt"].is_string());
        assert_eq!(json["indices"][0]["changePercent"], 0.45);
    }

    #[test]
    fn mover_kind_round_trips_wire_names() {
        let m = StockMover {
            symbol: "RELIANCE".to_string(),
            price: 2950.4,
            change_percent: 3.45,
            kind: MoverKind::Gainer,
        };
        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json["type"], "GAINER");
        let back: StockMover = serde_json::from_value(json).unwrap();
        assert_eq!(back, m);
    }
}
