//! # Research Calls
//!
//! A call is a published buy/sell recommendation with entry, stop-loss,
//! target and a live status. Calls are created OPEN with the current
//! price pinned to the entry; only the reconciliation step of a broadcast
//! cycle moves `current_price` afterwards, and only while the call is
//! still OPEN. Status transitions are operator-triggered and terminal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Direction of a research call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallSide {
    #[serde(rename = "BUY")]
    Buy,
    #[serde(rename = "SELL")]
    Sell,
}

impl std::fmt::Display for CallSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CallSide::Buy => write!(f, "BUY"),
            CallSide::Sell => write!(f, "SELL"),
        }
    }
}

/// Lifecycle status of a research call.
///
/// `Open` is the only state in which the live price is refreshed. The
/// other three are terminal and can only be entered by an operator
/// action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallStatus {
    #[serde(rename = "OPEN")]
    Open,
    #[serde(rename = "CLOSED")]
    Closed,
    #[serde(rename = "HIT_TP")]
    HitTp,
    #[serde(rename = "HIT_SL")]
    HitSl,
}

impl CallStatus {
    /// Whether the status is a terminal (completed) state.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, CallStatus::Open)
    }
}

/// Market segment a call belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Segment {
    #[serde(rename = "EQUITY")]
    Equity,
    #[serde(rename = "F&O")]
    Fno,
    #[serde(rename = "COMMODITY")]
    Commodity,
}

/// A published research signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentCall {
    /// Store-assigned document id.
    pub id: String,
    /// Traded symbol, e.g. "RELIANCE" or "NIFTY_AUG_FUT".
    pub symbol: String,
    /// Buy or sell.
    #[serde(rename = "type")]
    pub side: CallSide,
    /// Recommended entry price.
    pub entry: f64,
    /// Stop-loss level.
    pub stop_loss: f64,
    /// Take-profit target.
    pub take_profit: f64,
    /// Latest known market price; equals `entry` at creation.
    pub current_price: f64,
    /// Lifecycle status.
    pub status: CallStatus,
    /// Creation time; the collection is delivered newest-first.
    pub created_at: DateTime<Utc>,
    /// Free-form research note accompanying the call.
    pub note: String,
    /// Market segment.
    pub segment: Segment,
}

/// Operator input for creating a new call.
///
/// The store fills in the id, status, current price and timestamp.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallDraft {
    pub symbol: String,
    #[serde(rename = "type")]
    pub side: CallSide,
    pub entry: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
    #[serde(default)]
    pub note: String,
    pub segment: Segment,
}

/// A single price correction produced by quote reconciliation,
/// applied to the call collection as one atomic bulk update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceUpdate {
    /// Id of the call to touch.
    pub id: String,
    /// The freshly extracted market price.
    pub new_price: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn call_json_uses_wire_field_names() {
        let call = InvestmentCall {
            id: "c1".to_string(),
            symbol: "RELIANCE".to_string(),
            side: CallSide::Buy,
            entry: 2950.4,
            stop_loss: 2890.0,
            take_profit: 3050.0,
            current_price: 2950.4,
            status: CallStatus::Open,
            created_at: Utc::now(),
            note: "Breakout above resistance".to_string(),
            segment: Segment::Equity,
        };

        let json = serde_json::to_value(&call).unwrap();
        assert_eq!(json["type"], "BUY");
        assert_eq!(json["status"], "OPEN");
        assert_eq!(json["stopLoss"], 2890.0);
        assert_eq!(json["currentPrice"], 2950.4);
        assert_eq!(json["segment"], "EQUITY");
    }

    #[test]
    fn terminal_statuses() {
        assert!(!CallStatus::Open.is_terminal());
        assert!(CallStatus::Closed.is_terminal());
        assert!(CallStatus::HitTp.is_terminal());
        assert!(CallStatus::HitSl.is_terminal());
    }
}
