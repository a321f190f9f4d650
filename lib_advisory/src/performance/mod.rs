//! # Performance Tracking
//!
//! Accuracy and realized P&L arithmetic over the research-call book.
//! Only completed calls (anything no longer OPEN) enter the stats; a
//! manually CLOSED call realizes at its stop level, same as a stop hit.

use crate::models::{CallStatus, InvestmentCall};
use serde::Serialize;

/// Aggregate stats over the call book.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceSummary {
    pub total: usize,
    pub open: usize,
    pub completed: usize,
    pub winners: usize,
    pub losers: usize,
    /// Winners as a percentage of completed calls; 0 when none completed.
    pub accuracy_percent: f64,
}

/// Realized P&L of one completed call, for the performance breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallPnl {
    pub symbol: String,
    pub pnl_percent: f64,
}

/// Realized P&L percentage of a completed call.
///
/// Take-profit hits realize at the target; every other terminal status
/// realizes at the stop level. Open calls have no realized P&L.
pub fn realized_pnl_percent(call: &InvestmentCall) -> Option<f64> {
    if !call.status.is_terminal() {
        return None;
    }
    let exit = match call.status {
        CallStatus::HitTp => call.take_profit,
        _ => call.stop_loss,
    };
    Some((exit - call.entry) / call.entry * 100.0)
}

/// Summarizes the whole call book.
pub fn summarize(calls: &[InvestmentCall]) -> PerformanceSummary {
    let completed: Vec<&InvestmentCall> =
        calls.iter().filter(|c| c.status.is_terminal()).collect();
    let winners = completed
        .iter()
        .filter(|c| c.status == CallStatus::HitTp)
        .count();
    let losers = completed
        .iter()
        .filter(|c| c.status == CallStatus::HitSl)
        .count();
    let accuracy_percent = if completed.is_empty() {
        0.0
    } else {
        winners as f64 / completed.len() as f64 * 100.0
    };

    PerformanceSummary {
        total: calls.len(),
        open: calls.len() - completed.len(),
        completed: completed.len(),
        winners,
        losers,
        accuracy_percent,
    }
}

/// Per-call realized P&L entries for all completed calls, in book order.
pub fn pnl_breakdown(calls: &[InvestmentCall]) -> Vec<CallPnl> {
    calls
        .iter()
        .filter_map(|c| {
            realized_pnl_percent(c).map(|pnl_percent| CallPnl {
                symbol: c.symbol.clone(),
                pnl_percent,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CallSide, Segment};
    use chrono::Utc;

    fn call(symbol: &str, status: CallStatus, entry: f64, sl: f64, tp: f64) -> InvestmentCall {
        InvestmentCall {
            id: symbol.to_lowercase(),
            symbol: symbol.to_string(),
            side: CallSide::Buy,
            entry,
            stop_loss: sl,
            take_profit: tp,
            current_price: entry,
            status,
            created_at: Utc::now(),
            note: String::new(),
            segment: Segment::Equity,
        }
    }

    #[test]
    fn summary_over_a_mixed_book() {
        let book = vec![
            call("RELIANCE", CallStatus::Open, 2950.0, 2890.0, 3050.0),
            call("TCS", CallStatus::HitTp, 3800.0, 3700.0, 3990.0),
            call("INFY", CallStatus::HitSl, 1500.0, 1455.0, 1580.0),
            call("SBIN", CallStatus::HitTp, 800.0, 780.0, 840.0),
            call("WIPRO", CallStatus::Closed, 250.0, 245.0, 262.0),
        ];

        let summary = summarize(&book);
        assert_eq!(summary.total, 5);
        assert_eq!(summary.open, 1);
        assert_eq!(summary.completed, 4);
        assert_eq!(summary.winners, 2);
        assert_eq!(summary.losers, 1);
        assert!((summary.accuracy_percent - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_and_all_open_books_have_zero_accuracy() {
        assert_eq!(summarize(&[]).accuracy_percent, 0.0);
        let book = vec![call("RELIANCE", CallStatus::Open, 100.0, 95.0, 110.0)];
        assert_eq!(summarize(&book).accuracy_percent, 0.0);
    }

    #[test]
    fn pnl_realizes_at_target_or_stop() {
        let tp = call("TCS", CallStatus::HitTp, 1000.0, 950.0, 1100.0);
        let sl = call("INFY", CallStatus::HitSl, 1000.0, 950.0, 1100.0);
        let closed = call("WIPRO", CallStatus::Closed, 1000.0, 950.0, 1100.0);
        let open = call("SBIN", CallStatus::Open, 1000.0, 950.0, 1100.0);

        assert_eq!(realized_pnl_percent(&tp), Some(10.0));
        assert_eq!(realized_pnl_percent(&sl), Some(-5.0));
        assert_eq!(realized_pnl_percent(&closed), Some(-5.0));
        assert_eq!(realized_pnl_percent(&open), None);
    }

    #[test]
    fn breakdown_skips_open_calls() {
        let book = vec![
            call("RELIANCE", CallStatus::Open, 100.0, 95.0, 110.0),
            call("TCS", CallStatus::HitTp, 1000.0, 950.0, 1100.0),
        ];
        let breakdown = pnl_breakdown(&book);
        assert_eq!(breakdown.len(), 1);
        assert_eq!(breakdown[0].symbol, "TCS");
        assert_eq!(breakdown[0].pnl_percent, 10.0);
    }
}
