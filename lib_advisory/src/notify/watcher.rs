//! New-signal detection over the full-replace call feed.
//!
//! Every delivery replaces the whole collection, so arrival of a new
//! call is detected by comparing collection sizes between deliveries.
//! The first delivery only establishes the baseline; it never fires,
//! even if calls already exist. A baseline of zero never fires either;
//! growth is only trusted once a non-empty book has been seen.

use crate::models::{CallStatus, InvestmentCall};

/// Tracks the call-count baseline across deliveries.
#[derive(Debug, Default)]
pub struct NewSignalWatcher {
    prev_count: usize,
}

impl NewSignalWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one full-replace delivery through the detector.
    ///
    /// Returns the newest call when this delivery grew the collection
    /// past an established baseline and that call is OPEN. The delivery
    /// is expected newest-first, as the store publishes it.
    pub fn observe<'a>(&mut self, calls: &'a [InvestmentCall]) -> Option<&'a InvestmentCall> {
        let prev = self.prev_count;
        self.prev_count = calls.len();

        if calls.len() > prev && prev > 0 {
            let newest = calls.first()?;
            if newest.status == CallStatus::Open {
                return Some(newest);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CallSide, Segment};
    use chrono::Utc;

    fn call(id: &str, status: CallStatus) -> InvestmentCall {
        InvestmentCall {
            id: id.to_string(),
            symbol: format!("SYM{}", id),
            side: CallSide::Buy,
            entry: 100.0,
            stop_loss: 95.0,
            take_profit: 110.0,
            current_price: 100.0,
            status,
            created_at: Utc::now(),
            note: String::new(),
            segment: Segment::Equity,
        }
    }

    #[test]
    fn first_delivery_with_preexisting_calls_never_fires() {
        let mut watcher = NewSignalWatcher::new();
        let book = vec![call("1", CallStatus::Open), call("2", CallStatus::Open)];
        assert!(watcher.observe(&book).is_none());
    }

    #[test]
    fn growth_after_baseline_fires_exactly_once_with_the_newest_call() {
        let mut watcher = NewSignalWatcher::new();
        let initial = vec![call("1", CallStatus::Open)];
        assert!(watcher.observe(&initial).is_none());

        let grown = vec![call("2", CallStatus::Open), call("1", CallStatus::Open)];
        let fired = watcher.observe(&grown).expect("should fire");
        assert_eq!(fired.id, "2");

        // Redelivery of the same book does not fire again.
        assert!(watcher.observe(&grown).is_none());
    }

    #[test]
    fn growth_with_a_non_open_newest_call_does_not_fire() {
        let mut watcher = NewSignalWatcher::new();
        watcher.observe(&[call("1", CallStatus::Open)]);

        let grown = vec![call("2", CallStatus::Closed), call("1", CallStatus::Open)];
        assert!(watcher.observe(&grown).is_none());
    }

    #[test]
    fn shrinking_deliveries_reset_the_baseline() {
        let mut watcher = NewSignalWatcher::new();
        watcher.observe(&[call("1", CallStatus::Open), call("2", CallStatus::Open)]);
        // A deletion shrinks the book.
        watcher.observe(&[call("1", CallStatus::Open)]);
        // Growth from the new, smaller baseline fires.
        let grown = vec![call("3", CallStatus::Open), call("1", CallStatus::Open)];
        assert!(watcher.observe(&grown).is_some());
    }

    #[test]
    fn growth_from_an_empty_baseline_does_not_fire() {
        let mut watcher = NewSignalWatcher::new();
        assert!(watcher.observe(&[]).is_none());
        assert!(watcher.observe(&[call("1", CallStatus::Open)]).is_none());
    }
}
