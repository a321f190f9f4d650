//! # Reconciliation Engine
//!
//! Merges freshly extracted records into existing state by key match.
//! Index names match by case-insensitive substring against the tracked
//! list; call symbols match exactly, case-insensitively. Movers are not
//! merged at all; the list is replaced wholesale each cycle.

use crate::models::{InvestmentCall, MarketIndex, PriceUpdate, StockMover};
use crate::extract::SymbolPrice;

/// Merges extracted index quotes into the current tracked list.
///
/// For each extracted record, the first current entry whose uppercased
/// name contains the extracted name (uppercased) as a substring gets its
/// value/change/changePercent replaced in place; its position is
/// preserved. Extracted records with no tracked counterpart are dropped
/// silently, and tracked entries the feed did not mention are left
/// untouched.
pub fn merge_indices(current: &[MarketIndex], extracted: &[MarketIndex]) -> Vec<MarketIndex> {
    let mut merged = current.to_vec();

    for quote in extracted {
        let needle = quote.name.trim().to_uppercase();
        if needle.is_empty() {
            continue;
        }
        if let Some(entry) = merged
            .iter_mut()
            .find(|idx| idx.name.to_uppercase().contains(&needle))
        {
            entry.value = quote.value;
            entry.change = quote.change;
            entry.change_percent = quote.change_percent;
        }
    }

    merged
}

/// Movers carry no identity across cycles; the new list wins outright.
pub fn merge_movers(extracted: Vec<StockMover>) -> Vec<StockMover> {
    extracted
}

/// Matches extracted symbol prices against the open call book.
///
/// Emits one price update per extracted record whose symbol equals an
/// open call's symbol (case-insensitive). Open calls absent from the
/// extracted set keep their previous price for this cycle.
pub fn merge_quotes(open_calls: &[InvestmentCall], extracted: &[SymbolPrice]) -> Vec<PriceUpdate> {
    let mut updates = Vec::new();

    for quote in extracted {
        let needle = quote.symbol.trim().to_uppercase();
        if let Some(call) = open_calls
            .iter()
            .find(|c| c.symbol.to_uppercase() == needle)
        {
            updates.push(PriceUpdate {
                id: call.id.clone(),
                new_price: quote.price,
            });
        }
    }

    updates
}
