//! Bracket-grammar record scanning.
//!
//! Three record shapes exist, one per prompt family:
//!
//! - `[NAME: NIFTY 50 | PRICE: 24850.25 | CHANGE: 110.50 | PERCENT: 0.45]`
//! - `[SYMBOL: RELIANCE | PRICE: 2950.40 | PERCENT: 3.45 | TYPE: GAINER]`
//! - `[RELIANCE: 2950.40]`
//!
//! The index grammar tolerates a missing closing bracket (truncated
//! responses are common); the other two require it. Records are emitted
//! in order of appearance.

use crate::models::{MarketIndex, MoverKind, StockMover};
use regex::Regex;
use std::sync::LazyLock;

// Name/symbol captures deliberately exclude the bracket and pipe
// delimiters so a malformed group cannot swallow the record after it.

/// Index quote record. The closing bracket is intentionally optional.
static INDEX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\[NAME:\s*([^\[\]|]*?)\s*\|\s*PRICE:\s*(-?[\d.]+)\s*\|\s*CHANGE:\s*(-?[\d.]+)\s*\|\s*PERCENT:\s*(-?[\d.]+)",
    )
    .expect("index record pattern")
});

/// Top-mover record.
static MOVER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\[SYMBOL:\s*([^\[\]|]*?)\s*\|\s*PRICE:\s*(-?[\d.]+)\s*\|\s*PERCENT:\s*(-?[\d.]+)\s*\|\s*TYPE:\s*([^\[\]|]*?)\]",
    )
    .expect("mover record pattern")
});

/// Bare symbol-price record from the batch quote prompt.
static SYMBOL_PRICE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\[\]:]+?):\s*(-?[\d.]+)\]").expect("symbol price pattern"));

/// A symbol with its extracted market price.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolPrice {
    pub symbol: String,
    pub price: f64,
}

/// Parses a numeric capture, carrying parse failures as `NaN`.
///
/// The upstream grammar guarantees digit-ish characters only, but not a
/// well-formed float (e.g. "24.850.25"). Such records are still emitted.
fn parse_field(raw: &str) -> f64 {
    raw.parse::<f64>().unwrap_or(f64::NAN)
}

/// Extracts index quote records, left to right.
pub fn extract_index_quotes(text: &str) -> Vec<MarketIndex> {
    INDEX_RE
        .captures_iter(text)
        .map(|cap| MarketIndex {
            name: cap[1].trim().to_string(),
            value: parse_field(&cap[2]),
            change: parse_field(&cap[3]),
            change_percent: parse_field(&cap[4]),
        })
        .collect()
}

/// Extracts top-mover records, left to right.
///
/// A record whose TYPE field is neither GAINER nor LOSER is malformed
/// and skipped.
pub fn extract_movers(text: &str) -> Vec<StockMover> {
    MOVER_RE
        .captures_iter(text)
        .filter_map(|cap| {
            let kind = match cap[4].trim().to_uppercase().as_str() {
                "GAINER" => MoverKind::Gainer,
                "LOSER" => MoverKind::Loser,
                _ => return None,
            };
            Some(StockMover {
                symbol: cap[1].trim().to_string(),
                price: parse_field(&cap[2]),
                change_percent: parse_field(&cap[3]),
                kind,
            })
        })
        .collect()
}

/// Extracts `[SYMBOL: PRICE]` records, left to right.
pub fn extract_symbol_prices(text: &str) -> Vec<SymbolPrice> {
    SYMBOL_PRICE_RE
        .captures_iter(text)
        .map(|cap| SymbolPrice {
            symbol: cap[1].trim().to_string(),
            price: parse_field(&cap[2]),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::sanitize_response;

    #[test]
    fn one_record_per_bracket_group_in_order() {
        let text = "prose [NAME: NIFTY 50 | PRICE: 24850.25 | CHANGE: 110.50 | PERCENT: 0.45] \
                    middle [NAME: SENSEX | PRICE: 81332.72 | CHANGE: -412.10 | PERCENT: -0.51] tail";
        let quotes = extract_index_quotes(text);
        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[0].name, "NIFTY 50");
        assert_eq!(quotes[0].value, 24850.25);
        assert_eq!(quotes[1].name, "SENSEX");
        assert_eq!(quotes[1].change, -412.10);
        assert_eq!(quotes[1].change_percent, -0.51);
    }

    #[test]
    fn extraction_after_sanitizer_still_finds_preceding_bracket() {
        let raw = "noise [NAME: NIFTY 50 | PRICE: 100.5 | CHANGE: 1.2 | PERCENT: 0.5] more noise Sources: http://x.com";
        let quotes = extract_index_quotes(&sanitize_response(raw));
        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].name, "NIFTY 50");
        assert_eq!(quotes[0].value, 100.5);
        assert_eq!(quotes[0].change, 1.2);
        assert_eq!(quotes[0].change_percent, 0.5);
    }

    #[test]
    fn index_record_tolerates_missing_closing_bracket() {
        let text = "[NAME: BANK NIFTY | PRICE: 52431.20 | CHANGE: -12.45 | PERCENT: -0.02";
        let quotes = extract_index_quotes(text);
        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].name, "BANK NIFTY");
    }

    #[test]
    fn malformed_group_is_skipped_without_aborting_scan() {
        let text = "[NAME: NIFTY | PRICE: abc] [NAME: SENSEX | PRICE: 81000.1 | CHANGE: 10.0 | PERCENT: 0.1]";
        let quotes = extract_index_quotes(text);
        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].name, "SENSEX");
    }

    #[test]
    fn multi_dot_numeric_field_yields_nan_record() {
        let text = "[NAME: NIFTY 50 | PRICE: 24.850.25 | CHANGE: 1.0 | PERCENT: 0.1]";
        let quotes = extract_index_quotes(text);
        assert_eq!(quotes.len(), 1);
        assert!(quotes[0].value.is_nan());
        assert_eq!(quotes[0].change, 1.0);
    }

    #[test]
    fn movers_parse_kind_and_skip_unknown_types() {
        let text = "[SYMBOL: RELIANCE | PRICE: 2950.40 | PERCENT: 3.45 | TYPE: GAINER] \
                    [SYMBOL: TCS | PRICE: 3820.15 | PERCENT: -2.10 | TYPE: loser] \
                    [SYMBOL: INFY | PRICE: 1500.00 | PERCENT: 0.30 | TYPE: FLAT]";
        let movers = extract_movers(text);
        assert_eq!(movers.len(), 2);
        assert_eq!(movers[0].kind, MoverKind::Gainer);
        assert_eq!(movers[1].symbol, "TCS");
        assert_eq!(movers[1].kind, MoverKind::Loser);
    }

    #[test]
    fn symbol_prices_extract_in_order() {
        let text = "[RELIANCE: 2950.40] [TCS: 3820.15] [NIFTY_AUG_FUT: 24500.00]";
        let prices = extract_symbol_prices(text);
        assert_eq!(prices.len(), 3);
        assert_eq!(
            prices[0],
            SymbolPrice {
                symbol: "RELIANCE".to_string(),
                price: 2950.40
            }
        );
        assert_eq!(prices[2].symbol, "NIFTY_AUG_FUT");
    }
}
