//! # Text Extraction Layer
//!
//! The AI collaborator answers prompts with free-form prose that embeds
//! bracketed records of a fixed grammar. This module turns that text into
//! typed records in two passes: first the response is sanitized (grounding
//! source tails, URLs and citation markers removed), then the bracket
//! groups are scanned left-to-right.
//!
//! Matching is purely syntactic. A malformed or partial group is skipped
//! without aborting the scan, and a numeric field that fails to parse is
//! carried as `NaN` rather than dropping the record.

pub mod brackets;
pub mod sanitize;

pub use brackets::{extract_index_quotes, extract_movers, extract_symbol_prices, SymbolPrice};
pub use sanitize::sanitize_response;
