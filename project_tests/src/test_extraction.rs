//! # Extraction Pipeline Walkthrough
//!
//! Runs representative AI responses through sanitization, extraction and
//! reconciliation, printing each stage. Fully offline.

use lib_advisory::extract::{
    extract_index_quotes, extract_movers, extract_symbol_prices, sanitize_response,
};
use lib_advisory::models::seed_indices;
use lib_advisory::reconcile::merge_indices;

fn main() {
    let raw = "Here are today's figures [1]:\n\
        [NAME: NIFTY 50 | PRICE: 25120.50 | CHANGE: 268.35 | PERCENT: 1.08]\n\
        [NAME: SENSEX | PRICE: 82110.20 | CHANGE: 777.48 | PERCENT: 0.96]\n\
        [NAME: GIFT NIFTY | PRICE: 25190.00 | CHANGE: 75.00 | PERCENT: 0.30]\n\
        Sources: https://example.com/market-data";

    println!("[*] Raw response:\n{}\n", raw);

    let clean = sanitize_response(raw);
    println!("[*] Sanitized:\n{}\n", clean);

    let extracted = extract_index_quotes(&clean);
    println!("[*] Extracted {} index records:", extracted.len());
    for q in &extracted {
        println!("    {} = {} ({} / {}%)", q.name, q.value, q.change, q.change_percent);
    }

    // GIFT NIFTY is not tracked and must be dropped by the merge.
    let merged = merge_indices(&seed_indices(), &extracted);
    println!("\n[*] Merged tracked list:");
    for idx in &merged {
        println!("    {} = {} ({} / {}%)", idx.name, idx.value, idx.change, idx.change_percent);
    }

    let movers_text = "[SYMBOL: RELIANCE | PRICE: 2950.40 | PERCENT: 3.45 | TYPE: GAINER] \
                       [SYMBOL: TCS | PRICE: 3820.15 | PERCENT: -2.10 | TYPE: LOSER]";
    println!("\n[*] Movers: {:?}", extract_movers(movers_text));

    let quotes_text = "[RELIANCE: 2951.00] [TCS: 3819.90]";
    println!("[*] Batch quotes: {:?}", extract_symbol_prices(quotes_text));
}
