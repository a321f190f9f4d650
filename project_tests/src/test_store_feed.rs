//! # Store Feed Walkthrough
//!
//! Subscribes to the call collection feed, publishes calls, and shows
//! the full-replace deliveries plus new-signal detection. Fully offline.

use lib_advisory::loggers::loggerlocal::{LoggerLocal, LoggerLocalOptions};
use lib_advisory::models::{CallDraft, CallSide, Segment};
use lib_advisory::notify::NewSignalWatcher;
use lib_advisory::store::DocStore;
use std::sync::Arc;

fn draft(symbol: &str, entry: f64) -> CallDraft {
    CallDraft {
        symbol: symbol.to_string(),
        side: CallSide::Buy,
        entry,
        stop_loss: entry * 0.95,
        take_profit: entry * 1.1,
        note: "walkthrough".to_string(),
        segment: Segment::Equity,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let logger = Arc::new(LoggerLocal::new(
        "store_feed_test".to_string(),
        Some(LoggerLocalOptions {
            use_tty: Some(vec![6, 5, 4]),
            use_file: None,
            log_dir: None,
        }),
    ));
    let store = Arc::new(DocStore::new(logger));

    store.add_call(draft("RELIANCE", 2950.0)).await?;

    let (baseline, mut rx) = store.subscribe_calls().await;
    let mut watcher = NewSignalWatcher::new();
    println!("[*] Baseline delivery: {} call(s)", baseline.len());
    assert!(watcher.observe(&baseline).is_none());

    store.add_call(draft("TCS", 3800.0)).await?;
    let delivery = rx.recv().await?;
    println!("[*] Re-delivery: {} call(s), newest {}", delivery.len(), delivery[0].symbol);

    match watcher.observe(&delivery) {
        Some(call) => println!(
            "[OK] New signal detected: {} {} @ {}",
            call.side, call.symbol, call.entry
        ),
        None => println!("[!] No signal detected (unexpected)"),
    }

    println!("\n[*] Newest call as delivered:");
    println!("{}", serde_json::to_string_pretty(&delivery[0])?);

    Ok(())
}
