//! # Gemini Feed Live Test
//!
//! Exercises the live market feed end to end: indices, movers and news,
//! with extraction applied to the returned text. Requires GEMINI_API_KEY
//! in the environment; without it the sentinel paths are demonstrated
//! instead.

use lib_advisory::extract::{extract_index_quotes, extract_movers};
use lib_advisory::guard::CooldownGuard;
use lib_advisory::loggers::loggerlocal::{LoggerLocal, LoggerLocalOptions};
use lib_advisory::markets::gemini::{ApiCallGemini, FetchOutcome, MarketFeed, MarketFeedSource};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // // Statement: TTY-only logger so the run leaves no files behind
    let logger = Arc::new(LoggerLocal::new(
        "gemini_feed_test".to_string(),
        Some(LoggerLocalOptions {
            use_tty: Some(vec![6, 5, 4, 3]),
            use_file: None,
            log_dir: None,
        }),
    ));

    let api_key = std::env::var("GEMINI_API_KEY").ok();
    if api_key.is_none() {
        println!("[*] GEMINI_API_KEY not set; expecting NoKey sentinels.");
    }

    let api = Arc::new(ApiCallGemini::new(
        api_key,
        Arc::new(CooldownGuard::new()),
        Arc::clone(&logger),
    ));
    let feed = MarketFeed::new(
        api,
        logger,
        vec![
            "NIFTY 50".to_string(),
            "SENSEX".to_string(),
            "BANK NIFTY".to_string(),
        ],
    );

    println!("[*] Fetching live indices...");
    match feed.live_indices().await {
        FetchOutcome::Text(text) => {
            println!("--- raw ---\n{}\n-----------", text);
            for quote in extract_index_quotes(&text) {
                println!(
                    "[OK] {} = {} ({} / {}%)",
                    quote.name, quote.value, quote.change, quote.change_percent
                );
            }
        }
        other => println!("[!] indices outcome: {:?}", other),
    }

    println!("[*] Fetching top movers...");
    match feed.top_movers().await {
        FetchOutcome::Text(text) => {
            for mover in extract_movers(&text) {
                println!(
                    "[OK] {:?} {} @ {} ({}%)",
                    mover.kind, mover.symbol, mover.price, mover.change_percent
                );
            }
        }
        other => println!("[!] movers outcome: {:?}", other),
    }

    println!("[*] Fetching news and sentiment...");
    let news = feed.latest_news().await;
    println!("--- news ---\n{}\n------------", news);
    let insight = feed.sentiment_insight(&news).await;
    println!("[OK] insight: {}", insight);

    Ok(())
}
