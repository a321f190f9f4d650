use crate::extract::sanitize_response;
use crate::loggers::loggerlocal::LoggerLocal;
use crate::markets::gemini::apicallgemini::{ApiCallGemini, GeminiError};
use std::sync::Arc;

/// Model used for grounded market-data prompts.
const PRO_MODEL: &str = "gemini-3-pro-preview";
/// Cheaper model used for news and sentiment prose.
const FLASH_MODEL: &str = "gemini-3-flash-preview";

/// Outcome of one AI-backed fetch.
///
/// The non-`Text` variants are the explicit sentinels of the error
/// design: callers branch on them, nothing is thrown past the fetch
/// boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Sanitized response text, ready for extraction.
    Text(String),
    /// No API key configured; no request was made.
    NoKey,
    /// Rate limited, either pre-empted by the cooldown or via a 429.
    RateLimited,
    /// Transient failure (transport, HTTP error, empty response).
    Failed,
}

impl FetchOutcome {
    /// The text, when the fetch produced one.
    pub fn into_text(self) -> Option<String> {
        match self {
            FetchOutcome::Text(t) => Some(t),
            _ => None,
        }
    }
}

/// The market feed contract the broadcast orchestrator runs against.
///
/// One implementation talks to Gemini; tests substitute canned feeds.
#[allow(async_fn_in_trait)]
pub trait MarketFeedSource {
    /// Live quotes for the tracked indices, as bracketed records.
    async fn live_indices(&self) -> FetchOutcome;
    /// Top gainers/losers of the day, as bracketed records.
    async fn top_movers(&self) -> FetchOutcome;
    /// Current prices for specific symbols, as `[SYMBOL: PRICE]` records.
    async fn batch_prices(&self, symbols: &[String]) -> FetchOutcome;
    /// Latest market news digest; placeholder prose on failure.
    async fn latest_news(&self) -> String;
    /// One-sentence sentiment summary of a news digest.
    async fn sentiment_insight(&self, news: &str) -> String;
}

/// Gemini-backed implementation of the market feed.
pub struct MarketFeed {
    api: Arc<ApiCallGemini>,
    logger: Arc<LoggerLocal>,
    /// Tracked index names, interpolated into the indices prompt.
    tracked_names: Vec<String>,
}

impl MarketFeed {
    pub fn new(
        api: Arc<ApiCallGemini>,
        logger: Arc<LoggerLocal>,
        tracked_names: Vec<String>,
    ) -> Self {
        Self {
            api,
            logger,
            tracked_names,
        }
    }

    /// Maps a generation result to the fetch sentinel, sanitizing on
    /// success.
    async fn outcome(&self, what: &str, result: Result<String, GeminiError>) -> FetchOutcome {
        match result {
            Ok(raw) => FetchOutcome::Text(sanitize_response(&raw)),
            Err(GeminiError::NoKey) => FetchOutcome::NoKey,
            Err(GeminiError::RateLimited) => FetchOutcome::RateLimited,
            Err(e) => {
                self.logger
                    .warn(&format!("{} fetch failed: {}", what, e), None)
                    .await;
                FetchOutcome::Failed
            }
        }
    }
}

impl MarketFeedSource for MarketFeed {
    async fn live_indices(&self) -> FetchOutcome {
        let result = self
            .api
            .generate(PRO_MODEL, &indices_prompt(&self.tracked_names), true)
            .await;
        self.outcome("live indices", result).await
    }

    async fn top_movers(&self) -> FetchOutcome {
        let result = self.api.generate(PRO_MODEL, MOVERS_PROMPT, true).await;
        self.outcome("top movers", result).await
    }

    async fn batch_prices(&self, symbols: &[String]) -> FetchOutcome {
        if symbols.is_empty() {
            return FetchOutcome::Failed;
        }
        let result = self
            .api
            .generate(PRO_MODEL, &batch_prices_prompt(symbols), true)
            .await;
        self.outcome("batch prices", result).await
    }

    async fn latest_news(&self) -> String {
        match self.api.generate(FLASH_MODEL, NEWS_PROMPT, true).await {
            Ok(raw) => sanitize_response(&raw),
            Err(GeminiError::NoKey) => "API key missing in deployment settings.".to_string(),
            Err(GeminiError::RateLimited) => {
                "System is cooling down (429). Please refresh in 60s.".to_string()
            }
            Err(e) => {
                self.logger
                    .warn(&format!("news fetch failed: {}", e), None)
                    .await;
                "Market news update temporarily unavailable.".to_string()
            }
        }
    }

    async fn sentiment_insight(&self, news: &str) -> String {
        if news.is_empty() {
            return "Analyzing market trends...".to_string();
        }
        // Plain generation, no grounding: the news digest is the input.
        match self
            .api
            .generate(FLASH_MODEL, &insight_prompt(news), false)
            .await
        {
            Ok(raw) => {
                let insight = sanitize_response(&raw);
                if insight.is_empty() {
                    "Market sentiment is stable.".to_string()
                } else {
                    insight
                }
            }
            Err(GeminiError::NoKey) | Err(GeminiError::RateLimited) => {
                "Analyzing market trends...".to_string()
            }
            Err(_) => "Market sentiment analysis paused.".to_string(),
        }
    }
}

fn indices_prompt(names: &[String]) -> String {
    format!(
        "Current live price and today's change for {} indices. \
         Format exactly like this for each: [NAME: NIFTY 50 | PRICE: 24850.25 | CHANGE: 110.50 | PERCENT: 0.45]. \
         IMPORTANT: Provide ONLY the data. Do NOT include any URLs, source links, website references, or citations.",
        names.join(", ")
    )
}

const MOVERS_PROMPT: &str = "List the top 5 Gainers and top 5 Losers in the Nifty 50 for today. \
     Format strictly as bracketed items: [SYMBOL: RELIANCE | PRICE: 2950.40 | PERCENT: 3.45 | TYPE: GAINER]. \
     Provide only these 10 items. No URLs or headers.";

fn batch_prices_prompt(symbols: &[String]) -> String {
    format!(
        "Fetch the current market price for these specific Indian stocks: {}. \
         Format strictly as a list of bracketed items: [SYMBOL: PRICE]. \
         Example output: [RELIANCE: 2950.40] [TCS: 3820.15] [NIFTY_AUG_FUT: 24500.00]. \
         DO NOT include any URLs, source links, or citations.",
        symbols.join(", ")
    )
}

const NEWS_PROMPT: &str = "Top 5 Indian financial market news headlines for today with brief \
     1-sentence summaries. Bullet points only. IMPORTANT: DO NOT include any URLs, source links, \
     website references, or citations. Provide only news content.";

fn insight_prompt(news: &str) -> String {
    format!(
        "Based on this news: {}, provide a 1-sentence market sentiment summary for an investor. \
         DO NOT include any URLs, citations, or source links.",
        news
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompts_carry_the_bracket_grammar() {
        let names = vec!["NIFTY 50".to_string(), "SENSEX".to_string()];
        let p = indices_prompt(&names);
        assert!(p.contains("NIFTY 50, SENSEX"));
        assert!(p.contains("[NAME: NIFTY 50 | PRICE: 24850.25 | CHANGE: 110.50 | PERCENT: 0.45]"));

        let b = batch_prices_prompt(&["RELIANCE".to_string(), "TCS".to_string()]);
        assert!(b.contains("RELIANCE, TCS"));
        assert!(b.contains("[SYMBOL: PRICE]"));

        assert!(MOVERS_PROMPT.contains("TYPE: GAINER"));
    }

    #[test]
    fn fetch_outcome_text_accessor() {
        assert_eq!(
            FetchOutcome::Text("x".to_string()).into_text(),
            Some("x".to_string())
        );
        assert_eq!(FetchOutcome::RateLimited.into_text(), None);
        assert_eq!(FetchOutcome::NoKey.into_text(), None);
        assert_eq!(FetchOutcome::Failed.into_text(), None);
    }
}
