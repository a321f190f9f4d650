//! # Gemini Market Feed
//!
//! The single AI collaborator behind every market fetch: "generate text
//! for prompt P, optionally with live-web grounding". The client keeps
//! the request/response handling and 429 classification; the feed on top
//! owns the prompt texts, sanitization and sentinel mapping.
//!
//! The prompt texts are part of the contract: they dictate the bracket
//! grammar the extraction layer parses.

pub mod apicallgemini;
pub mod feed;

pub use apicallgemini::{ApiCallGemini, GeminiError};
pub use feed::{FetchOutcome, MarketFeed, MarketFeedSource};
