//! # Document Store
//!
//! The single source of truth for the call collection, the market
//! snapshot singleton and user profiles. Connected clients hold
//! read-through copies refreshed by subscription push; every delivery is
//! a full replacement of the document, never a diff.
//!
//! An optional Redis write-through persists store state so a restarted
//! service resumes from the last published book.

pub mod cache_redis;
pub mod docstore;

pub use cache_redis::CacheHandler;
pub use docstore::{DocStore, StoreError, SyncState};
