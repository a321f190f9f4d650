//! # Domain Data Model
//!
//! Typed representations of everything the advisory terminal publishes:
//! research calls, market indices, top movers, the live market snapshot
//! and user profiles. All types serialize to the camelCase JSON shape the
//! downstream feed delivers to subscribers.

pub mod calls;
pub mod market;
pub mod user;

pub use calls::*;
pub use market::*;
pub use user::*;
