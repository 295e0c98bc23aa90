//! Decide whether an inbound message escalates to the agentic tool.
//!
//! Matching precedence:
//! 1. Direct patterns — small talk and trivial queries, always handled
//!    by the conversational path, never the tool.
//! 2. Agent patterns — file, code, search, and run-style requests.
//! 3. Configured default (direct unless `default_to_agent` is set).

pub mod error;
pub mod router;

pub use {
    error::{Error, Result},
    router::{RouteDecision, Router},
};
