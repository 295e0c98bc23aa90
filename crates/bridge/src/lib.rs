//! Session-aware bridge to an external agentic coding tool.
//!
//! Translates routed chat requests into bounded subprocess invocations of
//! the tool, tracks per-user session tokens for conversational continuity,
//! and converts every failure into a result value — the bridge sits between
//! an interactive channel and a powerful tool and must never crash its host
//! on a bad or hostile request.
//!
//! Prompt sanitization here is best-effort flag stripping, a defense-in-depth
//! layer and nothing more. Structural separation of trusted instructions from
//! untrusted user content can only happen at the tool's own interface, which
//! this bridge cannot guarantee from the outside.

pub mod bridge;
pub mod capability;
pub mod error;
pub mod exec;
pub mod invocation;
pub mod result;
pub mod sanitize;
pub mod session;

pub use {
    bridge::Bridge,
    capability::{Capability, DEFAULT_CAPABILITIES, SAFE_CAPABILITIES},
    error::{Error, Result},
    invocation::ExecuteOptions,
    result::InvocationResult,
    session::Session,
};
