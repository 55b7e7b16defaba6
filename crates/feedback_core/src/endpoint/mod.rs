//! Generic feedback endpoint keyed by operation name.
//!
//! # Responsibility
//! - Define the request/response wire shapes shared with the client.
//! - Authorize, dispatch and map outcomes to `{success, data}` envelopes.
//! - Produce the per-page bootstrap (tokens, prefill, UI strings).
//!
//! # Invariants
//! - Every response carries `success` and an HTTP-style status code.
//! - Failure envelopes never include row data.
//! - Values are returned unescaped; rendering surfaces must escape them.

pub mod bootstrap;
pub mod dispatch;
pub mod wire;
