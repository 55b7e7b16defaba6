//! Caller authorization for the feedback endpoint.
//!
//! The host owns authentication and sessions. Core only receives a
//! [`CallerContext`] describing the session and the capabilities already
//! granted, and checks operation-scoped anti-forgery tokens against it.

pub mod capability;
pub mod nonce;
