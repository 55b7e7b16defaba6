//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into submit/list/get use-cases.
//! - Keep the endpoint layer decoupled from storage details.

pub mod feedback_service;
