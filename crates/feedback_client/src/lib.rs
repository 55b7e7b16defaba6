//! Client-side controller for the feedback form and the admin entry browser.
//!
//! The controllers are pure state machines: they build [`EndpointRequest`]s,
//! accept [`EndpointResponse`]s and render escaped HTML fragments. Transport
//! belongs to the host.
//!
//! [`EndpointRequest`]: feedback_core::EndpointRequest
//! [`EndpointResponse`]: feedback_core::EndpointResponse

pub mod browse;
pub mod form;
pub mod pagination;
pub mod render;

pub use browse::{DetailState, ListController, ListState, RowClick, LIST_PER_PAGE};
pub use form::{FormController, FormNotice, FormState};
pub use pagination::{page_controls, PageControl};
pub use render::{escape_html, format_timestamp};
