//! Per-page bootstrap handed to the client controller.

use crate::auth::capability::{CallerContext, Capability};
use crate::auth::nonce::{AntiForgery, NonceAction};
use crate::model::submission::SubmissionForm;
use serde::{Deserialize, Serialize};

/// User-facing strings the client needs before any request completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiStrings {
    pub thanks: String,
    pub unauthorized: String,
    pub load_entries: String,
    pub no_entries: String,
    pub error: String,
}

impl Default for UiStrings {
    fn default() -> Self {
        Self {
            thanks: "Thank you for sending us your feedback".to_string(),
            unauthorized: "You are not authorized to view the content of this page.".to_string(),
            load_entries: "Load entries".to_string(),
            no_entries: "No entries found.".to_string(),
            error: "An error occurred. Please try again.".to_string(),
        }
    }
}

/// Everything a rendered page embeds for the client controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageBootstrap {
    /// Token for the `submit` operation.
    pub submit_token: String,
    /// Token for `list` and `get`.
    pub browse_token: String,
    /// Form values for a logged-in caller; empty fields otherwise.
    pub prefill: SubmissionForm,
    /// Whether the caller may see the entry list at all.
    pub can_browse: bool,
    pub strings: UiStrings,
}

/// Builds the bootstrap for `caller`.
///
/// Only name and email are prefilled; subject and message always start empty.
pub fn bootstrap_page(caller: &CallerContext, forgery: &AntiForgery) -> PageBootstrap {
    let prefill = caller
        .profile
        .as_ref()
        .map(|profile| SubmissionForm {
            first_name: profile.first_name.clone(),
            last_name: profile.last_name.clone(),
            email: profile.email.clone(),
            ..SubmissionForm::default()
        })
        .unwrap_or_default();

    PageBootstrap {
        submit_token: forgery.issue(NonceAction::Submit, &caller.session),
        browse_token: forgery.issue(NonceAction::Browse, &caller.session),
        prefill,
        can_browse: caller.can(Capability::ManageFeedback),
        strings: UiStrings::default(),
    }
}
