//! Feedback form controller.
//!
//! # Invariants
//! - At most one submit is in flight; `begin_submit` refuses while submitting.
//! - A successful submit is terminal for the controller instance.
//! - Failures never clear the entered values.

use crate::render::{render_form, render_notice};
use feedback_core::endpoint::wire::{ErrorsPayload, FIELD_TOKEN, STATUS_BAD_REQUEST};
use feedback_core::{
    EndpointRequest, EndpointResponse, FormField, Operation, PageBootstrap, SubmissionForm,
    UiStrings,
};
use log::{debug, warn};

/// Submission lifecycle of one form instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormState {
    #[default]
    Idle,
    Submitting,
    Completed,
}

/// Feedback shown under (or instead of) the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormNotice {
    /// Thank-you notice that replaces the form.
    Thanks(String),
    /// Validation messages rendered as a bulleted list.
    Errors(Vec<String>),
    /// Single generic failure message.
    Error(String),
}

/// State machine behind the public feedback form.
#[derive(Debug, Clone)]
pub struct FormController {
    values: SubmissionForm,
    state: FormState,
    notice: Option<FormNotice>,
    token: String,
    strings: UiStrings,
}

impl FormController {
    /// Creates an idle form prefilled from the page bootstrap.
    pub fn new(bootstrap: &PageBootstrap) -> Self {
        Self {
            values: bootstrap.prefill.clone(),
            state: FormState::Idle,
            notice: None,
            token: bootstrap.submit_token.clone(),
            strings: bootstrap.strings.clone(),
        }
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn notice(&self) -> Option<&FormNotice> {
        self.notice.as_ref()
    }

    pub fn values(&self) -> &SubmissionForm {
        &self.values
    }

    /// Whether the submit control accepts clicks.
    pub fn submit_enabled(&self) -> bool {
        self.state == FormState::Idle
    }

    /// Updates one field. Ignored unless the form is idle.
    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) {
        if self.state != FormState::Idle {
            return;
        }
        *self.values.value_mut(field) = value.into();
    }

    /// Starts a submit and returns the request to send.
    ///
    /// Returns `None` while a submit is in flight or after success.
    pub fn begin_submit(&mut self) -> Option<EndpointRequest> {
        if self.state != FormState::Idle {
            debug!(
                "event=form_submit module=client status=skipped state={:?}",
                self.state
            );
            return None;
        }

        self.state = FormState::Submitting;
        self.notice = None;

        let request = FormField::ALL.into_iter().fold(
            EndpointRequest::new(Operation::Submit),
            |request, field| request.with_field(field.name(), self.values.value(field)),
        );
        Some(request.with_field(FIELD_TOKEN, self.token.as_str()))
    }

    /// Applies the submit response.
    ///
    /// Responses arriving when no submit is in flight are ignored.
    pub fn finish_submit(&mut self, response: &EndpointResponse) {
        if self.state != FormState::Submitting {
            debug!("event=form_submit module=client status=stale_response");
            return;
        }

        if response.is_success() {
            self.state = FormState::Completed;
            self.notice = Some(FormNotice::Thanks(self.strings.thanks.clone()));
            debug!("event=form_submit module=client status=ok");
            return;
        }

        self.state = FormState::Idle;
        let validation = (response.status == STATUS_BAD_REQUEST)
            .then(|| response.decode::<ErrorsPayload>().ok())
            .flatten();
        self.notice = Some(match validation {
            Some(payload) => FormNotice::Errors(payload.errors),
            None => FormNotice::Error(self.strings.error.clone()),
        });
        warn!(
            "event=form_submit module=client status=error http_status={}",
            response.status
        );
    }

    /// Renders the form (or the thank-you notice once completed).
    pub fn render(&self) -> String {
        match (&self.state, &self.notice) {
            (FormState::Completed, Some(notice)) => render_notice(notice),
            _ => {
                let mut html = render_form(&self.values, self.submit_enabled());
                html.push_str(r#"<div id="wpf-response" class="wpf-response" aria-live="polite">"#);
                if let Some(notice) = &self.notice {
                    html.push_str(&render_notice(notice));
                }
                html.push_str("</div>");
                html
            }
        }
    }
}
