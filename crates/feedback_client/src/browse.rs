//! Admin entry browser: list paging plus a single toggleable detail card.
//!
//! # Invariants
//! - At most one row is active, and it is the row whose detail is shown,
//!   being fetched, or failed to load.
//! - Detail responses for a row that is no longer active are dropped.
//! - Every list response clears the open detail.

use crate::pagination::page_controls;
use crate::render::{
    escape_html, render_detail, render_error, render_pagination, render_rows, render_unauthorized,
};
use feedback_core::endpoint::wire::{FIELD_ID, FIELD_PAGE, FIELD_PER_PAGE, FIELD_TOKEN};
use feedback_core::{
    DetailPayload, EndpointRequest, EndpointResponse, EntryId, EntrySummary, FeedbackEntry,
    ListPayload, Operation, PageBootstrap, UiStrings,
};
use log::{debug, warn};

/// Rows requested per page.
pub const LIST_PER_PAGE: u32 = 10;

/// What the list area currently shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ListState {
    /// Nothing loaded yet.
    #[default]
    Empty,
    Loaded {
        page: u64,
        per_page: u32,
        total: u64,
        rows: Vec<EntrySummary>,
    },
    Failed,
}

/// What the detail area currently shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DetailState {
    #[default]
    Closed,
    Loading(EntryId),
    Open(FeedbackEntry),
    Failed(EntryId),
}

/// Outcome of clicking a list row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowClick {
    /// The open row was clicked again; the detail is now closed.
    Closed,
    /// Send this request to fetch the clicked row.
    Fetch(EndpointRequest),
}

/// State machine behind the admin entry list.
#[derive(Debug, Clone)]
pub struct ListController {
    token: String,
    authorized: bool,
    strings: UiStrings,
    list: ListState,
    detail: DetailState,
    active: Option<EntryId>,
}

impl ListController {
    pub fn new(bootstrap: &PageBootstrap) -> Self {
        Self {
            token: bootstrap.browse_token.clone(),
            authorized: bootstrap.can_browse,
            strings: bootstrap.strings.clone(),
            list: ListState::Empty,
            detail: DetailState::Closed,
            active: None,
        }
    }

    pub fn list(&self) -> &ListState {
        &self.list
    }

    pub fn detail(&self) -> &DetailState {
        &self.detail
    }

    /// Row currently marked active, if any.
    pub fn active_row(&self) -> Option<EntryId> {
        self.active
    }

    /// Request for the first page, sent from the explicit load control.
    pub fn load(&self) -> Option<EndpointRequest> {
        self.go_to_page(1)
    }

    /// Request for page `page`.
    ///
    /// Returns `None` for callers without browse permission.
    pub fn go_to_page(&self, page: u64) -> Option<EndpointRequest> {
        if !self.authorized {
            return None;
        }
        Some(
            EndpointRequest::new(Operation::List)
                .with_field(FIELD_PAGE, page.max(1).to_string())
                .with_field(FIELD_PER_PAGE, LIST_PER_PAGE.to_string())
                .with_field(FIELD_TOKEN, self.token.as_str()),
        )
    }

    /// Applies a list response. The newest response always wins.
    pub fn apply_list_response(&mut self, response: &EndpointResponse) {
        self.close();

        let payload = response
            .is_success()
            .then(|| response.decode::<ListPayload>().ok())
            .flatten();
        self.list = match payload {
            Some(payload) => {
                debug!(
                    "event=list_render module=client status=ok page={} rows={}",
                    payload.page,
                    payload.rows.len()
                );
                ListState::Loaded {
                    page: payload.page,
                    per_page: payload.per_page,
                    total: payload.total,
                    rows: payload.rows,
                }
            }
            None => {
                warn!(
                    "event=list_render module=client status=error http_status={}",
                    response.status
                );
                ListState::Failed
            }
        };
    }

    /// Toggles the detail for row `id`.
    ///
    /// Closes when that row's detail is shown or loading; otherwise fetches,
    /// which also retries a row whose previous fetch failed.
    pub fn click_row(&mut self, id: EntryId) -> Option<RowClick> {
        if !self.authorized || id <= 0 {
            return None;
        }
        let showing = match &self.detail {
            DetailState::Open(entry) => entry.id == id,
            DetailState::Loading(loading) => *loading == id,
            DetailState::Closed | DetailState::Failed(_) => false,
        };
        if showing {
            self.close();
            return Some(RowClick::Closed);
        }

        self.active = Some(id);
        self.detail = DetailState::Loading(id);
        Some(RowClick::Fetch(
            EndpointRequest::new(Operation::Get)
                .with_field(FIELD_ID, id.to_string())
                .with_field(FIELD_TOKEN, self.token.as_str()),
        ))
    }

    /// Applies the detail response for row `id`.
    pub fn apply_detail_response(&mut self, id: EntryId, response: &EndpointResponse) {
        if self.active != Some(id) {
            debug!("event=detail_render module=client status=stale entry_id={id}");
            return;
        }

        let payload = response
            .is_success()
            .then(|| response.decode::<DetailPayload>().ok())
            .flatten();
        self.detail = match payload {
            Some(payload) => DetailState::Open(payload.row),
            None => {
                warn!(
                    "event=detail_render module=client status=error entry_id={id} http_status={}",
                    response.status
                );
                DetailState::Failed(id)
            }
        };
    }

    /// Closes the detail and clears the active marker.
    pub fn close(&mut self) {
        self.detail = DetailState::Closed;
        self.active = None;
    }

    /// Renders the list shell, or the unauthorized notice.
    pub fn render(&self) -> String {
        if !self.authorized {
            return render_unauthorized(&self.strings);
        }

        let (list_html, pagination_html) = match &self.list {
            ListState::Empty => (String::new(), String::new()),
            ListState::Loaded {
                page,
                per_page,
                total,
                rows,
            } => (
                render_rows(rows, self.active, &self.strings),
                render_pagination(&page_controls(*total, *page, *per_page)),
            ),
            ListState::Failed => (render_error(&self.strings), String::new()),
        };
        let detail_html = match &self.detail {
            DetailState::Closed | DetailState::Loading(_) => String::new(),
            DetailState::Open(entry) => render_detail(entry),
            DetailState::Failed(_) => render_error(&self.strings),
        };

        format!(
            concat!(
                r#"<div class="wpf-wrap" id="wpf-list-wrap">"#,
                r#"<h2 class="wpf-title">Feedback entries</h2>"#,
                r#"<button id="wpf-load" class="wpf-btn-outline">{load}</button>"#,
                r#"<div id="wpf-list" class="wpf-list" aria-live="polite">{list}</div>"#,
                r#"<div id="wpf-pagination" class="wpf-pagination" role="navigation" aria-label="Pagination">{pagination}</div>"#,
                r#"<hr class="wpf-sep" />"#,
                r#"<div id="wpf-detail" class="wpf-detail" aria-live="polite">{detail}</div>"#,
                "</div>"
            ),
            load = escape_html(&self.strings.load_entries),
            list = list_html,
            pagination = pagination_html,
            detail = detail_html,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{DetailState, ListController, ListState, RowClick};
    use feedback_core::{
        EndpointResponse, EntrySummary, ListPayload, PageBootstrap, SubmissionForm, UiStrings,
    };

    fn bootstrap(can_browse: bool) -> PageBootstrap {
        PageBootstrap {
            submit_token: "submit-token".to_string(),
            browse_token: "browse-token".to_string(),
            prefill: SubmissionForm::default(),
            can_browse,
            strings: UiStrings::default(),
        }
    }

    fn list_response(total: u64, page: u64, ids: &[i64]) -> EndpointResponse {
        EndpointResponse::success(&ListPayload {
            total,
            page,
            per_page: 10,
            rows: ids
                .iter()
                .map(|id| EntrySummary {
                    id: *id,
                    first_name: "Ada".to_string(),
                    last_name: "Lovelace".to_string(),
                    email: "ada@example.com".to_string(),
                    subject: format!("Subject {id}"),
                    created_at: 0,
                })
                .collect(),
        })
    }

    #[test]
    fn unauthorized_caller_gets_notice_and_no_requests() {
        let mut controller = ListController::new(&bootstrap(false));
        assert!(controller.load().is_none());
        assert!(controller.click_row(1).is_none());
        assert_eq!(
            controller.render(),
            r#"<div class="wpf-wrap"><p class="wpf-unauth">You are not authorized to view the content of this page.</p></div>"#
        );
    }

    #[test]
    fn load_requests_first_page_with_browse_token() {
        let controller = ListController::new(&bootstrap(true));
        let request = controller.load().expect("authorized load");
        assert_eq!(request.operation, "list");
        assert_eq!(request.field("page"), Some("1"));
        assert_eq!(request.field("per_page"), Some("10"));
        assert_eq!(request.field("_token"), Some("browse-token"));
    }

    #[test]
    fn list_response_replaces_rows_and_closes_detail() {
        let mut controller = ListController::new(&bootstrap(true));
        controller.apply_list_response(&list_response(25, 1, &[3, 2, 1]));
        assert!(matches!(controller.click_row(3), Some(RowClick::Fetch(_))));

        controller.apply_list_response(&list_response(25, 2, &[]));
        assert_eq!(controller.active_row(), None);
        assert_eq!(controller.detail(), &DetailState::Closed);
        assert!(matches!(
            controller.list(),
            ListState::Loaded { page: 2, rows, .. } if rows.is_empty()
        ));
        assert!(controller.render().contains("<p>No entries found.</p>"));
    }

    #[test]
    fn clicking_row_after_failed_detail_fetches_again() {
        let mut controller = ListController::new(&bootstrap(true));
        assert!(matches!(controller.click_row(5), Some(RowClick::Fetch(_))));
        let failure = EndpointResponse::failure_message(500, "Database error");
        controller.apply_detail_response(5, &failure);
        assert_eq!(controller.detail(), &DetailState::Failed(5));

        match controller.click_row(5) {
            Some(RowClick::Fetch(request)) => {
                assert_eq!(request.operation, "get");
                assert_eq!(request.field("id"), Some("5"));
            }
            other => panic!("expected a retry fetch, got {other:?}"),
        }
        assert_eq!(controller.detail(), &DetailState::Loading(5));
        assert_eq!(controller.active_row(), Some(5));
    }

    #[test]
    fn clicking_loading_row_closes_it() {
        let mut controller = ListController::new(&bootstrap(true));
        controller.click_row(3);
        assert_eq!(controller.click_row(3), Some(RowClick::Closed));
        assert_eq!(controller.active_row(), None);
        assert_eq!(controller.detail(), &DetailState::Closed);
    }

    #[test]
    fn failed_list_response_renders_generic_error() {
        let mut controller = ListController::new(&bootstrap(true));
        controller.apply_list_response(&EndpointResponse::failure_message(403, "Unauthorized"));
        assert_eq!(controller.list(), &ListState::Failed);
        assert!(controller
            .render()
            .contains("<p>An error occurred. Please try again.</p>"));
    }
}
