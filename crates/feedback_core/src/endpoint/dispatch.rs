//! Operation dispatch, authorization and outcome mapping.
//!
//! # Responsibility
//! - Route `submit` / `list` / `get` to the feedback service.
//! - Check anti-forgery tokens and capabilities before touching the store.
//! - Map every outcome to a status code and `{success, data}` envelope.
//!
//! # Invariants
//! - Authorization runs before input validation, so unauthorized callers
//!   learn nothing about their input or the stored rows.
//! - Store failures surface only a generic message; the cause is logged.

use crate::auth::capability::{CallerContext, Capability};
use crate::auth::nonce::{AntiForgery, NonceAction};
use crate::endpoint::wire::{
    parse_count, parse_entry_id, DetailPayload, EndpointRequest, EndpointResponse, ErrorsPayload,
    ListPayload, MessagePayload, Operation, FIELD_ID, FIELD_PAGE, FIELD_PER_PAGE, FIELD_TOKEN,
    MSG_INVALID_ID, MSG_NOT_FOUND, MSG_STORE_ERROR, MSG_THANKS, MSG_UNAUTHORIZED,
    MSG_UNKNOWN_OPERATION, STATUS_BAD_REQUEST, STATUS_FORBIDDEN, STATUS_INTERNAL_ERROR,
    STATUS_NOT_FOUND,
};
use crate::model::submission::{FormField, SubmissionForm};
use crate::repo::entry_repo::EntryRepository;
use crate::service::feedback_service::{FeedbackError, FeedbackService, PageRequest};
use log::warn;

/// Endpoint facade: one service plus the token authority.
pub struct FeedbackEndpoint<R: EntryRepository> {
    service: FeedbackService<R>,
    forgery: AntiForgery,
}

impl<R: EntryRepository> FeedbackEndpoint<R> {
    pub fn new(service: FeedbackService<R>, forgery: AntiForgery) -> Self {
        Self { service, forgery }
    }

    /// Token authority, shared with page bootstrap.
    pub fn forgery(&self) -> &AntiForgery {
        &self.forgery
    }

    /// Handles one request for `caller`.
    ///
    /// Never panics; every path yields a complete response.
    pub fn handle(&self, caller: &CallerContext, request: &EndpointRequest) -> EndpointResponse {
        let Some(operation) = Operation::parse(&request.operation) else {
            warn!(
                "event=endpoint_dispatch module=endpoint status=rejected error_code=unknown_operation"
            );
            return EndpointResponse::failure_message(STATUS_BAD_REQUEST, MSG_UNKNOWN_OPERATION);
        };

        let outcome = match operation {
            Operation::Submit => self.submit(caller, request),
            Operation::List => self.list(caller, request),
            Operation::Get => self.get(caller, request),
        };

        outcome.unwrap_or_else(|err| failure_response(operation, err))
    }

    fn submit(
        &self,
        caller: &CallerContext,
        request: &EndpointRequest,
    ) -> Result<EndpointResponse, FeedbackError> {
        self.authorize(caller, request, Operation::Submit, NonceAction::Submit, None)?;

        let mut form = SubmissionForm::default();
        for field in FormField::ALL {
            form.value_mut(field)
                .push_str(request.field_or_empty(field.name()));
        }

        self.service.submit(&form)?;
        Ok(EndpointResponse::success(&MessagePayload {
            message: MSG_THANKS.to_string(),
        }))
    }

    fn list(
        &self,
        caller: &CallerContext,
        request: &EndpointRequest,
    ) -> Result<EndpointResponse, FeedbackError> {
        self.authorize(
            caller,
            request,
            Operation::List,
            NonceAction::Browse,
            Some(Capability::ManageFeedback),
        )?;

        let page = self.service.list(PageRequest {
            page: parse_count(request.field(FIELD_PAGE)),
            per_page: parse_count(request.field(FIELD_PER_PAGE)),
        })?;

        Ok(EndpointResponse::success(&ListPayload {
            total: page.total,
            page: page.page,
            per_page: page.per_page,
            rows: page.rows,
        }))
    }

    fn get(
        &self,
        caller: &CallerContext,
        request: &EndpointRequest,
    ) -> Result<EndpointResponse, FeedbackError> {
        self.authorize(
            caller,
            request,
            Operation::Get,
            NonceAction::Browse,
            Some(Capability::ManageFeedback),
        )?;

        let id = parse_entry_id(request.field(FIELD_ID)).ok_or(FeedbackError::InvalidId)?;
        let row = self.service.get(id)?;
        Ok(EndpointResponse::success(&DetailPayload { row }))
    }

    fn authorize(
        &self,
        caller: &CallerContext,
        request: &EndpointRequest,
        operation: Operation,
        action: NonceAction,
        required: Option<Capability>,
    ) -> Result<(), FeedbackError> {
        if let Err(err) =
            self.forgery
                .verify(action, &caller.session, request.field_or_empty(FIELD_TOKEN))
        {
            warn!(
                "event=endpoint_auth module=endpoint status=denied operation={} reason=token error={}",
                operation.as_str(),
                err
            );
            return Err(FeedbackError::Unauthorized);
        }

        if let Some(capability) = required {
            if !caller.can(capability) {
                warn!(
                    "event=endpoint_auth module=endpoint status=denied operation={} reason=capability capability={}",
                    operation.as_str(),
                    capability.as_str()
                );
                return Err(FeedbackError::Unauthorized);
            }
        }

        Ok(())
    }
}

/// Maps a failed operation to its status code and envelope.
pub fn failure_response(operation: Operation, err: FeedbackError) -> EndpointResponse {
    match err {
        FeedbackError::Validation(errors) => {
            EndpointResponse::failure(STATUS_BAD_REQUEST, &ErrorsPayload { errors })
        }
        FeedbackError::Unauthorized => {
            EndpointResponse::failure_message(STATUS_FORBIDDEN, MSG_UNAUTHORIZED)
        }
        FeedbackError::InvalidId => {
            EndpointResponse::failure_message(STATUS_BAD_REQUEST, MSG_INVALID_ID)
        }
        FeedbackError::NotFound(_) => {
            EndpointResponse::failure_message(STATUS_NOT_FOUND, MSG_NOT_FOUND)
        }
        FeedbackError::Store(_) if operation == Operation::Submit => EndpointResponse::failure(
            STATUS_INTERNAL_ERROR,
            &ErrorsPayload {
                errors: vec![MSG_STORE_ERROR.to_string()],
            },
        ),
        FeedbackError::Store(_) => {
            EndpointResponse::failure_message(STATUS_INTERNAL_ERROR, MSG_STORE_ERROR)
        }
    }
}
