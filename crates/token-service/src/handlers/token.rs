//! Credential issuance handler.

use crate::errors::{IssueError, TokenServiceError};
use crate::observability::record_token_issuance;
use crate::routes::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use common::types::{TokenRequest, TokenResponse};
use std::sync::Arc;
use std::time::Instant;
use tracing::instrument;

/// Handle a credential request.
///
/// POST /api/token
///
/// A malformed or non-JSON body is reported exactly like a body with missing
/// fields, so the client only ever sees the documented 400 shape.
#[instrument(name = "token.issue", skip_all, fields(status, status_code))]
pub async fn issue_token(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TokenRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, TokenServiceError> {
    let start = Instant::now();

    let result = match payload {
        Ok(Json(request)) => {
            tracing::info!(
                target: "token.handler",
                session_name = request.session_name.as_deref().unwrap_or(""),
                role_type = ?request.role_type,
                "Token generation request"
            );
            state.issuer.issue(
                request.session_name.as_deref(),
                request.user_identity.as_deref(),
                request.role_type,
            )
        }
        Err(rejection) => Err(IssueError::Validation(format!(
            "unreadable request body: {}",
            rejection.body_text()
        ))),
    };

    let duration = start.elapsed();
    match result {
        Ok(issued) => {
            let span = tracing::Span::current();
            span.record("status", "success");
            span.record("status_code", 200u16);
            record_token_issuance("success", None, duration);
            Ok(Json(TokenResponse {
                token: issued.token,
            }))
        }
        Err(err) => {
            let category = match &err {
                IssueError::Validation(_) => "validation",
                IssueError::Signing(_) => "signing",
            };
            let err = TokenServiceError::from(err);
            let span = tracing::Span::current();
            span.record("status", "error");
            span.record("status_code", err.status_code());
            record_token_issuance("error", Some(category), duration);
            Err(err)
        }
    }
}
