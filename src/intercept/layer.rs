// Copyright 2025 Contributors to the approovtoken project.
// SPDX-License-Identifier: Apache-2.0

use super::{Chain, RequestContext, Verdict};
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::sync::Arc;

/// Axum middleware running an interceptor chain in front of the routes it is
/// layered on.  Attach via `axum::middleware::from_fn_with_state`.
pub async fn guard(State(chain): State<Arc<Chain>>, req: Request, next: Next) -> Response {
    let verdict = {
        let path = req
            .uri()
            .path_and_query()
            .map(|p| p.as_str())
            .unwrap_or("/");

        let mut ctx = RequestContext::new(req.method(), path, req.headers());
        chain.run(&mut ctx)
    };

    if let Verdict::Reject(status) = verdict {
        return reject(status);
    }

    next.run(req).await
}

/// Response to a rejected request: the status and an empty JSON object
pub fn reject(status: StatusCode) -> Response {
    (status, Json(json!({}))).into_response()
}
