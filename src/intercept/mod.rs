// Copyright 2025 Contributors to the approovtoken project.
// SPDX-License-Identifier: Apache-2.0

//! Request interceptors.
//!
//! The Approov checks run as an ordered [`Chain`] of [`Interceptor`]s in
//! front of the protected endpoints.  Each interceptor inspects (and
//! annotates) a [`RequestContext`] and returns a [`Verdict`]; the chain stops
//! at the first [`Verdict::Reject`].  [`guard`] mounts a chain as axum
//! middleware.

pub use self::binding::BindingCheck;
pub use self::layer::{guard, reject};
pub use self::token::TokenCheck;

mod binding;
mod layer;
mod token;

use crate::binding::Outcome;
use crate::policy::Policy;
use crate::token::Claims;
use axum::http::{HeaderMap, Method, StatusCode};
use std::fmt::Display;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Hand the request over to the next interceptor, or to the endpoint
    Continue,
    /// Stop here and answer with this status and an empty JSON object
    Reject(StatusCode),
}

/// What interceptors know about the request being processed
#[derive(Debug)]
pub struct RequestContext<'a> {
    pub method: &'a Method,
    /// Path and query of the request
    pub path: &'a str,
    pub headers: &'a HeaderMap,
    /// Claims of the Approov token, once verified
    pub claims: Option<Claims>,
    /// Set when the Approov token was missing or failed verification
    pub token_failed: bool,
    /// Result of the last Approov check run on the request
    pub outcome: Option<Outcome>,
}

impl<'a> RequestContext<'a> {
    pub fn new(method: &'a Method, path: &'a str, headers: &'a HeaderMap) -> Self {
        Self {
            method,
            path,
            headers,
            claims: None,
            token_failed: false,
            outcome: None,
        }
    }

    /// `<status> <METHOD> <path>`, the prefix of every Approov log line
    pub fn log_prefix(&self, status: StatusCode) -> String {
        format!("{} {} {}", status.as_u16(), self.method, self.path)
    }
}

pub trait Interceptor: Send + Sync {
    /// Short name, used in logs
    fn name(&self) -> &'static str;

    fn intercept(&self, ctx: &mut RequestContext<'_>) -> Verdict;
}

/// Ordered list of interceptors
#[derive(Clone, Default)]
pub struct Chain {
    interceptors: Vec<Arc<dyn Interceptor>>,
}

impl Chain {
    /// Append an interceptor to the end of the chain
    pub fn with(mut self, interceptor: impl Interceptor + 'static) -> Self {
        self.interceptors.push(Arc::new(interceptor));
        self
    }

    /// Run the interceptors in order, stopping at the first rejection
    pub fn run(&self, ctx: &mut RequestContext<'_>) -> Verdict {
        for i in self.interceptors.iter() {
            if let Verdict::Reject(status) = i.intercept(ctx) {
                debug!("{} rejected by {}", ctx.log_prefix(status), i.name());
                return Verdict::Reject(status);
            }
        }

        Verdict::Continue
    }
}

fn log_approov(
    policy: &Policy,
    ctx: &RequestContext<'_>,
    status: StatusCode,
    message: impl Display,
) {
    if !policy.logging_enabled {
        return;
    }

    if status.is_success() {
        info!("{} {}", ctx.log_prefix(status), message);
    } else {
        warn!("{} {}", ctx.log_prefix(status), message);
    }
}
