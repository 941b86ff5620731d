// Copyright 2025 Contributors to the approovtoken project.
// SPDX-License-Identifier: Apache-2.0

use super::{log_approov, Interceptor, RequestContext, Verdict};
use crate::binding::{self, Outcome};
use crate::policy::Policy;
use crate::token;
use axum::http::{HeaderName, StatusCode};
use tracing::{debug, error};

/// Checks that the `pay` claim of the (already verified) Approov token
/// matches the binding header of the request.  Must come after a
/// [`super::TokenCheck`] in the chain: requests whose token failed
/// verification are passed through untouched.
pub struct BindingCheck {
    header: HeaderName,
    policy: Policy,
}

impl BindingCheck {
    pub fn new(header: HeaderName, policy: Policy) -> Self {
        Self { header, policy }
    }
}

impl BindingCheck {
    /// The digest of the binding header couldn't be computed.  The request is
    /// rejected with a 500 unless the binding check is observe-only.
    fn digest_failed(&self, ctx: &RequestContext<'_>, e: &token::Error) -> Verdict {
        let abort = self.policy.abort_on_invalid_binding;
        let status = if abort {
            StatusCode::INTERNAL_SERVER_ERROR
        } else {
            StatusCode::OK
        };

        error!("{} APPROOV TOKEN BINDING ERROR: {e}", ctx.log_prefix(status));

        if abort {
            return Verdict::Reject(status);
        }

        log_approov(
            &self.policy,
            ctx,
            status,
            "ACCEPTED REQUEST WITH INVALID APPROOV TOKEN BINDING",
        );

        Verdict::Continue
    }
}

impl Interceptor for BindingCheck {
    fn name(&self) -> &'static str {
        "approov-token-binding"
    }

    fn intercept(&self, ctx: &mut RequestContext<'_>) -> Verdict {
        if ctx.token_failed {
            return Verdict::Continue;
        }

        let claims = match ctx.claims.as_ref() {
            Some(c) => c,
            None => {
                debug!(
                    "{} no verified Approov token, skipping token binding check",
                    ctx.log_prefix(StatusCode::OK)
                );
                return Verdict::Continue;
            }
        };

        let header = binding::header_text(ctx.headers.get(&self.header));

        let outcome =
            match binding::validate(claims, header, self.policy.allow_missing_binding_claim) {
                Ok(o) => o,
                Err(e) => return self.digest_failed(ctx, &e),
            };

        ctx.outcome = Some(outcome);

        if outcome.is_valid() {
            log_approov(
                &self.policy,
                ctx,
                StatusCode::OK,
                "ACCEPTED REQUEST WITH VALID APPROOV TOKEN BINDING",
            );

            return Verdict::Continue;
        }

        let abort = self.policy.abort_on_invalid_binding;
        let status = if abort {
            outcome.status()
        } else {
            StatusCode::OK
        };

        log_approov(
            &self.policy,
            ctx,
            status,
            format!("APPROOV TOKEN BINDING ERROR: {outcome}"),
        );

        if abort {
            log_approov(
                &self.policy,
                ctx,
                status,
                "REJECTED REQUEST WITH INVALID APPROOV TOKEN BINDING",
            );

            return Verdict::Reject(status);
        }

        log_approov(
            &self.policy,
            ctx,
            status,
            "ACCEPTED REQUEST WITH INVALID APPROOV TOKEN BINDING",
        );

        Verdict::Continue
    }
}
