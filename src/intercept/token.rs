// Copyright 2025 Contributors to the approovtoken project.
// SPDX-License-Identifier: Apache-2.0

use super::{log_approov, Interceptor, RequestContext, Verdict};
use crate::binding::Outcome;
use crate::policy::Policy;
use crate::token::{Verifier, APPROOV_TOKEN_HEADER};
use axum::http::StatusCode;
use std::sync::Arc;

/// Verifies the Approov token of the request and makes its claims available
/// to the interceptors that follow
pub struct TokenCheck {
    verifier: Arc<Verifier>,
    policy: Policy,
}

impl TokenCheck {
    pub fn new(verifier: Arc<Verifier>, policy: Policy) -> Self {
        Self { verifier, policy }
    }
}

impl Interceptor for TokenCheck {
    fn name(&self) -> &'static str {
        "approov-token"
    }

    fn intercept(&self, ctx: &mut RequestContext<'_>) -> Verdict {
        let res = self
            .verifier
            .verify_header(ctx.headers.get(APPROOV_TOKEN_HEADER));

        let e = match res {
            Ok(claims) => {
                ctx.claims = Some(claims);
                ctx.outcome = Some(Outcome::Valid);

                log_approov(
                    &self.policy,
                    ctx,
                    StatusCode::OK,
                    "ACCEPTED REQUEST WITH VALID APPROOV TOKEN",
                );

                return Verdict::Continue;
            }
            Err(e) => e,
        };

        let outcome = Outcome::from(&e);

        ctx.token_failed = true;
        ctx.outcome = Some(outcome);

        let abort = self.policy.abort_on_invalid_token;
        let status = if abort {
            outcome.status()
        } else {
            StatusCode::OK
        };

        log_approov(&self.policy, ctx, status, format!("APPROOV TOKEN: {e}"));

        if abort {
            log_approov(
                &self.policy,
                ctx,
                status,
                "REJECTED REQUEST WITH INVALID APPROOV TOKEN",
            );

            return Verdict::Reject(status);
        }

        log_approov(
            &self.policy,
            ctx,
            status,
            "ACCEPTED REQUEST WITH INVALID APPROOV TOKEN",
        );

        Verdict::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intercept::tests::captured;
    use crate::token::{Claims, Issuer};
    use axum::http::{HeaderMap, HeaderValue, Method};

    const SECRET: &[u8] = b"secret";

    fn check(policy: Policy) -> TokenCheck {
        TokenCheck::new(Arc::new(Verifier::from_secret(SECRET)), policy)
    }

    fn headers_with_token(token: &str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(APPROOV_TOKEN_HEADER, HeaderValue::from_str(token).unwrap());
        h
    }

    #[test]
    fn valid_token_sets_claims() {
        let claims = Claims::expiring_in(5).with_pay("abc=");
        let t = Issuer::new(SECRET).issue(&claims).unwrap();
        let headers = headers_with_token(&t);
        let mut ctx = RequestContext::new(&Method::GET, "/v2/shapes", &headers);

        let v = check(Policy::default()).intercept(&mut ctx);

        assert_eq!(v, Verdict::Continue);
        assert_eq!(ctx.claims, Some(claims));
        assert!(!ctx.token_failed);
        assert_eq!(ctx.outcome, Some(Outcome::Valid));
    }

    #[test]
    fn missing_token_is_bad_request() {
        let headers = HeaderMap::new();
        let mut ctx = RequestContext::new(&Method::GET, "/v2/shapes", &headers);

        let v = check(Policy::default()).intercept(&mut ctx);

        assert_eq!(v, Verdict::Reject(StatusCode::BAD_REQUEST));
        assert!(ctx.token_failed);
        assert_eq!(ctx.outcome, Some(Outcome::TokenMissing));
    }

    #[test]
    fn invalid_token_is_unauthorized() {
        let t = Issuer::new(b"other").issue(&Claims::expiring_in(5)).unwrap();
        let headers = headers_with_token(&t);
        let mut ctx = RequestContext::new(&Method::GET, "/v2/shapes", &headers);

        let v = check(Policy::default()).intercept(&mut ctx);

        assert_eq!(v, Verdict::Reject(StatusCode::UNAUTHORIZED));
        assert!(ctx.claims.is_none());
        assert_eq!(ctx.outcome, Some(Outcome::TokenInvalid));
    }

    #[test]
    fn invalid_token_continues_when_not_aborting() {
        let headers = headers_with_token("garbage");
        let mut ctx = RequestContext::new(&Method::GET, "/v2/shapes", &headers);

        let v = check(Policy::observe_only()).intercept(&mut ctx);

        assert_eq!(v, Verdict::Continue);
        assert!(ctx.token_failed);
        assert!(ctx.claims.is_none());
    }

    #[test]
    fn missing_token_is_logged() {
        let headers = HeaderMap::new();
        let mut ctx = RequestContext::new(&Method::GET, "/v2/shapes", &headers);

        let logs = captured(|| {
            check(Policy::default()).intercept(&mut ctx);
        });

        assert!(logs.contains(
            "400 GET /v2/shapes APPROOV TOKEN: token empty or missing in the header of the request"
        ));
        assert!(logs.contains("400 GET /v2/shapes REJECTED REQUEST WITH INVALID APPROOV TOKEN"));
    }

    #[test]
    fn accepted_invalid_token_is_logged_as_ok() {
        let headers = headers_with_token("garbage");
        let mut ctx = RequestContext::new(&Method::GET, "/v2/shapes", &headers);

        let logs = captured(|| {
            check(Policy::observe_only()).intercept(&mut ctx);
        });

        assert!(logs.contains("200 GET /v2/shapes APPROOV TOKEN: "));
        assert!(logs.contains("200 GET /v2/shapes ACCEPTED REQUEST WITH INVALID APPROOV TOKEN"));
    }

    #[test]
    fn nothing_logged_when_logging_disabled() {
        let policy = Policy {
            logging_enabled: false,
            ..Default::default()
        };
        let headers = HeaderMap::new();
        let mut ctx = RequestContext::new(&Method::GET, "/v2/shapes", &headers);

        let logs = captured(|| {
            check(policy).intercept(&mut ctx);
        });

        assert!(logs.is_empty(), "{logs}");
    }
}
