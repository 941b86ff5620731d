// Copyright 2025 Contributors to the approovtoken project.
// SPDX-License-Identifier: Apache-2.0

use approovtoken::config::{ApproovConfig, Config, ServerConfig};
use approovtoken::policy::Policy;
use approovtoken::server::handlers::{FORMS, SHAPES};
use approovtoken::server::router;
use approovtoken::token::{Claims, Issuer, APPROOV_TOKEN_HEADER};
use axum::body::Body;
use axum::http::header::AUTHORIZATION;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

// base64("secret")
const BASE64_SECRET: &str = "c2VjcmV0";
const SECRET: &[u8] = b"secret";
// base64(sha256("secret123"))
const SECRET123_PAY: &str = "/PcwttlSNuzTyfwtkte2srsGFRSWGuwEHWx6cZL1kuQ=";

fn app(policy: Policy) -> Router {
    let approov = ApproovConfig::new(Some(BASE64_SECRET), "Authorization", policy)
        .expect("valid Approov config");

    let config = Config {
        server: ServerConfig::default(),
        approov,
    };

    router(&config).expect("router")
}

fn token(claims: &Claims) -> String {
    Issuer::new(SECRET).issue(claims).expect("signing token")
}

fn bound_token() -> String {
    token(&Claims::expiring_in(5).with_pay(SECRET123_PAY))
}

async fn get(
    app: Router,
    path: &str,
    approov_token: Option<&str>,
    authorization: Option<&str>,
) -> (StatusCode, Value) {
    let mut req = Request::builder().method("GET").uri(path);

    if let Some(t) = approov_token {
        req = req.header(APPROOV_TOKEN_HEADER, t);
    }

    if let Some(a) = authorization {
        req = req.header(AUTHORIZATION, a);
    }

    let res = app
        .oneshot(req.body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = res.status();
    let body = res.into_body().collect().await.unwrap().to_bytes();

    (status, serde_json::from_slice(&body).unwrap())
}

fn is_shape(v: &Value) -> bool {
    v["shape"].as_str().is_some_and(|s| SHAPES.contains(&s))
}

fn is_form(v: &Value) -> bool {
    v["form"].as_str().is_some_and(|s| FORMS.contains(&s))
}

#[tokio::test]
async fn index_links_to_protected_endpoints() {
    let (status, body) = get(app(Policy::default()), "/", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "hello": "http://localhost/v2/hello",
            "shapes": "http://localhost/v2/shapes",
            "forms": "http://localhost/v2/forms",
        })
    );
}

#[tokio::test]
async fn unprotected_endpoints_need_no_token() {
    let (status, body) = get(app(Policy::default()), "/v1/hello", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "text": "Hello, World!" }));

    let (status, body) = get(app(Policy::default()), "/v2/hello", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "text": "Hello, World!" }));

    let (status, body) = get(app(Policy::default()), "/v1/shapes", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(is_shape(&body));

    let (status, body) = get(app(Policy::default()), "/v1/forms", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(is_form(&body));
}

#[tokio::test]
async fn shapes_with_valid_token() {
    let t = token(&Claims::expiring_in(5));

    let (status, body) = get(app(Policy::default()), "/v2/shapes", Some(&t), None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(is_shape(&body));
}

#[tokio::test]
async fn shapes_without_token() {
    let (status, body) = get(app(Policy::default()), "/v2/shapes", None, None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({}));
}

#[tokio::test]
async fn shapes_with_invalid_token() {
    let expired = token(&Claims::new(1_000));
    let forged = Issuer::new(b"not-the-secret")
        .issue(&Claims::expiring_in(5))
        .unwrap();

    for t in [expired.as_str(), forged.as_str(), "garbage"] {
        let (status, body) = get(app(Policy::default()), "/v2/shapes", Some(t), None).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED, "{t}");
        assert_eq!(body, json!({}));
    }
}

#[tokio::test]
async fn shapes_fail_open_on_invalid_token() {
    let (status, body) = get(app(Policy::observe_only()), "/v2/shapes", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(is_shape(&body));

    let (status, body) =
        get(app(Policy::observe_only()), "/v2/shapes", Some("garbage"), None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(is_shape(&body));
}

#[tokio::test]
async fn forms_with_valid_binding() {
    let t = bound_token();

    let (status, body) = get(
        app(Policy::default()),
        "/v2/forms",
        Some(&t),
        Some("secret123"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(is_form(&body));
}

#[tokio::test]
async fn forms_with_mismatched_binding() {
    let t = bound_token();

    let (status, body) =
        get(app(Policy::default()), "/v2/forms", Some(&t), Some("wrong")).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({}));
}

#[tokio::test]
async fn forms_fail_open_on_mismatched_binding() {
    let policy = Policy {
        abort_on_invalid_binding: false,
        ..Default::default()
    };
    let t = bound_token();

    let (status, body) = get(app(policy), "/v2/forms", Some(&t), Some("wrong")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(is_form(&body));
}

#[tokio::test]
async fn forms_without_binding_header() {
    let t = bound_token();

    let (status, body) = get(app(Policy::default()), "/v2/forms", Some(&t), None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({}));

    let (status, _) = get(app(Policy::default()), "/v2/forms", Some(&t), Some("  ")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn forms_with_empty_binding_claim() {
    let t = token(&Claims::expiring_in(5).with_pay(""));

    let (status, body) = get(
        app(Policy::default()),
        "/v2/forms",
        Some(&t),
        Some("secret123"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({}));
}

#[tokio::test]
async fn forms_with_absent_binding_claim() {
    let t = token(&Claims::expiring_in(5));

    let (status, body) = get(app(Policy::default()), "/v2/forms", Some(&t), None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(is_form(&body));

    let strict = Policy {
        allow_missing_binding_claim: false,
        ..Default::default()
    };

    let (status, body) = get(app(strict), "/v2/forms", Some(&t), Some("secret123")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({}));
}

#[tokio::test]
async fn forms_skip_binding_when_token_failed() {
    // the token check lets the request through, the binding check must not
    // evaluate a token that failed verification
    let policy = Policy {
        abort_on_invalid_token: false,
        abort_on_invalid_binding: true,
        ..Default::default()
    };

    let (status, body) = get(app(policy), "/v2/forms", Some("garbage"), Some("wrong")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(is_form(&body));
}

#[tokio::test]
async fn forms_reject_invalid_token_before_binding() {
    let (status, body) =
        get(app(Policy::default()), "/v2/forms", None, Some("secret123")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({}));
}

#[tokio::test]
async fn repeated_requests_get_the_same_answer() {
    let app = app(Policy::default());
    let t = bound_token();

    for _ in 0..5 {
        let (status, _) = get(app.clone(), "/v2/forms", Some(&t), Some("wrong")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = get(app.clone(), "/v2/forms", Some(&t), Some("secret123")).await;
        assert_eq!(status, StatusCode::OK);
    }
}

#[tokio::test]
async fn cors_is_permissive() {
    let req = Request::builder()
        .method("GET")
        .uri("/v1/hello")
        .header("Origin", "https://example.com")
        .body(Body::empty())
        .unwrap();

    let res = app(Policy::default()).oneshot(req).await.unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}
