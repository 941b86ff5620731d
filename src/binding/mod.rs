// Copyright 2025 Contributors to the approovtoken project.
// SPDX-License-Identifier: Apache-2.0

//! Token binding checks.
//!
//! The mobile app binds its Approov token to an application credential (by
//! default the `Authorization` header) by asking the Approov SDK to add
//! `base64(sha256(credential))` to the token, as the `pay` claim.  On the API
//! side the same digest is recomputed from the request header and compared to
//! the claim.

pub use self::outcome::Outcome;

mod outcome;

use crate::token::{encode_base64, Claims, Error, PayClaim};
use axum::http::HeaderValue;
use openssl::hash::{Hasher, MessageDigest};

/// Default name of the header the Approov token is bound to
pub const DEFAULT_BINDING_HEADER: &str = "Authorization";

/// Compute `base64(sha256(utf8(value)))`, the expected content of the `pay`
/// claim for a token bound to `value`
pub fn digest(value: &str) -> Result<String, Error> {
    let mut hasher =
        Hasher::new(MessageDigest::sha256()).map_err(|e| Error::Hash(format!("{e:?}")))?;

    hasher
        .update(value.as_bytes())
        .map_err(|e| Error::Hash(format!("{e:?}")))?;

    let sum = hasher.finish().map_err(|e| Error::Hash(format!("{e:?}")))?;

    Ok(encode_base64(&sum))
}

/// Text of a binding header.  Returns `None` when the header is absent, is
/// not valid UTF-8, or is blank.
pub fn header_text(value: Option<&HeaderValue>) -> Option<&str> {
    value
        .and_then(|v| std::str::from_utf8(v.as_bytes()).ok())
        .filter(|s| !s.trim().is_empty())
}

/// Check the binding between a verified Approov token and the value of the
/// binding header.
///
/// A token without a `pay` claim passes when `allow_missing_claim` is set,
/// because the Approov failover service does not emit it; a token carrying
/// an empty `pay` claim never passes.
///
/// Fails only if the digest can't be computed.
pub fn validate(
    claims: &Claims,
    header: Option<&str>,
    allow_missing_claim: bool,
) -> Result<Outcome, Error> {
    let pay = match claims.pay_claim() {
        PayClaim::Absent if allow_missing_claim => return Ok(Outcome::Valid),
        PayClaim::Absent => return Ok(Outcome::BindingClaimMissing),
        PayClaim::Empty => return Ok(Outcome::BindingClaimEmpty),
        PayClaim::Present(pay) => pay,
    };

    let header = match header {
        Some(h) if !h.trim().is_empty() => h,
        _ => return Ok(Outcome::BindingHeaderMissing),
    };

    if digest(header)? != pay {
        return Ok(Outcome::BindingMismatch);
    }

    Ok(Outcome::Valid)
}
