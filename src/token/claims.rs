// Copyright 2025 Contributors to the approovtoken project.
// SPDX-License-Identifier: Apache-2.0

use super::errors::Error;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::time::{SystemTime, UNIX_EPOCH};

/// State of the `pay` claim in a decoded Approov token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayClaim<'a> {
    /// The claim is not in the token at all.  The Approov failover service
    /// never emits it.
    Absent,
    /// The claim is present but null, not a string, empty or whitespace-only
    Empty,
    /// The base64-encoded SHA-256 of the bound header value
    Present(&'a str),
}

/// The claims-set of an Approov token that this crate cares about.  Any other
/// claim is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Expiry, in seconds since the UNIX epoch
    pub exp: u64,

    /// Token binding claim.  `None` means the claim was absent; a JSON `null`
    /// is kept as `Some(Value::Null)` so that it counts as empty.
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub pay: Option<Value>,
}

fn present<'de, D>(d: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(d).map(Some)
}

impl Claims {
    /// Claims-set expiring at the given UNIX time, without binding
    pub fn new(exp: u64) -> Self {
        Self { exp, pay: None }
    }

    /// Claims-set expiring `minutes` from now
    pub fn expiring_in(minutes: u64) -> Self {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();

        Self::new(now.saturating_add(minutes.saturating_mul(60)))
    }

    /// Set the `pay` claim to an already encoded digest
    pub fn with_pay(mut self, pay: impl Into<String>) -> Self {
        self.pay = Some(Value::String(pay.into()));
        self
    }

    /// Bind the claims-set to a header value, i.e., set `pay` to
    /// `base64(sha256(value))`
    pub fn bound_to(self, value: &str) -> Result<Self, Error> {
        let digest = crate::binding::digest(value)?;

        Ok(self.with_pay(digest))
    }

    pub fn pay_claim(&self) -> PayClaim<'_> {
        match &self.pay {
            None => PayClaim::Absent,
            Some(Value::String(s)) if !s.trim().is_empty() => PayClaim::Present(s.as_str()),
            Some(_) => PayClaim::Empty,
        }
    }
}
