// Copyright 2025 Contributors to the approovtoken project.
// SPDX-License-Identifier: Apache-2.0

use crate::token;
use axum::http::StatusCode;
use std::fmt;

/// Result of checking an Approov token and its binding on a single request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    TokenMissing,
    TokenInvalid,
    BindingClaimMissing,
    BindingClaimEmpty,
    BindingHeaderMissing,
    BindingMismatch,
    Valid,
}

impl Outcome {
    pub fn is_valid(&self) -> bool {
        *self == Outcome::Valid
    }

    /// HTTP status used when the request is rejected because of this outcome
    pub fn status(&self) -> StatusCode {
        match self {
            Outcome::Valid => StatusCode::OK,
            Outcome::TokenMissing
            | Outcome::BindingClaimMissing
            | Outcome::BindingClaimEmpty
            | Outcome::BindingHeaderMissing => StatusCode::BAD_REQUEST,
            Outcome::TokenInvalid | Outcome::BindingMismatch => StatusCode::UNAUTHORIZED,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Outcome::TokenMissing => "token empty or missing in the header of the request.",
            Outcome::TokenInvalid => "token failed signature or expiry verification.",
            Outcome::BindingClaimMissing => {
                "key 'pay' is missing in the claims of the Approov token payload."
            }
            Outcome::BindingClaimEmpty => "key 'pay' in the decoded token is empty.",
            Outcome::BindingHeaderMissing => {
                "Missing or empty header to perform the verification for the token binding."
            }
            Outcome::BindingMismatch => {
                "token binding in header doesn't match with the key 'pay' in the decoded token."
            }
            Outcome::Valid => "valid Approov token binding.",
        };

        f.write_str(s)
    }
}

impl From<&token::Error> for Outcome {
    fn from(e: &token::Error) -> Self {
        match e {
            token::Error::TokenSourceMissing => Outcome::TokenMissing,
            _ => Outcome::TokenInvalid,
        }
    }
}
