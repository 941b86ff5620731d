// Copyright 2025 Contributors to the approovtoken project.
// SPDX-License-Identifier: Apache-2.0

use super::base64::decode_secret;
use super::claims::Claims;
use super::errors::Error;
use axum::http::HeaderValue;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

/// Name of the request header carrying the Approov token
pub const APPROOV_TOKEN_HEADER: &str = "Approov-Token";

/// Verifies the signature and expiry of Approov tokens.  Approov tokens are
/// JWTs signed with HS256 using a secret shared with the Approov cloud
/// service; no other algorithm is accepted.
pub struct Verifier {
    key: DecodingKey,
    validation: Validation,
}

impl Verifier {
    /// Build a verifier from the base64 encoded secret, as retrieved with
    /// the Approov CLI tool
    pub fn new(base64_secret: &str) -> Result<Self, Error> {
        let secret = decode_secret(base64_secret)?;

        Ok(Self::from_secret(&secret))
    }

    /// Build a verifier from the raw secret bytes
    pub fn from_secret(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp"]);
        validation.validate_exp = true;
        validation.validate_aud = false;

        Self {
            key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Verify an Approov token and return its claims-set
    pub fn verify(&self, token: &str) -> Result<Claims, Error> {
        let token = token.trim();

        if token.is_empty() {
            return Err(Error::TokenSourceMissing);
        }

        decode::<Claims>(token, &self.key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| Error::TokenInvalid(e.to_string()))
    }

    /// Verify the token found in the value of the `Approov-Token` header.  A
    /// missing or blank header is reported as [`Error::TokenSourceMissing`],
    /// one that isn't visible ASCII as [`Error::TokenInvalid`].
    pub fn verify_header(&self, value: Option<&HeaderValue>) -> Result<Claims, Error> {
        let token = value
            .ok_or(Error::TokenSourceMissing)?
            .to_str()
            .map_err(|e| Error::TokenInvalid(e.to_string()))?;

        self.verify(token)
    }
}
