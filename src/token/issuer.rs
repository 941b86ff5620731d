// Copyright 2025 Contributors to the approovtoken project.
// SPDX-License-Identifier: Apache-2.0

use super::base64::decode_secret;
use super::claims::Claims;
use super::errors::Error;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};

/// Example `pay` claim, as the one in the Approov documentation
pub const CLAIM_EXAMPLE: &str = "f3U2fniBJVE04Tdecj0d6orV9qT9t52TjfHxdUqDBgY=";

/// Signs Approov-like tokens.  Only meant for generating test tokens during
/// development: in production Approov tokens are issued by the Approov cloud
/// service.
pub struct Issuer {
    key: EncodingKey,
}

impl Issuer {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            key: EncodingKey::from_secret(secret),
        }
    }

    pub fn from_base64(base64_secret: &str) -> Result<Self, Error> {
        let secret = decode_secret(base64_secret)?;

        Ok(Self::new(&secret))
    }

    /// Sign the claims-set with HS256
    pub fn issue(&self, claims: &Claims) -> Result<String, Error> {
        encode(&Header::new(Algorithm::HS256), claims, &self.key)
            .map_err(|e| Error::Encode(e.to_string()))
    }
}
