// Copyright 2025 Contributors to the approovtoken project.
// SPDX-License-Identifier: Apache-2.0

#[derive(thiserror::Error, PartialEq, Eq)]
pub enum Error {
    #[error("token empty or missing in the header of the request")]
    TokenSourceMissing,
    #[error("Invalid token: {0}")]
    TokenInvalid(String),
    #[error("Secret error: {0}")]
    Secret(String),
    #[error("Encoding error: {0}")]
    Encode(String),
    #[error("Hash calculation failed: {0}")]
    Hash(String),
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::TokenSourceMissing => write!(f, "{}", self),
            Error::TokenInvalid(e) | Error::Secret(e) | Error::Encode(e) | Error::Hash(e) => {
                write!(f, "{}", e)
            }
        }
    }
}
