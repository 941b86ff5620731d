// Copyright 2025 Contributors to the approovtoken project.
// SPDX-License-Identifier: Apache-2.0

//! The token module provides a [`Verifier`] for the signature and expiry of
//! Approov tokens, and the [`Claims`] decoded from them.
//!
//! # Example
//!
//! ```
//! use approovtoken::token::{Claims, Issuer, Verifier};
//!
//! // "c2VjcmV0" is the base64 encoding of "secret"
//! let verifier = Verifier::new("c2VjcmV0").expect("decoding secret");
//!
//! // normally the token comes from the Approov-Token header of a request
//! let token = Issuer::from_base64("c2VjcmV0")
//!     .expect("decoding secret")
//!     .issue(&Claims::expiring_in(5))
//!     .expect("signing token");
//!
//! let claims = verifier.verify(&token).expect("verifying token");
//!
//! assert!(claims.pay.is_none());
//! ```

pub use self::base64::decode_secret;
pub use self::claims::{Claims, PayClaim};
pub use self::errors::Error;
pub use self::issuer::{Issuer, CLAIM_EXAMPLE};
pub use self::verifier::{Verifier, APPROOV_TOKEN_HEADER};

pub(crate) use self::base64::encode as encode_base64;

mod base64;
mod claims;
mod errors;
mod issuer;
mod verifier;
