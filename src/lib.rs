// Copyright 2025 Contributors to the approovtoken project.
// SPDX-License-Identifier: Apache-2.0

//! Approov attestation token verification and token binding checks.
//!
//! This crate provides an API to verify Approov tokens received by an HTTP
//! API and to check that the token is bound to an application credential
//! (e.g., the `Authorization` header) through its `pay` claim.
//!
//! The API allows:
//! * Verifying the HS256 signature and expiry of an Approov token
//! * Checking the token binding (`pay == base64(sha256(header))`)
//! * Composing both checks as request interceptors with a fail-open or
//!   fail-closed policy, and mounting them in front of axum routes
//!
//! A demo server exposing unprotected (`/v1`) and protected (`/v2`) endpoints
//! lives in the [`server`] module.

pub mod binding;
pub mod config;
pub mod intercept;
pub mod policy;
pub mod server;
pub mod token;
