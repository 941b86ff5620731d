// Copyright 2025 Contributors to the approovtoken project.
// SPDX-License-Identifier: Apache-2.0

//! Server and Approov configuration, read once at startup

use crate::binding::DEFAULT_BINDING_HEADER;
use crate::policy::Policy;
use crate::token::{self, Verifier};
use axum::http::HeaderName;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_ENV: &str = "production";
pub const DEFAULT_HOSTNAME: &str = "localhost";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_CERTIFICATES_PATH: &str = "/home/node/.ssl";

#[derive(thiserror::Error, PartialEq, Eq)]
pub enum Error {
    #[error("APPROOV_BASE64_SECRET is not set")]
    MissingSecret,
    #[error("Invalid Approov secret: {0}")]
    Secret(String),
    #[error("Unsupported protocol: {0}")]
    Protocol(String),
    #[error("Invalid header name: {0}")]
    Header(String),
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MissingSecret => write!(f, "{}", self),
            Error::Secret(e) | Error::Protocol(e) | Error::Header(e) => write!(f, "{}", e),
        }
    }
}

/// Parse an on/off switch: anything but (case-insensitive) `false` is on
pub fn parse_switch(v: &str) -> Result<bool, String> {
    Ok(!v.trim().eq_ignore_ascii_case("false"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    Http,
    Https,
}

impl FromStr for Protocol {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s.trim().to_ascii_lowercase().as_str() {
            "http" => Ok(Protocol::Http),
            "https" => Ok(Protocol::Https),
            other => Err(Error::Protocol(other.to_string())),
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Protocol::Http => f.write_str("http"),
            Protocol::Https => f.write_str("https"),
        }
    }
}

/// Where and how the demo server listens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Deployment environment; only `production` changes behaviour
    pub env: String,
    pub protocol: Protocol,
    pub hostname: String,
    pub port: u16,
    /// Address the listener binds to
    pub bind: IpAddr,
    /// Directory holding `<hostname>.pem` and `<hostname>.key`
    pub certificates_path: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            env: DEFAULT_ENV.to_string(),
            protocol: Protocol::Http,
            hostname: DEFAULT_HOSTNAME.to_string(),
            port: DEFAULT_PORT,
            bind: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            certificates_path: PathBuf::from(DEFAULT_CERTIFICATES_PATH),
        }
    }
}

impl ServerConfig {
    pub fn url(&self) -> String {
        format!("{}://{}", self.protocol, self.hostname)
    }

    /// Public URL of the server.  In production the server sits behind a
    /// proxy on the default port, so the port is left out.
    pub fn full_url(&self) -> String {
        if self.env == DEFAULT_ENV {
            return self.url();
        }

        format!("{}:{}", self.url(), self.port)
    }

    pub fn https_enabled(&self) -> bool {
        self.protocol == Protocol::Https
    }

    pub fn certificate_pem(&self) -> PathBuf {
        self.certificates_path
            .join(format!("{}.pem", self.hostname))
    }

    pub fn certificate_key(&self) -> PathBuf {
        self.certificates_path
            .join(format!("{}.key", self.hostname))
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }
}

/// Approov settings
#[derive(Clone)]
pub struct ApproovConfig {
    base64_secret: String,
    pub binding_header: HeaderName,
    pub policy: Policy,
}

impl fmt::Debug for ApproovConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApproovConfig")
            .field("base64_secret", &"<redacted>")
            .field("binding_header", &self.binding_header)
            .field("policy", &self.policy)
            .finish()
    }
}

impl ApproovConfig {
    /// Validate the Approov settings.  A missing or undecodable secret is an
    /// error: the server can't run without it.
    pub fn new(
        base64_secret: Option<&str>,
        binding_header: &str,
        policy: Policy,
    ) -> Result<Self, Error> {
        let base64_secret = match base64_secret.map(str::trim) {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => return Err(Error::MissingSecret),
        };

        token::decode_secret(&base64_secret).map_err(|e| Error::Secret(e.to_string()))?;

        let binding_header = HeaderName::from_str(binding_header.trim())
            .map_err(|e| Error::Header(format!("{binding_header:?}: {e}")))?;

        Ok(Self {
            base64_secret,
            binding_header,
            policy,
        })
    }

    /// Approov settings with the default binding header and policy
    pub fn with_secret(base64_secret: &str) -> Result<Self, Error> {
        Self::new(Some(base64_secret), DEFAULT_BINDING_HEADER, Policy::default())
    }

    pub fn verifier(&self) -> Result<Verifier, Error> {
        Verifier::new(&self.base64_secret).map_err(|e| Error::Secret(e.to_string()))
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub approov: ApproovConfig,
}
