// Copyright 2025 Contributors to the approovtoken project.
// SPDX-License-Identifier: Apache-2.0

/// How the Approov checks react to failures.  Built once at startup and
/// shared read-only by all requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Policy {
    /// Reject requests whose Approov token is missing or fails verification.
    /// When false, the failure is only logged.
    pub abort_on_invalid_token: bool,

    /// Reject requests whose token binding doesn't check out.  When false,
    /// the failure is only logged, which allows the binding check to be
    /// rolled out in observe-only mode.
    pub abort_on_invalid_binding: bool,

    /// Log the result of each Approov check
    pub logging_enabled: bool,

    /// Accept tokens without a `pay` claim (the Approov failover service
    /// does not add one)
    pub allow_missing_binding_claim: bool,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            abort_on_invalid_token: true,
            abort_on_invalid_binding: true,
            logging_enabled: true,
            allow_missing_binding_claim: true,
        }
    }
}

impl Policy {
    /// Observe-only policy: every check is logged, nothing is rejected
    pub fn observe_only() -> Self {
        Self {
            abort_on_invalid_token: false,
            abort_on_invalid_binding: false,
            ..Default::default()
        }
    }
}
