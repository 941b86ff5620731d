// SPDX-License-Identifier: Apache-2.0

use base64::{self, engine::general_purpose, Engine as _};

use super::errors::Error;

/// decodes the Approov shared secret from its (standard, padded) base64
/// representation
pub fn decode_secret(v: &str) -> Result<Vec<u8>, Error> {
    let v = v.trim();

    if v.is_empty() {
        return Err(Error::Secret("empty base64 secret".to_string()));
    }

    let secret = general_purpose::STANDARD
        .decode(v)
        .map_err(|e| Error::Secret(e.to_string()))?;

    if secret.is_empty() {
        return Err(Error::Secret("secret decodes to zero bytes".to_string()));
    }

    Ok(secret)
}

/// encodes bytes the way the Approov SDK encodes the `pay` claim
pub fn encode(v: &[u8]) -> String {
    general_purpose::STANDARD.encode(v)
}
