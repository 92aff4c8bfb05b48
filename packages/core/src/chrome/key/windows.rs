//! Windows key derivation: `Local State` holds the AES-256 key, DPAPI-wrapped and
//! base64-encoded; unwrapping it reuses `core::unprotect`.

use std::fs;
use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Deserialize;

use crate::unprotect::{unprotect, UnprotectError};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read Local State file: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to parse Local State JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("failed to base64-decode the encrypted key: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("encrypted key is missing the expected DPAPI prefix")]
    MissingDpapiPrefix,

    #[error("failed to unwrap the encrypted key via DPAPI: {0}")]
    Unprotect(#[from] UnprotectError),
}

#[derive(Debug, Deserialize)]
struct OsCrypt {
    encrypted_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LocalState {
    os_crypt: Option<OsCrypt>,
}

const DPAPI_PREFIX: &[u8] = b"DPAPI";

/// Read and unwrap the AES-256 key from `local_state_path`. Returns `None` when the profile
/// carries no `os_crypt.encrypted_key` entry (legacy, key-less profiles).
pub fn read_key(local_state_path: &Path) -> Result<Option<Vec<u8>>, Error> {
    let contents = fs::read_to_string(local_state_path)?;
    let local_state: LocalState = serde_json::from_str(&contents)?;

    let Some(encoded) = local_state.os_crypt.and_then(|c| c.encrypted_key) else {
        return Ok(None);
    };

    let mut decoded = STANDARD.decode(encoded)?;
    if !decoded.starts_with(DPAPI_PREFIX) {
        return Err(Error::MissingDpapiPrefix);
    }
    let stripped = decoded.split_off(DPAPI_PREFIX.len());

    Ok(Some(unprotect(&stripped)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_local_state_shape() {
        let json = r#"{"os_crypt":{"encrypted_key":"ZXhwZWN0ZWQ="}}"#;
        let local_state: LocalState = serde_json::from_str(json).unwrap();
        assert_eq!(
            local_state.os_crypt.unwrap().encrypted_key.unwrap(),
            "ZXhwZWN0ZWQ="
        );
    }
}
