//! Discovers and returns the symmetric key used to wrap Chromium-family secrets on the
//! current platform: 32 bytes (AES-256-GCM) via DPAPI on Windows, 16 bytes (AES-128-CBC) via
//! a PBKDF2-derived keyring passphrase on macOS/Linux.

use zeroize::Zeroizing;

use super::paths::PathProvider;
use super::ChromeVariant;

#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "macos")]
mod mac;
#[cfg(windows)]
mod windows;

/// Salt used for both the macOS and Linux PBKDF2 derivations.
#[cfg(unix)]
const SYMMETRIC_SALT: &[u8] = b"saltysalt";

/// Derived AES-128-CBC key length, in bytes.
#[cfg(unix)]
const DERIVED_KEY_LEN_CBC: usize = 16;

#[derive(Debug, thiserror::Error)]
pub enum ChromeKeyError {
    #[cfg(target_os = "macos")]
    #[error("macOS key derivation failed: {0}")]
    Mac(#[from] mac::Error),

    #[cfg(windows)]
    #[error("Windows key derivation failed: {0}")]
    Windows(#[from] windows::Error),
}

/// A Chromium symmetric key, wiped on drop.
pub struct ChromiumKey(Zeroizing<Vec<u8>>);

impl ChromiumKey {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// Returns the key used to unwrap this profile's secrets, if one can be derived. `None`
/// means the pipeline should fall back to per-ciphertext `unprotect` (a legacy, key-less
/// Windows profile).
#[cfg(windows)]
pub fn provide_key(
    _variant: ChromeVariant,
    path_provider: &PathProvider,
) -> Result<Option<ChromiumKey>, ChromeKeyError> {
    let key = windows::read_key(&path_provider.local_state())?;
    Ok(key.map(|k| ChromiumKey(Zeroizing::new(k))))
}

#[cfg(target_os = "macos")]
pub fn provide_key(
    variant: ChromeVariant,
    _path_provider: &PathProvider,
) -> Result<Option<ChromiumKey>, ChromeKeyError> {
    let key = mac::derive_key(variant)?;
    Ok(Some(ChromiumKey(key)))
}

#[cfg(target_os = "linux")]
pub fn provide_key(
    variant: ChromeVariant,
    _path_provider: &PathProvider,
) -> Result<Option<ChromiumKey>, ChromeKeyError> {
    Ok(Some(ChromiumKey(linux::derive_key(variant))))
}
