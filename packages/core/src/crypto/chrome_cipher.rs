//! Decryption of Chromium's `v10`/`v11`-prefixed secrets: AES-256-GCM on Windows (where the
//! key is wrapped by DPAPI), legacy AES-128-CBC with a fixed space-byte IV on macOS/Linux
//! (where the key is a PBKDF2-derived passphrase). Ported from the cookie-only decryptor this
//! crate started from and generalized to any Chromium secret (cookie or password value).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChromeCipherError {
    #[error("ciphertext too short to contain a nonce/IV")]
    InvalidLength,

    #[error("AES-GCM authentication failed")]
    AuthFail,

    #[error("AES-CBC padding invalid")]
    BadPadding,
}

const V10_PREFIX: &[u8] = b"v10";
const V11_PREFIX: &[u8] = b"v11";
const PREFIX_LEN: usize = 3;

/// Strip a `v10`/`v11` prefix if present, returning the remaining ciphertext.
pub fn strip_version_prefix(data: &[u8]) -> Option<&[u8]> {
    match data.get(..PREFIX_LEN) {
        Some(V10_PREFIX) | Some(V11_PREFIX) => data.get(PREFIX_LEN..),
        _ => None,
    }
}

/// Decrypt a `v10`/`v11` Chromium secret given the platform key: AES-256-GCM with a 12-byte
/// nonce on Windows, AES-128-CBC with Chrome's fixed space-byte IV elsewhere.
#[cfg(windows)]
pub fn decrypt(key: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>, ChromeCipherError> {
    use aes_gcm::{aead::Aead, Aes256Gcm, KeyInit};

    const NONCE_LEN: usize = 12;

    let nonce = ciphertext
        .get(..NONCE_LEN)
        .ok_or(ChromeCipherError::InvalidLength)?;
    let ct = ciphertext
        .get(NONCE_LEN..)
        .ok_or(ChromeCipherError::InvalidLength)?;

    let cipher = Aes256Gcm::new(key.into());
    cipher
        .decrypt(nonce.into(), ct)
        .map_err(|_| ChromeCipherError::AuthFail)
}

#[cfg(not(windows))]
pub fn decrypt(key: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>, ChromeCipherError> {
    use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, KeyIvInit};

    type Aes128CbcDec = cbc::Decryptor<aes::Aes128>;

    /// Chrome's fixed initialization vector for the legacy AES-128-CBC path.
    const IV: [u8; 16] = [b' '; 16];

    let mut buf = ciphertext.to_vec();
    Aes128CbcDec::new(key.into(), &IV.into())
        .decrypt_padded_mut::<Pkcs7>(&mut buf)
        .map(|pt| pt.to_vec())
        .map_err(|_| ChromeCipherError::BadPadding)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_known_prefixes() {
        assert_eq!(strip_version_prefix(b"v10hello"), Some(&b"hello"[..]));
        assert_eq!(strip_version_prefix(b"v11hello"), Some(&b"hello"[..]));
        assert_eq!(strip_version_prefix(b"plain"), None);
    }

    #[cfg(not(windows))]
    #[test]
    fn decrypts_known_fixture() {
        // Same key/ciphertext pair the macOS/Linux key-derivation path is grounded on.
        const KEY: [u8; 16] = [
            253, 98, 31, 229, 162, 180, 2, 83, 157, 250, 20, 124, 169, 39, 39, 120,
        ];
        const ENCRYPTED: &[u8] = &[
            0x76, 0x31, 0x30, 0xe9, 0xbf, 0x20, 0xc4, 0xcf, 0xaa, 0xa2, 0xfa, 0x8d, 0xf3, 0x3a,
            0x42, 0x60, 0x42, 0x4e, 0x5b,
        ];

        let ciphertext = strip_version_prefix(ENCRYPTED).unwrap();
        let plaintext = decrypt(&KEY, ciphertext).unwrap();
        assert_eq!(plaintext, b"PENDING+400");
    }
}
