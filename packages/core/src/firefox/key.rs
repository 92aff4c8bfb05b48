//! Derives Firefox's master key from `key4.db`: the `metaData`/`nssPrivate` envelopes are
//! ASN.1 DER, the symmetric key schedule is NSS's PBE-SHA1-TripleDES-CBC, and the cipher is
//! 3DES-CBC. See `crate::crypto` for the primitives this composes.

use thiserror::Error;
use zeroize::Zeroizing;

use crate::crypto::asn1::{self, Asn1Error};
use crate::crypto::des3::{self, Des3Error};
use crate::crypto::nss::{self, NssKeyError};
use crate::snapshot::{Snapshot, SnapshotError};

use super::paths::PathProvider;

/// The NSS key-id for the default private key: `nssPrivate.a102` must equal this constant.
const NSS_DEFAULT_KEY_ID: [u8; 16] = [
    0xf8, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01,
];

/// The substring NSS embeds in the decrypted `metaData` check value.
const PASSWORD_CHECK_MARKER: &str = "password-check";

#[derive(Debug, Error)]
pub enum FirefoxKeyError {
    #[error("failed to snapshot key4.db: {0}")]
    Snapshot(#[from] SnapshotError),

    #[error("failed to open or query key4.db: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("key4.db has no 'password' row in metaData")]
    MissingMetaDataRow,

    #[error("key4.db has no row in nssPrivate")]
    MissingNssPrivateRow,

    #[error("malformed key envelope: {0}")]
    Asn1(#[from] Asn1Error),

    #[error("key schedule failed: {0}")]
    Nss(#[from] NssKeyError),

    #[error("3DES decryption failed: {0}")]
    Decrypt(#[from] Des3Error),

    #[error("wrong master password: password-check marker absent after decrypt")]
    WrongMasterPassword,

    #[error("unexpected NSS key id in nssPrivate.a102")]
    UnknownKeyId,
}

/// Firefox's 24-byte 3DES master key, wiped on drop.
pub struct FirefoxMasterKey(Zeroizing<[u8; 24]>);

impl FirefoxMasterKey {
    pub fn as_bytes(&self) -> &[u8; 24] {
        &self.0
    }
}

/// Derive the master key for the profile at `path_provider`, using `master_password` (empty
/// by default; the CLI never solicits a non-empty one).
pub fn derive(
    path_provider: &PathProvider,
    scratch_dir: &std::path::Path,
    master_password: &[u8],
) -> Result<FirefoxMasterKey, FirefoxKeyError> {
    let snapshot = Snapshot::take(&path_provider.key_database(), scratch_dir)?;
    let conn = snapshot.open_sqlite()?;

    let (global_salt, meta_envelope): (Vec<u8>, Vec<u8>) = conn
        .query_row(
            "SELECT item1, item2 FROM metaData WHERE id='password'",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .map_err(|err| match err {
            rusqlite::Error::QueryReturnedNoRows => FirefoxKeyError::MissingMetaDataRow,
            other => FirefoxKeyError::Sqlite(other),
        })?;

    let meta = asn1::parse_pbe_envelope(&meta_envelope)?;
    let meta_key = nss::derive(&global_salt, master_password, &meta.entry_salt)?;
    let meta_plain = des3::decrypt(&meta_key.des3_key, &meta_key.iv, &meta.ciphertext)?;

    if !contains_subslice(&meta_plain, PASSWORD_CHECK_MARKER.as_bytes()) {
        return Err(FirefoxKeyError::WrongMasterPassword);
    }

    let (nss_entry_envelope, key_id): (Vec<u8>, Vec<u8>) = conn
        .query_row("SELECT a11, a102 FROM nssPrivate", [], |row| {
            Ok((row.get(0)?, row.get(1)?))
        })
        .map_err(|err| match err {
            rusqlite::Error::QueryReturnedNoRows => FirefoxKeyError::MissingNssPrivateRow,
            other => FirefoxKeyError::Sqlite(other),
        })?;

    if key_id != NSS_DEFAULT_KEY_ID {
        return Err(FirefoxKeyError::UnknownKeyId);
    }

    let nss_envelope = asn1::parse_pbe_envelope(&nss_entry_envelope)?;
    let nss_key = nss::derive(&global_salt, master_password, &nss_envelope.entry_salt)?;
    let nss_plain = des3::decrypt(&nss_key.des3_key, &nss_key.iv, &nss_envelope.ciphertext)?;

    let mut master_key = Zeroizing::new([0u8; 24]);
    let len = master_key.len().min(nss_plain.len());
    master_key[..len].copy_from_slice(&nss_plain[..len]);

    Ok(FirefoxMasterKey(master_key))
}

fn contains_subslice(haystack: &[u8], needle: &[u8]) -> bool {
    haystack
        .windows(needle.len())
        .any(|window| window == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_marker_substring() {
        let haystack = b"garbage-password-check-trailer";
        assert!(contains_subslice(haystack, PASSWORD_CHECK_MARKER.as_bytes()));
        assert!(!contains_subslice(b"garbage", PASSWORD_CHECK_MARKER.as_bytes()));
    }
}
