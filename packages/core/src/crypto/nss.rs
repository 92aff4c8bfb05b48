//! NSS's PBE-SHA1-TripleDES-CBC key schedule (PKCS#12 v1 PBE built from SHA-1/HMAC-SHA1),
//! used to turn `key4.db`'s global salt and per-entry salts into a 3DES key and IV.

use hmac::{Hmac, Mac};
use sha1::{Digest, Sha1};
use thiserror::Error;
use zeroize::Zeroizing;

type HmacSha1 = Hmac<Sha1>;

#[derive(Debug, Error)]
pub enum NssKeyError {
    #[error("HMAC-SHA1 accepts a key of any length; this should be unreachable")]
    InvalidHmacKey,
}

/// A derived 3DES key and IV, wiped on drop.
pub struct NssKey {
    pub des3_key: Zeroizing<[u8; 24]>,
    pub iv: [u8; 8],
}

/// Run NSS's key schedule: `HP = SHA1(globalSalt ‖ masterPwd)`, `CHP = SHA1(HP ‖ entrySalt)`,
/// `k1 = HMAC(CHP, PES ‖ entrySalt)`, `tk = HMAC(CHP, PES)`, `k2 = HMAC(CHP, tk ‖ entrySalt)`,
/// `k = k1 ‖ k2`; the 3DES key is `k[0..24]` and the IV is `k[32..40]`.
pub fn derive(
    global_salt: &[u8],
    master_pwd: &[u8],
    entry_salt: &[u8],
) -> Result<NssKey, NssKeyError> {
    let hp = {
        let mut hasher = Sha1::new();
        hasher.update(global_salt);
        hasher.update(master_pwd);
        hasher.finalize()
    };

    let chp = {
        let mut hasher = Sha1::new();
        hasher.update(hp);
        hasher.update(entry_salt);
        hasher.finalize()
    };

    let pes = pad_entry_salt(entry_salt);

    let mut k1_input = Zeroizing::new(Vec::with_capacity(pes.len() + entry_salt.len()));
    k1_input.extend_from_slice(&pes);
    k1_input.extend_from_slice(entry_salt);
    let k1 = hmac_sha1(&chp, &k1_input)?;

    let tk = hmac_sha1(&chp, &pes)?;

    let mut k2_input = Zeroizing::new(Vec::with_capacity(tk.len() + entry_salt.len()));
    k2_input.extend_from_slice(tk.as_slice());
    k2_input.extend_from_slice(entry_salt);
    let k2 = hmac_sha1(&chp, &k2_input)?;

    let mut k = Zeroizing::new(Vec::with_capacity(40));
    k.extend_from_slice(k1.as_slice());
    k.extend_from_slice(k2.as_slice());

    let mut des3_key = Zeroizing::new([0u8; 24]);
    des3_key.copy_from_slice(&k[0..24]);
    let mut iv = [0u8; 8];
    iv.copy_from_slice(&k[32..40]);

    Ok(NssKey { des3_key, iv })
}

/// Zero-pad `entry_salt` up to the next multiple of 20 bytes, at least 20.
fn pad_entry_salt(entry_salt: &[u8]) -> Zeroizing<Vec<u8>> {
    let min_len = entry_salt.len().max(20);
    let target = ((min_len + 19) / 20) * 20;
    let mut padded = Zeroizing::new(vec![0u8; target]);
    padded[..entry_salt.len()].copy_from_slice(entry_salt);
    padded
}

fn hmac_sha1(key: &[u8], data: &[u8]) -> Result<Zeroizing<[u8; 20]>, NssKeyError> {
    let mut mac = HmacSha1::new_from_slice(key).map_err(|_| NssKeyError::InvalidHmacKey)?;
    mac.update(data);
    let result = mac.finalize().into_bytes();
    let mut out = Zeroizing::new([0u8; 20]);
    out.copy_from_slice(&result);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derivation_is_deterministic() {
        let global_salt = [0u8; 20];
        let entry_salt = [0x01, 0x02, 0x03, 0x04];

        let a = derive(&global_salt, b"", &entry_salt).unwrap();
        let b = derive(&global_salt, b"", &entry_salt).unwrap();

        assert_eq!(*a.des3_key, *b.des3_key);
        assert_eq!(a.iv, b.iv);
    }

    #[test]
    fn differing_entry_salt_changes_output() {
        let global_salt = [0u8; 20];

        let a = derive(&global_salt, b"", &[0x01]).unwrap();
        let b = derive(&global_salt, b"", &[0x02]).unwrap();

        assert_ne!(*a.des3_key, *b.des3_key);
    }
}
