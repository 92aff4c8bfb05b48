//! 3DES-CBC decryption and PKCS#5 padding removal, used by the Firefox NSS key schedule.

use cbc::cipher::{block_padding::NoPadding, BlockDecryptMut, KeyIvInit};
use thiserror::Error;
use zeroize::Zeroizing;

type TdesCbcDec = cbc::Decryptor<des::TdesEde3>;

#[derive(Debug, Error)]
pub enum Des3Error {
    #[error("3DES-CBC decryption failed: invalid input length")]
    InvalidLength,

    #[error("PKCS#5 padding invalid")]
    BadPadding,
}

/// Decrypt `ciphertext` with 3DES-CBC and strip PKCS#5 padding.
pub fn decrypt(
    key: &[u8; 24],
    iv: &[u8; 8],
    ciphertext: &[u8],
) -> Result<Zeroizing<Vec<u8>>, Des3Error> {
    let mut buf = ciphertext.to_vec();
    let plain = TdesCbcDec::new(key.into(), iv.into())
        .decrypt_padded_mut::<NoPadding>(&mut buf)
        .map_err(|_| Des3Error::InvalidLength)?;

    strip_pkcs5(plain).map(|p| Zeroizing::new(p.to_vec()))
}

/// Strip PKCS#5 padding: the final byte `p` in `[1,8]` names the padding length, and the
/// trailing `p` bytes must all equal `p`.
fn strip_pkcs5(data: &[u8]) -> Result<&[u8], Des3Error> {
    let &pad_len = data.last().ok_or(Des3Error::BadPadding)?;
    if !(1..=8).contains(&pad_len) {
        return Err(Des3Error::BadPadding);
    }
    let pad_len = pad_len as usize;
    if data.len() < pad_len {
        return Err(Des3Error::BadPadding);
    }
    let (rest, padding) = data.split_at(data.len() - pad_len);
    if padding.iter().all(|&b| b as usize == pad_len) {
        Ok(rest)
    } else {
        Err(Des3Error::BadPadding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_valid_padding() {
        let data = [1u8, 2, 3, 4, 4, 4, 4];
        assert_eq!(strip_pkcs5(&data).unwrap(), &[1, 2, 3]);
    }

    #[test]
    fn rejects_inconsistent_padding() {
        // last byte 4 claims 4 trailing 4s, but the 5th-to-last byte is 5.
        let data = [0u8, 5, 5, 5, 5, 4];
        assert!(strip_pkcs5(&data).is_err());
    }

    #[test]
    fn rejects_out_of_range_padding_byte() {
        let data = [1u8, 2, 3, 9];
        assert!(strip_pkcs5(&data).is_err());
    }
}
