//! A single operation, `unprotect`, wrapping the OS's data-protection primitive: DPAPI on
//! Windows. macOS and Linux have no equivalent blob-unwrap primitive in common use by
//! Chromium itself (they fetch a passphrase instead, see `chrome::key`); `unprotect` on those
//! platforms is therefore always `Unavailable`, and pre-`v10` Chromium ciphertexts are
//! decrypted directly with the keyring-derived key instead of through this adapter.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum UnprotectError {
    #[error("the OS data-protection adapter cannot service this blob on this platform")]
    Unavailable,

    #[error("OS data-protection call failed: {0}")]
    Platform(String),
}

#[cfg(windows)]
pub fn unprotect(blob: &[u8]) -> Result<Vec<u8>, UnprotectError> {
    windows_impl::decrypt(blob).map_err(|err| UnprotectError::Platform(err.to_string()))
}

#[cfg(not(windows))]
pub fn unprotect(_blob: &[u8]) -> Result<Vec<u8>, UnprotectError> {
    Err(UnprotectError::Unavailable)
}

#[cfg(windows)]
mod windows_impl {
    use windows::Win32::Foundation::{LocalFree, HLOCAL};
    use windows::Win32::Security::Cryptography::{CryptUnprotectData, CRYPT_INTEGER_BLOB};

    #[derive(Debug, thiserror::Error)]
    pub enum DpapiError {
        #[error("buffer too long to pass to CryptUnprotectData: {0}")]
        BufferTooLong(std::num::TryFromIntError),
        #[error("CryptUnprotectData failed: {0}")]
        Call(windows::core::Error),
    }

    /// Decrypts a value encrypted with the Windows DPAPI.
    ///
    /// # Safety
    /// `data_in` stays valid for the duration of the call; `data_out` is populated by
    /// `CryptUnprotectData` and freed via `LocalFree` before returning.
    pub fn decrypt(encrypted_value: &[u8]) -> Result<Vec<u8>, DpapiError> {
        let mut buf = encrypted_value.to_vec();

        let data_in = CRYPT_INTEGER_BLOB {
            cbData: u32::try_from(buf.len()).map_err(DpapiError::BufferTooLong)?,
            pbData: buf.as_mut_ptr(),
        };

        let mut data_out = CRYPT_INTEGER_BLOB::default();

        #[allow(unsafe_code)]
        unsafe {
            CryptUnprotectData(&data_in, None, None, None, None, 0, &mut data_out)
                .map_err(DpapiError::Call)?;

            let data =
                std::slice::from_raw_parts(data_out.pbData, data_out.cbData as usize).to_vec();
            LocalFree(HLOCAL(data_out.pbData.cast()));

            Ok(data)
        }
    }
}

#[cfg(all(test, not(windows)))]
mod tests {
    use super::*;

    #[test]
    fn unavailable_off_windows() {
        assert!(matches!(
            unprotect(b"anything"),
            Err(UnprotectError::Unavailable)
        ));
    }
}
