//! macOS key derivation: the password is fetched from Keychain, then put through PBKDF2 the
//! same way Chrome itself does to get the AES-128-CBC key.

use keyring::{
    credential::{MacCredential, MacKeychainDomain, PlatformCredential},
    Entry,
};
use pbkdf2::pbkdf2_hmac;
use sha1::Sha1;
use zeroize::Zeroizing;

use super::{DERIVED_KEY_LEN_CBC, SYMMETRIC_SALT};
use crate::browser::ChromeVariant;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to get password from Keychain: {0}")]
    Keychain(#[from] keyring::Error),
}

const HASH_ROUNDS: u32 = 1003;

fn service_and_account(variant: ChromeVariant) -> (&'static str, &'static str) {
    match variant {
        ChromeVariant::Chromium => ("Chromium Safe Storage", "Chromium"),
        ChromeVariant::Chrome => ("Chrome Safe Storage", "Chrome"),
        ChromeVariant::Edge => ("Microsoft Edge Safe Storage", "Microsoft Edge"),
    }
}

fn get_password(variant: ChromeVariant) -> Result<String, Error> {
    let (service, account) = service_and_account(variant);

    let credential = PlatformCredential::Mac(MacCredential {
        service: String::from(service),
        account: String::from(account),
        domain: MacKeychainDomain::User,
    });

    let entry = Entry::new_with_credential(&credential)?;
    Ok(entry.get_password()?)
}

/// Derive the AES-128-CBC key Chrome uses to wrap secrets on macOS.
pub fn derive_key(variant: ChromeVariant) -> Result<Zeroizing<Vec<u8>>, Error> {
    let password = get_password(variant)?;

    let mut key = Zeroizing::new(vec![0u8; DERIVED_KEY_LEN_CBC]);
    pbkdf2_hmac::<Sha1>(password.as_bytes(), SYMMETRIC_SALT, HASH_ROUNDS, &mut key);

    Ok(key)
}
