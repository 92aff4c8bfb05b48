//! Linux key derivation: the password comes from the Secret Service if one is running,
//! falling back to the fixed passphrase Chrome itself uses when no keyring is available.

use std::collections::HashMap;

use keyring::{
    credential::{LinuxCredential, PlatformCredential},
    Entry,
};
use pbkdf2::pbkdf2_hmac;
use sha1::Sha1;
use zeroize::Zeroizing;

use super::{DERIVED_KEY_LEN_CBC, SYMMETRIC_SALT};
use crate::browser::ChromeVariant;

/// Passphrase Chrome falls back to on Linux when no Secret Service entry exists.
const FALLBACK_PASSWORD: &str = "peanuts";

const HASH_ROUNDS: u32 = 1;

fn application_name(variant: ChromeVariant) -> &'static str {
    match variant {
        ChromeVariant::Chromium => "chromium",
        ChromeVariant::Chrome => "chrome",
        ChromeVariant::Edge => "microsoft-edge",
    }
}

fn get_password(variant: ChromeVariant) -> String {
    let credential = PlatformCredential::Linux(LinuxCredential {
        collection: String::from("default"),
        attributes: HashMap::from([(
            String::from("application"),
            String::from(application_name(variant)),
        )]),
        label: String::new(),
    });

    Entry::new_with_credential(&credential)
        .and_then(|entry| entry.get_password())
        .unwrap_or_else(|_| FALLBACK_PASSWORD.to_string())
}

/// Derive the AES-128-CBC key Chrome uses to wrap secrets on Linux.
pub fn derive_key(variant: ChromeVariant) -> Zeroizing<Vec<u8>> {
    let password = get_password(variant);

    let mut key = Zeroizing::new(vec![0u8; DERIVED_KEY_LEN_CBC]);
    pbkdf2_hmac::<Sha1>(password.as_bytes(), SYMMETRIC_SALT, HASH_ROUNDS, &mut key);

    key
}
