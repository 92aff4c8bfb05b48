use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use super::ChromeVariant;

/// Resolves the on-disk layout of a Chromium-family profile.
pub struct PathProvider {
    base_dir: PathBuf,
    _profile: OsString,
    profile_dir: PathBuf,
}

impl PathProvider {
    /// Create a path provider for the given profile under `root_dir`. If no profile is given,
    /// the "Default" profile is used.
    pub fn new<R: AsRef<Path>, P: AsRef<OsStr>>(root_dir: R, profile: Option<P>) -> Self {
        let base_dir = root_dir.as_ref().to_owned();
        let profile = profile
            .as_ref()
            .map(|p| p.as_ref())
            .unwrap_or_else(|| OsStr::new("Default"));

        Self {
            profile_dir: if cfg!(windows) {
                base_dir.join("User Data").join(profile)
            } else {
                base_dir.join(profile)
            },
            _profile: profile.to_owned(),
            base_dir,
        }
    }

    pub fn from_root<P: AsRef<Path>>(root_dir: P) -> Self {
        Self::new::<_, &OsStr>(root_dir, None)
    }

    /// Path provider for the default profile of a given Chromium-family variant.
    pub fn default_profile(variant: ChromeVariant) -> Self {
        let root_dir = if cfg!(windows) {
            dirs_next::data_local_dir()
        } else {
            dirs_next::config_dir()
        }
        .expect("no config directory available on this platform")
        .join(Self::variant_base_folder(variant));

        const DEFAULT_PROFILE: &str = "Default";

        Self::new(root_dir, Some(DEFAULT_PROFILE))
    }

    const fn variant_base_folder(variant: ChromeVariant) -> &'static str {
        if cfg!(any(windows, target_os = "macos")) {
            match variant {
                ChromeVariant::Chromium => "Chromium",
                ChromeVariant::Chrome => "Google/Chrome",
                ChromeVariant::Edge => "Microsoft/Edge",
            }
        } else {
            match variant {
                ChromeVariant::Chromium => "chromium",
                ChromeVariant::Chrome => "google-chrome",
                ChromeVariant::Edge => "microsoft-edge",
            }
        }
    }

    /// Path to the `Local State` file (holds `os_crypt.encrypted_key` on Windows).
    #[cfg(windows)]
    pub fn local_state(&self) -> PathBuf {
        self.base_dir.join("User Data").join("Local State")
    }

    #[cfg(not(windows))]
    #[allow(dead_code)]
    pub fn local_state(&self) -> PathBuf {
        self.base_dir.join("Local State")
    }

    /// Path to the `Login Data` SQLite store.
    pub fn login_data(&self) -> PathBuf {
        self.profile_dir.join("Login Data")
    }

    /// Path to the `Cookies` SQLite store, preferring the newer `Network/Cookies` location.
    pub fn cookies_database(&self) -> PathBuf {
        let new_path = self.profile_dir.join("Network").join("Cookies");

        if new_path.exists() {
            new_path
        } else {
            self.profile_dir.join("Cookies")
        }
    }

    /// Path to the `History` SQLite store.
    pub fn history_database(&self) -> PathBuf {
        self.profile_dir.join("History")
    }

    /// Path to the `Bookmarks` JSON file.
    pub fn bookmarks_file(&self) -> PathBuf {
        self.profile_dir.join("Bookmarks")
    }
}
