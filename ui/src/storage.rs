//! Credentials kept in the browser's local storage.

use payloads::CredentialStore;
use payloads::responses::StoredUser;
use secrecy::{ExposeSecret, SecretBox};
use web_sys::Storage;

pub const TOKEN_KEY: &str = "jwt_token";
pub const USER_DATA_KEY: &str = "user_data";

/// Token and user data under `jwt_token` and `user_data`.
///
/// Storage failures (private browsing, quota) are logged and otherwise
/// treated as "nothing stored".
#[derive(Clone, Copy, Default)]
pub struct BrowserCredentials;

impl BrowserCredentials {
    fn storage() -> Option<Storage> {
        web_sys::window()?.local_storage().ok().flatten()
    }

    fn read(key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok().flatten()
    }

    /// The logged-in user as saved at login.
    pub fn stored_user(&self) -> Option<StoredUser> {
        let data = self.user_data()?;
        serde_json::from_str(&data)
            .inspect_err(|e| {
                tracing::warn!("Discarding unreadable user data: {e}")
            })
            .ok()
    }
}

impl CredentialStore for BrowserCredentials {
    fn token(&self) -> Option<SecretBox<String>> {
        Self::read(TOKEN_KEY).map(|token| SecretBox::new(Box::new(token)))
    }

    fn user_data(&self) -> Option<String> {
        Self::read(USER_DATA_KEY)
    }

    fn save(&self, token: &SecretBox<String>, user_data: &str) {
        let Some(storage) = Self::storage() else {
            tracing::warn!("Local storage unavailable, credentials not saved");
            return;
        };
        let saved = storage
            .set_item(TOKEN_KEY, token.expose_secret())
            .and_then(|_| storage.set_item(USER_DATA_KEY, user_data));
        if saved.is_err() {
            tracing::warn!("Failed to write credentials to local storage");
            self.clear();
        }
    }

    fn clear(&self) {
        if let Some(storage) = Self::storage() {
            let _ = storage.remove_item(TOKEN_KEY);
            let _ = storage.remove_item(USER_DATA_KEY);
        }
    }
}
