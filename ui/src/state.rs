use payloads::responses::StoredUser;
use yewdux::prelude::*;

#[derive(Clone, PartialEq, Default)]
pub enum AuthState {
    #[default]
    Unknown,
    LoggedOut,
    LoggedIn(StoredUser),
}

#[derive(Default, Clone, PartialEq, Store)]
pub struct State {
    pub auth_state: AuthState,
    /// One-off notice shown on the next page, e.g. after a password reset.
    pub flash_message: Option<String>,
}

impl State {
    pub fn is_authenticated(&self) -> bool {
        matches!(self.auth_state, AuthState::LoggedIn(_))
    }

    pub fn user(&self) -> Option<&StoredUser> {
        match &self.auth_state {
            AuthState::LoggedIn(user) => Some(user),
            _ => None,
        }
    }
}
