use payloads::CredentialStore;
use yew::prelude::*;
use yewdux::prelude::*;

use crate::storage::BrowserCredentials;
use crate::{AuthState, State, get_api_client};

/// Restore the session saved in local storage on startup, then confirm the
/// token with the backend.
#[hook]
pub fn use_authentication() {
    let (_state, dispatch) = use_store::<State>();

    use_effect_with((), move |_| {
        let credentials = BrowserCredentials;
        match (credentials.token(), credentials.stored_user()) {
            (Some(_), Some(user)) => {
                dispatch.reduce_mut(|state| {
                    state.auth_state = AuthState::LoggedIn(user);
                });
                yew::platform::spawn_local(async move {
                    // A rejected token fires the session-expired event, which
                    // takes care of logging out.
                    if let Err(e) = get_api_client().auth().me().await {
                        tracing::warn!("Stored session not confirmed: {e}");
                    }
                });
            }
            _ => {
                credentials.clear();
                dispatch.reduce_mut(|state| {
                    state.auth_state = AuthState::LoggedOut;
                });
            }
        }
    });
}
