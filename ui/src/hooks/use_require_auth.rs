use crate::{AuthState, Route, State};
use payloads::responses::StoredUser;
use yew::prelude::*;
use yew_router::prelude::*;
use yewdux::use_store;

/// The logged-in user, or None while unknown or logged out. Once the app
/// knows the user is logged out, it moves to the login page.
#[hook]
pub fn use_require_auth() -> Option<StoredUser> {
    let (state, _) = use_store::<State>();
    let navigator = use_navigator();

    {
        let logged_out = matches!(state.auth_state, AuthState::LoggedOut);
        use_effect_with(logged_out, move |logged_out| {
            if *logged_out {
                if let Some(navigator) = navigator {
                    navigator.push(&Route::Login);
                }
            }
        });
    }

    state.user().cloned()
}
