use yew::prelude::*;
use yew_router::prelude::*;
use yewdux::prelude::*;

use crate::{AuthState, Route, State, session_events};

pub const SESSION_EXPIRED_MESSAGE: &str =
    "Your session has expired. Please log in again.";

/// Send the user to the login page whenever the backend rejects the stored
/// credentials. The client has already cleared them by then.
#[hook]
pub fn use_session_expired() {
    let (_, dispatch) = use_store::<State>();
    let navigator = use_navigator();

    use_effect_with((), move |_| {
        let subscription = session_events().subscribe(move || {
            dispatch.reduce_mut(|state| {
                state.auth_state = AuthState::LoggedOut;
                state.flash_message = Some(SESSION_EXPIRED_MESSAGE.to_string());
            });
            match &navigator {
                Some(navigator) => navigator.push(&Route::Login),
                None => tracing::warn!("Session expired outside the router"),
            }
        });
        move || drop(subscription)
    });
}
