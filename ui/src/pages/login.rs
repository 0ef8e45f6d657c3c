use api_state::{FormOptions, FormValues};
use payloads::requests::LoginCredentials;
use payloads::responses::StoredUser;
use payloads::services::is_valid_email;
use payloads::{ClientError, Envelope, ErrorDetails};
use std::rc::Rc;
use yew::prelude::*;
use yew_router::prelude::*;
use yewdux::prelude::*;

use super::{INPUT_CLASS, PRIMARY_BUTTON_CLASS, field_value};
use crate::components::ErrorBanner;
use crate::hooks::{use_api_form, use_title};
use crate::{AuthState, Route, State, get_api_client};

#[function_component]
pub fn LoginPage() -> Html {
    use_title("Sign in");
    let navigator = use_navigator();
    let (state, dispatch) = use_store::<State>();
    let flash_message = use_state(|| None::<String>);

    // Show and consume a notice left by the previous page
    {
        let dispatch = dispatch.clone();
        let flash_message = flash_message.clone();
        use_effect_with((), move |_| {
            let message = dispatch.get().flash_message.clone();
            if message.is_some() {
                dispatch.reduce_mut(|state| state.flash_message = None);
                flash_message.set(message);
            }
        });
    }

    // Redirect to the dashboard if already logged in
    {
        let navigator = navigator.clone();
        use_effect_with(state.is_authenticated(), move |is_auth| {
            if *is_auth {
                if let Some(navigator) = navigator {
                    navigator.push(&Route::Surveys);
                }
            }
        });
    }

    let form = {
        let dispatch = dispatch.clone();
        use_api_form(
            |values: FormValues| async move {
                let credentials = LoginCredentials {
                    email: field_value(&values, "email"),
                    password: field_value(&values, "password"),
                };
                get_api_client().auth().login(&credentials).await
            },
            FormOptions {
                initial_values: FormValues::from([
                    ("email".to_string(), String::new()),
                    ("password".to_string(), String::new()),
                ]),
                on_success: Some(Rc::new(move |envelope: &Envelope<StoredUser>| {
                    let user = envelope.data.clone();
                    dispatch.reduce_mut(|state| {
                        state.auth_state = AuthState::LoggedIn(user);
                    });
                })),
                on_error: Some(Rc::new(|_: &ClientError, details: &ErrorDetails| {
                    tracing::info!(error = %details.message, "login rejected");
                })),
                ..Default::default()
            },
        )
    };

    let onsubmit = {
        let form = (*form).clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            form.clear_errors();

            let email = form.value("email");
            let mut valid = true;
            if email.trim().is_empty() {
                form.set_error("email", Some("Email is required".to_string()));
                valid = false;
            } else if !is_valid_email(&email) {
                form.set_error(
                    "email",
                    Some("Please enter a valid email address".to_string()),
                );
                valid = false;
            }
            if form.value("password").is_empty() {
                form.set_error("password", Some("Password is required".to_string()));
                valid = false;
            }

            if valid {
                let form = form.clone();
                yew::platform::spawn_local(async move {
                    let _ = form.submit(FormValues::new()).await;
                });
            }
        })
    };

    html! {
        <div class="flex items-center justify-center min-h-screen px-4">
            <div class="max-w-md w-full space-y-6">
                <div class="text-center">
                    <h1 class="text-3xl font-bold text-neutral-900 dark:text-white mb-2">
                        {"Sign in"}
                    </h1>
                    <p class="text-neutral-600 dark:text-neutral-400">
                        {"Enter your credentials to continue"}
                    </p>
                </div>

                if let Some(message) = (*flash_message).as_ref() {
                    <div class="bg-green-50 dark:bg-green-900/20 border border-green-200 dark:border-green-800 rounded-md p-3">
                        <p class="text-sm text-green-800 dark:text-green-200">{message}</p>
                    </div>
                }

                <form {onsubmit} class="bg-white dark:bg-neutral-800 border border-neutral-200 dark:border-neutral-700 rounded-lg p-6 space-y-4">
                    if let Some(error) = form.general_error() {
                        <ErrorBanner message={error} />
                    }

                    <div>
                        <label for="email" class="block text-sm font-medium text-neutral-700 dark:text-neutral-300 mb-2">
                            {"Email"}
                        </label>
                        <input
                            type="email"
                            id="email"
                            value={form.value("email")}
                            oninput={form.oninput("email")}
                            class={INPUT_CLASS}
                        />
                        if let Some(error) = form.field_error("email") {
                            <p class="text-xs text-red-600 dark:text-red-400 mt-1">{error}</p>
                        }
                    </div>

                    <div>
                        <label for="password" class="block text-sm font-medium text-neutral-700 dark:text-neutral-300 mb-2">
                            {"Password"}
                        </label>
                        <input
                            type="password"
                            id="password"
                            value={form.value("password")}
                            oninput={form.oninput("password")}
                            class={INPUT_CLASS}
                        />
                        if let Some(error) = form.field_error("password") {
                            <p class="text-xs text-red-600 dark:text-red-400 mt-1">{error}</p>
                        }
                    </div>

                    <button
                        type="submit"
                        disabled={form.submitting()}
                        class={PRIMARY_BUTTON_CLASS}
                    >
                        {if form.submitting() { "Signing in..." } else { "Sign in" }}
                    </button>
                </form>

                <p class="text-center text-sm text-neutral-600 dark:text-neutral-400">
                    <Link<Route> to={Route::ForgotPassword} classes="text-neutral-900 dark:text-neutral-100 hover:text-neutral-700 dark:hover:text-neutral-300 font-medium underline">
                        {"Lost your password?"}
                    </Link<Route>>
                </p>
            </div>
        </div>
    }
}
