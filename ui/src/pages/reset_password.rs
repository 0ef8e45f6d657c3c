use api_state::{CallOptions, FormOptions, FormValues};
use gloo_timers::future::TimeoutFuture;
use payloads::services::validate_new_password;
use payloads::{ClientError, Envelope, ErrorDetails};
use std::rc::Rc;
use yew::prelude::*;
use yew_router::prelude::*;
use yewdux::prelude::*;

use super::{INPUT_CLASS, PRIMARY_BUTTON_CLASS, field_value};
use crate::components::ErrorBanner;
use crate::hooks::{use_api_call, use_api_form, use_title};
use crate::{Route, State, get_api_client};

/// Delay before leaving the success view for the login page.
const REDIRECT_DELAY_MS: u32 = 3_000;

const TOKEN_FIELD: &str = "token";

pub const RESET_SUCCESS_MESSAGE: &str =
    "Password has been reset successfully. Please log in with your new password.";

#[derive(Properties, PartialEq)]
pub struct Props {
    pub token: AttrValue,
}

#[function_component]
pub fn ResetPasswordPage(props: &Props) -> Html {
    use_title("Set new password");
    let (_, dispatch) = use_store::<State>();
    let navigator = use_navigator();

    let validation = use_api_call(
        props.token.clone(),
        |token: AttrValue| async move {
            get_api_client().auth().validate_reset_token(&token).await
        },
        CallOptions {
            immediate: true,
            on_error: Some(Rc::new(
                |_: &ClientError, details: &ErrorDetails| {
                    tracing::info!(
                        error = %details.message,
                        "reset token rejected"
                    );
                },
            )),
            ..Default::default()
        },
    );

    // The submitter is built once; the token arrives as a submit override.
    let form = use_api_form(
        |values: FormValues| async move {
            let token = field_value(&values, TOKEN_FIELD);
            let password = field_value(&values, "password");
            get_api_client()
                .auth()
                .reset_password(&token, &password)
                .await
        },
        FormOptions {
            initial_values: FormValues::from([
                ("password".to_string(), String::new()),
                ("confirmPassword".to_string(), String::new()),
            ]),
            on_success: Some(Rc::new(move |_: &Envelope<()>| {
                let dispatch = dispatch.clone();
                let navigator = navigator.clone();
                wasm_bindgen_futures::spawn_local(async move {
                    TimeoutFuture::new(REDIRECT_DELAY_MS).await;
                    dispatch.reduce_mut(|state| {
                        state.flash_message =
                            Some(RESET_SUCCESS_MESSAGE.to_string());
                    });
                    if let Some(navigator) = navigator {
                        navigator.push(&Route::Login);
                    }
                });
            })),
            on_error: Some(Rc::new(
                |_: &ClientError, details: &ErrorDetails| {
                    tracing::warn!(
                        error = %details.message,
                        "password reset failed"
                    );
                },
            )),
            ..Default::default()
        },
    );

    let onsubmit = {
        let form = (*form).clone();
        let token = props.token.to_string();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            form.set_error("password", None);
            form.set_error("confirmPassword", None);

            let check = validate_new_password(
                &form.value("password"),
                &form.value("confirmPassword"),
            );
            if !check.is_valid() {
                for (field, message) in check.errors {
                    form.set_error(field, Some(message));
                }
                return;
            }

            let form = form.clone();
            let overrides =
                FormValues::from([(TOKEN_FIELD.to_string(), token.clone())]);
            yew::platform::spawn_local(async move {
                let _ = form.submit(overrides).await;
            });
        })
    };

    let token_valid = validation.data();
    if token_valid.is_none() && validation.error().is_none() {
        return html! {
            <div class="flex items-center justify-center min-h-screen">
                <div class="text-center space-y-4">
                    <div class="inline-block animate-spin rounded-full h-8 w-8 border-2 border-neutral-900 dark:border-neutral-100 border-t-transparent dark:border-t-transparent"></div>
                    <p class="text-neutral-600 dark:text-neutral-400">{"Validating reset link..."}</p>
                </div>
            </div>
        };
    }

    if token_valid != Some(true) {
        return html! {
            <div class="flex items-center justify-center min-h-screen px-4">
                <div class="max-w-md w-full text-center space-y-4">
                    <h1 class="text-3xl font-bold text-neutral-900 dark:text-white">
                        {"Invalid Reset Link"}
                    </h1>
                    <p class="text-neutral-600 dark:text-neutral-400">
                        {"This password reset link is invalid or has expired."}
                    </p>
                    <Link<Route> to={Route::ForgotPassword} classes={PRIMARY_BUTTON_CLASS}>
                        {"Request New Reset Link"}
                    </Link<Route>>
                    <div>
                        <Link<Route> to={Route::Login} classes="font-medium text-neutral-900 dark:text-neutral-100 underline">
                            {"Back to Login"}
                        </Link<Route>>
                    </div>
                </div>
            </div>
        };
    }

    let succeeded = form
        .last_submit_result()
        .is_some_and(|result| result.is_success());
    if succeeded {
        return html! {
            <div class="flex items-center justify-center min-h-screen px-4">
                <div class="max-w-md w-full text-center space-y-4">
                    <h1 class="text-3xl font-bold text-neutral-900 dark:text-white">
                        {"Password Reset Successfully"}
                    </h1>
                    <p class="text-neutral-600 dark:text-neutral-400">
                        {"Your password has been updated. You will be redirected to the login page shortly."}
                    </p>
                    <Link<Route> to={Route::Login} classes="font-medium text-neutral-900 dark:text-neutral-100 underline">
                        {"Continue to Login"}
                    </Link<Route>>
                </div>
            </div>
        };
    }

    html! {
        <div class="flex items-center justify-center min-h-screen px-4">
            <div class="max-w-md w-full space-y-6">
                <div class="text-center">
                    <h1 class="text-3xl font-bold text-neutral-900 dark:text-white mb-2">
                        {"Set new password"}
                    </h1>
                    <p class="text-neutral-600 dark:text-neutral-400">
                        {"Enter your new password below"}
                    </p>
                </div>

                <form {onsubmit} class="bg-white dark:bg-neutral-800 border border-neutral-200 dark:border-neutral-700 rounded-lg p-6 space-y-4">
                    if let Some(error) = form.general_error() {
                        <ErrorBanner message={error} />
                    }

                    <div>
                        <label for="password" class="block text-sm font-medium text-neutral-700 dark:text-neutral-300 mb-2">
                            {"New password"}
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
                        } else {
                            <p class="text-xs text-neutral-500 mt-1">{"Must be at least 6 characters"}</p>
                        }
                    </div>

                    <div>
                        <label for="confirm_password" class="block text-sm font-medium text-neutral-700 dark:text-neutral-300 mb-2">
                            {"Confirm new password"}
                        </label>
                        <input
                            type="password"
                            id="confirm_password"
                            value={form.value("confirmPassword")}
                            oninput={form.oninput("confirmPassword")}
                            class={INPUT_CLASS}
                        />
                        if let Some(error) = form.field_error("confirmPassword") {
                            <p class="text-xs text-red-600 dark:text-red-400 mt-1">{error}</p>
                        }
                    </div>

                    <button
                        type="submit"
                        disabled={form.submitting()}
                        class={PRIMARY_BUTTON_CLASS}
                    >
                        {if form.submitting() { "Resetting..." } else { "Reset password" }}
                    </button>
                </form>
            </div>
        </div>
    }
}
