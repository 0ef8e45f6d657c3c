use api_state::{FormOptions, FormValues};
use payloads::services::is_valid_email;
use yew::prelude::*;
use yew_router::prelude::*;

use super::{INPUT_CLASS, PRIMARY_BUTTON_CLASS, field_value};
use crate::components::ErrorBanner;
use crate::hooks::{use_api_form, use_title};
use crate::{Route, get_api_client};

#[function_component]
pub fn ForgotPasswordPage() -> Html {
    use_title("Forgot password");
    let submitted_email = use_state(|| None::<String>);

    let form = use_api_form(
        |values: FormValues| async move {
            let email = field_value(&values, "email");
            get_api_client().auth().request_password_reset(&email).await
        },
        FormOptions {
            initial_values: FormValues::from([("email".to_string(), String::new())]),
            ..Default::default()
        },
    );

    let onsubmit = {
        let form = (*form).clone();
        let submitted_email = submitted_email.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();

            let email = form.value("email");
            if email.trim().is_empty() {
                form.set_error("email", Some("Email is required".to_string()));
                return;
            }
            if !is_valid_email(&email) {
                form.set_error(
                    "email",
                    Some("Please enter a valid email address".to_string()),
                );
                return;
            }

            let form = form.clone();
            let submitted_email = submitted_email.clone();
            yew::platform::spawn_local(async move {
                if form.submit(FormValues::new()).await.is_ok() {
                    submitted_email.set(Some(email));
                }
            });
        })
    };

    let try_again = {
        let form = (*form).clone();
        let submitted_email = submitted_email.clone();
        Callback::from(move |_: MouseEvent| {
            form.reset();
            submitted_email.set(None);
        })
    };

    if let Some(email) = (*submitted_email).clone() {
        return html! {
            <div class="flex items-center justify-center min-h-screen px-4">
                <div class="max-w-md w-full bg-white dark:bg-neutral-800 border border-neutral-200 dark:border-neutral-700 rounded-lg p-6 space-y-4 text-center">
                    <h1 class="text-2xl font-bold text-neutral-900 dark:text-white">
                        {"Check your email"}
                    </h1>
                    <p class="text-neutral-600 dark:text-neutral-400">
                        {"We've sent a password reset link to "}
                        <span class="font-medium text-neutral-900 dark:text-white">{email}</span>
                    </p>
                    <p class="text-sm text-neutral-600 dark:text-neutral-400">
                        {"Didn't receive the email? Check your spam folder or "}
                        <button onclick={try_again} class="font-medium underline">
                            {"try another email address"}
                        </button>
                    </p>
                    <Link<Route> to={Route::Login} classes="inline-block font-medium text-neutral-900 dark:text-neutral-100 underline">
                        {"Back to Login"}
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
                        {"Reset your password"}
                    </h1>
                    <p class="text-neutral-600 dark:text-neutral-400">
                        {"Enter your email address and we'll send you a link to reset your password."}
                    </p>
                </div>

                <form {onsubmit} class="bg-white dark:bg-neutral-800 border border-neutral-200 dark:border-neutral-700 rounded-lg p-6 space-y-4">
                    if let Some(error) = form.general_error() {
                        <ErrorBanner message={error} />
                    }

                    <div>
                        <label for="email" class="block text-sm font-medium text-neutral-700 dark:text-neutral-300 mb-2">
                            {"Email address"}
                        </label>
                        <input
                            type="email"
                            id="email"
                            placeholder="Enter your email address"
                            value={form.value("email")}
                            oninput={form.oninput("email")}
                            class={INPUT_CLASS}
                        />
                        if let Some(error) = form.field_error("email") {
                            <p class="text-xs text-red-600 dark:text-red-400 mt-1">{error}</p>
                        }
                    </div>

                    <button
                        type="submit"
                        disabled={form.submitting()}
                        class={PRIMARY_BUTTON_CLASS}
                    >
                        {if form.submitting() { "Sending..." } else { "Send Reset Link" }}
                    </button>
                </form>

                <p class="text-center text-sm">
                    <Link<Route> to={Route::Login} classes="font-medium text-neutral-900 dark:text-neutral-100 underline">
                        {"Back to Login"}
                    </Link<Route>>
                </p>
            </div>
        </div>
    }
}
