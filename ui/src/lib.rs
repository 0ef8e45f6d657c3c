use payloads::{ApiClient, ClientConfig, SessionEvents};
use std::rc::Rc;
use yew::prelude::*;
use yew_router::prelude::*;

pub mod components;
pub mod hooks;
mod logs;
pub mod pages;
pub mod state;
pub mod storage;

pub use state::{AuthState, State};
use storage::BrowserCredentials;

thread_local! {
    static SESSION_EVENTS: SessionEvents = SessionEvents::new();
}

/// The app-wide session-expired event. Every client built by
/// [`get_api_client`] reports into it.
pub fn session_events() -> SessionEvents {
    SESSION_EVENTS.with(SessionEvents::clone)
}

// Global API client, configured at build time via SURVEY_BACKEND_URL
pub fn get_api_client() -> ApiClient {
    ApiClient::new(
        ClientConfig::from_env(),
        Rc::new(BrowserCredentials),
        session_events(),
    )
}

#[derive(Clone, Routable, PartialEq)]
pub enum Route {
    #[at("/")]
    Home,
    #[at("/login")]
    Login,
    #[at("/forgot")]
    ForgotPassword,
    #[at("/reset-password/:token")]
    ResetPassword { token: String },
    #[at("/admin/dashboard")]
    Surveys,
    #[not_found]
    #[at("/404")]
    NotFound,
}

#[function_component]
pub fn App() -> Html {
    logs::init_logging();
    html! {
        <BrowserRouter>
            <div class="min-h-screen bg-neutral-50 dark:bg-neutral-900 text-neutral-900 dark:text-neutral-100 transition-colors">
                <AppRoutes />
            </div>
        </BrowserRouter>
    }
}

/// Routes plus the app-wide hooks that need the router.
#[function_component]
fn AppRoutes() -> Html {
    hooks::use_authentication();
    hooks::use_session_expired();

    html! {
        <Switch<Route> render={switch} />
    }
}

fn switch(routes: Route) -> Html {
    match routes {
        Route::Home => html! { <Redirect<Route> to={Route::Surveys} /> },
        Route::Login => html! { <pages::LoginPage /> },
        Route::ForgotPassword => html! { <pages::ForgotPasswordPage /> },
        Route::ResetPassword { token } => {
            html! { <pages::ResetPasswordPage {token} /> }
        }
        Route::Surveys => html! {
            <main class="max-w-7xl mx-auto px-4 sm:px-6 lg:px-8 py-8">
                <pages::SurveysPage />
            </main>
        },
        Route::NotFound => html! {
            <main class="max-w-7xl mx-auto px-4 sm:px-6 lg:px-8 py-8">
                <pages::NotFoundPage />
            </main>
        },
    }
}
