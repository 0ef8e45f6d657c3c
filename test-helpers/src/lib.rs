pub mod mock;
pub mod telemetry;

use actix_web::web;
use mock::{
    ADMIN_EMAIL, MockBackend, RecordedRequest, SEED_PASSWORD, USER_EMAIL,
};
use payloads::requests::{LoginCredentials, SurveyDraft};
use payloads::responses::StoredUser;
use payloads::{
    ApiClient, ClientConfig, ClientError, CredentialStore,
    MemoryCredentials, SessionEvents, SurveyStatus,
};
use reqwest::StatusCode;
use secrecy::SecretBox;
use std::cell::Cell;
use std::net::TcpListener;
use std::rc::Rc;
use std::time::Duration;
use tracing_log::LogTracer;
use tracing_subscriber::util::SubscriberInitExt;

pub struct TestApp {
    #[allow(unused)]
    pub port: u16,
    pub client: ApiClient,
    pub credentials: Rc<RecordingCredentials>,
    pub session_events: SessionEvents,
    pub backend: web::Data<MockBackend>,
}

/// In-memory credentials that count how often they were written and cleared.
#[derive(Default)]
pub struct RecordingCredentials {
    inner: MemoryCredentials,
    saves: Cell<usize>,
    clears: Cell<usize>,
}

impl RecordingCredentials {
    pub fn saves(&self) -> usize {
        self.saves.get()
    }

    pub fn clears(&self) -> usize {
        self.clears.get()
    }

    pub fn has_token(&self) -> bool {
        self.inner.token().is_some()
    }
}

impl CredentialStore for RecordingCredentials {
    fn token(&self) -> Option<SecretBox<String>> {
        self.inner.token()
    }

    fn user_data(&self) -> Option<String> {
        self.inner.user_data()
    }

    fn save(&self, token: &SecretBox<String>, user_data: &str) {
        self.saves.set(self.saves.get() + 1);
        self.inner.save(token, user_data);
    }

    fn clear(&self) {
        self.clears.set(self.clears.get() + 1);
        self.inner.clear();
    }
}

/// Functions to drive the app into a known state.
///
/// Using anyhow::Result lets us get a backtrace from when the error was first
/// converted to anyhow::Result. Run with RUST_BACKTRACE=1 to view.
impl TestApp {
    pub async fn login_admin(&self) -> anyhow::Result<StoredUser> {
        let envelope = self.client.auth().login(&admin_credentials()).await?;
        Ok(envelope.into_inner())
    }

    pub async fn login_user(&self) -> anyhow::Result<StoredUser> {
        let envelope = self.client.auth().login(&user_credentials()).await?;
        Ok(envelope.into_inner())
    }

    /// The outstanding password reset token issued to `email`, as it would
    /// arrive by mail.
    pub fn reset_token_for(&self, email: &str) -> Option<String> {
        let state = self.backend.state();
        let user_id = state
            .users
            .iter()
            .find(|u| u.user.email == email)
            .map(|u| u.user.id)?;
        state
            .reset_tokens
            .iter()
            .find(|(_, owner)| **owner == user_id)
            .map(|(token, _)| token.clone())
    }

    /// Invalidate every issued token on the server side, so the next
    /// authenticated request answers 401.
    pub fn expire_sessions(&self) {
        self.backend.state().sessions.clear();
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.backend.requests()
    }

    pub fn request_count(&self) -> usize {
        self.backend.request_count()
    }

    /// Requests received for `path` (below `/api`).
    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        let full = format!("/api{path}");
        self.requests()
            .into_iter()
            .filter(|request| request.path == full)
            .collect()
    }
}

pub async fn spawn_app_on_port(port: u16) -> TestApp {
    dotenvy::dotenv().ok();
    let subscriber = telemetry::get_subscriber("error".into());
    let _ = LogTracer::init();
    let _ = subscriber.try_init();

    let backend = web::Data::new(MockBackend::default());
    let (server, port) = mock::build(port, backend.clone()).unwrap();
    tokio::spawn(server);

    let credentials = Rc::new(RecordingCredentials::default());
    let session_events = SessionEvents::new();
    let config = ClientConfig::new(format!("http://127.0.0.1:{port}/api"));
    let client =
        ApiClient::new(config, credentials.clone(), session_events.clone());

    TestApp {
        port,
        client,
        credentials,
        session_events,
        backend,
    }
}

/// Use OS-assigned port for parallel testing.
pub async fn spawn_app() -> TestApp {
    spawn_app_on_port(0).await
}

/// A client aimed at a port nothing listens on.
pub fn unreachable_client() -> ApiClient {
    let port = TcpListener::bind("127.0.0.1:0")
        .and_then(|listener| listener.local_addr())
        .map(|addr| addr.port())
        .unwrap();
    ApiClient::new(
        ClientConfig::new(format!("http://127.0.0.1:{port}/api")),
        Rc::new(MemoryCredentials::with_token("stale")),
        SessionEvents::new(),
    )
}

/// A client aimed at a server that accepts connections and never answers.
pub async fn silent_client(timeout: Duration) -> ApiClient {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    let mut config = ClientConfig::new(format!("http://127.0.0.1:{port}/api"));
    config.timeout = timeout;
    ApiClient::new(
        config,
        Rc::new(MemoryCredentials::with_token("live")),
        SessionEvents::new(),
    )
}

/// Assert that the result of an API action results in a specific status code.
pub fn assert_status_code<T: std::fmt::Debug>(
    result: Result<T, ClientError>,
    expected: StatusCode,
) {
    match result {
        Err(error) => assert_eq!(error.status(), Some(expected), "{error:?}"),
        Ok(value) => panic!("Expected an error status, got {value:?}"),
    };
}

pub fn admin_credentials() -> LoginCredentials {
    LoginCredentials {
        email: ADMIN_EMAIL.into(),
        password: SEED_PASSWORD.into(),
    }
}

pub fn user_credentials() -> LoginCredentials {
    LoginCredentials {
        email: USER_EMAIL.into(),
        password: SEED_PASSWORD.into(),
    }
}

pub fn survey_draft_a() -> SurveyDraft {
    SurveyDraft {
        title: "Onboarding experience".into(),
        description: "Tell us how your first week went".into(),
        status: Some(SurveyStatus::Active),
        end_date: None,
    }
}

pub fn survey_draft_b() -> SurveyDraft {
    SurveyDraft {
        title: "Onboarding experience, revised".into(),
        description: "Second iteration".into(),
        status: Some(SurveyStatus::Inactive),
        end_date: None,
    }
}

