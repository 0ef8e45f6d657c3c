use payloads::{ClientError, CredentialStore, ErrorDetails};
use reqwest::StatusCode;
use serde_json::Value;
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;
use test_helpers::{
    assert_status_code, silent_client, spawn_app, unreachable_client,
};

#[tokio::test]
async fn token_is_attached_to_protected_requests() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;

    app.client.surveys().get_all_surveys().await?;

    let request = app
        .requests_to("/surveys/admin")
        .pop()
        .expect("request recorded");
    let header = request.authorization.expect("authorization header");
    assert!(header.starts_with("Bearer "));
    assert!(header.len() > "Bearer ".len());

    Ok(())
}

#[tokio::test]
async fn auth_endpoints_go_out_without_token() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;

    app.client.auth().request_password_reset("nobody@example.com").await?;
    app.client.auth().validate_reset_token("not-a-token").await?;

    for path in [
        "/auth/forgot-password",
        "/auth/reset-password/validate/not-a-token",
    ] {
        let request = app.requests_to(path).pop().expect("request recorded");
        assert_eq!(request.authorization, None, "{path}");
    }

    // The session endpoints still carry it.
    app.client.auth().me().await?;
    let request = app.requests_to("/auth/me").pop().expect("request recorded");
    assert!(request.authorization.is_some());

    Ok(())
}

#[tokio::test]
async fn unauthorized_clears_credentials_and_notifies_once() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;
    assert!(app.credentials.has_token());

    let notified = Rc::new(Cell::new(0));
    let counter = notified.clone();
    let _subscription = app
        .session_events
        .subscribe(move || counter.set(counter.get() + 1));

    app.expire_sessions();
    let result = app.client.surveys().get_all_surveys().await;

    assert!(matches!(result, Err(ClientError::SessionExpired)));
    assert!(!app.credentials.has_token());
    assert_eq!(app.credentials.clears(), 1);
    assert_eq!(notified.get(), 1);

    Ok(())
}

#[tokio::test]
async fn rejected_login_is_not_a_session_expiry() -> anyhow::Result<()> {
    let app = spawn_app().await;

    let notified = Rc::new(Cell::new(0));
    let counter = notified.clone();
    let _subscription = app
        .session_events
        .subscribe(move || counter.set(counter.get() + 1));

    let mut credentials = test_helpers::admin_credentials();
    credentials.password = "wrong".into();
    let result = app.client.auth().login(&credentials).await;

    match result {
        Err(ClientError::Server { status, message, .. }) => {
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert_eq!(message, "Invalid credentials: wrong email or password");
        }
        other => panic!("Expected a server error, got {other:?}"),
    }
    assert_eq!(notified.get(), 0);
    assert_eq!(app.credentials.clears(), 0);

    Ok(())
}

#[tokio::test]
async fn dropped_subscription_is_not_notified() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;

    let notified = Rc::new(Cell::new(0));
    let counter = notified.clone();
    let subscription = app
        .session_events
        .subscribe(move || counter.set(counter.get() + 1));
    drop(subscription);

    let result: Result<payloads::Envelope<Value>, _> =
        app.client.get("/status/401").await;
    assert!(matches!(result, Err(ClientError::SessionExpired)));
    assert_eq!(notified.get(), 0);
    assert_eq!(app.session_events.subscriber_count(), 0);

    Ok(())
}

#[tokio::test]
async fn statuses_map_to_error_kinds() -> anyhow::Result<()> {
    let app = spawn_app().await;

    let get = |code: u16| {
        let client = app.client.clone();
        async move {
            client
                .get::<Value>(&format!("/status/{code}"))
                .await
                .map(|envelope| envelope.into_inner())
        }
    };

    assert!(matches!(get(403).await, Err(ClientError::PermissionDenied)));
    assert!(matches!(get(404).await, Err(ClientError::NotFound)));
    assert!(matches!(get(500).await, Err(ClientError::Internal)));

    match get(422).await {
        Err(ClientError::Validation { message, errors }) => {
            assert_eq!(message, "Injected failure 422");
            assert_eq!(errors, Some(vec!["status: injected".to_string()]));
        }
        other => panic!("Expected a validation error, got {other:?}"),
    }

    let error = get(409).await.expect_err("conflict");
    assert_eq!(error.to_string(), "Injected failure 409");
    let details = ErrorDetails::from(&error);
    assert_eq!(details.status, Some(409));
    assert_eq!(details.errors, Some(vec!["status: injected".to_string()]));

    assert_status_code(get(503).await, StatusCode::SERVICE_UNAVAILABLE);

    Ok(())
}

#[tokio::test]
async fn missing_server_is_a_network_error() -> anyhow::Result<()> {
    let client = unreachable_client();

    let result = client.surveys().get_survey_list().await;

    let error = result.expect_err("nothing is listening");
    assert!(matches!(error, ClientError::Network(_)));
    assert_eq!(error.status(), None);
    assert_eq!(
        error.to_string(),
        "Network error. Please check your connection."
    );
    // A transport failure is not a session expiry.
    assert!(client.credentials().token().is_some());

    Ok(())
}

#[tokio::test]
async fn unanswered_request_times_out_as_network_error() -> anyhow::Result<()> {
    let client = silent_client(Duration::from_millis(300)).await;

    let result = tokio::time::timeout(
        Duration::from_secs(5),
        client.surveys().get_survey_list(),
    )
    .await?;

    let error = result.expect_err("server never answers");
    assert!(matches!(error, ClientError::Network(_)));
    assert_eq!(
        error.to_string(),
        "Network error. Please check your connection."
    );
    assert!(client.credentials().token().is_some());

    Ok(())
}

#[tokio::test]
async fn envelope_metadata_is_kept() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;

    let surveys = app.client.surveys().get_all_surveys().await?;

    assert_eq!(surveys.message.as_deref(), Some("Retrieved 2 surveys"));
    assert!(surveys.timestamp.is_some());
    assert_eq!(surveys.len(), 2);

    Ok(())
}
