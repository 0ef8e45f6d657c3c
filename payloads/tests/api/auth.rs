use payloads::responses::StoredUser;
use payloads::{ClientError, CredentialStore, Role};
use reqwest::StatusCode;
use test_helpers::{assert_status_code, spawn_app, user_credentials};
use test_helpers::mock::USER_EMAIL;

#[tokio::test]
async fn login_stores_token_and_user() -> anyhow::Result<()> {
    let app = spawn_app().await;

    let envelope = app.client.auth().login(&user_credentials()).await?;

    assert_eq!(envelope.message.as_deref(), Some("Login successful"));
    assert_eq!(envelope.email, USER_EMAIL);
    assert_eq!(envelope.role, Role::User);
    assert!(app.credentials.has_token());
    assert_eq!(app.credentials.saves(), 1);

    let stored: StoredUser =
        serde_json::from_str(&app.credentials.user_data().expect("user data"))?;
    assert_eq!(stored, envelope.into_inner());

    let profile = app.client.auth().me().await?;
    assert_eq!(profile.email, USER_EMAIL);
    assert_eq!(profile.name, "Riley");

    Ok(())
}

#[tokio::test]
async fn logout_clears_credentials() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_user().await?;

    app.client.auth().logout().await?;

    assert!(!app.credentials.has_token());
    assert_eq!(app.credentials.user_data(), None);
    // The server forgot the session too.
    assert!(app.backend.state().sessions.is_empty());

    Ok(())
}

#[tokio::test]
async fn logout_clears_credentials_even_when_rejected() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_user().await?;
    app.expire_sessions();

    let result = app.client.auth().logout().await;

    assert!(matches!(result, Err(ClientError::SessionExpired)));
    assert!(!app.credentials.has_token());

    Ok(())
}

#[tokio::test]
async fn password_reset_flow() -> anyhow::Result<()> {
    let app = spawn_app().await;

    let sent = app
        .client
        .auth()
        .request_password_reset(USER_EMAIL)
        .await?;
    assert!(sent.message.is_some());
    let token = app.reset_token_for(USER_EMAIL).expect("token issued");

    let valid = app.client.auth().validate_reset_token(&token).await?;
    assert!(*valid);

    app.client.auth().reset_password(&token, "brand-new-pw").await?;

    // The token is single use.
    let valid = app.client.auth().validate_reset_token(&token).await?;
    assert!(!*valid);
    let again = app.client.auth().reset_password(&token, "another-pw").await;
    assert_status_code(again, StatusCode::BAD_REQUEST);

    // Old password no longer works, new one does.
    let old = app.client.auth().login(&user_credentials()).await;
    assert_status_code(old, StatusCode::UNAUTHORIZED);
    let mut credentials = user_credentials();
    credentials.password = "brand-new-pw".into();
    app.client.auth().login(&credentials).await?;

    Ok(())
}

#[tokio::test]
async fn unknown_address_gets_the_same_answer() -> anyhow::Result<()> {
    let app = spawn_app().await;

    let known = app.client.auth().request_password_reset(USER_EMAIL).await?;
    let unknown = app
        .client
        .auth()
        .request_password_reset("nobody@example.com")
        .await?;

    assert_eq!(known.message, unknown.message);
    assert_eq!(app.reset_token_for("nobody@example.com"), None);

    Ok(())
}

#[tokio::test]
async fn short_reset_password_is_rejected() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.client.auth().request_password_reset(USER_EMAIL).await?;
    let token = app.reset_token_for(USER_EMAIL).expect("token issued");

    let result = app.client.auth().reset_password(&token, "abc").await;

    let error = result.expect_err("too short");
    assert_eq!(error.status(), Some(StatusCode::BAD_REQUEST));
    assert_eq!(
        error.errors(),
        Some(&["newPassword: must be at least 6 characters".to_string()][..])
    );

    Ok(())
}
