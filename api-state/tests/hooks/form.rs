use api_state::{ApiForm, FormOptions, FormValues, SubmitResult};
use payloads::requests::CreateUser;
use payloads::responses::User;
use payloads::{ClientError, Envelope};
use std::cell::Cell;
use std::rc::Rc;
use test_helpers::spawn_app;

fn values(pairs: &[(&str, &str)]) -> FormValues {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn signup_form(
    app: &test_helpers::TestApp,
    options: FormOptions<User>,
) -> ApiForm<User> {
    let client = app.client.clone();
    ApiForm::new(
        move |values: FormValues| {
            let client = client.clone();
            async move {
                let field = |name: &str| {
                    values.get(name).cloned().unwrap_or_default()
                };
                let details = CreateUser {
                    name: field("name"),
                    email: field("email"),
                    password: field("password"),
                };
                client.users().create_user(&details).await
            }
        },
        options,
    )
}

#[tokio::test]
async fn successful_submit_resets_when_asked() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let successes = Rc::new(Cell::new(0));
    let counter = successes.clone();
    let form = signup_form(
        &app,
        FormOptions {
            initial_values: values(&[("name", ""), ("email", ""), ("password", "")]),
            reset_on_success: true,
            on_success: Some(Rc::new(move |_: &Envelope<User>| {
                counter.set(counter.get() + 1)
            })),
            ..FormOptions::default()
        },
    );
    form.set_value("name", "Quinn");
    form.set_value("email", "quinn@example.com");
    assert!(form.can_submit());

    let user = form
        .submit(values(&[("password", "sesame-123")]))
        .await?;

    assert_eq!(user.name, "Quinn");
    assert_eq!(successes.get(), 1);
    assert_eq!(form.value("email"), "");
    assert_eq!(form.submit_count(), 0);
    assert!(form.last_submit_result().is_none());
    assert!(!form.submitting());

    Ok(())
}

#[tokio::test]
async fn server_field_errors_land_on_fields() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let form = signup_form(&app, FormOptions::default());
    form.set_value("name", "Duplicate");
    form.set_value("email", test_helpers::mock::USER_EMAIL);
    form.set_value("password", "sesame-123");

    let result = form.submit(FormValues::new()).await;

    assert!(result.is_err());
    assert_eq!(form.field_error("email").as_deref(), Some("must be unique"));
    assert_eq!(form.general_error(), None);
    assert!(form.has_errors());
    assert!(!form.can_submit());
    assert_eq!(form.submit_count(), 1);
    // Values survive a failed submit.
    assert_eq!(form.value("name"), "Duplicate");
    match form.last_submit_result() {
        Some(SubmitResult::Failure { error, errors }) => {
            assert_eq!(error, "User registration failed");
            assert_eq!(errors, Some(vec!["email: must be unique".to_string()]));
        }
        other => panic!("Expected a failure, got {other:?}"),
    }

    // Editing the field clears its error.
    form.set_value("email", "fresh@example.com");
    assert_eq!(form.field_error("email"), None);
    form.submit(FormValues::new()).await?;
    assert!(matches!(
        form.last_submit_result(),
        Some(SubmitResult::Success { .. })
    ));

    Ok(())
}

#[tokio::test]
async fn failure_without_error_list_is_general() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let client = app.client.clone();
    let form: ApiForm<User> = ApiForm::new(
        move |_: FormValues| {
            let client = client.clone();
            async move { client.get::<User>("/status/500").await }
        },
        FormOptions::default(),
    );

    let result = form.submit(FormValues::new()).await;

    assert!(matches!(result, Err(ClientError::Internal)));
    assert_eq!(
        form.general_error().as_deref(),
        Some("Internal server error. Please try again later.")
    );

    Ok(())
}

#[tokio::test]
async fn overrides_reach_the_submitter_without_being_stored()
-> anyhow::Result<()> {
    let app = spawn_app().await;
    app.client
        .auth()
        .request_password_reset(test_helpers::mock::USER_EMAIL)
        .await?;
    let token = app
        .reset_token_for(test_helpers::mock::USER_EMAIL)
        .expect("token issued");

    let client = app.client.clone();
    let form: ApiForm<()> = ApiForm::new(
        move |values: FormValues| {
            let client = client.clone();
            async move {
                let field = |name: &str| {
                    values.get(name).cloned().unwrap_or_default()
                };
                client
                    .auth()
                    .reset_password(&field("token"), &field("password"))
                    .await
            }
        },
        FormOptions {
            initial_values: values(&[("password", "")]),
            ..FormOptions::default()
        },
    );
    form.set_value("password", "brand-new-pw");

    let stale = form.submit(values(&[("token", "stale-token")])).await;
    assert!(stale.is_err());

    form.submit(values(&[("token", token.as_str())])).await?;
    assert_eq!(form.value("token"), "");
    assert!(!*app.client.auth().validate_reset_token(&token).await?);

    Ok(())
}
