use payloads::requests::{CreateUser, SubmitResponse, SurveyDraft, UpdateUser};
use payloads::services::{DEFAULT_TREND_DAYS, format_survey};
use payloads::{Answer, ClientError, QuestionId, SurveyId, SurveyStatus};
use reqwest::StatusCode;
use test_helpers::{
    assert_status_code, spawn_app, survey_draft_a, survey_draft_b,
};

#[tokio::test]
async fn survey_lifecycle() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;

    let created = app.client.surveys().create_survey(&survey_draft_a()).await?;
    assert_eq!(created.title, survey_draft_a().title);
    assert_eq!(created.status, SurveyStatus::Active);
    let id = created.id;

    let fetched = app.client.surveys().get_survey(id).await?;
    assert_eq!(fetched.title, created.title);

    let updated = app
        .client
        .surveys()
        .update_survey(id, &survey_draft_b())
        .await?;
    assert_eq!(updated.title, survey_draft_b().title);
    assert_eq!(updated.status, SurveyStatus::Inactive);

    let all = app.client.surveys().get_all_surveys().await?;
    assert_eq!(all.len(), 3);

    app.client.surveys().delete_survey(id).await?;
    let result = app.client.surveys().get_survey(id).await;
    assert!(matches!(result, Err(ClientError::NotFound)));

    Ok(())
}

#[tokio::test]
async fn blank_title_is_a_validation_error() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;

    let draft = SurveyDraft {
        title: "   ".into(),
        ..survey_draft_a()
    };
    let result = app.client.surveys().create_survey(&draft).await;

    match result {
        Err(ClientError::Validation { message, errors }) => {
            assert_eq!(message, "Validation failed");
            assert_eq!(errors, Some(vec!["title: must not be blank".into()]));
        }
        other => panic!("Expected a validation error, got {other:?}"),
    }

    Ok(())
}

#[tokio::test]
async fn regular_users_cannot_manage_surveys() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_user().await?;

    let result = app.client.surveys().create_survey(&survey_draft_a()).await;
    assert!(matches!(result, Err(ClientError::PermissionDenied)));
    // Forbidden leaves the session alone.
    assert!(app.credentials.has_token());

    Ok(())
}

#[tokio::test]
async fn results_and_stats_reflect_responses() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;
    let survey_id = SurveyId(1);

    let submission = SubmitResponse {
        answers: vec![Answer {
            question_id: QuestionId(1),
            answer_value: Some("Friendly staff".into()),
            rating_value: None,
        }],
        respondent_name: None,
    };
    app.client
        .responses()
        .submit_survey_response(survey_id, &submission)
        .await?;

    let stats = app.client.surveys().get_survey_stats(survey_id).await?;
    assert_eq!(stats.total_responses, 2);
    assert_eq!(stats.total_questions, 2);
    // One of the two responses answered every question.
    assert_eq!(stats.completion_rate, 50);

    let results = app.client.surveys().get_survey_results(survey_id).await?;
    let first = &results.question_results[0];
    assert_eq!(first.total_answers, 2);
    assert_eq!(results.total_responses, 2);

    let by_survey = app
        .client
        .surveys()
        .get_survey_responses(survey_id)
        .await?;
    assert_eq!(by_survey.len(), 2);

    Ok(())
}

#[tokio::test]
async fn draft_surveys_refuse_responses() -> anyhow::Result<()> {
    let app = spawn_app().await;

    let submission = SubmitResponse {
        answers: vec![Answer {
            question_id: QuestionId(1),
            answer_value: Some("hi".into()),
            rating_value: None,
        }],
        respondent_name: Some("Sam".into()),
    };
    let result = app
        .client
        .surveys()
        .submit_response(SurveyId(2), &submission)
        .await;
    assert_status_code(result, StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
async fn responses_can_be_listed_counted_and_deleted() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;

    let count = app.client.responses().get_response_count().await?;
    assert_eq!(*count, 1);

    let all = app.client.responses().get_all_responses().await?;
    let id = all[0].id;
    let one = app.client.responses().get_response(id).await?;
    assert_eq!(one.respondent_name.as_deref(), Some("Riley"));

    app.client.responses().delete_response(id).await?;
    let count = app.client.responses().get_response_count().await?;
    assert_eq!(*count, 0);

    Ok(())
}

#[tokio::test]
async fn user_registration_and_profile() -> anyhow::Result<()> {
    let app = spawn_app().await;

    let details = CreateUser {
        email: "new@example.com".into(),
        password: "secret-pw".into(),
        name: "Nova".into(),
    };
    let created = app.client.users().create_user(&details).await?;
    // Registration is anonymous.
    let request = app.requests_to("/users/create").pop().expect("recorded");
    assert_eq!(request.authorization, None);

    let duplicate = app.client.users().create_user(&details).await;
    let error = duplicate.expect_err("email taken");
    assert_eq!(error.status(), Some(StatusCode::BAD_REQUEST));
    assert_eq!(error.errors(), Some(&["email: must be unique".to_string()][..]));

    let mut login = test_helpers::user_credentials();
    login.email = details.email.clone();
    login.password = details.password.clone();
    app.client.auth().login(&login).await?;

    let profile = app.client.users().get_user_profile(created.id).await?;
    assert_eq!(profile.name, "Nova");

    let update = UpdateUser {
        name: Some("Nova Prime".into()),
        email: None,
    };
    let updated = app.client.users().update_user(created.id, &update).await?;
    assert_eq!(updated.name, "Nova Prime");
    assert_eq!(updated.email, "new@example.com");

    Ok(())
}

#[tokio::test]
async fn dashboard_and_own_response() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_user().await?;

    let dashboard = app.client.users().get_user_dashboard().await?;
    assert_eq!(dashboard.stats.completed_surveys_count, 1);
    assert_eq!(dashboard.completed_surveys[0].title, "Customer Satisfaction");

    let own = app.client.users().get_user_response(SurveyId(1)).await?;
    assert_eq!(own.answers.len(), 2);
    assert_eq!(own.answers[1].rating_value, Some(5));
    assert_eq!(own.answers[1].question_type, "rating");

    let missing = app.client.users().get_user_response(SurveyId(2)).await;
    assert!(matches!(missing, Err(ClientError::NotFound)));

    Ok(())
}

#[tokio::test]
async fn analytics_endpoints() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;
    let analytics = app.client.analytics();

    let trends = analytics.get_response_trends(Some(7)).await?;
    assert_eq!(trends.len(), 7);
    let request = app
        .requests_to("/analytics/response-trends")
        .pop()
        .expect("recorded");
    assert_eq!(request.query_param("days"), Some("7"));

    let activity = analytics.get_recent_activity(Some(2)).await?;
    assert_eq!(activity.len(), 2);

    let recent = analytics.get_recent_responses(Some(5)).await?;
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].user_name, "Riley");
    assert!(!recent[0].is_anonymous);

    let overview = analytics.get_dashboard_overview().await?;
    assert_eq!(overview.total_surveys, 2);
    assert_eq!(overview.active_surveys, 1);
    assert_eq!(overview.responses_this_week, 1);

    let performance = analytics.get_survey_performance().await?;
    assert_eq!(performance[0].survey_id, SurveyId(1));

    Ok(())
}

#[tokio::test]
async fn analytics_queries_fall_back_to_defaults() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;
    let analytics = app.client.analytics();

    let trends = analytics.get_response_trends(None).await?;
    assert_eq!(trends.len(), DEFAULT_TREND_DAYS as usize);

    analytics.get_recent_activity(None).await?;
    analytics.get_recent_responses(None).await?;

    let param = |path: &str, name: &str| {
        app.requests_to(path)
            .pop()
            .and_then(|r| r.query_param(name).map(str::to_string))
    };
    assert_eq!(
        param("/analytics/response-trends", "days").as_deref(),
        Some("30")
    );
    assert_eq!(
        param("/analytics/recent-activity", "limit").as_deref(),
        Some("50")
    );
    assert_eq!(
        param("/analytics/recent-responses", "limit").as_deref(),
        Some("5")
    );

    Ok(())
}

#[tokio::test]
async fn listed_surveys_format_for_display() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;

    let surveys = app.client.surveys().get_survey_list().await?;
    let formatted = format_survey(&surveys[0], &jiff::tz::TimeZone::UTC);

    assert_eq!(formatted.status_display, "Active");
    assert_eq!(formatted.responses_summary, "1 responses");
    assert_eq!(formatted.completion_display, "100%");

    Ok(())
}
