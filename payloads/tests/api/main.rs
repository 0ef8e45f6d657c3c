mod auth;
mod client;
mod services;

use test_helpers::spawn_app;

#[tokio::test]
async fn seeded_backend_answers() -> anyhow::Result<()> {
    let app = spawn_app().await;

    let survey = app
        .client
        .surveys()
        .get_public_survey(payloads::SurveyId(1))
        .await?;
    assert_eq!(survey.title, "Customer Satisfaction");
    assert_eq!(survey.questions.len(), 2);

    Ok(())
}
