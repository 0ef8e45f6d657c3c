use api_state::{ApiPagination, PaginationOptions};
use payloads::requests::SubmitResponse;
use payloads::responses::{Survey, SurveyResponse};
use payloads::{Answer, ClientError, QuestionId, SurveyId};
use test_helpers::{TestApp, spawn_app};

/// Add `n` more responses to the seeded survey.
async fn add_responses(app: &TestApp, n: usize) -> anyhow::Result<()> {
    for i in 0..n {
        let submission = SubmitResponse {
            answers: vec![Answer {
                question_id: QuestionId(1),
                answer_value: Some(format!("answer {i}")),
                rating_value: None,
            }],
            respondent_name: None,
        };
        app.client
            .surveys()
            .submit_response(SurveyId(1), &submission)
            .await?;
    }
    Ok(())
}

fn responses(app: &TestApp, page_size: u32) -> ApiPagination<SurveyResponse> {
    ApiPagination::new(
        app.client.clone(),
        "/responses",
        PaginationOptions {
            page_size,
            ..PaginationOptions::default()
        },
    )
}

#[tokio::test]
async fn walks_pages_and_stops_at_the_ends() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;
    add_responses(&app, 4).await?;
    let pages = responses(&app, 2);

    // Nothing loaded yet, so there is nowhere to go.
    let before = app.request_count();
    assert_eq!(pages.next_page().await?, None);
    assert_eq!(app.request_count(), before);

    pages.mount().await?;
    assert_eq!(pages.data().len(), 2);
    let meta = pages.pagination();
    assert_eq!(meta.total_pages, 3);
    assert_eq!(meta.total_elements, 5);
    assert!(pages.can_go_next());
    assert!(!pages.can_go_previous());
    let request = app.requests_to("/responses").pop().expect("recorded");
    assert_eq!(request.query_param("page"), Some("0"));
    assert_eq!(request.query_param("size"), Some("2"));

    assert_eq!(pages.next_page().await?.map(|d| d.len()), Some(2));
    assert_eq!(pages.next_page().await?.map(|d| d.len()), Some(1));
    assert!(pages.pagination().last);

    let before = app.request_count();
    assert_eq!(pages.next_page().await?, None);
    assert_eq!(pages.go_to_page(3).await?, None);
    assert_eq!(app.request_count(), before);

    assert!(pages.previous_page().await?.is_some());
    assert_eq!(pages.pagination().current_page, 1);
    assert!(pages.go_to_page(0).await?.is_some());
    assert_eq!(pages.previous_page().await?, None);

    Ok(())
}

#[tokio::test]
async fn extra_params_override_configured_ones() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;
    let pages: ApiPagination<SurveyResponse> = ApiPagination::new(
        app.client.clone(),
        "/responses",
        PaginationOptions {
            params: vec![("size".into(), "7".into()), ("sort".into(), "asc".into())],
            ..PaginationOptions::default()
        },
    );

    pages
        .fetch_page(0, 20, &[("sort".into(), "desc".into())])
        .await?;

    let request = app.requests_to("/responses").pop().expect("recorded");
    assert_eq!(request.query_param("size"), Some("7"));
    assert_eq!(request.query_param("sort"), Some("desc"));

    Ok(())
}

#[tokio::test]
async fn bare_sequence_is_a_single_page() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;
    let pages: ApiPagination<Survey> = ApiPagination::new(
        app.client.clone(),
        "/surveys",
        PaginationOptions::default(),
    );

    let surveys = pages.refresh().await?;

    assert_eq!(surveys.len(), 2);
    let meta = pages.pagination();
    assert_eq!(meta.total_pages, 1);
    assert_eq!(meta.total_elements, 2);
    assert!(meta.first && meta.last);
    let before = app.request_count();
    assert_eq!(pages.next_page().await?, None);
    assert_eq!(app.request_count(), before);

    Ok(())
}

#[tokio::test]
async fn object_without_page_shape_is_an_error() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;
    let pages: ApiPagination<Survey> = ApiPagination::new(
        app.client.clone(),
        "/analytics/overview",
        PaginationOptions::default(),
    );

    let result = pages.refresh().await;

    assert!(matches!(result, Err(ClientError::UnexpectedFormat)));
    assert_eq!(
        pages.error_message().as_deref(),
        Some("Unexpected response format")
    );
    assert!(!pages.loading());
    assert!(!pages.has_data());

    Ok(())
}
