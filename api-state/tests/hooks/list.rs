use api_state::{ApiList, ListOptions};
use payloads::responses::Survey;
use payloads::{ClientError, SurveyId, SurveyStatus};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use test_helpers::{spawn_app, survey_draft_a, survey_draft_b};

#[tokio::test]
async fn list_mirrors_the_server() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;
    let events = Rc::new(RefCell::new(Vec::new()));
    let (created, updated, deleted) =
        (events.clone(), events.clone(), events.clone());
    let list: ApiList<Survey> = ApiList::new(
        app.client.clone(),
        "/surveys",
        ListOptions {
            on_item_created: Some(Rc::new(move |s: &Survey| {
                created.borrow_mut().push(format!("created {}", s.id))
            })),
            on_item_updated: Some(Rc::new(move |s: &Survey| {
                updated.borrow_mut().push(format!("updated {}", s.id))
            })),
            on_item_deleted: Some(Rc::new(move |id: SurveyId| {
                deleted.borrow_mut().push(format!("deleted {id}"))
            })),
            ..ListOptions::default()
        },
    );
    assert!(list.is_immediate());

    list.mount().await?;
    assert_eq!(list.count(), 2);
    assert!(!list.loading());

    let survey = list.create_item(&survey_draft_a()).await?;
    assert_eq!(list.count(), 3);
    assert_eq!(list.items().last(), Some(&survey));

    let changed = list.update_item(survey.id, &survey_draft_b()).await?;
    assert_eq!(changed.status, SurveyStatus::Inactive);
    assert!(list.items().contains(&changed));

    list.delete_item(SurveyId(1)).await?;
    let ids: Vec<_> = list.items().iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![SurveyId(2), survey.id]);

    // A fresh fetch agrees with what the list tracked locally.
    let server: Vec<_> =
        list.fetch_items().await?.iter().map(|s| s.id).collect();
    assert_eq!(server, ids);

    assert_eq!(
        *events.borrow(),
        vec![
            format!("created {}", survey.id),
            format!("updated {}", survey.id),
            "deleted 1".to_string(),
        ]
    );

    Ok(())
}

#[tokio::test]
async fn single_item_fetch_leaves_list_alone() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;
    let list: ApiList<Survey> =
        ApiList::new(app.client.clone(), "/surveys", ListOptions::default());

    let survey = list.get_item(SurveyId(2)).await?;

    assert_eq!(survey.title, "Team Feedback");
    assert!(list.is_empty());

    Ok(())
}

#[tokio::test]
async fn failed_mutation_keeps_items_and_fetch_state() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;
    let errors = Rc::new(RefCell::new(Vec::new()));
    let sink = errors.clone();
    let list: ApiList<Survey> = ApiList::new(
        app.client.clone(),
        "/surveys",
        ListOptions {
            on_error: Some(Rc::new(
                move |_: &ClientError, details: &payloads::ErrorDetails| {
                    sink.borrow_mut().push(details.message.clone())
                },
            )),
            ..ListOptions::default()
        },
    );
    list.fetch_items().await?;

    let result = list.delete_item(SurveyId(404)).await;

    assert!(matches!(result, Err(ClientError::NotFound)));
    assert_eq!(list.count(), 2);
    assert_eq!(list.error(), None);
    assert_eq!(
        *errors.borrow(),
        vec!["The requested resource was not found.".to_string()]
    );

    Ok(())
}

#[tokio::test]
async fn expired_session_is_signalled_once() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;
    let list: ApiList<Survey> =
        ApiList::new(app.client.clone(), "/surveys", ListOptions::default());

    let notified = Rc::new(Cell::new(0));
    let counter = notified.clone();
    let _subscription = app
        .session_events
        .subscribe(move || counter.set(counter.get() + 1));

    app.expire_sessions();
    let result = list.fetch_items().await;

    assert!(matches!(result, Err(ClientError::SessionExpired)));
    assert_eq!(
        list.error_message().as_deref(),
        Some("Session expired. Please login again.")
    );
    assert!(!list.loading());
    assert!(!app.credentials.has_token());
    assert_eq!(app.credentials.clears(), 1);
    assert_eq!(notified.get(), 1);

    Ok(())
}

#[tokio::test]
async fn non_array_body_gives_an_empty_list() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;
    let list: ApiList<Survey> = ApiList::new(
        app.client.clone(),
        "/analytics/overview",
        ListOptions::default(),
    );

    let items = list.fetch_items().await?;

    assert!(items.is_empty());
    assert!(list.is_empty());
    assert_eq!(list.error(), None);

    Ok(())
}

#[tokio::test]
async fn unmounted_list_ignores_results() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;
    let list: ApiList<Survey> =
        ApiList::new(app.client.clone(), "/surveys", ListOptions::default());
    list.unmount();

    list.fetch_items().await?;
    list.create_item(&survey_draft_a()).await?;

    assert!(list.is_empty());

    Ok(())
}
