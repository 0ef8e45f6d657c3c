use api_state::{ApiCall, CallOptions};
use futures::poll;
use payloads::responses::Survey;
use payloads::{ClientError, Envelope, ErrorDetails, SurveyId};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use test_helpers::spawn_app;
use tokio::sync::oneshot;

/// A call whose result is whatever gets sent on the channel.
fn channel_call(options: CallOptions<u32>) -> ApiCall<oneshot::Receiver<u32>, u32> {
    ApiCall::new(
        |rx: oneshot::Receiver<u32>| async move {
            rx.await
                .map(Envelope::new)
                .map_err(|e| ClientError::Request(e.to_string()))
        },
        options,
    )
}

fn survey_call(app: &test_helpers::TestApp) -> ApiCall<SurveyId, Survey> {
    let client = app.client.clone();
    ApiCall::new(
        move |id| {
            let client = client.clone();
            async move { client.surveys().get_survey(id).await }
        },
        CallOptions::default(),
    )
}

#[tokio::test]
async fn success_is_recorded() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;
    let call = survey_call(&app);
    assert!(!call.loading());
    assert!(!call.is_success());

    let survey = call.execute(SurveyId(1)).await?.expect("mounted");

    assert_eq!(survey.title, "Customer Satisfaction");
    assert_eq!(call.data(), Some(survey));
    assert!(call.is_success());
    assert_eq!(call.success_message().as_deref(), Some("Survey retrieved"));
    assert!(call.last_success().and_then(|s| s.timestamp).is_some());

    Ok(())
}

#[tokio::test]
async fn failure_goes_to_state_and_callback() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;
    let client = app.client.clone();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    let call = ApiCall::new(
        move |id| {
            let client = client.clone();
            async move { client.surveys().get_survey(id).await }
        },
        CallOptions {
            on_error: Some(Rc::new(move |_: &ClientError, details: &ErrorDetails| {
                sink.borrow_mut().push(details.status)
            })),
            ..CallOptions::default()
        },
    );

    let result = call.execute(SurveyId(999)).await;

    assert!(matches!(result, Err(ClientError::NotFound)));
    assert_eq!(
        call.error_message().as_deref(),
        Some("The requested resource was not found.")
    );
    assert!(!call.loading());
    assert!(!call.has_data());
    assert_eq!(*seen.borrow(), vec![Some(404)]);

    Ok(())
}

#[tokio::test]
async fn immediate_calls_run_on_mount() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;
    let client = app.client.clone();
    let call = ApiCall::new(
        move |()| {
            let client = client.clone();
            async move { client.surveys().get_all_surveys().await }
        },
        CallOptions {
            immediate: true,
            default_data: Some(Vec::new()),
            ..CallOptions::default()
        },
    );
    assert_eq!(call.data(), Some(Vec::new()));

    call.mount(()).await?;
    assert_eq!(call.data().map(|s| s.len()), Some(2));

    call.reset();
    assert_eq!(call.data(), Some(Vec::new()));
    assert!(call.last_success().is_none());

    Ok(())
}

#[tokio::test]
async fn later_resolution_wins_and_loading_waits_for_all() -> anyhow::Result<()> {
    let call = channel_call(CallOptions::default());
    let (first_tx, first_rx) = oneshot::channel();
    let (second_tx, second_rx) = oneshot::channel();

    let mut first = Box::pin(call.execute(first_rx));
    let mut second = Box::pin(call.execute(second_rx));
    assert!(poll!(first.as_mut()).is_pending());
    assert!(poll!(second.as_mut()).is_pending());
    assert!(call.loading());

    // The second request resolves first.
    second_tx.send(2).ok();
    assert_eq!(second.await?, Some(2));
    assert_eq!(call.data(), Some(2));
    assert!(call.loading());

    first_tx.send(1).ok();
    assert_eq!(first.await?, Some(1));
    assert_eq!(call.data(), Some(1));
    assert!(!call.loading());

    Ok(())
}

#[tokio::test]
async fn unmounted_call_discards_late_results() -> anyhow::Result<()> {
    let successes = Rc::new(Cell::new(0));
    let counter = successes.clone();
    let call = channel_call(CallOptions {
        on_success: Some(Rc::new(move |_: &Envelope<u32>| {
            counter.set(counter.get() + 1)
        })),
        ..CallOptions::default()
    });
    let notified = Rc::new(Cell::new(0));
    let seen = notified.clone();
    let _subscription = call.subscribe(move || seen.set(seen.get() + 1));

    let (tx, rx) = oneshot::channel();
    let mut pending = Box::pin(call.execute(rx));
    assert!(poll!(pending.as_mut()).is_pending());
    let notified_before = notified.get();

    call.unmount();
    tx.send(7).ok();

    assert_eq!(pending.await?, None);
    assert_eq!(call.data(), None);
    assert_eq!(successes.get(), 0);
    assert_eq!(notified.get(), notified_before);

    // Nothing starts after unmount either.
    let (tx, rx) = oneshot::channel();
    tx.send(8).ok();
    assert_eq!(call.execute(rx).await?, None);
    assert_eq!(call.data(), None);

    Ok(())
}

#[tokio::test]
async fn unmounted_call_swallows_errors() -> anyhow::Result<()> {
    let call = channel_call(CallOptions::default());
    let (tx, rx) = oneshot::channel::<u32>();
    let mut pending = Box::pin(call.execute(rx));
    assert!(poll!(pending.as_mut()).is_pending());

    call.unmount();
    drop(tx);

    assert_eq!(pending.await?, None);
    assert_eq!(call.error(), None);

    Ok(())
}
