use api_state::{ApiCall, CallOptions};
use payloads::{ClientError, Envelope};
use std::future::Future;
use std::ops::Deref;
use std::rc::Rc;
use yew::prelude::*;

pub struct UseApiCallHandle<A, T> {
    call: Rc<ApiCall<A, T>>,
}

impl<A, T> Deref for UseApiCallHandle<A, T> {
    type Target = ApiCall<A, T>;

    fn deref(&self) -> &Self::Target {
        &self.call
    }
}

impl<A: 'static, T: Clone + 'static> UseApiCallHandle<A, T> {
    /// Execute in the background. Failures are already recorded in the
    /// call's state and reported through its error callback.
    pub fn run(&self, args: A) {
        let call = (*self.call).clone();
        yew::platform::spawn_local(async move {
            let _ = call.execute(args).await;
        });
    }

    pub fn run_callback(&self) -> Callback<A> {
        let call = self.call.clone();
        Callback::from(move |args: A| {
            let call = (*call).clone();
            yew::platform::spawn_local(async move {
                let _ = call.execute(args).await;
            });
        })
    }
}

/// Single API operation bound to the component lifecycle.
///
/// The call is created once. The component re-renders whenever the call's
/// state changes, and the call is unmounted with the component so late
/// responses are dropped. With `immediate`, the operation runs on mount and
/// again whenever `deps` change, with `deps` as its argument.
///
/// # Example
///
/// ```ignore
/// let survey = use_api_call(
///     survey_id,
///     |id| async move { get_api_client().surveys().get_survey(id).await },
///     CallOptions { immediate: true, ..Default::default() },
/// );
/// ```
#[hook]
pub fn use_api_call<D, T, F, Fut>(
    deps: D,
    operation: F,
    options: CallOptions<T>,
) -> UseApiCallHandle<D, T>
where
    D: PartialEq + Clone + 'static,
    T: Clone + 'static,
    F: Fn(D) -> Fut + 'static,
    Fut: Future<Output = Result<Envelope<T>, ClientError>> + 'static,
{
    let call = use_memo((), move |_| ApiCall::new(operation, options));
    let update = use_force_update();

    {
        let call = call.clone();
        use_effect_with((), move |_| {
            let subscription = call.subscribe(move || update.force_update());
            move || {
                drop(subscription);
                call.unmount();
            }
        });
    }

    {
        let call = call.clone();
        use_effect_with(deps, move |deps| {
            if call.is_immediate() {
                let call = (*call).clone();
                let deps = deps.clone();
                yew::platform::spawn_local(async move {
                    let _ = call.execute(deps).await;
                });
            }
        });
    }

    UseApiCallHandle { call }
}
