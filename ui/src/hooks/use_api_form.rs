use api_state::{ApiForm, FormOptions, FormValues};
use payloads::{ClientError, Envelope};
use std::future::Future;
use std::ops::Deref;
use std::rc::Rc;
use web_sys::HtmlInputElement;
use yew::prelude::*;

pub struct UseApiFormHandle<T> {
    form: Rc<ApiForm<T>>,
}

impl<T> Deref for UseApiFormHandle<T> {
    type Target = ApiForm<T>;

    fn deref(&self) -> &Self::Target {
        &self.form
    }
}

impl<T: Clone + 'static> UseApiFormHandle<T> {
    /// Input handler that writes the field's value into the form.
    pub fn oninput(&self, field: &'static str) -> Callback<InputEvent> {
        let form = self.form.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            form.set_value(field, input.value());
        })
    }

    /// Submit in the background. The outcome lands in the form's state and
    /// its callbacks.
    pub fn submit_in_background(&self, overrides: FormValues) {
        let form = (*self.form).clone();
        yew::platform::spawn_local(async move {
            let _ = form.submit(overrides).await;
        });
    }
}

/// Form submission state bound to the component lifecycle.
#[hook]
pub fn use_api_form<T, F, Fut>(
    submitter: F,
    options: FormOptions<T>,
) -> UseApiFormHandle<T>
where
    T: Clone + 'static,
    F: Fn(FormValues) -> Fut + 'static,
    Fut: Future<Output = Result<Envelope<T>, ClientError>> + 'static,
{
    let form = use_memo((), move |_| ApiForm::new(submitter, options));
    let update = use_force_update();

    {
        let form = form.clone();
        use_effect_with((), move |_| {
            let subscription = form.subscribe(move || update.force_update());
            move || {
                drop(subscription);
                form.unmount();
            }
        });
    }

    UseApiFormHandle { form }
}
