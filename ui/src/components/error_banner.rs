use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct Props {
    pub message: AttrValue,
    /// Shows a "Try again" button when set.
    #[prop_or_default]
    pub on_retry: Option<Callback<MouseEvent>>,
}

#[function_component]
pub fn ErrorBanner(props: &Props) -> Html {
    html! {
        <div class="bg-red-50 dark:bg-red-900/20 border border-red-200 \
                    dark:border-red-800 rounded-md p-3 flex items-center \
                    justify-between gap-4">
            <p class="text-sm text-red-800 dark:text-red-200">{props.message.clone()}</p>
            if let Some(on_retry) = &props.on_retry {
                <button
                    onclick={on_retry.clone()}
                    class="text-sm font-medium text-red-800 dark:text-red-200 underline"
                >
                    {"Try again"}
                </button>
            }
        </div>
    }
}
