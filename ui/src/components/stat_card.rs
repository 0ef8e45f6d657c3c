use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct Props {
    pub label: AttrValue,
    pub value: AttrValue,
    /// Secondary line under the value, e.g. a weekly comparison.
    #[prop_or_default]
    pub detail: Option<AttrValue>,
}

#[function_component]
pub fn StatCard(props: &Props) -> Html {
    html! {
        <div class="bg-white dark:bg-neutral-800 border border-neutral-200 \
                    dark:border-neutral-700 rounded-lg p-5">
            <div class="text-3xl font-bold text-neutral-900 dark:text-white">
                {props.value.clone()}
            </div>
            <div class="mt-1 text-sm font-medium text-neutral-600 dark:text-neutral-400">
                {props.label.clone()}
            </div>
            if let Some(detail) = &props.detail {
                <div class="mt-2 text-xs text-neutral-500 dark:text-neutral-500">
                    {detail.clone()}
                </div>
            }
        </div>
    }
}
