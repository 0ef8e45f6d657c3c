use payloads::responses::PageMeta;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct Props {
    pub pagination: PageMeta,
    pub on_previous: Callback<MouseEvent>,
    pub on_next: Callback<MouseEvent>,
    /// Whether currently loading (to disable buttons)
    #[prop_or(false)]
    pub is_loading: bool,
}

/// "Showing 21-40 of 53" with previous and next buttons.
#[function_component]
pub fn PaginationControls(props: &Props) -> Html {
    let PageMeta {
        current_page,
        total_pages,
        total_elements,
        page_size,
        number_of_elements,
        first,
        last,
        empty,
    } = props.pagination.clone();

    // Nothing to page through
    if empty && current_page == 0 {
        return html! {};
    }

    let range_start = u64::from(current_page) * u64::from(page_size) + 1;
    let range_end = range_start + u64::from(number_of_elements) - 1;

    let prev_disabled = first || props.is_loading;
    let next_disabled = last || props.is_loading;

    let button_class = |disabled: bool| {
        if disabled {
            "px-4 py-2 border border-neutral-300 dark:border-neutral-600 \
             rounded-md text-sm font-medium text-neutral-400 \
             dark:text-neutral-500 bg-neutral-100 dark:bg-neutral-800 \
             cursor-not-allowed"
        } else {
            "px-4 py-2 border border-neutral-300 dark:border-neutral-600 \
             rounded-md text-sm font-medium text-neutral-700 \
             dark:text-neutral-300 bg-white dark:bg-neutral-700 \
             hover:bg-neutral-50 dark:hover:bg-neutral-600 \
             transition-colors duration-200"
        }
    };

    html! {
        <div class="flex items-center justify-between mt-4 pt-4 \
                    border-t border-neutral-200 dark:border-neutral-700">
            <button
                onclick={props.on_previous.clone()}
                disabled={prev_disabled}
                class={button_class(prev_disabled)}
            >
                {"Previous"}
            </button>

            <span class="text-sm text-neutral-600 dark:text-neutral-400">
                {format!(
                    "Showing {range_start}-{range_end} of {total_elements} (page {} of {total_pages})",
                    current_page + 1,
                )}
            </span>

            <button
                onclick={props.on_next.clone()}
                disabled={next_disabled}
                class={button_class(next_disabled)}
            >
                {"Next"}
            </button>
        </div>
    }
}
