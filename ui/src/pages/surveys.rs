use api_state::{CallOptions, ListOptions, PaginationOptions};
use jiff::Zoned;
use jiff::tz::TimeZone;
use payloads::responses::{DashboardOverview, Survey, SurveyResponse};
use payloads::services::{
    calculate_stats, filter_by_status, format_response, format_survey,
};
use payloads::{ClientError, ErrorDetails, SurveyId, SurveyStatus};
use std::rc::Rc;
use web_sys::HtmlSelectElement;
use yew::prelude::*;

use crate::components::{ErrorBanner, PaginationControls, StatCard};
use crate::hooks::{
    use_api_call, use_api_list, use_api_pagination, use_logout,
    use_require_auth, use_title,
};
use crate::get_api_client;

const RESPONSES_PAGE_SIZE: u32 = 10;

#[function_component]
pub fn SurveysPage() -> Html {
    use_title("Dashboard");
    let user = use_require_auth();
    let on_logout = use_logout();

    let Some(user) = user else {
        return html! {
            <div class="text-center py-8">
                <div class="inline-block animate-spin rounded-full h-8 w-8 border-2 border-neutral-900 dark:border-neutral-100 border-t-transparent dark:border-t-transparent"></div>
            </div>
        };
    };

    html! {
        <div class="space-y-8">
            <div class="flex items-center justify-between">
                <div>
                    <h1 class="text-3xl font-bold text-neutral-900 dark:text-white">
                        {"Survey dashboard"}
                    </h1>
                    <p class="text-neutral-600 dark:text-neutral-400">
                        {format!("Signed in as {}", user.name)}
                    </p>
                </div>
                <button
                    onclick={on_logout}
                    class="px-4 py-2 border border-neutral-300 dark:border-neutral-600 rounded-md text-sm font-medium"
                >
                    {"Log out"}
                </button>
            </div>
            <SurveyDashboard />
        </div>
    }
}

#[function_component]
fn SurveyDashboard() -> Html {
    let surveys = use_api_list::<Survey>(
        "/surveys",
        ListOptions {
            on_item_deleted: Some(Rc::new(|id: SurveyId| {
                tracing::info!(%id, "survey deleted");
            })),
            ..Default::default()
        },
    );
    let overview = use_api_call(
        (),
        |_: ()| async move {
            get_api_client().analytics().get_dashboard_overview().await
        },
        CallOptions {
            immediate: true,
            // Analytics are admin-only
            on_error: Some(Rc::new(|_: &ClientError, details: &ErrorDetails| {
                tracing::debug!(
                    error = %details.message,
                    "overview unavailable"
                );
            })),
            ..Default::default()
        },
    );
    let status_filter = use_state(|| None::<SurveyStatus>);
    let pending_delete = use_state(|| None::<SurveyId>);

    let items = surveys.items();
    let tz = TimeZone::system();

    if items.is_empty() {
        if let Some(error) = surveys.error_message() {
            return html! {
                <ErrorBanner message={error} on_retry={surveys.refetch()} />
            };
        }
        if surveys.loading() {
            return html! {
                <div class="text-center py-12">
                    <p class="text-neutral-600 dark:text-neutral-400">{"Loading surveys..."}</p>
                </div>
            };
        }
    }

    let stats = calculate_stats(&items, &Zoned::now());
    let weekly = overview.data().map(|o: DashboardOverview| {
        AttrValue::from(format!(
            "{} this week, {} last week",
            o.responses_this_week, o.responses_last_week
        ))
    });

    let on_filter_change = {
        let status_filter = status_filter.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            status_filter.set(select.value().parse::<SurveyStatus>().ok());
        })
    };

    let visible = filter_by_status(&items, *status_filter);
    let delete = surveys.delete();

    html! {
        <div class="space-y-8">
            <div class="grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-4 gap-4">
                <StatCard
                    label="Total Surveys"
                    value={stats.total_surveys.to_string()}
                    detail={Some(AttrValue::from(format!(
                        "{} new this month",
                        stats.new_surveys_this_month
                    )))}
                />
                <StatCard label="Active Surveys" value={stats.active_surveys.to_string()} />
                <StatCard
                    label="Total Responses"
                    value={stats.total_responses.to_string()}
                    detail={weekly}
                />
                <StatCard
                    label="Avg Completion Rate"
                    value={format!("{}%", stats.avg_completion_rate)}
                />
            </div>

            <section class="space-y-4">
                <div class="flex items-center justify-between">
                    <h2 class="text-xl font-semibold text-neutral-900 dark:text-white">{"Surveys"}</h2>
                    <select
                        onchange={on_filter_change}
                        class="px-3 py-2 border border-neutral-300 dark:border-neutral-600 rounded-md bg-white dark:bg-neutral-900 text-sm"
                    >
                        <option value="" selected={status_filter.is_none()}>{"All statuses"}</option>
                        { for SurveyStatus::ALL.iter().map(|status| html! {
                            <option
                                value={status.to_string()}
                                selected={*status_filter == Some(*status)}
                            >
                                {status.label()}
                            </option>
                        }) }
                    </select>
                </div>

                if let Some(error) = surveys.error_message() {
                    <ErrorBanner message={error} on_retry={surveys.refetch()} />
                }

                if visible.is_empty() {
                    <p class="text-neutral-600 dark:text-neutral-400 py-6 text-center">
                        {"No surveys match this filter."}
                    </p>
                } else {
                    <div class="bg-white dark:bg-neutral-800 border border-neutral-200 dark:border-neutral-700 rounded-lg divide-y divide-neutral-200 dark:divide-neutral-700">
                        { for visible.iter().map(|survey| {
                            let row = format_survey(survey, &tz);
                            let id = survey.id;
                            let confirming = *pending_delete == Some(id);
                            let on_delete = {
                                let pending_delete = pending_delete.clone();
                                let delete = delete.clone();
                                Callback::from(move |_: MouseEvent| {
                                    if confirming {
                                        pending_delete.set(None);
                                        delete.emit(id);
                                    } else {
                                        pending_delete.set(Some(id));
                                    }
                                })
                            };
                            html! {
                                <div key={id.0} class="p-4 flex items-center justify-between gap-4">
                                    <div>
                                        <p class="font-medium text-neutral-900 dark:text-white">{row.survey.title.clone()}</p>
                                        <p class="text-sm text-neutral-600 dark:text-neutral-400">
                                            {format!(
                                                "{} · {} · {} complete · created {}",
                                                row.status_display,
                                                row.responses_summary,
                                                row.completion_display,
                                                row.formatted_created_at,
                                            )}
                                        </p>
                                    </div>
                                    <button
                                        onclick={on_delete}
                                        class="text-sm font-medium text-red-700 dark:text-red-400 hover:underline"
                                    >
                                        {if confirming { "Confirm delete" } else { "Delete" }}
                                    </button>
                                </div>
                            }
                        }) }
                    </div>
                }
            </section>

            <ResponsesPanel surveys={Rc::new(items)} />
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct ResponsesPanelProps {
    /// For showing survey titles next to responses.
    surveys: Rc<Vec<Survey>>,
}

#[function_component]
fn ResponsesPanel(props: &ResponsesPanelProps) -> Html {
    let responses = use_api_pagination::<SurveyResponse>(
        "/responses",
        PaginationOptions {
            page_size: RESPONSES_PAGE_SIZE,
            ..Default::default()
        },
    );
    let tz = TimeZone::system();

    let title_of = |id: SurveyId| {
        props
            .surveys
            .iter()
            .find(|s| s.id == id)
            .map(|s| s.title.clone())
            .unwrap_or_else(|| format!("Survey {id}"))
    };

    html! {
        <section class="space-y-4">
            <div class="flex items-center justify-between">
                <h2 class="text-xl font-semibold text-neutral-900 dark:text-white">{"Recent responses"}</h2>
                <button
                    onclick={responses.on_refresh()}
                    disabled={responses.loading()}
                    class="text-sm font-medium text-neutral-700 dark:text-neutral-300 underline disabled:opacity-50"
                >
                    {"Refresh"}
                </button>
            </div>

            if let Some(error) = responses.error_message() {
                <ErrorBanner message={error} on_retry={responses.on_refresh()} />
            }

            if responses.is_empty() && !responses.loading() && responses.error().is_none() {
                <p class="text-neutral-600 dark:text-neutral-400 py-6 text-center">
                    {"No responses yet."}
                </p>
            } else {
                <div class="bg-white dark:bg-neutral-800 border border-neutral-200 dark:border-neutral-700 rounded-lg divide-y divide-neutral-200 dark:divide-neutral-700">
                    { for responses.data().iter().map(|response| {
                        let row = format_response(response, &tz);
                        html! {
                            <div key={response.id.0} class="p-4 flex items-center justify-between gap-4">
                                <div>
                                    <p class="font-medium text-neutral-900 dark:text-white">
                                        {title_of(response.survey_id)}
                                    </p>
                                    <p class="text-sm text-neutral-600 dark:text-neutral-400">
                                        {format!("{} · {} answers", row.respondent_display, row.answer_count)}
                                    </p>
                                </div>
                                <span class="text-sm text-neutral-500">{row.formatted_submitted_at}</span>
                            </div>
                        }
                    }) }
                </div>
            }

            <PaginationControls
                pagination={responses.pagination()}
                on_previous={responses.on_previous()}
                on_next={responses.on_next()}
                is_loading={responses.loading()}
            />
        </section>
    }
}
