use super::{MockBackend, MockError, authenticate_admin, envelope};
use actix_web::{HttpRequest, HttpResponse, get, web};
use jiff::{Span, Timestamp, ToSpan, tz::TimeZone};
use payloads::SurveyStatus;
use payloads::responses::{
    ActivityItem, DashboardOverview, RecentResponse, SurveyPerformance,
    TrendPoint,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct DaysQuery {
    #[serde(default = "default_days")]
    days: u32,
}

#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    limit: Option<usize>,
}

fn default_days() -> u32 {
    30
}

/// "3 hours ago" style label for how long before `now` something happened.
fn relative_time(then: Timestamp, now: Timestamp) -> String {
    let seconds = now.as_second() - then.as_second();
    let (amount, unit) = match seconds {
        s if s < 60 => return "just now".to_string(),
        s if s < 3600 => (s / 60, "minute"),
        s if s < 86_400 => (s / 3600, "hour"),
        s => (s / 86_400, "day"),
    };
    let plural = if amount == 1 { "" } else { "s" };
    format!("{amount} {unit}{plural} ago")
}

#[get("/analytics/response-trends")]
pub async fn response_trends(
    request: HttpRequest,
    query: web::Query<DaysQuery>,
    backend: web::Data<MockBackend>,
) -> Result<HttpResponse, MockError> {
    authenticate_admin(&request, &backend)?;
    let state = backend.state();
    let today = Timestamp::now().to_zoned(TimeZone::UTC).date();

    let points: Vec<TrendPoint> = (0..query.days)
        .rev()
        .filter_map(|back| today.checked_sub(i64::from(back).days()).ok())
        .map(|day| {
            let responses = state
                .responses
                .iter()
                .filter_map(|r| r.response.submitted_at)
                .filter(|at| at.to_zoned(TimeZone::UTC).date() == day)
                .count() as u64;
            TrendPoint {
                date: day.strftime("%b %d").to_string(),
                responses,
                full_date: day.to_string(),
            }
        })
        .collect();
    Ok(envelope(points, "Response trends retrieved"))
}

#[get("/analytics/recent-activity")]
pub async fn recent_activity(
    request: HttpRequest,
    query: web::Query<LimitQuery>,
    backend: web::Data<MockBackend>,
) -> Result<HttpResponse, MockError> {
    authenticate_admin(&request, &backend)?;
    let state = backend.state();
    let now = Timestamp::now();

    let mut items: Vec<ActivityItem> = state
        .surveys
        .iter()
        .filter_map(|record| {
            let at = record.survey.created_at?;
            Some(ActivityItem {
                id: record.survey.id.0,
                action: "Survey created".to_string(),
                survey: record.survey.title.clone(),
                time: relative_time(at, now),
                timestamp: Some(at),
                kind: "survey".to_string(),
            })
        })
        .chain(state.responses.iter().filter_map(|record| {
            let at = record.response.submitted_at?;
            let title = state.survey(record.response.survey_id)?;
            Some(ActivityItem {
                id: record.response.id.0,
                action: "New response".to_string(),
                survey: title.survey.title.clone(),
                time: relative_time(at, now),
                timestamp: Some(at),
                kind: "response".to_string(),
            })
        }))
        .collect();
    items.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    items.truncate(query.limit.unwrap_or(50));
    Ok(envelope(items, "Recent activity retrieved"))
}

#[get("/analytics/recent-responses")]
pub async fn recent_responses(
    request: HttpRequest,
    query: web::Query<LimitQuery>,
    backend: web::Data<MockBackend>,
) -> Result<HttpResponse, MockError> {
    authenticate_admin(&request, &backend)?;
    let state = backend.state();

    let mut recent: Vec<RecentResponse> = state
        .responses
        .iter()
        .map(|record| {
            let survey_name = state
                .survey(record.response.survey_id)
                .map(|s| s.survey.title.clone())
                .unwrap_or_default();
            let user_name = record
                .user_id
                .and_then(|id| state.user(id))
                .map(|u| u.user.name.clone());
            RecentResponse {
                response_id: record.response.id,
                survey_id: record.response.survey_id,
                survey_name,
                submitted_at: record.response.submitted_at,
                is_anonymous: user_name.is_none(),
                user_name: user_name
                    .unwrap_or_else(|| "Anonymous User".to_string()),
            }
        })
        .collect();
    recent.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
    recent.truncate(query.limit.unwrap_or(5));
    Ok(envelope(recent, "Recent responses retrieved"))
}

#[get("/analytics/overview")]
pub async fn overview(
    request: HttpRequest,
    backend: web::Data<MockBackend>,
) -> Result<HttpResponse, MockError> {
    authenticate_admin(&request, &backend)?;
    let state = backend.state();
    let now = Timestamp::now();
    let week = Span::new().hours(24 * 7);
    let this_week_start = now - week;
    let last_week_start = this_week_start - week;
    let month_start = now - Span::new().hours(24 * 30);

    let submitted = || {
        state
            .responses
            .iter()
            .filter_map(|r| r.response.submitted_at)
    };
    let overview = DashboardOverview {
        total_surveys: state.surveys.len() as u64,
        active_surveys: state
            .surveys
            .iter()
            .filter(|s| s.survey.status == SurveyStatus::Active)
            .count() as u64,
        total_responses: state.responses.len() as u64,
        responses_this_week: submitted()
            .filter(|at| *at >= this_week_start)
            .count() as u64,
        responses_last_week: submitted()
            .filter(|at| *at >= last_week_start && *at < this_week_start)
            .count() as u64,
        new_surveys_this_month: state
            .surveys
            .iter()
            .filter_map(|s| s.survey.created_at)
            .filter(|at| *at >= month_start)
            .count() as u64,
    };
    Ok(envelope(overview, "Dashboard overview retrieved"))
}

#[get("/analytics/survey-performance")]
pub async fn survey_performance(
    request: HttpRequest,
    backend: web::Data<MockBackend>,
) -> Result<HttpResponse, MockError> {
    authenticate_admin(&request, &backend)?;
    let state = backend.state();
    let mut performance: Vec<SurveyPerformance> = state
        .surveys
        .iter()
        .map(|record| SurveyPerformance {
            survey_id: record.survey.id,
            survey_title: record.survey.title.clone(),
            total_responses: state.responses_for(record.survey.id).len()
                as u64,
            status: record.survey.status,
            created_at: record.survey.created_at,
        })
        .collect();
    performance.sort_by(|a, b| b.total_responses.cmp(&a.total_responses));
    Ok(envelope(performance, "Survey performance retrieved"))
}
