use super::{MockBackend, MockError, authenticate, authenticate_admin, envelope};
use actix_web::{HttpRequest, HttpResponse, delete, get, web};
use payloads::responses::{Page, PageMeta, SurveyResponse};
use payloads::{ResponseId, SurveyId};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    page: u32,
    #[serde(default = "default_size")]
    size: u32,
}

fn default_size() -> u32 {
    20
}

fn not_found(id: ResponseId) -> MockError {
    MockError::NotFound(format!("Response {id} not found"))
}

/// Slice `items` into the requested page, newest submissions first.
fn paginate(
    mut items: Vec<SurveyResponse>,
    page: u32,
    size: u32,
) -> Page<SurveyResponse> {
    items.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
    let size = size.max(1);
    let total = items.len();
    let total_pages = total.div_ceil(size as usize) as u32;
    let content: Vec<_> = items
        .into_iter()
        .skip(page as usize * size as usize)
        .take(size as usize)
        .collect();

    Page {
        pagination: PageMeta {
            current_page: page,
            total_pages,
            total_elements: total as u64,
            page_size: size,
            number_of_elements: content.len() as u32,
            first: page == 0,
            last: page + 1 >= total_pages,
            empty: content.is_empty(),
        },
        content,
    }
}

#[get("/responses")]
pub async fn paged_responses(
    request: HttpRequest,
    query: web::Query<PageQuery>,
    backend: web::Data<MockBackend>,
) -> Result<HttpResponse, MockError> {
    authenticate_admin(&request, &backend)?;
    let responses = backend
        .state()
        .responses
        .iter()
        .map(|r| r.response.clone())
        .collect();
    Ok(envelope(
        paginate(responses, query.page, query.size),
        "Responses retrieved successfully",
    ))
}

#[get("/responses/list")]
pub async fn list(
    request: HttpRequest,
    backend: web::Data<MockBackend>,
) -> Result<HttpResponse, MockError> {
    authenticate_admin(&request, &backend)?;
    let responses: Vec<_> = backend
        .state()
        .responses
        .iter()
        .map(|r| r.response.clone())
        .collect();
    Ok(envelope(responses, "Responses retrieved successfully"))
}

#[get("/responses/count")]
pub async fn count(
    request: HttpRequest,
    backend: web::Data<MockBackend>,
) -> Result<HttpResponse, MockError> {
    authenticate_admin(&request, &backend)?;
    let count = backend.state().responses.len() as u64;
    Ok(envelope(count, "Response count retrieved"))
}

#[get("/responses/survey/{id}")]
pub async fn by_survey(
    request: HttpRequest,
    id: web::Path<i64>,
    backend: web::Data<MockBackend>,
) -> Result<HttpResponse, MockError> {
    authenticate(&request, &backend)?;
    let id = SurveyId(id.into_inner());
    let state = backend.state();
    if state.survey(id).is_none() {
        return Err(MockError::NotFound(format!("Survey {id} not found")));
    }
    Ok(envelope(state.responses_for(id), "Responses retrieved"))
}

#[get("/responses/{id}")]
pub async fn get(
    request: HttpRequest,
    id: web::Path<i64>,
    backend: web::Data<MockBackend>,
) -> Result<HttpResponse, MockError> {
    authenticate(&request, &backend)?;
    let id = ResponseId(id.into_inner());
    let response = backend
        .state()
        .responses
        .iter()
        .find(|r| r.response.id == id)
        .map(|r| r.response.clone())
        .ok_or_else(|| not_found(id))?;
    Ok(envelope(response, "Response retrieved"))
}

#[delete("/responses/{id}")]
pub async fn delete(
    request: HttpRequest,
    id: web::Path<i64>,
    backend: web::Data<MockBackend>,
) -> Result<HttpResponse, MockError> {
    authenticate_admin(&request, &backend)?;
    let id = ResponseId(id.into_inner());
    let mut state = backend.state();
    let before = state.responses.len();
    state.responses.retain(|r| r.response.id != id);
    if state.responses.len() == before {
        return Err(not_found(id));
    }
    Ok(envelope(serde_json::Value::Null, "Response deleted successfully"))
}
