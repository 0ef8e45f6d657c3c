//! An in-process stand-in for the survey backend.
//!
//! Serves the same routes under `/api` with the same response envelope, keeps
//! its data in memory and records every request it receives. `/api/status/N`
//! answers with status N for exercising error handling.

mod analytics;
mod auth;
mod responses;
mod state;
mod surveys;
mod users;

pub use state::{
    ADMIN_EMAIL, BackendState, MockBackend, RecordedRequest, ResponseRecord,
    SEED_PASSWORD, SurveyRecord, USER_EMAIL, UserRecord,
};

use actix_web::dev::{HttpServiceFactory, Server, Service};
use actix_web::http::StatusCode;
use actix_web::{
    App, HttpRequest, HttpResponse, HttpServer, ResponseError, body::BoxBody,
    get, web,
};
use jiff::Timestamp;
use payloads::UserId;
use serde::Serialize;
use serde_json::json;
use std::net::TcpListener;

/// Build the server, but not await it. Binds to an OS-assigned port when
/// given port 0; returns the port actually used.
pub fn build(
    port: u16,
    backend: web::Data<MockBackend>,
) -> std::io::Result<(Server, u16)> {
    let listener = TcpListener::bind(format!("127.0.0.1:{port}"))?;
    let port = listener.local_addr()?.port();

    let server = HttpServer::new(move || {
        let recorder = backend.clone();
        App::new()
            .app_data(backend.clone())
            .wrap_fn(move |req, srv| {
                recorder.record(RecordedRequest {
                    method: req.method().to_string(),
                    path: req.path().to_string(),
                    query: req.query_string().to_string(),
                    authorization: req
                        .headers()
                        .get("Authorization")
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_string),
                });
                srv.call(req)
            })
            .service(api_services())
    })
    .workers(1)
    .listen(listener)?
    .run();

    Ok((server, port))
}

fn api_services() -> impl HttpServiceFactory {
    web::scope("/api")
        .service(injected_status)
        .service(auth::login)
        .service(auth::logout)
        .service(auth::me)
        .service(auth::forgot_password)
        .service(auth::reset_password)
        .service(auth::validate_reset_token)
        // Literal paths go before `{id}` patterns.
        .service(surveys::list_admin)
        .service(surveys::list)
        .service(surveys::create)
        .service(surveys::get_public)
        .service(surveys::get_results)
        .service(surveys::get_stats)
        .service(surveys::get)
        .service(surveys::update)
        .service(surveys::delete)
        .service(surveys::submit_public_response)
        .service(responses::paged_responses)
        .service(responses::list)
        .service(responses::count)
        .service(responses::by_survey)
        .service(responses::get)
        .service(responses::delete)
        .service(users::create)
        .service(users::dashboard)
        .service(users::own_response)
        .service(users::get)
        .service(users::update)
        .service(analytics::response_trends)
        .service(analytics::recent_activity)
        .service(analytics::recent_responses)
        .service(analytics::overview)
        .service(analytics::survey_performance)
}

/// Answer with the requested status and an error envelope.
#[get("/status/{code}")]
async fn injected_status(code: web::Path<u16>) -> HttpResponse {
    let status = StatusCode::from_u16(code.into_inner())
        .unwrap_or(StatusCode::BAD_REQUEST);
    HttpResponse::build(status).json(json!({
        "success": false,
        "message": format!("Injected failure {}", status.as_u16()),
        "errors": ["status: injected"],
        "status": status.as_u16(),
        "timestamp": Timestamp::now().to_string(),
    }))
}

/// A successful response wrapped the way the backend wraps them.
pub fn envelope<T: Serialize>(data: T, message: &str) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "success": true,
        "message": message,
        "data": data,
        "status": 200,
        "timestamp": Timestamp::now().to_string(),
    }))
}

#[derive(Debug, thiserror::Error)]
pub enum MockError {
    #[error("{0}")]
    Unauthorized(String),
    #[error("Access denied")]
    Forbidden,
    #[error("{0}")]
    NotFound(String),
    #[error("{message}")]
    BadRequest {
        message: String,
        errors: Vec<String>,
    },
    #[error("{message}")]
    Validation {
        message: String,
        errors: Vec<String>,
    },
}

impl ResponseError for MockError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    fn error_response(&self) -> HttpResponse<BoxBody> {
        let errors = match self {
            Self::BadRequest { errors, .. }
            | Self::Validation { errors, .. } => Some(errors.clone()),
            _ => None,
        };
        HttpResponse::build(self.status_code()).json(json!({
            "success": false,
            "message": self.to_string(),
            "errors": errors,
            "status": self.status_code().as_u16(),
            "timestamp": Timestamp::now().to_string(),
        }))
    }
}

impl MockError {
    fn bad_request(message: &str, errors: &[&str]) -> Self {
        Self::BadRequest {
            message: message.to_string(),
            errors: errors.iter().map(|e| e.to_string()).collect(),
        }
    }
}

pub(crate) fn bearer_token(request: &HttpRequest) -> Option<String> {
    request
        .headers()
        .get("Authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::to_string)
}

/// The user owning the request's bearer token.
pub(crate) fn authenticate(
    request: &HttpRequest,
    backend: &MockBackend,
) -> Result<UserId, MockError> {
    let token = bearer_token(request).ok_or_else(|| {
        MockError::Unauthorized(
            "Authorization header missing or invalid".to_string(),
        )
    })?;
    backend.state().sessions.get(&token).copied().ok_or_else(|| {
        MockError::Unauthorized("Invalid or expired token".to_string())
    })
}

/// Like [`authenticate`], additionally requiring the admin role.
pub(crate) fn authenticate_admin(
    request: &HttpRequest,
    backend: &MockBackend,
) -> Result<UserId, MockError> {
    let user_id = authenticate(request, backend)?;
    let state = backend.state();
    match state.user(user_id) {
        Some(record) if record.user.role == payloads::Role::Admin => {
            Ok(user_id)
        }
        _ => Err(MockError::Forbidden),
    }
}
