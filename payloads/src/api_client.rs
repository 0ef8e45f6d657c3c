use crate::{ClientConfig, CredentialStore, SessionEvents};
use jiff::Timestamp;
use reqwest::{Method, RequestBuilder, StatusCode};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::ops::Deref;
use std::rc::Rc;

type ClientResult<T> = Result<Envelope<T>, ClientError>;

/// An API client for interfacing with the survey backend.
///
/// Attaches the stored bearer token to every request outside the
/// authentication endpoints and translates failures into [`ClientError`]. A
/// 401 clears the stored credentials and fires the session-expired event.
#[derive(Clone)]
pub struct ApiClient {
    pub config: ClientConfig,
    pub inner_client: reqwest::Client,
    credentials: Rc<dyn CredentialStore>,
    session_events: SessionEvents,
}

impl ApiClient {
    /// Every request times out after `config.timeout`.
    pub fn new(
        config: ClientConfig,
        credentials: Rc<dyn CredentialStore>,
        session_events: SessionEvents,
    ) -> Self {
        Self {
            config,
            inner_client: reqwest::Client::new(),
            credentials,
            session_events,
        }
    }

    pub fn credentials(&self) -> &Rc<dyn CredentialStore> {
        &self.credentials
    }

    pub fn session_events(&self) -> &SessionEvents {
        &self.session_events
    }
}

/// Helper methods for http actions
impl ApiClient {
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.config.url(path);
        tracing::debug!(%method, %url, "api request");

        let request = self
            .inner_client
            .request(method, url)
            .timeout(self.config.timeout);
        if is_auth_endpoint(path) {
            return request;
        }
        match self.credentials.token() {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        }
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        path: &str,
        request: RequestBuilder,
    ) -> ClientResult<T> {
        // Builder and body serialization errors surface here, before
        // anything goes over the wire.
        let request = request.build().map_err(|e| {
            tracing::error!(error = %e, "could not build request");
            ClientError::Request(e.to_string())
        })?;
        let method = request.method().clone();
        let url = request.url().clone();

        let response =
            self.inner_client.execute(request).await.map_err(|e| {
                tracing::warn!(%method, %url, error = %e, "no response");
                ClientError::Network(e)
            })?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            // Without a token a 401 rejects the submitted credentials
            // rather than the session.
            let error = if status == StatusCode::UNAUTHORIZED
                && is_auth_endpoint(path)
            {
                server_error(status, &body)
            } else {
                classify(status, &body)
            };
            if matches!(error, ClientError::SessionExpired) {
                self.expire_session();
            }
            tracing::warn!(
                %method, %url, %status, error = %error,
                "request failed"
            );
            return Err(error);
        }

        tracing::debug!(%method, %url, %status, "api response");
        let value = if body.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&body)?
        };
        extract_data(value)
    }

    fn expire_session(&self) {
        self.credentials.clear();
        self.session_events.notify_expired();
    }
}

/// Methods for each HTTP verb. Paths are relative to the configured base URL.
impl ApiClient {
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> ClientResult<T> {
        self.execute(path, self.request(Method::GET, path)).await
    }

    pub async fn get_with_query<T, Q>(
        &self,
        path: &str,
        query: &Q,
    ) -> ClientResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.execute(path, self.request(Method::GET, path).query(query))
            .await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.execute(path, self.request(Method::POST, path).json(body))
            .await
    }

    pub async fn empty_post<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> ClientResult<T> {
        self.execute(path, self.request(Method::POST, path)).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.execute(path, self.request(Method::PUT, path).json(body))
            .await
    }

    pub async fn patch<T, B>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.execute(path, self.request(Method::PATCH, path).json(body))
            .await
    }

    pub async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> ClientResult<T> {
        self.execute(path, self.request(Method::DELETE, path)).await
    }
}

/// Whether requests to `path` go out without the bearer token.
///
/// Everything under `/auth/` is public except the two endpoints that act on
/// the current session.
pub fn is_auth_endpoint(path: &str) -> bool {
    let path = path.split('?').next().unwrap_or(path);
    if path.starts_with("/users/create") {
        return true;
    }
    path.contains("/auth/")
        && !path.ends_with("/auth/me")
        && !path.ends_with("/auth/logout")
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Session expired. Please login again.")]
    SessionExpired,
    #[error(
        "Access denied. You don't have permission to perform this action."
    )]
    PermissionDenied,
    #[error("The requested resource was not found.")]
    NotFound,
    #[error("{message}")]
    Validation {
        message: String,
        errors: Option<Vec<String>>,
    },
    #[error("Internal server error. Please try again later.")]
    Internal,
    /// Any other non-success status.
    #[error("{message}")]
    Server {
        status: StatusCode,
        message: String,
        errors: Option<Vec<String>>,
    },
    #[error("Network error. Please check your connection.")]
    Network(#[from] reqwest::Error),
    /// The request could not be built, so nothing was sent.
    #[error("{0}")]
    Request(String),
    #[error("Could not read the server response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Unexpected response format")]
    UnexpectedFormat,
}

impl ClientError {
    /// HTTP status of the failed response, if one was received.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::SessionExpired => Some(StatusCode::UNAUTHORIZED),
            Self::PermissionDenied => Some(StatusCode::FORBIDDEN),
            Self::NotFound => Some(StatusCode::NOT_FOUND),
            Self::Validation { .. } => Some(StatusCode::UNPROCESSABLE_ENTITY),
            Self::Internal => Some(StatusCode::INTERNAL_SERVER_ERROR),
            Self::Server { status, .. } => Some(*status),
            Self::Network(_)
            | Self::Request(_)
            | Self::Decode(_)
            | Self::UnexpectedFormat => None,
        }
    }

    /// Itemized messages sent by the server, e.g. `"email: must be unique"`.
    pub fn errors(&self) -> Option<&[String]> {
        match self {
            Self::Validation { errors, .. } | Self::Server { errors, .. } => {
                errors.as_deref()
            }
            _ => None,
        }
    }
}

/// The message and error list of a failed response body, when present.
#[derive(Debug, Default, serde::Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    errors: Option<Vec<String>>,
}

/// Translate a non-success response into a [`ClientError`].
pub fn classify(status: StatusCode, body: &str) -> ClientError {
    let ErrorBody { message, errors } =
        serde_json::from_str(body).unwrap_or_default();
    let message = message.filter(|m| !m.trim().is_empty());

    match status {
        StatusCode::UNAUTHORIZED => ClientError::SessionExpired,
        StatusCode::FORBIDDEN => ClientError::PermissionDenied,
        StatusCode::NOT_FOUND => ClientError::NotFound,
        StatusCode::UNPROCESSABLE_ENTITY => ClientError::Validation {
            message: message.unwrap_or_else(|| "Validation error".to_string()),
            errors,
        },
        StatusCode::INTERNAL_SERVER_ERROR => ClientError::Internal,
        _ => server_error(status, body),
    }
}

/// A failure kept as a plain server error, whatever its status.
fn server_error(status: StatusCode, body: &str) -> ClientError {
    let ErrorBody { message, errors } =
        serde_json::from_str(body).unwrap_or_default();
    ClientError::Server {
        status,
        message: message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| format!("Server error: {}", status.as_u16())),
        errors,
    }
}

/// A response payload with the metadata the backend sent alongside it.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope<T> {
    pub data: T,
    pub message: Option<String>,
    pub timestamp: Option<Timestamp>,
}

impl<T> Envelope<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            message: None,
            timestamp: None,
        }
    }

    pub fn into_inner(self) -> T {
        self.data
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Envelope<U> {
        Envelope {
            data: f(self.data),
            message: self.message,
            timestamp: self.timestamp,
        }
    }
}

impl<T> Deref for Envelope<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.data
    }
}

/// Unwrap an enveloped body.
///
/// An object carrying a `data` or `success` key is an envelope; anything else
/// is the payload itself. A missing `data` field decodes from `null`.
pub fn extract_data<T: DeserializeOwned>(
    body: Value,
) -> Result<Envelope<T>, ClientError> {
    let is_envelope = body
        .as_object()
        .is_some_and(|o| o.contains_key("data") || o.contains_key("success"));
    if !is_envelope {
        return Ok(Envelope::new(serde_json::from_value(body)?));
    }

    let Value::Object(mut envelope) = body else {
        return Err(ClientError::UnexpectedFormat);
    };
    let data = envelope.remove("data").unwrap_or(Value::Null);
    let message = envelope
        .remove("message")
        .and_then(|m| m.as_str().map(str::to_string));
    let timestamp = envelope
        .get("timestamp")
        .and_then(Value::as_str)
        .and_then(|t| t.parse::<Timestamp>().ok());

    Ok(Envelope {
        data: serde_json::from_value(data)?,
        message,
        timestamp,
    })
}

/// A failure reduced to what the UI shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDetails {
    pub message: String,
    pub errors: Option<Vec<String>>,
    pub status: Option<u16>,
}

impl From<&ClientError> for ErrorDetails {
    fn from(error: &ClientError) -> Self {
        Self {
            message: error.to_string(),
            errors: error.errors().map(<[String]>::to_vec),
            status: error.status().map(|s| s.as_u16()),
        }
    }
}
