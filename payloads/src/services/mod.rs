//! Thin typed wrappers over the backend's REST endpoints, grouped by
//! resource, plus the pure helpers the views use to present their results.

mod analytics;
mod auth;
mod response;
mod survey;
mod user;

pub use analytics::{
    AnalyticsService, DEFAULT_ACTIVITY_LIMIT, DEFAULT_RECENT_RESPONSES_LIMIT,
    DEFAULT_TREND_DAYS,
};
pub use auth::{AuthService, validate_new_password};
pub use response::{
    FormattedResponse, ResponseService, format_date_time, format_response,
};
pub use survey::{
    FormattedSurvey, StatusSlice, SurveyStatsSummary, SurveyService,
    calculate_stats, filter_by_status, format_date, format_status,
    format_survey, group_by_status, validate_survey,
};
pub use user::{UserService, is_valid_email, validate_user};

use crate::{ApiClient, FieldErrors};

impl ApiClient {
    pub fn surveys(&self) -> SurveyService<'_> {
        SurveyService { client: self }
    }

    pub fn responses(&self) -> ResponseService<'_> {
        ResponseService { client: self }
    }

    pub fn users(&self) -> UserService<'_> {
        UserService { client: self }
    }

    pub fn analytics(&self) -> AnalyticsService<'_> {
        AnalyticsService { client: self }
    }

    pub fn auth(&self) -> AuthService<'_> {
        AuthService { client: self }
    }
}

/// Outcome of checking a draft before it is sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Validation {
    pub errors: FieldErrors,
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn reject(&mut self, field: &str, message: &str) {
        self.errors.insert(field.to_string(), message.to_string());
    }
}
