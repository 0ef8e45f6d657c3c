use crate::{
    Answer, QuestionId, ResponseId, Role, SurveyId, SurveyStatus, UserId,
};
use jiff::Timestamp;
use secrecy::SecretBox;
use serde::{Deserialize, Serialize};

/// A survey as listed for administrators.
///
/// The plain survey endpoints omit the statistics, which then default to
/// zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Survey {
    pub id: SurveyId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status: SurveyStatus,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
    #[serde(default)]
    pub updated_at: Option<Timestamp>,
    #[serde(default)]
    pub end_date: Option<Timestamp>,
    #[serde(default)]
    pub total_questions: u32,
    #[serde(default)]
    pub total_responses: u32,
    /// Percentage, 0 to 100.
    #[serde(default)]
    pub completion_rate: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: QuestionId,
    /// One of "text", "long_text", "rating", "multiple_choice".
    #[serde(rename = "type")]
    pub kind: String,
    pub question_text: String,
    #[serde(default)]
    pub options_json: Option<String>,
    #[serde(default)]
    pub order_number: Option<i32>,
}

/// A survey as presented to respondents, with its questions in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicSurvey {
    pub id: SurveyId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status: SurveyStatus,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
    #[serde(default)]
    pub updated_at: Option<Timestamp>,
    #[serde(default)]
    pub end_date: Option<Timestamp>,
    #[serde(default)]
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyResults {
    pub survey_id: SurveyId,
    pub survey_title: String,
    #[serde(default)]
    pub survey_description: Option<String>,
    #[serde(default)]
    pub survey_created_at: Option<Timestamp>,
    pub total_responses: u32,
    pub total_questions: u32,
    #[serde(default)]
    pub question_results: Vec<QuestionResult>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResult {
    pub question_id: QuestionId,
    pub question_text: String,
    pub question_type: String,
    #[serde(default)]
    pub order_number: Option<i32>,
    pub total_answers: u32,
    #[serde(default)]
    pub answers: Vec<AnswerSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerSummary {
    pub answer_id: i64,
    #[serde(default)]
    pub answer_text: Option<String>,
    #[serde(default)]
    pub submitted_at: Option<Timestamp>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyStats {
    pub survey_id: SurveyId,
    pub total_questions: u32,
    pub total_responses: u32,
    pub completion_rate: u32,
}

/// One respondent's submission to a survey.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyResponse {
    pub id: ResponseId,
    pub survey_id: SurveyId,
    #[serde(default)]
    pub answers: Vec<Answer>,
    #[serde(default)]
    pub respondent_name: Option<String>,
    #[serde(default)]
    pub submitted_at: Option<Timestamp>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub role: Role,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub user_id: UserId,
    pub email: String,
    pub name: String,
    pub role: Role,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDashboard {
    pub stats: UserDashboardStats,
    #[serde(default)]
    pub pending_surveys: Vec<UserSurvey>,
    #[serde(default)]
    pub completed_surveys: Vec<UserSurvey>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDashboardStats {
    pub completed_surveys_count: u32,
    #[serde(default)]
    pub average_completion_time_minutes: Option<f64>,
    #[serde(default)]
    pub total_time_spent_minutes: Option<i64>,
}

/// A survey from the point of view of one respondent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSurvey {
    pub id: SurveyId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status: String,
    #[serde(default)]
    pub deadline: Option<Timestamp>,
    #[serde(default)]
    pub completed_date: Option<Timestamp>,
    #[serde(default)]
    pub estimated_time: Option<String>,
    #[serde(default)]
    pub responses: Option<i32>,
}

/// The current user's own submission to a survey.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserOwnResponse {
    pub response_id: ResponseId,
    pub survey_id: SurveyId,
    #[serde(default)]
    pub submitted_at: Option<Timestamp>,
    #[serde(default)]
    pub completion_time_seconds: Option<i32>,
    #[serde(default)]
    pub answers: Vec<UserAnswer>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAnswer {
    pub question_id: QuestionId,
    pub question_text: String,
    pub question_type: String,
    #[serde(default)]
    pub answer_text: Option<String>,
    #[serde(default)]
    pub rating_value: Option<i32>,
}

/// Returned by a successful login. The token is kept secret in logs.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: SecretBox<String>,
    pub user_id: UserId,
    pub email: String,
    pub name: String,
    pub role: Role,
}

/// The user data persisted next to the token after login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredUser {
    pub user_id: UserId,
    pub email: String,
    pub name: String,
    pub role: Role,
}

impl From<&LoginResponse> for StoredUser {
    fn from(login: &LoginResponse) -> Self {
        Self {
            user_id: login.user_id,
            email: login.email.clone(),
            name: login.name.clone(),
            role: login.role,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    /// Short label, e.g. "Jan 05".
    pub date: String,
    pub responses: u64,
    pub full_date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityItem {
    pub id: i64,
    pub action: String,
    pub survey: String,
    /// Relative time, e.g. "2 hours ago".
    pub time: String,
    #[serde(default)]
    pub timestamp: Option<Timestamp>,
    /// Either "survey" or "response".
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentResponse {
    pub response_id: ResponseId,
    pub survey_id: SurveyId,
    pub survey_name: String,
    #[serde(default)]
    pub submitted_at: Option<Timestamp>,
    pub user_name: String,
    pub is_anonymous: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardOverview {
    pub total_surveys: u64,
    pub active_surveys: u64,
    pub total_responses: u64,
    pub responses_this_week: u64,
    pub responses_last_week: u64,
    pub new_surveys_this_month: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyPerformance {
    pub survey_id: SurveyId,
    pub survey_title: String,
    pub total_responses: u64,
    pub status: SurveyStatus,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
}

/// Pagination metadata attached to a page of results.
///
/// Missing fields fall back to the values of an empty first page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageMeta {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_elements: u64,
    pub page_size: u32,
    pub number_of_elements: u32,
    pub first: bool,
    pub last: bool,
    pub empty: bool,
}

impl Default for PageMeta {
    fn default() -> Self {
        Self::initial(0)
    }
}

impl PageMeta {
    /// Metadata before anything has been fetched.
    pub fn initial(page_size: u32) -> Self {
        Self {
            current_page: 0,
            total_pages: 0,
            total_elements: 0,
            page_size,
            number_of_elements: 0,
            first: true,
            last: true,
            empty: true,
        }
    }

    /// Metadata for an unpaginated result holding `len` items.
    pub fn single_page(len: usize) -> Self {
        let len32 = u32::try_from(len).unwrap_or(u32::MAX);
        Self {
            current_page: 0,
            total_pages: 1,
            total_elements: len as u64,
            page_size: len32,
            number_of_elements: len32,
            first: true,
            last: true,
            empty: len == 0,
        }
    }
}

/// A page of results with its metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub pagination: PageMeta,
}
