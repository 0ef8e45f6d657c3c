pub mod api_client;
pub mod config;
pub mod requests;
pub mod responses;
pub mod services;
pub mod session;

pub use api_client::{
    ApiClient, ClientError, Envelope, ErrorDetails, extract_data,
    is_auth_endpoint,
};
pub use config::ClientConfig;
pub use session::{
    CredentialStore, MemoryCredentials, Observers, SessionEvents, Subscription,
};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Field name to human-readable message, as shown next to form inputs.
pub type FieldErrors = BTreeMap<String, String>;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(transparent)]
pub struct SurveyId(pub i64);

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(transparent)]
pub struct ResponseId(pub i64);

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(transparent)]
pub struct QuestionId(pub i64);

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(transparent)]
pub struct UserId(pub i64);

/// Records that carry a server-assigned identifier.
///
/// List state is keyed on this: an update replaces the item whose id matches,
/// a delete removes it.
pub trait Identified {
    type Id: Copy + PartialEq + std::fmt::Display + 'static;

    fn id(&self) -> Self::Id;
}

/// Publication status of a survey.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SurveyStatus {
    #[display("ACTIVE")]
    Active,
    #[display("INACTIVE")]
    Inactive,
    #[display("DRAFT")]
    Draft,
}

impl SurveyStatus {
    pub const ALL: [SurveyStatus; 3] =
        [SurveyStatus::Active, SurveyStatus::Inactive, SurveyStatus::Draft];

    /// Human-readable label, e.g. "Active".
    pub fn label(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
            Self::Draft => "Draft",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid survey status")]
pub struct InvalidSurveyStatus;

impl FromStr for SurveyStatus {
    type Err = InvalidSurveyStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "ACTIVE" => Ok(Self::Active),
            "INACTIVE" => Ok(Self::Inactive),
            "DRAFT" => Ok(Self::Draft),
            _ => Err(InvalidSurveyStatus),
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    #[display("ADMIN")]
    Admin,
    #[display("USER")]
    User,
}

/// A single answer, as submitted by a respondent and as returned with a
/// response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub question_id: QuestionId,
    /// Free text or the selected option. Absent for rating questions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer_value: Option<String>,
    /// Rating from 0 to 5. Absent for non-rating questions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating_value: Option<i32>,
}

impl Identified for responses::Survey {
    type Id = SurveyId;

    fn id(&self) -> SurveyId {
        self.id
    }
}

impl Identified for responses::SurveyResponse {
    type Id = ResponseId;

    fn id(&self) -> ResponseId {
        self.id
    }
}

impl Identified for responses::User {
    type Id = UserId;

    fn id(&self) -> UserId {
        self.id
    }
}
