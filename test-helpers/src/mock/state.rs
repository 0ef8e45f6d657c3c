//! In-memory data behind the mock backend.

use jiff::{Span, Timestamp};
use payloads::responses::{Question, Survey, SurveyResponse, User};
use payloads::{
    Answer, QuestionId, ResponseId, Role, SurveyId, SurveyStatus, UserId,
};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const USER_EMAIL: &str = "user@example.com";
pub const SEED_PASSWORD: &str = "password123";

#[derive(Debug, Clone)]
pub struct UserRecord {
    pub user: User,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct SurveyRecord {
    pub survey: Survey,
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone)]
pub struct ResponseRecord {
    pub response: SurveyResponse,
    pub user_id: Option<UserId>,
}

/// Everything the mock backend knows.
#[derive(Debug, Default)]
pub struct BackendState {
    pub users: Vec<UserRecord>,
    pub surveys: Vec<SurveyRecord>,
    pub responses: Vec<ResponseRecord>,
    /// Bearer token to the user it was issued to.
    pub sessions: HashMap<String, UserId>,
    /// Password reset token to the user who asked for it.
    pub reset_tokens: HashMap<String, UserId>,
    next_id: i64,
}

impl BackendState {
    /// Two users, an active survey with one response and a draft survey.
    pub fn seeded() -> Self {
        let now = Timestamp::now();
        let mut state = Self {
            next_id: 100,
            ..Self::default()
        };

        state.users.push(UserRecord {
            user: User {
                id: UserId(1),
                email: ADMIN_EMAIL.to_string(),
                name: "Admin".to_string(),
                role: Role::Admin,
                created_at: Some(now),
            },
            password: SEED_PASSWORD.to_string(),
        });
        state.users.push(UserRecord {
            user: User {
                id: UserId(2),
                email: USER_EMAIL.to_string(),
                name: "Riley".to_string(),
                role: Role::User,
                created_at: Some(now),
            },
            password: SEED_PASSWORD.to_string(),
        });

        state.surveys.push(SurveyRecord {
            survey: Survey {
                id: SurveyId(1),
                title: "Customer Satisfaction".to_string(),
                description: Some("How did we do?".to_string()),
                status: SurveyStatus::Active,
                created_at: Some(now - Span::new().hours(48)),
                updated_at: Some(now - Span::new().hours(48)),
                end_date: None,
                total_questions: 0,
                total_responses: 0,
                completion_rate: 0,
            },
            questions: vec![
                Question {
                    id: QuestionId(1),
                    kind: "text".to_string(),
                    question_text: "What did you like?".to_string(),
                    options_json: None,
                    order_number: Some(1),
                },
                Question {
                    id: QuestionId(2),
                    kind: "rating".to_string(),
                    question_text: "Rate us".to_string(),
                    options_json: None,
                    order_number: Some(2),
                },
            ],
        });
        state.surveys.push(SurveyRecord {
            survey: Survey {
                id: SurveyId(2),
                title: "Team Feedback".to_string(),
                description: Some("Internal retro".to_string()),
                status: SurveyStatus::Draft,
                created_at: Some(now - Span::new().hours(2)),
                updated_at: Some(now - Span::new().hours(2)),
                end_date: None,
                total_questions: 0,
                total_responses: 0,
                completion_rate: 0,
            },
            questions: Vec::new(),
        });

        state.responses.push(ResponseRecord {
            response: SurveyResponse {
                id: ResponseId(1),
                survey_id: SurveyId(1),
                answers: vec![
                    Answer {
                        question_id: QuestionId(1),
                        answer_value: Some("Fast delivery".to_string()),
                        rating_value: None,
                    },
                    Answer {
                        question_id: QuestionId(2),
                        answer_value: None,
                        rating_value: Some(5),
                    },
                ],
                respondent_name: Some("Riley".to_string()),
                submitted_at: Some(now - Span::new().hours(1)),
            },
            user_id: Some(UserId(2)),
        });

        state
    }

    pub fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    pub fn user(&self, id: UserId) -> Option<&UserRecord> {
        self.users.iter().find(|u| u.user.id == id)
    }

    pub fn survey(&self, id: SurveyId) -> Option<&SurveyRecord> {
        self.surveys.iter().find(|s| s.survey.id == id)
    }

    pub fn responses_for(&self, id: SurveyId) -> Vec<SurveyResponse> {
        self.responses
            .iter()
            .filter(|r| r.response.survey_id == id)
            .map(|r| r.response.clone())
            .collect()
    }

    /// A survey with its statistics filled in from the stored responses.
    pub fn survey_with_stats(&self, record: &SurveyRecord) -> Survey {
        let responses = self.responses_for(record.survey.id);
        let total_questions = record.questions.len();
        let complete = responses
            .iter()
            .filter(|r| {
                total_questions > 0 && r.answers.len() >= total_questions
            })
            .count();
        let completion_rate = if responses.is_empty() {
            0
        } else {
            (complete * 100 / responses.len()) as u32
        };

        Survey {
            total_questions: total_questions as u32,
            total_responses: responses.len() as u32,
            completion_rate,
            ..record.survey.clone()
        }
    }

    pub fn surveys_with_stats(&self) -> Vec<Survey> {
        self.surveys
            .iter()
            .map(|record| self.survey_with_stats(record))
            .collect()
    }
}

/// A request as the mock backend received it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: String,
    pub authorization: Option<String>,
}

impl RecordedRequest {
    /// Value of one query parameter, if present.
    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v)
    }
}

/// Shared between the server workers and the test that spawned them.
#[derive(Debug)]
pub struct MockBackend {
    state: Mutex<BackendState>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self {
            state: Mutex::new(BackendState::seeded()),
            requests: Mutex::new(Vec::new()),
        }
    }
}

impl MockBackend {
    pub fn state(&self) -> MutexGuard<'_, BackendState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn record(&self, request: RecordedRequest) {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
