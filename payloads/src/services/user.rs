use super::Validation;
use crate::requests::{
    CreateUser, PASSWORD_MIN_LEN, USER_NAME_MAX_LEN, UpdateUser,
};
use crate::responses::{User, UserDashboard, UserOwnResponse};
use crate::{ApiClient, ClientError, Envelope, SurveyId, UserId};

pub struct UserService<'a> {
    pub(crate) client: &'a ApiClient,
}

impl UserService<'_> {
    /// Register a new account. Sent without a bearer token.
    pub async fn create_user(
        &self,
        details: &CreateUser,
    ) -> Result<Envelope<User>, ClientError> {
        self.client.post("/users/create", details).await
    }

    pub async fn get_user_profile(
        &self,
        user_id: UserId,
    ) -> Result<Envelope<User>, ClientError> {
        self.client.get(&format!("/users/{user_id}")).await
    }

    pub async fn update_user(
        &self,
        user_id: UserId,
        details: &UpdateUser,
    ) -> Result<Envelope<User>, ClientError> {
        self.client.put(&format!("/users/{user_id}"), details).await
    }

    pub async fn get_user_dashboard(
        &self,
    ) -> Result<Envelope<UserDashboard>, ClientError> {
        self.client.get("/users/dashboard").await
    }

    /// The current user's own response to a survey.
    pub async fn get_user_response(
        &self,
        survey_id: SurveyId,
    ) -> Result<Envelope<UserOwnResponse>, ClientError> {
        self.client
            .get(&format!("/users/responses/survey/{survey_id}"))
            .await
    }
}

/// Check sign-up input before it is sent.
pub fn validate_user(name: &str, email: &str, password: &str) -> Validation {
    let mut validation = Validation::default();

    if name.trim().is_empty() {
        validation.reject("name", "Name is required");
    } else if name.chars().count() > USER_NAME_MAX_LEN {
        validation.reject("name", "Name must be 100 characters or less");
    }

    if email.trim().is_empty() {
        validation.reject("email", "Email is required");
    } else if !is_valid_email(email) {
        validation.reject("email", "Please enter a valid email address");
    }

    if password.is_empty() {
        validation.reject("password", "Password is required");
    } else if password.chars().count() < PASSWORD_MIN_LEN {
        validation.reject("password", "Password must be at least 6 characters");
    }

    validation
}

/// `local@domain.tld` with no whitespace and exactly one `@`.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    // Some dot in the domain must have text on both sides.
    domain
        .match_indices('.')
        .any(|(i, _)| i > 0 && i + 1 < domain.len())
}
