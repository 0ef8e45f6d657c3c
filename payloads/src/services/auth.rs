use super::Validation;
use crate::requests::{
    ForgotPassword, LoginCredentials, PASSWORD_MIN_LEN, ResetPassword,
};
use crate::responses::{LoginResponse, StoredUser, UserProfile};
use crate::{ApiClient, ClientError, Envelope};
use serde_json::Value;

pub struct AuthService<'a> {
    pub(crate) client: &'a ApiClient,
}

impl AuthService<'_> {
    /// Log in and store the returned token and user data.
    pub async fn login(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<Envelope<StoredUser>, ClientError> {
        let envelope: Envelope<LoginResponse> =
            self.client.post("/auth/login", credentials).await?;
        let user = StoredUser::from(&*envelope);
        let user_data = serde_json::to_string(&user)?;
        self.client.credentials().save(&envelope.token, &user_data);
        tracing::info!(user_id = %user.user_id, "logged in");
        Ok(envelope.map(|_| user))
    }

    /// End the session on the server. Local credentials are cleared whatever
    /// the server answers.
    pub async fn logout(&self) -> Result<Envelope<()>, ClientError> {
        let result: Result<Envelope<Value>, _> =
            self.client.empty_post("/auth/logout").await;
        self.client.credentials().clear();
        Ok(result?.map(|_| ()))
    }

    pub async fn me(&self) -> Result<Envelope<UserProfile>, ClientError> {
        self.client.get("/auth/me").await
    }

    /// Ask for a reset link. The backend answers the same way whether or not
    /// the address is registered.
    pub async fn request_password_reset(
        &self,
        email: &str,
    ) -> Result<Envelope<()>, ClientError> {
        let body = ForgotPassword {
            email: email.to_string(),
        };
        let envelope: Envelope<Value> =
            self.client.post("/auth/forgot-password", &body).await?;
        Ok(envelope.map(|_| ()))
    }

    pub async fn validate_reset_token(
        &self,
        token: &str,
    ) -> Result<Envelope<bool>, ClientError> {
        self.client
            .get(&format!("/auth/reset-password/validate/{token}"))
            .await
    }

    pub async fn reset_password(
        &self,
        token: &str,
        new_password: &str,
    ) -> Result<Envelope<()>, ClientError> {
        let body = ResetPassword {
            token: token.to_string(),
            new_password: new_password.to_string(),
        };
        let envelope: Envelope<Value> =
            self.client.post("/auth/reset-password", &body).await?;
        Ok(envelope.map(|_| ()))
    }
}

/// Check a new password and its confirmation.
///
/// Errors are keyed `password` and `confirmPassword`, matching the reset form.
pub fn validate_new_password(password: &str, confirmation: &str) -> Validation {
    let mut validation = Validation::default();

    if password.is_empty() {
        validation.reject("password", "Password is required");
    } else if password.chars().count() < PASSWORD_MIN_LEN {
        validation.reject("password", "Password must be at least 6 characters");
    }

    if confirmation.is_empty() {
        validation.reject("confirmPassword", "Please confirm your password");
    } else if password != confirmation {
        validation.reject("confirmPassword", "Passwords do not match");
    }

    validation
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_password_rules() {
        let validation = validate_new_password("abc", "");
        assert_eq!(
            validation.errors["password"],
            "Password must be at least 6 characters"
        );
        assert_eq!(
            validation.errors["confirmPassword"],
            "Please confirm your password"
        );

        let validation = validate_new_password("secret1", "secret2");
        assert_eq!(validation.errors.len(), 1);
        assert_eq!(
            validation.errors["confirmPassword"],
            "Passwords do not match"
        );

        assert!(validate_new_password("secret1", "secret1").is_valid());
    }
}
