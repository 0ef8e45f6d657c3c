use super::{MockBackend, MockError, authenticate, bearer_token, envelope};
use actix_web::{HttpRequest, HttpResponse, get, post, web};
use payloads::requests::{
    ForgotPassword, LoginCredentials, PASSWORD_MIN_LEN, ResetPassword,
};
use payloads::responses::UserProfile;
use serde_json::json;
use uuid::Uuid;

#[tracing::instrument(skip_all, fields(email = %credentials.email))]
#[post("/auth/login")]
pub async fn login(
    credentials: web::Json<LoginCredentials>,
    backend: web::Data<MockBackend>,
) -> Result<HttpResponse, MockError> {
    let mut state = backend.state();
    let user = state
        .users
        .iter()
        .find(|u| {
            u.user.email == credentials.email
                && u.password == credentials.password
        })
        .map(|u| u.user.clone())
        .ok_or_else(|| {
            MockError::Unauthorized(
                "Invalid credentials: wrong email or password".to_string(),
            )
        })?;

    let token = Uuid::new_v4().to_string();
    state.sessions.insert(token.clone(), user.id);
    Ok(envelope(
        json!({
            "token": token,
            "userId": user.id,
            "email": user.email,
            "name": user.name,
            "role": user.role,
        }),
        "Login successful",
    ))
}

#[post("/auth/logout")]
pub async fn logout(
    request: HttpRequest,
    backend: web::Data<MockBackend>,
) -> Result<HttpResponse, MockError> {
    authenticate(&request, &backend)?;
    if let Some(token) = bearer_token(&request) {
        backend.state().sessions.remove(&token);
    }
    Ok(envelope("", "Logout successful"))
}

#[get("/auth/me")]
pub async fn me(
    request: HttpRequest,
    backend: web::Data<MockBackend>,
) -> Result<HttpResponse, MockError> {
    let user_id = authenticate(&request, &backend)?;
    let state = backend.state();
    let record = state
        .user(user_id)
        .ok_or_else(|| MockError::NotFound("User not found".to_string()))?;
    let profile = UserProfile {
        user_id: record.user.id,
        email: record.user.email.clone(),
        name: record.user.name.clone(),
        role: record.user.role,
        created_at: record.user.created_at,
    };
    Ok(envelope(profile, "User profile retrieved successfully"))
}

/// Issues a reset token when the address is registered. The answer is the
/// same either way.
#[post("/auth/forgot-password")]
pub async fn forgot_password(
    body: web::Json<ForgotPassword>,
    backend: web::Data<MockBackend>,
) -> HttpResponse {
    let mut state = backend.state();
    let user_id = state
        .users
        .iter()
        .find(|u| u.user.email == body.email)
        .map(|u| u.user.id);
    if let Some(user_id) = user_id {
        state.reset_tokens.insert(Uuid::new_v4().to_string(), user_id);
    }
    envelope(
        "",
        "If an account with that email exists, a password reset link has been sent",
    )
}

#[post("/auth/reset-password")]
pub async fn reset_password(
    body: web::Json<ResetPassword>,
    backend: web::Data<MockBackend>,
) -> Result<HttpResponse, MockError> {
    if body.new_password.chars().count() < PASSWORD_MIN_LEN {
        return Err(MockError::bad_request(
            "Password reset failed: password too short",
            &["newPassword: must be at least 6 characters"],
        ));
    }

    let mut state = backend.state();
    let user_id = state.reset_tokens.remove(&body.token).ok_or_else(|| {
        MockError::bad_request(
            "Password reset failed: Invalid or expired token",
            &[],
        )
    })?;
    if let Some(record) =
        state.users.iter_mut().find(|u| u.user.id == user_id)
    {
        record.password = body.new_password.clone();
    }
    Ok(envelope("", "Password has been reset successfully"))
}

#[get("/auth/reset-password/validate/{token}")]
pub async fn validate_reset_token(
    token: web::Path<String>,
    backend: web::Data<MockBackend>,
) -> HttpResponse {
    let valid = backend.state().reset_tokens.contains_key(token.as_str());
    let message = if valid {
        "Token is valid"
    } else {
        "Token is invalid or expired"
    };
    envelope(valid, message)
}
