use super::{MockBackend, MockError, UserRecord, authenticate, envelope};
use actix_web::{HttpRequest, HttpResponse, get, post, put, web};
use jiff::Timestamp;
use payloads::requests::{CreateUser, PASSWORD_MIN_LEN, UpdateUser};
use payloads::responses::{
    User, UserAnswer, UserDashboard, UserDashboardStats, UserOwnResponse,
    UserSurvey,
};
use payloads::{Role, SurveyId, SurveyStatus, UserId};

#[tracing::instrument(skip_all, fields(email = %details.email))]
#[post("/users/create")]
pub async fn create(
    details: web::Json<CreateUser>,
    backend: web::Data<MockBackend>,
) -> Result<HttpResponse, MockError> {
    let mut errors = Vec::new();
    if details.name.trim().is_empty() {
        errors.push("name: must not be blank");
    }
    if !details.email.contains('@') {
        errors.push("email: must be a well-formed email address");
    }
    if details.password.chars().count() < PASSWORD_MIN_LEN {
        errors.push("password: size must be at least 6");
    }
    if !errors.is_empty() {
        return Err(MockError::bad_request("Validation failed", &errors));
    }

    let mut state = backend.state();
    if state.users.iter().any(|u| u.user.email == details.email) {
        return Err(MockError::bad_request(
            "User registration failed",
            &["email: must be unique"],
        ));
    }

    let user = User {
        id: UserId(state.next_id()),
        email: details.email.clone(),
        name: details.name.clone(),
        role: Role::User,
        created_at: Some(Timestamp::now()),
    };
    state.users.push(UserRecord {
        user: user.clone(),
        password: details.password.clone(),
    });
    Ok(envelope(user, "User created successfully"))
}

#[get("/users/dashboard")]
pub async fn dashboard(
    request: HttpRequest,
    backend: web::Data<MockBackend>,
) -> Result<HttpResponse, MockError> {
    let user_id = authenticate(&request, &backend)?;
    let state = backend.state();

    let mut pending_surveys = Vec::new();
    let mut completed_surveys = Vec::new();
    for record in &state.surveys {
        let own = state.responses.iter().find(|r| {
            r.user_id == Some(user_id)
                && r.response.survey_id == record.survey.id
        });
        let entry = UserSurvey {
            id: record.survey.id,
            title: record.survey.title.clone(),
            description: record.survey.description.clone(),
            status: match own {
                Some(_) => "completed".to_string(),
                None => "pending".to_string(),
            },
            deadline: record.survey.end_date,
            completed_date: own.and_then(|r| r.response.submitted_at),
            estimated_time: Some(format!(
                "{} min",
                record.questions.len().max(1)
            )),
            responses: None,
        };
        match own {
            Some(_) => completed_surveys.push(entry),
            None if record.survey.status == SurveyStatus::Active => {
                pending_surveys.push(entry)
            }
            None => {}
        }
    }

    let dashboard = UserDashboard {
        stats: UserDashboardStats {
            completed_surveys_count: completed_surveys.len() as u32,
            average_completion_time_minutes: None,
            total_time_spent_minutes: None,
        },
        pending_surveys,
        completed_surveys,
    };
    Ok(envelope(dashboard, "Dashboard retrieved successfully"))
}

#[get("/users/responses/survey/{id}")]
pub async fn own_response(
    request: HttpRequest,
    id: web::Path<i64>,
    backend: web::Data<MockBackend>,
) -> Result<HttpResponse, MockError> {
    let user_id = authenticate(&request, &backend)?;
    let survey_id = SurveyId(id.into_inner());
    let state = backend.state();
    let survey = state.survey(survey_id).ok_or_else(|| {
        MockError::NotFound(format!("Survey {survey_id} not found"))
    })?;
    let record = state
        .responses
        .iter()
        .find(|r| {
            r.user_id == Some(user_id) && r.response.survey_id == survey_id
        })
        .ok_or_else(|| {
            MockError::NotFound("No response found for this survey".to_string())
        })?;

    let answers = record
        .response
        .answers
        .iter()
        .map(|answer| {
            let question =
                survey.questions.iter().find(|q| q.id == answer.question_id);
            UserAnswer {
                question_id: answer.question_id,
                question_text: question
                    .map(|q| q.question_text.clone())
                    .unwrap_or_default(),
                question_type: question
                    .map(|q| q.kind.clone())
                    .unwrap_or_default(),
                answer_text: answer.answer_value.clone(),
                rating_value: answer.rating_value,
            }
        })
        .collect();

    let own = UserOwnResponse {
        response_id: record.response.id,
        survey_id,
        submitted_at: record.response.submitted_at,
        completion_time_seconds: None,
        answers,
    };
    Ok(envelope(own, "Response retrieved successfully"))
}

#[get("/users/{id}")]
pub async fn get(
    request: HttpRequest,
    id: web::Path<i64>,
    backend: web::Data<MockBackend>,
) -> Result<HttpResponse, MockError> {
    authenticate(&request, &backend)?;
    let id = UserId(id.into_inner());
    let user = backend
        .state()
        .user(id)
        .map(|record| record.user.clone())
        .ok_or_else(|| MockError::NotFound(format!("User {id} not found")))?;
    Ok(envelope(user, "User retrieved successfully"))
}

/// Users may edit themselves; admins may edit anyone.
#[put("/users/{id}")]
pub async fn update(
    request: HttpRequest,
    id: web::Path<i64>,
    details: web::Json<UpdateUser>,
    backend: web::Data<MockBackend>,
) -> Result<HttpResponse, MockError> {
    let caller = authenticate(&request, &backend)?;
    let id = UserId(id.into_inner());

    let mut state = backend.state();
    let is_admin = state
        .user(caller)
        .is_some_and(|record| record.user.role == Role::Admin);
    if caller != id && !is_admin {
        return Err(MockError::Forbidden);
    }
    if let Some(email) = &details.email {
        if state
            .users
            .iter()
            .any(|u| u.user.email == *email && u.user.id != id)
        {
            return Err(MockError::bad_request(
                "User update failed",
                &["email: must be unique"],
            ));
        }
    }

    let record = state
        .users
        .iter_mut()
        .find(|u| u.user.id == id)
        .ok_or_else(|| MockError::NotFound(format!("User {id} not found")))?;
    if let Some(name) = &details.name {
        record.user.name = name.clone();
    }
    if let Some(email) = &details.email {
        record.user.email = email.clone();
    }
    Ok(envelope(record.user.clone(), "User updated successfully"))
}
