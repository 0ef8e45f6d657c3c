use super::{
    MockBackend, MockError, ResponseRecord, SurveyRecord, authenticate,
    authenticate_admin, envelope,
};
use actix_web::{HttpRequest, HttpResponse, delete, get, post, put, web};
use jiff::Timestamp;
use payloads::requests::{SubmitResponse, SurveyDraft};
use payloads::responses::{
    AnswerSummary, PublicSurvey, QuestionResult, Survey, SurveyResponse,
    SurveyResults, SurveyStats,
};
use payloads::{ResponseId, SurveyId, SurveyStatus};

fn not_found(id: SurveyId) -> MockError {
    MockError::NotFound(format!("Survey {id} not found"))
}

/// Server-side rules for survey bodies, reported as `field: message`.
fn check_draft(draft: &SurveyDraft) -> Result<(), MockError> {
    let mut errors = Vec::new();
    if draft.title.trim().is_empty() {
        errors.push("title: must not be blank".to_string());
    }
    if draft.title.chars().count() > payloads::requests::SURVEY_TITLE_MAX_LEN {
        errors.push("title: size must be between 1 and 200".to_string());
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(MockError::Validation {
            message: "Validation failed".to_string(),
            errors,
        })
    }
}

#[get("/surveys/admin")]
pub async fn list_admin(
    request: HttpRequest,
    backend: web::Data<MockBackend>,
) -> Result<HttpResponse, MockError> {
    authenticate_admin(&request, &backend)?;
    let surveys = backend.state().surveys_with_stats();
    let message = format!("Retrieved {} surveys", surveys.len());
    Ok(envelope(surveys, &message))
}

#[get("/surveys")]
pub async fn list(
    request: HttpRequest,
    backend: web::Data<MockBackend>,
) -> Result<HttpResponse, MockError> {
    authenticate(&request, &backend)?;
    let surveys = backend.state().surveys_with_stats();
    Ok(envelope(surveys, "Surveys retrieved successfully"))
}

#[tracing::instrument(skip_all, fields(title = %draft.title))]
#[post("/surveys")]
pub async fn create(
    request: HttpRequest,
    draft: web::Json<SurveyDraft>,
    backend: web::Data<MockBackend>,
) -> Result<HttpResponse, MockError> {
    authenticate_admin(&request, &backend)?;
    check_draft(&draft)?;

    let mut state = backend.state();
    let now = Timestamp::now();
    let record = SurveyRecord {
        survey: Survey {
            id: SurveyId(state.next_id()),
            title: draft.title.clone(),
            description: Some(draft.description.clone()),
            status: draft.status.unwrap_or(SurveyStatus::Draft),
            created_at: Some(now),
            updated_at: Some(now),
            end_date: draft.end_date,
            total_questions: 0,
            total_responses: 0,
            completion_rate: 0,
        },
        questions: Vec::new(),
    };
    let survey = state.survey_with_stats(&record);
    state.surveys.push(record);
    Ok(envelope(survey, "Survey created successfully"))
}

#[get("/surveys/{id}")]
pub async fn get(
    request: HttpRequest,
    id: web::Path<i64>,
    backend: web::Data<MockBackend>,
) -> Result<HttpResponse, MockError> {
    authenticate(&request, &backend)?;
    let id = SurveyId(id.into_inner());
    let state = backend.state();
    let record = state.survey(id).ok_or_else(|| not_found(id))?;
    Ok(envelope(state.survey_with_stats(record), "Survey retrieved"))
}

#[put("/surveys/{id}")]
pub async fn update(
    request: HttpRequest,
    id: web::Path<i64>,
    draft: web::Json<SurveyDraft>,
    backend: web::Data<MockBackend>,
) -> Result<HttpResponse, MockError> {
    authenticate_admin(&request, &backend)?;
    check_draft(&draft)?;
    let id = SurveyId(id.into_inner());

    let mut state = backend.state();
    let record = state
        .surveys
        .iter_mut()
        .find(|s| s.survey.id == id)
        .ok_or_else(|| not_found(id))?;
    record.survey.title = draft.title.clone();
    record.survey.description = Some(draft.description.clone());
    if let Some(status) = draft.status {
        record.survey.status = status;
    }
    record.survey.end_date = draft.end_date.or(record.survey.end_date);
    record.survey.updated_at = Some(Timestamp::now());

    let record = record.clone();
    Ok(envelope(
        state.survey_with_stats(&record),
        "Survey updated successfully",
    ))
}

#[delete("/surveys/{id}")]
pub async fn delete(
    request: HttpRequest,
    id: web::Path<i64>,
    backend: web::Data<MockBackend>,
) -> Result<HttpResponse, MockError> {
    authenticate_admin(&request, &backend)?;
    let id = SurveyId(id.into_inner());

    let mut state = backend.state();
    let before = state.surveys.len();
    state.surveys.retain(|s| s.survey.id != id);
    if state.surveys.len() == before {
        return Err(not_found(id));
    }
    state.responses.retain(|r| r.response.survey_id != id);
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": "Survey deleted successfully",
        "status": 200,
    })))
}

#[get("/surveys/{id}/public")]
pub async fn get_public(
    id: web::Path<i64>,
    backend: web::Data<MockBackend>,
) -> Result<HttpResponse, MockError> {
    let id = SurveyId(id.into_inner());
    let state = backend.state();
    let record = state.survey(id).ok_or_else(|| not_found(id))?;
    let survey = PublicSurvey {
        id: record.survey.id,
        title: record.survey.title.clone(),
        description: record.survey.description.clone(),
        status: record.survey.status,
        created_at: record.survey.created_at,
        updated_at: record.survey.updated_at,
        end_date: record.survey.end_date,
        questions: record.questions.clone(),
    };
    Ok(envelope(survey, "Survey retrieved"))
}

#[get("/surveys/{id}/results")]
pub async fn get_results(
    request: HttpRequest,
    id: web::Path<i64>,
    backend: web::Data<MockBackend>,
) -> Result<HttpResponse, MockError> {
    authenticate_admin(&request, &backend)?;
    let id = SurveyId(id.into_inner());
    let state = backend.state();
    let record = state.survey(id).ok_or_else(|| not_found(id))?;
    let responses = state.responses_for(id);

    let question_results = record
        .questions
        .iter()
        .map(|question| {
            let answers: Vec<AnswerSummary> = responses
                .iter()
                .flat_map(|r| {
                    r.answers
                        .iter()
                        .filter(|a| a.question_id == question.id)
                        .map(|a| AnswerSummary {
                            answer_id: r.id.0,
                            answer_text: a
                                .answer_value
                                .clone()
                                .or_else(|| a.rating_value.map(|v| v.to_string())),
                            submitted_at: r.submitted_at,
                        })
                })
                .collect();
            QuestionResult {
                question_id: question.id,
                question_text: question.question_text.clone(),
                question_type: question.kind.clone(),
                order_number: question.order_number,
                total_answers: answers.len() as u32,
                answers,
            }
        })
        .collect();

    let results = SurveyResults {
        survey_id: id,
        survey_title: record.survey.title.clone(),
        survey_description: record.survey.description.clone(),
        survey_created_at: record.survey.created_at,
        total_responses: responses.len() as u32,
        total_questions: record.questions.len() as u32,
        question_results,
    };
    Ok(envelope(results, "Survey results retrieved"))
}

#[get("/surveys/{id}/stats")]
pub async fn get_stats(
    request: HttpRequest,
    id: web::Path<i64>,
    backend: web::Data<MockBackend>,
) -> Result<HttpResponse, MockError> {
    authenticate(&request, &backend)?;
    let id = SurveyId(id.into_inner());
    let state = backend.state();
    let record = state.survey(id).ok_or_else(|| not_found(id))?;
    let survey = state.survey_with_stats(record);
    let stats = SurveyStats {
        survey_id: id,
        total_questions: survey.total_questions,
        total_responses: survey.total_responses,
        completion_rate: survey.completion_rate,
    };
    Ok(envelope(stats, "Survey statistics retrieved"))
}

#[post("/public/surveys/{id}/responses")]
pub async fn submit_public_response(
    request: HttpRequest,
    id: web::Path<i64>,
    body: web::Json<SubmitResponse>,
    backend: web::Data<MockBackend>,
) -> Result<HttpResponse, MockError> {
    let id = SurveyId(id.into_inner());
    // Anonymous submissions are allowed; a valid token attributes it.
    let user_id = authenticate(&request, &backend).ok();

    let mut state = backend.state();
    let record = state.survey(id).ok_or_else(|| not_found(id))?;
    if record.survey.status != SurveyStatus::Active {
        return Err(MockError::bad_request(
            "Survey is not accepting responses",
            &[],
        ));
    }
    if body.answers.is_empty() {
        return Err(MockError::bad_request(
            "Validation failed",
            &["answers: must not be empty"],
        ));
    }

    let response = SurveyResponse {
        id: ResponseId(state.next_id()),
        survey_id: id,
        answers: body.answers.clone(),
        respondent_name: body.respondent_name.clone(),
        submitted_at: Some(Timestamp::now()),
    };
    state.responses.push(ResponseRecord {
        response: response.clone(),
        user_id,
    });
    Ok(envelope(response, "Response submitted successfully"))
}
