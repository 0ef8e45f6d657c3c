use crate::requests::SubmitResponse;
use crate::responses::SurveyResponse;
use crate::{ApiClient, ClientError, Envelope, ResponseId, SurveyId};
use jiff::Timestamp;
use jiff::tz::TimeZone;
use serde_json::Value;

pub struct ResponseService<'a> {
    pub(crate) client: &'a ApiClient,
}

impl ResponseService<'_> {
    pub async fn get_all_responses(
        &self,
    ) -> Result<Envelope<Vec<SurveyResponse>>, ClientError> {
        self.client.get("/responses/list").await
    }

    pub async fn get_responses_by_survey(
        &self,
        survey_id: SurveyId,
    ) -> Result<Envelope<Vec<SurveyResponse>>, ClientError> {
        self.client
            .get(&format!("/responses/survey/{survey_id}"))
            .await
    }

    pub async fn get_response_count(
        &self,
    ) -> Result<Envelope<u64>, ClientError> {
        self.client.get("/responses/count").await
    }

    pub async fn get_response(
        &self,
        response_id: ResponseId,
    ) -> Result<Envelope<SurveyResponse>, ClientError> {
        self.client.get(&format!("/responses/{response_id}")).await
    }

    pub async fn delete_response(
        &self,
        response_id: ResponseId,
    ) -> Result<Envelope<()>, ClientError> {
        let envelope: Envelope<Value> = self
            .client
            .delete(&format!("/responses/{response_id}"))
            .await?;
        Ok(envelope.map(|_| ()))
    }

    pub async fn submit_survey_response(
        &self,
        survey_id: SurveyId,
        submission: &SubmitResponse,
    ) -> Result<Envelope<SurveyResponse>, ClientError> {
        self.client.surveys().submit_response(survey_id, submission).await
    }
}

/// A response with its display strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedResponse {
    pub response: SurveyResponse,
    pub formatted_submitted_at: String,
    pub respondent_display: String,
    pub answer_count: usize,
}

pub fn format_response(
    response: &SurveyResponse,
    tz: &TimeZone,
) -> FormattedResponse {
    FormattedResponse {
        response: response.clone(),
        formatted_submitted_at: format_date_time(response.submitted_at, tz),
        respondent_display: response
            .respondent_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or("Anonymous User")
            .to_string(),
        answer_count: response.answers.len(),
    }
}

/// "Jan 5, 2025, 10:00 AM", or "N/A" when there is no date.
pub fn format_date_time(timestamp: Option<Timestamp>, tz: &TimeZone) -> String {
    match timestamp {
        Some(ts) => ts
            .to_zoned(tz.clone())
            .strftime("%b %-d, %Y, %I:%M %p")
            .to_string(),
        None => "N/A".to_string(),
    }
}
