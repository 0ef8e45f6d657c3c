use super::Validation;
use crate::requests::{
    SURVEY_DESCRIPTION_MAX_LEN, SURVEY_TITLE_MAX_LEN, SubmitResponse,
    SurveyDraft,
};
use crate::responses::{
    PublicSurvey, Survey, SurveyResponse, SurveyResults, SurveyStats,
};
use crate::{ApiClient, ClientError, Envelope, SurveyId, SurveyStatus};
use jiff::tz::TimeZone;
use jiff::{Timestamp, Zoned};
use serde_json::Value;

pub struct SurveyService<'a> {
    pub(crate) client: &'a ApiClient,
}

impl SurveyService<'_> {
    /// All surveys with their response statistics (admin view).
    pub async fn get_all_surveys(
        &self,
    ) -> Result<Envelope<Vec<Survey>>, ClientError> {
        self.client.get("/surveys/admin").await
    }

    pub async fn get_survey_list(
        &self,
    ) -> Result<Envelope<Vec<Survey>>, ClientError> {
        self.client.get("/surveys").await
    }

    pub async fn get_public_survey(
        &self,
        survey_id: SurveyId,
    ) -> Result<Envelope<PublicSurvey>, ClientError> {
        self.client
            .get(&format!("/surveys/{survey_id}/public"))
            .await
    }

    pub async fn get_survey(
        &self,
        survey_id: SurveyId,
    ) -> Result<Envelope<Survey>, ClientError> {
        self.client.get(&format!("/surveys/{survey_id}")).await
    }

    pub async fn get_survey_results(
        &self,
        survey_id: SurveyId,
    ) -> Result<Envelope<SurveyResults>, ClientError> {
        self.client
            .get(&format!("/surveys/{survey_id}/results"))
            .await
    }

    pub async fn create_survey(
        &self,
        draft: &SurveyDraft,
    ) -> Result<Envelope<Survey>, ClientError> {
        self.client.post("/surveys", draft).await
    }

    pub async fn update_survey(
        &self,
        survey_id: SurveyId,
        draft: &SurveyDraft,
    ) -> Result<Envelope<Survey>, ClientError> {
        self.client
            .put(&format!("/surveys/{survey_id}"), draft)
            .await
    }

    pub async fn delete_survey(
        &self,
        survey_id: SurveyId,
    ) -> Result<Envelope<()>, ClientError> {
        let envelope: Envelope<Value> = self
            .client
            .delete(&format!("/surveys/{survey_id}"))
            .await?;
        Ok(envelope.map(|_| ()))
    }

    pub async fn get_survey_stats(
        &self,
        survey_id: SurveyId,
    ) -> Result<Envelope<SurveyStats>, ClientError> {
        self.client
            .get(&format!("/surveys/{survey_id}/stats"))
            .await
    }

    /// Submit answers through the public endpoint.
    pub async fn submit_response(
        &self,
        survey_id: SurveyId,
        submission: &SubmitResponse,
    ) -> Result<Envelope<SurveyResponse>, ClientError> {
        self.client
            .post(&format!("/public/surveys/{survey_id}/responses"), submission)
            .await
    }

    pub async fn get_survey_responses(
        &self,
        survey_id: SurveyId,
    ) -> Result<Envelope<Vec<SurveyResponse>>, ClientError> {
        self.client
            .get(&format!("/responses/survey/{survey_id}"))
            .await
    }
}

/// Surveys with the given status. `None` keeps everything.
pub fn filter_by_status(
    surveys: &[Survey],
    status: Option<SurveyStatus>,
) -> Vec<Survey> {
    match status {
        None => surveys.to_vec(),
        Some(status) => surveys
            .iter()
            .filter(|s| s.status == status)
            .cloned()
            .collect(),
    }
}

/// Headline figures for the survey dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SurveyStatsSummary {
    pub total_surveys: usize,
    pub active_surveys: usize,
    pub total_responses: u64,
    pub avg_completion_rate: u32,
    pub new_surveys_this_month: usize,
    /// Estimated as a fixed share of all responses.
    pub responses_this_week: u64,
    pub responses_last_week: u64,
}

pub fn calculate_stats(surveys: &[Survey], now: &Zoned) -> SurveyStatsSummary {
    let total_surveys = surveys.len();
    let active_surveys = surveys
        .iter()
        .filter(|s| s.status == SurveyStatus::Active)
        .count();
    let total_responses: u64 =
        surveys.iter().map(|s| u64::from(s.total_responses)).sum();
    let avg_completion_rate = if total_surveys == 0 {
        0
    } else {
        let sum: u64 =
            surveys.iter().map(|s| u64::from(s.completion_rate)).sum();
        (sum as f64 / total_surveys as f64).round() as u32
    };
    let new_surveys_this_month = surveys
        .iter()
        .filter_map(|s| s.created_at)
        .map(|created| created.to_zoned(now.time_zone().clone()))
        .filter(|created| {
            created.year() == now.year() && created.month() == now.month()
        })
        .count();

    SurveyStatsSummary {
        total_surveys,
        active_surveys,
        total_responses,
        avg_completion_rate,
        new_surveys_this_month,
        responses_this_week: total_responses * 2 / 10,
        responses_last_week: total_responses * 15 / 100,
    }
}

/// One slice of the status breakdown chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSlice {
    pub name: &'static str,
    pub value: usize,
    pub color: &'static str,
}

pub fn group_by_status(surveys: &[Survey]) -> Vec<StatusSlice> {
    let count = |status: SurveyStatus| {
        surveys.iter().filter(|s| s.status == status).count()
    };

    [
        (SurveyStatus::Active, "#43e97b"),
        (SurveyStatus::Inactive, "#ff6b6b"),
        (SurveyStatus::Draft, "#feca57"),
    ]
    .into_iter()
    .map(|(status, color)| StatusSlice {
        name: status.label(),
        value: count(status),
        color,
    })
    .filter(|slice| slice.value > 0)
    .collect()
}

/// A survey with its display strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedSurvey {
    pub survey: Survey,
    pub formatted_created_at: String,
    pub formatted_updated_at: String,
    pub status_display: String,
    pub completion_display: String,
    pub responses_summary: String,
}

pub fn format_survey(survey: &Survey, tz: &TimeZone) -> FormattedSurvey {
    FormattedSurvey {
        survey: survey.clone(),
        formatted_created_at: format_date(survey.created_at, tz),
        formatted_updated_at: format_date(survey.updated_at, tz),
        status_display: survey.status.label().to_string(),
        completion_display: format!("{}%", survey.completion_rate),
        responses_summary: format!("{} responses", survey.total_responses),
    }
}

/// "Jan 5, 2025", or "N/A" when there is no date.
pub fn format_date(timestamp: Option<Timestamp>, tz: &TimeZone) -> String {
    match timestamp {
        Some(ts) => ts.to_zoned(tz.clone()).strftime("%b %-d, %Y").to_string(),
        None => "N/A".to_string(),
    }
}

/// Display label for a raw status value. Unknown values pass through.
pub fn format_status(status: &str) -> String {
    status
        .parse::<SurveyStatus>()
        .map(|s| s.label().to_string())
        .unwrap_or_else(|_| status.to_string())
}

/// Check survey form input before it is sent.
pub fn validate_survey(
    title: &str,
    description: &str,
    status: &str,
) -> Validation {
    let mut validation = Validation::default();

    if title.trim().is_empty() {
        validation.reject("title", "Survey title is required");
    } else if title.chars().count() > SURVEY_TITLE_MAX_LEN {
        validation
            .reject("title", "Survey title must be 200 characters or less");
    }

    if description.trim().is_empty() {
        validation.reject("description", "Survey description is required");
    } else if description.chars().count() > SURVEY_DESCRIPTION_MAX_LEN {
        validation.reject(
            "description",
            "Survey description must be 1000 characters or less",
        );
    }

    if status.is_empty() {
        validation.reject("status", "Survey status is required");
    } else if let Err(e) = status.parse::<SurveyStatus>() {
        validation.reject("status", &e.to_string());
    }

    validation
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SurveyId;

    fn survey(
        id: i64,
        status: SurveyStatus,
        responses: u32,
        rate: u32,
    ) -> Survey {
        Survey {
            id: SurveyId(id),
            title: format!("Survey {id}"),
            description: None,
            status,
            created_at: None,
            updated_at: None,
            end_date: None,
            total_questions: 3,
            total_responses: responses,
            completion_rate: rate,
        }
    }

    #[test]
    fn filter_keeps_everything_without_a_status() {
        let surveys = vec![
            survey(1, SurveyStatus::Active, 0, 0),
            survey(2, SurveyStatus::Draft, 0, 0),
        ];
        assert_eq!(filter_by_status(&surveys, None).len(), 2);
        let drafts = filter_by_status(&surveys, Some(SurveyStatus::Draft));
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].id, SurveyId(2));
    }

    #[test]
    fn stats_round_the_average_and_estimate_weekly_responses() {
        let now: Zoned = "2025-01-20T12:00:00[UTC]".parse().unwrap();
        let mut this_month = survey(1, SurveyStatus::Active, 55, 50);
        this_month.created_at = Some("2025-01-05T09:00:00Z".parse().unwrap());
        let mut last_year = survey(2, SurveyStatus::Inactive, 45, 75);
        last_year.created_at = Some("2024-01-10T09:00:00Z".parse().unwrap());
        let undated = survey(3, SurveyStatus::Active, 0, 0);

        let stats = calculate_stats(&[this_month, last_year, undated], &now);
        assert_eq!(stats.total_surveys, 3);
        assert_eq!(stats.active_surveys, 2);
        assert_eq!(stats.total_responses, 100);
        // (50 + 75 + 0) / 3 = 41.67
        assert_eq!(stats.avg_completion_rate, 42);
        assert_eq!(stats.new_surveys_this_month, 1);
        assert_eq!(stats.responses_this_week, 20);
        assert_eq!(stats.responses_last_week, 15);

        assert_eq!(calculate_stats(&[], &now), SurveyStatsSummary::default());
    }

    #[test]
    fn status_groups_drop_empty_slices() {
        let surveys = vec![
            survey(1, SurveyStatus::Active, 0, 0),
            survey(2, SurveyStatus::Active, 0, 0),
            survey(3, SurveyStatus::Draft, 0, 0),
        ];
        assert_eq!(
            group_by_status(&surveys),
            vec![
                StatusSlice { name: "Active", value: 2, color: "#43e97b" },
                StatusSlice { name: "Draft", value: 1, color: "#feca57" },
            ]
        );
    }

    #[test]
    fn dates_format_in_the_given_zone() {
        let ts: Timestamp = "2025-01-05T10:00:00Z".parse().unwrap();
        assert_eq!(format_date(Some(ts), &TimeZone::UTC), "Jan 5, 2025");
        assert_eq!(format_date(None, &TimeZone::UTC), "N/A");

        let formatted = format_survey(
            &survey(7, SurveyStatus::Inactive, 12, 80),
            &TimeZone::UTC,
        );
        assert_eq!(formatted.status_display, "Inactive");
        assert_eq!(formatted.completion_display, "80%");
        assert_eq!(formatted.responses_summary, "12 responses");
        assert_eq!(formatted.formatted_created_at, "N/A");
    }

    #[test]
    fn unknown_statuses_display_unchanged() {
        assert_eq!(format_status("DRAFT"), "Draft");
        assert_eq!(format_status("ARCHIVED"), "ARCHIVED");
    }

    #[test]
    fn survey_validation_reports_each_field() {
        let validation = validate_survey(" ", &"x".repeat(1001), "ARCHIVED");
        assert!(!validation.is_valid());
        assert_eq!(validation.errors["title"], "Survey title is required");
        assert_eq!(
            validation.errors["description"],
            "Survey description must be 1000 characters or less"
        );
        assert_eq!(validation.errors["status"], "Invalid survey status");

        let validation = validate_survey("Title", "Description", "");
        assert_eq!(validation.errors.len(), 1);
        assert_eq!(validation.errors["status"], "Survey status is required");

        assert!(validate_survey("Title", "Description", "ACTIVE").is_valid());
    }
}
