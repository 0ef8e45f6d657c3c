use crate::responses::{
    ActivityItem, DashboardOverview, RecentResponse, SurveyPerformance,
    TrendPoint,
};
use crate::{ApiClient, ClientError, Envelope};

pub const DEFAULT_TREND_DAYS: u32 = 30;
pub const DEFAULT_ACTIVITY_LIMIT: u32 = 50;
pub const DEFAULT_RECENT_RESPONSES_LIMIT: u32 = 5;

pub struct AnalyticsService<'a> {
    pub(crate) client: &'a ApiClient,
}

impl AnalyticsService<'_> {
    /// Daily response counts for the last `days` days, 30 when unset.
    pub async fn get_response_trends(
        &self,
        days: Option<u32>,
    ) -> Result<Envelope<Vec<TrendPoint>>, ClientError> {
        let days = days.unwrap_or(DEFAULT_TREND_DAYS);
        self.client
            .get_with_query("/analytics/response-trends", &[("days", days)])
            .await
    }

    pub async fn get_recent_activity(
        &self,
        limit: Option<u32>,
    ) -> Result<Envelope<Vec<ActivityItem>>, ClientError> {
        let limit = limit.unwrap_or(DEFAULT_ACTIVITY_LIMIT);
        self.client
            .get_with_query(
                "/analytics/recent-activity",
                &[("limit", limit)],
            )
            .await
    }

    pub async fn get_recent_responses(
        &self,
        limit: Option<u32>,
    ) -> Result<Envelope<Vec<RecentResponse>>, ClientError> {
        let limit = limit.unwrap_or(DEFAULT_RECENT_RESPONSES_LIMIT);
        self.client
            .get_with_query(
                "/analytics/recent-responses",
                &[("limit", limit)],
            )
            .await
    }

    pub async fn get_dashboard_overview(
        &self,
    ) -> Result<Envelope<DashboardOverview>, ClientError> {
        self.client.get("/analytics/overview").await
    }

    pub async fn get_survey_performance(
        &self,
    ) -> Result<Envelope<Vec<SurveyPerformance>>, ClientError> {
        self.client.get("/analytics/survey-performance").await
    }
}
