use crate::analytics::{
    AnalyticsRange, DashboardMetrics, InterviewPerformance, JobPerformance, SourcePerformance,
};
use crate::client::ApiClient;
use crate::error::ApiResult;
use crate::funnel::{FunnelPayload, FunnelStage};
use crate::models::DashboardStats;

pub struct AnalyticsService<'a> {
    pub(super) client: &'a ApiClient,
}

impl AnalyticsService<'_> {
    pub fn dashboard(&self, range: &AnalyticsRange) -> ApiResult<DashboardMetrics> {
        self.client.get_with("/analytics/dashboard", range.to_query())
    }

    /// Raw stages as reported; see `funnel::normalize_funnel`.
    pub fn funnel(&self, range: &AnalyticsRange) -> ApiResult<Vec<FunnelStage>> {
        let payload: FunnelPayload = self.client.get_with("/analytics/funnel", range.to_query())?;
        Ok(payload.into_stages())
    }

    pub fn jobs(&self, range: &AnalyticsRange) -> ApiResult<Vec<JobPerformance>> {
        self.client.get_with("/analytics/jobs", range.to_query())
    }

    pub fn interviews(&self, range: &AnalyticsRange) -> ApiResult<Vec<InterviewPerformance>> {
        self.client.get_with("/analytics/interviews", range.to_query())
    }

    pub fn sources(&self, range: &AnalyticsRange) -> ApiResult<Vec<SourcePerformance>> {
        self.client.get_with("/analytics/sources", range.to_query())
    }

    pub fn dashboard_stats(&self) -> ApiResult<DashboardStats> {
        self.client.get("/admin/dashboard/stats")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fake_client;
    use chrono::NaiveDate;

    #[test]
    fn test_funnel_unwraps_payload_and_sends_range() {
        let (client, requests) = fake_client(vec![(
            200,
            r#"{"stages":[{"stage":"Applications","count":40},{"stage":"stage-1","count":12}]}"#,
        )]);
        let range = AnalyticsRange {
            start: NaiveDate::from_ymd_opt(2025, 2, 1),
            end: NaiveDate::from_ymd_opt(2025, 2, 28),
        };
        let stages = client.analytics().funnel(&range).unwrap();
        assert_eq!(stages.len(), 2);

        let sent = requests.lock().unwrap();
        assert_eq!(sent[0].path, "/analytics/funnel");
        assert_eq!(
            sent[0].query,
            vec![
                ("startDate".to_string(), "2025-02-01".to_string()),
                ("endDate".to_string(), "2025-02-28".to_string()),
            ]
        );
    }

    #[test]
    fn test_dashboard_stats_tolerates_missing_fields() {
        let (client, requests) = fake_client(vec![(200, r#"{"totalJobs":12,"pendingApprovals":3}"#)]);
        let stats = client.analytics().dashboard_stats().unwrap();
        assert_eq!(stats.total_jobs, 12);
        assert_eq!(stats.pending_approvals, 3);
        assert_eq!(stats.open_headcount, 0);
        assert_eq!(requests.lock().unwrap()[0].path, "/admin/dashboard/stats");
    }

    #[test]
    fn test_report_endpoints() {
        let (client, requests) = fake_client(vec![
            (200, r#"{"totalApplications":40}"#),
            (200, "[]"),
            (200, "[]"),
            (200, "[]"),
        ]);
        let analytics = client.analytics();
        let range = AnalyticsRange::default();
        assert_eq!(analytics.dashboard(&range).unwrap().total_applications, 40);
        analytics.jobs(&range).unwrap();
        analytics.interviews(&range).unwrap();
        analytics.sources(&range).unwrap();

        let sent = requests.lock().unwrap();
        let paths: Vec<&str> = sent.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "/analytics/dashboard",
                "/analytics/jobs",
                "/analytics/interviews",
                "/analytics/sources",
            ]
        );
        assert!(sent.iter().all(|r| r.method == reqwest::Method::GET));
        assert!(sent.iter().all(|r| r.query.is_empty()));
    }
}
