use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// KPI cards on the analytics overview.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardMetrics {
    pub total_applications: u64,
    pub active_jobs: u64,
    pub total_hires: u64,
    pub interviews_scheduled: u64,
    /// Days from application to accepted offer.
    pub avg_time_to_hire: Option<f64>,
    pub offer_acceptance_rate: Option<f64>,
    /// Period-over-period change of applications, in percent.
    pub applications_change: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobPerformance {
    pub job_id: String,
    pub title: String,
    pub applications: u64,
    pub interviews: u64,
    pub offers: u64,
    pub hires: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InterviewPerformance {
    pub interviewer: String,
    pub scheduled: u64,
    pub completed: u64,
    pub pass_rate: Option<f64>,
    pub avg_score: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SourcePerformance {
    pub source: String,
    pub applications: u64,
    pub hires: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SourceShare {
    pub source: String,
    pub applications: u64,
    pub share: f64,
    pub hire_rate: f64,
}

/// Date window passed to every `/analytics/*` call.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AnalyticsRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl AnalyticsRange {
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        if let Some(start) = self.start {
            query.push(("startDate".to_string(), start.format("%Y-%m-%d").to_string()));
        }
        if let Some(end) = self.end {
            query.push(("endDate".to_string(), end.format("%Y-%m-%d").to_string()));
        }
        query
    }
}

fn percent(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    (part as f64 / whole as f64 * 1000.0).round() / 10.0
}

/// Share of all applications per source, largest first.
pub fn source_shares(sources: &[SourcePerformance]) -> Vec<SourceShare> {
    let total: u64 = sources.iter().map(|s| s.applications).sum();
    let mut shares: Vec<SourceShare> = sources
        .iter()
        .map(|s| SourceShare {
            source: s.source.clone(),
            applications: s.applications,
            share: percent(s.applications, total),
            hire_rate: percent(s.hires, s.applications),
        })
        .collect();

    shares.sort_by(|a, b| {
        b.applications
            .cmp(&a.applications)
            .then_with(|| a.source.cmp(&b.source))
    });
    shares
}

/// Jobs ordered by application volume, ties by title.
pub fn rank_jobs(jobs: &[JobPerformance]) -> Vec<JobPerformance> {
    let mut ranked = jobs.to_vec();
    ranked.sort_by(|a, b| {
        b.applications
            .cmp(&a.applications)
            .then_with(|| a.title.cmp(&b.title))
    });
    ranked
}

/// Hires per application for a job, in percent.
pub fn job_hire_rate(job: &JobPerformance) -> f64 {
    percent(job.hires, job.applications)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(name: &str, applications: u64, hires: u64) -> SourcePerformance {
        SourcePerformance {
            source: name.to_string(),
            applications,
            hires,
        }
    }

    #[test]
    fn test_source_shares_sorted_with_percentages() {
        let shares = source_shares(&[
            source("referral", 20, 4),
            source("linkedin", 60, 3),
            source("careers-site", 20, 0),
        ]);
        let names: Vec<&str> = shares.iter().map(|s| s.source.as_str()).collect();
        assert_eq!(names, vec!["linkedin", "careers-site", "referral"]);
        assert_eq!(shares[0].share, 60.0);
        assert_eq!(shares[0].hire_rate, 5.0);
        assert_eq!(shares[2].hire_rate, 20.0);
    }

    #[test]
    fn test_source_shares_with_no_applications() {
        let shares = source_shares(&[source("agency", 0, 0)]);
        assert_eq!(shares[0].share, 0.0);
        assert_eq!(shares[0].hire_rate, 0.0);
    }

    #[test]
    fn test_rank_jobs() {
        let jobs = vec![
            JobPerformance { title: "B".into(), applications: 5, ..Default::default() },
            JobPerformance { title: "A".into(), applications: 5, ..Default::default() },
            JobPerformance { title: "C".into(), applications: 9, hires: 3, ..Default::default() },
        ];
        let ranked = rank_jobs(&jobs);
        let titles: Vec<&str> = ranked.iter().map(|j| j.title.as_str()).collect();
        assert_eq!(titles, vec!["C", "A", "B"]);
        assert_eq!(job_hire_rate(&ranked[0]), 33.3);
    }

    #[test]
    fn test_range_query() {
        let range = AnalyticsRange {
            start: NaiveDate::from_ymd_opt(2025, 1, 1),
            end: None,
        };
        assert_eq!(range.to_query(), vec![("startDate".to_string(), "2025-01-01".to_string())]);
        assert!(AnalyticsRange::default().to_query().is_empty());
    }
}
