use reqwest::Method;

use crate::client::{ApiClient, ApiRequest};
use crate::error::ApiResult;
use crate::models::{Job, JobAction, JobFilter, JobInput, RejectBody};

pub struct JobService<'a> {
    pub(super) client: &'a ApiClient,
}

impl JobService<'_> {
    pub fn list(&self, filter: &JobFilter) -> ApiResult<Vec<Job>> {
        let request = ApiRequest::new(Method::GET, "/jobs")
            .query("status", filter.status.map(|s| s.as_str()))
            .query("jobBoardId", filter.job_board_id.as_deref());
        self.client.execute(request)
    }

    pub fn get(&self, id: &str) -> ApiResult<Job> {
        self.client.get(&format!("/jobs/{}", id))
    }

    pub fn create(&self, input: &JobInput) -> ApiResult<Job> {
        self.client.post("/jobs", input)
    }

    pub fn update(&self, id: &str, input: &JobInput) -> ApiResult<Job> {
        self.client.put(&format!("/jobs/{}", id), input)
    }

    pub fn delete(&self, id: &str) -> ApiResult<()> {
        self.client.delete(&format!("/jobs/{}", id))
    }

    pub fn submit_for_approval(&self, id: &str) -> ApiResult<Job> {
        self.transition(id, JobAction::SubmitForApproval, None)
    }

    pub fn approve(&self, id: &str) -> ApiResult<Job> {
        self.transition(id, JobAction::Approve, None)
    }

    pub fn reject(&self, id: &str, reason: Option<&str>) -> ApiResult<Job> {
        self.transition(id, JobAction::Reject, reason)
    }

    pub fn publish(&self, id: &str) -> ApiResult<Job> {
        self.transition(id, JobAction::Publish, None)
    }

    pub fn archive(&self, id: &str) -> ApiResult<Job> {
        self.transition(id, JobAction::Archive, None)
    }

    /// `PUT /jobs/{id}/{action}`. Only reject carries a body.
    pub fn transition(&self, id: &str, action: JobAction, reason: Option<&str>) -> ApiResult<Job> {
        let path = format!("/jobs/{}/{}", id, action.segment());
        match action {
            JobAction::Reject => {
                let body = RejectBody {
                    reason: reason.map(str::to_string),
                };
                self.client.put(&path, &body)
            }
            _ => self.client.put_empty(&path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::JobStatus;
    use crate::testing::fake_client;

    const JOB: &str = r#"{"id":"j1","title":"Engineer","status":"approved"}"#;

    #[test]
    fn test_list_passes_filters_as_query() {
        let (client, requests) = fake_client(vec![(200, "[]")]);
        let filter = JobFilter {
            status: Some(JobStatus::PendingApproval),
            job_board_id: Some("b1".into()),
        };
        let jobs = client.jobs().list(&filter).unwrap();
        assert!(jobs.is_empty());

        let sent = requests.lock().unwrap();
        assert_eq!(sent[0].path, "/jobs");
        assert_eq!(
            sent[0].query,
            vec![
                ("status".to_string(), "pending_approval".to_string()),
                ("jobBoardId".to_string(), "b1".to_string()),
            ]
        );
    }

    #[test]
    fn test_transitions_hit_action_paths() {
        let (client, requests) = fake_client(vec![(200, JOB); 5]);
        let jobs = client.jobs();
        jobs.submit_for_approval("j1").unwrap();
        jobs.approve("j1").unwrap();
        jobs.publish("j1").unwrap();
        jobs.archive("j1").unwrap();
        let rejected = jobs.reject("j1", Some("budget freeze")).unwrap();
        assert_eq!(rejected.id, "j1");

        let sent = requests.lock().unwrap();
        let paths: Vec<&str> = sent.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "/jobs/j1/submit-for-approval",
                "/jobs/j1/approve",
                "/jobs/j1/publish",
                "/jobs/j1/archive",
                "/jobs/j1/reject",
            ]
        );
        assert!(sent.iter().all(|r| r.method == Method::PUT));
        assert!(sent[0].body.is_none());
        assert_eq!(sent[4].body, Some(serde_json::json!({"reason": "budget freeze"})));
    }

    #[test]
    fn test_delete_accepts_empty_response() {
        let (client, requests) = fake_client(vec![(204, "")]);
        client.jobs().delete("j1").unwrap();
        assert_eq!(requests.lock().unwrap()[0].method, Method::DELETE);
    }

    #[test]
    fn test_crud_endpoints() {
        let (client, requests) = fake_client(vec![
            (200, "[]"),
            (200, JOB),
            (201, JOB),
            (200, JOB),
            (204, ""),
        ]);
        let jobs = client.jobs();
        let input = JobInput {
            title: "Engineer".into(),
            departments: vec!["d1".into()],
            ..JobInput::default()
        };
        jobs.list(&JobFilter::default()).unwrap();
        jobs.get("j1").unwrap();
        jobs.create(&input).unwrap();
        jobs.update("j1", &input).unwrap();
        jobs.delete("j1").unwrap();

        let sent = requests.lock().unwrap();
        let calls: Vec<(Method, &str)> =
            sent.iter().map(|r| (r.method.clone(), r.path.as_str())).collect();
        assert_eq!(
            calls,
            vec![
                (Method::GET, "/jobs"),
                (Method::GET, "/jobs/j1"),
                (Method::POST, "/jobs"),
                (Method::PUT, "/jobs/j1"),
                (Method::DELETE, "/jobs/j1"),
            ]
        );
        assert!(sent[0].query.is_empty());
        assert_eq!(sent[2].body.as_ref().unwrap()["departments"], serde_json::json!(["d1"]));
    }
}
