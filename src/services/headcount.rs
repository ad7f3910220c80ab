use reqwest::Method;

use crate::client::{ApiClient, ApiRequest};
use crate::error::ApiResult;
use crate::models::{HeadcountInput, HeadcountRequest, HeadcountStatus, RejectBody};

pub struct HeadcountService<'a> {
    pub(super) client: &'a ApiClient,
}

impl HeadcountService<'_> {
    pub fn list(&self, status: Option<HeadcountStatus>) -> ApiResult<Vec<HeadcountRequest>> {
        let request = ApiRequest::new(Method::GET, "/headcount").query("status", status);
        self.client.execute(request)
    }

    pub fn get(&self, id: &str) -> ApiResult<HeadcountRequest> {
        self.client.get(&format!("/headcount/{}", id))
    }

    pub fn create(&self, input: &HeadcountInput) -> ApiResult<HeadcountRequest> {
        self.client.post("/headcount", input)
    }

    pub fn approve(&self, id: &str) -> ApiResult<HeadcountRequest> {
        self.client.put_empty(&format!("/headcount/{}/approve", id))
    }

    pub fn reject(&self, id: &str, reason: Option<&str>) -> ApiResult<HeadcountRequest> {
        let body = RejectBody {
            reason: reason.map(str::to_string),
        };
        self.client.put(&format!("/headcount/{}/reject", id), &body)
    }

    pub fn delete(&self, id: &str) -> ApiResult<()> {
        self.client.delete(&format!("/headcount/{}", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fake_client;

    #[test]
    fn test_list_and_reject() {
        let (client, requests) = fake_client(vec![
            (200, r#"[{"id":"h1","status":"pending","teamName":"Payments","roleId":"r1"}]"#),
            (200, r#"{"id":"h1","status":"rejected","rejectionReason":"no budget"}"#),
        ]);
        let pending = client.headcount().list(Some(HeadcountStatus::Pending)).unwrap();
        assert_eq!(pending[0].team_name.as_deref(), Some("Payments"));
        assert_eq!(pending[0].role.as_ref().unwrap().id(), "r1");

        let rejected = client.headcount().reject("h1", Some("no budget")).unwrap();
        assert_eq!(rejected.status, HeadcountStatus::Rejected);

        let sent = requests.lock().unwrap();
        assert_eq!(sent[0].query, vec![("status".to_string(), "pending".to_string())]);
        assert_eq!(sent[1].path, "/headcount/h1/reject");
        assert_eq!(sent[1].body, Some(serde_json::json!({"reason": "no budget"})));
    }

    #[test]
    fn test_create_serializes_ids() {
        let (client, requests) = fake_client(vec![(201, r#"{"id":"h2","status":"pending"}"#)]);
        let input = HeadcountInput {
            role_id: "r1".into(),
            department_id: "d1".into(),
            team_name: None,
            reason: Some("backfill".into()),
        };
        client.headcount().create(&input).unwrap();
        let sent = requests.lock().unwrap();
        assert_eq!(
            sent[0].body,
            Some(serde_json::json!({"roleId": "r1", "departmentId": "d1", "reason": "backfill"}))
        );
    }

    #[test]
    fn test_request_endpoints() {
        const REQUEST: &str = r#"{"id":"h1","status":"pending"}"#;
        let (client, requests) = fake_client(vec![
            (200, "[]"),
            (200, REQUEST),
            (200, r#"{"id":"h1","status":"approved","jobId":"j9"}"#),
            (204, ""),
        ]);
        let headcount = client.headcount();
        headcount.list(None).unwrap();
        headcount.get("h1").unwrap();
        let approved = headcount.approve("h1").unwrap();
        assert_eq!(approved.status, HeadcountStatus::Approved);
        headcount.delete("h1").unwrap();

        let sent = requests.lock().unwrap();
        let calls: Vec<(Method, &str)> =
            sent.iter().map(|r| (r.method.clone(), r.path.as_str())).collect();
        assert_eq!(
            calls,
            vec![
                (Method::GET, "/headcount"),
                (Method::GET, "/headcount/h1"),
                (Method::PUT, "/headcount/h1/approve"),
                (Method::DELETE, "/headcount/h1"),
            ]
        );
        assert!(sent[0].query.is_empty());
        assert!(sent[2].body.is_none());
    }
}
