use crate::client::ApiClient;
use crate::error::ApiResult;
use crate::models::{ExternalBoardImport, JobBoard, JobBoardInput, JobBoardSource};

pub struct JobBoardService<'a> {
    pub(super) client: &'a ApiClient,
}

impl JobBoardService<'_> {
    pub fn list(&self) -> ApiResult<Vec<JobBoard>> {
        self.client.get("/job-boards")
    }

    pub fn get(&self, id: &str) -> ApiResult<JobBoard> {
        self.client.get(&format!("/job-boards/{}", id))
    }

    pub fn create(&self, input: &JobBoardInput) -> ApiResult<JobBoard> {
        self.client.post("/job-boards", input)
    }

    pub fn update(&self, id: &str, input: &JobBoardInput) -> ApiResult<JobBoard> {
        self.client.put(&format!("/job-boards/{}", id), input)
    }

    pub fn delete(&self, id: &str) -> ApiResult<()> {
        self.client.delete(&format!("/job-boards/{}", id))
    }

    /// Connect a board whose postings are synced from an external ATS.
    pub fn create_external(
        &self,
        source: JobBoardSource,
        import: &ExternalBoardImport,
    ) -> ApiResult<JobBoard> {
        self.client
            .post(&format!("/job-boards/external/{}", source.as_str()), import)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fake_client;
    use reqwest::Method;

    #[test]
    fn test_create_external_uses_source_in_path() {
        let (client, requests) = fake_client(vec![(
            201,
            r#"{"id":"b7","title":"Greenhouse","isExternal":true,"source":"greenhouse"}"#,
        )]);
        let board = client
            .job_boards()
            .create_external(
                JobBoardSource::Greenhouse,
                &ExternalBoardImport {
                    title: "Greenhouse".into(),
                    external_id: "acme".into(),
                    api_key: None,
                },
            )
            .unwrap();
        assert!(board.is_external);
        assert!(board.is_active);
        assert_eq!(board.source, Some(JobBoardSource::Greenhouse));

        let sent = requests.lock().unwrap();
        assert_eq!(sent[0].path, "/job-boards/external/greenhouse");
        assert_eq!(
            sent[0].body,
            Some(serde_json::json!({"title": "Greenhouse", "externalId": "acme"}))
        );
    }

    #[test]
    fn test_crud_endpoints() {
        const BOARD: &str = r#"{"id":"b1","title":"Careers"}"#;
        let (client, requests) = fake_client(vec![
            (200, "[]"),
            (200, BOARD),
            (201, BOARD),
            (200, BOARD),
            (204, ""),
        ]);
        let boards = client.job_boards();
        let input = JobBoardInput {
            title: "Careers".into(),
            ..JobBoardInput::default()
        };
        boards.list().unwrap();
        boards.get("b1").unwrap();
        boards.create(&input).unwrap();
        boards.update("b1", &input).unwrap();
        boards.delete("b1").unwrap();

        let sent = requests.lock().unwrap();
        let calls: Vec<(Method, &str)> =
            sent.iter().map(|r| (r.method.clone(), r.path.as_str())).collect();
        assert_eq!(
            calls,
            vec![
                (Method::GET, "/job-boards"),
                (Method::GET, "/job-boards/b1"),
                (Method::POST, "/job-boards"),
                (Method::PUT, "/job-boards/b1"),
                (Method::DELETE, "/job-boards/b1"),
            ]
        );
    }
}
