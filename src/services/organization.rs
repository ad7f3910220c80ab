//! Offices, departments, job functions and job roles.

use reqwest::Method;

use crate::client::{ApiClient, ApiRequest};
use crate::error::ApiResult;
use crate::models::{
    Department, DepartmentInput, JobFunction, JobFunctionInput, JobRole, JobRoleInput, Office,
    OfficeInput,
};

pub struct OfficeService<'a> {
    pub(super) client: &'a ApiClient,
}

impl OfficeService<'_> {
    pub fn list(&self) -> ApiResult<Vec<Office>> {
        self.client.get("/company/offices")
    }

    pub fn create(&self, input: &OfficeInput) -> ApiResult<Office> {
        self.client.post("/company/offices", input)
    }

    pub fn update(&self, id: &str, input: &OfficeInput) -> ApiResult<Office> {
        self.client.put(&format!("/company/offices/{}", id), input)
    }

    pub fn delete(&self, id: &str) -> ApiResult<()> {
        self.client.delete(&format!("/company/offices/{}", id))
    }
}

pub struct DepartmentService<'a> {
    pub(super) client: &'a ApiClient,
}

impl DepartmentService<'_> {
    pub fn list(&self) -> ApiResult<Vec<Department>> {
        self.client.get("/company/departments")
    }

    pub fn create(&self, input: &DepartmentInput) -> ApiResult<Department> {
        self.client.post("/company/departments", input)
    }

    pub fn update(&self, id: &str, input: &DepartmentInput) -> ApiResult<Department> {
        self.client.put(&format!("/company/departments/{}", id), input)
    }

    pub fn delete(&self, id: &str) -> ApiResult<()> {
        self.client.delete(&format!("/company/departments/{}", id))
    }
}

pub struct JobFunctionService<'a> {
    pub(super) client: &'a ApiClient,
}

impl JobFunctionService<'_> {
    pub fn list(&self) -> ApiResult<Vec<JobFunction>> {
        self.client.get("/job-functions")
    }

    pub fn create(&self, input: &JobFunctionInput) -> ApiResult<JobFunction> {
        self.client.post("/job-functions", input)
    }

    pub fn update(&self, id: &str, input: &JobFunctionInput) -> ApiResult<JobFunction> {
        self.client.put(&format!("/job-functions/{}", id), input)
    }

    pub fn delete(&self, id: &str) -> ApiResult<()> {
        self.client.delete(&format!("/job-functions/{}", id))
    }
}

pub struct JobRoleService<'a> {
    pub(super) client: &'a ApiClient,
}

impl JobRoleService<'_> {
    pub fn list(&self, job_function_id: Option<&str>) -> ApiResult<Vec<JobRole>> {
        let request =
            ApiRequest::new(Method::GET, "/job-roles").query("jobFunctionId", job_function_id);
        self.client.execute(request)
    }

    pub fn create(&self, input: &JobRoleInput) -> ApiResult<JobRole> {
        self.client.post("/job-roles", input)
    }

    pub fn update(&self, id: &str, input: &JobRoleInput) -> ApiResult<JobRole> {
        self.client.put(&format!("/job-roles/{}", id), input)
    }

    pub fn delete(&self, id: &str) -> ApiResult<()> {
        self.client.delete(&format!("/job-roles/{}", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fake_client;

    #[test]
    fn test_offices_live_under_company() {
        let (client, requests) = fake_client(vec![
            (200, r#"[{"_id":"o1","name":"Berlin","isHeadquarters":true}]"#),
            (200, r#"{"id":"o1","name":"Berlin HQ"}"#),
        ]);
        let offices = client.offices().list().unwrap();
        assert!(offices[0].is_headquarters);

        let input = OfficeInput {
            name: "Berlin HQ".into(),
            ..OfficeInput::from(&offices[0])
        };
        client.offices().update("o1", &input).unwrap();

        let sent = requests.lock().unwrap();
        assert_eq!(sent[0].path, "/company/offices");
        assert_eq!(sent[1].method, Method::PUT);
        assert_eq!(sent[1].path, "/company/offices/o1");
    }

    #[test]
    fn test_roles_filter_by_function() {
        let (client, requests) = fake_client(vec![
            (200, r#"[{"id":"r1","title":"Staff Engineer","jobFunction":{"_id":"f1","name":"Engineering"}}]"#),
            (200, "[]"),
        ]);
        let roles = client.job_roles().list(Some("f1")).unwrap();
        assert_eq!(roles[0].job_function.as_ref().unwrap().label(), "Engineering");
        client.job_roles().list(None).unwrap();

        let sent = requests.lock().unwrap();
        assert_eq!(sent[0].query, vec![("jobFunctionId".to_string(), "f1".to_string())]);
        assert!(sent[1].query.is_empty());
    }

    #[test]
    fn test_function_decodes_bare_department_id() {
        let (client, _) = fake_client(vec![(
            200,
            r#"[{"id":"f1","name":"Engineering","departmentId":"d1"}]"#,
        )]);
        let functions = client.job_functions().list().unwrap();
        assert_eq!(functions[0].department.as_ref().unwrap().id(), "d1");
    }

    fn calls(sent: &[ApiRequest]) -> Vec<(Method, &str)> {
        sent.iter().map(|r| (r.method.clone(), r.path.as_str())).collect()
    }

    #[test]
    fn test_office_create_and_delete() {
        let (client, requests) = fake_client(vec![
            (201, r#"{"id":"o2","name":"Lisbon"}"#),
            (204, ""),
        ]);
        let input = OfficeInput {
            name: "Lisbon".into(),
            ..OfficeInput::default()
        };
        client.offices().create(&input).unwrap();
        client.offices().delete("o2").unwrap();

        let sent = requests.lock().unwrap();
        assert_eq!(
            calls(&sent),
            vec![
                (Method::POST, "/company/offices"),
                (Method::DELETE, "/company/offices/o2"),
            ]
        );
    }

    #[test]
    fn test_departments_live_under_company() {
        const DEPT: &str = r#"{"id":"d1","name":"Engineering"}"#;
        let (client, requests) = fake_client(vec![
            (200, "[]"),
            (201, DEPT),
            (200, DEPT),
            (204, ""),
        ]);
        let departments = client.departments();
        let input = DepartmentInput {
            name: "Engineering".into(),
            ..DepartmentInput::default()
        };
        departments.list().unwrap();
        departments.create(&input).unwrap();
        departments.update("d1", &input).unwrap();
        departments.delete("d1").unwrap();

        let sent = requests.lock().unwrap();
        assert_eq!(
            calls(&sent),
            vec![
                (Method::GET, "/company/departments"),
                (Method::POST, "/company/departments"),
                (Method::PUT, "/company/departments/d1"),
                (Method::DELETE, "/company/departments/d1"),
            ]
        );
    }

    #[test]
    fn test_function_and_role_mutations() {
        let (client, requests) = fake_client(vec![
            (201, r#"{"id":"f1","name":"Engineering"}"#),
            (200, r#"{"id":"f1","name":"Engineering"}"#),
            (204, ""),
            (201, r#"{"id":"r1","title":"Staff Engineer"}"#),
            (200, r#"{"id":"r1","title":"Staff Engineer"}"#),
            (204, ""),
        ]);
        let function = JobFunctionInput {
            name: "Engineering".into(),
            ..JobFunctionInput::default()
        };
        let role = JobRoleInput {
            title: "Staff Engineer".into(),
            job_function_id: "f1".into(),
            ..JobRoleInput::default()
        };
        client.job_functions().create(&function).unwrap();
        client.job_functions().update("f1", &function).unwrap();
        client.job_functions().delete("f1").unwrap();
        client.job_roles().create(&role).unwrap();
        client.job_roles().update("r1", &role).unwrap();
        client.job_roles().delete("r1").unwrap();

        let sent = requests.lock().unwrap();
        assert_eq!(
            calls(&sent),
            vec![
                (Method::POST, "/job-functions"),
                (Method::PUT, "/job-functions/f1"),
                (Method::DELETE, "/job-functions/f1"),
                (Method::POST, "/job-roles"),
                (Method::PUT, "/job-roles/r1"),
                (Method::DELETE, "/job-roles/r1"),
            ]
        );
        assert_eq!(sent[3].body.as_ref().unwrap()["jobFunctionId"], "f1");
    }
}
