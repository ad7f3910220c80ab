use crate::client::ApiClient;
use crate::error::ApiResult;
use crate::models::{Company, CompanySettings};

pub struct CompanyService<'a> {
    pub(super) client: &'a ApiClient,
}

impl CompanyService<'_> {
    pub fn get(&self) -> ApiResult<Company> {
        self.client.get("/company")
    }

    /// First-time setup of the tenant's company profile.
    pub fn create(&self, company: &Company) -> ApiResult<Company> {
        self.client.post("/company", company)
    }

    /// Full-object replace; last write wins.
    pub fn update(&self, company: &Company) -> ApiResult<Company> {
        self.client.put("/company", company)
    }

    pub fn settings(&self) -> ApiResult<CompanySettings> {
        self.client.get("/company/settings")
    }

    pub fn update_settings(&self, settings: &CompanySettings) -> ApiResult<CompanySettings> {
        self.client.put("/company/settings", settings)
    }
}

#[cfg(test)]
mod tests {
    use crate::models::ApprovalType;
    use crate::testing::fake_client;
    use reqwest::Method;

    #[test]
    fn test_settings_update_puts_full_settings() {
        let (client, requests) = fake_client(vec![(
            200,
            r#"{"approvalType":"headcount","allowedDomains":["acme.com"]}"#,
        )]);
        let mut settings = crate::models::CompanySettings::default();
        settings.approval_type = ApprovalType::Headcount;
        settings.allowed_domains = vec!["acme.com".into()];

        let saved = client.company().update_settings(&settings).unwrap();
        assert_eq!(saved.approval_type, ApprovalType::Headcount);

        let sent = requests.lock().unwrap();
        assert_eq!(sent[0].method, Method::PUT);
        assert_eq!(sent[0].path, "/company/settings");
        assert_eq!(sent[0].body.as_ref().unwrap()["approvalType"], "headcount");
    }

    #[test]
    fn test_company_endpoints() {
        let (client, requests) = fake_client(vec![
            (200, r#"{"name":"Acme"}"#),
            (201, r#"{"name":"Acme"}"#),
            (200, r#"{"name":"Acme Corp"}"#),
            (200, "{}"),
        ]);
        let company = client.company();
        let current = company.get().unwrap();
        company.create(&current).unwrap();
        let saved = company.update(&current).unwrap();
        assert_eq!(saved.name, "Acme Corp");
        company.settings().unwrap();

        let sent = requests.lock().unwrap();
        let calls: Vec<(Method, &str)> =
            sent.iter().map(|r| (r.method.clone(), r.path.as_str())).collect();
        assert_eq!(
            calls,
            vec![
                (Method::GET, "/company"),
                (Method::POST, "/company"),
                (Method::PUT, "/company"),
                (Method::GET, "/company/settings"),
            ]
        );
        assert_eq!(sent[2].body.as_ref().unwrap()["name"], "Acme");
    }
}
