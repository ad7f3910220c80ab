use serde::Serialize;

use crate::client::ApiClient;
use crate::error::ApiResult;
use crate::models::{ApiKey, CreatedApiKey};

#[derive(Serialize)]
struct CreateKey<'a> {
    name: &'a str,
}

pub struct ApiKeyService<'a> {
    pub(super) client: &'a ApiClient,
}

impl ApiKeyService<'_> {
    pub fn list(&self) -> ApiResult<Vec<ApiKey>> {
        self.client.get("/company-api-keys")
    }

    pub fn create(&self, name: &str) -> ApiResult<CreatedApiKey> {
        self.client.post("/company-api-keys", &CreateKey { name })
    }

    pub fn revoke(&self, id: &str) -> ApiResult<()> {
        self.client.delete(&format!("/company-api-keys/{}", id))
    }
}

#[cfg(test)]
mod tests {
    use crate::testing::fake_client;
    use reqwest::Method;

    #[test]
    fn test_create_and_revoke() {
        let (client, requests) = fake_client(vec![
            (201, r#"{"id":"k1","name":"Zapier","key":"ck_abc"}"#),
            (204, ""),
        ]);
        let created = client.api_keys().create("Zapier").unwrap();
        assert_eq!(created.key, "ck_abc");
        client.api_keys().revoke("k1").unwrap();

        let sent = requests.lock().unwrap();
        assert_eq!(sent[0].body, Some(serde_json::json!({"name": "Zapier"})));
        assert_eq!(sent[1].method, Method::DELETE);
        assert_eq!(sent[1].path, "/company-api-keys/k1");
    }

    #[test]
    fn test_list_endpoint() {
        let (client, requests) = fake_client(vec![(
            200,
            r#"[{"id":"k1","name":"Zapier","prefix":"ck_a"}]"#,
        )]);
        let keys = client.api_keys().list().unwrap();
        assert_eq!(keys[0].prefix.as_deref(), Some("ck_a"));

        let sent = requests.lock().unwrap();
        assert_eq!(sent[0].method, Method::GET);
        assert_eq!(sent[0].path, "/company-api-keys");
    }
}
