//! Single-entry cache for the tenant's company profile.
//!
//! Loaded once, refreshed on demand, replaced after a successful update.
//! There is no background invalidation and no optimistic write.

use tracing::{error, info};

use crate::client::ApiClient;
use crate::error::{ApiError, ApiResult};
use crate::models::Company;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Empty,
    Loading,
    Ready,
    Error,
}

#[derive(Debug)]
pub struct CompanyCache {
    status: CacheStatus,
    value: Option<Company>,
    last_error: Option<String>,
}

impl Default for CompanyCache {
    fn default() -> Self {
        Self::new()
    }
}

impl CompanyCache {
    pub fn new() -> Self {
        Self {
            status: CacheStatus::Empty,
            value: None,
            last_error: None,
        }
    }

    pub fn status(&self) -> CacheStatus {
        self.status
    }

    pub fn value(&self) -> Option<&Company> {
        self.value.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Fetch on first use, otherwise return the cached company. A cache left
    /// in `Loading` by `begin_refresh` is fetched too.
    pub fn ensure_loaded(&mut self, client: &ApiClient) -> ApiResult<&Company> {
        if self.status == CacheStatus::Ready && self.value.is_some() {
            return self.current();
        }
        self.refresh(client)
    }

    /// Mark a fetch as pending. The cached value, if any, stays readable.
    pub fn begin_refresh(&mut self) {
        self.status = CacheStatus::Loading;
    }

    /// Re-fetch unconditionally. A failure keeps whatever was cached before.
    pub fn refresh(&mut self, client: &ApiClient) -> ApiResult<&Company> {
        self.begin_refresh();
        match client.company().get() {
            Ok(company) => {
                info!(company = %company.name, "company loaded");
                self.value = Some(company);
                self.last_error = None;
                self.status = CacheStatus::Ready;
                self.current()
            }
            Err(e) => {
                error!(error = %e, "failed to load company");
                self.last_error = Some(e.to_string());
                self.status = CacheStatus::Error;
                Err(e)
            }
        }
    }

    /// PUT the full object and replace the cached value with the server's
    /// answer. On failure the cache is left as it was.
    pub fn update(&mut self, client: &ApiClient, company: &Company) -> ApiResult<&Company> {
        match client.company().update(company) {
            Ok(saved) => {
                info!(company = %saved.name, "company updated");
                self.value = Some(saved);
                self.last_error = None;
                self.status = CacheStatus::Ready;
                self.current()
            }
            Err(e) => {
                error!(error = %e, "failed to update company");
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    fn current(&self) -> ApiResult<&Company> {
        self.value
            .as_ref()
            .ok_or_else(|| ApiError::NotFound("company not loaded".to_string()))
    }
}
