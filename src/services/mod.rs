//! One borrowed service per backend area. Every method is exactly one
//! request; validation and workflow rules live on the server.

mod analytics;
mod api_keys;
mod company;
mod headcount;
mod job_boards;
mod jobs;
mod organization;

pub use analytics::AnalyticsService;
pub use api_keys::ApiKeyService;
pub use company::CompanyService;
pub use headcount::HeadcountService;
pub use job_boards::JobBoardService;
pub use jobs::JobService;
pub use organization::{DepartmentService, JobFunctionService, JobRoleService, OfficeService};

use crate::client::ApiClient;

impl ApiClient {
    pub fn company(&self) -> CompanyService<'_> {
        CompanyService { client: self }
    }

    pub fn offices(&self) -> OfficeService<'_> {
        OfficeService { client: self }
    }

    pub fn departments(&self) -> DepartmentService<'_> {
        DepartmentService { client: self }
    }

    pub fn job_functions(&self) -> JobFunctionService<'_> {
        JobFunctionService { client: self }
    }

    pub fn job_roles(&self) -> JobRoleService<'_> {
        JobRoleService { client: self }
    }

    pub fn jobs(&self) -> JobService<'_> {
        JobService { client: self }
    }

    pub fn job_boards(&self) -> JobBoardService<'_> {
        JobBoardService { client: self }
    }

    pub fn headcount(&self) -> HeadcountService<'_> {
        HeadcountService { client: self }
    }

    pub fn api_keys(&self) -> ApiKeyService<'_> {
        ApiKeyService { client: self }
    }

    pub fn analytics(&self) -> AnalyticsService<'_> {
        AnalyticsService { client: self }
    }
}
