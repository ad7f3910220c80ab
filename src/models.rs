use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reference to another entity; the API returns either a bare id or a
/// populated `{id, name}` object depending on the endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityRef {
    Id(String),
    Named(NamedRef),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedRef {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default, alias = "title")]
    pub name: String,
}

impl EntityRef {
    pub fn id(&self) -> &str {
        match self {
            EntityRef::Id(id) => id,
            EntityRef::Named(named) => &named.id,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            EntityRef::Id(id) => id,
            EntityRef::Named(named) if named.name.is_empty() => &named.id,
            EntityRef::Named(named) => &named.name,
        }
    }
}

// --- Company ---

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ApprovalType {
    Headcount,
    #[default]
    JobOpening,
}

impl fmt::Display for ApprovalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApprovalType::Headcount => write!(f, "headcount"),
            ApprovalType::JobOpening => write!(f, "job-opening"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompanySettings {
    pub approval_type: ApprovalType,
    pub email_calendar_provider: Option<String>,
    pub allowed_domains: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialLinks {
    pub linkedin: Option<String>,
    pub twitter: Option<String>,
    pub facebook: Option<String>,
    pub instagram: Option<String>,
    pub github: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Company {
    #[serde(alias = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub logo: Option<String>,
    pub website: Option<String>,
    pub description: Option<String>,
    pub industry: Option<String>,
    pub founded_year: Option<i32>,
    pub size: Option<String>,
    pub social_links: SocialLinks,
    pub mission: Option<String>,
    pub vision: Option<String>,
    pub values: Option<String>,
    pub settings: CompanySettings,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

// --- Jobs ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum JobStatus {
    Draft,
    PendingApproval,
    Approved,
    Published,
    Archived,
    Rejected,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Draft => "draft",
            JobStatus::PendingApproval => "pending_approval",
            JobStatus::Approved => "approved",
            JobStatus::Published => "published",
            JobStatus::Archived => "archived",
            JobStatus::Rejected => "rejected",
        }
    }

    /// Transitions worth offering from this status. Only a hint for menus:
    /// the server decides what is legal.
    pub fn available_actions(&self) -> &'static [JobAction] {
        match self {
            JobStatus::Draft => &[JobAction::SubmitForApproval, JobAction::Archive],
            JobStatus::PendingApproval => &[JobAction::Approve, JobAction::Reject],
            JobStatus::Approved => &[JobAction::Publish, JobAction::Archive],
            JobStatus::Published => &[JobAction::Archive],
            JobStatus::Rejected => &[JobAction::SubmitForApproval, JobAction::Archive],
            JobStatus::Archived => &[],
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobAction {
    SubmitForApproval,
    Approve,
    Reject,
    Publish,
    Archive,
}

impl JobAction {
    /// Path segment under `/jobs/{id}/`.
    pub fn segment(&self) -> &'static str {
        match self {
            JobAction::SubmitForApproval => "submit-for-approval",
            JobAction::Approve => "approve",
            JobAction::Reject => "reject",
            JobAction::Publish => "publish",
            JobAction::Archive => "archive",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            JobAction::SubmitForApproval => "Submit for approval",
            JobAction::Approve => "Approve",
            JobAction::Reject => "Reject",
            JobAction::Publish => "Publish",
            JobAction::Archive => "Archive",
        }
    }

    pub fn past_tense(&self) -> &'static str {
        match self {
            JobAction::SubmitForApproval => "submitted for approval",
            JobAction::Approve => "approved",
            JobAction::Reject => "rejected",
            JobAction::Publish => "published",
            JobAction::Archive => "archived",
        }
    }

    pub fn needs_confirmation(&self) -> bool {
        matches!(self, JobAction::Reject | JobAction::Archive)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    #[serde(alias = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub internal_id: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    /// HTML body of the posting.
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub departments: Vec<EntityRef>,
    #[serde(default)]
    pub offices: Vec<EntityRef>,
    pub status: JobStatus,
    #[serde(default)]
    pub job_board_id: Option<String>,
    #[serde(default)]
    pub headcount_id: Option<String>,
    #[serde(default)]
    pub rejection_reason: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

/// Body for job create and full-object update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobInput {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub internal_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub departments: Vec<String>,
    pub offices: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_board_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headcount_id: Option<String>,
}

impl From<&Job> for JobInput {
    fn from(job: &Job) -> Self {
        Self {
            title: job.title.clone(),
            internal_id: job.internal_id.clone(),
            location: job.location.clone(),
            content: job.content.clone(),
            departments: job.departments.iter().map(|d| d.id().to_string()).collect(),
            offices: job.offices.iter().map(|o| o.id().to_string()).collect(),
            job_board_id: job.job_board_id.clone(),
            headcount_id: job.headcount_id.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobFilter {
    pub status: Option<JobStatus>,
    pub job_board_id: Option<String>,
}

// --- Job boards ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum JobBoardSource {
    Greenhouse,
    Ashby,
    Custom,
}

impl JobBoardSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobBoardSource::Greenhouse => "greenhouse",
            JobBoardSource::Ashby => "ashby",
            JobBoardSource::Custom => "custom",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobBoard {
    #[serde(alias = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub custom_domain: Option<String>,
    #[serde(default)]
    pub is_external: bool,
    #[serde(default)]
    pub source: Option<JobBoardSource>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobBoardInput {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl From<&JobBoard> for JobBoardInput {
    fn from(board: &JobBoard) -> Self {
        Self {
            title: board.title.clone(),
            slug: board.slug.clone(),
            description: board.description.clone(),
            custom_domain: board.custom_domain.clone(),
            is_active: Some(board.is_active),
        }
    }
}

/// Connects a board that is mirrored from an external ATS.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalBoardImport {
    pub title: String,
    /// Board token (Greenhouse) or job board name (Ashby).
    pub external_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

// --- Organization structure ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Office {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub is_headquarters: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfficeInput {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    pub is_headquarters: bool,
}

impl From<&Office> for OfficeInput {
    fn from(office: &Office) -> Self {
        Self {
            name: office.name.clone(),
            address: office.address.clone(),
            city: office.city.clone(),
            country: office.country.clone(),
            is_headquarters: office.is_headquarters,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentInput {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobFunction {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "departmentId")]
    pub department: Option<EntityRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobFunctionInput {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRole {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(alias = "name")]
    pub title: String,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default, alias = "jobFunctionId")]
    pub job_function: Option<EntityRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRoleInput {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    pub job_function_id: String,
}

// --- Headcount ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum HeadcountStatus {
    Pending,
    Approved,
    Rejected,
}

impl fmt::Display for HeadcountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HeadcountStatus::Pending => "pending",
            HeadcountStatus::Approved => "approved",
            HeadcountStatus::Rejected => "rejected",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadcountRequest {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default, alias = "roleId")]
    pub role: Option<EntityRef>,
    #[serde(default, alias = "departmentId")]
    pub department: Option<EntityRef>,
    #[serde(default)]
    pub team_name: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    pub status: HeadcountStatus,
    #[serde(default)]
    pub rejection_reason: Option<String>,
    /// Job opened against this request, once one exists.
    #[serde(default)]
    pub job_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadcountInput {
    pub role_id: String,
    pub department_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Body of the reject endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RejectBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

// --- API keys ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKey {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    /// Leading characters of the key, for recognition.
    #[serde(default)]
    pub prefix: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_used_at: Option<DateTime<Utc>>,
}

/// Returned once at creation; the secret is never shown again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedApiKey {
    #[serde(flatten)]
    pub api_key: ApiKey,
    #[serde(alias = "apiKey", alias = "secret")]
    pub key: String,
}

// --- Admin dashboard ---

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardStats {
    pub total_jobs: u64,
    pub published_jobs: u64,
    pub pending_approvals: u64,
    pub total_applications: u64,
    pub active_job_boards: u64,
    pub open_headcount: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_decodes_populated_and_bare_refs() {
        let raw = r#"{
            "_id": "j1",
            "title": "Backend Engineer",
            "status": "pending_approval",
            "departments": ["d1", {"_id": "d2", "name": "Platform"}],
            "offices": [{"id": "o1"}],
            "createdAt": "2025-03-01T10:00:00Z"
        }"#;
        let job: Job = serde_json::from_str(raw).unwrap();
        assert_eq!(job.id, "j1");
        assert_eq!(job.status, JobStatus::PendingApproval);
        assert_eq!(job.departments[0].label(), "d1");
        assert_eq!(job.departments[1].id(), "d2");
        assert_eq!(job.departments[1].label(), "Platform");
        assert_eq!(job.offices[0].label(), "o1");
        assert!(job.created_at.is_some());
    }

    #[test]
    fn test_job_input_from_job_flattens_refs() {
        let job: Job = serde_json::from_str(
            r#"{"id":"j1","title":"PM","status":"draft","departments":[{"id":"d9","name":"Product"}],"jobBoardId":"b1"}"#,
        )
        .unwrap();
        let input = JobInput::from(&job);
        assert_eq!(input.departments, vec!["d9".to_string()]);

        let body = serde_json::to_value(&input).unwrap();
        assert_eq!(body["jobBoardId"], "b1");
        assert!(body.get("location").is_none());
    }

    #[test]
    fn test_company_settings_round_trip_names() {
        let company: Company = serde_json::from_str(
            r#"{"name":"Acme","foundedYear":1999,"settings":{"approvalType":"headcount","allowedDomains":["acme.com"]}}"#,
        )
        .unwrap();
        assert_eq!(company.settings.approval_type, ApprovalType::Headcount);
        assert_eq!(company.founded_year, Some(1999));

        let body = serde_json::to_value(&company).unwrap();
        assert_eq!(body["settings"]["approvalType"], "headcount");
        assert!(body.get("id").is_none());
    }

    #[test]
    fn test_available_actions_follow_workflow() {
        assert_eq!(
            JobStatus::PendingApproval.available_actions(),
            &[JobAction::Approve, JobAction::Reject]
        );
        assert_eq!(JobStatus::Approved.available_actions()[0], JobAction::Publish);
        assert!(JobStatus::Archived.available_actions().is_empty());
        assert_eq!(JobAction::SubmitForApproval.segment(), "submit-for-approval");
    }

    #[test]
    fn test_created_api_key_accepts_secret_alias() {
        let created: CreatedApiKey =
            serde_json::from_str(r#"{"id":"k1","name":"CI","secret":"ck_live_123"}"#).unwrap();
        assert_eq!(created.api_key.name, "CI");
        assert_eq!(created.key, "ck_live_123");
    }
}
