//! Wire types shared by the client and its callers

pub mod auth;
pub mod cover_letter;
pub mod job_flow;
pub mod job_query;
pub mod resume;

pub use auth::{
    AuthResponse, AvailabilityField, AvailabilityRequest, AvailabilityResponse, RefreshRequest,
    SignInRequest, SignUpRequest, TokenPair,
};
pub use cover_letter::{
    CoverLetter, CoverLetterContent, CoverLetterDraft, CoverLetterStatus, GenerateCoverLetterRequest,
    GeneratedText, RenderCoverLetterRequest,
};
pub use job_flow::{CreateJobFlowRequest, JobFlow, JobFlowSource, JobFlowStatus};
pub use job_query::{
    GenerateKeywordsRequest, JobQuery, JobQueryDraft, JobQueryKeywords, JobQueryKeywordsResponse,
    JobQueryStatus,
};
pub use resume::{Resume, ResumeScoring, ResumeStatus};

use serde::{Deserialize, Serialize};

/// Pagination block returned with every list endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: u64,
    pub current_page: u32,
    pub per_page: u32,
    /// Only some endpoints report it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<u32>,
}

impl Pagination {
    /// Number of pages, derived from `total` when the server omits it
    pub fn page_count(&self) -> u32 {
        self.total_pages.unwrap_or_else(|| {
            if self.per_page == 0 {
                0
            } else {
                u32::try_from(self.total.div_ceil(u64::from(self.per_page))).unwrap_or(u32::MAX)
            }
        })
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.page_count()
    }
}

/// One page of a list endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub list: Vec<T>,
    pub pagination: Pagination,
}

/// Query parameters for list endpoints
///
/// `S` is the status filter type of the resource; endpoints without a
/// status filter use [`NoFilter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ListParams<S = NoFilter> {
    pub page: u32,
    pub per_page: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<S>,
}

/// Status filter placeholder for endpoints that don't filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NoFilter {}

impl<S> ListParams<S> {
    pub const DEFAULT_PER_PAGE: u32 = 10;

    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page,
            per_page,
            status: None,
        }
    }

    /// Restrict the listing to one status
    pub fn with_status(mut self, status: S) -> Self {
        self.status = Some(status);
        self
    }
}

impl<S> Default for ListParams<S> {
    fn default() -> Self {
        Self::new(1, Self::DEFAULT_PER_PAGE)
    }
}

/// Body of every `PATCH /{resource}/{id}/status` call
#[derive(Debug, Clone, Copy, Serialize)]
pub struct StatusUpdate<S> {
    pub status: S,
}
