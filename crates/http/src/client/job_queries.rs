//! Job query endpoints

use super::{error::ClientError, typed::AuthenticatedClient};
use crate::types::{
    GenerateKeywordsRequest, JobQuery, JobQueryDraft, JobQueryKeywordsResponse, JobQueryStatus,
    ListParams, Page, StatusUpdate,
};
use reqwest::Method;

impl AuthenticatedClient {
    pub async fn list_job_queries(
        &self,
        params: &ListParams<JobQueryStatus>,
    ) -> Result<Page<JobQuery>, ClientError> {
        let request = self.request(Method::GET, "/job-queries/list").query(params);
        self.execute(request).await
    }

    pub async fn get_job_query(&self, id: &str) -> Result<JobQuery, ClientError> {
        let request = self.request(Method::GET, &format!("/job-queries/{id}"));
        self.execute(request).await
    }

    pub async fn create_job_query(&self, draft: &JobQueryDraft) -> Result<JobQuery, ClientError> {
        let request = self.request(Method::POST, "/job-queries").json(draft);
        self.execute(request).await
    }

    pub async fn update_job_query(
        &self,
        id: &str,
        draft: &JobQueryDraft,
    ) -> Result<JobQuery, ClientError> {
        let request = self
            .request(Method::PATCH, &format!("/job-queries/{id}"))
            .json(draft);
        self.execute(request).await
    }

    pub async fn update_job_query_status(
        &self,
        id: &str,
        status: JobQueryStatus,
    ) -> Result<(), ClientError> {
        let request = self
            .request(Method::PATCH, &format!("/job-queries/{id}/status"))
            .json(&StatusUpdate { status });
        self.execute_empty(request).await
    }

    pub async fn delete_job_query(&self, id: &str) -> Result<(), ClientError> {
        let request = self.request(Method::DELETE, &format!("/job-queries/{id}"));
        self.execute_empty(request).await
    }

    /// Derive search keywords from a résumé
    pub async fn generate_job_query_keywords(
        &self,
        resume_id: &str,
    ) -> Result<JobQueryKeywordsResponse, ClientError> {
        let request = self
            .request(Method::POST, "/job-queries/generate")
            .json(&GenerateKeywordsRequest {
                resume_id: resume_id.to_owned(),
            });
        self.execute(request).await
    }
}
