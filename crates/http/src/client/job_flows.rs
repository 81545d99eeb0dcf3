//! Job flow endpoints

use super::{error::ClientError, typed::AuthenticatedClient};
use crate::types::{CreateJobFlowRequest, JobFlow, JobFlowStatus, ListParams, Page, StatusUpdate};
use reqwest::Method;

impl AuthenticatedClient {
    pub async fn create_job_flow(
        &self,
        body: &CreateJobFlowRequest,
    ) -> Result<JobFlow, ClientError> {
        let request = self.request(Method::POST, "/job-flow").json(body);
        self.execute(request).await
    }

    pub async fn list_job_flows(
        &self,
        params: &ListParams<JobFlowStatus>,
    ) -> Result<Page<JobFlow>, ClientError> {
        let request = self.request(Method::GET, "/job-flow/list").query(params);
        self.execute(request).await
    }

    /// Pause, resume or archive a flow
    pub async fn update_job_flow_status(
        &self,
        id: &str,
        status: JobFlowStatus,
    ) -> Result<(), ClientError> {
        let request = self
            .request(Method::PATCH, &format!("/job-flow/{id}/status"))
            .json(&StatusUpdate { status });
        self.execute_empty(request).await
    }

    pub async fn delete_job_flow(&self, id: &str) -> Result<(), ClientError> {
        let request = self.request(Method::DELETE, &format!("/job-flow/{id}"));
        self.execute_empty(request).await
    }
}
