//! Résumé endpoints

use super::{error::ClientError, typed::AuthenticatedClient};
use crate::types::{ListParams, Page, Resume, ResumeStatus, StatusUpdate};
use bytes::Bytes;
use reqwest::{
    Method,
    multipart::{Form, Part},
};

/// Content types accepted by `/resumes/upload`
pub const RESUME_CONTENT_TYPES: [&str; 3] = [
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

/// Guess a résumé content type from a file name
pub fn content_type_for(filename: &str) -> Option<&'static str> {
    let extension = filename.rsplit_once('.')?.1.to_ascii_lowercase();
    match extension.as_str() {
        "pdf" => Some(RESUME_CONTENT_TYPES[0]),
        "doc" => Some(RESUME_CONTENT_TYPES[1]),
        "docx" => Some(RESUME_CONTENT_TYPES[2]),
        _ => None,
    }
}

impl AuthenticatedClient {
    pub async fn list_resumes(
        &self,
        params: &ListParams<ResumeStatus>,
    ) -> Result<Page<Resume>, ClientError> {
        let request = self.request(Method::GET, "/resumes/list").query(params);
        self.execute(request).await
    }

    /// Download the original uploaded file
    pub async fn download_resume(&self, id: &str) -> Result<Bytes, ClientError> {
        let request = self.request(Method::GET, &format!("/resumes/{id}/download"));
        let response = self.send(request).await?;
        Ok(response.bytes().await?)
    }

    /// Upload a PDF, DOC or DOCX résumé
    pub async fn upload_resume(
        &self,
        filename: &str,
        content_type: &str,
        contents: Bytes,
    ) -> Result<(), ClientError> {
        if !RESUME_CONTENT_TYPES.contains(&content_type) {
            return Err(ClientError::Validation(
                "Only PDF, DOC, and DOCX files are allowed".into(),
            ));
        }

        // Multipart bodies are streamed and can't be cloned, so rebuild on replay
        self.send_with(|| {
            let part = Part::bytes(contents.to_vec())
                .file_name(filename.to_owned())
                .mime_str(content_type)?;
            Ok(self
                .request(Method::POST, "/resumes/upload")
                .multipart(Form::new().part("file", part)))
        })
        .await
        .map(drop)
    }

    pub async fn update_resume_status(
        &self,
        id: &str,
        status: ResumeStatus,
    ) -> Result<(), ClientError> {
        let request = self
            .request(Method::PATCH, &format!("/resumes/{id}/status"))
            .json(&StatusUpdate { status });
        self.execute_empty(request).await
    }

    pub async fn delete_resume(&self, id: &str) -> Result<(), ClientError> {
        let request = self.request(Method::DELETE, &format!("/resumes/{id}"));
        self.execute_empty(request).await
    }
}
