//! Cover letter endpoints

use super::{error::ClientError, typed::AuthenticatedClient};
use crate::types::{
    CoverLetter, CoverLetterDraft, CoverLetterStatus, GenerateCoverLetterRequest, GeneratedText,
    ListParams, Page, RenderCoverLetterRequest, StatusUpdate,
};
use reqwest::Method;

impl AuthenticatedClient {
    pub async fn list_cover_letters(
        &self,
        params: &ListParams<CoverLetterStatus>,
    ) -> Result<Page<CoverLetter>, ClientError> {
        let request = self
            .request(Method::GET, "/cover-letters/list")
            .query(params);
        self.execute(request).await
    }

    pub async fn get_cover_letter(&self, id: &str) -> Result<CoverLetter, ClientError> {
        let request = self.request(Method::GET, &format!("/cover-letters/{id}"));
        self.execute(request).await
    }

    pub async fn create_cover_letter(
        &self,
        draft: &CoverLetterDraft,
    ) -> Result<CoverLetter, ClientError> {
        let request = self.request(Method::POST, "/cover-letters").json(draft);
        self.execute(request).await
    }

    /// Patch the fields set in `draft`
    pub async fn update_cover_letter(
        &self,
        id: &str,
        draft: &CoverLetterDraft,
    ) -> Result<CoverLetter, ClientError> {
        let request = self
            .request(Method::PATCH, &format!("/cover-letters/{id}"))
            .json(draft);
        self.execute(request).await
    }

    pub async fn update_cover_letter_status(
        &self,
        id: &str,
        status: CoverLetterStatus,
    ) -> Result<(), ClientError> {
        let request = self
            .request(Method::PATCH, &format!("/cover-letters/{id}/status"))
            .json(&StatusUpdate { status });
        self.execute_empty(request).await
    }

    pub async fn delete_cover_letter(&self, id: &str) -> Result<(), ClientError> {
        let request = self.request(Method::DELETE, &format!("/cover-letters/{id}"));
        self.execute_empty(request).await
    }

    /// Have the backend draft cover letter text from a résumé and a prompt
    pub async fn generate_cover_letter_text(
        &self,
        body: &GenerateCoverLetterRequest,
    ) -> Result<GeneratedText, ClientError> {
        let request = self
            .request(Method::POST, "/cover-letters/generate")
            .json(body);
        self.execute(request).await
    }

    /// Render the final letter for a job description
    pub async fn render_cover_letter(
        &self,
        body: &RenderCoverLetterRequest,
    ) -> Result<GeneratedText, ClientError> {
        let request = self
            .request(Method::POST, "/cover-letters/render")
            .json(body);
        self.execute(request).await
    }
}
