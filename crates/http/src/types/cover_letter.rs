//! Cover letter records and generation requests

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoverLetterStatus {
    Active,
    Archived,
    Deleted,
}

impl fmt::Display for CoverLetterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Active => "active",
            Self::Archived => "archived",
            Self::Deleted => "deleted",
        })
    }
}

impl FromStr for CoverLetterStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "archived" => Ok(Self::Archived),
            "deleted" => Ok(Self::Deleted),
            other => Err(format!("unknown cover letter status: {other}")),
        }
    }
}

/// The four blocks a cover letter is assembled from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverLetterContent {
    pub introduction: String,
    pub body_part_1: String,
    pub body_part_2: String,
    pub conclusion: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverLetter {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub content: CoverLetterContent,
    pub status: CoverLetterStatus,
    pub created_at: String,
    pub updated_at: String,
}

/// Create/update body; unset fields are left untouched by the server
#[derive(Debug, Clone, Default, Serialize)]
pub struct CoverLetterDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<CoverLetterContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CoverLetterStatus>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerateCoverLetterRequest {
    pub resume_id: String,
    pub prompt: String,
    pub content_type: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RenderCoverLetterRequest {
    pub job_description: String,
    pub content: CoverLetterContent,
}

/// Text produced by the generate/render endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedText {
    pub text: String,
}
