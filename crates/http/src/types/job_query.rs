//! Job search queries

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobQueryStatus {
    Active,
    Archived,
}

impl fmt::Display for JobQueryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Active => "active",
            Self::Archived => "archived",
        })
    }
}

impl FromStr for JobQueryStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "archived" => Ok(Self::Archived),
            other => Err(format!("unknown job query status: {other}")),
        }
    }
}

/// Keyword groups the backend turns into a search string
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobQueryKeywords {
    #[serde(default)]
    pub job_titles: Vec<String>,
    #[serde(default)]
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub work_arrangements: Vec<String>,
    #[serde(default)]
    pub positions: Vec<String>,
    #[serde(default)]
    pub exclude_words: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobQuery {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub keywords: JobQueryKeywords,
    pub query: String,
    pub status: JobQueryStatus,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct JobQueryDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<JobQueryKeywords>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<JobQueryStatus>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerateKeywordsRequest {
    pub resume_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobQueryKeywordsResponse {
    pub keywords: JobQueryKeywords,
}
