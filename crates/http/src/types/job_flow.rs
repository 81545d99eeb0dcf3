//! Job flows: a résumé, a cover letter and a query wired to a job source

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobFlowSource {
    Linkedin,
    Internal,
}

impl FromStr for JobFlowSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "linkedin" => Ok(Self::Linkedin),
            "internal" => Ok(Self::Internal),
            other => Err(format!("unknown job flow source: {other}")),
        }
    }
}

impl fmt::Display for JobFlowSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Linkedin => "linkedin",
            Self::Internal => "internal",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobFlowStatus {
    Active,
    Paused,
    Archived,
}

impl fmt::Display for JobFlowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Archived => "archived",
        })
    }
}

impl FromStr for JobFlowStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "paused" => Ok(Self::Paused),
            "archived" => Ok(Self::Archived),
            other => Err(format!("unknown job flow status: {other}")),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateJobFlowRequest {
    pub resume_id: String,
    pub cover_letter_id: String,
    pub job_query_id: String,
    pub source: JobFlowSource,
    pub status: JobFlowStatus,
}

/// Résumé as embedded in a job flow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowResume {
    pub id: String,
    pub filename: String,
}

/// Cover letter as embedded in a job flow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowCoverLetter {
    pub id: String,
    pub name: String,
}

/// Job query as embedded in a job flow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowJobQuery {
    pub id: String,
    pub name: String,
    pub query: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobFlow {
    pub id: String,
    pub user_id: String,
    pub source: JobFlowSource,
    pub status: JobFlowStatus,
    pub created_at: String,
    pub updated_at: String,
    pub resume: FlowResume,
    pub cover_letter: FlowCoverLetter,
    pub job_query: FlowJobQuery,
}
