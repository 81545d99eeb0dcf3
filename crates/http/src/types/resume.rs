//! Résumé records

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResumeStatus {
    Active,
    Archived,
    Deleted,
}

impl fmt::Display for ResumeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Active => "active",
            Self::Archived => "archived",
            Self::Deleted => "deleted",
        })
    }
}

impl FromStr for ResumeStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "archived" => Ok(Self::Archived),
            "deleted" => Ok(Self::Deleted),
            other => Err(format!("unknown resume status: {other}")),
        }
    }
}

/// Scores computed by the backend when a résumé is uploaded
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeScoring {
    #[serde(rename = "education_score")]
    pub education: f64,
    #[serde(rename = "experience_score")]
    pub experience: f64,
    #[serde(rename = "language_score")]
    pub language: f64,
    #[serde(rename = "sections_score")]
    pub sections: f64,
    #[serde(rename = "timeline_score")]
    pub timeline: f64,
    #[serde(rename = "total_score")]
    pub total: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resume {
    pub id: String,
    pub user_id: String,
    pub file_id: String,
    pub filename: String,
    pub status: ResumeStatus,
    pub created_at: String,
    #[serde(default)]
    pub scoring: Option<ResumeScoring>,
}
