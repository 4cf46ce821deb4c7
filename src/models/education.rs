use serde::{Deserialize, Serialize};

use crate::models::onboarding::text_or_number;
use crate::utils::file_store::public_url;

/// One entry of the `educationDetails` list sent with the form.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct EducationEntry {
    #[serde(default, deserialize_with = "text_or_number")]
    pub level: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub stream: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub institution: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub year: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub score: Option<String>,
}

#[derive(sqlx::FromRow, Debug, Clone)]
pub struct EducationRow {
    pub id: i32,
    pub employee_id: i32,
    pub level: Option<String>,
    pub stream: Option<String>,
    pub institution: Option<String>,
    pub year: Option<String>,
    pub score: Option<String>,
    pub doc_path: Option<String>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct EducationDetail {
    pub level: Option<String>,
    pub stream: Option<String>,
    pub institution: Option<String>,
    pub year: Option<String>,
    pub score: Option<String>,
    pub doc: Option<String>,
}

impl From<EducationRow> for EducationDetail {
    fn from(row: EducationRow) -> Self {
        EducationDetail {
            level: row.level,
            stream: row.stream,
            institution: row.institution,
            year: row.year,
            score: row.score,
            doc: row.doc_path.as_deref().and_then(public_url),
        }
    }
}
