use serde::{Deserialize, Serialize};

use crate::models::onboarding::text_or_number;
use crate::utils::file_store::public_url;

/// One entry of the `employmentDetails` list sent with the form.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EmploymentEntry {
    #[serde(default, deserialize_with = "text_or_number")]
    pub company_name: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub designation: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub last_project: Option<String>,
    #[serde(default, rename = "companyStartDate", deserialize_with = "text_or_number")]
    pub start_date: Option<String>,
    #[serde(default, rename = "companyEndDate", deserialize_with = "text_or_number")]
    pub end_date: Option<String>,
}

#[derive(sqlx::FromRow, Debug, Clone)]
pub struct EmploymentRow {
    pub id: i32,
    pub employee_id: i32,
    pub company_name: Option<String>,
    pub designation: Option<String>,
    pub last_project: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub doc_path: Option<String>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EmploymentDetail {
    pub company_name: Option<String>,
    pub designation: Option<String>,
    pub last_project: Option<String>,
    #[serde(rename = "companyStartDate")]
    pub start_date: Option<String>,
    #[serde(rename = "companyEndDate")]
    pub end_date: Option<String>,
    pub doc: Option<String>,
}

impl From<EmploymentRow> for EmploymentDetail {
    fn from(row: EmploymentRow) -> Self {
        EmploymentDetail {
            company_name: row.company_name,
            designation: row.designation,
            last_project: row.last_project,
            start_date: row.start_date,
            end_date: row.end_date,
            doc: row.doc_path.as_deref().and_then(public_url),
        }
    }
}
