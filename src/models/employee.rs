use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::education::EducationDetail;
use crate::models::employment::EmploymentDetail;
use crate::utils::file_store::public_url;

pub const DEFAULT_STATUS: &str = "pending";

/// One row of the employee join across the 1:1 sub-record tables.
#[derive(sqlx::FromRow, Debug, Clone, Default)]
pub struct EmployeeRow {
    pub id: i32,
    pub full_name: String,
    pub email: Option<String>,
    pub phone_no: Option<String>,
    pub alternate_number: Option<String>,
    pub guardian_name: Option<String>,
    pub guardian_contact: Option<String>,
    pub marital_status: Option<String>,
    pub gender: Option<String>,
    pub blood_group: Option<String>,
    pub date_of_birth: Option<String>,
    pub created_at: DateTime<Utc>,
    pub aadhar_no: Option<String>,
    pub aadhar_file: Option<String>,
    pub pan_no: Option<String>,
    pub pan_file: Option<String>,
    pub pf_no: Option<String>,
    pub uan_no: Option<String>,
    pub current_address: Option<String>,
    pub current_city: Option<String>,
    pub current_state: Option<String>,
    pub current_pincode: Option<String>,
    pub permanent_address: Option<String>,
    pub permanent_city: Option<String>,
    pub permanent_state: Option<String>,
    pub permanent_pincode: Option<String>,
    pub bank_name: Option<String>,
    pub account_no: Option<String>,
    pub ifsc_code: Option<String>,
    pub branch_name: Option<String>,
    pub signature_file: Option<String>,
    pub consent: Option<bool>,
    pub status: Option<String>,
}

/// An employee's onboarding submission as returned to HR.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeAggregate {
    pub id: i32,
    pub full_name: String,
    pub email: Option<String>,
    pub phone_no: Option<String>,
    pub alternate_number: Option<String>,
    pub guardian_name: Option<String>,
    pub guardian_contact: Option<String>,
    pub marital_status: Option<String>,
    pub gender: Option<String>,
    pub blood_group: Option<String>,
    pub date_of_birth: Option<String>,
    pub aadhar_no: Option<String>,
    pub aadhar_file: Option<String>,
    pub pan_no: Option<String>,
    pub pan_file: Option<String>,
    pub pf_no: Option<String>,
    pub uan_no: Option<String>,
    pub current_address: Option<String>,
    pub current_city: Option<String>,
    pub current_state: Option<String>,
    pub current_pincode: Option<String>,
    pub permanent_address: Option<String>,
    pub permanent_city: Option<String>,
    pub permanent_state: Option<String>,
    pub permanent_pincode: Option<String>,
    #[serde(rename = "bankNameAsPerForm")]
    pub bank_name: Option<String>,
    pub account_no: Option<String>,
    pub ifsc_code: Option<String>,
    pub branch_name: Option<String>,
    pub signature: Option<String>,
    pub consent: bool,
    pub status: String,
    pub submitted_at: DateTime<Utc>,
    pub education_details: Vec<EducationDetail>,
    pub employment_details: Vec<EmploymentDetail>,
}

impl From<EmployeeRow> for EmployeeAggregate {
    fn from(row: EmployeeRow) -> Self {
        EmployeeAggregate {
            id: row.id,
            full_name: row.full_name,
            email: row.email,
            phone_no: row.phone_no,
            alternate_number: row.alternate_number,
            guardian_name: row.guardian_name,
            guardian_contact: row.guardian_contact,
            marital_status: row.marital_status,
            gender: row.gender,
            blood_group: row.blood_group,
            date_of_birth: row.date_of_birth,
            aadhar_no: row.aadhar_no,
            aadhar_file: row.aadhar_file.as_deref().and_then(public_url),
            pan_no: row.pan_no,
            pan_file: row.pan_file.as_deref().and_then(public_url),
            pf_no: row.pf_no,
            uan_no: row.uan_no,
            current_address: row.current_address,
            current_city: row.current_city,
            current_state: row.current_state,
            current_pincode: row.current_pincode,
            permanent_address: row.permanent_address,
            permanent_city: row.permanent_city,
            permanent_state: row.permanent_state,
            permanent_pincode: row.permanent_pincode,
            bank_name: row.bank_name,
            account_no: row.account_no,
            ifsc_code: row.ifsc_code,
            branch_name: row.branch_name,
            signature: row.signature_file.as_deref().and_then(public_url),
            consent: row.consent.unwrap_or(false),
            status: row
                .status
                .filter(|status| !status.is_empty())
                .unwrap_or_else(|| DEFAULT_STATUS.to_string()),
            submitted_at: row.created_at,
            education_details: Vec::new(),
            employment_details: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_signature_row_reads_as_pending_without_consent() {
        let row = EmployeeRow {
            id: 7,
            full_name: "Jane Doe".to_string(),
            ..Default::default()
        };
        let employee = EmployeeAggregate::from(row);

        assert_eq!(employee.status, "pending");
        assert!(!employee.consent);
        assert_eq!(employee.signature, None);
    }

    #[test]
    fn stored_paths_become_public_urls() {
        let row = EmployeeRow {
            id: 1,
            full_name: "Jane Doe".to_string(),
            aadhar_file: Some("uploads/1-a-aadhaar.pdf".to_string()),
            signature_file: Some("/data/uploads/2-b-sig.png".to_string()),
            status: Some("approved".to_string()),
            consent: Some(true),
            ..Default::default()
        };
        let employee = EmployeeAggregate::from(row);

        assert_eq!(employee.aadhar_file.as_deref(), Some("/uploads/1-a-aadhaar.pdf"));
        assert_eq!(employee.pan_file, None);
        assert_eq!(employee.signature.as_deref(), Some("/uploads/2-b-sig.png"));
        assert_eq!(employee.status, "approved");
        assert!(employee.consent);
    }

    #[test]
    fn serializes_with_form_key_names() {
        let row = EmployeeRow {
            id: 3,
            full_name: "Jane Doe".to_string(),
            bank_name: Some("State Bank".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(EmployeeAggregate::from(row)).unwrap();

        assert_eq!(json["fullName"], "Jane Doe");
        assert_eq!(json["bankNameAsPerForm"], "State Bank");
        assert_eq!(json["status"], "pending");
        assert!(json["educationDetails"].as_array().unwrap().is_empty());
        assert!(json["employmentDetails"].as_array().unwrap().is_empty());
    }
}
