use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::errors::{AppError, Section};
use crate::models::education::EducationEntry;
use crate::models::employment::EmploymentEntry;
use crate::utils::multipart::FormFields;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersonalInfo {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone_no: Option<String>,
    pub alternate_number: Option<String>,
    pub guardian_name: Option<String>,
    pub guardian_contact: Option<String>,
    pub marital_status: Option<String>,
    pub gender: Option<String>,
    pub blood_group: Option<String>,
    pub date_of_birth: Option<String>,
}

/// ID numbers only; the document paths come from the file store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GovernmentIds {
    pub aadhar_no: Option<String>,
    pub pan_no: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreviousEmployment {
    pub pf_no: Option<String>,
    pub uan_no: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Address {
    pub current_address: Option<String>,
    pub current_city: Option<String>,
    pub current_state: Option<String>,
    pub current_pincode: Option<String>,
    pub permanent_address: Option<String>,
    pub permanent_city: Option<String>,
    pub permanent_state: Option<String>,
    pub permanent_pincode: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BankDetails {
    pub bank_name: Option<String>,
    pub account_no: Option<String>,
    pub ifsc_code: Option<String>,
    pub branch_name: Option<String>,
}

/// A submitted onboarding form mapped onto its sub-records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OnboardingForm {
    pub personal: PersonalInfo,
    pub government_ids: GovernmentIds,
    pub previous_employment: PreviousEmployment,
    pub address: Address,
    pub bank_details: BankDetails,
    pub education: Vec<EducationEntry>,
    pub employment: Vec<EmploymentEntry>,
    pub consent: bool,
}

impl OnboardingForm {
    pub fn from_fields(fields: &FormFields) -> Result<Self, AppError> {
        let text = |key: &str| fields.get(key).map(str::to_string);
        let non_empty = |key: &str| fields.get(key).filter(|v| !v.is_empty()).map(str::to_string);

        Ok(OnboardingForm {
            personal: PersonalInfo {
                full_name: text("fullName"),
                email: text("email"),
                phone_no: text("phoneNo"),
                alternate_number: text("alternateNumber"),
                guardian_name: text("guardianName"),
                guardian_contact: text("guardianContact"),
                marital_status: text("maritalStatus"),
                gender: text("gender"),
                blood_group: text("bloodGroup"),
                date_of_birth: text("dateOfBirth"),
            },
            government_ids: GovernmentIds {
                aadhar_no: text("aadharNo"),
                pan_no: text("panNo"),
            },
            previous_employment: PreviousEmployment {
                pf_no: non_empty("pfNo"),
                uan_no: non_empty("uanNo"),
            },
            address: Address {
                current_address: text("currentAddress"),
                current_city: text("currentCity"),
                current_state: text("currentState"),
                current_pincode: text("currentPincode"),
                permanent_address: text("permanentAddress"),
                permanent_city: text("permanentCity"),
                permanent_state: text("permanentState"),
                permanent_pincode: text("permanentPincode"),
            },
            bank_details: BankDetails {
                bank_name: text("bankNameAsPerForm"),
                account_no: text("accountNo"),
                ifsc_code: text("ifscCode"),
                branch_name: text("branchName"),
            },
            education: parse_list(fields.get("educationDetails"), Section::Education)?,
            employment: parse_list(fields.get("employmentDetails"), Section::Employment)?,
            consent: fields.get("consentCheckbox") == Some("on"),
        })
    }
}

/// Parses a JSON-encoded list field. An absent or blank field is an empty list.
fn parse_list<T>(raw: Option<&str>, section: Section) -> Result<Vec<T>, AppError>
where
    T: for<'de> Deserialize<'de>,
{
    match raw.map(str::trim) {
        None | Some("") => Ok(Vec::new()),
        Some(raw) => {
            serde_json::from_str(raw).map_err(|err| AppError::ParseError(section, err.to_string()))
        }
    }
}

/// Accepts a JSON string, number or boolean and keeps it as text.
pub fn text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected a string or number, found {}",
            other
        ))),
    }
}
