use std::collections::HashSet;
use std::fmt;

use crate::errors::AppError;

/// A file field the onboarding form is allowed to upload.
///
/// Education documents are addressed by their 0-based list position
/// (`education[0][doc]`), employment documents by their 1-based position
/// (`employmentDoc1`), matching the field names the form client sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UploadSlot {
    AadhaarFile,
    PanFile,
    SignatureFile,
    EducationDoc(usize),
    EmploymentDoc(usize),
}

impl UploadSlot {
    pub fn from_field_name(name: &str) -> Option<UploadSlot> {
        match name {
            "aadhaarFile" => return Some(UploadSlot::AadhaarFile),
            "panFile" => return Some(UploadSlot::PanFile),
            "signatureFile" => return Some(UploadSlot::SignatureFile),
            _ => {}
        }

        if let Some(index) = name
            .strip_prefix("education[")
            .and_then(|rest| rest.strip_suffix("][doc]"))
        {
            return parse_index(index).map(UploadSlot::EducationDoc);
        }

        if let Some(position) = name.strip_prefix("employmentDoc") {
            return parse_index(position)
                .and_then(|position| position.checked_sub(1))
                .map(UploadSlot::EmploymentDoc);
        }

        None
    }

    pub fn field_name(&self) -> String {
        match self {
            UploadSlot::AadhaarFile => "aadhaarFile".to_string(),
            UploadSlot::PanFile => "panFile".to_string(),
            UploadSlot::SignatureFile => "signatureFile".to_string(),
            UploadSlot::EducationDoc(index) => format!("education[{}][doc]", index),
            UploadSlot::EmploymentDoc(index) => format!("employmentDoc{}", index + 1),
        }
    }
}

impl fmt::Display for UploadSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.field_name())
    }
}

// Digits only: "+1" and " 1" parse as usize but are not names the client produces.
fn parse_index(raw: &str) -> Option<usize> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

/// Checks the slots of one submission against the parsed list lengths
/// before anything is written.
pub fn validate_slots<'a, I>(
    slots: I,
    education_len: usize,
    employment_len: usize,
) -> Result<(), AppError>
where
    I: IntoIterator<Item = &'a UploadSlot>,
{
    let mut seen = HashSet::new();
    for slot in slots {
        if !seen.insert(*slot) {
            return Err(AppError::BadRequest(format!("Duplicate file field: {}", slot)));
        }
        match slot {
            UploadSlot::EducationDoc(index) if *index >= education_len => {
                return Err(AppError::BadRequest(format!(
                    "File field {} has no matching education entry",
                    slot
                )));
            }
            UploadSlot::EmploymentDoc(index) if *index >= employment_len => {
                return Err(AppError::BadRequest(format!(
                    "File field {} has no matching employment entry",
                    slot
                )));
            }
            _ => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_fields_are_recognised() {
        assert_eq!(UploadSlot::from_field_name("aadhaarFile"), Some(UploadSlot::AadhaarFile));
        assert_eq!(UploadSlot::from_field_name("panFile"), Some(UploadSlot::PanFile));
        assert_eq!(UploadSlot::from_field_name("signatureFile"), Some(UploadSlot::SignatureFile));
    }

    #[test]
    fn indexed_fields_map_to_list_positions() {
        assert_eq!(
            UploadSlot::from_field_name("education[0][doc]"),
            Some(UploadSlot::EducationDoc(0))
        );
        assert_eq!(
            UploadSlot::from_field_name("education[12][doc]"),
            Some(UploadSlot::EducationDoc(12))
        );
        assert_eq!(
            UploadSlot::from_field_name("employmentDoc1"),
            Some(UploadSlot::EmploymentDoc(0))
        );
        assert_eq!(
            UploadSlot::from_field_name("employmentDoc3"),
            Some(UploadSlot::EmploymentDoc(2))
        );
    }

    #[test]
    fn malformed_names_are_unknown() {
        for name in [
            "employmentDoc0",
            "employmentDoc",
            "employmentDoc+1",
            "education[][doc]",
            "education[a][doc]",
            "education[0][file]",
            "photo",
        ] {
            assert_eq!(UploadSlot::from_field_name(name), None, "{}", name);
        }
    }

    #[test]
    fn field_name_is_the_inverse_of_parsing() {
        for slot in [
            UploadSlot::AadhaarFile,
            UploadSlot::SignatureFile,
            UploadSlot::EducationDoc(4),
            UploadSlot::EmploymentDoc(0),
        ] {
            assert_eq!(UploadSlot::from_field_name(&slot.field_name()), Some(slot));
        }
    }

    #[test]
    fn slots_beyond_the_lists_are_rejected() {
        let slots = [UploadSlot::SignatureFile, UploadSlot::EducationDoc(1)];
        assert!(validate_slots(&slots, 2, 0).is_ok());
        assert!(matches!(validate_slots(&slots, 1, 0), Err(AppError::BadRequest(_))));

        let slots = [UploadSlot::EmploymentDoc(0)];
        assert!(matches!(validate_slots(&slots, 0, 0), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn duplicate_slots_are_rejected() {
        let slots = [UploadSlot::PanFile, UploadSlot::PanFile];
        match validate_slots(&slots, 0, 0) {
            Err(AppError::BadRequest(msg)) => assert_eq!(msg, "Duplicate file field: panFile"),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
