use validator::Validate;

use crate::errors::AppError;

pub fn validate_payload<T: Validate>(payload: &T) -> Result<(), AppError> {
    payload.validate().map_err(|err| {
        let details = err
            .field_errors()
            .iter()
            .map(|(field, errs)| {
                let codes = errs
                    .iter()
                    .map(|e| e.code.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{}: [{}]", field, codes)
            })
            .collect::<Vec<_>>()
            .join("; ");
        AppError::BadRequest(format!("Validation failed: {}", details))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Validate)]
    struct StatusForm {
        #[validate(length(min = 1))]
        status: String,
    }

    #[test]
    fn reports_the_failing_field() {
        let err = validate_payload(&StatusForm { status: String::new() }).unwrap_err();
        match err {
            AppError::BadRequest(msg) => assert_eq!(msg, "Validation failed: status: [length]"),
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(validate_payload(&StatusForm { status: "approved".to_string() }).is_ok());
    }
}
